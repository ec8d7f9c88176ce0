use thiserror::Error;

use crate::core::descriptors::provider::ParseError;
use crate::core::fingerprint::FingerprintError;
use crate::core::simulation::extractor::Variant;
use crate::core::simulation::source::ExtractionError;
use crate::core::statistics::reducer::ReduceError;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Structural descriptor computation failed: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error(
        "No molecular identifier for the {variant} variant: none was given and no source embeds one"
    )]
    MissingIdentifier { variant: Variant },

    #[error("Sources embed conflicting identifiers: '{solution}' (solution) vs '{liquid}' (liquid)")]
    ConflictingIdentifiers { solution: String, liquid: String },

    #[error("Property extraction failed: {source}")]
    Extraction {
        #[from]
        source: ExtractionError,
    },

    #[error("Moment reduction failed for '{property}': the series is empty")]
    EmptySeries { property: String },

    #[error("Fingerprint key collision on '{key}'")]
    KeyCollision { key: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<ReduceError> for ComposeError {
    fn from(err: ReduceError) -> Self {
        match err {
            ReduceError::EmptySeries { property } => ComposeError::EmptySeries { property },
        }
    }
}

impl From<FingerprintError> for ComposeError {
    fn from(err: FingerprintError) -> Self {
        match err {
            FingerprintError::KeyCollision { key } => ComposeError::KeyCollision { key },
            other => ComposeError::Internal(other.to_string()),
        }
    }
}
