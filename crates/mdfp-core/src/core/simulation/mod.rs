pub mod extractor;
pub mod handle;
pub mod series;
pub mod source;
pub mod table;
