use super::error::ComposeError;

/// Lifecycle of a single composition run.
///
/// Phases only move forward; a run that fails stays in the phase it failed in and
/// its partial state is dropped with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Unconfigured,
    ResolvingIdentifier,
    Collecting,
    Done,
}

impl RunPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RunPhase::Unconfigured => "unconfigured",
            RunPhase::ResolvingIdentifier => "resolving-identifier",
            RunPhase::Collecting => "collecting",
            RunPhase::Done => "done",
        }
    }

    fn successor(&self) -> Option<RunPhase> {
        match self {
            RunPhase::Unconfigured => Some(RunPhase::ResolvingIdentifier),
            RunPhase::ResolvingIdentifier => Some(RunPhase::Collecting),
            RunPhase::Collecting => Some(RunPhase::Done),
            RunPhase::Done => None,
        }
    }
}

#[derive(Debug)]
pub struct RunState {
    phase: RunPhase,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: RunPhase::Unconfigured,
        }
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Moves to `next`, which must be the immediate successor of the current phase.
    pub fn advance(&mut self, next: RunPhase) -> Result<(), ComposeError> {
        if self.phase.successor() != Some(next) {
            return Err(ComposeError::Internal(format!(
                "invalid run phase transition from {} to {}",
                self.phase.name(),
                next.name()
            )));
        }
        self.phase = next;
        Ok(())
    }
}
