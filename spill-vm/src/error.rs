//! Engine error implementation.

use crate::state::ExecState;

use spill_ir::TrapReason;
use thiserror::Error;

/// Engine error variants.
///
/// [`EngineError::Trap`] is raised by execution and moves the engine into
/// its error state; everything else reports a misuse of the public API and
/// leaves the engine state untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Execution trapped; see the reason. The engine refuses to execute
    /// until it is reset.
    #[error("execution trap: {0}")]
    Trap(#[from] TrapReason),
    /// The engine is mid-execution; stop or reset it first.
    #[error("the engine is busy executing")]
    Busy,
    /// The operation is not legal in the current state.
    #[error("operation not legal in the {0:?} state")]
    NotReady(ExecState),
    /// A parameter failed validation before any state changed.
    #[error("invalid parameter")]
    InvalidParam,
    /// The step budget of this `run` invocation is exhausted; the engine
    /// is paused and can be resumed.
    #[error("step budget exhausted after {steps} steps")]
    StepLimitExceeded {
        /// Total steps executed since `start`.
        steps: u64,
    },
}

impl EngineError {
    /// The trap reason carried by this error, if any.
    pub const fn trap_reason(&self) -> Option<TrapReason> {
        match self {
            Self::Trap(reason) => Some(*reason),
            _ => None,
        }
    }
}
