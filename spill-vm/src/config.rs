//! Engine configuration.

use crate::consts::*;

/// Engine parameters, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of temporary slots; operand ids are checked against this.
    pub max_temporaries: u32,
    /// Number of variable slots.
    pub max_variables: u32,
    /// Call-stack depth at which a call traps with a stack overflow.
    pub max_call_depth: usize,
    /// Default step budget for a `run` invoked with budget 0. Zero means
    /// unlimited.
    pub max_steps: u64,
    /// Size of the heap arena in bytes.
    pub heap_size: u32,
    /// Trap on signed or unsigned integer overflow instead of wrapping.
    pub checked_arithmetic: bool,
    /// Emit a record to the installed trace sink for every executed
    /// instruction. Instructions flagged as trace points are recorded
    /// regardless.
    pub tracing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_temporaries: DEFAULT_MAX_TEMPORARIES,
            max_variables: DEFAULT_MAX_VARIABLES,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_steps: 0,
            heap_size: DEFAULT_HEAP_SIZE,
            checked_arithmetic: false,
            tracing: false,
        }
    }
}
