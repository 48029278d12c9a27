//! Call-stack frames.

use spill_ir::ProgramCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One call-stack entry: where execution resumes after the matching
/// return. Temporaries and variables are not saved across calls;
/// temporaries are scratch by convention and variables persist by design.
pub struct CallFrame {
    return_pc: ProgramCounter,
}

impl CallFrame {
    /// Create a frame resuming at `return_pc`.
    pub const fn new(return_pc: ProgramCounter) -> Self {
        Self { return_pc }
    }

    /// The saved resume address.
    pub const fn return_pc(&self) -> ProgramCounter {
        self.return_pc
    }
}
