//! Three-address-code instruction set of the spillc pipeline.
//!
//! The compiler front end lowers the AST into TAC instructions and spills
//! them into a fixed-record store; the engine in `spill-vm` loads a sequence
//! of them and interprets it. This crate owns the shared vocabulary: typed
//! [`Value`]s, [`Operand`] variants, the [`Opcode`] set, the fixed-size wire
//! encoding of [`Instruction`], and the [`TrapReason`] taxonomy raised by
//! execution.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod instruction;
pub mod op;
mod opcode;
mod operand;
mod trap;
mod value;

pub use instruction::{Instruction, InsnFlags};
pub use opcode::Opcode;
pub use operand::Operand;
pub use trap::TrapReason;
pub use value::{Value, ValueTag};

/// Index of a temporary or variable slot in the engine.
pub type RegId = u32;

/// Program counter, an index into the loaded instruction sequence.
pub type ProgramCounter = u32;

/// Address in the engine heap. Zero is never a valid address.
pub type HeapAddr = u32;
