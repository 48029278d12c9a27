//! Three-address-code engine of the spillc pipeline.
//!
//! The [`Engine`] interprets an in-memory sequence of `spill-ir`
//! instructions over a typed value model: numbered temporaries and
//! variables, a call stack of return addresses, and a byte heap serving
//! discrete allocations. Execution is fully synchronous and
//! single-threaded; the only limits are the configured step budget and
//! call depth, which surface as resumable pauses and traps respectively.
//!
//! The engine is an explicit value. Nothing in this crate is global, and
//! the trace sink is an injected capability rather than an owned output.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod call;
pub mod config;
pub mod consts;
mod engine;
mod error;
mod heap;
mod state;
pub mod trace;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use state::ExecState;

pub mod prelude {
    //! Convenience re-exports for hosts and tests.
    #[doc(no_inline)]
    pub use spill_ir::{
        op, HeapAddr, Instruction, InsnFlags, Opcode, Operand, ProgramCounter, RegId,
        TrapReason, Value,
    };

    pub use crate::{
        call::CallFrame,
        config::Config,
        engine::Engine,
        error::EngineError,
        state::ExecState,
        trace::{NoopSink, TraceRecord, TraceSink, VecSink},
    };
}
