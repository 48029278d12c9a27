//! Execution tracing as an injected capability.
//!
//! The engine does not own a trace output; the host installs a
//! [`TraceSink`] and the engine hands it one [`TraceRecord`] per executed
//! instruction when tracing is enabled. Sinks are infallible by signature,
//! so a misbehaving sink can never change engine state.

use spill_ir::{Opcode, Operand, ProgramCounter, Value};

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
/// One executed instruction, as seen by the trace sink.
pub struct TraceRecord {
    /// Program counter the instruction was fetched from.
    pub pc: ProgramCounter,
    /// Executed opcode.
    pub opcode: Opcode,
    /// The instruction's result, `a` and `b` operands as written.
    pub operands: [Operand; 3],
    /// Value produced by the instruction, when it produced one.
    pub result: Option<Value>,
}

/// Receiver for execution trace records.
pub trait TraceSink {
    /// Called once per traced instruction, after it executed successfully.
    fn record(&mut self, record: &TraceRecord);
}

/// Sink that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn record(&mut self, _record: &TraceRecord) {}
}

/// Sink that collects records into a shared buffer; clones observe the
/// same buffer, so tests can keep a handle while the engine owns the sink.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    records: Rc<RefCell<Vec<TraceRecord>>>,
}

impl VecSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records collected so far.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.borrow().clone()
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether no records have been collected.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl TraceSink for VecSink {
    fn record(&mut self, record: &TraceRecord) {
        self.records.borrow_mut().push(record.clone());
    }
}
