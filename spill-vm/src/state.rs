//! Engine state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Lifecycle state of an [`crate::Engine`].
///
/// The legal transitions are `Created → Loaded → Running → (Paused |
/// Halted | Error)`; `reset` returns any post-load state to `Loaded`, and
/// `Paused` resumes into `Running`.
pub enum ExecState {
    /// Constructed, no code loaded yet.
    Created,
    /// Code is loaded and execution can be started.
    Loaded,
    /// Mid-execution.
    Running,
    /// Execution suspended by a step budget; resumable.
    Paused,
    /// Execution finished normally.
    Halted,
    /// Execution trapped; only `reset` and the observers are useful now.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of executing a single instruction.
pub(crate) enum ExecuteState {
    /// Continue with the next instruction.
    Proceed,
    /// Execution finished normally.
    Halt,
}
