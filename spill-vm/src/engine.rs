//! [`Engine`] implementation.

use crate::{
    call::CallFrame,
    config::Config,
    error::EngineError,
    heap::Heap,
    state::{ExecState, ExecuteState},
    trace::TraceSink,
};

use spill_ir::{HeapAddr, Instruction, ProgramCounter, RegId, TrapReason, Value};

use core::fmt;

mod alu;
mod executor;
mod flow;
mod memory;

/// TAC engine.
///
/// Owns its loaded code, temporary and variable files, call stack and heap;
/// everything is released on drop. The lifecycle is a small state machine
/// (see [`ExecState`]); operations that are illegal in the current state
/// fail with [`EngineError::NotReady`] or [`EngineError::Busy`] without
/// touching anything.
pub struct Engine {
    config: Config,
    state: ExecState,
    code: Vec<Instruction>,
    pc: ProgramCounter,
    temporaries: Vec<Value>,
    variables: Vec<Value>,
    frames: Vec<CallFrame>,
    heap: Heap,
    steps: u64,
    /// Absolute step count at which execution pauses next; 0 when the step
    /// limit is off. Re-armed on every pause so a resumed engine gets a
    /// fresh `max_steps` window.
    pause_at: u64,
    sink: Option<Box<dyn TraceSink>>,
}

impl Engine {
    /// Allocate an engine per `config`. The engine starts in
    /// [`ExecState::Created`] with no code loaded.
    pub fn new(config: Config) -> Self {
        let temporaries = vec![Value::None; config.max_temporaries as usize];
        let variables = vec![Value::None; config.max_variables as usize];
        let heap = Heap::new(config.heap_size);
        Self {
            config,
            state: ExecState::Created,
            code: Vec::new(),
            pc: 0,
            temporaries,
            variables,
            frames: Vec::new(),
            heap,
            steps: 0,
            pause_at: 0,
            sink: None,
        }
    }

    /// Copy `code` into the engine and enter [`ExecState::Loaded`].
    ///
    /// Legal in every state except mid-execution; loading over a halted or
    /// errored engine is the intended way to run the next sequence.
    pub fn load_code(&mut self, code: &[Instruction]) -> Result<(), EngineError> {
        match self.state {
            ExecState::Running | ExecState::Paused => return Err(EngineError::Busy),
            _ => {}
        }
        if code.is_empty() || code.len() > ProgramCounter::MAX as usize {
            return Err(EngineError::InvalidParam);
        }
        self.code = code.to_vec();
        self.state = ExecState::Loaded;
        tracing::debug!(len = code.len(), "loaded code");
        Ok(())
    }

    /// Reset step and call accounting, set the program counter to
    /// `entry` and enter [`ExecState::Running`].
    pub fn start(&mut self, entry: ProgramCounter) -> Result<(), EngineError> {
        match self.state {
            ExecState::Loaded | ExecState::Halted => {}
            state => return Err(EngineError::NotReady(state)),
        }
        if entry as usize >= self.code.len() {
            return Err(EngineError::Trap(TrapReason::InvalidAddress));
        }
        self.pc = entry;
        self.steps = 0;
        self.pause_at = self.config.max_steps;
        self.frames.clear();
        self.state = ExecState::Running;
        tracing::debug!(entry, "started execution");
        Ok(())
    }

    /// Execute exactly one instruction, resuming from a pause if needed.
    ///
    /// A trap moves the engine to [`ExecState::Error`]; running off the end
    /// of the code or executing a halt moves it to [`ExecState::Halted`],
    /// which is not an error. The configured `max_steps` applies here too:
    /// the instruction that reaches the limit still executes, then the
    /// engine pauses with [`EngineError::StepLimitExceeded`].
    pub fn step(&mut self) -> Result<(), EngineError> {
        match self.state {
            ExecState::Running | ExecState::Paused => {}
            state => return Err(EngineError::NotReady(state)),
        }
        self.state = ExecState::Running;
        self.advance()
    }

    /// Execute until the engine halts, traps, or `budget` instructions have
    /// run; a `budget` of 0 uses the configured `max_steps`.
    ///
    /// An exhausted budget pauses the engine and reports
    /// [`EngineError::StepLimitExceeded`]; calling `run` (or [`Self::step`])
    /// again resumes where it left off. A budget spent on the last
    /// instruction of the code is not a pause: with nothing left to fetch
    /// the engine halts normally.
    pub fn run(&mut self, budget: u64) -> Result<(), EngineError> {
        match self.state {
            ExecState::Running | ExecState::Paused => {}
            state => return Err(EngineError::NotReady(state)),
        }
        self.state = ExecState::Running;

        let budget = if budget == 0 {
            self.config.max_steps
        } else {
            budget
        };
        let mut executed: u64 = 0;
        loop {
            self.advance()?;
            if self.state == ExecState::Halted {
                return Ok(());
            }
            executed += 1;
            if budget > 0 && executed >= budget && (self.pc as usize) < self.code.len() {
                self.state = ExecState::Paused;
                tracing::debug!(steps = self.steps, "step budget exhausted, pausing");
                return Err(EngineError::StepLimitExceeded { steps: self.steps });
            }
        }
    }

    /// Transition to [`ExecState::Halted`] without executing anything.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        match self.state {
            ExecState::Running | ExecState::Paused => {
                self.state = ExecState::Halted;
                Ok(())
            }
            state => Err(EngineError::NotReady(state)),
        }
    }

    /// Clear temporaries, variables, heap, call stack and step count, and
    /// return to [`ExecState::Loaded`]. Legal everywhere except before the
    /// first load.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.state == ExecState::Created {
            return Err(EngineError::NotReady(ExecState::Created));
        }
        self.temporaries.fill(Value::None);
        self.variables.fill(Value::None);
        self.frames.clear();
        self.heap.clear();
        self.steps = 0;
        self.pc = 0;
        self.state = ExecState::Loaded;
        tracing::debug!("engine reset");
        Ok(())
    }

    /// Read temporary `id`. Callable in any state.
    pub fn temporary(&self, id: RegId) -> Result<Value, EngineError> {
        if id >= self.config.max_temporaries {
            return Err(EngineError::Trap(TrapReason::InvalidOperand));
        }
        Ok(self.temporaries[id as usize])
    }

    /// Write temporary `id`. Callable in any state.
    pub fn set_temporary(&mut self, id: RegId, value: Value) -> Result<(), EngineError> {
        if id >= self.config.max_temporaries {
            return Err(EngineError::Trap(TrapReason::InvalidOperand));
        }
        self.temporaries[id as usize] = value;
        Ok(())
    }

    /// Read variable `id`. Callable in any state.
    pub fn variable(&self, id: RegId) -> Result<Value, EngineError> {
        if id >= self.config.max_variables {
            return Err(EngineError::Trap(TrapReason::InvalidOperand));
        }
        Ok(self.variables[id as usize])
    }

    /// Write variable `id`. Callable in any state.
    pub fn set_variable(&mut self, id: RegId, value: Value) -> Result<(), EngineError> {
        if id >= self.config.max_variables {
            return Err(EngineError::Trap(TrapReason::InvalidOperand));
        }
        self.variables[id as usize] = value;
        Ok(())
    }

    /// Reserve `size` bytes in the engine heap. The returned address is
    /// never 0. Does not change the engine state, even on failure.
    pub fn alloc_memory(&mut self, size: u32) -> Result<HeapAddr, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidParam);
        }
        Ok(self.heap.alloc(size)?)
    }

    /// Release a prior allocation by its base address.
    pub fn free_memory(&mut self, addr: HeapAddr) -> Result<(), EngineError> {
        Ok(self.heap.free(addr)?)
    }

    /// Copy bytes out of the heap; `[addr, addr + buf.len())` must lie
    /// entirely within one live allocation.
    pub fn read_memory(&self, addr: HeapAddr, buf: &mut [u8]) -> Result<(), EngineError> {
        Ok(self.heap.read(addr, buf)?)
    }

    /// Copy bytes into the heap; same containment rule as
    /// [`Self::read_memory`].
    pub fn write_memory(&mut self, addr: HeapAddr, buf: &[u8]) -> Result<(), EngineError> {
        Ok(self.heap.write(addr, buf)?)
    }

    /// Install the trace sink records are delivered to.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Remove and return the installed trace sink.
    pub fn clear_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ExecState {
        self.state
    }

    /// Instructions executed since the last `start`.
    pub const fn step_count(&self) -> u64 {
        self.steps
    }

    /// Current program counter.
    pub const fn pc(&self) -> ProgramCounter {
        self.pc
    }

    /// Current call-stack depth.
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one instruction and account for it, folding the outcome
    /// into the state machine.
    fn advance(&mut self) -> Result<(), EngineError> {
        if self.pc as usize >= self.code.len() {
            // Sequential flow ran off the end; jump targets are checked at
            // jump time, so this is the normal way scripts finish.
            self.state = ExecState::Halted;
            tracing::debug!(steps = self.steps, "execution ran off the end of code");
            return Ok(());
        }
        match self.execute_instruction() {
            Ok(outcome) => {
                self.steps += 1;
                if outcome == ExecuteState::Halt {
                    self.state = ExecState::Halted;
                    tracing::debug!(steps = self.steps, "execution halted");
                } else if self.pause_at > 0
                    && self.steps >= self.pause_at
                    && (self.pc as usize) < self.code.len()
                {
                    // Re-arm so the next unpaused stretch gets another
                    // max_steps window; otherwise a resumed engine would
                    // pause again on its first instruction.
                    self.pause_at = self.steps + self.config.max_steps;
                    self.state = ExecState::Paused;
                    tracing::debug!(steps = self.steps, "step limit reached, pausing");
                    return Err(EngineError::StepLimitExceeded { steps: self.steps });
                }
                Ok(())
            }
            Err(reason) => {
                self.state = ExecState::Error;
                tracing::debug!(%reason, pc = self.pc, "execution trapped");
                Err(EngineError::Trap(reason))
            }
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("steps", &self.steps)
            .field("code_len", &self.code.len())
            .field("call_depth", &self.frames.len())
            .finish_non_exhaustive()
    }
}
