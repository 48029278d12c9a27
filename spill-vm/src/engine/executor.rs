//! Fetch, decode and dispatch.

use super::Engine;
use crate::state::ExecuteState;
use crate::trace::TraceRecord;

use spill_ir::{InsnFlags, Instruction, Opcode, Operand, ProgramCounter, TrapReason, Value};

impl Engine {
    /// Execute the instruction at the current program counter. The caller
    /// has already established that the counter is inside the code.
    pub(super) fn execute_instruction(&mut self) -> Result<ExecuteState, TrapReason> {
        let pc = self.pc;
        let insn = self.code[pc as usize];
        tracing::trace!(pc, %insn, "executing instruction");

        let (outcome, result) = self.dispatch(&insn)?;
        self.emit_trace(pc, &insn, result);
        Ok(outcome)
    }

    fn dispatch(
        &mut self,
        insn: &Instruction,
    ) -> Result<(ExecuteState, Option<Value>), TrapReason> {
        use Opcode::*;

        let proceed = |value: Option<Value>| (ExecuteState::Proceed, value);
        match insn.opcode() {
            Assign => {
                let value = self.read_operand(&insn.a())?;
                self.write_operand(&insn.result(), value)?;
                self.inc_pc();
                Ok(proceed(Some(value)))
            }
            Add | Sub | Mul | Div | Mod => Ok(proceed(Some(self.op_arith(insn)?))),
            Neg | Not => Ok(proceed(Some(self.op_unary(insn)?))),
            Eq | Ne | Lt | Le | Gt | Ge => Ok(proceed(Some(self.op_compare(insn)?))),
            And | Or | Xor | Shl | Shr => Ok(proceed(Some(self.op_bitwise(insn)?))),
            Jump => {
                self.op_jump(insn)?;
                Ok(proceed(None))
            }
            JumpIfZero => {
                self.op_branch(insn, true)?;
                Ok(proceed(None))
            }
            JumpIfNonzero => {
                self.op_branch(insn, false)?;
                Ok(proceed(None))
            }
            Call => {
                self.op_call(insn)?;
                Ok(proceed(None))
            }
            Return => {
                self.op_return()?;
                Ok(proceed(None))
            }
            Load => Ok(proceed(Some(self.op_load(insn)?))),
            Store => {
                self.op_store(insn)?;
                Ok(proceed(None))
            }
            Halt => Ok((ExecuteState::Halt, None)),
        }
    }

    /// Evaluate an operand to a value.
    pub(super) fn read_operand(&self, operand: &Operand) -> Result<Value, TrapReason> {
        match *operand {
            Operand::None => Ok(Value::None),
            Operand::Constant(value) => Ok(value),
            Operand::Temporary(id) => {
                if id >= self.config.max_temporaries {
                    return Err(TrapReason::InvalidOperand);
                }
                Ok(self.temporaries[id as usize])
            }
            Operand::Variable(id) => {
                if id >= self.config.max_variables {
                    return Err(TrapReason::InvalidOperand);
                }
                Ok(self.variables[id as usize])
            }
            // Labels are control-flow targets, not values.
            Operand::Label(_) => Err(TrapReason::InvalidOperand),
        }
    }

    /// Store a value through a result operand.
    pub(super) fn write_operand(
        &mut self,
        operand: &Operand,
        value: Value,
    ) -> Result<(), TrapReason> {
        match *operand {
            Operand::Temporary(id) if id < self.config.max_temporaries => {
                self.temporaries[id as usize] = value;
                Ok(())
            }
            Operand::Variable(id) if id < self.config.max_variables => {
                self.variables[id as usize] = value;
                Ok(())
            }
            _ => Err(TrapReason::InvalidOperand),
        }
    }

    pub(super) fn inc_pc(&mut self) {
        self.pc += 1;
    }

    fn emit_trace(&mut self, pc: ProgramCounter, insn: &Instruction, result: Option<Value>) {
        let forced = insn.flags().contains(InsnFlags::TRACE_POINT);
        if !self.config.tracing && !forced {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            let record = TraceRecord {
                pc,
                opcode: insn.opcode(),
                operands: [insn.result(), insn.a(), insn.b()],
                result,
            };
            sink.record(&record);
        }
    }
}
