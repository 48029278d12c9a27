//! Jumps, calls and returns.

use super::Engine;
use crate::call::CallFrame;

use spill_ir::{Instruction, Operand, ProgramCounter, TrapReason, Value};

impl Engine {
    pub(super) fn op_jump(&mut self, insn: &Instruction) -> Result<(), TrapReason> {
        self.pc = self.branch_target(&insn.a())?;
        Ok(())
    }

    pub(super) fn op_branch(
        &mut self,
        insn: &Instruction,
        branch_on_zero: bool,
    ) -> Result<(), TrapReason> {
        let zero = match self.read_operand(&insn.a())? {
            Value::Int(v) => v == 0,
            Value::Uint(v) => v == 0,
            Value::Bool(v) => !v,
            _ => return Err(TrapReason::TypeMismatch),
        };
        if zero == branch_on_zero {
            self.pc = self.branch_target(&insn.b())?;
        } else {
            self.inc_pc();
        }
        Ok(())
    }

    pub(super) fn op_call(&mut self, insn: &Instruction) -> Result<(), TrapReason> {
        if self.frames.len() >= self.config.max_call_depth {
            return Err(TrapReason::StackOverflow);
        }
        let target = self.branch_target(&insn.a())?;
        self.frames.push(CallFrame::new(self.pc + 1));
        self.pc = target;
        Ok(())
    }

    pub(super) fn op_return(&mut self) -> Result<(), TrapReason> {
        let frame = self.frames.pop().ok_or(TrapReason::StackUnderflow)?;
        // The saved pc may sit one past the end; the next fetch then halts
        // normally.
        self.pc = frame.return_pc();
        Ok(())
    }

    /// Resolve a control-flow target operand and range-check it against the
    /// loaded code.
    fn branch_target(&self, operand: &Operand) -> Result<ProgramCounter, TrapReason> {
        let target = match *operand {
            Operand::Label(pc) => pc,
            Operand::Constant(Value::Int(v)) if v >= 0 => v as ProgramCounter,
            Operand::Constant(Value::Uint(v)) => v,
            _ => return Err(TrapReason::InvalidOperand),
        };
        if target as usize >= self.code.len() {
            return Err(TrapReason::InvalidAddress);
        }
        Ok(target)
    }
}
