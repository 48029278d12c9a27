//! Heap load and store opcodes.

use super::Engine;

use spill_ir::{HeapAddr, Instruction, Operand, TrapReason, Value};

impl Engine {
    /// `Load`: read the 32-bit word at the address in `a` into the result
    /// operand as a `Uint`. The heap is untyped; tags do not survive it.
    pub(super) fn op_load(&mut self, insn: &Instruction) -> Result<Value, TrapReason> {
        let addr = self.operand_addr(&insn.a())?;
        let value = Value::Uint(self.heap.load_word(addr)?);
        self.write_operand(&insn.result(), value)?;
        self.inc_pc();
        Ok(value)
    }

    /// `Store`: write the 32-bit payload of value `b` at the address in
    /// `a`.
    pub(super) fn op_store(&mut self, insn: &Instruction) -> Result<(), TrapReason> {
        let addr = self.operand_addr(&insn.a())?;
        let word = match self.read_operand(&insn.b())? {
            Value::Int(v) => v as u32,
            Value::Uint(v) => v,
            Value::Float(v) => v.to_bits(),
            Value::Ptr(v) => v,
            Value::Bool(v) => v as u32,
            Value::None => return Err(TrapReason::TypeMismatch),
        };
        self.heap.store_word(addr, word)?;
        self.inc_pc();
        Ok(())
    }

    fn operand_addr(&self, operand: &Operand) -> Result<HeapAddr, TrapReason> {
        match self.read_operand(operand)? {
            Value::Ptr(addr) => Ok(addr),
            _ => Err(TrapReason::TypeMismatch),
        }
    }
}
