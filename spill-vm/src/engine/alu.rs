//! Arithmetic, comparison and bitwise execution.

use super::Engine;

use spill_ir::{Instruction, Opcode, TrapReason, Value};

use core::cmp::Ordering;

impl Engine {
    /// `Add`, `Sub`, `Mul`, `Div` and `Mod`. Both operands must carry the
    /// same numeric tag. Integer results wrap unless checked arithmetic is
    /// configured; float division by zero follows IEEE.
    pub(super) fn op_arith(&mut self, insn: &Instruction) -> Result<Value, TrapReason> {
        let a = self.read_operand(&insn.a())?;
        let b = self.read_operand(&insn.b())?;
        let checked = self.config.checked_arithmetic;

        let value = match insn.opcode() {
            Opcode::Add => numeric_binop(a, b, checked, i32::overflowing_add, u32::overflowing_add, |x, y| x + y)?,
            Opcode::Sub => numeric_binop(a, b, checked, i32::overflowing_sub, u32::overflowing_sub, |x, y| x - y)?,
            Opcode::Mul => numeric_binop(a, b, checked, i32::overflowing_mul, u32::overflowing_mul, |x, y| x * y)?,
            Opcode::Div => divide(a, b, checked)?,
            Opcode::Mod => remainder(a, b)?,
            _ => unreachable!("non-arithmetic opcode routed to op_arith"),
        };
        self.write_operand(&insn.result(), value)?;
        self.inc_pc();
        Ok(value)
    }

    /// `Neg` and `Not`.
    pub(super) fn op_unary(&mut self, insn: &Instruction) -> Result<Value, TrapReason> {
        let a = self.read_operand(&insn.a())?;
        let checked = self.config.checked_arithmetic;

        let value = match (insn.opcode(), a) {
            (Opcode::Neg, Value::Int(x)) => {
                let (v, overflow) = x.overflowing_neg();
                if checked && overflow {
                    return Err(TrapReason::ArithmeticOverflow);
                }
                Value::Int(v)
            }
            (Opcode::Neg, Value::Float(x)) => Value::Float(-x),
            (Opcode::Not, Value::Int(x)) => Value::Int(!x),
            (Opcode::Not, Value::Uint(x)) => Value::Uint(!x),
            (Opcode::Not, Value::Bool(x)) => Value::Bool(!x),
            _ => return Err(TrapReason::TypeMismatch),
        };
        self.write_operand(&insn.result(), value)?;
        self.inc_pc();
        Ok(value)
    }

    /// `Eq`, `Ne`, `Lt`, `Le`, `Gt` and `Ge`, producing a boolean.
    /// Equality accepts any matching tags; ordering needs numeric ones.
    /// NaN compares unequal and unordered, per IEEE.
    pub(super) fn op_compare(&mut self, insn: &Instruction) -> Result<Value, TrapReason> {
        let a = self.read_operand(&insn.a())?;
        let b = self.read_operand(&insn.b())?;
        let value = Value::Bool(compare(insn.opcode(), a, b)?);
        self.write_operand(&insn.result(), value)?;
        self.inc_pc();
        Ok(value)
    }

    /// `And`, `Or`, `Xor`, `Shl` and `Shr`: bitwise on matching integer
    /// tags, logical on booleans. Shift amounts are taken modulo 32.
    pub(super) fn op_bitwise(&mut self, insn: &Instruction) -> Result<Value, TrapReason> {
        let a = self.read_operand(&insn.a())?;
        let b = self.read_operand(&insn.b())?;
        let value = bitwise(insn.opcode(), a, b)?;
        self.write_operand(&insn.result(), value)?;
        self.inc_pc();
        Ok(value)
    }
}

fn numeric_binop(
    a: Value,
    b: Value,
    checked: bool,
    f_int: fn(i32, i32) -> (i32, bool),
    f_uint: fn(u32, u32) -> (u32, bool),
    f_float: fn(f32, f32) -> f32,
) -> Result<Value, TrapReason> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            let (v, overflow) = f_int(x, y);
            if checked && overflow {
                return Err(TrapReason::ArithmeticOverflow);
            }
            Ok(Value::Int(v))
        }
        (Value::Uint(x), Value::Uint(y)) => {
            let (v, overflow) = f_uint(x, y);
            if checked && overflow {
                return Err(TrapReason::ArithmeticOverflow);
            }
            Ok(Value::Uint(v))
        }
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(f_float(x, y))),
        _ => Err(TrapReason::TypeMismatch),
    }
}

fn divide(a: Value, b: Value, checked: bool) -> Result<Value, TrapReason> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) | (Value::Uint(_), Value::Uint(0)) => {
            Err(TrapReason::DivisionByZero)
        }
        (Value::Int(x), Value::Int(y)) => {
            // i32::MIN / -1 is the one overflowing division.
            let (v, overflow) = x.overflowing_div(y);
            if checked && overflow {
                return Err(TrapReason::ArithmeticOverflow);
            }
            Ok(Value::Int(v))
        }
        (Value::Uint(x), Value::Uint(y)) => Ok(Value::Uint(x / y)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x / y)),
        _ => Err(TrapReason::TypeMismatch),
    }
}

fn remainder(a: Value, b: Value) -> Result<Value, TrapReason> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) | (Value::Uint(_), Value::Uint(0)) => {
            Err(TrapReason::DivisionByZero)
        }
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x.wrapping_rem(y))),
        (Value::Uint(x), Value::Uint(y)) => Ok(Value::Uint(x % y)),
        _ => Err(TrapReason::TypeMismatch),
    }
}

fn compare(op: Opcode, a: Value, b: Value) -> Result<bool, TrapReason> {
    let equality = matches!(op, Opcode::Eq | Opcode::Ne);
    let ordering: Option<Ordering> = match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.partial_cmp(&y),
        (Value::Uint(x), Value::Uint(y)) => x.partial_cmp(&y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(&y),
        (Value::Bool(x), Value::Bool(y)) if equality => {
            return Ok((op == Opcode::Eq) == (x == y));
        }
        (Value::Ptr(x), Value::Ptr(y)) if equality => {
            return Ok((op == Opcode::Eq) == (x == y));
        }
        (Value::None, Value::None) if equality => return Ok(op == Opcode::Eq),
        _ => return Err(TrapReason::TypeMismatch),
    };
    Ok(match op {
        Opcode::Eq => ordering == Some(Ordering::Equal),
        Opcode::Ne => ordering != Some(Ordering::Equal),
        Opcode::Lt => ordering == Some(Ordering::Less),
        Opcode::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        Opcode::Gt => ordering == Some(Ordering::Greater),
        Opcode::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => unreachable!("non-comparison opcode routed to compare"),
    })
}

fn bitwise(op: Opcode, a: Value, b: Value) -> Result<Value, TrapReason> {
    use Value::*;
    match (op, a, b) {
        (Opcode::And, Int(x), Int(y)) => Ok(Int(x & y)),
        (Opcode::And, Uint(x), Uint(y)) => Ok(Uint(x & y)),
        (Opcode::And, Bool(x), Bool(y)) => Ok(Bool(x && y)),
        (Opcode::Or, Int(x), Int(y)) => Ok(Int(x | y)),
        (Opcode::Or, Uint(x), Uint(y)) => Ok(Uint(x | y)),
        (Opcode::Or, Bool(x), Bool(y)) => Ok(Bool(x || y)),
        (Opcode::Xor, Int(x), Int(y)) => Ok(Int(x ^ y)),
        (Opcode::Xor, Uint(x), Uint(y)) => Ok(Uint(x ^ y)),
        (Opcode::Xor, Bool(x), Bool(y)) => Ok(Bool(x ^ y)),
        (Opcode::Shl, Int(x), Int(y)) => Ok(Int(x.wrapping_shl(y as u32))),
        (Opcode::Shl, Uint(x), Uint(y)) => Ok(Uint(x.wrapping_shl(y))),
        (Opcode::Shr, Int(x), Int(y)) => Ok(Int(x.wrapping_shr(y as u32))),
        (Opcode::Shr, Uint(x), Uint(y)) => Ok(Uint(x.wrapping_shr(y))),
        _ => Err(TrapReason::TypeMismatch),
    }
}
