use crate::TrapReason;

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
/// TAC opcode set.
///
/// Arithmetic and comparison opcodes are polymorphic over the numeric value
/// tags; both operands must carry the same tag. Byte `0x00` is reserved so
/// a zeroed record never decodes as an instruction.
pub enum Opcode {
    /// Copy operand `a` into the result operand.
    Assign = 0x01,
    /// `result = a + b`.
    Add = 0x02,
    /// `result = a - b`.
    Sub = 0x03,
    /// `result = a * b`.
    Mul = 0x04,
    /// `result = a / b`. Integer division by zero traps; float division by
    /// zero yields IEEE inf/NaN.
    Div = 0x05,
    /// `result = a % b`. Integer only; zero divisor traps.
    Mod = 0x06,
    /// `result = -a`. Signed integer or float.
    Neg = 0x07,
    /// `result = a == b`, any matching tags.
    Eq = 0x08,
    /// `result = a != b`, any matching tags.
    Ne = 0x09,
    /// `result = a < b`, numeric tags.
    Lt = 0x0a,
    /// `result = a <= b`, numeric tags.
    Le = 0x0b,
    /// `result = a > b`, numeric tags.
    Gt = 0x0c,
    /// `result = a >= b`, numeric tags.
    Ge = 0x0d,
    /// Bitwise and on integers, logical and on booleans.
    And = 0x0e,
    /// Bitwise or on integers, logical or on booleans.
    Or = 0x0f,
    /// Bitwise xor on integers, logical xor on booleans.
    Xor = 0x10,
    /// Bitwise not on integers, logical not on booleans.
    Not = 0x11,
    /// `result = a << b`, integer tags; the shift amount is taken modulo 32.
    Shl = 0x12,
    /// `result = a >> b`, integer tags; arithmetic on `Int`, logical on
    /// `Uint`; the shift amount is taken modulo 32.
    Shr = 0x13,
    /// Unconditional jump to operand `a` (label or integer constant).
    Jump = 0x14,
    /// Jump to `b` when condition `a` is integer zero or `false`.
    JumpIfZero = 0x15,
    /// Jump to `b` when condition `a` is non-zero or `true`.
    JumpIfNonzero = 0x16,
    /// Push the return pc and jump to operand `a`.
    Call = 0x17,
    /// Pop the call stack and resume at the saved pc.
    Return = 0x18,
    /// Load the 32-bit word at heap address `a` into the result operand as
    /// a `Uint`.
    Load = 0x19,
    /// Store the 32-bit payload of value `b` at heap address `a`.
    Store = 0x1a,
    /// Halt execution normally.
    Halt = 0x1b,
}

impl TryFrom<u8> for Opcode {
    type Error = TrapReason;

    fn try_from(b: u8) -> Result<Self, TrapReason> {
        use Opcode::*;
        match b {
            0x01 => Ok(Assign),
            0x02 => Ok(Add),
            0x03 => Ok(Sub),
            0x04 => Ok(Mul),
            0x05 => Ok(Div),
            0x06 => Ok(Mod),
            0x07 => Ok(Neg),
            0x08 => Ok(Eq),
            0x09 => Ok(Ne),
            0x0a => Ok(Lt),
            0x0b => Ok(Le),
            0x0c => Ok(Gt),
            0x0d => Ok(Ge),
            0x0e => Ok(And),
            0x0f => Ok(Or),
            0x10 => Ok(Xor),
            0x11 => Ok(Not),
            0x12 => Ok(Shl),
            0x13 => Ok(Shr),
            0x14 => Ok(Jump),
            0x15 => Ok(JumpIfZero),
            0x16 => Ok(JumpIfNonzero),
            0x17 => Ok(Call),
            0x18 => Ok(Return),
            0x19 => Ok(Load),
            0x1a => Ok(Store),
            0x1b => Ok(Halt),
            _ => Err(TrapReason::InvalidOpcode),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
