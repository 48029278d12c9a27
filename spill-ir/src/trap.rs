use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[non_exhaustive]
/// Trap reason representation for the TAC engine.
///
/// Every execution-time failure maps to one of these; the engine moves to
/// its error state and refuses to execute further until reset.
pub enum TrapReason {
    /// The byte can't be mapped to any known `TrapReason`.
    UnknownTrapReason = 0x00,
    /// The fetched byte is not a known opcode.
    InvalidOpcode = 0x01,
    /// An operand tag is unknown, or a temporary/variable id is out of the
    /// configured range.
    InvalidOperand = 0x02,
    /// A jump, call or start target lies outside the loaded code, or a heap
    /// access lies outside any live allocation.
    InvalidAddress = 0x03,
    /// The operand value tags don't match what the opcode requires.
    TypeMismatch = 0x04,
    /// Integer division or remainder with a zero divisor.
    DivisionByZero = 0x05,
    /// Integer overflow while checked arithmetic is enabled.
    /// With checked arithmetic disabled the result wraps instead.
    ArithmeticOverflow = 0x06,
    /// A call would exceed the configured call-stack depth.
    StackOverflow = 0x07,
    /// A return was executed with an empty call stack.
    StackUnderflow = 0x08,
    /// The engine heap cannot serve the requested allocation.
    HeapExhausted = 0x09,
}

impl fmt::Display for TrapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for TrapReason {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<u8> for TrapReason {
    /// Converts the `u8` into a `TrapReason`.
    fn from(b: u8) -> Self {
        use TrapReason::*;
        match b {
            0x01 => InvalidOpcode,
            0x02 => InvalidOperand,
            0x03 => InvalidAddress,
            0x04 => TypeMismatch,
            0x05 => DivisionByZero,
            0x06 => ArithmeticOverflow,
            0x07 => StackOverflow,
            0x08 => StackUnderflow,
            0x09 => HeapExhausted,
            _ => UnknownTrapReason,
        }
    }
}
