use crate::{ProgramCounter, RegId, TrapReason, Value};

use core::fmt;

/// Wire size of an encoded operand: tag, value tag, 32-bit payload.
pub(crate) const OPERAND_WIRE_LEN: usize = 6;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// An instruction operand.
///
/// Ids are bounded by the engine configuration and checked at decode time;
/// unknown tags are [`TrapReason::InvalidOperand`], never reinterpreted
/// memory.
pub enum Operand {
    /// No operand in this position.
    #[default]
    None,
    /// A temporary slot, SSA-style scratch.
    Temporary(RegId),
    /// A variable slot, persistent across calls.
    Variable(RegId),
    /// An inline constant.
    Constant(Value),
    /// A jump or call target.
    Label(ProgramCounter),
}

#[repr(u8)]
enum OperandTag {
    None = 0x00,
    Temporary = 0x01,
    Variable = 0x02,
    Constant = 0x03,
    Label = 0x04,
}

impl Operand {
    /// Shorthand for a temporary operand.
    pub const fn temp(id: RegId) -> Self {
        Self::Temporary(id)
    }

    /// Shorthand for a variable operand.
    pub const fn var(id: RegId) -> Self {
        Self::Variable(id)
    }

    /// Shorthand for a signed integer constant.
    pub const fn int(v: i32) -> Self {
        Self::Constant(Value::Int(v))
    }

    /// Shorthand for an unsigned integer constant.
    pub const fn uint(v: u32) -> Self {
        Self::Constant(Value::Uint(v))
    }

    /// Shorthand for a float constant.
    pub const fn float(v: f32) -> Self {
        Self::Constant(Value::Float(v))
    }

    /// Shorthand for a boolean constant.
    pub const fn boolean(v: bool) -> Self {
        Self::Constant(Value::Bool(v))
    }

    /// Shorthand for a label operand.
    pub const fn label(pc: ProgramCounter) -> Self {
        Self::Label(pc)
    }

    /// Encode into the fixed wire layout.
    pub(crate) fn write_wire(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= OPERAND_WIRE_LEN);
        let (tag, vtag, payload) = match *self {
            Self::None => (OperandTag::None as u8, 0, 0),
            Self::Temporary(id) => (OperandTag::Temporary as u8, 0, id),
            Self::Variable(id) => (OperandTag::Variable as u8, 0, id),
            Self::Constant(v) => {
                let (vtag, payload) = v.to_wire();
                (OperandTag::Constant as u8, vtag, payload)
            }
            Self::Label(pc) => (OperandTag::Label as u8, 0, pc),
        };
        out[0] = tag;
        out[1] = vtag;
        out[2..OPERAND_WIRE_LEN].copy_from_slice(&payload.to_le_bytes());
    }

    /// Decode from the fixed wire layout.
    pub(crate) fn from_wire(bytes: &[u8]) -> Result<Self, TrapReason> {
        debug_assert!(bytes.len() >= OPERAND_WIRE_LEN);
        let payload = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        match bytes[0] {
            t if t == OperandTag::None as u8 => Ok(Self::None),
            t if t == OperandTag::Temporary as u8 => Ok(Self::Temporary(payload)),
            t if t == OperandTag::Variable as u8 => Ok(Self::Variable(payload)),
            t if t == OperandTag::Constant as u8 => {
                Ok(Self::Constant(Value::from_wire(bytes[1], payload)?))
            }
            t if t == OperandTag::Label as u8 => Ok(Self::Label(payload)),
            _ => Err(TrapReason::InvalidOperand),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "_"),
            Self::Temporary(id) => write!(f, "t{id}"),
            Self::Variable(id) => write!(f, "v{id}"),
            Self::Constant(v) => write!(f, "{v}"),
            Self::Label(pc) => write!(f, "@{pc}"),
        }
    }
}
