use crate::{HeapAddr, TrapReason};

use core::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A typed engine value.
///
/// There is no implicit numeric promotion anywhere in the pipeline: an
/// operation over two values with different tags is a
/// [`TrapReason::TypeMismatch`] unless the opcode is defined as polymorphic.
pub enum Value {
    /// The absence of a value; the content of uninitialized temporaries and
    /// variables.
    #[default]
    None,
    /// Signed 32-bit integer.
    Int(i32),
    /// Unsigned 32-bit integer.
    Uint(u32),
    /// IEEE-754 single-precision float.
    Float(f32),
    /// Address of an engine heap allocation. Never zero.
    Ptr(HeapAddr),
    /// Boolean, produced by the comparison opcodes.
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
/// Discriminant of a [`Value`], used on the wire and in diagnostics.
pub enum ValueTag {
    /// See [`Value::None`].
    None = 0x00,
    /// See [`Value::Int`].
    Int = 0x01,
    /// See [`Value::Uint`].
    Uint = 0x02,
    /// See [`Value::Float`].
    Float = 0x03,
    /// See [`Value::Ptr`].
    Ptr = 0x04,
    /// See [`Value::Bool`].
    Bool = 0x05,
}

impl Value {
    /// The tag of this value.
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::None => ValueTag::None,
            Self::Int(_) => ValueTag::Int,
            Self::Uint(_) => ValueTag::Uint,
            Self::Float(_) => ValueTag::Float,
            Self::Ptr(_) => ValueTag::Ptr,
            Self::Bool(_) => ValueTag::Bool,
        }
    }

    /// Split into wire representation: tag byte plus 32-bit payload.
    pub fn to_wire(self) -> (u8, u32) {
        let payload = match self {
            Self::None => 0,
            Self::Int(v) => v as u32,
            Self::Uint(v) => v,
            Self::Float(v) => v.to_bits(),
            Self::Ptr(v) => v,
            Self::Bool(v) => v as u32,
        };
        (self.tag() as u8, payload)
    }

    /// Rebuild a value from its wire representation.
    ///
    /// Unknown tags are rejected rather than reinterpreted.
    pub fn from_wire(tag: u8, payload: u32) -> Result<Self, TrapReason> {
        match tag {
            t if t == ValueTag::None as u8 => Ok(Self::None),
            t if t == ValueTag::Int as u8 => Ok(Self::Int(payload as i32)),
            t if t == ValueTag::Uint as u8 => Ok(Self::Uint(payload)),
            t if t == ValueTag::Float as u8 => Ok(Self::Float(f32::from_bits(payload))),
            t if t == ValueTag::Ptr as u8 => Ok(Self::Ptr(payload)),
            t if t == ValueTag::Bool as u8 => Ok(Self::Bool(payload != 0)),
            _ => Err(TrapReason::InvalidOperand),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Int(v) => write!(f, "{v}i"),
            Self::Uint(v) => write!(f, "{v}u"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::Ptr(v) => write!(f, "ptr:{v:#x}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let values = [
            Value::None,
            Value::Int(-7),
            Value::Uint(u32::MAX),
            Value::Float(1.5),
            Value::Ptr(0x40),
            Value::Bool(true),
        ];
        for v in values {
            let (tag, payload) = v.to_wire();
            assert_eq!(Value::from_wire(tag, payload).unwrap(), v);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            Value::from_wire(0xfe, 0),
            Err(TrapReason::InvalidOperand)
        );
    }
}
