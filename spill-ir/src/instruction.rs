use crate::{
    operand::OPERAND_WIRE_LEN,
    Opcode,
    Operand,
    TrapReason,
};

use core::fmt;

bitflags::bitflags! {
    /// Per-instruction flag bits carried through the TAC store.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InsnFlags: u8 {
        /// The instruction begins a source statement; used by diagnostics.
        const STMT_START = 0x01;
        /// The host requested a trace record for this instruction even when
        /// tracing is otherwise disabled.
        const TRACE_POINT = 0x02;
    }
}

impl Default for InsnFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A single three-address-code instruction.
///
/// The wire layout is frozen for file compatibility: one opcode byte, one
/// flags byte, then the result, `a` and `b` operands at six bytes each,
/// little-endian payloads throughout.
pub struct Instruction {
    opcode: Opcode,
    result: Operand,
    a: Operand,
    b: Operand,
    flags: InsnFlags,
}

impl Instruction {
    /// Serialized size of an instruction in the TAC store.
    pub const LEN: usize = 2 + 3 * OPERAND_WIRE_LEN;

    /// Create an instruction from its parts.
    pub const fn new(opcode: Opcode, result: Operand, a: Operand, b: Operand) -> Self {
        Self {
            opcode,
            result,
            a,
            b,
            flags: InsnFlags::empty(),
        }
    }

    /// Replace the flag bits.
    pub const fn with_flags(mut self, flags: InsnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Opcode.
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Result operand.
    pub const fn result(&self) -> Operand {
        self.result
    }

    /// First source operand.
    pub const fn a(&self) -> Operand {
        self.a
    }

    /// Second source operand.
    pub const fn b(&self) -> Operand {
        self.b
    }

    /// Flag bits.
    pub const fn flags(&self) -> InsnFlags {
        self.flags
    }

    /// Encode into the fixed wire layout.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0] = self.opcode as u8;
        out[1] = self.flags.bits();
        self.result.write_wire(&mut out[2..2 + OPERAND_WIRE_LEN]);
        self.a
            .write_wire(&mut out[2 + OPERAND_WIRE_LEN..2 + 2 * OPERAND_WIRE_LEN]);
        self.b.write_wire(&mut out[2 + 2 * OPERAND_WIRE_LEN..]);
        out
    }

    /// Decode from the fixed wire layout.
    ///
    /// Unknown opcode or operand tags are rejected; flag bits that are not
    /// defined are dropped.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrapReason> {
        if bytes.len() < Self::LEN {
            return Err(TrapReason::InvalidOpcode);
        }
        let opcode = Opcode::try_from(bytes[0])?;
        let flags = InsnFlags::from_bits_truncate(bytes[1]);
        let result = Operand::from_wire(&bytes[2..2 + OPERAND_WIRE_LEN])?;
        let a = Operand::from_wire(&bytes[2 + OPERAND_WIRE_LEN..2 + 2 * OPERAND_WIRE_LEN])?;
        let b = Operand::from_wire(&bytes[2 + 2 * OPERAND_WIRE_LEN..Self::LEN])?;
        Ok(Self {
            opcode,
            result,
            a,
            b,
            flags,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}, {}",
            self.opcode, self.result, self.a, self.b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, Value};
    use rstest::rstest;

    #[rstest]
    #[case(op::assign(Operand::temp(0), Operand::int(10)))]
    #[case(op::add(Operand::temp(2), Operand::temp(0), Operand::temp(1)))]
    #[case(op::div(Operand::temp(5), Operand::temp(0), Operand::int(-3)))]
    #[case(op::jump(4))]
    #[case(op::jump_if_zero(Operand::temp(0), 9))]
    #[case(op::call(0))]
    #[case(op::ret())]
    #[case(op::load(Operand::temp(1), Operand::temp(0)))]
    #[case(op::store(Operand::temp(0), Operand::Constant(Value::Float(2.5))))]
    #[case(op::halt())]
    fn wire_round_trip(#[case] insn: Instruction) {
        let bytes = insn.to_bytes();
        assert_eq!(Instruction::from_bytes(&bytes).unwrap(), insn);
    }

    #[test]
    fn flags_survive_encoding() {
        let insn = op::halt().with_flags(InsnFlags::STMT_START | InsnFlags::TRACE_POINT);
        let decoded = Instruction::from_bytes(&insn.to_bytes()).unwrap();
        assert_eq!(decoded.flags(), insn.flags());
    }

    #[test]
    fn zeroed_record_is_not_an_instruction() {
        assert_eq!(
            Instruction::from_bytes(&[0u8; Instruction::LEN]),
            Err(TrapReason::InvalidOpcode)
        );
    }
}
