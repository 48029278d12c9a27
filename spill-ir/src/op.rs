//! Free-function constructors for each [`Opcode`], the intended way for
//! hosts and tests to assemble instruction sequences.

use crate::{Instruction, Opcode, Operand, ProgramCounter};

macro_rules! binary_op {
    ($doc:literal, $name:ident, $opcode:ident) => {
        #[doc = $doc]
        pub fn $name(result: Operand, a: Operand, b: Operand) -> Instruction {
            Instruction::new(Opcode::$opcode, result, a, b)
        }
    };
}

macro_rules! unary_op {
    ($doc:literal, $name:ident, $opcode:ident) => {
        #[doc = $doc]
        pub fn $name(result: Operand, a: Operand) -> Instruction {
            Instruction::new(Opcode::$opcode, result, a, Operand::None)
        }
    };
}

unary_op!("Construct an `Assign` instruction.", assign, Assign);
binary_op!("Construct an `Add` instruction.", add, Add);
binary_op!("Construct a `Sub` instruction.", sub, Sub);
binary_op!("Construct a `Mul` instruction.", mul, Mul);
binary_op!("Construct a `Div` instruction.", div, Div);
binary_op!("Construct a `Mod` instruction.", modulo, Mod);
unary_op!("Construct a `Neg` instruction.", neg, Neg);
binary_op!("Construct an `Eq` comparison.", eq, Eq);
binary_op!("Construct an `Ne` comparison.", ne, Ne);
binary_op!("Construct an `Lt` comparison.", lt, Lt);
binary_op!("Construct an `Le` comparison.", le, Le);
binary_op!("Construct a `Gt` comparison.", gt, Gt);
binary_op!("Construct a `Ge` comparison.", ge, Ge);
binary_op!("Construct an `And` instruction.", and, And);
binary_op!("Construct an `Or` instruction.", or, Or);
binary_op!("Construct an `Xor` instruction.", xor, Xor);
unary_op!("Construct a `Not` instruction.", not, Not);
binary_op!("Construct a `Shl` instruction.", shl, Shl);
binary_op!("Construct a `Shr` instruction.", shr, Shr);
unary_op!("Construct a `Load` from a heap address.", load, Load);

/// Construct an unconditional `Jump` to `target`.
pub fn jump(target: ProgramCounter) -> Instruction {
    Instruction::new(
        Opcode::Jump,
        Operand::None,
        Operand::label(target),
        Operand::None,
    )
}

/// Construct a `JumpIfZero` on `condition` to `target`.
pub fn jump_if_zero(condition: Operand, target: ProgramCounter) -> Instruction {
    Instruction::new(
        Opcode::JumpIfZero,
        Operand::None,
        condition,
        Operand::label(target),
    )
}

/// Construct a `JumpIfNonzero` on `condition` to `target`.
pub fn jump_if_nonzero(condition: Operand, target: ProgramCounter) -> Instruction {
    Instruction::new(
        Opcode::JumpIfNonzero,
        Operand::None,
        condition,
        Operand::label(target),
    )
}

/// Construct a `Call` to `target`.
pub fn call(target: ProgramCounter) -> Instruction {
    Instruction::new(
        Opcode::Call,
        Operand::None,
        Operand::label(target),
        Operand::None,
    )
}

/// Construct a `Return`.
pub fn ret() -> Instruction {
    Instruction::new(Opcode::Return, Operand::None, Operand::None, Operand::None)
}

/// Construct a `Store` of `value` at heap address `addr`.
pub fn store(addr: Operand, value: Operand) -> Instruction {
    Instruction::new(Opcode::Store, Operand::None, addr, value)
}

/// Construct a `Halt`.
pub fn halt() -> Instruction {
    Instruction::new(Opcode::Halt, Operand::None, Operand::None, Operand::None)
}
