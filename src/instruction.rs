use crate::Cell;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::ToPrimitive;
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The instruction set of the maya machine.
///
/// Declaration order fixes the on-disk opcode tags (`HALT` = 0).
/// Every opcode has a fixed stack arity and a fixed interpretation of
/// its operand cell; an operand that is unused in the listing below is
/// zero in well-formed programs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr)]
pub enum Opcode {
    /// Stops execution. Does not advance `rip`.
    HALT,
    /// Pushes the operand cell. The assembler also emits `PUSH` for
    /// deferred symbols and string literals, with the operand patched
    /// by the linker or the loader.
    PUSH,
    /// Discards the top of the stack.
    POP,
    /// Operand `n >= 1`: pushes a copy of the cell `n` below the top.
    DUP,
    /// Pops `b`, then `a`; pushes `a + b` (signed, wrapping).
    IADD,
    /// Pops `b`, then `a`; pushes `a + b` (IEEE 754 double).
    FADD,
    /// Pops `b`, then `a`; pushes `a - b` (signed, wrapping).
    ISUB,
    /// Pops `b`, then `a`; pushes `a - b` (IEEE 754 double).
    FSUB,
    /// Pops `b`, then `a`; pushes `a * b` (signed, wrapping).
    IMUL,
    /// Pops `b`, then `a`; pushes `a * b` (IEEE 754 double).
    FMUL,
    /// Pops `b`, then `a`; pushes `a / b` (signed, wrapping).
    /// Faults when `b` is zero.
    IDIV,
    /// Pops `b`, then `a`; pushes `a / b` (IEEE 754 double, no fault).
    FDIV,
    /// Sets `rip` to the operand.
    JMP,
    /// Pops `b`, then `a`; jumps to the operand when `a == b` (signed).
    IJEQ,
    /// Pops `b`, then `a`; jumps to the operand when `a == b` (double).
    FJEQ,
    /// Pops `b`, then `a`; jumps to the operand when `a != b` (signed).
    IJNEQ,
    /// Pops `b`, then `a`; jumps to the operand when `a != b` (double).
    FJNEQ,
    /// Pops `b`, then `a`; jumps to the operand when `a > b` (signed).
    IJGT,
    /// Pops `b`, then `a`; jumps to the operand when `a > b` (double).
    FJGT,
    /// Pops `b`, then `a`; jumps to the operand when `a < b` (signed).
    IJLT,
    /// Pops `b`, then `a`; jumps to the operand when `a < b` (double).
    FJLT,
    /// Saves `rip + 1` into register 6 and the caller's frame base
    /// into register 5, then jumps to the operand. The caller pushes a
    /// frame-size marker last; the frame base is `sp - marker`.
    CALL,
    /// Invokes the native function at the operand's index.
    NATIVE,
    /// Restores `sp` from register 5 and `rip` from register 6.
    RET,
    /// Operand `0..=6`: pushes the register's value.
    LOAD,
    /// Operand `0..=6`: pops into the register.
    STORE,
}

#[inline]
pub fn enum_to_u32<T: ToPrimitive + Copy>(val: T) -> u32 {
    val.to_u32().unwrap()
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", format!("{:?}", self).to_lowercase())
            }
        }
    };
}

impl_enum_display!(Opcode);

/// One program instruction: a raw opcode tag paired with one operand
/// cell. The tag is kept raw so that an image containing an unknown
/// tag still loads and faults at fetch time.
///
/// Serialized stride is 16 bytes: tag `u32`, 4 bytes padding, operand.
#[derive(Clone, Copy, PartialEq)]
pub struct Instruction {
    pub opcode: u32,
    pub operand: Cell,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Cell) -> Instruction {
        Instruction {
            opcode: enum_to_u32(opcode),
            operand,
        }
    }

    pub fn decode(self) -> Option<Opcode> {
        num_traits::FromPrimitive::from_u32(self.opcode)
    }
}

/// Constructs an instruction without an operand.
#[inline]
pub fn instr(opcode: Opcode) -> Instruction {
    Instruction::new(opcode, Cell::default())
}

/// Constructs an instruction with a signed integer operand.
#[inline]
pub fn instr_i64(opcode: Opcode, value: i64) -> Instruction {
    Instruction::new(opcode, Cell::from_i64(value))
}

/// Constructs an instruction with an unsigned integer operand.
#[inline]
pub fn instr_u64(opcode: Opcode, value: u64) -> Instruction {
    Instruction::new(opcode, Cell::from_u64(value))
}

/// Constructs an instruction with a float operand.
#[inline]
pub fn instr_f64(opcode: Opcode, value: f64) -> Instruction {
    Instruction::new(opcode, Cell::from_f64(value))
}

impl std::fmt::Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.decode() {
            Some(opcode) => write!(f, "Instruction({:?}, {:?})", opcode, self.operand),
            None => write!(f, "Instruction({}, {:?})", self.opcode, self.operand),
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let opcode = match self.decode() {
            Some(opcode) => opcode,
            None => return write!(f, "<invalid {}>", self.opcode),
        };

        match opcode {
            Opcode::PUSH => write!(f, "{} {}", opcode, self.operand.as_i64()),
            Opcode::DUP
            | Opcode::JMP
            | Opcode::IJEQ
            | Opcode::FJEQ
            | Opcode::IJNEQ
            | Opcode::FJNEQ
            | Opcode::IJGT
            | Opcode::FJGT
            | Opcode::IJLT
            | Opcode::FJLT
            | Opcode::CALL
            | Opcode::NATIVE
            | Opcode::LOAD
            | Opcode::STORE => write!(f, "{} {}", opcode, self.operand.as_u64()),
            _ => write!(f, "{}", opcode),
        }
    }
}
