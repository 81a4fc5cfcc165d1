/// Capacity of the value stack, in cells.
pub const STACK_CAP: usize = 1024;

/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 7;

/// Register that `call` saves the caller's frame base into.
pub const STACK_POINTER_REG: usize = 5;

/// Register that `call` saves the return address into.
pub const RETURN_ADDRESS_REG: usize = 6;
