//! The built-in native standard library and the import mechanism.
//!
//! A native takes the whole machine and returns a fault kind; `Ok` is
//! fault kind zero. The loader resolves an import list (by default the
//! reference set below) into the indexable vector that the `native`
//! opcode dispatches through.

use std::error::Error;
use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_char;

use crate::vm::{Fault, MayaVm};
use crate::Cell;

pub type NativeFn = fn(&mut MayaVm) -> Result<(), Fault>;

/// The reference native set, in import-index order.
pub const REFERENCE_IMPORTS: [(&str, NativeFn); 5] = [
    ("maya_alloc", maya_alloc),
    ("maya_free", maya_free),
    ("maya_print_i64", maya_print_i64),
    ("maya_print_f64", maya_print_f64),
    ("maya_print_str", maya_print_str),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeError {
    NotFound(String),
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NativeError::NotFound(symbol) => {
                write!(f, "no such native symbol '{}'", symbol)
            }
        }
    }
}

impl Error for NativeError {}

/// Looks a native up by its symbol name.
pub fn lookup(symbol: &str) -> Option<NativeFn> {
    REFERENCE_IMPORTS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, native)| *native)
}

/// The import index of a symbol in the reference set, if any.
pub fn import_index(symbol: &str) -> Option<u64> {
    REFERENCE_IMPORTS
        .iter()
        .position(|(name, _)| *name == symbol)
        .map(|index| index as u64)
}

/// Resolves an import list into the native vector, in list order.
pub fn resolve(imports: &[&str]) -> Result<Vec<NativeFn>, NativeError> {
    imports
        .iter()
        .map(|symbol| lookup(symbol).ok_or_else(|| NativeError::NotFound((*symbol).to_string())))
        .collect()
}

/// The full reference set, resolved in declaration order.
pub fn builtin_table() -> Vec<NativeFn> {
    REFERENCE_IMPORTS.iter().map(|(_, native)| *native).collect()
}

/// Replaces the size on top of the stack with a fresh allocation.
fn maya_alloc(vm: &mut MayaVm) -> Result<(), Fault> {
    let size = vm.top()?.as_u64();
    let ptr = vm.allocate(size as usize);
    *vm.top_mut()? = Cell::from_ptr(ptr);
    Ok(())
}

/// Pops a pointer and releases its allocation.
fn maya_free(vm: &mut MayaVm) -> Result<(), Fault> {
    let address = vm.pop()?.as_u64();
    if !vm.release(address) {
        return Err(Fault::InvalidOperand);
    }
    Ok(())
}

fn maya_print_i64(vm: &mut MayaVm) -> Result<(), Fault> {
    let value = vm.pop()?.as_i64();
    println!("{}", value);
    Ok(())
}

fn maya_print_f64(vm: &mut MayaVm) -> Result<(), Fault> {
    let value = vm.pop()?.as_f64();
    println!("{}", value);
    Ok(())
}

/// Pops a pointer to a NUL-terminated string and prints it.
fn maya_print_str(vm: &mut MayaVm) -> Result<(), Fault> {
    let cell = vm.pop()?;
    let text = unsafe { CStr::from_ptr(cell.as_ptr() as *const c_char) };
    println!("{}", text.to_string_lossy());
    Ok(())
}
