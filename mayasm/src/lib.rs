//! Assembler and linker for the [maya](../maya/index.html) virtual machine.
//!
//! The main function provided by this crate is [`assemble`](fn.assemble.html),
//! which accepts a program written in the maya assembly dialect and outputs an
//! unlinked [`Image`](../mayafile/struct.Image.html) together with the
//! [`AsmEnv`](struct.AsmEnv.html) side tables. The [`linker`](linker/index.html)
//! module consumes both and patches every deferred symbolic operand.
//!
//! Parsing is implemented using [pest]; the main [`AsmError`](struct.AsmError.html)
//! type wraps `pest::error::Error`, so every diagnostic renders with file,
//! line and the offending token.
//!
//! # The maya assembly dialect
//!
//! A program is a sequence of lines. `#` starts a comment that runs to the
//! end of the line. A label is an identifier immediately followed by `:` and
//! names the next instruction. `entry IDENT` selects the instruction the
//! machine starts at. `%define NAME VALUE` binds a compile-time constant, and
//! `extern NAME "symbol"` binds `NAME` to the import index of a native
//! symbol.
//!
//! Integer literals are decimal with an optional sign; a `U` suffix makes the
//! cell unsigned and an `F` suffix (on `12F` or `1.5F` alike) makes it a
//! float. String literals are double-quoted and carry no escape sequences.
//!
//! Mnemonic reference (`L` is a label or an unsigned absolute rip):
//!
//! Mnemonic | Description                                  | Syntax
//! ---------|----------------------------------------------|----------------------
//! `halt`   | Stop execution                               | `halt`
//! `push`   | Push a value, symbol or string               | `push 1` / `push 2.5F` / `push name` / `push "text"`
//! `pop`    | Discard the top of the stack                 | `pop`
//! `dup`    | Duplicate the cell N below the top           | `dup N`
//! `iadd`   | Integer addition                             | `iadd`
//! `isub`   | Integer subtraction                          | `isub`
//! `imul`   | Integer multiplication                       | `imul`
//! `idiv`   | Integer division                             | `idiv`
//! `fadd`   | Float addition                               | `fadd`
//! `fsub`   | Float subtraction                            | `fsub`
//! `fmul`   | Float multiplication                         | `fmul`
//! `fdiv`   | Float division                               | `fdiv`
//! `jmp`    | Unconditional jump                           | `jmp L`
//! `ijeq`   | Jump if equal (signed)                       | `ijeq L`
//! `ijneq`  | Jump if not equal (signed)                   | `ijneq L`
//! `ijgt`   | Jump if greater (signed)                     | `ijgt L`
//! `ijlt`   | Jump if less (signed)                        | `ijlt L`
//! `fjeq`   | Jump if equal (float)                        | `fjeq L`
//! `fjneq`  | Jump if not equal (float)                    | `fjneq L`
//! `fjgt`   | Jump if greater (float)                      | `fjgt L`
//! `fjlt`   | Jump if less (float)                         | `fjlt L`
//! `call`   | Call a labeled routine                       | `call L`
//! `native` | Invoke a native by index or symbol           | `native 2` / `native maya_print_i64`
//! `ret`    | Return to the caller                         | `ret`
//! `load`   | Push register R                              | `load R`
//! `store`  | Pop into register R                          | `store R`
//!
//! Mnemonics are matched case-insensitively.
//!
//! [pest]: https://docs.rs/pest/

mod env;
mod instructions;
mod parser;

pub mod linker;


use pest::iterators::Pair;
use pest::{Parser, Span};

pub use env::{AsmEnv, DeferredSymbol};
pub use linker::LinkError;
pub use parser::{MayasmParser, Rule};

use mayafile::{Image, StringLiteral};

/// What went wrong, independent of where.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    Syntax,
    UnknownOpcode,
    InvalidOperand,
    ExpectedOperand,
    TrailingGarbage,
    UndefinedEntry,
    DuplicateSymbol,
}

/// An assembly diagnostic: an [`ErrorKind`](enum.ErrorKind.html) plus a pest
/// error carrying the span it points at.
#[derive(Debug)]
pub struct AsmError {
    kind: ErrorKind,
    error: Box<pest::error::Error<Rule>>,
}

impl AsmError {
    fn new(kind: ErrorKind, span: Span, message: String) -> AsmError {
        AsmError {
            kind,
            error: Box::new(pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError { message },
                span,
            )),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn with_path(self, path: &str) -> AsmError {
        AsmError {
            kind: self.kind,
            error: Box::new(self.error.with_path(path)),
        }
    }
}

impl std::fmt::Display for AsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for AsmError {}

impl From<pest::error::Error<Rule>> for AsmError {
    fn from(error: pest::error::Error<Rule>) -> AsmError {
        AsmError {
            kind: ErrorKind::Syntax,
            error: Box::new(error),
        }
    }
}

pub type Result<T> = std::result::Result<T, AsmError>;

fn new_parser_error(kind: ErrorKind, span: Span, message: String) -> AsmError {
    AsmError::new(kind, span, message)
}

fn parse(input: &str) -> Result<Pair<Rule>> {
    Ok(MayasmParser::parse(Rule::program, input)?.next().unwrap())
}

/// Assembles `input` into an unlinked image plus the environment
/// tables the linker needs. Deferred operands are emitted zeroed.
pub fn assemble(input: &str) -> Result<(Image, AsmEnv)> {
    let program = parse(input)?;
    let mut state = instructions::AsmState::new();

    for line in program.into_inner() {
        if line.as_rule() == Rule::line {
            instructions::process_line(line, &mut state)?;
        }
    }

    let starting_rip = match &state.entry {
        Some((name, span)) => match state.env.labels.get(name) {
            Some(rip) => *rip,
            None => {
                return Err(new_parser_error(
                    ErrorKind::UndefinedEntry,
                    span.clone(),
                    format!("no such label for the entry point: '{}'", name),
                ));
            }
        },
        None => 0,
    };

    let literals = state
        .env
        .string_literals
        .iter()
        .map(|(rip, bytes)| StringLiteral {
            rip: *rip,
            bytes: bytes.clone(),
        })
        .collect();

    Ok((
        Image::from(starting_rip, state.instructions, literals),
        state.env,
    ))
}
