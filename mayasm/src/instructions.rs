use crate::env::{AsmEnv, DeferredSymbol};
use crate::{new_parser_error, ErrorKind, Result, Rule};
use matches::debug_assert_matches;
use maya::{instr, Cell, Instruction, Opcode};
use pest::iterators::Pair;
use pest::Span;

pub(crate) struct AsmState<'i> {
    pub env: AsmEnv,
    pub instructions: Vec<Instruction>,
    pub entry: Option<(String, Span<'i>)>,
}

impl<'i> AsmState<'i> {
    pub fn new() -> AsmState<'i> {
        AsmState {
            env: AsmEnv::new(),
            instructions: Vec::new(),
            entry: None,
        }
    }
}

/// How a mnemonic's operand is classified, per the instruction table.
enum OperandSort {
    None,
    Value,     // literal, symbol or string
    Count,     // unsigned, at least 1
    Target,    // label or absolute rip
    Symbol,    // label only
    NativeRef, // import index or symbol
    Register,  // 0..=6
}

fn operand_sort(opcode: Opcode) -> OperandSort {
    match opcode {
        Opcode::PUSH => OperandSort::Value,
        Opcode::DUP => OperandSort::Count,
        Opcode::JMP
        | Opcode::IJEQ
        | Opcode::FJEQ
        | Opcode::IJNEQ
        | Opcode::FJNEQ
        | Opcode::IJGT
        | Opcode::FJGT
        | Opcode::IJLT
        | Opcode::FJLT => OperandSort::Target,
        Opcode::CALL => OperandSort::Symbol,
        Opcode::NATIVE => OperandSort::NativeRef,
        Opcode::LOAD | Opcode::STORE => OperandSort::Register,
        _ => OperandSort::None,
    }
}

pub(crate) fn process_line<'i>(pair: Pair<'i, Rule>, state: &mut AsmState<'i>) -> Result<()> {
    debug_assert_matches!(pair.as_rule(), Rule::line);

    let mut saw_statement = false;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::label => {
                saw_statement = true;
                define_label(item, state)?;
            }
            Rule::entry_directive => {
                saw_statement = true;
                process_entry(item, state);
            }
            Rule::define_directive => {
                saw_statement = true;
                process_define(item, state)?;
            }
            Rule::extern_directive => {
                saw_statement = true;
                process_extern(item, state)?;
            }
            Rule::instruction => {
                saw_statement = true;
                process_instruction(item, state)?;
            }
            Rule::garbage => {
                let span = item.as_span();
                let text = item.as_str().trim_end();
                return Err(if saw_statement {
                    new_parser_error(
                        ErrorKind::TrailingGarbage,
                        span,
                        format!("invalid operand: '{}'", text),
                    )
                } else {
                    new_parser_error(
                        ErrorKind::UnknownOpcode,
                        span,
                        format!("invalid opcode: '{}'", text),
                    )
                });
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn check_duplicate(env: &AsmEnv, name: &str, span: &Span) -> Result<()> {
    if env.labels.contains_key(name) || env.macros.contains_key(name) {
        return Err(new_parser_error(
            ErrorKind::DuplicateSymbol,
            span.clone(),
            format!("duplicate symbol: '{}'", name),
        ));
    }
    Ok(())
}

fn define_label(pair: Pair<Rule>, state: &mut AsmState) -> Result<()> {
    let span = pair.as_span();
    let name = pair.into_inner().next().unwrap().as_str().to_string();

    check_duplicate(&state.env, &name, &span)?;
    let rip = state.instructions.len() as u64;
    state.env.labels.insert(name, rip);
    Ok(())
}

fn process_entry<'i>(pair: Pair<'i, Rule>, state: &mut AsmState<'i>) {
    let mut pairs = pair.into_inner();
    let _keyword = pairs.next().unwrap();
    let name = pairs.next().unwrap();

    // The last entry directive wins.
    state.entry = Some((name.as_str().to_string(), name.as_span()));
}

fn process_define(pair: Pair<Rule>, state: &mut AsmState) -> Result<()> {
    let mut pairs = pair.into_inner();
    let _keyword = pairs.next().unwrap();
    let name_pair = pairs.next().unwrap();
    let literal = pairs.next().unwrap();

    let cell = literal_cell(literal)?;
    let name = name_pair.as_str().to_string();
    check_duplicate(&state.env, &name, &name_pair.as_span())?;
    state.env.macros.insert(name, cell);
    Ok(())
}

fn process_extern(pair: Pair<Rule>, state: &mut AsmState) -> Result<()> {
    let mut pairs = pair.into_inner();
    let _keyword = pairs.next().unwrap();
    let name_pair = pairs.next().unwrap();
    let string = pairs.next().unwrap();

    let symbol_pair = string.into_inner().next().unwrap();
    let symbol = symbol_pair.as_str();
    let index = maya::natives::import_index(symbol).ok_or_else(|| {
        new_parser_error(
            ErrorKind::InvalidOperand,
            symbol_pair.as_span(),
            format!("no such native symbol: '{}'", symbol),
        )
    })?;

    let name = name_pair.as_str().to_string();
    check_duplicate(&state.env, &name, &name_pair.as_span())?;
    state.env.macros.insert(name, Cell::from_u64(index));
    Ok(())
}

fn process_instruction<'i>(pair: Pair<'i, Rule>, state: &mut AsmState<'i>) -> Result<()> {
    let mut pairs = pair.into_inner();
    let mnemonic = pairs.next().unwrap();
    let operand = pairs.next();

    // A directive keyword that reached this point had a malformed or
    // missing operand.
    if mnemonic.as_str() == "entry" || mnemonic.as_str() == "extern" {
        return Err(match operand {
            Some(operand) => new_parser_error(
                ErrorKind::InvalidOperand,
                operand.as_span(),
                format!("invalid operand: '{}'", operand.as_str()),
            ),
            None => new_parser_error(
                ErrorKind::ExpectedOperand,
                mnemonic.as_span(),
                format!("{} is expecting an operand", mnemonic.as_str()),
            ),
        });
    }

    let opcode: Opcode = match mnemonic.as_str().to_uppercase().parse() {
        Ok(opcode) => opcode,
        Err(_) => {
            return Err(new_parser_error(
                ErrorKind::UnknownOpcode,
                mnemonic.as_span(),
                format!("invalid opcode: '{}'", mnemonic.as_str()),
            ));
        }
    };

    match operand_sort(opcode) {
        OperandSort::None => {
            if let Some(operand) = operand {
                return Err(new_parser_error(
                    ErrorKind::TrailingGarbage,
                    operand.as_span(),
                    format!("invalid operand: '{}'", operand.as_str()),
                ));
            }
            state.instructions.push(instr(opcode));
        }
        sort => {
            let operand = operand.ok_or_else(|| {
                new_parser_error(
                    ErrorKind::ExpectedOperand,
                    mnemonic.as_span(),
                    format!("{} is expecting an operand", mnemonic.as_str()),
                )
            })?;
            process_operand(opcode, sort, operand, state)?;
        }
    }

    Ok(())
}

fn process_operand<'i>(
    opcode: Opcode,
    sort: OperandSort,
    operand: Pair<'i, Rule>,
    state: &mut AsmState<'i>,
) -> Result<()> {
    let span = operand.as_span();
    let text = operand.as_str().to_string();
    let inner = operand.into_inner().next().unwrap();

    match sort {
        OperandSort::None => unreachable!(),

        OperandSort::Value => match inner.as_rule() {
            Rule::literal => {
                let cell = literal_cell(inner)?;
                state.instructions.push(Instruction::new(opcode, cell));
            }
            Rule::string => {
                let bytes = inner.into_inner().next().unwrap().as_str().as_bytes().to_vec();
                let rip = state.instructions.len() as u64;
                state.env.string_literals.push((rip, bytes));
                state.instructions.push(instr(opcode));
            }
            Rule::identifier => defer(inner, opcode, state),
            _ => unreachable!(),
        },

        OperandSort::Count => match inner.as_rule() {
            Rule::literal => {
                let depth = uint_value(inner, "dup")?;
                if depth < 1 {
                    return Err(new_parser_error(
                        ErrorKind::InvalidOperand,
                        span,
                        "dup needs a depth of at least 1".to_string(),
                    ));
                }
                state
                    .instructions
                    .push(Instruction::new(opcode, Cell::from_u64(depth)));
            }
            _ => return Err(invalid_operand(span, &text)),
        },

        OperandSort::Target | OperandSort::NativeRef => match inner.as_rule() {
            Rule::identifier => defer(inner, opcode, state),
            Rule::literal => {
                let target = uint_value(inner, mnemonic_of(opcode))?;
                state
                    .instructions
                    .push(Instruction::new(opcode, Cell::from_u64(target)));
            }
            _ => return Err(invalid_operand(span, &text)),
        },

        OperandSort::Symbol => match inner.as_rule() {
            Rule::identifier => defer(inner, opcode, state),
            _ => return Err(invalid_operand(span, &text)),
        },

        OperandSort::Register => match inner.as_rule() {
            Rule::literal => {
                let register = uint_value(inner, mnemonic_of(opcode))?;
                if register >= maya::constants::REGISTER_COUNT as u64 {
                    return Err(new_parser_error(
                        ErrorKind::InvalidOperand,
                        span,
                        format!("no such register: {}", register),
                    ));
                }
                state
                    .instructions
                    .push(Instruction::new(opcode, Cell::from_u64(register)));
            }
            _ => return Err(invalid_operand(span, &text)),
        },
    }

    Ok(())
}

fn invalid_operand(span: Span, text: &str) -> crate::AsmError {
    new_parser_error(
        ErrorKind::InvalidOperand,
        span,
        format!("invalid operand: '{}'", text),
    )
}

fn mnemonic_of(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::JMP => "jmp",
        Opcode::IJEQ => "ijeq",
        Opcode::FJEQ => "fjeq",
        Opcode::IJNEQ => "ijneq",
        Opcode::FJNEQ => "fjneq",
        Opcode::IJGT => "ijgt",
        Opcode::FJGT => "fjgt",
        Opcode::IJLT => "ijlt",
        Opcode::FJLT => "fjlt",
        Opcode::NATIVE => "native",
        Opcode::LOAD => "load",
        Opcode::STORE => "store",
        _ => "instruction",
    }
}

fn defer<'i>(identifier: Pair<'i, Rule>, opcode: Opcode, state: &mut AsmState<'i>) {
    let line = identifier.as_span().start_pos().line_col().0;
    state.env.deferred.push(DeferredSymbol {
        rip: state.instructions.len() as u64,
        symbol: identifier.as_str().to_string(),
        line,
    });
    state.instructions.push(instr(opcode));
}

fn literal_cell(literal: Pair<Rule>) -> Result<Cell> {
    debug_assert_matches!(literal.as_rule(), Rule::literal);

    let span = literal.as_span();
    let inner = literal.into_inner().next().unwrap();
    let text = inner.as_str();

    let cell = match inner.as_rule() {
        Rule::float | Rule::float_int => {
            text.trim_end_matches('F').parse::<f64>().ok().map(Cell::from_f64)
        }
        Rule::uint => text.trim_end_matches('U').parse::<u64>().ok().map(Cell::from_u64),
        Rule::int => text.parse::<i64>().ok().map(Cell::from_i64),
        _ => unreachable!(),
    };

    cell.ok_or_else(|| {
        new_parser_error(
            ErrorKind::InvalidOperand,
            span,
            format!("invalid number literal: '{}'", text),
        )
    })
}

fn uint_value(literal: Pair<Rule>, mnemonic: &str) -> Result<u64> {
    let span = literal.as_span();
    let inner = literal.into_inner().next().unwrap();
    let text = inner.as_str();

    match inner.as_rule() {
        Rule::uint => text.trim_end_matches('U').parse::<u64>().map_err(|_| {
            new_parser_error(
                ErrorKind::InvalidOperand,
                span,
                format!("invalid number literal: '{}'", text),
            )
        }),
        Rule::int => {
            if text.starts_with('-') {
                return Err(new_parser_error(
                    ErrorKind::InvalidOperand,
                    span,
                    format!("{} only accepts unsigned values", mnemonic),
                ));
            }
            text.trim_start_matches('+').parse::<u64>().map_err(|_| {
                new_parser_error(
                    ErrorKind::InvalidOperand,
                    span,
                    format!("invalid number literal: '{}'", text),
                )
            })
        }
        Rule::float | Rule::float_int => Err(new_parser_error(
            ErrorKind::InvalidOperand,
            span,
            format!("{} only accepts integer values", mnemonic),
        )),
        _ => unreachable!(),
    }
}
