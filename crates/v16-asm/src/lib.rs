//! Two-pass VCPU-16 assembler.
//!
//! Line grammar: `[label:] [mnemonic [operand[, operand]]] [# comment]`.
//! Operands carry a prefix: `%` for a register name, `$` for an immediate.
//! Immediates are `0x…` hex, `0b…` binary, decimal, `'c'` character
//! literals, or label references (any token starting with a letter).
//! Mnemonics and register names are case-insensitive.
//!
//! Pass 1 walks the lines with a virtual PC (one word per instruction plus
//! one per `$` operand) and records label addresses. Pass 2 packs the
//! instruction words and emits them with their trailing immediates, A
//! first.

use std::collections::HashMap;
use std::fmt;

use v16_core::{Instruction, Opcode, Operand, Register};

/// A fatal assembly error with its 1-based source line.
#[derive(Debug)]
pub struct AsmError {
    pub line: usize,
    pub kind: ErrorKind,
}

#[derive(Debug)]
pub enum ErrorKind {
    UnknownMnemonic(String),
    UnknownRegister(String),
    UnknownLabel(String),
    UnknownPrefix(char),
    MalformedOperand(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMnemonic(name) => write!(f, "unknown mnemonic: {name}"),
            Self::UnknownRegister(name) => write!(f, "unknown register: {name}"),
            Self::UnknownLabel(name) => write!(f, "unknown label: {name}"),
            Self::UnknownPrefix(prefix) => write!(f, "unknown operand prefix: {prefix}"),
            Self::MalformedOperand(text) => write!(f, "malformed operand: {text}"),
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for AsmError {}

/// One source line, stripped down to its label and statement parts.
struct Line<'a> {
    number: usize,
    label: Option<&'a str>,
    statement: Option<Statement<'a>>,
}

struct Statement<'a> {
    mnemonic: &'a str,
    operands: Vec<&'a str>,
}

/// Split a source line into label, mnemonic and raw operand tokens.
/// Comments run from `#` to end of line.
fn scan_line(number: usize, text: &str) -> Line<'_> {
    let text = text.split('#').next().unwrap_or("");

    let (label, rest) = match text.find(':') {
        Some(colon) => (Some(text[..colon].trim()), &text[colon + 1..]),
        None => (None, text),
    };
    let label = label.filter(|name| !name.is_empty());

    let rest = rest.trim();
    let statement = rest.split_whitespace().next().map(|mnemonic| {
        let operand_text = rest[mnemonic.len()..].trim();
        let operands = if operand_text.is_empty() {
            Vec::new()
        } else {
            operand_text.split(',').map(str::trim).take(2).collect()
        };
        Statement { mnemonic, operands }
    });

    Line {
        number,
        label,
        statement,
    }
}

/// True when a label name would shadow a mnemonic or register; such labels
/// are skipped rather than recorded.
fn collides_with_keyword(name: &str) -> bool {
    Opcode::from_mnemonic(name).is_some() || Register::from_name(name).is_some()
}

/// Parse a numeric immediate: `0x…`, `0b…`, or decimal (possibly
/// negative, wrapping into a word).
fn parse_number(token: &str) -> Option<u16> {
    let (digits, radix) = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = token.strip_prefix("0b").or_else(|| token.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (token, 10)
    };
    i64::from_str_radix(digits, radix).ok().map(|value| value as u16)
}

/// Resolve a `$` immediate token against the label table.
fn resolve_immediate(
    token: &str,
    labels: &HashMap<String, u16>,
    line: usize,
) -> Result<u16, AsmError> {
    if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return labels.get(token).copied().ok_or_else(|| AsmError {
            line,
            kind: ErrorKind::UnknownLabel(token.to_string()),
        });
    }

    let mut chars = token.chars();
    if chars.next() == Some('\'') {
        if let (Some(ch), Some('\'')) = (chars.next(), chars.next()) {
            return Ok(ch as u16);
        }
        return Err(AsmError {
            line,
            kind: ErrorKind::MalformedOperand(token.to_string()),
        });
    }

    parse_number(token).ok_or_else(|| AsmError {
        line,
        kind: ErrorKind::MalformedOperand(token.to_string()),
    })
}

/// Assemble a whole source text into instruction words.
pub fn assemble(source: &str) -> Result<Vec<u16>, AsmError> {
    let lines: Vec<Line<'_>> = source
        .lines()
        .enumerate()
        .map(|(index, text)| scan_line(index + 1, text))
        .collect();

    // Pass 1: label addresses.
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut virt_pc: u16 = 0;
    for line in &lines {
        if let Some(name) = line.label {
            if !collides_with_keyword(name) {
                labels.insert(name.to_string(), virt_pc);
            }
        }
        if let Some(statement) = &line.statement {
            virt_pc = virt_pc.wrapping_add(1);
            for operand in &statement.operands {
                if operand.starts_with('$') {
                    virt_pc = virt_pc.wrapping_add(1);
                }
            }
        }
    }

    // Pass 2: emit.
    let mut words = Vec::new();
    for line in &lines {
        let Some(statement) = &line.statement else {
            continue;
        };

        let opcode =
            Opcode::from_mnemonic(statement.mnemonic).ok_or_else(|| AsmError {
                line: line.number,
                kind: ErrorKind::UnknownMnemonic(statement.mnemonic.to_string()),
            })?;

        let mut instr = Instruction {
            opcode: opcode.bits(),
            a: Operand::reg(0),
            b: Operand::reg(0),
        };
        let mut imms: Vec<u16> = Vec::new();

        for (slot, token) in statement.operands.iter().enumerate() {
            let mut chars = token.chars();
            let prefix = chars.next().ok_or_else(|| AsmError {
                line: line.number,
                kind: ErrorKind::MalformedOperand((*token).to_string()),
            })?;
            let body = chars.as_str().trim();
            if body.is_empty() {
                return Err(AsmError {
                    line: line.number,
                    kind: ErrorKind::MalformedOperand((*token).to_string()),
                });
            }

            let operand = match prefix {
                '$' => {
                    imms.push(resolve_immediate(body, &labels, line.number)?);
                    Operand::imm()
                }
                '%' => {
                    let reg = Register::from_name(body).ok_or_else(|| AsmError {
                        line: line.number,
                        kind: ErrorKind::UnknownRegister(body.to_string()),
                    })?;
                    Operand::reg(reg.index())
                }
                other => {
                    return Err(AsmError {
                        line: line.number,
                        kind: ErrorKind::UnknownPrefix(other),
                    });
                }
            };

            if slot == 0 {
                instr.a = operand;
            } else {
                instr.b = operand;
            }
        }

        words.push(instr.encode());
        words.extend_from_slice(&imms);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_instruction() {
        let words = assemble("HLT").expect("assembles");
        assert_eq!(words, vec![0x0400]);
    }

    #[test]
    fn immediate_and_register_operands() {
        // MOV $0xABCD, %R0
        let words = assemble("mov $0xABCD, %r0").expect("assembles");
        assert_eq!(words, vec![0x4200, 0xABCD]);
    }

    #[test]
    fn register_register_operands() {
        // ADD %R1, %R0
        let words = assemble("ADD %R1, %R0").expect("assembles");
        assert_eq!(words, vec![0x4420]);
    }

    #[test]
    fn numeric_literal_radixes() {
        let words = assemble("PTS $0x10\nPTS $0b101\nPTS $42\nPTS $-1").expect("assembles");
        assert_eq!(words[1], 0x0010);
        assert_eq!(words[3], 0x0005);
        assert_eq!(words[5], 42);
        assert_eq!(words[7], 0xFFFF);
    }

    #[test]
    fn character_literal() {
        let words = assemble("IOW $0x00FF, $'A'").expect("assembles");
        assert_eq!(words, vec![0x1E10, 0x00FF, 0x0041]);
    }

    #[test]
    fn forward_label_reference() {
        let source = "CAL $fn\nHLT\nfn: RET\n";
        let words = assemble(source).expect("assembles");
        // CAL (2 words) + HLT puts fn at PC 3.
        assert_eq!(words, vec![0x1200, 0x0003, 0x0400, 0x1400]);
    }

    #[test]
    fn backward_label_reference() {
        let source = "top: NOP\nCAL $top\n";
        let words = assemble(source).expect("assembles");
        assert_eq!(words[2], 0x0000);
    }

    #[test]
    fn label_sharing_a_line_with_its_instruction() {
        let source = "loop: DEC %R0\nIGT $0, %R0\nCAL $loop\n";
        let words = assemble(source).expect("assembles");
        assert_eq!(words.len(), 5);
        assert_eq!(words[4], 0x0000, "loop resolves to address 0");
    }

    #[test]
    fn comments_and_blank_lines_are_free() {
        let source = "# leading comment\n\nNOP # trailing comment\n\n";
        let words = assemble(source).expect("assembles");
        assert_eq!(words, vec![0x0000]);
    }

    #[test]
    fn label_colliding_with_keyword_is_not_recorded() {
        let err = assemble("PC: NOP\nCAL $PC\n").expect_err("unknown label");
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ErrorKind::UnknownLabel(_)));
    }

    #[test]
    fn unknown_mnemonic_is_fatal_with_line() {
        let err = assemble("NOP\nJMP $0\n").expect_err("bad mnemonic");
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ErrorKind::UnknownMnemonic(_)));
    }

    #[test]
    fn unknown_register_is_fatal() {
        let err = assemble("MOV $1, %RX").expect_err("bad register");
        assert!(matches!(err.kind, ErrorKind::UnknownRegister(_)));
    }

    #[test]
    fn unknown_prefix_is_fatal() {
        let err = assemble("MOV @1, %R0").expect_err("bad prefix");
        assert!(matches!(err.kind, ErrorKind::UnknownPrefix('@')));
    }

    #[test]
    fn ex_is_an_alias_for_of() {
        let a = assemble("MOV $0, %EX").expect("assembles");
        let b = assemble("MOV $0, %OF").expect("assembles");
        assert_eq!(a, b);
    }
}
