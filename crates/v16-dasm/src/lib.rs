//! Linear VCPU-16 disassembler.
//!
//! Walks a word image from a begin address to an exclusive end address,
//! decoding one instruction per position and consuming its trailing
//! immediates. Each instruction renders as one line:
//!
//! ```text
//! [ADDR  ]WORD IMM0 IMM1  MNEMONIC OPA, OPB
//! ```
//!
//! The address column appears only with `offsets` enabled; the raw word
//! columns only with `words` enabled (unused immediate slots print
//! `****`). Immediates render as `$0x….`, registers as `%NAME`. Unknown
//! opcodes render as `???`. Both operands are always printed, exactly as
//! encoded, even for opcodes that ignore them.

use std::fmt::Write;

use v16_core::{Instruction, Opcode, Register};

/// Disassembly window and layout switches.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// First address to decode.
    pub begin: usize,
    /// One past the last address to decode (clamped to the image).
    pub end: usize,
    /// Prepend each line with its address.
    pub offsets: bool,
    /// Prepend each line with the raw instruction and immediate words.
    pub words: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            begin: 0x0000,
            end: 0x10000,
            offsets: false,
            words: false,
        }
    }
}

fn reg_name(index: u8) -> &'static str {
    Register::from_index(index).map_or("??", Register::name)
}

fn mnemonic(bits: u8) -> &'static str {
    Opcode::from_bits(bits).map_or("???", Opcode::mnemonic)
}

/// Render one decoded instruction.
fn render(
    addr: usize,
    word: u16,
    instr: &Instruction,
    imms: [u16; 2],
    opts: &Options,
) -> String {
    let mut line = String::new();

    if opts.offsets {
        let _ = write!(line, "{addr:04X}  ");
    }
    if opts.words {
        let _ = write!(line, "{word:04X} ");
        if instr.a.imm {
            let _ = write!(line, "{:04X} ", imms[0]);
        } else {
            line.push_str("**** ");
        }
        if instr.b.imm {
            let _ = write!(line, "{:04X} ", imms[1]);
        } else {
            line.push_str("**** ");
        }
        line.push(' ');
    }

    let _ = write!(line, "{} ", mnemonic(instr.opcode));
    if instr.a.imm {
        let _ = write!(line, "$0x{:04X}", imms[0]);
    } else {
        let _ = write!(line, "%{}", reg_name(instr.a.reg));
    }
    if instr.b.imm {
        let _ = write!(line, ", $0x{:04X}", imms[1]);
    } else {
        let _ = write!(line, ", %{}", reg_name(instr.b.reg));
    }

    line
}

/// Disassemble an image, one line per instruction.
#[must_use]
pub fn disassemble(image: &[u16], opts: &Options) -> Vec<String> {
    let end = opts.end.min(image.len());
    let mut lines = Vec::new();

    let mut i = opts.begin;
    while i < end {
        let addr = i;
        let word = image[addr];
        let instr = Instruction::decode(word);

        let mut imms = [0u16; 2];
        if instr.a.imm {
            i += 1;
            if i < end {
                imms[0] = image[i];
            }
        }
        if instr.b.imm {
            i += 1;
            if i < end {
                imms[1] = image[i];
            }
        }

        lines.push(render(addr, word, &instr, imms, opts));
        i += 1;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering() {
        // MOV $0xABCD, %R0; HLT
        let image = [0x4200, 0xABCD, 0x0400];
        let lines = disassemble(&image, &Options::default());
        assert_eq!(lines, vec!["MOV $0xABCD, %R0", "HLT %R0, %R0"]);
    }

    #[test]
    fn offsets_and_words_columns() {
        let image = [0x4200, 0xABCD];
        let opts = Options {
            offsets: true,
            words: true,
            ..Options::default()
        };
        let lines = disassemble(&image, &opts);
        assert_eq!(lines, vec!["0000  4200 ABCD ****  MOV $0xABCD, %R0"]);
    }

    #[test]
    fn unknown_opcode_renders_placeholder() {
        // Opcode 0x3F with two register operands.
        let image = [0xFC21];
        let lines = disassemble(&image, &Options::default());
        assert_eq!(lines, vec!["??? %R1, %R1"]);
    }

    #[test]
    fn window_clamps_to_image() {
        let image = [0x0000, 0x0000, 0x0000];
        let opts = Options {
            begin: 1,
            end: 0x10000,
            ..Options::default()
        };
        let lines = disassemble(&image, &opts);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn truncated_trailing_immediate_renders_zero() {
        // MOV $…, %R0 but the image ends before the immediate.
        let image = [0x4200];
        let lines = disassemble(&image, &Options::default());
        assert_eq!(lines, vec!["MOV $0x0000, %R0"]);
    }
}
