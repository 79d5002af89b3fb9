//! VCPU-16 assembler binary.
//!
//! Reads one source file (or standard input), writes the big-endian image
//! to the `-o` path (or standard output). Errors go to standard error with
//! a `file:line: error:` prefix and a non-zero exit code.

use std::io::{Read, Write};
use std::process;

use format_rom::Rom;

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct CliArgs {
    output: Option<String>,
    input: Option<String>,
}

fn usage() {
    eprintln!("Usage: v16as [-o <outfile>] [-v] [-h] [<infile>]");
    eprintln!("Options:");
    eprintln!("   -o <outfile>    : Set the output file (- for standard output)");
    eprintln!("   -v              : Print version and exit");
    eprintln!("   -h              : Print this message and exit");
    eprintln!("   <infile>        : Input source file (standard input if omitted)");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        output: None,
        input: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                i += 1;
                cli.output = args.get(i).cloned();
            }
            "-v" => {
                eprintln!("v16as (VCPU-16 AS) version {VERSION}");
                process::exit(0);
            }
            "-h" => {
                usage();
                process::exit(0);
            }
            other if other.starts_with('-') && other != "-" => {
                usage();
                process::exit(1);
            }
            other => {
                cli.input = Some(other.to_string());
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    let Some(output) = cli.output else {
        eprintln!("v16as: error: no output file (use -o)");
        process::exit(1);
    };

    let (name, source) = match &cli.input {
        Some(path) if path != "-" => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("{path}: error: {err}");
                process::exit(1);
            });
            (path.as_str(), text)
        }
        _ => {
            let mut text = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut text) {
                eprintln!("<stdin>: error: {err}");
                process::exit(1);
            }
            ("<stdin>", text)
        }
    };

    let words = v16_asm::assemble(&source).unwrap_or_else(|err| {
        eprintln!("{name}:{}: error: {}", err.line, err.kind);
        process::exit(1);
    });

    let bytes = Rom::to_bytes(&words);
    let result = if output == "-" {
        std::io::stdout().write_all(&bytes)
    } else {
        std::fs::write(&output, &bytes)
    };
    if let Err(err) = result {
        eprintln!("{output}: error: {err}");
        process::exit(1);
    }
}
