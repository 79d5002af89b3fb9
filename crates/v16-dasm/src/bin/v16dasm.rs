//! VCPU-16 disassembler binary.

use std::process;

use format_rom::Rom;
use v16_dasm::Options;

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct CliArgs {
    opts: Options,
    input: Option<String>,
}

fn usage() {
    eprintln!("Usage: v16dasm [-b <hexaddr>] [-e <hexaddr>] [-O] [-W] [-v] [-h] <infile>");
    eprintln!("Options:");
    eprintln!("   -b <hexaddr>    : Set the beginning offset");
    eprintln!("   -e <hexaddr>    : Set the ending offset (exclusive)");
    eprintln!("   -O              : Write offsets");
    eprintln!("   -W              : Write instruction words");
    eprintln!("   -v              : Print version and exit");
    eprintln!("   -h              : Print this message and exit");
    eprintln!("   <infile>        : Input binary (ROM)");
}

fn parse_hex(text: &str) -> Option<usize> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    usize::from_str_radix(digits, 16).ok()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        opts: Options::default(),
        input: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-b" => {
                i += 1;
                match args.get(i).map(String::as_str).and_then(parse_hex) {
                    Some(addr) => cli.opts.begin = addr,
                    None => {
                        usage();
                        process::exit(1);
                    }
                }
            }
            "-e" => {
                i += 1;
                match args.get(i).map(String::as_str).and_then(parse_hex) {
                    Some(addr) => cli.opts.end = addr,
                    None => {
                        usage();
                        process::exit(1);
                    }
                }
            }
            "-O" => cli.opts.offsets = true,
            "-W" => cli.opts.words = true,
            "-v" => {
                eprintln!("v16dasm (VCPU-16 DIS) version {VERSION}");
                process::exit(0);
            }
            "-h" => {
                usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
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

    let Some(path) = cli.input else {
        eprintln!("v16dasm: error: no input files");
        process::exit(1);
    };

    let data = std::fs::read(&path).unwrap_or_else(|err| {
        eprintln!("{path}: error: {err}");
        process::exit(1);
    });
    let rom = Rom::from_bytes(&data).unwrap_or_else(|err| {
        eprintln!("{path}: error: {err}");
        process::exit(1);
    });

    for line in v16_dasm::disassemble(rom.words(), &cli.opts) {
        println!("{line}");
    }
}
