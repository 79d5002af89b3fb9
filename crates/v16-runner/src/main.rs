//! VCPU-16 executor harness.
//!
//! Loads a program image, paces the CPU at the configured clock rate in
//! 50 fps frames, and hosts the stock device set with the console wired
//! to the process's stdio. Optional wall-clock bound and a register dump
//! on exit.

use std::process;
use std::time::{Duration, Instant};

use format_rom::Rom;
use machine_v16::{FRAME_RATE, Machine};
use v16_core::MasterClock;

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct CliArgs {
    image: Option<String>,
    frequency_hz: u64,
    max_seconds: u64,
    regdump: bool,
}

fn usage() {
    eprintln!("Usage: v16-runner [-t <seconds>] [-R] [-v] [-h] <image> [<hz>]");
    eprintln!("Options:");
    eprintln!("   -t <seconds>    : Stop after this many seconds (0 = run forever) [default: 10]");
    eprintln!("   -R              : Dump registers on exit");
    eprintln!("   -v              : Print version and exit");
    eprintln!("   -h              : Print this message and exit");
    eprintln!("   <image>         : Input binary (ROM)");
    eprintln!("   <hz>            : Clock frequency [default: {}]", MasterClock::DEFAULT_HZ);
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        image: None,
        frequency_hz: MasterClock::DEFAULT_HZ,
        max_seconds: 10,
        regdump: false,
    };

    let mut positional = 0;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-t" => {
                i += 1;
                if let Some(text) = args.get(i) {
                    cli.max_seconds = text.parse().unwrap_or(10);
                }
            }
            "-R" => cli.regdump = true,
            "-v" => {
                eprintln!("v16-runner (VCPU-16 EXEC) version {VERSION}");
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
                match positional {
                    0 => cli.image = Some(other.to_string()),
                    1 => {
                        cli.frequency_hz = other.parse().unwrap_or_else(|_| {
                            eprintln!("v16-runner: error: bad clock frequency: {other}");
                            process::exit(1);
                        });
                    }
                    _ => {
                        usage();
                        process::exit(1);
                    }
                }
                positional += 1;
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    let Some(path) = cli.image else {
        eprintln!("v16-runner: error: no input files");
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

    let mut machine = Machine::new(MasterClock::new(cli.frequency_hz));
    machine.load_rom(&rom);

    let frame_duration = Duration::from_micros(1_000_000 / FRAME_RATE);
    let started = Instant::now();

    loop {
        let frame_started = Instant::now();
        if !machine.run_frame() {
            break;
        }
        if cli.max_seconds > 0 && started.elapsed() >= Duration::from_secs(cli.max_seconds) {
            eprintln!("v16-runner: stopped after {} seconds", cli.max_seconds);
            break;
        }
        if let Some(rest) = frame_duration.checked_sub(frame_started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    if cli.regdump {
        for (reg, value) in machine.cpu().regs.iter() {
            eprintln!("{} = 0x{value:04X}", reg.name());
        }
    }
}
