//! Character console on port 0x00FF.
//!
//! The minimal harness device: reads pull one byte from the input stream,
//! writes push one byte to the output stream. End of input reads as
//! 0xFFFF.

use std::io::{Read, Write};

use v16_core::IoDevice;

/// Conventional console port.
pub const CONSOLE_PORT: u16 = 0x00FF;

/// Byte-at-a-time stdio-style console.
pub struct Console {
    input: Box<dyn Read>,
    output: Box<dyn Write>,
}

impl Console {
    /// A console over arbitrary streams (tests use in-memory buffers).
    pub fn new(input: impl Read + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// A console over the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin(), std::io::stdout())
    }
}

impl IoDevice for Console {
    fn read_io(&mut self, port: u16) -> Option<u16> {
        if port != CONSOLE_PORT {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.input.read(&mut byte) {
            Ok(1) => Some(u16::from(byte[0])),
            // EOF or error both read as the sentinel.
            _ => Some(0xFFFF),
        }
    }

    fn write_io(&mut self, port: u16, value: u16) {
        if port == CONSOLE_PORT {
            let _ = self.output.write_all(&[(value & 0xFF) as u8]);
            let _ = self.output.flush();
        }
    }
}
