//! CPU-plus-devices wiring and the frame loop.

use format_rom::Rom;
use v16_core::{IoDevice, MasterClock};
use vcpu16::{Step, Vcpu};

use crate::console::Console;
use crate::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH, TextDisplay};
use crate::keyboard::{KEYBOARD_INTERRUPT, Keyboard};

/// Display refresh rate the harness paces frames at.
pub const FRAME_RATE: u64 = 50;

/// The machine's device chain.
///
/// Reads go keyboard → display → console, first match wins; writes fan
/// out to every device, each recognising its own ports.
pub struct DeviceBus {
    pub keyboard: Keyboard,
    pub display: TextDisplay,
    pub console: Console,
}

impl DeviceBus {
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self {
            keyboard: Keyboard::new(),
            display: TextDisplay::new(),
            console,
        }
    }
}

impl IoDevice for DeviceBus {
    fn read_io(&mut self, port: u16) -> Option<u16> {
        self.keyboard
            .read_io(port)
            .or_else(|| self.display.read_io(port))
            .or_else(|| self.console.read_io(port))
    }

    fn write_io(&mut self, port: u16, value: u16) {
        self.keyboard.write_io(port, value);
        self.display.write_io(port, value);
        self.console.write_io(port, value);
    }
}

/// A VCPU-16 with its stock device set.
pub struct Machine {
    cpu: Vcpu<DeviceBus>,
    clock: MasterClock,
}

impl Machine {
    /// A machine whose console talks to the process's stdio.
    #[must_use]
    pub fn new(clock: MasterClock) -> Self {
        Self::with_console(clock, Console::stdio())
    }

    /// A machine with a custom console (tests use in-memory streams).
    #[must_use]
    pub fn with_console(clock: MasterClock, console: Console) -> Self {
        Self {
            cpu: Vcpu::new(DeviceBus::new(console)),
            clock,
        }
    }

    /// Copy a program image into memory at address 0.
    pub fn load_rom(&mut self, rom: &Rom) {
        self.cpu.memory_mut().load_image(rom.words());
    }

    pub fn cpu(&self) -> &Vcpu<DeviceBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Vcpu<DeviceBus> {
        &mut self.cpu
    }

    /// Feed one host key event to the keyboard. Buffered keys raise the
    /// keyboard interrupt; when the buffer is full the key is dropped.
    pub fn key_event(&mut self, code: u16) {
        if self.cpu.devices_mut().keyboard.push_key(code) {
            self.cpu.interrupt(KEYBOARD_INTERRUPT);
        }
    }

    /// Run one frame's worth of CPU cycles.
    ///
    /// Returns `false` once the CPU has halted for good. A CPU idling for
    /// an interrupt gives its remaining frame budget back to the host.
    pub fn run_frame(&mut self) -> bool {
        let budget = self.clock.ticks_per_frame(FRAME_RATE);
        let start = self.cpu.total_ticks();

        while self.cpu.total_ticks() - start < budget {
            match self.cpu.step() {
                Step::Halted => return false,
                Step::Running => {}
            }
            if self.cpu.is_halted() {
                // Waiting on the interrupt queue; nothing to execute.
                break;
            }
        }
        true
    }

    /// Snapshot the display's text window as one string, rows separated
    /// by newlines. Attribute bytes are dropped; unprintable characters
    /// render as spaces.
    #[must_use]
    pub fn render_text(&self) -> String {
        let offset = self.cpu.devices().display.text_offset();
        let memory = self.cpu.memory();

        let mut screen = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
        for row in 0..DISPLAY_HEIGHT {
            if row > 0 {
                screen.push('\n');
            }
            for col in 0..DISPLAY_WIDTH {
                let cell = (row * DISPLAY_WIDTH + col) as u16;
                let word = memory.read(offset.wrapping_add(cell));
                let ch = (word & 0xFF) as u8;
                screen.push(if ch.is_ascii_graphic() || ch == b' ' {
                    char::from(ch)
                } else {
                    ' '
                });
            }
        }
        screen
    }
}
