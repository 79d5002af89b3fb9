//! VCPU-16 machine wiring.
//!
//! Owns the CPU and its device set, and runs whole frames against the
//! master clock. Devices are values owned by the machine and chained on
//! the I/O bus first-match-wins for reads, fan-out for writes.

mod console;
mod display;
mod keyboard;
mod machine;

pub use console::{CONSOLE_PORT, Console};
pub use display::{
    CURSOR_PORT, DIMS_PORT, DISPLAY_HEIGHT, DISPLAY_WIDTH, TEXT_PORT, TextDisplay,
};
pub use keyboard::{KEYBOARD_INTERRUPT, KEYBOARD_PORT, KEY_BUFFER_SIZE, Keyboard, key};
pub use machine::{DeviceBus, FRAME_RATE, Machine};
