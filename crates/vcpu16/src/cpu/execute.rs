//! Per-opcode execution.

use v16_core::{IoDevice, Opcode, Register};

use super::{Decoded, Step, Vcpu};

impl<D: IoDevice> Vcpu<D> {
    /// Execute one materialized instruction.
    ///
    /// ALU opcodes go through a 32-bit intermediate with C's unsigned
    /// promotion semantics, so borrow and complement leave 0xFFFF in OF
    /// and the invariant `dest + (OF << 16) == result mod 2^32` holds.
    pub(crate) fn execute(&mut self, d: &Decoded) -> Step {
        let Some(opcode) = Opcode::from_bits(d.instr.opcode) else {
            // Unassigned opcodes execute silently as no-ops.
            return Step::Running;
        };

        match opcode {
            Opcode::Nop => {}
            Opcode::Hlt => return self.latch_halt(),

            Opcode::Pts => self.push(d.av),
            Opcode::Pfs => {
                let value = self.pop();
                self.set(u32::from(value), d.a_dest);
            }
            Opcode::Cal => {
                let pc = self.regs[Register::Pc];
                self.push(pc);
                self.regs[Register::Pc] = d.av;
            }
            Opcode::Ret => {
                let pc = self.pop();
                self.regs[Register::Pc] = pc;
            }

            Opcode::Ior => {
                // The handler runs for its side effects even when B is an
                // immediate; only the write-back is discarded then.
                if let Some(value) = self.devices_mut().read_io(d.av) {
                    self.set(u32::from(value), d.b_dest);
                }
            }
            Opcode::Iow => self.devices_mut().write_io(d.av, d.bv),

            Opcode::Mrd => {
                let value = self.memory().read(d.av);
                self.set(u32::from(value), d.b_dest);
            }
            Opcode::Mwr => self.memory_mut().write(d.bv, d.av),

            Opcode::Cli => self.interrupts_mut().enabled = false,
            Opcode::Sti => self.interrupts_mut().enabled = true,
            Opcode::Int => self.interrupt(d.av),
            Opcode::Rfi => {
                let r0 = self.pop();
                self.regs[Register::R0] = r0;
                let pc = self.pop();
                self.regs[Register::Pc] = pc;
                self.interrupts_mut().in_service = false;
            }

            Opcode::Mov => self.set(u32::from(d.av), d.b_dest),
            Opcode::Add => self.set(u32::from(d.bv) + u32::from(d.av), d.b_dest),
            Opcode::Sub => {
                self.set(u32::from(d.bv).wrapping_sub(u32::from(d.av)), d.b_dest);
            }
            Opcode::Mul => self.set(u32::from(d.bv) * u32::from(d.av), d.b_dest),
            Opcode::Div => {
                let value = if d.av == 0 {
                    0
                } else {
                    u32::from(d.bv) / u32::from(d.av)
                };
                self.set(value, d.b_dest);
            }
            Opcode::Mod => {
                let value = if d.av == 0 {
                    u32::from(d.bv)
                } else {
                    u32::from(d.bv) % u32::from(d.av)
                };
                self.set(value, d.b_dest);
            }
            Opcode::Shl => {
                let value = u32::from(d.bv).checked_shl(u32::from(d.av)).unwrap_or(0);
                self.set(value, d.b_dest);
            }
            Opcode::Shr => {
                let value = u32::from(d.bv).checked_shr(u32::from(d.av)).unwrap_or(0);
                self.set(value, d.b_dest);
            }
            Opcode::And => self.set(u32::from(d.bv & d.av), d.b_dest),
            Opcode::Bor => self.set(u32::from(d.bv | d.av), d.b_dest),
            Opcode::Xor => self.set(u32::from(d.bv ^ d.av), d.b_dest),
            Opcode::Not => self.set(!u32::from(d.av), d.a_dest),
            Opcode::Inc => self.set(u32::from(d.av) + 1, d.a_dest),
            Opcode::Dec => self.set(u32::from(d.av).wrapping_sub(1), d.a_dest),

            Opcode::Ieq => self.skip_unless(d.bv == d.av),
            Opcode::Ine => self.skip_unless(d.bv != d.av),
            Opcode::Igt => self.skip_unless(d.bv > d.av),
            Opcode::Ige => self.skip_unless(d.bv >= d.av),
            Opcode::Ilt => self.skip_unless(d.bv < d.av),
            Opcode::Ile => self.skip_unless(d.bv <= d.av),
        }

        Step::Running
    }

    /// Skip-next: on a failed comparison the following instruction is
    /// decoded in full (advancing PC past its immediates) but never
    /// executed, so a skip costs exactly one instruction of any size.
    fn skip_unless(&mut self, condition: bool) {
        if !condition {
            let _ = self.parse();
        }
    }
}
