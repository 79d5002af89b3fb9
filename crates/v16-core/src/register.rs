//! The sixteen-register file layout.

/// Register indices 0x0–0xF.
///
/// R0–R9 are general purpose, RI/RJ are index registers by calling
/// convention only, IA is loaded into PC on interrupt entry, OF receives
/// the high half of every 32-bit ALU result, SP is the full-descending
/// stack pointer, PC is the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    R0 = 0x0,
    R1 = 0x1,
    R2 = 0x2,
    R3 = 0x3,
    R4 = 0x4,
    R5 = 0x5,
    R6 = 0x6,
    R7 = 0x7,
    R8 = 0x8,
    R9 = 0x9,
    Ri = 0xA,
    Rj = 0xB,
    Ia = 0xC,
    Of = 0xD,
    Sp = 0xE,
    Pc = 0xF,
}

impl Register {
    /// All sixteen registers, in index order.
    pub const ALL: [Register; 16] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
        Register::R8,
        Register::R9,
        Register::Ri,
        Register::Rj,
        Register::Ia,
        Register::Of,
        Register::Sp,
        Register::Pc,
    ];

    /// Decode a 4-bit register field. Always succeeds for values below 16.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 16 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// The 4-bit wire value.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Assembly name, upper case.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Register::R0 => "R0",
            Register::R1 => "R1",
            Register::R2 => "R2",
            Register::R3 => "R3",
            Register::R4 => "R4",
            Register::R5 => "R5",
            Register::R6 => "R6",
            Register::R7 => "R7",
            Register::R8 => "R8",
            Register::R9 => "R9",
            Register::Ri => "RI",
            Register::Rj => "RJ",
            Register::Ia => "IA",
            Register::Of => "OF",
            Register::Sp => "SP",
            Register::Pc => "PC",
        }
    }

    /// Look up a register by name, case-insensitively. `EX` is accepted as
    /// an alias for OF.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("EX") {
            return Some(Register::Of);
        }
        Self::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for reg in Register::ALL {
            assert_eq!(Register::from_index(reg.index()), Some(reg));
        }
        assert_eq!(Register::from_index(16), None);
    }

    #[test]
    fn name_lookup() {
        assert_eq!(Register::from_name("r4"), Some(Register::R4));
        assert_eq!(Register::from_name("sp"), Some(Register::Sp));
        assert_eq!(Register::from_name("ex"), Some(Register::Of));
        assert_eq!(Register::from_name("zz"), None);
    }
}
