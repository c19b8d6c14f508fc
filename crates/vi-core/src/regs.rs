/// VI register file: 14 word registers at physical 0x0440_0000.
///
/// Address decode, the mnemonic table used by trace logging, and the
/// per-register write-effect table live here. Storage itself is a plain
/// `[u32; NUM_VI_REGISTERS]` owned by the controller.

pub const VI_REGS_BASE_ADDRESS: u32 = 0x0440_0000;
pub const VI_REGS_ADDRESS_LEN: u32 = 0x38;

pub const NUM_VI_REGISTERS: usize = 14;

/// The VI registers in address order; the discriminant is the word
/// index within the register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ViRegister {
    /// Control; low 2 bits select the frame-buffer pixel format.
    Status = 0,
    /// Low 24 bits: frame-buffer byte offset within RDRAM.
    Origin = 1,
    /// Frame-buffer stride in pixels.
    Width = 2,
    Intr = 3,
    /// Current scanline; synthesized on read, write acks the VI interrupt.
    Current = 4,
    Burst = 5,
    /// Scanlines per frame (525 NTSC, 625 PAL).
    VSync = 6,
    HSync = 7,
    Leap = 8,
    /// Visible X bounds: start in bits 25:16, end in bits 9:0.
    HStart = 9,
    /// Visible Y bounds in interlaced half-line units, same packing.
    VStart = 10,
    VBurst = 11,
    /// Low 12 bits: 2.10 fixed-point horizontal scale.
    XScale = 12,
    /// Low 12 bits: 2.10 fixed-point vertical scale.
    YScale = 13,
}

/// What a write to a register does beyond (or instead of) storing the
/// value. An explicit table so the write path stays a dispatch rather
/// than a conditional pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEffect {
    /// Store the value verbatim.
    Store,
    /// Store, then recompute the derived render area.
    StoreAndReshape,
    /// Do not store; acknowledge the pending VI interrupt on the bus.
    AckInterrupt,
}

const REGISTERS: [ViRegister; NUM_VI_REGISTERS] = [
    ViRegister::Status,
    ViRegister::Origin,
    ViRegister::Width,
    ViRegister::Intr,
    ViRegister::Current,
    ViRegister::Burst,
    ViRegister::VSync,
    ViRegister::HSync,
    ViRegister::Leap,
    ViRegister::HStart,
    ViRegister::VStart,
    ViRegister::VBurst,
    ViRegister::XScale,
    ViRegister::YScale,
];

const MNEMONICS: [&str; NUM_VI_REGISTERS] = [
    "VI_STATUS_REG",
    "VI_ORIGIN_REG",
    "VI_WIDTH_REG",
    "VI_INTR_REG",
    "VI_CURRENT_REG",
    "VI_BURST_REG",
    "VI_V_SYNC_REG",
    "VI_H_SYNC_REG",
    "VI_LEAP_REG",
    "VI_H_START_REG",
    "VI_V_START_REG",
    "VI_V_BURST_REG",
    "VI_X_SCALE_REG",
    "VI_Y_SCALE_REG",
];

impl ViRegister {
    /// Decode a bus address into a register. Addresses outside the
    /// register window are a contract violation; callers map `None`
    /// into an error.
    pub fn from_address(addr: u32) -> Option<ViRegister> {
        if addr < VI_REGS_BASE_ADDRESS || addr >= VI_REGS_BASE_ADDRESS + VI_REGS_ADDRESS_LEN {
            return None;
        }
        let index = ((addr - VI_REGS_BASE_ADDRESS) / 4) as usize;
        Some(REGISTERS[index])
    }

    pub fn address(self) -> u32 {
        VI_REGS_BASE_ADDRESS + (self as u32) * 4
    }

    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self as usize]
    }

    pub fn write_effect(self) -> WriteEffect {
        match self {
            ViRegister::Current => WriteEffect::AckInterrupt,
            ViRegister::Width
            | ViRegister::HStart
            | ViRegister::VStart
            | ViRegister::XScale
            | ViRegister::YScale => WriteEffect::StoreAndReshape,
            _ => WriteEffect::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_register_in_the_window() {
        for index in 0..NUM_VI_REGISTERS {
            let addr = VI_REGS_BASE_ADDRESS + (index as u32) * 4;
            let reg = ViRegister::from_address(addr).unwrap();
            assert_eq!(reg as usize, index);
            assert_eq!(reg.address(), addr);
        }
    }

    #[test]
    fn rejects_addresses_outside_the_window() {
        assert!(ViRegister::from_address(VI_REGS_BASE_ADDRESS - 4).is_none());
        assert!(ViRegister::from_address(VI_REGS_BASE_ADDRESS + VI_REGS_ADDRESS_LEN).is_none());
        assert!(ViRegister::from_address(0).is_none());
        assert!(ViRegister::from_address(0x0450_0000).is_none());
    }

    #[test]
    fn write_effect_table() {
        assert_eq!(ViRegister::Current.write_effect(), WriteEffect::AckInterrupt);
        for reg in [
            ViRegister::Width,
            ViRegister::HStart,
            ViRegister::VStart,
            ViRegister::XScale,
            ViRegister::YScale,
        ] {
            assert_eq!(reg.write_effect(), WriteEffect::StoreAndReshape);
        }
        assert_eq!(ViRegister::Origin.write_effect(), WriteEffect::Store);
        assert_eq!(ViRegister::VSync.write_effect(), WriteEffect::Store);
    }

    #[test]
    fn mnemonics_match_hardware_names() {
        assert_eq!(ViRegister::Status.mnemonic(), "VI_STATUS_REG");
        assert_eq!(ViRegister::Current.mnemonic(), "VI_CURRENT_REG");
        assert_eq!(ViRegister::YScale.mnemonic(), "VI_Y_SCALE_REG");
    }
}
