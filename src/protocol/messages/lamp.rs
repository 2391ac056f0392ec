//! Lamp status pairs: a status byte and a flash byte, two bits per lamp
//! (MIL bits 7-6, RSL bits 5-4, AWL bits 3-2, PL bits 1-0).
use crate::infra::codec::bits::shave;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LampStatus {
    Off,
    SlowFlash,
    FastFlash,
    On,
    /// Reserved or not-available code combination.
    Other,
}

impl LampStatus {
    /// Combine a 2-bit on/off code with a 2-bit flash code.
    pub const fn from_codes(on_off: u8, flash: u8) -> Self {
        match (on_off & 0x03, flash & 0x03) {
            (0b00, _) => LampStatus::Off,
            (0b01, 0b00) => LampStatus::SlowFlash,
            (0b01, 0b01) => LampStatus::FastFlash,
            (0b01, 0b11) => LampStatus::On,
            _ => LampStatus::Other,
        }
    }

    /// Codes for the status and flash bytes, inverse of [`LampStatus::from_codes`].
    pub const fn to_codes(self) -> (u8, u8) {
        match self {
            LampStatus::Off => (0b00, 0b11),
            LampStatus::SlowFlash => (0b01, 0b00),
            LampStatus::FastFlash => (0b01, 0b01),
            LampStatus::On => (0b01, 0b11),
            LampStatus::Other => (0b11, 0b11),
        }
    }
}

impl fmt::Display for LampStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LampStatus::Off => "off",
            LampStatus::SlowFlash => "slow flash",
            LampStatus::FastFlash => "fast flash",
            LampStatus::On => "on",
            LampStatus::Other => "other",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lamp {
    MalfunctionIndicator,
    RedStop,
    AmberWarning,
    Protect,
}

impl Lamp {
    const fn shift(self) -> u8 {
        match self {
            Lamp::MalfunctionIndicator => 6,
            Lamp::RedStop => 4,
            Lamp::AmberWarning => 2,
            Lamp::Protect => 0,
        }
    }
}

/// The four lamps as transmitted; statuses are decoded on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lamps {
    pub status: u8,
    pub flash: u8,
}

impl Lamps {
    pub const fn new(status: u8, flash: u8) -> Self {
        Self { status, flash }
    }

    /// Pack four statuses into the status/flash byte pair.
    pub const fn from_statuses(
        mil: LampStatus,
        rsl: LampStatus,
        awl: LampStatus,
        pl: LampStatus,
    ) -> Self {
        let (mil_on, mil_flash) = mil.to_codes();
        let (rsl_on, rsl_flash) = rsl.to_codes();
        let (awl_on, awl_flash) = awl.to_codes();
        let (pl_on, pl_flash) = pl.to_codes();
        Self {
            status: (mil_on << 6) | (rsl_on << 4) | (awl_on << 2) | pl_on,
            flash: (mil_flash << 6) | (rsl_flash << 4) | (awl_flash << 2) | pl_flash,
        }
    }

    /// Status of one lamp.
    pub const fn get(&self, lamp: Lamp) -> LampStatus {
        let shift = lamp.shift();
        LampStatus::from_codes(
            shave(self.status as u64, shift, 2) as u8,
            shave(self.flash as u64, shift, 2) as u8,
        )
    }

    pub const fn mil(&self) -> LampStatus {
        self.get(Lamp::MalfunctionIndicator)
    }

    pub const fn rsl(&self) -> LampStatus {
        self.get(Lamp::RedStop)
    }

    pub const fn awl(&self) -> LampStatus {
        self.get(Lamp::AmberWarning)
    }

    pub const fn pl(&self) -> LampStatus {
        self.get(Lamp::Protect)
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        [self.status, self.flash]
    }
}

impl fmt::Display for Lamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MIL: {}, RSL: {}, AWL: {}, PL: {}",
            self.mil(),
            self.rsl(),
            self.awl(),
            self.pl()
        )
    }
}
