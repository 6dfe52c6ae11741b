use std::fmt::Display;

use xmg_kb_core::{KeyboardError, Result};

/// Device brightness codes, indexed by `level - 1`
const BRIGHTNESS_CODES: [u8; 4] = [0x08, 0x16, 0x24, 0x32];

/// Validated backlight brightness level (1 = dark, 4 = bright)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(4);

    /// Level used when a color is sent before any brightness was set
    pub const DEFAULT: Self = Self::MAX;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(KeyboardError::InvalidBrightness(level))
        }
    }

    /// User facing level, 1-4
    pub fn level(self) -> u8 {
        self.0
    }

    /// Byte the firmware expects for this level
    pub fn code(self) -> u8 {
        BRIGHTNESS_CODES[usize::from(self.0 - 1)]
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Brightness {
    type Error = KeyboardError;
    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl Display for Brightness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated effect speed (1 = fastest, 10 = slowest). Sent to the device as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);
    pub const DEFAULT: Self = Self(5);

    pub fn new(speed: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&speed) {
            Ok(Self(speed))
        } else {
            Err(KeyboardError::InvalidSpeed(speed))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Speed {
    type Error = KeyboardError;
    fn try_from(speed: u8) -> Result<Self> {
        Self::new(speed)
    }
}

impl Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_codes() {
        let codes: Vec<u8> = (1..=4)
            .map(|l| Brightness::new(l).unwrap().code())
            .collect();
        assert_eq!(codes, [0x08, 0x16, 0x24, 0x32]);
    }

    #[test]
    fn brightness_out_of_range_is_rejected() {
        assert!(matches!(
            Brightness::new(0),
            Err(KeyboardError::InvalidBrightness(0))
        ));
        assert!(matches!(
            Brightness::try_from(5),
            Err(KeyboardError::InvalidBrightness(5))
        ));
    }

    #[test]
    fn speed_range() {
        assert_eq!(Speed::new(1).unwrap().value(), 1);
        assert_eq!(Speed::new(10).unwrap().value(), 10);
        assert!(matches!(Speed::new(0), Err(KeyboardError::InvalidSpeed(0))));
        assert!(matches!(Speed::new(11), Err(KeyboardError::InvalidSpeed(11))));
    }
}
