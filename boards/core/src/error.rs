//! Error taxonomy shared by every board crate.

/// Errors that can occur while encoding or sending lighting commands
#[derive(Debug, thiserror::Error)]
pub enum KeyboardError {
    /// Color name is not in the color table
    #[error("unknown color: {0}")]
    UnknownColor(String),

    /// Effect token could not be split into an effect and an optional tint
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// Brightness level outside of 1-4
    #[error("invalid brightness level {0} (expected 1-4)")]
    InvalidBrightness(u8),

    /// Color cannot be combined with effects, only shown statically
    #[error("color {0} does not support effects")]
    IncompatibleColor(String),

    /// Effect speed outside of 1-10
    #[error("invalid speed {0} (expected 1-10)")]
    InvalidSpeed(u8),

    /// No device with the expected ids is connected
    #[error("keyboard {vendor_id:04x}:{product_id:04x} not found, is it connected?")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// Opening the device or claiming its interface failed
    #[error("usb transport error: {0}")]
    Transport(#[source] rusb::Error),

    /// A single control or bulk transfer failed
    #[error("usb transfer failed: {0}")]
    TransferFailure(#[source] rusb::Error),
}

impl KeyboardError {
    /// True for errors raised before any byte reaches the device
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownColor(_)
                | Self::UnknownEffect(_)
                | Self::IncompatibleColor(_)
                | Self::InvalidBrightness(_)
                | Self::InvalidSpeed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KeyboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_distinguished() {
        assert!(KeyboardError::UnknownColor("mauve".into()).is_validation());
        assert!(KeyboardError::InvalidSpeed(11).is_validation());
        assert!(!KeyboardError::TransferFailure(rusb::Error::Pipe).is_validation());
        assert!(!KeyboardError::DeviceNotFound {
            vendor_id: 0x048d,
            product_id: 0x600b
        }
        .is_validation());
    }

    #[test]
    fn device_not_found_message_has_ids() {
        let err = KeyboardError::DeviceNotFound {
            vendor_id: 0x048d,
            product_id: 0x600b,
        };
        assert_eq!(
            err.to_string(),
            "keyboard 048d:600b not found, is it connected?"
        );
    }
}
