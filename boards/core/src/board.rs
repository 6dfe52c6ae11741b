//! Device identity and the transport trait.

use crate::Result;

/// Length of every control packet
pub const CONTROL_PACKET_LEN: usize = 8;

/// Length of one color vector sent over the bulk endpoint
pub const BULK_PAYLOAD_LEN: usize = 128;

/// Static information about a board type for detection and CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardInfo {
    pub name: &'static str,
    pub cli_name: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
}

impl BoardInfo {
    /// Copy of this info pointing at other usb ids, for boards sold under a different id pair
    pub const fn with_ids(self, vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            ..self
        }
    }
}

/// The two primitives the lighting protocol needs from the usb stack.
///
/// Implementations block until the transfer completes or fails. Failures must
/// surface as [`crate::KeyboardError::TransferFailure`].
pub trait Transport {
    /// Send one vendor control packet
    fn control_write(&mut self, packet: &[u8; CONTROL_PACKET_LEN]) -> Result<()>;

    /// Write `payload` to the bulk-out endpoint `times` times, sequentially
    fn bulk_write(&mut self, times: usize, payload: &[u8; BULK_PAYLOAD_LEN]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn control_write(&mut self, packet: &[u8; CONTROL_PACKET_LEN]) -> Result<()> {
        (**self).control_write(packet)
    }

    fn bulk_write(&mut self, times: usize, payload: &[u8; BULK_PAYLOAD_LEN]) -> Result<()> {
        (**self).bulk_write(times, payload)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn control_write(&mut self, packet: &[u8; CONTROL_PACKET_LEN]) -> Result<()> {
        (**self).control_write(packet)
    }

    fn bulk_write(&mut self, times: usize, payload: &[u8; BULK_PAYLOAD_LEN]) -> Result<()> {
        (**self).bulk_write(times, payload)
    }
}
