//! High level rusb abstraction for driving the ITE 8291 backlight found in XMG keyboards.
//!
//! Lighting is controlled with 8-byte control packets. Static colors are sent
//! as a 128-byte color vector over the bulk endpoint, announced by a
//! "prepare color change" packet and repeated eight times.

use std::time::Duration;

use tracing::debug;
use xmg_kb_core::{BoardInfo, Result, Transport};

pub mod abi;
pub mod colors;
pub mod compat;
pub mod effect;
pub mod record;
pub mod types;
pub mod usb;

pub use colors::ColorVector;
pub use effect::{Effect, EffectToken, Tint};
pub use types::{Brightness, Speed};
pub use usb::{UsbTransport, DEFAULT_TIMEOUT};

pub mod consts {
    pub const ITE8291_VENDOR_ID: u16 = 0x048D;
    pub const ITE8291_PRODUCT_ID: u16 = 0x600B;
}

/// Static board info for detection
pub static INFO: BoardInfo = BoardInfo {
    name: "ITE 8291 (XMG)",
    cli_name: "ite8291",
    vendor_id: consts::ITE8291_VENDOR_ID,
    product_id: consts::ITE8291_PRODUCT_ID,
};

/// Lighting session with one keyboard.
///
/// Remembers the last brightness set with [`Ite8291::set_brightness`], so color
/// changes on a fresh session can establish a brightness first.
pub struct Ite8291<T: Transport = UsbTransport> {
    transport: T,
    brightness: Option<Brightness>,
}

impl Ite8291<UsbTransport> {
    /// Find and open the keyboard with the default ids
    pub fn open() -> Result<Self> {
        Self::open_with(&INFO, DEFAULT_TIMEOUT)
    }

    /// Open a keyboard with custom ids and transfer timeout
    pub fn open_with(info: &BoardInfo, timeout: Duration) -> Result<Self> {
        Ok(Self::with_transport(UsbTransport::open(info, timeout)?))
    }

    /// End the session, releasing the usb interface
    pub fn close(self) -> Result<()> {
        self.transport.close()
    }
}

impl<T: Transport> Ite8291<T> {
    /// Start a session over an already opened transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            brightness: None,
        }
    }

    /// Brightness last set on this session, if any
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Switch the backlight off. Keeps the cached brightness.
    pub fn turn_off(&mut self) -> Result<()> {
        self.transport.control_write(&abi::turn_off())
    }

    /// Set the global brightness (1-4) and remember it for later color changes
    pub fn set_brightness(&mut self, level: u8) -> Result<()> {
        let brightness = Brightness::new(level)?;
        self.transport
            .control_write(&abi::brightness(brightness.code()))?;
        self.brightness = Some(brightness);
        Ok(())
    }

    /// Start an effect from a token such as `wave` or `breathingb`.
    ///
    /// The packet carries its own brightness; the cached session brightness is
    /// left untouched.
    pub fn set_effect(&mut self, token: &str, brightness: u8, speed: u8) -> Result<()> {
        let packet = effect::encode(token, brightness, speed)?;
        self.transport.control_write(&packet)
    }

    /// Single color on all keys
    #[inline(always)]
    pub fn set_color(&mut self, name: &str) -> Result<()> {
        let vector = colors::build_mono(name)?;
        self.write_color_vector(&vector)
    }

    /// Horizontally alternating colors
    #[inline(always)]
    pub fn set_h_colors(&mut self, a: &str, b: &str) -> Result<()> {
        let vector = colors::build_horizontal(a, b)?;
        self.write_color_vector(&vector)
    }

    /// Vertically alternating colors
    #[inline(always)]
    pub fn set_v_colors(&mut self, a: &str, b: &str) -> Result<()> {
        let vector = colors::build_vertical(a, b)?;
        self.write_color_vector(&vector)
    }

    /// Send an already validated color vector: brightness if unset, prepare packet, then the vector
    fn write_color_vector(&mut self, vector: &ColorVector) -> Result<()> {
        if self.brightness.is_none() {
            debug!("no brightness set, defaulting to {}", Brightness::DEFAULT);
            self.set_brightness(Brightness::DEFAULT.level())?;
        }
        self.transport
            .control_write(&abi::prepare_color_change(abi::SAVE))?;
        self.transport
            .bulk_write(abi::COLOR_VECTOR_REPEAT, vector)
    }
}
