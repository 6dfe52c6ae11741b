//! Control packet layouts.
//!
//! Every control packet is 8 bytes, sent as a class request (type 0x21,
//! request 0x09, value 0x0300) to interface 1. Unset trailing bytes are zero.

use xmg_kb_core::CONTROL_PACKET_LEN;

pub type Packet = [u8; CONTROL_PACKET_LEN];

pub const REQUEST_TYPE: u8 = 0x21;
pub const REQUEST: u8 = 0x09;
pub const VALUE: u16 = 0x0300;
pub const INDEX: u16 = 1;

/// How many times a color vector is written per color change
pub const COLOR_VECTOR_REPEAT: usize = 8;

/// Device color code meaning "no tint" for effects
pub const NO_TINT: u8 = 0x08;

/// Flag for [`prepare_color_change`] asking the firmware to keep the new colors
pub const SAVE: u8 = 0x01;

macro_rules! impl_control_abi {
    [$(
        $( #[doc = $( $doc:tt )* ] )*
        fn $name:ident ( [ $( $hardcode:expr ),* ] $(, $arg:ident )* );
    )+] => {
        $(
            $(#[doc = concat!("Construct a control packet for ", $($doc)*)])*
            #[allow(unused_mut, unused_assignments)]
            pub fn $name( $( $arg: u8 ),* ) -> Packet {
                let mut buf = [0u8; CONTROL_PACKET_LEN];
                let mut cur = 0;
                $(
                    buf[cur] = $hardcode;
                    cur += 1;
                )*
                $(
                    buf[cur] = $arg;
                    cur += 1;
                )*
                buf
            }
        )*
    };
}

impl_control_abi![
    /// switching the backlight off
    fn turn_off([0x08, 0x01]);

    /// setting the global brightness
    fn brightness([0x08, 0x02, 0x33, 0x00], code);

    /// starting an animated effect
    fn effect([0x08, 0x02], effect, speed, brightness, color, extra);

    /// announcing that a color vector follows on the bulk endpoint
    fn prepare_color_change([0x12, 0x00, 0x00, 0x08], save);
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_packets() {
        assert_eq!(turn_off(), [0x08, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            prepare_color_change(SAVE),
            [0x12, 0x00, 0x00, 0x08, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(brightness(0x24), [0x08, 0x02, 0x33, 0x00, 0x24, 0, 0, 0]);
    }

    #[test]
    fn effect_layout() {
        assert_eq!(
            effect(0x03, 0x05, 0x24, 0x00, 0x01),
            [0x08, 0x02, 0x03, 0x05, 0x24, 0x00, 0x01, 0x00]
        );
    }
}
