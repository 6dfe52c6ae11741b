//! Named colors and the 128-byte color vectors sent over the bulk endpoint.
//!
//! Each vector holds 32 LED zone slots of 4 bytes: a reserved zero byte
//! followed by red, green and blue.

use xmg_kb_core::{KeyboardError, Result, BULK_PAYLOAD_LEN};

/// One zone slot: `[0x00, r, g, b]`
pub type ColorBytes = [u8; 4];

/// Full payload for one bulk write
pub type ColorVector = [u8; BULK_PAYLOAD_LEN];

/// Number of LED zone slots in a vector
pub const ZONE_SLOTS: usize = BULK_PAYLOAD_LEN / 4;

/// A named entry of the color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub name: &'static str,
    pub bytes: ColorBytes,
}

const fn rgb(name: &'static str, r: u8, g: u8, b: u8) -> Color {
    Color {
        name,
        bytes: [0x00, r, g, b],
    }
}

/// Every color the keyboard can render statically.
///
/// Some names share one rendering on the hardware (cyan/turquoise, white/rainbow).
pub static COLORS: &[Color] = &[
    // primary
    rgb("red", 0xFF, 0x00, 0x00),
    rgb("green", 0x00, 0xFF, 0x00),
    rgb("blue", 0x00, 0x00, 0xFF),
    rgb("yellow", 0xFF, 0xFF, 0x00),
    rgb("white", 0xFF, 0xFF, 0xFF),
    // cyan
    rgb("cyan", 0x00, 0xFF, 0xFF),
    rgb("turquoise", 0x00, 0xFF, 0xFF),
    // purple and pink
    rgb("purple", 0x80, 0x00, 0x80),
    rgb("magenta", 0xFF, 0x00, 0xFF),
    rgb("violet", 0x4B, 0x00, 0x82),
    rgb("pink", 0xEE, 0x82, 0xEE),
    rgb("hotpink", 0xFF, 0x69, 0xB4),
    rgb("lavender", 0xE6, 0xE6, 0xFA),
    // orange
    rgb("orange", 0xFF, 0xA5, 0x00),
    rgb("coral", 0xFF, 0x7F, 0x50),
    rgb("salmon", 0xFA, 0x80, 0x72),
    // green variants
    rgb("darkgreen", 0x00, 0x64, 0x00),
    // renders as white when static, rainbow when used for effects
    rgb("rainbow", 0xFF, 0xFF, 0xFF),
];

/// Find a color by name, ignoring case
pub fn find(name: &str) -> Option<&'static Color> {
    COLORS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Look up the slot bytes for a color name
pub fn lookup(name: &str) -> Result<ColorBytes> {
    find(name)
        .map(|c| c.bytes)
        .ok_or_else(|| KeyboardError::UnknownColor(name.to_string()))
}

/// All color names in table order
pub fn names() -> impl Iterator<Item = &'static str> {
    COLORS.iter().map(|c| c.name)
}

/// Fill every slot of a vector from the slot index
fn fill(slot: impl Fn(usize) -> ColorBytes) -> ColorVector {
    let mut vector = [0u8; BULK_PAYLOAD_LEN];
    for (i, chunk) in vector.chunks_exact_mut(4).enumerate() {
        chunk.copy_from_slice(&slot(i));
    }
    vector
}

/// Single color on every zone
pub fn build_mono(name: &str) -> Result<ColorVector> {
    let color = lookup(name)?;
    Ok(fill(|_| color))
}

/// Horizontally alternating colors.
///
/// Built from repeated `[a, b]` slot pairs, which is how the zones are wired
/// into rows. Not the same layout as [`build_vertical`].
pub fn build_horizontal(a: &str, b: &str) -> Result<ColorVector> {
    let (a, b) = (lookup(a)?, lookup(b)?);
    Ok(fill(|i| if i % 2 == 0 { a } else { b }))
}

/// Vertically alternating colors: first half of the zones `a`, second half `b`
pub fn build_vertical(a: &str, b: &str) -> Result<ColorVector> {
    let (a, b) = (lookup(a)?, lookup(b)?);
    Ok(fill(|i| if i < ZONE_SLOTS / 2 { a } else { b }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: ColorBytes = [0x00, 0xFF, 0x00, 0x00];
    const BLUE: ColorBytes = [0x00, 0x00, 0x00, 0xFF];

    fn slots(vector: &ColorVector) -> Vec<ColorBytes> {
        vector
            .chunks_exact(4)
            .map(|c| c.try_into().unwrap())
            .collect()
    }

    #[test]
    fn mono_repeats_every_color() {
        for color in COLORS {
            let vector = build_mono(color.name).unwrap();
            assert_eq!(vector.len(), 128);
            assert!(
                slots(&vector).iter().all(|s| *s == color.bytes),
                "{} should fill all 32 slots",
                color.name
            );
        }
    }

    #[test]
    fn mono_red() {
        assert_eq!(build_mono("red").unwrap().to_vec(), RED.repeat(32));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("Red").unwrap(), RED);
        assert_eq!(lookup("BLUE").unwrap(), BLUE);
    }

    #[test]
    fn aliases_share_bytes() {
        assert_eq!(lookup("cyan").unwrap(), lookup("turquoise").unwrap());
        assert_eq!(lookup("white").unwrap(), lookup("rainbow").unwrap());
    }

    #[test]
    fn vertical_is_contiguous_halves() {
        let vector = build_vertical("red", "blue").unwrap();
        assert_eq!(&vector[..64], RED.repeat(16).as_slice());
        assert_eq!(&vector[64..], BLUE.repeat(16).as_slice());
    }

    #[test]
    fn horizontal_interleaves_pairs() {
        let vector = build_horizontal("red", "blue").unwrap();
        let pair = [RED, BLUE].concat();
        assert_eq!(vector.to_vec(), pair.repeat(16));
        assert_ne!(vector, build_vertical("red", "blue").unwrap());
    }

    #[test]
    fn unknown_color_fails() {
        assert!(matches!(
            build_mono("mauve"),
            Err(KeyboardError::UnknownColor(n)) if n == "mauve"
        ));
        assert!(matches!(
            build_horizontal("red", "mauve"),
            Err(KeyboardError::UnknownColor(n)) if n == "mauve"
        ));
        assert!(matches!(
            build_vertical("mauve", "red"),
            Err(KeyboardError::UnknownColor(n)) if n == "mauve"
        ));
    }
}
