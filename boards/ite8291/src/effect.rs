//! Effect tokens and the effect control packet.
//!
//! A token is a base effect name, optionally followed by a single tint letter
//! selecting the color the effect is rendered in, e.g. `breathing`, `breathingr`
//! or `reactiveripplev`.

use std::fmt::Display;
use std::str::FromStr;

use xmg_kb_core::{KeyboardError, Result};

use crate::abi::{self, Packet};
use crate::types::{Brightness, Speed};

/// Animated effects supported by the firmware
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    Breathing,
    Wave,
    Random,
    Reactive,
    Rainbow,
    Ripple,
    ReactiveRipple,
    Marquee,
    Raindrop,
    Aurora,
    ReactiveAurora,
    Fireworks,
}

impl Effect {
    pub const ALL: [Effect; 12] = [
        Effect::Breathing,
        Effect::Wave,
        Effect::Random,
        Effect::Reactive,
        Effect::Rainbow,
        Effect::Ripple,
        Effect::ReactiveRipple,
        Effect::Marquee,
        Effect::Raindrop,
        Effect::Aurora,
        Effect::ReactiveAurora,
        Effect::Fireworks,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Effect::Breathing => "breathing",
            Effect::Wave => "wave",
            Effect::Random => "random",
            Effect::Reactive => "reactive",
            Effect::Rainbow => "rainbow",
            Effect::Ripple => "ripple",
            Effect::ReactiveRipple => "reactiveripple",
            Effect::Marquee => "marquee",
            Effect::Raindrop => "raindrop",
            Effect::Aurora => "aurora",
            Effect::ReactiveAurora => "reactiveaurora",
            Effect::Fireworks => "fireworks",
        }
    }

    /// Device effect code. Some effects share a code and differ only by the extra flag.
    pub const fn code(self) -> u8 {
        match self {
            Effect::Breathing => 0x02,
            Effect::Wave => 0x03,
            Effect::Random | Effect::Reactive => 0x04,
            Effect::Rainbow => 0x05,
            Effect::Ripple => 0x06,
            Effect::ReactiveRipple => 0x07,
            Effect::Marquee => 0x09,
            Effect::Raindrop => 0x0A,
            Effect::Aurora | Effect::ReactiveAurora => 0x0E,
            Effect::Fireworks => 0x11,
        }
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = KeyboardError;
    fn from_str(s: &str) -> Result<Self> {
        Effect::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KeyboardError::UnknownEffect(s.to_string()))
    }
}

/// Single letter color suffix for effects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tint {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Pink,
    Violet,
}

impl Tint {
    pub const ALL: [Tint; 9] = [
        Tint::Red,
        Tint::Orange,
        Tint::Yellow,
        Tint::Green,
        Tint::Teal,
        Tint::Blue,
        Tint::Purple,
        Tint::Pink,
        Tint::Violet,
    ];

    pub const fn letter(self) -> char {
        match self {
            Tint::Red => 'r',
            Tint::Orange => 'o',
            Tint::Yellow => 'y',
            Tint::Green => 'g',
            Tint::Teal => 't',
            Tint::Blue => 'b',
            Tint::Purple => 'p',
            Tint::Pink => 'k',
            Tint::Violet => 'v',
        }
    }

    /// Device color code
    pub const fn code(self) -> u8 {
        match self {
            Tint::Red => 0x01,
            Tint::Orange => 0x02,
            Tint::Yellow => 0x03,
            Tint::Green => 0x04,
            Tint::Teal => 0x05,
            Tint::Blue => 0x06,
            Tint::Purple => 0x07,
            Tint::Pink => 0x09,
            Tint::Violet => 0x0E,
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Tint::ALL.into_iter().find(|t| t.letter() == letter)
    }
}

/// A parsed effect token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectToken {
    pub effect: Effect,
    pub tint: Option<Tint>,
}

impl EffectToken {
    pub const fn new(effect: Effect, tint: Option<Tint>) -> Self {
        Self { effect, tint }
    }

    /// Split a token into its effect and optional tint.
    ///
    /// Effect names are matched longest first, falling back to shorter names,
    /// so `reactiveripple` is never read as `reactive` plus a leftover.
    pub fn parse(token: &str) -> Result<Self> {
        let lowered = token.to_ascii_lowercase();

        let mut candidates: Vec<Effect> = Effect::ALL
            .into_iter()
            .filter(|e| lowered.starts_with(e.name()))
            .collect();
        candidates.sort_by_key(|e| std::cmp::Reverse(e.name().len()));

        for effect in candidates {
            let mut rest = lowered[effect.name().len()..].chars();
            match (rest.next(), rest.next()) {
                (None, _) => return Ok(Self::new(effect, None)),
                (Some(letter), None) => {
                    if let Some(tint) = Tint::from_letter(letter) {
                        return Ok(Self::new(effect, Some(tint)));
                    }
                },
                _ => {},
            }
        }

        Err(KeyboardError::UnknownEffect(token.to_string()))
    }

    /// Device color code after per-effect overrides
    fn color_code(&self) -> u8 {
        match self.effect {
            Effect::Rainbow | Effect::Wave => 0x00,
            Effect::Marquee => abi::NO_TINT,
            _ => self.tint.map_or(abi::NO_TINT, Tint::code),
        }
    }

    fn extra_flag(&self) -> u8 {
        match self.effect {
            Effect::Wave | Effect::Reactive | Effect::ReactiveAurora | Effect::Fireworks => 0x01,
            _ => 0x00,
        }
    }

    /// Build the control packet for this token
    pub fn to_packet(&self, brightness: Brightness, speed: Speed) -> Packet {
        abi::effect(
            self.effect.code(),
            speed.value(),
            brightness.code(),
            self.color_code(),
            self.extra_flag(),
        )
    }
}

impl Display for EffectToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.effect.name())?;
        if let Some(tint) = self.tint {
            write!(f, "{}", tint.letter())?;
        }
        Ok(())
    }
}

impl FromStr for EffectToken {
    type Err = KeyboardError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a token into its effect and optional tint
pub fn parse(token: &str) -> Result<(Effect, Option<Tint>)> {
    EffectToken::parse(token).map(|t| (t.effect, t.tint))
}

/// Encode an effect token with a brightness level (1-4) and speed (1-10).
///
/// Validation happens in token, brightness, speed order; nothing is clamped.
pub fn encode(token: &str, brightness: u8, speed: u8) -> Result<Packet> {
    let token = EffectToken::parse(token)?;
    let brightness = Brightness::new(brightness)?;
    let speed = Speed::new(speed)?;
    Ok(token.to_packet(brightness, speed))
}
