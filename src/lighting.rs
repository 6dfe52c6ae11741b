//! Persisted record of what the keyboard currently displays.

use std::fmt::Display;

use ite8291::{colors, Ite8291};
use serde::{Deserialize, Deserializer, Serialize};
use xmg_kb_core::{Result, Transport};

fn default_brightness() -> u8 {
    4
}

fn default_speed() -> u8 {
    5
}

fn default_effect() -> String {
    "rainbow".into()
}

fn default_color() -> String {
    "white".into()
}

fn default_colors() -> [String; 2] {
    ["red".into(), "blue".into()]
}

/// Lighting mode and its parameters, tagged by `mode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LightingState {
    Off { brightness: u8 },
    Effect { effect: String, speed: u8, brightness: u8 },
    Color { color: String, brightness: u8 },
    HAlt { colors: [String; 2], brightness: u8 },
    VAlt { colors: [String; 2], brightness: u8 },
}

/// On-disk shape of [`LightingState`]. Fills in missing fields and accepts the
/// older `h-alt`/`v-alt` records that store the pair as `color_a` and `color_b`.
#[derive(Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum StoredState {
    Off {
        #[serde(default = "default_brightness")]
        brightness: u8,
    },
    Effect {
        #[serde(default = "default_effect")]
        effect: String,
        #[serde(default = "default_speed")]
        speed: u8,
        #[serde(default = "default_brightness")]
        brightness: u8,
    },
    Color {
        #[serde(default = "default_color")]
        color: String,
        #[serde(default = "default_brightness")]
        brightness: u8,
    },
    #[serde(alias = "h-alt")]
    HAlt {
        colors: Option<[String; 2]>,
        color_a: Option<String>,
        color_b: Option<String>,
        #[serde(default = "default_brightness")]
        brightness: u8,
    },
    #[serde(alias = "v-alt")]
    VAlt {
        colors: Option<[String; 2]>,
        color_a: Option<String>,
        color_b: Option<String>,
        #[serde(default = "default_brightness")]
        brightness: u8,
    },
}

fn color_pair(
    colors: Option<[String; 2]>,
    color_a: Option<String>,
    color_b: Option<String>,
) -> std::result::Result<[String; 2], String> {
    match (colors, color_a, color_b) {
        (Some(colors), None, None) => Ok(colors),
        (None, Some(a), Some(b)) => Ok([a, b]),
        (None, None, None) => Ok(default_colors()),
        _ => Err("expected either `colors` or both `color_a` and `color_b`".into()),
    }
}

impl<'de> Deserialize<'de> for LightingState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        StoredState::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

impl TryFrom<StoredState> for LightingState {
    type Error = String;

    fn try_from(stored: StoredState) -> std::result::Result<Self, Self::Error> {
        Ok(match stored {
            StoredState::Off { brightness } => Self::Off { brightness },
            StoredState::Effect {
                effect,
                speed,
                brightness,
            } => Self::Effect {
                effect,
                speed,
                brightness,
            },
            StoredState::Color { color, brightness } => Self::Color { color, brightness },
            StoredState::HAlt {
                colors,
                color_a,
                color_b,
                brightness,
            } => Self::HAlt {
                colors: color_pair(colors, color_a, color_b)?,
                brightness,
            },
            StoredState::VAlt {
                colors,
                color_a,
                color_b,
                brightness,
            } => Self::VAlt {
                colors: color_pair(colors, color_a, color_b)?,
                brightness,
            },
        })
    }
}

impl LightingState {
    /// Replay this state on a keyboard session. Color names are checked before anything is sent.
    pub fn apply<T: Transport>(&self, keyboard: &mut Ite8291<T>) -> Result<()> {
        match self {
            Self::Off { .. } => keyboard.turn_off(),
            Self::Effect {
                effect,
                speed,
                brightness,
            } => keyboard.set_effect(effect, *brightness, *speed),
            Self::Color { color, brightness } => {
                colors::lookup(color)?;
                keyboard.set_brightness(*brightness)?;
                keyboard.set_color(color)
            },
            Self::HAlt {
                colors: [a, b],
                brightness,
            } => {
                colors::lookup(a)?;
                colors::lookup(b)?;
                keyboard.set_brightness(*brightness)?;
                keyboard.set_h_colors(a, b)
            },
            Self::VAlt {
                colors: [a, b],
                brightness,
            } => {
                colors::lookup(a)?;
                colors::lookup(b)?;
                keyboard.set_brightness(*brightness)?;
                keyboard.set_v_colors(a, b)
            },
        }
    }
}

impl Display for LightingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off { .. } => write!(f, "backlight off"),
            Self::Effect {
                effect,
                speed,
                brightness,
            } => write!(
                f,
                "effect '{effect}' with brightness {brightness}, speed {speed}"
            ),
            Self::Color { color, brightness } => {
                write!(f, "color '{color}' with brightness {brightness}")
            },
            Self::HAlt {
                colors: [a, b],
                brightness,
            } => write!(f, "horizontal {a}/{b} with brightness {brightness}"),
            Self::VAlt {
                colors: [a, b],
                brightness,
            } => write!(f, "vertical {a}/{b} with brightness {brightness}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use ite8291::record::{Recorder, Transfer};

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        lighting: LightingState,
    }

    fn parse(toml: &str) -> LightingState {
        toml::from_str::<Wrapper>(toml).unwrap().lighting
    }

    fn replay(state: &LightingState) -> Vec<Transfer> {
        let mut kb = Ite8291::with_transport(Recorder::new());
        state.apply(&mut kb).unwrap();
        kb.into_transport().into_transfers()
    }

    #[test]
    fn missing_fields_use_defaults() {
        assert_eq!(
            parse("[lighting]\nmode = \"effect\"\n"),
            LightingState::Effect {
                effect: "rainbow".into(),
                speed: 5,
                brightness: 4,
            }
        );
        assert_eq!(
            parse("[lighting]\nmode = \"off\"\n"),
            LightingState::Off { brightness: 4 }
        );
    }

    #[test]
    fn legacy_dashed_modes() {
        assert_eq!(
            parse("[lighting]\nmode = \"h-alt\"\ncolors = [\"pink\", \"cyan\"]\nbrightness = 2\n"),
            LightingState::HAlt {
                colors: ["pink".into(), "cyan".into()],
                brightness: 2,
            }
        );
    }

    #[test]
    fn legacy_color_pair_fields() {
        assert_eq!(
            parse("[lighting]\nmode = \"h-alt\"\ncolor_a = \"pink\"\ncolor_b = \"cyan\"\nbrightness = 2\n"),
            LightingState::HAlt {
                colors: ["pink".into(), "cyan".into()],
                brightness: 2,
            }
        );
        assert_eq!(
            parse("[lighting]\nmode = \"v-alt\"\ncolor_a = \"red\"\ncolor_b = \"blue\"\n"),
            LightingState::VAlt {
                colors: ["red".into(), "blue".into()],
                brightness: 4,
            }
        );
    }

    #[test]
    fn half_a_color_pair_is_rejected() {
        let toml = "[lighting]\nmode = \"h-alt\"\ncolor_a = \"pink\"\n";
        assert!(toml::from_str::<Wrapper>(toml).is_err());
        let toml = "[lighting]\nmode = \"h_alt\"\ncolors = [\"red\", \"blue\"]\ncolor_b = \"cyan\"\n";
        assert!(toml::from_str::<Wrapper>(toml).is_err());
    }

    #[test]
    fn effect_replay_sends_one_packet() {
        let state = LightingState::Effect {
            effect: "breathingr".into(),
            speed: 1,
            brightness: 2,
        };
        assert_eq!(
            replay(&state),
            vec![Transfer::Control([0x08, 0x02, 0x02, 0x01, 0x16, 0x01, 0x00, 0x00])]
        );
    }

    #[test]
    fn color_replay_sets_saved_brightness() {
        let state = LightingState::Color {
            color: "cyan".into(),
            brightness: 1,
        };
        let transfers = replay(&state);
        assert_eq!(transfers.len(), 3);
        assert_eq!(
            transfers[0],
            Transfer::Control([0x08, 0x02, 0x33, 0x00, 0x08, 0x00, 0x00, 0x00])
        );
    }

    #[test]
    fn off_replay() {
        assert_eq!(
            replay(&LightingState::Off { brightness: 3 }),
            vec![Transfer::Control([0x08, 0x01, 0, 0, 0, 0, 0, 0])]
        );
    }

    #[test]
    fn invalid_saved_state_fails_before_sending() {
        let mut kb = Ite8291::with_transport(Recorder::new());
        let state = LightingState::HAlt {
            colors: ["red".into(), "mauve".into()],
            brightness: 3,
        };
        assert!(state.apply(&mut kb).is_err());
        let state = LightingState::Color {
            color: "blue".into(),
            brightness: 7,
        };
        assert!(state.apply(&mut kb).is_err());
        assert!(kb.transport().transfers().is_empty());
    }
}
