//! Which colors and effects can be combined.
//!
//! The firmware only knows nine effect tints, so a static color is mapped to
//! the closest tint letter when an effect is requested in that color. Colors
//! without a tint fall back to the firmware's rainbow rendering.

use xmg_kb_core::{KeyboardError, Result};

use crate::colors;
use crate::effect::{Effect, EffectToken, Tint};

/// Colors that render wrong under any effect and must stay static
pub static COLORS_WITHOUT_EFFECT_SUPPORT: &[&str] =
    &["red", "white", "turquoise", "lavender", "coral", "salmon"];

/// Effects that ignore the color entirely
pub static EFFECTS_WITHOUT_COLOR: &[Effect] = &[Effect::Rainbow, Effect::Wave, Effect::Marquee];

/// Color name to effect tint. `None` renders the effect as rainbow.
static COLOR_TINTS: &[(&str, Option<Tint>)] = &[
    ("red", Some(Tint::Red)),
    ("orange", Some(Tint::Orange)),
    ("yellow", Some(Tint::Yellow)),
    ("green", Some(Tint::Green)),
    ("darkgreen", Some(Tint::Green)),
    ("cyan", Some(Tint::Teal)),
    ("turquoise", Some(Tint::Teal)),
    ("blue", Some(Tint::Blue)),
    ("purple", Some(Tint::Purple)),
    ("magenta", Some(Tint::Purple)),
    ("violet", Some(Tint::Violet)),
    ("pink", Some(Tint::Pink)),
    ("hotpink", Some(Tint::Pink)),
    ("lavender", Some(Tint::Violet)),
    ("coral", Some(Tint::Orange)),
    ("salmon", Some(Tint::Orange)),
    ("white", None),
    ("rainbow", None),
];

/// Whether a color may be combined with an effect
pub fn supports_effects(color: &str) -> bool {
    !COLORS_WITHOUT_EFFECT_SUPPORT
        .iter()
        .any(|c| c.eq_ignore_ascii_case(color))
}

/// Whether an effect takes a tint suffix
pub fn uses_color(effect: Effect) -> bool {
    !EFFECTS_WITHOUT_COLOR.contains(&effect)
}

/// Tint letter for a color, if the firmware has one
pub fn tint_for_color(color: &str) -> Option<Tint> {
    COLOR_TINTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(color))
        .and_then(|(_, tint)| *tint)
}

/// Compose the effect token for rendering `effect` in `color`.
///
/// Effects that ignore color get no suffix. Colors without a tint yield a
/// bare token, which the firmware renders as rainbow.
pub fn effect_token(effect: Effect, color: &str) -> Result<EffectToken> {
    colors::lookup(color)?;
    if !supports_effects(color) {
        return Err(KeyboardError::IncompatibleColor(color.to_string()));
    }
    let tint = if uses_color(effect) {
        tint_for_color(color)
    } else {
        None
    };
    Ok(EffectToken::new(effect, tint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_color_has_a_tint_entry() {
        for name in colors::names() {
            assert!(
                COLOR_TINTS.iter().any(|(c, _)| *c == name),
                "{name} missing from tint table"
            );
        }
    }

    #[test]
    fn incompatible_colors() {
        for color in ["red", "White", "turquoise", "lavender", "coral", "salmon"] {
            assert!(!supports_effects(color));
            assert!(matches!(
                effect_token(Effect::Breathing, color),
                Err(KeyboardError::IncompatibleColor(_))
            ));
        }
        assert!(supports_effects("cyan"));
    }

    #[test]
    fn tinted_tokens() {
        let token = effect_token(Effect::Breathing, "cyan").unwrap();
        assert_eq!(token.to_string(), "breathingt");
        let token = effect_token(Effect::ReactiveRipple, "hotpink").unwrap();
        assert_eq!(token.to_string(), "reactiveripplek");
    }

    #[test]
    fn colorless_effects_get_no_suffix() {
        for effect in [Effect::Rainbow, Effect::Wave, Effect::Marquee] {
            assert!(!uses_color(effect));
            assert_eq!(effect_token(effect, "blue").unwrap().tint, None);
        }
    }

    #[test]
    fn untinted_color_falls_back_to_rainbow() {
        assert_eq!(tint_for_color("rainbow"), None);
        let token = effect_token(Effect::Raindrop, "rainbow").unwrap();
        assert_eq!(token.to_string(), "raindrop");
    }

    #[test]
    fn unknown_color() {
        assert!(matches!(
            effect_token(Effect::Aurora, "mauve"),
            Err(KeyboardError::UnknownColor(_))
        ));
    }
}
