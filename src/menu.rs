//! Interactive menu shown when xmg-kb runs without arguments.
//!
//! Prompts clamp numeric answers into range and fall back to defaults on
//! empty input. The encoder itself never clamps.

use std::error::Error;
use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use ite8291::{colors, compat, Brightness, Effect, Ite8291, Speed};
use xmg_kb_core::Transport;

use crate::lighting::LightingState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Horizontal,
    Vertical,
}

/// Two-color combos listed after the plain colors
struct Preset {
    name: &'static str,
    colors: [&'static str; 2],
    layout: Layout,
}

static PRESETS: &[Preset] = &[
    Preset {
        name: "h-pink-cyan",
        colors: ["pink", "cyan"],
        layout: Layout::Horizontal,
    },
    Preset {
        name: "v-red-blue",
        colors: ["red", "blue"],
        layout: Layout::Vertical,
    },
];

const RULE: &str = "════════════════════════════════════════════════════════════════";

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", RULE.magenta())?;
    writeln!(out, "{}", format!("  {title}").magenta())?;
    writeln!(out, "{}", RULE.magenta())
}

/// Print a prompt and read one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> io::Result<Option<String>> {
    write!(out, "\n{} ", format!("➤ {text}").cyan())?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn is_number(answer: &str) -> bool {
    !answer.is_empty() && answer.chars().all(|c| c.is_ascii_digit())
}

/// Menu entry number; signs and whitespace are not numbers
fn number(answer: &str) -> Option<usize> {
    is_number(answer).then(|| answer.parse().ok()).flatten()
}

/// Numeric answer clamped to `min..=max`, `default` when not a number
fn clamped(answer: &str, default: u8, min: u8, max: u8) -> u8 {
    if !is_number(answer) {
        return default;
    }
    answer
        .parse::<u32>()
        .map_or(u32::from(max), |n| n.clamp(u32::from(min), u32::from(max))) as u8
}

fn ask_brightness(
    input: &mut impl BufRead,
    out: &mut impl Write,
    title: &str,
) -> io::Result<u8> {
    section(out, title)?;
    writeln!(out, "   1 = dark  │  2 = low  │  3 = medium  │  4 = bright")?;
    let answer = prompt(input, out, "Brightness (1-4, Enter = 4):")?.unwrap_or_default();
    let brightness = clamped(
        &answer,
        Brightness::DEFAULT.level(),
        Brightness::MIN.level(),
        Brightness::MAX.level(),
    );
    writeln!(out, "{}", format!("   ✓ Brightness: {brightness}").green())?;
    Ok(brightness)
}

fn ask_speed(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<u8> {
    section(out, "STEP 3: Choose speed")?;
    writeln!(out, "   1 = fastest  │  5 = normal  │  10 = slowest")?;
    let answer = prompt(input, out, "Speed (1-10, Enter = 5):")?.unwrap_or_default();
    let speed = clamped(
        &answer,
        Speed::DEFAULT.value(),
        Speed::MIN.value(),
        Speed::MAX.value(),
    );
    writeln!(out, "{}", format!("   ✓ Speed: {speed}").green())?;
    Ok(speed)
}

/// Optional effect for a color that supports effects
fn ask_effect(
    input: &mut impl BufRead,
    out: &mut impl Write,
    color: &str,
) -> io::Result<Option<Effect>> {
    section(out, "STEP 2: Choose an effect (optional)")?;
    if compat::tint_for_color(color).is_none() {
        writeln!(
            out,
            "   {}",
            format!("⚠ Note: '{color}' uses rainbow for effects").yellow()
        )?;
    }
    writeln!(out, "   {} No effect {}", " 0.".cyan(), "(static color)".dim())?;
    for (i, effect) in Effect::ALL.iter().enumerate() {
        let note = if compat::uses_color(*effect) {
            String::new()
        } else {
            format!(" {}", "(ignores color choice)".dim())
        };
        writeln!(out, "   {} {:<18}{note}", format!("{:2}.", i + 1).cyan(), effect.name())?;
    }

    let answer = prompt(
        input,
        out,
        &format!("Choose effect (0-{}, Enter = 0):", Effect::ALL.len()),
    )?
    .unwrap_or_default();
    let effect = match number(&answer) {
        Some(n) => n.checked_sub(1).and_then(|i| Effect::ALL.get(i).copied()),
        None => answer.parse::<Effect>().ok(),
    };
    match effect {
        Some(effect) => writeln!(out, "{}", format!("   ✓ Effect: {effect}").green())?,
        None => writeln!(out, "{}", "   ✓ No effect (static color)".green())?,
    }
    Ok(effect)
}

/// Run the menu once. Returns the applied lighting, or `None` when the user quit.
pub fn run<T: Transport>(
    keyboard: &mut Ite8291<T>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<LightingState>, Box<dyn Error>> {
    writeln!(out, "\n{}", "  XMG KEYBOARD RGB CONTROL".white().bold())?;
    writeln!(out, "\n{}", "Quick commands:".green())?;
    writeln!(
        out,
        "   {} {}",
        "xmg-kb -c cyan -b 4".yellow(),
        "for cyan with max brightness".dim()
    )?;
    writeln!(
        out,
        "   {} {}",
        "xmg-kb -s rainbow -b 4".yellow(),
        "for rainbow effect".dim()
    )?;

    section(out, "STEP 1: Choose a color")?;
    let entries: Vec<&'static str> = colors::names()
        .chain(PRESETS.iter().map(|p| p.name))
        .collect();
    for (i, name) in entries.iter().enumerate() {
        write!(out, "   {} {name:<15}", format!("{:2}.", i + 1).cyan())?;
        if (i + 1) % 4 == 0 {
            writeln!(out)?;
        }
    }
    if entries.len() % 4 != 0 {
        writeln!(out)?;
    }
    let off_number = entries.len() + 1;
    writeln!(
        out,
        "\n   {} {}",
        format!("{off_number:2}. off").red(),
        "(turn off backlight)".dim()
    )?;

    let Some(choice) = prompt(input, out, "Choose color (number/name, q = quit):")? else {
        return Ok(None);
    };
    if matches!(choice.as_str(), "q" | "quit" | "exit") {
        writeln!(out, "{}", "Goodbye!".dim())?;
        return Ok(None);
    }
    if choice == "off" || number(&choice) == Some(off_number) {
        keyboard.turn_off()?;
        writeln!(out, "{}", "✓ Keyboard backlight turned off".green())?;
        let brightness = keyboard
            .brightness()
            .unwrap_or(Brightness::DEFAULT)
            .level();
        return Ok(Some(LightingState::Off { brightness }));
    }

    let selected = match number(&choice) {
        Some(n) => n.checked_sub(1).and_then(|i| entries.get(i).copied()),
        None => entries.iter().find(|e| **e == choice).copied(),
    };
    let Some(selected) = selected else {
        writeln!(out, "{}", "✗ Invalid selection!".red())?;
        return Ok(None);
    };
    writeln!(out, "{}", format!("   ✓ Color: {selected}").green())?;

    if let Some(preset) = PRESETS.iter().find(|p| p.name == selected) {
        let brightness = ask_brightness(input, out, "Choose brightness")?;
        let colors = preset.colors.map(String::from);
        let state = match preset.layout {
            Layout::Horizontal => LightingState::HAlt { colors, brightness },
            Layout::Vertical => LightingState::VAlt { colors, brightness },
        };
        state.apply(keyboard)?;
        writeln!(out, "{} {state}", "✓ Done!".green().bold())?;
        return Ok(Some(state));
    }

    let (effect, speed) = if compat::supports_effects(selected) {
        match ask_effect(input, out, selected)? {
            Some(effect) => (Some(effect), ask_speed(input, out)?),
            None => (None, Speed::DEFAULT.value()),
        }
    } else {
        writeln!(
            out,
            "\n{}",
            format!("⚠ '{selected}' shows wrong colors with effects, skipping effect selection")
                .yellow()
        )?;
        (None, Speed::DEFAULT.value())
    };

    let step = if effect.is_some() { 4 } else { 3 };
    let brightness = ask_brightness(input, out, &format!("STEP {step}: Choose brightness"))?;

    let state = match effect {
        None => LightingState::Color {
            color: selected.to_string(),
            brightness,
        },
        Some(effect) => {
            let token = compat::effect_token(effect, selected)?;
            if compat::uses_color(effect) && token.tint.is_none() {
                writeln!(
                    out,
                    "{}",
                    format!("   '{selected}' not available for effects, using rainbow").dim()
                )?;
            }
            LightingState::Effect {
                effect: token.to_string(),
                speed,
                brightness,
            }
        },
    };
    state.apply(keyboard)?;
    writeln!(out, "{} {state}", "✓ Done!".green().bold())?;
    Ok(Some(state))
}
