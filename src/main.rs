use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use bpaf::{Bpaf, Parser};
use ite8291::record::{Recorder, Transfer};
use ite8291::{colors, compat, Brightness, Effect, Ite8291, Speed, Tint};
use xmg_kb_core::Transport;

use crate::config::Config;
use crate::lighting::LightingState;

mod config;
mod lighting;
mod lock;
mod menu;

/// Brightness used by `--style` when none is given
const DEFAULT_EFFECT_BRIGHTNESS: u8 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Action {
    /// Interactive menu (default)
    Menu,
    Status,
    List,
    Restore,
    Off,
    Style(String),
    Color(String),
    HAlt([String; 2]),
    VAlt([String; 2]),
}

fn brightness() -> impl Parser<Option<u8>> {
    bpaf::short('b')
        .long("brightness")
        .help("Brightness (1-4)")
        .argument::<u8>("LEVEL")
        .guard(
            |b| (Brightness::MIN.level()..=Brightness::MAX.level()).contains(b),
            "brightness must be between 1 and 4",
        )
        .optional()
}

fn speed() -> impl Parser<Option<u8>> {
    bpaf::long("speed")
        .help("Effect speed (1=fast, 10=slow)")
        .argument::<u8>("SPEED")
        .guard(
            |s| (Speed::MIN.value()..=Speed::MAX.value()).contains(s),
            "speed must be between 1 and 10",
        )
        .optional()
}

/// Flag followed by two color names, e.g. `-H pink cyan`
fn color_pair(short: char, long: &'static str, help: &'static str) -> impl Parser<[String; 2]> {
    let flag = bpaf::short(short).long(long).help(help).req_flag(());
    let a = bpaf::positional::<String>("COLOR_A");
    let b = bpaf::positional::<String>("COLOR_B");
    bpaf::construct!(flag, a, b)
        .adjacent()
        .map(|((), a, b)| [a, b])
}

fn action() -> impl Parser<Action> {
    let status = bpaf::long("status")
        .help("Show the saved configuration")
        .req_flag(Action::Status);
    let list = bpaf::long("list")
        .help("List available colors and effects")
        .req_flag(Action::List);
    let restore = bpaf::long("restore")
        .help("Restore the last saved settings (for autostart)")
        .req_flag(Action::Restore);
    let disable = bpaf::short('d')
        .long("disable")
        .help("Turn off the backlight")
        .req_flag(Action::Off);
    let style = bpaf::short('s')
        .long("style")
        .help("Activate a light effect, optionally tinted (e.g. wave, breathingb)")
        .argument::<String>("EFFECT")
        .map(Action::Style);
    let color = bpaf::short('c')
        .long("color")
        .help("Single color for all keys")
        .argument::<String>("COLOR")
        .map(Action::Color);
    let h_alt = color_pair('H', "h-alt", "Horizontally alternating colors").map(Action::HAlt);
    let v_alt = color_pair('V', "v-alt", "Vertically alternating colors").map(Action::VAlt);

    bpaf::construct!([status, list, restore, disable, style, color, h_alt, v_alt])
        .fallback(Action::Menu)
}

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version, descr(env!("CARGO_PKG_DESCRIPTION")))]
struct Cli {
    /// Path to the config file
    #[bpaf(long, argument("PATH"))]
    config: Option<PathBuf>,
    /// Timeout for a single usb transfer, e.g. 500ms. Overrides the config file.
    #[bpaf(long, argument("DURATION"))]
    timeout: Option<humantime::Duration>,
    /// Print the usb transfers instead of sending them
    #[bpaf(long("dry-run"))]
    dry_run: bool,
    /// Log every usb transfer
    #[bpaf(short, long)]
    verbose: bool,
    #[bpaf(external)]
    brightness: Option<u8>,
    #[bpaf(external)]
    speed: Option<u8>,
    #[bpaf(external)]
    action: Action,
}

fn init_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print the saved lighting without touching the keyboard
fn print_status(path: &Path) -> Result<(), Box<dyn Error>> {
    match Config::load_or_default(path)?.lighting {
        Some(state) => {
            println!("saved configuration: {state}");
            print!("{}", toml::to_string_pretty(&state)?);
        },
        None => println!("no configuration saved."),
    }
    Ok(())
}

fn print_list() {
    println!("colors:");
    for name in colors::names() {
        if compat::supports_effects(name) {
            println!("  {name}");
        } else {
            println!("  {name} (static only)");
        }
    }
    println!("\neffects:");
    for effect in Effect::ALL {
        if compat::uses_color(effect) {
            println!("  {effect}");
        } else {
            println!("  {effect} (ignores tint)");
        }
    }
    println!("\neffect tints (append to the effect name, e.g. breathingb):");
    let tints: Vec<String> = Tint::ALL
        .iter()
        .map(|t| format!("{}={t:?}", t.letter()).to_lowercase())
        .collect();
    println!("  {}", tints.join(" "));
}

/// Run the action against a recording transport. Reads the config but never writes it.
fn dry_run(cli: &Cli, config_path: &Path) -> Result<Vec<Transfer>, Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let mut keyboard = Ite8291::with_transport(Recorder::new());
    execute(&mut keyboard, cli, &config)?;
    Ok(keyboard.into_transport().into_transfers())
}

/// Run the requested action on an open session.
/// Returns the lighting to persist, if it changed.
fn execute<T: Transport>(
    keyboard: &mut Ite8291<T>,
    cli: &Cli,
    config: &Config,
) -> Result<Option<LightingState>, Box<dyn Error>> {
    let brightness = cli.brightness.unwrap_or(Brightness::DEFAULT.level());
    let state = match &cli.action {
        Action::Status | Action::List => return Ok(None),
        Action::Menu => {
            if let Some(level) = cli.brightness {
                keyboard.set_brightness(level)?;
                println!("brightness set to {level}");
                println!("run 'xmg-kb' without arguments for the interactive menu.");
                return Ok(None);
            }
            return menu::run(keyboard, &mut io::stdin().lock(), &mut io::stdout());
        },
        Action::Restore => {
            let state = config
                .lighting
                .as_ref()
                .ok_or("no saved configuration found")?;
            state.apply(keyboard)?;
            println!("restored {state}");
            return Ok(None);
        },
        Action::Off => LightingState::Off { brightness },
        Action::Style(effect) => LightingState::Effect {
            effect: effect.clone(),
            speed: cli.speed.unwrap_or(Speed::DEFAULT.value()),
            brightness: cli.brightness.unwrap_or(DEFAULT_EFFECT_BRIGHTNESS),
        },
        Action::Color(color) => LightingState::Color {
            color: color.clone(),
            brightness,
        },
        Action::HAlt(colors) => LightingState::HAlt {
            colors: colors.clone(),
            brightness,
        },
        Action::VAlt(colors) => LightingState::VAlt {
            colors: colors.clone(),
            brightness,
        },
    };
    state.apply(keyboard)?;
    println!("applied {state}");
    Ok(Some(state))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = cli().run();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path().ok_or("could not determine config directory")?,
    };

    match cli.action {
        Action::Status => return print_status(&config_path),
        Action::List => {
            print_list();
            return Ok(());
        },
        _ => {},
    }

    if cli.dry_run {
        for transfer in dry_run(&cli, &config_path)? {
            println!("{transfer}");
        }
        return Ok(());
    }

    let mut config = Config::load_or_create(&config_path)?;

    let lock_dir = config_path
        .parent()
        .ok_or("config path has no parent directory")?;
    let _lock = lock::Lock::acquire(lock_dir)?;

    let timeout = cli.timeout.map_or(config.device.timeout, Into::into);
    let mut keyboard = Ite8291::open_with(&config.device.board_info(), timeout)?;
    let applied = execute(&mut keyboard, &cli, &config)?;
    keyboard.close()?;

    if let Some(state) = applied {
        config.lighting = Some(state);
        config.save(&config_path)?;
        println!("settings saved (restore with --restore)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        cli().run_inner(args).unwrap()
    }

    #[test]
    fn no_arguments_opens_menu() {
        assert_eq!(parse(&[]).action, Action::Menu);
    }

    #[test]
    fn color_pairs() {
        let cli = parse(&["-H", "pink", "cyan", "-b", "2"]);
        assert_eq!(cli.action, Action::HAlt(["pink".into(), "cyan".into()]));
        assert_eq!(cli.brightness, Some(2));
        let cli = parse(&["--v-alt", "red", "blue"]);
        assert_eq!(cli.action, Action::VAlt(["red".into(), "blue".into()]));
    }

    #[test]
    fn ranges_are_checked() {
        assert!(cli().run_inner(&["-c", "red", "-b", "5"]).is_err());
        assert!(cli().run_inner(&["-s", "wave", "--speed", "0"]).is_err());
        assert!(cli().run_inner(&["-c", "red", "-d"]).is_err());
    }

    #[test]
    fn style_defaults() {
        let cli = parse(&["-s", "rainbow"]);
        let mut keyboard = Ite8291::with_transport(Recorder::new());
        let state = execute(&mut keyboard, &cli, &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            state,
            LightingState::Effect {
                effect: "rainbow".into(),
                speed: 5,
                brightness: 3,
            }
        );
        assert_eq!(
            keyboard.into_transport().into_transfers(),
            vec![Transfer::Control([0x08, 0x02, 0x05, 0x05, 0x24, 0x00, 0x00, 0x00])]
        );
    }

    #[test]
    fn restore_replays_saved_state() {
        let config = Config {
            lighting: Some(LightingState::Off { brightness: 2 }),
            ..Default::default()
        };
        let mut keyboard = Ite8291::with_transport(Recorder::new());
        let applied = execute(&mut keyboard, &parse(&["--restore"]), &config).unwrap();
        assert_eq!(applied, None);
        assert_eq!(keyboard.transport().transfers().len(), 1);

        let mut keyboard = Ite8291::with_transport(Recorder::new());
        assert!(execute(&mut keyboard, &parse(&["--restore"]), &Config::default()).is_err());
    }

    #[test]
    fn unknown_color_sends_nothing() {
        let mut keyboard = Ite8291::with_transport(Recorder::new());
        let cli = parse(&["-c", "mauve", "-b", "2"]);
        assert!(execute(&mut keyboard, &cli, &Config::default()).is_err());
        assert!(keyboard.transport().transfers().is_empty());
    }

    #[test]
    fn dry_run_leaves_config_untouched() {
        let dir = std::env::temp_dir().join(format!("xmg-kb-dry-run-{}", std::process::id()));
        let path = dir.join("config.toml");
        let cli = parse(&["--dry-run", "-d"]);
        assert!(cli.dry_run);

        let transfers = dry_run(&cli, &path).unwrap();
        assert_eq!(transfers, vec![Transfer::Control([0x08, 0x01, 0, 0, 0, 0, 0, 0])]);
        assert!(!path.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn render_docs() {
        let md = cli().header("").render_markdown(env!("CARGO_PKG_NAME"));
        for flag in ["--color", "--h-alt", "--style", "--restore", "--dry-run"] {
            assert!(md.contains(flag), "docs should mention {flag}");
        }
    }
}
