//! Blocktui: falling-block puzzle game in the terminal.

mod app;
mod game;
mod input;
mod piece;
mod playfield;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Smallest and largest playfield side accepted from the command line.
pub const MIN_FIELD_SIDE: u16 = 4;
pub const MAX_FIELD_SIDE: u16 = 40;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub drop_interval_ms: u64,
    pub seed: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "playfield width must be between {min} and {max}, got {0}",
        min = MIN_FIELD_SIDE,
        max = MAX_FIELD_SIDE
    )]
    Width(u16),
    #[error(
        "playfield height must be between {min} and {max}, got {0}",
        min = MIN_FIELD_SIDE,
        max = MAX_FIELD_SIDE
    )]
    Height(u16),
    #[error("drop interval must be at least 1 ms")]
    DropInterval,
}

impl TryFrom<&Args> for GameConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let side = MIN_FIELD_SIDE..=MAX_FIELD_SIDE;
        if !side.contains(&args.width) {
            return Err(ConfigError::Width(args.width));
        }
        if !side.contains(&args.height) {
            return Err(ConfigError::Height(args.height));
        }
        if args.drop_interval_ms == 0 {
            return Err(ConfigError::DropInterval);
        }
        Ok(Self {
            width: args.width as usize,
            height: args.height as usize,
            drop_interval_ms: args.drop_interval_ms,
            seed: args.seed.unwrap_or_else(rand::random),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::try_from(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette)?;
    let mut app = App::new(config, theme, args.no_menu);
    app.run()?;
    Ok(())
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktui",
    version,
    about = "Falling-block puzzle in the terminal. Fill whole rows to clear them.",
    long_about = "Blocktui is a classic falling-block puzzle for the terminal.\n\n\
        Steer the falling piece, rotate it, and fill complete rows to clear them. \
        The game ends when a new piece has no room to appear.\n\n\
        CONTROLS:\n  \
        Left / a    Move left     Right / d   Move right\n  \
        Down / s    Soft drop     Up / w      Rotate CW\n  \
        q           Rotate CCW    p           Pause\n  \
        Enter       Start / back  Esc         Quit"
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value = "12", value_name = "COLS")]
    pub width: u16,

    /// Playfield height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Time between automatic drops, in milliseconds.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Seed for the piece sequence (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses the classic colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Skip the start screen and begin playing immediately.
    #[arg(long)]
    pub no_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["blocktui"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_classic_field() {
        let config = GameConfig::try_from(&args(&["--seed", "5"])).unwrap();
        assert_eq!(
            config,
            GameConfig {
                width: 12,
                height: 20,
                drop_interval_ms: 1000,
                seed: 5,
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_dimensions() {
        assert_eq!(
            GameConfig::try_from(&args(&["--width", "3"])),
            Err(ConfigError::Width(3))
        );
        assert_eq!(
            GameConfig::try_from(&args(&["--height", "41"])),
            Err(ConfigError::Height(41))
        );
    }

    #[test]
    fn test_rejects_zero_drop_interval() {
        assert_eq!(
            GameConfig::try_from(&args(&["--drop-interval-ms", "0"])),
            Err(ConfigError::DropInterval)
        );
    }

    #[test]
    fn test_palette_aliases() {
        assert_eq!(args(&["--palette", "contrast"]).palette, Palette::HighContrast);
        assert_eq!(args(&["--palette", "colourblind"]).palette, Palette::Colorblind);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
