//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Theme keys for the seven piece colours, in fill-ID order (1..=7).
const PIECE_KEYS: [&str; 7] = [
    "piece_i", "piece_l", "piece_j", "piece_o", "piece_z", "piece_s", "piece_t",
];

/// Piece palette and UI colours loaded from a theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Piece colours indexed by fill ID - 1.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (key hints).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// The arcade colours: one bright hue per piece on black.
    pub fn classic() -> Self {
        Self {
            pieces: [
                Color::Rgb(0xFF, 0x0D, 0x72),
                Color::Rgb(0x0D, 0xC2, 0xFF),
                Color::Rgb(0x0D, 0xFF, 0x72),
                Color::Rgb(0xF5, 0x38, 0xFF),
                Color::Rgb(0xFF, 0x8E, 0x0D),
                Color::Rgb(0xFF, 0xE1, 0x38),
                Color::Rgb(0x38, 0x77, 0xFF),
            ],
            bg: Color::Rgb(0x00, 0x00, 0x00),
            div_line: Color::Rgb(0x5C, 0x63, 0x70),
            main_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
            title: Color::Rgb(0xFF, 0xE1, 0x38),
            inactive_fg: Color::Rgb(0x8A, 0x8F, 0x98),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the classic colours if path is None or the file does not exist.
    /// `palette` then overrides the piece colours for HighContrast / Colorblind.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::classic(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0x00, 0x44, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                ];
            }
            Palette::Colorblind => {
                // Okabe-Ito hues, minus black.
                self.pieces = [
                    Color::Rgb(0x56, 0xB4, 0xE9),
                    Color::Rgb(0xE6, 0x9F, 0x00),
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0xCC, 0x79, 0xA7),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let fallback = Self::classic();
        let mut pieces = fallback.pieces;
        for (slot, key) in pieces.iter_mut().zip(PIECE_KEYS) {
            if let Some(c) = get(key) {
                *slot = c;
            }
        }
        Self {
            pieces,
            bg: get("main_bg").unwrap_or(fallback.bg),
            div_line: get("div_line").unwrap_or(fallback.div_line),
            main_fg: get("main_fg").unwrap_or(fallback.main_fg),
            title: get("title").unwrap_or(fallback.title),
            inactive_fg: get("inactive_fg").unwrap_or(fallback.inactive_fg),
        }
    }

    /// Colour for a playfield cell ID; 0 (empty) is the background.
    #[inline]
    pub fn cell_color(&self, id: u8) -> Color {
        match id {
            0 => self.bg,
            n => self.pieces[(n as usize - 1) % 7],
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
