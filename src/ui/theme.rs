use std::fs;
use std::path::PathBuf;

use log::warn;
use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Hex strings as written in the theme files. Keys missing from a file keep
/// the catppuccin value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub option_selected_bg: String,
    pub code_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// Looks in `<config>/aptiq/themes/` first, then the bundled set.
    pub fn load(name: &str) -> Option<Self> {
        Self::load_user(name).or_else(|| Self::load_bundled(name))
    }

    fn user_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aptiq").join("themes"))
    }

    fn load_user(name: &str) -> Option<Self> {
        let path = Self::user_dir()?.join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!("ignoring theme {}: {e}", path.display());
                None
            }
        }
    }

    fn load_bundled(name: &str) -> Option<Self> {
        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(&file.data).ok()?;
        toml::from_str(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load_bundled(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "fallback".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            bg: hex("#1e1e2e"),
            fg: hex("#cdd6f4"),
            text_dim: hex("#6c7086"),
            accent: hex("#89b4fa"),
            border: hex("#45475a"),
            border_focused: hex("#89b4fa"),
            header_bg: hex("#313244"),
            header_fg: hex("#cdd6f4"),
            option_selected_bg: hex("#45475a"),
            code_fg: hex("#fab387"),
            bar_filled: hex("#89b4fa"),
            bar_empty: hex("#313244"),
            error: hex("#f38ba8"),
            warning: hex("#f9e2af"),
            success: hex("#a6e3a1"),
        }
    }
}

/// `#rrggbb` to an RGB color. Anything else is rejected.
pub fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

macro_rules! color_accessors {
    ($($field:ident),* $(,)?) => {
        impl ThemeColors {
            $(
                pub fn $field(&self) -> Color {
                    parse_hex(&self.$field).unwrap_or(Color::Reset)
                }
            )*
        }
    };
}

color_accessors!(
    bg,
    fg,
    text_dim,
    accent,
    border,
    border_focused,
    header_bg,
    header_fg,
    option_selected_bg,
    code_fg,
    bar_filled,
    bar_empty,
    error,
    warning,
    success,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&DEFAULT_THEME.to_string()));
        for name in names {
            assert!(Theme::load_bundled(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(parse_hex("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex("zzz"), None);
        assert_eq!(parse_hex("#12345g"), None);
    }

    #[test]
    fn invalid_hex_renders_as_terminal_default() {
        let colors = ThemeColors {
            accent: "blue".into(),
            ..ThemeColors::default()
        };
        assert_eq!(colors.accent(), Color::Reset);
    }

    #[test]
    fn partial_theme_fills_missing_colors() {
        let theme: Theme = toml::from_str(
            "name = \"mine\"\n[colors]\naccent = \"#010203\"\n",
        )
        .unwrap();
        assert_eq!(theme.colors.accent(), Color::Rgb(1, 2, 3));
        assert_eq!(theme.colors.bg, ThemeColors::default().bg);
    }
}
