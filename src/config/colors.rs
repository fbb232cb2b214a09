//! Color configuration for the TUI.

use std::collections::BTreeMap;

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

use crate::domain::Theme;

/// One palette. The dashboard carries a light and a dark one.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    pub active_border: Color,
    pub inactive_border: Color,
    pub selection_bg_active: Color,
    pub selection_fg_active: Color,
    pub selection_bg_inactive: Color,
    pub selection_fg_inactive: Color,
    pub text: Color,
    pub muted: Color,
    pub article: Color,
    pub movie: Color,
    pub post: Color,
    pub favorite: Color,
    pub link: Color,
    pub status_fg: Color,
    pub status_bg: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
    pub warning: Color,
}

impl ColorConfig {
    pub fn light() -> Self {
        Self {
            active_border: Color::Blue,
            inactive_border: Color::Gray,
            selection_bg_active: Color::Blue,
            selection_fg_active: Color::White,
            selection_bg_inactive: Color::Gray,
            selection_fg_inactive: Color::Black,
            text: Color::Black,
            muted: Color::DarkGray,
            article: Color::Blue,
            movie: Color::Magenta,
            post: Color::Green,
            favorite: Color::Red,
            link: Color::Blue,
            status_fg: Color::Black,
            status_bg: Color::Gray,
            success: Color::Green,
            error: Color::Red,
            info: Color::Blue,
            warning: Color::Yellow,
        }
    }

    pub fn dark() -> Self {
        Self {
            active_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            selection_bg_active: Color::Cyan,
            selection_fg_active: Color::Black,
            selection_bg_inactive: Color::DarkGray,
            selection_fg_inactive: Color::White,
            text: Color::White,
            muted: Color::Gray,
            article: Color::LightBlue,
            movie: Color::LightMagenta,
            post: Color::LightGreen,
            favorite: Color::LightRed,
            link: Color::LightBlue,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
            success: Color::LightGreen,
            error: Color::LightRed,
            info: Color::LightCyan,
            warning: Color::LightYellow,
        }
    }

    fn set(&mut self, name: &str, color: Color) -> Result<(), String> {
        let slot = match name {
            "active_border" => &mut self.active_border,
            "inactive_border" => &mut self.inactive_border,
            "selection_bg_active" => &mut self.selection_bg_active,
            "selection_fg_active" => &mut self.selection_fg_active,
            "selection_bg_inactive" => &mut self.selection_bg_inactive,
            "selection_fg_inactive" => &mut self.selection_fg_inactive,
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "article" => &mut self.article,
            "movie" => &mut self.movie,
            "post" => &mut self.post,
            "favorite" => &mut self.favorite,
            "link" => &mut self.link,
            "status_fg" => &mut self.status_fg,
            "status_bg" => &mut self.status_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            "info" => &mut self.info,
            "warning" => &mut self.warning,
            _ => return Err(format!("Unknown color key: {}", name)),
        };
        *slot = color;
        Ok(())
    }
}

/// `[colors.light]` and `[colors.dark]`. Keys left out of a table keep that
/// palette's own default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    #[serde(deserialize_with = "deserialize_light")]
    pub light: ColorConfig,
    #[serde(deserialize_with = "deserialize_dark")]
    pub dark: ColorConfig,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            light: ColorConfig::light(),
            dark: ColorConfig::dark(),
        }
    }
}

impl ThemeColors {
    pub fn palette(&self, theme: Theme) -> &ColorConfig {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

fn deserialize_light<'de, D>(deserializer: D) -> Result<ColorConfig, D::Error>
where
    D: Deserializer<'de>,
{
    overlay(ColorConfig::light(), deserializer)
}

fn deserialize_dark<'de, D>(deserializer: D) -> Result<ColorConfig, D::Error>
where
    D: Deserializer<'de>,
{
    overlay(ColorConfig::dark(), deserializer)
}

fn overlay<'de, D>(mut base: ColorConfig, deserializer: D) -> Result<ColorConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    for (name, value) in raw {
        let color = parse_color_string(&value).map_err(de::Error::custom)?;
        base.set(&name, color).map_err(de::Error::custom)?;
    }
    Ok(base)
}

/// Parse a color string into a ratatui Color.
///
/// Supports:
/// - Named colors: "Black", "Red", "Green", "Yellow", "Blue", "Magenta", "Cyan", "Gray",
///   "DarkGray", "LightRed", "LightGreen", "LightYellow", "LightBlue", "LightMagenta",
///   "LightCyan", "White", "Reset"
/// - Hex colors: "#RRGGBB" or "#RGB"
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if s.starts_with('#') {
        return parse_hex_color(s);
    }

    match s.to_lowercase().as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "gray" | "grey" => Ok(Color::Gray),
        "darkgray" | "darkgrey" => Ok(Color::DarkGray),
        "lightred" => Ok(Color::LightRed),
        "lightgreen" => Ok(Color::LightGreen),
        "lightyellow" => Ok(Color::LightYellow),
        "lightblue" => Ok(Color::LightBlue),
        "lightmagenta" => Ok(Color::LightMagenta),
        "lightcyan" => Ok(Color::LightCyan),
        "white" => Ok(Color::White),
        "reset" => Ok(Color::Reset),
        _ => Err(format!("Unknown color: {}", s)),
    }
}

fn parse_hex_color(s: &str) -> Result<Color, String> {
    let hex = s.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| format!("Invalid hex color: {}", s))
    };

    match hex.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        // #RGB expands to #RRGGBB
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(format!("Invalid hex color format: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color_string("Cyan").unwrap(), Color::Cyan);
        assert_eq!(parse_color_string("CYAN").unwrap(), Color::Cyan);
        assert_eq!(parse_color_string("darkgrey").unwrap(), Color::DarkGray);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color_string("#FF0000").unwrap(), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color_string("#0F0").unwrap(), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(parse_color_string("invalid").is_err());
        assert!(parse_color_string("#GGGGGG").is_err());
        assert!(parse_color_string("#12345").is_err());
        assert!(parse_color_string("#ÄB").is_err());
    }

    #[test]
    fn test_palette_by_theme() {
        let colors = ThemeColors::default();
        assert_eq!(colors.palette(Theme::Light).text, Color::Black);
        assert_eq!(colors.palette(Theme::Dark).text, Color::White);
    }

    #[test]
    fn test_partial_table_keeps_palette_defaults() {
        let colors: ThemeColors = toml::from_str(
            r##"
[dark]
text = "#EEEEEE"
"##,
        )
        .unwrap();

        assert_eq!(colors.dark.text, Color::Rgb(238, 238, 238));
        assert_eq!(colors.dark.active_border, ColorConfig::dark().active_border);
        assert_eq!(colors.light, ColorConfig::light());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ThemeColors, _> = toml::from_str(
            r##"
[light]
sparkle = "Red"
"##,
        );
        assert!(result.is_err());
    }
}
