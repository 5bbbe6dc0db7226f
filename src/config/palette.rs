//! Pulse colors for terminal output

use super::schema::PaletteConfig;
use crate::models::PulseStatus;
use anyhow::{Context, Result};
use crossterm::style::Color;

/// Terminal color of each pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub green: Color,
    pub yellow: Color,
    pub orange: Color,
    pub red: Color,
}

impl Palette {
    pub fn from_config(config: &PaletteConfig) -> Result<Self> {
        Ok(Self {
            green: parse_color(&config.green).context("Invalid output.palette.green")?,
            yellow: parse_color(&config.yellow).context("Invalid output.palette.yellow")?,
            orange: parse_color(&config.orange).context("Invalid output.palette.orange")?,
            red: parse_color(&config.red).context("Invalid output.palette.red")?,
        })
    }

    pub fn color(&self, pulse: PulseStatus) -> Color {
        match pulse {
            PulseStatus::Green => self.green,
            PulseStatus::Yellow => self.yellow,
            PulseStatus::Orange => self.orange,
            PulseStatus::Red => self.red,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            green: Color::Green,
            yellow: Color::Yellow,
            orange: Color::DarkYellow,
            red: Color::Red,
        }
    }
}

/// Parse a CSS color (`#ec7a08`, `rgb(...)`, `crimson`); `default` keeps the
/// terminal's own color
pub fn parse_color(value: &str) -> Result<Color> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("default") {
        return Ok(Color::Reset);
    }
    let color = csscolorparser::parse(value)
        .map_err(|e| anyhow::anyhow!("Unknown color '{}': {}", value, e))?;
    let [r, g, b, _] = color.to_rgba8();
    Ok(Color::Rgb { r, g, b })
}
