use crossterm::style::Color;
use stackdeck_core::config::{NamedColor, ThemeColor, ThemeConfig};
use stackdeck_core::status::Tone;

pub struct Theme {
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub muted: Color,
    pub hint: Color,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            accent: to_crossterm_color(&config.accent),
            success: to_crossterm_color(&config.success),
            error: to_crossterm_color(&config.error),
            warning: to_crossterm_color(&config.warning),
            muted: to_crossterm_color(&config.muted),
            hint: to_crossterm_color(&config.hint),
        }
    }

    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Success => self.success,
            Tone::Info => self.accent,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
            Tone::Muted => self.muted,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn to_crossterm_color(color: &ThemeColor) -> Color {
    match color {
        ThemeColor::Rgb(r, g, b) => Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
        ThemeColor::Named(named) => match named {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::White => Color::White,
            NamedColor::Gray => Color::DarkGrey,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.accent, Color::Cyan);
        assert_eq!(theme.success, Color::Green);
        assert_eq!(theme.error, Color::Red);
        assert_eq!(theme.warning, Color::Yellow);
        assert_eq!(theme.muted, Color::DarkGrey);
        assert_eq!(theme.hint, Color::Blue);
    }

    #[test]
    fn test_tone_mapping() {
        let theme = Theme::default();
        assert_eq!(theme.tone(Tone::Success), theme.success);
        assert_eq!(theme.tone(Tone::Info), theme.accent);
        assert_eq!(theme.tone(Tone::Muted), theme.muted);
    }

    #[test]
    fn test_rgb_passthrough() {
        let config = ThemeConfig {
            accent: ThemeColor::Rgb(1, 2, 3),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
