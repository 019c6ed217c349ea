use ratatui::style::{Color, Modifier, Style};

/// Neon-green cyber theme.
///
/// Base aesthetic:
/// - neon green foreground
/// - near-black background
/// - a red to blue ramp for the heatmap
pub struct Theme;

impl Theme {
    // Core palette
    pub const BG: Color = Color::Rgb(0, 0, 0);
    pub const FG_NEON: Color = Color::Rgb(57, 255, 20);
    pub const FG_DIM: Color = Color::Rgb(0, 190, 0);

    // Accents (chosen to not clash with neon green)
    pub const ACCENT_CYAN: Color = Color::Rgb(0, 255, 255);
    pub const ACCENT_YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const ACCENT_RED: Color = Color::Rgb(255, 70, 70);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG_NEON).bg(Self::BG)
    }

    /// Panel borders.
    pub fn border() -> Style {
        Style::default().fg(Self::FG_NEON).bg(Self::BG)
    }

    /// Titles (bold neon).
    pub fn title() -> Style {
        Style::default()
            .fg(Self::FG_NEON)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary/dim text.
    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn ok() -> Style {
        Style::default()
            .fg(Self::FG_NEON)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ACCENT_YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn accent_cyan() -> Style {
        Style::default()
            .fg(Self::ACCENT_CYAN)
            .add_modifier(Modifier::BOLD)
    }

    /// Maps `t ∈ [0, 1]` from blue to red, values outside are clamped.
    pub fn heat(t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0., 1.) } else { 0. };
        let red = (t * 255.).round() as u8;
        Color::Rgb(red, 51, 255 - red)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_ramp_is_clamped() {
        assert_eq!(Theme::heat(0.), Color::Rgb(0, 51, 255));
        assert_eq!(Theme::heat(1.), Color::Rgb(255, 51, 0));
        assert_eq!(Theme::heat(7.), Theme::heat(1.));
        assert_eq!(Theme::heat(f32::NAN), Theme::heat(0.));
    }
}
