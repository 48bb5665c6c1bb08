//! Cinema-night theme for Cinezy
//!
//! Color palette and style helpers for the TUI: indigo accents on a dark
//! screening-room background, gold labels, and the green/yellow/red
//! rating badge bands.

use ratatui::style::{Color, Modifier, Style};

use crate::models::RatingTier;

/// Cinezy color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #12121c (dark screening room)
    pub const BACKGROUND: Color = Color::Rgb(0x12, 0x12, 0x1c);

    /// Primary: #818cf8 (indigo)
    pub const PRIMARY: Color = Color::Rgb(0x81, 0x8c, 0xf8);

    /// Secondary: #a5b4fc (pale indigo)
    pub const SECONDARY: Color = Color::Rgb(0xa5, 0xb4, 0xfc);

    /// Accent: #facc15 (marquee gold)
    pub const ACCENT: Color = Color::Rgb(0xfa, 0xcc, 0x15);

    /// Favorite: #f43f5e (rose)
    pub const FAVORITE: Color = Color::Rgb(0xf4, 0x3f, 0x5e);

    /// Text: #f3f4f6
    pub const TEXT: Color = Color::Rgb(0xf3, 0xf4, 0xf6);

    /// Dim: #9ca3af
    pub const DIM: Color = Color::Rgb(0x9c, 0xa3, 0xaf);

    /// Success / high rating: #22c55e
    pub const SUCCESS: Color = Color::Rgb(0x22, 0xc5, 0x5e);

    /// Mid rating: #facc15
    pub const WARNING: Color = Self::ACCENT;

    /// Error / low rating: #ef4444
    pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Card and input background: #1e1e2f
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1e, 0x1e, 0x2f);

    /// Border color (muted indigo)
    pub const BORDER: Color = Color::Rgb(0x4a, 0x4f, 0x8c);

    /// Border color when focused
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Highlighted text (inverted with primary color)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Gold labels ("Genre:", "Duration:")
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Plot text
    pub fn plot() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::ITALIC)
    }

    /// Heart marker on favorited cards
    pub fn favorite() -> Style {
        Style::default()
            .fg(Self::FAVORITE)
            .add_modifier(Modifier::BOLD)
    }

    /// Rating badge: dark text on the tier color
    pub fn rating(tier: RatingTier) -> Style {
        let bg = match tier {
            RatingTier::High => Self::SUCCESS,
            RatingTier::Mid => Self::WARNING,
            RatingTier::Low => Self::ERROR,
        };
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Card border, brighter for the selected card
    pub fn card_border(selected: bool) -> Style {
        if selected {
            Self::border_focused()
        } else {
            Self::border()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRAST CHECKS
// ═══════════════════════════════════════════════════════════════════════════

/// An sRGB triple
pub type Rgb = (u8, u8, u8);

/// WCAG 2.0 relative luminance
pub fn relative_luminance((r, g, b): Rgb) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black on white)
pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let a = relative_luminance(fg);
    let b = relative_luminance(bg);
    (a.max(b) + 0.05) / (a.min(b) + 0.05)
}

/// Body text needs 4.5:1
pub fn meets_wcag_aa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// Bold labels and badges get away with 3:1
pub fn meets_wcag_aa_bold(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// RGB triple of a palette color, `None` for indexed/named colors
pub fn color_to_rgb(color: Color) -> Option<Rgb> {
    if let Color::Rgb(r, g, b) = color {
        Some((r, g, b))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> Rgb {
        color_to_rgb(color).unwrap()
    }

    #[test]
    fn test_palette_is_rgb() {
        for color in [
            Theme::BACKGROUND,
            Theme::PRIMARY,
            Theme::SECONDARY,
            Theme::ACCENT,
            Theme::FAVORITE,
            Theme::TEXT,
            Theme::DIM,
            Theme::SUCCESS,
            Theme::WARNING,
            Theme::ERROR,
            Theme::BACKGROUND_LIGHT,
            Theme::BORDER,
        ] {
            assert!(color_to_rgb(color).is_some());
        }
        assert_eq!(color_to_rgb(Color::Red), None);
    }

    #[test]
    fn test_heart_and_labels_stand_out() {
        for bg in [Theme::BACKGROUND, Theme::BACKGROUND_LIGHT] {
            assert!(meets_wcag_aa_bold(rgb(Theme::FAVORITE), rgb(bg)));
            assert!(meets_wcag_aa(rgb(Theme::ACCENT), rgb(bg)));
        }
    }

    #[test]
    fn test_rating_badges_readable() {
        let fg = rgb(Theme::BACKGROUND);
        for tier in [RatingTier::High, RatingTier::Mid, RatingTier::Low] {
            let bg = Theme::rating(tier).bg.map(rgb).unwrap();
            assert!(
                meets_wcag_aa_bold(fg, bg),
                "{:?} badge is {:.2}:1",
                tier,
                contrast_ratio(fg, bg)
            );
        }
    }

    #[test]
    fn test_rating_style_per_tier() {
        assert_eq!(Theme::rating(RatingTier::High).bg, Some(Theme::SUCCESS));
        assert_eq!(Theme::rating(RatingTier::Mid).bg, Some(Theme::WARNING));
        assert_eq!(Theme::rating(RatingTier::Low).bg, Some(Theme::ERROR));
    }

    #[test]
    fn test_selected_card_border_is_focused() {
        assert_eq!(Theme::card_border(true).fg, Some(Theme::PRIMARY));
        assert_eq!(Theme::card_border(false).fg, Some(Theme::BORDER));
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        assert!((contrast_ratio((0, 0, 0), (255, 255, 255)) - 21.0).abs() < 0.1);
        assert!((contrast_ratio((255, 255, 255), (0, 0, 0)) - 21.0).abs() < 0.1);
        assert!((contrast_ratio((90, 90, 90), (90, 90, 90)) - 1.0).abs() < 0.001);
    }
}
