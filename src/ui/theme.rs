//! Marquee theme
//!
//! Color palette and style helpers for the TUI: a dark cinema backdrop with a
//! red marquee accent.

use ratatui::style::{Color, Modifier, Style};

/// Marquee color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #141414 (screening-room black)
    pub const BACKGROUND: Color = Color::Rgb(0x14, 0x14, 0x14);

    /// Primary: #e50914 (marquee red)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Secondary: #b3b3b3 (silver)
    pub const SECONDARY: Color = Color::Rgb(0xb3, 0xb3, 0xb3);

    /// Accent: #f5c518 (gold, ratings)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Highlight: #ffffff (focused card)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Text: #e5e5e5
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe5, 0xe5);

    /// Dim: #5a5a5a
    pub const DIM: Color = Color::Rgb(0x5a, 0x5a, 0x5a);

    /// Success: #46d369 (match green)
    pub const SUCCESS: Color = Color::Rgb(0x46, 0xd3, 0x69);

    /// Error: #ff4d4f
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4f);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels and cards
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x23, 0x23, 0x23);

    /// Modal overlay surface
    pub const BACKGROUND_OVERLAY: Color = Color::Rgb(0x18, 0x18, 0x18);

    pub const BORDER: Color = Color::Rgb(0x40, 0x40, 0x40);

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

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

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

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Carousel heading
    pub fn row_title(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Self::HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::SECONDARY)
        }
    }

    /// Card border: highlighted card in the focused row, highlighted card elsewhere, the rest
    pub fn card_border(selected: bool, row_focused: bool) -> Style {
        match (selected, row_focused) {
            (true, true) => Self::border_focused(),
            (true, false) => Style::default().fg(Self::SECONDARY),
            _ => Self::border(),
        }
    }

    pub fn card() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn overlay() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_OVERLAY)
    }

    /// Page indicator dot
    pub fn page_dot(current: bool) -> Style {
        if current {
            Style::default().fg(Self::PRIMARY)
        } else {
            Style::default().fg(Self::DIM)
        }
    }

    /// Navigation tab
    pub fn tab(active: bool) -> Style {
        if active {
            Style::default()
                .fg(Self::HIGHLIGHT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Self::SECONDARY)
        }
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn input_cursor() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::HIGHLIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

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
        Style::default().fg(Self::SECONDARY)
    }

    pub fn genre() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Runtime / season counts
    pub fn duration() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Vote average, colored by score
    pub fn rating(vote_average: f32) -> Style {
        if vote_average >= 7.5 {
            Self::success()
        } else if vote_average >= 6.0 {
            Self::accent()
        } else if vote_average >= 4.0 {
            Self::dimmed()
        } else {
            Self::error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// WCAG contrast ratio between two RGB theme colors, 1.0 to 21.0
    fn contrast(fg: Color, bg: Color) -> f64 {
        fn luminance(color: Color) -> f64 {
            let Color::Rgb(r, g, b) = color else {
                panic!("{:?} is not an RGB theme color", color);
            };
            let channel = |c: u8| {
                let c = f64::from(c) / 255.0;
                if c <= 0.03928 {
                    c / 12.92
                } else {
                    ((c + 0.055) / 1.055).powf(2.4)
                }
            };
            0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
        }
        let (a, b) = (luminance(fg), luminance(bg));
        let (lighter, darker) = if a > b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    #[test]
    fn test_contrast_extremes() {
        assert!((contrast(Color::Rgb(0, 0, 0), Color::Rgb(255, 255, 255)) - 21.0).abs() < 0.1);
        assert!((contrast(Theme::DIM, Theme::DIM) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_body_text_meets_aa() {
        for color in [Theme::TEXT, Theme::SECONDARY, Theme::ACCENT, Theme::HIGHLIGHT] {
            let ratio = contrast(color, Theme::BACKGROUND);
            assert!(ratio >= 4.5, "{:?} on background got {:.2}:1", color, ratio);
        }
        assert!(contrast(Theme::TEXT, Theme::BACKGROUND_LIGHT) >= 4.5);
    }

    #[test]
    fn test_accents_readable_as_large_text() {
        for color in [Theme::PRIMARY, Theme::ACCENT, Theme::ERROR, Theme::SUCCESS] {
            let ratio = contrast(color, Theme::BACKGROUND);
            assert!(ratio >= 3.0, "{:?} on background got {:.2}:1", color, ratio);
        }
        // Inverted highlight: background text on a primary fill
        assert!(contrast(Theme::BACKGROUND, Theme::PRIMARY) >= 3.0);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(Theme::rating(8.1), Theme::success());
        assert_eq!(Theme::rating(6.5), Theme::accent());
        assert_eq!(Theme::rating(5.0), Theme::dimmed());
        assert_eq!(Theme::rating(2.0), Theme::error());
    }
}
