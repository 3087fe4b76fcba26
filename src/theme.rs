//! Theme system for the TUI.
//!
//! Semantic color roles resolved to ratatui `Style` values. `ThemeVariant`
//! selects the Dark or Light palette; both share the brand, boost and
//! favourite colors.

use ratatui::style::{Color, Modifier, Style};

const PRIMARY: Color = Color::Rgb(0x21, 0x96, 0xf3);
const PRIMARY_VARIANT: Color = Color::Rgb(0x00, 0x69, 0xc0);
const SECONDARY: Color = Color::Rgb(0x9c, 0xcc, 0x65);
const SECONDARY_VARIANT: Color = Color::Rgb(0x6b, 0x9b, 0x37);
const BOOST: Color = Color::Rgb(0x2b, 0x90, 0xd9);
const FAVOURITE: Color = Color::Rgb(0xca, 0x8f, 0x04);

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Chrome --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub selected: Style,

    // -- Entries --
    pub author: Style,
    pub handle: Style,
    pub timestamp: Style,
    pub body: Style,
    pub content_warning: Style,
    pub boosted_by: Style,
    pub boosted: Style,
    pub favourited: Style,
    pub counter: Style,
    pub bot_label: Style,
    pub media: Style,
    pub notification_header: Style,
    pub tag_name: Style,

    // -- Load states --
    pub loading: Style,
    pub error: Style,
    pub end_of_feed: Style,
    pub placeholder: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            tab_active: Style::default()
                .fg(Color::White)
                .bg(PRIMARY_VARIANT)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(PRIMARY),
            selected: Style::default().bg(Color::Rgb(0x26, 0x32, 0x38)),

            author: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            handle: Style::default().fg(Color::Gray),
            timestamp: Style::default().fg(Color::DarkGray),
            body: Style::default(),
            content_warning: Style::default()
                .fg(SECONDARY)
                .add_modifier(Modifier::ITALIC),
            boosted_by: Style::default().fg(Color::Gray),
            boosted: Style::default().fg(BOOST),
            favourited: Style::default().fg(FAVOURITE),
            counter: Style::default().fg(Color::DarkGray),
            bot_label: Style::default().fg(Color::Black).bg(SECONDARY),
            media: Style::default().fg(PRIMARY),
            notification_header: Style::default().fg(PRIMARY),
            tag_name: Style::default()
                .fg(PRIMARY)
                .add_modifier(Modifier::BOLD),

            loading: Style::default().fg(PRIMARY),
            error: Style::default().fg(Color::Red),
            end_of_feed: Style::default().fg(Color::DarkGray),
            placeholder: Style::default().fg(Color::DarkGray),
        }
    }

    fn light() -> Self {
        Self {
            tab_active: Style::default()
                .fg(Color::White)
                .bg(PRIMARY)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(PRIMARY_VARIANT),
            selected: Style::default().bg(Color::Rgb(0xe3, 0xf2, 0xfd)),

            author: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            handle: Style::default().fg(Color::DarkGray),
            timestamp: Style::default().fg(Color::Gray),
            body: Style::default().fg(Color::Black),
            content_warning: Style::default()
                .fg(SECONDARY_VARIANT)
                .add_modifier(Modifier::ITALIC),
            boosted_by: Style::default().fg(Color::DarkGray),
            boosted: Style::default().fg(BOOST),
            favourited: Style::default().fg(FAVOURITE),
            counter: Style::default().fg(Color::Gray),
            bot_label: Style::default().fg(Color::Black).bg(SECONDARY),
            media: Style::default().fg(PRIMARY_VARIANT),
            notification_header: Style::default().fg(PRIMARY_VARIANT),
            tag_name: Style::default()
                .fg(PRIMARY_VARIANT)
                .add_modifier(Modifier::BOLD),

            loading: Style::default().fg(PRIMARY_VARIANT),
            error: Style::default().fg(Color::Red),
            end_of_feed: Style::default().fg(Color::Gray),
            placeholder: Style::default().fg(Color::Gray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_colors_shared_across_variants() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_eq!(dark.boosted.fg, Some(BOOST));
        assert_eq!(light.boosted.fg, Some(BOOST));
        assert_eq!(dark.favourited.fg, Some(FAVOURITE));
        assert_eq!(light.favourited.fg, Some(FAVOURITE));
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.status_bar, light.status_bar);
        assert_ne!(dark.selected, light.selected);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("DARK"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn next_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().name(), "Dark");
    }
}
