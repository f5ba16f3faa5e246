//! Color theme for the Phonebooth TUI.
//!
//! Nord-based palette. The dialog reads colors through [`Palette`] so a host
//! can restyle without touching render code.

use ratatui::style::{Color, Modifier, Style};

mod colors {
    use super::Color;

    // === Polar night ===
    pub const BG_PANEL: Color = Color::Rgb(46, 52, 64); // nord0
    pub const BORDER: Color = Color::Rgb(76, 86, 106); // nord3

    // === Snow storm ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(236, 239, 244); // nord6
    pub const TEXT_SECONDARY: Color = Color::Rgb(216, 222, 233); // nord4
    pub const TEXT_MUTED: Color = Color::Rgb(110, 120, 140); // dimmed nord3

    // === Frost ===
    pub const ACCENT: Color = Color::Rgb(136, 192, 208); // nord8

    // === Aurora ===
    pub const SUCCESS: Color = Color::Rgb(163, 190, 140); // nord14
    pub const ERROR: Color = Color::Rgb(191, 97, 106); // nord11
}

/// Resolved palette used by the dialog renderer.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_panel: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
}

/// Default dark palette.
#[must_use]
pub fn palette() -> Palette {
    Palette {
        bg_panel: colors::BG_PANEL,
        border: colors::BORDER,
        text_primary: colors::TEXT_PRIMARY,
        text_secondary: colors::TEXT_SECONDARY,
        text_muted: colors::TEXT_MUTED,
        accent: colors::ACCENT,
        success: colors::SUCCESS,
        error: colors::ERROR,
    }
}

/// Style helpers shared across dialog content.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    /// Button-like control; focused controls render reversed.
    #[must_use]
    pub fn control(palette: &Palette, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette.text_secondary)
        }
    }
}
