//! TUI layer for Phonebooth.
//!
//! Renders the dialog overlay with ratatui and translates crossterm key
//! events into controller operations. All lifecycle logic lives in
//! `phonebooth-engine`; this crate only draws and routes.

mod dialog;
mod input;
mod theme;

pub use dialog::draw_dialog;
pub use input::handle_dialog_key;
pub use theme::{Palette, palette, styles};
