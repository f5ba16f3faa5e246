//! Key handling for the phone dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use phonebooth_engine::PhoneDialog;

/// Translate a key event into a dialog operation.
///
/// Returns `true` if the event was consumed. While a session is open the
/// dialog is modal: every key is consumed, whether or not it maps to an
/// operation, so nothing leaks through to the host.
pub fn handle_dialog_key(dialog: &mut PhoneDialog, key: KeyEvent) -> bool {
    if !dialog.is_open() {
        return false;
    }

    // Handle press + repeat events (ignore releases)
    if matches!(key.kind, KeyEventKind::Release) {
        return true;
    }

    tracing::trace!(code = ?key.code, "dialog key");

    match key.code {
        // Native dismissal is intercepted and routed through the lifecycle.
        KeyCode::Esc => dialog.dismiss(),
        KeyCode::Enter => dialog.activate(),
        KeyCode::Tab => dialog.focus_next(),
        KeyCode::BackTab => dialog.focus_prev(),
        KeyCode::Backspace => dialog.backspace(),
        KeyCode::Delete => dialog.delete_forward(),
        KeyCode::Left => dialog.cursor_left(),
        KeyCode::Right => dialog.cursor_right(),
        KeyCode::Home => dialog.cursor_home(),
        KeyCode::End => dialog.cursor_end(),
        // Insert character (ignore \r and control chords)
        KeyCode::Char(c) if c != '\r' && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            dialog.insert_char(c);
        }
        _ => {}
    }

    true
}
