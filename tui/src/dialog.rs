//! Centered modal overlay rendering for the phone dialog.
//!
//! The dialog is drawn last, over whatever the host rendered, and owns the
//! cleared rectangle underneath it; the host frame is never mutated.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use phonebooth_engine::{DialogControl, DialogPhase, PhoneDialog};
use phonebooth_types::DraftInput;

use crate::theme::{Palette, styles};

const TITLE: &str = " Set Phone Number ";
const PLACEHOLDER: &str = "123-456-7890";
const SAVED_MESSAGE: &str = "Phone number saved successfully!";
const MIN_DIALOG_WIDTH: u16 = 36;

/// Draw the dialog overlay over the current frame.
///
/// Draws nothing when no session is open.
pub fn draw_dialog(frame: &mut Frame, dialog: &PhoneDialog, palette: &Palette) {
    let Some(phase) = dialog.phase() else {
        return;
    };

    let lines = match phase {
        DialogPhase::Editing { draft, focus } => editing_lines(draft, *focus, palette),
        DialogPhase::Saved { close_timer } => saved_lines(close_timer.remaining(), palette),
        DialogPhase::Failed { message } => failed_lines(message, palette),
    };

    let rect = dialog_rect(frame.area(), &lines);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel))
        .title(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )))
        .padding(Padding::uniform(1));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);

    // Caret inside the text field, clamped to the dialog's inner area.
    if let DialogPhase::Editing { draft, focus } = phase
        && *focus == DialogControl::PhoneInput
    {
        let before_cursor = &draft.text()[..draft.cursor_byte_index()];
        let x = (rect.x + 2 + before_cursor.width() as u16)
            .min(rect.x + rect.width.saturating_sub(3));
        frame.set_cursor_position(Position::new(x, rect.y + 2));
    }
}

fn editing_lines(
    draft: &DraftInput,
    focus: DialogControl,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let input_line = if draft.is_empty() {
        Line::from(Span::styled(
            PLACEHOLDER,
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(Span::styled(
            draft.text().to_string(),
            Style::default().fg(palette.text_primary),
        ))
    };

    vec![
        input_line,
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " Save ",
                styles::control(palette, focus == DialogControl::Save),
            ),
            Span::raw("  "),
            Span::styled(
                " Cancel ",
                styles::control(palette, focus == DialogControl::Cancel),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" save  ", styles::key_hint(palette)),
            Span::styled("Tab", styles::key_highlight(palette)),
            Span::styled(" focus  ", styles::key_hint(palette)),
            Span::styled("Esc", styles::key_highlight(palette)),
            Span::styled(" cancel", styles::key_hint(palette)),
        ]),
    ]
}

fn saved_lines(remaining: Duration, palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            SAVED_MESSAGE,
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("closing in {:.1}s", remaining.as_secs_f32()),
            styles::key_hint(palette),
        )),
    ]
}

fn failed_lines(message: &str, palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(palette.error),
        )),
        Line::from(""),
        Line::from(Span::styled(" Close ", styles::control(palette, true))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" close", styles::key_hint(palette)),
        ]),
    ]
}

/// Content-sized rectangle, centered in the host area.
fn dialog_rect(area: Rect, lines: &[Line]) -> Rect {
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = content_width
        .saturating_add(4)
        .max(MIN_DIALOG_WIDTH)
        .min(area.width.saturating_sub(2));
    let height = (lines.len() as u16).saturating_add(4).min(area.height);

    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
