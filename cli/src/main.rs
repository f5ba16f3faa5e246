//! Phonebooth demo host - terminal session management and event loop.
//!
//! # Architecture
//!
//! The binary bridges [`phonebooth_engine`] (dialog lifecycle) and
//! [`phonebooth_tui`] (rendering), providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_app() -> PhoneDialog + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain the input queue (non-blocking)
//! 3. Advance the dialog's auto-close timer (`dialog.tick()`)
//! 4. Render frame

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::{
    cell::Cell,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    rc::Rc,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use phonebooth_engine::{BoothConfig, PhoneDialog, SaveState, SettingsStore, data_dir};
use phonebooth_tui::{Palette, draw_dialog, handle_dialog_key, palette, styles};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let log_dir = data_dir().join("logs");
    let log_file = fs::create_dir_all(&log_dir)
        .ok()
        .and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_dir.join("phonebooth.log"))
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!("Logging initialized");
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

/// RAII guard for raw mode + alternate screen.
///
/// On drop, terminal state is restored even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = BoothConfig::load().ok().flatten().unwrap_or_default();
    let store = SettingsStore::open(config.settings_path())?;
    let mut dialog = PhoneDialog::new(store);

    let mut session = TerminalSession::new()?;
    run_app(&mut session.terminal, &mut dialog).await
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dialog: &mut PhoneDialog,
) -> Result<()> {
    let palette = palette();
    let last_outcome: Rc<Cell<Option<SaveState>>> = Rc::new(Cell::new(None));

    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            // The dialog is modal: while open it consumes every key.
            if handle_dialog_key(dialog, key) {
                continue;
            }
            if matches!(key.kind, KeyEventKind::Release) {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('p') => open_capture(dialog, &last_outcome),
                _ => {}
            }
        }

        let now = Instant::now();
        dialog.tick(now - last_frame);
        last_frame = now;

        terminal.draw(|frame| {
            draw_host(frame, last_outcome.get(), &palette);
            draw_dialog(frame, dialog, &palette);
        })?;
    }
}

fn open_capture(dialog: &mut PhoneDialog, last_outcome: &Rc<Cell<Option<SaveState>>>) {
    let sink = Rc::clone(last_outcome);
    // The outcome arrives via the callback; the ticket is not awaited here.
    if let Err(err) = dialog.capture_with(move |state| sink.set(Some(state))) {
        tracing::warn!("cannot open capture: {err}");
    }
}

fn draw_host(frame: &mut Frame, last_outcome: Option<SaveState>, palette: &Palette) {
    let area = frame.area();

    let outcome_line = match last_outcome {
        Some(state) => {
            let color = match state {
                SaveState::Saved => palette.success,
                SaveState::Error => palette.error,
                SaveState::Pending | SaveState::Cancelled => palette.text_secondary,
            };
            Line::from(vec![
                Span::styled("last capture: ", Style::default().fg(palette.text_muted)),
                Span::styled(state.as_str(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            "no capture yet",
            Style::default().fg(palette.text_muted),
        )),
    };

    let lines = vec![
        Line::from(Span::styled(
            "Phonebooth",
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        outcome_line,
        Line::from(""),
        Line::from(vec![
            Span::styled("p", styles::key_highlight(palette)),
            Span::styled(" set phone number  ", styles::key_hint(palette)),
            Span::styled("q", styles::key_highlight(palette)),
            Span::styled(" quit", styles::key_hint(palette)),
        ]),
    ];

    let host_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: (lines.len() as u16).min(area.height),
    };
    frame.render_widget(Paragraph::new(lines), host_area);
}
