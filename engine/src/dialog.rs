//! Phone capture dialog controller.
//!
//! One [`PhoneDialog`] runs one capture session at a time:
//!
//! ```text
//! pending --save(valid)----> saved ----timer----> closed
//! pending --save(invalid)--> error ---user-close-> closed
//! pending --cancel---------> cancelled --close---> closed
//! ```
//!
//! `closed` is not a stored state - external observers see the last
//! substantive [`SaveState`]; teardown is visible as [`PhoneDialog::is_open`]
//! flipping to `false`. Listeners (an optional callback plus the awaitable
//! [`SessionTicket`]) are notified exactly once, in registration order,
//! inside the close sequence.

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use phonebooth_types::{DraftInput, OneShotTimer, SaveState, validate_phone};

use crate::store::SettingsStore;

/// Delay before a successful save closes the dialog on its own.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Interactive control holding focus while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogControl {
    #[default]
    PhoneInput,
    Save,
    Cancel,
}

impl DialogControl {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            DialogControl::PhoneInput => DialogControl::Save,
            DialogControl::Save => DialogControl::Cancel,
            DialogControl::Cancel => DialogControl::PhoneInput,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            DialogControl::PhoneInput => DialogControl::Cancel,
            DialogControl::Save => DialogControl::PhoneInput,
            DialogControl::Cancel => DialogControl::Save,
        }
    }
}

/// Content of the open dialog. Rebuilt fresh for every session and dropped
/// wholesale on close, so nothing leaks between sessions.
#[derive(Debug)]
pub enum DialogPhase {
    /// Collecting input: text field plus Save and Cancel controls.
    Editing {
        draft: DraftInput,
        focus: DialogControl,
    },
    /// Validation passed and the value was persisted; closes when the timer
    /// fires.
    Saved { close_timer: OneShotTimer },
    /// Validation failed; waits for the user to activate Close.
    Failed { message: String },
}

/// One registered observer of the current session's outcome.
enum Notifier {
    Callback(Box<dyn FnOnce(SaveState)>),
    Ticket(oneshot::Sender<SaveState>),
}

/// Awaitable handle for one capture session.
///
/// Resolves with the final [`SaveState`] once the session closes. If the
/// dialog is dropped while the session is still open, resolves `Cancelled`.
#[derive(Debug)]
pub struct SessionTicket {
    receiver: oneshot::Receiver<SaveState>,
}

impl Future for SessionTicket {
    type Output = SaveState;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|settled| settled.unwrap_or(SaveState::Cancelled))
    }
}

/// Error starting a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A session is already open; the open session is untouched.
    #[error("a capture session is already open")]
    SessionActive,
}

/// Modal phone-capture dialog.
///
/// Independently constructible; a host that wants a shared instance makes
/// that choice itself rather than this type forcing a singleton.
pub struct PhoneDialog {
    store: SettingsStore,
    state: SaveState,
    phase: Option<DialogPhase>,
    notifiers: Vec<Notifier>,
}

impl PhoneDialog {
    #[must_use]
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store,
            state: SaveState::Pending,
            phase: None,
            notifiers: Vec::new(),
        }
    }

    /// Start a new capture session.
    pub fn capture(&mut self) -> Result<SessionTicket, CaptureError> {
        self.begin(None)
    }

    /// Start a new capture session with an additional listener.
    ///
    /// The callback is registered ahead of the returned ticket and receives
    /// the same final state.
    pub fn capture_with(
        &mut self,
        on_done: impl FnOnce(SaveState) + 'static,
    ) -> Result<SessionTicket, CaptureError> {
        self.begin(Some(Box::new(on_done)))
    }

    fn begin(
        &mut self,
        callback: Option<Box<dyn FnOnce(SaveState)>>,
    ) -> Result<SessionTicket, CaptureError> {
        if self.phase.is_some() {
            return Err(CaptureError::SessionActive);
        }

        self.state = SaveState::Pending;
        if let Some(callback) = callback {
            self.notifiers.push(Notifier::Callback(callback));
        }
        let (sender, receiver) = oneshot::channel();
        self.notifiers.push(Notifier::Ticket(sender));

        self.phase = Some(DialogPhase::Editing {
            draft: DraftInput::default(),
            focus: DialogControl::default(),
        });
        tracing::debug!("capture session opened");

        Ok(SessionTicket { receiver })
    }

    /// Most recent session's state (`Pending` before any session).
    #[must_use]
    pub fn state(&self) -> SaveState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase.is_some()
    }

    /// View of the open dialog's content, for rendering.
    #[must_use]
    pub fn phase(&self) -> Option<&DialogPhase> {
        self.phase.as_ref()
    }

    /// Read access to the settings store, for hosts and tests.
    #[must_use]
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Validate the draft and settle the session one way or the other.
    ///
    /// On success the value is persisted and the dialog shows the success
    /// content until the auto-close timer fires. On failure the dialog shows
    /// the error content and waits for an explicit close.
    pub fn save(&mut self) {
        let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase else {
            return;
        };
        let value = draft.text().to_string();

        match validate_phone(&value) {
            Ok(()) => match self.store.set_phone_number(&value) {
                Ok(()) => {
                    tracing::info!("phone number captured");
                    self.state = SaveState::Saved;
                    self.phase = Some(DialogPhase::Saved {
                        close_timer: OneShotTimer::new(AUTO_CLOSE_DELAY),
                    });
                }
                Err(err) => {
                    tracing::warn!("failed to persist phone number: {err:#}");
                    self.state = SaveState::Error;
                    self.phase = Some(DialogPhase::Failed {
                        message: "could not save phone number".to_string(),
                    });
                }
            },
            Err(err) => {
                self.state = SaveState::Error;
                self.phase = Some(DialogPhase::Failed {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Cancel the session. Only meaningful while editing: once the state has
    /// settled to `Saved` or `Error` it stays settled.
    pub fn cancel(&mut self) {
        if !matches!(self.phase, Some(DialogPhase::Editing { .. })) {
            return;
        }
        self.state = SaveState::Cancelled;
        self.close();
    }

    /// Escape gesture. Redirected to the Cancel path while editing; from the
    /// saved or error content it tears the dialog down without touching the
    /// already-settled state.
    pub fn dismiss(&mut self) {
        if matches!(self.phase, Some(DialogPhase::Editing { .. })) {
            self.cancel();
        } else if self.phase.is_some() {
            self.close();
        }
    }

    /// Activate the focused control (Enter).
    pub fn activate(&mut self) {
        let focus = match &self.phase {
            Some(DialogPhase::Editing { focus, .. }) => Some(*focus),
            Some(DialogPhase::Failed { .. }) => None,
            Some(DialogPhase::Saved { .. }) | None => return,
        };

        match focus {
            Some(DialogControl::PhoneInput | DialogControl::Save) => self.save(),
            Some(DialogControl::Cancel) => self.cancel(),
            None => self.close(),
        }
    }

    pub fn focus_next(&mut self) {
        if let Some(DialogPhase::Editing { focus, .. }) = &mut self.phase {
            *focus = focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(DialogPhase::Editing { focus, .. }) = &mut self.phase {
            *focus = focus.prev();
        }
    }

    /// Advance the auto-close timer. Call once per frame from the host loop.
    pub fn tick(&mut self, delta: Duration) {
        let finished = match &mut self.phase {
            Some(DialogPhase::Saved { close_timer }) => {
                close_timer.advance(delta);
                close_timer.is_finished()
            }
            _ => false,
        };
        if finished {
            self.close();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.backspace();
        }
    }

    pub fn delete_forward(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.delete_forward();
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.move_left();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.move_right();
        }
    }

    pub fn cursor_home(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.move_home();
        }
    }

    pub fn cursor_end(&mut self) {
        if let Some(DialogPhase::Editing { draft, .. }) = &mut self.phase {
            draft.move_end();
        }
    }

    /// Shared teardown: drop the session content, then notify every listener
    /// exactly once, in registration order. A listener that panics is logged
    /// and never prevents the remaining listeners from running.
    fn close(&mut self) {
        if self.phase.is_none() {
            return;
        }
        self.phase = None;

        let state = self.state;
        for notifier in self.notifiers.drain(..) {
            match notifier {
                Notifier::Callback(callback) => {
                    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(state))) {
                        tracing::error!("capture listener panicked: {panic:?}");
                    }
                }
                Notifier::Ticket(sender) => {
                    // The receiver may already be dropped; nothing to deliver.
                    let _ = sender.send(state);
                }
            }
        }
        tracing::debug!(state = %state, "capture session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::{AUTO_CLOSE_DELAY, CaptureError, DialogControl, DialogPhase, PhoneDialog};
    use crate::store::SettingsStore;
    use phonebooth_types::SaveState;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn dialog() -> PhoneDialog {
        PhoneDialog::new(SettingsStore::open_in_memory().unwrap())
    }

    fn type_str(dialog: &mut PhoneDialog, text: &str) {
        for c in text.chars() {
            dialog.insert_char(c);
        }
    }

    #[test]
    fn starts_pending_and_closed() {
        let dialog = dialog();
        assert_eq!(dialog.state(), SaveState::Pending);
        assert!(!dialog.is_open());
        assert!(dialog.phase().is_none());
    }

    #[test]
    fn capture_opens_an_editing_session() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();
        assert!(dialog.is_open());
        assert_eq!(dialog.state(), SaveState::Pending);
        assert!(matches!(
            dialog.phase(),
            Some(DialogPhase::Editing {
                focus: DialogControl::PhoneInput,
                ..
            })
        ));
    }

    #[test]
    fn reentrant_capture_is_rejected() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "123");

        assert!(matches!(
            dialog.capture(),
            Err(CaptureError::SessionActive)
        ));

        // The open session is untouched.
        let Some(DialogPhase::Editing { draft, .. }) = dialog.phase() else {
            panic!("expected editing phase");
        };
        assert_eq!(draft.text(), "123");
    }

    #[tokio::test]
    async fn valid_save_persists_and_auto_closes() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "123-456-7890");
        dialog.save();

        assert_eq!(dialog.state(), SaveState::Saved);
        assert!(matches!(dialog.phase(), Some(DialogPhase::Saved { .. })));

        // Still showing the success content just before the delay elapses.
        dialog.tick(AUTO_CLOSE_DELAY - Duration::from_millis(100));
        assert!(dialog.is_open());

        dialog.tick(Duration::from_millis(100));
        assert!(!dialog.is_open());

        assert_eq!(ticket.await, SaveState::Saved);
        assert_eq!(
            dialog.store().phone_number().unwrap().as_deref(),
            Some("123-456-7890")
        );
    }

    #[tokio::test]
    async fn surrounding_text_saves_the_full_raw_input() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "abc123-456-7890xyz");
        dialog.save();
        dialog.tick(AUTO_CLOSE_DELAY);

        assert_eq!(ticket.await, SaveState::Saved);
        assert_eq!(
            dialog.store().phone_number().unwrap().as_deref(),
            Some("abc123-456-7890xyz")
        );
    }

    #[tokio::test]
    async fn invalid_save_shows_error_until_closed() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "12-34-5678");
        dialog.save();

        assert_eq!(dialog.state(), SaveState::Error);
        let Some(DialogPhase::Failed { message }) = dialog.phase() else {
            panic!("expected failed phase");
        };
        assert!(message.contains("invalid phone format"));

        // No auto-close for errors; time passing changes nothing.
        dialog.tick(Duration::from_secs(10));
        assert!(dialog.is_open());

        // The explicit Close control settles the session.
        dialog.activate();
        assert!(!dialog.is_open());
        assert_eq!(ticket.await, SaveState::Error);
        assert_eq!(dialog.store().phone_number().unwrap(), None);
    }

    #[tokio::test]
    async fn cancel_resolves_cancelled_without_writing() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "123-456-7890");
        dialog.cancel();

        assert!(!dialog.is_open());
        assert_eq!(ticket.await, SaveState::Cancelled);
        assert_eq!(dialog.store().phone_number().unwrap(), None);
    }

    #[tokio::test]
    async fn dismiss_while_editing_takes_the_cancel_path() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        dialog.dismiss();

        assert!(!dialog.is_open());
        assert_eq!(ticket.await, SaveState::Cancelled);
    }

    #[tokio::test]
    async fn dismiss_after_save_closes_early_but_stays_saved() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "123-456-7890");
        dialog.save();
        dialog.dismiss();

        assert!(!dialog.is_open());
        assert_eq!(dialog.state(), SaveState::Saved);
        assert_eq!(ticket.await, SaveState::Saved);
    }

    #[test]
    fn cancel_is_ignored_once_the_error_settled() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();
        dialog.save(); // empty draft -> error

        dialog.cancel();
        assert!(dialog.is_open());
        assert_eq!(dialog.state(), SaveState::Error);
    }

    #[test]
    fn enter_on_the_cancel_control_cancels() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();
        dialog.focus_next(); // Save
        dialog.focus_next(); // Cancel
        dialog.activate();

        assert!(!dialog.is_open());
        assert_eq!(dialog.state(), SaveState::Cancelled);
    }

    #[test]
    fn focus_cycles_through_all_controls() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();

        let focus_of = |dialog: &PhoneDialog| match dialog.phase() {
            Some(DialogPhase::Editing { focus, .. }) => *focus,
            _ => panic!("expected editing phase"),
        };

        assert_eq!(focus_of(&dialog), DialogControl::PhoneInput);
        dialog.focus_next();
        assert_eq!(focus_of(&dialog), DialogControl::Save);
        dialog.focus_next();
        assert_eq!(focus_of(&dialog), DialogControl::Cancel);
        dialog.focus_next();
        assert_eq!(focus_of(&dialog), DialogControl::PhoneInput);
        dialog.focus_prev();
        assert_eq!(focus_of(&dialog), DialogControl::Cancel);
    }

    #[tokio::test]
    async fn callback_and_ticket_see_the_same_state_exactly_once() {
        let mut dialog = dialog();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let ticket = dialog
            .capture_with(move |state| sink.borrow_mut().push(state))
            .unwrap();
        type_str(&mut dialog, "123-456-7890");
        dialog.save();
        dialog.tick(AUTO_CLOSE_DELAY);

        assert_eq!(ticket.await, SaveState::Saved);
        assert_eq!(*seen.borrow(), vec![SaveState::Saved]);

        // Extra ticks after close never re-notify.
        dialog.tick(AUTO_CLOSE_DELAY);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn panicking_listener_does_not_break_the_ticket() {
        let mut dialog = dialog();
        let ticket = dialog
            .capture_with(|_| panic!("listener exploded"))
            .unwrap();
        dialog.cancel();

        assert_eq!(ticket.await, SaveState::Cancelled);
    }

    #[tokio::test]
    async fn ticket_resolves_cancelled_when_dialog_is_dropped_mid_session() {
        let mut dialog = dialog();
        let ticket = dialog.capture().unwrap();
        drop(dialog);

        assert_eq!(ticket.await, SaveState::Cancelled);
    }

    #[test]
    fn new_session_resets_the_state() {
        let mut dialog = dialog();
        let _first = dialog.capture().unwrap();
        dialog.save(); // empty draft -> error
        dialog.activate(); // close

        assert_eq!(dialog.state(), SaveState::Error);
        let _second = dialog.capture().unwrap();
        assert_eq!(dialog.state(), SaveState::Pending);
    }

    #[test]
    fn editing_operations_are_ignored_after_settling() {
        let mut dialog = dialog();
        let _ticket = dialog.capture().unwrap();
        type_str(&mut dialog, "123-456-7890");
        dialog.save();

        // The editing subtree is gone; these must all be no-ops.
        dialog.insert_char('x');
        dialog.backspace();
        dialog.focus_next();
        assert!(matches!(dialog.phase(), Some(DialogPhase::Saved { .. })));
    }
}
