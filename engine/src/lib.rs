//! Dialog controller for Phonebooth - state machine and persistence.
//!
//! This crate owns the capture lifecycle without any TUI dependencies. The
//! tui crate renders [`DialogPhase`] and translates key events into the
//! operations on [`PhoneDialog`].

mod config;
mod dialog;
mod store;

pub use config::{BoothConfig, ConfigError, StorageConfig, data_dir};
pub use dialog::{
    AUTO_CLOSE_DELAY, CaptureError, DialogControl, DialogPhase, PhoneDialog, SessionTicket,
};
pub use store::{PHONE_NUMBER_KEY, SettingsStore};

// Re-export the domain types callers interact with.
pub use phonebooth_types::{SaveState, ValidationError, validate_phone};
