use serde::{Deserialize, Serialize};

/// Outcome of a capture session.
///
/// Exactly one instance lives in the dialog controller. `Pending` is set
/// whenever a new session starts; the first transition to `Saved`, `Error`
/// or `Cancelled` is terminal for that session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    /// A session is collecting input, or none has run yet.
    #[default]
    Pending,
    /// Validation passed and the value was persisted.
    Saved,
    /// Validation (or persistence) failed.
    Error,
    /// The user dismissed the dialog before saving.
    Cancelled,
}

impl SaveState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SaveState::Pending => "pending",
            SaveState::Saved => "saved",
            SaveState::Error => "error",
            SaveState::Cancelled => "cancelled",
        }
    }

    /// Whether the session that produced this state has settled.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, SaveState::Pending)
    }
}

impl std::fmt::Display for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SaveState;

    #[test]
    fn default_is_pending() {
        assert_eq!(SaveState::default(), SaveState::Pending);
        assert!(!SaveState::default().is_terminal());
    }

    #[test]
    fn settled_states_are_terminal() {
        assert!(SaveState::Saved.is_terminal());
        assert!(SaveState::Error.is_terminal());
        assert!(SaveState::Cancelled.is_terminal());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(SaveState::Saved.to_string(), "saved");
        assert_eq!(SaveState::Cancelled.as_str(), "cancelled");
    }
}
