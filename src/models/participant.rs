//! Participant model.
//!
//! A participant is an opaque identifier plus an ordered list of program
//! preferences. Identifiers are taken verbatim from the input and are not
//! required to be unique — two rows may carry the same name, in which case
//! seat-history lookups key on the shared string (a documented sharp edge
//! of the input format, not something this type resolves).

use serde::{Deserialize, Serialize};

/// A participant to be seated.
///
/// `preferences` is `None` when the participant stated no usable
/// preference; index 0 of a present list is the most preferred program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier string, verbatim from the input.
    pub name: String,
    /// Ordered program preferences, most preferred first.
    pub preferences: Option<Vec<String>>,
}

impl Participant {
    /// Creates a participant with no stated preferences.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preferences: None,
        }
    }

    /// Sets the ordered preference list.
    ///
    /// An empty list is normalized to "no preferences".
    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = preferences.into_iter().map(Into::into).collect();
        self.preferences = if list.is_empty() { None } else { Some(list) };
        self
    }

    /// Whether the participant stated any preference.
    pub fn has_preferences(&self) -> bool {
        self.preferences.is_some()
    }

    /// 1-based rank of `program` in the stated list, or 0 if absent.
    ///
    /// Rank 0 is the "unranked" marker used throughout scoring.
    pub fn preference_rank(&self, program: &str) -> usize {
        self.preferences
            .as_deref()
            .and_then(|prefs| prefs.iter().position(|p| p == program))
            .map_or(0, |idx| idx + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_builder() {
        let p = Participant::new("Alice").with_preferences(["Art", "Music"]);
        assert_eq!(p.name, "Alice");
        assert!(p.has_preferences());
        assert_eq!(p.preferences.as_deref(), Some(&["Art".to_string(), "Music".to_string()][..]));
    }

    #[test]
    fn test_empty_preferences_normalized() {
        let p = Participant::new("Carol").with_preferences(Vec::<String>::new());
        assert!(!p.has_preferences());
        assert_eq!(p.preferences, None);
    }

    #[test]
    fn test_preference_rank() {
        let p = Participant::new("Bob").with_preferences(["Music", "Art", "Drama"]);
        assert_eq!(p.preference_rank("Music"), 1);
        assert_eq!(p.preference_rank("Drama"), 3);
        assert_eq!(p.preference_rank("Chess"), 0);

        let no_prefs = Participant::new("Carol");
        assert_eq!(no_prefs.preference_rank("Music"), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let p = Participant::new("Alice").with_preferences(["Art"]);
        let json = serde_json::to_string(&p).unwrap();
        let back: Participant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
