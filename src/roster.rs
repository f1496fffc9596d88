//! Roster loading.
//!
//! Parses tabular input (CSV with a header row) into an ordered
//! participant list and the program universe. Column semantics are fixed:
//! the first column is the participant identifier, every later column is
//! one preference, most preferred first.
//!
//! Preference cells frequently arrive with an encoded rank prefix
//! ("3: Painting"); `exclude_chars` strips that many leading characters
//! from each cell after newline removal and trimming. Cells that are empty
//! after stripping are dropped, and a row whose every preference cell
//! drops out is recorded as having no preferences.
//!
//! The roster is parsed once per request and shared across all sessions
//! and trials of the run.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Participant;

/// An ordered roster plus the discovered program universe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Participants in input-row order.
    pub participants: Vec<Participant>,
    /// Distinct programs in first-seen order (row-major, column order).
    pub programs: Vec<String>,
}

impl Roster {
    /// Parses a raw tabular byte buffer.
    ///
    /// The header row is consumed and otherwise ignored. Rows may be
    /// ragged; short rows simply state fewer preferences.
    pub fn from_csv(data: &[u8], exclude_chars: usize) -> Result<Self, EngineError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let mut participants = Vec::new();
        let mut programs: Vec<String> = Vec::new();

        for record in reader.records() {
            let record = record?;
            let name = record
                .get(0)
                .unwrap_or("")
                .replace(['\r', '\n'], "");

            let mut preferences = Vec::new();
            for field in record.iter().skip(1) {
                let cleaned = field.replace(['\r', '\n'], "");
                let program: String = cleaned.trim().chars().skip(exclude_chars).collect();
                if program.is_empty() {
                    continue;
                }
                if !programs.contains(&program) {
                    programs.push(program.clone());
                }
                preferences.push(program);
            }

            participants.push(Participant::new(name).with_preferences(preferences));
        }

        Ok(Self {
            participants,
            programs,
        })
    }

    /// Builds a roster from already-parsed participants.
    ///
    /// Derives the program universe from the preference lists, first-seen
    /// order, exactly as [`Roster::from_csv`] would.
    pub fn from_participants(participants: Vec<Participant>) -> Self {
        let mut programs: Vec<String> = Vec::new();
        for participant in &participants {
            for program in participant.preferences.as_deref().unwrap_or_default() {
                if !programs.contains(program) {
                    programs.push(program.clone());
                }
            }
        }
        Self {
            participants,
            programs,
        }
    }

    /// Number of participants (input rows).
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Whether the roster has no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
