//! Engine error taxonomy.
//!
//! Two things can go wrong before any assignment happens: the roster
//! bytes fail to parse, or the planned seat capacities cannot hold the
//! roster. Everything downstream of those checks always produces a
//! result — the escape valve in the fallback pass overfills rather than
//! fails, and is reported through violations, not errors.

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by the assignment engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The tabular roster input could not be parsed.
    #[error("failed to parse roster input: {0}")]
    Parse(#[from] csv::Error),

    /// The summed seat capacities cannot hold every participant.
    ///
    /// Carries the effective per-program capacities (defaults with
    /// overrides applied) so callers can report how many seats each
    /// program would minimally need.
    #[error("total capacity {available} is less than the {required} participants")]
    CapacityInsufficient {
        /// Effective seats per program at the time of the check.
        capacities: HashMap<String, i64>,
        /// Sum of all effective capacities.
        available: i64,
        /// Number of participants that need seats.
        required: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_message() {
        let err = EngineError::CapacityInsufficient {
            capacities: HashMap::from([("Art".to_string(), 1)]),
            available: 1,
            required: 3,
        };
        let text = err.to_string();
        assert!(text.contains('1'));
        assert!(text.contains('3'));
    }

    #[test]
    fn test_parse_error_wraps_csv() {
        // Invalid UTF-8 in a record surfaces as a parse error.
        let result = crate::roster::Roster::from_csv(b"name,p1\nJo\xff,Art\n", 0);
        assert!(matches!(result, Err(EngineError::Parse(_))));
    }
}
