//! Assignment (solution) model.
//!
//! The engine's output: per-session lists of participant→program records,
//! plus violations flagging every seat handed out by the capacity-ignoring
//! escape valve. A session with an empty violation list satisfied both the
//! capacity and the no-repeat constraint for every participant.

use serde::{Deserialize, Serialize};

/// One seated participant in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Participant identifier.
    pub participant: String,
    /// Program the participant was seated in.
    pub program: String,
    /// 1-based rank of `program` in the participant's stated list,
    /// 0 when the seat was unranked (random or fallback placement).
    pub preference: usize,
}

impl Assignment {
    /// Creates an assignment record.
    pub fn new(
        participant: impl Into<String>,
        program: impl Into<String>,
        preference: usize,
    ) -> Self {
        Self {
            participant: participant.into(),
            program: program.into(),
            preference,
        }
    }

    /// Whether the participant got a program from their stated list.
    #[inline]
    pub fn is_ranked(&self) -> bool {
        self.preference > 0
    }
}

/// A flagged irregularity in a session's seating.
///
/// Violations never abort a run; they exist so operators can detect
/// overfilled programs and forced repeats after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Classification of the irregularity.
    pub violation_type: ViolationType,
    /// Affected participant.
    pub participant: String,
    /// Program the participant was forced into.
    pub program: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of seating violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Seat handed out by the escape valve instead of the normal passes.
    ForcedPlacement,
    /// The escape valve seated someone in an already-full program.
    CapacityOverflow,
    /// The escape valve repeated a program the participant already had
    /// in an earlier session of the same trial.
    RepeatProgram,
}

impl Violation {
    /// Flags an escape-valve placement.
    pub fn forced_placement(participant: impl Into<String>, program: impl Into<String>) -> Self {
        let participant = participant.into();
        let program = program.into();
        let message = format!("'{participant}' was randomly forced into '{program}'");
        Self {
            violation_type: ViolationType::ForcedPlacement,
            participant,
            program,
            message,
        }
    }

    /// Flags a seat that pushed a program past its capacity.
    pub fn capacity_overflow(
        participant: impl Into<String>,
        program: impl Into<String>,
        capacity: i64,
    ) -> Self {
        let participant = participant.into();
        let program = program.into();
        let message = format!("'{program}' exceeded its capacity of {capacity}");
        Self {
            violation_type: ViolationType::CapacityOverflow,
            participant,
            program,
            message,
        }
    }

    /// Flags a forced repeat of a program across sessions.
    pub fn repeat_program(participant: impl Into<String>, program: impl Into<String>) -> Self {
        let participant = participant.into();
        let program = program.into();
        let message = format!("'{participant}' was seated in '{program}' more than once");
        Self {
            violation_type: ViolationType::RepeatProgram,
            participant,
            program,
            message,
        }
    }
}

/// All seatings for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionAssignments {
    /// 1-based session number.
    pub session: usize,
    /// One record per roster row, in roster order.
    pub assignments: Vec<Assignment>,
    /// Escape-valve placements flagged during this session.
    pub violations: Vec<Violation>,
}

impl SessionAssignments {
    /// Creates an empty session.
    pub fn new(session: usize) -> Self {
        Self {
            session,
            assignments: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Finds the record for a participant (first match under duplicates).
    pub fn assignment_for(&self, participant: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.participant == participant)
    }

    /// Number of participants seated in `program`.
    pub fn occupancy(&self, program: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.program == program)
            .count()
    }

    /// Whether no escape-valve placement happened in this session.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// The winning trial of a full engine run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Sessions in order (`sessions[0]` is session 1).
    pub sessions: Vec<SessionAssignments>,
    /// Program universe in first-seen roster order.
    pub programs: Vec<String>,
}

impl AssignmentOutcome {
    /// The given 1-based session, if present.
    pub fn session(&self, number: usize) -> Option<&SessionAssignments> {
        self.sessions.iter().find(|s| s.session == number)
    }

    /// Whether every session seated without the escape valve.
    pub fn is_clean(&self) -> bool {
        self.sessions.iter().all(SessionAssignments::is_clean)
    }
}
