//! Assignment domain models.
//!
//! Core data types for preference-based seating: the participants being
//! seated, the per-session assignment records the engine emits, and the
//! violations that flag capacity-ignoring escape-valve placements.

mod assignment;
mod participant;

pub use assignment::{
    Assignment, AssignmentOutcome, SessionAssignments, Violation, ViolationType,
};
pub use participant::Participant;
