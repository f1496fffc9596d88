//! Preference-based session assignment engine.
//!
//! Assigns every participant of a roster to exactly one program per
//! session, honoring per-program seat capacities and never repeating a
//! program for the same participant across sessions. Assignment is a
//! greedy, randomized, multi-trial heuristic: each trial seats
//! participants in roster order along their stated preference lists,
//! resolves the leftovers with a shuffled fallback pass, and the driver
//! keeps the highest-scoring trial.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Participant`, `Assignment`,
//!   `SessionAssignments`, `AssignmentOutcome`, `Violation`
//! - **`roster`**: Tabular input parsing into an ordered roster and the
//!   discovered program universe
//! - **`capacity`**: Per-program seat planning (even-split defaults,
//!   caller overrides, sufficiency check)
//! - **`engine`**: Single-trial assigner, preference scorer, and the
//!   best-of-N simulation driver
//! - **`random`**: Seeded shuffle primitives shared by the fallback pass
//!
//! # Algorithm
//!
//! The heuristic is intentionally greedy, not optimal: it exists to
//! produce good-enough seatings quickly and to let repeated randomized
//! trials buy quality. One documented sharp edge remains — when no
//! capacity-respecting seat exists for a leftover participant, an escape
//! valve seats someone ignoring capacity and flags the placement as a
//! violation rather than failing the run.
//!
//! # References
//!
//! - Manlove (2013), "Algorithmics of Matching Under Preferences"
//! - Knuth (1997), "The Art of Computer Programming", Vol. 2, 3.4.2
//!   (Fisher–Yates shuffling)

pub mod capacity;
pub mod engine;
mod error;
pub mod models;
pub mod random;
pub mod roster;

pub use engine::{AssignmentEngine, AssignmentRequest};
pub use error::EngineError;
pub use models::{Assignment, AssignmentOutcome, SessionAssignments, Violation, ViolationType};
pub use roster::Roster;
