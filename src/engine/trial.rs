//! Single-trial assigner.
//!
//! One trial seats the whole roster for every session in sequence. Each
//! session runs a three-stage pass:
//!
//! 1. **Preference matching** — roster order; each participant takes the
//!    first stated program with a free seat that they have not already
//!    had in this trial.
//! 2. **Fallback resolution** — leftovers, FIFO; each takes the first
//!    program of a seeded shuffle of the full universe passing the same
//!    capacity and no-repeat filter.
//! 3. **Escape valve** — when nothing passes the filter, a uniformly
//!    random other leftover is seated in a uniformly random program
//!    ignoring both constraints, flagged as a violation, and the current
//!    leftover retried. The valve overfills rather than fails, so every
//!    session always seats every roster row.
//!
//! Seat-history lookups ("already had this program") scan seat lists by
//! identifier string, including seats filled earlier in the current
//! session. Rows sharing an identifier therefore share one seat history.
//!
//! All state lives in the runner; nothing is shared across trials or
//! across concurrent runs.

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use crate::models::{Assignment, SessionAssignments, Violation};
use crate::random::{shuffle, RandomSource};
use crate::roster::Roster;

/// Seat lists for one session, aligned with the roster's program order.
#[derive(Debug, Clone)]
struct SessionSlots {
    seats: Vec<Vec<String>>,
}

impl SessionSlots {
    fn new(program_count: usize) -> Self {
        Self {
            seats: vec![Vec::new(); program_count],
        }
    }

    fn occupancy(&self, program_idx: usize) -> i64 {
        self.seats[program_idx].len() as i64
    }
}

/// Runs single trials over a fixed roster and seat plan.
pub(crate) struct TrialRunner<'a> {
    roster: &'a Roster,
    /// Seats per program, aligned with `roster.programs`.
    seats: Vec<i64>,
    program_index: HashMap<&'a str, usize>,
}

impl<'a> TrialRunner<'a> {
    pub(crate) fn new(roster: &'a Roster, seats: Vec<i64>) -> Self {
        let program_index = roster
            .programs
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();
        Self {
            roster,
            seats,
            program_index,
        }
    }

    /// Seats the roster for `num_sessions` sessions and returns the
    /// per-session records.
    pub(crate) fn run(
        &self,
        num_sessions: usize,
        source: &mut RandomSource,
    ) -> Vec<SessionAssignments> {
        let mut prior: Vec<SessionSlots> = Vec::with_capacity(num_sessions);
        let mut results = Vec::with_capacity(num_sessions);

        for session_number in 1..=num_sessions {
            let mut slots = SessionSlots::new(self.roster.programs.len());
            let mut unplaced: VecDeque<&str> = VecDeque::new();

            for participant in &self.roster.participants {
                let name = participant.name.as_str();
                match participant.preferences.as_deref() {
                    Some(preferences) => {
                        let used = self.programs_used(&prior, &slots, name);
                        let chosen = preferences.iter().find_map(|program| {
                            let idx = *self.program_index.get(program.as_str())?;
                            (slots.occupancy(idx) < self.seats[idx] && !used.contains(&idx))
                                .then_some(idx)
                        });
                        match chosen {
                            Some(idx) => slots.seats[idx].push(name.to_string()),
                            None => unplaced.push_back(name),
                        }
                    }
                    None => unplaced.push_back(name),
                }
            }

            let violations = self.resolve_unplaced(&prior, &mut slots, unplaced, source);
            let assignments = self.collect_records(&slots);
            results.push(SessionAssignments {
                session: session_number,
                assignments,
                violations,
            });
            prior.push(slots);
        }

        results
    }

    /// Drains the pseudo-bucket, FIFO, until every leftover is seated.
    fn resolve_unplaced(
        &self,
        prior: &[SessionSlots],
        slots: &mut SessionSlots,
        mut unplaced: VecDeque<&str>,
        source: &mut RandomSource,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        while let Some(name) = unplaced.pop_front() {
            loop {
                let mut order: Vec<usize> = (0..self.roster.programs.len()).collect();
                shuffle(&mut order, source.next_shuffle_seed());

                let used = self.programs_used(prior, slots, name);
                let eligible = order.into_iter().find(|&idx| {
                    slots.occupancy(idx) < self.seats[idx] && !used.contains(&idx)
                });
                if let Some(idx) = eligible {
                    slots.seats[idx].push(name.to_string());
                    break;
                }

                // Escape valve: seat a random other leftover wherever the
                // dice land, then retry this one. Seats the participant
                // itself once the bucket is otherwise empty.
                match unplaced.len() {
                    0 => {
                        self.force_seat(prior, slots, name, source, &mut violations);
                        break;
                    }
                    len => {
                        let victim_idx = source.pick(len);
                        if let Some(victim) = unplaced.remove(victim_idx) {
                            self.force_seat(prior, slots, victim, source, &mut violations);
                        }
                    }
                }
            }
        }

        violations
    }

    /// Seats `name` in a uniformly random program, ignoring capacity and
    /// the no-repeat rule, and flags everything that made this irregular.
    fn force_seat(
        &self,
        prior: &[SessionSlots],
        slots: &mut SessionSlots,
        name: &str,
        source: &mut RandomSource,
        violations: &mut Vec<Violation>,
    ) {
        let idx = source.pick(self.roster.programs.len());
        let program = &self.roster.programs[idx];
        warn!(
            participant = name,
            program = program.as_str(),
            "no capacity-respecting seat available; forcing random placement"
        );

        violations.push(Violation::forced_placement(name, program));
        if slots.occupancy(idx) >= self.seats[idx] {
            violations.push(Violation::capacity_overflow(name, program, self.seats[idx]));
        }
        if self.programs_used(prior, slots, name).contains(&idx) {
            violations.push(Violation::repeat_program(name, program));
        }

        slots.seats[idx].push(name.to_string());
    }

    /// Program indices already holding `name` anywhere in this trial,
    /// including seats filled so far in the current session.
    fn programs_used(&self, prior: &[SessionSlots], current: &SessionSlots, name: &str) -> Vec<usize> {
        let mut used = Vec::new();
        for slots in prior.iter().chain(std::iter::once(current)) {
            for (idx, seated) in slots.seats.iter().enumerate() {
                if seated.iter().any(|n| n == name) && !used.contains(&idx) {
                    used.push(idx);
                }
            }
        }
        used
    }

    /// Assembles records in roster order.
    ///
    /// Under duplicate identifiers each row consumes one of the name's
    /// seats, program-list order, so output rows and roster rows always
    /// pair up one-to-one.
    fn collect_records(&self, slots: &SessionSlots) -> Vec<Assignment> {
        let mut memberships: HashMap<&str, VecDeque<usize>> = HashMap::new();
        for (idx, seated) in slots.seats.iter().enumerate() {
            for name in seated {
                memberships.entry(name.as_str()).or_default().push_back(idx);
            }
        }

        let mut records = Vec::with_capacity(self.roster.participants.len());
        for participant in &self.roster.participants {
            let seat = memberships
                .get_mut(participant.name.as_str())
                .and_then(VecDeque::pop_front);
            if let Some(idx) = seat {
                let program = &self.roster.programs[idx];
                records.push(Assignment::new(
                    &participant.name,
                    program,
                    participant.preference_rank(program),
                ));
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participant, ViolationType};

    fn roster(rows: &[(&str, &[&str])]) -> Roster {
        Roster::from_participants(
            rows.iter()
                .map(|(name, prefs)| Participant::new(*name).with_preferences(prefs.iter().copied()))
                .collect(),
        )
    }

    fn source() -> RandomSource {
        RandomSource::from_seed(7)
    }

    #[test]
    fn test_preference_matching_in_roster_order() {
        let roster = roster(&[
            ("Alice", &["Art", "Music"][..]),
            ("Bob", &["Music", "Art"][..]),
            ("Carol", &[][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![2, 2]);
        let sessions = runner.run(1, &mut source());

        let session = &sessions[0];
        assert_eq!(session.assignments.len(), 3);
        assert_eq!(session.assignment_for("Alice").unwrap().program, "Art");
        assert_eq!(session.assignment_for("Alice").unwrap().preference, 1);
        assert_eq!(session.assignment_for("Bob").unwrap().program, "Music");
        assert_eq!(session.assignment_for("Carol").unwrap().preference, 0);
        assert!(session.is_clean());
        assert!(session.occupancy("Art") <= 2 && session.occupancy("Music") <= 2);
    }

    #[test]
    fn test_second_choice_when_first_is_full() {
        let roster = roster(&[
            ("Alice", &["Art"][..]),
            ("Bob", &["Art", "Music"][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![1, 1]);
        let sessions = runner.run(1, &mut source());

        assert_eq!(sessions[0].assignment_for("Alice").unwrap().program, "Art");
        let bob = sessions[0].assignment_for("Bob").unwrap();
        assert_eq!(bob.program, "Music");
        assert_eq!(bob.preference, 2);
    }

    #[test]
    fn test_no_repeat_across_sessions() {
        let roster = roster(&[
            ("Alice", &["Art", "Music"][..]),
            ("Bob", &["Art", "Music"][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![1, 1]);
        let sessions = runner.run(2, &mut source());

        for name in ["Alice", "Bob"] {
            let first = sessions[0].assignment_for(name).unwrap();
            let second = sessions[1].assignment_for(name).unwrap();
            assert_ne!(first.program, second.program, "{name} repeated a program");
        }
        assert!(sessions.iter().all(SessionAssignments::is_clean));
    }

    #[test]
    fn test_exhausted_preferences_fall_back_unranked() {
        // Carol's only stated program is full by the time she is reached.
        let roster = roster(&[
            ("Alice", &["Art"][..]),
            ("Carol", &["Art"][..]),
            ("Bob", &["Music"][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![1, 2]);
        let sessions = runner.run(1, &mut source());

        let carol = sessions[0].assignment_for("Carol").unwrap();
        assert_eq!(carol.program, "Music");
        assert_eq!(carol.preference, 0);
        assert!(sessions[0].is_clean());
    }

    #[test]
    fn test_escape_valve_flags_overflow() {
        // One program with no seats at all: both rows can only be seated
        // by the valve, and every forced seat overfills.
        let roster = roster(&[("Alice", &["Art"][..]), ("Bob", &["Art"][..])]);
        let runner = TrialRunner::new(&roster, vec![0]);
        let sessions = runner.run(1, &mut source());

        let session = &sessions[0];
        assert_eq!(session.assignments.len(), 2);
        assert_eq!(session.occupancy("Art"), 2);

        let forced = session
            .violations
            .iter()
            .filter(|v| v.violation_type == ViolationType::ForcedPlacement)
            .count();
        let overflow = session
            .violations
            .iter()
            .filter(|v| v.violation_type == ViolationType::CapacityOverflow)
            .count();
        assert_eq!(forced, 2);
        assert_eq!(overflow, 2);
    }

    #[test]
    fn test_escape_valve_flags_forced_repeat() {
        // Two programs, three sessions: session 3 has nothing left that
        // either participant has not already had.
        let roster = roster(&[
            ("Alice", &["Art", "Music"][..]),
            ("Bob", &["Art", "Music"][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![1, 1]);
        let sessions = runner.run(3, &mut source());

        let session = &sessions[2];
        assert_eq!(session.assignments.len(), 2);
        let forced = session
            .violations
            .iter()
            .filter(|v| v.violation_type == ViolationType::ForcedPlacement)
            .count();
        let repeats = session
            .violations
            .iter()
            .filter(|v| v.violation_type == ViolationType::RepeatProgram)
            .count();
        assert_eq!(forced, 2);
        assert_eq!(repeats, 2);

        // Earlier sessions never needed the valve.
        assert!(sessions[0].is_clean());
        assert!(sessions[1].is_clean());
    }

    #[test]
    fn test_forced_seat_on_a_stated_program_keeps_its_rank() {
        // Single program: the session-2 forced seats land on each row's
        // first choice, and the records say so.
        let roster = roster(&[("Alice", &["Art"][..]), ("Bob", &["Art"][..])]);
        let runner = TrialRunner::new(&roster, vec![2]);
        let sessions = runner.run(2, &mut source());

        assert!(sessions[0].is_clean());
        let second = &sessions[1];
        assert!(!second.is_clean());
        for name in ["Alice", "Bob"] {
            assert_eq!(second.assignment_for(name).unwrap().preference, 1);
        }
    }

    #[test]
    fn test_duplicate_names_share_history_but_emit_per_row() {
        let roster = roster(&[
            ("Alice", &["Art", "Music"][..]),
            ("Alice", &["Art", "Music"][..]),
        ]);
        let runner = TrialRunner::new(&roster, vec![1, 1]);
        let sessions = runner.run(1, &mut source());

        // The second row sees the first row's in-session seat as "used"
        // and lands its second choice; one record per row either way.
        let session = &sessions[0];
        assert_eq!(session.assignments.len(), 2);
        let programs: Vec<&str> = session
            .assignments
            .iter()
            .map(|a| a.program.as_str())
            .collect();
        assert_eq!(programs, vec!["Art", "Music"]);
    }

    #[test]
    fn test_empty_roster() {
        let roster = roster(&[]);
        let runner = TrialRunner::new(&roster, vec![]);
        let sessions = runner.run(2, &mut source());
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.assignments.is_empty()));
    }
}
