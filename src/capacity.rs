//! Per-program seat planning.
//!
//! Every program defaults to an even split of the roster, rounded up:
//! `ceil(participants / programs)`. Caller-supplied overrides replace the
//! default for program names that actually exist in the universe; unknown
//! names are ignored. Override values are taken as given — zero or
//! negative seats simply mean the program never accepts anyone.
//!
//! A plan whose seat sum cannot hold the roster is rejected up front,
//! before any session is processed. The plan is fixed for the whole run:
//! every session of every trial sees the same capacities.

use std::collections::HashMap;

use crate::error::EngineError;

/// Seats per program for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityPlan {
    capacities: HashMap<String, i64>,
}

impl CapacityPlan {
    /// Plans capacities for `programs` holding `total_participants`.
    ///
    /// # Errors
    /// [`EngineError::CapacityInsufficient`] when the summed seats are
    /// fewer than the participants; the error carries the effective
    /// capacity map so callers can surface per-program minimums.
    pub fn plan(
        programs: &[String],
        total_participants: usize,
        overrides: &HashMap<String, i64>,
    ) -> Result<Self, EngineError> {
        let mut capacities: HashMap<String, i64> = HashMap::with_capacity(programs.len());

        let default_seats = if programs.is_empty() {
            0
        } else {
            total_participants.div_ceil(programs.len()) as i64
        };
        for program in programs {
            capacities.insert(program.clone(), default_seats);
        }

        for (program, &seats) in overrides {
            if let Some(entry) = capacities.get_mut(program) {
                *entry = seats;
            }
        }

        let available: i64 = capacities.values().sum();
        if available < total_participants as i64 {
            return Err(EngineError::CapacityInsufficient {
                capacities,
                available,
                required: total_participants,
            });
        }

        Ok(Self { capacities })
    }

    /// Seats for a program; 0 for names outside the plan.
    pub fn seats(&self, program: &str) -> i64 {
        self.capacities.get(program).copied().unwrap_or(0)
    }

    /// Seat counts aligned with `programs` order.
    pub fn seats_for(&self, programs: &[String]) -> Vec<i64> {
        programs.iter().map(|p| self.seats(p)).collect()
    }

    /// Sum of all planned seats.
    pub fn total_seats(&self) -> i64 {
        self.capacities.values().sum()
    }

    /// The effective program → seats map.
    pub fn capacities(&self) -> &HashMap<String, i64> {
        &self.capacities
    }
}
