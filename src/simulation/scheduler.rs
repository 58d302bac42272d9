//! Signal phase state machine
//!
//! Cycles through the four approaches in fixed order on a countdown timer.
//! Expiry is reported to the caller rather than handled internally: the
//! world owns the demand refresh and fleet pre-population that a cycle
//! boundary triggers, and may defer the new cycle while measured demand is
//! still pending (every signal stays red in the meantime).

use super::policy::MIN_GREEN;
use super::types::{Direction, DirectionMap, DurationTable};

/// Outcome of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseTick {
    /// The active phase still has time left.
    Running,
    /// A new phase must start. `cycle_start` marks a wrap back to the first
    /// direction in the sequence, which is the demand-refresh boundary.
    Expired {
        next: Direction,
        cycle_start: bool,
    },
}

/// Timer-driven phase scheduler.
///
/// `active` is None before the first cycle and while a cycle start is
/// deferred; at most one direction is ever green.
#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    active: Option<Direction>,
    next_index: usize,
    time_left: f32,
    durations: DurationTable,
    elapsed_green: DirectionMap<f32>,
    cycles_started: u64,
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self {
            active: None,
            next_index: 0,
            time_left: 0.0,
            durations: DurationTable::filled(MIN_GREEN),
            elapsed_green: DirectionMap::filled(0.0),
            cycles_started: 0,
        }
    }

    /// Advance the phase timer by `sim_secs` simulated seconds.
    ///
    /// On expiry the active signal is cleared (all red) and the pending
    /// phase is reported; the caller decides when to [`start_next_phase`]
    /// (immediately mid-cycle, possibly deferred at a cycle boundary).
    ///
    /// [`start_next_phase`]: PhaseScheduler::start_next_phase
    pub fn tick(&mut self, sim_secs: f32) -> PhaseTick {
        if let Some(direction) = self.active {
            self.time_left -= sim_secs;
            self.elapsed_green[direction] += sim_secs;
            if self.time_left > 0.0 {
                return PhaseTick::Running;
            }
            self.active = None;
        }

        PhaseTick::Expired {
            next: Direction::ALL[self.next_index],
            cycle_start: self.next_index == 0,
        }
    }

    /// Install the duration table computed for a new cycle.
    pub fn set_durations(&mut self, durations: DurationTable) {
        self.durations = durations;
    }

    /// Turn the pending direction green and arm its countdown.
    pub fn start_next_phase(&mut self) -> Direction {
        let direction = Direction::ALL[self.next_index];
        if self.next_index == 0 {
            self.cycles_started += 1;
        }
        self.active = Some(direction);
        self.time_left = self.durations[direction] as f32;
        self.next_index = (self.next_index + 1) % Direction::ALL.len();
        direction
    }

    /// The direction currently holding green, if any.
    pub fn active_direction(&self) -> Option<Direction> {
        self.active
    }

    pub fn is_green(&self, direction: Direction) -> bool {
        self.active == Some(direction)
    }

    /// Seconds remaining in the current phase.
    pub fn time_remaining(&self) -> f32 {
        self.time_left.max(0.0)
    }

    pub fn durations(&self) -> &DurationTable {
        &self.durations
    }

    /// Total green time a direction has accumulated (display only).
    pub fn elapsed_green(&self, direction: Direction) -> f32 {
        self.elapsed_green[direction]
    }

    /// Number of cycles started so far.
    pub fn cycle_count(&self) -> u64 {
        self.cycles_started
    }
}
