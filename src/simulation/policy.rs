//! Signal timing policy
//!
//! Maps a demand snapshot plus a time-of-day bias to per-direction green
//! durations. This is a proportional-allocation heuristic, not a real
//! signal optimizer - that simplification is intentional.

use super::types::{DemandTable, Direction, DurationTable, TimeOfDay};

/// Shortest green a direction can receive, in seconds.
pub const MIN_GREEN: u32 = 15;

/// Longest green a direction can receive, in seconds.
pub const MAX_GREEN: u32 = 60;

/// Target total green time for one full four-phase cycle, in seconds.
pub const CYCLE_BUDGET: u32 = 150;

/// Extra green granted to the commute axis by the Morning/Evening bias.
pub const BIAS_BONUS: u32 = 25;

/// Compute green durations for one cycle.
///
/// Each direction receives a share of [`CYCLE_BUDGET`] proportional to its
/// share of total demand, clamped to `[MIN_GREEN, MAX_GREEN]`. With no
/// demand at all every direction falls back to [`MIN_GREEN`]. The Morning
/// bias then boosts North/South and the Evening bias East/West, both capped
/// at [`MAX_GREEN`].
pub fn compute_signal_durations(demand: &DemandTable, bias: TimeOfDay) -> DurationTable {
    let total: u32 = demand.values().sum();
    if total == 0 {
        return DurationTable::filled(MIN_GREEN);
    }

    let mut durations = DurationTable::from_fn(|direction| {
        let share = demand[direction] as f32 / total as f32;
        let proportional = (share * CYCLE_BUDGET as f32).round() as u32;
        proportional.clamp(MIN_GREEN, MAX_GREEN)
    });

    let boosted: &[Direction] = match bias {
        TimeOfDay::Normal => &[],
        TimeOfDay::Morning => &[Direction::North, Direction::South],
        TimeOfDay::Evening => &[Direction::East, Direction::West],
    };
    for &direction in boosted {
        durations[direction] = (durations[direction] + BIAS_BONUS).min(MAX_GREEN);
    }

    durations
}
