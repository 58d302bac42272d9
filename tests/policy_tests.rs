//! Signal policy validation tests
//!
//! The policy is pure, so these exercise it directly over representative
//! demand tables and every bias value.

use signal_sim::simulation::{
    compute_signal_durations, DemandTable, Direction, TimeOfDay, CYCLE_BUDGET, MAX_GREEN,
    MIN_GREEN,
};

fn demand(north: u32, south: u32, east: u32, west: u32) -> DemandTable {
    let mut table = DemandTable::filled(0);
    table[Direction::North] = north;
    table[Direction::South] = south;
    table[Direction::East] = east;
    table[Direction::West] = west;
    table
}

#[test]
fn test_durations_stay_within_bounds() {
    let samples = [
        demand(0, 0, 0, 0),
        demand(1, 0, 0, 0),
        demand(100, 10, 10, 10),
        demand(1000, 1, 1, 1),
        demand(25, 25, 25, 25),
        demand(7, 93, 41, 3),
    ];

    for table in samples {
        for bias in [TimeOfDay::Normal, TimeOfDay::Morning, TimeOfDay::Evening] {
            let durations = compute_signal_durations(&table, bias);
            for (direction, &seconds) in durations.iter() {
                assert!(
                    (MIN_GREEN..=MAX_GREEN).contains(&seconds),
                    "{:?} got {}s under {:?} for demand {:?}",
                    direction,
                    seconds,
                    bias,
                    table
                );
            }
        }
    }
}

#[test]
fn test_unclamped_durations_sum_to_cycle_budget() {
    // Shares chosen so every proportional value lands inside the clamp
    // window; the sum can then only drift by rounding.
    let samples = [
        demand(30, 40, 50, 30),
        demand(20, 20, 20, 20),
        demand(15, 25, 35, 25),
    ];

    for table in samples {
        let durations = compute_signal_durations(&table, TimeOfDay::Normal);
        let sum: u32 = durations.values().sum();
        let drift = (sum as i64 - CYCLE_BUDGET as i64).abs();
        assert!(
            drift <= 2,
            "sum {} drifted {} from budget for demand {:?}",
            sum,
            drift,
            table
        );
    }
}

#[test]
fn test_zero_demand_falls_back_to_minimum_green() {
    let table = demand(0, 0, 0, 0);
    for bias in [TimeOfDay::Normal, TimeOfDay::Morning, TimeOfDay::Evening] {
        let durations = compute_signal_durations(&table, bias);
        for (direction, &seconds) in durations.iter() {
            assert_eq!(
                seconds, MIN_GREEN,
                "{:?} should get minimum green under {:?}",
                direction, bias
            );
        }
    }
}

#[test]
fn test_morning_bias_boosts_north_south_only() {
    let samples = [demand(20, 30, 25, 25), demand(100, 10, 10, 10)];

    for table in samples {
        let normal = compute_signal_durations(&table, TimeOfDay::Normal);
        let morning = compute_signal_durations(&table, TimeOfDay::Morning);

        assert!(morning[Direction::North] >= normal[Direction::North]);
        assert!(morning[Direction::South] >= normal[Direction::South]);
        assert_eq!(morning[Direction::East], normal[Direction::East]);
        assert_eq!(morning[Direction::West], normal[Direction::West]);
        assert!(morning[Direction::North] <= MAX_GREEN);
        assert!(morning[Direction::South] <= MAX_GREEN);
    }
}

#[test]
fn test_evening_bias_boosts_east_west_only() {
    let table = demand(20, 30, 25, 25);
    let normal = compute_signal_durations(&table, TimeOfDay::Normal);
    let evening = compute_signal_durations(&table, TimeOfDay::Evening);

    assert!(evening[Direction::East] >= normal[Direction::East]);
    assert!(evening[Direction::West] >= normal[Direction::West]);
    assert_eq!(evening[Direction::North], normal[Direction::North]);
    assert_eq!(evening[Direction::South], normal[Direction::South]);
}

#[test]
fn test_heavy_direction_clamps_to_extremes() {
    // 100/130 of the budget is over MAX_GREEN and 10/130 is under
    // MIN_GREEN, so the whole table pins to the clamp values.
    let durations = compute_signal_durations(&demand(100, 10, 10, 10), TimeOfDay::Normal);

    assert_eq!(durations[Direction::North], MAX_GREEN);
    assert_eq!(durations[Direction::South], MIN_GREEN);
    assert_eq!(durations[Direction::East], MIN_GREEN);
    assert_eq!(durations[Direction::West], MIN_GREEN);
}

#[test]
fn test_bias_cannot_push_past_max_green() {
    // North is already pinned at MAX_GREEN before the bonus applies.
    let durations = compute_signal_durations(&demand(100, 10, 10, 10), TimeOfDay::Morning);
    assert_eq!(durations[Direction::North], MAX_GREEN);
}
