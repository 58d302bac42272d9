//! Standalone intersection simulation engine
//!
//! This module contains the complete simulation: the adaptive signal
//! policy, the phase scheduler, the vehicle fleet, and the demand sources.
//! It has no rendering dependencies and is driven entirely through
//! [`SimWorld::step`], so it can be exercised from the console or from
//! tests without a display layer.

mod demand;
mod fleet;
mod policy;
mod scheduler;
mod stats;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use demand::{
    DemandInlet, DemandMode, FALLBACK_DEMAND_RANGE, SYNTHETIC_DEMAND_RANGE,
};
#[allow(unused_imports)]
pub use fleet::{
    VehicleView, PRE_POPULATE_TARGET, SPAWN_BASE_CHANCE, SPAWN_CHANCE_SPREAD, SPAWN_INTERVAL,
};
#[allow(unused_imports)]
pub use policy::{compute_signal_durations, BIAS_BONUS, CYCLE_BUDGET, MAX_GREEN, MIN_GREEN};
#[allow(unused_imports)]
pub use scheduler::{PhaseScheduler, PhaseTick};
#[allow(unused_imports)]
pub use stats::SimulationStats;
#[allow(unused_imports)]
pub use types::{
    DemandTable, Direction, DirectionMap, DurationTable, LaneGeometry, LaneSide, TimeOfDay,
    BASE_CAR_SPEED, CAR_LENGTH, CAR_WIDTH, CENTER, FOOTPRINT_END, FOOTPRINT_START, LANE_WIDTH,
    MAX_CARS_PER_LANE, MIN_FOLLOWING_GAP, OFFSCREEN_MARGIN, ROAD_WIDTH, SAFE_DISTANCE, SCENE_SIZE,
    STOP_LINE_MARGIN,
};
pub use world::SimWorld;
