//! Vehicle fleet: per-lane pools, spawning, and motion
//!
//! Eight lanes (two per approach), each owning a fixed arena of vehicle
//! slots. Spawning is demand-weighted and debounced; motion runs
//! front-to-back per lane so every vehicle sees its leader's position for
//! the current tick.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::stats::SimulationStats;
use super::types::{
    DemandTable, Direction, DirectionMap, LaneGeometry, LaneSide, MAX_CARS_PER_LANE,
    MIN_FOLLOWING_GAP,
};
use super::vehicle::Vehicle;
use super::world::SimRng;

/// Minimum simulated seconds between spawns for one direction.
pub const SPAWN_INTERVAL: f32 = 0.5;

/// Spawn probability floor per eligible direction per tick.
pub const SPAWN_BASE_CHANCE: f32 = 0.2;

/// Additional spawn probability at 100% demand share.
pub const SPAWN_CHANCE_SPREAD: f32 = 0.3;

/// Vehicles staged across one direction at a cycle boundary, at 100% share.
pub const PRE_POPULATE_TARGET: u32 = 8;

/// Renderable snapshot of one active vehicle.
#[derive(Debug, Clone, Copy)]
pub struct VehicleView {
    pub direction: Direction,
    pub side: LaneSide,
    /// Leading-edge coordinate along the travel axis.
    pub front: f32,
    /// Cross-axis offset of the lane center line.
    pub cross: f32,
    pub waiting_at_light: bool,
    pub in_intersection: bool,
    pub entered_intersection: bool,
    pub passed_intersection: bool,
}

/// One lane and its fixed pool of vehicle slots.
#[derive(Debug, Clone)]
pub struct Lane {
    geometry: LaneGeometry,
    slots: Vec<Vehicle>,
}

impl Lane {
    fn new(direction: Direction, side: LaneSide) -> Self {
        Self {
            geometry: LaneGeometry::new(direction, side),
            slots: vec![Vehicle::new(); MAX_CARS_PER_LANE],
        }
    }

    pub fn geometry(&self) -> &LaneGeometry {
        &self.geometry
    }

    /// Active slots keyed by progress, back-to-front in iteration order.
    ///
    /// Keys are distinct because admission never places a vehicle within
    /// the minimum following gap of another.
    fn occupancy(&self) -> BTreeMap<OrderedFloat<f32>, usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, vehicle)| vehicle.active)
            .map(|(slot, vehicle)| (OrderedFloat(self.geometry.progress(vehicle.front)), slot))
            .collect()
    }

    /// No active vehicle sits within the minimum gap of `front`.
    fn position_clear(&self, front: f32) -> bool {
        let progress = self.geometry.progress(front);
        self.slots
            .iter()
            .filter(|vehicle| vehicle.active)
            .all(|vehicle| {
                (self.geometry.progress(vehicle.front) - progress).abs() >= MIN_FOLLOWING_GAP
            })
    }

    fn find_inactive(&self) -> Option<usize> {
        self.slots.iter().position(|vehicle| !vehicle.active)
    }
}

/// All eight lanes plus fleet-wide state.
#[derive(Debug)]
pub struct VehicleFleet {
    lanes: Vec<Lane>,
    /// Simulated time of the last admitted spawn per direction.
    last_spawn: DirectionMap<f32>,
    stats: SimulationStats,
}

impl Default for VehicleFleet {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleFleet {
    pub fn new() -> Self {
        let mut lanes = Vec::with_capacity(Direction::ALL.len() * LaneSide::ALL.len());
        for direction in Direction::ALL {
            for side in LaneSide::ALL {
                lanes.push(Lane::new(direction, side));
            }
        }
        Self {
            lanes,
            last_spawn: DirectionMap::filled(-SPAWN_INTERVAL),
            stats: SimulationStats::new(),
        }
    }

    fn lane_index(direction: Direction, side: LaneSide) -> usize {
        direction.index() * LaneSide::ALL.len() + (side == LaneSide::Right) as usize
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Activate an inactive slot with its leading edge at `front`.
    ///
    /// Refused (false) when the pool is exhausted or another vehicle sits
    /// within the minimum following gap of the position, so admission can
    /// never violate the spacing invariant.
    pub fn stage_vehicle(&mut self, direction: Direction, side: LaneSide, front: f32) -> bool {
        let lane = &mut self.lanes[Self::lane_index(direction, side)];
        if !lane.position_clear(front) {
            return false;
        }
        let Some(slot) = lane.find_inactive() else {
            return false;
        };
        lane.slots[slot].activate(front);
        self.stats.record_activation();
        true
    }

    /// Admit a vehicle at the lane's canonical spawn offset.
    pub fn spawn_vehicle(&mut self, direction: Direction, side: LaneSide) -> bool {
        let spawn_front = self.lanes[Self::lane_index(direction, side)]
            .geometry
            .spawn_front;
        self.stage_vehicle(direction, side, spawn_front)
    }

    /// Demand-weighted spawn pass, run once per tick before motion.
    ///
    /// Each direction with demand rolls against a probability that grows
    /// with its share of total demand, debounced by [`SPAWN_INTERVAL`].
    /// A full lane or an occupied entry silently drops the attempt.
    pub fn spawn_step(&mut self, now: f32, demand: &DemandTable, rng: &mut SimRng) {
        let total: u32 = demand.values().sum();
        if total == 0 {
            return;
        }

        for direction in Direction::ALL {
            let count = demand[direction];
            if count == 0 {
                continue;
            }
            if now - self.last_spawn[direction] < SPAWN_INTERVAL {
                continue;
            }

            let share = count as f32 / total as f32;
            let chance = SPAWN_BASE_CHANCE + share * SPAWN_CHANCE_SPREAD;
            if rng.random_range(0.0..1.0) >= chance {
                continue;
            }

            let side = match rng.choose(&LaneSide::ALL) {
                Some(&side) => side,
                None => continue,
            };
            if self.spawn_vehicle(direction, side) {
                self.last_spawn[direction] = now;
            }
        }
    }

    /// Stage queued traffic behind the spawn points at a cycle boundary.
    ///
    /// Each direction gets up to `PRE_POPULATE_TARGET x share` vehicles,
    /// split between its two lanes, spaced exactly one minimum gap apart.
    /// Positions already shadowed by leftover traffic are skipped.
    pub fn pre_populate(&mut self, demand: &DemandTable) {
        let total: u32 = demand.values().sum();
        if total == 0 {
            return;
        }

        for direction in Direction::ALL {
            let share = demand[direction] as f32 / total as f32;
            let per_lane = (PRE_POPULATE_TARGET as f32 * share) as u32 / 2;
            for side in LaneSide::ALL {
                let lane = &self.lanes[Self::lane_index(direction, side)];
                let geometry = *lane.geometry();
                let mut staged = 0;
                for position in 0..MAX_CARS_PER_LANE as u32 {
                    if staged >= per_lane {
                        break;
                    }
                    let front =
                        geometry.spawn_front - geometry.sign * position as f32 * MIN_FOLLOWING_GAP;
                    if self.stage_vehicle(direction, side, front) {
                        staged += 1;
                    }
                }
            }
        }
    }

    /// Advance every lane by one tick.
    ///
    /// Vehicles are visited front-to-back so each sees its leader's
    /// already-updated position. Movement is skipped when it would close
    /// the gap below the minimum, or when an unlatched vehicle faces a red
    /// signal at its stop line; a latched vehicle ignores the signal but
    /// not the spacing.
    pub fn advance_step(&mut self, green: Option<Direction>, speed: f32, sim_secs: f32) {
        for lane in &mut self.lanes {
            let geometry = lane.geometry;
            let is_green = green == Some(geometry.direction);

            let ordered: Vec<usize> = lane.occupancy().into_values().collect();
            let mut leader_progress: Option<f32> = None;

            for &slot in ordered.iter().rev() {
                let vehicle = &mut lane.slots[slot];
                let progress = geometry.progress(vehicle.front);
                let blocked = leader_progress
                    .is_some_and(|ahead| ahead - progress < MIN_FOLLOWING_GAP + speed);

                vehicle.in_intersection =
                    geometry.in_footprint(vehicle.front, vehicle.rear(&geometry));
                if vehicle.in_intersection && !vehicle.entered_intersection {
                    vehicle.entered_intersection = true;
                }

                let mut moves = !blocked;
                if blocked || vehicle.entered_intersection {
                    vehicle.waiting_at_light = false;
                } else if !is_green && geometry.at_stop_line(vehicle.front) {
                    vehicle.waiting_at_light = true;
                    vehicle.wait_time += sim_secs;
                    moves = false;
                } else {
                    vehicle.waiting_at_light = false;
                }

                if geometry.past_footprint(vehicle.rear(&geometry)) {
                    vehicle.passed_intersection = true;
                }

                if moves {
                    vehicle.front += geometry.sign * speed;
                }

                if geometry.off_scene(vehicle.rear(&geometry)) {
                    let wait = vehicle.deactivate();
                    self.stats.record_passed(wait);
                }

                leader_progress = Some(geometry.progress(vehicle.front));
            }
        }
    }

    /// Snapshot of every active vehicle, for rendering and inspection.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleView> + '_ {
        self.lanes.iter().flat_map(|lane| {
            let geometry = lane.geometry;
            lane.slots
                .iter()
                .filter(|vehicle| vehicle.active)
                .map(move |vehicle| VehicleView {
                    direction: geometry.direction,
                    side: geometry.side,
                    front: vehicle.front,
                    cross: geometry.cross,
                    waiting_at_light: vehicle.waiting_at_light,
                    in_intersection: vehicle.in_intersection,
                    entered_intersection: vehicle.entered_intersection,
                    passed_intersection: vehicle.passed_intersection,
                })
        })
    }
}
