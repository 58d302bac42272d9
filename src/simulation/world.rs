//! Main simulation world that ties everything together
//!
//! This is the entry point for driving the intersection simulation: an
//! external clock calls [`SimWorld::step`] at a roughly fixed cadence and
//! reads the query accessors; everything below executes synchronously on
//! the caller's thread.

use std::sync::mpsc;

use log::{debug, warn};
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::demand::{
    demand_channel, DemandInlet, DemandMode, MeasuredDemand, FALLBACK_DEMAND_RANGE,
    SYNTHETIC_DEMAND_RANGE,
};
use super::fleet::{VehicleFleet, VehicleView};
use super::policy::compute_signal_durations;
use super::scheduler::{PhaseScheduler, PhaseTick};
use super::stats::SimulationStats;
use super::types::{
    DemandTable, Direction, DurationTable, LaneSide, TimeOfDay, BASE_CAR_SPEED,
};

/// Randomness source, optionally seeded for reproducible simulations.
#[derive(Debug)]
pub(crate) struct SimRng(Option<StdRng>);

impl SimRng {
    fn from_thread() -> Self {
        Self(None)
    }

    fn seeded(seed: u64) -> Self {
        Self(Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using the seeded RNG if available.
    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        match &mut self.0 {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random element from a slice, using the seeded RNG if available.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.0 {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }
}

/// The complete intersection simulation.
pub struct SimWorld {
    scheduler: PhaseScheduler,
    fleet: VehicleFleet,

    demand_mode: DemandMode,
    measured: MeasuredDemand,
    inlet: DemandInlet,
    inbox: mpsc::Receiver<(Direction, u32)>,
    current_demand: DemandTable,

    bias: TimeOfDay,
    speed_multiplier: f32,
    paused: bool,

    /// Simulated time in seconds.
    time: f32,

    rng: SimRng,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: SimRng) -> Self {
        let (inlet, inbox) = demand_channel();
        Self {
            scheduler: PhaseScheduler::new(),
            fleet: VehicleFleet::new(),
            demand_mode: DemandMode::Synthetic,
            measured: MeasuredDemand::default(),
            inlet,
            inbox,
            current_demand: DemandTable::filled(0),
            bias: TimeOfDay::Normal,
            speed_multiplier: 1.0,
            paused: false,
            time: 0.0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(SimRng::from_thread())
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations.
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(SimRng::seeded(seed))
    }

    /// Select how demand is obtained at cycle boundaries.
    pub fn set_demand_mode(&mut self, mode: DemandMode) {
        self.demand_mode = mode;
    }

    /// Main simulation tick.
    ///
    /// Order within the tick: estimator inbox drain, phase timer (possibly
    /// starting a new phase or cycle), spawning, then motion - so a cycle
    /// boundary's fresh durations are visible to the same tick's motion
    /// decisions. Does nothing while paused or for a non-positive delta.
    pub fn step(&mut self, dt_secs: f32) {
        if self.paused || !dt_secs.is_finite() || dt_secs <= 0.0 {
            return;
        }

        self.drain_inbox();

        let sim_secs = dt_secs * self.speed_multiplier;
        self.time += sim_secs;

        match self.scheduler.tick(sim_secs) {
            PhaseTick::Running => {}
            PhaseTick::Expired { next, cycle_start } => {
                if cycle_start {
                    self.start_cycle(next);
                } else {
                    self.scheduler.start_next_phase();
                    debug!(
                        "phase -> {:?} ({}s)",
                        next,
                        self.scheduler.durations()[next]
                    );
                }
            }
        }

        let speed = BASE_CAR_SPEED * self.speed_multiplier;
        self.fleet.spawn_step(self.time, &self.current_demand, &mut self.rng);
        self.fleet
            .advance_step(self.scheduler.active_direction(), speed, sim_secs);
    }

    /// Begin a new cycle if demand is available, otherwise stay all-red.
    fn start_cycle(&mut self, first: Direction) {
        let Some(demand) = self.refresh_demand() else {
            // Measured demand still pending; the estimator's backpressure
            // keeps every signal red until all four directions report.
            return;
        };

        self.current_demand = demand;
        self.scheduler
            .set_durations(compute_signal_durations(&self.current_demand, self.bias));
        self.fleet.pre_populate(&self.current_demand);
        self.scheduler.start_next_phase();
        debug!(
            "cycle {} -> {:?} green for {}s",
            self.scheduler.cycle_count(),
            first,
            self.scheduler.durations()[first]
        );
    }

    /// Produce the demand table for a new cycle, or None to defer it.
    fn refresh_demand(&mut self) -> Option<DemandTable> {
        match self.demand_mode {
            DemandMode::Synthetic => {
                let rng = &mut self.rng;
                Some(DemandTable::from_fn(|_| {
                    rng.random_range(SYNTHETIC_DEMAND_RANGE)
                }))
            }
            DemandMode::Measured { hold_until_ready } => {
                if hold_until_ready {
                    let table = self.measured.take_when_ready();
                    if table.is_none() {
                        debug!("cycle deferred: waiting on demand estimates");
                    }
                    table
                } else {
                    let measured = &self.measured;
                    let rng = &mut self.rng;
                    Some(DemandTable::from_fn(|direction| {
                        measured.latest(direction).unwrap_or_else(|| {
                            let fallback = rng.random_range(FALLBACK_DEMAND_RANGE);
                            warn!(
                                "no measured count for {:?}; falling back to {}",
                                direction, fallback
                            );
                            fallback
                        })
                    }))
                }
            }
        }
    }

    fn drain_inbox(&mut self) {
        for (direction, count) in self.inbox.try_iter() {
            self.measured.submit(direction, count);
        }
    }

    /// Push a measured count for one direction (estimator callback).
    ///
    /// Marks the direction ready; the count takes effect at the next cycle
    /// boundary.
    pub fn submit_demand(&mut self, direction: Direction, count: u32) {
        self.measured.submit(direction, count);
    }

    /// Handle for an estimator worker thread to post counts through.
    pub fn demand_inlet(&self) -> DemandInlet {
        self.inlet.clone()
    }

    /// Whether a measured count has arrived for `direction` this cycle.
    pub fn demand_ready(&self, direction: Direction) -> bool {
        self.measured.is_ready(direction)
    }

    pub fn set_bias(&mut self, bias: TimeOfDay) {
        self.bias = bias;
    }

    pub fn bias(&self) -> TimeOfDay {
        self.bias
    }

    /// Set the clock multiplier applied to both the phase timer and
    /// vehicle motion. Returns false (leaving the value unchanged) for a
    /// non-finite or non-positive multiplier.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> bool {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return false;
        }
        self.speed_multiplier = multiplier;
        true
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Halt stepping; ticks become no-ops until [`resume`](SimWorld::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Manually admit a vehicle at the lane's canonical spawn offset.
    pub fn spawn_vehicle(&mut self, direction: Direction, side: LaneSide) -> bool {
        self.fleet.spawn_vehicle(direction, side)
    }

    /// Manually place a vehicle with its leading edge at `front`, as the
    /// pre-population path does. Refused when it would violate spacing.
    pub fn stage_vehicle(&mut self, direction: Direction, side: LaneSide, front: f32) -> bool {
        self.fleet.stage_vehicle(direction, side, front)
    }

    pub fn active_direction(&self) -> Option<Direction> {
        self.scheduler.active_direction()
    }

    pub fn is_green(&self, direction: Direction) -> bool {
        self.scheduler.is_green(direction)
    }

    /// Seconds remaining in the current phase.
    pub fn time_remaining(&self) -> f32 {
        self.scheduler.time_remaining()
    }

    pub fn demand(&self) -> &DemandTable {
        &self.current_demand
    }

    pub fn durations(&self) -> &DurationTable {
        self.scheduler.durations()
    }

    /// Total green time a direction has held so far (display only).
    pub fn elapsed_green(&self, direction: Direction) -> f32 {
        self.scheduler.elapsed_green(direction)
    }

    /// Number of full cycles started.
    pub fn cycle_count(&self) -> u64 {
        self.scheduler.cycle_count()
    }

    pub fn total_passed(&self) -> u64 {
        self.fleet.stats().total_passed
    }

    pub fn cars_on_screen(&self) -> usize {
        self.fleet.stats().on_screen
    }

    pub fn stats(&self) -> &SimulationStats {
        self.fleet.stats()
    }

    /// Renderable state of every active vehicle.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleView> + '_ {
        self.fleet.vehicles()
    }

    /// Simulated seconds elapsed since construction.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Print a human-readable snapshot of the simulation state.
    pub fn print_summary(&self) {
        match self.active_direction() {
            Some(direction) => println!(
                "Active: {:?} ({:.0}s left, cycle {})",
                direction,
                self.time_remaining(),
                self.cycle_count()
            ),
            None => println!("Active: none (awaiting demand)"),
        }
        println!("{:<9} {:>6} {:>9}", "Approach", "Demand", "Green(s)");
        for (direction, count) in self.current_demand.iter() {
            println!(
                "{:<9} {:>6} {:>9}",
                format!("{:?}", direction),
                count,
                self.durations()[direction]
            );
        }
        println!("{}", self.fleet.stats().summary());
    }
}
