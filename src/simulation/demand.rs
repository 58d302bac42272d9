//! Demand sources for the signal policy
//!
//! Demand is either sampled synthetically or measured by an external
//! vehicle-counting pipeline. The measured path is a message-passing
//! boundary: the estimator worker posts one count per direction through a
//! [`DemandInlet`] (or the world's `submit_demand` callback) and the tick
//! loop drains the inbox without ever blocking on the worker.

use std::ops::RangeInclusive;
use std::sync::mpsc;

use super::types::{DemandTable, Direction, DirectionMap};

/// Range synthetic demand counts are sampled from.
pub const SYNTHETIC_DEMAND_RANGE: RangeInclusive<u32> = 10..=100;

/// Fallback range used when a measured count is missing at a cycle boundary.
pub const FALLBACK_DEMAND_RANGE: RangeInclusive<u32> = 5..=20;

/// How the world obtains a fresh demand table at each cycle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandMode {
    /// Sample every direction from [`SYNTHETIC_DEMAND_RANGE`].
    Synthetic,
    /// Use counts pushed by the external estimator.
    Measured {
        /// Defer each cycle start until all four directions have reported
        /// since the previous boundary. When false, the latest stored count
        /// is used and missing directions fall back to
        /// [`FALLBACK_DEMAND_RANGE`].
        hold_until_ready: bool,
    },
}

/// Inbox for measured counts, with a per-direction "ready" gate.
///
/// `submit` stores the most recent count and arms the gate; a cycle
/// boundary consumes the gates so that holding mode exerts backpressure on
/// every cycle, not just the first.
#[derive(Debug, Default)]
pub struct MeasuredDemand {
    counts: DirectionMap<Option<u32>>,
    ready: DirectionMap<bool>,
}

impl MeasuredDemand {
    pub fn submit(&mut self, direction: Direction, count: u32) {
        self.counts[direction] = Some(count);
        self.ready[direction] = true;
    }

    pub fn is_ready(&self, direction: Direction) -> bool {
        self.ready[direction]
    }

    pub fn all_ready(&self) -> bool {
        self.ready.values().all(|&ready| ready)
    }

    /// Latest count reported for `direction`, if any ever arrived.
    pub fn latest(&self, direction: Direction) -> Option<u32> {
        self.counts[direction]
    }

    /// Consume the gates for a cycle boundary.
    ///
    /// Returns the demand table once every direction has reported, clearing
    /// the gates so the next boundary waits for fresh estimates again.
    pub fn take_when_ready(&mut self) -> Option<DemandTable> {
        if !self.all_ready() {
            return None;
        }
        self.ready = DirectionMap::filled(false);
        Some(DemandTable::from_fn(|direction| {
            self.counts[direction].unwrap_or(0)
        }))
    }
}

/// Cloneable handle the external estimator worker uses to post counts.
///
/// Owned by the worker thread; the simulation side drains the paired
/// receiver at the start of every tick.
#[derive(Debug, Clone)]
pub struct DemandInlet {
    sender: mpsc::Sender<(Direction, u32)>,
}

impl DemandInlet {
    /// Post a measured count for one direction.
    ///
    /// Returns false when the simulation has been dropped.
    pub fn submit(&self, direction: Direction, count: u32) -> bool {
        self.sender.send((direction, count)).is_ok()
    }
}

pub(crate) fn demand_channel() -> (DemandInlet, mpsc::Receiver<(Direction, u32)>) {
    let (sender, receiver) = mpsc::channel();
    (DemandInlet { sender }, receiver)
}
