//! Core types for the intersection simulation
//!
//! Standalone types shared by every sub-system: the four approach
//! directions, lane identification, per-direction tables, and the lane
//! geometry descriptor that replaces per-direction coordinate branching.

use std::ops::{Index, IndexMut};

/// One of the four approaches to the intersection.
///
/// The declaration order is the fixed phase sequence: North -> South ->
/// East -> West, then wrapping back to North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in phase-sequence order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Index into per-direction tables.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Whether traffic from this approach travels along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// Which of the two parallel lanes of an approach a vehicle occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneSide {
    Left,
    Right,
}

impl LaneSide {
    pub const ALL: [LaneSide; 2] = [LaneSide::Left, LaneSide::Right];
}

/// Time-of-day selector biasing the signal policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    Normal,
    Morning,
    Evening,
}

/// A fixed table holding one value per [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionMap<T>([T; 4]);

impl<T> DirectionMap<T> {
    /// Build a table by evaluating `f` for every direction in sequence order.
    pub fn from_fn(f: impl FnMut(Direction) -> T) -> Self {
        Self(Direction::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Copy> DirectionMap<T> {
    /// A table with the same value in every slot.
    pub fn filled(value: T) -> Self {
        Self([value; 4])
    }
}

impl<T> Index<Direction> for DirectionMap<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        &self.0[direction.index()]
    }
}

impl<T> IndexMut<Direction> for DirectionMap<T> {
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        &mut self.0[direction.index()]
    }
}

/// Per-direction vehicle demand counts, refreshed once per full cycle.
pub type DemandTable = DirectionMap<u32>;

/// Per-direction green durations in seconds, derived from a [`DemandTable`].
pub type DurationTable = DirectionMap<u32>;

/// Side length of the square simulated scene, in world units.
pub const SCENE_SIZE: f32 = 800.0;

/// Full width of each road band (two lanes per travel direction).
pub const ROAD_WIDTH: f32 = 200.0;

/// Width of a single lane.
pub const LANE_WIDTH: f32 = 50.0;

/// Center of the scene on both axes.
pub const CENTER: f32 = SCENE_SIZE / 2.0;

/// Near edge of the intersection footprint (where the road bands overlap).
pub const FOOTPRINT_START: f32 = CENTER - ROAD_WIDTH / 2.0;

/// Far edge of the intersection footprint.
pub const FOOTPRINT_END: f32 = CENTER + ROAD_WIDTH / 2.0;

/// Distance between a stop line and the footprint edge it guards.
pub const STOP_LINE_MARGIN: f32 = 15.0;

/// Length of a vehicle along its travel axis.
pub const CAR_LENGTH: f32 = 30.0;

/// Width of a vehicle across its travel axis.
pub const CAR_WIDTH: f32 = 20.0;

/// Minimum clear space between a vehicle's front and its leader's rear.
pub const SAFE_DISTANCE: f32 = 15.0;

/// Minimum leading-edge-to-leading-edge gap between vehicles in a lane.
pub const MIN_FOLLOWING_GAP: f32 = CAR_LENGTH + SAFE_DISTANCE;

/// Vehicle slots pre-allocated per lane.
pub const MAX_CARS_PER_LANE: usize = 20;

/// Distance a vehicle travels per tick at speed multiplier 1.
pub const BASE_CAR_SPEED: f32 = 5.0;

/// How far past the scene edge a vehicle must be before it is recycled.
pub const OFFSCREEN_MARGIN: f32 = 10.0;

/// Fixed geometry of one lane, selected once at construction.
///
/// Positional predicates are expressed in "progress" space
/// (`coordinate * sign`), which increases in the direction of travel for
/// all four approaches, so front/rear position, stop-line, footprint, and
/// spawn-offset checks are each written once as a signed comparison.
#[derive(Debug, Clone, Copy)]
pub struct LaneGeometry {
    pub direction: Direction,
    pub side: LaneSide,
    /// +1.0 when travel increases the axis coordinate, -1.0 otherwise.
    pub sign: f32,
    /// Leading-edge coordinate of a freshly spawned vehicle.
    pub spawn_front: f32,
    /// Coordinate of the stop line guarding the footprint.
    pub stop_line: f32,
    /// Footprint edge first reached by traffic in this lane.
    pub entry_edge: f32,
    /// Footprint edge on the far side.
    pub exit_edge: f32,
    /// Coordinate past which a vehicle has fully left the scene.
    pub off_limit: f32,
    /// Cross-axis offset of the lane center line (for rendering).
    pub cross: f32,
}

impl LaneGeometry {
    pub fn new(direction: Direction, side: LaneSide) -> Self {
        let sign = match direction {
            Direction::North | Direction::West => 1.0,
            Direction::South | Direction::East => -1.0,
        };

        let (spawn_front, stop_line, entry_edge, exit_edge, off_limit) = if sign > 0.0 {
            (
                0.0,
                FOOTPRINT_START - STOP_LINE_MARGIN,
                FOOTPRINT_START,
                FOOTPRINT_END,
                SCENE_SIZE + OFFSCREEN_MARGIN,
            )
        } else {
            (
                SCENE_SIZE,
                FOOTPRINT_END + STOP_LINE_MARGIN,
                FOOTPRINT_END,
                FOOTPRINT_START,
                -OFFSCREEN_MARGIN,
            )
        };

        let cross = match (direction, side) {
            (Direction::North | Direction::West, LaneSide::Left) => CENTER - LANE_WIDTH,
            (Direction::North | Direction::West, LaneSide::Right) => CENTER - 2.0 * LANE_WIDTH,
            (Direction::South | Direction::East, LaneSide::Left) => CENTER,
            (Direction::South | Direction::East, LaneSide::Right) => CENTER + LANE_WIDTH,
        };

        Self {
            direction,
            side,
            sign,
            spawn_front,
            stop_line,
            entry_edge,
            exit_edge,
            off_limit,
            cross,
        }
    }

    /// Position on a scale that increases in the direction of travel.
    pub fn progress(&self, coordinate: f32) -> f32 {
        coordinate * self.sign
    }

    /// Trailing-edge coordinate of a vehicle whose leading edge is `front`.
    pub fn rear_of(&self, front: f32) -> f32 {
        front - self.sign * CAR_LENGTH
    }

    /// The leading edge has reached the stop line.
    pub fn at_stop_line(&self, front: f32) -> bool {
        self.progress(front) >= self.progress(self.stop_line)
    }

    /// Any part of the vehicle overlaps the intersection footprint.
    pub fn in_footprint(&self, front: f32, rear: f32) -> bool {
        self.progress(front) > self.progress(self.entry_edge)
            && self.progress(rear) < self.progress(self.exit_edge)
    }

    /// The trailing edge has cleared the far footprint edge.
    pub fn past_footprint(&self, rear: f32) -> bool {
        self.progress(rear) > self.progress(self.exit_edge)
    }

    /// The vehicle is fully outside the simulated scene.
    pub fn off_scene(&self, rear: f32) -> bool {
        self.progress(rear) > self.progress(self.off_limit)
    }
}
