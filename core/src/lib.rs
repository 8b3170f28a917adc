#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Night Watch engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the night watch.";

/// Hard upper bound adapters apply to frame deltas before submitting
/// [`Command::Tick`]. Capping the delta keeps a single tick's advancement
/// probabilities proportionate even after long suspensions of the frame loop.
pub const MAX_TICK: Duration = Duration::from_millis(50);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the session and arms the adversaries for the given night.
    BeginNight {
        /// Night to set up; higher nights raise adversary aggression.
        night: NightIndex,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick,
        /// already capped at [`MAX_TICK`] by the submitting adapter.
        dt: Duration,
    },
    /// Flips the closed state of one office door.
    ToggleDoor {
        /// Door the request applies to.
        side: DoorSide,
    },
    /// Switches what the player is currently watching.
    SetObservation {
        /// Observation target the player selected.
        mode: ObservationMode,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a night was set up and the session is running.
    NightStarted {
        /// Night the session was armed with.
        night: NightIndex,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a door changed state in response to a toggle.
    DoorToggled {
        /// Door that changed state.
        side: DoorSide,
        /// Closed state the door ended up in.
        closed: bool,
    },
    /// Announces that the player's observation target changed.
    ObservationChanged {
        /// Observation target that became active.
        mode: ObservationMode,
    },
    /// Confirms that an adversary moved between route waypoints.
    AdversaryMoved {
        /// Archetype of the adversary that moved.
        adversary: AdversaryKind,
        /// Route index the adversary occupied before moving.
        from: usize,
        /// Route index the adversary occupies after moving.
        to: usize,
    },
    /// Reports that the power reserve reached zero and both doors were
    /// forced open for the remainder of the night.
    PowerExhausted,
    /// Confirms that the clock reached the end of the night while the
    /// player survived.
    NightWon {
        /// Night that was survived.
        night: NightIndex,
    },
    /// Reports that an adversary breached an undefended doorway.
    NightLost {
        /// Archetype of the adversary that breached.
        adversary: AdversaryKind,
        /// Doorway side the breach came through.
        side: DoorSide,
    },
}

/// One-based difficulty index of a night session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NightIndex(u32);

impl NightIndex {
    /// Creates a new night index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the night index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Camera zones the player can observe.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CameraId {
    /// Entry hall feed covering the far approach.
    A1,
    /// Corridor feed between the entry hall and the junction.
    A2,
    /// Junction feed adjacent to both office approaches.
    B1,
    /// Vent feed covering the secondary approach.
    B2,
}

impl CameraId {
    /// Display label shown on the camera selector and feed header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
        }
    }

    /// All camera zones in selector order.
    #[must_use]
    pub const fn all() -> [CameraId; 4] {
        [Self::A1, Self::A2, Self::B1, Self::B2]
    }
}

/// Sides of the office that adversaries can breach through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    /// Door guarding the left office approach.
    Left,
    /// Door guarding the right office approach.
    Right,
}

impl DoorSide {
    /// Display label used by HUD door indicators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// One node of an adversary route.
///
/// A waypoint is either a camera zone the player can observe or a doorway
/// breach point directly outside the office. Doorways are never observable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waypoint {
    /// Zone covered by the named camera.
    Camera(CameraId),
    /// Breach point at the named office door.
    Doorway(DoorSide),
}

impl Waypoint {
    /// Returns the camera covering this waypoint, if it is observable.
    #[must_use]
    pub const fn camera(self) -> Option<CameraId> {
        match self {
            Self::Camera(camera) => Some(camera),
            Self::Doorway(_) => None,
        }
    }

    /// Returns the doorway side of this waypoint, if it is a breach point.
    #[must_use]
    pub const fn doorway(self) -> Option<DoorSide> {
        match self {
            Self::Camera(_) => None,
            Self::Doorway(side) => Some(side),
        }
    }
}

/// Ordered, immutable sequence of waypoints an adversary advances along.
///
/// Routes are compiled in per archetype and shared by reference across all
/// sessions. Every route holds at least two waypoints and terminates at a
/// doorway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    waypoints: &'static [Waypoint],
}

impl Route {
    fn new(waypoints: &'static [Waypoint]) -> Self {
        debug_assert!(waypoints.len() >= 2, "routes require at least two waypoints");
        debug_assert!(
            matches!(waypoints[waypoints.len() - 1], Waypoint::Doorway(_)),
            "routes must terminate at a doorway"
        );
        Self { waypoints }
    }

    /// Number of waypoints in the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route holds no waypoints. Always false for
    /// compiled-in routes; provided to pair with [`Route::len`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the terminal doorway waypoint.
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Waypoint at the provided index. Panics if the index is out of range;
    /// adversary positions are clamped to `[0, last_index]` so in-range
    /// access is guaranteed by the world.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Waypoint {
        self.waypoints[index]
    }

    /// Full waypoint sequence in advancement order.
    #[must_use]
    pub const fn waypoints(&self) -> &'static [Waypoint] {
        self.waypoints
    }
}

static LONG_ARMS_ROUTE: [Waypoint; 4] = [
    Waypoint::Camera(CameraId::A1),
    Waypoint::Camera(CameraId::A2),
    Waypoint::Camera(CameraId::B1),
    Waypoint::Doorway(DoorSide::Left),
];

static CLIMBER_ROUTE: [Waypoint; 4] = [
    Waypoint::Camera(CameraId::B2),
    Waypoint::Camera(CameraId::B1),
    Waypoint::Camera(CameraId::A2),
    Waypoint::Doorway(DoorSide::Right),
];

/// Adversary archetypes stalking the office.
///
/// Variant order doubles as the session list order, which breach resolution
/// consults first to last.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AdversaryKind {
    /// Approaches through the entry hall toward the left door.
    LongArms,
    /// Approaches through the vents toward the right door.
    Climber,
}

impl AdversaryKind {
    /// Display name shown on camera feeds and loss reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::LongArms => "Long Arms",
            Self::Climber => "Climber",
        }
    }

    /// Scale applied to the per-night base aggression rate.
    ///
    /// `AdversaryKind::Climber` runs at nine tenths of the base rate.
    #[must_use]
    pub const fn aggression_scale(self) -> f32 {
        match self {
            Self::LongArms => 1.0,
            Self::Climber => 0.9,
        }
    }

    /// Movement pacing scalar carried on each adversary for tuning.
    /// The advancement probability does not consume it.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::LongArms => 1.0,
            Self::Climber => 1.0,
        }
    }

    /// Route the archetype advances along.
    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::LongArms => Route::new(&LONG_ARMS_ROUTE),
            Self::Climber => Route::new(&CLIMBER_ROUTE),
        }
    }

    /// All archetypes in session list order.
    #[must_use]
    pub const fn all() -> [AdversaryKind; 2] {
        [Self::LongArms, Self::Climber]
    }
}

/// What the player is currently watching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObservationMode {
    /// Watching the office itself; no camera is active.
    Office,
    /// Watching the feed of the named camera.
    Camera(CameraId),
}

impl ObservationMode {
    /// Returns the camera being watched, if any.
    #[must_use]
    pub const fn watched_camera(self) -> Option<CameraId> {
        match self {
            Self::Office => None,
            Self::Camera(camera) => Some(camera),
        }
    }
}

/// Lifecycle state of a night session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightStatus {
    /// The session is simulating; ticks advance the clock.
    Running,
    /// The clock reached the end of the night with the player alive.
    Won,
    /// An adversary breached an undefended doorway.
    Lost,
}

impl NightStatus {
    /// Reports whether the session reached an outcome. Terminal states
    /// freeze all further simulation until the next night begins.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Closed state of both office doors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DoorStates {
    /// Whether the left door is currently closed.
    pub left_closed: bool,
    /// Whether the right door is currently closed.
    pub right_closed: bool,
}

impl DoorStates {
    /// Reports whether the door on the provided side is closed.
    #[must_use]
    pub const fn is_closed(self, side: DoorSide) -> bool {
        match side {
            DoorSide::Left => self.left_closed,
            DoorSide::Right => self.right_closed,
        }
    }

    /// Number of doors currently closed.
    #[must_use]
    pub const fn closed_count(self) -> u32 {
        self.left_closed as u32 + self.right_closed as u32
    }
}

/// Immutable representation of a single adversary's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdversarySnapshot {
    /// Archetype of the adversary.
    pub kind: AdversaryKind,
    /// Display name of the adversary.
    pub name: &'static str,
    /// Route index the adversary currently occupies.
    pub position: usize,
    /// Waypoint at the current route index.
    pub waypoint: Waypoint,
    /// Movement pacing scalar carried for tuning.
    pub speed: f32,
    /// Whether the adversary stands at the left office doorway.
    pub at_left_door: bool,
    /// Whether the adversary stands at the right office doorway.
    pub at_right_door: bool,
}

/// Read-only snapshot describing all adversaries in the session.
#[derive(Clone, Debug, Default)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new adversary view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.kind);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}
