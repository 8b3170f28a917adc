//! Adversary actors and the probabilistic advancement rule.

use night_watch_core::{
    AdversaryKind, AdversarySnapshot, DoorSide, DoorStates, NightIndex, ObservationMode, Route,
    Waypoint,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::tuning::AdvanceTuning;

/// Stateful actor bound to a route for one night session.
#[derive(Clone, Debug)]
pub(crate) struct Adversary {
    kind: AdversaryKind,
    route: Route,
    position: usize,
    speed: f32,
    aggression: f32,
    at_left_door: bool,
    at_right_door: bool,
}

impl Adversary {
    /// Arms an adversary for the given night at the start of its route.
    pub(crate) fn for_night(
        kind: AdversaryKind,
        night: NightIndex,
        tuning: &AdvanceTuning,
    ) -> Self {
        let base = tuning.base_rate + night.get() as f32 * tuning.rate_per_night;
        let mut adversary = Self {
            kind,
            route: kind.route(),
            position: 0,
            speed: kind.base_speed(),
            aggression: base * kind.aggression_scale(),
            at_left_door: false,
            at_right_door: false,
        };
        adversary.refresh_door_flags();
        adversary
    }

    pub(crate) const fn kind(&self) -> AdversaryKind {
        self.kind
    }

    fn current_waypoint(&self) -> Waypoint {
        self.route.waypoint(self.position)
    }

    /// Runs one advancement trial for the elapsed seconds, returning the old
    /// and new route index when the position changed.
    ///
    /// The advance chance is `aggression * night_factor * dt`, scaled down by
    /// the deter factor while the player watches the adversary's current
    /// zone. A watched adversary additionally risks retreating one waypoint.
    /// Both index updates clamp to the route bounds.
    pub(crate) fn advance(
        &mut self,
        dt_seconds: f32,
        night_factor: f32,
        observation: ObservationMode,
        tuning: &AdvanceTuning,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, usize)> {
        let from = self.position;
        let watched = match (observation.watched_camera(), self.current_waypoint().camera()) {
            (Some(watching), Some(zone)) => watching == zone,
            _ => false,
        };
        let deter = if watched {
            tuning.watched_deter_factor
        } else {
            1.0
        };
        let chance = self.aggression * night_factor * dt_seconds * deter;
        if rng.gen::<f32>() < chance {
            self.position = (self.position + 1).min(self.route.last_index());
        }
        if watched && rng.gen::<f32>() < tuning.watched_regress_rate * dt_seconds {
            self.position = self.position.saturating_sub(1);
        }
        self.refresh_door_flags();
        (self.position != from).then_some((from, self.position))
    }

    /// Reports the doorway side the adversary can breach through. A closed
    /// door fully blocks the breach.
    pub(crate) fn breach_attempt(&self, doors: DoorStates) -> Option<DoorSide> {
        if self.at_left_door && !doors.is_closed(DoorSide::Left) {
            return Some(DoorSide::Left);
        }
        if self.at_right_door && !doors.is_closed(DoorSide::Right) {
            return Some(DoorSide::Right);
        }
        None
    }

    fn refresh_door_flags(&mut self) {
        let doorway = self.current_waypoint().doorway();
        self.at_left_door = doorway == Some(DoorSide::Left);
        self.at_right_door = doorway == Some(DoorSide::Right);
    }

    pub(crate) fn snapshot(&self) -> AdversarySnapshot {
        AdversarySnapshot {
            kind: self.kind,
            name: self.kind.display_name(),
            position: self.position,
            waypoint: self.current_waypoint(),
            speed: self.speed,
            at_left_door: self.at_left_door,
            at_right_door: self.at_right_door,
        }
    }
}
