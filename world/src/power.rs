//! Power reserve bookkeeping for a night session.

use night_watch_core::{DoorStates, ObservationMode};

use crate::tuning::PowerTuning;

const FULL_LEVEL: f32 = 100.0;

/// Depleting reserve that funds camera and door usage.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PowerCell {
    level: f32,
}

impl PowerCell {
    pub(crate) const fn full() -> Self {
        Self { level: FULL_LEVEL }
    }

    pub(crate) const fn level(&self) -> f32 {
        self.level
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.level <= 0.0
    }

    /// Charges one tick's worth of drain against the reserve, clamping
    /// at zero.
    pub(crate) fn drain(
        &mut self,
        dt_seconds: f32,
        observation: ObservationMode,
        doors: DoorStates,
        tuning: &PowerTuning,
    ) {
        let mut rate = tuning.passive_rate;
        if observation.watched_camera().is_some() {
            rate += tuning.camera_rate;
        }
        rate += tuning.door_rate * doors.closed_count() as f32;
        self.level = (self.level - rate * dt_seconds).max(0.0);
    }
}
