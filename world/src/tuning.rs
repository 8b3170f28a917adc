//! Tuning tables holding every adjustable rate in the night simulation.

/// Aggregated tuning knobs for one night session.
#[derive(Clone, Debug)]
pub struct NightTuning {
    /// Drain rates charged against the power reserve.
    pub power: PowerTuning,
    /// Advancement probability parameters shared by all adversaries.
    pub advance: AdvanceTuning,
}

impl Default for NightTuning {
    fn default() -> Self {
        Self {
            power: PowerTuning::default(),
            advance: AdvanceTuning::default(),
        }
    }
}

/// Per-second drain rates charged against the power reserve.
#[derive(Clone, Debug)]
pub struct PowerTuning {
    /// Baseline drain applied every second regardless of player activity.
    pub passive_rate: f32,
    /// Additional drain while any camera feed is being watched.
    pub camera_rate: f32,
    /// Additional drain per closed door; two closed doors charge it twice.
    pub door_rate: f32,
}

impl Default for PowerTuning {
    fn default() -> Self {
        Self {
            passive_rate: 0.02,
            camera_rate: 0.12,
            door_rate: 0.3,
        }
    }
}

/// Advancement probability parameters shared by all adversaries.
///
/// The base rate and per-night ramp are folded into each adversary's
/// aggression when a night begins; the remaining factors are read live on
/// every tick.
#[derive(Clone, Debug)]
pub struct AdvanceTuning {
    /// Aggression rate before the per-night ramp is applied.
    pub base_rate: f32,
    /// Aggression added per night index on top of the base rate.
    pub rate_per_night: f32,
    /// Night-factor increment per night index multiplied into every
    /// advance chance.
    pub night_factor_step: f32,
    /// Multiplier applied to the advance chance while the adversary's
    /// current zone is being watched.
    pub watched_deter_factor: f32,
    /// Per-second probability of retreating one waypoint while watched.
    pub watched_regress_rate: f32,
}

impl Default for AdvanceTuning {
    fn default() -> Self {
        Self {
            base_rate: 0.04,
            rate_per_night: 0.01,
            night_factor_step: 0.1,
            watched_deter_factor: 0.4,
            watched_regress_rate: 0.02,
        }
    }
}
