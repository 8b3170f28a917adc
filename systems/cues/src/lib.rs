#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure cue system mapping session events to audio playback descriptors.

use std::time::Duration;

use night_watch_core::Event;

const HUM_VOLUME: f32 = 0.3;
const CAMERA_VOLUME: f32 = 0.4;
const DOOR_VOLUME: f32 = 0.4;
const ALARM_VOLUME: f32 = 0.7;
const DEFEAT_VOLUME: f32 = 0.8;
const VICTORY_VOLUME: f32 = 0.7;
/// The defeat sting trails the breach alarm by a quarter second.
const DEFEAT_DELAY: Duration = Duration::from_millis(250);

/// Kinds of audio cues the presentation layer can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// Low room tone started when a night begins.
    AmbientHum,
    /// Feedback blip when a camera feed becomes active.
    CameraBlip,
    /// Servo thunk when a door opens or closes.
    DoorServo,
    /// Alarm burst when an adversary breaches the office.
    BreachAlarm,
    /// Defeat sting layered after the breach alarm.
    Defeat,
    /// Chime played when the night is survived.
    Victory,
}

/// Playback descriptor emitted for the audio backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cue {
    /// Kind of cue to play.
    pub kind: CueKind,
    /// Linear volume in the 0 to 1 range.
    pub volume: f32,
    /// Delay the backend should wait before starting playback.
    pub delay: Duration,
}

impl Cue {
    const fn immediate(kind: CueKind, volume: f32) -> Self {
        Self {
            kind,
            volume,
            delay: Duration::ZERO,
        }
    }
}

/// Pure cue system that owns the mute latch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cues {
    muted: bool,
}

impl Cues {
    /// Creates a new cue system with audio enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { muted: false }
    }

    /// Flips the mute latch, returning the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Reports whether cue emission is currently muted.
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Consumes session events and emits playback cues for the frame.
    ///
    /// Clock ticks, adversary movement, and the blackout transition are
    /// intentionally silent; returning to the office view emits no blip.
    pub fn handle(&self, events: &[Event], out_cues: &mut Vec<Cue>) {
        if self.muted {
            return;
        }

        for event in events {
            match event {
                Event::NightStarted { .. } => {
                    out_cues.push(Cue::immediate(CueKind::AmbientHum, HUM_VOLUME));
                }
                Event::ObservationChanged { mode } => {
                    if mode.watched_camera().is_some() {
                        out_cues.push(Cue::immediate(CueKind::CameraBlip, CAMERA_VOLUME));
                    }
                }
                Event::DoorToggled { .. } => {
                    out_cues.push(Cue::immediate(CueKind::DoorServo, DOOR_VOLUME));
                }
                Event::NightLost { .. } => {
                    out_cues.push(Cue::immediate(CueKind::BreachAlarm, ALARM_VOLUME));
                    out_cues.push(Cue {
                        kind: CueKind::Defeat,
                        volume: DEFEAT_VOLUME,
                        delay: DEFEAT_DELAY,
                    });
                }
                Event::NightWon { .. } => {
                    out_cues.push(Cue::immediate(CueKind::Victory, VICTORY_VOLUME));
                }
                _ => {}
            }
        }
    }
}
