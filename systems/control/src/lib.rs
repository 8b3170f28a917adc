#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system translating per-frame player intents into session
//! commands.

use night_watch_core::{CameraId, Command, DoorSide, Event, ObservationMode};

const INITIAL_CAMERA: CameraId = CameraId::A1;

/// Input snapshot distilled from adapter-provided frame input data.
///
/// Adapters latch raw input edges so every `true` field represents exactly
/// one player action on this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlInput {
    /// Indicates whether the player toggled the left door on this frame.
    pub toggle_left_door: bool,
    /// Indicates whether the player toggled the right door on this frame.
    pub toggle_right_door: bool,
    /// Indicates whether the player flipped between office and camera view.
    pub toggle_view: bool,
    /// Camera the player selected on this frame, if any.
    pub select_camera: Option<CameraId>,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        toggle_left_door: bool,
        toggle_right_door: bool,
        toggle_view: bool,
        select_camera: Option<CameraId>,
    ) -> Self {
        Self {
            toggle_left_door,
            toggle_right_door,
            toggle_view,
            select_camera,
        }
    }
}

impl Default for ControlInput {
    fn default() -> Self {
        Self {
            toggle_left_door: false,
            toggle_right_door: false,
            toggle_view: false,
            select_camera: None,
        }
    }
}

/// Control system that translates input intents into commands while
/// remembering the last watched camera across view flips.
#[derive(Clone, Debug)]
pub struct Control {
    observation: ObservationMode,
    last_camera: CameraId,
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

impl Control {
    /// Creates a new control system instance mirroring a freshly armed
    /// session: office view, first camera remembered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observation: ObservationMode::Office,
            last_camera: INITIAL_CAMERA,
        }
    }

    /// Consumes session events and frame input to emit control commands.
    ///
    /// Camera selection takes precedence over a simultaneous view flip.
    pub fn handle(&mut self, events: &[Event], input: ControlInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::NightStarted { .. } => {
                    self.observation = ObservationMode::Office;
                    self.last_camera = INITIAL_CAMERA;
                }
                Event::ObservationChanged { mode } => {
                    self.observation = *mode;
                    if let Some(camera) = mode.watched_camera() {
                        self.last_camera = camera;
                    }
                }
                _ => {}
            }
        }

        if input.toggle_left_door {
            out.push(Command::ToggleDoor {
                side: DoorSide::Left,
            });
        }
        if input.toggle_right_door {
            out.push(Command::ToggleDoor {
                side: DoorSide::Right,
            });
        }

        if let Some(camera) = input.select_camera {
            out.push(Command::SetObservation {
                mode: ObservationMode::Camera(camera),
            });
        } else if input.toggle_view {
            let mode = match self.observation {
                ObservationMode::Office => ObservationMode::Camera(self.last_camera),
                ObservationMode::Camera(_) => ObservationMode::Office,
            };
            out.push(Command::SetObservation { mode });
        }
    }
}
