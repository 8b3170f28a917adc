#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Night Watch adapters.
//!
//! This crate holds no drawing code. It defines the declarative scene and HUD
//! descriptors backends consume, the office layout metrics that place door
//! indicators and doorway silhouettes on a canvas, and the backend trait that
//! runs a presentation with a per-frame update closure.

use anyhow::Result as AnyResult;
use glam::Vec2;
use night_watch_core::{
    AdversaryKind, AdversarySnapshot, CameraId, DoorSide, DoorStates, NightIndex, NightStatus,
    ObservationMode,
};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

/// Fill used for a door indicator while the door is closed.
pub const DOOR_CLOSED_COLOR: Color = Color::from_rgb_u8(0x4c, 0xaf, 0x50);
/// Fill used for a door indicator while the door is open.
pub const DOOR_OPEN_COLOR: Color = Color::from_rgb_u8(0xb3, 0x39, 0x39);
/// Overlay text color announcing a survived night.
pub const VICTORY_TEXT_COLOR: Color = Color::from_rgb_u8(0x9e, 0xe4, 0x93);
/// Overlay text color announcing a breach.
pub const DEFEAT_TEXT_COLOR: Color = Color::from_rgb_u8(0xff, 0x7b, 0x7b);

/// Input snapshot gathered by adapters before updating the scene.
///
/// Every boolean field is an edge latched by the adapter, so `true` means
/// the player performed that action exactly once on this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the left door switch was pressed on this frame.
    pub toggle_left_door: bool,
    /// Whether the right door switch was pressed on this frame.
    pub toggle_right_door: bool,
    /// Whether the office/camera view toggle was pressed on this frame.
    pub toggle_view: bool,
    /// Camera the player selected on this frame, if any.
    pub select_camera: Option<CameraId>,
    /// Whether the mute toggle was pressed on this frame.
    pub toggle_mute: bool,
}

const HOUR_LABELS: [&str; 7] = [
    "12:00 AM", "1:00 AM", "2:00 AM", "3:00 AM", "4:00 AM", "5:00 AM", "6:00 AM",
];
const MINUTES_PER_HOUR: f32 = 60.0;

/// Maps elapsed game-minutes to the clock label shown on the HUD.
///
/// The night runs midnight to dawn; the hour index clamps at six so a clock
/// past the end of the night keeps reading `6:00 AM`.
#[must_use]
pub fn clock_label(elapsed_minutes: f32) -> &'static str {
    let hour = (elapsed_minutes.max(0.0) / MINUTES_PER_HOUR) as usize;
    HOUR_LABELS[hour.min(HOUR_LABELS.len() - 1)]
}

/// Axis-aligned screen-space rectangle measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRect {
    /// Upper-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

impl LayoutRect {
    /// Creates a new rectangle from its corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

const DOOR_INDICATOR_SIZE: Vec2 = Vec2::new(120.0, 30.0);
const SILHOUETTE_SIZE: Vec2 = Vec2::new(140.0, 180.0);
const SILHOUETTE_EDGE_OFFSET: f32 = 80.0;
/// Alpha applied to doorway silhouettes so the office shows through them.
pub const SILHOUETTE_ALPHA: f32 = 0.7;

/// Screen-space placement of the office view's fixtures for one canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfficeLayout {
    canvas: Vec2,
}

impl OfficeLayout {
    /// Creates the layout for a canvas of the provided pixel size.
    #[must_use]
    pub const fn new(canvas: Vec2) -> Self {
        Self { canvas }
    }

    /// Rectangle of the door indicator in the bottom corner of its side.
    #[must_use]
    pub fn door_indicator(&self, side: DoorSide) -> LayoutRect {
        let y = self.canvas.y - DOOR_INDICATOR_SIZE.y;
        let x = match side {
            DoorSide::Left => 0.0,
            DoorSide::Right => self.canvas.x - DOOR_INDICATOR_SIZE.x,
        };
        LayoutRect::new(Vec2::new(x, y), DOOR_INDICATOR_SIZE)
    }

    /// Rectangle a doorway silhouette occupies, offset in from its edge and
    /// vertically centered on the canvas.
    #[must_use]
    pub fn silhouette(&self, side: DoorSide) -> LayoutRect {
        let y = (self.canvas.y - SILHOUETTE_SIZE.y) * 0.5;
        let x = match side {
            DoorSide::Left => SILHOUETTE_EDGE_OFFSET,
            DoorSide::Right => self.canvas.x - SILHOUETTE_EDGE_OFFSET - SILHOUETTE_SIZE.x,
        };
        LayoutRect::new(Vec2::new(x, y), SILHOUETTE_SIZE)
    }
}

/// One door indicator in the office view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorIndicator {
    /// Door the indicator reports on.
    pub side: DoorSide,
    /// Closed state of the door.
    pub closed: bool,
    /// Fill color derived from the closed state.
    pub fill: Color,
    /// Screen-space rectangle of the indicator.
    pub rect: LayoutRect,
}

/// One adversary silhouette standing in an office doorway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorwaySilhouette {
    /// Archetype to draw.
    pub adversary: AdversaryKind,
    /// Doorway the adversary stands in.
    pub side: DoorSide,
    /// Screen-space rectangle of the silhouette.
    pub rect: LayoutRect,
    /// Alpha the silhouette is drawn with.
    pub alpha: f32,
}

/// Declarative office view: two door indicators plus any doorway silhouettes.
#[derive(Clone, Debug, PartialEq)]
pub struct OfficeScene {
    /// Door indicators in left, right order.
    pub doors: [DoorIndicator; 2],
    /// Silhouettes of adversaries currently standing at a doorway.
    pub silhouettes: Vec<DoorwaySilhouette>,
}

impl OfficeScene {
    /// Assembles the office view from session snapshots.
    #[must_use]
    pub fn compose(
        layout: OfficeLayout,
        doors: DoorStates,
        adversaries: &[AdversarySnapshot],
    ) -> Self {
        let indicator = |side: DoorSide| {
            let closed = doors.is_closed(side);
            DoorIndicator {
                side,
                closed,
                fill: if closed {
                    DOOR_CLOSED_COLOR
                } else {
                    DOOR_OPEN_COLOR
                },
                rect: layout.door_indicator(side),
            }
        };
        let silhouettes = adversaries
            .iter()
            .filter_map(|snapshot| {
                let side = if snapshot.at_left_door {
                    DoorSide::Left
                } else if snapshot.at_right_door {
                    DoorSide::Right
                } else {
                    return None;
                };
                Some(DoorwaySilhouette {
                    adversary: snapshot.kind,
                    side,
                    rect: layout.silhouette(side),
                    alpha: SILHOUETTE_ALPHA,
                })
            })
            .collect();
        Self {
            doors: [indicator(DoorSide::Left), indicator(DoorSide::Right)],
            silhouettes,
        }
    }
}

/// Declarative camera feed: which adversaries stand in the viewed zone.
///
/// Static-noise intensity and feed styling are backend business.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraScene {
    /// Camera the feed shows.
    pub camera: CameraId,
    /// Adversaries whose current waypoint lies in the viewed zone.
    pub visible: Vec<AdversaryKind>,
}

impl CameraScene {
    /// Assembles the feed for one camera from session snapshots.
    #[must_use]
    pub fn compose(camera: CameraId, adversaries: &[AdversarySnapshot]) -> Self {
        let visible = adversaries
            .iter()
            .filter(|snapshot| snapshot.waypoint.camera() == Some(camera))
            .map(|snapshot| snapshot.kind)
            .collect();
        Self { camera, visible }
    }
}

/// The view the player is currently looking at.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneView {
    /// The office itself with doors and doorway silhouettes.
    Office(OfficeScene),
    /// One camera feed.
    Camera(CameraScene),
}

impl SceneView {
    /// Assembles the view matching the session's observation mode.
    #[must_use]
    pub fn compose(
        layout: OfficeLayout,
        observation: ObservationMode,
        doors: DoorStates,
        adversaries: &[AdversarySnapshot],
    ) -> Self {
        match observation {
            ObservationMode::Office => {
                Self::Office(OfficeScene::compose(layout, doors, adversaries))
            }
            ObservationMode::Camera(camera) => {
                Self::Camera(CameraScene::compose(camera, adversaries))
            }
        }
    }
}

/// Terminal overlay shown on top of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlay {
    /// Overlay caption.
    pub text: &'static str,
    /// Outcome the overlay announces, kept so backends can style further.
    pub status: NightStatus,
}

impl Overlay {
    /// Overlay for the provided status, if it is terminal.
    #[must_use]
    pub const fn for_status(status: NightStatus) -> Option<Self> {
        match status {
            NightStatus::Running => None,
            NightStatus::Won => Some(Self {
                text: "6 AM — YOU SURVIVED",
                status,
            }),
            NightStatus::Lost => Some(Self {
                text: "THEY GOT IN",
                status,
            }),
        }
    }

    /// Text color the overlay is drawn with.
    #[must_use]
    pub const fn text_color(self) -> Color {
        match self.status {
            NightStatus::Running | NightStatus::Won => VICTORY_TEXT_COLOR,
            NightStatus::Lost => DEFEAT_TEXT_COLOR,
        }
    }
}

/// Heads-up display contents rendered over every view.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Night the session is armed with.
    pub night: NightIndex,
    /// Clock label for the elapsed game-time.
    pub clock: &'static str,
    /// Remaining power on the 0 to 100 scale.
    pub power_percent: f32,
    /// What the player is currently watching.
    pub observation: ObservationMode,
    /// Terminal overlay, present once the night has resolved.
    pub overlay: Option<Overlay>,
}

impl Hud {
    /// Assembles the HUD from session snapshots.
    #[must_use]
    pub fn compose(
        night: NightIndex,
        elapsed_minutes: f32,
        power_percent: f32,
        observation: ObservationMode,
        status: NightStatus,
    ) -> Self {
        Self {
            night,
            clock: clock_label(elapsed_minutes),
            power_percent,
            observation,
            overlay: Overlay::for_status(status),
        }
    }
}

/// Scene description combining the active view and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// View the player is looking at.
    pub view: SceneView,
    /// HUD drawn over the view.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(view: SceneView, hud: Hud) -> Self {
        Self { view, hud }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Night Watch scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the capped frame delta
    /// and the per-frame input captured by the adapter, and may replace the
    /// scene before it is rendered, allowing adapters to animate session
    /// snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
