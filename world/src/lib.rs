#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative night-session state management for Night Watch.

use night_watch_core::{
    AdversaryKind, Command, DoorSide, DoorStates, Event, NightIndex, NightStatus, ObservationMode,
    WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

mod adversary;
mod power;
pub mod tuning;

use adversary::Adversary;
use power::PowerCell;
use tuning::NightTuning;

/// One real second advances the clock by this many in-game minutes.
const MINUTES_PER_REAL_SECOND: f32 = 60.0;
/// Clock reading at which a running night is survived.
const NIGHT_END_MINUTES: f32 = 360.0;
const FIRST_NIGHT: NightIndex = NightIndex::new(1);
const NIGHT_SEED_LABEL: &str = "night";

/// Represents the authoritative Night Watch session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    night: NightIndex,
    clock_minutes: f32,
    power: PowerCell,
    observation: ObservationMode,
    doors: DoorStates,
    adversaries: Vec<Adversary>,
    status: NightStatus,
    blackout: bool,
    tuning: NightTuning,
    global_seed: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world already armed for the first night.
    ///
    /// The provided seed anchors every night's random stream; a given
    /// `(seed, night)` pair replays identically regardless of what was
    /// simulated before the night began.
    #[must_use]
    pub fn new(global_seed: u64) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            night: FIRST_NIGHT,
            clock_minutes: 0.0,
            power: PowerCell::full(),
            observation: ObservationMode::Office,
            doors: DoorStates::default(),
            adversaries: Vec::new(),
            status: NightStatus::Running,
            blackout: false,
            tuning: NightTuning::default(),
            global_seed,
            rng: ChaCha8Rng::seed_from_u64(global_seed),
        };
        world.reset_night(FIRST_NIGHT);
        world
    }

    /// Read-only access to the tuning tables.
    #[must_use]
    pub fn tuning(&self) -> &NightTuning {
        &self.tuning
    }

    /// Mutable access to the tuning tables for designers and tests.
    ///
    /// Power rates and the per-tick advance factors apply from the next
    /// tick; the aggression base and per-night ramp are folded into each
    /// adversary when the next night begins.
    #[must_use]
    pub fn tuning_mut(&mut self) -> &mut NightTuning {
        &mut self.tuning
    }

    fn reset_night(&mut self, night: NightIndex) {
        self.night = night;
        self.clock_minutes = 0.0;
        self.power = PowerCell::full();
        self.observation = ObservationMode::Office;
        self.doors = DoorStates::default();
        self.status = NightStatus::Running;
        self.blackout = false;
        self.rng = ChaCha8Rng::seed_from_u64(derive_night_seed(self.global_seed, night));
        self.adversaries = AdversaryKind::all()
            .into_iter()
            .map(|kind| Adversary::for_night(kind, night, &self.tuning.advance))
            .collect();
    }

    fn resolve_tick(&mut self, out_events: &mut Vec<Event>) {
        if self.clock_minutes >= NIGHT_END_MINUTES {
            self.status = NightStatus::Won;
            out_events.push(Event::NightWon { night: self.night });
            return;
        }

        if self.power.is_exhausted() {
            self.doors = DoorStates::default();
            if !self.blackout {
                self.blackout = true;
                out_events.push(Event::PowerExhausted);
            }
        }

        let doors = self.doors;
        let breach = self.adversaries.iter().find_map(|adversary| {
            adversary
                .breach_attempt(doors)
                .map(|side| (adversary.kind(), side))
        });
        if let Some((kind, side)) = breach {
            self.status = NightStatus::Lost;
            out_events.push(Event::NightLost {
                adversary: kind,
                side,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginNight { night } => {
            world.reset_night(night);
            out_events.push(Event::NightStarted { night });
        }
        Command::Tick { dt } => {
            if world.status.is_terminal() {
                return;
            }

            let seconds = dt.as_secs_f32();
            world.clock_minutes += seconds * MINUTES_PER_REAL_SECOND;
            out_events.push(Event::TimeAdvanced { dt });

            world
                .power
                .drain(seconds, world.observation, world.doors, &world.tuning.power);

            let night_factor =
                1.0 + world.night.get() as f32 * world.tuning.advance.night_factor_step;
            for adversary in world.adversaries.iter_mut() {
                if let Some((from, to)) = adversary.advance(
                    seconds,
                    night_factor,
                    world.observation,
                    &world.tuning.advance,
                    &mut world.rng,
                ) {
                    out_events.push(Event::AdversaryMoved {
                        adversary: adversary.kind(),
                        from,
                        to,
                    });
                }
            }

            world.resolve_tick(out_events);
        }
        Command::ToggleDoor { side } => {
            if world.blackout {
                return;
            }
            let closed = !world.doors.is_closed(side);
            match side {
                DoorSide::Left => world.doors.left_closed = closed,
                DoorSide::Right => world.doors.right_closed = closed,
            }
            out_events.push(Event::DoorToggled { side, closed });
        }
        Command::SetObservation { mode } => {
            if world.observation != mode {
                world.observation = mode;
                out_events.push(Event::ObservationChanged { mode });
            }
        }
    }
}

fn derive_night_seed(global_seed: u64, night: NightIndex) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(NIGHT_SEED_LABEL.as_bytes());
    hasher.update(night.get().to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::World;
    use night_watch_core::{
        AdversarySnapshot, AdversaryView, DoorStates, NightIndex, NightStatus, ObservationMode,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Night the session is currently armed with.
    #[must_use]
    pub fn night(world: &World) -> NightIndex {
        world.night
    }

    /// Elapsed game-time in minutes since the night began.
    #[must_use]
    pub fn clock_minutes(world: &World) -> f32 {
        world.clock_minutes
    }

    /// Remaining power expressed on the 0 to 100 scale.
    #[must_use]
    pub fn power_level(world: &World) -> f32 {
        world.power.level()
    }

    /// What the player is currently watching.
    #[must_use]
    pub fn observation(world: &World) -> ObservationMode {
        world.observation
    }

    /// Closed state of both office doors.
    #[must_use]
    pub fn doors(world: &World) -> DoorStates {
        world.doors
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn status(world: &World) -> NightStatus {
        world.status
    }

    /// Captures a read-only view of the adversaries stalking the office.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        let snapshots: Vec<AdversarySnapshot> = world
            .adversaries
            .iter()
            .map(super::Adversary::snapshot)
            .collect();
        AdversaryView::from_snapshots(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World};
    use night_watch_core::{
        AdversaryKind, CameraId, Command, DoorSide, Event, NightIndex, NightStatus,
        ObservationMode,
    };
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(50);

    fn tick(world: &mut World, events: &mut Vec<Event>) {
        apply(world, Command::Tick { dt: FRAME }, events);
    }

    fn make_certain(world: &mut World, night: u32, events: &mut Vec<Event>) {
        world.tuning_mut().advance.base_rate = 1_000.0;
        world.tuning_mut().advance.rate_per_night = 0.0;
        apply(
            world,
            Command::BeginNight {
                night: NightIndex::new(night),
            },
            events,
        );
        events.clear();
    }

    fn make_frozen(world: &mut World, night: u32, events: &mut Vec<Event>) {
        world.tuning_mut().advance.base_rate = 0.0;
        world.tuning_mut().advance.rate_per_night = 0.0;
        apply(
            world,
            Command::BeginNight {
                night: NightIndex::new(night),
            },
            events,
        );
        events.clear();
    }

    #[test]
    fn new_world_is_armed_for_the_first_night() {
        let world = World::new(7);

        assert_eq!(query::welcome_banner(&world), "Welcome to the night watch.");
        assert_eq!(query::night(&world), NightIndex::new(1));
        assert_eq!(query::clock_minutes(&world), 0.0);
        assert_eq!(query::power_level(&world), 100.0);
        assert_eq!(query::observation(&world), ObservationMode::Office);
        assert_eq!(query::doors(&world).closed_count(), 0);
        assert_eq!(query::status(&world), NightStatus::Running);

        let snapshots = query::adversary_view(&world).into_vec();
        assert_eq!(snapshots.len(), 2);
        for snapshot in snapshots {
            assert_eq!(snapshot.position, 0);
            assert!(!snapshot.at_left_door);
            assert!(!snapshot.at_right_door);
        }
    }

    #[test]
    fn begin_night_resets_session_defaults() {
        let mut world = World::new(7);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Camera(CameraId::B1),
            },
            &mut events,
        );
        for _ in 0..10 {
            tick(&mut world, &mut events);
        }
        assert!(query::clock_minutes(&world) > 0.0);
        assert!(query::power_level(&world) < 100.0);

        events.clear();
        apply(
            &mut world,
            Command::BeginNight {
                night: NightIndex::new(3),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::NightStarted {
                night: NightIndex::new(3)
            }]
        );
        assert_eq!(query::night(&world), NightIndex::new(3));
        assert_eq!(query::clock_minutes(&world), 0.0);
        assert_eq!(query::power_level(&world), 100.0);
        assert_eq!(query::observation(&world), ObservationMode::Office);
        assert_eq!(query::doors(&world).closed_count(), 0);
        assert_eq!(query::status(&world), NightStatus::Running);
        for snapshot in query::adversary_view(&world).iter() {
            assert_eq!(snapshot.position, 0);
        }
    }

    #[test]
    fn tick_advances_clock_at_sixty_minutes_per_second() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_frozen(&mut world, 1, &mut events);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );

        assert!((query::clock_minutes(&world) - 60.0).abs() < 1e-3);
        assert!(events.contains(&Event::TimeAdvanced {
            dt: Duration::from_secs(1)
        }));
    }

    #[test]
    fn tick_drains_power_for_active_loads() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_frozen(&mut world, 1, &mut events);

        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Right,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Camera(CameraId::A2),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );

        assert!((query::power_level(&world) - 99.26).abs() < 1e-3);
    }

    #[test]
    fn clock_reaching_end_of_night_wins() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_frozen(&mut world, 1, &mut events);

        for _ in 0..130 {
            tick(&mut world, &mut events);
        }

        assert_eq!(query::status(&world), NightStatus::Won);
        assert!(query::clock_minutes(&world) >= 360.0);
        let wins = events
            .iter()
            .filter(|event| matches!(event, Event::NightWon { .. }))
            .count();
        assert_eq!(wins, 1, "the win transition must fire exactly once");
    }

    #[test]
    fn terminal_status_freezes_further_ticks() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_frozen(&mut world, 1, &mut events);

        for _ in 0..130 {
            tick(&mut world, &mut events);
        }
        assert!(query::status(&world).is_terminal());

        let clock = query::clock_minutes(&world);
        let power = query::power_level(&world);
        events.clear();
        tick(&mut world, &mut events);

        assert!(events.is_empty(), "a frozen session must emit nothing");
        assert_eq!(query::clock_minutes(&world), clock);
        assert_eq!(query::power_level(&world), power);
    }

    #[test]
    fn breach_through_open_door_loses_in_list_order() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_certain(&mut world, 1, &mut events);

        for _ in 0..3 {
            tick(&mut world, &mut events);
        }

        assert_eq!(query::status(&world), NightStatus::Lost);
        let losses: Vec<&Event> = events
            .iter()
            .filter(|event| matches!(event, Event::NightLost { .. }))
            .collect();
        assert_eq!(losses.len(), 1, "only the first breach may resolve");
        assert_eq!(
            losses[0],
            &Event::NightLost {
                adversary: AdversaryKind::LongArms,
                side: DoorSide::Left,
            }
        );
    }

    #[test]
    fn closed_doors_hold_the_line_until_dawn() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        make_certain(&mut world, 1, &mut events);

        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Right,
            },
            &mut events,
        );
        for _ in 0..130 {
            tick(&mut world, &mut events);
        }

        assert_eq!(query::status(&world), NightStatus::Won);
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::NightLost { .. })),
            "closed doors must block every breach"
        );
    }

    #[test]
    fn power_exhaustion_forces_doors_open() {
        let mut world = World::new(7);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Right,
            },
            &mut events,
        );
        world.tuning_mut().power.passive_rate = 100_000.0;

        events.clear();
        tick(&mut world, &mut events);

        assert_eq!(query::power_level(&world), 0.0);
        assert_eq!(query::doors(&world).closed_count(), 0);
        assert!(events.contains(&Event::PowerExhausted));
        assert_eq!(query::status(&world), NightStatus::Running);

        events.clear();
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        assert!(
            events.is_empty(),
            "doors cannot be held closed after power loss"
        );
        assert_eq!(query::doors(&world).closed_count(), 0);

        tick(&mut world, &mut events);
        assert!(
            !events.contains(&Event::PowerExhausted),
            "the blackout must be announced exactly once"
        );
    }

    #[test]
    fn toggle_door_flips_state_and_emits() {
        let mut world = World::new(7);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Right,
            },
            &mut events,
        );
        assert!(query::doors(&world).is_closed(DoorSide::Right));
        assert_eq!(
            events,
            vec![Event::DoorToggled {
                side: DoorSide::Right,
                closed: true,
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Right,
            },
            &mut events,
        );
        assert!(!query::doors(&world).is_closed(DoorSide::Right));
        assert_eq!(
            events,
            vec![Event::DoorToggled {
                side: DoorSide::Right,
                closed: false,
            }]
        );
    }

    #[test]
    fn set_observation_emits_only_on_change() {
        let mut world = World::new(7);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Camera(CameraId::A2),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ObservationChanged {
                mode: ObservationMode::Camera(CameraId::A2)
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Camera(CameraId::A2),
            },
            &mut events,
        );
        assert!(events.is_empty(), "re-selecting the same target is silent");

        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Office,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ObservationChanged {
                mode: ObservationMode::Office
            }]
        );
    }

    #[test]
    fn replay_with_same_seed_is_deterministic() {
        let script = |world: &mut World, events: &mut Vec<Event>| {
            apply(
                world,
                Command::SetObservation {
                    mode: ObservationMode::Camera(CameraId::A1),
                },
                events,
            );
            for _ in 0..40 {
                tick(world, events);
            }
            apply(
                world,
                Command::ToggleDoor {
                    side: DoorSide::Left,
                },
                events,
            );
            for _ in 0..40 {
                tick(world, events);
            }
        };

        let mut first_world = World::new(99);
        let mut second_world = World::new(99);
        let mut first_events = Vec::new();
        let mut second_events = Vec::new();
        script(&mut first_world, &mut first_events);
        script(&mut second_world, &mut second_events);

        assert_eq!(first_events, second_events);
        assert_eq!(
            query::adversary_view(&first_world).into_vec(),
            query::adversary_view(&second_world).into_vec()
        );
        assert_eq!(
            query::clock_minutes(&first_world),
            query::clock_minutes(&second_world)
        );
        assert_eq!(
            query::power_level(&first_world),
            query::power_level(&second_world)
        );
    }

    #[test]
    fn night_streams_ignore_prior_session_activity() {
        let mut fresh_world = World::new(123);
        let mut warmed_world = World::new(123);
        let mut fresh_events = Vec::new();
        let mut warmed_events = Vec::new();

        for _ in 0..50 {
            tick(&mut warmed_world, &mut warmed_events);
        }
        warmed_events.clear();

        apply(
            &mut fresh_world,
            Command::BeginNight {
                night: NightIndex::new(4),
            },
            &mut fresh_events,
        );
        apply(
            &mut warmed_world,
            Command::BeginNight {
                night: NightIndex::new(4),
            },
            &mut warmed_events,
        );
        for _ in 0..60 {
            tick(&mut fresh_world, &mut fresh_events);
            tick(&mut warmed_world, &mut warmed_events);
        }

        assert_eq!(fresh_events, warmed_events);
        assert_eq!(
            query::adversary_view(&fresh_world).into_vec(),
            query::adversary_view(&warmed_world).into_vec()
        );
    }

    #[test]
    fn unguarded_session_reaches_a_terminal_status() {
        let mut world = World::new(9);
        let mut events = Vec::new();

        for _ in 0..7_200 {
            tick(&mut world, &mut events);
            if query::status(&world).is_terminal() {
                break;
            }
        }

        assert!(
            query::status(&world).is_terminal(),
            "an unguarded night must end in a win or a loss"
        );

        events.clear();
        tick(&mut world, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn adversary_moves_stay_within_route_bounds() {
        let mut world = World::new(31);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginNight {
                night: NightIndex::new(5),
            },
            &mut events,
        );

        for _ in 0..500 {
            tick(&mut world, &mut events);
            for snapshot in query::adversary_view(&world).iter() {
                assert!(snapshot.position <= snapshot.kind.route().last_index());
            }
            if query::status(&world).is_terminal() {
                break;
            }
        }

        for event in &events {
            if let Event::AdversaryMoved { adversary, from, to } = event {
                let step = (*to as i64 - *from as i64).abs();
                assert_eq!(step, 1, "{adversary:?} moved more than one waypoint");
                assert!(*to <= adversary.route().last_index());
            }
        }
    }

    #[test]
    fn power_is_monotonic_while_running() {
        let mut world = World::new(55);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ToggleDoor {
                side: DoorSide::Left,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetObservation {
                mode: ObservationMode::Camera(CameraId::B2),
            },
            &mut events,
        );

        let mut previous = query::power_level(&world);
        for _ in 0..200 {
            tick(&mut world, &mut events);
            let current = query::power_level(&world);
            assert!(current <= previous, "power must never rise during a night");
            assert!(current >= 0.0, "power must never go negative");
            previous = current;
            if query::status(&world).is_terminal() {
                break;
            }
        }
    }
}
