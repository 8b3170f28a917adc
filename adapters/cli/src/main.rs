#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Night Watch shift headless.
//!
//! The runner simulates one night at fixed 50 ms ticks, logging transitions
//! through `tracing` and printing an HUD line at every in-game hour. When the
//! night resolves it prints a shift-report share code; `--decode` prints the
//! summary of a previously shared code instead of simulating.

mod report;

use anyhow::Context;
use clap::Parser;
use night_watch_core::{CameraId, Command, Event, NightIndex, MAX_TICK};
use night_watch_rendering::Hud;
use night_watch_system_control::{Control, ControlInput};
use night_watch_system_cues::{Cue, Cues};
use night_watch_world::{apply, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use report::ShiftReport;

/// Simulates one Night Watch shift without a graphical backend.
#[derive(Debug, Parser)]
#[command(name = "night-watch", about = "Headless Night Watch shift runner")]
struct Cli {
    /// Night to simulate; higher nights raise adversary aggression.
    #[arg(long, default_value_t = 1)]
    night: u32,
    /// Seed anchoring the night's random stream; drawn from entropy when
    /// omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of 50 ms ticks to simulate before giving up.
    #[arg(long, default_value_t = 7_200)]
    max_ticks: u32,
    /// Close both doors at the start of the night and keep them closed.
    #[arg(long)]
    close_doors: bool,
    /// Watch the named camera feed (A1, A2, B1 or B2) for the whole night.
    #[arg(long, value_parser = parse_camera)]
    watch: Option<CameraId>,
    /// Suppress audio cue logging.
    #[arg(long)]
    mute: bool,
    /// Decode a previously shared shift-report code and exit.
    #[arg(long, value_name = "CODE")]
    decode: Option<String>,
}

fn parse_camera(value: &str) -> Result<CameraId, String> {
    CameraId::all()
        .into_iter()
        .find(|camera| camera.label().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown camera '{value}', expected one of A1, A2, B1, B2"))
}

/// Entry point for the Night Watch command-line interface.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(code) = cli.decode.as_deref() {
        let decoded = ShiftReport::decode(code).context("failed to decode shift report")?;
        println!("{decoded}");
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    let night = NightIndex::new(cli.night);
    let mut world = World::new(seed);
    let mut events: Vec<Event> = Vec::new();
    let mut cues = Cues::new();
    if cli.mute {
        let _ = cues.toggle_mute();
    }

    println!("{}", query::welcome_banner(&world));
    apply(&mut world, Command::BeginNight { night }, &mut events);
    info!(night = night.get(), seed, "night started");

    // The guard acts once at midnight; the rest of the shift is hands-off.
    let opening_moves = ControlInput::new(cli.close_doors, cli.close_doors, false, cli.watch);
    let mut control = Control::new();
    let mut commands = Vec::new();
    control.handle(&events, opening_moves, &mut commands);
    for command in commands.drain(..) {
        apply(&mut world, command, &mut events);
    }

    let mut cue_buffer: Vec<Cue> = Vec::new();
    cues.handle(&events, &mut cue_buffer);
    log_cues(&cue_buffer);
    let mut last_clock = query_hud(&world).clock;
    print_hud(&world);

    let mut ticks = 0_u32;
    while ticks < cli.max_ticks && !query::status(&world).is_terminal() {
        events.clear();
        apply(&mut world, Command::Tick { dt: MAX_TICK }, &mut events);
        ticks += 1;

        log_transitions(&events);
        cue_buffer.clear();
        cues.handle(&events, &mut cue_buffer);
        log_cues(&cue_buffer);

        let clock = query_hud(&world).clock;
        if clock != last_clock {
            last_clock = clock;
            print_hud(&world);
        }
    }

    let status = query::status(&world);
    info!(?status, ticks, "night resolved");
    print_hud(&world);

    let outcome = ShiftReport {
        night,
        seed,
        outcome: status,
        minutes_survived: query::clock_minutes(&world),
        power_remaining: query::power_level(&world),
    };
    println!("{outcome}");
    println!("share code: {}", outcome.encode());
    Ok(())
}

fn log_transitions(events: &[Event]) {
    for event in events {
        match event {
            Event::DoorToggled { side, closed } => {
                debug!(side = side.label(), closed, "door toggled");
            }
            Event::ObservationChanged { mode } => debug!(?mode, "observation changed"),
            Event::AdversaryMoved {
                adversary,
                from,
                to,
            } => {
                debug!(name = adversary.display_name(), from, to, "adversary moved");
            }
            Event::PowerExhausted => info!("power exhausted, doors forced open"),
            Event::NightWon { night } => info!(night = night.get(), "made it to dawn"),
            Event::NightLost { adversary, side } => {
                info!(
                    name = adversary.display_name(),
                    side = side.label(),
                    "breach"
                );
            }
            Event::NightStarted { .. } | Event::TimeAdvanced { .. } => {}
        }
    }
}

fn log_cues(cues: &[Cue]) {
    for cue in cues {
        debug!(
            kind = ?cue.kind,
            volume = cue.volume,
            delay_ms = cue.delay.as_millis() as u64,
            "cue"
        );
    }
}

fn query_hud(world: &World) -> Hud {
    Hud::compose(
        query::night(world),
        query::clock_minutes(world),
        query::power_level(world),
        query::observation(world),
        query::status(world),
    )
}

fn print_hud(world: &World) {
    let hud = query_hud(world);
    println!(
        "[{}] night {} | power {:.1}% | watching {}",
        hud.clock,
        hud.night.get(),
        hud.power_percent,
        match hud.observation.watched_camera() {
            Some(camera) => camera.label(),
            None => "office",
        }
    );
    if let Some(overlay) = hud.overlay {
        println!("{}", overlay.text);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
