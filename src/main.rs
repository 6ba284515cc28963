use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use rhythm_core::engine::autoplay_inputs;
use rhythm_core::traits::{Clock, InputEvent, InputSource, MockClock, PausableClock, ScriptedInput};
use rhythm_core::util::init_logging;
use rhythm_core::{EngineConfig, InputOutcome, NoteSpec, RhythmEngine};

/// Simulate a play session against a note schedule at a fixed tick rate.
#[derive(Debug, Parser)]
#[command(name = "rhythm-sim", version)]
struct Args {
    /// JSON array of notes: [{"time_ms": 1000, "lane": 0}, ...]
    #[arg(long)]
    schedule: PathBuf,

    /// Engine config JSON. Defaults apply when omitted or missing.
    #[arg(long, env = "RHYTHM_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of presses: [{"lane": 0, "time_ms": 1020}, ...]
    #[arg(long, conflicts_with = "autoplay_offset")]
    inputs: Option<PathBuf>,

    /// Press every note at its hit time plus this offset.
    #[arg(long, allow_hyphen_values = true)]
    autoplay_offset: Option<i64>,

    /// Simulation tick in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: i64,

    /// Gameplay time at which to pause once.
    #[arg(long, requires = "pause_for")]
    pause_at: Option<i64>,

    /// Wall time the pause lasts.
    #[arg(long)]
    pause_for: Option<i64>,

    #[arg(short, long)]
    verbose: bool,

    /// Also write logs to a daily file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.as_deref(), args.verbose)?;

    if args.tick_ms <= 0 {
        bail!("--tick-ms must be positive, got {}", args.tick_ms);
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let notes: Vec<NoteSpec> = read_json(&args.schedule)?;
    let events: Vec<InputEvent> = match (&args.inputs, args.autoplay_offset) {
        (Some(path), _) => read_json(path)?,
        (None, Some(offset)) => autoplay_inputs(&notes, offset),
        (None, None) => {
            warn!("no inputs given; every note will expire");
            Vec::new()
        }
    };

    let summary = run_session(&args, config, &notes, ScriptedInput::new(events))?;
    let report = serde_json::json!({
        "summary": summary,
        "rank": summary.rank(),
        "full_combo": summary.is_full_combo(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_session(
    args: &Args,
    config: EngineConfig,
    notes: &[NoteSpec],
    mut input: ScriptedInput,
) -> Result<rhythm_core::SessionSummary> {
    let miss_ms = config.timing.miss_ms;
    let mut engine = RhythmEngine::new(config)?;

    let wall = MockClock::new();
    let clock = PausableClock::new(&wall);
    engine.start_game(notes, &clock)?;

    let last_note_ms = notes.last().map_or(0, |n| n.time_ms);
    let end_ms = last_note_ms + miss_ms + args.tick_ms;
    let mut pause_pending = args.pause_at.zip(args.pause_for);
    let mut ghosts = 0u32;

    loop {
        let now = clock.now_ms()?;

        if let Some((at, duration)) = pause_pending {
            if now >= at {
                engine.pause(clock.pause()?)?;
                wall.advance(duration);
                engine.resume(clock.resume()?)?;
                pause_pending = None;
            }
        }

        for event in input.poll_events(now) {
            if engine.handle_input(event.lane, event.time_ms)? == InputOutcome::Ghost {
                ghosts += 1;
            }
        }
        engine.update(now)?;

        if now > end_ms && input.is_exhausted() {
            break;
        }
        wall.advance(args.tick_ms);
    }

    if ghosts > 0 {
        info!("{ghosts} ghost input(s) ignored");
    }
    Ok(engine.end_game()?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
