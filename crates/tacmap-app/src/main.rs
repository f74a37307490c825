//! TACMAP CLI: headless tactical map with a JSON-lines interface.
//!
//! Reads `OperatorCommand`s from stdin, writes snapshots and UI events to
//! stdout. Logs go to stderr.

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tacmap_app::config::{self, AppConfig, CONFIG_FILE};
use tacmap_app::run_loop::{self, LoopSettings};
use tacmap_app::state::{self, LoopCommand};
use tacmap_app::stream::{self, JsonLines};
use tacmap_sim::seed::SeedData;

/// TACMAP - live tactical map tracking engine
#[derive(Parser, Debug)]
#[command(name = "tacmap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Scenario JSON (default: built-in demo)
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Random seed for simulated telemetry
    #[arg(short, long)]
    seed: Option<u64>,

    /// Telemetry tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Maximum position jitter per tick, in degrees
    #[arg(long)]
    jitter: Option<f64>,

    /// Start with the telemetry feed running
    #[arg(long)]
    real_time: bool,

    /// Simulation speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Stop after this much simulation time (ms)
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Stream an ASCII grid with each snapshot
    #[arg(long)]
    grid: bool,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.engine.seed = seed;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.engine.tick_interval_ms = interval_ms;
        }
        if let Some(jitter) = self.jitter {
            config.engine.jitter_deg = jitter;
        }
        if self.real_time {
            config.engine.real_time = true;
        }
        if let Some(speed) = self.speed {
            config.run.time_scale = speed;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.run.duration_ms = Some(duration_ms);
        }
        if let Some(path) = &self.seed_file {
            config.run.seed_file = Some(path.clone());
        }
        if self.grid {
            config.display.grid = true;
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_seed(path: Option<&Path>) -> anyhow::Result<SeedData> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?;
            let seed = SeedData::from_json(&json)
                .with_context(|| format!("failed to parse scenario {}", path.display()))?;
            info!("Loaded scenario from {:?}", path);
            Ok(seed)
        }
        None => Ok(SeedData::demo()),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = config::load_config(&args.config);
    args.apply_overrides(&mut config);
    if args.write_config {
        config::save_config(&config, &args.config)?;
    }

    let seed = load_seed(config.run.seed_file.as_deref())?;
    let engine = run_loop::build_engine(&config, seed).context("failed to start engine")?;

    let latest = state::shared_snapshot();
    let (cmd_tx, handle) = run_loop::spawn_run_loop(
        engine,
        LoopSettings::from_config(&config),
        JsonLines::new(io::stdout()),
        latest.clone(),
    )
    .context("failed to spawn run loop")?;

    // Without a duration the session ends when input closes.
    let stop_on_eof = config.run.duration_ms.is_none();
    std::thread::Builder::new()
        .name("tacmap-input".into())
        .spawn(move || {
            let forwarded = stream::forward_commands(BufReader::new(io::stdin()), &cmd_tx);
            info!(forwarded, "input closed");
            if stop_on_eof {
                let _ = cmd_tx.send(LoopCommand::Shutdown);
            }
        })
        .context("failed to spawn input reader")?;

    handle.join().map_err(|_| anyhow!("run loop panicked"))?;

    if let Ok(lock) = latest.lock() {
        if let Some(snapshot) = lock.as_ref() {
            info!(
                ticks = snapshot.time.tick,
                elapsed_ms = snapshot.time.elapsed_ms,
                markers = snapshot.map.markers,
                "session finished"
            );
        }
    }
    Ok(())
}
