//! Run loop thread: drives the engine on wall-clock frames and streams output.
//!
//! The engine is built on the caller's thread so seed errors surface before
//! anything starts, then moved into the loop. Commands arrive via `mpsc`
//! between frames. Snapshots go to the sink whenever something changed and
//! into shared state after every frame.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use tacmap_core::commands::OperatorCommand;
use tacmap_core::error::TacticalError;
use tacmap_core::types::Coordinate;
use tacmap_sim::seed::SeedData;
use tacmap_sim::surface::{GridBounds, GridSurface};
use tacmap_sim::TacticalEngine;

use crate::config::AppConfig;
use crate::state::{LoopCommand, SharedSnapshot};
use crate::stream::{StreamMessage, StreamSink};

pub type GridEngine = TacticalEngine<GridSurface>;

#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub frame: Duration,
    pub time_scale: f64,
    pub duration_ms: Option<u64>,
    /// Grid size (columns, rows) when grid output is on.
    pub grid: Option<(usize, usize)>,
}

impl LoopSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            frame: Duration::from_millis(config.run.frame_ms.max(1)),
            time_scale: config.run.time_scale.max(0.0),
            duration_ms: config.run.duration_ms,
            grid: config
                .display
                .grid
                .then_some((config.display.grid_cols, config.display.grid_rows)),
        }
    }

    /// Simulation time covered by one frame.
    pub fn step_ms(&self) -> u64 {
        (self.frame.as_secs_f64() * 1000.0 * self.time_scale).round() as u64
    }
}

/// Create the engine, load the scenario and bring the grid surface up.
///
/// The grid is fitted to the scenario after loading, so the first
/// reconciliation runs through the deferred-surface path.
pub fn build_engine(config: &AppConfig, seed: SeedData) -> Result<GridEngine, TacticalError> {
    let margin = config.display.margin_deg;
    let bounds = GridBounds::around(&seed.coordinates(), margin)
        .or_else(|| GridBounds::around(&[Coordinate::default()], margin));

    let mut engine = TacticalEngine::new(config.engine.clone(), GridSurface::new())?;
    engine.load_seed(seed)?;
    if config.display.show_coordinates {
        engine.apply(OperatorCommand::SetShowCoordinates { enabled: true })?;
    }

    if let Some(bounds) = bounds {
        engine.surface_mut().initialize(bounds);
        if let Some(report) = engine.notify_surface_ready() {
            info!(
                markers = report.created,
                width_km = bounds.width_km(),
                "grid surface initialized"
            );
        }
    }
    Ok(engine)
}

/// Spawn the run loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_run_loop(
    engine: GridEngine,
    settings: LoopSettings,
    sink: impl StreamSink + 'static,
    latest_snapshot: SharedSnapshot,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("tacmap-run-loop".into())
        .spawn(move || {
            run_loop(engine, &settings, cmd_rx, sink, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// The run loop. Runs until Shutdown, channel disconnect or the configured
/// duration has elapsed.
fn run_loop(
    mut engine: GridEngine,
    settings: &LoopSettings,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    mut sink: impl StreamSink,
    latest_snapshot: &SharedSnapshot,
) {
    let step_ms = settings.step_ms();
    let mut next_frame_time = Instant::now();
    let mut first_frame = true;

    loop {
        // 1. Drain all pending commands
        let mut applied = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Operator(command)) => {
                    if let Err(err) = engine.apply(command) {
                        warn!(error = %err, "command rejected");
                        sink.emit(StreamMessage::Error {
                            message: err.to_string(),
                        });
                    }
                    applied = true;
                }
                Ok(LoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Let simulation time pass
        let ticks = engine.advance(step_ms);

        // 3. Emit UI events and, when anything changed, a snapshot
        let events = engine.drain_events();
        let changed = first_frame || applied || ticks > 0 || !events.is_empty();
        for event in events {
            sink.emit(StreamMessage::Event { event });
        }

        let snapshot = engine.snapshot();
        if changed {
            sink.emit(StreamMessage::Snapshot {
                snapshot: Box::new(snapshot.clone()),
            });
            if let Some((cols, rows)) = settings.grid {
                sink.emit(StreamMessage::Grid {
                    rows: engine.adapter().surface().render_rows(cols, rows),
                });
            }
        }
        first_frame = false;

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if let Some(duration_ms) = settings.duration_ms {
            if engine.time().elapsed_ms >= duration_ms {
                info!(ticks = engine.time().tick, "run duration reached");
                return;
            }
        }

        // 5. Sleep until the next frame
        next_frame_time += settings.frame;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > settings.frame * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_frame_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::shared_snapshot;
    use tacmap_core::enums::{Layer, SurfaceReadiness};
    use tacmap_core::events::UiEvent;
    use tacmap_core::types::EntityRef;

    fn fast_settings(duration_ms: Option<u64>) -> LoopSettings {
        LoopSettings {
            frame: Duration::from_millis(1),
            time_scale: 5000.0,
            duration_ms,
            grid: None,
        }
    }

    fn real_time_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.engine.real_time = true;
        config
    }

    #[test]
    fn test_step_from_time_scale() {
        let mut settings = LoopSettings::from_config(&AppConfig::default());
        assert_eq!(settings.step_ms(), 100);
        settings.time_scale = 50.0;
        assert_eq!(settings.step_ms(), 5000);
    }

    #[test]
    fn test_build_engine_syncs_grid() {
        let engine = build_engine(&AppConfig::default(), SeedData::demo()).unwrap();
        let status = engine.snapshot().map;
        assert_eq!(status.readiness, SurfaceReadiness::Synced);
        assert_eq!(status.markers, 6);
        assert!(!status.pending);
    }

    #[test]
    fn test_build_engine_with_empty_seed() {
        let engine = build_engine(&AppConfig::default(), SeedData::default()).unwrap();
        assert!(engine.adapter().is_ready());
        assert_eq!(engine.snapshot().map.markers, 0);
    }

    #[test]
    fn test_loop_runs_for_duration() {
        let engine = build_engine(&real_time_config(), SeedData::demo()).unwrap();
        let latest = shared_snapshot();
        let (out_tx, out_rx) = mpsc::channel();

        let (_cmd_tx, handle) =
            spawn_run_loop(engine, fast_settings(Some(25_000)), out_tx, latest.clone()).unwrap();
        handle.join().unwrap();

        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.time.tick, 5);
        assert_eq!(snapshot.time.elapsed_ms, 25_000);

        let messages: Vec<_> = out_rx.try_iter().collect();
        let snapshots = messages
            .iter()
            .filter(|m| matches!(m, StreamMessage::Snapshot { .. }))
            .count();
        assert_eq!(snapshots, 5);
        assert!(messages.iter().any(|m| matches!(
            m,
            StreamMessage::Event {
                event: UiEvent::VisibilitySetChanged { .. }
            }
        )));
    }

    #[test]
    fn test_loop_applies_commands_and_reports_errors() {
        let engine = build_engine(&AppConfig::default(), SeedData::demo()).unwrap();
        let (out_tx, out_rx) = mpsc::channel();

        let (cmd_tx, handle) =
            spawn_run_loop(engine, fast_settings(None), out_tx, shared_snapshot()).unwrap();
        cmd_tx
            .send(LoopCommand::Operator(OperatorCommand::SetLayerVisible {
                layer: Layer::Zones,
                visible: false,
            }))
            .unwrap();
        cmd_tx
            .send(LoopCommand::Operator(OperatorCommand::Select {
                entity: Some(tacmap_core::types::EntityRef::soldier("ghost")),
            }))
            .unwrap();
        cmd_tx.send(LoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        let messages: Vec<_> = out_rx.try_iter().collect();
        assert!(messages
            .iter()
            .any(|m| matches!(m, StreamMessage::Error { message } if message.contains("ghost"))));
    }

    #[test]
    fn test_click_on_marker_cell_selects_it() {
        let engine = build_engine(&AppConfig::default(), SeedData::demo()).unwrap();
        let (out_tx, out_rx) = mpsc::channel();

        let (cmd_tx, handle) =
            spawn_run_loop(engine, fast_settings(None), out_tx, shared_snapshot()).unwrap();
        cmd_tx
            .send(LoopCommand::Operator(OperatorCommand::MapClick {
                coordinate: Coordinate {
                    latitude: 48.8556,
                    longitude: 2.3512,
                },
            }))
            .unwrap();

        let mut selected = None;
        while let Ok(message) = out_rx.recv_timeout(Duration::from_secs(5)) {
            match message {
                StreamMessage::Event {
                    event: UiEvent::SelectionChanged { entity },
                } => {
                    selected = entity;
                    break;
                }
                StreamMessage::Error { message } => panic!("click rejected: {message}"),
                _ => {}
            }
        }
        cmd_tx.send(LoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert_eq!(selected, Some(EntityRef::soldier("S003")));
    }

    #[test]
    fn test_grid_rows_are_streamed() {
        let engine = build_engine(&AppConfig::default(), SeedData::demo()).unwrap();
        let (out_tx, out_rx) = mpsc::channel();
        let settings = LoopSettings {
            grid: Some((20, 8)),
            ..fast_settings(Some(1))
        };

        let (_cmd_tx, handle) = spawn_run_loop(engine, settings, out_tx, shared_snapshot()).unwrap();
        handle.join().unwrap();

        let rows = out_rx
            .try_iter()
            .find_map(|m| match m {
                StreamMessage::Grid { rows } => Some(rows),
                _ => None,
            })
            .unwrap();
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|row| row.chars().count() == 20));
        let board = rows.concat();
        assert!(board.contains('o'), "offline unit drawn");
        assert!(board.contains('*'), "objectives drawn");
    }
}
