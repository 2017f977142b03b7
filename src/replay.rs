// Session replay. A recorded drive is a JSONL stream of tagged events:
// telemetry ticks interleaved with the trigger/collision/look events the
// world fired, in the order they happened. Replaying one feeds the engine
// exactly the way the live host does, which makes recorded sessions the
// debugging tool for rule tuning.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::adapters::{
    CollisionAdapter, CollisionCategory, LaneBoundaryAdapter, LightState, NarrowZoneAdapter,
    ParkingZoneAdapter, TrafficLightAdapter,
};
use crate::engine::{FinalReport, ViolationEngine};
use crate::types::{Config, ProximityProbes, TelemetrySnapshot};

// ============================================================================
// SESSION EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Narrow,
    Parking,
    WrongSide,
    LaneDrift,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Tick {
        t: f64,
        telemetry: TelemetrySnapshot,
        #[serde(default)]
        probes: ProximityProbes,
    },
    LookLeft {
        t: f64,
    },
    LookRight {
        t: f64,
    },
    ZoneEnter {
        t: f64,
        zone: ZoneKind,
    },
    ZoneExit {
        t: f64,
        zone: ZoneKind,
    },
    BoundaryCross {
        t: f64,
    },
    Collision {
        t: f64,
        category: CollisionCategory,
        impact_speed: f32,
    },
    LightZoneEnter {
        t: f64,
        light: LightState,
    },
    LightZoneExit {
        t: f64,
    },
    Checkpoint {
        t: f64,
        index: usize,
    },
    Finish {
        t: f64,
    },
}

// ============================================================================
// CHECKPOINT TRACKER
// ============================================================================

/// Route progress. Duplicate crossings count once; indices outside the
/// configured range are ignored without comment.
pub struct CheckpointTracker {
    cleared: Vec<bool>,
    cleared_count: usize,
}

impl CheckpointTracker {
    pub fn new(total: usize) -> Self {
        Self {
            cleared: vec![false; total],
            cleared_count: 0,
        }
    }

    /// Indices are 1-based, matching the scene markers.
    pub fn mark_cleared(&mut self, index: usize) {
        if index < 1 || index > self.cleared.len() {
            debug!("checkpoint index {} out of range, ignored", index);
            return;
        }
        if !self.cleared[index - 1] {
            self.cleared[index - 1] = true;
            self.cleared_count += 1;
            info!(
                "checkpoint {} cleared ({}/{})",
                index,
                self.cleared_count,
                self.cleared.len()
            );
        }
    }

    pub fn all_cleared(&self) -> bool {
        self.cleared_count == self.cleared.len()
    }

    pub fn cleared_count(&self) -> usize {
        self.cleared_count
    }
}

// ============================================================================
// REPLAY DRIVER
// ============================================================================

#[derive(Debug, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub events: u64,
    pub skipped_lines: u64,
    pub checkpoints_cleared: usize,
    pub finished_by_goal: bool,
}

pub fn find_session_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let mut sessions = Vec::new();

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "jsonl") {
            sessions.push(path.to_path_buf());
        }
    }

    sessions.sort();
    info!("Found {} session file(s)", sessions.len());
    Ok(sessions)
}

/// Replay one recorded session through a fresh engine and return the
/// published result. Malformed lines degrade to "no signal this tick":
/// warned on first occurrence, skipped thereafter.
pub fn replay_session(path: &Path, config: &Config) -> Result<(FinalReport, SessionStats)> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session {}", path.display()))?;

    let mut engine = ViolationEngine::new(config.clone());
    let mut boundary = LaneBoundaryAdapter::new(config.boundary.cooldown_s);
    let collision = CollisionAdapter::new(config.collision.min_impact_speed);
    let mut checkpoints = CheckpointTracker::new(config.replay.total_checkpoints);

    let mut stats = SessionStats::default();
    let mut warned_malformed = false;
    let mut last_tick_t: Option<f64> = None;
    let mut last_signals = (false, false);

    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let event: SessionEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                stats.skipped_lines += 1;
                if !warned_malformed {
                    warn!(
                        "{}:{}: malformed event ({}); skipping this and any further bad lines",
                        path.display(),
                        line_no + 1,
                        e
                    );
                    warned_malformed = true;
                } else {
                    debug!("{}:{}: malformed event skipped", path.display(), line_no + 1);
                }
                continue;
            }
        };

        stats.events += 1;

        match event {
            SessionEvent::Tick { t, telemetry, probes } => {
                let dt = match last_tick_t {
                    Some(prev) if t > prev => t - prev,
                    _ => config.replay.default_tick_s,
                };
                last_tick_t = Some(t);
                last_signals = (telemetry.left_signal, telemetry.right_signal);
                engine.tick(&telemetry, &probes, t, dt);
                stats.ticks += 1;
            }
            SessionEvent::LookLeft { t } => engine.register_look_left(t),
            SessionEvent::LookRight { t } => engine.register_look_right(t),
            SessionEvent::ZoneEnter { zone, .. } => match zone {
                ZoneKind::Narrow => NarrowZoneAdapter::on_enter(&mut engine),
                ZoneKind::Parking => ParkingZoneAdapter::on_enter(&mut engine),
                ZoneKind::WrongSide => LaneBoundaryAdapter::on_wrong_side_enter(&mut engine),
                ZoneKind::LaneDrift => engine.set_drifting_out_of_lane(true),
            },
            SessionEvent::ZoneExit { zone, .. } => match zone {
                ZoneKind::Narrow => NarrowZoneAdapter::on_exit(&mut engine),
                ZoneKind::Parking => ParkingZoneAdapter::on_exit(&mut engine),
                ZoneKind::WrongSide => LaneBoundaryAdapter::on_wrong_side_exit(&mut engine),
                ZoneKind::LaneDrift => engine.set_drifting_out_of_lane(false),
            },
            SessionEvent::BoundaryCross { t } => {
                boundary.on_boundary_cross(&mut engine, last_signals.0, last_signals.1, t);
            }
            SessionEvent::Collision {
                t,
                category,
                impact_speed,
            } => collision.on_collision(&mut engine, category, impact_speed, t),
            SessionEvent::LightZoneEnter { light, .. } => {
                TrafficLightAdapter::on_intersection_enter(&mut engine, light)
            }
            SessionEvent::LightZoneExit { .. } => {
                TrafficLightAdapter::on_intersection_exit(&mut engine)
            }
            SessionEvent::Checkpoint { index, .. } => checkpoints.mark_cleared(index),
            SessionEvent::Finish { .. } => {
                if !checkpoints.all_cleared() {
                    warn!(
                        "finish reached with {}/{} checkpoints cleared",
                        checkpoints.cleared_count(),
                        config.replay.total_checkpoints
                    );
                }
                stats.finished_by_goal = true;
                stats.checkpoints_cleared = checkpoints.cleared_count();
                return Ok((engine.finalize(), stats));
            }
        }
    }

    // stream ended without a finish trigger; publish what we have
    warn!(
        "{}: session ended without a finish event, finalizing anyway",
        path.display()
    );
    debug!(
        "finalizing with {} violation(s), failed={}",
        engine.total_violations(),
        engine.is_failed()
    );
    stats.checkpoints_cleared = checkpoints.cleared_count();
    Ok((engine.finalize(), stats))
}

// ============================================================================
// TESTS
// ============================================================================
