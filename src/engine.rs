// The violation engine. Owns every piece of scoring state for one run:
// per-category counters, the one-shot gates, the append-only log, and the
// pass/fail verdict. Rule evaluators and trigger adapters never touch that
// state directly; everything funnels through `record_violation` or the
// per-tick gate.

use serde::Serialize;
use tracing::{info, warn};

use crate::environment::EnvironmentState;
use crate::rules::{
    AwarenessCheck, GearPedalCheck, LaneDisciplineCheck, ProximityMonitor, RollingCheck,
    SignalingCheck, SpeedCheck, StoppingCheck, TrafficLightCheck,
};
use crate::types::{Config, ProximityProbes, RuleModule, TelemetrySnapshot, ViolationRecord};

pub struct ViolationEngine {
    config: Config,
    env: EnvironmentState,

    counts: [u32; RuleModule::COUNT],
    currently_violating: [bool; RuleModule::COUNT],
    log: Vec<ViolationRecord>,
    total_violations: u32,
    failed: bool,
    finished: bool,
    finish_warned: bool,

    awareness: AwarenessCheck,
    rolling: RollingCheck,
    stopping: StoppingCheck,
    signaling: SignalingCheck,
    gear: GearPedalCheck,
    speed: SpeedCheck,
    lane: LaneDisciplineCheck,
    traffic_light: TrafficLightCheck,
    proximity: ProximityMonitor,
}

impl ViolationEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            env: EnvironmentState::new(),
            counts: [0; RuleModule::COUNT],
            currently_violating: [false; RuleModule::COUNT],
            log: Vec::new(),
            total_violations: 0,
            failed: false,
            finished: false,
            finish_warned: false,
            awareness: AwarenessCheck::new(),
            rolling: RollingCheck::new(),
            stopping: StoppingCheck::new(),
            signaling: SignalingCheck::new(),
            gear: GearPedalCheck::new(),
            speed: SpeedCheck::new(),
            lane: LaneDisciplineCheck::new(),
            traffic_light: TrafficLightCheck::new(),
            proximity: ProximityMonitor::new(),
        }
    }

    // ========================================================================
    // PER-TICK EVALUATION
    // ========================================================================

    /// Run every rule module against this tick's snapshot and the current
    /// environment facts. Gated modules go through the one-shot gate; the
    /// proximity probes record directly with their own edge/cooldown state.
    pub fn tick(
        &mut self,
        snap: &TelemetrySnapshot,
        probes: &ProximityProbes,
        now_s: f64,
        dt_s: f64,
    ) {
        if self.finished {
            if !self.finish_warned {
                warn!("tick after finalize ignored; run is frozen");
                self.finish_warned = true;
            }
            return;
        }

        let awareness = self.awareness.evaluate(
            &self.config.awareness,
            self.config.engine.look_time_window_s,
            &self.env,
            snap,
            now_s,
            dt_s,
        );
        self.apply_one_shot(RuleModule::FailToCheckTrafficConditions, awareness, now_s);

        let rolling = self.rolling.evaluate(&self.config.rolling, snap);
        self.apply_one_shot(RuleModule::UnintendedRolling, rolling, now_s);

        let stopping = self
            .stopping
            .evaluate(&self.config.stopping, &self.env, snap, dt_s);
        self.apply_one_shot(RuleModule::ImproperStoppingOrParking, stopping, now_s);

        let signaling = self.signaling.evaluate(&self.config.signaling, snap, dt_s);
        self.apply_one_shot(RuleModule::SignalingErrors, signaling, now_s);

        let gear = self.gear.evaluate(&self.config.gear, snap);
        self.apply_one_shot(RuleModule::GearHandbrakeIssues, gear, now_s);

        let speed = self.speed.evaluate(&self.config.speed, snap);
        self.apply_one_shot(RuleModule::SpeedControl, speed, now_s);

        let lane = self.lane.evaluate(&self.env);
        self.apply_one_shot(RuleModule::LaneDiscipline, lane, now_s);

        let light = self.traffic_light.evaluate(&self.env);
        self.apply_one_shot(RuleModule::TrafficLaws, light, now_s);

        let proximity = self
            .proximity
            .evaluate(&self.config.proximity, probes, now_s);
        for description in proximity {
            self.record_violation(RuleModule::FollowingTooClose, description, now_s);
        }
    }

    /// Record only on the false→true transition; re-arm when the condition
    /// drops. Suppresses repeats while a continuous violation persists.
    fn apply_one_shot(&mut self, module: RuleModule, verdict: Option<String>, now_s: f64) {
        let idx = module.index();
        match verdict {
            Some(description) => {
                if !self.currently_violating[idx] {
                    self.record_violation(module, &description, now_s);
                    self.currently_violating[idx] = true;
                }
            }
            None => self.currently_violating[idx] = false,
        }
    }

    // ========================================================================
    // RECORDING
    // ========================================================================

    /// Append, count, surface the alert, and update the verdict. This is the
    /// direct entry point for event-driven callers (collisions, boundary
    /// crossings, proximity probes); tick-driven modules arrive here through
    /// the one-shot gate instead.
    pub fn record_violation(&mut self, module: RuleModule, description: &str, now_s: f64) {
        if self.finished {
            warn!(
                "violation after finalize dropped: [{}] {}",
                module.label(),
                description
            );
            return;
        }

        let record = ViolationRecord {
            module,
            label: module.label(),
            description: description.to_string(),
            timestamp_s: now_s,
        };

        self.counts[module.index()] += 1;
        self.total_violations += 1;

        // the alert surface: rendering is the host's problem, we just emit
        warn!("🚨 {}", record.message());
        self.log.push(record);

        if self.total_violations >= self.config.engine.max_allowed_violations && !self.failed {
            self.failed = true;
            warn!(
                "violation total reached {} (limit {}): run marked failed",
                self.total_violations, self.config.engine.max_allowed_violations
            );
        }
    }

    // ========================================================================
    // ENVIRONMENT FACTS (adapter-facing)
    // ========================================================================

    pub fn environment(&self) -> &EnvironmentState {
        &self.env
    }

    pub fn set_in_narrow_zone(&mut self, val: bool) {
        self.env.set_in_narrow_zone(val);
    }

    pub fn set_in_parking_zone(&mut self, val: bool) {
        self.env.set_in_parking_zone(val);
    }

    pub fn set_wrong_side(&mut self, val: bool) {
        self.env.set_wrong_side(val);
    }

    pub fn set_drifting_out_of_lane(&mut self, val: bool) {
        self.env.set_drifting_out_of_lane(val);
    }

    pub fn set_traffic_light_violation(&mut self, val: bool) {
        self.env.set_traffic_light_violation(val);
    }

    pub fn register_look_left(&mut self, now_s: f64) {
        self.env.register_look_left(now_s);
    }

    pub fn register_look_right(&mut self, now_s: f64) {
        self.env.register_look_right(now_s);
    }

    pub fn look_time_window_s(&self) -> f64 {
        self.config.engine.look_time_window_s
    }

    // ========================================================================
    // INSPECTION / FINALIZE
    // ========================================================================

    #[allow(dead_code)]
    pub fn count(&self, module: RuleModule) -> u32 {
        self.counts[module.index()]
    }

    pub fn total_violations(&self) -> u32 {
        self.total_violations
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    #[allow(dead_code)]
    pub fn log(&self) -> &[ViolationRecord] {
        &self.log
    }

    /// Freeze the engine and copy out the published result. Meant to be
    /// called exactly once, from the finish trigger; later calls return the
    /// same frozen data with a warning.
    pub fn finalize(&mut self) -> FinalReport {
        if self.finished {
            warn!("finalize called more than once; returning frozen result");
        }
        self.finished = true;

        let counts_by_module = RuleModule::ALL
            .iter()
            .map(|m| ModuleCount {
                module: m.as_str(),
                label: m.label(),
                count: self.counts[m.index()],
            })
            .collect();

        let report = FinalReport {
            counts_by_module,
            records: self.log.clone(),
            log_messages: self.log.iter().map(|r| r.message()).collect(),
            total_violations: self.total_violations,
            failed: self.failed,
        };

        info!(
            "run finalized: {} violation(s), verdict: {}",
            report.total_violations,
            if report.failed { "FAILED" } else { "PASSED" }
        );

        report
    }
}

// ============================================================================
// PUBLISHED RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ModuleCount {
    pub module: &'static str,
    pub label: &'static str,
    pub count: u32,
}

/// The frozen outcome of one run, handed to the result publisher. Every
/// category is present even at zero.
#[derive(Debug, Clone, Serialize)]
pub struct FinalReport {
    pub counts_by_module: Vec<ModuleCount>,
    pub records: Vec<ViolationRecord>,
    pub log_messages: Vec<String>,
    pub total_violations: u32,
    pub failed: bool,
}

// ============================================================================
// TESTS
// ============================================================================
