use serde::{Deserialize, Serialize};

use crate::turn_commit::TurnCommitConfig;

// ============================================================================
// RULE CATEGORIES
// ============================================================================

/// The closed set of rule categories a violation can be charged against.
///
/// Used as an index everywhere: counters and one-shot gates are fixed-size
/// arrays over `RuleModule::COUNT`, so "every category always present" holds
/// structurally instead of by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleModule {
    FailToCheckTrafficConditions,
    UnintendedRolling,
    StrikingObjects,
    FollowingTooClose,
    ImproperStoppingOrParking,
    SignalingErrors,
    GearHandbrakeIssues,
    SpeedControl,
    LaneDiscipline,
    TrafficLaws,
}

impl RuleModule {
    pub const COUNT: usize = 10;

    pub const ALL: [RuleModule; Self::COUNT] = [
        RuleModule::FailToCheckTrafficConditions,
        RuleModule::UnintendedRolling,
        RuleModule::StrikingObjects,
        RuleModule::FollowingTooClose,
        RuleModule::ImproperStoppingOrParking,
        RuleModule::SignalingErrors,
        RuleModule::GearHandbrakeIssues,
        RuleModule::SpeedControl,
        RuleModule::LaneDiscipline,
        RuleModule::TrafficLaws,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::FailToCheckTrafficConditions => 0,
            Self::UnintendedRolling => 1,
            Self::StrikingObjects => 2,
            Self::FollowingTooClose => 3,
            Self::ImproperStoppingOrParking => 4,
            Self::SignalingErrors => 5,
            Self::GearHandbrakeIssues => 6,
            Self::SpeedControl => 7,
            Self::LaneDiscipline => 8,
            Self::TrafficLaws => 9,
        }
    }

    /// Short human label used in alert/log formatting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FailToCheckTrafficConditions => "Awareness",
            Self::UnintendedRolling => "Rolling",
            Self::StrikingObjects => "Striking",
            Self::FollowingTooClose => "Following Distance",
            Self::ImproperStoppingOrParking => "Stopping/Parking",
            Self::SignalingErrors => "Signaling",
            Self::GearHandbrakeIssues => "Gear/Handbrake Operation",
            Self::SpeedControl => "Speed Control",
            Self::LaneDiscipline => "Lane Discipline",
            Self::TrafficLaws => "Traffic Rules",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailToCheckTrafficConditions => "FailToCheckTrafficConditions",
            Self::UnintendedRolling => "UnintendedRolling",
            Self::StrikingObjects => "StrikingObjects",
            Self::FollowingTooClose => "FollowingTooClose",
            Self::ImproperStoppingOrParking => "ImproperStoppingOrParking",
            Self::SignalingErrors => "SignalingErrors",
            Self::GearHandbrakeIssues => "GearHandbrakeIssues",
            Self::SpeedControl => "SpeedControl",
            Self::LaneDiscipline => "LaneDiscipline",
            Self::TrafficLaws => "TrafficLaws",
        }
    }
}

// ============================================================================
// TELEMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gear {
    Park,
    Reverse,
    Neutral,
    Drive,
}

/// Per-tick read-only view of the vehicle, produced by the vehicle model.
///
/// Superseded entirely on the next tick; no history is retained here.
/// `speed_kmh` is signed: negative while rolling/driving backwards.
/// The indicator lamps ride along because the input-device manager publishes
/// them together with the pedals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub speed_kmh: f32,
    /// Steering position, -1 (full left) .. +1 (full right).
    pub steering: f32,
    pub throttle: f32,
    pub brake: f32,
    pub gear: Gear,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_forward")]
    pub forward: [f32; 3],
    #[serde(default)]
    pub left_signal: bool,
    #[serde(default)]
    pub right_signal: bool,
}

fn default_forward() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

impl TelemetrySnapshot {
    /// Absolute deviation of the forward vector's pitch from horizontal, in
    /// degrees. A degenerate (near-zero) forward vector reads as flat ground.
    pub fn slope_angle_deg(&self) -> f32 {
        let [x, y, z] = self.forward;
        let len = (x * x + y * y + z * z).sqrt();
        if len < 1e-6 {
            return 0.0;
        }
        let cos_up = (y / len).clamp(-1.0, 1.0);
        let angle_from_up = cos_up.acos().to_degrees();
        (90.0 - angle_from_up).abs()
    }
}

/// Result of the host's per-tick physics probes around the vehicle.
/// Absent probes default to "nothing detected".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProximityProbes {
    #[serde(default)]
    pub vehicle_ahead: bool,
    #[serde(default)]
    pub sidewalk_left: bool,
    #[serde(default)]
    pub sidewalk_right: bool,
}

// ============================================================================
// VIOLATION LOG
// ============================================================================

/// One recorded violation. Immutable once appended; insertion order is time
/// order for the whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationRecord {
    pub module: RuleModule,
    pub label: &'static str,
    pub description: String,
    pub timestamp_s: f64,
}

impl ViolationRecord {
    pub fn message(&self) -> String {
        format!("[{}] {}", self.label, self.description)
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub awareness: AwarenessConfig,
    pub signaling: SignalingConfig,
    pub rolling: RollingConfig,
    pub stopping: StoppingConfig,
    pub gear: GearPedalConfig,
    pub speed: SpeedConfig,
    pub proximity: ProximityConfig,
    pub boundary: BoundaryConfig,
    pub collision: CollisionConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Total violations (summed across categories) at which the run fails.
    pub max_allowed_violations: u32,
    /// How long a directional look stays valid, in seconds.
    pub look_time_window_s: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_allowed_violations: 4,
            look_time_window_s: 35.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwarenessConfig {
    pub turn: TurnCommitConfig,
    /// |speed| below this counts as stationary for the start-off check.
    pub stationary_speed_kmh: f32,
    /// Continuous stationary time required before start-off arms.
    pub full_stop_time_s: f64,
    /// Speed that counts as "moving off" out of the parking zone.
    pub start_off_speed_kmh: f32,
    /// Reverse check applies below this (signed) speed.
    pub reverse_speed_ceiling_kmh: f32,
    /// Reverse check fires once throttle exceeds this.
    pub reverse_throttle_floor: f32,
}

impl Default for AwarenessConfig {
    fn default() -> Self {
        Self {
            turn: TurnCommitConfig::default(),
            stationary_speed_kmh: 1.0,
            full_stop_time_s: 2.0,
            start_off_speed_kmh: 2.0,
            reverse_speed_ceiling_kmh: 2.0,
            reverse_throttle_floor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    pub turn: TurnCommitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Slope angles above this count as "on slope".
    pub slope_min_deg: f32,
    /// Brake pressure at or above this counts as holding the vehicle.
    pub brake_hold_floor: f32,
    /// Drive gear: rolling backwards faster than this (negative) violates.
    pub drive_rollback_kmh: f32,
    /// Reverse gear: rolling forwards faster than this violates.
    pub reverse_rollforward_kmh: f32,
    /// Park/Neutral: any movement faster than this violates.
    pub idle_roll_kmh: f32,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            slope_min_deg: 3.0,
            brake_hold_floor: 0.2,
            drive_rollback_kmh: -0.5,
            reverse_rollforward_kmh: 1.0,
            idle_roll_kmh: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingConfig {
    /// |speed| below this counts as stopped even outside Park gear.
    pub stop_speed_kmh: f32,
    /// Stopped time outside the parking zone before a violation records.
    pub outside_zone_limit_s: f64,
}

impl Default for StoppingConfig {
    fn default() -> Self {
        Self {
            stop_speed_kmh: 0.5,
            outside_zone_limit_s: 19.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GearPedalConfig {
    /// Gear changes above this |speed| violate.
    pub max_shift_speed_kmh: f32,
    /// Both pedals beyond this simultaneously violate (once armed).
    pub pedal_press_threshold: f32,
    /// Pedal rest value reported by the input device before first movement.
    pub default_pedal_value: f32,
    /// Deviation from rest that arms the simultaneous-press check.
    pub default_pedal_tolerance: f32,
}

impl Default for GearPedalConfig {
    fn default() -> Self {
        Self {
            max_shift_speed_kmh: 2.0,
            pedal_press_threshold: 0.1,
            default_pedal_value: 0.5,
            default_pedal_tolerance: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub limit_kmh: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self { limit_kmh: 50.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Per-side cooldown between sidewalk-proximity violations, seconds.
    pub sidewalk_cooldown_s: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            sidewalk_cooldown_s: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Minimum time between boundary-crossing violations, seconds.
    pub cooldown_s: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self { cooldown_s: 0.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Impacts below this relative speed are ignored as scrapes.
    pub min_impact_speed: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            min_impact_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub input_dir: String,
    pub output_dir: String,
    /// Tick duration assumed for the first tick of a session (seconds).
    pub default_tick_s: f64,
    /// Checkpoints a session route is expected to clear.
    pub total_checkpoints: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input_dir: "sessions".to_string(),
            output_dir: "output".to_string(),
            default_tick_s: 0.02,
            total_checkpoints: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
