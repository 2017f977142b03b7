// Trigger and collision adapters: the bridge between world colliders and the
// engine. Zone adapters just flip environment facts; the collision and
// lane-boundary adapters record violations directly, each with its own
// de-duplication (impact floor, crossing cooldown).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ViolationEngine;
use crate::types::RuleModule;

// ============================================================================
// ZONE ADAPTERS
// ============================================================================

pub struct NarrowZoneAdapter;

impl NarrowZoneAdapter {
    pub fn on_enter(engine: &mut ViolationEngine) {
        engine.set_in_narrow_zone(true);
    }

    pub fn on_exit(engine: &mut ViolationEngine) {
        engine.set_in_narrow_zone(false);
    }
}

pub struct ParkingZoneAdapter;

impl ParkingZoneAdapter {
    pub fn on_enter(engine: &mut ViolationEngine) {
        engine.set_in_parking_zone(true);
    }

    pub fn on_exit(engine: &mut ViolationEngine) {
        engine.set_in_parking_zone(false);
    }
}

// ============================================================================
// TRAFFIC LIGHT ADAPTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    Red,
    Yellow,
    Green,
}

pub struct TrafficLightAdapter;

impl TrafficLightAdapter {
    /// The light state at the moment of entry decides; changing to green
    /// while inside does not retroactively clear the flag.
    pub fn on_intersection_enter(engine: &mut ViolationEngine, light: LightState) {
        if matches!(light, LightState::Red | LightState::Yellow) {
            engine.set_traffic_light_violation(true);
        }
    }

    pub fn on_intersection_exit(engine: &mut ViolationEngine) {
        engine.set_traffic_light_violation(false);
    }
}

// ============================================================================
// COLLISION ADAPTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionCategory {
    Sidewalk,
    Vehicle,
    Other,
}

impl CollisionCategory {
    fn description(&self) -> &'static str {
        match self {
            Self::Sidewalk => "Collided with the sidewalk.",
            Self::Vehicle => "Collided with another vehicle.",
            Self::Other => "Collided with a road object.",
        }
    }
}

/// Every qualifying collision is its own violation; repeated distinct
/// impacts all count. Only an impact-speed floor filters out scrapes.
pub struct CollisionAdapter {
    min_impact_speed: f32,
}

impl CollisionAdapter {
    pub fn new(min_impact_speed: f32) -> Self {
        Self { min_impact_speed }
    }

    pub fn on_collision(
        &self,
        engine: &mut ViolationEngine,
        category: CollisionCategory,
        impact_speed: f32,
        now_s: f64,
    ) {
        if impact_speed < self.min_impact_speed {
            debug!(
                "collision below impact floor ({:.2} < {:.2}), ignored",
                impact_speed, self.min_impact_speed
            );
            return;
        }
        engine.record_violation(RuleModule::StrikingObjects, category.description(), now_s);
    }
}

// ============================================================================
// LANE BOUNDARY ADAPTER
// ============================================================================

/// Handles the wrong-side zone flag and the immediate-record path for lane
/// boundary crossings. A crossing with no indicator at all is a signaling
/// violation on the spot; with an indicator on, the matching directional
/// look (both ways in a narrow zone) is what's checked. The whole path is
/// rate-limited by one cooldown so a collider straddle can't double-fire.
pub struct LaneBoundaryAdapter {
    cooldown_s: f64,
    next_allowed_s: f64,
}

impl LaneBoundaryAdapter {
    pub fn new(cooldown_s: f64) -> Self {
        Self {
            cooldown_s,
            next_allowed_s: 0.0,
        }
    }

    pub fn on_wrong_side_enter(engine: &mut ViolationEngine) {
        engine.set_wrong_side(true);
    }

    pub fn on_wrong_side_exit(engine: &mut ViolationEngine) {
        engine.set_wrong_side(false);
    }

    pub fn on_boundary_cross(
        &mut self,
        engine: &mut ViolationEngine,
        left_signal: bool,
        right_signal: bool,
        now_s: f64,
    ) {
        if now_s < self.next_allowed_s {
            debug!("boundary crossing inside cooldown, ignored");
            return;
        }
        self.next_allowed_s = now_s + self.cooldown_s;

        if !left_signal && !right_signal {
            engine.record_violation(
                RuleModule::SignalingErrors,
                "Crossed a lane boundary without using any signal.",
                now_s,
            );
            return;
        }

        let window = engine.look_time_window_s();
        let env = engine.environment();
        let looked_left = env.looked_left_within(now_s, window);
        let looked_right = env.looked_right_within(now_s, window);
        let in_narrow = env.in_narrow_zone();

        let mut left_failed = false;
        let mut right_failed = false;

        if left_signal {
            let opposite_ok = !in_narrow || looked_right;
            left_failed = !looked_left || !opposite_ok;
        }
        if right_signal {
            let opposite_ok = !in_narrow || looked_left;
            right_failed = !looked_right || !opposite_ok;
        }

        if left_failed {
            engine.record_violation(
                RuleModule::FailToCheckTrafficConditions,
                "Crossed a lane boundary with the left signal on but failed to look properly.",
                now_s,
            );
        }
        if right_failed {
            engine.record_violation(
                RuleModule::FailToCheckTrafficConditions,
                "Crossed a lane boundary with the right signal on but failed to look properly.",
                now_s,
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
