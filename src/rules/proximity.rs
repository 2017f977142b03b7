// Distance keeping. The front probe records on each fresh approach; the
// sidewalk probes additionally rate-limit per side so hugging a kerb along a
// block doesn't stack violations every time the probe flickers.
//
// These record directly (returned to the engine as immediate records) rather
// than through the per-tick gate: each probe keeps its own edge state.

use crate::types::{ProximityConfig, ProximityProbes};
use tracing::debug;

pub struct ProximityMonitor {
    was_too_close_front: bool,
    was_too_close_left: bool,
    was_too_close_right: bool,
    next_allowed_left_s: f64,
    next_allowed_right_s: f64,
}

impl ProximityMonitor {
    pub fn new() -> Self {
        Self {
            was_too_close_front: false,
            was_too_close_left: false,
            was_too_close_right: false,
            next_allowed_left_s: 0.0,
            next_allowed_right_s: 0.0,
        }
    }

    /// Returns the descriptions to record this tick (at most one per probe).
    pub fn evaluate(
        &mut self,
        config: &ProximityConfig,
        probes: &ProximityProbes,
        now_s: f64,
    ) -> Vec<&'static str> {
        let mut records = Vec::new();

        // front: plain edge detection
        if probes.vehicle_ahead && !self.was_too_close_front {
            records.push("Driving too close to the vehicle in front!");
            self.was_too_close_front = true;
        } else if !probes.vehicle_ahead {
            self.was_too_close_front = false;
        }

        // left sidewalk: edge detection plus cooldown
        if probes.sidewalk_left && !self.was_too_close_left {
            if now_s >= self.next_allowed_left_s {
                records.push("Driving too close to the left sidewalk!");
                self.next_allowed_left_s = now_s + config.sidewalk_cooldown_s;
            } else {
                debug!("left sidewalk proximity suppressed by cooldown");
            }
            self.was_too_close_left = true;
        } else if !probes.sidewalk_left {
            self.was_too_close_left = false;
        }

        // right sidewalk
        if probes.sidewalk_right && !self.was_too_close_right {
            if now_s >= self.next_allowed_right_s {
                records.push("Driving too close to the right sidewalk!");
                self.next_allowed_right_s = now_s + config.sidewalk_cooldown_s;
            } else {
                debug!("right sidewalk proximity suppressed by cooldown");
            }
            self.was_too_close_right = true;
        } else if !probes.sidewalk_right {
            self.was_too_close_right = false;
        }

        records
    }
}
