// Rolling against gear intent on a slope: backwards in Drive, forwards in
// Reverse, or any movement in Park/Neutral, all with the brake released.

use crate::types::{Gear, RollingConfig, TelemetrySnapshot};

pub struct RollingCheck;

impl RollingCheck {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        config: &RollingConfig,
        snap: &TelemetrySnapshot,
    ) -> Option<String> {
        let on_slope = snap.slope_angle_deg() > config.slope_min_deg;
        if !on_slope {
            return None;
        }

        if snap.brake >= config.brake_hold_floor {
            return None;
        }

        let rolling = match snap.gear {
            Gear::Drive => snap.speed_kmh < config.drive_rollback_kmh,
            Gear::Reverse => snap.speed_kmh > config.reverse_rollforward_kmh,
            Gear::Park | Gear::Neutral => snap.speed_kmh > config.idle_roll_kmh,
        };

        rolling.then(|| "Vehicle is rolling unintentionally (not holding brake).".to_string())
    }
}
