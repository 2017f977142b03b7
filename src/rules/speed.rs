use crate::types::{SpeedConfig, TelemetrySnapshot};

pub struct SpeedCheck;

impl SpeedCheck {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, config: &SpeedConfig, snap: &TelemetrySnapshot) -> Option<String> {
        (snap.speed_kmh > config.limit_kmh).then(|| {
            format!(
                "Driving over the speed limit ({:.0} km/h). Latest recorded speed: {:.1} km/h",
                config.limit_kmh, snap.speed_kmh
            )
        })
    }
}
