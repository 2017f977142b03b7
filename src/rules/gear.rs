// Gear and pedal handling: shifting while the car is still moving, and
// riding throttle and brake together. The pedal check stays disarmed until
// the driver first moves a pedal off the device's rest value, so a wheel
// that reports 0.5/0.5 before calibration doesn't charge anyone.

use crate::types::{Gear, GearPedalConfig, TelemetrySnapshot};

pub struct GearPedalCheck {
    last_gear: Option<Gear>,
    pedals_initialized: bool,
}

impl GearPedalCheck {
    pub fn new() -> Self {
        Self {
            last_gear: None,
            pedals_initialized: false,
        }
    }

    pub fn evaluate(
        &mut self,
        config: &GearPedalConfig,
        snap: &TelemetrySnapshot,
    ) -> Option<String> {
        let mut violating = false;

        match self.last_gear {
            None => self.last_gear = Some(snap.gear),
            Some(previous) if previous != snap.gear => {
                if snap.speed_kmh.abs() > config.max_shift_speed_kmh {
                    violating = true;
                }
                self.last_gear = Some(snap.gear);
            }
            _ => {}
        }

        if !self.pedals_initialized {
            let throttle_moved =
                (snap.throttle - config.default_pedal_value).abs() > config.default_pedal_tolerance;
            let brake_moved =
                (snap.brake - config.default_pedal_value).abs() > config.default_pedal_tolerance;
            if throttle_moved || brake_moved {
                self.pedals_initialized = true;
            }
        } else if snap.throttle > config.pedal_press_threshold
            && snap.brake > config.pedal_press_threshold
        {
            violating = true;
        }

        violating.then(|| {
            "Incorrect gear or pedal handling (shifting while moving, or both pedals pressed)."
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(gear: Gear, speed: f32, throttle: f32, brake: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_kmh: speed,
            steering: 0.0,
            throttle,
            brake,
            gear,
            position: [0.0; 3],
            forward: [0.0, 0.0, 1.0],
            left_signal: false,
            right_signal: false,
        }
    }

    #[test]
    fn test_gear_change_at_speed_violates() {
        let mut check = GearPedalCheck::new();
        let config = GearPedalConfig::default();
        assert!(check.evaluate(&config, &snap(Gear::Drive, 15.0, 0.3, 0.0)).is_none());
        assert!(check.evaluate(&config, &snap(Gear::Reverse, 15.0, 0.3, 0.0)).is_some());
        // violation is tied to the change tick; holding the new gear is fine
        assert!(check.evaluate(&config, &snap(Gear::Reverse, 15.0, 0.3, 0.0)).is_none());
    }

    #[test]
    fn test_gear_change_while_slow_is_fine() {
        let mut check = GearPedalCheck::new();
        let config = GearPedalConfig::default();
        check.evaluate(&config, &snap(Gear::Drive, 1.0, 0.0, 0.0));
        assert!(check.evaluate(&config, &snap(Gear::Park, 1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_first_tick_gear_is_baseline_not_change() {
        let mut check = GearPedalCheck::new();
        let config = GearPedalConfig::default();
        // whatever the sim starts in, the first observation can't violate
        assert!(check.evaluate(&config, &snap(Gear::Reverse, 20.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_both_pedals_only_after_initialization() {
        let mut check = GearPedalCheck::new();
        let config = GearPedalConfig::default();

        // device rest value on both pedals: not armed, no violation
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.5, 0.5)).is_none());
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.5, 0.5)).is_none());

        // throttle moves off rest: armed from here on
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.8, 0.0)).is_none());
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.6, 0.4)).is_some());
    }

    #[test]
    fn test_single_pedal_never_violates() {
        let mut check = GearPedalCheck::new();
        let config = GearPedalConfig::default();
        check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.9, 0.0));
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.9, 0.05)).is_none());
        assert!(check.evaluate(&config, &snap(Gear::Drive, 10.0, 0.0, 0.9)).is_none());
    }
}
