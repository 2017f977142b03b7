// Turning without the matching indicator. This is the timer-gated half of
// the signaling rule; the lane-boundary adapter owns the immediate half.

use crate::turn_commit::{TurnCommitTimer, TurnDirection};
use crate::types::{SignalingConfig, TelemetrySnapshot};
use tracing::debug;

pub struct SignalingCheck {
    turn: TurnCommitTimer,
}

impl SignalingCheck {
    pub fn new() -> Self {
        Self {
            turn: TurnCommitTimer::new(),
        }
    }

    pub fn evaluate(
        &mut self,
        config: &SignalingConfig,
        snap: &TelemetrySnapshot,
        dt_s: f64,
    ) -> Option<String> {
        let direction = self.turn.update(
            &config.turn,
            snap.steering,
            snap.speed_kmh,
            snap.brake,
            dt_s,
        )?;

        let signaled = match direction {
            TurnDirection::Left => snap.left_signal,
            TurnDirection::Right => snap.right_signal,
        };

        if !signaled {
            debug!("committed {} turn with no matching indicator", direction.as_str());
        }
        (!signaled).then(|| "Turning without signaling.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gear;

    const DT: f64 = 0.1;

    fn snap(steering: f32, left_signal: bool, right_signal: bool) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_kmh: 20.0,
            steering,
            throttle: 0.2,
            brake: 0.0,
            gear: Gear::Drive,
            position: [0.0; 3],
            forward: [0.0, 0.0, 1.0],
            left_signal,
            right_signal,
        }
    }

    fn run(check: &mut SignalingCheck, snapshot: &TelemetrySnapshot, ticks: usize) -> Option<String> {
        let mut last = None;
        for _ in 0..ticks {
            last = check.evaluate(&SignalingConfig::default(), snapshot, DT);
        }
        last
    }

    #[test]
    fn test_right_turn_without_right_signal_violates() {
        let mut check = SignalingCheck::new();
        assert!(run(&mut check, &snap(0.6, false, false), 7).is_some());
    }

    #[test]
    fn test_right_turn_with_right_signal_passes() {
        let mut check = SignalingCheck::new();
        assert!(run(&mut check, &snap(0.6, false, true), 7).is_none());
    }

    #[test]
    fn test_wrong_direction_signal_still_violates() {
        let mut check = SignalingCheck::new();
        // left lamp on while committing a right turn
        assert!(run(&mut check, &snap(0.6, true, false), 7).is_some());
    }

    #[test]
    fn test_short_steering_blip_is_ignored() {
        let mut check = SignalingCheck::new();
        // 0.4s of hard steering: under the 0.5s commit
        assert!(run(&mut check, &snap(0.6, false, false), 4).is_none());
    }
}
