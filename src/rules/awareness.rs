// Did the driver actually check traffic before maneuvering? Three separate
// situations feed one verdict: committed turns, moving off from the parking
// zone, and accelerating in reverse.

use crate::environment::EnvironmentState;
use crate::turn_commit::{TurnCommitTimer, TurnDirection};
use crate::types::{AwarenessConfig, Gear, TelemetrySnapshot};
use tracing::debug;

pub struct AwarenessCheck {
    turn: TurnCommitTimer,
    stopped_time_s: f64,
    start_off_done: bool,
}

impl AwarenessCheck {
    pub fn new() -> Self {
        Self {
            turn: TurnCommitTimer::new(),
            stopped_time_s: 0.0,
            start_off_done: false,
        }
    }

    /// Returns the violation description while any sub-check is failing.
    pub fn evaluate(
        &mut self,
        config: &AwarenessConfig,
        look_window_s: f64,
        env: &EnvironmentState,
        snap: &TelemetrySnapshot,
        now_s: f64,
        dt_s: f64,
    ) -> Option<String> {
        let looked_left = env.looked_left_within(now_s, look_window_s);
        let looked_right = env.looked_right_within(now_s, look_window_s);

        let mut violating = false;

        // ── A: committed turn must be preceded by a look that direction ──
        if let Some(direction) = self.turn.update(
            &config.turn,
            snap.steering,
            snap.speed_kmh,
            snap.brake,
            dt_s,
        ) {
            let (primary, opposite) = match direction {
                TurnDirection::Left => (looked_left, looked_right),
                TurnDirection::Right => (looked_right, looked_left),
            };
            // narrow stretches demand a look both ways
            let opposite_ok = !env.in_narrow_zone() || opposite;
            if !primary || !opposite_ok {
                violating = true;
            }
        }

        // ── B: one-time start-off check in the parking zone ──
        // Arms only after a genuine full stop; consumed at the moment the
        // vehicle moves off, whatever the look outcome.
        let was_fully_stopped = self.stopped_time_s >= config.full_stop_time_s;
        if !self.start_off_done
            && env.in_parking_zone()
            && was_fully_stopped
            && snap.speed_kmh > config.start_off_speed_kmh
        {
            self.start_off_done = true;
            if !looked_left || !looked_right {
                debug!("start-off without checking both sides");
                violating = true;
            }
        }

        if snap.speed_kmh.abs() < config.stationary_speed_kmh {
            self.stopped_time_s += dt_s;
        } else {
            self.stopped_time_s = 0.0;
        }

        // ── C: accelerating in reverse from (near) standstill ──
        if snap.gear == Gear::Reverse
            && snap.speed_kmh < config.reverse_speed_ceiling_kmh
            && snap.throttle > config.reverse_throttle_floor
            && (!looked_left || !looked_right)
        {
            debug!("reversing without checking both sides");
            violating = true;
        }

        violating
            .then(|| "Failed to check surrounding environment before maneuvering.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gear;

    const DT: f64 = 0.1;

    fn snap(speed: f32, steering: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_kmh: speed,
            steering,
            throttle: 0.0,
            brake: 0.0,
            gear: Gear::Drive,
            position: [0.0; 3],
            forward: [0.0, 0.0, 1.0],
            left_signal: false,
            right_signal: false,
        }
    }

    fn run_ticks(
        check: &mut AwarenessCheck,
        env: &EnvironmentState,
        snapshot: &TelemetrySnapshot,
        start_s: f64,
        ticks: usize,
    ) -> Option<String> {
        let mut last = None;
        for i in 0..ticks {
            last = check.evaluate(
                &AwarenessConfig::default(),
                35.0,
                env,
                snapshot,
                start_s + i as f64 * DT,
                DT,
            );
        }
        last
    }

    #[test]
    fn test_committed_left_turn_without_look_violates() {
        let mut check = AwarenessCheck::new();
        let env = EnvironmentState::new();
        let turning = snap(20.0, -0.6);
        assert!(run_ticks(&mut check, &env, &turning, 0.0, 7).is_some());
    }

    #[test]
    fn test_committed_left_turn_with_recent_look_passes() {
        let mut check = AwarenessCheck::new();
        let mut env = EnvironmentState::new();
        env.register_look_left(0.0);
        let turning = snap(20.0, -0.6);
        assert!(run_ticks(&mut check, &env, &turning, 0.1, 7).is_none());
    }

    #[test]
    fn test_narrow_zone_requires_both_looks() {
        let mut check = AwarenessCheck::new();
        let mut env = EnvironmentState::new();
        env.set_in_narrow_zone(true);
        env.register_look_left(0.0);
        // looked left but not right: still a violation inside the narrow zone
        let turning = snap(20.0, -0.6);
        assert!(run_ticks(&mut check, &env, &turning, 0.1, 7).is_some());

        env.register_look_right(0.5);
        let mut check = AwarenessCheck::new();
        assert!(run_ticks(&mut check, &env, &turning, 0.6, 7).is_none());
    }

    #[test]
    fn test_uncommitted_swerve_never_violates() {
        let mut check = AwarenessCheck::new();
        let env = EnvironmentState::new();
        // alternate steering sign every tick; the commit clock never fills
        for i in 0..40 {
            let s = if i % 2 == 0 { 0.6 } else { -0.6 };
            let result = check.evaluate(
                &AwarenessConfig::default(),
                35.0,
                &env,
                &snap(20.0, s),
                i as f64 * DT,
                DT,
            );
            assert!(result.is_none());
        }
    }

    #[test]
    fn test_start_off_check_fires_once_per_run() {
        let mut check = AwarenessCheck::new();
        let mut env = EnvironmentState::new();
        env.set_in_parking_zone(true);

        // 3 seconds fully stopped
        let stopped = snap(0.0, 0.0);
        run_ticks(&mut check, &env, &stopped, 0.0, 30);

        // moving off without either look: violation
        let moving = snap(3.0, 0.0);
        assert!(run_ticks(&mut check, &env, &moving, 3.0, 1).is_some());

        // stop again, move off again: the check never repeats
        run_ticks(&mut check, &env, &stopped, 4.0, 30);
        assert!(run_ticks(&mut check, &env, &moving, 7.0, 1).is_none());
    }

    #[test]
    fn test_start_off_requires_prior_full_stop() {
        let mut check = AwarenessCheck::new();
        let mut env = EnvironmentState::new();
        env.set_in_parking_zone(true);
        // rolls through the zone without ever stopping: no check, flag intact
        let moving = snap(5.0, 0.0);
        assert!(run_ticks(&mut check, &env, &moving, 0.0, 20).is_none());
        assert!(!check.start_off_done);
    }

    #[test]
    fn test_start_off_with_both_looks_passes() {
        let mut check = AwarenessCheck::new();
        let mut env = EnvironmentState::new();
        env.set_in_parking_zone(true);
        env.register_look_left(0.0);
        env.register_look_right(0.0);

        let stopped = snap(0.0, 0.0);
        run_ticks(&mut check, &env, &stopped, 0.0, 30);
        let moving = snap(3.0, 0.0);
        assert!(run_ticks(&mut check, &env, &moving, 3.0, 1).is_none());
        assert!(check.start_off_done);
    }

    #[test]
    fn test_reverse_throttle_without_looks_violates() {
        let mut check = AwarenessCheck::new();
        let env = EnvironmentState::new();
        let mut reversing = snap(0.5, 0.0);
        reversing.gear = Gear::Reverse;
        reversing.throttle = 0.3;
        assert!(run_ticks(&mut check, &env, &reversing, 0.0, 1).is_some());

        // with both looks the same maneuver is clean
        let mut env = EnvironmentState::new();
        env.register_look_left(0.0);
        env.register_look_right(0.0);
        let mut check = AwarenessCheck::new();
        assert!(run_ticks(&mut check, &env, &reversing, 0.1, 1).is_none());
    }

    #[test]
    fn test_reverse_check_needs_throttle() {
        let mut check = AwarenessCheck::new();
        let env = EnvironmentState::new();
        let mut idle_reverse = snap(0.5, 0.0);
        idle_reverse.gear = Gear::Reverse;
        idle_reverse.throttle = 0.05;
        assert!(run_ticks(&mut check, &env, &idle_reverse, 0.0, 10).is_none());
    }
}
