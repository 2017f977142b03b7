// Steering debounce: a turn only counts once the wheel has held one side
// long enough. Filters out lane-keeping corrections and controller noise.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// Thresholds for one timer instance. Two instances run in parallel (the
/// awareness check and the signaling check) so each can be tuned on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnCommitConfig {
    /// Turn detection is suspended below this speed.
    pub min_speed_kmh: f32,
    /// Steering inside ±deadband does not count as turning.
    pub steer_deadband: f32,
    /// Turn detection is suspended while braking at or beyond this.
    pub brake_ignore_ceiling: f32,
    /// Steering must hold one sign this long before the turn is real.
    pub commit_time_s: f64,
}

impl Default for TurnCommitConfig {
    fn default() -> Self {
        Self {
            min_speed_kmh: 5.0,
            steer_deadband: 0.3,
            brake_ignore_ceiling: 0.4,
            commit_time_s: 0.5,
        }
    }
}

/// Accumulates time while the steering signal holds one sign. Any sign
/// change, deadband return, near-stop, or heavy braking restarts the clock.
///
/// Confirmation is level-triggered: once committed, `update` keeps returning
/// the direction every tick the hold continues. Consumers that want a single
/// event run the result through their own edge/one-shot handling.
#[derive(Debug, Clone, Default)]
pub struct TurnCommitTimer {
    timer: f64,
    sign: i8,
}

impl TurnCommitTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        config: &TurnCommitConfig,
        steering: f32,
        speed_kmh: f32,
        brake: f32,
        dt: f64,
    ) -> Option<TurnDirection> {
        if speed_kmh <= config.min_speed_kmh || brake >= config.brake_ignore_ceiling {
            self.reset();
            return None;
        }

        let candidate: i8 = if steering > config.steer_deadband {
            1
        } else if steering < -config.steer_deadband {
            -1
        } else {
            0
        };

        if candidate == 0 {
            self.reset();
            return None;
        }

        if candidate == self.sign {
            self.timer += dt;
        } else {
            // direction change restarts the commit clock
            self.timer = 0.0;
            self.sign = candidate;
        }

        if self.timer >= config.commit_time_s {
            Some(if self.sign > 0 {
                TurnDirection::Right
            } else {
                TurnDirection::Left
            })
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.sign = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.1;

    fn config() -> TurnCommitConfig {
        TurnCommitConfig::default()
    }

    fn hold(timer: &mut TurnCommitTimer, steering: f32, ticks: usize) -> Option<TurnDirection> {
        let mut last = None;
        for _ in 0..ticks {
            last = timer.update(&config(), steering, 20.0, 0.0, DT);
        }
        last
    }

    #[test]
    fn test_commit_needs_full_duration() {
        let mut timer = TurnCommitTimer::new();
        // 0.5s commit at 0.1s ticks: the first tick sets the sign with
        // timer=0, so 5 ticks reach only 0.4s of hold.
        assert!(hold(&mut timer, 0.6, 5).is_none());
        // one more tick crosses the threshold
        assert_eq!(hold(&mut timer, 0.6, 1), Some(TurnDirection::Right));
    }

    #[test]
    fn test_confirmation_persists_while_held() {
        let mut timer = TurnCommitTimer::new();
        hold(&mut timer, -0.6, 7);
        for _ in 0..10 {
            assert_eq!(
                timer.update(&config(), -0.6, 20.0, 0.0, DT),
                Some(TurnDirection::Left)
            );
        }
    }

    #[test]
    fn test_direction_change_restarts_clock() {
        let mut timer = TurnCommitTimer::new();
        hold(&mut timer, 0.6, 4);
        // flip to the left: previous accumulation must not carry over
        assert!(timer.update(&config(), -0.6, 20.0, 0.0, DT).is_none());
        assert!(hold(&mut timer, -0.6, 4).is_none());
        assert_eq!(hold(&mut timer, -0.6, 2), Some(TurnDirection::Left));
    }

    #[test]
    fn test_deadband_return_resets() {
        let mut timer = TurnCommitTimer::new();
        hold(&mut timer, 0.6, 5);
        assert!(timer.update(&config(), 0.1, 20.0, 0.0, DT).is_none());
        // must start over from zero
        assert!(hold(&mut timer, 0.6, 5).is_none());
    }

    #[test]
    fn test_suspended_while_slow_or_braking() {
        let mut timer = TurnCommitTimer::new();
        hold(&mut timer, 0.6, 5);
        // crawling: detection suspended and state cleared
        assert!(timer.update(&config(), 0.6, 2.0, 0.0, DT).is_none());
        assert!(hold(&mut timer, 0.6, 5).is_none());

        hold(&mut timer, 0.6, 5);
        // heavy braking likewise
        assert!(timer.update(&config(), 0.6, 20.0, 0.9, DT).is_none());
        assert!(hold(&mut timer, 0.6, 5).is_none());
    }
}
