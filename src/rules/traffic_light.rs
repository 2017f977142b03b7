use crate::environment::EnvironmentState;

pub struct TrafficLightCheck;

impl TrafficLightCheck {
    pub fn new() -> Self {
        Self
    }

    /// True exactly while the intersection adapter holds the flag: entered
    /// the trigger zone under a red or yellow light, not yet left it.
    pub fn evaluate(&self, env: &EnvironmentState) -> Option<String> {
        env.traffic_light_violation()
            .then(|| "Ignored traffic signal (ran a red or yellow light).".to_string())
    }
}
