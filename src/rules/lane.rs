use crate::environment::EnvironmentState;

pub struct LaneDisciplineCheck;

impl LaneDisciplineCheck {
    pub fn new() -> Self {
        Self
    }

    /// Mirrors the zone-adapter flags: wrong side of the road, or drifting
    /// out of the lane boundaries.
    pub fn evaluate(&self, env: &EnvironmentState) -> Option<String> {
        (env.on_wrong_side() || env.drifting_out_of_lane()).then(|| {
            "Wrong side of the road or drifting out of lane boundaries.".to_string()
        })
    }
}
