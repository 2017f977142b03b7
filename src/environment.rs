// World facts pushed in by trigger/collision adapters, read by the per-tick
// rule evaluation. Last write wins; there is no queue and no replay.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct EnvironmentState {
    in_narrow_zone: bool,
    in_parking_zone: bool,
    on_wrong_side: bool,
    drifting_out_of_lane: bool,
    traffic_light_violation: bool,
    last_look_left_s: f64,
    last_look_right_s: f64,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            in_narrow_zone: false,
            in_parking_zone: false,
            on_wrong_side: false,
            drifting_out_of_lane: false,
            traffic_light_violation: false,
            last_look_left_s: f64::NEG_INFINITY,
            last_look_right_s: f64::NEG_INFINITY,
        }
    }
}

impl EnvironmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_in_narrow_zone(&mut self, val: bool) {
        debug!("narrow zone: {}", val);
        self.in_narrow_zone = val;
    }

    pub fn in_narrow_zone(&self) -> bool {
        self.in_narrow_zone
    }

    pub fn set_in_parking_zone(&mut self, val: bool) {
        debug!("parking zone: {}", val);
        self.in_parking_zone = val;
    }

    pub fn in_parking_zone(&self) -> bool {
        self.in_parking_zone
    }

    pub fn set_wrong_side(&mut self, val: bool) {
        debug!("wrong side: {}", val);
        self.on_wrong_side = val;
    }

    pub fn on_wrong_side(&self) -> bool {
        self.on_wrong_side
    }

    pub fn set_drifting_out_of_lane(&mut self, val: bool) {
        debug!("drifting out of lane: {}", val);
        self.drifting_out_of_lane = val;
    }

    pub fn drifting_out_of_lane(&self) -> bool {
        self.drifting_out_of_lane
    }

    pub fn set_traffic_light_violation(&mut self, val: bool) {
        debug!("traffic light violation flag: {}", val);
        self.traffic_light_violation = val;
    }

    pub fn traffic_light_violation(&self) -> bool {
        self.traffic_light_violation
    }

    pub fn register_look_left(&mut self, now_s: f64) {
        debug!("look left registered at {:.2}s", now_s);
        self.last_look_left_s = now_s;
    }

    pub fn register_look_right(&mut self, now_s: f64) {
        debug!("look right registered at {:.2}s", now_s);
        self.last_look_right_s = now_s;
    }

    pub fn looked_left_within(&self, now_s: f64, window_s: f64) -> bool {
        now_s - self.last_look_left_s <= window_s
    }

    pub fn looked_right_within(&self, now_s: f64, window_s: f64) -> bool {
        now_s - self.last_look_right_s <= window_s
    }
}
