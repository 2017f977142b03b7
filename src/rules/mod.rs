// Per-tick rule evaluators. Each holds only its own working state and turns
// a telemetry snapshot plus environment facts into "violating right now".
// Deduplication is the engine's job, not theirs.

pub mod awareness;
pub mod gear;
pub mod lane;
pub mod proximity;
pub mod rolling;
pub mod signaling;
pub mod speed;
pub mod stopping;
pub mod traffic_light;

pub use awareness::AwarenessCheck;
pub use gear::GearPedalCheck;
pub use lane::LaneDisciplineCheck;
pub use proximity::ProximityMonitor;
pub use rolling::RollingCheck;
pub use signaling::SignalingCheck;
pub use speed::SpeedCheck;
pub use stopping::StoppingCheck;
pub use traffic_light::TrafficLightCheck;
