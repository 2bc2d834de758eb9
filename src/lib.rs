// Form Coach Core - real-time exercise form analysis and feedback arbitration
//
// Consumes per-frame 2D body keypoints, classifies form quality through
// per-exercise rule cascades, and decides which single coaching phrase
// (if any) is spoken right now.

pub mod analysis;
pub mod coach;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod fixtures;
pub mod managers;
pub mod pose;
pub mod signal;
pub mod speech;

pub use analysis::{analyze, Exercise, FormVerdict};
pub use coach::{Coach, DetectionStatus, Emission, EmissionKind};
pub use config::AppConfig;
pub use engine::{PoseProvider, SessionHandle, SignalProvider, SystemTimeSource, TimeSource};
pub use pose::{Joint, Keypoint, Pose};
pub use signal::SignalContext;

/// Initialize logging for binaries. Library consumers that already install
/// a subscriber should skip this.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
