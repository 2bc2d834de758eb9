//! Trait seams between the session loop and its collaborators.

use std::sync::Mutex;
use std::time::Instant;

use futures::future::BoxFuture;

use crate::error::SessionError;
use crate::pose::Pose;
use crate::signal::SignalContext;

/// Source of per-frame pose estimates.
///
/// Implementations wrap a pose model or a scripted fixture. `detect`
/// returns `None` when the frame contains no recognizable person; errors
/// are reserved for provider failures.
pub trait PoseProvider: Send + Sync {
    /// Whether the provider is still warming up. Frames are skipped and
    /// the session stays in `Initializing` until this clears.
    fn is_loading(&self) -> bool {
        false
    }

    fn detect(&self) -> BoxFuture<'_, Result<Option<Pose>, SessionError>>;
}

/// Source of the optional breathing signal.
///
/// `None` means no wearable is connected this frame; the session then
/// runs at base cadence with unadapted voice settings.
pub trait SignalProvider: Send + Sync {
    fn current(&self) -> Option<SignalContext>;
}

/// Monotonic time source injected into the session loop.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;
}

/// Default time source backed by `Instant::now`.
#[derive(Default)]
pub struct SystemTimeSource {
    _unit: (),
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced time source for tests.
pub struct StubTimeSource {
    now: Mutex<Instant>,
}

impl Default for StubTimeSource {
    fn default() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }
}

impl StubTimeSource {
    pub fn advance(&self, delta: std::time::Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += delta;
    }
}

impl TimeSource for StubTimeSource {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}
