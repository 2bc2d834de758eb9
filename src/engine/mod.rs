//! Engine module housing the session orchestration core.
//!
//! `providers` holds the trait seams to the outside world (pose model,
//! breathing signal, clock); `session` drives the frame loop that turns
//! detected poses into broadcast feedback and speech.

pub mod providers;
pub mod session;

pub use providers::{PoseProvider, SignalProvider, StubTimeSource, SystemTimeSource, TimeSource};
pub use session::{FrameDiagnostics, SessionHandle};
