// Error types for the form coach core
//
// Structured errors with numeric codes so host applications can handle
// them programmatically without parsing messages.

mod fixture;
mod session;
mod speech;

pub use fixture::{FixtureError, FixtureErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};
pub use speech::{SpeechError, SpeechErrorCodes};

/// Error codes for structured error reporting
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
