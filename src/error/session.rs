// Session lifecycle error types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants shared with host applications.
///
/// Error code range: 1001-1005
pub struct SessionErrorCodes {}

impl SessionErrorCodes {
    /// Session is already running
    pub const ALREADY_RUNNING: i32 = 1001;

    /// Session is not running
    pub const NOT_RUNNING: i32 = 1002;

    /// No exercise selected when starting a session
    pub const NO_EXERCISE: i32 = 1003;

    /// Pose provider failed to produce a frame
    pub const POSE_PROVIDER_FAILED: i32 = 1004;

    /// Mutex was poisoned
    pub const LOCK_POISONED: i32 = 1005;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=SessionHandle, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors covering session start/stop and the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Session is already running
    AlreadyRunning,

    /// Session is not running
    NotRunning,

    /// Start was requested without an exercise
    NoExercise,

    /// Upstream pose inference failed
    PoseProviderFailed { reason: String },

    /// Mutex was poisoned
    LockPoisoned { component: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::AlreadyRunning => SessionErrorCodes::ALREADY_RUNNING,
            SessionError::NotRunning => SessionErrorCodes::NOT_RUNNING,
            SessionError::NoExercise => SessionErrorCodes::NO_EXERCISE,
            SessionError::PoseProviderFailed { .. } => SessionErrorCodes::POSE_PROVIDER_FAILED,
            SessionError::LockPoisoned { .. } => SessionErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::AlreadyRunning => {
                "Session already running. Call stop() first.".to_string()
            }
            SessionError::NotRunning => "Session not running. Call start() first.".to_string(),
            SessionError::NoExercise => {
                "No exercise selected. Pick an exercise before starting.".to_string()
            }
            SessionError::PoseProviderFailed { reason } => {
                format!("Pose inference failed: {}", reason)
            }
            SessionError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_codes() {
        assert_eq!(
            SessionError::AlreadyRunning.code(),
            SessionErrorCodes::ALREADY_RUNNING
        );
        assert_eq!(SessionError::NotRunning.code(), SessionErrorCodes::NOT_RUNNING);
        assert_eq!(SessionError::NoExercise.code(), SessionErrorCodes::NO_EXERCISE);
        assert_eq!(
            SessionError::PoseProviderFailed {
                reason: "test".to_string()
            }
            .code(),
            SessionErrorCodes::POSE_PROVIDER_FAILED
        );
        assert_eq!(
            SessionError::LockPoisoned {
                component: "test".to_string()
            }
            .code(),
            SessionErrorCodes::LOCK_POISONED
        );
    }

    #[test]
    fn test_session_error_messages() {
        assert!(SessionError::AlreadyRunning.message().contains("already running"));
        assert!(SessionError::NotRunning.message().contains("not running"));

        let err = SessionError::PoseProviderFailed {
            reason: "model crashed".to_string(),
        };
        assert!(err.message().contains("model crashed"));
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::NotRunning;
        let display = format!("{}", err);
        assert!(display.contains("SessionError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
