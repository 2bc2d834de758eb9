// Fixture loading error types

use crate::error::ErrorCode;
use std::fmt;

/// Fixture error code constants.
///
/// Error code range: 1201-1203
pub struct FixtureErrorCodes {}

impl FixtureErrorCodes {
    /// Named fixture does not exist
    pub const NOT_FOUND: i32 = 1201;

    /// Fixture file could not be read
    pub const READ_FAILED: i32 = 1202;

    /// Fixture file could not be parsed
    pub const PARSE_FAILED: i32 = 1203;
}

/// Errors from loading pose scripts and synthetic fixtures.
#[derive(Debug)]
pub enum FixtureError {
    /// Named fixture does not exist
    NotFound { name: String },

    /// Fixture file could not be read
    ReadFailed { path: String, source: std::io::Error },

    /// Fixture file could not be parsed
    ParseFailed { path: String, source: serde_json::Error },
}

impl ErrorCode for FixtureError {
    fn code(&self) -> i32 {
        match self {
            FixtureError::NotFound { .. } => FixtureErrorCodes::NOT_FOUND,
            FixtureError::ReadFailed { .. } => FixtureErrorCodes::READ_FAILED,
            FixtureError::ParseFailed { .. } => FixtureErrorCodes::PARSE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            FixtureError::NotFound { name } => format!("Fixture not found: {}", name),
            FixtureError::ReadFailed { path, source } => {
                format!("Failed to read fixture {}: {}", path, source)
            }
            FixtureError::ParseFailed { path, source } => {
                format!("Failed to parse fixture {}: {}", path, source)
            }
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixtureError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::NotFound { .. } => None,
            FixtureError::ReadFailed { source, .. } => Some(source),
            FixtureError::ParseFailed { source, .. } => Some(source),
        }
    }
}
