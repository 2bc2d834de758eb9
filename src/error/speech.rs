// Speech synthesis error types

use crate::error::ErrorCode;
use std::fmt;

/// Speech error code constants.
///
/// Error code range: 1101-1103
pub struct SpeechErrorCodes {}

impl SpeechErrorCodes {
    /// The synthesizer backend rejected or failed the utterance
    pub const SYNTHESIS_FAILED: i32 = 1101;

    /// The queue is full; the utterance was dropped
    pub const QUEUE_FULL: i32 = 1102;

    /// The queue worker has shut down
    pub const QUEUE_CLOSED: i32 = 1103;
}

/// Errors from the speech queue and synthesizer backend.
///
/// These never propagate out of the frame loop; speech is fire-and-forget
/// and failures degrade to a logged, silent frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechError {
    /// Backend failed to synthesize or play the utterance
    SynthesisFailed { reason: String },

    /// Queue was at capacity
    QueueFull,

    /// Queue worker is gone
    QueueClosed,
}

impl ErrorCode for SpeechError {
    fn code(&self) -> i32 {
        match self {
            SpeechError::SynthesisFailed { .. } => SpeechErrorCodes::SYNTHESIS_FAILED,
            SpeechError::QueueFull => SpeechErrorCodes::QUEUE_FULL,
            SpeechError::QueueClosed => SpeechErrorCodes::QUEUE_CLOSED,
        }
    }

    fn message(&self) -> String {
        match self {
            SpeechError::SynthesisFailed { reason } => {
                format!("Speech synthesis failed: {}", reason)
            }
            SpeechError::QueueFull => "Speech queue full, utterance dropped".to_string(),
            SpeechError::QueueClosed => "Speech queue closed".to_string(),
        }
    }
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpeechError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SpeechError {}
