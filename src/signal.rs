//! Breathing-signal classifications supplied by the physiological estimator
//!
//! The core only ever sees these coarse classes, never raw waveforms. An
//! absent context is valid and means no adaptation is applied.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathingRate {
    Slow,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathingConsistency {
    Steady,
    Erratic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalConfidence {
    Low,
    Medium,
    High,
}

impl SignalConfidence {
    /// Cadence multiplier: a noisier signal means coaching less often so
    /// the coach does not react to jitter.
    pub fn interval_multiplier(&self) -> f32 {
        match self {
            SignalConfidence::Low => 1.5,
            SignalConfidence::Medium => 1.2,
            SignalConfidence::High => 1.0,
        }
    }
}

/// One refresh of the breathing estimator's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalContext {
    pub breathing_rate: BreathingRate,
    pub breathing_consistency: BreathingConsistency,
    pub signal_confidence: SignalConfidence,
}
