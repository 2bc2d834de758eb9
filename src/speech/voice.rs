// Voice personality presets and breathing-adapted delivery settings

use serde::{Deserialize, Serialize};

use crate::signal::{BreathingConsistency, BreathingRate, SignalContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoicePersonality {
    Calm,
    Energetic,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceGender {
    Female,
    Male,
}

/// Synthesis parameters handed to the speech backend.
///
/// `rate` and `pitch` are multipliers around 1.0; `stability` is the
/// backend's 0..1 expressiveness damping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub stability: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::preset(VoicePersonality::Neutral, VoiceGender::Female)
    }
}

impl VoiceSettings {
    /// Base settings for a personality and voice gender.
    pub fn preset(personality: VoicePersonality, gender: VoiceGender) -> Self {
        match (personality, gender) {
            (VoicePersonality::Calm, VoiceGender::Female) => Self {
                rate: 0.75,
                pitch: 0.95,
                stability: 0.8,
            },
            (VoicePersonality::Calm, VoiceGender::Male) => Self {
                rate: 0.75,
                pitch: 0.85,
                stability: 0.8,
            },
            (VoicePersonality::Energetic, VoiceGender::Female) => Self {
                rate: 1.1,
                pitch: 1.25,
                stability: 0.2,
            },
            (VoicePersonality::Energetic, VoiceGender::Male) => Self {
                rate: 1.1,
                pitch: 1.2,
                stability: 0.2,
            },
            (VoicePersonality::Neutral, VoiceGender::Female) => Self {
                rate: 0.9,
                pitch: 1.05,
                stability: 0.5,
            },
            (VoicePersonality::Neutral, VoiceGender::Male) => Self {
                rate: 0.9,
                pitch: 0.95,
                stability: 0.5,
            },
        }
    }

    /// Adapt delivery to the user's breathing state.
    ///
    /// Fast breathing slows and steadies the voice so it does not add
    /// urgency; slow breathing allows a slightly brisker, livelier read;
    /// erratic breathing steadies regardless of rate.
    pub fn adapted_to(&self, signal: &SignalContext) -> Self {
        let mut adapted = *self;

        match signal.breathing_rate {
            BreathingRate::Fast => {
                adapted.rate = adapted.rate.min(0.85);
                adapted.pitch = (adapted.pitch - 0.05).max(0.9);
                adapted.stability = (adapted.stability + 0.1).min(0.8);
            }
            BreathingRate::Slow => {
                adapted.rate = (adapted.rate + 0.05).min(1.0);
                adapted.pitch = (adapted.pitch + 0.05).min(1.15);
                adapted.stability = (adapted.stability - 0.1).max(0.2);
            }
            BreathingRate::Normal => {}
        }

        if signal.breathing_consistency == BreathingConsistency::Erratic {
            adapted.rate = adapted.rate.min(0.88);
            adapted.stability = (adapted.stability + 0.1).min(0.8);
        }

        adapted
    }
}
