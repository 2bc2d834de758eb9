// Feedback keys, history, and anti-repetition variant selection
//
// A feedback key identifies a class of coaching message independent of
// its phrasing. The variant engine rotates through paraphrases of the
// same key and goes silent once the user has heard it enough.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod variants;

pub use variants::extract_feedback_key;

/// Canonical identifier for a class of coaching message.
///
/// Analyzers return these directly; `Generic` only appears for
/// collaborator-injected text that the extractor could not classify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKey {
    SquatBentOver,
    SquatBackAlignment,
    SquatSitBack,
    SquatUprightChair,
    SquatKneeTooStraight,
    SquatGreatDepth,
    SquatGoodDepth,
    SquatEncouragement,
    SquatKneeAlignment,
    PushUpTooShallow,
    PushUpExcellentDepth,
    PushUpGoodDepth,
    PushUpNeedDeeper,
    PushUpTooShallowAlt,
    PushUpBodyAlignment,
    PushUpHandPosition,
    PushUpElbowFlare,
    WallSitKneeTooBent,
    WallSitKneeTooStraight,
    WallSitPerfectKnee,
    WallSitGoodKnee,
    WallSitBackAlignment,
    WallSitBackPressed,
    WallSitHipsTooHigh,
    WallSitHipsTooLow,
    DeadliftKneeTooBent,
    DeadliftKneeTooStraight,
    DeadliftGoodKnee,
    DeadliftBackRounding,
    DeadliftBackStraighten,
    DeadliftBackExcellent,
    DeadliftHingeMore,
    DeadliftVeryDeep,
    DeadliftGoodHinge,
    DeadliftShoulderPosition,
    /// Synthesized from unrecognized text; carries its own identifier.
    Generic(String),
}

impl FeedbackKey {
    /// Every non-generic key, for table and round-trip checks.
    pub const ALL: [FeedbackKey; 35] = [
        FeedbackKey::SquatBentOver,
        FeedbackKey::SquatBackAlignment,
        FeedbackKey::SquatSitBack,
        FeedbackKey::SquatUprightChair,
        FeedbackKey::SquatKneeTooStraight,
        FeedbackKey::SquatGreatDepth,
        FeedbackKey::SquatGoodDepth,
        FeedbackKey::SquatEncouragement,
        FeedbackKey::SquatKneeAlignment,
        FeedbackKey::PushUpTooShallow,
        FeedbackKey::PushUpExcellentDepth,
        FeedbackKey::PushUpGoodDepth,
        FeedbackKey::PushUpNeedDeeper,
        FeedbackKey::PushUpTooShallowAlt,
        FeedbackKey::PushUpBodyAlignment,
        FeedbackKey::PushUpHandPosition,
        FeedbackKey::PushUpElbowFlare,
        FeedbackKey::WallSitKneeTooBent,
        FeedbackKey::WallSitKneeTooStraight,
        FeedbackKey::WallSitPerfectKnee,
        FeedbackKey::WallSitGoodKnee,
        FeedbackKey::WallSitBackAlignment,
        FeedbackKey::WallSitBackPressed,
        FeedbackKey::WallSitHipsTooHigh,
        FeedbackKey::WallSitHipsTooLow,
        FeedbackKey::DeadliftKneeTooBent,
        FeedbackKey::DeadliftKneeTooStraight,
        FeedbackKey::DeadliftGoodKnee,
        FeedbackKey::DeadliftBackRounding,
        FeedbackKey::DeadliftBackStraighten,
        FeedbackKey::DeadliftBackExcellent,
        FeedbackKey::DeadliftHingeMore,
        FeedbackKey::DeadliftVeryDeep,
        FeedbackKey::DeadliftGoodHinge,
        FeedbackKey::DeadliftShoulderPosition,
    ];

    /// The first variant doubles as the canonical phrasing analyzers emit.
    pub fn canonical_text(&self) -> &'static str {
        self.variants().first().copied().unwrap_or("")
    }

    /// Stable identifier, used in logs and diagnostic output.
    pub fn as_str(&self) -> &str {
        match self {
            FeedbackKey::SquatBentOver => "squat-bent-over",
            FeedbackKey::SquatBackAlignment => "squat-back-alignment",
            FeedbackKey::SquatSitBack => "squat-sit-back",
            FeedbackKey::SquatUprightChair => "squat-upright-chair",
            FeedbackKey::SquatKneeTooStraight => "squat-knee-too-straight",
            FeedbackKey::SquatGreatDepth => "squat-great-depth",
            FeedbackKey::SquatGoodDepth => "squat-good-depth",
            FeedbackKey::SquatEncouragement => "squat-encouragement",
            FeedbackKey::SquatKneeAlignment => "squat-knee-alignment",
            FeedbackKey::PushUpTooShallow => "pushup-too-shallow",
            FeedbackKey::PushUpExcellentDepth => "pushup-excellent-depth",
            FeedbackKey::PushUpGoodDepth => "pushup-good-depth",
            FeedbackKey::PushUpNeedDeeper => "pushup-need-deeper",
            FeedbackKey::PushUpTooShallowAlt => "pushup-too-shallow-alt",
            FeedbackKey::PushUpBodyAlignment => "pushup-body-alignment",
            FeedbackKey::PushUpHandPosition => "pushup-hand-position",
            FeedbackKey::PushUpElbowFlare => "pushup-elbow-flare",
            FeedbackKey::WallSitKneeTooBent => "wallsit-knee-too-bent",
            FeedbackKey::WallSitKneeTooStraight => "wallsit-knee-too-straight",
            FeedbackKey::WallSitPerfectKnee => "wallsit-perfect-knee",
            FeedbackKey::WallSitGoodKnee => "wallsit-good-knee",
            FeedbackKey::WallSitBackAlignment => "wallsit-back-alignment",
            FeedbackKey::WallSitBackPressed => "wallsit-back-pressed",
            FeedbackKey::WallSitHipsTooHigh => "wallsit-hips-too-high",
            FeedbackKey::WallSitHipsTooLow => "wallsit-hips-too-low",
            FeedbackKey::DeadliftKneeTooBent => "rdl-knee-too-bent",
            FeedbackKey::DeadliftKneeTooStraight => "rdl-knee-too-straight",
            FeedbackKey::DeadliftGoodKnee => "rdl-good-knee",
            FeedbackKey::DeadliftBackRounding => "rdl-back-rounding",
            FeedbackKey::DeadliftBackStraighten => "rdl-back-straighten",
            FeedbackKey::DeadliftBackExcellent => "rdl-back-excellent",
            FeedbackKey::DeadliftHingeMore => "rdl-hinge-more",
            FeedbackKey::DeadliftVeryDeep => "rdl-very-deep",
            FeedbackKey::DeadliftGoodHinge => "rdl-good-hinge",
            FeedbackKey::DeadliftShoulderPosition => "rdl-shoulder-position",
            FeedbackKey::Generic(id) => id,
        }
    }
}

impl fmt::Display for FeedbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded most-recent-first record of emitted feedback keys.
///
/// Mutated only by the arbitration loop after an actual emission; reset
/// whenever the active exercise changes.
#[derive(Debug, Clone)]
pub struct FeedbackHistory {
    entries: VecDeque<FeedbackKey>,
    capacity: usize,
}

impl FeedbackHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an emission, most recent first.
    pub fn record(&mut self, key: FeedbackKey) {
        self.entries.push_front(key);
        self.entries.truncate(self.capacity);
    }

    /// Occurrences of `key` in the most recent `window` entries.
    pub fn recent_count(&self, key: &FeedbackKey, window: usize) -> usize {
        self.entries.iter().take(window).filter(|k| *k == key).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick a paraphrase for `key`, or `None` to stay silent.
///
/// The repeat count over the recent window drives a round-robin over the
/// key's variants; at `suppression` repeats the key is muted entirely.
pub fn select_variant<'a>(
    key: &FeedbackKey,
    history: &FeedbackHistory,
    recent_window: usize,
    suppression: usize,
) -> Option<&'a str> {
    let variants = key.variants();
    if variants.is_empty() {
        return None;
    }

    let count = history.recent_count(key, recent_window);
    if count >= suppression {
        return None;
    }

    Some(variants[count % variants.len()])
}
