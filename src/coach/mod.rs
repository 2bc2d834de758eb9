// Coaching arbitration - one voice, one message at a time
//
// Every analyzed frame flows through `Coach::on_frame`, which decides
// whether anything gets spoken: a one-shot greeting shortly after
// activation, cadence-gated form feedback with anti-repetition variants,
// encouragement after a criticism-then-silence sequence, and idle
// encouragement during static holds.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::{Exercise, FormVerdict};
use crate::config::FeedbackConfig;
use crate::feedback::{extract_feedback_key, select_variant, FeedbackHistory, FeedbackKey};
use crate::signal::SignalContext;

/// Pose-detection lifecycle reported alongside the coaching stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Initializing,
    Detecting,
    NoPose,
    Detected,
    FullBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionKind {
    Greeting,
    Feedback,
    Encouragement,
    HoldEncouragement,
}

/// One spoken message chosen by the arbitration loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub text: String,
    pub kind: EmissionKind,
    /// Whether the message corrects a fault rather than praises.
    pub critical: bool,
}

const GREETINGS: [&str; 5] = [
    "Let's get started! I'll keep an eye on your form.",
    "Ready when you are. Focus on smooth, controlled movement.",
    "Alright, let's work! I'll call out anything I spot.",
    "Here we go. Take your time and move with control.",
    "Let's do this! Remember to breathe through each rep.",
];

const ENCOURAGEMENTS: [&str; 5] = [
    "You're doing great! Keep it up!",
    "That's it, much better!",
    "Nice adjustment, keep that form!",
    "Looking solid now!",
    "Great correction, stay with it!",
];

const HOLD_ENCOURAGEMENTS: [&str; 5] = [
    "Keep holding, you've got this!",
    "Strong hold! Stay right there.",
    "Breathe steady and keep that position.",
    "Halfway there, don't give up!",
    "Excellent endurance, keep it going!",
];

/// Words that mark a spoken message as corrective even when the verdict
/// itself was technically valid.
const CRITICAL_MARKERS: [&str; 5] = ["keep", "bend", "lower", "sit back", "straight"];

fn pick(pool: &[&'static str]) -> &'static str {
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(pool[0])
}

fn is_critical_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRITICAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Arbitration state for one coaching session.
///
/// Owned by the session loop; never shared. All timing flows in through
/// `now` so the logic stays deterministic under test.
pub struct Coach {
    config: FeedbackConfig,
    exercise: Exercise,
    history: FeedbackHistory,
    activated_at: Instant,
    greeting_due: Option<Instant>,
    last_emitted_at: Option<Instant>,
    last_was_critical: bool,
}

impl Coach {
    pub fn new(exercise: Exercise, config: FeedbackConfig, now: Instant) -> Self {
        let greeting_due = Some(now + Duration::from_millis(config.greeting_delay_ms));
        Self {
            history: FeedbackHistory::new(config.history_capacity),
            config,
            exercise,
            activated_at: now,
            greeting_due,
            last_emitted_at: None,
            last_was_critical: false,
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    /// Switch exercises mid-session. History and timing state reset so
    /// the new exercise starts with a clean slate; the greeting does not
    /// replay.
    pub fn set_exercise(&mut self, exercise: Exercise, now: Instant) {
        if exercise == self.exercise {
            return;
        }
        log::info!("[Coach] Exercise changed to {}", exercise);
        self.exercise = exercise;
        self.history.clear();
        self.activated_at = now;
        self.last_emitted_at = None;
        self.last_was_critical = false;
    }

    /// Minimum gap before the next spoken feedback, widened when the
    /// breathing signal is unreliable.
    fn interval(&self, signal: Option<&SignalContext>) -> Duration {
        let multiplier = signal
            .map(|s| s.signal_confidence.interval_multiplier())
            .unwrap_or(1.0);
        let ms = (self.config.base_interval_ms as f32 * multiplier) as u64;
        Duration::from_millis(ms)
    }

    /// Arbitrate one analyzed frame into at most one spoken emission.
    pub fn on_frame(
        &mut self,
        verdict: &FormVerdict,
        signal: Option<&SignalContext>,
        now: Instant,
    ) -> Option<Emission> {
        // One-shot greeting takes the frame outright. Until it lands,
        // nothing else is spoken: the greeting is the session's first
        // utterance even when a fault shows up on an early frame.
        if let Some(due) = self.greeting_due {
            if now < due {
                return None;
            }
            self.greeting_due = None;
            self.last_emitted_at = Some(now);
            return Some(Emission {
                text: pick(&GREETINGS).to_string(),
                kind: EmissionKind::Greeting,
                critical: false,
            });
        }

        let gate_open = match self.last_emitted_at {
            Some(at) => now.duration_since(at) >= self.interval(signal),
            None => true,
        };

        // Setup guidance is visual-only and never spoken.
        let speakable = !verdict.is_silent()
            && !verdict.text.to_lowercase().contains("position yourself");

        if speakable && gate_open {
            let key = verdict
                .key
                .clone()
                .or_else(|| extract_feedback_key(&verdict.text));
            if let Some(key) = key {
                if let Some(spoken) = self.phrase_for(&key, &verdict.text) {
                    let critical = !verdict.is_valid || is_critical_text(&spoken);
                    self.history.record(key);
                    self.last_was_critical = critical;
                    self.last_emitted_at = Some(now);
                    return Some(Emission {
                        text: spoken,
                        kind: EmissionKind::Feedback,
                        critical,
                    });
                }
            }
            // Suppressed by repetition: no feedback, but a static hold may
            // still earn idle encouragement below.
        }

        // Form came good after a correction and has stayed quiet. Only an
        // analyzed, acceptable frame counts: absence (the user stepped out
        // or the gate dropped the pose) is not a correction.
        if verdict.is_silent() && verdict.is_valid && self.last_was_critical && gate_open {
            self.last_was_critical = false;
            self.last_emitted_at = Some(now);
            return Some(Emission {
                text: pick(&ENCOURAGEMENTS).to_string(),
                kind: EmissionKind::Encouragement,
                critical: false,
            });
        }

        // Static holds get a nudge after a long silence.
        if self.exercise.is_static_hold() {
            let idle_since = self.last_emitted_at.unwrap_or(self.activated_at);
            if now.duration_since(idle_since)
                > Duration::from_millis(self.config.hold_idle_ms)
            {
                self.last_emitted_at = Some(now);
                return Some(Emission {
                    text: pick(&HOLD_ENCOURAGEMENTS).to_string(),
                    kind: EmissionKind::HoldEncouragement,
                    critical: false,
                });
            }
        }

        None
    }

    /// Variant-rotated phrasing for a key. Generic keys have no variant
    /// table and fall back to the raw text until the repeat cap.
    fn phrase_for(&self, key: &FeedbackKey, raw_text: &str) -> Option<String> {
        let window = self.config.recent_window;
        let cap = self.config.repeat_suppression;

        if key.variants().is_empty() {
            if self.history.recent_count(key, window) < cap {
                return Some(raw_text.to_string());
            }
            return None;
        }
        select_variant(key, &self.history, window, cap).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Diagnostics;
    use crate::signal::{BreathingConsistency, BreathingRate, SignalConfidence};

    fn config() -> FeedbackConfig {
        FeedbackConfig::default()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn silent_ok() -> FormVerdict {
        FormVerdict::quiet(Diagnostics::default())
    }

    fn fault() -> FormVerdict {
        FormVerdict::keyed(FeedbackKey::SquatKneeTooStraight, false, Diagnostics::default())
    }

    fn praise() -> FormVerdict {
        FormVerdict::keyed(FeedbackKey::SquatGoodDepth, true, Diagnostics::default())
    }

    fn low_confidence() -> SignalContext {
        SignalContext {
            breathing_rate: BreathingRate::Normal,
            breathing_consistency: BreathingConsistency::Steady,
            signal_confidence: SignalConfidence::Low,
        }
    }

    /// Drive the coach past the greeting so tests exercise the feedback
    /// branches directly.
    fn greeted_coach(exercise: Exercise, t0: Instant) -> Coach {
        let mut coach = Coach::new(exercise, config(), t0);
        let greeting = coach.on_frame(&silent_ok(), None, t0 + ms(600));
        assert_eq!(greeting.map(|e| e.kind), Some(EmissionKind::Greeting));
        coach
    }

    #[test]
    fn greeting_fires_once_after_the_delay() {
        let t0 = Instant::now();
        let mut coach = Coach::new(Exercise::Squat, config(), t0);

        // Too early: nothing yet.
        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(100)).is_none());

        let first = coach.on_frame(&silent_ok(), None, t0 + ms(600)).unwrap();
        assert_eq!(first.kind, EmissionKind::Greeting);
        assert!(!first.critical);

        // Never again, even well past the delay.
        let later = coach.on_frame(&silent_ok(), None, t0 + ms(60_000));
        assert!(later.is_none());
    }

    #[test]
    fn early_faults_wait_for_the_greeting() {
        let t0 = Instant::now();
        let mut coach = Coach::new(Exercise::Squat, config(), t0);

        // A fault before the greeting window closes is held, not spoken.
        assert!(coach.on_frame(&fault(), None, t0 + ms(100)).is_none());

        let first = coach.on_frame(&fault(), None, t0 + ms(600)).unwrap();
        assert_eq!(first.kind, EmissionKind::Greeting);

        // The fault gets its turn once the cadence gate reopens.
        let spoken = coach.on_frame(&fault(), None, t0 + ms(2700)).unwrap();
        assert_eq!(spoken.kind, EmissionKind::Feedback);
    }

    #[test]
    fn feedback_is_cadence_gated() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        // Gate is closed right after the greeting.
        assert!(coach.on_frame(&fault(), None, t0 + ms(700)).is_none());

        let spoken = coach.on_frame(&fault(), None, t0 + ms(2700)).unwrap();
        assert_eq!(spoken.kind, EmissionKind::Feedback);
        assert!(spoken.critical);

        // And closed again until another full interval passes.
        assert!(coach.on_frame(&fault(), None, t0 + ms(3700)).is_none());
        assert!(coach.on_frame(&fault(), None, t0 + ms(4700)).is_some());
    }

    #[test]
    fn low_signal_confidence_widens_the_gate() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);
        let signal = low_confidence();

        // 2500ms after the greeting: inside the widened 3000ms interval.
        assert!(coach
            .on_frame(&fault(), Some(&signal), t0 + ms(3100))
            .is_none());
        assert!(coach
            .on_frame(&fault(), Some(&signal), t0 + ms(3700))
            .is_some());
    }

    #[test]
    fn encouragement_follows_criticism_then_silence() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        let spoken = coach.on_frame(&fault(), None, t0 + ms(3000)).unwrap();
        assert!(spoken.critical);

        // Form fixed: silence past the interval earns encouragement.
        let cheer = coach.on_frame(&silent_ok(), None, t0 + ms(5500)).unwrap();
        assert_eq!(cheer.kind, EmissionKind::Encouragement);
        assert!(!cheer.critical);

        // Only once per correction.
        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(8000)).is_none());
    }

    #[test]
    fn empty_frames_do_not_earn_encouragement() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        let spoken = coach.on_frame(&fault(), None, t0 + ms(3000)).unwrap();
        assert!(spoken.critical);

        // The user steps out of frame: silence, but not a correction.
        let absent = FormVerdict::absent();
        assert!(coach.on_frame(&absent, None, t0 + ms(5500)).is_none());
        assert!(coach.on_frame(&absent, None, t0 + ms(8000)).is_none());

        // Back in frame with clean form: now the cheer lands.
        let cheer = coach.on_frame(&silent_ok(), None, t0 + ms(8500)).unwrap();
        assert_eq!(cheer.kind, EmissionKind::Encouragement);
    }

    #[test]
    fn praise_does_not_arm_encouragement() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        let spoken = coach.on_frame(&praise(), None, t0 + ms(3000)).unwrap();
        assert_eq!(spoken.kind, EmissionKind::Feedback);
        assert!(!spoken.critical);

        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(6000)).is_none());
    }

    #[test]
    fn repeated_key_rotates_then_goes_quiet() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);
        let variants = FeedbackKey::SquatKneeTooStraight.variants();

        let mut spoken_texts = Vec::new();
        for i in 0..6u64 {
            let t = t0 + ms(3000 + i * 3000);
            if let Some(emission) = coach.on_frame(&fault(), None, t) {
                spoken_texts.push(emission.text);
            }
        }

        // Five rotations, then suppression.
        assert_eq!(spoken_texts.len(), 5);
        assert_eq!(spoken_texts[0], variants[0]);
        assert_eq!(spoken_texts[1], variants[1]);
        assert_eq!(spoken_texts[4], variants[0]);
    }

    #[test]
    fn exercise_change_resets_repetition_state() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        for i in 0..5u64 {
            assert!(coach
                .on_frame(&fault(), None, t0 + ms(3000 + i * 3000))
                .is_some());
        }
        // Saturated: the key is muted.
        assert!(coach.on_frame(&fault(), None, t0 + ms(30_000)).is_none());

        coach.set_exercise(Exercise::PushUp, t0 + ms(31_000));
        let spoken = coach.on_frame(&fault(), None, t0 + ms(31_100)).unwrap();
        assert_eq!(spoken.kind, EmissionKind::Feedback);
    }

    #[test]
    fn wall_sit_idle_earns_exactly_one_hold_nudge() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::WallSit, t0);
        // Greeting stamped at t0+600; silence from then on.

        // 10s of idle is not enough; strictly past it is.
        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(10_600)).is_none());
        let nudge = coach.on_frame(&silent_ok(), None, t0 + ms(10_700)).unwrap();
        assert_eq!(nudge.kind, EmissionKind::HoldEncouragement);

        // The nudge resets the idle clock.
        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(19_000)).is_none());
        let again = coach.on_frame(&silent_ok(), None, t0 + ms(21_000)).unwrap();
        assert_eq!(again.kind, EmissionKind::HoldEncouragement);
    }

    #[test]
    fn squat_idle_earns_no_hold_nudge() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);
        assert!(coach.on_frame(&silent_ok(), None, t0 + ms(60_000)).is_none());
    }

    #[test]
    fn setup_guidance_is_never_spoken() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        let verdict = FormVerdict {
            key: None,
            text: "Please position yourself in front of the camera".to_string(),
            is_valid: false,
            diagnostics: Diagnostics::default(),
        };
        assert!(coach.on_frame(&verdict, None, t0 + ms(5000)).is_none());
    }

    #[test]
    fn unclassified_text_is_spoken_verbatim() {
        let t0 = Instant::now();
        let mut coach = greeted_coach(Exercise::Squat, t0);

        let verdict = FormVerdict {
            key: None,
            text: "Watch your form".to_string(),
            is_valid: false,
            diagnostics: Diagnostics::default(),
        };
        let spoken = coach.on_frame(&verdict, None, t0 + ms(3000)).unwrap();
        assert_eq!(spoken.text, "Watch your form");
    }
}
