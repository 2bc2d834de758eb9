//! SessionHandle: coaching session orchestration layer.
//!
//! One handle owns the broadcast channels, the running flag, and the
//! frame loop task. The loop polls the pose provider at a fixed cadence,
//! classifies form, arbitrates feedback through the coach, and fans the
//! results out to subscribers and the speech queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;

use crate::analysis::{analyze, Exercise, FormVerdict};
use crate::coach::{Coach, DetectionStatus, Emission};
use crate::config::AppConfig;
use crate::engine::providers::{PoseProvider, SignalProvider, SystemTimeSource, TimeSource};
use crate::error::{log_session_error, ErrorCode, SessionError};
use crate::managers::BroadcastChannelManager;
use crate::pose::is_fully_visible;
use crate::speech::{SpeechQueue, SpeechRequest, SpeechSynthesizer, VoiceSettings};

/// On-screen guidance while the body is only partially in frame. The
/// coach recognizes this text and never speaks it.
const SETUP_GUIDANCE: &str = "Please position yourself so your full body is visible";

/// Per-frame snapshot published on the diagnostics channel.
///
/// Display-only: overlays and debug tooling consume this, the
/// arbitration path never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDiagnostics {
    pub exercise: Exercise,
    pub status: DetectionStatus,
    pub verdict: FormVerdict,
    pub usable_keypoints: usize,
    pub timestamp_ms: u64,
}

/// SessionHandle orchestrates one coaching session at a time.
pub struct SessionHandle {
    config: AppConfig,
    pose_provider: Arc<dyn PoseProvider>,
    signal_provider: Option<Arc<dyn SignalProvider>>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    time_source: Arc<dyn TimeSource>,
    voice: VoiceSettings,
    broadcasts: BroadcastChannelManager,
    running: Arc<AtomicBool>,
    exercise: Arc<Mutex<Option<Exercise>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SessionHandle {
    pub fn new(
        config: AppConfig,
        pose_provider: Arc<dyn PoseProvider>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            pose_provider,
            signal_provider: None,
            synthesizer,
            time_source: Arc::new(SystemTimeSource::default()),
            voice: VoiceSettings::default(),
            broadcasts: BroadcastChannelManager::new(),
            running: Arc::new(AtomicBool::new(false)),
            exercise: Arc::new(Mutex::new(None)),
            worker: Mutex::new(None),
        }
    }

    pub fn with_signal_provider(mut self, provider: Arc<dyn SignalProvider>) -> Self {
        self.signal_provider = Some(provider);
        self
    }

    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn with_voice(mut self, voice: VoiceSettings) -> Self {
        self.voice = voice;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a coaching session for `exercise`.
    ///
    /// Initializes the broadcast channels and spawns the frame loop on
    /// the current tokio runtime. Exactly one session can run at a time.
    pub fn start(&self, exercise: Exercise) -> Result<(), SessionError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::AlreadyRunning);
        }

        *self.exercise.lock().map_err(|_| SessionError::LockPoisoned {
            component: "exercise".to_string(),
        })? = Some(exercise);

        let ctx = LoopContext {
            config: self.config.clone(),
            pose_provider: Arc::clone(&self.pose_provider),
            signal_provider: self.signal_provider.clone(),
            synthesizer: Arc::clone(&self.synthesizer),
            time_source: Arc::clone(&self.time_source),
            voice: self.voice,
            running: Arc::clone(&self.running),
            exercise: Arc::clone(&self.exercise),
            feedback_tx: self.broadcasts.init_feedback(),
            status_tx: self.broadcasts.init_detection_status(),
            diagnostics_tx: self.broadcasts.init_diagnostics(),
        };

        let handle = tokio::spawn(run_loop(ctx));
        *self.worker.lock().map_err(|_| SessionError::LockPoisoned {
            component: "worker".to_string(),
        })? = Some(handle);

        log::info!("[Session] Started coaching session for {}", exercise);
        Ok(())
    }

    /// Stop the running session. The frame loop observes the cleared
    /// flag and exits on its next tick; in-flight frames are discarded.
    pub fn stop(&self) -> Result<(), SessionError> {
        if self
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::NotRunning);
        }

        *self.worker.lock().map_err(|_| SessionError::LockPoisoned {
            component: "worker".to_string(),
        })? = None;
        log::info!("[Session] Stopped coaching session");
        Ok(())
    }

    /// Switch the active exercise mid-session. The loop picks the change
    /// up on its next frame and resets the coaching history.
    pub fn set_exercise(&self, exercise: Exercise) -> Result<(), SessionError> {
        if !self.is_running() {
            return Err(SessionError::NotRunning);
        }
        *self.exercise.lock().map_err(|_| SessionError::LockPoisoned {
            component: "exercise".to_string(),
        })? = Some(exercise);
        Ok(())
    }

    pub fn subscribe_feedback(&self) -> Option<broadcast::Receiver<Emission>> {
        self.broadcasts.subscribe_feedback()
    }

    pub fn subscribe_detection_status(&self) -> Option<broadcast::Receiver<DetectionStatus>> {
        self.broadcasts.subscribe_detection_status()
    }

    pub fn subscribe_diagnostics(&self) -> Option<broadcast::Receiver<FrameDiagnostics>> {
        self.broadcasts.subscribe_diagnostics()
    }

    /// Feedback subscription wrapped as a `Stream` for async consumers.
    pub fn feedback_stream(&self) -> Option<BroadcastStream<Emission>> {
        self.subscribe_feedback().map(BroadcastStream::new)
    }

    /// Detection status subscription wrapped as a `Stream`.
    pub fn detection_status_stream(&self) -> Option<BroadcastStream<DetectionStatus>> {
        self.subscribe_detection_status().map(BroadcastStream::new)
    }

    /// Diagnostics subscription wrapped as a `Stream`.
    pub fn diagnostics_stream(&self) -> Option<BroadcastStream<FrameDiagnostics>> {
        self.subscribe_diagnostics().map(BroadcastStream::new)
    }
}

/// Everything the frame loop needs, cloned out of the handle so the loop
/// owns its state outright.
struct LoopContext {
    config: AppConfig,
    pose_provider: Arc<dyn PoseProvider>,
    signal_provider: Option<Arc<dyn SignalProvider>>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    time_source: Arc<dyn TimeSource>,
    voice: VoiceSettings,
    running: Arc<AtomicBool>,
    exercise: Arc<Mutex<Option<Exercise>>>,
    feedback_tx: broadcast::Sender<Emission>,
    status_tx: broadcast::Sender<DetectionStatus>,
    diagnostics_tx: broadcast::Sender<FrameDiagnostics>,
}

fn setup_guidance() -> FormVerdict {
    FormVerdict {
        key: None,
        text: SETUP_GUIDANCE.to_string(),
        is_valid: false,
        diagnostics: Default::default(),
    }
}

fn update_status(
    current: &mut DetectionStatus,
    next: DetectionStatus,
    tx: &broadcast::Sender<DetectionStatus>,
) {
    if *current != next {
        *current = next;
        let _ = tx.send(next);
    }
}

async fn run_loop(ctx: LoopContext) {
    let started_at = ctx.time_source.now();
    let mut status = DetectionStatus::Initializing;
    let _ = ctx.status_tx.send(status);

    let initial_exercise = match ctx.exercise.lock() {
        Ok(guard) => match *guard {
            Some(exercise) => exercise,
            None => {
                log_session_error(&SessionError::NoExercise, "run_loop");
                ctx.running.store(false, Ordering::SeqCst);
                return;
            }
        },
        Err(_) => {
            log_session_error(
                &SessionError::LockPoisoned {
                    component: "exercise".to_string(),
                },
                "run_loop",
            );
            ctx.running.store(false, Ordering::SeqCst);
            return;
        }
    };

    let mut coach = Coach::new(
        initial_exercise,
        ctx.config.feedback.clone(),
        ctx.time_source.now(),
    );
    let speech = SpeechQueue::spawn(
        Arc::clone(&ctx.synthesizer),
        ctx.config.engine.speech_queue_capacity,
    );
    let mut seen_pose = false;

    loop {
        if !ctx.running.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(ctx.config.engine.frame_interval_ms)).await;
        if !ctx.running.load(Ordering::SeqCst) {
            break;
        }

        if ctx.pose_provider.is_loading() {
            update_status(&mut status, DetectionStatus::Initializing, &ctx.status_tx);
            continue;
        }

        let detected = match ctx.pose_provider.detect().await {
            Ok(pose) => pose,
            Err(err) => {
                log_session_error(&err, "detect");
                continue;
            }
        };
        // The session may have stopped while detection was in flight;
        // a stale frame must not produce feedback.
        if !ctx.running.load(Ordering::SeqCst) {
            break;
        }

        let exercise = match ctx.exercise.lock() {
            Ok(guard) => guard.unwrap_or_else(|| coach.exercise()),
            Err(_) => {
                log_session_error(
                    &SessionError::LockPoisoned {
                        component: "exercise".to_string(),
                    },
                    "run_loop",
                );
                break;
            }
        };
        let now = ctx.time_source.now();
        coach.set_exercise(exercise, now);

        let usable = detected.as_ref().map(|p| p.usable_count()).unwrap_or(0);
        let pose = detected.filter(|_| usable >= ctx.config.engine.min_visible_keypoints);

        let (next_status, verdict) = match &pose {
            None => {
                let next = if seen_pose {
                    DetectionStatus::NoPose
                } else {
                    DetectionStatus::Detecting
                };
                (next, FormVerdict::absent())
            }
            Some(p) => {
                seen_pose = true;
                if is_fully_visible(p, exercise) {
                    (DetectionStatus::FullBody, analyze(exercise, p, &ctx.config))
                } else {
                    (DetectionStatus::Detected, setup_guidance())
                }
            }
        };
        update_status(&mut status, next_status, &ctx.status_tx);

        let signal = ctx.signal_provider.as_ref().and_then(|p| p.current());

        if let Some(emission) = coach.on_frame(&verdict, signal.as_ref(), now) {
            let settings = match &signal {
                Some(s) => ctx.voice.adapted_to(s),
                None => ctx.voice,
            };
            let request = SpeechRequest {
                text: emission.text.clone(),
                settings,
            };
            if let Err(err) = speech.enqueue(request) {
                log::warn!(
                    "[Session] Dropping utterance: code={}, message={}",
                    err.code(),
                    err.message()
                );
            }
            let _ = ctx.feedback_tx.send(emission);
        }

        let timestamp_ms = now.saturating_duration_since(started_at).as_millis() as u64;
        let _ = ctx.diagnostics_tx.send(FrameDiagnostics {
            exercise,
            status,
            verdict,
            usable_keypoints: usable,
            timestamp_ms,
        });
    }

    speech.shutdown();
    tracing::debug!("[Session] Frame loop exiting");
}
