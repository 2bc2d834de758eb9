// Speech queue and synthesizer seam
//
// Utterances are serialized through an owned single-consumer queue: one
// worker task, one utterance playing at a time. The frame loop never
// waits on playback; a full queue drops the utterance with a warning.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ErrorCode, SpeechError};

mod voice;

pub use voice::{VoiceGender, VoicePersonality, VoiceSettings};

/// One utterance handed to the synthesizer backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub settings: VoiceSettings,
}

/// Synthesis backend seam. `speak` blocks until playback finishes; the
/// queue worker calls it off the async runtime.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError>;
}

/// Synthesizer that only logs. Used by the CLI and as a test stand-in.
#[derive(Debug, Default)]
pub struct LoggingSynthesizer;

impl SpeechSynthesizer for LoggingSynthesizer {
    fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError> {
        log::info!(
            "[Speech] \"{}\" (rate {:.2}, pitch {:.2}, stability {:.2})",
            request.text,
            request.settings.rate,
            request.settings.pitch,
            request.settings.stability
        );
        Ok(())
    }
}

/// Owned single-consumer speech queue.
///
/// Constructed once per session. Dropping the queue closes the channel
/// and lets the worker drain and exit.
pub struct SpeechQueue {
    tx: mpsc::Sender<SpeechRequest>,
    worker: JoinHandle<()>,
}

impl SpeechQueue {
    /// Spawn the playback worker on the current tokio runtime.
    pub fn spawn(synthesizer: Arc<dyn SpeechSynthesizer>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<SpeechRequest>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let synth = Arc::clone(&synthesizer);
                let outcome =
                    tokio::task::spawn_blocking(move || synth.speak(&request)).await;
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log::warn!(
                            "[Speech] Utterance failed: code={}, message={}",
                            err.code(),
                            err.message()
                        );
                    }
                    Err(join_err) => {
                        log::error!("[Speech] Playback task panicked: {}", join_err);
                    }
                }
            }
            tracing::debug!("[Speech] Queue worker exiting");
        });

        Self { tx, worker }
    }

    /// Fire-and-forget enqueue. The caller never blocks on playback.
    pub fn enqueue(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        self.tx.try_send(request).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SpeechError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SpeechError::QueueClosed,
        })
    }

    /// Abort the worker without draining. Stop path only.
    pub fn shutdown(self) {
        drop(self.tx);
        self.worker.abort();
    }
}
