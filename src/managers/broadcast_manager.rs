// BroadcastChannelManager: Centralized tokio broadcast channel management
// Single Responsibility: Broadcast channel lifecycle and subscription

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::coach::{DetectionStatus, Emission};
use crate::engine::FrameDiagnostics;

/// Manages all tokio broadcast channels
///
/// Centralizes broadcast channel creation, storage, and subscription so
/// the session loop publishes through one place and any number of
/// consumers (UI, CLI, tests) can subscribe independently.
///
/// # Channel Types
/// - Feedback: Spoken coaching emissions from the arbitration loop
/// - Detection status: Pose-detection lifecycle transitions
/// - Diagnostics: Per-frame angles and verdicts for display overlays
pub struct BroadcastChannelManager {
    feedback: Arc<Mutex<Option<broadcast::Sender<Emission>>>>,
    detection_status: Arc<Mutex<Option<broadcast::Sender<DetectionStatus>>>>,
    diagnostics: Arc<Mutex<Option<broadcast::Sender<FrameDiagnostics>>>>,
}

impl BroadcastChannelManager {
    /// Create a new BroadcastChannelManager with all channels uninitialized
    ///
    /// Channels must be explicitly initialized via init_* methods before use.
    pub fn new() -> Self {
        Self {
            feedback: Arc::new(Mutex::new(None)),
            detection_status: Arc::new(Mutex::new(None)),
            diagnostics: Arc::new(Mutex::new(None)),
        }
    }

    /// Initialize the feedback broadcast channel
    ///
    /// Returns the sender for the session loop to publish emissions.
    /// Buffer of 32 messages; feedback is cadence-gated, so even a slow
    /// subscriber has seconds of margin before lagging.
    pub fn init_feedback(&self) -> broadcast::Sender<Emission> {
        let (tx, _) = broadcast::channel(32);
        *self.feedback.lock().unwrap() = Some(tx.clone());
        tx
    }

    /// Subscribe to spoken feedback emissions
    ///
    /// Returns None if init_feedback() has not been called yet. Each
    /// subscriber gets an independent receiver.
    pub fn subscribe_feedback(&self) -> Option<broadcast::Receiver<Emission>> {
        self.feedback.lock().unwrap().as_ref().map(|tx| tx.subscribe())
    }

    /// Initialize the detection status broadcast channel
    ///
    /// Buffer of 16 messages; status only changes on transitions.
    pub fn init_detection_status(&self) -> broadcast::Sender<DetectionStatus> {
        let (tx, _) = broadcast::channel(16);
        *self.detection_status.lock().unwrap() = Some(tx.clone());
        tx
    }

    /// Subscribe to detection status transitions
    pub fn subscribe_detection_status(&self) -> Option<broadcast::Receiver<DetectionStatus>> {
        self.detection_status
            .lock()
            .unwrap()
            .as_ref()
            .map(|tx| tx.subscribe())
    }

    /// Initialize the per-frame diagnostics broadcast channel
    ///
    /// Buffer of 100 messages to absorb bursts at the full frame rate.
    /// Display-only; never part of the arbitration path.
    pub fn init_diagnostics(&self) -> broadcast::Sender<FrameDiagnostics> {
        let (tx, _) = broadcast::channel(100);
        *self.diagnostics.lock().unwrap() = Some(tx.clone());
        tx
    }

    /// Subscribe to per-frame diagnostics
    pub fn subscribe_diagnostics(&self) -> Option<broadcast::Receiver<FrameDiagnostics>> {
        self.diagnostics
            .lock()
            .unwrap()
            .as_ref()
            .map(|tx| tx.subscribe())
    }
}

impl Default for BroadcastChannelManager {
    fn default() -> Self {
        Self::new()
    }
}
