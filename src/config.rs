//! Runtime configuration for cadence and analyzer thresholds
//!
//! Threshold values encode hand-tuned judgment about what counts as a
//! form fault; they are loaded from JSON so they can be retuned without
//! recompiling. Defaults are the shipping values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feedback: FeedbackConfig,
    pub engine: EngineConfig,
    pub squat: SquatConfig,
    pub push_up: PushUpConfig,
    pub wall_sit: WallSitConfig,
    pub deadlift: DeadliftConfig,
}

/// Cadence and history parameters for the arbitration loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Base minimum gap between spoken feedback emissions
    pub base_interval_ms: u64,
    /// Idle threshold for static-hold encouragement (wall sit)
    pub hold_idle_ms: u64,
    /// Delay before the one-shot greeting after activation
    pub greeting_delay_ms: u64,
    /// Bounded feedback-key history length
    pub history_capacity: usize,
    /// How many recent history entries the variant engine inspects
    pub recent_window: usize,
    /// Repeat count at which a key is suppressed entirely
    pub repeat_suppression: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 2000,
            hold_idle_ms: 10_000,
            greeting_delay_ms: 500,
            history_capacity: 10,
            recent_window: 5,
            repeat_suppression: 5,
        }
    }
}

/// Frame loop and detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Target gap between frames driven by the session loop
    pub frame_interval_ms: u64,
    /// Minimum usable keypoints before a frame counts as a detected pose
    pub min_visible_keypoints: usize,
    /// Pending-utterance capacity of the speech queue
    pub speech_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
            min_visible_keypoints: 3,
            speech_queue_capacity: 8,
        }
    }
}

/// Squat cascade thresholds, all in degrees unless noted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquatConfig {
    /// Combined fault: torso leaning (hip angle below) with knees straight
    pub bent_over_hip_below: f32,
    pub bent_over_knee_above: f32,
    /// Severe back rounding, checked on the shoulder-hip-knee angle
    pub back_rounding_hip_below: f32,
    /// Bowing: lean from vertical with straight-ish knees, two variants
    pub bow_lean_above: f32,
    pub bow_knee_above: f32,
    pub bow_slight_lean_above: f32,
    pub bow_straight_knee_above: f32,
    /// Bent nearly horizontal while actually squatting
    pub upright_lean_above: f32,
    pub upright_knee_below: f32,
    /// Good-morning pattern: lean or hip drop with straight knees
    pub good_morning_lean_above: f32,
    pub good_morning_knee_above: f32,
    /// Hip drop below the shoulder, in pixels
    pub good_morning_hip_drop_px: f32,
    pub good_morning_slight_lean_above: f32,
    pub good_morning_straight_knee_above: f32,
    /// Depth bands on the knee angle
    pub no_bend_knee_above: f32,
    pub great_depth_knee_below: f32,
    pub good_depth_knee_below: f32,
    pub encourage_knee_below: f32,
    /// Horizontal knee-ankle offset over hip-knee length
    pub knee_alignment_ratio_above: f32,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            bent_over_hip_below: 145.0,
            bent_over_knee_above: 150.0,
            back_rounding_hip_below: 130.0,
            bow_lean_above: 30.0,
            bow_knee_above: 155.0,
            bow_slight_lean_above: 25.0,
            bow_straight_knee_above: 165.0,
            upright_lean_above: 60.0,
            upright_knee_below: 170.0,
            good_morning_lean_above: 30.0,
            good_morning_knee_above: 150.0,
            good_morning_hip_drop_px: 25.0,
            good_morning_slight_lean_above: 25.0,
            good_morning_straight_knee_above: 160.0,
            no_bend_knee_above: 175.0,
            great_depth_knee_below: 70.0,
            good_depth_knee_below: 100.0,
            encourage_knee_below: 140.0,
            knee_alignment_ratio_above: 0.6,
        }
    }
}

/// Push-up cascade thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushUpConfig {
    /// Depth bands on the elbow angle
    pub too_shallow_elbow_above: f32,
    pub excellent_depth_elbow_below: f32,
    pub good_depth_elbow_below: f32,
    pub deeper_elbow_below: f32,
    /// Shoulder-hip-ankle straightness
    pub body_line_below: f32,
    /// Wrist trailing the shoulder horizontally, in pixels
    pub hand_offset_px: f32,
    /// Horizontal over vertical shoulder-elbow offset
    pub elbow_flare_ratio_above: f32,
}

impl Default for PushUpConfig {
    fn default() -> Self {
        Self {
            too_shallow_elbow_above: 170.0,
            excellent_depth_elbow_below: 80.0,
            good_depth_elbow_below: 100.0,
            deeper_elbow_below: 140.0,
            body_line_below: 160.0,
            hand_offset_px: 50.0,
            elbow_flare_ratio_above: 1.5,
        }
    }
}

/// Wall-sit cascade thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSitConfig {
    pub knee_too_bent_below: f32,
    pub knee_too_straight_above: f32,
    pub perfect_knee_low: f32,
    pub perfect_knee_high: f32,
    /// Back flagged only when extremely off the wall
    pub back_upright_below: f32,
    /// hip.y minus knee.y, pixels; negative means hips above knees
    pub hips_too_high_below_px: f32,
    pub hips_too_low_above_px: f32,
}

impl Default for WallSitConfig {
    fn default() -> Self {
        Self {
            knee_too_bent_below: 75.0,
            knee_too_straight_above: 105.0,
            perfect_knee_low: 85.0,
            perfect_knee_high: 95.0,
            back_upright_below: 120.0,
            hips_too_high_below_px: -20.0,
            hips_too_low_above_px: 50.0,
        }
    }
}

/// Romanian deadlift cascade thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadliftConfig {
    pub knee_too_bent_below: f32,
    pub knee_too_straight_above: f32,
    pub good_knee_low: f32,
    pub good_knee_high: f32,
    pub back_rounding_below: f32,
    pub back_neutral_above: f32,
    pub hinge_upright_above: f32,
    pub hinge_deep_below: f32,
    pub good_hinge_low: f32,
    pub good_hinge_high: f32,
    /// Shoulder drifting ahead of the hip, in pixels
    pub shoulder_forward_px: f32,
}

impl Default for DeadliftConfig {
    fn default() -> Self {
        Self {
            knee_too_bent_below: 140.0,
            knee_too_straight_above: 175.0,
            good_knee_low: 150.0,
            good_knee_high: 170.0,
            back_rounding_below: 150.0,
            back_neutral_above: 165.0,
            hinge_upright_above: 175.0,
            hinge_deep_below: 120.0,
            good_hinge_low: 140.0,
            good_hinge_high: 170.0,
            shoulder_forward_px: 30.0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feedback: FeedbackConfig::default(),
            engine: EngineConfig::default(),
            squat: SquatConfig::default(),
            push_up: PushUpConfig::default(),
            wall_sit: WallSitConfig::default(),
            deadlift: DeadliftConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults if
    /// the file is missing or malformed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::load_from_file("assets/coach_config.json")
    }
}
