//! Driver Monitoring System (DMS)
//!
//! Real-time driver activity classification from facial landmarks:
//! - Eye openness and mouth opening ratios per frame
//! - Moving-average smoothing of both signals
//! - Run-length thresholds for closed eyes and yawning
//! - Cooldown hysteresis so the status does not flap

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod state;

pub use self::analysis::{ActivityReport, FrameOutcome};
pub use self::classifier::ActivityClassifier;
pub use self::config::{ClassifierConfig, SessionConfig};
pub use self::detector::{FnDetector, LandmarkDetector};
pub use self::state::{ActivityState, ActivityStatus, Cause, ClassifierState, Reason};

use feature_engine::{FeatureError, FeatureExtractor, FrameFeatures, LandmarkSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Consecutive faceless frames before a warning is logged
pub const FACE_ABSENT_WARN_FRAMES: u32 = 30;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    #[error("Feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    #[error("Landmark detection failed: {0}")]
    Detection(String),
}

/// One driver's monitoring session: detector, feature extractor and classifier.
///
/// Frames without a face leave the classifier untouched, so its run-lengths and
/// cooldown count classified frames only.
pub struct ActivitySession<D> {
    extractor: FeatureExtractor,
    classifier: ActivityClassifier,
    detector: D,
    /// Consecutive frames where no face was found
    face_absent_frames: u32,
    /// Total frames where no face was found
    frames_without_face: u64,
}

impl<D> ActivitySession<D> {
    /// Create a new session with configuration
    pub fn new(config: SessionConfig, detector: D) -> Result<Self, DmsError> {
        Ok(Self {
            extractor: FeatureExtractor::new(config.landmarks),
            classifier: ActivityClassifier::new(config.classifier)?,
            detector,
            face_absent_frames: 0,
            frames_without_face: 0,
        })
    }

    /// Classify one frame's landmarks, or record a faceless frame
    pub fn process_landmarks(
        &mut self,
        landmarks: Option<&LandmarkSet>,
    ) -> Result<FrameOutcome, DmsError> {
        let features = landmarks
            .map(|set| self.extractor.extract(set))
            .transpose()?;
        Ok(self.process_features(features))
    }

    /// Classify features supplied directly, bypassing landmark extraction
    pub fn process_features(&mut self, features: Option<FrameFeatures>) -> FrameOutcome {
        let Some(features) = features else {
            self.face_absent_frames = self.face_absent_frames.saturating_add(1);
            self.frames_without_face += 1;
            debug!(consecutive = self.face_absent_frames, "No face detected");
            if self.face_absent_frames == FACE_ABSENT_WARN_FRAMES {
                warn!(
                    "No face for {} consecutive frames, classifier state frozen",
                    FACE_ABSENT_WARN_FRAMES
                );
            }
            return FrameOutcome::NoFace;
        };

        self.face_absent_frames = 0;
        FrameOutcome::Classified(self.classifier.classify(features))
    }

    pub fn classifier(&self) -> &ActivityClassifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Total frames processed without a face
    pub fn frames_without_face(&self) -> u64 {
        self.frames_without_face
    }

    /// Consecutive frames processed without a face
    pub fn face_absent_frames(&self) -> u32 {
        self.face_absent_frames
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.classifier.reset();
        self.face_absent_frames = 0;
        self.frames_without_face = 0;
    }
}

impl<D: LandmarkDetector> ActivitySession<D> {
    /// Detect landmarks in a frame and classify it
    pub fn process_frame(&mut self, frame: &D::Frame) -> Result<FrameOutcome, DmsError> {
        let landmarks = self.detector.detect(frame)?;
        self.process_landmarks(landmarks.as_ref())
    }
}
