//! Per-frame feature extraction

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{eye_ratio, mouth_ratio};
use crate::landmarks::{EyeIndices, LandmarkScheme, LandmarkSet};
use crate::FeatureError;

/// Openness features for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameFeatures {
    /// Eye aspect ratio, mean of both eyes (low = closed)
    pub ear: f64,
    /// Mouth opening ratio (high = open)
    pub mouth_open: f64,
}

/// Extracts [`FrameFeatures`] from landmark sets using a fixed index scheme
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    scheme: LandmarkScheme,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(scheme: LandmarkScheme) -> Self {
        Self { scheme }
    }

    /// Landmark scheme in use
    pub fn scheme(&self) -> &LandmarkScheme {
        &self.scheme
    }

    /// Compute EAR and mouth ratio for one frame.
    ///
    /// Fails only when the landmark set is too short for the scheme.
    /// Degenerate geometry yields 0 ratios rather than an error.
    pub fn extract(&self, landmarks: &LandmarkSet) -> Result<FrameFeatures, FeatureError> {
        let left = self.eye(landmarks, &self.scheme.left_eye)?;
        let right = self.eye(landmarks, &self.scheme.right_eye)?;
        let ear = (left + right) / 2.0;

        let m = &self.scheme.mouth;
        let mouth_open = mouth_ratio(
            landmarks.point(m.left_corner)?,
            landmarks.point(m.right_corner)?,
            landmarks.point(m.upper_inner)?,
            landmarks.point(m.lower_inner)?,
        );

        trace!(left, right, ear, mouth_open, "Extracted frame features");
        Ok(FrameFeatures { ear, mouth_open })
    }

    fn eye(&self, landmarks: &LandmarkSet, eye: &EyeIndices) -> Result<f64, FeatureError> {
        Ok(eye_ratio(
            landmarks.point(eye.outer)?,
            landmarks.point(eye.inner)?,
            landmarks.point(eye.upper)?,
            landmarks.point(eye.lower)?,
        ))
    }
}
