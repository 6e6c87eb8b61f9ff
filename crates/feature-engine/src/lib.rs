//! Facial Feature Engine
//!
//! Turns one frame's facial landmarks into scalar openness features:
//! - Eye aspect ratio (EAR), averaged over both eyes
//! - Mouth opening ratio
//!
//! Pure functions of their input; no state is kept between frames.

mod features;
mod geometry;
mod landmarks;

pub use features::{FeatureExtractor, FrameFeatures};
pub use geometry::{distance, eye_ratio, mouth_ratio, MIN_WIDTH};
pub use landmarks::{EyeIndices, LandmarkScheme, LandmarkSet, MouthIndices, Point2};

use thiserror::Error;

/// Feature extraction error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Landmark index {index} out of range for a set of {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}
