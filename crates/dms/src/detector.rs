//! Facial landmark detection seam
//!
//! The landmark model itself lives outside this crate. Anything that maps a
//! frame to an optional [`LandmarkSet`] can drive a session.

use std::marker::PhantomData;

use feature_engine::LandmarkSet;

use crate::DmsError;

/// External facial landmark detector
pub trait LandmarkDetector {
    /// Frame type the detector consumes
    type Frame;

    /// Landmarks of the first face in `frame`, or `None` when no face is found
    fn detect(&mut self, frame: &Self::Frame) -> Result<Option<LandmarkSet>, DmsError>;
}

/// Adapts an infallible closure into a [`LandmarkDetector`]
pub struct FnDetector<F, T> {
    detect: F,
    _frame: PhantomData<fn(&T)>,
}

impl<F, T> FnDetector<F, T>
where
    F: FnMut(&T) -> Option<LandmarkSet>,
{
    pub fn new(detect: F) -> Self {
        Self {
            detect,
            _frame: PhantomData,
        }
    }
}

impl<F, T> LandmarkDetector for FnDetector<F, T>
where
    F: FnMut(&T) -> Option<LandmarkSet>,
{
    type Frame = T;

    fn detect(&mut self, frame: &T) -> Result<Option<LandmarkSet>, DmsError> {
        Ok((self.detect)(frame))
    }
}
