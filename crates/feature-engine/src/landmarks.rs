//! Landmark sets and index schemes

use serde::{Deserialize, Serialize};

use crate::FeatureError;

/// 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// One frame's ordered facial landmarks, as produced by the landmark model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Point2>,
}

impl LandmarkSet {
    /// Wrap pixel-space points
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Build from normalized `[0, 1]` coordinates, scaled to a `width` x `height` frame.
    ///
    /// Coordinates are truncated to whole pixels, matching the detector's pixel convention.
    pub fn from_normalized(points: &[(f32, f32)], width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            points: points
                .iter()
                .map(|&(x, y)| Point2::new((x * w).trunc(), (y * h).trunc()))
                .collect(),
        }
    }

    /// Number of landmarks
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All landmarks in model order
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Landmark at `index`
    pub fn point(&self, index: usize) -> Result<Point2, FeatureError> {
        self.points
            .get(index)
            .copied()
            .ok_or(FeatureError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }
}

/// Landmark indices describing one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeIndices {
    pub outer: usize,
    pub inner: usize,
    pub upper: usize,
    pub lower: usize,
}

impl EyeIndices {
    pub fn as_array(&self) -> [usize; 4] {
        [self.outer, self.inner, self.upper, self.lower]
    }
}

/// Landmark indices describing the mouth (outer corners, inner lips)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouthIndices {
    pub left_corner: usize,
    pub right_corner: usize,
    pub upper_inner: usize,
    pub lower_inner: usize,
}

impl MouthIndices {
    pub fn as_array(&self) -> [usize; 4] {
        [self.left_corner, self.right_corner, self.upper_inner, self.lower_inner]
    }
}

/// Named landmark indices for one landmark model's numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkScheme {
    pub left_eye: EyeIndices,
    pub right_eye: EyeIndices,
    pub mouth: MouthIndices,
}

impl LandmarkScheme {
    /// Number of points produced by the 468-point face mesh model
    pub const FACE_MESH_POINTS: usize = 468;

    /// Indices for the 468-point face mesh
    pub fn face_mesh() -> Self {
        Self {
            left_eye: EyeIndices {
                outer: 33,
                inner: 133,
                upper: 159,
                lower: 145,
            },
            right_eye: EyeIndices {
                outer: 362,
                inner: 263,
                upper: 386,
                lower: 374,
            },
            mouth: MouthIndices {
                left_corner: 78,
                right_corner: 308,
                upper_inner: 13,
                lower_inner: 14,
            },
        }
    }

    /// Highest index referenced by the scheme
    pub fn max_index(&self) -> usize {
        self.left_eye_points()
            .into_iter()
            .chain(self.right_eye_points())
            .chain(self.mouth_points())
            .max()
            .unwrap_or(0)
    }

    /// Whether every index fits a set of `len` landmarks
    pub fn fits(&self, len: usize) -> bool {
        self.max_index() < len
    }

    /// Left eye indices, for highlighting tracked points
    pub fn left_eye_points(&self) -> [usize; 4] {
        self.left_eye.as_array()
    }

    /// Right eye indices
    pub fn right_eye_points(&self) -> [usize; 4] {
        self.right_eye.as_array()
    }

    /// Mouth indices
    pub fn mouth_points(&self) -> [usize; 4] {
        self.mouth.as_array()
    }
}

impl Default for LandmarkScheme {
    fn default() -> Self {
        Self::face_mesh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_normalized_truncates() {
        let set = LandmarkSet::from_normalized(&[(0.5, 0.25), (0.999, 0.001)], 640, 480);
        assert_eq!(set.len(), 2);
        assert_eq!(set.points()[0], Point2::new(320.0, 120.0));
        assert_eq!(set.points()[1], Point2::new(639.0, 0.0));
    }

    #[test]
    fn test_point_out_of_range() {
        let set = LandmarkSet::new(vec![Point2::default(); 3]);
        assert!(set.point(2).is_ok());
        assert_eq!(
            set.point(3).unwrap_err(),
            FeatureError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_face_mesh_scheme() {
        let scheme = LandmarkScheme::default();
        assert_eq!(scheme.max_index(), 386);
        assert!(scheme.fits(LandmarkScheme::FACE_MESH_POINTS));
        assert!(!scheme.fits(300));
        assert_eq!(scheme.mouth_points(), [78, 308, 13, 14]);
    }
}
