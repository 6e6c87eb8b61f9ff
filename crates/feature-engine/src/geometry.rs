//! Openness ratios from landmark geometry
//!
//! Both distances of a ratio are in the same pixel units, so the ratios are
//! invariant to face scale.

use crate::landmarks::Point2;

/// Widths at or below this are treated as degenerate and yield a 0 ratio
pub const MIN_WIDTH: f64 = 1e-6;

/// Euclidean distance in pixel space
pub fn distance(p: Point2, q: Point2) -> f64 {
    let dx = f64::from(p.x) - f64::from(q.x);
    let dy = f64::from(p.y) - f64::from(q.y);
    dx.hypot(dy)
}

fn ratio(vertical: f64, width: f64) -> f64 {
    if width > MIN_WIDTH {
        vertical / width
    } else {
        0.0
    }
}

/// Vertical eyelid gap over eye width
pub fn eye_ratio(outer: Point2, inner: Point2, upper: Point2, lower: Point2) -> f64 {
    ratio(distance(upper, lower), distance(outer, inner))
}

/// Vertical inner-lip gap over mouth width
pub fn mouth_ratio(
    left_corner: Point2,
    right_corner: Point2,
    upper_inner: Point2,
    lower_inner: Point2,
) -> f64 {
    ratio(distance(upper_inner, lower_inner), distance(left_corner, right_corner))
}
