//! DMS analysis results for display

use serde::Serialize;

use crate::state::{ActivityState, ActivityStatus};

/// Everything a renderer needs for one classified frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityReport {
    /// Raw eye aspect ratio for this frame
    pub ear: f64,

    /// Raw mouth opening ratio for this frame
    pub mouth_open: f64,

    /// Moving average the decision was made on
    pub smoothed_ear: f64,
    pub smoothed_mouth: f64,

    /// Thresholds in effect, for on-screen reference
    pub ear_threshold: f64,
    pub mouth_threshold: f64,

    /// Emitted status and reason
    #[serde(flatten)]
    pub state: ActivityState,
}

impl ActivityReport {
    pub fn status(&self) -> ActivityStatus {
        self.state.status
    }
}

/// Result of processing one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No face found; the classifier was not invoked
    NoFace,

    /// Face found and classified
    Classified(ActivityReport),
}

impl FrameOutcome {
    pub fn face_detected(&self) -> bool {
        matches!(self, Self::Classified(_))
    }

    pub fn report(&self) -> Option<&ActivityReport> {
        match self {
            Self::Classified(report) => Some(report),
            Self::NoFace => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Cause;

    #[test]
    fn test_report_json_shape() {
        let report = ActivityReport {
            ear: 0.3,
            mouth_open: 0.1,
            smoothed_ear: 0.3,
            smoothed_mouth: 0.1,
            ear_threshold: 0.22,
            mouth_threshold: 0.35,
            state: ActivityState::direct(Cause::Yawning),
        };

        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["status"], "Inactive");
        assert_eq!(value["reason"], "Yawning");
        assert_eq!(value["ear_threshold"], 0.22);
    }

    #[test]
    fn test_no_face_outcome() {
        let outcome = FrameOutcome::NoFace;
        assert!(!outcome.face_detected());
        assert!(outcome.report().is_none());
    }
}
