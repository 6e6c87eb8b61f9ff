//! Smoothing, run-length and cooldown state machine

use feature_engine::FrameFeatures;
use tracing::{debug, info};

use crate::analysis::ActivityReport;
use crate::state::{ActivityState, ActivityStatus, Cause, ClassifierState};
use crate::{ClassifierConfig, DmsError};

/// Turns the per-frame `(ear, mouth_open)` stream into a stable activity status.
///
/// Inactive is sticky: once entered it is held for `cooldown_frames` further
/// Active-qualifying frames so that signals hovering near a threshold do not flap.
/// One instance per session; calls must arrive in frame order.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    config: ClassifierConfig,
    state: ClassifierState,
}

impl ActivityClassifier {
    /// Create a classifier with a validated configuration
    pub fn new(config: ClassifierConfig) -> Result<Self, DmsError> {
        config.validate()?;
        info!(?config, "Creating activity classifier");
        Ok(Self {
            state: ClassifierState::new(config.smoothing_window),
            config,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn last_status(&self) -> ActivityStatus {
        self.state.last_status
    }

    /// Consume one frame's raw features
    pub fn update(&mut self, ear: f64, mouth_open: f64) -> ActivityState {
        let cfg = &self.config;
        let s = &mut self.state;

        s.ear_history.push(ear);
        s.mouth_history.push(mouth_open);
        let ear_smooth = s.ear_history.mean();
        let mouth_smooth = s.mouth_history.mean();

        s.closed_eyes_run = if ear_smooth < cfg.ear_sleep_threshold {
            s.closed_eyes_run.saturating_add(1)
        } else {
            0
        };
        s.yawn_run = if mouth_smooth > cfg.mouth_open_threshold {
            s.yawn_run.saturating_add(1)
        } else {
            0
        };

        // Eyes closed wins when both runs qualify
        let cause = if s.closed_eyes_run >= cfg.ear_frames_sleep {
            Cause::EyesClosed
        } else if s.yawn_run >= cfg.mouth_frames_yawn {
            Cause::Yawning
        } else {
            Cause::EyesOpen
        };

        let emitted = match cause.status() {
            ActivityStatus::Inactive => {
                s.cooldown_remaining = cfg.cooldown_frames;
                ActivityState::direct(cause)
            }
            ActivityStatus::Active if s.cooldown_remaining > 0 => {
                s.cooldown_remaining -= 1;
                ActivityState::cooldown(cause)
            }
            ActivityStatus::Active => ActivityState::direct(cause),
        };

        debug!(
            ear_smooth,
            mouth_smooth,
            closed_eyes_run = s.closed_eyes_run,
            yawn_run = s.yawn_run,
            cooldown_remaining = s.cooldown_remaining,
            "Classifier updated"
        );

        if emitted.status != s.last_status {
            info!(
                from = %s.last_status,
                to = %emitted.status,
                reason = %emitted.reason,
                "Driver activity changed"
            );
        }
        s.last_status = emitted.status;

        emitted
    }

    /// Classify one frame's features and package the result for display
    pub fn classify(&mut self, features: FrameFeatures) -> ActivityReport {
        let state = self.update(features.ear, features.mouth_open);
        ActivityReport {
            ear: features.ear,
            mouth_open: features.mouth_open,
            smoothed_ear: self.state.smoothed_ear(),
            smoothed_mouth: self.state.smoothed_mouth(),
            ear_threshold: self.config.ear_sleep_threshold,
            mouth_threshold: self.config.mouth_open_threshold,
            state,
        }
    }

    /// Reset driver state (on driver change)
    pub fn reset(&mut self) {
        info!("Resetting activity classifier state");
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Reason;
    use proptest::prelude::*;

    const OPEN_EAR: f64 = 0.40;
    const CLOSED_EAR: f64 = 0.10;

    fn classifier() -> ActivityClassifier {
        ActivityClassifier::new(ClassifierConfig::default()).unwrap()
    }

    fn feed(c: &mut ActivityClassifier, ear: f64, mouth: f64, n: usize) -> Vec<ActivityState> {
        (0..n).map(|_| c.update(ear, mouth)).collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClassifierConfig {
            smoothing_window: 0,
            ..Default::default()
        };
        assert!(ActivityClassifier::new(config).is_err());
    }

    #[test]
    fn test_eyes_closed_at_exact_run_length() {
        let mut c = classifier();
        let out = feed(&mut c, CLOSED_EAR, 0.0, 20);

        for (i, state) in out.iter().enumerate().take(14) {
            assert_eq!(*state, ActivityState::direct(Cause::EyesOpen), "frame {}", i + 1);
        }
        for state in &out[14..] {
            assert_eq!(state.status, ActivityStatus::Inactive);
            assert_eq!(state.reason.to_string(), "Eyes closed");
        }
        assert_eq!(c.state().closed_eyes_run(), 20);
        assert_eq!(c.state().ear_history().len(), 5);
    }

    #[test]
    fn test_short_closure_never_fires() {
        let config = ClassifierConfig {
            smoothing_window: 1,
            ..Default::default()
        };
        let mut c = ActivityClassifier::new(config).unwrap();

        let mut out = feed(&mut c, CLOSED_EAR, 0.0, 14);
        out.extend(feed(&mut c, OPEN_EAR, 0.0, 1));
        out.extend(feed(&mut c, CLOSED_EAR, 0.0, 14));

        assert!(out.iter().all(|s| s.is_active()));
        assert_eq!(c.state().closed_eyes_run(), 14);
    }

    #[test]
    fn test_yawning() {
        let mut c = classifier();
        let out = feed(&mut c, OPEN_EAR, 0.6, 15);

        assert!(out[..14].iter().all(|s| s.is_active()));
        assert_eq!(out[14], ActivityState::direct(Cause::Yawning));
    }

    #[test]
    fn test_eyes_closed_wins_tie() {
        let mut c = classifier();
        let out = feed(&mut c, CLOSED_EAR, 0.6, 16);

        assert_eq!(c.state().closed_eyes_run(), 16);
        assert_eq!(c.state().yawn_run(), 16);
        assert_eq!(out[14].reason, Reason::Direct(Cause::EyesClosed));
        assert_eq!(out[15].reason, Reason::Direct(Cause::EyesClosed));
    }

    #[test]
    fn test_cooldown_holds_inactive() {
        let config = ClassifierConfig {
            smoothing_window: 1,
            ..Default::default()
        };
        let mut c = ActivityClassifier::new(config).unwrap();

        let out = feed(&mut c, CLOSED_EAR, 0.0, 15);
        assert_eq!(out[14], ActivityState::direct(Cause::EyesClosed));
        assert_eq!(c.state().cooldown_remaining(), 30);

        let recovery = feed(&mut c, OPEN_EAR, 0.0, 31);
        for state in &recovery[..30] {
            assert_eq!(state.status, ActivityStatus::Inactive);
            assert_eq!(state.reason.to_string(), "Cooldown (Eyes open)");
        }
        assert_eq!(recovery[30], ActivityState::direct(Cause::EyesOpen));
        assert_eq!(c.state().cooldown_remaining(), 0);
    }

    #[test]
    fn test_inactive_refreshes_cooldown() {
        let config = ClassifierConfig {
            smoothing_window: 1,
            ear_frames_sleep: 1,
            cooldown_frames: 3,
            ..Default::default()
        };
        let mut c = ActivityClassifier::new(config).unwrap();

        c.update(CLOSED_EAR, 0.0);
        feed(&mut c, OPEN_EAR, 0.0, 2);
        assert_eq!(c.state().cooldown_remaining(), 1);

        // Re-trigger refills the full cooldown
        assert_eq!(c.update(CLOSED_EAR, 0.0), ActivityState::direct(Cause::EyesClosed));
        assert_eq!(c.state().cooldown_remaining(), 3);

        let out = feed(&mut c, OPEN_EAR, 0.0, 4);
        assert!(out[..3].iter().all(|s| s.reason.is_cooldown()));
        assert!(out[3].is_active());
    }

    #[test]
    fn test_zero_cooldown_releases_immediately() {
        let config = ClassifierConfig {
            smoothing_window: 1,
            ear_frames_sleep: 2,
            cooldown_frames: 0,
            ..Default::default()
        };
        let mut c = ActivityClassifier::new(config).unwrap();

        let out = feed(&mut c, CLOSED_EAR, 0.0, 2);
        assert!(!out[1].is_active());
        assert!(c.update(OPEN_EAR, 0.0).is_active());
    }

    #[test]
    fn test_smoothing_delays_run() {
        // Two closed frames after three open ones: mean stays above threshold
        let mut c = classifier();
        feed(&mut c, OPEN_EAR, 0.0, 3);
        feed(&mut c, CLOSED_EAR, 0.0, 2);
        // (0.4 * 3 + 0.1 * 2) / 5 = 0.28
        assert!((c.state().smoothed_ear() - 0.28).abs() < 1e-9);
        assert_eq!(c.state().closed_eyes_run(), 0);
    }

    #[test]
    fn test_last_status_tracks_emitted() {
        let mut c = classifier();
        assert_eq!(c.last_status(), ActivityStatus::Active);
        feed(&mut c, CLOSED_EAR, 0.0, 15);
        assert_eq!(c.last_status(), ActivityStatus::Inactive);
        feed(&mut c, OPEN_EAR, 0.0, 10);
        // Still in cooldown
        assert_eq!(c.last_status(), ActivityStatus::Inactive);
    }

    #[test]
    fn test_classify_report() {
        let mut c = classifier();
        let report = c.classify(FrameFeatures {
            ear: 0.3,
            mouth_open: 0.1,
        });

        assert_eq!(report.ear, 0.3);
        assert_eq!(report.mouth_open, 0.1);
        assert!((report.smoothed_ear - 0.3).abs() < 1e-12);
        assert_eq!(report.ear_threshold, 0.22);
        assert_eq!(report.mouth_threshold, 0.35);
        assert_eq!(report.state, ActivityState::direct(Cause::EyesOpen));
    }

    #[test]
    fn test_reset() {
        let mut c = classifier();
        feed(&mut c, CLOSED_EAR, 0.0, 15);
        c.reset();

        assert_eq!(c.state().closed_eyes_run(), 0);
        assert_eq!(c.state().cooldown_remaining(), 0);
        assert!(c.state().ear_history().is_empty());
        assert!(c.update(OPEN_EAR, 0.0).is_active());
    }

    proptest! {
        #[test]
        fn test_replay_is_deterministic(
            frames in prop::collection::vec((0.0f64..0.5, 0.0f64..0.8), 0..200)
        ) {
            let mut a = classifier();
            let mut b = classifier();
            let first: Vec<_> = frames.iter().map(|&(e, m)| a.update(e, m)).collect();
            let second: Vec<_> = frames.iter().map(|&(e, m)| b.update(e, m)).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_state_invariants(
            frames in prop::collection::vec((0.0f64..0.5, 0.0f64..0.8), 0..200)
        ) {
            let mut c = classifier();
            for &(e, m) in &frames {
                let state = c.update(e, m);
                prop_assert!(c.state().ear_history().len() <= 5);
                prop_assert!(c.state().mouth_history().len() <= 5);
                prop_assert!(c.state().cooldown_remaining() <= 30);
                prop_assert_eq!(c.last_status(), state.status);
                // Only the eyes-open cause can be held by cooldown
                if state.reason.is_cooldown() {
                    prop_assert_eq!(state.reason.cause(), Cause::EyesOpen);
                }
            }
        }
    }
}
