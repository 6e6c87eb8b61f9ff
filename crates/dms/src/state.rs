//! Driver activity state tracking

use std::fmt;

use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize, Serializer};

/// Emitted driver activity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[default]
    Active,
    Inactive,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal behind a primary decision, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    EyesClosed,
    Yawning,
    EyesOpen,
}

impl Cause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EyesClosed => "Eyes closed",
            Self::Yawning => "Yawning",
            Self::EyesOpen => "Eyes open",
        }
    }

    /// Status this cause maps to before the cooldown overlay
    pub fn status(&self) -> ActivityStatus {
        match self {
            Self::EyesClosed | Self::Yawning => ActivityStatus::Inactive,
            Self::EyesOpen => ActivityStatus::Active,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explanation attached to an emitted status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The primary decision, emitted unchanged
    Direct(Cause),
    /// Inactive held over by cooldown while the primary decision is `Cause`
    Cooldown(Cause),
}

impl Reason {
    pub fn is_cooldown(&self) -> bool {
        matches!(self, Self::Cooldown(_))
    }

    /// Underlying primary cause
    pub fn cause(&self) -> Cause {
        match *self {
            Self::Direct(c) | Self::Cooldown(c) => c,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(cause) => write!(f, "{cause}"),
            Self::Cooldown(cause) => write!(f, "Cooldown ({cause})"),
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Status and reason emitted for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityState {
    pub status: ActivityStatus,
    pub reason: Reason,
}

impl ActivityState {
    /// Primary decision with no cooldown applied
    pub fn direct(cause: Cause) -> Self {
        Self {
            status: cause.status(),
            reason: Reason::Direct(cause),
        }
    }

    /// Inactive held by cooldown
    pub fn cooldown(cause: Cause) -> Self {
        Self {
            status: ActivityStatus::Inactive,
            reason: Reason::Cooldown(cause),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ActivityStatus::Active
    }
}

impl Default for ActivityState {
    fn default() -> Self {
        Self::direct(Cause::EyesOpen)
    }
}

/// Classifier state (tracked over frames)
#[derive(Debug, Clone)]
pub struct ClassifierState {
    /// Recent raw EAR values
    pub(crate) ear_history: RingBuffer<f64>,
    /// Recent raw mouth ratios
    pub(crate) mouth_history: RingBuffer<f64>,
    /// Consecutive frames with smoothed EAR below threshold
    pub(crate) closed_eyes_run: u32,
    /// Consecutive frames with smoothed mouth ratio above threshold
    pub(crate) yawn_run: u32,
    /// Frames of forced Inactive left after the trigger cleared
    pub(crate) cooldown_remaining: u32,
    /// Last emitted status, diagnostic only
    pub(crate) last_status: ActivityStatus,
}

impl ClassifierState {
    /// Fresh state with histories of `window` frames
    pub fn new(window: usize) -> Self {
        Self {
            ear_history: RingBuffer::new(window),
            mouth_history: RingBuffer::new(window),
            closed_eyes_run: 0,
            yawn_run: 0,
            cooldown_remaining: 0,
            last_status: ActivityStatus::Active,
        }
    }

    /// Moving average of recent EAR values
    pub fn smoothed_ear(&self) -> f64 {
        self.ear_history.mean()
    }

    /// Moving average of recent mouth ratios
    pub fn smoothed_mouth(&self) -> f64 {
        self.mouth_history.mean()
    }

    pub fn ear_history(&self) -> &RingBuffer<f64> {
        &self.ear_history
    }

    pub fn mouth_history(&self) -> &RingBuffer<f64> {
        &self.mouth_history
    }

    pub fn closed_eyes_run(&self) -> u32 {
        self.closed_eyes_run
    }

    pub fn yawn_run(&self) -> u32 {
        self.yawn_run
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn last_status(&self) -> ActivityStatus {
        self.last_status
    }

    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        *self = Self::new(self.ear_history.capacity());
    }
}
