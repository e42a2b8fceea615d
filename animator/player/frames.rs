use crate::error::AnimatorError;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Time each frame stays on display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "f32")]
pub struct FrameRate(Duration);

impl FrameRate {
    pub const DEFAULT: FrameRate = FrameRate(Duration::from_millis(100));

    /// Rounds to whole microseconds, so `0.1` is exactly 100ms.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs_f32(seconds: f32) -> Result<Self, AnimatorError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(AnimatorError::InvalidFrameRate(format!(
                "{seconds} is not a positive number of seconds"
            )));
        }
        let micros = (f64::from(seconds) * 1_000_000.0).round() as u64;
        Self::from_duration(Duration::from_micros(micros))
    }

    pub fn from_duration(duration: Duration) -> Result<Self, AnimatorError> {
        if duration.is_zero() {
            return Err(AnimatorError::InvalidFrameRate(
                "frame duration must be greater than zero".to_string(),
            ));
        }
        Ok(Self(duration))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for FrameRate {
    type Error = AnimatorError;

    fn try_from(seconds: f32) -> Result<Self, Self::Error> {
        Self::from_secs_f32(seconds)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

/// An ordered, immutable list of frame handles.
///
/// Cloning shares the underlying frames; the player never copies or owns the
/// images themselves.
#[derive(Debug)]
pub struct FrameSequence<T> {
    frames: Arc<[T]>,
}

impl<T> FrameSequence<T> {
    pub fn new(frames: Vec<T>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.frames.first()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.frames.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.frames
    }
}

impl<T> Clone for FrameSequence<T> {
    fn clone(&self) -> Self {
        Self {
            frames: Arc::clone(&self.frames),
        }
    }
}

impl<T> From<Vec<T>> for FrameSequence<T> {
    fn from(frames: Vec<T>) -> Self {
        Self::new(frames)
    }
}

impl<T> FromIterator<T> for FrameSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}
