use crate::foundation::error::{ScrollFxError, ScrollFxResult};

pub use kurbo::{Point, Rect, Vec2};

/// Host viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with finite, positive dimensions.
    pub fn new(width: f64, height: f64) -> ScrollFxResult<Self> {
        let vp = Self { width, height };
        if !vp.is_valid() {
            return Err(ScrollFxError::validation(
                "viewport width/height must be finite and > 0",
            ));
        }
        Ok(vp)
    }

    /// `false` until layout has produced usable geometry.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Identity of a mounted element inside a [`crate::host::MotionHost`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u64);

/// Origin of a raw input signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Scroll,
    Pointer,
}

/// A sampled input value owned by its tracker.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Signal<T> {
    pub source: SignalSource,
    pub value: T,
    pub at_secs: f64, // host clock of the observation
}

impl<T> Signal<T> {
    pub fn new(source: SignalSource, value: T, at_secs: f64) -> Self {
        Self {
            source,
            value,
            at_secs,
        }
    }
}

/// Clamp into `[0, 1]`. NaN stays NaN so callers can detect it.
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
