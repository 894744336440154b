use crate::foundation::core::{Rect, Signal, SignalSource, Viewport, clamp01};

/// Progress of `element` through its visibility window.
///
/// `0` when the element's top edge meets the bottom of the viewport, `1` when its bottom edge
/// leaves the top. `element` is in viewport coordinates (a bounding client rect). Returns
/// `None` while there is no usable geometry.
pub fn scroll_progress(element: Rect, viewport: Viewport) -> Option<f64> {
    if !viewport.is_valid() {
        return None;
    }
    let top = element.y0.min(element.y1);
    let height = element.height().abs();
    let travel = viewport.height + height;
    if !top.is_finite() || !travel.is_finite() || travel <= 0.0 {
        return None;
    }
    Some(clamp01((viewport.height - top) / travel))
}

/// Latest scroll-progress signal for one element.
#[derive(Clone, Debug, Default)]
pub struct ScrollProgressTracker {
    last: Option<Signal<f64>>,
    viewport: Option<Viewport>,
}

impl ScrollProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new intersection sample. Unusable geometry keeps the previous signal.
    pub fn observe(
        &mut self,
        element: Rect,
        viewport: Viewport,
        at_secs: f64,
    ) -> Option<Signal<f64>> {
        let progress = scroll_progress(element, viewport)?;
        let sig = Signal::new(SignalSource::Scroll, progress, at_secs);
        self.last = Some(sig);
        self.viewport = Some(viewport);
        Some(sig)
    }

    pub fn progress(&self) -> Option<f64> {
        self.last.map(|s| s.value)
    }

    pub fn signal(&self) -> Option<Signal<f64>> {
        self.last
    }

    /// Viewport of the last accepted sample.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}
