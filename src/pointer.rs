use crate::foundation::core::{Point, Signal, SignalSource, Vec2, Viewport};

/// Map absolute pointer coordinates to signed offsets in `[-1, 1]` per axis.
///
/// The viewport center maps to `(0, 0)`. `None` while the viewport is unusable.
pub fn normalize_pointer(position: Point, viewport: Viewport) -> Option<Vec2> {
    if !viewport.is_valid() || !position.x.is_finite() || !position.y.is_finite() {
        return None;
    }
    let nx = (position.x / viewport.width - 0.5) * 2.0;
    let ny = (position.y / viewport.height - 0.5) * 2.0;
    Some(Vec2::new(nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0)))
}

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    last: Option<Signal<Vec2>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        position: Point,
        viewport: Viewport,
        at_secs: f64,
    ) -> Option<Signal<Vec2>> {
        let offset = normalize_pointer(position, viewport)?;
        let sig = Signal::new(SignalSource::Pointer, offset, at_secs);
        self.last = Some(sig);
        Some(sig)
    }

    /// Latest normalized offset, `(0, 0)` before any pointer movement.
    pub fn offset(&self) -> Vec2 {
        self.last.map(|s| s.value).unwrap_or(Vec2::ZERO)
    }

    pub fn signal(&self) -> Option<Signal<Vec2>> {
        self.last
    }
}
