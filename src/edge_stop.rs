use crate::{
    config::Direction,
    foundation::error::ScrollFxResult,
    keyframes::KeyframeMap,
};

/// Off-screen start distance as a percentage of viewport width.
pub const ENTRANCE_OFFSET_PERCENT: f64 = 30.0;

/// Progress stops for the lateral entrance: fast approach, then a long dwell.
pub const TRANSLATE_X_INPUTS: [f64; 4] = [0.0, 0.4, 0.7, 1.0];

/// Builds the translate-X keyframes for a stop position and entrance edge.
///
/// Both endpoints are derived from the live viewport width, and the map is rebuilt whenever
/// that width changes.
#[derive(Clone, Debug)]
pub struct EdgeStopResolver {
    direction: Direction,
    stop_percent: f64,
    cached: Option<(f64, KeyframeMap)>,
}

impl EdgeStopResolver {
    pub fn new(direction: Direction, stop_percent: f64) -> Self {
        Self {
            direction,
            stop_percent: stop_percent.clamp(0.0, 100.0),
            cached: None,
        }
    }

    /// `(entrance, stop)` offsets in pixels for `viewport_width`.
    pub fn endpoints(&self, viewport_width: f64) -> (f64, f64) {
        let sign = self.direction.sign();
        let entrance = sign * percent_of(ENTRANCE_OFFSET_PERCENT, viewport_width);
        let stop = sign * percent_of(self.stop_percent, viewport_width);
        (entrance, stop)
    }

    pub fn resolve(&self, viewport_width: f64) -> ScrollFxResult<KeyframeMap> {
        let (entrance, stop) = self.endpoints(viewport_width);
        KeyframeMap::from_pairs(&TRANSLATE_X_INPUTS, &[entrance, stop, stop, stop])
    }

    /// Cached map for `viewport_width`; `None` while the width is unusable.
    pub fn for_width(&mut self, viewport_width: f64) -> Option<&KeyframeMap> {
        if !(viewport_width.is_finite() && viewport_width > 0.0) {
            return None;
        }
        let stale = self
            .cached
            .as_ref()
            .is_none_or(|(w, _)| *w != viewport_width);
        if stale {
            let map = match self.resolve(viewport_width) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(%err, viewport_width, "edge stop keyframes rejected");
                    return None;
                }
            };
            tracing::debug!(
                viewport_width,
                direction = ?self.direction,
                stop_percent = self.stop_percent,
                "edge stop keyframes recomputed"
            );
            self.cached = Some((viewport_width, map));
        }
        self.cached.as_ref().map(|(_, map)| map)
    }
}

/// `percent`% of `width`. Scales first only when the product would overflow, so ordinary
/// widths stay exact.
fn percent_of(percent: f64, width: f64) -> f64 {
    let v = percent * width / 100.0;
    if v.is_finite() {
        v
    } else {
        percent / 100.0 * width
    }
}
