use crate::{
    compose::{ChannelInputs, Phase, TransformComposer, TransformDescriptor},
    config::MotionConfig,
    foundation::{
        core::{Point, Rect, Vec2, Viewport},
        error::ScrollFxResult,
    },
    pointer::PointerTracker,
    scroll::ScrollProgressTracker,
    smoothing::{PointerSmoother, SpringParams},
};

#[derive(Debug)]
struct PointerTilt {
    tracker: PointerTracker,
    smoother: PointerSmoother,
}

/// Motion engine for one decorative element.
///
/// Owns its trackers, spring state and composer; nothing is shared between elements.
#[derive(Debug)]
pub struct ElementMotion {
    config: MotionConfig,
    scroll: ScrollProgressTracker,
    tilt: Option<PointerTilt>,
    composer: TransformComposer,
    last_tick: Option<f64>,
}

impl ElementMotion {
    /// Build the engine from caller config. The config is normalized first.
    pub fn new(config: &MotionConfig) -> ScrollFxResult<Self> {
        let config = config.normalized();
        let composer = TransformComposer::new(&config)?;
        let tilt = config.pointer_tilt_enabled.then(|| PointerTilt {
            tracker: PointerTracker::new(),
            smoother: PointerSmoother::new(SpringParams::from_settle_time(config.tilt_smoothing)),
        });
        Ok(Self {
            config,
            scroll: ScrollProgressTracker::new(),
            tilt,
            composer,
            last_tick: None,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn wants_pointer(&self) -> bool {
        self.tilt.is_some()
    }

    pub fn observe_scroll(&mut self, element: Rect, viewport: Viewport, at_secs: f64) {
        self.scroll.observe(element, viewport, at_secs);
    }

    /// Ignored when pointer tilt is disabled.
    pub fn observe_pointer(&mut self, position: Point, viewport: Viewport, at_secs: f64) {
        if let Some(tilt) = self.tilt.as_mut() {
            tilt.tracker.observe(position, viewport, at_secs);
        }
    }

    pub fn progress(&self) -> Option<f64> {
        self.scroll.progress()
    }

    /// `None` until the first usable scroll sample.
    pub fn phase(&self) -> Option<Phase> {
        self.progress().map(Phase::from_progress)
    }

    /// `true` while the tilt spring is still moving toward the pointer.
    pub fn is_animating(&self) -> bool {
        self.tilt
            .as_ref()
            .is_some_and(|t| !t.smoother.is_settled_at(t.tracker.offset()))
    }

    /// Advance the spring to `now_secs` and compose the current transform.
    pub fn tick(&mut self, now_secs: f64) -> TransformDescriptor {
        // A non-finite clock sample composes without advancing and never becomes the baseline.
        let dt = match self.last_tick {
            _ if !now_secs.is_finite() => 0.0,
            Some(prev) => now_secs - prev,
            None => 0.0,
        };
        if now_secs.is_finite() && (dt >= 0.0 || self.last_tick.is_none()) {
            self.last_tick = Some(now_secs);
        }

        let tilt = self.tilt.as_mut().map(|t| {
            let target = t.tracker.offset();
            t.smoother.update(target, dt)
        });

        self.composer.compose(ChannelInputs {
            progress: self.scroll.progress(),
            viewport_width: self.scroll.viewport().map(|v| v.width),
            tilt,
        })
    }

    /// Smoothed pointer offset, `(0, 0)` when tilt is disabled.
    pub fn tilt(&self) -> Vec2 {
        self.tilt
            .as_ref()
            .map_or(Vec2::ZERO, |t| t.smoother.value())
    }
}
