use crate::{
    channels::ChannelCurves,
    config::MotionConfig,
    edge_stop::{EdgeStopResolver, TRANSLATE_X_INPUTS},
    foundation::{
        core::{Vec2, clamp01},
        error::ScrollFxResult,
    },
};

/// Composed per-tick output consumed by a render target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformDescriptor {
    pub translate_x: f64,
    pub translate_y: f64,
    pub translate_z: f64,
    pub rotate_x: f64, // degrees
    pub rotate_y: f64, // degrees
    pub scale: f64,
    pub opacity: f64,
    pub blur_px: f64,
}

impl TransformDescriptor {
    pub const NEUTRAL: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        translate_z: 0.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
        blur_px: 0.0,
    };

    pub fn to_css(&self) -> CssTransform {
        CssTransform {
            transform: format!(
                "translate3d({}px, {}px, {}px) rotateX({}deg) rotateY({}deg) scale({})",
                self.translate_x,
                self.translate_y,
                self.translate_z,
                self.rotate_x,
                self.rotate_y,
                self.scale
            ),
            filter: format!("blur({}px)", self.blur_px),
            opacity: self.opacity,
        }
    }
}

impl Default for TransformDescriptor {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Style strings for a DOM-like render target.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CssTransform {
    pub transform: String,
    pub filter: String,
    pub opacity: f64,
}

/// Lateral motion phase, a pure function of progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering,
    Settled,
}

impl Phase {
    pub fn from_progress(progress: f64) -> Self {
        if progress < TRANSLATE_X_INPUTS[1] {
            Self::Entering
        } else {
            Self::Settled
        }
    }
}

/// Signal values available for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelInputs {
    /// Scroll progress, `None` before geometry exists.
    pub progress: Option<f64>,
    pub viewport_width: Option<f64>,
    /// Smoothed pointer offset; `None` when tilt is off.
    pub tilt: Option<Vec2>,
}

/// Merges per-channel curves into one [`TransformDescriptor`].
#[derive(Clone, Debug)]
pub struct TransformComposer {
    curves: ChannelCurves,
    edge_stop: EdgeStopResolver,
    pointer_tilt: bool,
    tilt_amount_deg: f64,
    z_depth: f64,
    depth_scale: f64,
    depth_blur_px: f64,
    opacity_override: Option<f64>,
    last_good: TransformDescriptor,
}

impl TransformComposer {
    /// `cfg` is expected to be normalized already.
    pub fn new(cfg: &MotionConfig) -> ScrollFxResult<Self> {
        Ok(Self {
            curves: ChannelCurves::from_config(cfg)?,
            edge_stop: EdgeStopResolver::new(cfg.direction, cfg.stop_position_percent),
            pointer_tilt: cfg.pointer_tilt_enabled,
            tilt_amount_deg: cfg.tilt_amount_deg,
            z_depth: cfg.z_depth,
            depth_scale: cfg.depth_scale,
            depth_blur_px: cfg.depth_blur_px,
            opacity_override: cfg.opacity_override,
            last_good: TransformDescriptor::NEUTRAL,
        })
    }

    /// Compose one tick. Never fails: a non-finite channel repeats its last good value.
    pub fn compose(&mut self, inputs: ChannelInputs) -> TransformDescriptor {
        let progress = inputs.progress.map(clamp01);
        // Curves without a geometry-dependent fallback read as "not entered yet".
        let p_or_start = progress.unwrap_or(0.0);

        // A rejected map is NaN so the fail-safe holds the previous offset; no usable width
        // at all is the neutral offset.
        let translate_x = match (progress, inputs.viewport_width) {
            (Some(p), Some(w)) if w.is_finite() && w > 0.0 => self
                .edge_stop
                .for_width(w)
                .map_or(f64::NAN, |map| map.interpolate(p)),
            _ => 0.0,
        };

        let translate_y = match (progress, &self.curves.parallax) {
            (Some(p), Some(map)) => map.interpolate(p),
            _ => 0.0,
        };

        let (rotate_x, rotate_y) = if self.pointer_tilt {
            let tilt = inputs.tilt.unwrap_or(Vec2::ZERO);
            (-tilt.y * self.tilt_amount_deg, tilt.x * self.tilt_amount_deg)
        } else {
            let scroll_rot = |map: &Option<crate::keyframes::KeyframeMap>| match (progress, map) {
                (Some(p), Some(map)) => map.interpolate(p),
                _ => 0.0,
            };
            (
                scroll_rot(&self.curves.rotate_x),
                scroll_rot(&self.curves.rotate_y),
            )
        };

        let scale = match &self.curves.breathing {
            Some(map) => map.interpolate(p_or_start) * self.depth_scale,
            None => self.depth_scale,
        };

        let blur_px = self.depth_blur_px
            + self
                .curves
                .dynamic_blur
                .as_ref()
                .map_or(0.0, |map| map.interpolate(p_or_start));

        let opacity = match self.opacity_override {
            Some(o) => o,
            None => self.curves.opacity.interpolate(p_or_start),
        };

        let raw = TransformDescriptor {
            translate_x,
            translate_y,
            translate_z: self.z_depth,
            rotate_x,
            rotate_y,
            scale,
            opacity,
            blur_px,
        };
        let out = fail_safe(raw, &self.last_good);
        self.last_good = out;
        out
    }

    pub fn last_good(&self) -> TransformDescriptor {
        self.last_good
    }
}

fn fail_safe(raw: TransformDescriptor, last: &TransformDescriptor) -> TransformDescriptor {
    fn pick(name: &'static str, v: f64, last: f64) -> f64 {
        if v.is_finite() {
            v
        } else {
            tracing::trace!(channel = name, value = v, "non-finite channel, holding last value");
            last
        }
    }

    TransformDescriptor {
        translate_x: pick("translateX", raw.translate_x, last.translate_x),
        translate_y: pick("translateY", raw.translate_y, last.translate_y),
        translate_z: pick("translateZ", raw.translate_z, last.translate_z),
        rotate_x: pick("rotateX", raw.rotate_x, last.rotate_x),
        rotate_y: pick("rotateY", raw.rotate_y, last.rotate_y),
        scale: pick("scale", raw.scale, last.scale),
        opacity: pick("opacity", raw.opacity, last.opacity),
        blur_px: pick("blur", raw.blur_px, last.blur_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlurRange, Direction};

    fn at(progress: f64, width: f64) -> ChannelInputs {
        ChannelInputs {
            progress: Some(progress),
            viewport_width: Some(width),
            tilt: None,
        }
    }

    #[test]
    fn opacity_curve_and_override() {
        let mut c = TransformComposer::new(&MotionConfig::default()).unwrap();
        assert_eq!(c.compose(at(0.0, 1000.0)).opacity, 0.0);
        assert_eq!(c.compose(at(0.3, 1000.0)).opacity, 0.8);
        assert_eq!(c.compose(at(0.6, 1000.0)).opacity, 1.0);
        assert_eq!(c.compose(at(1.0, 1000.0)).opacity, 0.0);

        let mut c = TransformComposer::new(&MotionConfig {
            opacity_override: Some(0.35),
            ..MotionConfig::default()
        })
        .unwrap();
        for p in [0.0, 0.6, 1.0] {
            assert_eq!(c.compose(at(p, 1000.0)).opacity, 0.35);
        }
    }

    #[test]
    fn blur_is_static_plus_dynamic() {
        let cfg = MotionConfig {
            depth_blur_px: 3.0,
            dynamic_blur_enabled: true,
            blur_range: BlurRange { min: 0.0, max: 5.0 },
            ..MotionConfig::default()
        };
        let mut c = TransformComposer::new(&cfg).unwrap();
        assert_eq!(c.compose(at(0.0, 800.0)).blur_px, 8.0);
        assert_eq!(c.compose(at(0.5, 800.0)).blur_px, 3.0);
    }

    #[test]
    fn scale_multiplies_breathing_with_depth_scale() {
        let cfg = MotionConfig {
            depth_scale: 2.0,
            breathing_scale_enabled: true,
            ..MotionConfig::default()
        };
        let mut c = TransformComposer::new(&cfg).unwrap();
        assert_eq!(c.compose(at(0.5, 800.0)).scale, 2.1);
        assert_eq!(c.compose(at(0.0, 800.0)).scale, 1.9);

        let mut plain = TransformComposer::new(&MotionConfig {
            depth_scale: 0.8,
            ..MotionConfig::default()
        })
        .unwrap();
        assert_eq!(plain.compose(at(0.5, 800.0)).scale, 0.8);
    }

    #[test]
    fn depth_is_static() {
        let mut c = TransformComposer::new(&MotionConfig {
            z_depth: -120.0,
            ..MotionConfig::default()
        })
        .unwrap();
        for p in [0.0, 0.4, 1.0] {
            assert_eq!(c.compose(at(p, 1000.0)).translate_z, -120.0);
        }
    }

    #[test]
    fn pointer_tilt_replaces_scroll_rotation() {
        let cfg = MotionConfig {
            rotate_on_scroll: true,
            rotate_axis: crate::config::RotateAxis::Both,
            pointer_tilt_enabled: true,
            tilt_amount_deg: 10.0,
            ..MotionConfig::default()
        };
        let mut c = TransformComposer::new(&cfg).unwrap();
        let d = c.compose(ChannelInputs {
            tilt: Some(Vec2::new(0.5, -1.0)),
            ..at(0.0, 1000.0)
        });
        assert_eq!(d.rotate_x, 10.0);
        assert_eq!(d.rotate_y, 5.0);

        let d = c.compose(at(1.0, 1000.0));
        assert_eq!((d.rotate_x, d.rotate_y), (0.0, 0.0));
    }

    #[test]
    fn missing_geometry_is_neutral_offset() {
        let mut c = TransformComposer::new(&MotionConfig {
            direction: Direction::Right,
            parallax_enabled: true,
            rotate_on_scroll: true,
            ..MotionConfig::default()
        })
        .unwrap();
        let d = c.compose(ChannelInputs::default());
        assert_eq!(d.translate_x, 0.0);
        assert_eq!(d.translate_y, 0.0);
        assert_eq!(d.rotate_y, 0.0);
        assert_eq!(d.opacity, 0.0);

        let d = c.compose(ChannelInputs {
            viewport_width: Some(0.0),
            ..at(0.5, 0.0)
        });
        assert_eq!(d.translate_x, 0.0);
    }

    #[test]
    fn non_finite_channel_holds_last_good() {
        let mut c = TransformComposer::new(&MotionConfig {
            parallax_enabled: true,
            ..MotionConfig::default()
        })
        .unwrap();
        let good = c.compose(at(0.6, 1000.0));
        let held = c.compose(at(f64::NAN, 1000.0));
        assert_eq!(held.translate_x, good.translate_x);
        assert_eq!(held.translate_y, good.translate_y);
        assert_eq!(held.opacity, good.opacity);
        assert_eq!(c.last_good(), held);
    }

    #[test]
    fn extreme_width_does_not_jump_to_zero() {
        let mut c = TransformComposer::new(&MotionConfig {
            direction: Direction::Left,
            stop_position_percent: 100.0,
            ..MotionConfig::default()
        })
        .unwrap();
        assert_eq!(c.compose(at(1.0, 1000.0)).translate_x, -1000.0);
        let wide = c.compose(at(1.0, 1e307)).translate_x;
        assert!(wide.is_finite() && wide < -1000.0, "wide {wide}");
        let widest = c.compose(at(1.0, f64::MAX)).translate_x;
        assert!(widest.is_finite() && widest != 0.0, "widest {widest}");
    }

    #[test]
    fn phase_boundary() {
        assert_eq!(Phase::from_progress(0.0), Phase::Entering);
        assert_eq!(Phase::from_progress(0.399), Phase::Entering);
        assert_eq!(Phase::from_progress(0.4), Phase::Settled);
        assert_eq!(Phase::from_progress(1.0), Phase::Settled);
    }

    #[test]
    fn css_rendering() {
        let d = TransformDescriptor {
            translate_x: 240.0,
            translate_z: -50.0,
            blur_px: 3.0,
            opacity: 0.5,
            ..TransformDescriptor::NEUTRAL
        };
        let css = d.to_css();
        assert_eq!(
            css.transform,
            "translate3d(240px, 0px, -50px) rotateX(0deg) rotateY(0deg) scale(1)"
        );
        assert_eq!(css.filter, "blur(3px)");
        assert_eq!(css.opacity, 0.5);
    }
}
