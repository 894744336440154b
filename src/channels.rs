use crate::{
    config::MotionConfig,
    foundation::error::ScrollFxResult,
    keyframes::KeyframeMap,
};

pub const OPACITY_INPUTS: [f64; 5] = [0.0, 0.3, 0.6, 0.9, 1.0];
pub const OPACITY_OUTPUTS: [f64; 5] = [0.0, 0.8, 1.0, 0.8, 0.0];

pub const BREATHING_INPUTS: [f64; 3] = [0.0, 0.5, 1.0];
pub const BREATHING_OUTPUTS: [f64; 3] = [0.95, 1.05, 0.95];

const MIDPOINT_INPUTS: [f64; 3] = [0.0, 0.5, 1.0];

/// Vertical drift in pixels at full progress for `parallaxSpeed = 1`.
pub const PARALLAX_DISTANCE_PX: f64 = 100.0;

/// Scroll-driven keyframe maps derived once from a [`MotionConfig`].
///
/// A channel whose feature is disabled has no map. Translate-X is not here because it depends
/// on the live viewport width; see [`crate::edge_stop::EdgeStopResolver`].
#[derive(Clone, Debug)]
pub struct ChannelCurves {
    pub opacity: KeyframeMap,
    pub parallax: Option<KeyframeMap>,
    pub rotate_x: Option<KeyframeMap>,
    pub rotate_y: Option<KeyframeMap>,
    pub breathing: Option<KeyframeMap>,
    pub dynamic_blur: Option<KeyframeMap>,
}

impl ChannelCurves {
    pub fn from_config(cfg: &MotionConfig) -> ScrollFxResult<Self> {
        let opacity = KeyframeMap::from_pairs(&OPACITY_INPUTS, &OPACITY_OUTPUTS)?;

        let parallax = if cfg.parallax_enabled {
            Some(KeyframeMap::from_pairs(
                &[0.0, 1.0],
                &[0.0, -PARALLAX_DISTANCE_PX * cfg.parallax_speed],
            )?)
        } else {
            None
        };

        let rotation = if cfg.rotate_on_scroll {
            let peak = cfg.rotate_amount_deg * cfg.rotate_speed;
            Some(KeyframeMap::from_pairs(&MIDPOINT_INPUTS, &[-peak, 0.0, peak])?)
        } else {
            None
        };
        let rotate_x = rotation
            .clone()
            .filter(|_| cfg.rotate_axis.includes_x());
        let rotate_y = rotation.filter(|_| cfg.rotate_axis.includes_y());

        let breathing = if cfg.breathing_scale_enabled {
            Some(KeyframeMap::from_pairs(
                &BREATHING_INPUTS,
                &BREATHING_OUTPUTS,
            )?)
        } else {
            None
        };

        let dynamic_blur = if cfg.dynamic_blur_enabled {
            let r = cfg.blur_range;
            Some(KeyframeMap::from_pairs(&MIDPOINT_INPUTS, &[r.max, r.min, r.max])?)
        } else {
            None
        };

        Ok(Self {
            opacity,
            parallax,
            rotate_x,
            rotate_y,
            breathing,
            dynamic_blur,
        })
    }
}
