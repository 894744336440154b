use std::path::Path;

use crate::foundation::{
    core::finite_or,
    error::{ScrollFxError, ScrollFxResult},
};

/// Edge the element enters from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// `-1` for left, `+1` for right.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateAxis {
    X,
    #[default]
    Y,
    Both,
}

impl RotateAxis {
    pub fn includes_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    pub fn includes_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// `[min, max]` blur in pixels, serialized as a two-element array.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct BlurRange {
    pub min: f64,
    pub max: f64,
}

impl From<[f64; 2]> for BlurRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<BlurRange> for [f64; 2] {
    fn from(r: BlurRange) -> Self {
        [r.min, r.max]
    }
}

impl Default for BlurRange {
    fn default() -> Self {
        Self { min: 0.0, max: 4.0 }
    }
}

/// Caller intent for one decorative text element. Immutable once mounted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionConfig {
    /// Rendered content; opaque to the engine.
    pub text: String,
    pub direction: Direction,
    pub stop_position_percent: f64,
    pub parallax_enabled: bool,
    pub parallax_speed: f64,
    pub z_depth: f64,
    pub depth_blur_px: f64,
    pub depth_scale: f64,
    pub rotate_on_scroll: bool,
    pub rotate_axis: RotateAxis,
    pub rotate_amount_deg: f64,
    pub rotate_speed: f64,
    pub pointer_tilt_enabled: bool,
    pub tilt_amount_deg: f64,
    /// Spring settle time in seconds; `0` disables smoothing.
    pub tilt_smoothing: f64,
    pub dynamic_blur_enabled: bool,
    pub blur_range: BlurRange,
    pub breathing_scale_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity_override: Option<f64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            direction: Direction::Left,
            stop_position_percent: 10.0,
            parallax_enabled: false,
            parallax_speed: 0.5,
            z_depth: 0.0,
            depth_blur_px: 0.0,
            depth_scale: 1.0,
            rotate_on_scroll: false,
            rotate_axis: RotateAxis::Y,
            rotate_amount_deg: 15.0,
            rotate_speed: 1.0,
            pointer_tilt_enabled: false,
            tilt_amount_deg: 10.0,
            tilt_smoothing: 0.3,
            dynamic_blur_enabled: false,
            blur_range: BlurRange::default(),
            breathing_scale_enabled: false,
            opacity_override: None,
        }
    }
}

impl MotionConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> ScrollFxResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> ScrollFxResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            ScrollFxError::config(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Return a copy with caller mistakes repaired instead of rejected.
    ///
    /// Non-finite numbers fall back to defaults, the stop position is clamped to `[0, 100]`,
    /// an inverted blur range is swapped and the opacity override is clamped to `[0, 1]`.
    pub fn normalized(&self) -> Self {
        let d = Self::default();
        let mut out = self.clone();

        out.stop_position_percent =
            finite_or(self.stop_position_percent, d.stop_position_percent);
        if !(0.0..=100.0).contains(&out.stop_position_percent) {
            tracing::warn!(
                stop_position_percent = out.stop_position_percent,
                "stopPositionPercent outside [0, 100], clamping"
            );
            out.stop_position_percent = out.stop_position_percent.clamp(0.0, 100.0);
        }

        out.parallax_speed = finite_or(self.parallax_speed, d.parallax_speed);
        out.z_depth = finite_or(self.z_depth, d.z_depth);
        out.depth_blur_px = finite_or(self.depth_blur_px, d.depth_blur_px).max(0.0);
        out.depth_scale = finite_or(self.depth_scale, d.depth_scale).max(0.0);
        out.rotate_amount_deg = finite_or(self.rotate_amount_deg, d.rotate_amount_deg);
        out.rotate_speed = finite_or(self.rotate_speed, d.rotate_speed);
        out.tilt_amount_deg = finite_or(self.tilt_amount_deg, d.tilt_amount_deg);
        out.tilt_smoothing = finite_or(self.tilt_smoothing, d.tilt_smoothing).max(0.0);

        let mut blur = BlurRange {
            min: finite_or(self.blur_range.min, d.blur_range.min).max(0.0),
            max: finite_or(self.blur_range.max, d.blur_range.max).max(0.0),
        };
        if blur.min > blur.max {
            tracing::warn!(
                min = blur.min,
                max = blur.max,
                "blurRange min > max, swapping"
            );
            std::mem::swap(&mut blur.min, &mut blur.max);
        }
        out.blur_range = blur;

        out.opacity_override = match self.opacity_override {
            Some(o) if o.is_finite() => Some(o.clamp(0.0, 1.0)),
            Some(o) => {
                tracing::warn!(opacity_override = o, "non-finite opacityOverride ignored");
                None
            }
            None => None,
        };

        if out != *self {
            tracing::debug!("motion config normalized");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_with_defaults() {
        let cfg = MotionConfig::from_json_str(
            r#"{
                "text": "DEMO",
                "direction": "right",
                "stopPositionPercent": 20,
                "rotateAxis": "both",
                "blurRange": [1, 6],
                "opacityOverride": 0.4
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.text, "DEMO");
        assert_eq!(cfg.direction, Direction::Right);
        assert_eq!(cfg.stop_position_percent, 20.0);
        assert_eq!(cfg.rotate_axis, RotateAxis::Both);
        assert_eq!(cfg.blur_range, BlurRange { min: 1.0, max: 6.0 });
        assert_eq!(cfg.opacity_override, Some(0.4));
        assert!(!cfg.parallax_enabled);
        assert_eq!(cfg.depth_scale, 1.0);
    }

    #[test]
    fn unknown_direction_is_a_serde_error() {
        let err = MotionConfig::from_json_str(r#"{"direction":"up"}"#).unwrap_err();
        assert!(matches!(err, ScrollFxError::Serde(_)));
    }

    #[test]
    fn normalize_swaps_inverted_blur_range() {
        let cfg = MotionConfig {
            blur_range: BlurRange { min: 5.0, max: 1.0 },
            ..MotionConfig::default()
        };
        assert_eq!(
            cfg.normalized().blur_range,
            BlurRange { min: 1.0, max: 5.0 }
        );
    }

    #[test]
    fn normalize_clamps_and_replaces_non_finite() {
        let cfg = MotionConfig {
            stop_position_percent: 140.0,
            parallax_speed: f64::NAN,
            opacity_override: Some(3.0),
            depth_blur_px: -2.0,
            ..MotionConfig::default()
        }
        .normalized();
        assert_eq!(cfg.stop_position_percent, 100.0);
        assert_eq!(cfg.parallax_speed, 0.5);
        assert_eq!(cfg.opacity_override, Some(1.0));
        assert_eq!(cfg.depth_blur_px, 0.0);

        let cfg = MotionConfig {
            opacity_override: Some(f64::INFINITY),
            ..MotionConfig::default()
        }
        .normalized();
        assert_eq!(cfg.opacity_override, None);
    }

    #[test]
    fn default_config_is_already_normal() {
        let cfg = MotionConfig::new("HELLO");
        assert_eq!(cfg.normalized(), cfg);
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
    }
}
