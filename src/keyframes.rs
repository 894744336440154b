use crate::foundation::error::{ScrollFxError, ScrollFxResult};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub input: f64,
    pub output: f64,
}

impl Keyframe {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Piecewise-linear function over a clamped input domain.
///
/// Keys are strictly increasing in `input` and there are always at least two of them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct KeyframeMap {
    keys: Vec<Keyframe>,
}

impl KeyframeMap {
    pub fn new(keys: Vec<Keyframe>) -> ScrollFxResult<Self> {
        if keys.len() < 2 {
            return Err(ScrollFxError::keyframes(
                "KeyframeMap needs at least two keyframes",
            ));
        }
        if keys
            .iter()
            .any(|k| !k.input.is_finite() || !k.output.is_finite())
        {
            return Err(ScrollFxError::keyframes(
                "KeyframeMap inputs and outputs must be finite",
            ));
        }
        if !keys.windows(2).all(|w| w[0].input < w[1].input) {
            return Err(ScrollFxError::keyframes(
                "KeyframeMap inputs must be strictly increasing",
            ));
        }
        Ok(Self { keys })
    }

    /// Build from parallel input/output slices.
    pub fn from_pairs(inputs: &[f64], outputs: &[f64]) -> ScrollFxResult<Self> {
        if inputs.len() != outputs.len() {
            return Err(ScrollFxError::keyframes(format!(
                "KeyframeMap got {} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        Self::new(
            inputs
                .iter()
                .zip(outputs)
                .map(|(&i, &o)| Keyframe::new(i, o))
                .collect(),
        )
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// `(min, max)` of the declared inputs.
    pub fn domain(&self) -> (f64, f64) {
        (self.keys[0].input, self.keys[self.keys.len() - 1].input)
    }

    /// Sample the map. Input is clamped to [`Self::domain`]; NaN input yields NaN.
    pub fn interpolate(&self, input: f64) -> f64 {
        if input.is_nan() {
            return f64::NAN;
        }
        let (lo, hi) = self.domain();
        let x = input.clamp(lo, hi);

        let idx = self.keys.partition_point(|k| k.input <= x);
        if idx == 0 {
            return self.keys[0].output;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].output;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        if x == a.input {
            return a.output;
        }
        let t = (x - a.input) / (b.input - a.input);
        a.output + (b.output - a.output) * t
    }
}
