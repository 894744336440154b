//! Second-order spring filter used to condition the pointer signal.
//!
//! Each step solves `x'' = -k (x - target) - c x'` (unit mass) in closed form over the elapsed
//! time, so the result does not depend on the frame rate the host happens to tick at.

use crate::foundation::core::Vec2;

/// For a critically damped spring, `e^(-w T)(1 + w T) = 0.01` gives `w ≈ 6.6 / T`.
const SETTLE_FACTOR: f64 = 6.6;

/// Error and velocity below this snap to the target.
const REST_EPSILON: f64 = 1e-4;

const CRITICAL_TOLERANCE: f64 = 1e-6;

/// `e^(-x)` underflows to zero past this exponent.
const DECAY_CUTOFF: f64 = 700.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringParams {
    /// Critically damped spring with natural frequency `omega` (rad/s).
    pub fn critical(omega: f64) -> Self {
        Self {
            stiffness: omega * omega,
            damping: 2.0 * omega,
        }
    }

    /// Critically damped spring that reaches 1% of the remaining error after `secs`.
    ///
    /// `secs <= 0` yields a pass-through filter.
    pub fn from_settle_time(secs: f64) -> Self {
        if !(secs.is_finite() && secs > 0.0) {
            return Self::passthrough();
        }
        Self::critical(SETTLE_FACTOR / secs)
    }

    pub fn passthrough() -> Self {
        Self {
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    pub fn is_passthrough(self) -> bool {
        !(self.stiffness.is_finite() && self.stiffness > 0.0)
    }

    /// `c / (2 sqrt(k))`; `1` is critical.
    pub fn damping_ratio(self) -> f64 {
        self.damping.max(0.0) / (2.0 * self.stiffness.sqrt())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct SpringState {
    pub value: f64,
    pub velocity: f64,
}

impl SpringState {
    pub const REST: Self = Self {
        value: 0.0,
        velocity: 0.0,
    };

    pub fn is_settled_at(self, target: f64) -> bool {
        (self.value - target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }
}

/// Advance `state` toward `target` by `dt` seconds.
///
/// Pure: the output depends only on the arguments. Non-positive or non-finite `dt` returns
/// `state` unchanged.
pub fn spring_step(state: SpringState, target: f64, dt: f64, params: SpringParams) -> SpringState {
    if !(dt.is_finite() && dt > 0.0) || !target.is_finite() {
        return state;
    }
    if params.is_passthrough() {
        return SpringState {
            value: target,
            velocity: 0.0,
        };
    }

    let e0 = state.value - target;
    let v0 = state.velocity;
    let w0 = params.stiffness.sqrt();
    let zeta = params.damping_ratio();

    let at_rest = SpringState {
        value: target,
        velocity: 0.0,
    };
    if slowest_decay_rate(w0, zeta) * dt > DECAY_CUTOFF {
        return at_rest;
    }

    let (e, v) = if (zeta - 1.0).abs() < CRITICAL_TOLERANCE {
        let b = v0 + w0 * e0;
        let decay = (-w0 * dt).exp();
        ((e0 + b * dt) * decay, (v0 - w0 * b * dt) * decay)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * w0 * dt).exp();
        let (sin, cos) = (wd * dt).sin_cos();
        let e = decay * (e0 * cos + (v0 + zeta * w0 * e0) / wd * sin);
        let v = decay * (v0 * cos - (w0 * w0 * e0 + zeta * w0 * v0) / wd * sin);
        (e, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        let c2 = (v0 - r1 * e0) / (r2 - r1);
        let c1 = e0 - c2;
        let (x1, x2) = ((r1 * dt).exp(), (r2 * dt).exp());
        (c1 * x1 + c2 * x2, r1 * c1 * x1 + r2 * c2 * x2)
    };

    let next = SpringState {
        value: target + e,
        velocity: v,
    };
    if next.is_settled_at(target) {
        at_rest
    } else {
        next
    }
}

/// Decay rate of the slowest mode; `w0` when critically damped.
fn slowest_decay_rate(w0: f64, zeta: f64) -> f64 {
    if zeta <= 1.0 {
        zeta * w0
    } else {
        w0 * (zeta - (zeta * zeta - 1.0).sqrt())
    }
}

/// Scalar smoothing filter with temporal memory.
#[derive(Clone, Copy, Debug)]
pub struct SmoothingFilter {
    params: SpringParams,
    state: SpringState,
}

impl SmoothingFilter {
    pub fn new(params: SpringParams) -> Self {
        Self {
            params,
            state: SpringState::REST,
        }
    }

    pub fn update(&mut self, target: f64, dt: f64) -> f64 {
        self.state = spring_step(self.state, target, dt, self.params);
        self.state.value
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn state(&self) -> SpringState {
        self.state
    }

    pub fn is_settled_at(&self, target: f64) -> bool {
        self.state.is_settled_at(target)
    }

    /// Back to rest at zero.
    pub fn reset(&mut self) {
        self.state = SpringState::REST;
    }
}

/// Two independent filters for the normalized pointer offset.
#[derive(Clone, Copy, Debug)]
pub struct PointerSmoother {
    x: SmoothingFilter,
    y: SmoothingFilter,
}

impl PointerSmoother {
    pub fn new(params: SpringParams) -> Self {
        Self {
            x: SmoothingFilter::new(params),
            y: SmoothingFilter::new(params),
        }
    }

    pub fn update(&mut self, target: Vec2, dt: f64) -> Vec2 {
        Vec2::new(self.x.update(target.x, dt), self.y.update(target.y, dt))
    }

    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    pub fn is_settled_at(&self, target: Vec2) -> bool {
        self.x.is_settled_at(target.x) && self.y.is_settled_at(target.y)
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn run(params: SpringParams, dt: f64, total: f64) -> SpringState {
        let mut s = SpringState::REST;
        let steps = (total / dt).round() as usize;
        for _ in 0..steps {
            s = spring_step(s, 1.0, dt, params);
        }
        s
    }

    #[test]
    fn settle_time_maps_to_critical_damping() {
        let p = SpringParams::from_settle_time(0.3);
        assert!(approx(p.damping_ratio(), 1.0, 1e-12));
        assert!(SpringParams::from_settle_time(0.0).is_passthrough());
        assert!(SpringParams::from_settle_time(f64::NAN).is_passthrough());
    }

    #[test]
    fn critical_reaches_one_percent_at_settle_time() {
        let p = SpringParams::from_settle_time(0.5);
        let s = spring_step(SpringState::REST, 1.0, 0.5, p);
        assert!(approx(s.value, 0.99, 2e-3), "value {}", s.value);
    }

    #[test]
    fn step_is_frame_rate_independent() {
        for p in [
            SpringParams::critical(12.0),
            SpringParams {
                stiffness: 100.0,
                damping: 10.0,
            },
            SpringParams {
                stiffness: 100.0,
                damping: 40.0,
            },
        ] {
            let coarse = run(p, 1.0 / 30.0, 0.4);
            let fine = run(p, 1.0 / 240.0, 0.4);
            let single = spring_step(SpringState::REST, 1.0, 0.4, p);
            assert!(approx(coarse.value, fine.value, 1e-9));
            assert!(approx(coarse.value, single.value, 1e-9));
            assert!(approx(coarse.velocity, single.velocity, 1e-9));
        }
    }

    #[test]
    fn critical_never_overshoots() {
        let p = SpringParams::critical(20.0);
        let mut s = SpringState::REST;
        for _ in 0..200 {
            s = spring_step(s, 1.0, 1.0 / 60.0, p);
            assert!(s.value <= 1.0);
        }
        assert!(s.is_settled_at(1.0));
        assert_eq!(s.value, 1.0);
    }

    #[test]
    fn underdamped_overshoots() {
        let p = SpringParams {
            stiffness: 400.0,
            damping: 4.0,
        };
        let mut s = SpringState::REST;
        let mut peak = 0.0f64;
        for _ in 0..60 {
            s = spring_step(s, 1.0, 1.0 / 60.0, p);
            peak = peak.max(s.value);
        }
        assert!(peak > 1.0);
    }

    #[test]
    fn zero_or_invalid_dt_is_a_no_op() {
        let p = SpringParams::critical(10.0);
        let s = SpringState {
            value: 0.3,
            velocity: 1.0,
        };
        assert_eq!(spring_step(s, 1.0, 0.0, p), s);
        assert_eq!(spring_step(s, 1.0, -0.1, p), s);
        assert_eq!(spring_step(s, 1.0, f64::NAN, p), s);
    }

    #[test]
    fn huge_dt_lands_at_rest() {
        for p in [
            SpringParams::critical(10.0),
            SpringParams {
                stiffness: 100.0,
                damping: 4.0,
            },
            SpringParams {
                stiffness: 100.0,
                damping: 60.0,
            },
        ] {
            let s = spring_step(
                SpringState {
                    value: 0.0,
                    velocity: 3.0,
                },
                1.0,
                1e307,
                p,
            );
            assert_eq!(
                s,
                SpringState {
                    value: 1.0,
                    velocity: 0.0
                }
            );
        }
    }

    #[test]
    fn passthrough_jumps_to_target() {
        let mut f = SmoothingFilter::new(SpringParams::passthrough());
        assert_eq!(f.update(0.7, 0.016), 0.7);
    }

    #[test]
    fn reset_returns_to_neutral() {
        let mut f = PointerSmoother::new(SpringParams::critical(8.0));
        f.update(Vec2::new(1.0, -1.0), 0.1);
        assert_ne!(f.value(), Vec2::ZERO);
        f.reset();
        assert_eq!(f.value(), Vec2::ZERO);
        assert!(f.is_settled_at(Vec2::ZERO));
    }
}
