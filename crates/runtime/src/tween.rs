use foundation::math::{Rotation, normalize_lon_deg};

/// Smoothstep ease, `t²(3 - 2t)`, for `t` in `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Values an [`crate::Animator`] can interpolate.
pub trait Lerp: Clone {
    /// Value at fraction `t` of the way from `self` to `target`.
    fn lerp(&self, target: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, t: f64) -> Self {
        self + (target - self) * t
    }
}

impl Lerp for Rotation {
    /// Componentwise. Spin takes the short way round.
    fn lerp(&self, target: &Self, t: f64) -> Self {
        let dlambda = normalize_lon_deg(target.lambda - self.lambda);
        Rotation::new(
            self.lambda + dlambda * t,
            self.phi.lerp(&target.phi, t),
            self.gamma.lerp(&target.gamma, t),
        )
    }
}
