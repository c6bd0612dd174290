//! Interpolating vector spline over non-uniform knots
//!
//! Cubic Hermite evaluation with Catmull-Rom (finite difference) tangents:
//! passes exactly through every knot, first-order continuous between
//! knots, and degrades gracefully — two knots give a linear segment, one
//! knot a constant, duplicate knot times a step.

use crate::pose::Vec3;

/// A spline fitted through `(time, point)` knots
#[derive(Debug, Clone)]
pub struct Spline {
    times: Vec<f64>,
    points: Vec<Vec3>,
    tangents: Vec<Vec3>,
}

impl Spline {
    /// Fit a spline through the given knots.
    ///
    /// `times` must be non-decreasing and the same length as `points`,
    /// with at least one knot.
    pub fn fit(times: Vec<f64>, points: Vec<Vec3>) -> Self {
        debug_assert_eq!(times.len(), points.len());
        debug_assert!(!times.is_empty());
        debug_assert!(times.windows(2).all(|w| w[0] <= w[1]));

        let n = points.len();
        let mut tangents = vec![Vec3::zeros(); n];
        if n >= 2 {
            for i in 0..n {
                // Central difference inside, one-sided at the ends and
                // next to zero-duration (duplicate time) segments, so an
                // instantaneous jump never bleeds into its neighbors.
                let lo = if i > 0 && times[i] - times[i - 1] > 0.0 {
                    i - 1
                } else {
                    i
                };
                let hi = if i < n - 1 && times[i + 1] - times[i] > 0.0 {
                    i + 1
                } else {
                    i
                };
                let dt = times[hi] - times[lo];
                if dt > 0.0 {
                    tangents[i] = (points[hi] - points[lo]) / dt;
                }
            }
        }
        Self {
            times,
            points,
            tangents,
        }
    }

    /// Number of knots
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the spline at time `t`, clamped to the knot range.
    ///
    /// At a duplicate knot time (zero-duration segment) the later knot's
    /// value is returned: the evaluation belongs to the segment that
    /// starts there. The instantaneous pre-jump value is the earlier knot
    /// itself; the trajectory generator emits it directly.
    pub fn sample(&self, t: f64) -> Vec3 {
        let n = self.points.len();
        // Strictly below the range only: t == times[0] must go through
        // the segment lookup so a duplicate head knot resolves to the
        // later knot.
        if n == 1 || t < self.times[0] {
            return self.points[0];
        }
        if t >= self.times[n - 1] {
            return self.points[n - 1];
        }

        // Last segment index whose start time is <= t.
        let i = self.times.partition_point(|&kt| kt <= t) - 1;
        let h = self.times[i + 1] - self.times[i];
        if h <= 0.0 {
            return self.points[i];
        }

        let s = (t - self.times[i]) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        self.points[i] * h00
            + self.tangents[i] * (h10 * h)
            + self.points[i + 1] * h01
            + self.tangents[i + 1] * (h11 * h)
    }
}
