// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An ellipse arc.

use core::f64::consts::{FRAC_PI_2, PI};
use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::common::{integrate_gl16, rem_euclid};
use crate::{
    Affine, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveDeriv, ParamCurveExtrema,
    PathEl, Point, Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single elliptical arc segment.
///
/// The curve parameter maps linearly onto the angle, so `eval(t)` sits at
/// `start_angle + t * sweep_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    pub sweep_angle: f64,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
}

impl Arc {
    /// Create a new `Arc`.
    #[inline(always)]
    pub fn new(
        center: impl Into<Point>,
        radii: impl Into<Vec2>,
        start_angle: f64,
        sweep_angle: f64,
        x_rotation: f64,
    ) -> Self {
        Self {
            center: center.into(),
            radii: radii.into(),
            start_angle,
            sweep_angle,
            x_rotation,
        }
    }

    /// A circular arc.
    #[inline]
    pub fn circular(center: impl Into<Point>, radius: f64, start_angle: f64, sweep_angle: f64) -> Arc {
        Arc::new(center, (radius, radius), start_angle, sweep_angle, 0.0)
    }

    /// Returns a copy of this `Arc` in the opposite direction.
    ///
    /// The new `Arc` will sweep towards the original `Arc`s
    /// start angle.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> Arc {
        Self {
            center: self.center,
            radii: self.radii,
            start_angle: self.start_angle + self.sweep_angle,
            sweep_angle: -self.sweep_angle,
            x_rotation: self.x_rotation,
        }
    }

    /// Whether both radii are equal, up to roundoff.
    #[inline]
    pub fn is_circular(&self) -> bool {
        let (rx, ry) = (self.radii.x.abs(), self.radii.y.abs());
        (rx - ry).abs() <= 1e-9 * rx.max(ry)
    }

    /// Create an iterator generating Bézier path elements.
    ///
    /// The generated elements can be appended to an existing path, after
    /// the start point of the arc.
    pub fn append_iter(&self, tolerance: f64) -> ArcAppendIter {
        let scaled_err = self.radii.x.abs().max(self.radii.y.abs()) / tolerance;
        // Number of subdivisions per circle based on error tolerance.
        // Note: this may slightly underestimate the error for quadrants.
        let n_err = (1.1163 * scaled_err).powf(1.0 / 6.0).max(3.999_999);
        let n = (n_err * self.sweep_angle.abs() * (1.0 / (2.0 * PI))).ceil();
        let angle_step = if n > 0.0 { self.sweep_angle / n } else { 0.0 };
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).abs().tan() * self.sweep_angle.signum();
        let angle0 = self.start_angle;
        let p0 = sample_ellipse(self.radii, self.x_rotation, angle0);

        ArcAppendIter {
            idx: 0,

            center: self.center,
            radii: self.radii,
            x_rotation: self.x_rotation,
            n: n as usize,
            arm_len,
            angle_step,

            p0,
            angle0,
        }
    }

    /// Position of the point at `angle` on the underlying ellipse.
    #[inline]
    fn point_at_angle(&self, angle: f64) -> Point {
        self.center + sample_ellipse(self.radii, self.x_rotation, angle)
    }
}

/// An iterator yielding the cubic Bézier elements approximating an arc.
#[doc(hidden)]
#[derive(Debug)]
pub struct ArcAppendIter {
    idx: usize,

    center: Point,
    radii: Vec2,
    x_rotation: f64,
    n: usize,
    arm_len: f64,
    angle_step: f64,

    p0: Vec2,
    angle0: f64,
}

impl Iterator for ArcAppendIter {
    type Item = PathEl;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.n {
            return None;
        }

        let angle1 = self.angle0 + self.angle_step;
        let p0 = self.p0;
        let p1 = p0
            + self.arm_len * sample_ellipse(self.radii, self.x_rotation, self.angle0 + FRAC_PI_2);
        let p3 = sample_ellipse(self.radii, self.x_rotation, angle1);
        let p2 =
            p3 - self.arm_len * sample_ellipse(self.radii, self.x_rotation, angle1 + FRAC_PI_2);

        self.angle0 = angle1;
        self.p0 = p3;
        self.idx += 1;

        Some(PathEl::CurveTo(
            self.center + p1,
            self.center + p2,
            self.center + p3,
        ))
    }
}

/// Take the ellipse radii, how the radii are rotated, and the sweep angle,
/// and return a point on the ellipse.
fn sample_ellipse(radii: Vec2, x_rotation: f64, angle: f64) -> Vec2 {
    let (angle_sin, angle_cos) = angle.sin_cos();
    let u = radii.x * angle_cos;
    let v = radii.y * angle_sin;
    rotate_pt(Vec2::new(u, v), x_rotation)
}

/// Rotate `pt` about the origin by `angle` radians.
fn rotate_pt(pt: Vec2, angle: f64) -> Vec2 {
    let (angle_sin, angle_cos) = angle.sin_cos();
    Vec2::new(
        pt.x * angle_cos - pt.y * angle_sin,
        pt.x * angle_sin + pt.y * angle_cos,
    )
}

impl ParamCurve for Arc {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.point_at_angle(self.start_angle + self.sweep_angle * t)
    }

    /// The angular sub-range of the arc.
    fn subsegment(&self, range: Range<f64>) -> Arc {
        Arc {
            start_angle: self.start_angle + self.sweep_angle * range.start,
            sweep_angle: self.sweep_angle * (range.end - range.start),
            ..*self
        }
    }

    /// Split the arc by angle.
    ///
    /// The end of the first half is evaluated at exactly the angle the
    /// second half starts at.
    fn split(&self, t: f64) -> (Arc, Arc) {
        let first_sweep = self.sweep_angle * t;
        let mid = self.start_angle + first_sweep;
        (
            Arc {
                sweep_angle: first_sweep,
                ..*self
            },
            Arc {
                start_angle: mid,
                sweep_angle: self.start_angle + self.sweep_angle - mid,
                ..*self
            },
        )
    }
}

impl ParamCurveDeriv for Arc {
    type DerivResult = Arc;

    /// The derivative of an arc is again an arc, centered on the origin and
    /// a quarter turn ahead, with radii scaled by the sweep.
    fn deriv(&self) -> Arc {
        Arc {
            center: Point::ORIGIN,
            radii: self.radii * self.sweep_angle,
            start_angle: self.start_angle + FRAC_PI_2,
            sweep_angle: self.sweep_angle,
            x_rotation: self.x_rotation,
        }
    }
}

impl ParamCurveArclen for Arc {
    /// Arc length of the arc.
    ///
    /// Circular arcs are measured exactly. Elliptical arcs integrate the
    /// speed with 16-point Gauss-Legendre quadrature over pieces of at most
    /// a quarter turn, subdividing further until consecutive estimates agree
    /// within `accuracy`.
    fn arclen(&self, accuracy: f64) -> f64 {
        if self.is_circular() {
            return self.sweep_angle.abs() * self.radii.x.abs();
        }
        let rx = self.radii.x;
        let ry = self.radii.y;
        let speed = |th: f64| {
            let (s, c) = th.sin_cos();
            (rx * s).hypot(ry * c)
        };
        let sweep = self.sweep_angle.abs();
        let start = self.start_angle.min(self.start_angle + self.sweep_angle);
        let mut n = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        let integrate = |n: usize| {
            let step = sweep / n as f64;
            (0..n)
                .map(|i| {
                    let a = start + step * i as f64;
                    integrate_gl16(speed, a, a + step)
                })
                .sum::<f64>()
        };
        let mut est = integrate(n);
        // A handful of doublings is plenty; GL16 converges very fast on
        // smooth integrands.
        for _ in 0..4 {
            n *= 2;
            let refined = integrate(n);
            let done = (refined - est).abs() <= accuracy;
            est = refined;
            if done {
                break;
            }
        }
        est
    }

    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64 {
        if self.is_circular() {
            let total = self.sweep_angle.abs() * self.radii.x.abs();
            return if total > 0.0 {
                (arclen / total).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        // Bisection over increasingly short subsegments.
        let total = self.arclen(accuracy);
        if arclen <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        if arclen >= total {
            return 1.0;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut lo_len = 0.0;
        while hi - lo > accuracy.max(1e-12) {
            let mid = 0.5 * (lo + hi);
            let len = lo_len + self.subsegment(lo..mid).arclen(accuracy);
            if len < arclen {
                lo = mid;
                lo_len = len;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

impl ParamCurveArea for Arc {
    /// Signed area by Green's theorem.
    ///
    /// Relative to the center the integrand is constant, `rx * ry`, so the
    /// area is exact for elliptical arcs too.
    fn signed_area(&self) -> f64 {
        let e0 = sample_ellipse(self.radii, self.x_rotation, self.start_angle);
        let e1 = sample_ellipse(
            self.radii,
            self.x_rotation,
            self.start_angle + self.sweep_angle,
        );
        0.5 * (self.radii.x * self.radii.y * self.sweep_angle + self.center.to_vec2().cross(e1 - e0))
    }
}

impl ParamCurveExtrema for Arc {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        let mut result = ArrayVec::new();
        if self.sweep_angle == 0.0 {
            return result;
        }
        let (sin_phi, cos_phi) = self.x_rotation.sin_cos();
        let (rx, ry) = (self.radii.x, self.radii.y);
        let theta_x = (-ry * sin_phi).atan2(rx * cos_phi);
        let theta_y = (ry * cos_phi).atan2(rx * sin_phi);
        let sweep = self.sweep_angle.abs();
        for theta in [theta_x, theta_x + PI, theta_y, theta_y + PI] {
            let delta = if self.sweep_angle > 0.0 {
                rem_euclid(theta - self.start_angle, 2.0 * PI)
            } else {
                rem_euclid(self.start_angle - theta, 2.0 * PI)
            };
            let t = delta / sweep;
            if t > 0.0 && t < 1.0 && !result.is_full() {
                result.push(t);
            }
        }
        result.sort_by(|a, b| a.total_cmp(b));
        result
    }
}

impl Mul<Arc> for Affine {
    type Output = Arc;

    /// Map an arc through an affine transform.
    ///
    /// The ellipse axes are recovered from the singular value decomposition
    /// of the combined linear map. A transform that flips orientation also
    /// flips the direction of the sweep.
    fn mul(self, arc: Arc) -> Arc {
        let [a, b, c, d, _, _] = self.as_coeffs();
        let linear = Affine::new([a, b, c, d, 0.0, 0.0])
            * Affine::rotate(arc.x_rotation)
            * Affine::scale_non_uniform(arc.radii.x, arc.radii.y);
        let (radii, rotation) = linear.svd();
        let p = linear.apply_linear(Vec2::from_angle(arc.start_angle));
        let u = Affine::rotate(-rotation).apply_linear(p);
        let inv = |s: f64| if s > 0.0 { s.recip() } else { 0.0 };
        let start_angle = (u.y * inv(radii.y)).atan2(u.x * inv(radii.x));
        let orientation = if linear.determinant() < 0.0 { -1.0 } else { 1.0 };
        Arc {
            center: self * arc.center,
            radii,
            start_angle,
            sweep_angle: arc.sweep_angle * orientation,
            x_rotation: rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_ACCURACY;
    use core::f64::consts::PI;

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    #[test]
    fn reversed_arc() {
        let a = Arc::new((0., 0.), (1., 0.), 0., PI, 0.);
        let f = a.reversed();

        // Most fields should be unchanged:
        assert_eq!(a.center, f.center);
        assert_eq!(a.radii, f.radii);
        assert_eq!(a.x_rotation, f.x_rotation);

        // Sweep angle should be in reverse
        assert_eq!(a.sweep_angle, -f.sweep_angle);

        // Reversing it again should result in the original arc
        assert_eq!(a, f.reversed());
    }

    #[test]
    fn circular_arclen() {
        let a = Arc::circular((1.0, 2.0), 10.0, 0.3, -PI);
        assert!((a.arclen(DEFAULT_ACCURACY) - 10.0 * PI).abs() < 1e-12);
        assert!((a.inv_arclen(5.0 * PI, DEFAULT_ACCURACY) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn elliptical_arclen() {
        // Perimeter of an ellipse with semi-axes 2 and 1.
        let perimeter = 9.688448220547675;
        let a = Arc::new((0.0, 0.0), (2.0, 1.0), 0.0, 2.0 * PI, 0.4);
        assert!((a.arclen(1e-9) - perimeter).abs() < 1e-7);
        let (first, second) = a.split(0.3);
        let sum = first.arclen(1e-9) + second.arclen(1e-9);
        assert!((sum - perimeter).abs() < 1e-7);
        let t = a.inv_arclen(0.5 * perimeter, 1e-9);
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn split_shares_boundary() {
        let a = Arc::new((3.0, -1.0), (4.0, 2.0), 0.2, 2.5, 0.7);
        let (first, second) = a.split(0.37);
        assert_eq!(first.end(), second.start());
        assert_near(first.start(), a.start(), 1e-12);
        assert_near(second.end(), a.end(), 1e-12);
    }

    #[test]
    fn deriv_matches_finite_difference() {
        let a = Arc::new((3.0, -1.0), (4.0, 2.0), 0.2, -2.5, 0.7);
        let d = a.deriv();
        for i in 0..=10 {
            let t = i as f64 * 0.1;
            let delta = 1e-6;
            let approx = (a.eval(t + delta) - a.eval(t)) * delta.recip();
            assert!((d.eval(t).to_vec2() - approx).hypot() < 1e-4);
        }
    }

    #[test]
    fn half_disc_area() {
        let a = Arc::circular((0.0, 0.0), 1.0, 0.0, PI);
        assert!((a.signed_area() - 0.5 * PI).abs() < 1e-12);
        let moved = Affine::translate((5.0, 0.0)) * a;
        // Closing the chord adds a line with its own contribution.
        let chord = crate::Line::new(moved.end(), moved.start());
        let total = moved.signed_area() + chord.signed_area();
        assert!((total - 0.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_of_quarter() {
        let a = Arc::circular((0.0, 0.0), 1.0, -0.25 * PI, 0.5 * PI);
        let extrema = a.extrema();
        assert_eq!(extrema.len(), 1);
        assert!((extrema[0] - 0.5).abs() < 1e-12);
        let bbox = a.bounding_box();
        assert!((bbox.x1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transform_matches_pointwise() {
        let a = Arc::new((1.0, 2.0), (3.0, 1.5), 0.4, 2.0, 0.3);
        let affines = [
            Affine::translate((2.0, -1.0)) * Affine::rotate(0.8),
            Affine::scale_non_uniform(2.0, 0.5),
            Affine::scale_non_uniform(1.0, -1.0),
            Affine::new([1.0, 0.3, -0.2, 1.4, 5.0, 6.0]),
        ];
        for affine in affines {
            let mapped = affine * a;
            for i in 0..=8 {
                let t = i as f64 / 8.0;
                assert_near(mapped.eval(t), affine * a.eval(t), 1e-9);
            }
        }
    }

    #[test]
    fn append_iter_endpoints() {
        let a = Arc::new((0.0, 0.0), (10.0, 5.0), 0.0, -1.5 * PI, 0.2);
        let mut last = a.start();
        let mut count = 0;
        for el in a.append_iter(0.1) {
            if let PathEl::CurveTo(_, _, p3) = el {
                last = p3;
                count += 1;
            }
        }
        assert!(count >= 3);
        assert_near(last, a.end(), 1e-9);
    }
}
