// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path segments and their arc-length-aware wrapper.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::{
    Affine, Arc, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveDeriv,
    ParamCurveExtrema, PathSink, Point, QuadBez, UniformSampler, Vec2, DEFAULT_ACCURACY,
    MAX_EXTREMA,
};

/// A segment of a curve profile.
///
/// The set of variants is closed; every capability dispatches by `match`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// An elliptical arc.
    Arc(Arc),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

/// Position, unit tangent and unit normal at one point of a segment.
///
/// The normal is the tangent turned by 90 degrees. Both are the zero vector
/// where the curve has no defined direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// The point on the curve.
    pub position: Point,
    /// The direction of travel.
    pub tangent: Vec2,
    /// The tangent rotated by 90 degrees.
    pub normal: Vec2,
}

impl CurvePoint {
    fn from_deriv(position: Point, deriv: Vec2) -> CurvePoint {
        let tangent = deriv.normalize_or_zero();
        CurvePoint {
            position,
            tangent,
            normal: tangent.turn_90(),
        }
    }
}

impl PathSeg {
    /// The control and end points, in order.
    ///
    /// Arcs report their start and end points.
    pub fn points(&self) -> ArrayVec<Point, 4> {
        let mut points = ArrayVec::new();
        match *self {
            PathSeg::Line(line) => points.extend([line.p0, line.p1]),
            PathSeg::Arc(arc) => points.extend([arc.start(), arc.end()]),
            PathSeg::Quad(quad) => points.extend([quad.p0, quad.p1, quad.p2]),
            PathSeg::Cubic(cubic) => points.extend([cubic.p0, cubic.p1, cubic.p2, cubic.p3]),
        }
        points
    }

    /// The derivative at `t`.
    ///
    /// Polynomial segments evaluate their power-basis derivative.
    pub fn deriv_at(&self, t: f64) -> Vec2 {
        match *self {
            PathSeg::Line(line) => line.to_poly().eval_deriv(t),
            PathSeg::Arc(arc) => arc.deriv().eval(t).to_vec2(),
            PathSeg::Quad(quad) => quad.to_poly().eval_deriv(t),
            PathSeg::Cubic(cubic) => cubic.to_poly().eval_deriv(t),
        }
    }

    /// Returns a copy traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.reversed()),
            PathSeg::Arc(arc) => PathSeg::Arc(arc.reversed()),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.reversed()),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.reversed()),
        }
    }

    /// Whether the segment's parameter is proportional to arc length.
    ///
    /// Such segments map distance fractions to parameters in closed form.
    pub fn is_uniform(&self) -> bool {
        match self {
            PathSeg::Line(_) => true,
            PathSeg::Arc(arc) => arc.is_circular(),
            PathSeg::Quad(_) | PathSeg::Cubic(_) => false,
        }
    }

    /// Emit the drawing primitive for this segment, without a leading
    /// move.
    pub fn emit(&self, sink: &mut impl PathSink) {
        match *self {
            PathSeg::Line(line) => sink.line_to(line.p1),
            PathSeg::Arc(arc) => sink.arc_to(&arc),
            PathSeg::Quad(quad) => sink.quad_to(quad.p1, quad.p2),
            PathSeg::Cubic(cubic) => sink.curve_to(cubic.p1, cubic.p2, cubic.p3),
        }
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Arc(arc) => arc.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Arc(arc) => PathSeg::Arc(arc.subsegment(range)),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn split(&self, t: f64) -> (PathSeg, PathSeg) {
        match *self {
            PathSeg::Line(line) => {
                let (a, b) = line.split(t);
                (PathSeg::Line(a), PathSeg::Line(b))
            }
            PathSeg::Arc(arc) => {
                let (a, b) = arc.split(t);
                (PathSeg::Arc(a), PathSeg::Arc(b))
            }
            PathSeg::Quad(quad) => {
                let (a, b) = quad.split(t);
                (PathSeg::Quad(a), PathSeg::Quad(b))
            }
            PathSeg::Cubic(cubic) => {
                let (a, b) = cubic.split(t);
                (PathSeg::Cubic(a), PathSeg::Cubic(b))
            }
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.start(),
            PathSeg::Arc(arc) => arc.start(),
            PathSeg::Quad(quad) => quad.start(),
            PathSeg::Cubic(cubic) => cubic.start(),
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.end(),
            PathSeg::Arc(arc) => arc.end(),
            PathSeg::Quad(quad) => quad.end(),
            PathSeg::Cubic(cubic) => cubic.end(),
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.arclen(accuracy),
            PathSeg::Arc(arc) => arc.arclen(accuracy),
            PathSeg::Quad(quad) => quad.arclen(accuracy),
            PathSeg::Cubic(cubic) => cubic.arclen(accuracy),
        }
    }

    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.inv_arclen(arclen, accuracy),
            PathSeg::Arc(arc) => arc.inv_arclen(arclen, accuracy),
            PathSeg::Quad(quad) => quad.inv_arclen(arclen, accuracy),
            PathSeg::Cubic(cubic) => cubic.inv_arclen(arclen, accuracy),
        }
    }
}

impl ParamCurveArea for PathSeg {
    fn signed_area(&self) -> f64 {
        match *self {
            PathSeg::Line(line) => line.signed_area(),
            PathSeg::Arc(arc) => arc.signed_area(),
            PathSeg::Quad(quad) => quad.signed_area(),
            PathSeg::Cubic(cubic) => cubic.signed_area(),
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match *self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Arc(arc) => arc.extrema(),
            PathSeg::Quad(quad) => quad.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
        }
    }
}

impl Mul<PathSeg> for Affine {
    type Output = PathSeg;

    fn mul(self, other: PathSeg) -> PathSeg {
        match other {
            PathSeg::Line(line) => PathSeg::Line(self * line),
            PathSeg::Arc(arc) => PathSeg::Arc(self * arc),
            PathSeg::Quad(quad) => PathSeg::Quad(self * quad),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(self * cubic),
        }
    }
}

impl From<Line> for PathSeg {
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<Arc> for PathSeg {
    fn from(arc: Arc) -> PathSeg {
        PathSeg::Arc(arc)
    }
}

impl From<QuadBez> for PathSeg {
    fn from(quad: QuadBez) -> PathSeg {
        PathSeg::Quad(quad)
    }
}

impl From<CubicBez> for PathSeg {
    fn from(cubic: CubicBez) -> PathSeg {
        PathSeg::Cubic(cubic)
    }
}

/// A path segment with its cached arc length.
///
/// Segments whose parameter is not proportional to arc length also carry a
/// [`UniformSampler`], so that fractions of the segment's length can be
/// mapped to points.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    seg: PathSeg,
    arclen: f64,
    sampler: Option<UniformSampler<PathSeg>>,
}

impl Segment {
    /// Wrap a path segment, measuring its arc length.
    pub fn new(seg: impl Into<PathSeg>) -> Segment {
        let seg = seg.into();
        let arclen = seg.arclen(DEFAULT_ACCURACY);
        Segment::with_arclen(seg, arclen)
    }

    fn with_arclen(seg: PathSeg, arclen: f64) -> Segment {
        let sampler = (!seg.is_uniform()).then(|| UniformSampler::new(seg, arclen));
        Segment {
            seg,
            arclen,
            sampler,
        }
    }

    /// The wrapped path segment.
    #[inline]
    pub fn path_seg(&self) -> PathSeg {
        self.seg
    }

    /// The control and end points, in order.
    #[inline]
    pub fn points(&self) -> ArrayVec<Point, 4> {
        self.seg.points()
    }

    /// The cached arc length.
    #[inline]
    pub fn arclen(&self) -> f64 {
        self.arclen
    }

    /// The start point.
    #[inline]
    pub fn start(&self) -> Point {
        self.seg.start()
    }

    /// The end point.
    #[inline]
    pub fn end(&self) -> Point {
        self.seg.end()
    }

    /// The arc length sampler, for segments that need one.
    #[inline]
    pub fn sampler(&self) -> Option<&UniformSampler<PathSeg>> {
        self.sampler.as_ref()
    }

    /// Position, tangent and normal at parameter `t`.
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn eval(&self, t: f64) -> CurvePoint {
        let t = clamp_unit(t);
        CurvePoint::from_deriv(self.seg.eval(t), self.seg.deriv_at(t))
    }

    /// Map a fraction of this segment's arc length to a parameter.
    ///
    /// The fraction is clamped to `[0, 1]`.
    pub fn fraction_to_t(&self, fraction: f64) -> f64 {
        let fraction = clamp_unit(fraction);
        match &self.sampler {
            Some(sampler) => sampler.distance_to_t(fraction * self.arclen),
            None => fraction,
        }
    }

    /// The point at a fraction of this segment's arc length.
    pub fn point_at(&self, fraction: f64) -> CurvePoint {
        self.eval(self.fraction_to_t(fraction))
    }

    /// Split the segment at parameter `t`.
    ///
    /// Both halves are of the same kind, and the end of the first is the
    /// start of the second. Splitting at 0 or 1 yields a zero-length half.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        let (a, b) = self.seg.split(clamp_unit(t));
        (Segment::new(a), Segment::new(b))
    }

    /// Draw the part of the segment between two fractions of its arc
    /// length into `sink`.
    ///
    /// With `move_first`, a move to the start of the visible piece is
    /// emitted first. Returns the curve points at both ends of the piece,
    /// with tangents in the direction of travel.
    pub fn draw(
        &self,
        sink: &mut impl PathSink,
        start: f64,
        end: f64,
        move_first: bool,
    ) -> (CurvePoint, CurvePoint) {
        let start = clamp_unit(start);
        let end = clamp_unit(end).max(start);
        let t0 = self.fraction_to_t(start);
        let t1 = self.fraction_to_t(end);
        let piece = if start == 0.0 && end == 1.0 {
            self.seg
        } else {
            let (_, tail) = self.seg.split(t0);
            let rest = 1.0 - t0;
            let relative = if rest > 0.0 { (t1 - t0) / rest } else { 0.0 };
            tail.split(clamp_unit(relative)).0
        };
        if move_first {
            sink.move_to(piece.start());
        }
        piece.emit(sink);
        (self.eval(t0), self.eval(t1))
    }

    /// Map the segment through an affine transform.
    pub fn transform(&self, affine: Affine) -> Segment {
        Segment::new(affine * self.seg)
    }

    /// Returns a copy traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Segment {
        Segment::with_arclen(self.seg.reversed(), self.arclen)
    }
}

impl From<PathSeg> for Segment {
    fn from(seg: PathSeg) -> Segment {
        Segment::new(seg)
    }
}

impl Mul<&Segment> for Affine {
    type Output = Segment;

    fn mul(self, other: &Segment) -> Segment {
        other.transform(self)
    }
}

/// Saturating clamp to the unit interval, sending NaN to 0.
#[inline]
pub(crate) fn clamp_unit(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else if t > 0.0 {
        t
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::clamp_unit;
    use crate::{
        Affine, Arc, BezPath, CubicBez, Line, PathEl, PathSeg, Point, QuadBez, Segment, Vec2,
    };

    fn pt(rng: &mut StdRng) -> Point {
        Point::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0))
    }

    fn random_seg(rng: &mut StdRng) -> PathSeg {
        match rng.random_range(0..4) {
            0 => Line::new(pt(rng), pt(rng)).into(),
            1 => QuadBez::new(pt(rng), pt(rng), pt(rng)).into(),
            2 => CubicBez::new(pt(rng), pt(rng), pt(rng), pt(rng)).into(),
            _ => Arc::new(
                pt(rng),
                (rng.random_range(1.0..50.0), rng.random_range(1.0..50.0)),
                rng.random_range(-PI..PI),
                rng.random_range(-2.0 * PI..2.0 * PI),
                rng.random_range(-PI..PI),
            )
            .into(),
        }
    }

    #[test]
    fn split_preserves_length_and_boundary() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let seg = Segment::new(random_seg(&mut rng));
            let t = rng.random_range(0.0..=1.0);
            let (a, b) = seg.split(t);
            assert_eq!(a.end(), b.start());
            assert_eq!(
                core::mem::discriminant(&a.path_seg()),
                core::mem::discriminant(&seg.path_seg())
            );
            let sum = a.arclen() + b.arclen();
            assert!(
                (sum - seg.arclen()).abs() < 1e-4 * seg.arclen().max(1.0),
                "{:?} at {t}: {sum} vs {}",
                seg.path_seg(),
                seg.arclen()
            );
        }
    }

    #[test]
    fn split_at_ends_is_degenerate() {
        let seg = Segment::new(CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0)));
        let (a, b) = seg.split(0.0);
        assert_eq!(a.arclen(), 0.0);
        assert_eq!(b.path_seg(), seg.path_seg());
        let (a, b) = seg.split(1.0);
        assert_eq!(b.arclen(), 0.0);
        assert_eq!(a.path_seg(), seg.path_seg());
    }

    #[test]
    fn eval_tangent_and_normal() {
        let seg = Segment::new(Line::new((0.0, 0.0), (10.0, 0.0)));
        let p = seg.eval(0.5);
        assert_eq!(p.position, Point::new(5.0, 0.0));
        assert_eq!(p.tangent, Vec2::new(1.0, 0.0));
        assert_eq!(p.normal, Vec2::new(0.0, 1.0));

        // Out of range parameters saturate.
        assert_eq!(seg.eval(3.0).position, Point::new(10.0, 0.0));
        assert_eq!(seg.eval(f64::NAN).position, Point::new(0.0, 0.0));

        let arc = Segment::new(Arc::circular((0.0, 0.0), 1.0, 0.0, FRAC_PI_2));
        let p = arc.eval(0.0);
        assert!((p.tangent - Vec2::new(0.0, 1.0)).hypot() < 1e-12);
    }

    #[test]
    fn zero_length_segment_is_safe() {
        let p = Point::new(2.0, 2.0);
        let seg = Segment::new(CubicBez::new(p, p, p, p));
        assert_eq!(seg.arclen(), 0.0);
        let cp = seg.point_at(0.5);
        assert_eq!(cp.position, p);
        assert_eq!(cp.tangent, Vec2::ZERO);
        assert_eq!(cp.normal, Vec2::ZERO);
    }

    #[test]
    fn point_at_is_uniform() {
        let seg = Segment::new(CubicBez::new(
            (0.0, 0.0),
            (10.0, 0.0),
            (90.0, 0.0),
            (100.0, 0.0),
        ));
        for i in 0..=10 {
            let f = i as f64 / 10.0;
            let x = seg.point_at(f).position.x;
            assert!((x - 100.0 * f).abs() < 0.5, "{x} at {f}");
        }
        let arc = Segment::new(Arc::circular((0.0, 0.0), 2.0, 0.0, PI));
        assert!(arc.sampler().is_none());
        let mid = arc.point_at(0.5).position;
        assert!((mid - Point::new(0.0, 2.0)).hypot() < 1e-12);
    }

    #[test]
    fn draw_full_and_partial() {
        let seg = Segment::new(QuadBez::new((0.0, 0.0), (50.0, 50.0), (100.0, 0.0)));
        let mut path = BezPath::new();
        let (s, e) = seg.draw(&mut path, 0.0, 1.0, true);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::QuadTo(Point::new(50.0, 50.0), Point::new(100.0, 0.0)),
            ]
        );
        assert_eq!(s.position, Point::new(0.0, 0.0));
        assert_eq!(e.position, Point::new(100.0, 0.0));

        let mut path = BezPath::new();
        let (s, e) = seg.draw(&mut path, 0.25, 0.75, false);
        assert_eq!(path.elements().len(), 1);
        let PathEl::QuadTo(_, end) = path.elements()[0] else {
            panic!("expected a quad");
        };
        assert!((end - e.position).hypot() < 1e-9);
        assert!(s.position.x < 50.0 && e.position.x > 50.0);
    }

    #[test]
    fn transform_and_reverse() {
        let seg = Segment::new(Line::new((0.0, 0.0), (3.0, 4.0)));
        let moved = seg.transform(Affine::scale(2.0));
        assert_eq!(moved.arclen(), 10.0);
        let back = seg.reversed();
        assert_eq!(back.start(), seg.end());
        assert_eq!(back.arclen(), seg.arclen());
    }

    #[test]
    fn clamp_unit_saturates() {
        assert_eq!(clamp_unit(-1.0), 0.0);
        assert_eq!(clamp_unit(2.0), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
