// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve profiles: arc-length-addressable sequences of segments.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::{
    BezPath, CurvePoint, ParamCurveExtrema, PathSeg, PathSink, Point, Rect, Segment,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Endpoints closer than this are considered joined.
pub(crate) const JOIN_EPSILON: f64 = 1e-6;

/// Handle directions this close to exactly opposite count as a smooth join.
const MIRRORED_EPSILON: f64 = 1e-4;

/// An immutable sequence of segments, with its total arc length and the
/// sharpness of its joins.
///
/// `arclen` is always the sum of the segment arc lengths. `min_sin` is the
/// sine of half the sharpest angle between two joined segments whose
/// handles are not mirrored, in `[0, 1]`; it is `1` when there is no such
/// join. Stroke renderers use it to size miter joins.
///
/// A profile may hold several subcurves, see [`CurveProfile::subcurves`].
#[derive(Clone, Debug, PartialEq)]
pub struct CurveProfile {
    segments: Vec<Segment>,
    arclen: f64,
    min_sin: f64,
}

/// A maximal run of joined segments within a profile.
#[derive(Clone, Copy, Debug)]
pub struct Subcurve<'a> {
    /// The segments of the run.
    pub segments: &'a [Segment],
    /// Whether the run ends where it starts.
    pub closed: bool,
}

impl Default for CurveProfile {
    fn default() -> Self {
        CurveProfile::new()
    }
}

impl CurveProfile {
    /// The empty profile.
    pub const fn new() -> CurveProfile {
        CurveProfile {
            segments: Vec::new(),
            arclen: 0.0,
            min_sin: 1.0,
        }
    }

    /// The segments, in drawing order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total arc length.
    #[inline]
    pub fn arclen(&self) -> f64 {
        self.arclen
    }

    /// Sine of half the sharpest broken join.
    #[inline]
    pub fn min_sin(&self) -> f64 {
        self.min_sin
    }

    /// Whether the profile has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split the profile into maximal runs of joined segments.
    pub fn subcurves(&self) -> SmallVec<[Subcurve<'_>; 4]> {
        let mut result = SmallVec::new();
        let mut start = 0;
        for i in 1..=self.segments.len() {
            let broken = i == self.segments.len()
                || !joined(self.segments[i - 1].end(), self.segments[i].start());
            if broken {
                let segments = &self.segments[start..i];
                result.push(Subcurve {
                    segments,
                    closed: joined(segments[segments.len() - 1].end(), segments[0].start()),
                });
                start = i;
            }
        }
        result
    }

    /// The point at `distance` along the profile.
    ///
    /// The distance is clamped to the profile. An empty profile yields a
    /// default point at the origin.
    pub fn point_at_distance(&self, distance: f64) -> CurvePoint {
        point_along(&self.segments, self.arclen, distance)
    }

    /// Draw the part of the profile between two fractions of its arc
    /// length into `sink`.
    ///
    /// Each subcurve starts with a move. Closed subcurves drawn in full are
    /// closed. Returns the curve points at both ends of the drawn range, or
    /// `None` if nothing was drawn.
    pub fn draw(
        &self,
        sink: &mut impl PathSink,
        start: f64,
        end: f64,
    ) -> Option<(CurvePoint, CurvePoint)> {
        let start_d = start.max(0.0).min(1.0) * self.arclen;
        let end_d = end.max(0.0).min(1.0) * self.arclen;
        if self.is_empty() || end_d < start_d {
            return None;
        }
        let mut result: Option<(CurvePoint, CurvePoint)> = None;
        let mut offset = 0.0;
        for sub in self.subcurves() {
            let mut need_move = true;
            let mut whole = true;
            for seg in sub.segments {
                let seg_start = offset;
                let seg_end = offset + seg.arclen();
                offset = seg_end;
                let overlaps = if seg.arclen() > 0.0 {
                    seg_start < end_d && seg_end > start_d
                } else {
                    seg_start >= start_d && seg_start <= end_d
                };
                if !overlaps {
                    whole = false;
                    continue;
                }
                let (s, e) = if seg.arclen() > 0.0 {
                    (
                        (start_d - seg_start) / seg.arclen(),
                        (end_d - seg_start) / seg.arclen(),
                    )
                } else {
                    (0.0, 1.0)
                };
                if s > 0.0 || e < 1.0 {
                    whole = false;
                }
                let (a, b) = seg.draw(sink, s, e, need_move);
                need_move = false;
                result = Some(match result {
                    Some((first, _)) => (first, b),
                    None => (a, b),
                });
            }
            if sub.closed && whole && !need_move {
                sink.close_path();
            }
        }
        result
    }

    /// The smallest rectangle enclosing every segment.
    ///
    /// An empty profile yields [`Rect::ZERO`].
    pub fn bounding_box(&self) -> Rect {
        let mut boxes = self.segments.iter().map(|s| s.path_seg().bounding_box());
        match boxes.next() {
            Some(first) => boxes.fold(first, |acc, b| acc.union(b)),
            None => Rect::ZERO,
        }
    }

    /// The whole profile as a Bézier path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        self.draw(&mut path, 0.0, 1.0);
        path
    }

    /// Join several profiles into one.
    ///
    /// Arc lengths are summed and the sharpest join wins.
    pub fn concat(profiles: impl IntoIterator<Item = CurveProfile>) -> CurveProfile {
        let mut result = CurveProfile::new();
        for profile in profiles {
            result.segments.extend(profile.segments);
            result.arclen += profile.arclen;
            result.min_sin = result.min_sin.min(profile.min_sin);
        }
        result
    }
}

impl<'a> Subcurve<'a> {
    /// Total arc length of the run.
    pub fn arclen(&self) -> f64 {
        self.segments.iter().map(Segment::arclen).sum()
    }

    /// The first point of the run.
    pub fn start(&self) -> Point {
        self.segments.first().map(Segment::start).unwrap_or_default()
    }

    /// The point at `distance` along the run, clamped to the run.
    pub fn point_at_distance(&self, distance: f64) -> CurvePoint {
        point_along(self.segments, self.arclen(), distance)
    }

    /// Whether every segment of the run is a straight line.
    pub fn is_polyline(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s.path_seg(), PathSeg::Line(_)))
    }
}

fn point_along(segments: &[Segment], arclen: f64, distance: f64) -> CurvePoint {
    let Some(last) = segments.last() else {
        return CurvePoint::default();
    };
    let mut remaining = distance.max(0.0).min(arclen);
    for seg in segments {
        if remaining <= seg.arclen() {
            let fraction = if seg.arclen() > 0.0 {
                remaining / seg.arclen()
            } else {
                0.0
            };
            return seg.point_at(fraction);
        }
        remaining -= seg.arclen();
    }
    last.point_at(1.0)
}

#[inline]
fn joined(a: Point, b: Point) -> bool {
    a.distance_squared(b) <= JOIN_EPSILON * JOIN_EPSILON
}

/// Accumulates segments into a [`CurveProfile`].
#[derive(Debug)]
pub(crate) struct ProfileBuilder {
    segments: Vec<Segment>,
    arclen: f64,
    min_sin: f64,
}

impl ProfileBuilder {
    pub(crate) fn new() -> Self {
        ProfileBuilder {
            segments: Vec::new(),
            arclen: 0.0,
            min_sin: 1.0,
        }
    }

    /// Append a segment, measuring its length.
    pub(crate) fn push(&mut self, seg: impl Into<PathSeg>) {
        let seg = Segment::new(seg);
        self.arclen += seg.arclen();
        self.segments.push(seg);
    }

    /// Record the sine of half a join angle.
    pub(crate) fn note_sin(&mut self, sin: f64) {
        self.min_sin = self.min_sin.min(sin.abs());
    }

    pub(crate) fn finish(self) -> CurveProfile {
        CurveProfile {
            segments: self.segments,
            arclen: self.arclen,
            min_sin: self.min_sin.max(0.0).min(1.0),
        }
    }

    /// Finish, after scanning cubic joins for broken handles.
    pub(crate) fn finish_with_cubic_joins(mut self) -> CurveProfile {
        let sin = cubic_joins_min_sin(&self.segments);
        self.note_sin(sin);
        self.finish()
    }
}

/// The sharpest broken join between cyclically adjacent cubic segments.
///
/// Only pairs of joined cubics count; other segment kinds cannot carry a
/// broken handle. Pairs whose handles are mirrored, or where a handle
/// collapses onto its end point, are smooth and skipped. Returns `1` when
/// no join is broken.
pub(crate) fn cubic_joins_min_sin(segments: &[Segment]) -> f64 {
    let mut min_sin = 1.0f64;
    let n = segments.len();
    for i in 0..n {
        let (PathSeg::Cubic(a), PathSeg::Cubic(b)) =
            (segments[i].path_seg(), segments[(i + 1) % n].path_seg())
        else {
            continue;
        };
        if !joined(a.p3, b.p0) {
            continue;
        }
        let incoming = (a.p2 - a.p3).normalize_or_zero();
        let outgoing = (b.p1 - b.p0).normalize_or_zero();
        if incoming.hypot2() == 0.0 || outgoing.hypot2() == 0.0 {
            continue;
        }
        let dot = incoming.dot(outgoing).clamp(-1.0, 1.0);
        if 1.0 + dot < MIRRORED_EPSILON {
            continue;
        }
        let angle = dot.acos();
        min_sin = min_sin.min((0.5 * angle).sin().abs());
    }
    min_sin
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_1_SQRT_2;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{cubic_joins_min_sin, ProfileBuilder};
    use crate::{BezPath, CubicBez, CurveProfile, Line, PathEl, Point, QuadBez, Rect, Segment};

    fn square(origin: Point, size: f64) -> CurveProfile {
        let mut b = ProfileBuilder::new();
        let p = |x: f64, y: f64| Point::new(origin.x + x * size, origin.y + y * size);
        b.push(Line::new(p(0.0, 0.0), p(1.0, 0.0)));
        b.push(Line::new(p(1.0, 0.0), p(1.0, 1.0)));
        b.push(Line::new(p(1.0, 1.0), p(0.0, 1.0)));
        b.push(Line::new(p(0.0, 1.0), p(0.0, 0.0)));
        b.note_sin(FRAC_1_SQRT_2);
        b.finish()
    }

    #[test]
    fn arclen_is_sum_of_segments() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let mut b = ProfileBuilder::new();
            let mut last = Point::new(0.0, 0.0);
            for _ in 0..rng.random_range(1..12) {
                let next = Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
                let ctrl = Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
                if rng.random_bool(0.5) {
                    b.push(Line::new(last, next));
                } else {
                    b.push(QuadBez::new(last, ctrl, next));
                }
                last = next;
            }
            let profile = b.finish();
            let sum: f64 = profile.segments().iter().map(Segment::arclen).sum();
            assert!((profile.arclen() - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_profile() {
        let p = CurveProfile::new();
        assert!(p.is_empty());
        assert_eq!(p.arclen(), 0.0);
        assert_eq!(p.min_sin(), 1.0);
        assert!(p.subcurves().is_empty());
        assert_eq!(p.bounding_box(), Rect::ZERO);
        assert!(p.to_bez_path().elements().is_empty());
        assert_eq!(p.point_at_distance(3.0).position, Point::ZERO);
    }

    #[test]
    fn subcurves_split_at_breaks() {
        let a = square(Point::new(0.0, 0.0), 10.0);
        let mut b = ProfileBuilder::new();
        b.push(Line::new((20.0, 0.0), (30.0, 0.0)));
        b.push(Line::new((30.0, 0.0), (30.0, 5.0)));
        let combined = CurveProfile::concat([a, b.finish()]);
        let subs = combined.subcurves();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].segments.len(), 4);
        assert!(subs[0].closed);
        assert!(!subs[1].closed);
        assert!(subs[1].is_polyline());
        assert_eq!(subs[1].start(), Point::new(20.0, 0.0));
        assert_eq!(combined.arclen(), 55.0);
        assert_eq!(combined.min_sin(), FRAC_1_SQRT_2);
    }

    #[test]
    fn point_at_distance_walks_segments() {
        let sq = square(Point::ZERO, 10.0);
        assert_eq!(sq.point_at_distance(15.0).position, Point::new(10.0, 5.0));
        assert_eq!(sq.point_at_distance(-1.0).position, Point::ZERO);
        assert_eq!(sq.point_at_distance(100.0).position, Point::ZERO);
        let cp = sq.point_at_distance(25.0);
        assert_eq!(cp.position, Point::new(5.0, 10.0));
        assert_eq!(cp.tangent.x, -1.0);
    }

    #[test]
    fn draw_range() {
        let sq = square(Point::ZERO, 10.0);
        let path = sq.to_bez_path();
        assert_eq!(path.elements().len(), 6);
        assert_eq!(path.elements()[0], PathEl::MoveTo(Point::ZERO));
        assert_eq!(path.elements()[5], PathEl::ClosePath);

        let mut partial = BezPath::new();
        let (s, e) = sq.draw(&mut partial, 0.125, 0.625).unwrap_or_default();
        assert_eq!(s.position, Point::new(5.0, 0.0));
        assert_eq!(e.position, Point::new(5.0, 10.0));
        assert_eq!(
            partial.elements(),
            &[
                PathEl::MoveTo(Point::new(5.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 10.0)),
                PathEl::LineTo(Point::new(5.0, 10.0)),
            ]
        );
        assert!(sq.draw(&mut partial, 0.7, 0.2).is_none());
    }

    #[test]
    fn bounding_box_includes_curves() {
        let mut b = ProfileBuilder::new();
        b.push(QuadBez::new((0.0, 0.0), (5.0, 10.0), (10.0, 0.0)));
        let p = b.finish();
        let bbox = p.bounding_box();
        assert_eq!(bbox.x0, 0.0);
        assert_eq!(bbox.x1, 10.0);
        assert!((bbox.y1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn cubic_join_sharpness() {
        // A right angle between two cubics.
        let a = Segment::new(CubicBez::new((0.0, 0.0), (3.0, 0.0), (7.0, 0.0), (10.0, 0.0)));
        let b = Segment::new(CubicBez::new((10.0, 0.0), (10.0, 3.0), (10.0, 7.0), (10.0, 10.0)));
        let sin = cubic_joins_min_sin(&[a.clone(), b.clone()]);
        assert!((sin - FRAC_1_SQRT_2).abs() < 1e-12);

        // Mirrored handles are smooth.
        let c = Segment::new(CubicBez::new((10.0, 0.0), (13.0, 0.0), (17.0, 0.0), (20.0, 0.0)));
        assert_eq!(cubic_joins_min_sin(&[a.clone(), c]), 1.0);

        // A handle collapsed onto its end point is skipped.
        let d = Segment::new(CubicBez::new((10.0, 0.0), (10.0, 0.0), (10.0, 7.0), (10.0, 10.0)));
        assert_eq!(cubic_joins_min_sin(&[a.clone(), d]), 1.0);

        // Lines never count.
        let l = Segment::new(Line::new((10.0, 0.0), (10.0, 10.0)));
        assert_eq!(cubic_joins_min_sin(&[a, l]), 1.0);
    }
}
