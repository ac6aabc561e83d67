// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth splines through knots.

use alloc::vec::Vec;

use crate::profile::ProfileBuilder;
use crate::{CubicBez, CurveProfile, Point, QuadBez};

/// The default handle length coefficient for automatic handles.
pub const DEFAULT_SMOOTHNESS: f64 = 0.4;

/// How far each handle of a [`Knot`] follows the automatic handle.
///
/// `0` keeps the handle as given, `1` replaces it with the automatic one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotAuto {
    /// Blend of the incoming handle.
    pub start: f64,
    /// Blend of the outgoing handle.
    pub end: f64,
}

/// A point a spline passes through, with its two handles.
///
/// Handles are absolute positions. The start handle shapes the segment
/// arriving at the knot, the end handle the segment leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Knot {
    /// The point on the spline.
    pub position: Point,
    /// The incoming handle.
    pub start_handle: Point,
    /// The outgoing handle.
    pub end_handle: Point,
    /// Blend towards the automatic handles.
    pub auto: KnotAuto,
}

impl Knot {
    /// A knot with fully automatic handles.
    pub fn new(position: impl Into<Point>) -> Knot {
        let position = position.into();
        Knot {
            position,
            start_handle: position,
            end_handle: position,
            auto: KnotAuto {
                start: 1.0,
                end: 1.0,
            },
        }
    }

    /// A knot with a manual incoming handle; the outgoing handle mirrors it.
    pub fn with_handles(position: impl Into<Point>, start_handle: impl Into<Point>) -> Knot {
        let position = position.into();
        let start_handle = start_handle.into();
        Knot {
            position,
            start_handle,
            end_handle: position + (position - start_handle),
            auto: KnotAuto {
                start: 0.0,
                end: 0.0,
            },
        }
    }
}

/// Build a profile for a spline passing through `knots`.
///
/// Automatic handles are parallel to the line joining a knot's
/// neighbours, with lengths weighted by the distances to each neighbour
/// and scaled by `smoothness`. Neighbours wrap around even for open
/// splines. Open splines start and end with a quadratic segment where the
/// boundary knot is fully automatic.
///
/// Fewer than two knots give the empty profile.
pub fn bezier_spline_profile(knots: &[Knot], closed: bool, smoothness: f64) -> CurveProfile {
    let n = knots.len();
    if n < 2 {
        return CurveProfile::new();
    }
    let knots: Vec<Knot> = (0..n)
        .map(|i| {
            let prev = knots[(i + n - 1) % n].position;
            let next = knots[(i + 1) % n].position;
            smoothed(knots[i], prev, next, smoothness)
        })
        .collect();

    let mut builder = ProfileBuilder::new();
    for i in 0..n - 1 {
        let (a, b) = (&knots[i], &knots[i + 1]);
        if !closed && i == 0 && a.auto.end == 1.0 {
            builder.push(QuadBez::new(a.position, b.start_handle, b.position));
        } else if !closed && i == n - 2 && b.auto.start == 1.0 {
            builder.push(QuadBez::new(a.position, a.end_handle, b.position));
        } else {
            builder.push(CubicBez::new(
                a.position,
                a.end_handle,
                b.start_handle,
                b.position,
            ));
        }
    }
    if closed {
        let (a, b) = (&knots[n - 1], &knots[0]);
        builder.push(CubicBez::new(
            a.position,
            a.end_handle,
            b.start_handle,
            b.position,
        ));
    }
    builder.finish_with_cubic_joins()
}

/// Blend the knot's handles towards the automatic ones.
fn smoothed(knot: Knot, prev: Point, next: Point, smoothness: f64) -> Knot {
    let cur = knot.position;
    let d1 = cur.distance(prev);
    let d2 = next.distance(cur);
    let total = d1 + d2;
    let (auto_start, auto_end) = if total > 0.0 {
        let dir = (next - prev) * smoothness;
        (cur - dir * (d1 / total), cur + dir * (d2 / total))
    } else {
        (cur, cur)
    };
    Knot {
        start_handle: knot.start_handle.lerp(auto_start, knot.auto.start),
        end_handle: knot.end_handle.lerp(auto_end, knot.auto.end),
        ..knot
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_1_SQRT_2;

    use super::{bezier_spline_profile, smoothed, Knot, KnotAuto, DEFAULT_SMOOTHNESS};
    use crate::{PathSeg, Point};

    #[test]
    fn too_few_knots() {
        assert!(bezier_spline_profile(&[], false, DEFAULT_SMOOTHNESS).is_empty());
        assert!(bezier_spline_profile(&[Knot::new((1.0, 1.0))], true, DEFAULT_SMOOTHNESS).is_empty());
    }

    #[test]
    fn open_auto_spline_uses_quads_at_ends() {
        let knots = [
            Knot::new((0.0, 0.0)),
            Knot::new((10.0, 10.0)),
            Knot::new((20.0, 0.0)),
            Knot::new((30.0, 10.0)),
        ];
        let p = bezier_spline_profile(&knots, false, DEFAULT_SMOOTHNESS);
        let kinds: [bool; 3] = core::array::from_fn(|i| {
            matches!(p.segments()[i].path_seg(), PathSeg::Quad(_))
        });
        assert_eq!(p.segments().len(), 3);
        assert_eq!(kinds, [true, false, true]);
        assert_eq!(p.segments()[0].start(), Point::new(0.0, 0.0));
        assert_eq!(p.segments()[2].end(), Point::new(30.0, 10.0));
        assert_eq!(p.subcurves().len(), 1);
    }

    #[test]
    fn two_auto_knots() {
        let knots = [Knot::new((0.0, 0.0)), Knot::new((10.0, 0.0))];
        let p = bezier_spline_profile(&knots, false, DEFAULT_SMOOTHNESS);
        assert_eq!(p.segments().len(), 1);
        assert!(matches!(p.segments()[0].path_seg(), PathSeg::Quad(_)));
        assert!((p.arclen() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn closed_auto_spline_is_smooth() {
        let knots = [
            Knot::new((0.0, 0.0)),
            Knot::new((10.0, 0.0)),
            Knot::new((10.0, 10.0)),
            Knot::new((0.0, 10.0)),
        ];
        let p = bezier_spline_profile(&knots, true, DEFAULT_SMOOTHNESS);
        assert_eq!(p.segments().len(), 4);
        assert!(p
            .segments()
            .iter()
            .all(|s| matches!(s.path_seg(), PathSeg::Cubic(_))));
        let subs = p.subcurves();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        assert_eq!(p.min_sin(), 1.0);
    }

    #[test]
    fn manual_corner_is_broken() {
        let manual = |position: (f64, f64), start: (f64, f64), end: (f64, f64)| Knot {
            position: position.into(),
            start_handle: start.into(),
            end_handle: end.into(),
            auto: KnotAuto {
                start: 0.0,
                end: 0.0,
            },
        };
        let knots = [
            manual((0.0, 0.0), (0.0, 0.0), (3.0, 0.0)),
            manual((10.0, 0.0), (5.0, 0.0), (10.0, 5.0)),
            manual((10.0, 10.0), (10.0, 7.0), (10.0, 10.0)),
        ];
        let p = bezier_spline_profile(&knots, false, DEFAULT_SMOOTHNESS);
        assert!((p.min_sin() - FRAC_1_SQRT_2).abs() < 1e-12);

        // A mirrored handle is smooth.
        let knots = [
            manual((0.0, 0.0), (0.0, 0.0), (3.0, 0.0)),
            Knot::with_handles((10.0, 0.0), (5.0, 0.0)),
            manual((20.0, 0.0), (17.0, 0.0), (20.0, 0.0)),
        ];
        let p = bezier_spline_profile(&knots, false, DEFAULT_SMOOTHNESS);
        assert_eq!(p.min_sin(), 1.0);
    }

    #[test]
    fn auto_blend() {
        let knot = Knot {
            auto: KnotAuto {
                start: 0.5,
                end: 0.0,
            },
            ..Knot::with_handles((10.0, 0.0), (10.0, -4.0))
        };
        let s = smoothed(knot, Point::new(0.0, 0.0), Point::new(20.0, 0.0), 0.5);
        // Automatic handles are (5, 0) and (15, 0).
        assert_eq!(s.start_handle, Point::new(7.5, -2.0));
        assert_eq!(s.end_handle, Point::new(10.0, 4.0));
        assert_eq!(s.position, knot.position);
    }
}
