// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Profiles of rounded rectangles and polylines.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

use crate::common::rem_euclid;
use crate::profile::ProfileBuilder;
use crate::{Arc, CubicBez, CurveProfile, Line, Point, Rect, RoundedRectRadii, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Build the profile of a rectangle with rounded corners.
///
/// The outline runs clockwise in a y-down coordinate system, starting with
/// the top edge. Radii are first shrunk to fit the rectangle, see
/// [`RoundedRectRadii::adjusted_for`].
///
/// Without `smooth_corners` each corner is a circular arc. With it, corners
/// are cubic Béziers whose handles sit at the given fraction of the radius
/// from the tangent points towards the corner; `0` gives a chamfer and `1`
/// is nearly square.
pub fn rect_profile(
    rect: Rect,
    radii: impl Into<RoundedRectRadii>,
    smooth_corners: Option<f64>,
) -> CurveProfile {
    let rect = rect.abs();
    let r = radii.into().adjusted_for(rect);
    let Rect { x0, y0, x1, y1 } = rect;
    let mut builder = ProfileBuilder::new();
    if rect.width() <= 0.0 && rect.height() <= 0.0 {
        return builder.finish();
    }
    let sharpness = smooth_corners.map(|k| k.max(0.0).min(1.0));
    let corner = |builder: &mut ProfileBuilder, center: Point, radius: f64, start_angle: f64, tip: Point| {
        if radius <= 0.0 {
            // A square corner turns by a right angle.
            builder.note_sin(FRAC_1_SQRT_2);
            return;
        }
        match sharpness {
            Some(k) => {
                let s = center + Vec2::from_angle(start_angle) * radius;
                let e = center + Vec2::from_angle(start_angle + FRAC_PI_2) * radius;
                builder.push(CubicBez::new(s, s.lerp(tip, k), e.lerp(tip, k), e));
            }
            None => builder.push(Arc::circular(center, radius, start_angle, FRAC_PI_2)),
        }
    };
    push_line(&mut builder, Point::new(x0 + r.top_left, y0), Point::new(x1 - r.top_right, y0));
    corner(
        &mut builder,
        Point::new(x1 - r.top_right, y0 + r.top_right),
        r.top_right,
        -FRAC_PI_2,
        Point::new(x1, y0),
    );
    push_line(&mut builder, Point::new(x1, y0 + r.top_right), Point::new(x1, y1 - r.bottom_right));
    corner(
        &mut builder,
        Point::new(x1 - r.bottom_right, y1 - r.bottom_right),
        r.bottom_right,
        0.0,
        Point::new(x1, y1),
    );
    push_line(&mut builder, Point::new(x1 - r.bottom_right, y1), Point::new(x0 + r.bottom_left, y1));
    corner(
        &mut builder,
        Point::new(x0 + r.bottom_left, y1 - r.bottom_left),
        r.bottom_left,
        FRAC_PI_2,
        Point::new(x0, y1),
    );
    push_line(&mut builder, Point::new(x0, y1 - r.bottom_left), Point::new(x0, y0 + r.top_left));
    corner(
        &mut builder,
        Point::new(x0 + r.top_left, y0 + r.top_left),
        r.top_left,
        PI,
        Point::new(x0, y0),
    );
    builder.finish()
}

/// Build the profile of a polyline, rounding its corners.
///
/// Each interior vertex is replaced by a circular fillet of at most
/// `radius`. A fillet never takes more than half of an edge it shares with
/// another fillet, or the whole of an edge ending the polyline. A closed
/// polyline starts and ends halfway along its closing edge, so that its
/// first vertex can be rounded too.
///
/// Fewer than two points give the empty profile.
pub fn polyline_profile(points: &[Point], radius: f64, closed: bool) -> CurveProfile {
    let mut builder = ProfileBuilder::new();
    if points.len() < 2 {
        return builder.finish();
    }
    let pts: Vec<Point> = if closed {
        let mid = points[points.len() - 1].midpoint(points[0]);
        core::iter::once(mid)
            .chain(points.iter().copied())
            .chain(core::iter::once(mid))
            .collect()
    } else {
        points.to_vec()
    };
    let last_index = pts.len() - 1;
    let mut last = pts[0];
    for i in 1..last_index {
        let cur = pts[i];
        let cs = pts[i - 1] - cur;
        let ce = pts[i + 1] - cur;
        let (dir_s, dir_e) = (cs.normalize_or_zero(), ce.normalize_or_zero());
        if dir_s.hypot2() == 0.0 || dir_e.hypot2() == 0.0 {
            push_line(&mut builder, last, cur);
            last = cur;
            continue;
        }
        let angle = dir_s.dot(dir_e).clamp(-1.0, 1.0).acos();
        let half_sin = (0.5 * angle).sin();
        builder.note_sin(half_sin);
        let half_tan = (0.5 * angle).tan();
        let start_share = if i == 1 { 1.0 } else { 0.5 };
        let end_share = if i == last_index - 1 { 1.0 } else { 0.5 };
        let r = radius
            .min(half_tan * cs.hypot() * start_share)
            .min(half_tan * ce.hypot() * end_share);
        if r <= 0.0 || PI - angle < 1e-9 {
            push_line(&mut builder, last, cur);
            last = cur;
            continue;
        }
        let tangent_len = r / half_tan;
        let a = cur + dir_s * tangent_len;
        let b = cur + dir_e * tangent_len;
        let center = cur + (dir_s + dir_e).normalize_or_zero() * (r / half_sin);
        push_line(&mut builder, last, a);
        if a != b {
            let start_angle = (a - center).atan2();
            let end_angle = (b - center).atan2();
            let sweep = rem_euclid(end_angle - start_angle + PI, 2.0 * PI) - PI;
            builder.push(Arc::circular(center, r, start_angle, sweep));
        }
        last = b;
    }
    push_line(&mut builder, last, pts[last_index]);
    builder.finish()
}

fn push_line(builder: &mut ProfileBuilder, p0: Point, p1: Point) {
    if p0 != p1 {
        builder.push(Line::new(p0, p1));
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_1_SQRT_2, PI};

    use super::{polyline_profile, rect_profile};
    use crate::{PathSeg, Point, Rect, RoundedRectRadii};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sharp_rect() {
        let p = rect_profile(Rect::new(0.0, 0.0, 30.0, 20.0), 0.0, None);
        assert_eq!(p.segments().len(), 4);
        assert_eq!(p.arclen(), 100.0);
        assert_eq!(p.segments()[0].start(), Point::new(0.0, 0.0));
        assert_eq!(p.segments()[1].start(), Point::new(30.0, 0.0));
        assert!(close(p.min_sin(), FRAC_1_SQRT_2));
        assert!(p.subcurves()[0].closed);
    }

    #[test]
    fn rounded_rect_bounding_box() {
        let rect = Rect::new(10.0, 20.0, 110.0, 70.0);
        let radii = RoundedRectRadii::new(5.0, 10.0, 15.0, 20.0);
        let p = rect_profile(rect, radii, None);
        assert_eq!(p.segments().len(), 8);
        let bbox = p.bounding_box();
        assert!(close(bbox.x0, rect.x0) && close(bbox.y0, rect.y0));
        assert!(close(bbox.width(), 100.0) && close(bbox.height(), 50.0));
        let straight = 2.0 * (100.0 + 50.0) - 2.0 * 50.0;
        assert!(close(p.arclen(), straight + 0.5 * PI * 50.0));
        assert_eq!(p.min_sin(), 1.0);
        // The top right corner arc starts where the top edge ends.
        let arc = &p.segments()[1];
        assert!(matches!(arc.path_seg(), PathSeg::Arc(_)));
        assert!((arc.start() - Point::new(100.0, 20.0)).hypot() < 1e-9);
        assert!((arc.end() - Point::new(110.0, 30.0)).hypot() < 1e-9);
        let subs = p.subcurves();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
    }

    #[test]
    fn smooth_corners_are_cubics() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let p = rect_profile(rect, 10.0, Some(0.6));
        let cubics = p
            .segments()
            .iter()
            .filter(|s| matches!(s.path_seg(), PathSeg::Cubic(_)))
            .count();
        assert_eq!(cubics, 4);
        let bbox = p.bounding_box();
        assert!(close(bbox.width(), 40.0) && close(bbox.height(), 40.0));
        let PathSeg::Cubic(c) = p.segments()[1].path_seg() else {
            panic!("expected a cubic corner");
        };
        assert!((c.p1 - Point::new(36.0, 0.0)).hypot() < 1e-9);
        assert!((c.p2 - Point::new(40.0, 4.0)).hypot() < 1e-9);
    }

    #[test]
    fn full_pill() {
        let p = rect_profile(Rect::new(0.0, 0.0, 20.0, 20.0), 100.0, None);
        // Radii shrink to 10: a circle made of four arcs.
        assert_eq!(p.segments().len(), 4);
        assert!(close(p.arclen(), 20.0 * PI));
    }

    #[test]
    fn open_polyline_without_radius() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let p = polyline_profile(&pts, 0.0, false);
        assert_eq!(p.segments().len(), 2);
        assert_eq!(p.arclen(), 20.0);
        assert!(close(p.min_sin(), FRAC_1_SQRT_2));
        assert!(polyline_profile(&pts[..1], 5.0, false).is_empty());
    }

    #[test]
    fn open_polyline_fillet() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let p = polyline_profile(&pts, 2.0, false);
        assert_eq!(p.segments().len(), 3);
        let PathSeg::Arc(arc) = p.segments()[1].path_seg() else {
            panic!("expected a fillet arc");
        };
        assert!((arc.center - Point::new(8.0, 2.0)).hypot() < 1e-9);
        assert!(close(arc.sweep_angle, 0.5 * PI));
        assert!(close(p.arclen(), 16.0 + PI));
    }

    #[test]
    fn fillet_radius_is_limited() {
        let pts = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0), Point::new(0.0, 4.0)];
        // Inner edge of length 4 is shared by two fillets.
        let p = polyline_profile(&pts, 100.0, false);
        let PathSeg::Arc(arc) = p.segments()[1].path_seg() else {
            panic!("expected a fillet arc");
        };
        assert!(close(arc.radii.x, 2.0));
        assert_eq!(p.segments()[0].end(), Point::new(2.0, 0.0));
    }

    #[test]
    fn closed_polyline() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)];
        let p = polyline_profile(&pts, 0.0, true);
        assert_eq!(p.segments().len(), 5);
        assert_eq!(p.segments()[0].start(), Point::new(0.0, 5.0));
        assert_eq!(p.arclen(), 40.0);
        let subs = p.subcurves();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);

        let rounded = polyline_profile(&pts, 2.0, true);
        assert_eq!(rounded.segments().len(), 9);
        assert!(close(rounded.arclen(), 40.0 - 16.0 + 4.0 * PI));
        assert!(rounded.subcurves()[0].closed);
    }
}
