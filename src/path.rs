// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building curve profiles from SVG path data.

use log::{debug, trace};

use crate::profile::ProfileBuilder;
use crate::svg::{path_commands, PathOp, SvgArc};
use crate::{Arc, CubicBez, CurveProfile, Line, Point, QuadBez, SvgParseError, Vec2};

/// Build a profile from SVG path data.
///
/// Malformed data yields the empty profile. Use [`try_path_profile`] to
/// see the error.
pub fn path_profile(data: &str) -> CurveProfile {
    try_path_profile(data).unwrap_or_else(|e| {
        debug!("discarding malformed path data: {e}");
        CurveProfile::new()
    })
}

/// Build a profile from SVG path data, reporting malformed input.
///
/// Every drawing command adds one segment. `T` and `S` reflect the
/// previous control point only when the previous command was of the
/// matching kind. `Z` adds a closing line unless the current point already
/// is the subpath start. Arcs with a zero radius become lines, and arcs
/// ending where they start are dropped.
pub fn try_path_profile(data: &str) -> Result<CurveProfile, SvgParseError> {
    let mut builder = ProfileBuilder::new();
    let mut current = Point::ZERO;
    let mut first = Point::ZERO;
    // The control point to reflect for a following T or S.
    let mut last_quad: Option<Point> = None;
    let mut last_cubic: Option<Point> = None;

    for command in path_commands(data) {
        let command = command?;
        let origin = if command.relative {
            current.to_vec2()
        } else {
            Vec2::ZERO
        };
        let abs = |p: Point| p + origin;
        let mut quad_ctrl = None;
        let mut cubic_ctrl = None;
        match command.op {
            PathOp::MoveTo(p) => {
                current = abs(p);
                first = current;
            }
            PathOp::LineTo(p) => {
                let p = abs(p);
                builder.push(Line::new(current, p));
                current = p;
            }
            PathOp::HorizontalTo(x) => {
                let p = Point::new(x + origin.x, current.y);
                builder.push(Line::new(current, p));
                current = p;
            }
            PathOp::VerticalTo(y) => {
                let p = Point::new(current.x, y + origin.y);
                builder.push(Line::new(current, p));
                current = p;
            }
            PathOp::QuadTo(p1, p2) => {
                let (p1, p2) = (abs(p1), abs(p2));
                builder.push(QuadBez::new(current, p1, p2));
                quad_ctrl = Some(p1);
                current = p2;
            }
            PathOp::SmoothQuadTo(p2) => {
                let p1 = reflect(last_quad, current);
                let p2 = abs(p2);
                builder.push(QuadBez::new(current, p1, p2));
                quad_ctrl = Some(p1);
                current = p2;
            }
            PathOp::CurveTo(p1, p2, p3) => {
                let (p1, p2, p3) = (abs(p1), abs(p2), abs(p3));
                builder.push(CubicBez::new(current, p1, p2, p3));
                cubic_ctrl = Some(p2);
                current = p3;
            }
            PathOp::SmoothCurveTo(p2, p3) => {
                let p1 = reflect(last_cubic, current);
                let (p2, p3) = (abs(p2), abs(p3));
                builder.push(CubicBez::new(current, p1, p2, p3));
                cubic_ctrl = Some(p2);
                current = p3;
            }
            PathOp::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                let to = abs(to);
                let svg_arc = SvgArc {
                    from: current,
                    to,
                    radii,
                    x_rotation: x_rotation.to_radians(),
                    large_arc,
                    sweep,
                };
                if current != to {
                    match Arc::from_svg_arc(&svg_arc) {
                        Some(arc) => builder.push(arc),
                        None => builder.push(Line::new(current, to)),
                    }
                } else {
                    trace!("skipping arc ending at its start {to:?}");
                }
                current = to;
            }
            PathOp::ClosePath => {
                if current != first {
                    builder.push(Line::new(current, first));
                }
                current = first;
            }
        }
        last_quad = quad_ctrl;
        last_cubic = cubic_ctrl;
    }
    Ok(builder.finish_with_cubic_joins())
}

/// Reflect the previous control point through the current point, or use
/// the current point when there is none.
fn reflect(ctrl: Option<Point>, current: Point) -> Point {
    match ctrl {
        Some(c) => current + (current - c),
        None => current,
    }
}
