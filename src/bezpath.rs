// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (up to cubic) and the drawing sink trait.

use alloc::vec::Vec;

use crate::{Arc, Point};

/// The tolerance used when a sink without native arcs approximates them
/// with cubic Béziers.
pub const ARC_TOLERANCE: f64 = 0.1;

/// A drawing surface that accepts path primitives.
///
/// Segments emit moveto/lineto/curveto-equivalent primitives into a sink
/// when they are drawn. Renderers implement this trait; [`BezPath`] is the
/// in-crate implementation.
pub trait PathSink {
    /// Start a new subpath at `p`.
    fn move_to(&mut self, p: Point);

    /// A straight line to `p`.
    fn line_to(&mut self, p: Point);

    /// A quadratic Bézier to `p2` with control point `p1`.
    fn quad_to(&mut self, p1: Point, p2: Point);

    /// A cubic Bézier to `p3` with control points `p1` and `p2`.
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point);

    /// An elliptical arc starting at the current point.
    ///
    /// The default implementation approximates the arc with cubic Béziers
    /// within [`ARC_TOLERANCE`].
    fn arc_to(&mut self, arc: &Arc) {
        for el in arc.append_iter(ARC_TOLERANCE) {
            if let PathEl::CurveTo(p1, p2, p3) = el {
                self.curve_to(p1, p2, p3);
            }
        }
    }

    /// Close the current subpath.
    fn close_path(&mut self);
}

/// A path that can contain Bézier segments up to cubic, possibly with
/// multiple subpaths.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic Bézier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

impl BezPath {
    /// Create a new path.
    #[inline]
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Push a generic path element onto the path.
    #[inline]
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Get the path elements.
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        self.0
            .iter()
            .all(|el| matches!(*el, PathEl::MoveTo(..) | PathEl::ClosePath))
    }

}

impl PathSink for BezPath {
    #[inline]
    fn move_to(&mut self, p: Point) {
        self.push(PathEl::MoveTo(p));
    }

    #[inline]
    fn line_to(&mut self, p: Point) {
        self.push(PathEl::LineTo(p));
    }

    #[inline]
    fn quad_to(&mut self, p1: Point, p2: Point) {
        self.push(PathEl::QuadTo(p1, p2));
    }

    #[inline]
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.push(PathEl::CurveTo(p1, p2, p3));
    }

    #[inline]
    fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }
}

impl From<Vec<PathEl>> for BezPath {
    fn from(v: Vec<PathEl>) -> Self {
        BezPath(v)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use crate::{Arc, BezPath, ParamCurve, PathEl, PathSink, Point};

    #[test]
    fn sink_records_elements() {
        let mut path = BezPath::new();
        assert!(path.is_empty());
        path.move_to(Point::new(0.0, 0.0));
        assert!(path.is_empty());
        path.line_to(Point::new(1.0, 0.0));
        path.quad_to(Point::new(1.0, 1.0), Point::new(0.0, 1.0));
        path.close_path();
        assert!(!path.is_empty());
        assert_eq!(path.elements().len(), 4);
        assert_eq!(
            path.elements()[2],
            PathEl::QuadTo(Point::new(1.0, 1.0), Point::new(0.0, 1.0))
        );
    }

    #[test]
    fn default_arc_to_emits_cubics() {
        let arc = Arc::circular((0.0, 0.0), 50.0, 0.0, PI);
        let mut path = BezPath::new();
        path.move_to(arc.start());
        path.arc_to(&arc);
        assert!(path.elements()[1..]
            .iter()
            .all(|el| matches!(el, PathEl::CurveTo(..))));
        let Some(&PathEl::CurveTo(_, _, end)) = path.elements().last() else {
            panic!("expected a cubic");
        };
        assert!((end - arc.end()).hypot() < 1e-9);
    }
}
