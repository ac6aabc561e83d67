// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point lists used as morphing correspondences.

use alloc::vec::Vec;

use crate::Point;

/// An ordered list of vertices, open or closed.
///
/// A closed polygon does not repeat its first point at the end; the edge
/// from the last point back to the first is implied.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    /// The vertices.
    pub points: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Polygon {
    /// Create a polygon from its vertices.
    pub fn new(points: Vec<Point>, closed: bool) -> Polygon {
        Polygon { points, closed }
    }

    /// The number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area by the shoelace formula, treating the polygon as closed.
    ///
    /// Positive for counter-clockwise order in a y-up coordinate system.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i].to_vec2();
            let b = self.points[(i + 1) % n].to_vec2();
            sum += a.cross(b);
        }
        0.5 * sum
    }

    /// Total edge length, including the closing edge of a closed polygon.
    pub fn perimeter(&self) -> f64 {
        let open: f64 = self.points.windows(2).map(|w| w[0].distance(w[1])).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + last.distance(*first),
            _ => open,
        }
    }

    /// Reverse the vertex order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Returns a copy with the vertex order reversed.
    #[must_use]
    pub fn reversed(&self) -> Polygon {
        let mut result = self.clone();
        result.reverse();
        result
    }

    /// Insert `count` points spread evenly along the perimeter.
    ///
    /// Insertions are spaced by `perimeter / count`, the first one half a
    /// step from the start. Existing vertices keep their positions. A
    /// polygon of zero length gets copies of its vertices.
    pub fn add_points(&mut self, count: usize) {
        if count == 0 || self.points.is_empty() {
            return;
        }
        let target = self.points.len() + count;
        let step = self.perimeter() / count as f64;
        let mut i = 0;
        let mut cursor = 0.0;
        let mut insert_at = 0.5 * step;
        while self.points.len() < target {
            if i >= self.points.len() {
                // Rounding left the last insertions past the end.
                let last = self.points[self.points.len() - 1];
                self.points.push(last);
                continue;
            }
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            let edge = a.distance(b);
            if insert_at <= cursor + edge {
                let p = if edge > 0.0 {
                    a.lerp(b, (insert_at - cursor) / edge)
                } else {
                    a
                };
                self.points.insert(i + 1, p);
                insert_at += step;
                continue;
            }
            cursor += edge;
            i += 1;
        }
    }

    /// Insert `count` points by repeatedly halving the longest edge.
    ///
    /// Only edges between consecutive vertices are considered; the closing
    /// edge is not.
    pub fn bisect_longest(&mut self, count: usize) {
        for _ in 0..count {
            let longest = self
                .points
                .windows(2)
                .enumerate()
                .map(|(i, w)| (i, w[0].distance_squared(w[1])))
                .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                    Some((_, bd)) if bd >= d => best,
                    _ => Some((i, d)),
                });
            match longest {
                Some((i, _)) => {
                    let mid = self.points[i].midpoint(self.points[i + 1]);
                    self.points.insert(i + 1, mid);
                }
                None => match self.points.first() {
                    Some(&p) => self.points.push(p),
                    None => return,
                },
            }
        }
    }

    /// Sum of squared distances between corresponding vertices.
    pub fn displacement(&self, other: &Polygon) -> f64 {
        self.rotated_displacement(other, 0)
    }

    /// Sum of squared distances between each vertex `i` and vertex
    /// `i + offset` (cyclically) of `other`.
    ///
    /// Both polygons must have the same number of vertices.
    pub fn rotated_displacement(&self, other: &Polygon, offset: usize) -> f64 {
        let n = self.points.len().min(other.points.len());
        if n == 0 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                self.points[i].distance_squared(other.points[(i + offset) % n])
            })
            .sum()
    }

    /// The cyclic offset into `other` that minimizes the displacement
    /// from `self`.
    ///
    /// Every offset is tried when there are at most `max_search` vertices.
    /// Otherwise offsets are scanned with a stride, and the neighbourhood of
    /// the best one is searched exhaustively. Offset 0 is always tried, so
    /// the result is never worse than no rotation.
    pub fn best_rotation(&self, other: &Polygon, max_search: usize) -> usize {
        let n = self.points.len().min(other.points.len());
        if n < 2 {
            return 0;
        }
        let mut best = (0, self.rotated_displacement(other, 0));
        let consider = |offset: usize, best: &mut (usize, f64)| {
            let d = self.rotated_displacement(other, offset);
            if d < best.1 {
                *best = (offset, d);
            }
        };
        if n <= max_search.max(1) {
            for offset in 1..n {
                consider(offset, &mut best);
            }
            return best.0;
        }
        let stride = n.div_ceil(max_search.max(1));
        for offset in (stride..n).step_by(stride) {
            consider(offset, &mut best);
        }
        let center = best.0;
        for delta in 1..stride {
            consider((center + delta) % n, &mut best);
            consider((center + n - delta) % n, &mut best);
        }
        best.0
    }

    /// Rotate the vertices so that vertex `offset` comes first.
    pub fn rotate_left(&mut self, offset: usize) {
        if !self.points.is_empty() {
            let n = self.points.len();
            self.points.rotate_left(offset % n);
        }
    }

    /// Interpolate vertex-wise towards `other`.
    ///
    /// Extra vertices of the longer polygon are ignored.
    #[must_use]
    pub fn lerp(&self, other: &Polygon, t: f64) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .zip(&other.points)
                .map(|(a, b)| a.lerp(*b, t))
                .collect(),
            closed: self.closed,
        }
    }

    /// Round every coordinate to `digits` decimal digits.
    pub fn round_to(&mut self, digits: u32) {
        for p in &mut self.points {
            *p = p.round_to(digits);
        }
    }
}
