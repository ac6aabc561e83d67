// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morphing between two curve profiles.
//!
//! Both profiles are reduced to matched pairs of polygons with equal vertex
//! counts and aligned starting points. Intermediate shapes interpolate the
//! vertices and rebuild a polyline profile from them.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::profile::Subcurve;
use crate::{polyline_profile, CurveProfile, Point, Polygon};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Settings for [`CurveProfileLerp`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MorphOptions {
    /// Distance between sampled vertices of curved subcurves.
    pub precision: f64,
    /// Decimal digits kept in the matched vertices.
    pub rounding_digits: u32,
    /// Largest vertex count for which every rotation is tried.
    pub max_rotation_search: usize,
}

impl Default for MorphOptions {
    fn default() -> Self {
        MorphOptions {
            precision: 5.0,
            rounding_digits: 4,
            max_rotation_search: 2048,
        }
    }
}

/// A precomputed morph between two profiles.
///
/// Construction does the expensive matching once; [`eval`](Self::eval) is
/// then cheap enough to call every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveProfileLerp {
    pairs: Vec<(Polygon, Polygon)>,
}

impl CurveProfileLerp {
    /// Match `from` and `to` with the default options.
    pub fn new(from: &CurveProfile, to: &CurveProfile) -> Self {
        Self::with_options(from, to, MorphOptions::default())
    }

    /// Match `from` and `to`.
    pub fn with_options(from: &CurveProfile, to: &CurveProfile, options: MorphOptions) -> Self {
        let subs_a = from.subcurves();
        let subs_b = to.subcurves();
        let count = subs_a.len().max(subs_b.len());
        let mut pairs = Vec::with_capacity(count);
        for i in 0..count {
            let (a, b) = match (subs_a.get(i), subs_b.get(i)) {
                (Some(a), Some(b)) => (polygonize(a, &options), polygonize(b, &options)),
                (Some(a), None) => (
                    polygonize(a, &options),
                    point_polygon(a.start(), a.closed),
                ),
                (None, Some(b)) => (
                    point_polygon(b.start(), b.closed),
                    polygonize(b, &options),
                ),
                (None, None) => break,
            };
            let pair = match_pair(a, b, &options);
            trace!(
                "subcurve pair {i}: {} vertices, closed {}",
                pair.0.len(),
                pair.0.closed
            );
            pairs.push(pair);
        }
        debug!(
            "morph matched {} subcurve pairs ({} from, {} to)",
            pairs.len(),
            subs_a.len(),
            subs_b.len()
        );
        CurveProfileLerp { pairs }
    }

    /// The interpolated polygons at `progress`.
    ///
    /// At `0` and `1` the matched polygons are returned as they are.
    pub fn polygons_at(&self, progress: f64) -> Vec<Polygon> {
        self.pairs
            .iter()
            .map(|(a, b)| {
                if progress == 0.0 {
                    a.clone()
                } else if progress == 1.0 {
                    b.clone()
                } else {
                    a.lerp(b, progress)
                }
            })
            .collect()
    }

    /// The intermediate profile at `progress`.
    ///
    /// Each interpolated polygon becomes a polyline profile, and these are
    /// concatenated.
    pub fn eval(&self, progress: f64) -> CurveProfile {
        CurveProfile::concat(
            self.polygons_at(progress)
                .iter()
                .map(|p| polyline_profile(&p.points, 0.0, p.closed)),
        )
    }

    /// The shared vertex count of each matched pair.
    pub fn vertex_counts(&self) -> Vec<usize> {
        self.pairs.iter().map(|(a, _)| a.len()).collect()
    }

    /// The matched polygon pairs.
    pub fn pairs(&self) -> &[(Polygon, Polygon)] {
        &self.pairs
    }
}

/// A morph from `from` to `to` as a function of progress.
pub fn curve_profile_lerp(from: &CurveProfile, to: &CurveProfile) -> impl Fn(f64) -> CurveProfile {
    let lerp = CurveProfileLerp::new(from, to);
    move |progress| lerp.eval(progress)
}

fn point_polygon(point: Point, closed: bool) -> Polygon {
    Polygon::new(alloc::vec![point], closed)
}

/// Reduce a subcurve to a polygon.
///
/// Polylines keep their exact vertices. Anything curved is sampled at even
/// arc length spacing of about `precision`, with at least three vertices.
/// Closed polygons are wound clockwise in a y-down coordinate system.
fn polygonize(sub: &Subcurve<'_>, options: &MorphOptions) -> Polygon {
    let mut polygon = if sub.is_polyline() {
        let mut points: Vec<Point> = sub.segments.iter().map(|s| s.start()).collect();
        if !sub.closed {
            points.extend(sub.segments.last().map(|s| s.end()));
        }
        Polygon::new(points, sub.closed)
    } else {
        let len = sub.arclen();
        let count = if options.precision > 0.0 {
            (len / options.precision).ceil() as usize
        } else {
            0
        }
        .max(3);
        // A closed curve ends where it starts; skip the duplicate.
        let divisions = if sub.closed { count } else { count - 1 };
        let points = (0..count)
            .map(|i| sub.point_at_distance(len * i as f64 / divisions as f64).position)
            .collect();
        Polygon::new(points, sub.closed)
    };
    if polygon.closed && polygon.signed_area() > 0.0 {
        polygon.reverse();
    }
    polygon
}

/// Make a pair of polygons correspond vertex by vertex.
fn match_pair(mut a: Polygon, mut b: Polygon, options: &MorphOptions) -> (Polygon, Polygon) {
    let closed = a.closed && b.closed;
    if !closed {
        // A closed side matched with an open one is cut open at its start.
        for p in [&mut a, &mut b] {
            if p.closed {
                if let Some(&first) = p.points.first() {
                    p.points.push(first);
                }
                p.closed = false;
            }
        }
    }

    let diff = a.len().abs_diff(b.len());
    let shorter = if a.len() < b.len() { &mut a } else { &mut b };
    if closed {
        shorter.add_points(diff);
    } else {
        shorter.bisect_longest(diff);
    }

    if closed {
        let offset = a.best_rotation(&b, options.max_rotation_search);
        b.rotate_left(offset);
    } else {
        let reversed = b.reversed();
        if a.displacement(&reversed) < a.displacement(&b) {
            b = reversed;
        }
    }

    a.round_to(options.rounding_digits);
    b.round_to(options.rounding_digits);
    (a, b)
}
