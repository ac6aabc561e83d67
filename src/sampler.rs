// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc length reparameterization of curves.

use alloc::vec::Vec;

use crate::{ParamCurve, Point};

/// The default number of samples taken along a curve.
pub const DEFAULT_SAMPLES: usize = 20;

/// A distance-addressable view of a curve.
///
/// The curve is sampled at evenly spaced parameter values and the chord
/// lengths between consecutive samples are accumulated into a lookup
/// table. Distances along the curve are then mapped back to parameter
/// values by linear interpolation within the bracketing table interval.
///
/// The last table entry is snapped to the authoritative arc length given
/// at construction, so that accumulated chord error never shows up at the
/// end of the curve.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformSampler<C> {
    curve: C,
    arclen: f64,
    distances: Vec<f64>,
}

impl<C: ParamCurve> UniformSampler<C> {
    /// Sample `curve` with [`DEFAULT_SAMPLES`] samples.
    ///
    /// `arclen` is the arc length of the curve, as measured by the caller.
    pub fn new(curve: C, arclen: f64) -> Self {
        Self::with_samples(curve, arclen, DEFAULT_SAMPLES)
    }

    /// Sample `curve` with the given number of samples.
    ///
    /// At least two samples are always taken.
    pub fn with_samples(curve: C, arclen: f64, samples: usize) -> Self {
        let mut sampler = UniformSampler {
            curve,
            arclen: arclen.max(0.0),
            distances: Vec::new(),
        };
        sampler.resample(samples);
        sampler
    }

    /// Discard the lookup table and rebuild it with `samples` samples.
    pub fn resample(&mut self, samples: usize) {
        let samples = samples.max(2);
        let step = ((samples - 1) as f64).recip();
        self.distances.clear();
        self.distances.reserve(samples);
        self.distances.push(0.0);
        let mut prev = self.curve.eval(0.0);
        let mut length = 0.0;
        for i in 1..samples {
            let pt = self.curve.eval(i as f64 * step);
            length += pt.distance(prev);
            self.distances.push(length);
            prev = pt;
        }
        if let Some(last) = self.distances.last_mut() {
            *last = self.arclen;
        }
        // The chord sum can overshoot a slightly short measured length;
        // clip so the table stays non-decreasing.
        let mut ceiling = self.arclen;
        for d in self.distances.iter_mut().rev() {
            ceiling = d.min(ceiling);
            *d = ceiling;
        }
    }

    /// Map a distance along the curve to a curve parameter.
    ///
    /// The distance is clamped to `[0, arclen]`. The result is
    /// non-decreasing in `distance`, `0` at the start and `1` at the end of
    /// a curve with non-zero length.
    pub fn distance_to_t(&self, distance: f64) -> f64 {
        let distance = distance.max(0.0).min(self.arclen);
        if self.arclen > 0.0 && distance >= self.arclen {
            return 1.0;
        }
        let scale = ((self.distances.len() - 1) as f64).recip();
        for (i, pair) in self.distances.windows(2).enumerate() {
            let (d0, d1) = (pair[0], pair[1]);
            if distance >= d0 && distance <= d1 {
                let t0 = i as f64 * scale;
                let len = d1 - d0;
                if len <= 0.0 {
                    return t0;
                }
                return t0 + scale * (distance - d0) / len;
            }
        }
        1.0
    }

    /// The point at `distance` along the curve.
    #[inline]
    pub fn point_at_distance(&self, distance: f64) -> Point {
        self.curve.eval(self.distance_to_t(distance))
    }

    /// The number of samples in the lookup table.
    #[inline]
    pub fn samples(&self) -> usize {
        self.distances.len()
    }

    /// The accumulated distance at each sample.
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// The arc length the table is anchored to.
    #[inline]
    pub fn arclen(&self) -> f64 {
        self.arclen
    }

    /// The sampled curve.
    #[inline]
    pub fn curve(&self) -> &C {
        &self.curve
    }
}
