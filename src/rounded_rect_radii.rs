// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-corner radii of a rounded rectangle.

use crate::Rect;

/// Radii for each corner of a rounded rectangle.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundedRectRadii {
    /// The radius of the top-left corner.
    pub top_left: f64,
    /// The radius of the top-right corner.
    pub top_right: f64,
    /// The radius of the bottom-right corner.
    pub bottom_right: f64,
    /// The radius of the bottom-left corner.
    pub bottom_left: f64,
}

impl RoundedRectRadii {
    /// Create radii from the four corners, clockwise from the top left.
    pub const fn new(top_left: f64, top_right: f64, bottom_right: f64, bottom_left: f64) -> Self {
        RoundedRectRadii {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// The same radius for all four corners.
    pub const fn from_single_radius(radius: f64) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    /// Shrink the radii so that they fit `rect`.
    ///
    /// Each corner is checked against its horizontal and vertical
    /// neighbour. Where the two radii together exceed the side they share,
    /// the corner gets its proportional share of that side. Negative radii
    /// become zero.
    #[must_use]
    pub fn adjusted_for(&self, rect: Rect) -> RoundedRectRadii {
        let (width, height) = (rect.width().abs(), rect.height().abs());
        let r = RoundedRectRadii::new(
            self.top_left.max(0.0),
            self.top_right.max(0.0),
            self.bottom_right.max(0.0),
            self.bottom_left.max(0.0),
        );
        let fit = |radius: f64, horizontal: f64, vertical: f64| {
            let w = if radius + horizontal > width {
                width * radius / (radius + horizontal)
            } else {
                radius
            };
            let h = if radius + vertical > height {
                height * radius / (radius + vertical)
            } else {
                radius
            };
            w.min(h)
        };
        RoundedRectRadii {
            top_left: fit(r.top_left, r.top_right, r.bottom_left),
            top_right: fit(r.top_right, r.top_left, r.bottom_right),
            bottom_right: fit(r.bottom_right, r.bottom_left, r.top_right),
            bottom_left: fit(r.bottom_left, r.bottom_right, r.top_left),
        }
    }

    /// Whether all corners are square.
    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_right == 0.0
            && self.bottom_left == 0.0
    }
}

impl From<f64> for RoundedRectRadii {
    fn from(radius: f64) -> Self {
        RoundedRectRadii::from_single_radius(radius)
    }
}

impl From<(f64, f64, f64, f64)> for RoundedRectRadii {
    fn from(radii: (f64, f64, f64, f64)) -> Self {
        RoundedRectRadii::new(radii.0, radii.1, radii.2, radii.3)
    }
}
