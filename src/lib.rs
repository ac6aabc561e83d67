// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length addressable curve profiles, and morphing between them.
//!
//! A [`CurveProfile`] is an immutable sequence of [`Segment`]s (lines,
//! elliptical arcs, quadratic and cubic Béziers) with its total arc length
//! and the sharpness of its joins. Profiles are built from SVG path data,
//! smooth splines through knots, rounded rectangles and polylines. Any part
//! of a profile can be addressed by distance and drawn into a [`PathSink`].
//!
//! [`CurveProfileLerp`] matches two unrelated profiles once, and then
//! produces intermediate profiles for any progress value.
//!
//! # Examples
//!
//! ```
//! use curvemorph::{path_profile, rect_profile, CurveProfileLerp, Rect};
//!
//! let triangle = path_profile("M0 0 L10 0 L10 10 Z");
//! assert_eq!(triangle.segments().len(), 3);
//!
//! let square = rect_profile(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, None);
//! let circle = rect_profile(Rect::new(0.0, 0.0, 100.0, 100.0), 50.0, None);
//! let morph = CurveProfileLerp::new(&square, &circle);
//! let halfway = morph.eval(0.5);
//! assert!(halfway.arclen() > 0.0);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. This crate still uses the `alloc` crate
//! regardless.
//!
//! Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("curvemorph requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod affine;
mod arc;
mod bezpath;
pub mod common;
mod cubicbez;
mod line;
mod morph;
mod param_curve;
mod path;
mod point;
mod poly;
mod polygon;
mod profile;
mod quadbez;
mod rect;
mod rounded_rect_radii;
mod sampler;
mod segment;
mod shapes;
mod spline;
pub mod svg;
mod vec2;

pub use crate::affine::*;
pub use crate::arc::*;
pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::line::*;
pub use crate::morph::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::point::*;
pub use crate::poly::*;
pub use crate::polygon::*;
pub use crate::profile::{CurveProfile, Subcurve};
pub use crate::quadbez::*;
pub use crate::rect::*;
pub use crate::rounded_rect_radii::*;
pub use crate::sampler::*;
pub use crate::segment::*;
pub use crate::shapes::*;
pub use crate::spline::*;
pub use crate::svg::{SvgArc, SvgParseError};
pub use crate::vec2::*;
