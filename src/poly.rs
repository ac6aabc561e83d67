// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-dimensional polynomials in power basis.

use crate::{Point, Vec2};

/// A 2D parametric polynomial whose degree is known at compile-time.
///
/// The x and y components are stored as separate coefficient arrays, with
/// the constant coefficient first. `Poly2<2>` is a line, `Poly2<3>` a
/// quadratic and `Poly2<4>` a cubic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Poly2<const N: usize> {
    x: [f64; N],
    y: [f64; N],
}

impl<const N: usize> Poly2<N> {
    /// Creates a new polynomial from per-axis coefficients.
    ///
    /// In each array the coefficient of `t^i` is at index `i`.
    pub const fn new(x: [f64; N], y: [f64; N]) -> Poly2<N> {
        Poly2 { x, y }
    }

    /// Creates a polynomial from vector-valued coefficients.
    pub fn from_coeffs(coeffs: [Vec2; N]) -> Poly2<N> {
        Poly2 {
            x: coeffs.map(|c| c.x),
            y: coeffs.map(|c| c.y),
        }
    }

    /// The coefficient of `t^i`, as a vector.
    ///
    /// Panics if `i >= N`.
    pub fn coeff(&self, i: usize) -> Vec2 {
        Vec2::new(self.x[i], self.y[i])
    }

    /// Evaluates the polynomial at `t`.
    pub fn eval(&self, t: f64) -> Point {
        Point::new(horner(&self.x, t), horner(&self.y, t))
    }

    /// Evaluates the derivative at `t`, without building the derivative
    /// polynomial.
    pub fn eval_deriv(&self, t: f64) -> Vec2 {
        Vec2::new(horner_deriv(&self.x, t), horner_deriv(&self.y, t))
    }

    /// Are all the coefficients finite?
    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(&self.y).all(|c| c.is_finite())
    }
}

fn horner(coeffs: &[f64], t: f64) -> f64 {
    let mut acc = 0.0;
    for c in coeffs.iter().rev() {
        acc = acc * t + c;
    }
    acc
}

fn horner_deriv(coeffs: &[f64], t: f64) -> f64 {
    let mut acc = 0.0;
    for (i, c) in coeffs.iter().enumerate().skip(1).rev() {
        acc = acc * t + i as f64 * c;
    }
    acc
}

macro_rules! impl_deriv {
    ($N:literal, $N_MINUS_ONE:literal) => {
        impl Poly2<$N> {
            /// Compute the derivative of this polynomial, as a polynomial with
            /// one less coefficient.
            pub fn deriv(&self) -> Poly2<$N_MINUS_ONE> {
                let mut x = [0.0; $N_MINUS_ONE];
                let mut y = [0.0; $N_MINUS_ONE];
                for i in 0..$N_MINUS_ONE {
                    let k = (i + 1) as f64;
                    x[i] = k * self.x[i + 1];
                    y[i] = k * self.y[i + 1];
                }
                Poly2::new(x, y)
            }
        }
    };
}

impl_deriv!(2, 1);
impl_deriv!(3, 2);
impl_deriv!(4, 3);
