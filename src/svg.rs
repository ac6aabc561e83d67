// Copyright 2024 the Curvemorph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lexing of the SVG path-data grammar, and SVG arc conversion.

use core::f64::consts::PI;
use core::fmt::{self, Display, Formatter};

use crate::{Arc, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// An error which can be returned when parsing path data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SvgParseError {
    /// A number was expected.
    Wrong,
    /// The input string ended while still expecting input.
    UnexpectedEof,
    /// Encountered an unknown command letter.
    UnknownCommand(char),
    /// The path data does not start with a moveto.
    MissingMoveTo,
}

impl Display for SvgParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SvgParseError::Wrong => write!(f, "Unable to parse a number"),
            SvgParseError::UnexpectedEof => write!(f, "Unexpected EOF"),
            SvgParseError::UnknownCommand(letter) => write!(f, "Unknown command, \"{letter}\""),
            SvgParseError::MissingMoveTo => write!(f, "Path data must start with a moveto"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SvgParseError {}

/// One path command with its arguments, as written.
///
/// Coordinates of relative commands are offsets from the current point;
/// resolving them is up to the interpreter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    /// `M`
    MoveTo(Point),
    /// `L`
    LineTo(Point),
    /// `H`
    HorizontalTo(f64),
    /// `V`
    VerticalTo(f64),
    /// `Q`
    QuadTo(Point, Point),
    /// `T`
    SmoothQuadTo(Point),
    /// `C`
    CurveTo(Point, Point, Point),
    /// `S`
    SmoothCurveTo(Point, Point),
    /// `A`. The rotation is in degrees.
    ArcTo {
        /// The ellipse radii.
        radii: Vec2,
        /// Rotation of the ellipse x axis.
        x_rotation: f64,
        /// Take the arc sweeping more than π.
        large_arc: bool,
        /// Sweep towards positive angles.
        sweep: bool,
        /// The end point.
        to: Point,
    },
    /// `Z`
    ClosePath,
}

/// A path command and whether it was written in relative (lowercase) form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathCommand {
    /// The command and its arguments.
    pub op: PathOp,
    /// Whether the arguments are relative to the current point.
    pub relative: bool,
}

/// An iterator over the commands of a path-data string.
///
/// Argument groups following a command without a new letter repeat the
/// command; after a moveto they are linetos. The first command must be a
/// moveto. Iteration stops after the first error.
#[derive(Debug)]
pub struct PathCommands<'a> {
    data: &'a [u8],
    ix: usize,
    last_cmd: u8,
    started: bool,
    failed: bool,
}

/// Lex a path-data string.
pub fn path_commands(data: &str) -> PathCommands<'_> {
    PathCommands {
        data: data.as_bytes(),
        ix: 0,
        last_cmd: 0,
        started: false,
        failed: false,
    }
}

impl<'a> Iterator for PathCommands<'a> {
    type Item = Result<PathCommand, SvgParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_command().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

impl<'a> PathCommands<'a> {
    fn next_command(&mut self) -> Result<Option<PathCommand>, SvgParseError> {
        let Some(cmd) = self.get_cmd()? else {
            return Ok(None);
        };
        if !self.started && cmd.to_ascii_uppercase() != b'M' {
            return Err(SvgParseError::MissingMoveTo);
        }
        self.started = true;
        let relative = cmd.is_ascii_lowercase();
        let op = match cmd.to_ascii_uppercase() {
            b'M' => {
                // Implicit repetitions of a moveto are linetos.
                self.last_cmd = if relative { b'l' } else { b'L' };
                PathOp::MoveTo(self.get_point()?)
            }
            b'L' => PathOp::LineTo(self.get_point()?),
            b'H' => PathOp::HorizontalTo(self.get_number()?),
            b'V' => PathOp::VerticalTo(self.get_number()?),
            b'Q' => {
                let p1 = self.get_point()?;
                PathOp::QuadTo(p1, self.get_point()?)
            }
            b'T' => PathOp::SmoothQuadTo(self.get_point()?),
            b'C' => {
                let p1 = self.get_point()?;
                let p2 = self.get_point()?;
                PathOp::CurveTo(p1, p2, self.get_point()?)
            }
            b'S' => {
                let p2 = self.get_point()?;
                PathOp::SmoothCurveTo(p2, self.get_point()?)
            }
            b'A' => {
                let rx = self.get_number()?;
                let ry = self.get_number()?;
                let x_rotation = self.get_number()?;
                let large_arc = self.get_flag()?;
                let sweep = self.get_flag()?;
                PathOp::ArcTo {
                    radii: Vec2::new(rx, ry),
                    x_rotation,
                    large_arc,
                    sweep,
                    to: self.get_point()?,
                }
            }
            b'Z' => {
                self.last_cmd = 0;
                PathOp::ClosePath
            }
            _ => return Err(SvgParseError::UnknownCommand(char::from(cmd))),
        };
        Ok(Some(PathCommand { op, relative }))
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.data.get(self.ix) {
            if !(c == b' ' || c == 9 || c == 10 || c == 12 || c == 13) {
                break;
            }
            self.ix += 1;
        }
    }

    fn get_cmd(&mut self) -> Result<Option<u8>, SvgParseError> {
        self.skip_ws();
        let Some(c) = self.get_byte() else {
            return Ok(None);
        };
        if c.is_ascii_alphabetic() {
            if b"MmLlHhVvQqTtCcSsAaZz".contains(&c) {
                if c.to_ascii_uppercase() != b'M' {
                    self.last_cmd = c;
                }
                Ok(Some(c))
            } else {
                Err(SvgParseError::UnknownCommand(char::from(c)))
            }
        } else if c == b'-' || c == b'+' || c == b'.' || c.is_ascii_digit() {
            // Plausible number start: repeat the last command.
            self.unget();
            match self.last_cmd {
                0 if !self.started => Err(SvgParseError::MissingMoveTo),
                0 => Err(SvgParseError::Wrong),
                last => Ok(Some(last)),
            }
        } else {
            Err(SvgParseError::Wrong)
        }
    }

    fn get_byte(&mut self) -> Option<u8> {
        self.data.get(self.ix).map(|&c| {
            self.ix += 1;
            c
        })
    }

    fn unget(&mut self) {
        self.ix -= 1;
    }

    fn get_number(&mut self) -> Result<f64, SvgParseError> {
        self.skip_ws();
        let start = self.ix;
        let c = self.get_byte().ok_or(SvgParseError::UnexpectedEof)?;
        if !(c == b'-' || c == b'+') {
            self.unget();
        }
        let mut digit_count = 0;
        let mut seen_period = false;
        while let Some(c) = self.get_byte() {
            if c.is_ascii_digit() {
                digit_count += 1;
            } else if c == b'.' && !seen_period {
                seen_period = true;
            } else {
                self.unget();
                break;
            }
        }
        if digit_count == 0 {
            return Err(if self.ix >= self.data.len() {
                SvgParseError::UnexpectedEof
            } else {
                SvgParseError::Wrong
            });
        }
        if let Some(b'e' | b'E') = self.data.get(self.ix) {
            self.ix += 1;
            if let Some(b'-' | b'+') = self.data.get(self.ix) {
                self.ix += 1;
            }
            let exp_start = self.ix;
            while self.data.get(self.ix).is_some_and(u8::is_ascii_digit) {
                self.ix += 1;
            }
            if self.ix == exp_start {
                return Err(SvgParseError::Wrong);
            }
        }
        let text = core::str::from_utf8(&self.data[start..self.ix]).map_err(|_| SvgParseError::Wrong)?;
        let value = text.parse().map_err(|_| SvgParseError::Wrong)?;
        self.opt_comma();
        Ok(value)
    }

    fn get_point(&mut self) -> Result<Point, SvgParseError> {
        let x = self.get_number()?;
        let y = self.get_number()?;
        Ok(Point::new(x, y))
    }

    /// Arc flags are a single digit and need no separator.
    fn get_flag(&mut self) -> Result<bool, SvgParseError> {
        self.skip_ws();
        let flag = match self.get_byte().ok_or(SvgParseError::UnexpectedEof)? {
            b'0' => false,
            b'1' => true,
            _ => return Err(SvgParseError::Wrong),
        };
        self.opt_comma();
        Ok(flag)
    }

    fn opt_comma(&mut self) {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c != b',' {
                self.unget();
            }
        }
    }
}

/// An SVG arc segment, in endpoint parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgArc {
    /// The arc's start point.
    pub from: Point,
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Determines if the arc should begin moving at positive angles.
    pub sweep: bool,
}

impl SvgArc {
    /// Checks whether the arc degenerates to a straight line (or nothing).
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= 1e-5 || self.radii.y.abs() <= 1e-5 || self.from == self.to
    }
}

impl Arc {
    /// Creates an `Arc` from an [`SvgArc`], converting to center
    /// parameterization.
    ///
    /// Radii too small to span the end points are scaled up uniformly.
    /// Returns `None` if the arc is actually a straight line.
    pub fn from_svg_arc(arc: &SvgArc) -> Option<Arc> {
        if arc.is_straight_line() {
            return None;
        }
        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();

        let (sin_phi, cos_phi) = (arc.x_rotation % (2.0 * PI)).sin_cos();
        let half_delta = (arc.from - arc.to) * 0.5;
        let mid = arc.from.midpoint(arc.to);

        let p = Vec2::new(
            cos_phi * half_delta.x + sin_phi * half_delta.y,
            -sin_phi * half_delta.x + cos_phi * half_delta.y,
        );

        let rf = p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry);
        if rf > 1.0 {
            let scale = rf.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;
        if sum_of_sq == 0.0 {
            return None;
        }

        let sign = if arc.large_arc == arc.sweep { -1.0 } else { 1.0 };
        let coe = sign * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();
        let cx = coe * rxpy / ry;
        let cy = -coe * rypx / rx;

        let center = Point::new(
            cos_phi * cx - sin_phi * cy + mid.x,
            sin_phi * cx + cos_phi * cy + mid.y,
        );

        let start_v = Vec2::new((p.x - cx) / rx, (p.y - cy) / ry);
        let end_v = Vec2::new((-p.x - cx) / rx, (-p.y - cy) / ry);
        let start_angle = start_v.atan2();
        let mut sweep_angle = (end_v.atan2() - start_angle) % (2.0 * PI);
        if arc.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        } else if !arc.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        }

        Some(Arc {
            center,
            radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
            x_rotation: arc.x_rotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::f64::consts::PI;

    use super::{path_commands, PathCommand, PathOp, SvgArc, SvgParseError};
    use crate::{Arc, ParamCurve, Point, Vec2};

    fn lex(data: &str) -> Result<Vec<PathCommand>, SvgParseError> {
        path_commands(data).collect()
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let cmds = lex("m10 10 100 0 0 100 -100 0z").unwrap();
        assert_eq!(cmds.len(), 5);
        assert_eq!(cmds[0].op, PathOp::MoveTo(Point::new(10.0, 10.0)));
        assert!(cmds[0].relative);
        assert_eq!(cmds[1].op, PathOp::LineTo(Point::new(100.0, 0.0)));
        assert!(cmds[3].relative);
        assert_eq!(cmds[4].op, PathOp::ClosePath);
    }

    #[test]
    fn compact_numbers() {
        let cmds = lex("M-1.5-2.5L.5.5,1e2-3E-1").unwrap();
        assert_eq!(cmds[0].op, PathOp::MoveTo(Point::new(-1.5, -2.5)));
        assert_eq!(cmds[1].op, PathOp::LineTo(Point::new(0.5, 0.5)));
        assert_eq!(cmds[2].op, PathOp::LineTo(Point::new(100.0, -0.3)));
    }

    #[test]
    fn compact_arc_flags() {
        let cmds = lex("M0 0a5 5 30 1010 10").unwrap();
        assert_eq!(
            cmds[1].op,
            PathOp::ArcTo {
                radii: Vec2::new(5.0, 5.0),
                x_rotation: 30.0,
                large_arc: true,
                sweep: false,
                to: Point::new(10.0, 10.0),
            }
        );
    }

    #[test]
    fn errors() {
        assert_eq!(lex("L1 2"), Err(SvgParseError::MissingMoveTo));
        assert_eq!(lex("1 2"), Err(SvgParseError::MissingMoveTo));
        assert_eq!(lex("M1 2 X"), Err(SvgParseError::UnknownCommand('X')));
        assert_eq!(lex("M1"), Err(SvgParseError::UnexpectedEof));
        assert_eq!(lex("M1 2 L#"), Err(SvgParseError::Wrong));
        assert_eq!(lex("M0 0 Z 1 2"), Err(SvgParseError::Wrong));
        assert!(lex("").unwrap().is_empty());
        // Iteration stops at the first error.
        assert_eq!(path_commands("M0 0 L1 1 X 2").count(), 3);
    }

    #[test]
    fn svg_arc_semicircle() {
        let arc = Arc::from_svg_arc(&SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radii: Vec2::new(5.0, 5.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        })
        .unwrap();
        assert!((arc.center - Point::new(5.0, 0.0)).hypot() < 1e-12);
        assert!((arc.sweep_angle.abs() - PI).abs() < 1e-12);
        assert!((arc.start() - Point::new(0.0, 0.0)).hypot() < 1e-9);
        assert!((arc.end() - Point::new(10.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn svg_arc_small_radii_scaled() {
        let arc = Arc::from_svg_arc(&SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(20.0, 0.0),
            radii: Vec2::new(1.0, 1.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: false,
        })
        .unwrap();
        assert!((arc.radii.x - 10.0).abs() < 1e-9);
        assert!((arc.end() - Point::new(20.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn svg_arc_degenerate() {
        let base = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radii: Vec2::new(0.0, 5.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(Arc::from_svg_arc(&base).is_none());
        let same = SvgArc {
            to: base.from,
            radii: Vec2::new(5.0, 5.0),
            ..base
        };
        assert!(Arc::from_svg_arc(&same).is_none());
    }
}
