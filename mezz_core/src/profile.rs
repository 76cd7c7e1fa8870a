//! # Structural Profiles
//!
//! 2D closed cross-sections used as extrude/sweep inputs. A profile is an
//! ordered polygon, implicitly closed (last vertex connects back to the
//! first), with at least 3 vertices.
//!
//! The constructors below reproduce the standard manufactured sections:
//! stepped and boxed rack beams, I-beams and C-channels for mezzanine
//! framing, the truss chord angle section, and the skewed parallelograms
//! that let guardrail posts and rails seat flush on sloped runs.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point2, LINEAR_TOL};

/// An ordered, implicitly-closed 2D polygon defining a cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralProfile {
    points: Vec<Point2>,
}

impl StructuralProfile {
    /// Create a profile from an ordered vertex list.
    ///
    /// Errors if fewer than 3 vertices are given or two consecutive
    /// vertices coincide (the closing edge included).
    pub fn new(points: Vec<Point2>) -> LayoutResult<Self> {
        if points.len() < 3 {
            return Err(LayoutError::invalid_input(
                "points",
                points.len().to_string(),
                "A profile needs at least 3 vertices",
            ));
        }
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (b - a).norm() < LINEAR_TOL {
                return Err(LayoutError::invalid_input(
                    "points",
                    format!("({}, {})", a.x, a.y),
                    "Consecutive profile vertices coincide",
                ));
            }
        }
        Ok(StructuralProfile { points })
    }

    /// The profile's vertices, in order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Axis-aligned rectangle with one corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ])
    }

    /// Square brace section of the given size.
    pub fn square(size: f64) -> LayoutResult<Self> {
        Self::rectangle(size, size)
    }

    /// Stepped rack beam: a box with a pallet-support step cut into the
    /// top inner corner.
    pub fn beam_step(height: f64, width: f64, step: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(-height, 0.0),
            Point2::new(-height, width - step),
            Point2::new(-height + step, width - step),
            Point2::new(-height + step, width),
            Point2::new(0.0, width),
        ])
    }

    /// Plain box beam.
    pub fn beam_box(height: f64, width: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(-height, 0.0),
            Point2::new(-height, width),
            Point2::new(0.0, width),
        ])
    }

    /// I-beam section with flange/web thickness `t`.
    pub fn beam_ibeam(height: f64, width: f64, t: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(-t, 0.0),
            Point2::new(-t, (width - t) / 2.0),
            Point2::new(-height + t, (width - t) / 2.0),
            Point2::new(-height + t, 0.0),
            Point2::new(-height, 0.0),
            Point2::new(-height, width),
            Point2::new(-height + t, width),
            Point2::new(-height + t, (width + t) / 2.0),
            Point2::new(-t, (width + t) / 2.0),
            Point2::new(-t, width),
            Point2::new(0.0, width),
        ])
    }

    /// C-channel section with wall thickness `t`.
    pub fn beam_cchannel(height: f64, width: f64, t: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(-height, 0.0),
            Point2::new(-height, width),
            Point2::new(-height + t, width),
            Point2::new(-height + t, t),
            Point2::new(-t, t),
            Point2::new(-t, width),
            Point2::new(0.0, width),
        ])
    }

    /// Truss chord angle section. The sign conventions of `x1`/`x2` and
    /// `y1`/`y2` select which quadrant the legs extend into, so the same
    /// constructor serves top, bottom, and end chords in both orientations.
    pub fn chord_angle(x1: f64, x2: f64, y1: f64, y2: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(x1, 0.0),
            Point2::new(x1, y1),
            Point2::new(x2, y1),
            Point2::new(x2, y2),
            Point2::new(0.0, y2),
        ])
    }

    /// Guardrail post elevation profile: a `width` x `height` face sheared
    /// vertically by `skew` so the post sits plumb on a sloped run.
    pub fn rail_post(width: f64, height: f64, skew: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, skew),
            Point2::new(width, height + skew),
            Point2::new(0.0, height),
        ])
    }

    /// Guardrail bar elevation profile: a `length` x `width` bar climbing
    /// `skew` over its run.
    pub fn rail_bar(length: f64, width: f64, skew: f64) -> LayoutResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, width),
            Point2::new(length, width + skew),
            Point2::new(length, skew),
        ])
    }
}
