//! # Path Segmentation & Orientation Engine
//!
//! Turns a placement polyline into oriented, corner-corrected, unitized
//! segments ready for the guardrail driver, plus the rise arithmetic that
//! stairs and ladders share. A raw polyline goes through four stages:
//!
//! 1. raw point pairs,
//! 2. oriented (bearing + elevation computed, invalid segments rejected),
//! 3. corrected (corner joints adjusted so posts do not collide),
//! 4. unitized (each segment divided into equal rail units).
//!
//! Rejection is per segment: a segment that fails validation is reported in
//! the result and skipped, and the rest of the path still lays out. Stairs
//! and ladders run a single segment, so for them the same rejection aborts
//! the whole structure.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{
    is_orthogonal, polar_bearing, polar_elevation, unit_vector, Point3, Vec3, ANGLE_TOL,
    LINEAR_TOL,
};

/// Segmentation tuning. Defaults match standard guardrail stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Post cross-section width.
    pub post_width: f64,
    /// Preferred rail unit length; actual unit lengths are fitted.
    pub default_unit_length: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            post_width: 1.5,
            default_unit_length: 60.0,
        }
    }
}

/// Which way the path turns entering a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSide {
    Straight,
    Left,
    Right,
}

/// One oriented, unitized run of the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub start: Point3,
    pub end: Point3,
    /// Horizontal bearing, radians, atan2 convention.
    pub bearing: f64,
    /// Elevation from vertical: pi/2 is flat, smaller climbs.
    pub elevation: f64,
    /// Turn direction entering this segment from the previous one.
    pub turn: TurnSide,
    /// Whether this segment carries the post at its start. Only the first
    /// segment does; at corners the previous segment's end post serves.
    pub leading_post: bool,
    /// Post footprint measured along the (possibly sloped) run.
    pub effective_post_width: f64,
    pub unit_count: u32,
    pub unit_length: f64,
}

impl PathSegment {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction along the run.
    pub fn direction(&self) -> LayoutResult<Vec3> {
        unit_vector(&(self.end - self.start))
    }

    /// Point a given distance along the run from the start.
    pub fn point_at(&self, distance: f64) -> LayoutResult<Point3> {
        Ok(self.start + self.direction()? * distance)
    }
}

/// Segmentation result: the accepted segments in path order, plus the
/// rejections (each a [`LayoutError::SegmentRejected`]) for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedPath {
    pub segments: Vec<PathSegment>,
    pub rejected: Vec<LayoutError>,
}

// Oriented but not yet corrected or unitized.
struct OrientedSegment {
    start: Point3,
    end: Point3,
    bearing: f64,
    elevation: f64,
    effective_post_width: f64,
}

fn reject(start: Point3, end: Point3, reason: impl Into<String>) -> LayoutError {
    LayoutError::segment_rejected([start.x, start.y, start.z], [end.x, end.y, end.z], reason)
}

fn orient(
    start: Point3,
    end: Point3,
    config: &PathConfig,
) -> Result<OrientedSegment, LayoutError> {
    if (end - start).norm() < LINEAR_TOL {
        return Err(reject(start, end, "Segment endpoints coincide"));
    }
    let bearing = polar_bearing(&start, &end);
    let elevation =
        polar_elevation(&start, &end).map_err(|e| reject(start, end, e.to_string()))?;
    if !is_orthogonal(bearing) {
        return Err(reject(
            start,
            end,
            format!(
                "Bearing {:.1} degrees is not orthogonal to the layout axes",
                bearing.to_degrees()
            ),
        ));
    }
    if !(std::f64::consts::FRAC_PI_4..=3.0 * std::f64::consts::FRAC_PI_4).contains(&elevation) {
        return Err(reject(
            start,
            end,
            format!(
                "Segment is too steep: {:.1} degrees from vertical",
                elevation.to_degrees()
            ),
        ));
    }
    let effective_post_width = config.post_width / elevation.sin();
    if (end - start).norm() < 2.0 * effective_post_width {
        return Err(reject(
            start,
            end,
            format!(
                "Segment length {:.3} cannot hold two posts of effective width {:.3}",
                (end - start).norm(),
                effective_post_width
            ),
        ));
    }
    Ok(OrientedSegment {
        start,
        end,
        bearing,
        elevation,
        effective_post_width,
    })
}

fn turn_between(prev_bearing: f64, bearing: f64) -> TurnSide {
    let cross = (bearing - prev_bearing).sin();
    if cross > ANGLE_TOL {
        TurnSide::Left
    } else if cross < -ANGLE_TOL {
        TurnSide::Right
    } else {
        TurnSide::Straight
    }
}

/// Segment a placement polyline.
///
/// Needs at least two points. Individual segments that fail validation are
/// collected in [`SegmentedPath::rejected`] and skipped; corner correction
/// and unitization run over the survivors in order.
pub fn segment_path(points: &[Point3], config: &PathConfig) -> LayoutResult<SegmentedPath> {
    if points.len() < 2 {
        return Err(LayoutError::invalid_input(
            "points",
            points.len().to_string(),
            "A placement path needs at least 2 points",
        ));
    }
    if config.post_width <= 0.0 {
        return Err(LayoutError::invalid_input(
            "post_width",
            config.post_width.to_string(),
            "Post width must be positive",
        ));
    }
    if config.default_unit_length <= config.post_width {
        return Err(LayoutError::invalid_input(
            "default_unit_length",
            config.default_unit_length.to_string(),
            "Default unit length must exceed the post width",
        ));
    }

    let mut rejected = Vec::new();
    let mut oriented = Vec::new();
    for pair in points.windows(2) {
        match orient(pair[0], pair[1], config) {
            Ok(seg) => oriented.push(seg),
            Err(e) => rejected.push(e),
        }
    }

    // Corner correction between consecutive accepted segments. A turn pulls
    // the previous end back one post footprint along its own line and pushes
    // the current start forward along its line; a straight continuation only
    // pushes the current start.
    let mut turns = vec![TurnSide::Straight];
    for i in 1..oriented.len() {
        let turn = turn_between(oriented[i - 1].bearing, oriented[i].bearing);
        turns.push(turn);

        let prev_w = oriented[i - 1].effective_post_width;
        let prev_dir = unit_vector(&(oriented[i - 1].end - oriented[i - 1].start))?;
        if turn != TurnSide::Straight {
            oriented[i - 1].end -= prev_dir * prev_w;
        }
        let cur_w = oriented[i].effective_post_width;
        let cur_dir = unit_vector(&(oriented[i].end - oriented[i].start))?;
        oriented[i].start += cur_dir * cur_w;
    }

    let mut segments = Vec::with_capacity(oriented.len());
    for (i, seg) in oriented.into_iter().enumerate() {
        let length = (seg.end - seg.start).norm();
        let w = seg.effective_post_width;
        let count = ((length / (config.default_unit_length - config.post_width)).round() as i64)
            .max(1) as u32;
        let unit_length = (length - (count as f64 + 1.0) * w) / count as f64;
        if unit_length <= 0.0 {
            rejected.push(reject(
                seg.start,
                seg.end,
                format!(
                    "Segment length {:.3} is too short after corner correction",
                    length
                ),
            ));
            continue;
        }
        segments.push(PathSegment {
            start: seg.start,
            end: seg.end,
            bearing: seg.bearing,
            elevation: seg.elevation,
            turn: turns[i],
            leading_post: i == 0,
            effective_post_width: w,
            unit_count: count,
            unit_length,
        });
    }

    Ok(SegmentedPath { segments, rejected })
}

/// Riser/rung arithmetic shared by stairs and ladders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairRise {
    /// Number of risers (stairs) or rungs (ladders).
    pub riser_count: u32,
    /// Actual rise per step after fitting.
    pub riser_height: f64,
    /// Horizontal run of the whole flight.
    pub run_length: f64,
}

/// Fit risers into a total rise, rounding to the nearest count.
pub fn stair_rise(
    total_rise: f64,
    target_riser_height: f64,
    tread_depth: f64,
    tread_overlap: f64,
) -> LayoutResult<StairRise> {
    if total_rise <= 0.0 || target_riser_height <= 0.0 {
        return Err(LayoutError::invalid_input(
            "total_rise",
            format!("{} / {}", total_rise, target_riser_height),
            "Rise and target riser height must be positive",
        ));
    }
    let count = ((total_rise / target_riser_height).round() as i64).max(1) as u32;
    let n = count as f64;
    Ok(StairRise {
        riser_count: count,
        riser_height: total_rise / n,
        run_length: (n - 1.0) * tread_depth - (n - 2.0) * tread_overlap,
    })
}

/// Fit rungs into a total rise at a fixed climb angle (from horizontal).
pub fn ladder_rise(
    total_rise: f64,
    target_rung_spacing: f64,
    climb_angle: f64,
) -> LayoutResult<StairRise> {
    if total_rise <= 0.0 || target_rung_spacing <= 0.0 {
        return Err(LayoutError::invalid_input(
            "total_rise",
            format!("{} / {}", total_rise, target_rung_spacing),
            "Rise and rung spacing must be positive",
        ));
    }
    if climb_angle <= 0.0 || climb_angle >= std::f64::consts::FRAC_PI_2 {
        return Err(LayoutError::invalid_input(
            "climb_angle",
            climb_angle.to_string(),
            "Climb angle must lie strictly between 0 and 90 degrees",
        ));
    }
    let count = ((total_rise / target_rung_spacing).round() as i64).max(1) as u32;
    Ok(StairRise {
        riser_count: count,
        riser_height: total_rise / count as f64,
        run_length: total_rise / climb_angle.tan(),
    })
}
