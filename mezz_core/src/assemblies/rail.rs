//! # Guardrail Driver
//!
//! Guardrail runs placed over a polyline path. Unlike the catalog
//! assemblies, a rail run is placed in world coordinates and never goes
//! through the component store - its geometry depends on the path, not on a
//! reusable dimension set.
//!
//! Each accepted path segment gets a post at every unit boundary and one or
//! two rail bars per unit (the top rail, plus a mid rail when the height
//! allows). On sloped runs the post and bar profiles are sheared by the
//! climb so everything seats flush. Corner posts are shared: only the first
//! segment carries its leading post, and the `first_post` / `last_post`
//! flags suppress the run's outermost posts for butting against walls or
//! stair stringers.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point3, Vec3};
use crate::kernel::{Axis, PlacedPrimitive, Placement, PrimitiveShape};
use crate::profile::StructuralProfile;
use crate::solvers::path::{segment_path, PathConfig, PathSegment};
use crate::styles::StyleMap;

/// Drop from the top rail to the mid rail.
const MID_RAIL_DROP: f64 = 16.0;

/// Input parameters for a guardrail run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "GR-1",
///   "path": [[0.0, 0.0, 0.0], [120.0, 0.0, 0.0]],
///   "height": 36.0,
///   "width": 1.5,
///   "default_unit_length": 60.0,
///   "first_post": true,
///   "last_post": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailInput {
    /// User label (e.g. "GR-1")
    pub label: String,

    /// Placement polyline, in world coordinates
    pub path: Vec<Point3>,

    /// Rail height above the walking surface
    pub height: f64,

    /// Post and rail bar cross-section width
    pub width: f64,

    /// Preferred rail unit length
    pub default_unit_length: f64,

    /// Place the post at the very start of the run
    pub first_post: bool,

    /// Place the post at the very end of the run
    pub last_post: bool,
}

impl Default for RailInput {
    fn default() -> Self {
        RailInput {
            label: "GR-1".to_string(),
            path: Vec::new(),
            height: 36.0,
            width: 1.5,
            default_unit_length: 60.0,
            first_post: true,
            last_post: true,
        }
    }
}

impl RailInput {
    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.path.len() < 2 {
            return Err(LayoutError::invalid_input(
                "path",
                self.path.len().to_string(),
                "A rail path needs at least 2 points",
            ));
        }
        if self.height <= 0.0 {
            return Err(LayoutError::invalid_input(
                "height",
                self.height.to_string(),
                "Rail height must be positive",
            ));
        }
        if self.width <= 0.0 {
            return Err(LayoutError::invalid_input(
                "width",
                self.width.to_string(),
                "Post width must be positive",
            ));
        }
        if self.default_unit_length <= self.width {
            return Err(LayoutError::invalid_input(
                "default_unit_length",
                self.default_unit_length.to_string(),
                "Unit length must exceed the post width",
            ));
        }
        Ok(())
    }

    fn path_config(&self) -> PathConfig {
        PathConfig {
            post_width: self.width,
            default_unit_length: self.default_unit_length,
        }
    }

    /// Rail tier heights, top rail first.
    pub fn tiers(&self) -> Vec<f64> {
        let mut tiers = vec![self.height];
        if self.height > MID_RAIL_DROP {
            tiers.push(self.height - MID_RAIL_DROP);
        }
        tiers
    }
}

/// A laid-out rail run: the primitives plus any rejected path segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailLayout {
    pub primitives: Vec<PlacedPrimitive>,
    pub rejected: Vec<LayoutError>,
}

// World placement for a profile standing at `base`, facing the segment
// bearing.
fn stand_at(bearing: f64, base: Point3) -> Placement {
    Placement::identity()
        .rotated(Axis::Z, bearing)
        .translated(base - Point3::origin())
}

fn segment_posts(
    input: &RailInput,
    seg: &PathSegment,
    is_first: bool,
    is_last: bool,
    layer: &str,
    out: &mut Vec<PlacedPrimitive>,
) -> LayoutResult<()> {
    // Shear that keeps sloped posts plumb
    let skew = input.width * seg.elevation.cos() / seg.elevation.sin();
    let profile = StructuralProfile::rail_post(input.width, input.height, skew)?;
    let pitch = seg.unit_length + seg.effective_post_width;

    for i in 0..=seg.unit_count {
        if i == 0 && (!seg.leading_post || (is_first && !input.first_post)) {
            continue;
        }
        if i == seg.unit_count && is_last && !input.last_post {
            continue;
        }
        let base = seg.point_at(pitch * i as f64)?;
        out.push(PlacedPrimitive {
            shape: PrimitiveShape::Extrusion {
                profile: profile.clone(),
                distance: input.width,
                taper: 0.0,
            },
            placement: stand_at(seg.bearing, base),
            layer: layer.to_string(),
        });
    }
    Ok(())
}

fn segment_rails(
    input: &RailInput,
    seg: &PathSegment,
    layer: &str,
    out: &mut Vec<PlacedPrimitive>,
) -> LayoutResult<()> {
    let run = seg.unit_length * seg.elevation.sin();
    let rise = seg.unit_length * seg.elevation.cos();
    let profile = StructuralProfile::rail_bar(run, input.width, rise)?;
    let pitch = seg.unit_length + seg.effective_post_width;
    // Bars tuck inside the post line and ride the slope up to each tier
    let tuck = input.width * seg.elevation.cos() / seg.elevation.sin();

    for tier in input.tiers() {
        for i in 0..seg.unit_count {
            let base = seg.point_at(pitch * i as f64 + seg.effective_post_width)?;
            let offset = Vec3::new(
                input.width * seg.bearing.cos(),
                input.width * seg.bearing.sin(),
                tuck + tier - input.width,
            );
            out.push(PlacedPrimitive {
                shape: PrimitiveShape::Extrusion {
                    profile: profile.clone(),
                    distance: input.width,
                    taper: 0.0,
                },
                placement: stand_at(seg.bearing, base + offset),
                layer: layer.to_string(),
            });
        }
    }
    Ok(())
}

/// Lay out the rail run in world coordinates.
///
/// Rejected segments are reported in the result and skipped; the rest of
/// the run still lays out.
pub fn layout(input: &RailInput, styles: &StyleMap) -> LayoutResult<RailLayout> {
    input.validate()?;
    let layer = styles.layer("mezz-rail");
    let segmented = segment_path(&input.path, &input.path_config())?;

    let mut primitives = Vec::new();
    let last = segmented.segments.len().saturating_sub(1);
    for (i, seg) in segmented.segments.iter().enumerate() {
        segment_posts(input, seg, i == 0, i == last, &layer, &mut primitives)?;
        segment_rails(input, seg, &layer, &mut primitives)?;
    }

    Ok(RailLayout {
        primitives,
        rejected: segmented.rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn straight_input() -> RailInput {
        RailInput {
            path: vec![p(0.0, 0.0, 0.0), p(120.0, 0.0, 0.0)],
            ..RailInput::default()
        }
    }

    fn count_posts(layout: &RailLayout, input: &RailInput) -> usize {
        layout
            .primitives
            .iter()
            .filter(|prim| match &prim.shape {
                PrimitiveShape::Extrusion { profile, .. } => {
                    // Posts are as tall as the rail; bars are one width thick
                    profile.points()[3].y >= input.height - 1e-9
                }
                _ => false,
            })
            .count()
    }

    #[test]
    fn test_straight_run_counts() {
        let input = straight_input();
        let layout = layout(&input, &StyleMap::default()).unwrap();
        assert!(layout.rejected.is_empty());
        // 2 units: 3 posts, 2 bars on each of 2 tiers
        assert_eq!(count_posts(&layout, &input), 3);
        assert_eq!(layout.primitives.len(), 3 + 4);
    }

    #[test]
    fn test_first_post_suppressed() {
        let input = RailInput {
            first_post: false,
            ..straight_input()
        };
        let run = layout(&input, &StyleMap::default()).unwrap();
        assert_eq!(count_posts(&run, &input), 2);
    }

    #[test]
    fn test_corner_shares_post() {
        let input = RailInput {
            path: vec![p(0.0, 0.0, 0.0), p(60.0, 0.0, 0.0), p(60.0, 60.0, 0.0)],
            ..RailInput::default()
        };
        let run = layout(&input, &StyleMap::default()).unwrap();
        // One unit per corrected segment: 2 posts + 1 shared-corner post
        assert_eq!(count_posts(&run, &input), 3);
    }

    #[test]
    fn test_rejected_segment_reported_run_continues() {
        let input = RailInput {
            path: vec![
                p(0.0, 0.0, 0.0),
                p(10.0, 10.0, 0.0),
                p(10.0, 130.0, 0.0),
            ],
            ..RailInput::default()
        };
        let run = layout(&input, &StyleMap::default()).unwrap();
        assert_eq!(run.rejected.len(), 1);
        assert!(!run.primitives.is_empty());
    }

    #[test]
    fn test_short_rail_keeps_single_tier() {
        let input = RailInput {
            height: 12.0,
            ..straight_input()
        };
        assert_eq!(input.tiers().len(), 1);
        let run = layout(&input, &StyleMap::default()).unwrap();
        // 3 posts + 2 bars on the single tier
        assert_eq!(run.primitives.len(), 5);
    }

    #[test]
    fn test_flat_run_has_no_skew() {
        let input = straight_input();
        let run = layout(&input, &StyleMap::default()).unwrap();
        let post_profile = run
            .primitives
            .iter()
            .find_map(|prim| match &prim.shape {
                PrimitiveShape::Extrusion { profile, .. }
                    if profile.points()[3].y >= input.height - 1e-9 =>
                {
                    Some(profile.clone())
                }
                _ => None,
            })
            .unwrap();
        // Flat run: the sheared corner stays level
        assert!((post_profile.points()[1].y).abs() < 1e-9);
    }
}
