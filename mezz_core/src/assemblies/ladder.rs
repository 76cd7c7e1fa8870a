//! # Ladder Driver
//!
//! An access ladder leaned at a fixed climb angle: two side rails and a
//! round rung per spacing interval. The rung count comes from the shared
//! rise arithmetic in [`path`](crate::solvers::path); the horizontal run
//! follows from the climb angle rather than a user-picked top point.
//!
//! Like a stair, a ladder is a single path unit: any validation failure
//! aborts the whole ladder.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{snap_to_axis, Point3, Vec3};
use crate::kernel::{Axis, PlacedPrimitive, Placement, PrimitiveShape};
use crate::profile::StructuralProfile;
use crate::solvers::path::{ladder_rise, StairRise};
use crate::styles::StyleMap;

/// Input parameters for an access ladder.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "L-1",
///   "base": [0.0, 0.0, 0.0],
///   "direction": [1.0, 0.0, 0.0],
///   "rise": 108.0,
///   "width": 18.0,
///   "climb_angle": 1.309,
///   "rung_spacing": 12.0,
///   "rung_diameter": 1.25,
///   "rail_depth": 2.5,
///   "rail_thickness": 0.375
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderInput {
    /// User label (e.g. "L-1")
    pub label: String,

    /// Foot of the ladder, walking-surface level
    pub base: Point3,

    /// Horizontal direction the ladder leans toward; snapped to the
    /// nearest axis
    pub direction: Vec3,

    /// Total rise to the upper deck
    pub rise: f64,

    /// Clear rung width
    pub width: f64,

    /// Climb angle from horizontal, radians
    pub climb_angle: f64,

    /// Target rung spacing; the actual spacing is fitted to the rise
    pub rung_spacing: f64,

    /// Rung stock diameter
    pub rung_diameter: f64,

    /// Side rail section depth
    pub rail_depth: f64,

    /// Side rail thickness
    pub rail_thickness: f64,
}

impl Default for LadderInput {
    fn default() -> Self {
        LadderInput {
            label: "L-1".to_string(),
            base: Point3::origin(),
            direction: Vec3::new(1.0, 0.0, 0.0),
            rise: 108.0,
            width: 18.0,
            climb_angle: 75.0_f64.to_radians(),
            rung_spacing: 12.0,
            rung_diameter: 1.25,
            rail_depth: 2.5,
            rail_thickness: 0.375,
        }
    }
}

impl LadderInput {
    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        for (field, value) in [
            ("rise", self.rise),
            ("width", self.width),
            ("rung_spacing", self.rung_spacing),
            ("rung_diameter", self.rung_diameter),
            ("rail_depth", self.rail_depth),
            ("rail_thickness", self.rail_thickness),
        ] {
            if value <= 0.0 {
                return Err(LayoutError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }
        // Ladders are the steep complement of stairs: past 45 degrees,
        // short of plumb
        if self.climb_angle <= std::f64::consts::FRAC_PI_4
            || self.climb_angle >= std::f64::consts::FRAC_PI_2
        {
            return Err(LayoutError::invalid_input(
                "climb_angle",
                self.climb_angle.to_string(),
                "Climb angle must lie between 45 and 90 degrees",
            ));
        }
        snap_to_axis(&self.direction).map(|_| ())
    }

    /// Fitted rung layout for this ladder.
    pub fn rise_layout(&self) -> LayoutResult<StairRise> {
        ladder_rise(self.rise, self.rung_spacing, self.climb_angle)
    }
}

// Rotation laying a Z-axis rung along the snapped lateral direction.
fn rung_rotation(lateral: &Vec3) -> (Axis, f64) {
    if lateral.x.abs() > 0.5 {
        (Axis::Y, lateral.x.signum() * std::f64::consts::FRAC_PI_2)
    } else {
        (Axis::X, -lateral.y.signum() * std::f64::consts::FRAC_PI_2)
    }
}

/// Lay out the ladder in world coordinates.
pub fn layout(input: &LadderInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let layer = styles.layer("mezz-ladder");
    let rise = input.rise_layout()?;

    let lean = snap_to_axis(&input.direction)?;
    let lateral = snap_to_axis(&Vec3::new(-lean.y, lean.x, 0.0))?;
    let up = Axis::Z.unit();

    let mut prims = Vec::new();

    // Side rails along the incline
    let rail = StructuralProfile::rectangle(input.rail_thickness, input.rail_depth)?;
    let top = input.base + lean * rise.run_length + up * input.rise;
    for side in [-1.0, 1.0] {
        let shift = lateral * (side * input.width / 2.0);
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Sweep {
                profile: rail.clone(),
                path: [input.base + shift, top + shift],
            },
            placement: Placement::identity(),
            layer: layer.clone(),
        });
    }

    // Rungs between the rails, one per fitted spacing
    let (axis, angle) = rung_rotation(&lateral);
    let slope_advance = 1.0 / input.climb_angle.tan();
    for i in 1..=rise.riser_count {
        let height = i as f64 * rise.riser_height;
        let center = input.base + lean * (height * slope_advance) + up * height;
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Frustum {
                height: input.width,
                base_radius: input.rung_diameter / 2.0,
                top_radius: input.rung_diameter / 2.0,
            },
            placement: Placement::identity()
                .rotated(axis, angle)
                .translated(center - Point3::origin()),
            layer: layer.clone(),
        });
    }

    Ok(prims)
}
