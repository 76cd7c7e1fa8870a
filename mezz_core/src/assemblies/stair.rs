//! # Stair Driver
//!
//! A straight stair flight between two points: a stringer on each side of
//! the run and a tread box per riser. The riser count comes from the shared
//! rise arithmetic in [`path`](crate::solvers::path); tread spacing is the
//! nominal tread depth minus the nosing overlap.
//!
//! A stair is a single path unit, so any validation failure aborts the
//! whole flight with the same segment-rejection error the rail driver
//! collects per segment.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{
    is_orthogonal, polar_bearing, polar_elevation, snap_to_axis, Point3, Vec3,
};
use crate::kernel::{Axis, PlacedPrimitive, Placement, PrimitiveShape};
use crate::profile::StructuralProfile;
use crate::solvers::path::{stair_rise, StairRise};
use crate::styles::StyleMap;

/// Input parameters for a stair flight.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "ST-1",
///   "start": [0.0, 0.0, 0.0],
///   "end": [120.0, 0.0, 108.0],
///   "width": 36.0,
///   "tread_depth": 11.0,
///   "tread_thickness": 1.0,
///   "tread_overlap": 1.0,
///   "target_riser_height": 7.0,
///   "stringer_depth": 9.5,
///   "stringer_thickness": 0.375
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StairInput {
    /// User label (e.g. "ST-1")
    pub label: String,

    /// Bottom of the flight, walking-surface level
    pub start: Point3,

    /// Top of the flight, upper-deck level
    pub end: Point3,

    /// Clear tread width
    pub width: f64,

    /// Tread depth, nose to back
    pub tread_depth: f64,

    /// Tread plate thickness
    pub tread_thickness: f64,

    /// Nosing overlap between consecutive treads
    pub tread_overlap: f64,

    /// Target riser height; the actual riser is fitted to the rise
    pub target_riser_height: f64,

    /// Stringer section depth
    pub stringer_depth: f64,

    /// Stringer plate thickness
    pub stringer_thickness: f64,
}

impl Default for StairInput {
    fn default() -> Self {
        StairInput {
            label: "ST-1".to_string(),
            start: Point3::origin(),
            end: Point3::origin(),
            width: 36.0,
            tread_depth: 11.0,
            tread_thickness: 1.0,
            tread_overlap: 1.0,
            target_riser_height: 7.0,
            stringer_depth: 9.5,
            stringer_thickness: 0.375,
        }
    }
}

impl StairInput {
    /// Validate input parameters and the flight direction.
    pub fn validate(&self) -> LayoutResult<()> {
        for (field, value) in [
            ("width", self.width),
            ("tread_depth", self.tread_depth),
            ("tread_thickness", self.tread_thickness),
            ("target_riser_height", self.target_riser_height),
            ("stringer_depth", self.stringer_depth),
            ("stringer_thickness", self.stringer_thickness),
        ] {
            if value <= 0.0 {
                return Err(LayoutError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }
        if self.tread_overlap < 0.0 || self.tread_overlap >= self.tread_depth {
            return Err(LayoutError::invalid_input(
                "tread_overlap",
                self.tread_overlap.to_string(),
                "Overlap must be non-negative and smaller than the tread depth",
            ));
        }
        self.check_direction().map(|_| ())
    }

    // Shared single-unit path checks; returns the rejection for the flight.
    fn check_direction(&self) -> LayoutResult<f64> {
        let reject = |reason: String| {
            LayoutError::segment_rejected(
                [self.start.x, self.start.y, self.start.z],
                [self.end.x, self.end.y, self.end.z],
                reason,
            )
        };
        let rise = self.end.z - self.start.z;
        if rise <= 0.0 {
            return Err(reject("Stair must climb; end is not above start".to_string()));
        }
        let bearing = polar_bearing(&self.start, &self.end);
        if !is_orthogonal(bearing) {
            return Err(reject(format!(
                "Bearing {:.1} degrees is not orthogonal to the layout axes",
                bearing.to_degrees()
            )));
        }
        let elevation = polar_elevation(&self.start, &self.end)
            .map_err(|e| reject(e.to_string()))?;
        if elevation < std::f64::consts::FRAC_PI_4 {
            return Err(reject(format!(
                "Stair is too steep: {:.1} degrees from vertical",
                elevation.to_degrees()
            )));
        }
        Ok(rise)
    }

    /// Fitted riser layout for this flight.
    pub fn rise_layout(&self) -> LayoutResult<StairRise> {
        let rise = self.check_direction()?;
        stair_rise(
            rise,
            self.target_riser_height,
            self.tread_depth,
            self.tread_overlap,
        )
    }
}

/// Lay out the flight in world coordinates.
pub fn layout(input: &StairInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let layer = styles.layer("mezz-stair");
    let rise = input.rise_layout()?;
    let total_rise = input.end.z - input.start.z;
    let bearing = polar_bearing(&input.start, &input.end);

    let flat = Vec3::new(
        input.end.x - input.start.x,
        input.end.y - input.start.y,
        0.0,
    );
    let horiz = snap_to_axis(&flat)?;
    let lateral = snap_to_axis(&Vec3::new(-flat.y, flat.x, 0.0))?;
    let up = Axis::Z.unit();

    let mut prims = Vec::new();

    // Stringers climb the nominal run on both sides of the centerline
    let stringer = StructuralProfile::rectangle(input.stringer_thickness, input.stringer_depth)?;
    let top = input.start + horiz * rise.run_length + up * total_rise;
    for side in [-1.0, 1.0] {
        let shift = lateral * (side * input.width / 2.0);
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Sweep {
                profile: stringer.clone(),
                path: [input.start + shift, top + shift],
            },
            placement: Placement::identity(),
            layer: layer.clone(),
        });
    }

    // One tread per riser except the top step, which lands on the deck
    let pitch = input.tread_depth - input.tread_overlap;
    for i in 1..rise.riser_count {
        let i = i as f64;
        let center = input.start
            + horiz * ((i - 1.0) * pitch + input.tread_depth / 2.0)
            + up * (i * rise.riser_height - input.tread_thickness / 2.0);
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Box {
                x: input.tread_depth,
                y: input.width,
                z: input.tread_thickness,
            },
            placement: Placement::identity()
                .rotated(Axis::Z, bearing)
                .translated(center - Point3::origin()),
            layer: layer.clone(),
        });
    }

    Ok(prims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TransformOp;

    fn flight() -> StairInput {
        StairInput {
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(141.0, 0.0, 108.0),
            ..StairInput::default()
        }
    }

    #[test]
    fn test_riser_fit() {
        let rise = flight().rise_layout().unwrap();
        assert_eq!(rise.riser_count, 15);
        assert!((rise.riser_height - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_flight_census() {
        let prims = layout(&flight(), &StyleMap::default()).unwrap();
        // 2 stringers + 14 treads
        assert_eq!(prims.len(), 16);
    }

    #[test]
    fn test_tread_pitch() {
        let input = flight();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let centers: Vec<Vec3> = prims[2..]
            .iter()
            .map(|p| match &p.placement.ops[1] {
                TransformOp::Translate { offset } => *offset,
                other => panic!("unexpected op {:?}", other),
            })
            .collect();
        // Consecutive treads advance depth minus overlap and climb one riser
        let step = centers[1] - centers[0];
        assert!((step.x - 10.0).abs() < 1e-9);
        assert!((step.z - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_descending_flight_rejected() {
        let input = StairInput {
            end: Point3::new(141.0, 0.0, -108.0),
            ..flight()
        };
        let err = layout(&input, &StyleMap::default()).unwrap_err();
        assert_eq!(err.error_code(), "SEGMENT_REJECTED");
    }

    #[test]
    fn test_diagonal_flight_rejected() {
        let input = StairInput {
            end: Point3::new(100.0, 100.0, 108.0),
            ..flight()
        };
        assert!(layout(&input, &StyleMap::default()).is_err());
    }

    #[test]
    fn test_too_steep_flight_rejected() {
        // Climbing 108 over a 50 run is past 45 degrees
        let input = StairInput {
            end: Point3::new(50.0, 0.0, 108.0),
            ..flight()
        };
        let err = layout(&input, &StyleMap::default()).unwrap_err();
        assert!(err.to_string().contains("too steep"));
    }
}
