//! # Truss Driver
//!
//! A bar-joist truss: two mirrored top chords running the full span, two
//! mirrored bottom chords inset past the end rods, a short seat chord at
//! each end, and the open web of round rods laid out by the
//! [`truss_web`](crate::solvers::truss_web) solver.
//!
//! Local frame: the span axis `d` runs along X (or Y for a Y-oriented
//! truss), Z is up, and z = 0 is the top-chord seat plane, so the whole
//! truss hangs in negative Z. Chord pairs are a sweep plus its mirror twin
//! across the vertical span plane.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point3, Vec3};
use crate::kernel::{
    Axis, ComponentId, ComponentKey, ComponentStore, InstanceId, PlacedPrimitive, Placement,
    PrimitiveShape,
};
use crate::profile::StructuralProfile;
use crate::solvers::truss_web::{self, Rod2d, TrussWebParams};
use crate::styles::StyleMap;

/// Which plan axis the truss spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrussOrientation {
    X,
    Y,
}

impl TrussOrientation {
    fn as_str(&self) -> &'static str {
        match self {
            TrussOrientation::X => "x",
            TrussOrientation::Y => "y",
        }
    }

    // Span point at distance d, height z.
    fn point(&self, d: f64, z: f64) -> Point3 {
        match self {
            TrussOrientation::X => Point3::new(d, 0.0, z),
            TrussOrientation::Y => Point3::new(0.0, d, z),
        }
    }

    // Mirror normal for the chord twin.
    fn mirror_normal(&self) -> Axis {
        match self {
            TrussOrientation::X => Axis::Y,
            TrussOrientation::Y => Axis::X,
        }
    }

    // Rotation standing a Z-axis rod into the web plane with signed slant
    // parameter `p`.
    fn rod_rotation(&self, p: f64) -> (Axis, f64) {
        match self {
            TrussOrientation::X => (Axis::Y, -p),
            TrussOrientation::Y => (Axis::X, p),
        }
    }
}

/// Input parameters for a bar-joist truss.
///
/// Angles are radians from vertical.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "T-1",
///   "length": 240.0,
///   "height": 18.0,
///   "chord_width": 1.25,
///   "chord_thickness": 0.125,
///   "chord_near_end_length": 8.0,
///   "chord_far_end_length": 8.0,
///   "rod_diameter": 0.875,
///   "rod_end_angle": 1.047,
///   "rod_mid_angle": 0.611,
///   "orientation": "x"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrussInput {
    /// User label (e.g. "T-1")
    pub label: String,

    /// Overall span
    pub length: f64,

    /// Overall depth, top of top chord to bottom of bottom chord
    pub height: f64,

    /// Chord angle leg size
    pub chord_width: f64,

    /// Chord angle wall thickness
    pub chord_thickness: f64,

    /// Seat chord length at the near end
    pub chord_near_end_length: f64,

    /// Seat chord length at the far end
    pub chord_far_end_length: f64,

    /// Web rod diameter
    pub rod_diameter: f64,

    /// End-rod angle from vertical
    pub rod_end_angle: f64,

    /// Mid-rod angle from vertical
    pub rod_mid_angle: f64,

    /// Span axis
    pub orientation: TrussOrientation,
}

impl Default for TrussInput {
    fn default() -> Self {
        TrussInput {
            label: "T-1".to_string(),
            length: 240.0,
            height: 18.0,
            chord_width: 1.25,
            chord_thickness: 0.125,
            chord_near_end_length: 8.0,
            chord_far_end_length: 8.0,
            rod_diameter: 0.875,
            rod_end_angle: 60.0_f64.to_radians(),
            rod_mid_angle: 35.0_f64.to_radians(),
            orientation: TrussOrientation::X,
        }
    }
}

impl TrussInput {
    /// The solver-facing parameter set.
    pub fn web_params(&self) -> TrussWebParams {
        TrussWebParams {
            truss_length: self.length,
            truss_height: self.height,
            chord_width: self.chord_width,
            chord_near_end_length: self.chord_near_end_length,
            chord_far_end_length: self.chord_far_end_length,
            rod_diameter: self.rod_diameter,
            rod_end_angle: self.rod_end_angle,
            rod_mid_angle: self.rod_mid_angle,
        }
    }

    /// Validate input parameters, including the web viability gate.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.length <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::invalid_input(
                "length",
                format!("{} x {}", self.length, self.height),
                "Span and depth must be positive",
            ));
        }
        if self.chord_width <= 0.0 || self.chord_thickness <= 0.0 {
            return Err(LayoutError::invalid_input(
                "chord_width",
                format!("{} / {}", self.chord_width, self.chord_thickness),
                "Chord dimensions must be positive",
            ));
        }
        if self.chord_thickness >= self.chord_width {
            return Err(LayoutError::invalid_input(
                "chord_thickness",
                self.chord_thickness.to_string(),
                "Chord wall must be thinner than the leg",
            ));
        }
        if self.chord_near_end_length < 0.0 || self.chord_far_end_length < 0.0 {
            return Err(LayoutError::invalid_input(
                "chord_near_end_length",
                format!(
                    "{} / {}",
                    self.chord_near_end_length, self.chord_far_end_length
                ),
                "Seat chord lengths cannot be negative",
            ));
        }
        if self.rod_diameter <= 0.0 {
            return Err(LayoutError::invalid_input(
                "rod_diameter",
                self.rod_diameter.to_string(),
                "Rod diameter must be positive",
            ));
        }
        for (field, angle) in [
            ("rod_end_angle", self.rod_end_angle),
            ("rod_mid_angle", self.rod_mid_angle),
        ] {
            if angle <= 0.0 || angle >= std::f64::consts::FRAC_PI_2 {
                return Err(LayoutError::invalid_input(
                    field,
                    angle.to_string(),
                    "Rod angles must lie strictly between 0 and 90 degrees",
                ));
            }
        }
        self.web_params().check_viability()
    }

    /// Cache key identifying this truss geometry.
    pub fn component_key(&self) -> ComponentKey {
        ComponentKey::new(
            format!("truss-{}", self.orientation.as_str()),
            &[
                self.length,
                self.height,
                self.chord_width,
                self.chord_thickness,
                self.chord_near_end_length,
                self.chord_far_end_length,
                self.rod_diameter,
                self.rod_end_angle,
                self.rod_mid_angle,
            ],
        )
    }
}

// Chord sweep between span distances, optionally mirrored to the twin side.
fn chord(
    input: &TrussInput,
    profile: StructuralProfile,
    d0: f64,
    d1: f64,
    z: f64,
    mirrored: bool,
    layer: &str,
) -> PlacedPrimitive {
    let mut placement = Placement::identity();
    if mirrored {
        placement = placement.mirrored(input.orientation.mirror_normal());
    }
    // Chord pairs straddle the web plane, leaving half a rod diameter on
    // each side for the rods to pass between them
    let side = if mirrored { -1.0 } else { 1.0 };
    let clearance = side * input.rod_diameter / 2.0;
    let lateral = match input.orientation {
        TrussOrientation::X => Vec3::new(0.0, clearance, 0.0),
        TrussOrientation::Y => Vec3::new(clearance, 0.0, 0.0),
    };
    placement = placement.translated(lateral + Vec3::new(0.0, 0.0, z));
    PlacedPrimitive {
        shape: PrimitiveShape::Sweep {
            profile,
            path: [
                input.orientation.point(d0, 0.0),
                input.orientation.point(d1, 0.0),
            ],
        },
        placement,
        layer: layer.to_string(),
    }
}

fn rod(input: &TrussInput, rod: &Rod2d, layer: &str) -> PlacedPrimitive {
    let (axis, angle) = input.orientation.rod_rotation(rod.angle);
    // The web solver measures heights from the seat plane, where the top
    // chord occupies [w, 2w]; this driver hangs the top chord at [-w, 0],
    // so rod centers drop by 2w to land in the same band as the chords
    let center = input
        .orientation
        .point(rod.distance, rod.height - 2.0 * input.chord_width);
    PlacedPrimitive {
        shape: PrimitiveShape::Frustum {
            height: rod.length,
            base_radius: rod.diameter / 2.0,
            top_radius: rod.diameter / 2.0,
        },
        placement: Placement::identity()
            .rotated(axis, angle)
            .translated(center - Point3::origin()),
        layer: layer.to_string(),
    }
}

/// Lay out the truss in its local coordinates.
pub fn layout(input: &TrussInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let layer = styles.layer("mezz-truss");
    let params = input.web_params();
    let w = input.chord_width;
    let t = input.chord_thickness;
    let web = truss_web::fill(&params);

    let mut prims = Vec::new();

    // Top chords: full span, legs down, mirrored pair
    for mirrored in [false, true] {
        prims.push(chord(
            input,
            StructuralProfile::chord_angle(w, t, -t, -w)?,
            0.0,
            input.length,
            0.0,
            mirrored,
            &layer,
        ));
    }

    // Bottom chords: inset past the end rods, legs up, mirrored pair
    let bottom_start = input.chord_near_end_length
        + (input.height - 3.0 * w) * input.rod_end_angle.tan()
        - input.rod_diameter / input.rod_end_angle.cos();
    let bottom_len = params.bottom_chord_length();
    for mirrored in [false, true] {
        prims.push(chord(
            input,
            StructuralProfile::chord_angle(w, t, t, w)?,
            bottom_start,
            bottom_start + bottom_len,
            -input.height,
            mirrored,
            &layer,
        ));
    }

    // Seat chords under the top chord at both ends, mirrored pairs like
    // the running chords
    for mirrored in [false, true] {
        prims.push(chord(
            input,
            StructuralProfile::chord_angle(w, t, t, w)?,
            0.0,
            input.chord_near_end_length,
            -2.0 * w,
            mirrored,
            &layer,
        ));
        prims.push(chord(
            input,
            StructuralProfile::chord_angle(w, t, t, w)?,
            input.length - input.chord_far_end_length,
            input.length,
            -2.0 * w,
            mirrored,
            &layer,
        ));
    }

    // Web rods
    prims.push(rod(input, &web.near_end, &layer));
    prims.push(rod(input, &web.far_end, &layer));
    for mid in &web.mid {
        prims.push(rod(input, mid, &layer));
    }

    Ok(prims)
}

/// Register the truss component if needed and place one instance.
pub fn build(
    input: &TrussInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
    placement: Placement,
) -> LayoutResult<InstanceId> {
    let id = ensure_component(input, styles, store)?;
    store.place(id, placement)
}

/// Lookup-or-register the truss definition.
pub fn ensure_component(
    input: &TrussInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
) -> LayoutResult<ComponentId> {
    let key = input.component_key();
    if let Some(id) = store.lookup(&key) {
        return Ok(id);
    }
    let prims = layout(input, styles)?;
    store.register(key, prims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{InMemoryStore, TransformOp};

    #[test]
    fn test_truss_primitive_census() {
        let input = TrussInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let sweeps = prims
            .iter()
            .filter(|p| matches!(p.shape, PrimitiveShape::Sweep { .. }))
            .count();
        let rods = prims
            .iter()
            .filter(|p| matches!(p.shape, PrimitiveShape::Frustum { .. }))
            .count();
        // 2 top + 2 bottom + 4 seat chords
        assert_eq!(sweeps, 8);
        let web = truss_web::fill(&input.web_params());
        assert_eq!(rods, 2 + web.mid.len());
    }

    #[test]
    fn test_bottom_chords_symmetric_inset() {
        let input = TrussInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        // Third primitive is the first bottom chord
        let (d0, d1) = match &prims[2].shape {
            PrimitiveShape::Sweep { path, .. } => (path[0].x, path[1].x),
            other => panic!("unexpected shape {:?}", other),
        };
        // Equal end lengths and angles leave equal margins at both ends
        assert!((d0 - (input.length - d1)).abs() < 1e-9);
        assert!(d0 > input.chord_near_end_length);
    }

    #[test]
    fn test_rods_stay_within_chord_band() {
        let input = TrussInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        for prim in &prims {
            let (length, radius) = match &prim.shape {
                PrimitiveShape::Frustum {
                    height,
                    base_radius,
                    ..
                } => (*height, *base_radius),
                _ => continue,
            };
            let angle = match &prim.placement.ops[0] {
                TransformOp::Rotate { angle, .. } => angle.abs(),
                other => panic!("unexpected op {:?}", other),
            };
            let z = match &prim.placement.ops[1] {
                TransformOp::Translate { offset } => offset.z,
                other => panic!("unexpected op {:?}", other),
            };
            // Vertical half-extent of a tilted cylinder
            let extent = length / 2.0 * angle.cos() + radius * angle.sin();
            assert!(
                z + extent <= 1e-9,
                "rod top {} pokes above the truss top",
                z + extent
            );
            assert!(
                z - extent >= -input.height - 1e-9,
                "rod bottom {} drops below the truss",
                z - extent
            );
        }
    }

    #[test]
    fn test_chord_pairs_straddle_web_plane() {
        let input = TrussInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let lateral = |prim: &PlacedPrimitive| match prim.placement.ops.last() {
            Some(TransformOp::Translate { offset }) => offset.y,
            other => panic!("unexpected op {:?}", other),
        };
        // Top chord and its mirror twin sit half a rod diameter on each
        // side of the web plane
        assert!((lateral(&prims[0]) - input.rod_diameter / 2.0).abs() < 1e-9);
        assert!((lateral(&prims[1]) + input.rod_diameter / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_seat_chords_come_in_mirrored_pairs() {
        let input = TrussInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        // Seat chords are the sweeps spanning the end lengths
        let seats: Vec<&PlacedPrimitive> = prims
            .iter()
            .filter(|p| match &p.shape {
                PrimitiveShape::Sweep { path, .. } => {
                    (path[1].x - path[0].x).abs() <= input.chord_near_end_length + 1e-9
                }
                _ => false,
            })
            .collect();
        assert_eq!(seats.len(), 4);
        let mirrored = seats
            .iter()
            .filter(|p| {
                p.placement
                    .ops
                    .iter()
                    .any(|op| matches!(op, TransformOp::Mirror { .. }))
            })
            .count();
        assert_eq!(mirrored, 2);
    }

    #[test]
    fn test_shallow_truss_rejected() {
        let input = TrussInput {
            height: 1.0,
            ..TrussInput::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.error_code(), "NOT_VIABLE");
    }

    #[test]
    fn test_y_orientation_rotates_rods_about_x() {
        let input = TrussInput {
            orientation: TrussOrientation::Y,
            ..TrussInput::default()
        };
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let first_rod = prims
            .iter()
            .find(|p| matches!(p.shape, PrimitiveShape::Frustum { .. }))
            .unwrap();
        match &first_rod.placement.ops[0] {
            TransformOp::Rotate { axis, .. } => assert_eq!(*axis, Axis::X),
            other => panic!("unexpected op {:?}", other),
        }
        // And the chords sweep along Y
        match &prims[0].shape {
            PrimitiveShape::Sweep { path, .. } => {
                assert!((path[1].y - input.length).abs() < 1e-9);
                assert!(path[1].x.abs() < 1e-9);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_orientation_distinguishes_keys() {
        let x = TrussInput::default();
        let y = TrussInput {
            orientation: TrussOrientation::Y,
            ..TrussInput::default()
        };
        assert_ne!(x.component_key(), y.component_key());
    }

    #[test]
    fn test_truss_component_cached_once() {
        let mut store = InMemoryStore::new();
        let styles = StyleMap::default();
        let input = TrussInput::default();
        build(&input, &styles, &mut store, Placement::identity()).unwrap();
        build(&input, &styles, &mut store, Placement::identity()).unwrap();
        assert_eq!(store.component_count(), 1);
        assert_eq!(store.instances().len(), 2);
    }
}
