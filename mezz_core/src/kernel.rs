//! # External Collaborator Contracts
//!
//! The core never talks to a CAD document or a solid-modeling kernel
//! directly. Drivers emit ordered lists of [`PlacedPrimitive`] values and
//! hand them to two traits the host supplies:
//!
//! - [`ComponentStore`] - the host document's named-component table. The
//!   contract is at-most-one registration per [`ComponentKey`];
//!   re-registering an existing key returns the existing id (success, not
//!   an error). A multi-threaded host must make check-and-register atomic.
//! - [`GeometryKernel`] - turns primitives into solids. Only the truss web
//!   needs anything back from it (bounding extents), and the solver computes
//!   those analytically, so the kernel is purely a sink here.
//!
//! [`InMemoryStore`] is a reference implementation of the store contract,
//! used by the tests and available to hosts that just want the layout data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point3, Vec3};
use crate::profile::StructuralProfile;

/// Identifier of a registered component definition.
pub type ComponentId = u64;

/// Identifier of a placed component instance.
pub type InstanceId = u64;

/// Identifier of a solid produced by the geometry kernel.
pub type SolidId = u64;

/// A coordinate axis, used for rotations and mirror planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// One step of a rigid placement, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformOp {
    /// Rotate about a coordinate axis through the origin (radians).
    Rotate { axis: Axis, angle: f64 },
    /// Translate by an offset.
    Translate { offset: Vec3 },
    /// Mirror across the plane through the origin with the given normal.
    Mirror { normal: Axis },
}

/// An ordered list of transform steps positioning a primitive or instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub ops: Vec<TransformOp>,
}

impl Placement {
    /// Identity placement.
    pub fn identity() -> Self {
        Placement { ops: Vec::new() }
    }

    /// Pure translation.
    pub fn translation(offset: Vec3) -> Self {
        Placement {
            ops: vec![TransformOp::Translate { offset }],
        }
    }

    /// Append a rotation step.
    pub fn rotated(mut self, axis: Axis, angle: f64) -> Self {
        self.ops.push(TransformOp::Rotate { axis, angle });
        self
    }

    /// Append a translation step.
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.ops.push(TransformOp::Translate { offset });
        self
    }

    /// Append a mirror step.
    pub fn mirrored(mut self, normal: Axis) -> Self {
        self.ops.push(TransformOp::Mirror { normal });
        self
    }
}

/// Shape descriptor for a single solid, in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum PrimitiveShape {
    /// Axis-aligned box centered on the origin.
    Box { x: f64, y: f64, z: f64 },
    /// Circular frustum centered on the origin, axis along Z. Truss rods
    /// use equal radii (a plain cylinder).
    Frustum {
        height: f64,
        base_radius: f64,
        top_radius: f64,
    },
    /// A profile extruded along its normal. Before any placement ops the
    /// profile stands in the vertical XZ plane - profile x along world X,
    /// profile y along world Z (up) - and the extrusion advances along
    /// world Y.
    Extrusion {
        profile: StructuralProfile,
        distance: f64,
        taper: f64,
    },
    /// A profile swept along a straight line.
    Sweep {
        profile: StructuralProfile,
        path: [Point3; 2],
    },
}

/// The final output unit of every driver: a shape, where it goes, and the
/// drawing layer it belongs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPrimitive {
    pub shape: PrimitiveShape,
    pub placement: Placement,
    pub layer: String,
}

/// Structured component-cache key: a kind tag plus dimensions rounded to
/// 1e-6, replacing the formatted-string names the host document uses so
/// equality is locale- and format-independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentKey {
    kind: String,
    dims: Vec<i64>,
}

/// Rounding scale for key dimensions (1e-6 of a unit).
const KEY_SCALE: f64 = 1e6;

impl ComponentKey {
    /// Build a key from a kind tag and the dimensions that identify the
    /// component geometry.
    pub fn new(kind: impl Into<String>, dims: &[f64]) -> Self {
        ComponentKey {
            kind: kind.into(),
            dims: dims.iter().map(|d| (d * KEY_SCALE).round() as i64).collect(),
        }
    }

    /// Human-readable name, e.g. `"frame-96x42x3"`.
    pub fn display_name(&self) -> String {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|d| format!("{}", *d as f64 / KEY_SCALE))
            .collect();
        format!("{}-{}", self.kind, dims.join("x"))
    }
}

/// Host document's named-component table.
pub trait ComponentStore {
    /// Look up an already-registered component.
    fn lookup(&self, key: &ComponentKey) -> Option<ComponentId>;

    /// Register a component definition. Registering a key that already
    /// exists returns the existing id; it is not an error.
    fn register(
        &mut self,
        key: ComponentKey,
        primitives: Vec<PlacedPrimitive>,
    ) -> LayoutResult<ComponentId>;

    /// Place an instance of a registered component.
    fn place(&mut self, id: ComponentId, placement: Placement) -> LayoutResult<InstanceId>;
}

/// Solid-geometry kernel contract.
pub trait GeometryKernel {
    /// Extrude a closed profile by `distance` with an optional taper angle.
    fn extrude(
        &mut self,
        profile: &StructuralProfile,
        distance: f64,
        taper: f64,
    ) -> LayoutResult<SolidId>;

    /// Sweep a closed profile along a straight line.
    fn sweep(&mut self, profile: &StructuralProfile, path: &[Point3; 2]) -> LayoutResult<SolidId>;

    /// Construct a circular frustum (truss rod stock).
    fn frustum(&mut self, height: f64, base_radius: f64, top_radius: f64)
        -> LayoutResult<SolidId>;

    /// Axis-aligned bounding box of a solid.
    fn bounding_box(&self, id: SolidId) -> LayoutResult<(Point3, Point3)>;
}

/// Outcome of realizing a primitive list against a kernel.
///
/// Failed rods get a placeholder so one bad frustum does not abort the rest
/// of the structure; every failure is reported alongside the solids.
#[derive(Debug, Default)]
pub struct RealizeOutcome {
    pub solids: Vec<SolidId>,
    pub failures: Vec<LayoutError>,
}

/// Turn a driver's primitive list into kernel solids.
///
/// Boxes become zero-taper extrusions of a rectangle. Frustum failures are
/// reported with the offending length/diameter and replaced by a degenerate
/// placeholder box; any other kernel failure is reported and the primitive
/// skipped. The caller decides whether failures abort the build.
pub fn realize(
    primitives: &[PlacedPrimitive],
    kernel: &mut dyn GeometryKernel,
) -> RealizeOutcome {
    let mut outcome = RealizeOutcome::default();
    for prim in primitives {
        let result = match &prim.shape {
            // Profile in the XZ plane, extruded along Y
            PrimitiveShape::Box { x, y, z } => StructuralProfile::rectangle(*x, *z)
                .and_then(|p| kernel.extrude(&p, *y, 0.0)),
            PrimitiveShape::Extrusion {
                profile,
                distance,
                taper,
            } => kernel.extrude(profile, *distance, *taper),
            PrimitiveShape::Sweep { profile, path } => kernel.sweep(profile, path),
            PrimitiveShape::Frustum {
                height,
                base_radius,
                top_radius,
            } => match kernel.frustum(*height, *base_radius, *top_radius) {
                Ok(id) => Ok(id),
                Err(e) => {
                    outcome.failures.push(LayoutError::geometry_failed(
                        "frustum",
                        format!("length = {}, diameter = {}", height, base_radius * 2.0),
                        e.to_string(),
                    ));
                    // Placeholder keeps the rest of the structure intact
                    StructuralProfile::rectangle(base_radius.max(1e-3), base_radius.max(1e-3))
                        .and_then(|p| kernel.extrude(&p, height.max(1e-3), 0.0))
                }
            },
        };
        match result {
            Ok(id) => outcome.solids.push(id),
            Err(e) => outcome.failures.push(e),
        }
    }
    outcome
}

/// In-memory reference implementation of [`ComponentStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    components: HashMap<ComponentKey, ComponentId>,
    definitions: HashMap<ComponentId, Vec<PlacedPrimitive>>,
    instances: Vec<(ComponentId, Placement)>,
    next_id: u64,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives registered under `id`, if any.
    pub fn definition(&self, id: ComponentId) -> Option<&[PlacedPrimitive]> {
        self.definitions.get(&id).map(|v| v.as_slice())
    }

    /// All placed instances, in placement order.
    pub fn instances(&self) -> &[(ComponentId, Placement)] {
        &self.instances
    }

    /// Number of distinct registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl ComponentStore for InMemoryStore {
    fn lookup(&self, key: &ComponentKey) -> Option<ComponentId> {
        self.components.get(key).copied()
    }

    fn register(
        &mut self,
        key: ComponentKey,
        primitives: Vec<PlacedPrimitive>,
    ) -> LayoutResult<ComponentId> {
        if let Some(id) = self.components.get(&key) {
            return Ok(*id);
        }
        self.next_id += 1;
        let id = self.next_id;
        self.components.insert(key, id);
        self.definitions.insert(id, primitives);
        Ok(id)
    }

    fn place(&mut self, id: ComponentId, placement: Placement) -> LayoutResult<InstanceId> {
        if !self.definitions.contains_key(&id) {
            return Err(LayoutError::component_store(
                id.to_string(),
                "Unknown component id",
            ));
        }
        self.instances.push((id, placement));
        Ok(self.instances.len() as InstanceId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_prim() -> PlacedPrimitive {
        PlacedPrimitive {
            shape: PrimitiveShape::Box {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            placement: Placement::identity(),
            layer: "test".to_string(),
        }
    }

    #[test]
    fn test_component_key_tolerant_equality() {
        let a = ComponentKey::new("frame", &[96.0, 42.0, 3.0]);
        let b = ComponentKey::new("frame", &[96.0 + 1e-9, 42.0, 3.0]);
        assert_eq!(a, b);
        assert_eq!(a.display_name(), "frame-96x42x3");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = InMemoryStore::new();
        let key = ComponentKey::new("frame", &[96.0, 42.0]);
        let id1 = store.register(key.clone(), vec![box_prim()]).unwrap();
        let id2 = store.register(key.clone(), Vec::new()).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.component_count(), 1);
        // The original definition is kept
        assert_eq!(store.definition(id1).unwrap().len(), 1);
    }

    #[test]
    fn test_place_unknown_component() {
        let mut store = InMemoryStore::new();
        assert!(store.place(99, Placement::identity()).is_err());
    }

    struct RecordingKernel {
        calls: Vec<&'static str>,
        fail_frustum: bool,
        next: u64,
    }

    impl GeometryKernel for RecordingKernel {
        fn extrude(
            &mut self,
            _profile: &StructuralProfile,
            _distance: f64,
            _taper: f64,
        ) -> LayoutResult<SolidId> {
            self.calls.push("extrude");
            self.next += 1;
            Ok(self.next)
        }

        fn sweep(
            &mut self,
            _profile: &StructuralProfile,
            _path: &[Point3; 2],
        ) -> LayoutResult<SolidId> {
            self.calls.push("sweep");
            self.next += 1;
            Ok(self.next)
        }

        fn frustum(&mut self, height: f64, base_radius: f64, _top: f64) -> LayoutResult<SolidId> {
            self.calls.push("frustum");
            if self.fail_frustum {
                return Err(LayoutError::geometry_failed(
                    "frustum",
                    format!("length = {}, radius = {}", height, base_radius),
                    "degenerate dimensions",
                ));
            }
            self.next += 1;
            Ok(self.next)
        }

        fn bounding_box(&self, _id: SolidId) -> LayoutResult<(Point3, Point3)> {
            Ok((Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)))
        }
    }

    #[test]
    fn test_realize_reports_rod_failure_and_continues() {
        let rod = PlacedPrimitive {
            shape: PrimitiveShape::Frustum {
                height: 20.0,
                base_radius: 0.4375,
                top_radius: 0.4375,
            },
            placement: Placement::identity(),
            layer: "truss".to_string(),
        };
        let mut kernel = RecordingKernel {
            calls: Vec::new(),
            fail_frustum: true,
            next: 0,
        };
        let outcome = realize(&[rod, box_prim()], &mut kernel);
        // Placeholder solid plus the box: nothing lost
        assert_eq!(outcome.solids.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        let msg = outcome.failures[0].to_string();
        assert!(msg.contains("length = 20"));
        assert!(msg.contains("diameter = 0.875"));
    }
}
