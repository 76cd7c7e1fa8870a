//! # Upright Frame Driver
//!
//! An upright frame is two square posts tied together by horizontal braces
//! and a zig-zag of diagonal braces between them. The brace count comes from
//! the [`braces`](crate::solvers::braces) solver; this driver turns the
//! layout into primitives.
//!
//! Local frame: X is the post depth (thickness) direction, Y runs across the
//! frame width, Z is up. The near post sits at the origin side, the far post
//! at `y = width`.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "label": "F-1",
//!   "height": 96.0,
//!   "width": 42.0,
//!   "diameter": 3.0,
//!   "braces": { "brace_size": 1.0, "end_margin": 8.0, "min_angle": 1.047 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point3, Vec3};
use crate::kernel::{
    Axis, ComponentId, ComponentKey, ComponentStore, InstanceId, PlacedPrimitive, Placement,
    PrimitiveShape,
};
use crate::profile::StructuralProfile;
use crate::solvers::braces::{self, BraceConfig};
use crate::styles::StyleMap;

/// Input parameters for an upright frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInput {
    /// User label (e.g. "F-1")
    pub label: String,

    /// Overall frame height
    pub height: f64,

    /// Overall frame width, outside of post to outside of post
    pub width: f64,

    /// Post cross-section size (square posts)
    pub diameter: f64,

    /// Brace solver tuning
    pub braces: BraceConfig,
}

impl Default for FrameInput {
    fn default() -> Self {
        FrameInput {
            label: "F-1".to_string(),
            height: 96.0,
            width: 42.0,
            diameter: 3.0,
            braces: BraceConfig::default(),
        }
    }
}

impl FrameInput {
    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.height <= 0.0 {
            return Err(LayoutError::invalid_input(
                "height",
                self.height.to_string(),
                "Height must be positive",
            ));
        }
        if self.diameter <= 0.0 {
            return Err(LayoutError::invalid_input(
                "diameter",
                self.diameter.to_string(),
                "Post diameter must be positive",
            ));
        }
        if self.width <= 2.0 * self.diameter {
            return Err(LayoutError::invalid_input(
                "width",
                self.width.to_string(),
                "Width must exceed two post diameters",
            ));
        }
        if self.braces.brace_size <= 0.0 {
            return Err(LayoutError::invalid_input(
                "braces.brace_size",
                self.braces.brace_size.to_string(),
                "Brace size must be positive",
            ));
        }
        if self.height <= self.braces.end_margin {
            return Err(LayoutError::invalid_input(
                "braces.end_margin",
                self.braces.end_margin.to_string(),
                "End margin leaves no braced height",
            ));
        }
        Ok(())
    }

    /// Cache key identifying this frame geometry.
    pub fn component_key(&self) -> ComponentKey {
        ComponentKey::new("frame", &[self.height, self.width, self.diameter])
    }
}

/// Lay out the frame in its local coordinates.
pub fn layout(input: &FrameInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let layer = styles.layer("rack-frame");
    let d = input.diameter;
    let h = input.height;
    let span = input.width - 2.0 * d;
    let solved = braces::solve(h, input.width, d, &input.braces);
    let size = solved.brace_size;
    let n = solved.count as usize;

    let mut prims = Vec::with_capacity(2 + (n + 1) + n);

    // Posts at both edges of the width
    for dist in [d, input.width] {
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Box { x: d, y: d, z: h },
            placement: Placement::translation(Vec3::new(d / 2.0, dist - d / 2.0, h / 2.0)),
            layer: layer.clone(),
        });
    }

    // Horizontal braces: one below each bay plus one above the last
    let pitch = solved.spacing + size;
    for i in 0..=n {
        let z = solved.leftover / 2.0 + pitch * i as f64 + size / 2.0;
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Box {
                x: size,
                y: span,
                z: size,
            },
            placement: Placement::translation(Vec3::new(size / 2.0, input.width / 2.0, z)),
            layer: layer.clone(),
        });
    }

    // Diagonal braces zig-zag between consecutive horizontals. Even bays
    // run near-to-far; odd bays are spun about Z and anchored at the far
    // post so the diagonals alternate.
    let profile = StructuralProfile::square(size)?;
    let rise = solved.spacing - size;
    for i in 0..n {
        let z = solved.leftover / 2.0 + pitch * i as f64 + size;
        let sweep = PrimitiveShape::Sweep {
            profile: profile.clone(),
            path: [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, span, rise)],
        };
        let placement = if i % 2 == 0 {
            Placement::translation(Vec3::new(0.0, d, z))
        } else {
            Placement::identity()
                .rotated(Axis::Z, std::f64::consts::PI)
                .translated(Vec3::new(size, input.width - d, z))
        };
        prims.push(PlacedPrimitive {
            shape: sweep,
            placement,
            layer: layer.clone(),
        });
    }

    Ok(prims)
}

/// Register the frame component if needed and place one instance.
pub fn build(
    input: &FrameInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
    placement: Placement,
) -> LayoutResult<InstanceId> {
    let id = ensure_component(input, styles, store)?;
    store.place(id, placement)
}

/// Lookup-or-register the frame definition.
pub fn ensure_component(
    input: &FrameInput,
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
    use crate::kernel::InMemoryStore;

    #[test]
    fn test_frame_primitive_counts() {
        // Default 96x42x3 frame: solver picks n bays, so 2 posts,
        // n+1 horizontals, n diagonals
        let input = FrameInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let solved = braces::solve(input.height, input.width, input.diameter, &input.braces);
        let n = solved.count as usize;
        assert_eq!(prims.len(), 2 + (n + 1) + n);
    }

    #[test]
    fn test_frame_posts_span_width() {
        let input = FrameInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        // First two primitives are the posts
        let centers: Vec<f64> = prims[..2]
            .iter()
            .map(|p| match &p.placement.ops[0] {
                crate::kernel::TransformOp::Translate { offset } => offset.y,
                other => panic!("unexpected op {:?}", other),
            })
            .collect();
        assert!((centers[0] - 1.5).abs() < 1e-9);
        assert!((centers[1] - 40.5).abs() < 1e-9);
    }

    #[test]
    fn test_frame_braces_alternate() {
        // Force several bays with a tall frame
        let input = FrameInput {
            height: 240.0,
            ..FrameInput::default()
        };
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let diagonals: Vec<&PlacedPrimitive> = prims
            .iter()
            .filter(|p| matches!(p.shape, PrimitiveShape::Sweep { .. }))
            .collect();
        assert!(diagonals.len() >= 2);
        // Odd diagonals carry the half-turn
        for (i, diag) in diagonals.iter().enumerate() {
            let has_rotation = diag
                .placement
                .ops
                .iter()
                .any(|op| matches!(op, crate::kernel::TransformOp::Rotate { .. }));
            assert_eq!(has_rotation, i % 2 == 1, "diagonal {}", i);
        }
    }

    #[test]
    fn test_frame_rejects_narrow_width() {
        let input = FrameInput {
            width: 5.0,
            ..FrameInput::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_frame_component_cached_once() {
        let mut store = InMemoryStore::new();
        let styles = StyleMap::default();
        let input = FrameInput::default();
        build(&input, &styles, &mut store, Placement::identity()).unwrap();
        build(
            &input,
            &styles,
            &mut store,
            Placement::translation(Vec3::new(100.0, 0.0, 0.0)),
        )
        .unwrap();
        assert_eq!(store.component_count(), 1);
        assert_eq!(store.instances().len(), 2);
    }
}
