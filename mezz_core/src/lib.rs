//! # mezz_core - Parametric Layout Engine for Rack & Mezzanine Structures
//!
//! `mezz_core` computes the geometry of warehouse storage structures -
//! pallet-rack frames and runs, bar-joist trusses, beams, columns,
//! guardrails, stairs, and ladders - from a handful of catalog dimensions.
//! It emits placed geometric primitives and component placements; the host
//! CAD environment supplies the solid-modeling kernel and the drawing
//! database behind two small traits.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Skip and report**: A bad rail segment or rod is reported and worked
//!   around, never silently dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use mezz_core::assemblies::{frame, FrameInput};
//! use mezz_core::kernel::{ComponentStore, InMemoryStore, Placement};
//! use mezz_core::styles::StyleMap;
//!
//! let mut store = InMemoryStore::new();
//! let styles = StyleMap::default();
//!
//! // Lay out a standard 96x42 upright frame and place it at the origin
//! let input = FrameInput::default();
//! frame::build(&input, &styles, &mut store, Placement::identity()).unwrap();
//! assert_eq!(store.component_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and settings
//! - [`assemblies`] - Placement drivers for every assembly type
//! - [`solvers`] - Pure numeric engines (braces, truss web, paths)
//! - [`geometry`] - Polar-angle and axis-snapping helpers
//! - [`profile`] - Standard structural cross-sections
//! - [`kernel`] - Host contracts: component store and geometry kernel
//! - [`styles`] - Drawing layer and color assignments
//! - [`errors`] - Structured error types

pub mod assemblies;
pub mod errors;
pub mod geometry;
pub mod kernel;
pub mod profile;
pub mod project;
pub mod solvers;
pub mod styles;

// Re-export commonly used types at crate root for convenience
pub use errors::{LayoutError, LayoutResult};
pub use kernel::{ComponentKey, ComponentStore, GeometryKernel, PlacedPrimitive, Placement};
pub use project::{GlobalSettings, Project, ProjectMetadata};
pub use styles::StyleMap;
