//! # Assembly Placement Drivers
//!
//! One driver per manufactured assembly. Each follows the same pattern:
//!
//! - `*Input` - validated parameters (JSON-serializable, `Default` gives the
//!   standard catalog dimensions)
//! - `layout(input, styles) -> LayoutResult<Vec<PlacedPrimitive>>` - pure
//!   geometry in the assembly's local frame
//! - `build(input, styles, store, placement) -> LayoutResult<InstanceId>` -
//!   lookup-or-register the component definition, then place an instance
//!
//! Path-bound assemblies (rails, stairs, ladders) are placed in world
//! coordinates and skip the component store; their geometry depends on the
//! path, not on a reusable set of dimensions.

pub mod beam;
pub mod column;
pub mod frame;
pub mod ladder;
pub mod rack;
pub mod rail;
pub mod stair;
pub mod truss;

use serde::{Deserialize, Serialize};

pub use beam::{BeamInput, BeamStyle};
pub use column::{ColumnInput, PlateOffset};
pub use frame::FrameInput;
pub use ladder::LadderInput;
pub use rack::RackInput;
pub use rail::{RailInput, RailLayout};
pub use stair::StairInput;
pub use truss::{TrussInput, TrussOrientation};

/// Enum wrapper for all assembly types, so a project can hold a
/// heterogeneous collection with clean serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssemblyItem {
    /// Upright rack frame (posts plus cross bracing)
    Frame(FrameInput),
    /// Bar-joist truss
    Truss(TrussInput),
    /// Rack or mezzanine beam
    Beam(BeamInput),
    /// Column with optional baseplate
    Column(ColumnInput),
    /// Guardrail run over a placement path
    Rail(RailInput),
    /// Stair flight
    Stair(StairInput),
    /// Access ladder
    Ladder(LadderInput),
    /// Complete rack grid
    Rack(RackInput),
}

impl AssemblyItem {
    /// User-provided label for this assembly.
    pub fn label(&self) -> &str {
        match self {
            AssemblyItem::Frame(a) => &a.label,
            AssemblyItem::Truss(a) => &a.label,
            AssemblyItem::Beam(a) => &a.label,
            AssemblyItem::Column(a) => &a.label,
            AssemblyItem::Rail(a) => &a.label,
            AssemblyItem::Stair(a) => &a.label,
            AssemblyItem::Ladder(a) => &a.label,
            AssemblyItem::Rack(a) => &a.label,
        }
    }

    /// The assembly kind as a string.
    pub fn kind(&self) -> &'static str {
        match self {
            AssemblyItem::Frame(_) => "Frame",
            AssemblyItem::Truss(_) => "Truss",
            AssemblyItem::Beam(_) => "Beam",
            AssemblyItem::Column(_) => "Column",
            AssemblyItem::Rail(_) => "Rail",
            AssemblyItem::Stair(_) => "Stair",
            AssemblyItem::Ladder(_) => "Ladder",
            AssemblyItem::Rack(_) => "Rack",
        }
    }
}
