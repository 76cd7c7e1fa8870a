//! # Beam Driver
//!
//! Straight beams swept from a standard section: stepped rack beams (the
//! step seats the pallet), plain box beams (also used as row spacers and
//! ties), and I-beam / C-channel sections for mezzanine framing.
//!
//! The section profile is drawn in the XY plane, stood up with a quarter
//! turn about Y, and swept along the beam's orientation axis. A Y-oriented
//! beam gets an extra quarter turn about Z so the section faces the aisle.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::Point3;
use crate::kernel::{
    Axis, ComponentId, ComponentKey, ComponentStore, InstanceId, PlacedPrimitive, Placement,
    PrimitiveShape,
};
use crate::profile::StructuralProfile;
use crate::styles::StyleMap;

/// Beam section styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamStyle {
    /// Stepped rack beam
    Step,
    /// Plain box section (beams, spacers, ties)
    Box,
    /// I-beam section
    IBeam,
    /// C-channel section
    CChannel,
}

impl BeamStyle {
    /// Tag used in component keys and layer lookup.
    pub fn as_str(&self) -> &'static str {
        match self {
            BeamStyle::Step => "step",
            BeamStyle::Box => "box",
            BeamStyle::IBeam => "ibeam",
            BeamStyle::CChannel => "cchannel",
        }
    }

    /// Style-map kind for the drawing layer.
    fn layer_kind(&self) -> &'static str {
        match self {
            BeamStyle::Step | BeamStyle::Box => "rack-beam",
            BeamStyle::IBeam | BeamStyle::CChannel => "mezz-beam",
        }
    }
}

/// Input parameters for a beam.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-1",
///   "length": 96.0,
///   "height": 3.0,
///   "width": 2.0,
///   "style": "step",
///   "step": 0.75,
///   "thickness": 0.75,
///   "orientation": "X"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamInput {
    /// User label (e.g. "B-1")
    pub label: String,

    /// Beam length along its orientation axis
    pub length: f64,

    /// Section height
    pub height: f64,

    /// Section width
    pub width: f64,

    /// Section style
    pub style: BeamStyle,

    /// Pallet step size (Step style only)
    pub step: f64,

    /// Flange/web or wall thickness (IBeam and CChannel styles)
    pub thickness: f64,

    /// Axis the beam runs along (X or Y)
    pub orientation: Axis,
}

impl Default for BeamInput {
    fn default() -> Self {
        BeamInput {
            label: "B-1".to_string(),
            length: 96.0,
            height: 3.0,
            width: 2.0,
            style: BeamStyle::Step,
            step: 0.75,
            thickness: 0.75,
            orientation: Axis::X,
        }
    }
}

impl BeamInput {
    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.length <= 0.0 {
            return Err(LayoutError::invalid_input(
                "length",
                self.length.to_string(),
                "Length must be positive",
            ));
        }
        if self.height <= 0.0 || self.width <= 0.0 {
            return Err(LayoutError::invalid_input(
                "height",
                format!("{} x {}", self.height, self.width),
                "Section dimensions must be positive",
            ));
        }
        if self.style == BeamStyle::Step && (self.step <= 0.0 || self.step >= self.width) {
            return Err(LayoutError::invalid_input(
                "step",
                self.step.to_string(),
                "Step must be positive and smaller than the section width",
            ));
        }
        if matches!(self.style, BeamStyle::IBeam | BeamStyle::CChannel)
            && (self.thickness <= 0.0
                || self.thickness >= self.width / 2.0
                || self.thickness >= self.height / 2.0)
        {
            return Err(LayoutError::invalid_input(
                "thickness",
                self.thickness.to_string(),
                "Thickness must be positive and under half the section size",
            ));
        }
        if self.orientation == Axis::Z {
            return Err(LayoutError::invalid_input(
                "orientation",
                "Z".to_string(),
                "Beams run along X or Y",
            ));
        }
        Ok(())
    }

    /// Section profile for this beam's style.
    pub fn profile(&self) -> LayoutResult<StructuralProfile> {
        match self.style {
            BeamStyle::Step => StructuralProfile::beam_step(self.height, self.width, self.step),
            BeamStyle::Box => StructuralProfile::beam_box(self.height, self.width),
            BeamStyle::IBeam => {
                StructuralProfile::beam_ibeam(self.height, self.width, self.thickness)
            }
            BeamStyle::CChannel => {
                StructuralProfile::beam_cchannel(self.height, self.width, self.thickness)
            }
        }
    }

    /// Cache key identifying this beam geometry.
    pub fn component_key(&self) -> ComponentKey {
        let detail = match self.style {
            BeamStyle::Step => self.step,
            BeamStyle::Box => 0.0,
            BeamStyle::IBeam | BeamStyle::CChannel => self.thickness,
        };
        ComponentKey::new(
            format!("beam-{}", self.style.as_str()),
            &[self.length, self.height, self.width, detail],
        )
    }
}

/// Lay out the beam on an explicit drawing layer (the rack driver uses this
/// to put spacer beams on their own layer).
pub fn layout_on_layer(input: &BeamInput, layer: &str) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let profile = input.profile()?;
    let end = Point3::origin() + input.orientation.unit() * input.length;
    let mut placement = Placement::identity().rotated(Axis::Y, std::f64::consts::FRAC_PI_2);
    if input.orientation == Axis::Y {
        placement = placement.rotated(Axis::Z, std::f64::consts::FRAC_PI_2);
    }
    Ok(vec![PlacedPrimitive {
        shape: PrimitiveShape::Sweep {
            profile,
            path: [Point3::origin(), end],
        },
        placement,
        layer: layer.to_string(),
    }])
}

/// Lay out the beam in its local coordinates.
pub fn layout(input: &BeamInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    layout_on_layer(input, &styles.layer(input.style.layer_kind()))
}

/// Register the beam component if needed and place one instance.
pub fn build(
    input: &BeamInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
    placement: Placement,
) -> LayoutResult<InstanceId> {
    let id = ensure_component(input, styles, store)?;
    store.place(id, placement)
}

/// Lookup-or-register the beam definition.
pub fn ensure_component(
    input: &BeamInput,
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
