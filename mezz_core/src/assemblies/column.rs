//! # Column Driver
//!
//! A square column standing on an optional rectangular baseplate. A plate
//! height of zero means a plain rack post-extension column with no plate;
//! anything else is a mezzanine column, which also moves it to the
//! mezzanine drawing layer.
//!
//! Local frame: the plate footprint occupies the first quadrant of XY with
//! one corner at the origin, Z up.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::Vec3;
use crate::kernel::{
    ComponentId, ComponentKey, ComponentStore, InstanceId, PlacedPrimitive, Placement,
    PrimitiveShape,
};
use crate::styles::StyleMap;

/// Where the column sits on its baseplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlateOffset {
    /// Column centered on the plate
    Center,
    /// Column flush with one long edge, centered along the length
    Side,
    /// Column flush into a plate corner
    Corner,
}

impl PlateOffset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlateOffset::Center => "center",
            PlateOffset::Side => "side",
            PlateOffset::Corner => "corner",
        }
    }
}

/// Input parameters for a column.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "C-1",
///   "height": 120.0,
///   "width": 8.0,
///   "base_length": 14.0,
///   "base_width": 14.0,
///   "base_height": 0.75,
///   "plate_offset": "center"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInput {
    /// User label (e.g. "C-1")
    pub label: String,

    /// Overall height, floor to top of column
    pub height: f64,

    /// Square column section size
    pub width: f64,

    /// Baseplate length (X)
    pub base_length: f64,

    /// Baseplate width (Y)
    pub base_width: f64,

    /// Baseplate thickness; 0 means no plate (rack column)
    pub base_height: f64,

    /// Column position on the plate
    pub plate_offset: PlateOffset,
}

impl Default for ColumnInput {
    fn default() -> Self {
        ColumnInput {
            label: "C-1".to_string(),
            height: 120.0,
            width: 8.0,
            base_length: 14.0,
            base_width: 14.0,
            base_height: 0.75,
            plate_offset: PlateOffset::Center,
        }
    }
}

impl ColumnInput {
    /// Whether this column carries a baseplate.
    pub fn has_plate(&self) -> bool {
        self.base_height > 0.0
    }

    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.height <= 0.0 {
            return Err(LayoutError::invalid_input(
                "height",
                self.height.to_string(),
                "Height must be positive",
            ));
        }
        if self.width <= 0.0 {
            return Err(LayoutError::invalid_input(
                "width",
                self.width.to_string(),
                "Column width must be positive",
            ));
        }
        if self.base_height < 0.0 {
            return Err(LayoutError::invalid_input(
                "base_height",
                self.base_height.to_string(),
                "Plate thickness cannot be negative",
            ));
        }
        if self.base_height >= self.height {
            return Err(LayoutError::invalid_input(
                "base_height",
                self.base_height.to_string(),
                "Plate thickness must be less than the column height",
            ));
        }
        if self.has_plate() && (self.base_length < self.width || self.base_width < self.width) {
            return Err(LayoutError::invalid_input(
                "base_length",
                format!("{} x {}", self.base_length, self.base_width),
                "Baseplate must be at least as large as the column section",
            ));
        }
        Ok(())
    }

    /// Cache key identifying this column geometry.
    pub fn component_key(&self) -> ComponentKey {
        ComponentKey::new(
            format!("column-{}", self.plate_offset.as_str()),
            &[
                self.height,
                self.width,
                self.base_length,
                self.base_width,
                self.base_height,
            ],
        )
    }

    // Column center in plan, per plate offset.
    fn column_center(&self) -> (f64, f64) {
        match self.plate_offset {
            PlateOffset::Center => (self.base_length / 2.0, self.base_width / 2.0),
            PlateOffset::Side => (self.base_length / 2.0, self.width / 2.0),
            PlateOffset::Corner => (self.width / 2.0, self.width / 2.0),
        }
    }
}

/// Lay out the column in its local coordinates.
pub fn layout(input: &ColumnInput, styles: &StyleMap) -> LayoutResult<Vec<PlacedPrimitive>> {
    input.validate()?;
    let kind = if input.has_plate() {
        "mezz-column"
    } else {
        "rack-column"
    };
    let layer = styles.layer(kind);
    let mut prims = Vec::with_capacity(2);

    if input.has_plate() {
        prims.push(PlacedPrimitive {
            shape: PrimitiveShape::Box {
                x: input.base_length,
                y: input.base_width,
                z: input.base_height,
            },
            placement: Placement::translation(Vec3::new(
                input.base_length / 2.0,
                input.base_width / 2.0,
                input.base_height / 2.0,
            )),
            layer: layer.clone(),
        });
    }

    let shaft = input.height - input.base_height;
    let (cx, cy) = if input.has_plate() {
        input.column_center()
    } else {
        (input.width / 2.0, input.width / 2.0)
    };
    prims.push(PlacedPrimitive {
        shape: PrimitiveShape::Box {
            x: input.width,
            y: input.width,
            z: shaft,
        },
        placement: Placement::translation(Vec3::new(
            cx,
            cy,
            input.base_height + shaft / 2.0,
        )),
        layer,
    });

    Ok(prims)
}

/// Register the column component if needed and place one instance.
pub fn build(
    input: &ColumnInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
    placement: Placement,
) -> LayoutResult<InstanceId> {
    let id = ensure_component(input, styles, store)?;
    store.place(id, placement)
}

/// Lookup-or-register the column definition.
pub fn ensure_component(
    input: &ColumnInput,
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
    use crate::kernel::TransformOp;

    fn center_of(prim: &PlacedPrimitive) -> Vec3 {
        match &prim.placement.ops[0] {
            TransformOp::Translate { offset } => *offset,
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_mezz_column_has_plate_and_shaft() {
        let input = ColumnInput::default();
        let prims = layout(&input, &StyleMap::default()).unwrap();
        assert_eq!(prims.len(), 2);
        assert_eq!(prims[0].layer, "3D-Mezz-Column");
        // Shaft sits on top of the plate
        let shaft = center_of(&prims[1]);
        assert!((shaft.z - (0.75 + (120.0 - 0.75) / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rack_column_has_no_plate() {
        let input = ColumnInput {
            base_height: 0.0,
            ..ColumnInput::default()
        };
        let prims = layout(&input, &StyleMap::default()).unwrap();
        assert_eq!(prims.len(), 1);
        assert_eq!(prims[0].layer, "3D-Rack-Column");
    }

    #[test]
    fn test_corner_offset_hugs_origin() {
        let input = ColumnInput {
            plate_offset: PlateOffset::Corner,
            ..ColumnInput::default()
        };
        let prims = layout(&input, &StyleMap::default()).unwrap();
        let shaft = center_of(&prims[1]);
        assert!((shaft.x - 4.0).abs() < 1e-9);
        assert!((shaft.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_undersized_plate_rejected() {
        let input = ColumnInput {
            base_length: 4.0,
            ..ColumnInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_offset_distinguishes_keys() {
        let center = ColumnInput::default();
        let corner = ColumnInput {
            plate_offset: PlateOffset::Corner,
            ..ColumnInput::default()
        };
        assert_ne!(center.component_key(), corner.component_key());
    }
}
