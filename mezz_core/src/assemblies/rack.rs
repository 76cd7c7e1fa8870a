//! # Rack Grid Assembly
//!
//! A complete pallet-rack run: upright frames on a grid, stepped beams at
//! every level of every bay, row spacers tying back-to-back frame rows
//! together, and a line of plain columns closing an even-depth run.
//!
//! This driver does not emit raw primitives. It registers one component
//! definition per distinct part through the [`ComponentStore`] and places
//! grid instances, so a 100-bay rack costs four definitions and a few
//! hundred placements.
//!
//! Grid frame: bays advance along X, depth rows along Y, levels up Z.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Point3, Vec3};
use crate::kernel::{Axis, ComponentKey, ComponentStore, Placement};
use crate::styles::StyleMap;

use super::beam::{self, BeamInput, BeamStyle};
use super::column::{self, ColumnInput, PlateOffset};
use super::frame::{self, FrameInput};

/// Input parameters for a rack run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "R-1",
///   "origin": [0.0, 0.0, 0.0],
///   "bays": 3,
///   "deep": 1,
///   "levels": 3,
///   "beam_bottom": 48.0,
///   "spacer_length": 12.0,
///   "frame": { "label": "F-1", "height": 96.0, "width": 42.0, "diameter": 3.0,
///              "braces": { "brace_size": 1.0, "end_margin": 8.0, "min_angle": 1.047 } },
///   "beam": { "label": "B-1", "length": 96.0, "height": 3.0, "width": 2.0,
///             "style": "step", "step": 0.75, "thickness": 0.75, "orientation": "X" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackInput {
    /// User label (e.g. "R-1")
    pub label: String,

    /// World position of the rack's near corner
    pub origin: Point3,

    /// Number of bays along the run
    pub bays: u32,

    /// Pallet positions deep (1 = single row, 2 = back-to-back, ...)
    pub deep: u32,

    /// Beam levels per bay
    pub levels: u32,

    /// Height of the lowest beam level
    pub beam_bottom: f64,

    /// Gap between back-to-back frame rows
    pub spacer_length: f64,

    /// The upright frame used throughout
    pub frame: FrameInput,

    /// The bay beam used throughout
    pub beam: BeamInput,
}

impl Default for RackInput {
    fn default() -> Self {
        RackInput {
            label: "R-1".to_string(),
            origin: Point3::origin(),
            bays: 3,
            deep: 1,
            levels: 3,
            beam_bottom: 48.0,
            spacer_length: 12.0,
            frame: FrameInput::default(),
            beam: BeamInput::default(),
        }
    }
}

impl RackInput {
    /// Validate input parameters.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.bays == 0 || self.deep == 0 || self.levels == 0 {
            return Err(LayoutError::invalid_input(
                "bays",
                format!("{} x {} x {}", self.bays, self.deep, self.levels),
                "Bays, depth, and levels must all be at least 1",
            ));
        }
        if self.beam.orientation != Axis::X {
            return Err(LayoutError::invalid_input(
                "beam.orientation",
                "Y".to_string(),
                "Rack beams run along the bay axis (X)",
            ));
        }
        if self.beam_bottom + self.beam.height > self.frame.height {
            return Err(LayoutError::invalid_input(
                "beam_bottom",
                self.beam_bottom.to_string(),
                "Lowest beam level does not fit under the frame height",
            ));
        }
        if self.spacer_length <= 0.0 {
            return Err(LayoutError::invalid_input(
                "spacer_length",
                self.spacer_length.to_string(),
                "Spacer length must be positive",
            ));
        }
        self.frame.validate()?;
        self.beam.validate()
    }

    /// Frame rows along the depth axis.
    pub fn frame_rows(&self) -> u32 {
        self.deep.div_ceil(2)
    }

    /// Whether an even-depth run closes with a column line.
    pub fn has_column_line(&self) -> bool {
        self.deep % 2 == 0
    }

    /// Beam faces along the depth axis.
    pub fn beam_rows(&self) -> u32 {
        self.frame_rows() * 2 + if self.has_column_line() { 1 } else { 0 }
    }

    // Grid pitches.
    fn bay_pitch(&self) -> f64 {
        self.frame.diameter + self.beam.length
    }

    fn row_pitch(&self) -> f64 {
        self.frame.width + self.spacer_length
    }

    // Beam level heights; a single level sits at the bottom height instead
    // of dividing by zero.
    fn level_height(&self, level: u32) -> f64 {
        if self.levels > 1 {
            self.beam_bottom
                + level as f64 * (self.frame.height - self.beam_bottom - self.beam.height)
                    / (self.levels - 1) as f64
        } else {
            self.beam_bottom
        }
    }

    // Depth position of a beam face row.
    fn beam_row_y(&self, row: u32) -> f64 {
        (row as f64 / 2.0).ceil() * self.frame.width
            + (row as f64 / 2.0).floor() * self.spacer_length
    }
}

/// Instance counts from a rack build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackCensus {
    pub frames: u32,
    pub beams: u32,
    pub spacers: u32,
    pub columns: u32,
}

/// Register the rack's part definitions and place the whole grid.
pub fn build(
    input: &RackInput,
    styles: &StyleMap,
    store: &mut dyn ComponentStore,
) -> LayoutResult<RackCensus> {
    input.validate()?;
    let at = |x: f64, y: f64, z: f64| {
        Placement::translation(Vec3::new(
            input.origin.x + x,
            input.origin.y + y,
            input.origin.z + z,
        ))
    };
    let mut census = RackCensus {
        frames: 0,
        beams: 0,
        spacers: 0,
        columns: 0,
    };

    // Frames
    let frame_id = frame::ensure_component(&input.frame, styles, store)?;
    for x in 0..=input.bays {
        for row in 0..input.frame_rows() {
            store.place(
                frame_id,
                at(x as f64 * input.bay_pitch(), row as f64 * input.row_pitch(), 0.0),
            )?;
            census.frames += 1;
        }
    }

    // Column line closing an even-depth run
    if input.has_column_line() {
        let col = ColumnInput {
            label: format!("{}-col", input.label),
            height: input.frame.height,
            width: input.frame.diameter,
            base_length: 0.0,
            base_width: 0.0,
            base_height: 0.0,
            plate_offset: PlateOffset::Center,
        };
        let col_id = column::ensure_component(&col, styles, store)?;
        let y = input.frame_rows() as f64 * input.row_pitch();
        for x in 0..=input.bays {
            store.place(col_id, at(x as f64 * input.bay_pitch(), y, 0.0))?;
            census.columns += 1;
        }
    }

    // Row spacers tying back-to-back frame rows, two per post line
    if input.frame_rows() > 1 {
        let spacer = BeamInput {
            label: format!("{}-spacer", input.label),
            length: input.spacer_length,
            height: input.frame.diameter,
            width: input.frame.diameter,
            style: BeamStyle::Box,
            orientation: Axis::Y,
            ..BeamInput::default()
        };
        let key = ComponentKey::new(
            "spacer",
            &[input.spacer_length, input.frame.diameter],
        );
        let spacer_id = match store.lookup(&key) {
            Some(id) => id,
            None => {
                let prims = beam::layout_on_layer(&spacer, &styles.layer("rack-spacer"))?;
                store.register(key, prims)?
            }
        };
        let spacer_heights = [
            input.frame.height / 3.0,
            2.0 * input.frame.height / 3.0,
        ];
        for x in 0..=input.bays {
            for row in 1..input.frame_rows() {
                let y = row as f64 * input.row_pitch() - input.spacer_length;
                for z in spacer_heights {
                    store.place(spacer_id, at(x as f64 * input.bay_pitch(), y, z))?;
                    census.spacers += 1;
                }
            }
        }
    }

    // Beams: every bay, every face row, every level. Odd rows are the back
    // faces; they are spun half a turn so the pallet step faces inward.
    let beam_id = beam::ensure_component(&input.beam, styles, store)?;
    for x in 0..input.bays {
        let bay_x = x as f64 * input.bay_pitch() + input.frame.diameter;
        for row in 0..input.beam_rows() {
            let y = input.beam_row_y(row);
            for level in 0..input.levels {
                let z = input.level_height(level);
                let placement = if row % 2 == 0 {
                    at(bay_x, y, z)
                } else {
                    Placement::identity()
                        .rotated(Axis::Z, std::f64::consts::PI)
                        .translated(Vec3::new(
                            input.origin.x + bay_x + input.beam.length,
                            input.origin.y + y,
                            input.origin.z + z,
                        ))
                };
                store.place(beam_id, placement)?;
                census.beams += 1;
            }
        }
    }

    Ok(census)
}
