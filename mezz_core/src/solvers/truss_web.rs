//! # Truss Rod Layout Engine
//!
//! Lays out the open-web rods of a bar-joist truss in 2D: `d` runs along
//! the truss span, `z` is height relative to the top-chord seat. The two
//! end rods sit at fixed positions computed from the chord geometry and the
//! end-rod angle; the remaining span between their innermost points is then
//! filled with alternating-slant mid rods of fixed length, as many as fit
//! without overlap.
//!
//! The original tooling asked the CAD kernel for each rod's bounding box to
//! find where rods meet the chord line. A tilted cylinder's box is closed
//! form, so the engine computes the same numbers directly:
//! half-extent along d = L/2*|sin a| + r*|cos a|, along z = L/2*|cos a| +
//! r*|sin a|; the chord-line intersect height is the box bottom plus
//! `diameter * sin|a|`.
//!
//! Angle convention: a rod's `angle` is the signed slant parameter; the
//! drivers map it to a rotation about the horizontal axis appropriate to
//! the truss orientation. Only its magnitude enters the extent math.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};

/// Dimensions the web solver needs, in span units.
///
/// Angles are radians measured from vertical, so a larger end-rod angle
/// means a shallower rod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussWebParams {
    pub truss_length: f64,
    pub truss_height: f64,
    pub chord_width: f64,
    /// End chord length at the near end (the piece seating on a column).
    pub chord_near_end_length: f64,
    /// End chord length at the far end.
    pub chord_far_end_length: f64,
    pub rod_diameter: f64,
    /// End-rod angle from vertical.
    pub rod_end_angle: f64,
    /// Mid-rod angle from vertical.
    pub rod_mid_angle: f64,
}

impl TrussWebParams {
    /// Length of each sloped end rod.
    pub fn rod_end_length(&self) -> f64 {
        (self.truss_height - 2.0 * self.chord_width) / self.rod_end_angle.cos()
    }

    /// Length of each mid rod.
    pub fn rod_mid_length(&self) -> f64 {
        (self.truss_height - self.chord_width) / self.rod_mid_angle.cos()
    }

    /// Bottom chord length left after the end chords and end rods.
    pub fn bottom_chord_length(&self) -> f64 {
        self.truss_length
            - self.chord_near_end_length
            - self.chord_far_end_length
            - 2.0 * (self.truss_height - 3.0 * self.chord_width) * self.rod_end_angle.tan()
            + 2.0 * self.rod_diameter / self.rod_end_angle.cos()
    }

    /// Shortest truss length that leaves room for the end chords, the end
    /// rods' horizontal projection, and half a mid rod.
    pub fn min_viable_length(&self) -> f64 {
        let end_rod_horizontal =
            (self.truss_height - 2.0 * self.chord_width) / self.rod_end_angle.cos();
        let chord_break = (self.truss_height - 3.0 * self.chord_width) * self.rod_end_angle.tan()
            - self.rod_diameter / self.rod_end_angle.cos();
        let mid_rod_half = self.rod_diameter / (2.0 * self.rod_mid_angle.cos());
        self.chord_near_end_length
            + self.chord_far_end_length
            + chord_break
            + end_rod_horizontal
            + mid_rod_half
    }

    /// Reject layouts that cannot fit even the fixed members. Checked by
    /// the truss driver before any rod is placed.
    pub fn check_viability(&self) -> LayoutResult<()> {
        let min_length = self.min_viable_length();
        if self.truss_length < min_length {
            return Err(LayoutError::not_viable(
                "Truss",
                format!(
                    "Truss length {} is too short; must be greater than {}",
                    self.truss_length, min_length
                ),
            ));
        }
        if self.truss_height <= 4.0 * self.chord_width {
            return Err(LayoutError::not_viable(
                "Truss",
                format!(
                    "Truss height {} is too short; must exceed 4 x chord width ({})",
                    self.truss_height,
                    4.0 * self.chord_width
                ),
            ));
        }
        Ok(())
    }
}

/// Which end of the truss an end rod belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum End {
    Near,
    Far,
}

/// One web rod in the (d, z) plane: center position, stock dimensions, and
/// signed slant parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rod2d {
    /// Center position along the span.
    pub distance: f64,
    /// Center height.
    pub height: f64,
    pub length: f64,
    pub diameter: f64,
    /// Signed slant; positive leans toward the far end.
    pub angle: f64,
}

impl Rod2d {
    /// Bounding half-extent along the span.
    pub fn extent_d(&self) -> f64 {
        let a = self.angle.abs();
        self.length / 2.0 * a.sin() + self.diameter / 2.0 * a.cos()
    }

    /// Bounding half-extent in height.
    pub fn extent_z(&self) -> f64 {
        let a = self.angle.abs();
        self.length / 2.0 * a.cos() + self.diameter / 2.0 * a.sin()
    }

    /// Chord-line intersect height (shared by both intersect points).
    fn intersect_height(&self) -> f64 {
        self.height - self.extent_z() + self.diameter * self.angle.abs().sin()
    }

    /// Intersect point on the near side: (span distance, height).
    pub fn near_point(&self) -> (f64, f64) {
        (self.distance + self.extent_d(), self.intersect_height())
    }

    /// Intersect point on the far side.
    pub fn far_point(&self) -> (f64, f64) {
        (self.distance - self.extent_d(), self.intersect_height())
    }
}

/// Complete web layout: both end rods plus the alternating mid rods, in
/// placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodLayout {
    pub near_end: Rod2d,
    pub far_end: Rod2d,
    pub mid: Vec<Rod2d>,
}

/// Position one sloped end rod from the chord geometry.
pub fn end_rod(params: &TrussWebParams, end: End) -> Rod2d {
    let h = params.truss_height;
    let w = params.chord_width;
    let a = params.rod_end_angle;
    // Signed slant: the near rod leans toward the far end, the far rod back
    let signed = match end {
        End::Near => a,
        End::Far => -a,
    };
    let offset = signed.signum() * ((h - 3.0 * w) * a.tan() - params.rod_diameter / a.cos()) / 2.0;
    let start = match end {
        End::Near => params.chord_near_end_length,
        End::Far => params.truss_length - params.chord_far_end_length,
    };
    Rod2d {
        distance: start + offset,
        height: w - (h - w) / 2.0,
        length: params.rod_end_length(),
        diameter: params.rod_diameter,
        angle: signed,
    }
}

/// Fill the open web between the end rods with alternating mid rods.
///
/// Rods are anchored alternately from the near and the far side; the slant
/// sign flips every placement pair so the web zig-zags. The loop terminates
/// because the remaining `space` strictly shrinks by one unit horizontal
/// length per placed rod.
pub fn fill(params: &TrussWebParams) -> RodLayout {
    let a = params.rod_mid_angle;
    let rod_len = params.rod_mid_length();
    let dia = params.rod_diameter;

    let near_end = end_rod(params, End::Near);
    let far_end = end_rod(params, End::Far);
    let near_pt = near_end.near_point();
    let far_pt = far_end.far_point();

    // Row the mid-rod centers sit on
    let z_row = 2.0 * params.chord_width - params.truss_height / 2.0;
    // Horizontal span one mid rod consumes
    let unit = rod_len * a.sin() + dia / a.cos();

    let rod_at = |distance: f64, angle: f64| Rod2d {
        distance,
        height: z_row,
        length: rod_len,
        diameter: dia,
        angle,
    };

    // First mid rods anchor to the end rods' intersect points
    let mut near = rod_at(
        near_pt.0 + dia / (2.0 * a.cos()) + a.tan() * (near_pt.1 - z_row),
        a,
    );
    let mut far = rod_at(
        far_pt.0 - dia / (2.0 * a.cos()) + a.tan() * (z_row - far_pt.1),
        -a,
    );

    let mut mid = vec![near, far];
    let mut space = far.far_point().0 - near.near_point().0;
    let mut slant = a;

    while space >= unit {
        slant = -slant;

        // Anchor a rod off the near side
        near = rod_at(near.near_point().0 + unit / 2.0, slant);
        mid.push(near);
        space -= unit;
        if space < unit {
            break;
        }

        // Mirror it off the far side
        far = rod_at(far.far_point().0 - unit / 2.0, -slant);
        mid.push(far);
        space -= unit;
    }

    RodLayout { near_end, far_end, mid }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_params() -> TrussWebParams {
        TrussWebParams {
            truss_length: 240.0,
            truss_height: 18.0,
            chord_width: 1.25,
            chord_near_end_length: 8.0,
            chord_far_end_length: 8.0,
            rod_diameter: 0.875,
            rod_end_angle: 60.0_f64.to_radians(),
            rod_mid_angle: 35.0_f64.to_radians(),
        }
    }

    #[test]
    fn test_viability_gate_height() {
        // trussHeight=1 with chordWidth=1.25: 1 <= 5 fails immediately
        let params = TrussWebParams {
            truss_height: 1.0,
            ..standard_params()
        };
        let err = params.check_viability().unwrap_err();
        assert_eq!(err.error_code(), "NOT_VIABLE");
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn test_viability_gate_length() {
        let params = TrussWebParams {
            truss_length: 20.0,
            ..standard_params()
        };
        let err = params.check_viability().unwrap_err();
        // Diagnostic must name the computed minimum
        assert!(err.to_string().contains("must be greater than"));
    }

    #[test]
    fn test_standard_truss_is_viable() {
        assert!(standard_params().check_viability().is_ok());
    }

    #[test]
    fn test_derived_rod_lengths() {
        let params = standard_params();
        // (18 - 2.5) / cos 60 = 31
        assert!((params.rod_end_length() - 31.0).abs() < 1e-9);
        // (18 - 1.25) / cos 35
        let expected = 16.75 / 35.0_f64.to_radians().cos();
        assert!((params.rod_mid_length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fill_terminates_and_fills_span() {
        let params = standard_params();
        let layout = fill(&params);
        // A 240in truss takes a healthy number of mid rods
        assert!(layout.mid.len() >= 4);
        // Every mid rod sits on the placement row
        let z_row = 2.0 * params.chord_width - params.truss_height / 2.0;
        for rod in &layout.mid {
            assert!((rod.height - z_row).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mid_rods_do_not_overlap() {
        let layout = fill(&standard_params());
        let mut spans: Vec<(f64, f64)> = layout
            .mid
            .iter()
            .map(|r| (r.distance - r.extent_d(), r.distance + r.extent_d()))
            .collect();
        spans.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        for pair in spans.windows(2) {
            assert!(
                pair[1].0 >= pair[0].1 - 1e-9,
                "overlap: {:?} vs {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_mid_rod_slants_alternate() {
        let layout = fill(&standard_params());
        // First pair anchors opposite ways
        assert!(layout.mid[0].angle > 0.0);
        assert!(layout.mid[1].angle < 0.0);
        // Near-side rods (even indices) flip sign each placement
        let near_side: Vec<f64> = layout.mid.iter().step_by(2).map(|r| r.angle).collect();
        for pair in near_side.windows(2) {
            assert!(pair[0] * pair[1] < 0.0, "near-side slant did not flip");
        }
    }

    #[test]
    fn test_end_rods_lean_inward() {
        let params = standard_params();
        let near = end_rod(&params, End::Near);
        let far = end_rod(&params, End::Far);
        assert!(near.angle > 0.0);
        assert!(far.angle < 0.0);
        assert!(near.distance > params.chord_near_end_length);
        assert!(far.distance < params.truss_length - params.chord_far_end_length);
        assert!(near.distance < far.distance);
    }
}
