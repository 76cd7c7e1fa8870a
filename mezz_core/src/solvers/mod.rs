//! # Layout Solvers
//!
//! Pure numeric engines the assembly drivers call before placing any
//! geometry: the brace-count search for upright frames, the truss web rod
//! layout, and the path segmentation pipeline shared by guardrails, stairs,
//! and ladders. Everything here is deterministic and side-effect free.

pub mod braces;
pub mod path;
pub mod truss_web;

pub use braces::{solve as solve_braces, BraceConfig, BraceLayout};
pub use path::{segment_path, PathConfig, PathSegment, SegmentedPath, StairRise, TurnSide};
pub use truss_web::{fill as fill_truss_web, RodLayout, TrussWebParams};
