//! # Error Types
//!
//! Structured error types for mezz_core. Every validation or geometry failure
//! carries the specific numeric inputs that caused it, so a caller (or a
//! person reading a log) can see exactly which measurement violated which
//! limit without re-running the layout.
//!
//! ## Example
//!
//! ```rust
//! use mezz_core::errors::{LayoutError, LayoutResult};
//!
//! fn validate_height(height: f64) -> LayoutResult<()> {
//!     if height <= 0.0 {
//!         return Err(LayoutError::invalid_input(
//!             "height",
//!             height.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mezz_core operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Structured error type for layout operations.
///
/// Each variant provides specific context about what went wrong, enabling
/// programmatic handling as well as a human-readable diagnostic.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LayoutError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A vector required for orientation math has (near) zero length
    #[error("Degenerate vector in {context}")]
    DegenerateVector { context: String },

    /// A path segment failed validation and was dropped from the path
    #[error(
        "Rejected segment ({sx:.3}, {sy:.3}, {sz:.3}) -> ({ex:.3}, {ey:.3}, {ez:.3}): {reason}",
        sx = .start[0], sy = .start[1], sz = .start[2],
        ex = .end[0], ey = .end[1], ez = .end[2]
    )]
    SegmentRejected {
        start: [f64; 3],
        end: [f64; 3],
        reason: String,
    },

    /// An assembly's dimensions cannot produce a buildable layout
    #[error("{assembly} layout is not viable: {reason}")]
    NotViable { assembly: String, reason: String },

    /// The geometry kernel rejected a primitive
    #[error("Geometry construction failed for {shape} ({dimensions}): {reason}")]
    GeometryFailed {
        shape: String,
        dimensions: String,
        reason: String,
    },

    /// Component store lookup/registration failed ("already exists" is
    /// success, never reported through this variant)
    #[error("Component store error for '{name}': {reason}")]
    ComponentStore { name: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LayoutError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LayoutError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DegenerateVector error
    pub fn degenerate_vector(context: impl Into<String>) -> Self {
        LayoutError::DegenerateVector {
            context: context.into(),
        }
    }

    /// Create a SegmentRejected error from segment endpoints
    pub fn segment_rejected(start: [f64; 3], end: [f64; 3], reason: impl Into<String>) -> Self {
        LayoutError::SegmentRejected {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Create a NotViable error
    pub fn not_viable(assembly: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::NotViable {
            assembly: assembly.into(),
            reason: reason.into(),
        }
    }

    /// Create a GeometryFailed error
    pub fn geometry_failed(
        shape: impl Into<String>,
        dimensions: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LayoutError::GeometryFailed {
            shape: shape.into(),
            dimensions: dimensions.into(),
            reason: reason.into(),
        }
    }

    /// Create a ComponentStore error
    pub fn component_store(name: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::ComponentStore {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a validation error the caller can recover from by
    /// correcting inputs or skipping the offending unit
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LayoutError::InvalidInput { .. }
                | LayoutError::SegmentRejected { .. }
                | LayoutError::NotViable { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LayoutError::InvalidInput { .. } => "INVALID_INPUT",
            LayoutError::DegenerateVector { .. } => "DEGENERATE_VECTOR",
            LayoutError::SegmentRejected { .. } => "SEGMENT_REJECTED",
            LayoutError::NotViable { .. } => "NOT_VIABLE",
            LayoutError::GeometryFailed { .. } => "GEOMETRY_FAILED",
            LayoutError::ComponentStore { .. } => "COMPONENT_STORE",
            LayoutError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
