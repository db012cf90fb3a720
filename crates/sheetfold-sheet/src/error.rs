//! Error types for plane and sheet construction.

use sheetfold_math::Vec3;
use thiserror::Error;

/// Errors that can occur while building planes, sheets and bends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    /// A vertical ray cannot hit a plane with this normal.
    #[error("cannot project onto plane with normal {normal:?}")]
    DegenerateProjection {
        /// The offending normal.
        normal: Vec3,
    },

    /// An edge or face has collapsed.
    #[error("degenerate edge: {0}")]
    DegenerateEdge(String),

    /// Bend parameters outside the domain of the bend formulas.
    #[error("bend out of range: {0}")]
    BendOutOfRange(String),
}

/// Result type for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;
