//! Error and warning types for flat-pattern builds.

use std::fmt;

use serde::Serialize;
use sheetfold_sheet::{SheetError, Side};
use thiserror::Error;

/// Errors that abort a flat-pattern build.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnfoldError {
    /// Input rejected before any geometry is computed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A wall could not be constructed.
    #[error("degenerate geometry on the {side} wall: {reason}")]
    DegenerateGeometry {
        /// Wall at fault.
        side: Side,
        /// What went wrong.
        reason: String,
    },

    /// Plane or sheet construction failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Result type for flat-pattern builds.
pub type Result<T> = std::result::Result<T, UnfoldError>;

/// Which end of a wall a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WallEnd {
    /// The `vertex0` end.
    Left,
    /// The `vertex1` end, shortened by the corner gap.
    Right,
}

/// A problem with an otherwise complete build.
///
/// Warnings travel with the output; the cut pattern is still produced so a
/// batch can be reviewed as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryWarning {
    /// The flat wall leg points back over the lid.
    WallInverted {
        /// Wall at fault.
        #[serde(serialize_with = "side_name")]
        side: Side,
        /// Which leg.
        end: WallEnd,
        /// Leg length in mm.
        length: f64,
    },
    /// The flat wall leg is shorter than the configured minimum.
    WallTooShort {
        /// Wall at fault.
        #[serde(serialize_with = "side_name")]
        side: Side,
        /// Which leg.
        end: WallEnd,
        /// Leg length in mm.
        length: f64,
    },
    /// The wall's tab was replaced by a straight edge.
    TabSkipped {
        /// Wall at fault.
        #[serde(serialize_with = "side_name")]
        side: Side,
        /// Why.
        reason: String,
    },
}

fn side_name<S: serde::Serializer>(
    side: &Side,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(side)
}

impl GeometryWarning {
    /// The wall the warning is about.
    pub fn side(&self) -> Side {
        match self {
            GeometryWarning::WallInverted { side, .. }
            | GeometryWarning::WallTooShort { side, .. }
            | GeometryWarning::TabSkipped { side, .. } => *side,
        }
    }
}

impl fmt::Display for WallEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallEnd::Left => write!(f, "left"),
            WallEnd::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::WallInverted { side, end, length } => {
                write!(f, "{side} wall is inverted at its {end} end ({length:.3} mm)")
            }
            GeometryWarning::WallTooShort { side, end, length } => {
                write!(f, "{side} wall is too short at its {end} end ({length:.3} mm)")
            }
            GeometryWarning::TabSkipped { side, reason } => {
                write!(f, "{side} wall tab skipped: {reason}")
            }
        }
    }
}
