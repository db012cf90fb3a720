#![warn(missing_docs)]

//! Bend math, quadrilateral planes and extruded sheets.
//!
//! - [`bend`]: setback, allowance and deduction formulas
//! - [`plane`]: four-vertex faces with edge-local resizing
//! - [`sheet`]: top/bottom plane pairs with a solid, bent or extruded state per side
//! - [`ortho`]: orthographic debug views of a sheet

pub mod bend;
pub mod error;
pub mod ortho;
pub mod plane;
pub mod sheet;

pub use bend::{bend_allowance, bend_deduction, inside_setback, outside_setback, BendSpec};
pub use error::{Result, SheetError};
pub use ortho::{sheet_shapes, three_view, DEBUG_VIEWS};
pub use plane::{Plane, PlaneEdge, Side};
pub use sheet::{Bend, Sheet, SheetEdge, SheetEdgeFace};
