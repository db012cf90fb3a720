#![warn(missing_docs)]

//! 2D drafting output for sheetfold.
//!
//! This crate provides the drawing model the unfolding engine emits into:
//!
//! - **Path primitives**: `MoveTo`, `LineTo` and arcs swept about a pivot
//! - **Styled groups**: color and line-style inheritance plus a `hidden` flag
//! - **Lazy primitive stream**: depth-first, hidden subtrees skipped
//! - **Orthographic projection**: Top, Front, Right and isometric views
//!
//! # Example
//!
//! ```
//! use sheetfold_drafting::{line, Color, Drawing, Group};
//! use sheetfold_math::Point3;
//!
//! let mut drawing = Drawing::new();
//! let edge = line(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
//! drawing.push(Group::new(edge).color(Color::Black));
//!
//! for primitive in drawing.primitives() {
//!     println!("{:?}", primitive.segment);
//! }
//! assert!((drawing.bounds().width() - 10.0).abs() < 1e-12);
//! ```

pub mod path;
pub mod projection;
pub mod types;

pub use path::{
    line, orbit, polygon, polyline, ArcSegment, Drawing, FlatOp, FlatRecord, Group, PathSegment,
    Primitive, Primitives, Shape,
};
pub use projection::{project_drawing, project_point, project_point_with_depth, ViewMatrix};
pub use types::{
    BoundingBox2D, Color, EdgeKind, LineStyle, Point2D, ProjectedEdge, ProjectedView, Style,
    ViewDirection,
};
