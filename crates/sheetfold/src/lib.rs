#![warn(missing_docs)]

//! Flat patterns for sheet-metal boxes with a tilted lid.
//!
//! A box is a square lid with four walls bent down to a level bottom. The
//! lid may face any upward direction, so each wall has its own bend angle.
//! [`build`] unfolds the walls into a single cut pattern with bend reliefs,
//! fastener teeth, hooks and an optional engraved label.
//!
//! # Example
//!
//! ```
//! use sheetfold::{build, BoxParams};
//! use sheetfold_math::Vec3;
//!
//! let params = BoxParams::with_normal(Vec3::new(0.1, 0.2, 0.97));
//! let pattern = build(&params).unwrap();
//! assert!(pattern.warnings.is_empty());
//! for record in pattern.drawing.records() {
//!     let _ = record;
//! }
//! ```
//!
//! - [`params`]: build parameters and derived tab dimensions
//! - [`unfold`]: the unfolding engine
//! - [`tabs`]: tooth, hook, slot and relief profiles
//! - [`label`]: seven-segment stroke labels
//! - [`base_plate`]: the plate a grid of boxes is fastened to
//! - [`debug`]: the folded box as a sheet solid
//! - [`batch`]: sequential export over many lid normals

pub mod base_plate;
pub mod batch;
pub mod debug;
pub mod error;
pub mod label;
pub mod params;
pub mod tabs;
pub mod unfold;

pub use base_plate::base_plate;
pub use batch::{
    run_batch, BatchDocument, BatchFailure, BatchItem, BatchReport, BatchStage,
    CommandPostProcessor, PostProcessError, PostProcessor,
};
pub use debug::{debug_views, folded_sheet};
pub use error::{GeometryWarning, Result, UnfoldError, WallEnd};
pub use label::{label_shapes, label_width};
pub use params::{BoxParams, TabDimensions, ViewOptions};
pub use unfold::{build, FlatPattern, Layer, Layers, WallBend, WallStack};
