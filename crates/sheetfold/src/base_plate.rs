//! The plate a grid of boxes is fastened to.
//!
//! Cells are `size` apart with the first cell centred on the origin. Every
//! cell boundary along Y gets a keyed hole for the north/south fastener
//! teeth, and every boundary along X gets relieved slots for the east/west
//! hooks. Hole and tooth sizes come from the same [`TabDimensions`], so they
//! stay matched.

use std::f64::consts::{FRAC_PI_2, PI};

use log::debug;
use sheetfold_drafting::{polygon, Drawing, Group, Shape};
use sheetfold_math::{rotation_about_axis, Point3, Vec3};

use crate::error::{Result, UnfoldError};
use crate::params::{BoxParams, TabDimensions};
use crate::tabs::relieved_slot;

/// Half of a fastener hole, on the `+X` side of the cell boundary at
/// `y = -size / 2`.
///
/// The hole leaves a tongue `fastener_hole_width` wide reaching
/// `inside_tab_length` into the cell. Boundaries shared by two rows are
/// deepened by one thickness to take two teeth.
fn fastener_hole_half(params: &BoxParams, tabs: &TabDimensions, shared: bool) -> Vec<Shape> {
    let s2 = params.size / 2.0;
    let t = params.thickness;
    let kr = tabs.key_rounding_radius;
    let rr = tabs.relief_radius;
    let clr = tabs.tooth_clearance;
    let hole = tabs.fastener_hole_width / 2.0;
    let tooth = params.fastener_width / 2.0 + clr;
    let tongue = -s2 + tabs.inside_tab_length;
    let top = -s2 + tabs.hook_depth + clr * 2.0 + t;
    let extra = if shared { Vec3::new(0.0, -t, 0.0) } else { Vec3::zeros() };
    let p = |x: f64, y: f64| Point3::new(x, y, 0.0);

    vec![
        Shape::move_to(p(0.0, tongue)),
        Shape::line_to(p(hole - kr, tongue)),
        Shape::arc(p(hole - kr, tongue - kr), p(hole - kr, tongue), FRAC_PI_2, -Vec3::z()),
        Shape::line_to(p(hole, -s2) + extra),
        Shape::arc(p(hole + rr, -s2) + extra, p(hole, -s2) + extra, PI, Vec3::z()),
        Shape::line_to(p(tooth - rr * 2.0, -s2) + extra),
        Shape::arc(p(tooth - rr, -s2) + extra, p(tooth - rr * 2.0, -s2) + extra, PI, Vec3::z()),
        Shape::line_to(p(tooth, top)),
        Shape::arc(p(tooth - kr, top), p(tooth, top), FRAC_PI_2, Vec3::z()),
        Shape::line_to(p(0.0, top + kr)),
    ]
}

/// Both halves of the fastener hole at the `y = -size / 2` boundary.
fn fastener_hole(params: &BoxParams, tabs: &TabDimensions, shared: bool) -> Vec<Shape> {
    let half = fastener_hole_half(params, tabs, shared);
    let mut shapes = half.clone();
    if let Some(mirror) = rotation_about_axis(&Vec3::y(), PI) {
        let at = Point3::new(0.0, -params.size / 2.0, 0.0);
        shapes.extend(half.iter().map(|s| s.rotated_about(&at, &mirror)));
    }
    shapes
}

/// Hook slot along the `x` boundary line, `width` wide towards `-X`.
fn hook_slot(params: &BoxParams, tabs: &TabDimensions, x: f64, width: f64) -> Vec<Shape> {
    let clr = params.hole_clearance;
    let start = Point3::new(x, -tabs.hook_width / 2.0 + tabs.hook_depth, 0.0);
    let end = Point3::new(x, tabs.hook_width / 2.0 + clr * 2.0 + tabs.hook_depth, 0.0);
    relieved_slot(
        start,
        end,
        Vec3::new(-width, 0.0, 0.0),
        tabs.relief_depth,
        tabs.relief_radius,
    )
}

/// Holes of the cell at column `x`, row `y` in cell-local coordinates.
fn cell(
    params: &BoxParams,
    tabs: &TabDimensions,
    columns: usize,
    rows: usize,
    x: usize,
    y: usize,
) -> Vec<Shape> {
    let s2 = params.size / 2.0;
    let t = params.thickness;
    let clr = params.hole_clearance;
    let mut shapes = fastener_hole(params, tabs, y != 0);

    // the row past the last box only closes the column of fastener holes
    if y < rows {
        if x == 0 {
            let edge = -s2 + t / 2.0 + clr / 2.0;
            shapes.extend(hook_slot(params, tabs, edge, t / 2.0 + clr / 2.0));
        }
        if x + 1 == columns {
            let edge = s2 - t / 2.0 - clr / 2.0;
            shapes.extend(hook_slot(params, tabs, edge, t / 2.0 + clr / 2.0));
        }
        if x != 0 {
            shapes.extend(hook_slot(params, tabs, -s2, t + clr));
        }
    }
    shapes
}

/// Base plate for `columns` by `rows` boxes.
///
/// # Errors
///
/// [`UnfoldError::InvalidParameter`] for invalid box parameters or an empty
/// grid.
pub fn base_plate(params: &BoxParams, columns: usize, rows: usize) -> Result<Drawing> {
    params.validate()?;
    if columns == 0 || rows == 0 {
        return Err(UnfoldError::InvalidParameter(format!(
            "base plate grid {columns} x {rows} is empty"
        )));
    }
    let size = params.size;
    let tabs = params.tabs();

    let corner = Point3::new(-size * 0.75, -size * 0.75, 0.0);
    let width = Vec3::new(size * (columns as f64 + 0.5), 0.0, 0.0);
    let height = Vec3::new(0.0, size * (rows as f64 + 0.75), 0.0);
    let mut drawing = Drawing::new();
    drawing.push(Group::new(polygon(&[
        corner,
        corner + width,
        corner + width + height,
        corner + height,
    ])));

    for x in 0..columns {
        for y in 0..=rows {
            let offset = Vec3::new(size * x as f64, size * y as f64, 0.0);
            let holes = cell(params, &tabs, columns, rows, x, y)
                .iter()
                .map(|s| s.translated(&offset))
                .collect();
            drawing.push(Group::new(holes));
        }
    }
    debug!(
        "base plate {columns} x {rows}: {} primitives",
        drawing.primitives().count()
    );
    Ok(drawing)
}
