//! Orthographic debug rendering of sheets and their bends.
//!
//! The shapes are built in model space and flattened per view by
//! [`sheetfold_drafting::project_drawing`].

use log::debug;
use sheetfold_drafting::{
    line, orbit, project_drawing, Color, Drawing, Group, LineStyle, ProjectedView, Shape,
    ViewDirection,
};
use sheetfold_math::{
    any_perpendicular, rotate_about_pivot, rotation_about_axis, rotation_between,
    slerp_from_identity, Point3, Rotation, Vec3,
};

use crate::error::{Result, SheetError};
use crate::plane::Side;
use crate::sheet::{Bend, Sheet, SheetEdge};

const MARKER_LENGTH: f64 = 5.0;
const ARC_SEGMENTS: usize = 8;

/// The views [`three_view`] renders.
pub const DEBUG_VIEWS: [ViewDirection; 3] =
    [ViewDirection::Top, ViewDirection::Front, ViewDirection::Right];

fn arrow(origin: Point3, vector: Vec3) -> Vec<Shape> {
    let tip = origin + vector;
    let mut shapes = line(origin, tip);
    let Some(dir) = vector.try_normalize(1e-12) else {
        return shapes;
    };
    let side = any_perpendicular(&dir);
    let back = -vector * 0.2;
    for angle in [0.4f64, -0.4] {
        if let Some(turn) = rotation_about_axis(&side, angle) {
            shapes.extend(line(tip, tip + turn * back));
        }
    }
    shapes
}

fn orbit_by(pivot: Point3, from: Point3, rotation: &Rotation) -> Vec<Shape> {
    match rotation.axis_angle() {
        Some((axis, angle)) => orbit(pivot, from, angle, axis.into_inner()),
        None => Vec::new(),
    }
}

/// Model-space debug shapes of a sheet, recursing into bends and extrusions.
pub fn sheet_shapes(sheet: &Sheet) -> Result<Vec<Shape>> {
    let mut shapes = Vec::new();

    for side in Side::ALL {
        let face = sheet.face(side)?;
        match sheet.side(side) {
            SheetEdge::Solid => {
                shapes.extend(line(face.top_vertex0, face.top_vertex1));
                shapes.extend(line(face.bottom_vertex0, face.bottom_vertex1));
            }
            SheetEdge::Bend(bend) => {
                let top = Group::new(line(face.top_vertex0, face.top_vertex1)).color(Color::Blue);
                let bottom =
                    Group::new(line(face.bottom_vertex0, face.bottom_vertex1)).color(Color::Green);
                shapes.push(
                    Group::new(vec![top.into(), bottom.into()])
                        .line_style(LineStyle::Dashed)
                        .into(),
                );
                shapes.extend(bend_shapes(bend)?);
            }
            SheetEdge::Extrusion(inner) => shapes.extend(sheet_shapes(inner)?),
        }
    }

    let center = sheet.top.centroid();
    shapes.push(
        Group::new(line(center, center + sheet.normal()? * MARKER_LENGTH))
            .color(Color::Pink)
            .line_style(LineStyle::Dashed)
            .into(),
    );

    for (bottom, top) in sheet.bottom.vertices.iter().zip(&sheet.top.vertices) {
        shapes.extend(line(*bottom, *top));
    }
    Ok(shapes)
}

/// Bend radius, setbacks, arcs and the flange that follows.
///
/// The flange is turned from the sheet normal to the horizontal projection
/// of the face normal, about a pivot `radius` below the bottom face.
fn bend_shapes(bend: &Bend) -> Result<Vec<Shape>> {
    let face = &bend.from_face;
    let spec = &bend.spec;
    let sheet_normal = face.sheet_normal()?;
    let apex = face.top_vertex0 + face.face_normal * spec.outside_setback();
    let pivot = face.bottom_vertex0 - sheet_normal * spec.inside_radius;
    let axis = face.top_edge_direction()?;
    let horizontal = Vec3::new(face.face_normal.x, face.face_normal.y, 0.0)
        .try_normalize(1e-12)
        .ok_or_else(|| SheetError::DegenerateEdge("bend face is horizontal".into()))?;
    let rotation = rotation_between(&sheet_normal, &horizontal)
        .ok_or_else(|| SheetError::DegenerateEdge("bend has no rotation".into()))?;

    let inner_start = face.bottom_vertex0;
    let inner_end = rotate_about_pivot(&inner_start, &rotation, &pivot);
    let outer_start = face.top_vertex0;
    let outer_end = rotate_about_pivot(&outer_start, &rotation, &pivot);
    let to_apex = (apex - pivot).try_normalize(1e-12).unwrap_or(sheet_normal);
    let halfway = slerp_from_identity(&rotation, 0.5) * sheet_normal;

    let mut shapes: Vec<Shape> = vec![
        Group::new(arrow(pivot, to_apex * MARKER_LENGTH)).color(Color::Blue).into(),
        Group::new(arrow(pivot, halfway * MARKER_LENGTH)).color(Color::Green).into(),
        Group::new(arrow(pivot, face.face_normal * MARKER_LENGTH)).color(Color::Red).into(),
        Group::new(line(pivot - axis * 2.5, pivot + axis * 2.5)).color(Color::Pink).into(),
    ];

    let center = face.center();
    shapes.push(
        Group::new(line(center, center + face.face_normal * MARKER_LENGTH))
            .color(Color::Pink)
            .line_style(LineStyle::Dashed)
            .into(),
    );

    // radius
    let mut radius = line(pivot, inner_start);
    radius.extend(line(pivot, inner_end));
    shapes.push(Group::new(radius).color(Color::Gray).line_style(LineStyle::Dashed).into());

    // setback
    let mut setback = line(face.top_vertex0, apex);
    setback.extend(line(apex, outer_end));
    shapes.push(Group::new(setback).color(Color::Blue).line_style(LineStyle::Dashed).into());

    let mut walls = orbit_by(pivot, inner_start, &rotation);
    walls.extend(orbit_by(pivot, outer_start, &rotation));
    shapes.push(Group::new(walls).color(Color::Red).into());

    let neutral_start = inner_start + sheet_normal * spec.thickness * spec.k_factor;
    shapes.push(
        Group::new(orbit_by(pivot, neutral_start, &rotation))
            .color(Color::Green)
            .line_style(LineStyle::Dashed)
            .into(),
    );

    match &bend.edge {
        SheetEdge::Solid => {
            let along = face.top_vertex1 - face.top_vertex0;
            shapes.extend(line(inner_end, outer_end));
            shapes.extend(line(inner_end + along, outer_end + along));
            shapes.extend(line(inner_end, inner_end + along));
            shapes.extend(line(outer_end, outer_end + along));
        }
        SheetEdge::Bend(next) => shapes.extend(bend_shapes(next)?),
        SheetEdge::Extrusion(flange) => shapes.extend(sheet_shapes(flange)?),
    }
    Ok(shapes)
}

/// Top, front and right projections of a sheet.
pub fn three_view(sheet: &Sheet) -> Result<Vec<ProjectedView>> {
    let drawing = Drawing {
        shapes: sheet_shapes(sheet)?,
    };
    let views: Vec<_> = DEBUG_VIEWS
        .iter()
        .map(|view| project_drawing(&drawing, *view, ARC_SEGMENTS))
        .collect();
    for view in &views {
        debug!(
            "{:?} view: {} edges, {:.2} x {:.2}",
            view.view_direction,
            view.edges.len(),
            view.bounds.width(),
            view.bounds.height()
        );
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane;
    use std::f64::consts::FRAC_PI_2;

    fn box_with_bent_north() -> Sheet {
        let sheet = Plane::fitting(20.0, &Vec3::z()).unwrap().extrude(1.0).unwrap();
        let face = sheet.face(Side::North).unwrap();
        let bend = Bend::new(face, FRAC_PI_2, 1.0, 0.44).unwrap();
        sheet.with_bend(Side::North, bend)
    }

    #[test]
    fn test_solid_sheet_views() {
        let sheet = Plane::fitting(20.0, &Vec3::z()).unwrap().extrude(1.0).unwrap();
        let views = three_view(&sheet).unwrap();
        assert_eq!(views.len(), 3);
        let top = &views[0];
        assert!((top.bounds.width() - 20.0).abs() < 1e-9);
        let front = &views[1];
        // thickness plus the normal marker
        assert!((front.bounds.height() - (1.0 + MARKER_LENGTH)).abs() < 1e-9);
    }

    #[test]
    fn test_bent_flange_hangs_below() {
        let views = three_view(&box_with_bent_north()).unwrap();
        let right = &views[2];
        // flange turned down about a pivot one radius below the bottom face
        assert!((right.bounds.min_y + 1.0).abs() < 1e-9);
        assert!(right.bounds.max_x > 12.0 - 1e-9);
        assert!(right.edges.len() > 20);
    }

    #[test]
    fn test_nested_extrusion_is_drawn() {
        let inner = Plane::fitting(10.0, &Vec3::z())
            .unwrap()
            .offsetted(&Vec3::new(30.0, 0.0, 0.0))
            .extrude(1.0)
            .unwrap();
        let sheet = Plane::fitting(20.0, &Vec3::z())
            .unwrap()
            .extrude(1.0)
            .unwrap()
            .with_extrusion(Side::East, inner);
        let top = &three_view(&sheet).unwrap()[0];
        assert!((top.bounds.max_x - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_sheet_after_bend_is_drawn() {
        let inner = Plane::fitting(10.0, &Vec3::z())
            .unwrap()
            .offsetted(&Vec3::new(35.0, 0.0, 0.0))
            .extrude(1.0)
            .unwrap();
        let sheet = Plane::fitting(20.0, &Vec3::z()).unwrap().extrude(1.0).unwrap();
        let face = sheet.face(Side::East).unwrap();
        let bend = Bend::new(face, FRAC_PI_2, 1.0, 0.44)
            .unwrap()
            .with_edge(SheetEdge::Extrusion(Box::new(inner)));
        let top = &three_view(&sheet.with_bend(Side::East, bend)).unwrap()[0];
        assert!((top.bounds.max_x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_bend_after_bend_is_drawn() {
        let sheet = Plane::fitting(20.0, &Vec3::z()).unwrap().extrude(1.0).unwrap();
        let face = sheet.face(Side::North).unwrap();
        let single = Bend::new(face, FRAC_PI_2, 1.0, 0.44).unwrap();
        let chained = single
            .clone()
            .with_edge(SheetEdge::Bend(Box::new(single.clone())));
        let single_edges = three_view(&sheet.clone().with_bend(Side::North, single)).unwrap()[1]
            .edges
            .len();
        let chained_edges = three_view(&sheet.with_bend(Side::North, chained)).unwrap()[1]
            .edges
            .len();
        // the inner bend draws its arcs and markers in place of the end face
        assert!(chained_edges > single_edges);
    }
}
