//! Flat pattern of a four-walled box with a tilted lid.
//!
//! The lid is a square fitted onto the plane through the origin with the
//! lid normal; the four walls hang along the world ±X/±Y directions down to
//! a horizontal bottom. Each wall's bend angle is the angle between the lid
//! normal and the wall's outward normal, so any lid normal works, not only
//! small tilts.
//!
//! A build runs in four stages:
//!
//! 1. **Bends**: rotation, angle and axis per wall, with setbacks and
//!    allowances from the bend formulas.
//! 2. **Folded stacks**: the lid is pulled in by each wall's inside
//!    setback, then every wall gets a 3D corner stack (underside, neutral
//!    and overside layers) at its bend tangent, its outer top corners and
//!    its bottom corners. The right-hand end of each wall is shortened by
//!    the corner gap.
//! 3. **Unfold**: every stack is turned back about its bend pivot and moved
//!    out by the bend allowance of its layer, landing coplanar with the lid.
//! 4. **Flatten**: the unfolded net is rotated from the lid normal onto +Z
//!    and emitted with bend reliefs, tabs, slots and the label.

use log::{debug, warn};
use sheetfold_drafting::{
    line, orbit, BoundingBox2D, Color, Drawing, Group, LineStyle, Point2D, Primitives, Shape,
};
use sheetfold_math::{
    extended, project_onto, rotate_about_pivot, rotation_between, scalar_projection,
    slerp_from_identity, Point3, Rotation, Tolerance, Vec3,
};
use sheetfold_sheet::{BendSpec, Plane, Side};

use crate::error::{GeometryWarning, Result, UnfoldError, WallEnd};
use crate::label::{label_shapes, label_width};
use crate::params::BoxParams;
use crate::tabs::{bend_relief, fastener_slot, fastener_tab, hook_tab, EdgeFrame};

/// Width of the bridges left across each bend zone.
const RELIEF_BRIDGE: f64 = 2.0;
const LABEL_SCALE: f64 = 5.0;
const LABEL_SPACING: f64 = 0.8;
/// Distance of the label's top edge from the wall's bottom edge.
const LABEL_INSET: f64 = 3.0;

/// The bend joining the lid to one wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBend {
    /// The wall.
    pub side: Side,
    /// Rotation carrying the lid normal onto the wall normal.
    pub rotation: Rotation,
    /// Unit rotation axis, along the bend line.
    pub axis: Vec3,
    /// Bend parameters with the angle taken from `rotation`.
    pub spec: BendSpec,
}

impl WallBend {
    /// Bend angle in radians.
    pub fn angle(&self) -> f64 {
        self.spec.angle
    }

    /// Unit in-lid direction pointing out of the lid across the bend line.
    pub fn edge_normal_out(&self, plane_normal: &Vec3) -> Vec3 {
        self.axis.cross(plane_normal)
    }
}

/// One corner point in each of the three material layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layers {
    /// Inner surface.
    pub underside: Point3,
    /// Neutral axis, `k_factor * thickness` in from the inner surface.
    pub neutral: Point3,
    /// Outer surface.
    pub overside: Point3,
}

impl Layers {
    fn stacked(underside: Point3, normal: &Vec3, thickness: f64, k_factor: f64) -> Self {
        Self {
            underside,
            neutral: underside + normal * (thickness * k_factor),
            overside: underside + normal * thickness,
        }
    }

    fn map(&self, f: impl Fn(&Point3, Layer) -> Point3) -> Self {
        Self {
            underside: f(&self.underside, Layer::Underside),
            neutral: f(&self.neutral, Layer::Neutral),
            overside: f(&self.overside, Layer::Overside),
        }
    }

    /// The point in `layer`.
    pub fn get(&self, layer: Layer) -> Point3 {
        match layer {
            Layer::Underside => self.underside,
            Layer::Neutral => self.neutral,
            Layer::Overside => self.overside,
        }
    }
}

/// A material layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Inner surface.
    Underside,
    /// Neutral axis.
    Neutral,
    /// Outer surface.
    Overside,
}

impl Layer {
    /// All layers, inside out.
    pub const ALL: [Layer; 3] = [Layer::Underside, Layer::Neutral, Layer::Overside];
}

/// Corner stacks of one wall. Index 0 is the edge's `vertex0` end, index 1
/// the gap-shortened `vertex1` end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallStack {
    /// The wall.
    pub side: Side,
    /// Lid corners on the bend line.
    pub lid: [Layers; 2],
    /// Wall corners on the bend tangent.
    pub inner_top: [Layers; 2],
    /// Top corners after the corner padding.
    pub outer_top: [Layers; 2],
    /// Bottom corners.
    pub outer_bottom: [Layers; 2],
}

impl WallStack {
    fn map_wall(&self, f: impl Fn(&Point3, Layer) -> Point3 + Copy) -> Self {
        Self {
            side: self.side,
            lid: self.lid,
            inner_top: self.inner_top.map(|l| l.map(f)),
            outer_top: self.outer_top.map(|l| l.map(f)),
            outer_bottom: self.outer_bottom.map(|l| l.map(f)),
        }
    }

    fn map_all(&self, f: impl Fn(&Point3) -> Point3 + Copy) -> Self {
        Self {
            lid: self.lid.map(|l| l.map(|p, _| f(p))),
            ..self.map_wall(move |p, _| f(p))
        }
    }
}

/// A complete build.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPattern {
    /// Unit lid normal.
    pub plane_normal: Vec3,
    /// Bends in [`Side::ALL`] order.
    pub bends: [WallBend; 4],
    /// Walls as folded.
    pub folded: [WallStack; 4],
    /// Walls unfolded into the tilted lid plane.
    pub top_aligned: [WallStack; 4],
    /// Walls laid flat in XY.
    pub flat: [WallStack; 4],
    /// Every rendering, hidden ones included.
    pub drawing: Drawing,
    /// Problems found while building.
    pub warnings: Vec<GeometryWarning>,
}

impl FlatPattern {
    /// Visible primitives in drawing order.
    pub fn primitives(&self) -> Primitives<'_> {
        self.drawing.primitives()
    }

    /// XY bounds of the flat neutral outline, tabs and labels excluded.
    pub fn outline_bounds(&self) -> BoundingBox2D {
        let mut bounds = BoundingBox2D::empty();
        for wall in &self.flat {
            for layers in wall.lid.iter().chain(&wall.outer_top).chain(&wall.outer_bottom) {
                bounds.include_point(Point2D::from_xy(&layers.neutral));
            }
        }
        bounds
    }

    /// The flat stack of `side`.
    pub fn flat_wall(&self, side: Side) -> &WallStack {
        &self.flat[side.index()]
    }
}

fn degenerate(side: Side, reason: impl Into<String>) -> UnfoldError {
    UnfoldError::DegenerateGeometry {
        side,
        reason: reason.into(),
    }
}

pub(crate) fn wall_bend(params: &BoxParams, normal: &Vec3, side: Side) -> Result<WallBend> {
    let tol = Tolerance::DEFAULT;
    let rotation = rotation_between(normal, &side.outward_normal())
        .ok_or_else(|| degenerate(side, "no rotation from the lid normal"))?;
    let (axis, angle) = rotation
        .axis_angle()
        .ok_or_else(|| degenerate(side, "lid is parallel to the wall"))?;
    if angle >= std::f64::consts::PI - tol.angular {
        return Err(degenerate(side, format!("bend angle {angle} rad is a half turn")));
    }
    let spec = BendSpec::new(angle, params.bend_radius, params.thickness, params.k_factor)?;
    Ok(WallBend {
        side,
        rotation,
        axis: axis.into_inner(),
        spec,
    })
}

/// Pull each lid edge in by its inside setback, sliding the corners along
/// the neighbouring sides of the unmodified lid.
fn top_underside(prescaled: &Plane, normal: &Vec3, bends: &[WallBend; 4]) -> Result<Plane> {
    let tol = Tolerance::DEFAULT;
    let mut top = *prescaled;
    for bend in bends {
        let edge_normal_in = normal.cross(&bend.axis);
        let side_dir = prescaled.edge(bend.side.next()).direction()?;
        let along = scalar_projection(&side_dir, &edge_normal_in)
            .filter(|s| !tol.is_zero(*s))
            .ok_or_else(|| degenerate(bend.side, "neighbouring side runs along the bend line"))?;
        top = top
            .edge(bend.side)
            .offsetted(&(side_dir * (bend.spec.inside_setback() / along)));
    }
    Ok(top)
}

fn bottom_inside(params: &BoxParams) -> Plane {
    let h = (params.size - params.thickness * 2.0) / 2.0;
    let z = -params.height;
    Plane::new(
        Point3::new(-h, h, z),
        Point3::new(h, h, z),
        Point3::new(h, -h, z),
        Point3::new(-h, -h, z),
    )
}

fn folded_wall(
    params: &BoxParams,
    normal: &Vec3,
    prescaled: &Plane,
    top: &Plane,
    bottom: &Plane,
    side: Side,
) -> Result<WallStack> {
    let t = params.thickness;
    let k = params.k_factor;
    let r = params.bend_radius;
    let gap = params.corner_gap();
    let s = side.outward_normal();
    let straight_left = Vec3::z().cross(&s);

    let lid_edge = top.edge(side);
    let lid_corners = [lid_edge.vertex0(), lid_edge.vertex1()];
    let prescaled_corners = [prescaled.edge(side).vertex0(), prescaled.edge(side).vertex1()];
    let bottom_edge = bottom.edge(side);

    let inner = lid_corners.map(|c| c - normal * r + s * r);
    let pad = |i: usize, trim: f64| -> Result<Vec3> {
        let across = project_onto(&(prescaled_corners[i] - inner[i]), &straight_left)
            .ok_or_else(|| degenerate(side, "wall has no horizontal direction"))?;
        Ok(extended(&extended(&across, t), -trim))
    };
    let outer = [inner[0] + pad(0, 0.0)?, inner[1] + pad(1, gap)?];
    let bottoms = [
        bottom_edge.vertex0() + straight_left * t,
        bottom_edge.vertex1() - straight_left * (t - gap),
    ];

    let layered = |p: Point3| Layers::stacked(p, &s, t, k);
    Ok(WallStack {
        side,
        lid: lid_corners.map(|c| Layers::stacked(c, normal, t, k)),
        inner_top: inner.map(layered),
        outer_top: outer.map(layered),
        outer_bottom: bottoms.map(layered),
    })
}

fn unfolded_wall(
    params: &BoxParams,
    normal: &Vec3,
    bend: &WallBend,
    folded: &WallStack,
) -> WallStack {
    let back = slerp_from_identity(&bend.rotation.inverse(), params.angle_slerp);
    let pivot = folded.lid[0].underside - normal * params.bend_radius;
    let out = bend.edge_normal_out(normal) * params.angle_slerp;
    let spec = &bend.spec;
    folded.map_wall(|p, layer| {
        let allowance = match layer {
            Layer::Underside => spec.inside_allowance(),
            Layer::Neutral => spec.bend_allowance(),
            Layer::Overside => spec.outside_allowance(),
        };
        rotate_about_pivot(p, &back, &pivot) + out * allowance
    })
}

fn wall_warnings(params: &BoxParams, wall: &WallStack) -> Vec<GeometryWarning> {
    let s = wall.side.outward_normal();
    let mut warnings = Vec::new();
    for (i, end) in [WallEnd::Left, WallEnd::Right].into_iter().enumerate() {
        let leg = wall.outer_bottom[i].neutral - wall.outer_top[i].neutral;
        let length = leg.norm();
        let inverted = leg.try_normalize(1e-12).map_or(true, |dir| dir.dot(&s) <= 0.0);
        if inverted {
            warnings.push(GeometryWarning::WallInverted {
                side: wall.side,
                end,
                length,
            });
        }
        if length <= params.min_wall_length {
            warnings.push(GeometryWarning::WallTooShort {
                side: wall.side,
                end,
                length,
            });
        }
    }
    warnings
}

/// Bend line, outer edges and bottom edge of one layer.
fn layer_outline(wall: &WallStack, layer: Layer) -> Vec<Shape> {
    let [it0, it1] = wall.inner_top.map(|l| l.get(layer));
    let [ot0, ot1] = wall.outer_top.map(|l| l.get(layer));
    let [ob0, ob1] = wall.outer_bottom.map(|l| l.get(layer));
    let mut shapes: Vec<Shape> =
        vec![Group::new(line(it0, it1)).line_style(LineStyle::BendDash).into()];
    shapes.extend(line(it0, ot0));
    shapes.extend(line(it1, ot1));
    shapes.extend(line(ot0, ob0));
    shapes.extend(line(ot1, ob1));
    shapes.extend(line(ob0, ob1));
    shapes
}

fn layered_group(shapes: Vec<Shape>, layer: Layer) -> Shape {
    let group = Group::new(shapes);
    match layer {
        Layer::Neutral => group.color(Color::Green).into(),
        _ => group.into(),
    }
}

fn folded_shapes(wall: &WallStack, bend: &WallBend, normal: &Vec3, radius: f64) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for layer in Layer::ALL {
        let mut layer_shapes: Vec<Shape> =
            vec![Group::new(line(wall.lid[0].get(layer), wall.lid[1].get(layer)))
                .line_style(LineStyle::BendDash)
                .into()];
        for lid in &wall.lid {
            let pivot = lid.underside - normal * radius;
            layer_shapes.extend(orbit(pivot, lid.get(layer), bend.angle(), bend.axis));
        }
        layer_shapes.extend(layer_outline(wall, layer));
        shapes.push(layered_group(layer_shapes, layer));
    }

    let mut edges = Vec::new();
    let stacks = wall
        .lid
        .iter()
        .chain(&wall.inner_top)
        .chain(&wall.outer_top)
        .chain(&wall.outer_bottom);
    for stack in stacks {
        edges.extend(line(stack.underside, stack.overside));
    }
    shapes.push(Group::new(edges).line_style(LineStyle::Dashed).into());
    shapes
}

fn top_aligned_shapes(wall: &WallStack) -> Vec<Shape> {
    Layer::ALL
        .into_iter()
        .map(|layer| {
            let mut shapes = line(wall.lid[0].get(layer), wall.inner_top[0].get(layer));
            shapes.extend(line(wall.lid[1].get(layer), wall.inner_top[1].get(layer)));
            shapes.push(
                Group::new(line(wall.lid[0].get(layer), wall.lid[1].get(layer)))
                    .line_style(LineStyle::BendDash)
                    .into(),
            );
            shapes.extend(layer_outline(wall, layer));
            layered_group(shapes, layer)
        })
        .collect()
}

/// Cut lines of one flat wall: bend relief, side legs, bottom edge profile
/// and the label.
fn flat_shapes(
    params: &BoxParams,
    wall: &WallStack,
    skip_tab: bool,
) -> Result<Vec<Shape>> {
    let side = wall.side;
    let [lid0, lid1] = wall.lid.map(|l| l.neutral);
    let [it0, it1] = wall.inner_top.map(|l| l.neutral);
    let [ot0, ot1] = wall.outer_top.map(|l| l.neutral);
    let [ob0, ob1] = wall.outer_bottom.map(|l| l.neutral);

    let mut shapes = bend_relief(lid0, lid1, it0, it1, RELIEF_BRIDGE);
    shapes.push(
        Group::new(line(it0, it1))
            .color(Color::Red)
            .line_style(LineStyle::BendDash)
            .hidden(true)
            .into(),
    );
    shapes.extend(line(it0, ot0));
    shapes.extend(line(it1, ot1));
    shapes.extend(line(ot0, ob0));
    shapes.extend(line(ot1, ob1));

    let frame =
        EdgeFrame::new(ob0, ob1).ok_or_else(|| degenerate(side, "bottom edge has no length"))?;

    if let (Side::North, Some(text)) = (side, params.label.as_deref()) {
        let width = label_width(text, LABEL_SCALE, LABEL_SPACING);
        let top_corner = frame.at(frame.length() / 2.0 - width / 2.0, -LABEL_INSET);
        shapes.extend(label_shapes(
            text,
            top_corner,
            frame.dir,
            -frame.perp,
            LABEL_SCALE,
            LABEL_SPACING,
        ));
    }

    if skip_tab {
        shapes.extend(line(ob0, ob1));
        return Ok(shapes);
    }
    match side {
        Side::North | Side::South => {
            shapes.extend(fastener_tab(&frame, params));
            shapes.extend(fastener_slot(&frame, params));
        }
        Side::East => shapes.extend(hook_tab(&frame, params, true)),
        Side::West => shapes.extend(hook_tab(&frame, params, false)),
    }
    Ok(shapes)
}

/// Build the flat pattern for `params`.
///
/// # Errors
///
/// - [`UnfoldError::InvalidParameter`] if validation fails.
/// - [`UnfoldError::DegenerateGeometry`] naming the wall that cannot be built.
/// - [`UnfoldError::Sheet`] if the lid cannot be fitted.
pub fn build(params: &BoxParams) -> Result<FlatPattern> {
    params.validate()?;
    let normal = params.top_face_normal()?;
    let prescaled = Plane::fitting(params.size - params.thickness * 2.0, &normal)?;

    let bends = [
        wall_bend(params, &normal, Side::North)?,
        wall_bend(params, &normal, Side::East)?,
        wall_bend(params, &normal, Side::South)?,
        wall_bend(params, &normal, Side::West)?,
    ];
    for bend in &bends {
        debug!(
            "{} bend: {:.3}°, inside setback {:.4}, allowance {:.4}",
            bend.side,
            bend.angle().to_degrees(),
            bend.spec.inside_setback(),
            bend.spec.bend_allowance()
        );
    }

    let top = top_underside(&prescaled, &normal, &bends)?;
    let bottom = bottom_inside(params);
    let folded = [
        folded_wall(params, &normal, &prescaled, &top, &bottom, Side::North)?,
        folded_wall(params, &normal, &prescaled, &top, &bottom, Side::East)?,
        folded_wall(params, &normal, &prescaled, &top, &bottom, Side::South)?,
        folded_wall(params, &normal, &prescaled, &top, &bottom, Side::West)?,
    ];

    let mut top_aligned = folded;
    for (wall, bend) in top_aligned.iter_mut().zip(&bends) {
        *wall = unfolded_wall(params, &normal, bend, wall);
    }

    let projection = rotation_between(&normal, &Vec3::z())
        .ok_or_else(|| UnfoldError::InvalidParameter("lid normal cannot be laid flat".into()))?;
    let origin = Point3::origin();
    let flat =
        top_aligned.map(|wall| wall.map_all(|p| rotate_about_pivot(p, &projection, &origin)));

    let mut warnings = Vec::new();
    let mut folded_group = Vec::new();
    let mut aligned_group = Vec::new();
    let mut flat_group = Vec::new();
    for side in Side::ALL {
        let i = side.index();
        let found = wall_warnings(params, &flat[i]);
        let inverted = found
            .iter()
            .any(|w| matches!(w, GeometryWarning::WallInverted { .. }));
        warnings.extend(found);
        if inverted {
            warnings.push(GeometryWarning::TabSkipped {
                side,
                reason: "wall is inverted".into(),
            });
        }

        folded_group.extend(folded_shapes(&folded[i], &bends[i], &normal, params.bend_radius));
        aligned_group.extend(top_aligned_shapes(&top_aligned[i]));
        flat_group.push(Group::new(flat_shapes(params, &flat[i], inverted)?).into());
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    let mut drawing = Drawing::new();
    drawing.push(Group::new(folded_group).color(Color::Red).hidden(!params.views.folded));
    drawing.push(
        Group::new(aligned_group)
            .color(Color::Blue)
            .hidden(!params.views.top_aligned),
    );
    drawing.push(Group::new(flat_group).color(Color::Black).hidden(!params.views.flat));

    let pattern = FlatPattern {
        plane_normal: normal,
        bends,
        folded,
        top_aligned,
        flat,
        drawing,
        warnings,
    };
    let bounds = pattern.outline_bounds();
    debug!(
        "flat pattern {:.3} x {:.3} mm, {} warnings",
        bounds.width(),
        bounds.height(),
        pattern.warnings.len()
    );
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sheetfold_sheet::bend_deduction;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_untilted_box_has_right_angle_bends() {
        let pattern = build(&BoxParams::default()).unwrap();
        for bend in &pattern.bends {
            assert!((bend.angle() - FRAC_PI_2).abs() < f64::EPSILON * 4.0);
        }
        assert!(pattern.warnings.is_empty());
    }

    #[test]
    fn test_untilted_flat_width() {
        let params = BoxParams::default();
        let pattern = build(&params).unwrap();
        let north = pattern.flat_wall(Side::North).outer_bottom[0].neutral;
        let south = pattern.flat_wall(Side::South).outer_bottom[0].neutral;
        let bd = bend_deduction(FRAC_PI_2, 1.0, 0.44, 1.0);
        let expected = 50.0 + 2.0 * (50.0 + 1.0) - 2.0 * bd;
        assert_abs_diff_eq!(north.y - south.y, expected, epsilon = 1e-6);
        assert_abs_diff_eq!(north.y - south.y, 148.5239, epsilon = 1e-4);

        let east = pattern.flat_wall(Side::East).outer_bottom[0].neutral;
        let west = pattern.flat_wall(Side::West).outer_bottom[0].neutral;
        assert_abs_diff_eq!(east.x - west.x, expected, epsilon = 1e-6);
        assert_abs_diff_eq!(pattern.outline_bounds().height(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_walls_lie_in_one_plane() {
        let params = BoxParams {
            angle_around_x: 12.0,
            angle_around_y: -7.0,
            ..BoxParams::default()
        };
        let pattern = build(&params).unwrap();
        let z = pattern.flat[0].lid[0].neutral.z;
        for wall in &pattern.flat {
            for layers in wall.lid.iter().chain(&wall.inner_top).chain(&wall.outer_bottom) {
                assert_abs_diff_eq!(layers.neutral.z, z, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_round_trip_flap_length() {
        for degrees in [15.0f64, 45.0, 90.0, 120.0] {
            for thickness in [0.5, 1.0, 2.0] {
                let angle = degrees.to_radians();
                let params = BoxParams {
                    normal: Some([0.0, angle.cos(), angle.sin()]),
                    thickness,
                    height: 200.0,
                    ..BoxParams::default()
                };
                let pattern = build(&params).unwrap();
                let bend = &pattern.bends[Side::North.index()];
                assert_abs_diff_eq!(bend.angle(), angle, epsilon = 1e-9);

                let folded = &pattern.folded[Side::North.index()];
                let straight_wall = folded.inner_top[0].underside.z + params.height;

                let flat = pattern.flat_wall(Side::North);
                let frame = EdgeFrame::new(flat.lid[0].neutral, flat.lid[1].neutral).unwrap();
                // perp points from the lid towards the north wall
                let flap = (flat.outer_bottom[0].neutral - frame.start).dot(&frame.perp);
                assert_abs_diff_eq!(
                    flap,
                    bend.spec.bend_allowance() + straight_wall,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_zero_slerp_keeps_walls_folded() {
        let params = BoxParams {
            angle_slerp: 0.0,
            angle_around_x: 8.0,
            ..BoxParams::default()
        };
        let pattern = build(&params).unwrap();
        for (folded, aligned) in pattern.folded.iter().zip(&pattern.top_aligned) {
            let pairs = folded
                .inner_top
                .iter()
                .zip(&aligned.inner_top)
                .chain(folded.outer_bottom.iter().zip(&aligned.outer_bottom));
            for (a, b) in pairs {
                for layer in Layer::ALL {
                    assert_abs_diff_eq!(a.get(layer), b.get(layer), epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_inverted_wall_skips_tab() {
        // steep lid dropping below the north bottom edge
        let params = BoxParams {
            normal: Some([0.0, 0.9, 0.3]),
            ..BoxParams::default()
        };
        let pattern = build(&params).unwrap();
        assert!(pattern.warnings.iter().any(|w| matches!(
            w,
            GeometryWarning::WallInverted {
                side: Side::North,
                ..
            }
        )));
        assert!(pattern.warnings.contains(&GeometryWarning::TabSkipped {
            side: Side::North,
            reason: "wall is inverted".into(),
        }));
        assert!(!pattern
            .warnings
            .iter()
            .any(|w| w.side() == Side::South && matches!(w, GeometryWarning::TabSkipped { .. })));
    }

    #[test]
    fn test_short_wall_warns() {
        let params = BoxParams {
            height: 8.0,
            ..BoxParams::default()
        };
        let pattern = build(&params).unwrap();
        let short = pattern
            .warnings
            .iter()
            .filter(|w| matches!(w, GeometryWarning::WallTooShort { .. }))
            .count();
        assert_eq!(short, 8);
    }

    #[test]
    fn test_hidden_renderings_are_still_built() {
        let pattern = build(&BoxParams::default()).unwrap();
        assert_eq!(pattern.drawing.shapes.len(), 3);
        let hidden: Vec<bool> = pattern
            .drawing
            .shapes
            .iter()
            .map(|s| matches!(s, Shape::Group(g) if g.hidden))
            .collect();
        assert_eq!(hidden, vec![true, true, false]);
        assert!(pattern
            .primitives()
            .all(|p| p.style.color != Some(Color::Blue)));

        let all = BoxParams {
            views: crate::params::ViewOptions::all(),
            ..BoxParams::default()
        };
        let shown = build(&all).unwrap();
        assert!(shown.primitives().count() > pattern.primitives().count());
    }

    #[test]
    fn test_label_only_on_north() {
        let plain = build(&BoxParams::default()).unwrap();
        let labelled = build(&BoxParams {
            label: Some("8".into()),
            ..BoxParams::default()
        })
        .unwrap();
        // seven strokes of two shapes each
        assert_eq!(labelled.primitives().count(), plain.primitives().count() + 14);
    }

    #[test]
    fn test_validation_runs_first() {
        let params = BoxParams {
            thickness: 30.0,
            ..BoxParams::default()
        };
        assert!(matches!(build(&params), Err(UnfoldError::InvalidParameter(_))));
    }

    #[test]
    fn test_near_horizontal_lid_is_rejected() {
        let params = BoxParams {
            normal: Some([-1.0, 0.0, 1e-12]),
            ..BoxParams::default()
        };
        assert!(build(&params).is_err());
    }
}
