//! Orthographic projection of drawings onto view planes.

use sheetfold_math::{Point3, Vec3};

use crate::path::{Drawing, PathSegment};
use crate::types::{Color, EdgeKind, Point2D, ProjectedEdge, ProjectedView, ViewDirection};

/// Orthonormal camera basis for one view direction.
#[derive(Debug, Clone, Copy)]
pub struct ViewMatrix {
    /// Screen X axis in model space.
    pub right: Vec3,
    /// Screen Y axis in model space.
    pub up: Vec3,
    /// Viewing direction (viewer toward model).
    pub forward: Vec3,
}

impl ViewMatrix {
    /// Build the basis, orthogonalising the view's up vector against its forward vector.
    pub fn from_view_direction(view: ViewDirection) -> Self {
        let forward = view.view_vector().normalize();
        let up_hint = view.up_vector();
        let up = (up_hint - forward * up_hint.dot(&forward)).normalize();
        let right = forward.cross(&up);
        Self { right, up, forward }
    }
}

/// Project a 3D point into 2D view coordinates.
pub fn project_point(point: &Point3, view: &ViewMatrix) -> Point2D {
    project_point_with_depth(point, view).0
}

/// Project a 3D point, also returning its depth along the view direction.
pub fn project_point_with_depth(point: &Point3, view: &ViewMatrix) -> (Point2D, f64) {
    let v = point.coords;
    (
        Point2D::new(v.dot(&view.right), v.dot(&view.up)),
        v.dot(&view.forward),
    )
}

fn push_edge(
    out: &mut ProjectedView,
    matrix: &ViewMatrix,
    from: &Point3,
    to: &Point3,
    kind: EdgeKind,
    color: Option<Color>,
) {
    let (start, d0) = project_point_with_depth(from, matrix);
    let (end, d1) = project_point_with_depth(to, matrix);
    out.add_edge(ProjectedEdge {
        start,
        end,
        kind,
        color,
        depth: (d0 + d1) / 2.0,
    });
}

/// Flatten the visible primitives of a drawing into projected edges.
///
/// Arcs are tessellated into at least `arc_segments` chords.
/// Edge kinds follow line styles (see [`EdgeKind`]).
pub fn project_drawing(
    drawing: &Drawing,
    view: ViewDirection,
    arc_segments: usize,
) -> ProjectedView {
    let matrix = ViewMatrix::from_view_direction(view);
    let mut projected = ProjectedView::new(view);
    let mut pen: Option<Point3> = None;

    for primitive in drawing.primitives() {
        let kind = EdgeKind::from(primitive.style.line_style);
        let color = primitive.style.color;
        match &primitive.segment {
            PathSegment::MoveTo(p) => pen = Some(*p),
            PathSegment::LineTo(p) => {
                if let Some(from) = pen {
                    push_edge(&mut projected, &matrix, &from, p, kind, color);
                }
                pen = Some(*p);
            }
            PathSegment::Arc(arc) => {
                let points = arc.sample(arc_segments);
                for pair in points.windows(2) {
                    push_edge(&mut projected, &matrix, &pair[0], &pair[1], kind, color);
                }
                pen = points.last().copied();
            }
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{line, orbit, Group};
    use crate::types::LineStyle;

    #[test]
    fn test_top_view_keeps_xy() {
        let m = ViewMatrix::from_view_direction(ViewDirection::Top);
        let p = project_point(&Point3::new(1.0, 2.0, 3.0), &m);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_front_view_shows_xz() {
        let m = ViewMatrix::from_view_direction(ViewDirection::Front);
        let (p, depth) = project_point_with_depth(&Point3::new(1.0, 2.0, 3.0), &m);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 3.0).abs() < 1e-12);
        assert!((depth - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_right_view_shows_yz() {
        let m = ViewMatrix::from_view_direction(ViewDirection::Right);
        let p = project_point(&Point3::new(1.0, 2.0, 3.0), &m);
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!((p.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_isometric_basis_is_orthonormal() {
        let m = ViewMatrix::from_view_direction(ViewDirection::ISOMETRIC_STANDARD);
        assert!((m.right.norm() - 1.0).abs() < 1e-12);
        assert!((m.up.norm() - 1.0).abs() < 1e-12);
        assert!(m.right.dot(&m.up).abs() < 1e-12);
        assert!(m.up.dot(&m.forward).abs() < 1e-12);
    }

    #[test]
    fn test_project_drawing_classifies_edges() {
        let mut drawing = Drawing::new();
        drawing.push(
            Group::new(line(Point3::origin(), Point3::new(10.0, 0.0, 0.0))).color(Color::Black),
        );
        drawing.push(
            Group::new(line(Point3::new(0.0, 1.0, 0.0), Point3::new(10.0, 1.0, 0.0)))
                .line_style(LineStyle::BendDash),
        );
        drawing.push(
            Group::new(orbit(
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                std::f64::consts::PI,
                Vec3::z(),
            ))
            .line_style(LineStyle::Dashed),
        );
        drawing.push(Group::new(line(Point3::origin(), Point3::new(0.0, 50.0, 0.0))).hidden(true));

        let view = project_drawing(&drawing, ViewDirection::Top, 8);
        assert_eq!(view.edges_of(EdgeKind::Cut).count(), 1);
        assert_eq!(view.edges_of(EdgeKind::Bend).count(), 1);
        assert!(view.edges_of(EdgeKind::Construction).count() >= 8);
        assert!((view.total_length(EdgeKind::Cut) - 10.0).abs() < 1e-12);
        assert!(view.bounds.max_y < 2.0);
    }
}
