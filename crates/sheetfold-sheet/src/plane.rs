//! Quadrilateral faces and their edges.
//!
//! ```text
//!        North
//!   v0 ---------- v1
//!    |            |
//! West|            |East
//!    |            |
//!   v3 ---------- v2
//!        South
//! ```
//!
//! Vertices run clockwise seen from the side the normal points to.

use std::fmt;

use sheetfold_math::{
    intersect_line_plane, normal_from_clockwise_vertices, project_onto, Point3, Tolerance, Vec3,
};

use crate::error::{Result, SheetError};
use crate::sheet::Sheet;

/// One of the four edges of a [`Plane`], also naming the box wall built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Edge `v0 -> v1`, wall facing +Y.
    North,
    /// Edge `v1 -> v2`, wall facing +X.
    East,
    /// Edge `v2 -> v3`, wall facing -Y.
    South,
    /// Edge `v3 -> v0`, wall facing -X.
    West,
}

impl Side {
    /// All sides in vertex order.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Position in [`Side::ALL`].
    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::East => 1,
            Side::South => 2,
            Side::West => 3,
        }
    }

    /// Side at `index` modulo 4.
    pub fn from_index(index: usize) -> Side {
        Side::ALL[index % 4]
    }

    /// The side clockwise from this one.
    pub fn next(self) -> Side {
        Side::from_index(self.index() + 1)
    }

    /// The side counterclockwise from this one.
    pub fn previous(self) -> Side {
        Side::from_index(self.index() + 3)
    }

    /// Outward world direction of the wall on this side.
    pub fn outward_normal(self) -> Vec3 {
        match self {
            Side::North => Vec3::y(),
            Side::East => Vec3::x(),
            Side::South => -Vec3::y(),
            Side::West => -Vec3::x(),
        }
    }

    /// Vertex indices of the edge, in edge direction.
    pub fn vertex_indices(self) -> (usize, usize) {
        let i = self.index();
        (i, (i + 1) % 4)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::North => "north",
            Side::East => "east",
            Side::South => "south",
            Side::West => "west",
        };
        f.write_str(name)
    }
}

fn previous_index(i: usize) -> usize {
    (i + 3) % 4
}

fn next_index(i: usize) -> usize {
    (i + 1) % 4
}

/// A four-vertex face. Planarity is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// `v0..v3`, clockwise.
    pub vertices: [Point3; 4],
}

impl Plane {
    /// Build from four clockwise vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, v3: Point3) -> Self {
        Self {
            vertices: [v0, v1, v2, v3],
        }
    }

    /// A `size` square centred on the Z axis, dropped vertically onto the
    /// plane through the origin with normal `normal`.
    ///
    /// The X and Y coordinates of the corners are kept, so the edges stay
    /// aligned with the world walls whatever the tilt.
    ///
    /// # Errors
    ///
    /// [`SheetError::DegenerateProjection`] if the normal is zero or
    /// perpendicular to Z.
    pub fn fitting(size: f64, normal: &Vec3) -> Result<Self> {
        let degenerate = || SheetError::DegenerateProjection { normal: *normal };
        let n = normal.try_normalize(1e-12).ok_or_else(degenerate)?;
        let half = size / 2.0;
        let height = size * 5.0;
        let down = -Vec3::z();
        let corners = [(-half, half), (half, half), (half, -half), (-half, -half)];

        let mut vertices = [Point3::origin(); 4];
        for (vertex, (x, y)) in vertices.iter_mut().zip(corners) {
            *vertex = intersect_line_plane(&Point3::new(x, y, height), &down, &Point3::origin(), &n)
                .ok_or_else(degenerate)?;
        }
        Ok(Self { vertices })
    }

    /// Vertex at `index` modulo 4.
    pub fn vertex(&self, index: usize) -> Point3 {
        self.vertices[index % 4]
    }

    /// Unit normal from `v0, v1, v2`.
    pub fn normal(&self) -> Result<Vec3> {
        normal_from_clockwise_vertices(&self.vertices[0], &self.vertices[1], &self.vertices[2])
            .ok_or_else(|| SheetError::DegenerateEdge("plane vertices are collinear".into()))
    }

    /// Average of the four vertices.
    pub fn centroid(&self) -> Point3 {
        let sum = self
            .vertices
            .iter()
            .fold(Vec3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / 4.0)
    }

    /// The edge on `side`.
    pub fn edge(&self, side: Side) -> PlaneEdge {
        PlaneEdge { plane: *self, side }
    }

    /// All four edges in vertex order.
    pub fn edges(&self) -> [PlaneEdge; 4] {
        Side::ALL.map(|side| self.edge(side))
    }

    /// Every vertex moved by `offset`.
    pub fn offsetted(&self, offset: &Vec3) -> Plane {
        Plane {
            vertices: self.vertices.map(|v| v + offset),
        }
    }

    /// One vertex moved by `offset`.
    pub fn offset_vertex(&self, index: usize, offset: &Vec3) -> Plane {
        let mut vertices = self.vertices;
        vertices[index % 4] += offset;
        Plane { vertices }
    }

    /// Grow (or shrink for negative `amount`) the face across `side`, moving
    /// the edge vertices along their adjacent sides.
    pub fn resized(&self, side: Side, amount: f64) -> Result<Plane> {
        let (i0, i1) = side.vertex_indices();
        let along = |from: usize, away_from: usize| {
            (self.vertices[from] - self.vertices[away_from])
                .try_normalize(1e-12)
                .ok_or_else(|| {
                    SheetError::DegenerateEdge(format!("zero-length side next to {side}"))
                })
        };
        let d0 = along(i0, previous_index(i0))?;
        let d1 = along(i1, next_index(i1))?;
        let mut vertices = self.vertices;
        vertices[i0] += d0 * amount;
        vertices[i1] += d1 * amount;
        Ok(Plane { vertices })
    }

    /// Solid of `thickness` standing on this face.
    pub fn extrude(&self, thickness: f64) -> Result<Sheet> {
        Sheet::extruded_from(*self, thickness)
    }
}

/// One edge of a plane, carrying a copy of the plane for edge-local edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneEdge {
    /// The face the edge belongs to.
    pub plane: Plane,
    /// Which edge.
    pub side: Side,
}

impl PlaneEdge {
    /// Start vertex.
    pub fn vertex0(&self) -> Point3 {
        self.plane.vertices[self.side.vertex_indices().0]
    }

    /// End vertex.
    pub fn vertex1(&self) -> Point3 {
        self.plane.vertices[self.side.vertex_indices().1]
    }

    /// Edge length.
    pub fn length(&self) -> f64 {
        (self.vertex1() - self.vertex0()).norm()
    }

    /// Unit direction from `vertex0` to `vertex1`.
    pub fn direction(&self) -> Result<Vec3> {
        (self.vertex1() - self.vertex0())
            .try_normalize(1e-12)
            .ok_or_else(|| {
                SheetError::DegenerateEdge(format!("{} edge has zero length", self.side))
            })
    }

    /// In-plane outward normal: `plane.normal × direction`.
    pub fn normal(&self) -> Result<Vec3> {
        Ok(self.plane.normal()?.cross(&self.direction()?))
    }

    /// Both edge vertices moved by `offset`.
    pub fn offsetted(&self, offset: &Vec3) -> Plane {
        let (i0, i1) = self.side.vertex_indices();
        self.plane.offset_vertex(i0, offset).offset_vertex(i1, offset)
    }

    /// Both edge vertices moved `amount` along the edge normal.
    pub fn resized_along_normal(&self, amount: f64) -> Result<Plane> {
        Ok(self.offsetted(&(self.normal()? * amount)))
    }

    /// Move the edge `amount` along its normal, then slide each moved vertex
    /// back onto the line of its original adjacent side.
    ///
    /// The adjacent sides keep their direction and change length. Only the
    /// two edge vertices are written, so the four sides can be resized in
    /// sequence.
    ///
    /// # Errors
    ///
    /// [`SheetError::DegenerateEdge`] if an adjacent side has zero length or
    /// runs parallel to this edge.
    pub fn resized_along_sides(&self, amount: f64) -> Result<Plane> {
        let tol = Tolerance::DEFAULT;
        let (i0, i1) = self.side.vertex_indices();
        let (prev, next) = (previous_index(i0), next_index(i1));
        let v = &self.plane.vertices;
        let shift = self.normal()? * amount;

        let slide = |index: usize, anchor: usize| -> Result<Point3> {
            let side = v[index] - v[anchor];
            if tol.is_zero(side.norm()) {
                return Err(SheetError::DegenerateEdge(format!(
                    "side adjacent to the {} edge has zero length",
                    self.side
                )));
            }
            if tol.parallel(&side, &(v[i1] - v[i0])) {
                return Err(SheetError::DegenerateEdge(format!(
                    "side adjacent to the {} edge is parallel to it",
                    self.side
                )));
            }
            let moved = v[index] + shift - v[anchor];
            let along = project_onto(&moved, &side).ok_or_else(|| {
                SheetError::DegenerateEdge(format!("cannot project onto side of {}", self.side))
            })?;
            Ok(v[anchor] + along)
        };

        let mut vertices = *v;
        vertices[i0] = slide(i0, prev)?;
        vertices[i1] = slide(i1, next)?;
        Ok(Plane { vertices })
    }

    /// A new face standing on this edge, extending `amount` along the edge normal.
    pub fn push_pulled_in_normal_direction(&self, amount: f64) -> Result<Plane> {
        let (i0, i1) = self.side.vertex_indices();
        let shift = self.normal()? * amount;
        let mut vertices = [Point3::origin(); 4];
        vertices[previous_index(i0)] = self.vertex0();
        vertices[next_index(i1)] = self.vertex1();
        vertices[i0] = self.vertex0() + shift;
        vertices[i1] = self.vertex1() + shift;
        Ok(Plane { vertices })
    }

    /// A new face standing on this edge whose far edge lies `amount` along
    /// `direction`, squared off to the edge midpoint.
    pub fn push_pulled(&self, amount: f64, direction: &Vec3) -> Result<Plane> {
        let (i0, i1) = self.side.vertex_indices();
        let (a, b) = (self.vertex0(), self.vertex1());
        let mid = sheetfold_math::midpoint(&a, &b);
        let push = direction * amount;
        let onto_push = |p: &Point3| {
            project_onto(&(p - mid), &push).ok_or_else(|| {
                SheetError::DegenerateEdge(format!("zero push-pull on the {} edge", self.side))
            })
        };
        let first = onto_push(&a)?;
        let second = onto_push(&b)?;

        let mut vertices = self.plane.vertices;
        vertices[previous_index(i0)] = a;
        vertices[next_index(i1)] = b;
        vertices[i0] = a + push - first;
        vertices[i1] = b + push - second;
        Ok(Plane { vertices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Plane {
        Plane::fitting(50.0, &Vec3::z()).unwrap()
    }

    fn tilted() -> Plane {
        Plane::fitting(48.0, &Vec3::new(0.2673, 0.1397, 0.9534)).unwrap()
    }

    #[test]
    fn test_fitting_untilted_is_exact_square() {
        let plane = square();
        assert_eq!(
            plane.vertices,
            [
                Point3::new(-25.0, 25.0, 0.0),
                Point3::new(25.0, 25.0, 0.0),
                Point3::new(25.0, -25.0, 0.0),
                Point3::new(-25.0, -25.0, 0.0),
            ]
        );
        assert_abs_diff_eq!(plane.normal().unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_fitting_tilted_keeps_xy() {
        let n = Vec3::new(0.2673, 0.1397, 0.9534).normalize();
        let plane = tilted();
        assert_abs_diff_eq!(plane.vertices[0].x, -24.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.vertices[2].y, -24.0, epsilon = 1e-12);
        for v in &plane.vertices {
            assert_abs_diff_eq!(v.coords.dot(&n), 0.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(plane.normal().unwrap(), n, epsilon = 1e-9);
    }

    #[test]
    fn test_fitting_vertical_normal_is_degenerate() {
        let err = Plane::fitting(50.0, &Vec3::x()).unwrap_err();
        assert!(matches!(err, SheetError::DegenerateProjection { .. }));
        assert!(Plane::fitting(50.0, &Vec3::zeros()).is_err());
    }

    #[test]
    fn test_edge_normals_point_outward() {
        let plane = square();
        for side in Side::ALL {
            let normal = plane.edge(side).normal().unwrap();
            assert_abs_diff_eq!(normal, side.outward_normal(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_resized_along_normal_moves_only_the_edge() {
        let plane = square();
        let moved = plane.edge(Side::North).resized_along_normal(3.0).unwrap();
        assert_eq!(moved.vertices[0], Point3::new(-25.0, 28.0, 0.0));
        assert_eq!(moved.vertices[1], Point3::new(25.0, 28.0, 0.0));
        assert_eq!(moved.vertices[2], plane.vertices[2]);
        assert_eq!(moved.vertices[3], plane.vertices[3]);

        let shrunk = plane.edge(Side::West).resized_along_normal(-5.0).unwrap();
        assert_abs_diff_eq!(shrunk.vertices[0].x, -20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shrunk.vertices[3].x, -20.0, epsilon = 1e-12);
        assert_eq!(shrunk.vertices[1], plane.vertices[1]);
    }

    #[test]
    fn test_side_navigation() {
        assert_eq!(Side::North.next(), Side::East);
        assert_eq!(Side::North.previous(), Side::West);
        assert_eq!(Side::from_index(6), Side::South);
        assert_eq!(Side::West.vertex_indices(), (3, 0));
        assert_eq!(Side::East.to_string(), "east");
    }

    #[test]
    fn test_resized_along_sides_zero_is_noop() {
        let plane = square();
        for side in Side::ALL {
            assert_eq!(plane.edge(side).resized_along_sides(0.0).unwrap(), plane);
        }
        let plane = tilted();
        for side in Side::ALL {
            let resized = plane.edge(side).resized_along_sides(0.0).unwrap();
            for (a, b) in resized.vertices.iter().zip(&plane.vertices) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_resized_along_sides_square() {
        let plane = square().edge(Side::North).resized_along_sides(-2.0).unwrap();
        assert_abs_diff_eq!(plane.vertices[0], Point3::new(-25.0, 23.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(plane.vertices[1], Point3::new(25.0, 23.0, 0.0), epsilon = 1e-12);
        assert_eq!(plane.vertices[2], square().vertices[2]);
    }

    #[test]
    fn test_resized_along_sides_all_four_compound() {
        let mut plane = square();
        for side in Side::ALL {
            plane = plane.edge(side).resized_along_sides(-1.0).unwrap();
        }
        assert_abs_diff_eq!(plane.vertices[0], Point3::new(-24.0, 24.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(plane.vertices[2], Point3::new(24.0, -24.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_resized_along_sides_keeps_side_direction() {
        let plane = tilted();
        let resized = plane.edge(Side::East).resized_along_sides(3.0).unwrap();
        let before = (plane.vertices[1] - plane.vertices[0]).normalize();
        let after = (resized.vertices[1] - resized.vertices[0]).normalize();
        assert_abs_diff_eq!(before, after, epsilon = 1e-12);
        assert!(resized.edge(Side::North).length() > plane.edge(Side::North).length());
    }

    #[test]
    fn test_resized_along_sides_degenerate() {
        let collapsed = Plane::new(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let err = collapsed.edge(Side::North).resized_along_sides(1.0).unwrap_err();
        assert!(matches!(err, SheetError::DegenerateEdge(_)));

        let sliver = Plane::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        );
        assert!(sliver.edge(Side::North).resized_along_sides(1.0).is_err());
    }

    #[test]
    fn test_resized_moves_along_adjacent_sides() {
        let plane = square().resized(Side::East, 5.0).unwrap();
        assert_abs_diff_eq!(plane.vertices[1], Point3::new(30.0, 25.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(plane.vertices[2], Point3::new(30.0, -25.0, 0.0), epsilon = 1e-12);
        assert_eq!(plane.vertices[0], square().vertices[0]);
    }

    #[test]
    fn test_edge_offsetted_moves_only_edge() {
        let plane = square().edge(Side::South).offsetted(&Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(plane.vertices[2], Point3::new(25.0, -24.0, 0.0));
        assert_eq!(plane.vertices[3], Point3::new(-25.0, -24.0, 0.0));
        assert_eq!(plane.vertices[0], square().vertices[0]);
    }

    #[test]
    fn test_push_pulled_in_normal_direction() {
        let flange = square()
            .edge(Side::North)
            .push_pulled_in_normal_direction(10.0)
            .unwrap();
        assert_eq!(flange.vertices[3], Point3::new(-25.0, 25.0, 0.0));
        assert_eq!(flange.vertices[2], Point3::new(25.0, 25.0, 0.0));
        assert_abs_diff_eq!(flange.vertices[0], Point3::new(-25.0, 35.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(flange.normal().unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_push_pulled_squares_to_direction() {
        let flange = square()
            .edge(Side::East)
            .push_pulled(4.0, &Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(flange.vertices[1], Point3::new(29.0, 25.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(flange.vertices[2], Point3::new(29.0, -25.0, 0.0), epsilon = 1e-12);
        assert_eq!(flange.vertices[0], Point3::new(25.0, 25.0, 0.0));
        assert!(square().edge(Side::East).push_pulled(0.0, &Vec3::x()).is_err());
    }
}
