//! Extruded sheet solids with a per-side state.
//!
//! ```text
//!        N
//!   v0 ------ v1
//! W |          | E
//!   v3 ------ v2
//!        S
//! ```

use sheetfold_math::{normal_from_clockwise_vertices, Point3, Vec3};

use crate::bend::BendSpec;
use crate::error::{Result, SheetError};
use crate::plane::{Plane, Side};

/// The rectangular end face of a sheet along one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetEdgeFace {
    /// First vertex on the top plane.
    pub top_vertex0: Point3,
    /// Second vertex on the top plane.
    pub top_vertex1: Point3,
    /// First vertex on the bottom plane.
    pub bottom_vertex0: Point3,
    /// Second vertex on the bottom plane.
    pub bottom_vertex1: Point3,
    /// Outward normal, taken from the adjacent bottom side.
    pub face_normal: Vec3,
}

impl SheetEdgeFace {
    /// Distance between the top and bottom planes at `vertex0`.
    pub fn thickness(&self) -> f64 {
        (self.top_vertex0 - self.bottom_vertex0).norm()
    }

    fn unit(v: Vec3, what: &str) -> Result<Vec3> {
        v.try_normalize(1e-12)
            .ok_or_else(|| SheetError::DegenerateEdge(format!("{what} has zero length")))
    }

    /// Unit vector from bottom to top.
    pub fn sheet_normal(&self) -> Result<Vec3> {
        Self::unit(self.top_vertex0 - self.bottom_vertex0, "face thickness")
    }

    /// Unit direction along the top edge.
    pub fn top_edge_direction(&self) -> Result<Vec3> {
        Self::unit(self.top_vertex1 - self.top_vertex0, "top edge")
    }

    /// Unit direction from top to bottom at `vertex0`.
    pub fn side_edge_direction(&self) -> Result<Vec3> {
        Self::unit(self.bottom_vertex0 - self.top_vertex0, "side edge")
    }

    /// Face normal derived from the face's own vertices.
    pub fn computed_face_normal(&self) -> Option<Vec3> {
        normal_from_clockwise_vertices(&self.top_vertex0, &self.top_vertex1, &self.bottom_vertex1)
    }

    /// Corners in outline order.
    pub fn vertices(&self) -> [Point3; 4] {
        [
            self.top_vertex0,
            self.top_vertex1,
            self.bottom_vertex1,
            self.bottom_vertex0,
        ]
    }

    /// Average of the corners.
    pub fn center(&self) -> Point3 {
        let sum = self
            .vertices()
            .iter()
            .fold(Vec3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / 4.0)
    }
}

/// A bend attached to one face of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Bend {
    /// Face the bend starts from.
    pub from_face: SheetEdgeFace,
    /// Validated bend parameters. Thickness comes from the face.
    pub spec: BendSpec,
    /// What follows the bend.
    pub edge: SheetEdge,
}

impl Bend {
    /// A bend from `face`, ending in a solid edge.
    pub fn new(face: SheetEdgeFace, angle: f64, radius: f64, k_factor: f64) -> Result<Self> {
        Ok(Self {
            from_face: face,
            spec: BendSpec::new(angle, radius, face.thickness(), k_factor)?,
            edge: SheetEdge::Solid,
        })
    }

    /// Material thickness.
    pub fn thickness(&self) -> f64 {
        self.spec.thickness
    }

    /// Replace what follows the bend.
    pub fn with_edge(mut self, edge: SheetEdge) -> Self {
        self.edge = edge;
        self
    }
}

/// State of one side of a sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SheetEdge {
    /// Plain cut edge.
    #[default]
    Solid,
    /// Bent flange.
    Bend(Box<Bend>),
    /// Another sheet continuing from this side.
    Extrusion(Box<Sheet>),
}

/// A top and bottom plane `thickness` apart, with a state per side.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Upper face.
    pub top: Plane,
    /// Lower face.
    pub bottom: Plane,
    /// Distance between the faces.
    pub thickness: f64,
    /// `v0 -> v1` side.
    pub north: SheetEdge,
    /// `v1 -> v2` side.
    pub east: SheetEdge,
    /// `v2 -> v3` side.
    pub south: SheetEdge,
    /// `v3 -> v0` side.
    pub west: SheetEdge,
}

impl Sheet {
    /// A solid sheet whose top is `bottom` moved `thickness` along its normal.
    pub fn extruded_from(bottom: Plane, thickness: f64) -> Result<Self> {
        let top = bottom.offsetted(&(bottom.normal()? * thickness));
        Ok(Self {
            top,
            bottom,
            thickness,
            north: SheetEdge::Solid,
            east: SheetEdge::Solid,
            south: SheetEdge::Solid,
            west: SheetEdge::Solid,
        })
    }

    /// Normal of the top face.
    pub fn normal(&self) -> Result<Vec3> {
        self.top.normal()
    }

    /// State of `side`.
    pub fn side(&self, side: Side) -> &SheetEdge {
        match side {
            Side::North => &self.north,
            Side::East => &self.east,
            Side::South => &self.south,
            Side::West => &self.west,
        }
    }

    fn with_side(mut self, side: Side, edge: SheetEdge) -> Self {
        match side {
            Side::North => self.north = edge,
            Side::East => self.east = edge,
            Side::South => self.south = edge,
            Side::West => self.west = edge,
        }
        self
    }

    /// The end face on `side`, walked counterclockwise around the sheet.
    pub fn face(&self, side: Side) -> Result<SheetEdgeFace> {
        let (t, b) = (&self.top.vertices, &self.bottom.vertices);
        // (vertex0, vertex1) of the face, then the side whose direction is the face normal
        let (i0, i1, normal_from, normal_to) = match side {
            Side::North => (1, 0, 3, 0),
            Side::East => (2, 1, 0, 1),
            Side::South => (3, 2, 0, 3),
            Side::West => (0, 3, 1, 0),
        };
        let face_normal = (b[normal_to] - b[normal_from])
            .try_normalize(1e-12)
            .ok_or_else(|| SheetError::DegenerateEdge(format!("{side} face has no width")))?;
        Ok(SheetEdgeFace {
            top_vertex0: t[i0],
            top_vertex1: t[i1],
            bottom_vertex0: b[i0],
            bottom_vertex1: b[i1],
            face_normal,
        })
    }

    /// A fresh solid sheet with `side` pushed `amount` along its face normal.
    pub fn extruded(&self, side: Side, amount: f64) -> Result<Sheet> {
        let shift = self.face(side)?.face_normal * amount;
        let bottom = self.bottom.edge(side).offsetted(&shift);
        Sheet::extruded_from(bottom, self.thickness)
    }

    /// This sheet with `side` bent.
    pub fn with_bend(self, side: Side, bend: Bend) -> Sheet {
        self.with_side(side, SheetEdge::Bend(Box::new(bend)))
    }

    /// This sheet with another sheet continuing from `side`.
    pub fn with_extrusion(self, side: Side, sheet: Sheet) -> Sheet {
        self.with_side(side, SheetEdge::Extrusion(Box::new(sheet)))
    }
}
