//! Core types for 2D drafting output: points, styles, views and projected edges.

use serde::{Deserialize, Serialize};
use sheetfold_math::{Point3, Vec3};

/// A 2D point for serializable drafting output.
///
/// Kept separate from nalgebra's `Point2` so records serialize as plain
/// `{ "x": .., "y": .. }` objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Drop the Z coordinate of a 3D point.
    pub fn from_xy(p: &Point3) -> Self {
        Self { x: p.x, y: p.y }
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<sheetfold_math::Point2> for Point2D {
    fn from(p: sheetfold_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Stroke color of a path. Cutters map colors to operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Through cut.
    Black,
    /// Folded reference geometry and bend relief tabs.
    Red,
    /// Neutral axis annotations.
    Green,
    /// Unfolded reference geometry.
    Blue,
    /// Bend axes.
    Pink,
    /// Construction radii.
    Gray,
}

/// Stroke pattern of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Short dashes, used for construction geometry.
    Dashed,
    /// Long dash with gap, used for bend lines.
    BendDash,
    /// Even dash pattern, used for reference outlines.
    RegularDash,
}

/// Presentation attributes of a group.
///
/// Unset fields inherit from the enclosing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    /// Stroke color.
    pub color: Option<Color>,
    /// Stroke pattern.
    pub line_style: Option<LineStyle>,
}

impl Style {
    /// A style setting only the color.
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            line_style: None,
        }
    }

    /// A style setting only the line style.
    pub fn line_style(line_style: LineStyle) -> Self {
        Self {
            color: None,
            line_style: Some(line_style),
        }
    }

    /// This style with unset fields taken from `parent`.
    pub fn over(self, parent: Style) -> Style {
        Style {
            color: self.color.or(parent.color),
            line_style: self.line_style.or(parent.line_style),
        }
    }
}

/// Direction for orthographic or isometric projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ViewDirection {
    /// Looking down the -Z axis, +Y up. The flat pattern's native view.
    #[default]
    Top,
    /// Looking along +Y, +Z up.
    Front,
    /// Looking along -X, +Z up.
    Right,
    /// Oblique view with azimuth and elevation angles in radians.
    Isometric {
        /// Rotation around the Z axis.
        azimuth: f64,
        /// Angle above the XY plane.
        elevation: f64,
    },
}

impl ViewDirection {
    /// 30° azimuth, 30° elevation.
    pub const ISOMETRIC_STANDARD: Self = Self::Isometric {
        azimuth: std::f64::consts::FRAC_PI_6,
        elevation: std::f64::consts::FRAC_PI_6,
    };

    /// Unit vector pointing from the viewer toward the model.
    pub fn view_vector(&self) -> Vec3 {
        match self {
            ViewDirection::Top => Vec3::new(0.0, 0.0, -1.0),
            ViewDirection::Front => Vec3::new(0.0, 1.0, 0.0),
            ViewDirection::Right => Vec3::new(-1.0, 0.0, 0.0),
            ViewDirection::Isometric { azimuth, elevation } => {
                let (sin_el, cos_el) = elevation.sin_cos();
                let (sin_az, cos_az) = azimuth.sin_cos();
                Vec3::new(cos_el * sin_az, cos_el * cos_az, -sin_el)
            }
        }
    }

    /// Up vector used to orient the 2D projection.
    pub fn up_vector(&self) -> Vec3 {
        match self {
            ViewDirection::Top => Vec3::new(0.0, 1.0, 0.0),
            _ => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Manufacturing meaning of a projected edge, derived from its line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Outline to be cut.
    Cut,
    /// Bend line to be scored or marked.
    Bend,
    /// Reference geometry, not manufactured.
    Construction,
}

impl From<Option<LineStyle>> for EdgeKind {
    fn from(style: Option<LineStyle>) -> Self {
        match style {
            None | Some(LineStyle::Solid) => EdgeKind::Cut,
            Some(LineStyle::BendDash) => EdgeKind::Bend,
            Some(LineStyle::Dashed) | Some(LineStyle::RegularDash) => EdgeKind::Construction,
        }
    }
}

/// A 2D projected edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedEdge {
    /// Start point in 2D view coordinates.
    pub start: Point2D,
    /// End point in 2D view coordinates.
    pub end: Point2D,
    /// What the edge is for.
    pub kind: EdgeKind,
    /// Stroke color, if any was set.
    pub color: Option<Color>,
    /// Depth of the edge midpoint along the view vector.
    pub depth: f64,
}

impl ProjectedEdge {
    /// Length of the edge in view coordinates.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Expand the bounding box to include another box.
    pub fn union(&mut self, other: &BoundingBox2D) {
        if other.is_valid() {
            self.include_point(Point2D::new(other.min_x, other.min_y));
            self.include_point(Point2D::new(other.max_x, other.max_y));
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// A drawing flattened into 2D edges for one view direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedView {
    /// All projected edges, arcs already tessellated.
    pub edges: Vec<ProjectedEdge>,
    /// 2D bounding box of the projected view.
    pub bounds: BoundingBox2D,
    /// View direction used for this projection.
    pub view_direction: ViewDirection,
}

impl ProjectedView {
    /// Create a new empty projected view.
    pub fn new(view_direction: ViewDirection) -> Self {
        Self {
            edges: Vec::new(),
            bounds: BoundingBox2D::empty(),
            view_direction,
        }
    }

    /// Add an edge and update the bounding box.
    pub fn add_edge(&mut self, edge: ProjectedEdge) {
        self.bounds.include_point(edge.start);
        self.bounds.include_point(edge.end);
        self.edges.push(edge);
    }

    /// Edges of one kind.
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &ProjectedEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Total length of the edges of one kind.
    pub fn total_length(&self, kind: EdgeKind) -> f64 {
        self.edges_of(kind).map(ProjectedEdge::length).sum()
    }
}
