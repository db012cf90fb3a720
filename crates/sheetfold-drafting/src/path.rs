//! Path primitives and styled groups.
//!
//! Geometry is built as a tree of [`Shape`]s: path segments interleaved with
//! [`Group`]s carrying a [`Style`] and a `hidden` flag. A [`Drawing`] owns the
//! tree and streams it lazily as [`Primitive`]s, resolving inherited styles
//! and skipping hidden subtrees.

use serde::Serialize;
use sheetfold_math::{rotate_about_pivot, rotation_about_axis, Point3, Rotation, Vec3};

use crate::types::{BoundingBox2D, Color, LineStyle, Point2D, Style};

/// Arc resolution used when an arc has to be approximated by points.
const ARC_STEP: f64 = std::f64::consts::PI / 16.0;

/// Upper bound on chords derived from the sweep alone.
const MAX_ARC_SEGMENTS: usize = 4096;

/// An arc sweeping `from` by `angle` radians about `axis` through `pivot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    /// Center of rotation.
    pub pivot: Point3,
    /// Start point.
    pub from: Point3,
    /// Sweep in radians, right-handed about `axis`.
    pub angle: f64,
    /// Rotation axis.
    pub axis: Vec3,
}

impl ArcSegment {
    /// Create a new arc.
    pub fn new(pivot: Point3, from: Point3, angle: f64, axis: Vec3) -> Self {
        Self {
            pivot,
            from,
            angle,
            axis,
        }
    }

    /// Distance from the pivot to the start point.
    pub fn radius(&self) -> f64 {
        (self.from - self.pivot).norm()
    }

    /// Point at fraction `t` of the sweep. A zero axis leaves the start point in place.
    pub fn point_at(&self, t: f64) -> Point3 {
        match rotation_about_axis(&self.axis, self.angle * t) {
            Some(rotation) => rotate_about_pivot(&self.from, &rotation, &self.pivot),
            None => self.from,
        }
    }

    /// End point of the sweep.
    pub fn end(&self) -> Point3 {
        self.point_at(1.0)
    }

    /// Start, end and evenly spaced points in between, at least `min_segments` chords.
    ///
    /// A sweep that is not finite yields the start point alone.
    pub fn sample(&self, min_segments: usize) -> Vec<Point3> {
        if !self.angle.is_finite() {
            return vec![self.from];
        }
        let by_angle = ((self.angle.abs() / ARC_STEP).ceil() as usize).min(MAX_ARC_SEGMENTS);
        let segments = by_angle.max(min_segments).max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Signed sweep as seen from +Z (counterclockwise positive).
    pub fn planar_sweep(&self) -> f64 {
        if self.axis.z < 0.0 {
            -self.angle
        } else {
            self.angle
        }
    }
}

/// One drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Lift the pen and move to a point.
    MoveTo(Point3),
    /// Straight stroke to a point.
    LineTo(Point3),
    /// Circular stroke.
    Arc(ArcSegment),
}

impl PathSegment {
    /// Where the pen rests after this segment.
    pub fn end_point(&self) -> Point3 {
        match self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => *p,
            PathSegment::Arc(arc) => arc.end(),
        }
    }

    fn map(&self, point: &dyn Fn(&Point3) -> Point3, vector: &dyn Fn(&Vec3) -> Vec3) -> Self {
        match self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(point(p)),
            PathSegment::LineTo(p) => PathSegment::LineTo(point(p)),
            PathSegment::Arc(arc) => PathSegment::Arc(ArcSegment {
                pivot: point(&arc.pivot),
                from: point(&arc.from),
                angle: arc.angle,
                axis: vector(&arc.axis),
            }),
        }
    }
}

/// A styled, optionally hidden list of shapes.
///
/// Hidden groups are still built, so layout computed inside them stays
/// available, but they never reach the primitive stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Style applied to every descendant that does not override it.
    pub style: Style,
    /// Whether the subtree is left out of the output.
    pub hidden: bool,
    /// Member shapes in drawing order.
    pub children: Vec<Shape>,
}

impl Group {
    /// A visible, unstyled group.
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            style: Style::default(),
            hidden: false,
            children,
        }
    }

    /// Set the stroke color.
    pub fn color(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    /// Set the stroke pattern.
    pub fn line_style(mut self, line_style: LineStyle) -> Self {
        self.style.line_style = Some(line_style);
        self
    }

    /// Set the hidden flag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl From<Group> for Shape {
    fn from(group: Group) -> Self {
        Shape::Group(group)
    }
}

/// A node of the drawing tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single drawing command.
    Segment(PathSegment),
    /// A nested group.
    Group(Group),
}

impl Shape {
    /// `MoveTo` command.
    pub fn move_to(p: Point3) -> Self {
        Shape::Segment(PathSegment::MoveTo(p))
    }

    /// `LineTo` command.
    pub fn line_to(p: Point3) -> Self {
        Shape::Segment(PathSegment::LineTo(p))
    }

    /// Arc command continuing from the current pen position.
    pub fn arc(pivot: Point3, from: Point3, angle: f64, axis: Vec3) -> Self {
        Shape::Segment(PathSegment::Arc(ArcSegment::new(pivot, from, angle, axis)))
    }

    /// Apply a point map and a matching vector map to every segment.
    pub fn transformed(
        &self,
        point: &dyn Fn(&Point3) -> Point3,
        vector: &dyn Fn(&Vec3) -> Vec3,
    ) -> Shape {
        match self {
            Shape::Segment(segment) => Shape::Segment(segment.map(point, vector)),
            Shape::Group(group) => Shape::Group(Group {
                style: group.style,
                hidden: group.hidden,
                children: group
                    .children
                    .iter()
                    .map(|child| child.transformed(point, vector))
                    .collect(),
            }),
        }
    }

    /// Translate by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Shape {
        self.transformed(&|p| p + offset, &|v| *v)
    }

    /// Rotate by `rotation` about `pivot`.
    pub fn rotated_about(&self, pivot: &Point3, rotation: &Rotation) -> Shape {
        self.transformed(&|p| rotate_about_pivot(p, rotation, pivot), &|v| rotation * v)
    }
}

/// A straight stroke as its own sub-path.
pub fn line(from: Point3, to: Point3) -> Vec<Shape> {
    vec![Shape::move_to(from), Shape::line_to(to)]
}

/// An open polyline through `points`.
pub fn polyline(points: &[Point3]) -> Vec<Shape> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                Shape::move_to(*p)
            } else {
                Shape::line_to(*p)
            }
        })
        .collect()
}

/// A closed polygon through `points`.
pub fn polygon(points: &[Point3]) -> Vec<Shape> {
    let mut shapes = polyline(points);
    if let Some(first) = points.first() {
        shapes.push(Shape::line_to(*first));
    }
    shapes
}

/// An arc as its own sub-path, starting at `from`.
pub fn orbit(pivot: Point3, from: Point3, angle: f64, axis: Vec3) -> Vec<Shape> {
    vec![Shape::move_to(from), Shape::arc(pivot, from, angle, axis)]
}

/// A drawing command with its resolved style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    /// The command.
    pub segment: PathSegment,
    /// Style inherited from the enclosing groups.
    pub style: Style,
}

/// Geometry part of a [`FlatRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FlatOp {
    /// Pen move.
    MoveTo {
        /// Target.
        to: Point2D,
    },
    /// Straight stroke.
    LineTo {
        /// Target.
        to: Point2D,
    },
    /// Circular stroke.
    Arc {
        /// Arc center.
        center: Point2D,
        /// Start point.
        from: Point2D,
        /// End point.
        to: Point2D,
        /// Counterclockwise sweep in radians.
        sweep: f64,
    },
}

/// A primitive flattened onto the XY plane for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    /// Geometry.
    #[serde(flatten)]
    pub op: FlatOp,
    /// Stroke color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Stroke pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

impl Primitive {
    /// Flatten onto the XY plane.
    pub fn to_record(&self) -> FlatRecord {
        let op = match &self.segment {
            PathSegment::MoveTo(p) => FlatOp::MoveTo {
                to: Point2D::from_xy(p),
            },
            PathSegment::LineTo(p) => FlatOp::LineTo {
                to: Point2D::from_xy(p),
            },
            PathSegment::Arc(arc) => FlatOp::Arc {
                center: Point2D::from_xy(&arc.pivot),
                from: Point2D::from_xy(&arc.from),
                to: Point2D::from_xy(&arc.end()),
                sweep: arc.planar_sweep(),
            },
        };
        FlatRecord {
            op,
            color: self.style.color,
            line_style: self.style.line_style,
        }
    }
}

/// A complete drawing tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    /// Top-level shapes in drawing order.
    pub shapes: Vec<Shape>,
}

impl Drawing {
    /// An empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape.
    pub fn push(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    /// Visible primitives in drawing order, with inherited styles resolved.
    pub fn primitives(&self) -> Primitives<'_> {
        Primitives {
            stack: vec![(self.shapes.iter(), Style::default())],
        }
    }

    /// Visible primitives flattened onto the XY plane.
    pub fn records(&self) -> Vec<FlatRecord> {
        self.primitives().map(|p| p.to_record()).collect()
    }

    /// XY bounds of every visible primitive, arcs sampled.
    pub fn bounds(&self) -> BoundingBox2D {
        let mut bounds = BoundingBox2D::empty();
        for primitive in self.primitives() {
            match &primitive.segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                    bounds.include_point(Point2D::from_xy(p))
                }
                PathSegment::Arc(arc) => {
                    for p in arc.sample(4) {
                        bounds.include_point(Point2D::from_xy(&p));
                    }
                }
            }
        }
        bounds
    }
}

/// Lazy depth-first walk over a [`Drawing`]. See [`Drawing::primitives`].
pub struct Primitives<'a> {
    stack: Vec<(std::slice::Iter<'a, Shape>, Style)>,
}

impl Iterator for Primitives<'_> {
    type Item = Primitive;

    fn next(&mut self) -> Option<Primitive> {
        loop {
            let (iter, style) = self.stack.last_mut()?;
            let style = *style;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some(Shape::Segment(segment)) => {
                    return Some(Primitive {
                        segment: *segment,
                        style,
                    })
                }
                Some(Shape::Group(group)) => {
                    if !group.hidden {
                        self.stack
                            .push((group.children.iter(), group.style.over(style)));
                    }
                }
            }
        }
    }
}
