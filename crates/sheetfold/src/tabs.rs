//! Tab, slot and relief profiles along flat-pattern edges.
//!
//! Every generator works in the XY plane of the flat pattern. An
//! [`EdgeFrame`] fixes the direction along the edge and the perpendicular
//! `ẑ × dir`, which points out of the wall for edges walked with the wall
//! interior on the right.
//!
//! ```text
//!                  _________
//!                 /         \          <- key rounding
//!   start ___  _ |           | _  ___ end
//!            |_|             |_|       <- root reliefs
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use sheetfold_drafting::{line, orbit, Shape};
use sheetfold_math::{midpoint, rotation_about_axis, Point3, Vec3};

use crate::params::BoxParams;

/// A straight edge with its in-plane frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFrame {
    /// First point.
    pub start: Point3,
    /// Last point.
    pub end: Point3,
    /// Unit direction from `start` to `end`.
    pub dir: Vec3,
    /// `ẑ × dir`.
    pub perp: Vec3,
}

impl EdgeFrame {
    /// Frame of the edge `start -> end`, or `None` if the edge has no length.
    pub fn new(start: Point3, end: Point3) -> Option<Self> {
        let dir = (end - start).try_normalize(1e-12)?;
        Some(Self {
            start,
            end,
            dir,
            perp: Vec3::z().cross(&dir),
        })
    }

    /// Edge length.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Point `along` from `start`, offset `out` along the perpendicular.
    pub fn at(&self, along: f64, out: f64) -> Point3 {
        self.start + self.dir * along + self.perp * out
    }

    /// Start and end of a centred span of `width`, shifted by half the corner
    /// `gap` so it sits in the middle of the wall once the shortened end is
    /// accounted for.
    pub fn centred_span(&self, width: f64, gap: f64) -> (Point3, Point3) {
        let centre = self.length() / 2.0 + gap / 2.0;
        (self.at(centre - width / 2.0, 0.0), self.at(centre + width / 2.0, 0.0))
    }
}

/// The keyed fastener tooth of the north and south walls.
///
/// Runs from `frame.start` to `frame.end`. The tooth stands
/// `thickness + fastener_extra_height` out of the edge between the span
/// returned by [`EdgeFrame::centred_span`] for the fastener width, with a
/// semicircular relief cut at each root.
pub fn fastener_tab(frame: &EdgeFrame, params: &BoxParams) -> Vec<Shape> {
    let tabs = params.tabs();
    let (d, p) = (frame.dir, frame.perp);
    let (fs, fe) = frame.centred_span(params.fastener_width, params.corner_gap());
    let rr = tabs.relief_radius;
    let rd = tabs.relief_depth;
    let kr = tabs.key_rounding_radius;
    let height = params.thickness + tabs.fastener_extra_height;

    vec![
        Shape::move_to(frame.start),
        Shape::line_to(fs - d * (rr * 2.0)),
        Shape::line_to(fs - d * (rr * 2.0) - p * rd),
        Shape::arc(fs - d * rr - p * rd, fs - d * (rr * 2.0) - p * rd, PI, Vec3::z()),
        Shape::line_to(fs),
        Shape::line_to(fs + p * height),
        Shape::arc(fs + p * height + d * kr, fs + p * height, FRAC_PI_2, -Vec3::z()),
        Shape::line_to(fe + p * (height + kr) - d * kr),
        Shape::arc(
            fe + p * height - d * kr,
            fe + p * (height + kr) - d * kr,
            FRAC_PI_2,
            -Vec3::z(),
        ),
        Shape::line_to(fe),
        Shape::line_to(fe - p * rd),
        Shape::arc(fe + d * rr - p * rd, fe - p * rd, PI, Vec3::z()),
        Shape::line_to(fe + d * (rr * 2.0)),
        Shape::line_to(frame.end),
    ]
}

/// The slot through a fastener tooth that takes the clip under the base plate.
pub fn fastener_slot(frame: &EdgeFrame, params: &BoxParams) -> Vec<Shape> {
    let tabs = params.tabs();
    let (d, p) = (frame.dir, frame.perp);
    let (fs, fe) = frame.centred_span(params.fastener_width, params.corner_gap());
    let reach = params.bottom_plate_thickness / 2.0 + tabs.tooth_clearance;
    let mid = midpoint(&fs, &fe) + p * reach;
    let half = tabs.fastener_hole_width / 2.0 + tabs.tooth_clearance;
    relieved_slot(
        mid - d * half,
        mid + d * half,
        -p * reach,
        tabs.relief_depth,
        tabs.relief_radius,
    )
}

/// The hook tab of the east and west walls.
///
/// The hook rises `bottom_plate_thickness + hook_into_slot` out of the edge
/// and reaches back towards `start` by `hook_depth`, so it drops through its
/// base plate slot and locks when the box slides along the wall.
/// `mirrored` turns the profile end for end about the middle of the edge and
/// shifts it back by the corner gap, which gives the east wall the same hook
/// as the west wall seen from the other side.
pub fn hook_tab(frame: &EdgeFrame, params: &BoxParams, mirrored: bool) -> Vec<Shape> {
    let tabs = params.tabs();
    let (d, p) = (frame.dir, frame.perp);
    let gap = params.corner_gap();
    let shift = if mirrored { -d * gap } else { Vec3::zeros() };
    let (fs, fe) = frame.centred_span(tabs.hook_width, gap);
    let (fs, fe) = (fs + shift, fe + shift);
    let rr = tabs.relief_radius;
    let rd = tabs.relief_depth;
    let kr = tabs.key_rounding_radius;
    let hd = tabs.hook_depth;
    let rise = params.bottom_plate_thickness + tabs.hook_into_slot;

    let shapes = vec![
        Shape::move_to(frame.start),
        Shape::line_to(fs + d * rr),
        Shape::line_to(fs + d * (hd - rr * 2.0)),
        Shape::line_to(fs + d * (hd - rr * 2.0) - p * rd),
        Shape::arc(fs + d * (hd - rr) - p * rd, fs + d * (hd - rr * 2.0) - p * rd, PI, Vec3::z()),
        Shape::line_to(fs + p * (rise - kr) + d * hd),
        Shape::arc(
            fs + p * (rise - kr) + d * (hd + kr),
            fs + p * (rise - kr) + d * hd,
            FRAC_PI_2,
            -Vec3::z(),
        ),
        Shape::line_to(fe + p * rise - d * kr),
        Shape::arc(fe + p * (rise - kr) - d * kr, fe + p * rise - d * kr, FRAC_PI_2, -Vec3::z()),
        Shape::line_to(fe),
        Shape::line_to(fe - p * rd),
        Shape::arc(fe + d * rr - p * rd, fe - p * rd, PI, Vec3::z()),
        Shape::line_to(fe + d * (rr * 2.0)),
        Shape::line_to(frame.end),
    ];

    if !mirrored {
        return shapes;
    }
    let centre = midpoint(&frame.start, &frame.end);
    match rotation_about_axis(&p, PI) {
        Some(flip) => shapes.iter().map(|s| s.rotated_about(&centre, &flip)).collect(),
        None => shapes,
    }
}

/// A closed slot from `start` to `end`, `width` wide in the direction of the
/// `width` vector, lengthened by `depth` at both ends with corners rounded
/// to `radius` so a square tab seats fully.
///
/// The radius is clamped to half the slot width.
pub fn relieved_slot(
    start: Point3,
    end: Point3,
    width: Vec3,
    depth: f64,
    radius: f64,
) -> Vec<Shape> {
    let Some(a) = (end - start).try_normalize(1e-12) else {
        return Vec::new();
    };
    let Some(w) = width.try_normalize(1e-12) else {
        return line(start, end);
    };
    let r = radius.min(width.norm() / 2.0).max(0.0);
    let axis = a.cross(&w);
    let s0 = start - a * depth;
    let e0 = end + a * depth;

    vec![
        Shape::move_to(s0 + a * r),
        Shape::line_to(e0 - a * r),
        Shape::arc(e0 - a * r + w * r, e0 - a * r, FRAC_PI_2, axis),
        Shape::line_to(e0 + width - w * r),
        Shape::arc(e0 + width - w * r - a * r, e0 + width - w * r, FRAC_PI_2, axis),
        Shape::line_to(s0 + width + a * r),
        Shape::arc(s0 + width + a * r - w * r, s0 + width + a * r, FRAC_PI_2, axis),
        Shape::line_to(s0 + w * r),
        Shape::arc(s0 + a * r + w * r, s0 + w * r, FRAC_PI_2, axis),
    ]
}

/// Perforation of a bend zone.
///
/// `lid0`/`lid1` are the neutral bend tangent points on the lid side and
/// `wall0`/`wall1` the matching points on the wall side. The strip between
/// them gets a semicircular relief at each end and two slots with round
/// ends, leaving bridges of `bridge` at both ends and in the middle.
pub fn bend_relief(
    lid0: Point3,
    lid1: Point3,
    wall0: Point3,
    wall1: Point3,
    bridge: f64,
) -> Vec<Shape> {
    let half = (wall0 - lid0) * 0.5;
    let radius = half.norm();
    let Some(right) = (lid1 - lid0).try_normalize(1e-12) else {
        return Vec::new();
    };
    let c0 = lid0 + half;
    let c1 = lid1 + half;
    let mid = midpoint(&lid0, &lid1) + half;
    let outer = right * (bridge + radius * 2.0);
    let inner = right * (bridge / 2.0 + radius);

    let mut shapes = Vec::new();
    // corner reliefs
    shapes.extend(orbit(c0, wall0, PI, -Vec3::z()));
    shapes.extend(orbit(c1, wall1, PI, Vec3::z()));

    // first slot
    shapes.extend(orbit(c0 + outer, c0 + half + outer, PI, Vec3::z()));
    shapes.extend(line(c0 + half + outer, mid + half - inner));
    shapes.extend(line(c0 - half + outer, mid - half - inner));
    shapes.extend(orbit(mid - inner, mid + half - inner, PI, -Vec3::z()));

    // second slot
    shapes.extend(orbit(mid + inner, mid + half + inner, PI, Vec3::z()));
    shapes.extend(line(mid + half + inner, c1 + half - outer));
    shapes.extend(line(mid - half + inner, c1 - half - outer));
    shapes.extend(orbit(c1 - outer, c1 + half - outer, PI, -Vec3::z()));
    shapes
}
