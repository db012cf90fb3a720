//! Seven-segment stroke labels.
//!
//! Glyphs are open strokes meant to be engraved or scored, so a panel cut
//! from a batch can be identified after bending.

use log::warn;
use sheetfold_drafting::{line, Shape};
use sheetfold_math::{Point3, Vec3};

/// Glyph width as a fraction of its height.
const GLYPH_ASPECT: f64 = 0.5;

/// Segment endpoints in glyph units: x across `[0, 1]`, y down `[0, 1]`.
const SEGMENTS: [((f64, f64), (f64, f64)); 7] = [
    ((0.0, 0.0), (1.0, 0.0)), // a: top
    ((1.0, 0.0), (1.0, 0.5)), // b: upper right
    ((1.0, 0.5), (1.0, 1.0)), // c: lower right
    ((0.0, 1.0), (1.0, 1.0)), // d: bottom
    ((0.0, 0.5), (0.0, 1.0)), // e: lower left
    ((0.0, 0.0), (0.0, 0.5)), // f: upper left
    ((0.0, 0.5), (1.0, 0.5)), // g: middle
];

fn segments_for(c: char) -> Option<&'static [usize]> {
    let lit: &'static [usize] = match c {
        '0' => &[0, 1, 2, 3, 4, 5],
        '1' => &[1, 2],
        '2' => &[0, 1, 6, 4, 3],
        '3' => &[0, 1, 6, 2, 3],
        '4' => &[5, 6, 1, 2],
        '5' => &[0, 5, 6, 2, 3],
        '6' => &[0, 5, 6, 4, 2, 3],
        '7' => &[0, 1, 2],
        '8' => &[0, 1, 2, 3, 4, 5, 6],
        '9' => &[0, 1, 2, 3, 5, 6],
        '-' => &[6],
        ' ' | '.' => &[],
        _ => return None,
    };
    Some(lit)
}

/// Width of `text` laid out with [`label_shapes`].
pub fn label_width(text: &str, scale: f64, spacing: f64) -> f64 {
    text.chars().count() as f64 * scale * spacing
}

/// Strokes spelling `text`, starting at `top_corner`.
///
/// Characters advance by `scale * spacing` along `side_dir`; glyphs are
/// `scale` tall along `down_dir`. Digits, space, `.` and `-` are supported.
/// Anything else is left blank.
pub fn label_shapes(
    text: &str,
    top_corner: Point3,
    side_dir: Vec3,
    down_dir: Vec3,
    scale: f64,
    spacing: f64,
) -> Vec<Shape> {
    let width = scale * GLYPH_ASPECT;
    let advance = scale * spacing;
    let at = |origin: Point3, (x, y): (f64, f64)| {
        origin + side_dir * (x * width) + down_dir * (y * scale)
    };

    let mut shapes = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let origin = top_corner + side_dir * (advance * i as f64);
        let Some(lit) = segments_for(c) else {
            warn!("no glyph for {c:?} in label {text:?}");
            continue;
        };
        for &segment in lit {
            let (from, to) = SEGMENTS[segment];
            shapes.extend(line(at(origin, from), at(origin, to)));
        }
        if c == '.' {
            let dot = scale * 0.1;
            let centre = at(origin, (0.5, 1.0)) - down_dir * dot;
            shapes.extend(line(centre - side_dir * (dot / 2.0), centre + side_dir * (dot / 2.0)));
        }
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sheetfold_drafting::Drawing;

    fn strokes(text: &str) -> Vec<Shape> {
        label_shapes(text, Point3::origin(), Vec3::x(), -Vec3::y(), 5.0, 0.8)
    }

    #[test]
    fn test_segment_counts() {
        // two shapes per stroke
        assert_eq!(strokes("8").len(), 14);
        assert_eq!(strokes("1").len(), 4);
        assert_eq!(strokes("-").len(), 2);
        assert_eq!(strokes(" ").len(), 0);
        assert_eq!(strokes(".").len(), 2);
    }

    #[test]
    fn test_layout_advances() {
        let drawing = Drawing {
            shapes: strokes("000 001"),
        };
        let bounds = drawing.bounds();
        assert_abs_diff_eq!(bounds.min_x, 0.0);
        // last glyph starts at 6 advances and is half a scale wide
        assert_abs_diff_eq!(bounds.max_x, 6.0 * 4.0 + 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(bounds.min_y, -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(label_width("000 001", 5.0, 0.8), 28.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_characters_are_blank() {
        assert_eq!(strokes("a1").len(), strokes(" 1").len());
    }
}
