//! Sheet-metal bend formulas.
//!
//! All angles are in radians and measure how far the sheet turns: `0` is
//! flat, `π/2` is a right-angle flange. The free functions are total and
//! grow without bound as the angle approaches `π` (`tan(angle / 2)`
//! diverges); use [`BendSpec::new`] to reject out-of-domain input first.

use std::f64::consts::PI;

use crate::error::{Result, SheetError};

/// Distance from the outside tangent point to the outer mould-line apex.
pub fn outside_setback(angle: f64, radius: f64, thickness: f64) -> f64 {
    (angle / 2.0).tan() * (radius + thickness)
}

/// Distance from the inside tangent point to the inner mould-line apex.
pub fn inside_setback(angle: f64, radius: f64) -> f64 {
    (angle / 2.0).tan() * radius
}

/// Arc length of the neutral axis through the bend.
pub fn bend_allowance(angle: f64, inside_radius: f64, k_factor: f64, thickness: f64) -> f64 {
    angle * (inside_radius + k_factor * thickness)
}

/// Material removed from the sum of the outside flange lengths to get the flat length.
pub fn bend_deduction(angle: f64, inside_radius: f64, k_factor: f64, thickness: f64) -> f64 {
    2.0 * outside_setback(angle, inside_radius, thickness)
        - bend_allowance(angle, inside_radius, k_factor, thickness)
}

/// A validated bend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendSpec {
    /// Bend angle in radians, in `[0, π)`.
    pub angle: f64,
    /// Inside bend radius.
    pub inside_radius: f64,
    /// Material thickness.
    pub thickness: f64,
    /// Neutral axis position as a fraction of the thickness. Not range checked.
    pub k_factor: f64,
}

impl BendSpec {
    /// Validate and build a bend.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::BendOutOfRange`] if the angle is not in `[0, π)`,
    /// the radius is negative or the thickness is not positive.
    pub fn new(angle: f64, inside_radius: f64, thickness: f64, k_factor: f64) -> Result<Self> {
        if !(0.0..PI).contains(&angle) {
            return Err(SheetError::BendOutOfRange(format!(
                "angle {angle} rad is outside [0, π)"
            )));
        }
        if inside_radius.is_nan() || inside_radius < 0.0 {
            return Err(SheetError::BendOutOfRange(format!(
                "inside radius {inside_radius} is negative"
            )));
        }
        if thickness.is_nan() || thickness <= 0.0 {
            return Err(SheetError::BendOutOfRange(format!(
                "thickness {thickness} is not positive"
            )));
        }
        Ok(Self {
            angle,
            inside_radius,
            thickness,
            k_factor,
        })
    }

    /// See [`outside_setback`].
    pub fn outside_setback(&self) -> f64 {
        outside_setback(self.angle, self.inside_radius, self.thickness)
    }

    /// See [`inside_setback`].
    pub fn inside_setback(&self) -> f64 {
        inside_setback(self.angle, self.inside_radius)
    }

    /// See [`bend_allowance`].
    pub fn bend_allowance(&self) -> f64 {
        bend_allowance(self.angle, self.inside_radius, self.k_factor, self.thickness)
    }

    /// See [`bend_deduction`].
    pub fn bend_deduction(&self) -> f64 {
        bend_deduction(self.angle, self.inside_radius, self.k_factor, self.thickness)
    }

    /// Arc length along the inside surface.
    pub fn inside_allowance(&self) -> f64 {
        self.angle * self.inside_radius
    }

    /// Arc length along the outside surface.
    pub fn outside_allowance(&self) -> f64 {
        self.angle * (self.inside_radius + self.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_flat_bend_is_zero() {
        for (r, t, k) in [(0.0, 1.0, 0.44), (1.0, 0.5, 0.0), (3.0, 2.0, 1.0)] {
            assert_eq!(inside_setback(0.0, r), 0.0);
            assert_eq!(outside_setback(0.0, r, t), 0.0);
            assert_eq!(bend_allowance(0.0, r, k, t), 0.0);
            assert_eq!(bend_deduction(0.0, r, k, t), 0.0);
        }
    }

    #[test]
    fn test_right_angle_values() {
        assert_abs_diff_eq!(outside_setback(FRAC_PI_2, 1.0, 1.0), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inside_setback(FRAC_PI_2, 1.0), 1.0, epsilon = 1e-12);
        let ba = bend_allowance(FRAC_PI_2, 1.0, 0.44, 1.0);
        assert_abs_diff_eq!(ba, 1.44 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(bend_deduction(FRAC_PI_2, 1.0, 0.44, 1.0), 4.0 - ba, epsilon = 1e-12);
    }

    #[test]
    fn test_setback_near_half_turn_is_large_but_finite() {
        let angle = PI - 1e-9;
        let ossb = outside_setback(angle, 1.0, 1.0);
        assert!(ossb.is_finite());
        assert!(ossb > 1e8);
    }

    #[test]
    fn test_spec_rejects_out_of_domain() {
        assert!(matches!(
            BendSpec::new(PI, 1.0, 1.0, 0.44),
            Err(SheetError::BendOutOfRange(_))
        ));
        assert!(BendSpec::new(-0.1, 1.0, 1.0, 0.44).is_err());
        assert!(BendSpec::new(1.0, -1.0, 1.0, 0.44).is_err());
        assert!(BendSpec::new(1.0, 1.0, 0.0, 0.44).is_err());
        assert!(BendSpec::new(f64::NAN, 1.0, 1.0, 0.44).is_err());
    }

    #[test]
    fn test_spec_allowances() {
        let spec = BendSpec::new(FRAC_PI_2, 1.0, 1.0, 0.44).unwrap();
        assert_abs_diff_eq!(spec.inside_allowance(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(spec.outside_allowance(), PI, epsilon = 1e-12);
        assert!(spec.inside_allowance() < spec.bend_allowance());
        assert!(spec.bend_allowance() < spec.outside_allowance());
        assert_abs_diff_eq!(spec.inside_setback(), 1.0, epsilon = 1e-12);
    }
}
