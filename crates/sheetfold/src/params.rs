//! Build parameters.
//!
//! [`BoxParams`] is a plain value snapshot: every build copies it and reads
//! it without mutation. All lengths are millimetres and the two tilt angles
//! are degrees.

use serde::{Deserialize, Serialize};
use sheetfold_math::{rotation_about_axis, Vec3};

use crate::error::{Result, UnfoldError};

/// Which renderings of the walls reach the primitive stream.
///
/// Hidden renderings are still computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// As-folded 3D corner stacks, red.
    pub folded: bool,
    /// Unfolded net still coplanar with the tilted lid, blue.
    pub top_aligned: bool,
    /// The cut pattern laid flat in XY, black.
    pub flat: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            folded: false,
            top_aligned: false,
            flat: true,
        }
    }
}

impl ViewOptions {
    /// Every rendering visible.
    pub fn all() -> Self {
        Self {
            folded: true,
            top_aligned: true,
            flat: true,
        }
    }
}

/// Dimensions of one box and its lid tilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxParams {
    /// Outer width of the square box.
    pub size: f64,
    /// Depth of the bottom below the lid origin.
    pub height: f64,
    /// Sheet thickness.
    pub thickness: f64,
    /// Thickness of the plate the boxes are fastened to.
    pub bottom_plate_thickness: f64,
    /// Inside bend radius.
    pub bend_radius: f64,
    /// Neutral axis position as a fraction of the thickness.
    pub k_factor: f64,
    /// Corner gap as a multiple of the thickness.
    pub gap_scalar: f64,
    /// Play between tabs and their holes.
    pub hole_clearance: f64,
    /// Width of the keyed fastener tooth.
    pub fastener_width: f64,
    /// Thickness of the fastener clip.
    pub fastener_thickness: f64,
    /// Lid tilt about X in degrees. Ignored when `normal` is set.
    pub angle_around_x: f64,
    /// Lid tilt about Y in degrees. Ignored when `normal` is set.
    pub angle_around_y: f64,
    /// Explicit lid normal, overriding the two tilt angles.
    pub normal: Option<[f64; 3]>,
    /// Unfold progress, `0` folded and `1` flat.
    pub angle_slerp: f64,
    /// Identifier engraved on the north wall.
    pub label: Option<String>,
    /// Flat wall legs at or below this length are reported.
    pub min_wall_length: f64,
    /// Rendering visibility.
    pub views: ViewOptions,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            size: 50.0,
            height: 50.0,
            thickness: 1.0,
            bottom_plate_thickness: 3.0,
            bend_radius: 1.0,
            k_factor: 0.44,
            gap_scalar: 1.5,
            hole_clearance: 0.2,
            fastener_width: 4.6,
            fastener_thickness: 0.25,
            angle_around_x: 0.0,
            angle_around_y: 0.0,
            normal: None,
            angle_slerp: 1.0,
            label: None,
            min_wall_length: 10.0,
            views: ViewOptions::default(),
        }
    }
}

fn invalid(message: String) -> UnfoldError {
    UnfoldError::InvalidParameter(message)
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(invalid(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(invalid(format!("{name} must not be negative, got {value}")));
    }
    Ok(())
}

impl BoxParams {
    /// Parameters for the given lid normal, everything else default.
    pub fn with_normal(normal: Vec3) -> Self {
        Self {
            normal: Some([normal.x, normal.y, normal.z]),
            ..Self::default()
        }
    }

    /// Unit normal of the lid.
    ///
    /// An explicit `normal` wins. Otherwise the local Y axis is tilted about X
    /// by `angle_around_x`, the local X axis about Y by `angle_around_y`, and
    /// the normal is their cross product.
    pub fn top_face_normal(&self) -> Result<Vec3> {
        let raw = match self.normal {
            Some([x, y, z]) => Vec3::new(x, y, z),
            None => {
                let about_x = rotation_about_axis(&Vec3::x(), self.angle_around_x.to_radians());
                let about_y = rotation_about_axis(&Vec3::y(), self.angle_around_y.to_radians());
                let (Some(about_x), Some(about_y)) = (about_x, about_y) else {
                    return Err(invalid("tilt axes are degenerate".into()));
                };
                let local_y = about_x * Vec3::y();
                let local_x = about_y * Vec3::x();
                local_x.cross(&local_y)
            }
        };
        if raw.iter().any(|c| !c.is_finite()) {
            return Err(invalid(format!("lid normal {raw:?} is not finite")));
        }
        raw.try_normalize(1e-12)
            .ok_or_else(|| invalid("lid normal has zero length".into()))
    }

    /// Reject parameters the geometry cannot be built from.
    ///
    /// # Errors
    ///
    /// [`UnfoldError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        positive("size", self.size)?;
        positive("height", self.height)?;
        positive("thickness", self.thickness)?;
        positive("min_wall_length", self.min_wall_length)?;
        non_negative("bend_radius", self.bend_radius)?;
        non_negative("gap_scalar", self.gap_scalar)?;
        non_negative("hole_clearance", self.hole_clearance)?;
        non_negative("bottom_plate_thickness", self.bottom_plate_thickness)?;
        positive("fastener_width", self.fastener_width)?;

        if self.thickness >= self.size / 2.0 {
            return Err(invalid(format!(
                "thickness {} must be less than half the size {}",
                self.thickness, self.size
            )));
        }
        if !(0.0..=1.0).contains(&self.k_factor) {
            return Err(invalid(format!("k_factor {} is outside [0, 1]", self.k_factor)));
        }
        if !(0.0..=1.0).contains(&self.angle_slerp) {
            return Err(invalid(format!(
                "angle_slerp {} is outside [0, 1]",
                self.angle_slerp
            )));
        }

        let normal = self.top_face_normal()?;
        if normal.z <= 0.0 {
            return Err(invalid(format!(
                "lid normal {normal:?} must point up (z > 0)"
            )));
        }
        Ok(())
    }

    /// Corner gap left at the right-hand end of every wall.
    pub fn corner_gap(&self) -> f64 {
        self.thickness * self.gap_scalar
    }

    /// Derived tab and hole dimensions.
    pub fn tabs(&self) -> TabDimensions {
        TabDimensions::from_params(self)
    }
}

/// Tab, hook and hole dimensions shared by the walls and the base plate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabDimensions {
    /// Play between a tooth and its hole.
    pub tooth_clearance: f64,
    /// Radius of the stress reliefs at tab roots.
    pub relief_radius: f64,
    /// How far the reliefs cut into the wall.
    pub relief_depth: f64,
    /// Rounding of tooth and hook tips.
    pub key_rounding_radius: f64,
    /// Tooth length beyond the sheet thickness.
    pub fastener_extra_height: f64,
    /// Width of the slot the fastener clip passes through.
    pub fastener_hole_width: f64,
    /// Span of the hook tab along the wall.
    pub hook_width: f64,
    /// Reach of the hook.
    pub hook_depth: f64,
    /// How far the hook sits into its slot.
    pub hook_into_slot: f64,
    /// Length of the tooth inside the base plate hole.
    pub inside_tab_length: f64,
}

impl TabDimensions {
    /// Dimensions derived from sheet thickness, plate thickness and clearances.
    pub fn from_params(params: &BoxParams) -> Self {
        let t = params.thickness;
        Self {
            tooth_clearance: params.hole_clearance,
            relief_radius: t / 2.0,
            relief_depth: t,
            key_rounding_radius: t / 2.0,
            fastener_extra_height: params.bottom_plate_thickness,
            fastener_hole_width: params.fastener_width / 2.0,
            hook_width: params.fastener_width,
            hook_depth: params.fastener_width / 2.0,
            hook_into_slot: params.hole_clearance,
            inside_tab_length: t * 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_defaults_validate() {
        let params = BoxParams::default();
        params.validate().unwrap();
        assert_abs_diff_eq!(params.top_face_normal().unwrap(), Vec3::z(), epsilon = 1e-12);
        assert!(params.views.flat && !params.views.folded && !params.views.top_aligned);
    }

    #[test]
    fn test_tilt_angles_give_normal() {
        let params = BoxParams {
            angle_around_x: 10.0,
            ..BoxParams::default()
        };
        let n = params.top_face_normal().unwrap();
        let a = 10f64.to_radians();
        assert_abs_diff_eq!(n, Vec3::new(0.0, -a.sin(), a.cos()), epsilon = 1e-12);

        let params = BoxParams {
            angle_around_y: 10.0,
            ..BoxParams::default()
        };
        let n = params.top_face_normal().unwrap();
        assert_abs_diff_eq!(n, Vec3::new(a.sin(), 0.0, a.cos()), epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_normal_wins_and_is_normalized() {
        let params = BoxParams {
            angle_around_x: 30.0,
            normal: Some([0.0, 0.0, 4.0]),
            ..BoxParams::default()
        };
        assert_abs_diff_eq!(params.top_face_normal().unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_validate_rejects() {
        let cases: [fn(&mut BoxParams); 11] = [
            |p| p.size = 0.0,
            |p| p.height = -1.0,
            |p| p.thickness = 25.0,
            |p| p.bend_radius = -0.5,
            |p| p.k_factor = 1.5,
            |p| p.angle_slerp = 1.1,
            |p| p.normal = Some([0.0, 0.0, 0.0]),
            |p| p.normal = Some([0.0, 0.0, -1.0]),
            |p| p.normal = Some([1.0, 0.0, 0.0]),
            |p| p.normal = Some([f64::NAN, 0.0, 1.0]),
            |p| p.thickness = f64::NAN,
        ];
        for modify in cases {
            let mut params = BoxParams::default();
            modify(&mut params);
            assert!(
                matches!(params.validate(), Err(UnfoldError::InvalidParameter(_))),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_tab_dimensions() {
        let tabs = BoxParams::default().tabs();
        assert_abs_diff_eq!(tabs.relief_radius, 0.5);
        assert_abs_diff_eq!(tabs.hook_depth, 2.3, epsilon = 1e-12);
        assert!(tabs.hook_depth >= tabs.relief_radius * 3.0);
        assert_abs_diff_eq!(tabs.fastener_hole_width, 2.3, epsilon = 1e-12);
        assert_abs_diff_eq!(tabs.inside_tab_length, 3.0);
        assert_abs_diff_eq!(tabs.fastener_extra_height, 3.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: BoxParams = toml::from_str(
            r#"
            size = 60.0
            normal = [0.1, 0.2, 0.97]
            label = "001 002"

            [views]
            folded = true
            "#,
        )
        .unwrap();
        assert_eq!(params.size, 60.0);
        assert_eq!(params.height, 50.0);
        assert_eq!(params.label.as_deref(), Some("001 002"));
        assert!(params.views.folded && params.views.flat);
        params.validate().unwrap();
    }
}
