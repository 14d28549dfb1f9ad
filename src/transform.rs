//! Per-object model transforms driven by absolute rotation and scale targets.
//!
//! The UI reports absolute values (slider positions), but the matrix is updated incrementally:
//! each call applies only the difference to the previously applied target. Rotations are
//! post-multiplied about X, then Y, then Z, so the result depends on the path taken.

use glam::{Mat4, Vec3};

use crate::error::{Result, ViewerError};

/// Smallest accepted scale factor.
pub const MIN_SCALE: f32 = 1e-4;
/// Largest accepted scale factor.
pub const MAX_SCALE: f32 = 1e4;

/// The model matrix of one object together with the last applied rotation and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelTransform {
    matrix: Mat4,
    placement: Vec3,
    rotation: Vec3,
    scale: f32,
}

impl ModelTransform {
    /// Starts from the identity translated to `placement`.
    pub fn new(placement: Vec3) -> Self {
        Self {
            matrix: Mat4::from_translation(placement),
            placement,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Rotates towards the absolute target angles, in degrees.
    ///
    /// Non-finite targets are rejected and leave the transform unchanged.
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        let target = Vec3::new(x, y, z);
        validate_rotation(target)?;
        let delta = target - self.rotation;

        if delta.x != 0.0 {
            self.matrix *= Mat4::from_rotation_x(delta.x.to_radians());
        }
        if delta.y != 0.0 {
            self.matrix *= Mat4::from_rotation_y(delta.y.to_radians());
        }
        if delta.z != 0.0 {
            self.matrix *= Mat4::from_rotation_z(delta.z.to_radians());
        }

        self.rotation = target;
        Ok(())
    }

    /// Scales towards the absolute target factor.
    ///
    /// The target must lie in [`MIN_SCALE`, `MAX_SCALE`]; anything else is rejected and
    /// leaves the transform unchanged.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        validate_scale(scale)?;

        if scale != self.scale {
            let ratio = scale / self.scale;
            if !ratio.is_finite() {
                return Err(ViewerError::InvalidScale(scale));
            }
            self.matrix *= Mat4::from_scale(Vec3::splat(ratio));
            self.scale = scale;
        }

        Ok(())
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn placement(&self) -> Vec3 {
        self.placement
    }

    /// Last applied rotation target, in degrees.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Last applied scale target.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

pub(crate) fn validate_scale(scale: f32) -> Result<()> {
    if (MIN_SCALE..=MAX_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(ViewerError::InvalidScale(scale))
    }
}

pub(crate) fn validate_rotation(rotation: Vec3) -> Result<()> {
    if rotation.is_finite() {
        Ok(())
    } else {
        Err(ViewerError::InvalidRotation(rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEMENT: Vec3 = Vec3::new(-2.0, 0.0, -6.0);

    #[test]
    fn test_initial_matrix_is_translation() {
        let transform = ModelTransform::new(PLACEMENT);
        assert_eq!(transform.matrix(), Mat4::from_translation(PLACEMENT));
        assert_eq!(transform.rotation(), Vec3::ZERO);
        assert_eq!(transform.scale(), 1.0);
    }

    #[test]
    fn test_repeated_rotation_is_idempotent() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_rotation(30.0, 45.0, 90.0).unwrap();
        let once = transform.matrix();
        transform.set_rotation(30.0, 45.0, 90.0).unwrap();
        assert_eq!(transform.matrix(), once);
    }

    #[test]
    fn test_rotation_applies_x_then_y_then_z() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_rotation(10.0, 20.0, 30.0).unwrap();

        let expected = Mat4::from_translation(PLACEMENT)
            * Mat4::from_rotation_x(10f32.to_radians())
            * Mat4::from_rotation_y(20f32.to_radians())
            * Mat4::from_rotation_z(30f32.to_radians());
        assert!(transform.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_rotation_accumulates_deltas() {
        let mut stepped = ModelTransform::new(PLACEMENT);
        stepped.set_rotation(0.0, 20.0, 0.0).unwrap();
        stepped.set_rotation(0.0, 50.0, 0.0).unwrap();

        let mut direct = ModelTransform::new(PLACEMENT);
        direct.set_rotation(0.0, 50.0, 0.0).unwrap();

        // Single-axis rotations commute, so the path does not matter here.
        assert!(stepped.matrix().abs_diff_eq(direct.matrix(), 1e-5));
        assert_eq!(stepped.rotation(), Vec3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_multi_axis_rotation_is_path_dependent() {
        let mut stepped = ModelTransform::new(Vec3::ZERO);
        stepped.set_rotation(90.0, 0.0, 0.0).unwrap();
        stepped.set_rotation(90.0, 90.0, 0.0).unwrap();
        stepped.set_rotation(0.0, 90.0, 0.0).unwrap();

        let mut direct = ModelTransform::new(Vec3::ZERO);
        direct.set_rotation(0.0, 90.0, 0.0).unwrap();

        assert_eq!(stepped.rotation(), direct.rotation());
        assert!(!stepped.matrix().abs_diff_eq(direct.matrix(), 1e-3));
    }

    #[test]
    fn test_scale_ratio_composition() {
        let mut stepped = ModelTransform::new(PLACEMENT);
        stepped.set_scale(2.0).unwrap();
        stepped.set_scale(4.0).unwrap();

        let mut direct = ModelTransform::new(PLACEMENT);
        direct.set_scale(4.0).unwrap();

        assert!(stepped.matrix().abs_diff_eq(direct.matrix(), 1e-6));
        assert_eq!(stepped.scale(), 4.0);
    }

    #[test]
    fn test_same_scale_is_noop() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_scale(1.0).unwrap();
        assert_eq!(transform.matrix(), Mat4::from_translation(PLACEMENT));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_scale(1.5).unwrap();
        let before = transform.clone();

        for bad in [0.0, -1.0, 1e-40, MIN_SCALE / 2.0, MAX_SCALE * 2.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                transform.set_scale(bad),
                Err(ViewerError::InvalidScale(_))
            ));
        }
        assert_eq!(transform, before);
    }

    #[test]
    fn test_restore_from_minimum_scale_stays_finite() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_scale(MIN_SCALE).unwrap();
        transform.set_scale(1.0).unwrap();

        assert!(transform.matrix().is_finite());
        assert!(
            transform
                .matrix()
                .abs_diff_eq(Mat4::from_translation(PLACEMENT), 1e-3)
        );
    }

    #[test]
    fn test_non_finite_rotation_is_rejected() {
        let mut transform = ModelTransform::new(PLACEMENT);
        transform.set_rotation(10.0, 0.0, 0.0).unwrap();
        let before = transform.clone();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                transform.set_rotation(bad, 0.0, 0.0),
                Err(ViewerError::InvalidRotation(_))
            ));
        }
        assert_eq!(transform, before);

        transform.set_rotation(0.0, 0.0, 0.0).unwrap();
        assert!(transform.matrix().is_finite());
    }
}
