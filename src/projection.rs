//! The shared perspective projection.

use glam::Mat4;

/// Vertical field of view, in degrees.
pub const FOV_Y_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 0.2;
pub const FAR_PLANE: f32 = 20.0;

/// Perspective projection derived from the current viewport size.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionState {
    matrix: Mat4,
    width: u32,
    height: u32,
}

impl ProjectionState {
    pub fn new(width: u32, height: u32) -> Self {
        let mut projection = Self {
            matrix: Mat4::IDENTITY,
            width: 1,
            height: 1,
        };
        projection.on_resize(width, height);
        projection
    }

    /// Recomputes the projection for a new viewport size.
    ///
    /// A zero dimension is treated as 1 so the aspect ratio always stays finite and non-zero.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);

        self.matrix = Mat4::perspective_rh_gl(
            FOV_Y_DEGREES.to_radians(),
            self.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// The clamped viewport size the matrix was computed for.
    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_finite(matrix: Mat4) -> bool {
        matrix.to_cols_array().iter().all(|v| v.is_finite())
    }

    #[test]
    fn test_matches_perspective() {
        let projection = ProjectionState::new(1280, 720);
        let expected =
            Mat4::perspective_rh_gl(60f32.to_radians(), 1280.0 / 720.0, 0.2, 20.0);
        assert!(projection.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_zero_height_stays_finite() {
        let mut projection = ProjectionState::new(800, 600);
        projection.on_resize(800, 0);
        assert!(is_finite(projection.matrix()));
        assert_eq!(projection.viewport(), (800, 1));

        projection.on_resize(0, 0);
        assert!(is_finite(projection.matrix()));
        assert_eq!(projection.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_depends_only_on_latest_size() {
        let mut resized = ProjectionState::new(100, 400);
        resized.on_resize(640, 480);
        assert_eq!(resized, ProjectionState::new(640, 480));
    }
}
