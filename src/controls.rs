//! Keyboard controls for rotation and scale.
//!
//! The viewer has no slider widgets; the keys move absolute targets the same way a slider
//! would, and the targets are then handed to the renderer.

use glam::Vec3;
use sdl2::keyboard::Keycode;

use crate::config::ViewerConfig;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    Rotate(Vec3),
    Scale(f32),
    /// Rotation and scale both went back to their initial values.
    Reset,
    Quit,
}

/// Absolute rotation and scale targets driven by the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewControls {
    rotation: Vec3,
    scale: f32,
    rotation_step: f32,
    scale_step: f32,
    min_scale: f32,
    max_scale: f32,
}

impl ViewControls {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: 1.0f32.clamp(config.min_scale, config.max_scale),
            rotation_step: config.rotation_step,
            scale_step: config.scale_step,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    /// Updates the targets for a key press and returns the resulting action, if any.
    ///
    /// Up/Down turn about X, Left/Right about Y and Q/E about Z. `=`/`-` change the scale
    /// within the configured range, R resets and Escape quits.
    pub fn handle_key(&mut self, keycode: Keycode) -> Option<ControlAction> {
        match keycode {
            Keycode::Up => Some(self.rotate(Vec3::X)),
            Keycode::Down => Some(self.rotate(-Vec3::X)),
            Keycode::Right => Some(self.rotate(Vec3::Y)),
            Keycode::Left => Some(self.rotate(-Vec3::Y)),
            Keycode::E => Some(self.rotate(Vec3::Z)),
            Keycode::Q => Some(self.rotate(-Vec3::Z)),
            Keycode::Equals | Keycode::KpPlus => self.rescale(self.scale_step),
            Keycode::Minus | Keycode::KpMinus => self.rescale(-self.scale_step),
            Keycode::R => Some(self.reset()),
            Keycode::Escape => Some(ControlAction::Quit),
            _ => None,
        }
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn rotate(&mut self, axis: Vec3) -> ControlAction {
        let rotation = self.rotation + axis * self.rotation_step;
        self.rotation = Vec3::new(
            rotation.x.rem_euclid(360.0),
            rotation.y.rem_euclid(360.0),
            rotation.z.rem_euclid(360.0),
        );
        ControlAction::Rotate(self.rotation)
    }

    fn rescale(&mut self, delta: f32) -> Option<ControlAction> {
        let scale = (self.scale + delta).clamp(self.min_scale, self.max_scale);
        if scale == self.scale {
            return None;
        }
        self.scale = scale;
        Some(ControlAction::Scale(scale))
    }

    fn reset(&mut self) -> ControlAction {
        self.rotation = Vec3::ZERO;
        self.scale = 1.0f32.clamp(self.min_scale, self.max_scale);
        ControlAction::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> ViewControls {
        ViewControls::new(&ViewerConfig::default())
    }

    #[test]
    fn test_rotation_keys_wrap() {
        let mut controls = controls();
        assert_eq!(
            controls.handle_key(Keycode::Down),
            Some(ControlAction::Rotate(Vec3::new(355.0, 0.0, 0.0)))
        );
        controls.handle_key(Keycode::Right);
        controls.handle_key(Keycode::E);
        assert_eq!(controls.rotation(), Vec3::new(355.0, 5.0, 5.0));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut controls = controls();
        for _ in 0..20 {
            controls.handle_key(Keycode::Minus);
        }
        assert_eq!(controls.scale(), 0.1);
        assert_eq!(controls.handle_key(Keycode::Minus), None);

        for _ in 0..40 {
            controls.handle_key(Keycode::Equals);
        }
        assert_eq!(controls.scale(), 2.0);
    }

    #[test]
    fn test_reset_and_quit() {
        let mut controls = controls();
        controls.handle_key(Keycode::Up);
        controls.handle_key(Keycode::Equals);
        assert_eq!(
            controls.handle_key(Keycode::R),
            Some(ControlAction::Reset)
        );
        assert_eq!(controls.rotation(), Vec3::ZERO);
        assert_eq!(controls.scale(), 1.0);
        assert_eq!(controls.handle_key(Keycode::Escape), Some(ControlAction::Quit));
        assert_eq!(controls.handle_key(Keycode::Space), None);
    }
}
