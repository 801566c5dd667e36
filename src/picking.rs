use glam::Vec2;

use crate::camera::OrbitCamera;
use crate::overlay::Overlay;
use crate::scene::Scene;

/// Cursor icon requested by the pointer handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Window pixel coordinates to normalized device coordinates (y up)
pub fn pointer_to_ndc(x: f32, y: f32, width: u32, height: u32) -> Vec2 {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    Vec2::new((x / w) * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
}

/// Hover and click handling for objects in the scene
#[derive(Debug, Clone)]
pub struct PointerInteraction {
    width: u32,
    height: u32,
    cursor: CursorStyle,
}

impl PointerInteraction {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor: CursorStyle::Default,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Whether anything flagged interactive lies under the pointer
    pub fn hits_interactive(&self, x: f32, y: f32, camera: &OrbitCamera, scene: &Scene) -> bool {
        let ray = camera.ray_through(pointer_to_ndc(x, y, self.width, self.height));
        scene.intersect(&ray).iter().any(|hit| hit.interactive)
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32, camera: &OrbitCamera, scene: &Scene) -> CursorStyle {
        self.cursor = if self.hits_interactive(x, y, camera, scene) {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        };
        self.cursor
    }

    /// Opens the overlay when the click lands on an interactive object.
    /// Before the model has loaded nothing is interactive and this is a no-op.
    pub fn on_click(
        &self,
        x: f32,
        y: f32,
        camera: &OrbitCamera,
        scene: &Scene,
        overlay: &mut Overlay,
    ) -> bool {
        if self.hits_interactive(x, y, camera, scene) {
            overlay.show();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_and_center() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800, 600), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800, 600), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800, 600), Vec2::ZERO);
    }

    #[test]
    fn ndc_tolerates_zero_viewport() {
        let ndc = pointer_to_ndc(0.0, 0.0, 0, 0);
        assert!(ndc.is_finite());
    }
}
