use glam::{Mat4, Vec3};

use crate::math::Ray;

/// Wheel delta to angular velocity
pub const SCROLL_SENSITIVITY: f32 = 0.0005;
/// Ceiling on the scroll-induced angular velocity (radians per frame)
pub const MAX_SCROLL_SPEED: f32 = 0.01;
/// Undamped drift added every frame
pub const BASE_ROTATION_SPEED: f32 = 0.0001;
pub const DAMPING: f32 = 0.98;
/// Below this the scroll velocity snaps to zero
pub const REST_THRESHOLD: f32 = 1e-4;

pub const ORBIT_RADIUS: f32 = 20.0;
pub const ORBIT_HEIGHT: f32 = 10.0;

pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Orbit angle plus the decaying velocity added by the wheel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraState {
    pub angle: f32,
    pub scroll_velocity: f32,
}

impl CameraState {
    /// Feed one wheel event. The result is always within `±MAX_SCROLL_SPEED`.
    pub fn apply_scroll(&mut self, delta_y: f32) {
        let velocity = self.scroll_velocity + delta_y * SCROLL_SENSITIVITY;
        self.scroll_velocity = velocity.clamp(-MAX_SCROLL_SPEED, MAX_SCROLL_SPEED);
    }

    /// Advance one frame: drift plus scroll, then damp
    pub fn tick(&mut self) {
        self.angle += BASE_ROTATION_SPEED + self.scroll_velocity;
        self.scroll_velocity *= DAMPING;
        if self.scroll_velocity.abs() < REST_THRESHOLD {
            self.scroll_velocity = 0.0;
        }
    }
}

/// Perspective camera constrained to a circle around the origin
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub state: CameraState,
    pub radius: f32,
    pub height: f32,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            state: CameraState::default(),
            radius: ORBIT_RADIUS,
            height: ORBIT_HEIGHT,
            target: Vec3::ZERO,
            fov_y: FOV_DEGREES.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
        }
    }

    pub fn apply_scroll(&mut self, delta_y: f32) {
        self.state.apply_scroll(delta_y);
    }

    pub fn update(&mut self) {
        self.state.tick();
    }

    /// Recompute aspect after a resize; degenerate sizes are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn position(&self) -> Vec3 {
        let angle = self.state.angle;
        Vec3::new(
            self.radius * angle.cos(),
            self.height,
            self.radius * angle.sin(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Picking ray through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: glam::Vec2) -> Ray {
        Ray::from_ndc(ndc, self.position(), self.view_projection().inverse())
    }
}
