use volcano_showcase::camera::{
    CameraState, OrbitCamera, BASE_ROTATION_SPEED, DAMPING, MAX_SCROLL_SPEED, ORBIT_HEIGHT, ORBIT_RADIUS,
};
use volcano_showcase::core::input_adapter::{wheel_delta_y, PIXELS_PER_LINE};
use winit::event::MouseScrollDelta;

#[cfg(test)]
mod camera_tests {
    use super::*;

    #[test]
    fn test_scroll_velocity_stays_clamped_for_any_input() {
        let mut state = CameraState::default();
        for delta in [1e9, -1e9, 250.0, -3.0, f32::MAX, 0.0, -f32::MAX] {
            state.apply_scroll(delta);
            assert!(
                state.scroll_velocity.abs() <= MAX_SCROLL_SPEED,
                "velocity {} out of range after delta {}",
                state.scroll_velocity,
                delta
            );
        }
    }

    #[test]
    fn test_velocity_decays_monotonically_without_input() {
        let mut state = CameraState::default();
        state.apply_scroll(100.0);

        let mut previous = state.scroll_velocity;
        assert!(previous > 0.0);

        for _ in 0..500 {
            state.tick();
            assert!(state.scroll_velocity <= previous);
            if state.scroll_velocity > 0.0 {
                let ratio = state.scroll_velocity / previous;
                assert!((ratio - DAMPING).abs() < 1e-4, "ratio was {}", ratio);
            }
            previous = state.scroll_velocity;
        }

        assert_eq!(state.scroll_velocity, 0.0, "velocity should snap to rest");
    }

    #[test]
    fn test_drift_continues_at_rest() {
        let mut state = CameraState::default();
        for _ in 0..10 {
            state.tick();
        }
        assert!((state.angle - 10.0 * BASE_ROTATION_SPEED).abs() < 1e-7);
    }

    #[test]
    fn test_scroll_direction_follows_wheel_sign() {
        let mut down = CameraState::default();
        down.apply_scroll(10.0);
        down.tick();

        let mut up = CameraState::default();
        up.apply_scroll(-10.0);
        up.tick();

        assert!(down.angle > BASE_ROTATION_SPEED);
        assert!(up.angle < 0.0);
    }

    #[test]
    fn test_camera_orbits_at_fixed_radius_and_height() {
        let mut camera = OrbitCamera::new(16.0 / 9.0);
        for _ in 0..1000 {
            camera.apply_scroll(50.0);
            camera.update();
            let position = camera.position();
            let radius = (position.x * position.x + position.z * position.z).sqrt();
            assert!((radius - ORBIT_RADIUS).abs() < 1e-3);
            assert_eq!(position.y, ORBIT_HEIGHT);
        }
    }

    #[test]
    fn test_line_wheel_converts_to_pixels() {
        // winit: positive y means the content moves down, i.e. wheel up
        let delta = wheel_delta_y(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert_eq!(delta, PIXELS_PER_LINE);
    }
}
