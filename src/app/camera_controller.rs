use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::renderer::camera::{Camera, CameraMovement};

/// Which inputs drive the camera of a demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// The demo renders from fixed matrices
    Static,
    /// W/A/S/D movement only
    Keyboard,
    /// W/A/S/D movement, mouse look and scroll zoom, with the cursor captured
    FreeLook,
}

impl CameraMode {
    pub fn captures_cursor(&self) -> bool {
        *self == CameraMode::FreeLook
    }
}

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
];

pub struct CameraController {
    camera: Camera,
    mode: CameraMode,
}

impl CameraController {
    pub fn new(camera: Camera, mode: CameraMode) -> Self {
        Self {
            camera,
            mode,
        }
    }

    pub fn get_camera(&self) -> &Camera {
        &self.camera
    }

    pub fn get_mode(&self) -> CameraMode {
        self.mode
    }

    /// Applies this frame's input to the camera.
    /// Returns true when the projection changed and has to be rebuilt.
    pub fn process_input(
        &mut self,
        input_state: &InputState,
        delta_time: f32,
    ) -> bool {
        if self.mode == CameraMode::Static {
            return false;
        }

        // Holding shift doubles the speed for this frame only
        let base_speed = self.camera.get_movement_speed();
        if input_state.is_key_down(KeyCode::ShiftLeft) {
            self.camera.set_movement_speed(base_speed * 2.0);
        }
        for (key, direction) in MOVEMENT_KEYS {
            if input_state.is_key_down(key) {
                self.camera.process_keyboard(direction, delta_time);
            }
        }
        self.camera.set_movement_speed(base_speed);

        if self.mode != CameraMode::FreeLook {
            return false;
        }

        let delta = input_state.mouse_delta;
        if delta.x != 0.0 || delta.y != 0.0 {
            // Window y grows downwards, pitch grows upwards
            self.camera.process_mouse_movement(delta.x, -delta.y, true);
        }

        if input_state.mouse_wheel_delta_y != 0.0 {
            let zoom = self.camera.get_zoom();
            self.camera.process_mouse_scroll(input_state.mouse_wheel_delta_y);
            return zoom != self.camera.get_zoom();
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn controller(mode: CameraMode) -> CameraController {
        CameraController::new(Camera::new(Vec3::new(0.0, 0.0, 3.0)), mode)
    }

    #[test]
    fn static_mode_ignores_input() {
        let mut controller = controller(CameraMode::Static);
        let mut input = InputState::default();
        input.on_key(KeyCode::KeyW, true, false);
        input.on_scroll(5.0);
        assert!(!controller.process_input(&input, 1.0));
        assert_eq!(controller.get_camera().get_position(), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn shift_doubles_speed_for_one_frame() {
        let mut controller = controller(CameraMode::Keyboard);
        let mut input = InputState::default();
        input.on_key(KeyCode::KeyW, true, false);
        input.on_key(KeyCode::ShiftLeft, true, false);
        controller.process_input(&input, 0.1);
        assert!(controller.get_camera().get_position().abs_diff_eq(Vec3::new(0.0, 0.0, 2.5), 1e-5));
        assert_eq!(controller.get_camera().get_movement_speed(), Camera::DEFAULT_SPEED);

        input.on_key(KeyCode::ShiftLeft, false, false);
        controller.process_input(&input, 0.1);
        assert!(controller.get_camera().get_position().abs_diff_eq(Vec3::new(0.0, 0.0, 2.25), 1e-5));
    }

    #[test]
    fn keyboard_mode_does_not_look_or_zoom() {
        let mut controller = controller(CameraMode::Keyboard);
        let mut input = InputState::default();
        input.on_mouse_motion(0.0, 0.0);
        input.on_mouse_motion(100.0, 100.0);
        input.on_scroll(3.0);
        assert!(!controller.process_input(&input, 0.016));
        assert_eq!(controller.get_camera().get_yaw(), Camera::DEFAULT_YAW);
        assert_eq!(controller.get_camera().get_zoom(), Camera::DEFAULT_ZOOM);
    }

    #[test]
    fn free_look_turns_and_zooms() {
        let mut controller = controller(CameraMode::FreeLook);
        let mut input = InputState::default();
        input.on_mouse_motion(0.0, 0.0);
        input.on_mouse_motion(100.0, -50.0);
        input.on_scroll(2.0);
        assert!(controller.process_input(&input, 0.016));

        let camera = controller.get_camera();
        assert!((camera.get_yaw() - (Camera::DEFAULT_YAW + 10.0)).abs() < 1e-5);
        assert!((camera.get_pitch() - 5.0).abs() < 1e-5);
        assert_eq!(camera.get_zoom(), 43.0);
    }

    #[test]
    fn zoom_at_limit_does_not_report_change() {
        let mut controller = controller(CameraMode::FreeLook);
        let mut input = InputState::default();
        input.on_scroll(-1.0);
        assert!(!controller.process_input(&input, 0.016));
    }
}
