use crate::renderer::util;
use glam::{Mat4, Vec3};

/// Possible directions for keyboard driven camera movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-flying camera driven by Euler angles (degrees).
/// `front`, `right` and `up` are derived from `yaw` and `pitch` and stay orthonormal.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub const DEFAULT_YAW: f32 = -90.0;
    pub const DEFAULT_PITCH: f32 = 0.0;
    pub const DEFAULT_SPEED: f32 = 2.5;
    pub const DEFAULT_SENSITIVITY: f32 = 0.1;
    pub const DEFAULT_ZOOM: f32 = 45.0;
    pub const MIN_ZOOM: f32 = 1.0;
    pub const MAX_ZOOM: f32 = 45.0;
    pub const MAX_PITCH: f32 = 89.0;

    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::Y, Self::DEFAULT_YAW, Self::DEFAULT_PITCH)
    }

    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            movement_speed: Self::DEFAULT_SPEED,
            mouse_sensitivity: Self::DEFAULT_SENSITIVITY,
            zoom: Self::DEFAULT_ZOOM,
            near: 0.1,
            far: 100.0,
        };
        camera.update_camera_vectors();
        camera
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn get_view_mat(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn get_proj_mat(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.zoom.to_radians(),
            aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.front.cross(self.up).normalize() * velocity,
            CameraMovement::Right => self.position += self.front.cross(self.up).normalize() * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        // Keep front from becoming parallel to world up
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        }

        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    fn update_camera_vectors(&mut self) {
        self.front = util::calculate_direction(
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        ).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    pub fn get_front(&self) -> Vec3 {
        self.front
    }

    pub fn get_up(&self) -> Vec3 {
        self.up
    }

    pub fn get_right(&self) -> Vec3 {
        self.right
    }

    pub fn get_yaw(&self) -> f32 {
        self.yaw
    }

    pub fn get_pitch(&self) -> f32 {
        self.pitch
    }

    pub fn get_zoom(&self) -> f32 {
        self.zoom
    }

    pub fn get_near(&self) -> f32 {
        self.near
    }

    pub fn get_far(&self) -> f32 {
        self.far
    }

    pub fn get_movement_speed(&self) -> f32 {
        self.movement_speed
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.get_front(), camera.get_right(), camera.get_up());
        assert!((f.length() - 1.0).abs() < EPS);
        assert!((r.length() - 1.0).abs() < EPS);
        assert!((u.length() - 1.0).abs() < EPS);
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(camera.get_front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(camera.get_right().abs_diff_eq(Vec3::X, EPS));
        assert!(camera.get_up().abs_diff_eq(Vec3::Y, EPS));
        assert_eq!(camera.get_zoom(), 45.0);
    }

    #[test]
    fn front_matches_the_stored_angles() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(250.0, 120.0, true);
        let front = camera.get_front();
        assert!((util::calculate_yaw(front).to_degrees() - camera.get_yaw()).abs() < 1e-3);
        assert!((util::calculate_pitch(front).to_degrees() - camera.get_pitch()).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.get_pitch(), 89.0);
        camera.process_mouse_movement(0.0, -50_000.0, true);
        assert_eq!(camera.get_pitch(), -89.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn pitch_is_free_when_unconstrained() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 1_000.0, false);
        assert!((camera.get_pitch() - 100.0).abs() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal_after_mouse_movement() {
        let mut camera = Camera::default();
        for i in 0..50 {
            camera.process_mouse_movement(i as f32 * 13.0, (i as f32 * 7.0).sin() * 40.0, true);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(-10.0);
        assert_eq!(camera.get_zoom(), 45.0);
        camera.process_mouse_scroll(30.0);
        assert_eq!(camera.get_zoom(), 15.0);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.get_zoom(), 1.0);
    }

    #[test]
    fn keyboard_moves_along_front_and_right() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(camera.get_position().abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), EPS));
        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert!(camera.get_position().abs_diff_eq(Vec3::new(5.0, 0.0, 0.5), EPS));
        camera.process_keyboard(CameraMovement::Left, 2.0);
        camera.process_keyboard(CameraMovement::Backward, 1.0);
        assert!(camera.get_position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.process_mouse_movement(120.0, -35.0, true);
        let eye = camera.get_view_mat().transform_point3(camera.get_position());
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));
        let ahead = camera.get_view_mat().transform_point3(camera.get_position() + camera.get_front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }
}
