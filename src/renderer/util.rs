use glam::{Mat4, Vec3};

/// Pitch in radians of a forward vector, positive when looking up
pub fn calculate_pitch(forward: Vec3) -> f32 {
    let forward = forward.normalize();
    forward.y.clamp(-1.0, 1.0).asin()
}

/// Yaw in radians of a forward vector, measured from +X towards +Z
pub fn calculate_yaw(forward: Vec3) -> f32 {
    let forward = forward.normalize();
    forward.z.atan2(forward.x)
}

pub fn calculate_direction(pitch: f32, yaw: f32) -> Vec3 {
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}

/// View matrices for rendering into the six faces of a cubemap from `eye`,
/// in the order +X, -X, +Y, -Y, +Z, -Z.
/// The up vectors follow the cubemap convention where face images are stored upside down.
pub fn cube_face_views(eye: Vec3) -> [Mat4; 6] {
    [
        Mat4::look_at_rh(eye, eye + Vec3::X, Vec3::NEG_Y),
        Mat4::look_at_rh(eye, eye + Vec3::NEG_X, Vec3::NEG_Y),
        Mat4::look_at_rh(eye, eye + Vec3::Y, Vec3::Z),
        Mat4::look_at_rh(eye, eye + Vec3::NEG_Y, Vec3::NEG_Z),
        Mat4::look_at_rh(eye, eye + Vec3::Z, Vec3::NEG_Y),
        Mat4::look_at_rh(eye, eye + Vec3::NEG_Z, Vec3::NEG_Y),
    ]
}

/// Projection covering exactly one cubemap face
pub fn cube_face_projection(near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(90.0_f32.to_radians(), 1.0, near, far)
}

pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown GL error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn direction_is_unit_length() {
        for (pitch, yaw) in [(0.3, -1.2), (-1.5, 2.0), (0.0, 0.0)] {
            assert!((calculate_direction(pitch, yaw).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn yaw_of_minus_ninety_degrees_faces_negative_z() {
        let dir = calculate_direction(0.0, -FRAC_PI_2);
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn pitch_and_yaw_invert_direction() {
        for (pitch, yaw) in [(0.3, -1.2), (-1.0, 2.5), (0.0, -FRAC_PI_2)] {
            let dir = calculate_direction(pitch, yaw) * 3.0;
            assert!((calculate_pitch(dir) - pitch).abs() < 1e-5);
            assert!((calculate_yaw(dir) - yaw).abs() < 1e-5);
        }
    }

    #[test]
    fn cube_face_views_look_down_each_axis() {
        let eye = Vec3::new(1.0, -2.0, 0.5);
        let axes = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (view, axis) in cube_face_views(eye).iter().zip(axes) {
            // A point in front of the face ends up on the view's -Z axis
            let p = view.transform_point3(eye + axis * 2.0);
            assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5), "{axis}: {p}");
        }
    }

    #[test]
    fn cube_face_projection_has_square_ninety_degree_frustum() {
        let proj = cube_face_projection(0.1, 10.0);
        // The frustum edge at 45 degrees maps to the NDC border
        let clip = proj * glam::Vec4::new(1.0, 1.0, -1.0, 1.0);
        assert!((clip.x / clip.w - 1.0).abs() < 1e-5);
        assert!((clip.y / clip.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn error_names() {
        assert_eq!(gl_error_name(glow::INVALID_OPERATION), "GL_INVALID_OPERATION");
        assert_eq!(gl_error_name(0xdead), "unknown GL error");
    }
}
