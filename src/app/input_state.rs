use std::collections::HashSet;
use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_just_pressed: HashSet<KeyCode>,

    /// Raw mouse motion accumulated this frame, +y points down
    pub mouse_delta: Vec2,
    pub mouse_wheel_delta_y: f32,
    /// Set until the first motion after capturing the cursor has been swallowed
    first_mouse: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            mouse_delta: Vec2::ZERO,
            mouse_wheel_delta_y: 0.0,
            first_mouse: true,
        }
    }
}

impl InputState {
    pub fn process_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat,
                    ..
                },
                ..
            } => {
                self.on_key(*code, *state == ElementState::Pressed, *repeat);
            }
            WindowEvent::MouseWheel {
                delta,
                ..
            } => {
                match delta {
                    MouseScrollDelta::LineDelta(_x, y) => {
                        self.on_scroll(*y);
                    }
                    MouseScrollDelta::PixelDelta(pos) => {
                        self.on_scroll(pos.y.signum() as f32);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
            }
            _ => {}
        }
    }

    pub fn process_device_events(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.on_mouse_motion(*dx as f32, *dy as f32);
        }
    }

    pub fn on_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        if pressed {
            let newly_down = self.keys_down.insert(code);
            if newly_down && !repeat {
                self.keys_just_pressed.insert(code);
            }
        } else {
            self.keys_down.remove(&code);
        }
    }

    pub fn on_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        self.mouse_delta += Vec2::new(dx, dy);
    }

    pub fn on_scroll(&mut self, delta_y: f32) {
        self.mouse_wheel_delta_y += delta_y;
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.keys_down.contains(&code)
    }

    /// True only on the frame the key went down, used for latched toggles
    pub fn is_key_just_pressed(&self, code: KeyCode) -> bool {
        self.keys_just_pressed.contains(&code)
    }

    /// Makes the next mouse motion be ignored, e.g. after the cursor was grabbed
    pub fn reset_first_mouse(&mut self) {
        self.first_mouse = true;
        self.mouse_delta = Vec2::ZERO;
    }

    /// Reset the input states for the next frame.
    pub fn reset_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.mouse_wheel_delta_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_pressed_latches_once_per_press() {
        let mut input = InputState::default();
        input.on_key(KeyCode::Space, true, false);
        assert!(input.is_key_just_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.reset_frame();
        input.on_key(KeyCode::Space, true, true);
        assert!(!input.is_key_just_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.on_key(KeyCode::Space, false, false);
        input.reset_frame();
        input.on_key(KeyCode::Space, true, false);
        assert!(input.is_key_just_pressed(KeyCode::Space));
    }

    #[test]
    fn first_mouse_motion_is_swallowed() {
        let mut input = InputState::default();
        input.on_mouse_motion(300.0, -200.0);
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        input.on_mouse_motion(3.0, 4.0);
        input.on_mouse_motion(1.0, 1.0);
        assert_eq!(input.mouse_delta, Vec2::new(4.0, 5.0));

        input.reset_first_mouse();
        input.on_mouse_motion(50.0, 50.0);
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn reset_frame_clears_per_frame_state() {
        let mut input = InputState::default();
        input.on_mouse_motion(0.0, 0.0);
        input.on_mouse_motion(2.0, 2.0);
        input.on_scroll(1.0);
        input.on_scroll(1.0);
        input.on_key(KeyCode::KeyW, true, false);
        assert_eq!(input.mouse_wheel_delta_y, 2.0);

        input.reset_frame();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        assert_eq!(input.mouse_wheel_delta_y, 0.0);
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));
        assert!(input.is_key_down(KeyCode::KeyW));
    }
}
