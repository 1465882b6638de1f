mod bloom;
mod deferred_shading;
mod gamma_correction;
mod parallax_mapping;
mod point_shadows;
mod ssao;

pub use bloom::Bloom;
pub use deferred_shading::DeferredShading;
pub use gamma_correction::GammaCorrection;
pub use parallax_mapping::ParallaxMapping;
pub use point_shadows::PointShadows;
pub use ssao::Ssao;

use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;

const CHAPTER: &str = "advanced_lighting";

/// Lowers `value` by `step` while Q is held and raises it while E is held, clamped to `min..=max`
fn adjust_with_q_e(input: &InputState, value: f32, step: f32, min: f32, max: f32) -> f32 {
    let mut value = value;
    if input.is_key_down(KeyCode::KeyQ) {
        value -= step;
    }
    if input.is_key_down(KeyCode::KeyE) {
        value += step;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_and_e_nudge_within_bounds() {
        let mut input = InputState::default();
        assert_eq!(adjust_with_q_e(&input, 0.5, 0.1, 0.0, 1.0), 0.5);

        input.on_key(KeyCode::KeyE, true, false);
        assert!((adjust_with_q_e(&input, 0.5, 0.1, 0.0, 1.0) - 0.6).abs() < 1e-6);
        assert_eq!(adjust_with_q_e(&input, 0.95, 0.1, 0.0, 1.0), 1.0);

        input.on_key(KeyCode::KeyE, false, false);
        input.on_key(KeyCode::KeyQ, true, false);
        assert_eq!(adjust_with_q_e(&input, 0.05, 0.1, 0.0, 1.0), 0.0);
    }
}
