// Math utilities and helper functions

use glam::Vec2;

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Unit vector from `from` to `to`, falling back to straight up when the
/// points coincide
pub fn direction_or_up(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::Y)
}

/// Convert a linear 0..=1 volume into decibels (-80 dB floor)
pub fn linear_to_decibels(volume: f32) -> f32 {
    volume.max(0.0001).log10() * 20.0
}
