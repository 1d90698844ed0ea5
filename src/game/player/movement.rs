// Movement rules applied by the character each physics tick
//
// Kept free of physics handles so the rules can be checked directly.

use super::stats::VariantStats;
use super::variant::Variant;

/// Which jump a press produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Standing on ground
    Ground,
    /// Swimming stroke, allowed any time while immersed
    Water,
}

/// Horizontal speed for the current contact state
pub fn move_speed(stats: &VariantStats, grounded: bool) -> f32 {
    if grounded {
        stats.ground_speed
    } else {
        stats.air_speed
    }
}

/// Horizontal velocity for a movement input
pub fn horizontal_velocity(input_x: f32, stats: &VariantStats, grounded: bool) -> f32 {
    input_x * move_speed(stats, grounded)
}

/// Decide whether a jump press does anything; ground takes precedence
pub fn jump_kind(grounded: bool, immersed: bool) -> Option<JumpKind> {
    if grounded {
        Some(JumpKind::Ground)
    } else if immersed {
        Some(JumpKind::Water)
    } else {
        None
    }
}

/// Vertical velocity after a jump: existing vertical motion is discarded
/// and the impulse added once
pub fn jump_velocity(stats: &VariantStats, kind: JumpKind) -> f32 {
    match kind {
        JumpKind::Ground => stats.jump_force,
        JumpKind::Water => stats.water_jump_force,
    }
}

/// Upward acceleration while floating; only the open hand floats
pub fn buoyancy(variant: Variant, immersed: bool, strength: f32) -> f32 {
    if immersed && variant == Variant::Paper {
        strength
    } else {
        0.0
    }
}
