// Pupil that follows the look direction inside the eye

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pupil {
    eyeball_radius: f32,
    offset: Vec2,
}

impl Pupil {
    pub fn new(eyeball_radius: f32) -> Self {
        Self {
            eyeball_radius,
            offset: Vec2::ZERO,
        }
    }

    /// Point the pupil along the look input
    pub fn look(&mut self, input: Vec2) {
        self.offset = input * self.eyeball_radius;
    }

    /// Pupil position relative to the eye center
    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centered() {
        assert_eq!(Pupil::new(0.5).offset(), Vec2::ZERO);
    }

    #[test]
    fn test_look_scales_by_radius() {
        let mut pupil = Pupil::new(0.5);
        pupil.look(Vec2::new(1.0, -1.0));
        assert_eq!(pupil.offset(), Vec2::new(0.5, -0.5));
        pupil.look(Vec2::ZERO);
        assert_eq!(pupil.offset(), Vec2::ZERO);
    }
}
