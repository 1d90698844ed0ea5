// Shape state machine

use super::variant::Variant;

/// Tracks which shape the player is in
///
/// Three states, one successor edge each, no terminal state. The machine
/// only records the shape; `Character::apply_variant` pushes the matching
/// tuning into the body.
#[derive(Debug)]
pub struct ShapeStateMachine {
    current: Variant,
    previous: Variant,
}

impl ShapeStateMachine {
    pub fn new(initial: Variant) -> Self {
        Self {
            current: initial,
            previous: initial,
        }
    }

    /// Get the current shape
    pub fn current(&self) -> Variant {
        self.current
    }

    /// Get the shape before the last change
    pub fn previous(&self) -> Variant {
        self.previous
    }

    /// Move to the next shape in cycle order and return it
    pub fn advance(&mut self) -> Variant {
        self.transition(self.current.next());
        self.current
    }

    /// Switch to a specific shape
    pub fn transition(&mut self, next: Variant) {
        self.previous = self.current;
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = ShapeStateMachine::new(Variant::default());
        assert_eq!(sm.current(), Variant::Rock);
        assert_eq!(sm.previous(), Variant::Rock);
    }

    #[test]
    fn test_advance_cycles() {
        let mut sm = ShapeStateMachine::new(Variant::Rock);
        assert_eq!(sm.advance(), Variant::Scissors);
        assert_eq!(sm.advance(), Variant::Paper);
        assert_eq!(sm.advance(), Variant::Rock);
    }

    #[test]
    fn test_cyclic_closure_from_every_state() {
        for start in Variant::ALL {
            let mut sm = ShapeStateMachine::new(start);
            sm.advance();
            sm.advance();
            sm.advance();
            assert_eq!(sm.current(), start);
        }
    }

    #[test]
    fn test_previous_state_tracked() {
        let mut sm = ShapeStateMachine::new(Variant::Paper);
        sm.advance();
        assert_eq!(sm.previous(), Variant::Paper);
        assert_eq!(sm.current(), Variant::Rock);
    }

    #[test]
    fn test_direct_transition_skips_cycle_order() {
        let mut sm = ShapeStateMachine::new(Variant::Rock);
        sm.transition(Variant::Paper);
        assert_eq!(sm.current(), Variant::Paper);
        assert_eq!(sm.previous(), Variant::Rock);
    }
}
