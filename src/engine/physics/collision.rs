use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
///
/// The ground probe, water volumes and Janken contacts all rely on these
/// classifications rather than on per-object tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Standable surfaces (the ground probe only hits these)
    Ground = 0b0000_0100,

    /// Water volumes (sensors)
    Water = 0b0000_1000,

    /// Janken opponents, including patrolling and chasing enemies
    Opponent = 0b0001_0000,

    /// Obstacles that shatter under a fast falling rock
    Breakable = 0b0010_0000,

    /// Trigger zones: fall death, goal, interactables, detection ranges
    Trigger = 0b0100_0000,
}

impl CollisionGroups {
    fn bits(groups: &[CollisionGroups]) -> Group {
        Group::from_bits_truncate(groups.iter().fold(0, |acc, g| acc | *g as u32))
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        use CollisionGroups::*;

        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            Player => Self::bits(&[Ground, Water, Opponent, Breakable, Trigger]),

            // Enemies walk on ground and can swim
            Opponent => Self::bits(&[Player, Ground, Water]),

            Ground => Self::bits(&[Player, Opponent]),

            Water => Self::bits(&[Player, Opponent]),

            Breakable => Self::bits(&[Player]),

            Trigger => Self::bits(&[Player]),

            Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Query groups for a downward probe cast on behalf of the player that
    /// only reports surfaces it can stand on (ground and intact breakables)
    pub fn ground_probe() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(CollisionGroups::Player as u32),
            Group::from_bits_truncate(
                CollisionGroups::Ground as u32 | CollisionGroups::Breakable as u32,
            ),
        )
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// Two colliders started touching (or a sensor started overlapping)
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
