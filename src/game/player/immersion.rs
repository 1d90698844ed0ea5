// Overlapping water volume counter

/// What an enter/exit did to the immersed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmersionChange {
    /// First volume entered (0 -> 1)
    Submerged,
    /// Last volume left (1 -> 0)
    Surfaced,
    /// Count moved but the immersed state did not
    Unchanged,
    /// Exit with no matching enter; ignored
    Unmatched,
}

/// Counts the water volumes currently overlapping a body
///
/// A plain flag would report "dry" after leaving one of two overlapping
/// volumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmersionCounter {
    count: u32,
}

impl ImmersionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_immersed(&self) -> bool {
        self.count > 0
    }

    /// Record entering a volume
    pub fn enter(&mut self) -> ImmersionChange {
        self.count += 1;
        if self.count == 1 {
            ImmersionChange::Submerged
        } else {
            ImmersionChange::Unchanged
        }
    }

    /// Record leaving a volume; never drops below zero
    pub fn exit(&mut self) -> ImmersionChange {
        match self.count {
            0 => {
                log::warn!("Water exit without a matching enter, ignoring");
                ImmersionChange::Unmatched
            }
            1 => {
                self.count = 0;
                ImmersionChange::Surfaced
            }
            _ => {
                self.count -= 1;
                ImmersionChange::Unchanged
            }
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
