use std::fmt::{Display, Formatter};

/// A key into an [`Arena`][crate::arena::Arena]: a cell index plus the generation of that cell.
///
/// The generation is bumped every time the cell is freed, so a key that outlived its cell
/// no longer resolves, even after the cell has been reused.
pub trait ArenaKey: Copy + Eq {
    fn new(index: u32, generation: u32) -> Self;

    /// Return the index of the cell.
    fn index(self) -> usize;

    /// Return the generation of the cell at the time the key was issued.
    fn generation(self) -> u32;
}

/// Handle to a value slot inside a [`Domain`][crate::domain::Domain].
///
/// A slot id stays valid (and keeps pointing at the same value) for as long as
/// the value is stored, no matter what else is added or removed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl ArenaKey for SlotId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    fn index(self) -> usize {
        self.index as usize
    }

    fn generation(self) -> u32 {
        self.generation
    }
}

impl Display for SlotId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}#{}", self.index, self.generation)
    }
}

/// Token identifying one [`RestrictedVariable`][crate::variable::RestrictedVariable]
/// in the subscriber registry of its domain.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriberId {
    index: u32,
    generation: u32,
}

impl ArenaKey for SubscriberId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    fn index(self) -> usize {
        self.index as usize
    }

    fn generation(self) -> u32 {
        self.generation
    }
}

impl Display for SubscriberId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "&{}#{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_slot_display() {
        let slot = SlotId::new(3, 1);
        assert_eq!(slot.to_string(), "@3#1");
        assert_eq!(slot.index(), 3);
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn test_subscriber_display() {
        let sub = SubscriberId::new(0, 7);
        assert_eq!(sub.to_string(), "&0#7");
    }

    #[test]
    fn test_generation_distinguishes_keys() {
        assert_ne!(SlotId::new(1, 0), SlotId::new(1, 1));
    }
}
