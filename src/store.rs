use std::borrow::Borrow;

use log::trace;

use crate::arena::Arena;
use crate::compare::Compare;
use crate::handle::SlotId;

/// Ordered, duplicate-free value storage.
///
/// Values live in an [`Arena`], so their [`SlotId`]s are stable. The sort order is kept in a
/// separate index of slot ids, which may shift freely on insert and erase without touching
/// the slots themselves.
pub struct ValueStore<T, C> {
    slots: Arena<SlotId, T>,
    order: Vec<SlotId>,
    compare: C,
}

impl<T, C> ValueStore<T, C> {
    pub fn new(compare: C) -> Self {
        Self::with_capacity(0, compare)
    }

    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            slots: Arena::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn compare(&self) -> &C {
        &self.compare
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, slot: SlotId) -> Option<&T> {
        self.slots.get(slot)
    }

    /// Slot ids in ascending order.
    pub fn slots(&self) -> &[SlotId] {
        &self.order
    }

    /// Values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            order: self.order.iter(),
        }
    }
}

/// Iterator over the values of a [`ValueStore`], in ascending order.
pub struct Iter<'a, T> {
    slots: &'a Arena<SlotId, T>,
    order: std::slice::Iter<'a, SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        self.order.next().map(move |&slot| &slots[slot])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        self.order.next_back().map(move |&slot| &slots[slot])
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T, C> ValueStore<T, C>
where
    C: Compare<T>,
{
    /// Binary search for the position of a value equivalent to `value`.
    ///
    /// The lookup key may be any borrowed form `Q` of the stored values, as long as the
    /// ordering on `Q` agrees with the ordering on `T`.
    fn position<Q>(&self, value: &Q) -> Result<usize, usize>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.order.binary_search_by(|&slot| {
            Compare::<Q>::cmp(&self.compare, self.slots[slot].borrow(), value)
        })
    }

    /// Find the slot holding a value equivalent to `value`.
    pub fn find<Q>(&self, value: &Q) -> Option<SlotId>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let found = self.position(value).ok().map(|pos| self.order[pos]);
        trace!("find: {:?}", found);
        found
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.position(value).is_ok()
    }

    /// Insert the value unless an equivalent one is present.
    ///
    /// Returns the slot holding the (new or already present) equivalent value,
    /// and whether an insertion happened.
    pub fn insert(&mut self, value: T) -> (SlotId, bool) {
        match self.position::<T>(&value) {
            Ok(pos) => (self.order[pos], false),
            Err(pos) => {
                let slot = self.slots.alloc(value);
                self.order.insert(pos, slot);
                (slot, true)
            }
        }
    }

    /// Overwrite the value in `slot` with an equivalent one.
    ///
    /// Returns the previous value. The caller must ensure the new value is equivalent
    /// to the old one, otherwise the sort order breaks.
    pub fn overwrite(&mut self, slot: SlotId, value: T) -> Option<T> {
        let current = self.slots.get_mut(slot)?;
        debug_assert!(self.compare.equivalent(current, &value));
        Some(std::mem::replace(current, value))
    }

    /// Remove the value in `slot` and free the slot.
    pub fn erase(&mut self, slot: SlotId) -> Option<T> {
        let value = self.slots.get(slot)?;
        let pos = self
            .position::<T>(value)
            .expect("stored value must be present in the order index");
        assert_eq!(self.order[pos], slot, "order index is out of sync");

        self.order.remove(pos);
        self.slots.free(slot)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::compare::{ByKey, Natural, Reversed};

    #[test]
    fn test_insert_sorted() {
        let mut store = ValueStore::new(Natural);
        for x in [5, 1, 4, 2, 3] {
            store.insert(x);
        }
        let values: Vec<_> = store.iter().copied().collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        let rev: Vec<_> = store.iter().rev().copied().collect();
        assert_eq!(rev, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut store = ValueStore::new(Natural);
        let (a, inserted) = store.insert(7);
        assert!(inserted);
        let (b, inserted) = store.insert(7);
        assert!(!inserted);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_and_erase() {
        let mut store = ValueStore::new(Natural);
        let (one, _) = store.insert(1);
        let (two, _) = store.insert(2);
        assert_eq!(store.find(&2), Some(two));
        assert_eq!(store.erase(two), Some(2));
        assert_eq!(store.find(&2), None);
        assert_eq!(store.erase(two), None);
        assert_eq!(store.get(one), Some(&1));
    }

    #[test]
    fn test_slots_are_stable() {
        let mut store = ValueStore::new(Natural);
        let (mid, _) = store.insert(50);
        for x in 0..100 {
            store.insert(x);
        }
        for x in (0..100).filter(|x| x % 3 == 0 && *x != 50) {
            let slot = store.find(&x).unwrap();
            store.erase(slot);
        }
        assert_eq!(store.find(&50), Some(mid));
        assert_eq!(store.get(mid), Some(&50));
    }

    #[test]
    fn test_find_by_borrowed_key() {
        let mut store = ValueStore::new(Natural);
        let (slot, _) = store.insert(String::from("red"));
        store.insert(String::from("blue"));
        assert_eq!(store.find("red"), Some(slot));
        assert!(store.contains("blue"));
        assert!(!store.contains("green"));
    }

    #[test]
    fn test_iter_is_double_ended() {
        let mut store = ValueStore::new(Natural);
        for x in 1..=4 {
            store.insert(x);
        }
        let mut iter = store.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec![&2, &3]);
    }

    #[test]
    fn test_custom_order() {
        let mut store = ValueStore::new(Reversed(Natural));
        for x in [1, 3, 2] {
            store.insert(x);
        }
        let values: Vec<_> = store.iter().copied().collect();
        assert_eq!(values, vec![3, 2, 1]);
    }

    #[test]
    fn test_overwrite_equivalent() {
        let mut store: ValueStore<(u32, &str), _> = ValueStore::new(ByKey(|p: &(u32, &str)| p.0));
        let (slot, _) = store.insert((1, "old"));
        assert_eq!(store.overwrite(slot, (1, "new")), Some((1, "old")));
        assert_eq!(store.get(slot), Some(&(1, "new")));
        assert_eq!(store.find(&(1, "")), Some(slot));
    }
}
