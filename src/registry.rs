use log::debug;

use crate::arena::Arena;
use crate::handle::{SlotId, SubscriberId};

/// Side table of the variables subscribed to a domain.
///
/// Each subscriber token maps to the binding of one variable: the slot it is bound to,
/// or `None` when unbound. The domain rewrites these bindings when it removes or
/// replaces values; variables only ever read their own entry.
#[derive(Default)]
pub struct Registry {
    bindings: Arena<SubscriberId, Option<SlotId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn subscribe(&mut self, binding: Option<SlotId>) -> SubscriberId {
        let id = self.bindings.alloc(binding);
        debug!("subscribe: {} bound to {:?}", id, binding);
        id
    }

    /// Drop the subscriber, returning its last binding.
    ///
    /// Returns `None` if the token is not (or no longer) registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> Option<Option<SlotId>> {
        let binding = self.bindings.free(id);
        debug!("unsubscribe: {} (was {:?})", id, binding);
        binding
    }

    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.bindings.contains(id)
    }

    /// Current binding of the subscriber. Unknown tokens read as unbound.
    pub fn binding(&self, id: SubscriberId) -> Option<SlotId> {
        self.bindings.get(id).copied().flatten()
    }

    pub fn bind(&mut self, id: SubscriberId, binding: Option<SlotId>) {
        self.bindings[id] = binding;
    }

    /// Unbind every subscriber bound to `slot`. Returns how many were unbound.
    pub fn notify_removed(&mut self, slot: SlotId) -> usize {
        let mut count = 0;
        for (_, binding) in self.bindings.iter_mut() {
            if *binding == Some(slot) {
                *binding = None;
                count += 1;
            }
        }
        debug!("notify_removed: {} cleared {} subscriber(s)", slot, count);
        count
    }

    /// Rebind every subscriber bound to `old` to `new`. Returns how many were rebound.
    pub fn notify_replaced(&mut self, old: SlotId, new: SlotId) -> usize {
        let mut count = 0;
        for (_, binding) in self.bindings.iter_mut() {
            if *binding == Some(old) {
                *binding = Some(new);
                count += 1;
            }
        }
        debug!(
            "notify_replaced: {} -> {} rebound {} subscriber(s)",
            old, new, count
        );
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::handle::ArenaKey;

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut registry = Registry::new();
        let slot = SlotId::new(0, 0);

        let a = registry.subscribe(Some(slot));
        let b = registry.subscribe(None);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.binding(a), Some(slot));
        assert_eq!(registry.binding(b), None);

        assert_eq!(registry.unsubscribe(a), Some(Some(slot)));
        assert_eq!(registry.unsubscribe(a), None);
        assert!(!registry.is_subscribed(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stale_token_reads_unbound() {
        let mut registry = Registry::new();
        let a = registry.subscribe(Some(SlotId::new(4, 0)));
        registry.unsubscribe(a);
        let b = registry.subscribe(Some(SlotId::new(5, 0)));
        assert_eq!(a.index(), b.index());
        assert_eq!(registry.binding(a), None);
        assert_eq!(registry.binding(b), Some(SlotId::new(5, 0)));
    }

    #[test]
    fn test_notify_removed() {
        let mut registry = Registry::new();
        let x = SlotId::new(0, 0);
        let y = SlotId::new(1, 0);

        let a = registry.subscribe(Some(x));
        let b = registry.subscribe(Some(x));
        let c = registry.subscribe(Some(y));
        let d = registry.subscribe(None);

        assert_eq!(registry.notify_removed(x), 2);
        assert_eq!(registry.binding(a), None);
        assert_eq!(registry.binding(b), None);
        assert_eq!(registry.binding(c), Some(y));
        assert_eq!(registry.binding(d), None);
    }

    #[test]
    fn test_notify_replaced() {
        let mut registry = Registry::new();
        let x = SlotId::new(0, 0);
        let y = SlotId::new(1, 0);
        let z = SlotId::new(2, 0);

        let a = registry.subscribe(Some(x));
        let b = registry.subscribe(Some(y));

        assert_eq!(registry.notify_replaced(x, z), 1);
        assert_eq!(registry.binding(a), Some(z));
        assert_eq!(registry.binding(b), Some(y));
    }
}
