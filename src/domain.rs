//! The domain: an owned, ordered universe of legal values.
//!
//! A [`Domain`] stores each value once (up to equivalence under its [`Compare`]) in a stable
//! slot, and keeps a registry of the [`RestrictedVariable`]s subscribed to it. Removing or
//! replacing a value rewrites the bindings of every variable holding it *before* the slot is
//! freed, so a bound variable always refers to a live value.
//!
//! All operations take `&self`: the state lives behind a [`RefCell`], so variables can hold
//! a shared borrow of their domain while it is being mutated. Domains are meant for
//! single-threaded use.
//!
//! Lookups accept any borrowed form of the values, like the standard maps do: a
//! `Domain<String>` can be queried with a `&str`. The ordering must then be defined on the
//! borrowed form too, and agree with the ordering of the values.

use std::borrow::Borrow;
use std::cell::{RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use log::{debug, error, trace};

use crate::compare::{Compare, Natural};
use crate::error::{DomainError, VariableError};
use crate::handle::{SlotId, SubscriberId};
use crate::registry::Registry;
use crate::store::{Iter, ValueStore};
use crate::variable::RestrictedVariable;

struct State<T, C> {
    values: ValueStore<T, C>,
    subscribers: Registry,
}

pub struct Domain<T, C = Natural> {
    state: RefCell<State<T, C>>,
    /// Tokens of variables dropped while the state was borrowed, not yet released.
    pending: RefCell<Vec<SubscriberId>>,
}

impl<T, C> Domain<T, C>
where
    C: Default,
{
    pub fn new() -> Self {
        Self::with_compare(C::default())
    }

    /// Create an empty domain with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_compare(capacity, C::default())
    }
}

impl<T, C> Default for Domain<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Domain::new()
    }
}

impl<T, C> Domain<T, C> {
    pub fn with_compare(compare: C) -> Self {
        Self::with_capacity_and_compare(0, compare)
    }

    pub fn with_capacity_and_compare(capacity: usize, compare: C) -> Self {
        Self {
            state: RefCell::new(State {
                values: ValueStore::with_capacity(capacity, compare),
                subscribers: Registry::new(),
            }),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Borrow the state mutably, releasing deferred tokens first.
    fn state_mut(&self) -> RefMut<'_, State<T, C>> {
        let mut state = self.state.borrow_mut();
        self.release_pending(&mut state);
        state
    }

    fn release_pending(&self, state: &mut State<T, C>) {
        for id in self.pending.borrow_mut().drain(..) {
            state.subscribers.unsubscribe(id);
        }
    }

    /// Number of values in the domain.
    pub fn len(&self) -> usize {
        self.state.borrow().values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.state.borrow().values.is_empty()
    }

    /// Number of live variables subscribed to the domain, bound or not.
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len() - self.pending.borrow().len()
    }
    pub fn is_busy(&self) -> bool {
        self.subscriber_count() > 0
    }

    /// Check that no variable depends on the domain anymore.
    pub fn ensure_idle(&self) -> Result<(), DomainError> {
        match self.subscriber_count() {
            0 => Ok(()),
            subscribers => Err(DomainError::Busy { subscribers }),
        }
    }

    /// Tear down the domain, failing with [`DomainError::Busy`] if variables are still subscribed.
    ///
    /// Live variables borrow their domain, so a busy domain can only be observed here when
    /// variables were leaked (for example with [`std::mem::forget`]). Their subscriptions can
    /// never be released, and the domain is dropped regardless.
    pub fn close(self) -> Result<(), DomainError> {
        self.ensure_idle()
    }

    /// Run `f` on an iterator over the values, in ascending order.
    ///
    /// The domain is borrowed while `f` runs, so `f` must not mutate it.
    pub fn with_values<R>(&self, f: impl FnOnce(Iter<'_, T>) -> R) -> R {
        let state = self.state.borrow();
        f(state.values.iter())
    }

    /// Call `f` on every value, in ascending order.
    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.with_values(|values| values.for_each(f));
    }

    /// All values in ascending order.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_values(|values| values.cloned().collect())
    }

    /// All values in descending order.
    pub fn values_rev(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_values(|values| values.rev().cloned().collect())
    }

    /// The smallest value.
    pub fn first(&self) -> Option<T>
    where
        T: Clone,
    {
        self.with_values(|mut values| values.next().cloned())
    }

    /// The largest value.
    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.with_values(|mut values| values.next_back().cloned())
    }

    /// The value stored in `slot`, if the slot is live.
    pub fn value_at(&self, slot: SlotId) -> Option<T>
    where
        T: Clone,
    {
        self.state.borrow().values.get(slot).cloned()
    }

    /// Create a variable subscribed to this domain, holding no value.
    pub fn unbound_variable(&self) -> RestrictedVariable<'_, T, C> {
        RestrictedVariable::unbound(self)
    }

    pub(crate) fn subscribe(&self, binding: Option<SlotId>) -> SubscriberId {
        self.state_mut().subscribers.subscribe(binding)
    }

    /// Release a subscriber token. Called from `Drop`, so it must not panic.
    ///
    /// If the state is borrowed (a variable dropped inside [`with_value`][RestrictedVariable::with_value]
    /// or [`with_values`][Domain::with_values]), the token is released on the next mutable borrow.
    pub(crate) fn unsubscribe(&self, id: SubscriberId) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => {
                self.release_pending(&mut state);
                state.subscribers.unsubscribe(id);
            }
            Err(_) => {
                debug!("unsubscribe: domain is borrowed, deferring {}", id);
                self.pending.borrow_mut().push(id);
            }
        }
    }

    pub(crate) fn binding(&self, id: SubscriberId) -> Option<SlotId> {
        self.state.borrow().subscribers.binding(id)
    }

    pub(crate) fn bind(&self, id: SubscriberId, binding: Option<SlotId>) {
        self.state_mut().subscribers.bind(id, binding);
    }

    /// Run `f` on the value bound to the subscriber.
    pub(crate) fn read_bound<R>(
        &self,
        id: SubscriberId,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R, VariableError> {
        let state = self.state.borrow();
        let slot = state.subscribers.binding(id).ok_or(VariableError::Unbound)?;
        let value = state.values.get(slot).ok_or(VariableError::Unbound)?;
        Ok(f(value))
    }
}

impl<T, C> Domain<T, C>
where
    C: Compare<T>,
{
    /// Create a domain pre-populated with `values`. Equivalent duplicates are skipped.
    pub fn from_values<I>(values: I, compare: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let domain = Self::with_compare(compare);
        domain.add_all(values);
        domain
    }

    /// Check whether a value equivalent to `value` is in the domain.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.state.borrow().values.contains(value)
    }

    /// The slot holding the value equivalent to `value`.
    pub fn find<Q>(&self, value: &Q) -> Option<SlotId>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.state.borrow().values.find(value)
    }

    /// Add a value unless an equivalent one is present. Returns whether it was added.
    ///
    /// Existing slots are not disturbed, and no variable is notified.
    pub fn add(&self, value: T) -> bool {
        let (slot, inserted) = self.state_mut().values.insert(value);
        if inserted {
            debug!("add: new slot {}", slot);
        } else {
            trace!("add: equivalent value already in {}", slot);
        }
        inserted
    }

    /// Add all values, skipping those equivalent to a present one. Returns how many were added.
    ///
    /// The domain is only borrowed while each value is inserted, so `values` may read it.
    pub fn add_all<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let added = values
            .into_iter()
            .filter_map(|value| {
                let (_, inserted) = self.state_mut().values.insert(value);
                inserted.then_some(())
            })
            .count();
        debug!("add_all: {} value(s) added", added);
        added
    }

    /// Remove the value equivalent to `value`. Returns whether a value was removed.
    ///
    /// Every variable bound to the removed value becomes unbound.
    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut state = self.state_mut();
        let State { values, subscribers } = &mut *state;

        let Some(slot) = values.find(value) else {
            trace!("remove: value not found");
            return false;
        };

        // Bindings must be cleared while the slot is still live.
        let cleared = subscribers.notify_removed(slot);
        values.erase(slot);

        debug!("remove: freed {}, {} variable(s) unbound", slot, cleared);
        true
    }

    /// Remove every listed value. Returns how many were removed.
    pub fn remove_all<I>(&self, values: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        values
            .into_iter()
            .filter(|value| self.remove::<T>(value.borrow()))
            .count()
    }

    /// Replace the value equivalent to `old` with `new`. Returns whether `old` was found.
    ///
    /// Variables bound to `old` end up bound to `new`. If a value equivalent to `new` is
    /// already in the domain, they are rebound to that one and `new` itself is dropped.
    /// If `new` is equivalent to `old`, the stored value is overwritten in place: the slot is
    /// kept and no variable is notified.
    pub fn replace<Q>(&self, old: &Q, new: T) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut state = self.state_mut();
        let State { values, subscribers } = &mut *state;

        let Some(old_slot) = values.find(old) else {
            trace!("replace: value not found");
            return false;
        };

        if Compare::<Q>::equivalent(values.compare(), old, new.borrow()) {
            values.overwrite(old_slot, new);
            debug!("replace: overwrote {} in place", old_slot);
            return true;
        }

        let (new_slot, inserted) = values.insert(new);
        let rebound = subscribers.notify_replaced(old_slot, new_slot);
        values.erase(old_slot);

        debug!(
            "replace: {} -> {} ({}), {} variable(s) rebound",
            old_slot,
            new_slot,
            if inserted { "inserted" } else { "merged" },
            rebound
        );
        true
    }

    /// Create a variable subscribed to this domain and bound to the value equivalent to `value`.
    pub fn variable<Q>(&self, value: &Q) -> Result<RestrictedVariable<'_, T, C>, VariableError>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        RestrictedVariable::new(self, value)
    }

    /// Compare the values bound to two subscribers.
    ///
    /// Across two domains, both orderings are consulted and must agree on the result,
    /// otherwise the comparison fails with [`VariableError::OrderMismatch`].
    pub(crate) fn compare_bound(
        &self,
        lhs: SubscriberId,
        other: &Domain<T, C>,
        rhs: SubscriberId,
    ) -> Result<Ordering, VariableError> {
        let this = self.state.borrow();
        let that = other.state.borrow();

        let a = this.subscribers.binding(lhs).ok_or(VariableError::Unbound)?;
        let b = that.subscribers.binding(rhs).ok_or(VariableError::Unbound)?;
        let same_domain = std::ptr::eq(self, other);
        if same_domain && a == b {
            return Ok(Ordering::Equal);
        }

        let x = this.values.get(a).ok_or(VariableError::Unbound)?;
        let y = that.values.get(b).ok_or(VariableError::Unbound)?;
        let ordering = this.values.compare().cmp(x, y);
        if !same_domain && that.values.compare().cmp(x, y) != ordering {
            return Err(VariableError::OrderMismatch);
        }
        Ok(ordering)
    }
}

impl<T, C> FromIterator<T> for Domain<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Domain::from_values(iter, C::default())
    }
}

impl<T, C> Debug for Domain<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domain")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T, C> Drop for Domain<T, C> {
    fn drop(&mut self) {
        let subscribers = self.state.get_mut().subscribers.len() - self.pending.get_mut().len();
        if subscribers > 0 {
            error!(
                "Domain dropped while {} variable(s) still depend on it",
                subscribers
            );
        }
    }
}
