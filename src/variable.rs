//! Variables restricted to the values of a [`Domain`].

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use crate::compare::{Compare, Natural};
use crate::domain::Domain;
use crate::error::VariableError;
use crate::handle::{SlotId, SubscriberId};

/// A variable that is either unbound or bound to one value of its domain.
///
/// The variable is subscribed to its domain for its whole life: creating or cloning it
/// registers a new subscriber token, dropping it releases the token. Its binding is stored
/// in the domain registry, which lets the domain unbind it (on [`Domain::remove`]) or
/// rebind it (on [`Domain::replace`]) without the variable ever polling.
///
/// The borrow of `'d` guarantees that the domain outlives all of its variables.
pub struct RestrictedVariable<'d, T, C = Natural> {
    domain: &'d Domain<T, C>,
    subscriber: SubscriberId,
}

impl<'d, T, C> RestrictedVariable<'d, T, C> {
    /// Create a variable subscribed to `domain`, holding no value.
    pub fn unbound(domain: &'d Domain<T, C>) -> Self {
        Self {
            domain,
            subscriber: domain.subscribe(None),
        }
    }

    /// The domain this variable is subscribed to.
    pub fn domain(&self) -> &'d Domain<T, C> {
        self.domain
    }

    pub fn subscriber(&self) -> SubscriberId {
        self.subscriber
    }

    pub fn has_value(&self) -> bool {
        self.slot().is_some()
    }

    /// The slot of the bound value.
    pub fn slot(&self) -> Option<SlotId> {
        self.domain.binding(self.subscriber)
    }

    /// Unbind the variable. Does nothing if it is already unbound.
    pub fn clear(&mut self) {
        self.domain.bind(self.subscriber, None);
    }

    /// A copy of the bound value.
    pub fn value(&self) -> Result<T, VariableError>
    where
        T: Clone,
    {
        self.domain.read_bound(self.subscriber, T::clone)
    }

    /// Run `f` on the bound value.
    ///
    /// The domain is borrowed while `f` runs, so `f` must not mutate it.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, VariableError> {
        self.domain.read_bound(self.subscriber, f)
    }

    /// Move the binding out into a new variable, leaving this one unbound.
    ///
    /// Both variables stay subscribed to the same domain.
    pub fn take(&mut self) -> Self {
        let binding = self.slot();
        self.clear();
        Self {
            domain: self.domain,
            subscriber: self.domain.subscribe(binding),
        }
    }

    /// Subscribe to `domain` instead, unbound.
    pub fn attach(&mut self, domain: &'d Domain<T, C>) {
        self.retarget(domain, None);
    }

    /// Check whether both variables are subscribed to the same domain.
    pub fn same_domain(&self, other: &Self) -> bool {
        std::ptr::eq(self.domain, other.domain)
    }

    fn retarget(&mut self, domain: &'d Domain<T, C>, binding: Option<SlotId>) {
        if std::ptr::eq(self.domain, domain) {
            self.domain.bind(self.subscriber, binding);
            return;
        }
        self.domain.unsubscribe(self.subscriber);
        self.subscriber = domain.subscribe(binding);
        self.domain = domain;
    }
}

impl<'d, T, C> RestrictedVariable<'d, T, C>
where
    C: Compare<T>,
{
    /// Create a variable bound to the value of `domain` equivalent to `value`.
    ///
    /// Fails with [`VariableError::ValueNotFound`] if there is no such value.
    pub fn new<Q>(domain: &'d Domain<T, C>, value: &Q) -> Result<Self, VariableError>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let slot = domain.find(value).ok_or(VariableError::ValueNotFound)?;
        Ok(Self {
            domain,
            subscriber: domain.subscribe(Some(slot)),
        })
    }

    /// Bind to the value of the current domain equivalent to `value`.
    ///
    /// On [`VariableError::ValueNotFound`] the variable keeps its previous binding.
    pub fn set<Q>(&mut self, value: &Q) -> Result<(), VariableError>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let slot = self.domain.find(value).ok_or(VariableError::ValueNotFound)?;
        self.domain.bind(self.subscriber, Some(slot));
        Ok(())
    }

    /// Subscribe to `domain` instead, bound to its value equivalent to `value`.
    ///
    /// On [`VariableError::ValueNotFound`] nothing changes.
    pub fn rebind<Q>(&mut self, domain: &'d Domain<T, C>, value: &Q) -> Result<(), VariableError>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let slot = domain.find(value).ok_or(VariableError::ValueNotFound)?;
        self.retarget(domain, Some(slot));
        Ok(())
    }

    /// Check whether the variable is bound to the value equivalent to `value`.
    pub fn holds<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.slot() {
            Some(slot) => self.domain.find(value) == Some(slot),
            None => false,
        }
    }

    /// Compare the bound values.
    ///
    /// Variables of different domains are compared with both orderings, which must agree,
    /// otherwise this fails with [`VariableError::OrderMismatch`].
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, VariableError> {
        self.domain
            .compare_bound(self.subscriber, other.domain, other.subscriber)
    }

    /// Check whether the bound values are equivalent.
    pub fn try_eq(&self, other: &Self) -> Result<bool, VariableError> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }
}

impl<T, C> Clone for RestrictedVariable<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain,
            subscriber: self.domain.subscribe(self.slot()),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.retarget(source.domain, source.slot());
    }
}

impl<T, C> Drop for RestrictedVariable<'_, T, C> {
    fn drop(&mut self) {
        self.domain.unsubscribe(self.subscriber);
    }
}

/// Unbound variables are never equal to anything, themselves included.
impl<T, C> PartialEq for RestrictedVariable<'_, T, C>
where
    C: Compare<T>,
{
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

/// Unbound variables are incomparable.
impl<T, C> PartialOrd for RestrictedVariable<'_, T, C>
where
    C: Compare<T>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl<T, C> Debug for RestrictedVariable<'_, T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestrictedVariable")
            .field("subscriber", &self.subscriber)
            .field("slot", &self.slot())
            .finish()
    }
}
