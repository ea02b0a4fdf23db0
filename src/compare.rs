//! Orderings used to sort and de-duplicate domain values.
//!
//! A [`Compare`] is a *strict weak ordering*: `less` must be irreflexive and transitive, and
//! equivalence (`!less(a, b) && !less(b, a)`) must be transitive too. Two values are treated
//! as the same domain member exactly when they are equivalent.

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

pub trait Compare<T: ?Sized> {
    /// Strict "less than".
    fn less(&self, a: &T, b: &T) -> bool;

    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }

    /// Three-way comparison derived from [`less`][Compare::less].
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The natural order of `T` given by [`Ord`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: Ord + ?Sized,
{
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }

    fn cmp(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// The inner ordering, reversed.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Reversed<C>(pub C);

impl<T, C> Compare<T> for Reversed<C>
where
    T: ?Sized,
    C: Compare<T>,
{
    fn less(&self, a: &T, b: &T) -> bool {
        self.0.less(b, a)
    }
}

/// Order values by a key extracted from them.
///
/// Values with equal keys are equivalent, so a domain keeps at most one of them.
#[derive(Copy, Clone)]
pub struct ByKey<F>(pub F);

impl<T, K, F> Compare<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a) < (self.0)(b)
    }

    fn cmp(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

impl<F> Debug for ByKey<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ByKey(..)")
    }
}

/// Any `Fn(&T, &T) -> bool` used as the "less than" predicate.
#[derive(Copy, Clone)]
pub struct LessFn<F>(pub F);

impl<T, F> Compare<T> for LessFn<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> Debug for LessFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("LessFn(..)")
    }
}
