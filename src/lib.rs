//! # dynenum: dynamic enums for Rust
//!
//! **`dynenum`** provides enums whose set of members changes at run time.
//! A [`Domain`][crate::domain::Domain] owns the current universe of legal values, and
//! [`RestrictedVariable`][crate::variable::RestrictedVariable]s may only ever hold one of them.
//!
//! ## Why?
//!
//! With a static enum, removing a variant is a compile-time refactoring. With a dynamic one, every
//! variable holding a removed (or renamed) value would have to be found and fixed up by hand.
//! Here the domain does it: variables are subscribed to their domain, and structural mutations
//! are pushed to them synchronously.
//!
//! ## Key Features
//!
//! - **Stable Slots**: Values live in a generational arena. A variable refers to a slot, which never moves while the value is stored.
//! - **Automatic Consistency**: [`remove`][crate::domain::Domain::remove] unbinds, and [`replace`][crate::domain::Domain::replace] rebinds, every affected variable before the old slot is freed.
//! - **Custom Orderings**: Values are ordered and de-duplicated by any [`Compare`][crate::compare::Compare] strict weak ordering.
//! - **Checked Access**: Reading or comparing an unbound variable is an error, not undefined behavior.
//! - **Borrow-Checked Lifetimes**: Variables borrow their domain, so a domain cannot be dropped while they are alive.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dynenum::domain::Domain;
//! use dynenum::error::VariableError;
//!
//! // 1. Create the universe of legal values
//! let colors: Domain<&str> = ["red", "green", "blue"].into_iter().collect();
//!
//! // 2. Bind variables to members of the domain
//! let mut fg = colors.variable(&"red")?;
//! let bg = colors.variable(&"blue")?;
//! assert_eq!(fg.value(), Ok("red"));
//!
//! // 3. Values outside the domain are rejected
//! assert_eq!(fg.set(&"purple"), Err(VariableError::ValueNotFound));
//!
//! // 4. Replacing a value rebinds its variables
//! colors.replace(&"red", "crimson");
//! assert_eq!(fg.value(), Ok("crimson"));
//!
//! // 5. Removing a value unbinds its variables
//! colors.remove(&"blue");
//! assert!(!bg.has_value());
//! assert_eq!(bg.value(), Err(VariableError::Unbound));
//! # Ok::<(), VariableError>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`domain`]**: The [`Domain`][crate::domain::Domain] and its mutation protocol.
//! - **[`variable`]**: The [`RestrictedVariable`][crate::variable::RestrictedVariable] binding lifecycle.
//! - **[`compare`]**: Orderings for domain values.
//! - **[`store`]** and **[`registry`]**: The value slots and the subscriber table behind a domain.

pub mod arena;
pub mod compare;
pub mod domain;
pub mod error;
pub mod handle;
pub mod registry;
pub mod store;
pub mod variable;
