use thiserror::Error;

/// Errors raised by [`Domain`][crate::domain::Domain] lifecycle operations.
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomainError {
    /// The domain still has subscribed variables.
    #[error("Cannot close a domain while {subscribers} variable(s) depend on it")]
    Busy {
        /// Number of variables still subscribed
        subscribers: usize,
    },
}

/// Errors raised by [`RestrictedVariable`][crate::variable::RestrictedVariable] operations.
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum VariableError {
    /// The variable holds no value.
    #[error("Variable is not bound to a value")]
    Unbound,

    /// The requested value is not a member of the domain.
    #[error("Value is not present in the domain")]
    ValueNotFound,

    /// The two domains order the bound values differently.
    #[error("Domains order the bound values differently")]
    OrderMismatch,
}
