use core::fmt;
use core::ops::{Deref, DerefMut};
use std::error::Error;

/// The terminal state of an asynchronous operation.
///
/// Every [`Operation`] settles exactly once into one of these variants. The
/// conjunction and disjunction waits resolve to an `Outcome` as well, so a
/// member's failure or cancellation is a *value* to inspect rather than an
/// error of the wait itself.
///
/// [`Operation`]: crate::future::Operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "an `Outcome` may be `Faulted` or `Canceled`, which should be handled"]
pub enum Outcome<E> {
    /// The operation ran to completion.
    Completed,
    /// The operation failed with an error.
    Faulted(E),
    /// The operation was canceled before it could complete.
    Canceled,
}

impl<E> Outcome<E> {
    /// Returns `true` if the outcome is [`Completed`][Self::Completed].
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` if the outcome is [`Faulted`][Self::Faulted].
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    /// Returns `true` if the outcome is [`Canceled`][Self::Canceled].
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Converts from `&Outcome<E>` to `Outcome<&E>`.
    pub fn as_ref(&self) -> Outcome<&E> {
        match self {
            Self::Completed => Outcome::Completed,
            Self::Faulted(err) => Outcome::Faulted(err),
            Self::Canceled => Outcome::Canceled,
        }
    }

    /// Maps the error of a faulted outcome, leaving the other variants untouched.
    pub fn map_err<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Completed => Outcome::Completed,
            Self::Faulted(err) => Outcome::Faulted(f(err)),
            Self::Canceled => Outcome::Canceled,
        }
    }

    /// Returns the error of a faulted outcome.
    pub fn err(self) -> Option<E> {
        match self {
            Self::Faulted(err) => Some(err),
            Self::Completed | Self::Canceled => None,
        }
    }

    /// Converts the outcome into a `Result` so it can be propagated with `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_observable::future::{Outcome, OutcomeError};
    ///
    /// let outcome: Outcome<std::io::Error> = Outcome::Canceled;
    /// assert!(matches!(outcome.into_result(), Err(OutcomeError::Canceled)));
    /// ```
    pub fn into_result(self) -> Result<(), OutcomeError<E>> {
        match self {
            Self::Completed => Ok(()),
            Self::Faulted(err) => Err(OutcomeError::Faulted(err)),
            Self::Canceled => Err(OutcomeError::Canceled),
        }
    }
}

impl<E> From<Result<(), E>> for Outcome<E> {
    fn from(res: Result<(), E>) -> Self {
        match res {
            Ok(()) => Self::Completed,
            Err(err) => Self::Faulted(err),
        }
    }
}

/// The error form of a non-completed [`Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum OutcomeError<E> {
    /// The operation faulted.
    #[error("operation faulted")]
    Faulted(#[source] E),
    /// The operation was canceled.
    #[error("operation was canceled")]
    Canceled,
}

/// The errors of every faulted member of a conjunction, in collection order.
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct AggregateError<E> {
    inner: Vec<E>,
}

impl<E> AggregateError<E> {
    pub(crate) fn new(inner: Vec<E>) -> Self {
        Self { inner }
    }

    /// Consume the aggregate, returning the member errors.
    pub fn into_inner(self) -> Vec<E> {
        self.inner
    }
}

impl<E: fmt::Debug> fmt::Debug for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} operations faulted", self.inner.len())?;
        for (i, err) in self.inner.iter().enumerate() {
            write!(f, "\n- error {}: {err}", i + 1)?;
        }
        Ok(())
    }
}

impl<E> Deref for AggregateError<E> {
    type Target = Vec<E>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E> DerefMut for AggregateError<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<E: Error> Error for AggregateError<E> {}
