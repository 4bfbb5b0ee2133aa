//! Combinators over a fixed snapshot of a collection.
//!
//! A [`Combinator`] turns one snapshot of an [`ObservableVec`] into a future.
//! [`Converge`] restarts it with a fresh snapshot every time the collection
//! changes.
//!
//! [`ObservableVec`]: crate::collections::ObservableVec
//! [`Converge`]: crate::future::Converge

use super::when::{when_all, when_any, WhenAll, WhenAny};
use super::{AggregateError, Outcome};

use core::fmt;
use core::future::{Future, IntoFuture};

/// Start a wait over a fixed sequence of members.
pub trait Combinator<T> {
    /// The resulting output type.
    type Output;

    /// The future started over each snapshot.
    type Future: Future<Output = Self::Output>;

    /// Start waiting on `snapshot`.
    fn start(&mut self, snapshot: Vec<T>) -> Self::Future;
}

/// Conjunction: wait for every member to settle.
///
/// Starts [`when_all`] over each snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllOf;

impl<T, E> Combinator<T> for AllOf
where
    T: IntoFuture<Output = Outcome<E>>,
{
    type Output = Outcome<AggregateError<E>>;
    type Future = WhenAll<T::IntoFuture>;

    fn start(&mut self, snapshot: Vec<T>) -> Self::Future {
        when_all(snapshot)
    }
}

/// Disjunction: wait for the first member to settle.
///
/// Starts [`when_any`] over each snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyOf;

impl<T, E> Combinator<T> for AnyOf
where
    T: IntoFuture<Output = Outcome<E>>,
{
    type Output = Outcome<E>;
    type Future = WhenAny<T::IntoFuture>;

    fn start(&mut self, snapshot: Vec<T>) -> Self::Future {
        when_any(snapshot)
    }
}

/// Use a closure as a [`Combinator`].
///
/// # Examples
///
/// ```
/// use futures_observable::collections::ObservableVec;
/// use futures_observable::future::combinator;
/// use futures_observable::prelude::*;
/// use futures_lite::future::block_on;
/// use std::future;
///
/// let values = ObservableVec::from(vec![1, 2, 3]);
/// let sum = values.converge(combinator::from_fn(|snapshot: Vec<i32>| {
///     future::ready(snapshot.iter().sum::<i32>())
/// }));
/// assert_eq!(block_on(sum), 6);
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

/// A [`Combinator`] backed by a closure.
///
/// This `struct` is created by [`from_fn`]. See its documentation for more.
#[derive(Clone, Copy)]
pub struct FromFn<F> {
    f: F,
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

impl<T, F, Fut> Combinator<T> for FromFn<F>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future,
{
    type Output = Fut::Output;
    type Future = Fut;

    fn start(&mut self, snapshot: Vec<T>) -> Self::Future {
        (self.f)(snapshot)
    }
}
