use super::join::vec::Join;
use super::race::vec::Race;
use super::{AggregateError, Outcome};

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

/// Wait for every operation in a fixed sequence to settle.
///
/// The aggregate is `Faulted` with the errors of every faulted member, in
/// input order, if any member faulted. Otherwise it is `Canceled` if any
/// member was canceled, and `Completed` if all of them completed. An empty
/// sequence completes immediately. Faulted members do not short-circuit the
/// wait.
///
/// # Examples
///
/// ```
/// use futures_observable::future::{when_all, Operation, Outcome};
/// use futures_lite::future::block_on;
///
/// let members = vec![
///     Operation::completed(),
///     Operation::faulted("disk"),
///     Operation::canceled(),
///     Operation::faulted("network"),
/// ];
/// let outcome = block_on(when_all(members));
/// let errors = outcome.err().unwrap();
/// assert_eq!(*errors, vec!["disk", "network"]);
/// ```
pub fn when_all<T, E>(members: Vec<T>) -> WhenAll<T::IntoFuture>
where
    T: IntoFuture<Output = Outcome<E>>,
{
    WhenAll {
        join: Join::new(members.into_iter().map(IntoFuture::into_future).collect()),
    }
}

/// Wait for the first operation in a fixed sequence to settle.
///
/// The result mirrors the outcome of that member, whether it completed,
/// faulted or was canceled. Members that settle while the wait is pending are
/// ordered by when they settled, so a later completion never hides an earlier
/// fault. When several members had already settled before the first poll, the
/// first one in input order wins. An empty sequence never settles.
///
/// # Examples
///
/// ```
/// use futures_observable::future::{when_any, Operation, Outcome};
/// use futures_lite::future::block_on;
///
/// let (_pending, slow) = Operation::<&str>::channel();
/// let members = vec![slow, Operation::faulted("first"), Operation::completed()];
/// assert_eq!(block_on(when_any(members)), Outcome::Faulted("first"));
/// ```
pub fn when_any<T, E>(members: Vec<T>) -> WhenAny<T::IntoFuture>
where
    T: IntoFuture<Output = Outcome<E>>,
{
    WhenAny {
        race: Race::new(members.into_iter().map(IntoFuture::into_future).collect()),
    }
}

/// Conjunction over a fixed sequence of operations.
///
/// This `struct` is created by [`when_all`]. See its documentation for more.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct WhenAll<Fut>
where
    Fut: Future,
{
    #[pin]
    join: Join<Fut>,
}

impl<Fut> fmt::Debug for WhenAll<Fut>
where
    Fut: Future + fmt::Debug,
    Fut::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WhenAll").field(&self.join).finish()
    }
}

impl<Fut, E> Future for WhenAll<Fut>
where
    Fut: Future<Output = Outcome<E>>,
{
    type Output = Outcome<AggregateError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcomes = ready!(self.project().join.poll(cx));
        Poll::Ready(aggregate(outcomes))
    }
}

fn aggregate<E>(outcomes: Vec<Outcome<E>>) -> Outcome<AggregateError<E>> {
    let mut errors = Vec::new();
    let mut canceled = false;
    for outcome in outcomes {
        match outcome {
            Outcome::Completed => {}
            Outcome::Faulted(err) => errors.push(err),
            Outcome::Canceled => canceled = true,
        }
    }

    if !errors.is_empty() {
        Outcome::Faulted(AggregateError::new(errors))
    } else if canceled {
        Outcome::Canceled
    } else {
        Outcome::Completed
    }
}

/// Disjunction over a fixed sequence of operations.
///
/// This `struct` is created by [`when_any`]. See its documentation for more.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct WhenAny<Fut> {
    #[pin]
    race: Race<Fut>,
}

impl<Fut> fmt::Debug for WhenAny<Fut>
where
    Fut: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WhenAny").field(&self.race).finish()
    }
}

impl<Fut, E> Future for WhenAny<Fut>
where
    Fut: Future<Output = Outcome<E>>,
{
    type Output = Outcome<E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().race.poll(cx)
    }
}
