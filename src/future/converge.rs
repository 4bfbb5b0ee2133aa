use super::combinator::{AllOf, AnyOf, Combinator};
use super::Outcome;
use crate::collections::{ObservableVec, Subscription};
use crate::utils::Signal;

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use std::sync::Arc;

use futures_core::future::FusedFuture;
use pin_project::pin_project;

/// Conjunction over a collection, converging on its final membership.
///
/// This type is created by [`ObservableVec::wait_all`]. See its documentation
/// for more.
pub type WaitAll<T> = Converge<T, AllOf>;

/// Disjunction over a collection, converging on its final membership.
///
/// This type is created by [`ObservableVec::wait_any`]. See its documentation
/// for more.
pub type WaitAny<T> = Converge<T, AnyOf>;

/// Run `combinator` over `collection`, restarting it whenever the membership
/// of the collection changes.
///
/// See [`Converge`] for more.
pub fn converge<T, C>(collection: &ObservableVec<T>, combinator: C) -> Converge<T, C>
where
    T: Clone,
    C: Combinator<T>,
{
    Converge {
        collection: collection.clone(),
        combinator,
        restarts: 0,
        state: State::Restarting,
    }
}

impl<T: Clone> ObservableVec<T> {
    /// Wait for every member to settle, following membership changes.
    ///
    /// Resolves to what [`when_all`] would return over the members the
    /// collection holds once it stops changing: operations appended during the
    /// wait are awaited as well, and removed ones no longer count. An empty
    /// collection completes immediately.
    ///
    /// [`when_all`]: crate::future::when_all
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_observable::collections::ObservableVec;
    /// use futures_observable::future::{Operation, Outcome};
    /// use futures_lite::future::block_on;
    ///
    /// let ops = ObservableVec::new();
    /// ops.push(Operation::<&str>::completed());
    ///
    /// let wait = ops.wait_all();
    /// ops.push(Operation::faulted("late"));
    ///
    /// let outcome = block_on(wait);
    /// assert_eq!(*outcome.err().unwrap(), vec!["late"]);
    /// ```
    pub fn wait_all<E>(&self) -> WaitAll<T>
    where
        T: IntoFuture<Output = Outcome<E>>,
    {
        converge(self, AllOf)
    }

    /// Wait for the first member to settle, following membership changes.
    ///
    /// Resolves to what [`when_any`] would return over the members the
    /// collection holds once it stops changing, mirroring the outcome of the
    /// first member to settle. An empty collection stays pending until a
    /// member is added.
    ///
    /// [`when_any`]: crate::future::when_any
    pub fn wait_any<E>(&self) -> WaitAny<T>
    where
        T: IntoFuture<Output = Outcome<E>>,
    {
        converge(self, AnyOf)
    }

    /// Run a custom combinator over the collection, following membership
    /// changes.
    pub fn converge<C>(&self, combinator: C) -> Converge<T, C>
    where
        C: Combinator<T>,
    {
        converge(self, combinator)
    }
}

/// Waits on a combinator over a collection whose membership may change.
///
/// Each round subscribes to the collection, takes a snapshot of its members
/// and starts the combinator over it. If the collection changes before the
/// combinator settles, the round is discarded and a new one starts over a
/// fresh snapshot. A change always wins over a combinator that settles at the
/// same time, so the output corresponds to a membership that was still
/// current when it was returned.
///
/// Each round's subscription is removed when the round ends, and when the
/// `Converge` itself is dropped.
///
/// The wait never settles while the collection keeps changing faster than the
/// combinator can settle.
///
/// This `struct` is created by [`converge`], [`ObservableVec::converge`],
/// [`ObservableVec::wait_all`] and [`ObservableVec::wait_any`].
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Converge<T, C>
where
    C: Combinator<T>,
{
    collection: ObservableVec<T>,
    combinator: C,
    restarts: usize,
    #[pin]
    state: State<T, C::Future>,
}

impl<T, C> Converge<T, C>
where
    C: Combinator<T>,
{
    /// Returns how many rounds were discarded because the collection changed.
    pub fn restarts(&self) -> usize {
        self.restarts
    }
}

#[pin_project(project = StateProj)]
enum State<T, F> {
    /// No round is in flight; the next poll starts one.
    Restarting,
    /// A combinator is running over the current snapshot.
    Waiting {
        session: WaitSession<T>,
        #[pin]
        future: F,
    },
    Resolved,
}

/// The per-round subscription and the signal it fires.
struct WaitSession<T> {
    signal: Arc<Signal>,
    _subscription: Subscription<T>,
}

impl<T: Clone> WaitSession<T> {
    /// Subscribe first, then snapshot: a change made after the snapshot is
    /// always observed by the signal.
    fn open(collection: &ObservableVec<T>) -> (Self, Vec<T>) {
        let signal = Arc::new(Signal::new());
        let subscription = collection.subscribe({
            let signal = signal.clone();
            move |_| signal.fire()
        });
        let snapshot = collection.snapshot();
        let session = Self {
            signal,
            _subscription: subscription,
        };
        (session, snapshot)
    }
}

impl<T, C> Future for Converge<T, C>
where
    T: Clone,
    C: Combinator<T>,
{
    type Output = C::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        loop {
            match this.state.as_mut().project() {
                StateProj::Restarting => {
                    let (session, snapshot) = WaitSession::open(this.collection);
                    tracing::trace!(
                        members = snapshot.len(),
                        restarts = *this.restarts,
                        "starting combinator over snapshot"
                    );
                    let future = this.combinator.start(snapshot);
                    this.state.set(State::Waiting { session, future });
                }
                StateProj::Waiting { session, future } => {
                    if session.signal.poll_fired(cx.waker()) {
                        *this.restarts += 1;
                        tracing::debug!(
                            restarts = *this.restarts,
                            "collection changed, restarting wait"
                        );
                        this.state.set(State::Restarting);
                        continue;
                    }

                    let output = ready!(future.poll(cx));

                    // A change racing with the combinator discards its output.
                    if session.signal.is_fired() {
                        *this.restarts += 1;
                        tracing::debug!(
                            restarts = *this.restarts,
                            "collection changed as the combinator settled, restarting wait"
                        );
                        this.state.set(State::Restarting);
                        continue;
                    }

                    this.state.set(State::Resolved);
                    tracing::debug!(restarts = *this.restarts, "wait resolved");
                    return Poll::Ready(output);
                }
                StateProj::Resolved => panic!("Futures must not be polled after completing"),
            }
        }
    }
}

impl<T, C> FusedFuture for Converge<T, C>
where
    T: Clone,
    C: Combinator<T>,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Resolved)
    }
}

impl<T, C> fmt::Debug for Converge<T, C>
where
    C: Combinator<T> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Restarting => "Restarting",
            State::Waiting { .. } => "Waiting",
            State::Resolved => "Resolved",
        };
        f.debug_struct("Converge")
            .field("combinator", &self.combinator)
            .field("restarts", &self.restarts)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::future::combinator::from_fn;
    use crate::future::{when_all, when_any, Operation};
    use futures::task::noop_waker_ref;
    use futures_lite::future::block_on;

    fn poll<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(fut).poll(&mut cx)
    }

    #[test]
    fn empty_all_completes() {
        let ops = ObservableVec::<Operation<()>>::new();
        assert_eq!(block_on(ops.wait_all()), Outcome::Completed);
        assert_eq!(ops.subscriber_count(), 0);
    }

    #[test]
    fn empty_any_waits_for_a_member() {
        let ops = ObservableVec::<Operation<()>>::new();
        let mut wait = Box::pin(ops.wait_any());
        assert!(poll(&mut wait).is_pending());
        assert!(poll(&mut wait).is_pending());

        ops.push(Operation::canceled());
        assert_eq!(poll(&mut wait), Poll::Ready(Outcome::Canceled));
        assert_eq!(wait.restarts(), 1);
        assert!(wait.is_terminated());
        assert_eq!(ops.subscriber_count(), 0);
    }

    #[test]
    fn append_is_awaited() {
        let (a_done, a) = Operation::<u8>::channel();
        let (c_done, c) = Operation::<u8>::channel();
        let ops = ObservableVec::from(vec![a]);

        let mut wait = Box::pin(ops.wait_all());
        assert!(poll(&mut wait).is_pending());
        ops.push(c);
        a_done.complete();
        assert!(poll(&mut wait).is_pending());
        assert_eq!(wait.restarts(), 1);

        c_done.fault(4);
        let outcome = match poll(&mut wait) {
            Poll::Ready(outcome) => outcome,
            Poll::Pending => panic!("wait should have settled"),
        };
        assert_eq!(outcome, block_on(when_all(ops.snapshot())));
    }

    #[test]
    fn wait_any_mirrors_earliest_settled() {
        let (a_done, a) = Operation::<&str>::channel();
        let (b_done, b) = Operation::<&str>::channel();
        let ops = ObservableVec::from(vec![a, b]);

        let mut wait = Box::pin(ops.wait_any());
        assert!(poll(&mut wait).is_pending());
        b_done.fault("b settled first");
        a_done.complete();
        assert_eq!(
            poll(&mut wait),
            Poll::Ready(Outcome::Faulted("b settled first"))
        );
        assert_eq!(wait.restarts(), 0);
    }

    #[test]
    fn removed_member_is_ignored() {
        let (_never, stuck) = Operation::<()>::channel();
        let ops = ObservableVec::from(vec![Operation::completed(), stuck.clone()]);

        let mut wait = Box::pin(ops.wait_all());
        assert!(poll(&mut wait).is_pending());
        assert!(ops.remove_item(&stuck));
        assert_eq!(poll(&mut wait), Poll::Ready(Outcome::Completed));
        assert_eq!(ops.subscriber_count(), 0);
    }

    #[test]
    fn change_before_first_poll_discards_round() {
        let ops = ObservableVec::from(vec![Operation::<()>::completed()]);
        let (_never, pending) = Operation::<()>::channel();

        // The first round would settle immediately, but the collection changed
        // after its snapshot was taken.
        let mut wait = Box::pin(ops.converge(from_fn({
            let ops = ops.clone();
            let mut rounds = 0;
            move |snapshot: Vec<Operation<()>>| {
                rounds += 1;
                if rounds == 1 {
                    ops.push(pending.clone());
                }
                when_any(snapshot)
            }
        })));

        assert_eq!(poll(&mut wait), Poll::Ready(Outcome::Completed));
        assert_eq!(wait.restarts(), 1);
    }

    #[test]
    fn change_while_settling_discards_output() {
        let ops = ObservableVec::from(vec![Operation::<()>::canceled()]);
        let (_never, pending) = Operation::<()>::channel();

        // The first round mutates the collection and settles within the same
        // poll. Its output must not be returned.
        let mut wait = Box::pin(ops.converge(from_fn({
            let ops = ops.clone();
            let mut rounds = 0;
            move |snapshot: Vec<Operation<()>>| {
                rounds += 1;
                let push = (rounds == 1).then(|| (ops.clone(), pending.clone()));
                async move {
                    if let Some((ops, op)) = push {
                        ops.insert(0, op);
                    }
                    when_any(snapshot).await
                }
            }
        })));

        // Second round: the pending member now comes first, the canceled one
        // still settles the disjunction.
        assert_eq!(poll(&mut wait), Poll::Ready(Outcome::Canceled));
        assert_eq!(wait.restarts(), 1);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops.subscriber_count(), 0);
    }

    #[test]
    fn no_mutation_equals_static_combinator() {
        let members = vec![
            Operation::<&str>::canceled(),
            Operation::faulted("a"),
            Operation::completed(),
        ];
        let ops = ObservableVec::from(members.clone());
        assert_eq!(block_on(ops.wait_all()), block_on(when_all(members.clone())));
        assert_eq!(block_on(ops.wait_any()), block_on(when_any(members)));
    }

    #[test]
    fn dropping_the_wait_unsubscribes() {
        let (_never, pending) = Operation::<()>::channel();
        let ops = ObservableVec::from(vec![pending]);
        let mut wait = Box::pin(ops.wait_any());
        assert!(poll(&mut wait).is_pending());
        assert_eq!(ops.subscriber_count(), 1);
        drop(wait);
        assert_eq!(ops.subscriber_count(), 0);
    }

    #[test]
    fn debug() {
        let ops = ObservableVec::<Operation<()>>::new();
        let wait = ops.wait_all();
        assert_eq!(
            format!("{wait:?}"),
            r#"Converge { combinator: AllOf, restarts: 0, state: "Restarting" }"#
        );
    }
}
