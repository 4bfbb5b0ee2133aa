use super::Outcome;

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::sync::{Arc, Mutex, MutexGuard};

use pin_project::pin_project;
use slab::Slab;

/// A shared handle to one asynchronous unit of work.
///
/// An `Operation` settles exactly once into an [`Outcome`]. Cloning the handle
/// never clones the work: every clone observes the same terminal state, and
/// each of them can be `.await`ed any number of times. Two handles compare
/// equal when they refer to the same operation.
///
/// # Examples
///
/// ```
/// use futures_observable::future::{Operation, Outcome};
/// use futures_lite::future::block_on;
/// use std::future::IntoFuture;
///
/// let (completer, op) = Operation::<&str>::channel();
/// let observer = op.clone();
/// assert!(!op.is_terminal());
///
/// completer.fault("boom");
/// assert_eq!(block_on(observer.into_future()), Outcome::Faulted("boom"));
/// assert_eq!(op.outcome(), Some(Outcome::Faulted("boom")));
/// ```
pub struct Operation<E> {
    shared: Arc<Mutex<State<E>>>,
}

struct State<E> {
    outcome: Option<Outcome<E>>,
    waiters: Slab<Waker>,
}

impl<E> Operation<E> {
    fn from_state(outcome: Option<Outcome<E>>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(State {
                outcome,
                waiters: Slab::new(),
            })),
        }
    }

    /// Create a pending operation together with the handle that settles it.
    ///
    /// Dropping the [`Completer`] without settling cancels the operation.
    pub fn channel() -> (Completer<E>, Self) {
        let op = Self::from_state(None);
        let completer = Completer {
            operation: op.clone(),
        };
        (completer, op)
    }

    /// Create an operation settled by running `future`.
    ///
    /// The returned [`Drive`] future must be polled (usually by spawning it on
    /// an executor) for the operation to make progress. `Ok(())` completes the
    /// operation, `Err(err)` faults it, and dropping the `Drive` before it
    /// finishes cancels it.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_observable::future::{Operation, Outcome};
    /// use futures_lite::future::block_on;
    ///
    /// let (op, drive) = Operation::<()>::wrap(async { Ok(()) });
    /// block_on(drive);
    /// assert_eq!(op.outcome(), Some(Outcome::Completed));
    ///
    /// let (op, drive) = Operation::<()>::wrap(async { Ok(()) });
    /// drop(drive);
    /// assert_eq!(op.outcome(), Some(Outcome::Canceled));
    /// ```
    pub fn wrap<Fut>(future: Fut) -> (Self, Drive<Fut, E>)
    where
        Fut: Future<Output = Result<(), E>>,
    {
        let (completer, op) = Self::channel();
        let drive = Drive {
            future,
            completer: Some(completer),
        };
        (op, drive)
    }

    /// An operation that has already completed.
    pub fn completed() -> Self {
        Self::from_state(Some(Outcome::Completed))
    }

    /// An operation that has already faulted with `err`.
    pub fn faulted(err: E) -> Self {
        Self::from_state(Some(Outcome::Faulted(err)))
    }

    /// An operation that has already been canceled.
    pub fn canceled() -> Self {
        Self::from_state(Some(Outcome::Canceled))
    }

    /// Returns `true` once the operation has settled.
    pub fn is_terminal(&self) -> bool {
        self.lock().outcome.is_some()
    }

    /// Returns `true` if the operation completed.
    pub fn is_completed(&self) -> bool {
        matches!(self.lock().outcome, Some(Outcome::Completed))
    }

    /// Returns `true` if the operation faulted.
    pub fn is_faulted(&self) -> bool {
        matches!(self.lock().outcome, Some(Outcome::Faulted(_)))
    }

    /// Returns `true` if the operation was canceled.
    pub fn is_canceled(&self) -> bool {
        matches!(self.lock().outcome, Some(Outcome::Canceled))
    }

    /// Returns `true` if both handles refer to the same operation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn lock(&self) -> MutexGuard<'_, State<E>> {
        self.shared.lock().unwrap()
    }

    /// Store the outcome unless one is already set. Returns whether it was stored.
    fn settle(&self, outcome: Outcome<E>) -> bool {
        let waiters = {
            let mut state = self.lock();
            if state.outcome.is_some() {
                return false;
            }
            state.outcome = Some(outcome);
            std::mem::take(&mut state.waiters)
        };
        for (_, waker) in waiters {
            waker.wake();
        }
        true
    }
}

impl<E: Clone> Operation<E> {
    /// The outcome of the operation, once it has settled.
    pub fn outcome(&self) -> Option<Outcome<E>> {
        self.lock().outcome.clone()
    }
}

impl<E> Clone for Operation<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E> PartialEq for Operation<E> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<E> Eq for Operation<E> {}

impl<E> fmt::Debug for Operation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.lock().outcome {
            None => "Pending",
            Some(Outcome::Completed) => "Completed",
            Some(Outcome::Faulted(_)) => "Faulted",
            Some(Outcome::Canceled) => "Canceled",
        };
        f.debug_struct("Operation").field("status", &status).finish()
    }
}

impl<E: Clone> IntoFuture for Operation<E> {
    type Output = Outcome<E>;
    type IntoFuture = OperationFuture<E>;

    fn into_future(self) -> Self::IntoFuture {
        OperationFuture {
            operation: self,
            key: None,
        }
    }
}

/// Waits for an [`Operation`] to settle.
///
/// This `struct` is created by awaiting an [`Operation`]. Each
/// `OperationFuture` registers its own waker, so any number of them may wait
/// on the same operation.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct OperationFuture<E> {
    operation: Operation<E>,
    key: Option<usize>,
}

impl<E> fmt::Debug for OperationFuture<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OperationFuture")
            .field(&self.operation)
            .finish()
    }
}

impl<E: Clone> Future for OperationFuture<E> {
    type Output = Outcome<E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.operation.lock();

        if let Some(outcome) = &state.outcome {
            let outcome = outcome.clone();
            if let Some(key) = this.key.take() {
                state.waiters.try_remove(key);
            }
            return Poll::Ready(outcome);
        }

        match this.key.filter(|key| state.waiters.contains(*key)) {
            Some(key) => state.waiters[key].clone_from(cx.waker()),
            None => this.key = Some(state.waiters.insert(cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl<E> Drop for OperationFuture<E> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.operation.lock().waiters.try_remove(key);
        }
    }
}

/// Settles the [`Operation`] it was created with.
///
/// This `struct` is created by [`Operation::channel`]. Dropping it without
/// settling cancels the operation.
pub struct Completer<E> {
    operation: Operation<E>,
}

impl<E> Completer<E> {
    /// Settle the operation as completed.
    pub fn complete(self) {
        self.operation.settle(Outcome::Completed);
    }

    /// Settle the operation as faulted.
    pub fn fault(self, err: E) {
        self.operation.settle(Outcome::Faulted(err));
    }

    /// Settle the operation as canceled.
    pub fn cancel(self) {
        self.operation.settle(Outcome::Canceled);
    }

    /// Settle the operation with `res`: `Ok` completes, `Err` faults.
    pub fn finish(self, res: Result<(), E>) {
        self.operation.settle(res.into());
    }

    /// The operation this completer settles.
    pub fn operation(&self) -> &Operation<E> {
        &self.operation
    }
}

impl<E> fmt::Debug for Completer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Completer").field(&self.operation).finish()
    }
}

impl<E> Drop for Completer<E> {
    fn drop(&mut self) {
        if self.operation.settle(Outcome::Canceled) {
            tracing::trace!("completer dropped before settling, operation canceled");
        }
    }
}

/// Drives a future to completion and settles its [`Operation`].
///
/// This `struct` is created by [`Operation::wrap`]. See its documentation for
/// more.
#[pin_project]
#[must_use = "the operation makes no progress unless the `Drive` is polled"]
pub struct Drive<Fut, E> {
    #[pin]
    future: Fut,
    completer: Option<Completer<E>>,
}

impl<Fut, E> fmt::Debug for Drive<Fut, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drive")
            .field("completer", &self.completer)
            .finish()
    }
}

impl<Fut, E> Future for Drive<Fut, E>
where
    Fut: Future<Output = Result<(), E>>,
{
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        assert!(
            this.completer.is_some(),
            "`Drive` must not be polled after completing"
        );
        let res = core::task::ready!(this.future.poll(cx));
        if let Some(completer) = this.completer.take() {
            completer.finish(res);
        }
        Poll::Ready(())
    }
}
