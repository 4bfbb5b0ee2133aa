use core::future::{Future, IntoFuture};

use super::CancelOn;

/// An extension trait for the `Future` trait.
pub trait FutureExt: Future {
    /// Stop waiting on the future once `signal` settles.
    ///
    /// Resolves to `Some` with the future's output, or `None` if the signal
    /// settled first. The signal is checked before the future on every poll,
    /// so a signal that is already settled wins. Once canceled, the future is
    /// dropped together with the returned `CancelOn`. Any future can serve as
    /// the signal: a timer, a channel receiver, or an [`Operation`].
    ///
    /// [`Operation`]: crate::future::Operation
    ///
    /// # Example
    ///
    /// ```
    /// use futures_observable::collections::ObservableVec;
    /// use futures_observable::future::Operation;
    /// use futures_observable::prelude::*;
    /// use futures_lite::future::block_on;
    ///
    /// let (_done, slow) = Operation::<()>::channel();
    /// let ops = ObservableVec::from(vec![slow]);
    ///
    /// let (cancel, signal) = Operation::<()>::channel();
    /// cancel.complete();
    ///
    /// let outcome = block_on(ops.wait_all().cancel_on(signal));
    /// assert!(outcome.is_none());
    /// assert_eq!(ops.subscriber_count(), 0);
    /// ```
    fn cancel_on<D>(self, signal: D) -> CancelOn<Self, D::IntoFuture>
    where
        Self: Sized,
        D: IntoFuture,
    {
        CancelOn::new(self, signal.into_future())
    }
}

impl<F> FutureExt for F where F: Future {}
