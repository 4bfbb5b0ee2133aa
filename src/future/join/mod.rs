use core::future::Future;

pub(crate) mod vec;

/// Wait for all futures to complete.
///
/// Awaits multiple futures simultaneously, returning the output of the futures
/// once all of them complete.
pub trait Join {
    /// The resulting output type.
    type Output;

    /// Which kind of future are we turning this into?
    type Future: Future<Output = Self::Output>;

    /// Waits for multiple futures to complete.
    ///
    /// Awaits multiple futures simultaneously, returning the output of the
    /// futures in input order once all of them complete.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_observable::prelude::*;
    /// use futures_lite::future::block_on;
    /// use std::future;
    ///
    /// block_on(async {
    ///     let futures = vec![future::ready(1), future::ready(2), future::ready(3)];
    ///     assert_eq!(futures.join().await, vec![1, 2, 3]);
    /// });
    /// ```
    fn join(self) -> Self::Future;
}
