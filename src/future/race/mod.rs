use core::future::Future;

pub(crate) mod vec;

/// Wait for the first future to complete.
///
/// Awaits multiple futures simultaneously, returning as soon as one completes,
/// even if it completes with an error. All remaining futures are dropped.
pub trait Race {
    /// The resulting output type.
    type Output;

    /// The [`Future`] implementation returned by this method.
    type Future: Future<Output = Self::Output>;

    /// Wait for the first future to complete.
    ///
    /// When several futures became ready since the last poll, the one woken
    /// first wins. Futures that are already ready when the race is first
    /// polled resolve in input order. Racing an empty input never completes.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures_observable::prelude::*;
    /// use futures_lite::future::block_on;
    /// use std::future;
    ///
    /// block_on(async {
    ///     let futures = vec![future::ready("hello"), future::ready("world")];
    ///     assert_eq!(futures.race().await, "hello");
    /// });
    /// ```
    fn race(self) -> Self::Future;
}
