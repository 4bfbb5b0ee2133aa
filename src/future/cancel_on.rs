use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::future::FusedFuture;

/// Abandons a future once a cancellation signal settles.
///
/// This `struct` is created by the [`cancel_on`] method on [`FutureExt`]. See its
/// documentation for more.
///
/// [`cancel_on`]: crate::future::FutureExt::cancel_on
/// [`FutureExt`]: crate::future::FutureExt
#[derive(Debug)]
#[pin_project::pin_project]
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct CancelOn<F, D> {
    #[pin]
    future: F,
    #[pin]
    signal: D,
    done: bool,
}

impl<F, D> CancelOn<F, D> {
    pub(super) fn new(future: F, signal: D) -> Self {
        Self {
            future,
            signal,
            done: false,
        }
    }
}

impl<F: Future, D: Future> Future for CancelOn<F, D> {
    type Output = Option<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        assert!(!*this.done, "future polled after completing");

        // The signal goes first: a cancellation that is already due wins.
        if this.signal.poll(cx).is_ready() {
            *this.done = true;
            tracing::trace!("wait canceled");
            return Poll::Ready(None);
        }

        match this.future.poll(cx) {
            Poll::Ready(value) => {
                *this.done = true;
                Poll::Ready(Some(value))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F: Future, D: Future> FusedFuture for CancelOn<F, D> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
