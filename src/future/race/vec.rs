use super::Race as RaceTrait;
use crate::utils::{get_pin_mut, WakerVec};

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};

/// Wait for the first future to complete.
///
/// This `struct` is created by the [`race`] method on the [`Race`] trait. See
/// its documentation for more.
///
/// [`race`]: crate::future::Race::race
/// [`Race`]: crate::future::Race
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Race<Fut> {
    done: bool,
    ready: Vec<usize>,
    wakers: WakerVec,
    futures: Pin<Box<[Fut]>>,
}

impl<Fut> Race<Fut>
where
    Fut: Future,
{
    pub(crate) fn new(futures: Vec<Fut>) -> Self {
        let len = futures.len();
        Race {
            done: false,
            ready: Vec::with_capacity(len),
            wakers: WakerVec::new(len),
            futures: futures.into_boxed_slice().into(),
        }
    }
}

impl<Fut> RaceTrait for Vec<Fut>
where
    Fut: IntoFuture,
{
    type Output = Fut::Output;
    type Future = Race<Fut::IntoFuture>;

    fn race(self) -> Self::Future {
        Race::new(self.into_iter().map(IntoFuture::into_future).collect())
    }
}

impl<Fut> fmt::Debug for Race<Fut>
where
    Fut: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.futures.iter()).finish()
    }
}

impl<Fut> Future for Race<Fut>
where
    Fut: Future,
{
    type Output = Fut::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        assert!(!this.done, "Futures must not be polled after completing");

        this.wakers
            .readiness()
            .lock()
            .unwrap()
            .drain_ready(cx.waker(), &mut this.ready);

        // Indexes come out in wake-up order, so the future that became ready
        // first wins. On the first poll that is input order.
        for index in this.ready.drain(..) {
            let (Some(fut), Some(waker)) = (
                get_pin_mut(this.futures.as_mut(), index),
                this.wakers.get(index),
            ) else {
                continue;
            };
            let mut cx = Context::from_waker(waker);
            if let Poll::Ready(output) = fut.poll(&mut cx) {
                this.done = true;
                return Poll::Ready(output);
            }
        }

        Poll::Pending
    }
}
