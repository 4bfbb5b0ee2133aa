use super::Join as JoinTrait;
use crate::utils::{get_pin_mut, iter_pin_mut, MaybeDone, WakerVec};

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};

/// Waits for a vector of similarly-typed futures to complete.
///
/// This `struct` is created by the [`join`] method on the [`Join`] trait. See
/// its documentation for more.
///
/// [`join`]: crate::future::Join::join
/// [`Join`]: crate::future::Join
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Join<Fut>
where
    Fut: Future,
{
    consumed: bool,
    /// The number of futures which are still in-flight.
    pending: usize,
    /// Scratch space for the indexes woken since the last poll.
    ready: Vec<usize>,
    wakers: WakerVec,
    slots: Pin<Box<[MaybeDone<Fut>]>>,
}

impl<Fut> Join<Fut>
where
    Fut: Future,
{
    pub(crate) fn new(futures: Vec<Fut>) -> Self {
        let len = futures.len();
        Join {
            consumed: false,
            pending: len,
            ready: Vec::with_capacity(len),
            wakers: WakerVec::new(len),
            slots: futures
                .into_iter()
                .map(MaybeDone::new)
                .collect::<Box<[_]>>()
                .into(),
        }
    }
}

impl<Fut> JoinTrait for Vec<Fut>
where
    Fut: IntoFuture,
{
    type Output = Vec<Fut::Output>;
    type Future = Join<Fut::IntoFuture>;

    fn join(self) -> Self::Future {
        Join::new(self.into_iter().map(IntoFuture::into_future).collect())
    }
}

impl<Fut> fmt::Debug for Join<Fut>
where
    Fut: Future + fmt::Debug,
    Fut::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.slots.iter()).finish()
    }
}

impl<Fut> Future for Join<Fut>
where
    Fut: Future,
{
    type Output = Vec<Fut::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        assert!(!this.consumed, "Futures must not be polled after completing");

        this.wakers
            .readiness()
            .lock()
            .unwrap()
            .drain_ready(cx.waker(), &mut this.ready);

        // Only poll the futures which were woken.
        for index in this.ready.drain(..) {
            let (Some(slot), Some(waker)) = (
                get_pin_mut(this.slots.as_mut(), index),
                this.wakers.get(index),
            ) else {
                continue;
            };
            if !matches!(*slot, MaybeDone::Future(_)) {
                continue;
            }
            let mut cx = Context::from_waker(waker);
            if slot.poll_done(&mut cx) {
                this.pending -= 1;
            }
        }

        if this.pending == 0 {
            this.consumed = true;
            let outputs: Vec<_> = iter_pin_mut(this.slots.as_mut())
                .filter_map(MaybeDone::take_output)
                .collect();
            debug_assert_eq!(outputs.len(), this.slots.len());
            Poll::Ready(outputs)
        } else {
            Poll::Pending
        }
    }
}
