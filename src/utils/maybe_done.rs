use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use pin_project::pin_project;

/// A future that may have completed, holding its output until it is taken.
#[pin_project(project = MaybeDoneProj, project_replace = MaybeDoneReplace)]
#[derive(Debug)]
pub(crate) enum MaybeDone<Fut: Future> {
    /// A not-yet-completed future.
    Future(#[pin] Fut),
    /// The output of the completed future.
    Done(Fut::Output),
    /// The output has been taken.
    Gone,
}

impl<Fut: Future> MaybeDone<Fut> {
    pub(crate) fn new(future: Fut) -> Self {
        Self::Future(future)
    }

    /// Drive the inner future. Returns `true` once an output is stored.
    pub(crate) fn poll_done(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> bool {
        let output = match self.as_mut().project() {
            MaybeDoneProj::Future(future) => match future.poll(cx) {
                Poll::Ready(output) => output,
                Poll::Pending => return false,
            },
            MaybeDoneProj::Done(_) => return true,
            MaybeDoneProj::Gone => return false,
        };
        self.set(Self::Done(output));
        true
    }

    /// Take the stored output, leaving `Gone` behind.
    pub(crate) fn take_output(self: Pin<&mut Self>) -> Option<Fut::Output> {
        match &*self {
            Self::Done(_) => {}
            Self::Future(_) | Self::Gone => return None,
        }
        match self.project_replace(Self::Gone) {
            MaybeDoneReplace::Done(output) => Some(output),
            MaybeDoneReplace::Future(_) | MaybeDoneReplace::Gone => None,
        }
    }
}
