use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::task::Waker;

/// A one-shot flag that wakes a single task when it is fired.
///
/// Never completes on its own; it only settles when something calls
/// [`Signal::fire`].
#[derive(Debug, Default)]
pub(crate) struct Signal {
    fired: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake the registered task, if any.
    pub(crate) fn fire(&self) {
        self.fired.store(true, Ordering::SeqCst);
        let waker = self.waker.lock().unwrap().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Register `waker` to be woken on fire, then report whether the signal
    /// has already fired.
    ///
    /// The waker is stored before the flag is read, so a `fire` racing with
    /// this call is either observed here or wakes the stored waker.
    pub(crate) fn poll_fired(&self, waker: &Waker) -> bool {
        {
            let mut slot = self.waker.lock().unwrap();
            match &mut *slot {
                Some(prev) => prev.clone_from(waker),
                None => *slot = Some(waker.clone()),
            }
        }
        self.is_fired()
    }
}
