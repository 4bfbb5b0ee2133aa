use std::sync::{Arc, Mutex};
use std::task::{Wake, Waker};

use fixedbitset::FixedBitSet;

/// Tracks which child futures were woken since they were last polled, and in
/// which order.
#[derive(Debug)]
pub(crate) struct Readiness {
    ready: FixedBitSet,
    /// Ready indexes in the order of their first wake-up.
    order: Vec<usize>,
    parent_waker: Option<Waker>,
}

impl Readiness {
    /// Every child starts out ready, in index order, so the first poll reaches
    /// all of them.
    fn new(len: usize) -> Self {
        let mut ready = FixedBitSet::with_capacity(len);
        ready.insert_range(..);
        Self {
            ready,
            order: (0..len).collect(),
            parent_waker: None,
        }
    }

    /// Mark the child at `index` as ready.
    ///
    /// Returns whether it was already marked.
    pub(crate) fn set_ready(&mut self, index: usize) -> bool {
        let was_ready = self.ready.put(index);
        if !was_ready {
            self.order.push(index);
        }
        was_ready
    }

    /// Store the parent waker and move every ready index into `buf`, in the
    /// order the children were woken, clearing them.
    pub(crate) fn drain_ready(&mut self, parent_waker: &Waker, buf: &mut Vec<usize>) {
        match &mut self.parent_waker {
            Some(prev) => prev.clone_from(parent_waker),
            None => self.parent_waker = Some(parent_waker.clone()),
        }
        buf.append(&mut self.order);
        self.ready.clear();
    }
}

/// Waker handed to a single child; records its index before waking the parent.
struct ChildWaker {
    index: usize,
    readiness: Arc<Mutex<Readiness>>,
}

impl Wake for ChildWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let mut readiness = self.readiness.lock().unwrap();
        if !readiness.set_ready(self.index) {
            // The parent only needs waking on the first wake-up between polls.
            if let Some(waker) = &readiness.parent_waker {
                waker.wake_by_ref();
            }
        }
    }
}

/// One waker per child future, sharing a single readiness set.
pub(crate) struct WakerVec {
    wakers: Vec<Waker>,
    readiness: Arc<Mutex<Readiness>>,
}

impl WakerVec {
    pub(crate) fn new(len: usize) -> Self {
        let readiness = Arc::new(Mutex::new(Readiness::new(len)));
        let wakers = (0..len)
            .map(|index| {
                Waker::from(Arc::new(ChildWaker {
                    index,
                    readiness: readiness.clone(),
                }))
            })
            .collect();
        Self { wakers, readiness }
    }

    /// The waker to poll the child at `index` with.
    pub(crate) fn get(&self, index: usize) -> Option<&Waker> {
        self.wakers.get(index)
    }

    pub(crate) fn readiness(&self) -> &Mutex<Readiness> {
        &self.readiness
    }
}
