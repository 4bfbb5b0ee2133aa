//! Collections whose membership can be observed while it changes.

mod observable_vec;

pub use observable_vec::{Change, ObservableVec, Subscription};
