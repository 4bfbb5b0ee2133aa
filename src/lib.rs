//! Waits over collections of asynchronous operations whose membership changes
//! while they are being awaited.
//!
//! Ordinary wait combinators take their input once. When operations keep
//! being added to or removed from a collection while something waits on it,
//! the result should instead reflect the members the collection holds once it
//! stops changing. This library provides that: an observable collection, and
//! waits over it that restart every time its membership changes.
//!
//! # Operations
//!
//! - [`future::when_all`]: Wait for every operation in a fixed set to settle.
//! - [`future::when_any`]: Wait for the first operation in a fixed set to settle.
//! - [`collections::ObservableVec::wait_all`]: Wait for every member of a changing collection to settle.
//! - [`collections::ObservableVec::wait_any`]: Wait for the first member of a changing collection to settle.
//! - [`future::converge`]: Make any [`future::Combinator`] follow a changing collection.
//! - [`future::FutureExt::cancel_on`]: Stop waiting once a cancellation signal settles.
//!
//! # Examples
//!
//! ```rust
//! use futures_observable::collections::ObservableVec;
//! use futures_observable::future::{Operation, Outcome};
//! use futures_lite::future::block_on;
//!
//! let ops = ObservableVec::new();
//! ops.push(Operation::<&str>::completed());
//!
//! let wait = ops.wait_all();
//! let (done, late) = Operation::channel();
//! ops.push(late);
//! done.fault("late member failed");
//!
//! let outcome = block_on(wait);
//! assert_eq!(*outcome.err().unwrap(), vec!["late member failed"]);
//! ```
//!
//! # Liveness
//!
//! A converging wait never resolves while its collection keeps changing faster
//! than the combinator over it can settle. Every change restarts the wait, even
//! one that happens as the previous round settles.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod utils;

/// The futures-observable prelude.
pub mod prelude {
    pub use super::future::FutureExt as _;

    pub use super::future::Combinator as _;
    pub use super::future::Join as _;
    pub use super::future::Race as _;
}

pub mod collections;
pub mod future;

/// Helper functions and types for contiguous growable array type with heap-allocated contents,
/// written `Vec<T>`.
pub mod vec {
    pub use crate::future::join::vec::Join;
    pub use crate::future::race::vec::Race;
}
