//! Operations, and waits over collections of them.
//!
//! An [`Operation`] is a shared handle to one unit of asynchronous work that
//! settles exactly once into an [`Outcome`]: it either completes, faults with
//! an error, or is canceled.
//!
//! # Examples
//!
//! ```
//! use futures_observable::collections::ObservableVec;
//! use futures_observable::future::{Operation, Outcome};
//! use futures_lite::future::block_on;
//!
//! let ops = ObservableVec::new();
//! let (first, op) = Operation::<&str>::channel();
//! ops.push(op);
//!
//! let wait = ops.wait_all();
//!
//! // Joins the wait even though it was started before.
//! let (second, op) = Operation::channel();
//! ops.push(op);
//!
//! first.complete();
//! second.cancel();
//! assert_eq!(block_on(wait), Outcome::Canceled);
//! ```
//!
//! # Static and converging waits
//!
//! Waiting on a fixed set of operations is done with [`when_all`] and
//! [`when_any`]. When the set lives in an [`ObservableVec`] and may change
//! while it is being awaited, [`ObservableVec::wait_all`] and
//! [`ObservableVec::wait_any`] restart the wait over the new membership every
//! time it changes, and only resolve once the result corresponds to the
//! membership that was current at that moment.
//!
//! | Name       | Return signature           | When does it return?     |
//! | ---        | ---                        | ---                      |
//! | `when_all` | `Outcome<AggregateError>`  | Wait for all to settle
//! | `when_any` | `Outcome<E>`               | Return on first to settle
//! | `wait_all` | `Outcome<AggregateError>`  | Wait for all current members to settle
//! | `wait_any` | `Outcome<E>`               | Return on first current member to settle
//!
//! The plain [`Join`] and [`Race`] traits work on any vector of futures and do
//! not interpret their outputs. Any other combinator can be made to converge
//! by implementing [`Combinator`] for it, or by passing a closure to
//! [`combinator::from_fn`].
//!
//! [`ObservableVec`]: crate::collections::ObservableVec
//! [`ObservableVec::wait_all`]: crate::collections::ObservableVec::wait_all
//! [`ObservableVec::wait_any`]: crate::collections::ObservableVec::wait_any

pub use cancel_on::CancelOn;
pub use combinator::{AllOf, AnyOf, Combinator};
pub use converge::{converge, Converge, WaitAll, WaitAny};
pub use futures_ext::FutureExt;
pub use join::Join;
pub use operation::{Completer, Drive, Operation, OperationFuture};
pub use outcome::{AggregateError, Outcome, OutcomeError};
pub use race::Race;
pub use when::{when_all, when_any, WhenAll, WhenAny};

pub mod combinator;

mod cancel_on;
mod converge;
mod futures_ext;
pub(crate) mod join;
mod operation;
mod outcome;
pub(crate) mod race;
mod when;
