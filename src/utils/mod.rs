//! Utilities to implement the different futures of this crate.

mod maybe_done;
mod pin;
mod signal;
mod wakers;

pub(crate) use maybe_done::MaybeDone;
pub(crate) use pin::{get_pin_mut, iter_pin_mut};
pub(crate) use signal::Signal;
pub(crate) use wakers::WakerVec;
