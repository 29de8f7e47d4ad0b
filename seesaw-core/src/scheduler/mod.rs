//! Polling scheduler
//!
//! Drives a set of [`Tickable`](crate::traits::Tickable) entities at their
//! own intervals from a single periodic time source.

pub mod poller;
#[cfg(feature = "embassy")]
pub mod ticker;

pub use poller::{Poller, PollerFull, MAX_TASKS};
#[cfg(feature = "embassy")]
pub use ticker::run;
