//! Embassy ticker loop
//!
//! Feeds a [`Poller`] from an `embassy-time` ticker. Spawn this from a
//! task that owns the devices:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn seesaw_task(mut device: Device) -> ! {
//!     let mut poller = Poller::<1>::new();
//!     poller.add(&mut device).ok();
//!     seesaw_core::scheduler::run(&mut poller, Duration::from_millis(10)).await
//! }
//! ```

use embassy_time::{Duration, Instant, Ticker};

use super::poller::Poller;

/// Poll forever at `period`
///
/// `period` is the scheduler resolution, not a task interval: each task
/// still runs at its own [`interval_ms`](crate::traits::Tickable::interval_ms).
pub async fn run<const N: usize>(poller: &mut Poller<'_, N>, period: Duration) -> ! {
    let mut ticker = Ticker::every(period);
    let start = Instant::now();

    loop {
        ticker.next().await;

        // Wraps after ~49 days; due checks use wrapping arithmetic
        let now_ms = start.elapsed().as_millis() as u32;
        poller.poll(now_ms);
    }
}
