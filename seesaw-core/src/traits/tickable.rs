//! Periodic tick capability

/// Something driven by a periodic tick
///
/// Implementations must return promptly: every bus transaction inside
/// `tick` is bounded by the transport's timeout.
pub trait Tickable {
    /// Run one update cycle
    fn tick(&mut self);

    /// Desired interval between ticks in milliseconds
    fn interval_ms(&self) -> u32;
}

impl<T: Tickable + ?Sized> Tickable for &mut T {
    fn tick(&mut self) {
        (**self).tick();
    }

    fn interval_ms(&self) -> u32 {
        (**self).interval_ms()
    }
}
