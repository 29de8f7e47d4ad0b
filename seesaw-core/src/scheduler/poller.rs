//! Fixed-cadence poller
//!
//! Owns mutable borrows of its tasks for its whole lifetime and ticks
//! each one when its interval has elapsed. Tasks due in the same poll run
//! in registration order.

use heapless::Vec;

use crate::traits::Tickable;

/// Maximum tasks per poller
pub const MAX_TASKS: usize = 8;

/// Returned when adding a task to a full poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollerFull;

struct Slot<'a> {
    task: &'a mut dyn Tickable,
    /// Next due time; `None` runs on the first poll
    next_due_ms: Option<u32>,
}

/// Periodic task poller
pub struct Poller<'a, const N: usize = MAX_TASKS> {
    slots: Vec<Slot<'a>, N>,
}

impl<const N: usize> Default for Poller<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> Poller<'a, N> {
    /// Create an empty poller
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a task; it runs on the next poll
    pub fn add(&mut self, task: &'a mut dyn Tickable) -> Result<(), PollerFull> {
        self.slots
            .push(Slot {
                task,
                next_due_ms: None,
            })
            .map_err(|_| PollerFull)
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no tasks are registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Tick every task that is due at `now_ms`
    ///
    /// A task that fell behind runs once and is rescheduled one interval
    /// from now; missed ticks are not replayed.
    ///
    /// Returns the number of tasks ticked.
    pub fn poll(&mut self, now_ms: u32) -> usize {
        let mut ran = 0;

        for slot in self.slots.iter_mut() {
            let due = match slot.next_due_ms {
                None => true,
                Some(due_ms) => is_due(now_ms, due_ms),
            };
            if !due {
                continue;
            }

            slot.task.tick();
            slot.next_due_ms = Some(now_ms.wrapping_add(slot.task.interval_ms().max(1)));
            ran += 1;
        }

        ran
    }

    /// Earliest time any task becomes due, `None` if a task is pending its
    /// first run or no tasks are registered
    pub fn next_due_ms(&self, now_ms: u32) -> Option<u32> {
        let mut earliest: Option<u32> = None;
        for slot in &self.slots {
            let due = slot.next_due_ms?;
            earliest = Some(match earliest {
                Some(e) if due.wrapping_sub(now_ms) as i32 >= e.wrapping_sub(now_ms) as i32 => e,
                _ => due,
            });
        }
        earliest
    }
}

/// Wrapping-safe `now >= due`
fn is_due(now_ms: u32, due_ms: u32) -> bool {
    now_ms.wrapping_sub(due_ms) as i32 >= 0
}
