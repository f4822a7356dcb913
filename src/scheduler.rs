//! Cooperative one-shot timers for the single-threaded event loop.
//!
//! Nothing runs on its own: the loop asks [`TimerQueue::time_until_next`]
//! how long it may block waiting for input, then drains due tasks with
//! [`TimerQueue::pop_due`] and dispatches them itself.

use crate::host::{Scheduler, TaskHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    deadline: Instant,
    handle: TaskHandle,
    generation: u64,
}

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTask {
    pub handle: TaskHandle,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, deadline: Instant, generation: u64) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.entries.push(Entry {
            deadline,
            handle,
            generation,
        });
        handle
    }

    /// Removes and returns the earliest task due at `now`.
    ///
    /// Tasks with equal deadlines come out in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<DueTask> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.handle))
            .map(|(i, _)| i)?;

        let entry = self.entries.remove(idx);
        Some(DueTask {
            handle: entry.handle,
            generation: entry.generation,
        })
    }

    /// How long until the next task is due; zero when one is overdue
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.deadline.saturating_duration_since(now))
            .min()
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, generation: u64) -> TaskHandle {
        self.schedule_at(Instant::now() + delay, generation)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }
}
