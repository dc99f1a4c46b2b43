//! Virtual-time event queue
//!
//! Deferred work (level banners, spawn waves, level advancement) is queued
//! here against the simulation clock and drained at the start of a tick, so
//! timers always fire between ticks and tests can advance time exactly.

use serde::{Deserialize, Serialize};

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Level banner finished; spawn the initial batch
    BeginSpawning { level: u32 },
    /// Spawn the next wave of originals
    SpawnWave { level: u32 },
    /// Level cleared; move to the next one
    AdvanceLevel,
}

/// Identifies a scheduled entry for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    handle: TimerHandle,
    due_ms: f64,
    event: ScheduledEvent,
}

/// Pending events ordered by due time, then by scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: ScheduledEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        // Insert after every entry due no later, keeping FIFO among equals
        let at = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(
            at,
            Entry {
                handle,
                due_ms,
                event,
            },
        );
        handle
    }

    /// Drop a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Pop the earliest entry due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerHandle, ScheduledEvent)> {
        match self.entries.first() {
            Some(entry) if entry.due_ms <= now_ms => {
                let entry = self.entries.remove(0);
                Some((entry.handle, entry.event))
            }
            _ => None,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending events in firing order
    pub fn pending(&self) -> impl Iterator<Item = (f64, ScheduledEvent)> + '_ {
        self.entries.iter().map(|e| (e.due_ms, e.event))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300.0, ScheduledEvent::AdvanceLevel);
        scheduler.schedule(100.0, ScheduledEvent::SpawnWave { level: 1 });
        scheduler.schedule(100.0, ScheduledEvent::SpawnWave { level: 2 });

        assert!(scheduler.pop_due(99.0).is_none());
        assert_eq!(
            scheduler.pop_due(150.0).map(|(_, e)| e),
            Some(ScheduledEvent::SpawnWave { level: 1 })
        );
        assert_eq!(
            scheduler.pop_due(150.0).map(|(_, e)| e),
            Some(ScheduledEvent::SpawnWave { level: 2 })
        );
        assert!(scheduler.pop_due(150.0).is_none());
        assert_eq!(
            scheduler.pop_due(300.0).map(|(_, e)| e),
            Some(ScheduledEvent::AdvanceLevel)
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let wave = scheduler.schedule(100.0, ScheduledEvent::SpawnWave { level: 1 });
        scheduler.schedule(200.0, ScheduledEvent::AdvanceLevel);

        assert!(scheduler.is_pending(wave));
        assert!(scheduler.cancel(wave));
        assert!(!scheduler.cancel(wave));
        assert!(!scheduler.is_pending(wave));
        assert_eq!(
            scheduler.pop_due(1000.0).map(|(_, e)| e),
            Some(ScheduledEvent::AdvanceLevel)
        );
    }
}
