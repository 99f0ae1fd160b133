//! Interval-keyed dispatcher.
//!
//! Each interval owns its own [`Dispatcher`] and the elapsed time at which it
//! last fired. On [`PeriodicDispatcher::sync`] only the groups whose interval
//! has passed since their own last firing run. Groups fire in ascending
//! interval order.

use std::collections::BTreeMap;

use super::dispatcher::{Callback, Dispatcher};
use crate::clock::Timer;

#[derive(Debug)]
struct Slot<A> {
    registry: Dispatcher<A>,
    last_fired: f64,
}

/// Dispatcher keyed by firing interval in milliseconds.
#[derive(Debug)]
pub struct PeriodicDispatcher<A> {
    timer: Timer,
    slots: BTreeMap<u64, Slot<A>>,
}

impl<A> Default for PeriodicDispatcher<A> {
    fn default() -> Self {
        Self {
            timer: Timer::new(),
            slots: BTreeMap::new(),
        }
    }
}

impl<A> PeriodicDispatcher<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Restart the elapsed clock at `time`; every group becomes due from scratch.
    pub fn reset(&mut self, time: f64) {
        self.timer.reset(time);
        for slot in self.slots.values_mut() {
            slot.last_fired = 0.0;
        }
    }

    /// Register `callback` to fire every `interval` ms. Duplicates are ignored.
    pub fn add_callback(&mut self, callback: Callback<A>, interval: u64) -> bool {
        self.slots
            .entry(interval)
            .or_insert_with(|| Slot {
                registry: Dispatcher::new(),
                last_fired: 0.0,
            })
            .registry
            .add_callback(callback)
    }

    /// Remove `callback` from its interval group, dropping the group once empty.
    pub fn remove_callback(&mut self, callback: &Callback<A>, interval: u64) -> bool {
        let Some(slot) = self.slots.get_mut(&interval) else {
            return false;
        };
        let removed = slot.registry.remove_callback(callback);
        if slot.registry.is_empty() {
            self.slots.remove(&interval);
        }
        removed
    }

    /// Callbacks registered for `interval`, or across all intervals.
    pub fn num_callbacks(&self, interval: Option<u64>) -> usize {
        match interval {
            Some(interval) => self
                .slots
                .get(&interval)
                .map(|slot| slot.registry.num_callbacks())
                .unwrap_or(0),
            None => self
                .slots
                .values()
                .map(|slot| slot.registry.num_callbacks())
                .sum(),
        }
    }

    /// Advance to `time` and fire every group whose interval has passed.
    pub fn sync(&mut self, time: f64, args: &mut A) {
        self.timer.update(time);
        let elapsed = self.timer.elapsed();
        let due: Vec<u64> = self
            .slots
            .iter()
            .filter(|(interval, slot)| elapsed - slot.last_fired > **interval as f64)
            .map(|(interval, _)| *interval)
            .collect();

        for interval in due {
            // A callback earlier in this sync may have emptied the group.
            if let Some(slot) = self.slots.get_mut(&interval) {
                slot.registry.dispatch(args);
                slot.last_fired = elapsed;
            }
        }
        self.slots.retain(|_, slot| !slot.registry.is_empty());
    }
}
