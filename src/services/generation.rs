//! Per-slot generation counters.
//!
//! Each request on a slot takes a ticket; only the newest ticket on a slot may
//! publish its result. Older in-flight work finishes but is discarded. A slot is
//! forgotten once its newest ticket finishes.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub slot: String,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slots {
    // Shared across slots so a forgotten slot never reissues an old generation.
    next_generation: u64,
    current: HashMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct Generations {
    slots: Mutex<Slots>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation on `slot`, superseding any ticket already issued for it.
    pub fn begin(&self, slot: &str) -> Ticket {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.next_generation += 1;
        let generation = slots.next_generation;
        slots.current.insert(slot.to_string(), generation);
        Ticket {
            slot: slot.to_string(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.current.get(&ticket.slot) == Some(&ticket.generation)
    }

    /// Ends `ticket`'s request. Returns whether it was still current, in which case the
    /// slot is released.
    pub fn finish(&self, ticket: &Ticket) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slots.current.get(&ticket.slot) != Some(&ticket.generation) {
            return false;
        }
        slots.current.remove(&ticket.slot);
        true
    }

    /// Number of slots with a request in flight.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let generations = Generations::new();
        let first = generations.begin("form-1");
        assert!(generations.is_current(&first));

        let second = generations.begin("form-1");
        assert!(!generations.is_current(&first));
        assert!(generations.is_current(&second));
    }

    #[test]
    fn slots_are_independent() {
        let generations = Generations::new();
        let a = generations.begin("a");
        let b = generations.begin("b");
        generations.begin("b");
        assert!(generations.is_current(&a));
        assert!(!generations.is_current(&b));
    }

    #[test]
    fn finished_current_ticket_releases_slot() {
        let generations = Generations::new();
        for i in 0..1_000 {
            let ticket = generations.begin(&format!("slot-{}", i));
            assert!(generations.finish(&ticket));
        }
        assert!(generations.is_empty());
    }

    #[test]
    fn stale_ticket_keeps_newer_slot() {
        let generations = Generations::new();
        let stale = generations.begin("form");
        let fresh = generations.begin("form");

        assert!(!generations.finish(&stale));
        assert_eq!(generations.len(), 1);
        assert!(generations.finish(&fresh));
        assert!(generations.is_empty());
    }

    #[test]
    fn released_slot_does_not_revive_stale_ticket() {
        let generations = Generations::new();
        let stale = generations.begin("form");
        let fresh = generations.begin("form");
        assert!(generations.finish(&fresh));

        generations.begin("form");
        assert!(!generations.finish(&stale));
    }
}
