//! Reconciliation of repeated counters
//!
//! Some BIND releases repeat counter groups and cache RRsets inside one XML v3
//! document, typically once with a zero and once with the real value. These
//! functions collapse repeats by name. Which of two values survives is decided
//! by a [`ReplaceRule`]; the exporter uses [`non_zero_wins`].

use std::collections::HashMap;

use crate::bind::model::{Counter, Gauge};

/// A named value that can be deduplicated
pub trait Tally {
    fn name(&self) -> &str;
    fn value(&self) -> u64;
}

impl Tally for Counter {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> u64 {
        self.counter
    }
}

impl Tally for Gauge {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> u64 {
        self.gauge
    }
}

/// Decides whether `candidate` replaces `existing` for the same name
pub type ReplaceRule = fn(existing: u64, candidate: u64) -> bool;

/// A stored zero is replaced by any later value; a stored non-zero value is
/// never replaced. This is not "last wins": `[5, 7]` keeps 5.
pub fn non_zero_wins(existing: u64, _candidate: u64) -> bool {
    existing == 0
}

/// Collapses items sharing a name, keeping first-seen order.
///
/// Items with an empty name are dropped.
pub fn dedup<T: Tally>(items: Vec<T>, replace: ReplaceRule) -> Vec<T> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        if item.name().is_empty() {
            continue;
        }

        let position = positions.get(item.name()).copied();
        match position {
            Some(index) => {
                if replace(unique[index].value(), item.value()) {
                    unique[index] = item;
                }
            }
            None => {
                positions.insert(item.name().to_string(), unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Concatenates two sequences and deduplicates the result
pub fn merge<T: Tally>(mut first: Vec<T>, second: Vec<T>, replace: ReplaceRule) -> Vec<T> {
    first.extend(second);
    dedup(first, replace)
}

/// Counters sharing a category discriminator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterGroup {
    pub discriminator: String,
    pub counters: Vec<Counter>,
}

/// Merges groups with the same discriminator and deduplicates their counters
pub fn merge_groups(groups: Vec<CounterGroup>, replace: ReplaceRule) -> Vec<CounterGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<CounterGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        let position = positions.get(&group.discriminator).copied();
        match position {
            Some(index) => {
                let existing = std::mem::take(&mut merged[index].counters);
                merged[index].counters = merge(existing, group.counters, replace);
            }
            None => {
                positions.insert(group.discriminator.clone(), merged.len());
                merged.push(CounterGroup {
                    discriminator: group.discriminator,
                    counters: dedup(group.counters, replace),
                });
            }
        }
    }

    merged
}
