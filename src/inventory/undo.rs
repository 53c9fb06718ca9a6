use std::collections::BTreeMap;

use super::container::Container;
use crate::types::ItemStack;

/// Prior slot contents captured during one multi-item operation.
///
/// Only the first value seen for a slot is kept, so applying the log always
/// restores the state from before the operation started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoLog {
    prior: BTreeMap<usize, Option<ItemStack>>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `prior` for `slot` unless something is already recorded
    pub fn record(&mut self, slot: usize, prior: Option<ItemStack>) {
        self.prior.entry(slot).or_insert(prior);
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.prior.contains_key(&slot)
    }

    pub fn prior(&self, slot: usize) -> Option<&Option<ItemStack>> {
        self.prior.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.prior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }

    /// Write every recorded value back into `container`
    pub fn apply<C: Container + ?Sized>(self, container: &mut C) {
        for (slot, stack) in self.prior {
            container.set(slot, stack);
        }
    }
}
