/// Slotted inventory store
///
/// Fixed-capacity, resizable list of optional item stacks owned by a tile.
/// Each slot carries a `SlotKind` resolved from the layout. Normal slots are
/// real storage; ghost slots only hold display copies and never mark the
/// owner dirty.

use tracing::debug;

use super::container::{Container, ItemHandler};
use super::layout::{SlotKind, SlotLayout};
use super::merge::compact_stacks_with_limit;
use crate::config::InventoryConfig;
use crate::types::{Facing, ItemStack, DEFAULT_MAX_STACK_SIZE};

/// Ghost-input slots below this index are clamped to a single item on write.
/// Matches the hotbar-sized ghost region of the usual container layouts.
pub const GHOST_HOTBAR_SLOTS: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryStore {
    slots: Vec<Option<ItemStack>>,
    kinds: Vec<SlotKind>,
    layout: SlotLayout,
    stack_limit: u32,
    ghost_hotbar_slots: usize,
    dirty: bool,
}

impl InventoryStore {
    /// Create an empty store with `capacity` slots
    pub fn new(layout: SlotLayout, capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            kinds: layout.resolve(capacity),
            layout,
            stack_limit: DEFAULT_MAX_STACK_SIZE,
            ghost_hotbar_slots: GHOST_HOTBAR_SLOTS,
            dirty: false,
        }
    }

    /// Create an empty store using the limits from `config`
    pub fn with_config(layout: SlotLayout, capacity: usize, config: &InventoryConfig) -> Self {
        Self {
            stack_limit: config.stack_limit,
            ghost_hotbar_slots: config.ghost_hotbar_slots,
            ..Self::new(layout, capacity)
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Kind of the slot at `index`, `None` when out of range
    pub fn kind(&self, index: usize) -> Option<SlotKind> {
        self.kinds.get(index).copied()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn stack_limit(&self) -> u32 {
        self.stack_limit
    }

    pub fn set_stack_limit(&mut self, limit: u32) {
        self.stack_limit = limit;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Get the stack at `index`. Out-of-range reads as empty.
    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index)?.as_ref()
    }

    pub fn contains_item(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Store `stack` as-is: no kind handling, no clamping, no dirty flag
    pub fn put_stack(&mut self, index: usize, stack: Option<ItemStack>) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = stack;
        }
    }

    /// Write a slot according to its kind.
    ///
    /// Normal slots clamp the count to `limit` and mark the store dirty.
    /// Ghost-input slots inside the hotbar region hold exactly one item.
    /// Ghost-output slots keep whatever count they are given.
    pub fn set_stack(&mut self, index: usize, stack: Option<ItemStack>, limit: u32) {
        let Some(kind) = self.kind(index) else {
            return;
        };
        let stack = stack.and_then(ItemStack::non_empty);
        let hotbar = self.ghost_hotbar_slots;

        match kind {
            SlotKind::GhostInput => {
                self.slots[index] = stack.map(|mut s| {
                    if index < hotbar {
                        s.count = 1;
                    }
                    s
                });
            }
            SlotKind::GhostOutput => {
                self.slots[index] = stack;
            }
            SlotKind::Normal => {
                self.slots[index] = stack.map(|mut s| {
                    s.count = s.count.min(limit);
                    s
                });
                self.dirty = true;
            }
        }
    }

    /// Clear a slot, returning what it held
    pub fn remove(&mut self, index: usize) -> Option<ItemStack> {
        let previous = self.get(index).cloned();
        self.set_stack(index, None, self.stack_limit);
        previous
    }

    /// Take up to `amount` items out of a slot.
    ///
    /// Ghost slots are cleared outright and report the old stack with a count
    /// of zero, since nothing real was removed.
    pub fn decrement(&mut self, index: usize, amount: u32) -> Option<ItemStack> {
        let kind = self.kind(index)?;

        if kind.is_ghost() {
            let mut old = self.slots[index].take()?;
            old.count = 0;
            return Some(old);
        }

        if amount == 0 {
            return None;
        }

        let entry = &mut self.slots[index];
        let held = entry.as_ref()?.count;
        let removed = if held <= amount {
            entry.take()
        } else {
            entry.as_mut().map(|s| s.split(amount))
        };
        self.dirty = true;
        removed
    }

    /// Change the number of slots. Overlapping slots are kept; anything past
    /// the new capacity is dropped.
    pub fn resize(&mut self, capacity: usize) {
        let old = self.slots.len();
        let dropped = self.slots.iter().skip(capacity).filter(|s| s.is_some()).count();
        if dropped > 0 {
            debug!("Resizing store {} -> {} drops {} stack(s)", old, capacity, dropped);
        }
        self.slots.resize(capacity, None);
        self.kinds = self.layout.resolve(capacity);
    }

    /// Merge the normal stacks in `start..start + len` into each other,
    /// packing them to the front of the range. Ghost slots in the range are
    /// left alone and skipped over.
    pub fn compact(&mut self, start: usize, len: usize) {
        let end = start.saturating_add(len).min(self.slots.len());
        let normal: Vec<usize> = (start..end)
            .filter(|&i| self.kinds[i] == SlotKind::Normal)
            .collect();
        if normal.is_empty() {
            return;
        }

        let mut stacks: Vec<Option<ItemStack>> = normal.iter().map(|&i| self.slots[i].take()).collect();
        compact_stacks_with_limit(&mut stacks, self.stack_limit);
        for (&i, stack) in normal.iter().zip(stacks) {
            self.slots[i] = stack;
        }
        self.dirty = true;
    }
}

impl Container for InventoryStore {
    fn size(&self) -> usize {
        self.capacity()
    }

    fn get(&self, slot: usize) -> Option<&ItemStack> {
        InventoryStore::get(self, slot)
    }

    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot)?.as_mut()
    }

    fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        self.set_stack(slot, stack, self.stack_limit);
    }

    fn mark_dirty(&mut self) {
        InventoryStore::mark_dirty(self);
    }

    fn slot_limit(&self, slot: usize) -> u32 {
        match self.kind(slot) {
            Some(SlotKind::Normal) => self.stack_limit,
            Some(SlotKind::GhostInput) if slot < self.ghost_hotbar_slots => 1,
            _ => u32::MAX,
        }
    }

    fn is_item_valid(&self, slot: usize, _stack: &ItemStack) -> bool {
        self.kind(slot) == Some(SlotKind::Normal)
    }

    fn can_insert_item(&self, slot: usize, _stack: &ItemStack, _side: Option<Facing>) -> bool {
        self.kind(slot) == Some(SlotKind::Normal)
    }
}

impl ItemHandler for InventoryStore {
    fn slot_count(&self) -> usize {
        self.capacity()
    }

    fn insert_item(&mut self, slot: usize, stack: ItemStack, simulate: bool) -> Option<ItemStack> {
        if stack.is_empty() {
            return None;
        }
        if self.kind(slot) != Some(SlotKind::Normal) {
            return Some(stack);
        }

        let limit = stack.max_stack_size.min(self.stack_limit);
        let held = self.slots[slot]
            .as_ref()
            .map(|s| (s.is_mergeable_with(&stack), s.count));

        let accepted = match held {
            Some((false, _)) => 0,
            Some((true, count)) => limit.saturating_sub(count).min(stack.count),
            None => limit.min(stack.count),
        };
        if accepted == 0 {
            return Some(stack);
        }

        if !simulate {
            match self.slots[slot].as_mut() {
                Some(existing) => existing.count += accepted,
                None => self.slots[slot] = Some(stack.with_count(accepted)),
            }
            self.dirty = true;
        }
        stack.with_count(stack.count - accepted).non_empty()
    }
}
