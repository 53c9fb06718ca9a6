//! Container abstractions the merge engine and atomic inserts work over.

use crate::types::{Facing, ItemStack};

/// Index-addressable inventory.
///
/// Slots are addressed by index; out-of-range indices read as empty and
/// writes to them are ignored.
pub trait Container {
    /// Number of slots
    fn size(&self) -> usize;

    fn get(&self, slot: usize) -> Option<&ItemStack>;

    /// In-place access to an occupied slot
    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack>;

    fn set(&mut self, slot: usize, stack: Option<ItemStack>);

    /// Signal that contents changed and need persisting
    fn mark_dirty(&mut self);

    /// Most items `slot` can hold, whatever the stack's own maximum.
    /// Writes through `set` above this are clamped by the container.
    fn slot_limit(&self, _slot: usize) -> u32 {
        u32::MAX
    }

    /// Whether `stack` may be placed in `slot` at all
    fn is_item_valid(&self, _slot: usize, _stack: &ItemStack) -> bool {
        true
    }

    /// Side-aware insertion permission. Containers without sides accept from
    /// everywhere.
    fn can_insert_item(&self, _slot: usize, _stack: &ItemStack, _side: Option<Facing>) -> bool {
        true
    }
}

/// Capability-style insertion interface.
///
/// The handler owns its own rules; callers only see what could not be
/// inserted. With `simulate` set the handler must not change.
pub trait ItemHandler {
    fn slot_count(&self) -> usize;

    /// Insert into one slot, returning the remainder (`None` when all fit)
    fn insert_item(&mut self, slot: usize, stack: ItemStack, simulate: bool) -> Option<ItemStack>;
}

/// Insert `stack` into the first handler slots that take it
pub fn insert_into_handler<H: ItemHandler + ?Sized>(
    handler: &mut H,
    stack: ItemStack,
    simulate: bool,
) -> Option<ItemStack> {
    let mut remaining = stack.non_empty()?;
    for slot in 0..handler.slot_count() {
        match handler.insert_item(slot, remaining, simulate) {
            Some(rest) => remaining = rest,
            None => return None,
        }
    }
    Some(remaining)
}

/// Plain list of slots with no kinds, used as scratch space.
/// Unlimited per slot unless built with [`SlotBuffer::with_limit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBuffer {
    slots: Vec<Option<ItemStack>>,
    limit: u32,
    dirty: bool,
}

impl Default for SlotBuffer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SlotBuffer {
    pub fn new(size: usize) -> Self {
        Self::from_slots(vec![None; size])
    }

    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        Self {
            slots,
            limit: u32::MAX,
            dirty: false,
        }
    }

    /// Empty buffer whose slots hold at most `limit` items each
    pub fn with_limit(size: usize, limit: u32) -> Self {
        Self {
            limit,
            ..Self::new(size)
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn into_slots(self) -> Vec<Option<ItemStack>> {
        self.slots
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }
}

impl Container for SlotBuffer {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot)?.as_mut()
    }

    fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        let limit = self.limit;
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = stack.and_then(ItemStack::non_empty).map(|mut s| {
                s.count = s.count.min(limit);
                s
            });
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn slot_limit(&self, _slot: usize) -> u32 {
        self.limit
    }
}
