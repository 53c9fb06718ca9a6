/// Merge engine
///
/// First-fit merging of a stack into a slot range: top up compatible stacks
/// left to right, then drop whatever is left into the first free slot.
/// Every write stays within the container's `slot_limit`, so a limited
/// container spills into further free slots instead of clamping items away.
/// Nothing here fails; a stack that does not fit simply leaves a remainder.

use std::ops::Range;
use tracing::{debug, trace};

use super::container::{Container, SlotBuffer};
use super::undo::UndoLog;
use crate::types::{Facing, ItemStack};

/// Merge `stack` into `range` of `container`, ignoring side permissions.
///
/// Returns how many items could not be placed. With `check_slots` set, slots
/// that reject the item via `is_item_valid` are skipped. Every slot touched
/// is recorded in `undo` before its first change.
pub fn merge_item_stack<C: Container + ?Sized>(
    container: &mut C,
    check_slots: bool,
    stack: &ItemStack,
    range: Range<usize>,
    undo: Option<&mut UndoLog>,
) -> u32 {
    merge_internal(container, None, check_slots, stack, range, undo)
}

/// Like [`merge_item_stack`], but also asks the container whether `side` may
/// insert into each slot
pub fn merge_item_stack_sided<C: Container + ?Sized>(
    container: &mut C,
    check_slots: bool,
    side: Option<Facing>,
    stack: &ItemStack,
    range: Range<usize>,
    undo: Option<&mut UndoLog>,
) -> u32 {
    merge_internal(container, Some(side), check_slots, stack, range, undo)
}

/// `side` is `None` for the side-blind merge, `Some(side)` for the sided one
fn merge_internal<C: Container + ?Sized>(
    container: &mut C,
    side: Option<Option<Facing>>,
    check_slots: bool,
    stack: &ItemStack,
    range: Range<usize>,
    mut undo: Option<&mut UndoLog>,
) -> u32 {
    let start = range.start;
    let stop = range.end.min(container.size());
    let mut remaining = stack.count;

    let accepts = |container: &C, slot: usize| {
        side.map_or(true, |side| container.can_insert_item(slot, stack, side))
            && (!check_slots || container.is_item_valid(slot, stack))
    };

    if stack.is_stackable() {
        for slot in start..stop {
            if remaining == 0 {
                break;
            }
            let held = match container.get(slot) {
                Some(existing) if existing.is_mergeable_with(stack) => existing.count,
                _ => continue,
            };
            if !accepts(&*container, slot) {
                continue;
            }

            let cap = stack.max_stack_size.min(container.slot_limit(slot));
            let combined = held.saturating_add(remaining);
            let new_count = if combined <= cap {
                remaining = 0;
                combined
            } else if held < cap {
                remaining -= cap - held;
                cap
            } else {
                continue;
            };

            if let Some(log) = undo.as_deref_mut() {
                log.record(slot, container.get(slot).cloned());
            }
            if let Some(existing) = container.get_mut(slot) {
                existing.count = new_count;
            }
            container.mark_dirty();
            trace!("Stacked {} into slot {} ({} -> {})", stack.item, slot, held, new_count);
        }
    }

    // Without a slot limit the whole remainder lands in the first free slot
    for slot in start..stop {
        if remaining == 0 {
            break;
        }
        if container.get(slot).is_some() || !accepts(&*container, slot) {
            continue;
        }
        let placed = remaining.min(container.slot_limit(slot));
        if placed == 0 {
            continue;
        }
        if let Some(log) = undo.as_deref_mut() {
            log.record(slot, None);
        }
        container.set(slot, Some(stack.with_count(placed)));
        container.mark_dirty();
        trace!("Placed {} x{} into empty slot {}", stack.item, placed, slot);
        remaining -= placed;
    }

    remaining
}

/// Merge every stack in `stacks` into the others, packing the result to the
/// front of the slice. Zero-count results become empty slots.
pub fn compact_stacks(stacks: &mut [Option<ItemStack>]) {
    compact_stacks_with_limit(stacks, u32::MAX);
}

/// [`compact_stacks`] for slots that hold at most `limit` items each
pub fn compact_stacks_with_limit(stacks: &mut [Option<ItemStack>], limit: u32) {
    let mut scratch = SlotBuffer::with_limit(stacks.len(), limit);
    for stack in stacks.iter().flatten() {
        let size = scratch.size();
        let lost = merge_item_stack(&mut scratch, false, stack, 0..size, None);
        if lost > 0 {
            debug!("Compaction could not place {} x{}", stack.item, lost);
        }
    }
    for (slot, stack) in stacks.iter_mut().zip(scratch.into_slots()) {
        *slot = stack.and_then(ItemStack::non_empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::layout::SlotLayout;
    use crate::inventory::store::InventoryStore;

    fn stone(count: u32) -> ItemStack {
        ItemStack::new("stone", count)
    }

    fn dirt(count: u32) -> ItemStack {
        ItemStack::new("dirt", count)
    }

    fn buffer(slots: Vec<Option<ItemStack>>) -> SlotBuffer {
        SlotBuffer::from_slots(slots)
    }

    /// Container that only takes items from above into even slots
    struct TopLoaded(SlotBuffer);

    impl Container for TopLoaded {
        fn size(&self) -> usize {
            self.0.size()
        }
        fn get(&self, slot: usize) -> Option<&ItemStack> {
            self.0.get(slot)
        }
        fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
            self.0.get_mut(slot)
        }
        fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
            self.0.set(slot, stack)
        }
        fn mark_dirty(&mut self) {
            self.0.mark_dirty()
        }
        fn can_insert_item(&self, slot: usize, _stack: &ItemStack, side: Option<Facing>) -> bool {
            side == Some(Facing::Up) && slot % 2 == 0
        }
    }

    #[test]
    fn test_merge_into_existing_stack() {
        let mut inv = buffer(vec![None, Some(stone(10)), None]);
        let rest = merge_item_stack(&mut inv, false, &stone(20), 0..3, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.slots(), &[None, Some(stone(30)), None]);
        assert!(inv.is_dirty());
    }

    #[test]
    fn test_merge_prefers_partial_stacks_left_to_right() {
        let mut inv = buffer(vec![Some(stone(1)), None, Some(stone(1))]);
        let rest = merge_item_stack(&mut inv, false, &stone(5), 0..3, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.slots(), &[Some(stone(6)), None, Some(stone(1))]);
    }

    #[test]
    fn test_merge_tops_up_then_uses_empty_slot() {
        let mut inv = buffer(vec![Some(stone(60)), Some(dirt(3)), Some(stone(62)), None]);
        let rest = merge_item_stack(&mut inv, false, &stone(10), 0..4, None);
        assert_eq!(rest, 0);
        assert_eq!(
            inv.slots(),
            &[Some(stone(64)), Some(dirt(3)), Some(stone(64)), Some(stone(4))]
        );
    }

    #[test]
    fn test_merge_overflow_leaves_remainder() {
        let mut inv = buffer(vec![Some(stone(50))]);
        let rest = merge_item_stack(&mut inv, false, &stone(30), 0..1, None);
        assert_eq!(rest, 16);
        assert_eq!(inv.get(0), Some(&stone(64)));
    }

    #[test]
    fn test_merge_skips_full_and_incompatible() {
        let tagged = stone(5).with_tag(serde_json::json!({"display": "named"}));
        let mut inv = buffer(vec![Some(stone(64)), Some(tagged.clone()), Some(stone(5).with_subtype(1))]);
        let rest = merge_item_stack(&mut inv, false, &stone(5), 0..3, None);
        assert_eq!(rest, 5);
        assert!(!inv.is_dirty());
        assert_eq!(inv.get(1), Some(&tagged));
    }

    #[test]
    fn test_merge_respects_range() {
        let mut inv = buffer(vec![Some(stone(1)), None, None, None]);
        let rest = merge_item_stack(&mut inv, false, &stone(3), 2..4, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.slots(), &[Some(stone(1)), None, Some(stone(3)), None]);

        // Range past the end is cut to the container size
        let rest = merge_item_stack(&mut inv, false, &dirt(1), 3..99, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.get(3), Some(&dirt(1)));
    }

    #[test]
    fn test_unstackable_goes_to_empty_slot() {
        let sword = ItemStack::new("sword", 1).with_max_stack_size(1);
        let mut inv = buffer(vec![Some(sword.clone()), None]);
        let rest = merge_item_stack(&mut inv, false, &sword, 0..2, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.slots(), &[Some(sword.clone()), Some(sword)]);
    }

    #[test]
    fn test_merge_records_first_prior_value() {
        let mut inv = buffer(vec![Some(stone(60)), None, None]);
        let mut undo = UndoLog::new();

        merge_item_stack(&mut inv, false, &stone(10), 0..3, Some(&mut undo));
        merge_item_stack(&mut inv, false, &stone(10), 0..3, Some(&mut undo));

        assert_eq!(undo.len(), 2);
        assert_eq!(undo.prior(0), Some(&Some(stone(60))));
        assert_eq!(undo.prior(1), Some(&None));

        undo.apply(&mut inv);
        assert_eq!(inv.slots(), &[Some(stone(60)), None, None]);
    }

    #[test]
    fn test_check_slots_skips_invalid_slots() {
        let layout = SlotLayout::builder().ghost_input(0..1).build().unwrap();
        let mut store = InventoryStore::new(layout, 2);
        store.put_stack(0, Some(stone(1)));

        let rest = merge_item_stack(&mut store, true, &stone(4), 0..2, None);
        assert_eq!(rest, 0);
        assert_eq!(store.get(0), Some(&stone(1)));
        assert_eq!(store.get(1), Some(&stone(4)));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_sided_merge_consults_side() {
        let mut inv = TopLoaded(SlotBuffer::new(4));
        let rest = merge_item_stack_sided(&mut inv, false, Some(Facing::Down), &stone(4), 0..4, None);
        assert_eq!(rest, 4);

        let rest = merge_item_stack_sided(&mut inv, false, Some(Facing::Up), &stone(4), 1..4, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.get(2), Some(&stone(4)));

        // The side-blind merge ignores the permission entirely
        let rest = merge_item_stack(&mut inv, false, &dirt(1), 0..4, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.get(0), Some(&dirt(1)));
    }

    #[test]
    fn test_merge_spills_past_store_limit() {
        let mut store = InventoryStore::new(SlotLayout::normal(), 4);
        let rest = merge_item_stack(&mut store, false, &stone(100), 0..4, None);
        assert_eq!(rest, 0);
        assert_eq!(store.get(0), Some(&stone(64)));
        assert_eq!(store.get(1), Some(&stone(36)));
    }

    #[test]
    fn test_merge_respects_stack_limit_below_max() {
        let mut store = InventoryStore::new(SlotLayout::normal(), 3);
        store.set_stack_limit(16);
        store.set_stack(0, Some(stone(10)), 16);

        let rest = merge_item_stack(&mut store, false, &stone(30), 0..3, None);
        assert_eq!(rest, 0);
        assert_eq!(store.slots(), &[Some(stone(16)), Some(stone(16)), Some(stone(8))]);

        // Whatever does not fit is reported, never dropped
        let rest = merge_item_stack(&mut store, false, &stone(20), 0..3, None);
        assert_eq!(rest, 12);
        assert_eq!(store.get(2), Some(&stone(16)));
    }

    #[test]
    fn test_unlimited_container_takes_oversize_remainder_whole() {
        let mut inv = buffer(vec![None, None]);
        let rest = merge_item_stack(&mut inv, false, &stone(100), 0..2, None);
        assert_eq!(rest, 0);
        assert_eq!(inv.slots(), &[Some(stone(100)), None]);
    }

    #[test]
    fn test_compact_stacks() {
        let mut stacks = vec![Some(stone(1)), Some(dirt(1)), None, Some(stone(1)), Some(dirt(2))];
        compact_stacks(&mut stacks);
        assert_eq!(stacks, vec![Some(stone(2)), Some(dirt(3)), None, None, None]);
    }

    #[test]
    fn test_compact_respects_max_stack_size() {
        let mut stacks = vec![Some(stone(40)), None, Some(stone(40)), Some(stone(0))];
        compact_stacks(&mut stacks);
        assert_eq!(stacks, vec![Some(stone(64)), Some(stone(16)), None, None]);
    }

    #[test]
    fn test_compact_with_limit() {
        let mut stacks = vec![Some(stone(10)), Some(dirt(1)), Some(stone(10))];
        compact_stacks_with_limit(&mut stacks, 16);
        assert_eq!(stacks, vec![Some(stone(16)), Some(dirt(1)), Some(stone(4))]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a fitting merge lands entirely on the existing stack.
            #[test]
            fn merge_within_limit_combines(a in 1u32..=64, b in 1u32..=64, slot in 0usize..6) {
                prop_assume!(a + b <= 64);
                let mut slots = vec![None; 6];
                slots[slot] = Some(stone(a));
                let mut inv = SlotBuffer::from_slots(slots);

                let rest = merge_item_stack(&mut inv, false, &stone(b), 0..6, None);
                prop_assert_eq!(rest, 0);
                prop_assert_eq!(inv.get(slot), Some(&stone(a + b)));
                prop_assert_eq!(inv.slots().iter().flatten().count(), 1);
            }

            /// Property: an overflowing merge tops up and returns the excess.
            #[test]
            fn merge_over_limit_tops_up(a in 1u32..=64, b in 1u32..=64) {
                prop_assume!(a + b > 64);
                let mut inv = SlotBuffer::from_slots(vec![Some(stone(a))]);

                let rest = merge_item_stack(&mut inv, false, &stone(b), 0..1, None);
                prop_assert_eq!(rest, a + b - 64);
                prop_assert_eq!(inv.get(0), Some(&stone(64)));
            }

            /// Property: merging into a limited store loses nothing.
            #[test]
            fn limited_merge_conserves_items(
                limit in 1u32..=64,
                held in proptest::collection::vec(proptest::option::of(1u32..=64), 1..6),
                count in 1u32..=200,
            ) {
                let mut store = InventoryStore::new(SlotLayout::normal(), held.len());
                store.set_stack_limit(limit);
                for (i, h) in held.iter().enumerate() {
                    store.set_stack(i, h.map(stone), limit);
                }
                let total = |store: &InventoryStore| -> u32 {
                    store.slots().iter().flatten().map(|s| s.count).sum()
                };
                let before = total(&store);

                let size = store.capacity();
                let rest = merge_item_stack(&mut store, false, &stone(count), 0..size, None);
                prop_assert_eq!(total(&store) + rest, before + count);
                prop_assert!(store.slots().iter().flatten().all(|s| s.count <= limit));
            }

            /// Property: compaction keeps per-item totals and leaves no gaps.
            #[test]
            fn compaction_preserves_totals(
                cells in proptest::collection::vec(proptest::option::of((0u8..3, 1u32..=64)), 1..12)
            ) {
                let names = ["stone", "dirt", "sand"];
                let mut stacks: Vec<Option<ItemStack>> = cells
                    .iter()
                    .map(|c| c.map(|(kind, count)| ItemStack::new(names[kind as usize], count)))
                    .collect();
                let total = |stacks: &[Option<ItemStack>], name: &str| -> u32 {
                    stacks.iter().flatten().filter(|s| s.item.as_str() == name).map(|s| s.count).sum()
                };
                let before: Vec<u32> = names.iter().map(|n| total(&stacks, n)).collect();

                compact_stacks(&mut stacks);

                let after: Vec<u32> = names.iter().map(|n| total(&stacks, n)).collect();
                prop_assert_eq!(before, after);
                let first_gap = stacks.iter().position(Option::is_none).unwrap_or(stacks.len());
                prop_assert!(stacks[first_gap..].iter().all(Option::is_none));
                prop_assert!(stacks.iter().flatten().all(|s| s.count > 0 && s.count <= 64));
            }
        }
    }
}
