/// Atomic multi-item insertion
///
/// Either every stack in the list ends up in the destination or none does.
/// Two strategies, picked by what the destination exposes:
/// - indexed containers merge item by item while keeping an undo log, and
///   roll everything back on the first item that does not fit;
/// - opaque handlers are filled in a simulated pass first and only then for
///   real. This is only sound if nothing else touches the handler between
///   the two passes. Simulated inserts do not see each other, so each slot
///   takes from at most one item per pass; the commit pass then repeats the
///   dry run's assignment exactly.

use tracing::{debug, warn};

use super::container::{insert_into_handler, Container, ItemHandler};
use super::merge::merge_item_stack_sided;
use super::undo::UndoLog;
use crate::types::{Facing, ItemStack};

/// Destination of an atomic insert
pub enum InsertTarget<'a> {
    Container(&'a mut dyn Container),
    Handler(&'a mut dyn ItemHandler),
}

/// Insert all `items` into `target`, or nothing at all
pub fn insert_items_atomic(items: &[ItemStack], target: InsertTarget<'_>) -> bool {
    match target {
        InsertTarget::Container(container) => commit_or_rollback(container, items),
        InsertTarget::Handler(handler) => simulate_then_commit(handler, items),
    }
}

/// Merge every item across the whole container. If one of them leaves a
/// remainder, every touched slot is restored and `false` is returned.
pub fn commit_or_rollback<C: Container + ?Sized>(container: &mut C, items: &[ItemStack]) -> bool {
    let mut undo = UndoLog::new();
    let size = container.size();

    for (i, item) in items.iter().enumerate() {
        let remaining = merge_item_stack_sided(
            container,
            false,
            Some(Facing::Down),
            item,
            0..size,
            Some(&mut undo),
        );
        if remaining > 0 {
            warn!(
                "Atomic insert failed at item {} ({} x{} left over), rolling back {} slot(s)",
                i,
                item.item,
                remaining,
                undo.len()
            );
            undo.apply(container);
            return false;
        }
    }

    debug!("Atomic insert committed {} item(s) over {} slot(s)", items.len(), undo.len());
    true
}

/// Dry-run the whole list against `handler`, then repeat it for real when
/// everything fit.
pub fn simulate_then_commit<H: ItemHandler + ?Sized>(handler: &mut H, items: &[ItemStack]) -> bool {
    if !insert_items_handler(handler, items, true) {
        debug!("Simulated insert of {} item(s) does not fit", items.len());
        return false;
    }
    if !insert_items_handler(handler, items, false) {
        warn!(
            "Handler changed between simulate and commit; insert of {} item(s) is partial",
            items.len()
        );
        return false;
    }
    true
}

/// Offer each slot to the pending items in order. The first item the slot
/// takes anything from claims it for the rest of the pass.
fn insert_items_handler<H: ItemHandler + ?Sized>(
    handler: &mut H,
    items: &[ItemStack],
    simulate: bool,
) -> bool {
    if let [single] = items {
        return insert_into_handler(handler, single.clone(), simulate).is_none();
    }

    let mut pending: Vec<Option<ItemStack>> = items.iter().cloned().map(ItemStack::non_empty).collect();
    if pending.iter().all(Option::is_none) {
        return true;
    }

    for slot in 0..handler.slot_count() {
        let mut claimed = false;
        for entry in pending.iter_mut() {
            if claimed {
                break;
            }
            let Some(stack) = entry.take() else {
                continue;
            };
            let offered = stack.count;
            *entry = handler.insert_item(slot, stack, simulate);
            claimed = entry.as_ref().map_or(0, |rest| rest.count) < offered;
        }
        if pending.iter().all(Option::is_none) {
            return true;
        }
    }

    false
}
