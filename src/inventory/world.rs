use tracing::debug;

use super::atomic::{commit_or_rollback, simulate_then_commit};
use super::container::{insert_into_handler, Container, ItemHandler};
use super::merge::merge_item_stack_sided;
use crate::types::{BlockPos, Facing, ItemStack};

/// Host-side lookup of inventories placed in the world
pub trait InventoryWorld {
    /// Index-addressable inventory of the tile at `pos`
    fn container_at(&mut self, pos: BlockPos) -> Option<&mut dyn Container>;

    /// Capability-style handler of the tile at `pos`, as seen from `side`
    fn item_handler_at(&mut self, pos: BlockPos, side: Option<Facing>) -> Option<&mut dyn ItemHandler>;
}

/// Resolve the neighbour of `pos` in `direction` and the face it is reached from
fn neighbour(pos: BlockPos, direction: Option<Facing>) -> (BlockPos, Option<Facing>) {
    match direction {
        Some(facing) => (pos.offset(facing), Some(facing.opposite())),
        None => (pos, None),
    }
}

/// Insert `stack` into whatever inventory sits next to `pos` in `direction`
/// (or at `pos` itself without a direction).
///
/// A capability handler is preferred over an indexed container. Returns what
/// could not be inserted, `None` when everything went in.
pub fn insert_item<W: InventoryWorld + ?Sized>(
    world: &mut W,
    pos: BlockPos,
    direction: Option<Facing>,
    stack: ItemStack,
) -> Option<ItemStack> {
    let (target, side) = neighbour(pos, direction);

    if let Some(handler) = world.item_handler_at(target, side) {
        return insert_into_handler(handler, stack, false);
    }

    if let Some(container) = world.container_at(target) {
        let size = container.size();
        let remaining = merge_item_stack_sided(container, true, side, &stack, 0..size, None);
        return stack.with_count(remaining).non_empty();
    }

    debug!("No inventory at {:?} to insert {} into", target, stack.item);
    Some(stack)
}

/// Insert all `items` into the inventory next to `pos` in `direction`, or
/// nothing at all.
///
/// An indexed container is preferred over a capability handler, since its
/// undo log gives an exact rollback. Fails when there is no inventory there.
pub fn insert_items_atomic_at<W: InventoryWorld + ?Sized>(
    world: &mut W,
    pos: BlockPos,
    direction: Option<Facing>,
    items: &[ItemStack],
) -> bool {
    let (target, side) = neighbour(pos, direction);

    if let Some(container) = world.container_at(target) {
        return commit_or_rollback(container, items);
    }

    if let Some(handler) = world.item_handler_at(target, side) {
        return simulate_then_commit(handler, items);
    }

    debug!("No inventory at {:?} for atomic insert", target);
    false
}
