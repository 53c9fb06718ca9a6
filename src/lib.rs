//! Tile inventories for block entities
//!
//! Slotted item stores with ghost slots, first-fit stack merging, and
//! all-or-nothing insertion of several stacks at once, plus the thin glue a
//! host game needs to reach inventories in the world and inspect tiles.

pub mod config;
pub mod inventory;
pub mod logging;
pub mod probe;
pub mod types;

pub use config::{ConfigError, ConfigLoader, InventoryConfig};
pub use inventory::{
    insert_item, insert_items_atomic, insert_items_atomic_at, merge_item_stack,
    merge_item_stack_sided, Container, InsertTarget, InventoryStore, InventoryWorld, ItemHandler,
    SlotKind, SlotLayout, UndoLog,
};
pub use types::{BlockPos, Facing, ItemId, ItemStack};
