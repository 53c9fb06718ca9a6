pub mod atomic;
pub mod container;
pub mod layout;
pub mod merge;
pub mod store;
pub mod undo;
pub mod world;

pub use atomic::{commit_or_rollback, insert_items_atomic, simulate_then_commit, InsertTarget};
pub use container::{insert_into_handler, Container, ItemHandler, SlotBuffer};
pub use layout::{LayoutError, SlotKind, SlotLayout, SlotLayoutBuilder};
pub use merge::{compact_stacks, compact_stacks_with_limit, merge_item_stack, merge_item_stack_sided};
pub use store::{InventoryStore, GHOST_HOTBAR_SLOTS};
pub use undo::UndoLog;
pub use world::{insert_item, insert_items_atomic_at, InventoryWorld};
