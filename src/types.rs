use serde::{Deserialize, Serialize};

/// Identity of an item type (e.g. `"minecraft:cobblestone"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default per-slot limit for most items
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// A quantity of identical items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,

    /// Damage/meta discriminator. `None` for items without subtypes.
    #[serde(default)]
    pub subtype: Option<u32>,

    /// Free-form tag payload, compared by exact equality
    #[serde(default)]
    pub tag: Option<serde_json::Value>,

    pub count: u32,

    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
}

fn default_max_stack_size() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: ItemId::new(item),
            subtype: None,
            tag: None,
            count,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        }
    }

    pub fn with_subtype(mut self, subtype: u32) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_tag(mut self, tag: serde_json::Value) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_max_stack_size(mut self, max: u32) -> Self {
        self.max_stack_size = max;
        self
    }

    /// Copy of this stack with a different count
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size
    }

    /// Identity, subtype and tag all match
    pub fn is_mergeable_with(&self, other: &ItemStack) -> bool {
        self.item == other.item && self.subtype == other.subtype && self.tag == other.tag
    }

    /// Split `amount` items off this stack. The returned stack may hold fewer
    /// items than asked for when this stack runs out.
    pub fn split(&mut self, amount: u32) -> ItemStack {
        let taken = amount.min(self.count);
        self.count -= taken;
        self.with_count(taken)
    }

    /// Normalize a zero count to "no stack"
    pub fn non_empty(self) -> Option<ItemStack> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// One of the six block faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Facing {
    pub fn opposite(&self) -> Facing {
        match self {
            Facing::Down => Facing::Up,
            Facing::Up => Facing::Down,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::East => Facing::West,
        }
    }

    /// Unit offset of this face as (dx, dy, dz)
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Facing::Down => (0, -1, 0),
            Facing::Up => (0, 1, 0),
            Facing::North => (0, 0, -1),
            Facing::South => (0, 0, 1),
            Facing::West => (-1, 0, 0),
            Facing::East => (1, 0, 0),
        }
    }
}

/// Block coordinate in the host world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, facing: Facing) -> BlockPos {
        let (dx, dy, dz) = facing.offset();
        BlockPos::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mergeable_requires_identity_subtype_and_tag() {
        let base = ItemStack::new("stone", 1);
        assert!(base.is_mergeable_with(&ItemStack::new("stone", 30)));
        assert!(!base.is_mergeable_with(&ItemStack::new("dirt", 1)));
        assert!(!base.is_mergeable_with(&ItemStack::new("stone", 1).with_subtype(3)));
        assert!(!base.is_mergeable_with(&ItemStack::new("stone", 1).with_tag(json!({"a": 1}))));

        let tagged = ItemStack::new("stone", 1).with_tag(json!({"a": 1}));
        assert!(tagged.is_mergeable_with(&ItemStack::new("stone", 5).with_tag(json!({"a": 1}))));
        assert!(!tagged.is_mergeable_with(&ItemStack::new("stone", 5).with_tag(json!({"a": 2}))));
    }

    #[test]
    fn test_split() {
        let mut stack = ItemStack::new("stone", 5);
        let taken = stack.split(3);
        assert_eq!(taken.count, 3);
        assert_eq!(stack.count, 2);

        let rest = stack.split(10);
        assert_eq!(rest.count, 2);
        assert!(stack.is_empty());
        assert_eq!(stack.non_empty(), None);
    }

    #[test]
    fn test_stackable() {
        assert!(ItemStack::new("stone", 1).is_stackable());
        assert!(!ItemStack::new("sword", 1).with_max_stack_size(1).is_stackable());
    }

    #[test]
    fn test_facing_and_pos() {
        for facing in [Facing::Down, Facing::Up, Facing::North, Facing::South, Facing::West, Facing::East] {
            assert_eq!(facing.opposite().opposite(), facing);
            let pos = BlockPos::new(4, 5, 6);
            assert_eq!(pos.offset(facing).offset(facing.opposite()), pos);
        }
        assert_eq!(BlockPos::new(0, 0, 0).offset(Facing::East), BlockPos::new(1, 0, 0));
    }

    #[test]
    fn test_stack_deserialize_defaults() {
        let stack: ItemStack = serde_json::from_str(r#"{"item":"stone","count":3}"#).unwrap();
        assert_eq!(stack.max_stack_size, DEFAULT_MAX_STACK_SIZE);
        assert_eq!(stack.subtype, None);
        assert_eq!(stack.tag, None);
    }
}
