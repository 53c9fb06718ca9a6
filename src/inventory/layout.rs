/// Slot layout descriptor
///
/// Describes which slots of a store are ghost slots. The layout is resolved
/// into one `SlotKind` per slot when a store is built or resized, so the
/// store never has to ask anyone else what a slot is.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// How a slot behaves on write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Real storage: clamped to the stack limit, marks the owner dirty
    #[default]
    Normal,
    /// Display-only placeholder for an input filter
    GhostInput,
    /// Display-only placeholder for a crafting result
    GhostOutput,
}

impl SlotKind {
    pub fn is_ghost(&self) -> bool {
        !matches!(self, SlotKind::Normal)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("slot range {start}..{end} is empty")]
    EmptyRange { start: usize, end: usize },

    #[error("slot range {start}..{end} overlaps another ghost range")]
    Overlap { start: usize, end: usize },
}

/// Ghost ranges of a store; every slot outside them is `Normal`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotLayout {
    ranges: Vec<(Range<usize>, SlotKind)>,
}

impl SlotLayout {
    /// Layout where every slot is `Normal`
    pub fn normal() -> Self {
        Self::default()
    }

    pub fn builder() -> SlotLayoutBuilder {
        SlotLayoutBuilder::default()
    }

    pub fn kind_of(&self, index: usize) -> SlotKind {
        self.ranges
            .iter()
            .find(|(range, _)| range.contains(&index))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }

    /// Resolve the kind of every slot in `0..capacity`
    pub fn resolve(&self, capacity: usize) -> Vec<SlotKind> {
        (0..capacity).map(|i| self.kind_of(i)).collect()
    }
}

#[derive(Debug, Default)]
pub struct SlotLayoutBuilder {
    ranges: Vec<(Range<usize>, SlotKind)>,
}

impl SlotLayoutBuilder {
    pub fn ghost_input(self, range: Range<usize>) -> Self {
        self.push(range, SlotKind::GhostInput)
    }

    pub fn ghost_output(self, range: Range<usize>) -> Self {
        self.push(range, SlotKind::GhostOutput)
    }

    fn push(mut self, range: Range<usize>, kind: SlotKind) -> Self {
        self.ranges.push((range, kind));
        self
    }

    pub fn build(self) -> Result<SlotLayout, LayoutError> {
        for (i, (range, _)) in self.ranges.iter().enumerate() {
            if range.is_empty() {
                return Err(LayoutError::EmptyRange {
                    start: range.start,
                    end: range.end,
                });
            }
            let overlaps = self.ranges[..i]
                .iter()
                .any(|(other, _)| range.start < other.end && other.start < range.end);
            if overlaps {
                return Err(LayoutError::Overlap {
                    start: range.start,
                    end: range.end,
                });
            }
        }
        Ok(SlotLayout {
            ranges: self.ranges,
        })
    }
}
