//! Precedence resolution.
//!
//! Rows are evaluated in insertion order; for one query path the outcome
//! follows a small claim state machine:
//!
//! | row flag | Unclaimed      | Mapped(r)      | Excluded       |
//! |----------|----------------|----------------|----------------|
//! | Map      | Mapped(row)    | Mapped(r)      | Excluded       |
//! | Remap    | Mapped(row)    | Mapped(row)    | Mapped(row)    |
//! | Unmap    | Excluded       | Excluded       | Excluded       |
//! | Andmap   | unchanged      | unchanged      | unchanged      |
//!
//! An Unmap row also hides the ditto rows matched before it. Exclusion
//! holds on both sides: a row whose translation lands in a region an
//! Unmap covers on the other side takes no part in the lookup (for Remap
//! and Andmap rows, only a later Unmap counts).
//!
//! [`resolve_active`] marks rows that can never be the winner for any path
//! in either direction as inactive, so lookups can skip them.

use super::map_item::{Direction, MapFlag, MapItem};
use super::pattern::CaseMode;

/// Outcome of the rows seen so far for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Unclaimed,
    /// Claimed by the row at this table position.
    Mapped(usize),
    Excluded,
}

impl Claim {
    /// Feed the next matching row (at `position`) through the state machine.
    pub fn apply(self, flag: MapFlag, position: usize) -> Claim {
        match (flag, self) {
            (MapFlag::Map, Claim::Unclaimed) => Claim::Mapped(position),
            (MapFlag::Map, other) => other,
            (MapFlag::Remap, _) => Claim::Mapped(position),
            (MapFlag::Unmap, _) => Claim::Excluded,
            (MapFlag::Andmap, other) => other,
        }
    }
}

/// Tag every row with whether it can still win a lookup.
///
/// - Andmap and Unmap rows are always active.
/// - A Map row is inactive when either side lies inside an Unmap row, or
///   when both sides lie inside an earlier Map/Remap row.
/// - A Remap row is inactive when either side lies inside a later Unmap
///   row, or when both sides lie inside a later Remap row.
pub fn resolve_active(rules: &[MapItem], case: CaseMode) -> Vec<(MapItem, bool)> {
    let inside = |row: &MapItem, other: &MapItem, dir: Direction| {
        other.side(dir).contains(row.side(dir), case)
    };
    let either = |row: &MapItem, other: &MapItem| {
        inside(row, other, Direction::Lhs) || inside(row, other, Direction::Rhs)
    };
    let both = |row: &MapItem, other: &MapItem| {
        inside(row, other, Direction::Lhs) && inside(row, other, Direction::Rhs)
    };

    let shadowed = |idx: usize| {
        let row = &rules[idx];
        let excluded = |pos: usize, other: &MapItem| {
            other.flag() == MapFlag::Unmap
                && (row.flag() == MapFlag::Map || pos > idx)
                && either(row, other)
        };
        let claimed = |pos: usize, other: &MapItem| match row.flag() {
            MapFlag::Map => {
                pos < idx
                    && matches!(other.flag(), MapFlag::Map | MapFlag::Remap)
                    && both(row, other)
            }
            MapFlag::Remap => pos > idx && other.flag() == MapFlag::Remap && both(row, other),
            MapFlag::Unmap | MapFlag::Andmap => false,
        };
        matches!(row.flag(), MapFlag::Map | MapFlag::Remap)
            && rules
                .iter()
                .enumerate()
                .any(|(pos, other)| pos != idx && (excluded(pos, other) || claimed(pos, other)))
    };

    rules
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.clone(), !shadowed(idx)))
        .collect()
}
