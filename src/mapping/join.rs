//! Table composition: join and restrict.
//!
//! Both walk every (A row, B row) pair, intersect the facing halves and
//! rebuild a rule from each intersection. Join keeps the outer halves
//! (A: X→Y joined with B on Y gives X→Z); restrict keeps A's own halves,
//! narrowed to what B lets through.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::map_item::{Direction, MapFlag, MapItem};
use super::map_table::MapTable;
use super::pattern::{CaseMode, Pattern};
use super::pattern_join::{Intersection, TooWild, intersect};

/// Upper bound on rows in one composed table.
const MAX_JOIN_ROWS: usize = 100_000;

const TOO_WILD_REASON: &str = "too many wildcards";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOp {
    Join,
    Restrict,
}

impl fmt::Display for JoinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinOp::Join => "join",
            JoinOp::Restrict => "restrict",
        })
    }
}

impl MapTable {
    /// Compose `self` with `other`, matching `self`'s `dir` side against
    /// `other`'s `other_dir` side. Rows map `self`'s opposite side to
    /// `other`'s opposite side.
    pub fn join(&self, dir: Direction, other: &MapTable, other_dir: Direction) -> MapTable {
        self.compose(JoinOp::Join, dir, other, other_dir, None)
    }

    /// Narrow `self` to the part of its `dir` side that `other`'s
    /// `other_dir` side covers. Rows keep `self`'s halves.
    pub fn restrict(&self, dir: Direction, other: &MapTable, other_dir: Direction) -> MapTable {
        self.compose(JoinOp::Restrict, dir, other, other_dir, None)
    }

    /// General form of [`Self::join`] and [`Self::restrict`]. `reason`
    /// becomes the emptyReason when the result maps nothing and neither
    /// operand carried one.
    pub fn compose(
        &self,
        op: JoinOp,
        dir: Direction,
        other: &MapTable,
        other_dir: Direction,
        reason: Option<&str>,
    ) -> MapTable {
        let case = match self.case_mode() {
            CaseMode::Default => other.case_mode(),
            mode => mode,
        };
        let mut result = MapTable::with_case(case);

        let mut pairs = 0usize;
        let mut rejected = 0usize;
        let mut too_wild = false;

        'rows: for a in self.items() {
            let mut group = Vec::new();
            for b in other.items() {
                pairs += 1;
                let found = match intersect(a.side(dir), b.side(other_dir), case) {
                    Ok(found) => found,
                    Err(TooWild) => {
                        too_wild = true;
                        break 'rows;
                    }
                };

                for x in &found {
                    match compose_row(op, a, dir, b, other_dir, x) {
                        Some(item) => group.push(ComposedRow {
                            b_flag: b.flag(),
                            facing: Pattern::new(&x.text()),
                            item,
                        }),
                        None => rejected += 1,
                    }
                }
            }

            for item in order_group(a.flag(), group, case) {
                if result.is_redundant(&item) {
                    rejected += 1;
                    continue;
                }
                if result.len() == MAX_JOIN_ROWS {
                    too_wild = true;
                    break 'rows;
                }
                result.push(item);
            }
        }

        tracing::debug!(
            %op,
            %dir,
            %other_dir,
            pairs,
            rows = result.len(),
            rejected,
            "composed tables"
        );

        if too_wild {
            tracing::warn!(%op, "composition aborted: {TOO_WILD_REASON}");
            result.clear();
            result.mark_empty(TOO_WILD_REASON.to_string());
            return result;
        }

        if !result.has_maps() {
            let inherited = [self, other]
                .into_iter()
                .filter(|t| !t.has_maps())
                .find_map(|t| t.empty_reason());
            let reason = inherited
                .or(reason)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{op} {dir}:{other_dir} has no overlapping rules"));
            result.mark_empty(reason);
        }
        result
    }

    /// Whether `path` joined against this table's `dir` side maps anything.
    pub fn join_check(&self, dir: Direction, path: &str) -> bool {
        let mut single = MapTable::with_case(self.case_mode());
        if single.insert(path, path, MapFlag::Map).is_err() {
            return false;
        }
        self.join_check_table(dir, &single, Direction::Lhs)
    }

    /// Whether `other`'s `other_dir` side joined against this table's `dir`
    /// side maps anything.
    pub fn join_check_table(&self, dir: Direction, other: &MapTable, other_dir: Direction) -> bool {
        other.join(other_dir, self, dir).has_maps()
    }
}

/// A row composed from one A row and one B row.
struct ComposedRow {
    b_flag: MapFlag,
    /// The intersection of the facing halves.
    facing: Pattern,
    item: MapItem,
}

/// Order the rows composed from one A row.
///
/// Under a Map or Unmap row B's order is kept. Under a Remap or Andmap
/// row the rows built from B's Map rows come first and the rest follow in
/// B order. Remap groups put B's first Map row last among them; Andmap
/// groups drop dittos that B itself shadows.
fn order_group(a_flag: MapFlag, group: Vec<ComposedRow>, case: CaseMode) -> Vec<MapItem> {
    let group = match a_flag {
        MapFlag::Map | MapFlag::Unmap => group,
        MapFlag::Remap => {
            let (mut claims, rest): (Vec<_>, Vec<_>) =
                group.into_iter().partition(|row| row.b_flag == MapFlag::Map);
            claims.reverse();
            claims.into_iter().chain(rest).collect()
        }
        MapFlag::Andmap => {
            let (claims, rest): (Vec<_>, Vec<_>) = drop_shadowed(group, case)
                .into_iter()
                .partition(|row| row.b_flag == MapFlag::Map);
            claims.into_iter().chain(rest).collect()
        }
    };
    group.into_iter().map(|row| row.item).collect()
}

/// Drop rows whose facing region lies inside a row that wins over it in
/// B: an earlier Map or any Remap for a Map row, a later Remap for a
/// Remap row.
fn drop_shadowed(group: Vec<ComposedRow>, case: CaseMode) -> Vec<ComposedRow> {
    let shadowed: Vec<bool> = group
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            group.iter().enumerate().any(|(pos, other)| {
                let wins = match row.b_flag {
                    MapFlag::Map => {
                        other.b_flag == MapFlag::Remap
                            || (pos < idx && other.b_flag == MapFlag::Map)
                    }
                    MapFlag::Remap => pos > idx && other.b_flag == MapFlag::Remap,
                    MapFlag::Unmap | MapFlag::Andmap => false,
                };
                pos != idx && wins && other.facing.contains(&row.facing, case)
            })
        })
        .collect();
    group
        .into_iter()
        .zip(shadowed)
        .filter_map(|(row, shadowed)| (!shadowed).then_some(row))
        .collect()
}

fn compose_row(
    op: JoinOp,
    a: &MapItem,
    dir: Direction,
    b: &MapItem,
    other_dir: Direction,
    x: &Intersection,
) -> Option<MapItem> {
    let flag = a.flag().most_restrictive(b.flag());
    let a_outer = x.expand_left(a.side(dir.opposite()), a.substitution(dir));

    let (lhs, rhs) = match op {
        JoinOp::Join => {
            let b_outer = x.expand_right(b.side(other_dir.opposite()), b.substitution(other_dir));
            (a_outer, b_outer)
        }
        JoinOp::Restrict => match dir {
            Direction::Lhs => (x.text(), a_outer),
            Direction::Rhs => (a_outer, x.text()),
        },
    };

    match MapItem::new(&lhs, &rhs, flag, a.ordinal()) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::debug!(%lhs, %rhs, error = %e, "dropping composed row");
            None
        }
    }
}
