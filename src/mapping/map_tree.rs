//! Prefix index over the active rows of a resolved table.
//!
//! Rows are grouped by the literal text before their first wildcard on
//! one side. A lookup only visits groups whose prefix is a prefix of the
//! query, so unrelated rows are never matched.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::map_item::{Direction, MapItem};
use super::pattern::CaseMode;

/// Rows sharing one literal prefix, by table position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroup {
    prefix: String,
    rows: Vec<usize>,
}

impl PrefixGroup {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTree {
    direction: Direction,
    case: CaseMode,
    /// Most specific (longest) prefix first, then by first row.
    groups: Vec<PrefixGroup>,
    index: BTreeMap<String, usize>,
}

impl MapTree {
    pub fn build(direction: Direction, rows: &[(MapItem, bool)], case: CaseMode) -> Self {
        let mut by_prefix: BTreeMap<String, PrefixGroup> = BTreeMap::new();
        for (pos, (item, active)) in rows.iter().enumerate() {
            if !active {
                continue;
            }
            let prefix = item.side(direction).fixed_prefix();
            by_prefix
                .entry(case.fold_str(prefix))
                .or_insert_with(|| PrefixGroup {
                    prefix: prefix.to_string(),
                    rows: Vec::new(),
                })
                .rows
                .push(pos);
        }

        let mut keyed: Vec<(String, PrefixGroup)> = by_prefix.into_iter().collect();
        keyed.sort_by(|(a_key, a), (b_key, b)| {
            b_key
                .chars()
                .count()
                .cmp(&a_key.chars().count())
                .then(a.rows[0].cmp(&b.rows[0]))
        });

        let index = keyed
            .iter()
            .enumerate()
            .map(|(pos, (key, _))| (key.clone(), pos))
            .collect();
        let groups = keyed.into_iter().map(|(_, group)| group).collect();

        Self {
            direction,
            case,
            groups,
            index,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn groups(&self) -> &[PrefixGroup] {
        &self.groups
    }

    /// Table positions of every row whose prefix group could match
    /// `path`, in precedence order.
    pub fn candidates(&self, path: &str) -> Vec<usize> {
        let folded = self.case.fold_str(path);
        let mut rows: Vec<usize> = folded
            .char_indices()
            .map(|(at, _)| at)
            .chain(std::iter::once(folded.len()))
            .filter_map(|end| self.index.get(&folded[..end]))
            .flat_map(|&group| self.groups[group].rows.iter().copied())
            .collect();
        rows.sort_unstable();
        rows
    }

    pub fn dump(&self, rows: &[(MapItem, bool)]) -> String {
        let dir = self.direction;
        let mut out = format!("MapTree {dir}: {} groups\n", self.groups.len());
        for group in &self.groups {
            let _ = writeln!(out, "\t{} ({})", group.prefix, group.rows.len());
            for &pos in &group.rows {
                let item = &rows[pos].0;
                let _ = writeln!(
                    out,
                    "\t\t{} {} <-> {}",
                    item.flag().marker(),
                    item.side(dir),
                    item.side(dir.opposite())
                );
            }
        }
        out
    }
}
