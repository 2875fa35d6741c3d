//! Resolved tables: the query side of a mapping.

use std::fmt::Write as _;

use super::MapError;
use super::disambiguate::{Claim, resolve_active};
use super::map_item::{Direction, MapFlag, MapItem};
use super::map_table::{MapTable, dump_items};
use super::map_tree::MapTree;
use super::pattern::{CaseMode, Pattern};

/// A translated path and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation<'a> {
    pub path: String,
    pub rule: &'a MapItem,
    /// Position of `rule` in the table.
    pub position: usize,
}

impl Translation<'_> {
    /// Ditto translations are informational only.
    pub fn is_read_only(&self) -> bool {
        self.rule.flag().is_read_only()
    }
}

/// A literal prefix under which a table maps something on one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeString {
    pub prefix: String,
    pub has_sub_dirs: bool,
}

/// A disambiguated table, ready for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapTable {
    table: MapTable,
    rows: Vec<(MapItem, bool)>,
    lhs_tree: MapTree,
    rhs_tree: MapTree,
}

/// Rows matching one path, walked in precedence order.
struct Walk {
    claim: Claim,
    andmaps: Vec<usize>,
}

impl Walk {
    fn winner(&self) -> Option<usize> {
        match self.claim {
            Claim::Mapped(pos) => Some(pos),
            Claim::Unclaimed | Claim::Excluded => self.andmaps.first().copied(),
        }
    }
}

impl MapTable {
    /// Resolve precedence and build the lookup trees. The raw table is
    /// left as is and can keep being used as a composition operand.
    pub fn disambiguate(&self) -> ResolvedMapTable {
        let rows = resolve_active(self.items(), self.case_mode());
        let lhs_tree = MapTree::build(Direction::Lhs, &rows, self.case_mode());
        let rhs_tree = MapTree::build(Direction::Rhs, &rows, self.case_mode());
        tracing::debug!(
            rows = rows.len(),
            active = rows.iter().filter(|(_, active)| *active).count(),
            lhs_groups = lhs_tree.groups().len(),
            rhs_groups = rhs_tree.groups().len(),
            "disambiguated map table"
        );
        ResolvedMapTable {
            table: self.clone(),
            rows,
            lhs_tree,
            rhs_tree,
        }
    }
}

impl ResolvedMapTable {
    /// Best single translation of `path` from the `dir` side.
    pub fn translate(&self, dir: Direction, path: &str) -> Result<Option<Translation<'_>>, MapError> {
        let walk = self.walk(dir, path)?;
        Ok(walk.winner().and_then(|pos| self.translation(pos, dir, path)))
    }

    /// Every translation of `path`: the primary one first, then each ditto
    /// row in precedence order. No match is an empty list.
    pub fn explode(&self, dir: Direction, path: &str) -> Result<Vec<Translation<'_>>, MapError> {
        let walk = self.walk(dir, path)?;
        let primary = match walk.claim {
            Claim::Mapped(pos) => Some(pos),
            Claim::Unclaimed | Claim::Excluded => None,
        };
        Ok(primary
            .into_iter()
            .chain(walk.andmaps.iter().copied())
            .filter_map(|pos| self.translation(pos, dir, path))
            .collect())
    }

    /// The rule that would translate `path`, without expanding it.
    pub fn check(&self, dir: Direction, path: &str) -> Result<Option<&MapItem>, MapError> {
        let walk = self.walk(dir, path)?;
        Ok(walk.winner().map(|pos| &self.rows[pos].0))
    }

    fn walk(&self, dir: Direction, path: &str) -> Result<Walk, MapError> {
        let case = self.case_mode();
        case.check_path(path)?;

        let mut walk = Walk {
            claim: Claim::Unclaimed,
            andmaps: Vec::new(),
        };
        for pos in self.tree(dir).candidates(path) {
            let item = &self.rows[pos].0;
            if !item.matches(dir, path, case) {
                continue;
            }
            match item.flag() {
                MapFlag::Unmap => {
                    walk.claim = walk.claim.apply(MapFlag::Unmap, pos);
                    walk.andmaps.clear();
                }
                _ if self.excluded_far_side(dir, path, pos) => {}
                MapFlag::Andmap => walk.andmaps.push(pos),
                flag => walk.claim = walk.claim.apply(flag, pos),
            }
        }
        Ok(walk)
    }

    /// Whether the row at `pos` translates `path` into a region an Unmap
    /// row covers on the opposite side. Only later Unmap rows count
    /// against Remap and Andmap rows.
    fn excluded_far_side(&self, dir: Direction, path: &str, pos: usize) -> bool {
        let case = self.case_mode();
        let row = &self.rows[pos].0;
        let Some(far) = row.translate(dir, path, case) else {
            return false;
        };
        let far_dir = dir.opposite();
        self.tree(far_dir).candidates(&far).into_iter().any(|other| {
            let unmap = &self.rows[other].0;
            unmap.flag() == MapFlag::Unmap
                && (row.flag() == MapFlag::Map || other > pos)
                && unmap.matches(far_dir, &far, case)
        })
    }

    fn translation(&self, pos: usize, dir: Direction, path: &str) -> Option<Translation<'_>> {
        let rule = &self.rows[pos].0;
        rule.translate(dir, path, self.case_mode())
            .map(|translated| Translation {
                path: translated,
                rule,
                position: pos,
            })
    }

    pub fn tree(&self, dir: Direction) -> &MapTree {
        match dir {
            Direction::Lhs => &self.lhs_tree,
            Direction::Rhs => &self.rhs_tree,
        }
    }

    /// Every row with its active tag, in precedence order.
    pub fn rows(&self) -> &[(MapItem, bool)] {
        &self.rows
    }

    pub fn active_items(&self) -> impl Iterator<Item = &MapItem> {
        self.rows
            .iter()
            .filter(|(_, active)| *active)
            .map(|(item, _)| item)
    }

    pub fn case_mode(&self) -> CaseMode {
        self.table.case_mode()
    }

    pub fn table(&self) -> &MapTable {
        &self.table
    }

    /// Back to a raw table, e.g. to rebuild it.
    pub fn into_table(self) -> MapTable {
        self.table
    }

    pub fn join_error(&self) -> bool {
        self.table.join_error()
    }

    pub fn empty_reason(&self) -> Option<&str> {
        self.table.empty_reason()
    }

    pub fn is_single(&self) -> bool {
        self.table.is_single()
    }

    /// Minimal set of literal prefixes under which active rows map
    /// something on the `dir` side.
    pub fn strings(&self, dir: Direction) -> Vec<ProbeString> {
        let case = self.case_mode();
        let mut halves: Vec<&Pattern> = self
            .active_items()
            .filter(|item| item.flag() != MapFlag::Unmap)
            .map(|item| item.side(dir))
            .collect();
        halves.sort_by_cached_key(|half| case.fold_str(half.fixed_prefix()));

        let mut probes = Vec::new();
        let mut current: Option<(&Pattern, bool)> = None;
        for half in halves {
            if let Some((held, sub_dirs)) = current.as_mut() {
                let shared = held.common_prefix_len(half, case);
                if shared == held.fixed_len() {
                    *sub_dirs |= half.has_sub_dirs(shared);
                    continue;
                }
                if half.fixed_len() > shared {
                    probes.push(probe(held, *sub_dirs));
                }
            }
            current = Some((half, half.has_sub_dirs(half.fixed_len())));
        }
        if let Some((held, sub_dirs)) = current {
            probes.push(probe(held, sub_dirs));
        }
        probes
    }

    /// Diagnostic dump of the active rows.
    pub fn dump(&self, label: &str) -> String {
        dump_items(
            label,
            self.active_items(),
            self.active_items().count(),
            self.join_error(),
            self.empty_reason(),
        )
    }

    pub fn dump_tree(&self, dir: Direction) -> String {
        self.tree(dir).dump(&self.rows)
    }

    pub fn dump_strings(&self, dir: Direction) -> String {
        let mut out = String::from("strings for map:\n");
        for (n, probe) in self.strings(dir).iter().enumerate() {
            let _ = writeln!(out, "\t-> {n}: {} ({})", probe.prefix, probe.has_sub_dirs);
        }
        out
    }
}

fn probe(half: &Pattern, has_sub_dirs: bool) -> ProbeString {
    ProbeString {
        prefix: half.fixed_prefix().to_string(),
        has_sub_dirs,
    }
}
