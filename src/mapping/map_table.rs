//! Raw mapping tables: ordered rule storage before disambiguation.

use std::fmt::Write as _;

use super::FormatError;
use super::map_item::{MapFlag, MapItem};
use super::pattern::{CaseMode, Pattern};
use super::pattern_matcher::match_path;
use super::view_parser::parse_view;

/// How many trailing rows `insert_no_dups` compares against.
const NO_DUPS_LOOKBACK: usize = 8;

/// An ordered rule table being populated. Rows are kept in insertion
/// order, which is also precedence order.
///
/// Queries need a [`super::ResolvedMapTable`], obtained from
/// [`MapTable::disambiguate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapTable {
    items: Vec<MapItem>,
    case: CaseMode,
    next_ordinal: usize,
    join_error: bool,
    empty_reason: Option<String>,
}

impl MapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case(case: CaseMode) -> Self {
        Self {
            case,
            ..Self::default()
        }
    }

    /// Build a table from raw view text.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut table = Self::new();
        table.load(text)?;
        Ok(table)
    }

    /// Append every rule of `text`. Nothing is inserted unless the whole
    /// text validates.
    pub fn load(&mut self, text: &str) -> Result<(), FormatError> {
        let lines = parse_view(text)?;
        let mut items = Vec::with_capacity(lines.len());
        for (offset, line) in lines.iter().enumerate() {
            let item = MapItem::new(&line.lhs, &line.rhs, line.flag, self.next_ordinal + offset)
                .map_err(|e| e.at_line(line.line))?;
            items.push(item);
        }
        self.next_ordinal += items.len();
        self.items.extend(items);
        Ok(())
    }

    /// Check a rule pair without touching the table.
    pub fn validate(&self, lhs: &str, rhs: &str) -> Result<(), FormatError> {
        MapItem::new(lhs, rhs, MapFlag::Map, 0).map(|_| ())
    }

    /// Append a rule. Only the pair itself is validated, never against
    /// other rows.
    pub fn insert(&mut self, lhs: &str, rhs: &str, flag: MapFlag) -> Result<(), FormatError> {
        let item = MapItem::new(lhs, rhs, flag, self.next_ordinal)?;
        self.push(item);
        Ok(())
    }

    /// Insert a rule at `position` in precedence order, or last when
    /// `position` is past the end. The rule still gets the next ordinal.
    pub fn insert_at(
        &mut self,
        position: usize,
        lhs: &str,
        rhs: &str,
        flag: MapFlag,
    ) -> Result<(), FormatError> {
        let item = MapItem::new(lhs, rhs, flag, self.next_ordinal)?;
        self.next_ordinal += 1;
        self.items.insert(position.min(self.items.len()), item);
        Ok(())
    }

    /// Append the rows of `other`: as they are when `forward`, with their
    /// halves exchanged when `reverse`. Both interleave row by row.
    pub fn extend_from(&mut self, other: &MapTable, forward: bool, reverse: bool) {
        for item in other.items() {
            if forward {
                self.push(item.clone().with_ordinal(self.next_ordinal));
            }
            if reverse {
                self.push(item.swapped().with_ordinal(self.next_ordinal));
            }
        }
    }

    /// Replace every row with a copy of `other`'s rows. The case mode stays.
    pub fn set(&mut self, other: &MapTable) {
        self.clear();
        self.extend_from(other, true, false);
    }

    /// Match one pattern against one path under this table's case mode,
    /// without consulting any row.
    pub fn match_pattern(&self, pattern: &str, path: &str) -> bool {
        match_path(&Pattern::new(pattern), path, self.case).is_some()
    }

    /// Append a rule unless a recent row already makes it redundant:
    /// an identical row, or (for Map rows) a row that claims or excludes
    /// both of its halves. Returns whether the row was added.
    pub fn insert_no_dups(
        &mut self,
        lhs: &str,
        rhs: &str,
        flag: MapFlag,
    ) -> Result<bool, FormatError> {
        let item = MapItem::new(lhs, rhs, flag, self.next_ordinal)?;
        if self.is_redundant(&item) {
            return Ok(false);
        }
        self.push(item);
        Ok(true)
    }

    pub(crate) fn is_redundant(&self, item: &MapItem) -> bool {
        self.items.iter().rev().take(NO_DUPS_LOOKBACK).any(|existing| {
            let identical = existing.flag() == item.flag()
                && existing.lhs() == item.lhs()
                && existing.rhs() == item.rhs();
            let covered = item.flag() == MapFlag::Map
                && existing.flag() != MapFlag::Andmap
                && existing.lhs().contains(item.lhs(), self.case)
                && existing.rhs().contains(item.rhs(), self.case);
            identical || covered
        })
    }

    /// Turn a concrete pair of paths into a wildcard rule by replacing
    /// their common tail with `...` (or `*` when the tail stays inside one
    /// directory), then insert it without duplicates.
    pub fn insert_by_pattern(
        &mut self,
        lhs: &str,
        rhs: &str,
        flag: MapFlag,
    ) -> Result<bool, FormatError> {
        let (lhs, rhs) = generalize_pair(lhs, rhs);
        self.insert_no_dups(&lhs, &rhs, flag)
    }

    /// Push an already built row, keeping its ordinal.
    pub(crate) fn push(&mut self, item: MapItem) {
        self.next_ordinal = self.next_ordinal.max(item.ordinal() + 1);
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Option<MapItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Drop every row and all composition diagnostics. The case mode stays.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_ordinal = 0;
        self.join_error = false;
        self.empty_reason = None;
    }

    /// Legacy integer setting: 0 = insensitive, 1 = sensitive. Other
    /// values are ignored.
    pub fn set_case_sensitivity(&mut self, code: i32) {
        if let Some(mode) = CaseMode::from_code(code) {
            self.case = mode;
        }
    }

    pub fn set_case_mode(&mut self, case: CaseMode) {
        self.case = case;
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case
    }

    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MapItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any row can produce a translation.
    pub fn has_maps(&self) -> bool {
        self.items.iter().any(|i| i.flag() != MapFlag::Unmap)
    }

    pub fn has_overlays(&self) -> bool {
        self.count_by_flag(MapFlag::Remap) > 0
    }

    pub fn has_andmaps(&self) -> bool {
        self.count_by_flag(MapFlag::Andmap) > 0
    }

    pub fn count_by_flag(&self, flag: MapFlag) -> usize {
        self.items.iter().filter(|i| i.flag() == flag).count()
    }

    /// The highest precedence row maps one literal path.
    pub fn is_single(&self) -> bool {
        self.items
            .first()
            .is_some_and(|i| !i.lhs().is_wild() && !i.rhs().is_wild())
    }

    /// A copy with lhs and rhs exchanged on every row.
    pub fn swap(&self) -> MapTable {
        MapTable {
            items: self.items.iter().map(MapItem::swapped).collect(),
            case: self.case,
            next_ordinal: self.next_ordinal,
            join_error: false,
            empty_reason: None,
        }
    }

    /// A copy without the rows carrying `flag`.
    pub fn strip(&self, flag: MapFlag) -> MapTable {
        MapTable {
            items: self
                .items
                .iter()
                .filter(|i| i.flag() != flag)
                .cloned()
                .collect(),
            case: self.case,
            next_ordinal: self.next_ordinal,
            join_error: false,
            empty_reason: None,
        }
    }

    pub fn join_error(&self) -> bool {
        self.join_error
    }

    pub fn empty_reason(&self) -> Option<&str> {
        self.empty_reason.as_deref()
    }

    pub(crate) fn mark_empty(&mut self, reason: String) {
        self.join_error = true;
        self.empty_reason = Some(reason);
    }

    /// Diagnostic dump, one `\t<marker> LHS -> RHS` line per row.
    pub fn dump(&self, label: &str) -> String {
        dump_items(
            label,
            self.items.iter(),
            self.items.len(),
            self.join_error,
            self.empty_reason(),
        )
    }
}

pub(crate) fn dump_items<'a>(
    label: &str,
    items: impl Iterator<Item = &'a MapItem>,
    count: usize,
    join_error: bool,
    empty_reason: Option<&str>,
) -> String {
    let mut out = format!(
        "{label}: {count} items, joinError {join_error}, emptyReason {}\n",
        empty_reason.unwrap_or("")
    );
    for item in items {
        let _ = writeln!(
            out,
            "\t{} {} -> {}",
            item.flag().marker(),
            item.lhs(),
            item.rhs()
        );
    }
    out
}

/// Generalize two concrete paths sharing a tail.
fn generalize_pair(lhs: &str, rhs: &str) -> (String, String) {
    let l_chars: Vec<char> = lhs.chars().collect();
    let r_chars: Vec<char> = rhs.chars().collect();

    // Only the part after the leading `//name/` is eligible.
    let skip_root = |chars: &[char]| {
        let mut slashes = 0;
        let mut pos = 0;
        while slashes < 3 && pos < chars.len() {
            slashes += usize::from(chars[pos] == '/');
            pos += 1;
        }
        pos
    };
    let l_start = skip_root(&l_chars);
    let r_start = skip_root(&r_chars);

    let mut l = l_chars.len();
    let mut r = r_chars.len();
    let mut slashes = 0usize;
    while l > l_start && r > r_start && l_chars[l - 1] == r_chars[r - 1] {
        l -= 1;
        r -= 1;
        slashes += usize::from(l_chars[l] == '/');
    }

    // Keep the last differing directory's trailing slash.
    if l < l_chars.len() && l_chars[l] == '/' {
        l += 1;
        r += 1;
        slashes -= 1;
    }

    // Avoid a literal `.` directly before an appended `...`.
    let dot_before = |chars: &[char], at: usize| at > 0 && at < chars.len() && chars[at - 1] == '.';
    if slashes > 0 && (dot_before(&l_chars, l) || dot_before(&r_chars, r)) {
        l += 1;
        r += 1;
    }

    let head = |chars: &[char], at: usize| chars[..at].iter().collect::<String>();
    if slashes > 0 && l + 4 < l_chars.len() {
        (head(&l_chars, l) + "...", head(&r_chars, r) + "...")
    } else if slashes == 0 && l + 2 < l_chars.len() {
        (head(&l_chars, l) + "*", head(&r_chars, r) + "*")
    } else {
        (lhs.to_string(), rhs.to_string())
    }
}

/// A depot map is usable as a workspace root when it has a single
/// wildcard, a trailing `/...`.
pub fn valid_depot_map(map: &str) -> bool {
    Pattern::new(map).is_valid_depot_map()
}
