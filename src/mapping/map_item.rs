use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FormatError;
use super::pattern::{CaseMode, Pattern, invert_permutation, slot_permutation};
use super::pattern_matcher::{expand, match_path};

/// Rule kind, selected by the sigil in front of the lhs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapFlag {
    /// Ordinary mapping; the first one to claim a path wins.
    Map,
    /// `-`: excludes its region, produces nothing.
    Unmap,
    /// `+`: overlay; claims its region even where excluded earlier.
    Remap,
    /// `&`: ditto; an extra read-only translation next to the others.
    Andmap,
}

impl MapFlag {
    pub fn from_sigil(sigil: char) -> Option<Self> {
        match sigil {
            '-' => Some(MapFlag::Unmap),
            '+' => Some(MapFlag::Remap),
            '&' => Some(MapFlag::Andmap),
            _ => None,
        }
    }

    /// Marker character used in dumps.
    pub fn marker(self) -> char {
        match self {
            MapFlag::Map => ' ',
            MapFlag::Unmap => '-',
            MapFlag::Remap => '+',
            MapFlag::Andmap => '&',
        }
    }

    fn restrictiveness(self) -> u8 {
        match self {
            MapFlag::Map => 0,
            MapFlag::Remap => 1,
            MapFlag::Andmap => 2,
            MapFlag::Unmap => 3,
        }
    }

    /// Flag of a composed rule: Unmap > Andmap > Remap > Map.
    pub fn most_restrictive(self, other: MapFlag) -> MapFlag {
        if other.restrictiveness() > self.restrictiveness() {
            other
        } else {
            self
        }
    }

    pub fn is_read_only(self) -> bool {
        self == MapFlag::Andmap
    }
}

/// One side of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Lhs,
    Rhs,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Lhs => Direction::Rhs,
            Direction::Rhs => Direction::Lhs,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Lhs => "LHS",
            Direction::Rhs => "RHS",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lhs" => Ok(Direction::Lhs),
            "rhs" => Ok(Direction::Rhs),
            other => Err(format!("unknown direction '{other}' (expected lhs or rhs)")),
        }
    }
}

/// One mapping rule.
///
/// The wildcard pairing between the halves is computed once here, so
/// translation never re-derives it from the pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapItem {
    lhs: Pattern,
    rhs: Pattern,
    flag: MapFlag,
    ordinal: usize,
    rhs_from_lhs: Vec<usize>,
    lhs_from_rhs: Vec<usize>,
}

impl MapItem {
    pub fn new(lhs: &str, rhs: &str, flag: MapFlag, ordinal: usize) -> Result<Self, FormatError> {
        if lhs.is_empty() || rhs.is_empty() {
            return Err(FormatError::EmptyPath);
        }
        let lhs = Pattern::new(lhs);
        let rhs = Pattern::new(rhs);
        let rhs_from_lhs = slot_permutation(&lhs, &rhs)?;
        let lhs_from_rhs = invert_permutation(&rhs_from_lhs);
        Ok(Self {
            lhs,
            rhs,
            flag,
            ordinal,
            rhs_from_lhs,
            lhs_from_rhs,
        })
    }

    pub fn lhs(&self) -> &Pattern {
        &self.lhs
    }

    pub fn rhs(&self) -> &Pattern {
        &self.rhs
    }

    pub fn flag(&self) -> MapFlag {
        self.flag
    }

    /// Position of the source rule in the table it was first inserted into.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn slot_count(&self) -> usize {
        self.lhs.wildcard_count()
    }

    pub fn side(&self, dir: Direction) -> &Pattern {
        match dir {
            Direction::Lhs => &self.lhs,
            Direction::Rhs => &self.rhs,
        }
    }

    /// For each wildcard of the side opposite `dir`, the index of the
    /// `dir`-side wildcard sharing its slot.
    pub fn substitution(&self, dir: Direction) -> &[usize] {
        match dir {
            Direction::Lhs => &self.rhs_from_lhs,
            Direction::Rhs => &self.lhs_from_rhs,
        }
    }

    pub fn matches(&self, dir: Direction, path: &str, case: CaseMode) -> bool {
        match_path(self.side(dir), path, case).is_some()
    }

    /// Translate `path` through this rule alone. Unmap rules never produce
    /// output.
    pub fn translate(&self, dir: Direction, path: &str, case: CaseMode) -> Option<String> {
        if self.flag == MapFlag::Unmap {
            return None;
        }
        let matched = match_path(self.side(dir), path, case)?;
        Some(expand(
            self.side(dir.opposite()),
            &matched,
            self.substitution(dir),
        ))
    }

    pub(crate) fn with_ordinal(mut self, ordinal: usize) -> MapItem {
        self.ordinal = ordinal;
        self
    }

    /// The same rule with its halves exchanged.
    pub fn swapped(&self) -> MapItem {
        MapItem {
            lhs: self.rhs.clone(),
            rhs: self.lhs.clone(),
            flag: self.flag,
            ordinal: self.ordinal,
            rhs_from_lhs: self.lhs_from_rhs.clone(),
            lhs_from_rhs: self.rhs_from_lhs.clone(),
        }
    }
}

impl fmt::Display for MapItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flag != MapFlag::Map {
            write!(f, "{}", self.flag.marker())?;
        }
        write!(f, "{} {}", self.lhs, self.rhs)
    }
}
