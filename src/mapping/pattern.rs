//! Compiled pattern halves.
//!
//! A [`Pattern`] is one side of a mapping rule (`//depot/...`,
//! `//client/%%2/%%1`) compiled into a flat sequence of [`Atom`]s.
//! Every wildcard carries a *slot*: `%%N` is slot `N`, the k-th `*` is
//! slot `10 + k` and the k-th `...` is slot `20 + k`. Two halves of a
//! rule must expose the same slot set; the pairing between them is
//! computed once by [`slot_permutation`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern_lexer::{LexToken, WildKind, tokenize};
use super::{FormatError, MapError};

/// Maximum number of wildcards in one pattern half.
pub const MAX_WILDS: usize = 10;

const STAR_SLOT_BASE: usize = 10;
const DOTS_SLOT_BASE: usize = 20;

/// How literal characters are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Unspecified; compares like [`CaseMode::Sensitive`].
    #[default]
    Default,
    Insensitive,
    Sensitive,
}

impl CaseMode {
    /// Map the legacy integer setting: 0 = insensitive, 1 = sensitive.
    /// Any other value is not a mode.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CaseMode::Insensitive),
            1 => Some(CaseMode::Sensitive),
            _ => None,
        }
    }

    pub fn folds(self) -> bool {
        self == CaseMode::Insensitive
    }

    pub fn fold(self, c: char) -> char {
        if !self.folds() {
            return c;
        }
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => l,
            _ => c,
        }
    }

    pub fn chars_eq(self, a: char, b: char) -> bool {
        a == b || (self.folds() && self.fold(a) == self.fold(b))
    }

    pub fn fold_str(self, s: &str) -> String {
        s.chars().map(|c| self.fold(c)).collect()
    }

    /// Reject query paths that cannot be compared under this mode: NUL
    /// anywhere, and (when folding) characters whose lowercase form is not
    /// a single character.
    pub fn check_path(self, path: &str) -> Result<(), MapError> {
        for (position, ch) in path.chars().enumerate() {
            let usable = ch != '\0' && (!self.folds() || ch.to_lowercase().count() == 1);
            if !usable {
                return Err(MapError::InvalidPath {
                    path: path.to_string(),
                    position,
                    ch,
                    case: self,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseMode::Default => "default",
            CaseMode::Insensitive => "insensitive",
            CaseMode::Sensitive => "sensitive",
        };
        f.write_str(name)
    }
}

/// A wildcard occurrence inside a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wildcard {
    pub kind: WildKind,
    /// Slot number shared with the other half of the rule.
    pub slot: usize,
    /// Position among this pattern's wildcards, left to right.
    pub index: usize,
}

impl Wildcard {
    pub fn absorbs_char(&self, c: char) -> bool {
        self.kind.crosses_slash() || c != '/'
    }

    /// Whether this wildcard can stand in for `atom` of another pattern.
    fn absorbs(&self, atom: &Atom) -> bool {
        match atom {
            Atom::Char(c) => self.absorbs_char(*c),
            Atom::Wild(other) => self.kind.crosses_slash() || !other.kind.crosses_slash(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    Char(char),
    Wild(Wildcard),
}

/// One compiled half of a mapping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    atoms: Vec<Atom>,
    prefix: String,
    wild_count: usize,
}

impl Pattern {
    pub fn new(text: &str) -> Self {
        let mut atoms = Vec::new();
        let mut stars = 0;
        let mut dots = 0;
        let mut wild_count = 0;

        for token in tokenize(text) {
            match token {
                LexToken::Literal(s) => atoms.extend(s.chars().map(Atom::Char)),
                LexToken::Wild(kind) => {
                    let slot = match kind {
                        WildKind::Positional(n) => usize::from(n),
                        WildKind::Star => {
                            stars += 1;
                            STAR_SLOT_BASE + stars - 1
                        }
                        WildKind::Dots => {
                            dots += 1;
                            DOTS_SLOT_BASE + dots - 1
                        }
                    };
                    atoms.push(Atom::Wild(Wildcard {
                        kind,
                        slot,
                        index: wild_count,
                    }));
                    wild_count += 1;
                }
            }
        }

        let prefix = atoms
            .iter()
            .map_while(|a| match a {
                Atom::Char(c) => Some(*c),
                Atom::Wild(_) => None,
            })
            .collect();

        Self {
            text: text.to_string(),
            atoms,
            prefix,
            wild_count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn wildcards(&self) -> impl Iterator<Item = &Wildcard> {
        self.atoms.iter().filter_map(|a| match a {
            Atom::Wild(w) => Some(w),
            Atom::Char(_) => None,
        })
    }

    pub fn wildcard_count(&self) -> usize {
        self.wild_count
    }

    pub fn is_wild(&self) -> bool {
        self.wild_count > 0
    }

    /// The literal text before the first wildcard.
    pub fn fixed_prefix(&self) -> &str {
        &self.prefix
    }

    /// Length of [`Self::fixed_prefix`] in characters.
    pub fn fixed_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Number of leading literal characters shared with `other`.
    pub fn common_prefix_len(&self, other: &Pattern, case: CaseMode) -> usize {
        self.prefix
            .chars()
            .zip(other.prefix.chars())
            .take_while(|(a, b)| case.chars_eq(*a, *b))
            .count()
    }

    /// Whether anything from atom `from` onward can reach below a `/`.
    pub fn has_sub_dirs(&self, from: usize) -> bool {
        self.atoms.iter().skip(from).any(|a| match a {
            Atom::Char(c) => *c == '/',
            Atom::Wild(w) => w.kind.crosses_slash(),
        })
    }

    /// Self-consistency checks for one half.
    pub fn check(&self) -> Result<(), FormatError> {
        let mut seen = [false; 10];
        let mut stars = 0;
        let mut dots = 0;
        let mut previous_wild = false;

        for atom in &self.atoms {
            let Atom::Wild(w) = atom else {
                previous_wild = false;
                continue;
            };
            if previous_wild {
                return Err(FormatError::Juxtaposed(self.text.clone()));
            }
            previous_wild = true;
            match w.kind {
                WildKind::Positional(n) => {
                    let n = usize::from(n);
                    if seen[n] {
                        return Err(FormatError::Duplicate(self.text.clone()));
                    }
                    seen[n] = true;
                }
                WildKind::Star => stars += 1,
                WildKind::Dots => dots += 1,
            }
        }

        if stars > MAX_WILDS {
            return Err(FormatError::ExtraStars(self.text.clone()));
        }
        if dots > MAX_WILDS {
            return Err(FormatError::ExtraDots(self.text.clone()));
        }
        if self.wild_count > MAX_WILDS {
            return Err(FormatError::TooWild {
                pattern: self.text.clone(),
                max: MAX_WILDS,
            });
        }
        Ok(())
    }

    /// Superset test: does every path matched by `other` also match `self`?
    pub fn contains(&self, other: &Pattern, case: CaseMode) -> bool {
        covers(&self.atoms, &other.atoms, case)
    }

    /// True for a single trailing `/...` and no other wildcard.
    pub fn is_valid_depot_map(&self) -> bool {
        if self.wild_count != 1 {
            return false;
        }
        matches!(
            self.atoms.as_slice(),
            [.., Atom::Char('/'), Atom::Wild(Wildcard { kind: WildKind::Dots, .. })]
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::new(text)
    }
}

fn covers(outer: &[Atom], inner: &[Atom], case: CaseMode) -> bool {
    let Some((first, rest)) = outer.split_first() else {
        return inner.is_empty();
    };

    match first {
        Atom::Char(c) => match inner.split_first() {
            Some((Atom::Char(d), inner_rest)) if case.chars_eq(*c, *d) => {
                covers(rest, inner_rest, case)
            }
            _ => false,
        },
        Atom::Wild(w) => {
            for taken in 0..=inner.len() {
                if taken > 0 && !w.absorbs(&inner[taken - 1]) {
                    break;
                }
                if covers(rest, &inner[taken..], case) {
                    return true;
                }
            }
            false
        }
    }
}

/// Validate a pattern pair and pair up their wildcards.
///
/// The result maps each `rhs` wildcard index to the `lhs` wildcard index
/// holding the same slot.
pub fn slot_permutation(lhs: &Pattern, rhs: &Pattern) -> Result<Vec<usize>, FormatError> {
    lhs.check()?;
    rhs.check()?;

    let mismatch = || FormatError::WildMismatch {
        lhs: lhs.as_str().to_string(),
        rhs: rhs.as_str().to_string(),
    };

    if lhs.wildcard_count() != rhs.wildcard_count() {
        return Err(mismatch());
    }

    rhs.wildcards()
        .map(|r| {
            lhs.wildcards()
                .find(|l| l.slot == r.slot)
                .map(|l| l.index)
                .ok_or_else(mismatch)
        })
        .collect()
}

/// Invert a permutation produced by [`slot_permutation`].
pub fn invert_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; permutation.len()];
    for (to, &from) in permutation.iter().enumerate() {
        inverse[from] = to;
    }
    inverse
}
