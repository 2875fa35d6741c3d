//! Path-against-pattern matching and substitution.
//!
//! Matching aligns a compiled [`Pattern`] with a concrete path, capturing
//! the span consumed by every wildcard. Wildcards are greedy and may match
//! nothing; `...` crosses `/`, the other kinds stop at it.

use std::ops::Range;

use super::pattern::{Atom, CaseMode, Pattern};

/// A successful match: the path and the span captured by each wildcard,
/// indexed by wildcard position in the matched pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    chars: Vec<char>,
    captures: Vec<Range<usize>>,
}

impl PathMatch {
    pub fn capture(&self, index: usize) -> String {
        self.chars[self.captures[index].clone()].iter().collect()
    }

    pub fn captures(&self) -> Vec<String> {
        (0..self.captures.len()).map(|i| self.capture(i)).collect()
    }
}

/// Match `path` against `pattern`. Failure is `None`, never an error.
pub fn match_path(pattern: &Pattern, path: &str, case: CaseMode) -> Option<PathMatch> {
    let chars: Vec<char> = path.chars().collect();

    // Cheap rejection on the literal prefix before backtracking.
    let prefix_len = pattern.fixed_len();
    if chars.len() < prefix_len
        || !pattern
            .fixed_prefix()
            .chars()
            .zip(&chars)
            .all(|(p, c)| case.chars_eq(p, *c))
    {
        return None;
    }

    let mut captures = vec![0..0; pattern.wildcard_count()];
    if match_atoms(pattern.atoms(), &chars, 0, case, &mut captures) {
        Some(PathMatch { chars, captures })
    } else {
        None
    }
}

fn match_atoms(
    atoms: &[Atom],
    path: &[char],
    pos: usize,
    case: CaseMode,
    captures: &mut [Range<usize>],
) -> bool {
    let Some((first, rest)) = atoms.split_first() else {
        return pos == path.len();
    };

    match first {
        Atom::Char(c) => {
            pos < path.len()
                && case.chars_eq(*c, path[pos])
                && match_atoms(rest, path, pos + 1, case, captures)
        }
        Atom::Wild(w) => {
            let limit = if w.kind.crosses_slash() {
                path.len()
            } else {
                path[pos..]
                    .iter()
                    .position(|&c| c == '/')
                    .map_or(path.len(), |offset| pos + offset)
            };
            // Greedy: try the longest span first.
            for end in (pos..=limit).rev() {
                captures[w.index] = pos..end;
                if match_atoms(rest, path, end, case, captures) {
                    return true;
                }
            }
            false
        }
    }
}

/// Build a path from `target`, filling its k-th wildcard with capture
/// `substitution[k]` of `matched`.
pub fn expand(target: &Pattern, matched: &PathMatch, substitution: &[usize]) -> String {
    let mut out = String::new();
    for atom in target.atoms() {
        match atom {
            Atom::Char(c) => out.push(*c),
            Atom::Wild(w) => {
                let span = matched.captures[substitution[w.index]].clone();
                out.extend(&matched.chars[span]);
            }
        }
    }
    out
}
