//! Pattern intersection, the half-level primitive behind join and restrict.
//!
//! Intersecting `//depot/...` with `//depot/foo/*` yields every pattern
//! describing paths matched by both, together with what each input
//! wildcard was bound to. Where two wildcards overlap a fresh wildcard is
//! emitted: `...` when both sides were `...`, otherwise `%%N` numbered from
//! 1 in order of appearance.

use std::ops::Range;

use super::pattern::{Atom, CaseMode, MAX_WILDS, Pattern, Wildcard};
use super::pattern_lexer::WildKind;

/// Upper bound on intersections produced for one pattern pair.
const MAX_INTERSECTIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinAtom {
    Char(char),
    /// A freshly numbered wildcard token (`...` or `%%N`).
    Wild(String),
}

/// The intersection needed more wildcards (or rows) than a pattern can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooWild;

/// One pattern matching exactly the paths two input patterns share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    atoms: Vec<JoinAtom>,
    left: Vec<Range<usize>>,
    right: Vec<Range<usize>>,
}

impl Intersection {
    pub fn text(&self) -> String {
        render(&self.atoms)
    }

    /// Rewrite `target` (the partner half of the left input) in terms of
    /// this intersection. `substitution[k]` names the left wildcard bound
    /// to the k-th wildcard of `target`.
    pub fn expand_left(&self, target: &Pattern, substitution: &[usize]) -> String {
        self.expand(target, &self.left, substitution)
    }

    /// Same as [`Self::expand_left`], for the right input.
    pub fn expand_right(&self, target: &Pattern, substitution: &[usize]) -> String {
        self.expand(target, &self.right, substitution)
    }

    fn expand(&self, target: &Pattern, bindings: &[Range<usize>], substitution: &[usize]) -> String {
        let mut out = String::new();
        for atom in target.atoms() {
            match atom {
                Atom::Char(c) => out.push(*c),
                Atom::Wild(w) => {
                    let span = bindings[substitution[w.index]].clone();
                    out.push_str(&render(&self.atoms[span]));
                }
            }
        }
        out
    }
}

fn render(atoms: &[JoinAtom]) -> String {
    let mut out = String::new();
    for atom in atoms {
        match atom {
            JoinAtom::Char(c) => out.push(*c),
            JoinAtom::Wild(token) => out.push_str(token),
        }
    }
    out
}

/// Compute every intersection of `left` and `right`, in discovery order
/// and without duplicates.
pub fn intersect(
    left: &Pattern,
    right: &Pattern,
    case: CaseMode,
) -> Result<Vec<Intersection>, TooWild> {
    let mut search = Search {
        left: left.atoms(),
        right: right.atoms(),
        case,
        out: Vec::new(),
        left_spans: vec![0..0; left.wildcard_count()],
        right_spans: vec![0..0; right.wildcard_count()],
        positional: 0,
        meets: 0,
        results: Vec::new(),
        too_wild: false,
    };
    search.step(0, 0, None, None);

    if search.too_wild {
        Err(TooWild)
    } else {
        Ok(search.results)
    }
}

struct Search<'a> {
    left: &'a [Atom],
    right: &'a [Atom],
    case: CaseMode,
    out: Vec<JoinAtom>,
    left_spans: Vec<Range<usize>>,
    right_spans: Vec<Range<usize>>,
    positional: usize,
    meets: usize,
    results: Vec<Intersection>,
    too_wild: bool,
}

impl Search<'_> {
    /// Advance from left atom `i` and right atom `j`. An open wildcard is
    /// the atom at its side's position and has not been closed yet.
    fn step(&mut self, i: usize, j: usize, open_left: Option<Wildcard>, open_right: Option<Wildcard>) {
        if self.too_wild {
            return;
        }
        let l = self.left.get(i).copied();
        let r = self.right.get(j).copied();

        match (open_left, open_right) {
            (None, None) => match (l, r) {
                (None, None) => self.emit(),
                (Some(Atom::Wild(lw)), Some(Atom::Wild(rw))) => {
                    self.left_spans[lw.index].start = self.out.len();
                    self.right_spans[rw.index].start = self.out.len();
                    self.meet(i, j, lw, rw);
                }
                (Some(Atom::Wild(lw)), _) => {
                    self.left_spans[lw.index].start = self.out.len();
                    self.step(i, j, Some(lw), None);
                }
                (_, Some(Atom::Wild(rw))) => {
                    self.right_spans[rw.index].start = self.out.len();
                    self.step(i, j, None, Some(rw));
                }
                (Some(Atom::Char(a)), Some(Atom::Char(b))) if self.case.chars_eq(a, b) => {
                    self.out.push(JoinAtom::Char(a));
                    self.step(i + 1, j + 1, None, None);
                    self.out.pop();
                }
                _ => {}
            },
            (Some(lw), None) => match r {
                Some(Atom::Wild(rw)) => {
                    self.right_spans[rw.index].start = self.out.len();
                    self.meet(i, j, lw, rw);
                }
                _ => {
                    self.left_spans[lw.index].end = self.out.len();
                    self.step(i + 1, j, None, None);

                    if let Some(Atom::Char(c)) = r
                        && lw.absorbs_char(c)
                    {
                        self.out.push(JoinAtom::Char(c));
                        self.step(i, j + 1, Some(lw), None);
                        self.out.pop();
                    }
                }
            },
            (None, Some(rw)) => match l {
                Some(Atom::Wild(lw)) => {
                    self.left_spans[lw.index].start = self.out.len();
                    self.meet(i, j, lw, rw);
                }
                _ => {
                    self.right_spans[rw.index].end = self.out.len();
                    self.step(i, j + 1, None, None);

                    if let Some(Atom::Char(c)) = l
                        && rw.absorbs_char(c)
                    {
                        self.out.push(JoinAtom::Char(c));
                        self.step(i + 1, j, None, Some(rw));
                        self.out.pop();
                    }
                }
            },
            (Some(lw), Some(rw)) => {
                // Both just met: at least one of them closes here.
                let here = self.out.len();
                self.left_spans[lw.index].end = here;
                self.step(i + 1, j, None, Some(rw));

                self.right_spans[rw.index].end = here;
                self.step(i, j + 1, Some(lw), None);

                self.left_spans[lw.index].end = here;
                self.right_spans[rw.index].end = here;
                self.step(i + 1, j + 1, None, None);
            }
        }
    }

    fn meet(&mut self, i: usize, j: usize, lw: Wildcard, rw: Wildcard) {
        let both_dots = lw.kind == WildKind::Dots && rw.kind == WildKind::Dots;
        if self.meets == MAX_WILDS || (!both_dots && self.positional == 9) {
            self.too_wild = true;
            return;
        }

        self.meets += 1;
        let token = if both_dots {
            "...".to_string()
        } else {
            self.positional += 1;
            format!("%%{}", self.positional)
        };
        self.out.push(JoinAtom::Wild(token));
        self.step(i, j, Some(lw), Some(rw));
        self.out.pop();
        if !both_dots {
            self.positional -= 1;
        }
        self.meets -= 1;
    }

    fn emit(&mut self) {
        let found = Intersection {
            atoms: self.out.clone(),
            left: self.left_spans.clone(),
            right: self.right_spans.clone(),
        };
        if self.results.contains(&found) {
            return;
        }
        if self.results.len() == MAX_INTERSECTIONS {
            self.too_wild = true;
            return;
        }
        self.results.push(found);
    }
}
