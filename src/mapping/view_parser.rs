//! Parser for raw view text: one rule per line, `LHS RHS`.
//!
//! A leading `-`, `+` or `&` on the lhs selects the flag. A line with a
//! single path maps it onto itself, which is how filter lists are
//! written. Paths containing spaces are double-quoted; the sigil may sit
//! outside or inside the quotes. Blank lines and `#` comments are skipped.

use super::FormatError;
use super::map_item::MapFlag;

/// A parsed, not yet validated, view line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    /// 1-based line number in the source text.
    pub line: usize,
    pub flag: MapFlag,
    pub lhs: String,
    pub rhs: String,
}

pub fn parse_view(text: &str) -> Result<Vec<ViewLine>, FormatError> {
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_fields(raw).map_err(|e| e.at_line(line))?;
        let (lhs, rhs) = match fields.as_slice() {
            [lhs] => (lhs.as_str(), None),
            [lhs, rhs] => (lhs.as_str(), Some(rhs.as_str())),
            _ => return Err(FormatError::TooManyPaths(fields.len()).at_line(line)),
        };

        let (flag, lhs) = match lhs.chars().next().and_then(MapFlag::from_sigil) {
            Some(flag) => (flag, &lhs[1..]),
            None => (MapFlag::Map, lhs),
        };
        if lhs.is_empty() || rhs.is_some_and(str::is_empty) {
            return Err(FormatError::EmptyPath.at_line(line));
        }

        lines.push(ViewLine {
            line,
            flag,
            lhs: lhs.to_string(),
            rhs: rhs.unwrap_or(lhs).to_string(),
        });
    }

    Ok(lines)
}

/// Split on whitespace outside double quotes, dropping the quotes.
fn split_fields(line: &str) -> Result<Vec<String>, FormatError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_field = false;
    let mut quote_start: Option<usize> = None;

    for (col, ch) in line.chars().enumerate() {
        match ch {
            '"' => {
                in_field = true;
                quote_start = match quote_start {
                    Some(_) => None,
                    None => Some(col + 1),
                };
            }
            c if c.is_whitespace() && quote_start.is_none() => {
                if in_field {
                    fields.push(std::mem::take(&mut current));
                    in_field = false;
                }
            }
            c => {
                in_field = true;
                current.push(c);
            }
        }
    }

    if let Some(col) = quote_start {
        return Err(FormatError::UnclosedQuote(col));
    }
    if in_field {
        fields.push(current);
    }
    Ok(fields)
}
