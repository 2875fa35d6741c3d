use super::CaseMode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("wildcard mismatch between '{lhs}' and '{rhs}'")]
    WildMismatch { lhs: String, rhs: String },
    #[error("duplicate wildcard in '{0}'")]
    Duplicate(String),
    #[error("too many '*' wildcards in '{0}'")]
    ExtraStars(String),
    #[error("too many '...' wildcards in '{0}'")]
    ExtraDots(String),
    #[error("adjacent wildcards in '{0}'")]
    Juxtaposed(String),
    #[error("too many wildcards in '{pattern}' (max: {max})")]
    TooWild { pattern: String, max: usize },
    #[error("expected at most two paths, found {0}")]
    TooManyPaths(usize),
    #[error("unclosed quote starting at column {0}")]
    UnclosedQuote(usize),
    #[error("empty path")]
    EmptyPath,
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// Attach a 1-based line number.
    pub fn at_line(self, line: usize) -> Self {
        FormatError::Line {
            line,
            source: Box::new(self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error(
        "invalid path '{path}': character {ch:?} at position {position} is not usable with {case} case handling"
    )]
    InvalidPath {
        path: String,
        position: usize,
        ch: char,
        case: CaseMode,
    },
}
