/// Wildcard flavours recognised in a pattern half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildKind {
    /// `...`: any run of characters, `/` included.
    Dots,
    /// `*` (or `**`): any run of characters within one path component.
    Star,
    /// `%%N`: like `*`, with an explicit slot number `N` (0-9).
    Positional(u8),
}

impl WildKind {
    /// Whether this wildcard may span a `/`.
    pub fn crosses_slash(self) -> bool {
        matches!(self, WildKind::Dots)
    }
}

/// Raw token produced by the pattern lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexToken {
    /// A run of literal characters (e.g. "//depot/", ".c")
    Literal(String),
    /// A wildcard (`...`, `*`, `**`, `%%N`)
    Wild(WildKind),
}

/// Tokenize one pattern half into literal runs and wildcards.
///
/// Lexing never fails: anything that is not a wildcard is literal text.
/// A run of consecutive `*` characters is a single star wildcard.
pub fn tokenize(pattern: &str) -> Vec<LexToken> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let wild = match chars[i] {
            '.' if chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') => {
                i += 3;
                Some(WildKind::Dots)
            }
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                Some(WildKind::Star)
            }
            '%' if chars.get(i + 1) == Some(&'%')
                && chars.get(i + 2).is_some_and(|c| c.is_ascii_digit()) =>
            {
                let digit = chars[i + 2] as u8 - b'0';
                i += 3;
                Some(WildKind::Positional(digit))
            }
            c => {
                literal.push(c);
                i += 1;
                None
            }
        };

        if let Some(kind) = wild {
            if !literal.is_empty() {
                tokens.push(LexToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(LexToken::Wild(kind));
        }
    }

    if !literal.is_empty() {
        tokens.push(LexToken::Literal(literal));
    }
    tokens
}
