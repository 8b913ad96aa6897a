//! ODBC search patterns for catalog functions.
//!
//! `%` matches any sequence of characters, `_` matches exactly one, and `\`
//! escapes the next character. Matching ignores ASCII case because cache
//! identifiers are case-insensitive.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyMany,
}

/// A compiled search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    tokens: Vec<Token>,
}

impl SearchPattern {
    /// Compile a pattern string.
    pub fn new(pattern: &str) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '%' => {
                    if tokens.last() != Some(&Token::AnyMany) {
                        tokens.push(Token::AnyMany);
                    }
                }
                '_' => tokens.push(Token::AnyOne),
                // a trailing backslash matches itself
                '\\' => tokens.push(Token::Literal(chars.next().unwrap_or('\\'))),
                other => tokens.push(Token::Literal(other)),
            }
        }
        Self { tokens }
    }

    /// A pattern that matches every name.
    pub fn any() -> Self {
        Self {
            tokens: vec![Token::AnyMany],
        }
    }

    /// Compile an optional pattern; `None` and the empty string match
    /// everything.
    pub fn from_option(pattern: Option<&str>) -> Self {
        match pattern {
            None | Some("") => Self::any(),
            Some(p) => Self::new(p),
        }
    }

    /// Whether the pattern matches every name.
    pub fn is_wildcard(&self) -> bool {
        self.tokens == [Token::AnyMany]
    }

    /// Test a name against the pattern.
    pub fn matches(&self, name: &str) -> bool {
        let text: Vec<char> = name.chars().collect();
        let tokens = &self.tokens;

        // Greedy matching with single backtrack point on the last `%`.
        let (mut t, mut p) = (0usize, 0usize);
        let mut star: Option<(usize, usize)> = None;

        while t < text.len() {
            match tokens.get(p) {
                Some(Token::AnyOne) => {
                    t += 1;
                    p += 1;
                }
                Some(Token::Literal(c)) if c.eq_ignore_ascii_case(&text[t]) => {
                    t += 1;
                    p += 1;
                }
                Some(Token::AnyMany) => {
                    star = Some((p, t));
                    p += 1;
                }
                _ => match star {
                    Some((sp, st)) => {
                        p = sp + 1;
                        t = st + 1;
                        star = Some((sp, st + 1));
                    }
                    None => return false,
                },
            }
        }

        tokens[p..].iter().all(|tok| *tok == Token::AnyMany)
    }
}
