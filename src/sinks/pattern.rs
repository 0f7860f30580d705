//! Destination path patterns
//!
//! A pattern is a path with `{name}` placeholders. Each placeholder is replaced by the
//! record attribute of that name, except for the reserved names `severity`, `pid` and
//! `tid` which expand to record metadata. `{{` and `}}` produce literal braces.

use crate::core::{LoggerError, Record, Result};
use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Attribute(String),
    Severity,
    Pid,
    Tid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
}

impl PathPattern {
    /// Parses `pattern`, rejecting empty, unclosed or unmatched placeholders.
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => {
                                return Err(LoggerError::invalid_pattern(
                                    pattern,
                                    "nested '{' inside placeholder",
                                ))
                            }
                            Some(c) => name.push(c),
                            None => {
                                return Err(LoggerError::invalid_pattern(
                                    pattern,
                                    "unclosed placeholder",
                                ))
                            }
                        }
                    }

                    let name = name.trim();
                    if name.is_empty() {
                        return Err(LoggerError::invalid_pattern(pattern, "empty placeholder"));
                    }

                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(match name {
                        "severity" => Token::Severity,
                        "pid" => Token::Pid,
                        "tid" => Token::Tid,
                        other => Token::Attribute(other.to_string()),
                    });
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(LoggerError::invalid_pattern(pattern, "unmatched '}'")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// Pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` when the pattern has no placeholders.
    pub fn is_static(&self) -> bool {
        self.tokens.iter().all(|t| matches!(t, Token::Literal(_)))
    }

    /// Builds the destination path for `record`.
    ///
    /// Static patterns are returned without allocating.
    pub fn resolve<'p>(&'p self, record: &Record<'_>) -> Result<Cow<'p, str>> {
        match self.tokens.as_slice() {
            [] => return Ok(Cow::Borrowed("")),
            [Token::Literal(path)] => return Ok(Cow::Borrowed(path.as_str())),
            _ => {}
        }

        let mut path = String::with_capacity(self.source.len() + 16);
        for token in &self.tokens {
            // Writing into a String cannot fail.
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Attribute(name) => {
                    let value = record
                        .attribute(name)
                        .ok_or_else(|| LoggerError::missing_attribute(name, &self.source))?;
                    let _ = write!(path, "{}", value);
                }
                Token::Severity => {
                    let _ = write!(path, "{}", record.severity());
                }
                Token::Pid => {
                    let _ = write!(path, "{}", record.pid());
                }
                Token::Tid => {
                    let id = format!("{:?}", record.tid());
                    path.extend(id.chars().filter(char::is_ascii_digit));
                }
            }
        }

        Ok(Cow::Owned(path))
    }
}
