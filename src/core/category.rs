//! Error categories and statically ordered category chains
//!
//! Every [`LoggerError`](super::LoggerError) belongs to exactly one category of a
//! closed, shallow hierarchy. A [`CategoryChain`] is the ordered list of categories a
//! dispatcher handles explicitly, most specific first.

use std::fmt;
use std::io::ErrorKind;

/// Closed set of failure categories.
///
/// ```text
/// Io ─┬─ NotFound          Logic ─┬─ MissingAttribute      Runtime
///     ├─ PermissionDenied         └─ InvalidConfiguration
///     └─ ResourceExhausted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    Io,
    NotFound,
    PermissionDenied,
    ResourceExhausted,
    Logic,
    MissingAttribute,
    InvalidConfiguration,
    Runtime,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 8] = [
        ErrorCategory::Io,
        ErrorCategory::NotFound,
        ErrorCategory::PermissionDenied,
        ErrorCategory::ResourceExhausted,
        ErrorCategory::Logic,
        ErrorCategory::MissingAttribute,
        ErrorCategory::InvalidConfiguration,
        ErrorCategory::Runtime,
    ];

    /// Direct supertype of this category, `None` for roots.
    pub const fn parent(self) -> Option<ErrorCategory> {
        match self {
            ErrorCategory::NotFound
            | ErrorCategory::PermissionDenied
            | ErrorCategory::ResourceExhausted => Some(ErrorCategory::Io),
            ErrorCategory::MissingAttribute | ErrorCategory::InvalidConfiguration => {
                Some(ErrorCategory::Logic)
            }
            ErrorCategory::Io | ErrorCategory::Logic | ErrorCategory::Runtime => None,
        }
    }

    /// Returns `true` if `self` equals `ancestor` or descends from it.
    pub const fn is_a(self, ancestor: ErrorCategory) -> bool {
        let mut current = Some(self);
        while let Some(category) = current {
            if category as u8 == ancestor as u8 {
                return true;
            }
            current = category.parent();
        }
        false
    }

    pub fn from_io_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCategory::NotFound,
            ErrorKind::PermissionDenied => ErrorCategory::PermissionDenied,
            ErrorKind::StorageFull | ErrorKind::OutOfMemory => ErrorCategory::ResourceExhausted,
            _ => ErrorCategory::Io,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            ErrorCategory::Io => "io",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::PermissionDenied => "permission_denied",
            ErrorCategory::ResourceExhausted => "resource_exhausted",
            ErrorCategory::Logic => "logic",
            ErrorCategory::MissingAttribute => "missing_attribute",
            ErrorCategory::InvalidConfiguration => "invalid_configuration",
            ErrorCategory::Runtime => "runtime",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Checks that no category is a supertype of (or equal to) a later one.
///
/// An earlier, broader entry would otherwise swallow every failure the later,
/// narrower entry was declared for.
pub const fn is_sound(categories: &[ErrorCategory]) -> bool {
    let mut i = 0;
    while i < categories.len() {
        let mut j = i + 1;
        while j < categories.len() {
            if categories[j].is_a(categories[i]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Ordered list of categories handled explicitly by a dispatcher.
///
/// Order is most specific first and is also the match order. Build chains with the
/// [`categories!`](crate::categories) macro, which verifies ordering at compile time:
///
/// ```
/// use rust_logger_core::{categories, ErrorCategory};
///
/// let chain = categories![ErrorCategory::PermissionDenied, ErrorCategory::Io];
/// assert_eq!(chain.len(), 2);
/// ```
///
/// A general category ahead of one of its subtypes does not compile:
///
/// ```compile_fail
/// use rust_logger_core::{categories, ErrorCategory};
///
/// let chain = categories![ErrorCategory::Io, ErrorCategory::PermissionDenied];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryChain {
    categories: &'static [ErrorCategory],
}

impl CategoryChain {
    /// Chain without explicit handlers; every failure reaches the fallback.
    pub const EMPTY: CategoryChain = CategoryChain { categories: &[] };

    /// Creates a chain, panicking on an unsound ordering.
    ///
    /// Evaluated in a `const` item the panic becomes a compile error, which is what
    /// [`categories!`](crate::categories) does.
    pub const fn new(categories: &'static [ErrorCategory]) -> Self {
        assert!(
            is_sound(categories),
            "can't build correct error handling hierarchy"
        );
        Self { categories }
    }

    pub fn categories(&self) -> &'static [ErrorCategory] {
        self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns the first declared category `category` belongs to.
    pub fn classify(&self, category: ErrorCategory) -> Option<ErrorCategory> {
        self.categories
            .iter()
            .copied()
            .find(|declared| category.is_a(*declared))
    }
}

impl Default for CategoryChain {
    fn default() -> Self {
        Self::EMPTY
    }
}
