//! Macros for declaring dispatcher configuration.
//!
//! # Examples
//!
//! ```
//! use rust_logger_core::prelude::*;
//!
//! let dispatcher = Dispatcher::builder(categories![
//!     ErrorCategory::PermissionDenied,
//!     ErrorCategory::ResourceExhausted,
//!     ErrorCategory::Io,
//! ])
//! .build();
//!
//! assert_eq!(dispatcher.chain().len(), 3);
//! ```

/// Declare a [`CategoryChain`](crate::CategoryChain), most specific category first.
///
/// The ordering is checked while compiling: a category listed after one of its
/// supertypes (or listed twice) is a compile error.
///
/// # Examples
///
/// ```
/// use rust_logger_core::{categories, ErrorCategory};
///
/// let chain = categories![ErrorCategory::NotFound, ErrorCategory::Logic, ErrorCategory::Io];
/// assert_eq!(chain.classify(ErrorCategory::NotFound), Some(ErrorCategory::NotFound));
/// assert_eq!(chain.classify(ErrorCategory::MissingAttribute), Some(ErrorCategory::Logic));
///
/// let empty = categories![];
/// assert!(empty.is_empty());
/// ```
///
/// ```compile_fail
/// use rust_logger_core::{categories, ErrorCategory};
///
/// // `Logic` would shadow `MissingAttribute`.
/// let chain = categories![ErrorCategory::Logic, ErrorCategory::MissingAttribute];
/// ```
#[macro_export]
macro_rules! categories {
    ($($category:expr),* $(,)?) => {{
        const CHAIN: $crate::CategoryChain = $crate::CategoryChain::new(&[$($category),*]);
        CHAIN
    }};
}
