//! Property-based tests for rust_logger_core using proptest

use proptest::prelude::*;
use rust_logger_core::core::category;
use rust_logger_core::prelude::*;
use rust_logger_core::sinks::PathPattern;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn any_category() -> impl Strategy<Value = ErrorCategory> {
    prop::sample::select(ErrorCategory::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that severity ordering follows level ordering
    #[test]
    fn test_log_level_severity_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, a.as_i32() <= b.as_i32());
        prop_assert_eq!(LogLevel::try_from(a.as_i32()), Ok(a));
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Accessors return exactly what the record was built from
    #[test]
    fn test_record_accessors(
        severity in any::<i32>(),
        message in ".*",
        formatted in ".*",
        key in "[a-z]{1,8}",
        value in any::<i64>(),
    ) {
        let list: &AttributeList = &[(key.as_str(), Value::Int(value))];
        let pack: &AttributePack = &[list];

        let mut record = Record::new(severity, &message, pack);
        record.activate(&formatted);

        prop_assert_eq!(record.severity(), severity);
        prop_assert_eq!(record.message(), message.as_str());
        prop_assert_eq!(record.formatted(), formatted.as_str());
        prop_assert_eq!(record.attribute(&key), Some(&Value::Int(value)));
        prop_assert_eq!(record.pid(), std::process::id());
    }
}

// ============================================================================
// Category Chain Tests
// ============================================================================

proptest! {
    /// A chain is sound exactly when no entry is shadowed by an earlier one
    #[test]
    fn test_soundness_matches_shadowing(chain in prop::collection::vec(any_category(), 0..5)) {
        let shadowed = chain.iter().enumerate().any(|(j, later)| {
            chain[..j].iter().any(|earlier| later.is_a(*earlier))
        });
        prop_assert_eq!(category::is_sound(&chain), !shadowed);
    }

    /// In a sound chain, every declared category is selected for its own failures
    #[test]
    fn test_sound_chain_selects_declared_category(chain in prop::collection::vec(any_category(), 0..5)) {
        prop_assume!(category::is_sound(&chain));
        let chain: &'static [ErrorCategory] = Box::leak(chain.into_boxed_slice());
        let chain = CategoryChain::new(chain);

        for declared in chain.categories() {
            prop_assert_eq!(chain.classify(*declared), Some(*declared));
        }
    }

    /// Classification only ever picks an ancestor of the failure's category
    #[test]
    fn test_classification_respects_hierarchy(failure in any_category()) {
        let chain = categories![
            ErrorCategory::NotFound,
            ErrorCategory::MissingAttribute,
            ErrorCategory::Io,
            ErrorCategory::Logic,
        ];
        match chain.classify(failure) {
            Some(selected) => prop_assert!(failure.is_a(selected)),
            None => prop_assert_eq!(failure, ErrorCategory::Runtime),
        }
    }
}

// ============================================================================
// Path Pattern Tests
// ============================================================================

proptest! {
    /// Brace-free paths are static and resolve to themselves
    #[test]
    fn test_plain_paths_are_static(path in "/[a-zA-Z0-9_./-]{1,40}") {
        let pattern = PathPattern::parse(&path).unwrap();
        prop_assert!(pattern.is_static());

        let record = Record::new(LogLevel::Info, "m", EMPTY_PACK);
        prop_assert_eq!(pattern.resolve(&record).unwrap(), path.as_str());
    }

    /// Parsing arbitrary input never panics
    #[test]
    fn test_pattern_parse_no_panic(input in ".*") {
        let _ = PathPattern::parse(&input);
    }
}
