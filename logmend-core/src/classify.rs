//! Error classification from free-text log lines
//!
//! Maps a single log line to one of the closed [`ErrorKind`] categories via
//! an ordered table of regex patterns.
//!
//! ## Determinism
//!
//! Kinds are tried in declaration order ([`ErrorKind::ALL`]) and the first
//! kind with any matching pattern wins. A line containing both "KeyError"
//! and "IndexError" substrings therefore always resolves to `KeyError`,
//! because it is declared first. Ties never depend on pattern order within
//! a kind, only on kind order.

use crate::types::ErrorKind;
use once_cell::sync::Lazy;
use regex::RegexSet;

/// One classifier table entry: a kind plus its detection patterns,
/// compiled once into a case-insensitive [`RegexSet`].
struct KindPatterns {
    kind: ErrorKind,
    patterns: RegexSet,
}

fn compile(patterns: &[&str]) -> RegexSet {
    // (?i) makes every alternative case-insensitive
    let prefixed: Vec<String> = patterns.iter().map(|p| format!("(?i){}", p)).collect();
    RegexSet::new(&prefixed).expect("classifier patterns must compile")
}

/// Ordered detection table. Declaration order is a contract: the first
/// matching kind wins, so reordering entries changes observable behavior.
static CLASSIFIER_TABLE: Lazy<Vec<KindPatterns>> = Lazy::new(|| {
    vec![
        KindPatterns {
            kind: ErrorKind::ZeroDivision,
            patterns: compile(&[
                r"ZeroDivisionError",
                r"division by zero",
                r"float division by zero",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::KeyError,
            patterns: compile(&[r"KeyError", r"key.*not found", r"missing key"]),
        },
        KindPatterns {
            kind: ErrorKind::IndexError,
            patterns: compile(&[
                r"IndexError",
                r"list index out of range",
                r"index.*out of bounds",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::ValueError,
            patterns: compile(&[r"ValueError", r"invalid literal", r"could not convert"]),
        },
        KindPatterns {
            kind: ErrorKind::TypeError,
            patterns: compile(&[
                r"TypeError",
                r"unsupported operand type",
                r"can't multiply sequence",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::AttributeError,
            patterns: compile(&[
                r"AttributeError",
                r"has no attribute",
                r"NoneType.*has no attribute",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::JsonDecode,
            patterns: compile(&[
                r"JSONDecodeError",
                r"Expecting property name",
                r"Invalid JSON",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::ImportError,
            patterns: compile(&[
                r"ImportError",
                r"ModuleNotFoundError",
                r"No module named",
            ]),
        },
        KindPatterns {
            kind: ErrorKind::NameError,
            patterns: compile(&[
                r"NameError",
                r"name.*is not defined",
                r"global name.*is not defined",
            ]),
        },
    ]
});

/// Classify a single log line.
///
/// Returns the first [`ErrorKind`] (in declaration order) with any pattern
/// matching anywhere in the line, or `None` when nothing matches. A miss is
/// not an error; unclassified lines are simply skipped upstream.
pub fn classify(line: &str) -> Option<ErrorKind> {
    CLASSIFIER_TABLE
        .iter()
        .find(|entry| entry.patterns.is_match(line))
        .map(|entry| entry.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_canonical_lines() {
        assert_eq!(
            classify("ZeroDivisionError: division by zero"),
            Some(ErrorKind::ZeroDivision)
        );
        assert_eq!(classify("KeyError: 'email'"), Some(ErrorKind::KeyError));
        assert_eq!(
            classify("IndexError: list index out of range"),
            Some(ErrorKind::IndexError)
        );
        assert_eq!(
            classify("AttributeError: 'NoneType' object has no attribute 'name'"),
            Some(ErrorKind::AttributeError)
        );
        assert_eq!(classify("SegmentationFault at 0xdeadbeef"), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("ERROR: keyerror while reading settings"),
            Some(ErrorKind::KeyError)
        );
        assert_eq!(
            classify("2024-01-01 division BY ZERO in worker"),
            Some(ErrorKind::ZeroDivision)
        );
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        // Both KeyError and IndexError substrings; KeyError is declared first.
        assert_eq!(
            classify("KeyError raised while handling IndexError"),
            Some(ErrorKind::KeyError)
        );
        // ZeroDivision precedes everything.
        assert_eq!(
            classify("TypeError after ZeroDivisionError"),
            Some(ErrorKind::ZeroDivision)
        );
    }

    #[test]
    fn test_classify_deterministic() {
        let line = "ValueError: invalid literal for int() with base 10: 'x'";
        let first = classify(line);
        for _ in 0..10 {
            assert_eq!(classify(line), first);
        }
    }

    #[test]
    fn test_secondary_patterns() {
        assert_eq!(
            classify("fatal: No module named 'requests'"),
            Some(ErrorKind::ImportError)
        );
        assert_eq!(
            classify("could not convert string to float"),
            Some(ErrorKind::ValueError)
        );
        assert_eq!(
            classify("config key 'timeout' not found"),
            Some(ErrorKind::KeyError)
        );
    }
}
