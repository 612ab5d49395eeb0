//! Per-kind search heuristics for the source locator
//!
//! One registry entry per [`ErrorKind`] bundles everything the locator needs
//! to recognize plausible code for that kind:
//!
//! - **content patterns**: regexes tested against whole-file content to pick
//!   a candidate file (strategy 3),
//! - **strong / weak line signals**: the two passes of the line search,
//! - **specific line signals**: the stricter secondary search that is always
//!   run and preferred under the documented override rule.
//!
//! All signals are purely textual. They do not prove anything about the
//! code; they pick the first plausible line, which is the stated contract.

use crate::types::ErrorKind;
use regex::Regex;

/// Strip surrounding quotes from a KeyError-style message to get the key.
pub fn literal_key(message: &str) -> &str {
    message.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Last whitespace-separated token of the message (NameError carries the
/// undefined name there), or "undefined" for an empty message.
fn last_token(message: &str) -> &str {
    message.split_whitespace().last().unwrap_or("undefined")
}

/// Compile the content patterns for a kind, tested case-insensitively
/// against full file content during strategy-3 scans.
pub fn content_patterns(kind: ErrorKind, message: &str) -> Vec<Regex> {
    let raw: Vec<String> = match kind {
        ErrorKind::ZeroDivision => vec![
            r"/\s*[a-zA-Z_]".into(),
            "divide".into(),
            "division".into(),
        ],
        ErrorKind::KeyError => vec![
            format!(r#"['"]?{}['"]?"#, regex::escape(literal_key(message))),
            r"\[.*\]".into(),
            r"\.get\(".into(),
        ],
        ErrorKind::IndexError => vec![r"\[.*\]".into(), "list".into(), "index".into()],
        ErrorKind::AttributeError => {
            vec![r"\.[a-zA-Z_]".into(), "None".into(), "attribute".into()]
        }
        ErrorKind::NameError => vec![
            regex::escape(last_token(message)),
            r"name.*not.*defined".into(),
        ],
        ErrorKind::TypeError => vec!["function".into(), "argument".into(), "type".into()],
        ErrorKind::ValueError => vec!["value".into(), "convert".into(), "invalid".into()],
        ErrorKind::ImportError => vec!["import".into(), "module".into()],
        // No curated patterns; fall back to the kind's own name.
        ErrorKind::JsonDecode => vec![regex::escape(kind.as_str())],
    };

    raw.iter()
        .filter_map(|p| Regex::new(&format!("(?i){}", p)).ok())
        .collect()
}

/// Pass-one line signal: a strong per-kind indication that this line could
/// raise the error. Callers only feed non-blank, non-comment lines.
pub fn strong_line_signal(kind: ErrorKind, line: &str, message: &str) -> bool {
    let trimmed = line.trim();
    match kind {
        ErrorKind::ZeroDivision => {
            line.contains('/') && !trimmed.starts_with("//") && line.contains('=')
        }
        ErrorKind::KeyError => {
            let key = literal_key(message);
            !key.is_empty()
                && (line.contains(&format!("['{}']", key))
                    || line.contains(&format!("[\"{}\"]", key))
                    || line.contains(&format!("[{}]", key)))
        }
        ErrorKind::IndexError => {
            line.contains('[')
                && line.contains(']')
                && line.contains('=')
                && !line.to_lowercase().contains("dict")
        }
        ErrorKind::AttributeError => {
            line.contains('.') && line.contains("return") && !line.contains("self.")
        }
        _ => false,
    }
}

/// Pass-two line signal: the kind's generic marker, relaxed.
pub fn weak_line_signal(kind: ErrorKind, line: &str) -> bool {
    match kind {
        ErrorKind::ZeroDivision => line.contains('/'),
        ErrorKind::KeyError => line.contains('[') || line.contains("get("),
        ErrorKind::IndexError => line.contains('['),
        ErrorKind::AttributeError => line.contains('.'),
        _ => false,
    }
}

/// Stricter secondary signal, targeting idiomatic variable names.
///
/// Always run in addition to the two-pass search; its result is preferred
/// whenever it lands on a non-comment line that does not mention "module".
pub fn specific_line_signal(kind: ErrorKind, line: &str, message: &str) -> bool {
    match kind {
        ErrorKind::ZeroDivision => {
            line.contains('/') && line.contains("result") && line.contains('=')
        }
        ErrorKind::KeyError => {
            let key = literal_key(message);
            !key.is_empty() && line.contains(key) && line.contains('[') && line.contains(']')
        }
        ErrorKind::IndexError => line.contains("items[") || line.contains("list["),
        ErrorKind::AttributeError => line.contains(".name") || line.contains(".attribute"),
        _ => false,
    }
}
