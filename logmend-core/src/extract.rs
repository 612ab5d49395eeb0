//! Log record extraction
//!
//! Given a classified line and a bounded window of surrounding lines, this
//! module recovers the timestamp, file/line hint, message substring, and a
//! traceback blob, producing one immutable [`ErrorRecord`].
//!
//! Every step is an ordered list of `Option`-returning attempts,
//! short-circuited on first success; any parse failure falls through to a
//! stated default. Extraction never fails for malformed input.

use crate::types::{ErrorKind, ErrorRecord};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// How far around the matched line the file/line hint scan looks.
const FILE_HINT_WINDOW: usize = 5;
/// Traceback window: lines before the matched line...
const TRACEBACK_BEFORE: usize = 10;
/// ...and lines after it.
const TRACEBACK_AFTER: usize = 5;

// ============================================
// Timestamp extraction
// ============================================

/// A timestamp attempt: a detection regex paired with a chrono format.
struct TimestampPattern {
    regex: Regex,
    format: &'static str,
    /// Syslog timestamps carry no year; it is filled in before parsing.
    needs_year: bool,
}

static TIMESTAMP_PATTERNS: Lazy<Vec<TimestampPattern>> = Lazy::new(|| {
    vec![
        // 2024-01-01 12:00:00
        TimestampPattern {
            regex: Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").unwrap(),
            format: "%Y-%m-%d %H:%M:%S",
            needs_year: false,
        },
        // 01/01/2024 12:00:00
        TimestampPattern {
            regex: Regex::new(r"\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}").unwrap(),
            format: "%m/%d/%Y %H:%M:%S",
            needs_year: false,
        },
        // Jan 01 12:00:00
        TimestampPattern {
            regex: Regex::new(r"[A-Za-z]{3} \d{2} \d{2}:\d{2}:\d{2}").unwrap(),
            format: "%Y %b %d %H:%M:%S",
            needs_year: true,
        },
    ]
});

/// Extract a timestamp from the matched line only.
///
/// The first pattern that both matches and parses wins. When nothing
/// parses, the current process time is the default; explicitly not an error.
///
/// Year-less syslog timestamps are completed with the current UTC year, so
/// re-running an identical log across a year boundary yields different
/// record bytes; only fully-dated formats are idempotent.
fn extract_timestamp(line: &str) -> DateTime<Utc> {
    for pattern in TIMESTAMP_PATTERNS.iter() {
        let Some(m) = pattern.regex.find(line) else {
            continue;
        };
        let candidate = if pattern.needs_year {
            format!("{} {}", Utc::now().year(), m.as_str())
        } else {
            m.as_str().to_string()
        };
        if let Ok(naive) = NaiveDateTime::parse_from_str(&candidate, pattern.format) {
            return Utc.from_utc_datetime(&naive);
        }
    }
    Utc::now()
}

// ============================================
// File/line hint extraction
// ============================================

static FILE_LINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Python traceback: File "app/views.py", line 42
        Regex::new(r#"File "([^"]+)", line (\d+)"#).unwrap(),
        // General: at app/views.py:42
        Regex::new(r"at ([^:\s]+):(\d+)").unwrap(),
        // PHP style: in app/views.php on line 42
        Regex::new(r"in ([^:\s]+) on line (\d+)").unwrap(),
        // Compiler style: app/views.c:42:7: error
        Regex::new(r"([^:\s]+):(\d+):\d+: error").unwrap(),
    ]
});

fn match_file_line(line: &str) -> Option<(String, u32)> {
    for pattern in FILE_LINE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let path = caps.get(1)?.as_str().to_string();
            let number = caps.get(2)?.as_str().parse().ok()?;
            return Some((path, number));
        }
    }
    None
}

/// Find a file/line hint on the matched line, then in a window of
/// surrounding lines (in file order). `None` when nothing in the window
/// matches any pattern.
fn extract_file_hint(
    lines: &[String],
    index: usize,
) -> (Option<String>, Option<u32>) {
    if let Some((path, number)) = match_file_line(&lines[index]) {
        return (Some(path), Some(number));
    }

    let start = index.saturating_sub(FILE_HINT_WINDOW);
    let end = (index + FILE_HINT_WINDOW).min(lines.len());
    for line in &lines[start..end] {
        if let Some((path, number)) = match_file_line(line) {
            return (Some(path), Some(number));
        }
    }

    (None, None)
}

// ============================================
// Message extraction
// ============================================

/// Extract the message portion of the matched line.
///
/// Takes the remainder after the first case-insensitive occurrence of the
/// kind name (leading colon stripped), so `Kind: rest` yields `rest`; falls
/// back to the whole line. The match end is a byte offset into the original
/// string, which keeps the slice valid for any UTF-8 input.
fn extract_message(line: &str, kind: ErrorKind) -> String {
    let name = kind.as_str();

    let name_pattern =
        Regex::new(&format!(r"(?i){}", regex::escape(name))).expect("kind names are literal");
    if let Some(m) = name_pattern.find(line) {
        let mut rest = line[m.end()..].trim();
        rest = rest.strip_prefix(':').unwrap_or(rest).trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    line.to_string()
}

// ============================================
// Traceback extraction
// ============================================

/// Whether a line looks like part of a traceback.
fn is_traceback_like(raw: &str) -> bool {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    lower.contains("traceback")
        || lower.contains("file \"")
        || trimmed.contains("at ")
        || trimmed.contains("in ")
        || raw.starts_with(' ')
        || raw.starts_with('\t')
        || ErrorKind::ALL.iter().any(|k| trimmed.contains(k.as_str()))
}

/// Concatenate traceback-looking lines from a window around the matched
/// line; falls back to just the matched line when none qualify.
fn extract_traceback(lines: &[String], index: usize) -> String {
    let start = index.saturating_sub(TRACEBACK_BEFORE);
    let end = (index + TRACEBACK_AFTER).min(lines.len());

    let collected: Vec<&str> = lines[start..end]
        .iter()
        .filter(|raw| !raw.trim().is_empty() && is_traceback_like(raw))
        .map(|raw| raw.trim())
        .collect();

    if collected.is_empty() {
        lines[index].trim().to_string()
    } else {
        collected.join("\n")
    }
}

// ============================================
// Record assembly
// ============================================

/// Build an [`ErrorRecord`] from the matched line at `index` and its
/// surrounding context. Never fails; every field degrades to its default.
pub fn extract(lines: &[String], index: usize, kind: ErrorKind) -> ErrorRecord {
    let matched = lines[index].trim().to_string();
    let (file_path, line_number) = extract_file_hint(lines, index);

    ErrorRecord {
        kind,
        message: extract_message(&matched, kind),
        timestamp: extract_timestamp(&matched),
        traceback: extract_traceback(lines, index),
        raw_log_line: matched,
        file_path,
        line_number,
    }
}
