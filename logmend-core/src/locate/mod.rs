//! Heuristic source location
//!
//! Given a repository root and one [`ErrorRecord`], find a file and line
//! that plausibly correspond to the error. Three escalating strategies run
//! in order, first success wins:
//!
//! 1. **Direct match** — path variants built from the hint (as-is, leading
//!    slash stripped, container prefix `/app/` removed, basename only) are
//!    joined to the root and tested for existence.
//! 2. **Filename match** — first file in the tree whose basename equals the
//!    hint's basename.
//! 3. **Content match** — first source file whose content matches any of
//!    the kind's content patterns (see [`patterns`]).
//!
//! Strategy 1 uses the hint's line number verbatim when present; otherwise,
//! and for strategies 2 and 3, the line is chosen by a two-pass search
//! (strong per-kind signals, then generic markers, then line 1). A stricter
//! specific search always runs as well and is preferred whenever its line
//! is not a comment and does not contain the word "module" — preserved
//! exactly as documented, quirks included.
//!
//! The walk is deterministic (per-directory sorted order, courtesy of
//! `glob`), never writes to the tree, and skips unreadable files silently.

pub mod patterns;

use crate::config::ScanConfig;
use crate::types::{CodeLocation, ErrorKind, ErrorRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Heuristic locator over one read-only repository checkout.
pub struct Locator<'a> {
    repo_root: &'a Path,
    scan: &'a ScanConfig,
}

impl<'a> Locator<'a> {
    pub fn new(repo_root: &'a Path, scan: &'a ScanConfig) -> Self {
        Self { repo_root, scan }
    }

    /// Run the strategy chain for one record.
    ///
    /// Returns `None` when no strategy finds a file. Never fails on
    /// per-file read errors; those files are skipped and the walk continues.
    pub fn locate(&self, record: &ErrorRecord) -> Option<CodeLocation> {
        self.direct_match(record)
            .or_else(|| self.filename_match(record))
            .or_else(|| self.content_match(record))
    }

    // ============================================
    // Strategy 1: direct path match
    // ============================================

    fn direct_match(&self, record: &ErrorRecord) -> Option<CodeLocation> {
        let hint = record.file_path.as_deref()?;

        let variants = [
            hint.to_string(),
            hint.trim_start_matches('/').to_string(),
            hint.replace("/app/", ""),
            Path::new(hint)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ];

        for variant in variants.iter().filter(|v| !v.is_empty()) {
            let candidate = self.repo_root.join(variant);
            if !candidate.is_file() {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&candidate) else {
                tracing::debug!(path = %candidate.display(), "skipping unreadable candidate");
                continue;
            };

            // The hint line is trusted verbatim when present.
            let line = record
                .line_number
                .unwrap_or_else(|| choose_line(&content, record.kind, &record.message));

            tracing::debug!(
                path = %candidate.display(),
                line,
                "direct path match"
            );
            return Some(build_location(candidate, line, &content));
        }

        None
    }

    // ============================================
    // Strategy 2: filename match
    // ============================================

    fn filename_match(&self, record: &ErrorRecord) -> Option<CodeLocation> {
        let hint = record.file_path.as_deref()?;
        let basename = Path::new(hint).file_name()?.to_str()?.to_string();

        // Escape the root and basename so bracketed checkout paths stay
        // literal in the pattern
        let pattern = format!(
            "{}/**/{}",
            glob::Pattern::escape(&self.repo_root.display().to_string()),
            glob::Pattern::escape(&basename)
        );
        let candidates = glob::glob(&pattern).ok()?;

        for path in candidates.flatten() {
            if self.is_skipped(&path) || !path.is_file() {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                tracing::debug!(path = %path.display(), "skipping unreadable file");
                continue;
            };

            let line = choose_line(&content, record.kind, &record.message);
            tracing::debug!(path = %path.display(), line, "filename match");
            return Some(build_location(path, line, &content));
        }

        None
    }

    // ============================================
    // Strategy 3: content pattern match
    // ============================================

    fn content_match(&self, record: &ErrorRecord) -> Option<CodeLocation> {
        let content_patterns = patterns::content_patterns(record.kind, &record.message);
        if content_patterns.is_empty() {
            return None;
        }

        for path in self.source_files() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                tracing::debug!(path = %path.display(), "skipping unreadable file");
                continue;
            };

            if content_patterns.iter().any(|p| p.is_match(&content)) {
                let line = choose_line(&content, record.kind, &record.message);
                tracing::debug!(path = %path.display(), line, "content pattern match");
                return Some(build_location(path, line, &content));
            }
        }

        None
    }

    /// All source files under the root, deterministically ordered, with
    /// skip-listed directories and oversized files filtered out.
    fn source_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let escaped_root = glob::Pattern::escape(&self.repo_root.display().to_string());
        for ext in &self.scan.source_extensions {
            let pattern = format!("{}/**/*.{}", escaped_root, glob::Pattern::escape(ext));
            let Ok(entries) = glob::glob(&pattern) else {
                continue;
            };
            for path in entries.flatten() {
                if self.is_skipped(&path) || !path.is_file() {
                    continue;
                }
                if let Ok(meta) = path.metadata() {
                    if meta.len() > self.scan.max_file_bytes {
                        continue;
                    }
                }
                files.push(path);
            }
        }

        // glob yields per-directory sorted order within one extension;
        // sort the combined list so multi-extension scans stay deterministic
        files.sort();
        files
    }

    fn is_skipped(&self, path: &Path) -> bool {
        path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|name| self.scan.skip_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
        })
    }
}

// ============================================
// Line selection
// ============================================

/// Whether a trimmed line is worth considering at all.
fn is_meaningful(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && !trimmed.starts_with('#')
        && !trimmed.starts_with("\"\"\"")
        && !trimmed.starts_with("'''")
}

/// Two-pass line search: strong per-kind signals first, then the kind's
/// generic marker, then line 1.
fn two_pass_line(content: &str, kind: ErrorKind, message: &str) -> u32 {
    let lines: Vec<&str> = content.lines().collect();

    // Pass one: strong signals
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if patterns::strong_line_signal(kind, line, message) {
            return (i + 1) as u32;
        }
    }

    // Pass two: generic markers
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if patterns::weak_line_signal(kind, line) {
            return (i + 1) as u32;
        }
    }

    1
}

/// Stricter secondary search; falls back to the first meaningful line.
fn specific_line(content: &str, kind: ErrorKind, message: &str) -> u32 {
    let lines: Vec<&str> = content.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if patterns::specific_line_signal(kind, line, message) {
            return (i + 1) as u32;
        }
    }

    for (i, line) in lines.iter().enumerate() {
        if is_meaningful(line.trim()) {
            return (i + 1) as u32;
        }
    }

    1
}

fn line_text(content: &str, line_number: u32) -> &str {
    content
        .lines()
        .nth(line_number.saturating_sub(1) as usize)
        .map(str::trim)
        .unwrap_or("")
}

/// Pick a line for a chosen file.
///
/// The specific search overrides the two-pass result whenever it lands on a
/// non-empty, non-comment line that does not contain "module". This rule is
/// intentionally reproduced as documented rather than rationalized.
fn choose_line(content: &str, kind: ErrorKind, message: &str) -> u32 {
    let generic = two_pass_line(content, kind, message);
    let specific = specific_line(content, kind, message);

    let text = line_text(content, specific);
    if !text.is_empty() && !text.starts_with('#') && !text.to_lowercase().contains("module") {
        specific
    } else {
        generic
    }
}

// ============================================
// Enclosing function recovery
// ============================================

static DEF_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*def\s+(\w+)").unwrap());

/// Name of the last `def` declared at or before `line_number`, if any.
fn enclosing_function(content: &str, line_number: u32) -> Option<String> {
    let mut current = None;
    for (i, line) in content.lines().enumerate() {
        if let Some(caps) = DEF_PATTERN.captures(line) {
            current = Some(caps[1].to_string());
        }
        if (i + 1) as u32 == line_number {
            return current;
        }
    }
    current
}

fn build_location(file_path: PathBuf, line_number: u32, content: &str) -> CodeLocation {
    CodeLocation {
        enclosing_function: enclosing_function(content, line_number),
        file_path,
        line_number,
    }
}
