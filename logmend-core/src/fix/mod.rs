//! Deterministic fix synthesis
//!
//! Produces one [`FixSuggestion`] per error record from the per-kind
//! template registry in [`templates`]. Two branches exist:
//!
//! - **real**: a source line was located; the template wraps that exact
//!   line in a guard, and the explanation names the file.
//! - **fallback**: the locator found nothing; a template-only suggestion is
//!   emitted with an explicit placeholder as `original_code` and a lower
//!   confidence constant.
//!
//! Both branches are pure functions of (kind, optional original line): the
//! same inputs always produce byte-identical output.

pub mod templates;

use crate::types::{CodeLocation, ErrorKind, FixSuggestion};

/// Placeholder used as `original_code` when the locator came up empty.
pub const CODE_NOT_FOUND: &str = "# Original code not found in repository";

/// Synthesize a fix for one record.
///
/// `located` and `original_line` travel together: a location without a
/// readable line degrades to the fallback branch as well.
pub fn synthesize(
    kind: ErrorKind,
    located: Option<&CodeLocation>,
    original_line: Option<&str>,
    message: &str,
) -> FixSuggestion {
    let template = templates::template_for(kind);

    match (located, original_line) {
        (Some(location), Some(original)) if !original.trim().is_empty() => {
            let original = original.trim();
            let file_name = location
                .file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| location.file_path.display().to_string());

            FixSuggestion {
                description: format!("Fix {} in {}", kind, file_name),
                original_code: original.to_string(),
                fixed_code: (template.render)(original, message),
                explanation: format!("{} in {}", template.explanation, file_name),
                confidence: template.real_confidence,
            }
        }
        _ => FixSuggestion {
            description: format!("Template fix for {}", kind),
            original_code: CODE_NOT_FOUND.to_string(),
            fixed_code: (template.render)(CODE_NOT_FOUND, message),
            explanation: format!(
                "Template-based fix for {} - actual code not found in repository",
                kind
            ),
            confidence: template.fallback_confidence,
        },
    }
}
