//! Per-kind fix templates
//!
//! Each [`ErrorKind`] maps to one [`FixTemplate`]: a guarded-replacement
//! renderer plus its fixed confidence constants. The registry makes each
//! kind's template testable in isolation and keeps dispatch table-driven.
//!
//! Rendering is purely textual (splitting and substitution on one candidate
//! line). It does not parse or validate the emitted code; a malformed
//! original line (chained expressions, multi-statement lines) can yield
//! syntactically wrong Python, which is an accepted limitation.
//!
//! Confidence values are opaque per-branch constants, not measurements.

use crate::locate::patterns::literal_key;
use crate::types::ErrorKind;

/// Template entry for one error kind.
pub struct FixTemplate {
    /// Confidence when a real source line was supplied
    pub real_confidence: f64,
    /// Confidence for the template-only fallback branch
    pub fallback_confidence: f64,
    /// Past-tense phrase for the explanation ("Added ... in <file>")
    pub explanation: &'static str,
    /// Render the guarded replacement for a concrete original line
    pub render: fn(original: &str, message: &str) -> String,
}

/// Look up the template for a kind. Total over the enum; kinds without a
/// curated template share the manual-review entry.
pub fn template_for(kind: ErrorKind) -> FixTemplate {
    match kind {
        ErrorKind::ZeroDivision => FixTemplate {
            real_confidence: 0.9,
            fallback_confidence: 0.6,
            explanation: "Added zero division check to prevent error",
            render: render_zero_division,
        },
        ErrorKind::KeyError => FixTemplate {
            real_confidence: 0.85,
            fallback_confidence: 0.5,
            explanation: "Replaced direct key access with safe .get() method",
            render: render_key_error,
        },
        ErrorKind::IndexError => FixTemplate {
            real_confidence: 0.8,
            fallback_confidence: 0.5,
            explanation: "Added bounds checking for list access",
            render: render_index_error,
        },
        ErrorKind::AttributeError => FixTemplate {
            real_confidence: 0.75,
            fallback_confidence: 0.5,
            explanation: "Added null checking before attribute access",
            render: render_attribute_error,
        },
        _ => FixTemplate {
            real_confidence: 0.5,
            fallback_confidence: 0.5,
            explanation: "Manual review required",
            render: render_manual_review,
        },
    }
}

// ============================================
// Renderers
// ============================================

/// Left-hand variable of an assignment, or a neutral name.
fn assigned_var(original: &str) -> &str {
    original
        .split_once('=')
        .map(|(lhs, _)| lhs.trim())
        .filter(|lhs| !lhs.is_empty())
        .unwrap_or("value")
}

/// Wrap the statement in a denominator guard.
///
/// The denominator is extracted textually as the first token after the
/// last `/` on the line.
fn render_zero_division(original: &str, _message: &str) -> String {
    let denominator = original
        .rsplit_once('/')
        .map(|(_, rhs)| rhs.trim())
        .and_then(|rhs| rhs.split_whitespace().next())
        .map(|tok| tok.trim_end_matches(&[':', ')', ','][..]));

    match denominator {
        Some(den) if !den.is_empty() => {
            let var = assigned_var(original);
            format!(
                "if {den} != 0:\n    {original}\nelse:\n    {var} = 0  # or handle division by zero appropriately\n    print(\"Warning: Division by zero prevented\")"
            )
        }
        _ => format!(
            "# Add zero division check before:\nif denominator != 0:\n    {original}\nelse:\n    # Handle division by zero\n    pass"
        ),
    }
}

/// Rewrite `d['key']` subscript access into `.get('key')` plus a None check.
fn render_key_error(original: &str, message: &str) -> String {
    let key = literal_key(message);

    if !key.is_empty() && original.contains('[') && original.contains(']') {
        // Match the key subscripted with single quotes, double quotes, or bare
        let escaped = regex::escape(key);
        let subscript = regex::Regex::new(&format!(
            r#"\['{escaped}'\]|\["{escaped}"\]|\[{escaped}\]"#
        ))
        .expect("key is escaped");
        let replacement = format!(".get('{key}')");
        let rewritten = subscript.replace_all(original, regex::NoExpand(&replacement));

        if rewritten != original {
            let var = assigned_var(original);
            return format!(
                "{rewritten}\nif {var} is None:\n    print(\"Warning: missing key '{key}'\")"
            );
        }
    }

    format!(
        "# Replace direct key access with safe access:\n# Original: {original}\n# Use: data.get('{key}', default_value) instead"
    )
}

/// Wrap list access in a bounds guard.
fn render_index_error(original: &str, _message: &str) -> String {
    if original.contains('[') && original.contains(']') && original.contains('=') {
        let var = assigned_var(original);
        format!(
            "if 0 <= index < len(items):\n    {original}\nelse:\n    {var} = None  # or handle out of bounds\n    print(\"Warning: Index out of bounds\")"
        )
    } else {
        format!(
            "# Add bounds checking before:\nif 0 <= index < len(items):\n    {original}\nelse:\n    # Handle index out of bounds\n    pass"
        )
    }
}

/// Guard attribute access with an `is not None` check on the base object,
/// derived textually from the token preceding the first `.`.
fn render_attribute_error(original: &str, _message: &str) -> String {
    let base = original
        .split_once('.')
        .map(|(lhs, _)| lhs)
        .and_then(|lhs| lhs.split_whitespace().last())
        .map(|tok| tok.trim_start_matches(&['(', '=', ' '][..]));

    match base {
        Some(obj) if !obj.is_empty() => format!(
            "if {obj} is not None:\n    {original}\nelse:\n    print(\"Warning: {obj} is None\")"
        ),
        _ => format!(
            "# Add null checking before:\nif obj is not None:\n    {original}\nelse:\n    # Handle None object\n    pass"
        ),
    }
}

/// Catch-all: no curated rewrite exists for this kind.
fn render_manual_review(original: &str, _message: &str) -> String {
    format!("# Manual review required for the following line:\n{original}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_division_guard_references_denominator() {
        let fixed = render_zero_division("result = a / b", "");
        assert!(fixed.starts_with("if b != 0:"));
        assert!(fixed.contains("result = a / b"));
        assert!(fixed.contains("result = 0"));
    }

    #[test]
    fn test_zero_division_uses_last_slash() {
        let fixed = render_zero_division("rate = total / count / denom", "");
        assert!(fixed.starts_with("if denom != 0:"));
    }

    #[test]
    fn test_zero_division_without_operands() {
        let fixed = render_zero_division("compute()", "");
        assert!(fixed.starts_with("# Add zero division check"));
    }

    #[test]
    fn test_key_error_rewrites_subscript() {
        let fixed = render_key_error("email = data['email']", "'email'");
        assert!(fixed.contains("data.get('email')"));
        assert!(fixed.contains("if email is None:"));
    }

    #[test]
    fn test_key_error_double_quoted_subscript() {
        let fixed = render_key_error("email = data[\"email\"]", "'email'");
        assert!(fixed.contains("data.get('email')"));
    }

    #[test]
    fn test_key_error_falls_back_to_comment() {
        let fixed = render_key_error("value = lookup(key)", "'email'");
        assert!(fixed.starts_with("# Replace direct key access"));
        assert!(fixed.contains("data.get('email', default_value)"));
    }

    #[test]
    fn test_index_error_guard() {
        let fixed = render_index_error("user = users[index]", "");
        assert!(fixed.starts_with("if 0 <= index < len(items):"));
        assert!(fixed.contains("user = None"));
    }

    #[test]
    fn test_attribute_error_guard() {
        let fixed = render_attribute_error("return user.name", "");
        assert!(fixed.starts_with("if user is not None:"));
        assert!(fixed.contains("return user.name"));
    }

    #[test]
    fn test_confidence_constants() {
        assert!(template_for(ErrorKind::ZeroDivision).real_confidence >= 0.85);
        assert!(template_for(ErrorKind::ZeroDivision).fallback_confidence <= 0.6);
        assert_eq!(template_for(ErrorKind::KeyError).real_confidence, 0.85);
        assert_eq!(template_for(ErrorKind::TypeError).real_confidence, 0.5);
    }

    #[test]
    fn test_rendering_is_pure() {
        let a = render_zero_division("result = a / b", "");
        let b = render_zero_division("result = a / b", "");
        assert_eq!(a, b);
    }
}
