//! Cross-engine issue identity.
//!
//! Two issues share a fingerprint when they describe the same defect class
//! at the same location against the same criterion, whichever engine
//! reported them. Engine-local ids play no part.

use crate::rules::{classify, normalize_rule_id};
use lumen_core::AccessibilityIssue;
use std::fmt;

/// Location key used for issues with no selector, file or xpath.
const DOCUMENT_LOCATION: &str = "document";

/// Derived identity of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    /// Defect class, or normalized rule id for unknown rules
    pub defect: String,
    /// Normalized location
    pub location: String,
    /// WCAG criterion, empty when neither the rule nor the issue names one
    pub criterion: String,
}

impl Fingerprint {
    /// Compute the fingerprint of an issue.
    #[must_use]
    pub fn of(issue: &AccessibilityIssue) -> Self {
        let class = classify(issue.tool, &issue.rule_id);
        let defect = class.map_or_else(
            || normalize_rule_id(issue.tool, &issue.rule_id),
            |c| c.as_str().to_string(),
        );

        // Known rules always fingerprint under their canonical criterion so
        // that engines tagging the same defect differently still collapse.
        let criterion = class
            .map(|c| c.criterion().to_string())
            .or_else(|| issue.criterion().map(|c| c.trim().to_string()))
            .unwrap_or_default();

        Self {
            defect,
            location: location_key(issue),
            criterion,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.defect, self.location, self.criterion)
    }
}

/// Normalized location: selector, else `file:line`, else xpath, else `document`.
#[must_use]
pub fn location_key(issue: &AccessibilityIssue) -> String {
    let location = &issue.location;

    if let Some(selector) = location.selector.as_deref().filter(|s| !s.trim().is_empty()) {
        return normalize_selector(selector);
    }

    if let Some(file) = location.file.as_deref().filter(|f| !f.trim().is_empty()) {
        return match location.line {
            Some(line) => format!("{}:{line}", file.trim()),
            None => file.trim().to_string(),
        };
    }

    if let Some(xpath) = location.xpath.as_deref().filter(|x| !x.trim().is_empty()) {
        return xpath.trim().to_string();
    }

    DOCUMENT_LOCATION.to_string()
}

/// Collapse whitespace in a selector, drop spacing around the `>`, `+` and
/// `~` combinators, and lowercase type selectors.
///
/// Ids, classes, attribute values and anything quoted are case-sensitive in
/// CSS and are kept verbatim, as is the content of `[...]` and `(...)`.
#[must_use]
pub fn normalize_selector(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut chars = selector.trim().chars();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut pending_space = false;
    let mut compound_start = true;
    let mut in_type = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                out.extend(chars.next());
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            in_type = false;
            continue;
        }

        if depth == 0 && matches!(c, '>' | '+' | '~') {
            out.push(c);
            pending_space = false;
            compound_start = true;
            in_type = false;
            continue;
        }

        if pending_space {
            pending_space = false;
            let after_combinator = depth == 0 && out.ends_with(['>', '+', '~']);
            if !after_combinator {
                out.push(' ');
                compound_start = depth == 0;
            }
        }

        if depth == 0 && compound_start && (c.is_alphabetic() || c == '_' || c == '-') {
            in_type = true;
        }
        compound_start = false;

        match c {
            '"' | '\'' => {
                quote = Some(c);
                in_type = false;
                out.push(c);
            }
            '[' | '(' => {
                depth += 1;
                in_type = false;
                out.push(c);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            '\\' => {
                in_type = false;
                out.push(c);
                out.extend(chars.next());
            }
            _ if in_type && (c.is_alphanumeric() || c == '-' || c == '_') => {
                out.extend(c.to_lowercase());
            }
            _ => {
                in_type = false;
                out.push(c);
            }
        }
    }
    out
}
