//! Issue deduplication.
//!
//! Collapses issues sharing a [`Fingerprint`] down to one representative.
//! Non-representatives are dropped, not merged; the input is never mutated.

use crate::fingerprint::Fingerprint;
use lumen_core::AccessibilityIssue;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Keep one issue per fingerprint.
///
/// The representative is the issue with the richest metadata, then the
/// highest-priority tool, then the smallest rule id and id. Groups appear in
/// the order their first member appeared in `issues`. Applying this twice
/// gives the same result as applying it once.
#[must_use]
pub fn deduplicate(issues: &[AccessibilityIssue]) -> Vec<AccessibilityIssue> {
    let mut slots: HashMap<Fingerprint, usize> = HashMap::with_capacity(issues.len());
    let mut kept: Vec<&AccessibilityIssue> = Vec::with_capacity(issues.len());

    for issue in issues {
        match slots.entry(Fingerprint::of(issue)) {
            Entry::Occupied(slot) => {
                let slot = *slot.get();
                if prefer(issue, kept[slot]) == Ordering::Greater {
                    kept[slot] = issue;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(issue);
            }
        }
    }

    if kept.len() < issues.len() {
        tracing::debug!(
            "Collapsed {} issues into {} unique defects",
            issues.len(),
            kept.len()
        );
    }

    kept.into_iter().cloned().collect()
}

/// How much optional metadata an issue carries.
#[must_use]
pub fn richness(issue: &AccessibilityIssue) -> u8 {
    u8::from(issue.wcag.is_some())
        + u8::from(issue.contrast_data.is_some())
        + u8::from(issue.human_context.is_some())
        + u8::from(!issue.affected_users.is_empty())
}

/// `Greater` when `a` is the better representative.
fn prefer(a: &AccessibilityIssue, b: &AccessibilityIssue) -> Ordering {
    richness(a)
        .cmp(&richness(b))
        .then_with(|| b.tool.priority().cmp(&a.tool.priority()))
        .then_with(|| b.rule_id.cmp(&a.rule_id))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{wcag, Severity, Tool};

    fn alt_issue(tool: Tool, rule: &str, id: &str) -> AccessibilityIssue {
        AccessibilityIssue::new(tool, rule, Severity::Critical, "Image missing alt")
            .with_id(id)
            .with_selector("#hero > img")
    }

    #[test]
    fn test_collapses_cross_engine_duplicates() {
        let issues = vec![
            alt_issue(Tool::Lighthouse, "image-alt", "lh-1"),
            alt_issue(Tool::Axe, "image-alt", "axe-1"),
        ];
        let deduped = deduplicate(&issues);
        assert_eq!(deduped.len(), 1);
        // equal richness, axe-core wins on priority
        assert_eq!(deduped[0].tool, Tool::Axe);
    }

    #[test]
    fn test_richer_metadata_wins_over_priority() {
        let issues = vec![
            alt_issue(Tool::Axe, "image-alt", "axe-1"),
            alt_issue(Tool::Lighthouse, "image-alt", "lh-1")
                .with_wcag(wcag::reference_for("1.1.1").expect("criterion"))
                .with_human_context("Screen reader users hear only the file name"),
        ];
        let deduped = deduplicate(&issues);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id, "lh-1");
    }

    #[test]
    fn test_preserves_first_appearance_order() {
        let issues = vec![
            AccessibilityIssue::new(Tool::Axe, "document-title", Severity::Serious, "t")
                .with_id("1"),
            alt_issue(Tool::Axe, "image-alt", "2"),
            AccessibilityIssue::new(Tool::Lighthouse, "document-title", Severity::Serious, "t")
                .with_id("3"),
        ];
        let deduped = deduplicate(&issues);
        let rules: Vec<_> = deduped.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(rules, vec!["document-title", "image-alt"]);
    }

    #[test]
    fn test_idempotent_and_order_independent() {
        let issues = vec![
            alt_issue(Tool::Pa11y, "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37", "p"),
            alt_issue(Tool::Axe, "image-alt", "a"),
            alt_issue(Tool::Lighthouse, "image-alt", "l"),
            AccessibilityIssue::new(Tool::Axe, "link-name", Severity::Serious, "l").with_id("k"),
        ];
        let once = deduplicate(&issues);
        assert_eq!(deduplicate(&once), once);

        let mut reversed = issues.clone();
        reversed.reverse();
        let mut a: Vec<_> = once.iter().map(|i| i.id.clone()).collect();
        let mut b: Vec<_> = deduplicate(&reversed).iter().map(|i| i.id.clone()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_keeps_elements_differing_only_in_id_case() {
        let issues = vec![
            AccessibilityIssue::new(Tool::Axe, "image-alt", Severity::Critical, "alt")
                .with_id("upper")
                .with_selector("#Logo"),
            AccessibilityIssue::new(Tool::Axe, "image-alt", Severity::Critical, "alt")
                .with_id("lower")
                .with_selector("#logo"),
        ];
        assert_eq!(deduplicate(&issues).len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(&[]).is_empty());
    }

    #[test]
    fn test_richness_counts_fields() {
        let plain = alt_issue(Tool::Axe, "image-alt", "x");
        assert_eq!(richness(&plain), 0);
        let rich = plain
            .with_wcag(wcag::reference_for("1.1.1").expect("criterion"))
            .with_affected_users(["blind"]);
        assert_eq!(richness(&rich), 2);
    }
}
