//! WCAG grouping and summary counts over a deduplicated issue list.

use lumen_core::{AccessibilityIssue, Severity, Tool, WcagPrinciple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Blocks access entirely
    pub critical: usize,
    /// Severely impairs access
    pub serious: usize,
    /// Impairs access for some users
    pub moderate: usize,
    /// Annoyance or best-practice deviation
    pub minor: usize,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Serious => self.serious += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Minor => self.minor += 1,
        }
    }
}

/// Issue counts per WCAG principle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipleCounts {
    /// 1.x
    pub perceivable: usize,
    /// 2.x
    pub operable: usize,
    /// 3.x
    pub understandable: usize,
    /// 4.x
    pub robust: usize,
}

impl PrincipleCounts {
    fn add(&mut self, principle: WcagPrinciple) {
        match principle {
            WcagPrinciple::Perceivable => self.perceivable += 1,
            WcagPrinciple::Operable => self.operable += 1,
            WcagPrinciple::Understandable => self.understandable += 1,
            WcagPrinciple::Robust => self.robust += 1,
        }
    }
}

/// Contrast issue counts per text size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSizeBreakdown {
    /// Normal text
    pub normal: usize,
    /// Large text
    pub large: usize,
}

/// Summary statistics of an aggregated report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    /// Number of issues
    pub total: usize,
    /// Every issue counted once
    pub by_severity: SeverityCounts,
    /// Issues whose WCAG reference names a principle
    pub by_principle: PrincipleCounts,
    /// Issues per reporting tool
    pub by_tool: BTreeMap<Tool, usize>,
    /// Issues carrying contrast data
    pub by_text_size: TextSizeBreakdown,
}

/// Group issues by WCAG criterion. Issues without a WCAG reference are left
/// out of the map.
#[must_use]
pub fn group_by_wcag(issues: &[AccessibilityIssue]) -> BTreeMap<String, Vec<AccessibilityIssue>> {
    let mut groups: BTreeMap<String, Vec<AccessibilityIssue>> = BTreeMap::new();
    for issue in issues {
        if let Some(wcag) = &issue.wcag {
            groups
                .entry(wcag.criterion.clone())
                .or_default()
                .push(issue.clone());
        }
    }
    groups
}

/// Count issues by severity, principle, tool and text size.
#[must_use]
pub fn build_summary(issues: &[AccessibilityIssue]) -> IssueSummary {
    let mut summary = IssueSummary {
        total: issues.len(),
        ..IssueSummary::default()
    };

    for issue in issues {
        summary.by_severity.add(issue.severity);

        if let Some(principle) = issue.wcag.as_ref().and_then(|w| w.principle) {
            summary.by_principle.add(principle);
        }

        *summary.by_tool.entry(issue.tool).or_insert(0) += 1;

        if let Some(data) = &issue.contrast_data {
            if data.is_large_text {
                summary.by_text_size.large += 1;
            } else {
                summary.by_text_size.normal += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{wcag, ContrastData, WcagLevel, WcagReference};

    fn issue(tool: Tool, severity: Severity, criterion: Option<&str>) -> AccessibilityIssue {
        let issue = AccessibilityIssue::new(tool, "rule", severity, "message");
        match criterion {
            Some(c) => issue.with_wcag(wcag::reference_for(c).expect("criterion")),
            None => issue,
        }
    }

    #[test]
    fn test_group_by_wcag_omits_untagged() {
        let issues = vec![
            issue(Tool::Axe, Severity::Critical, Some("1.1.1")),
            issue(Tool::Axe, Severity::Serious, Some("1.4.3")),
            issue(Tool::Pa11y, Severity::Minor, None),
            issue(Tool::Lighthouse, Severity::Serious, Some("1.1.1")),
        ];
        let groups = group_by_wcag(&issues);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["1.1.1"].len(), 2);
        for (criterion, members) in &groups {
            assert!(members.iter().all(|i| i.criterion() == Some(criterion.as_str())));
        }
    }

    #[test]
    fn test_summary_counts() {
        let contrast = ContrastData {
            foreground: "#999999".to_string(),
            background: "#ffffff".to_string(),
            current_ratio: Some(2.85),
            required_ratio: Some(3.0),
            current_lc: None,
            required_lc: None,
            is_large_text: true,
            font_size: Some(24.0),
            font_weight: Some(400),
            suggested_fix: None,
        };
        let issues = vec![
            issue(Tool::Axe, Severity::Critical, Some("1.1.1")),
            issue(Tool::Axe, Severity::Serious, Some("2.4.4")),
            issue(Tool::Pa11y, Severity::Minor, None),
            issue(Tool::ContrastAnalyzer, Severity::Serious, Some("1.4.3"))
                .with_contrast_data(contrast),
        ];
        let summary = build_summary(&issues);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_severity.critical, 1);
        assert_eq!(summary.by_severity.serious, 2);
        assert_eq!(summary.by_severity.minor, 1);
        assert_eq!(summary.by_principle.perceivable, 2);
        assert_eq!(summary.by_principle.operable, 1);
        assert_eq!(summary.by_tool[&Tool::Axe], 2);
        assert!(!summary.by_tool.contains_key(&Tool::Lighthouse));
        assert_eq!(summary.by_text_size.large, 1);
        assert_eq!(summary.by_text_size.normal, 0);
    }

    #[test]
    fn test_principle_requires_explicit_reference() {
        let mut reference = WcagReference::new("1.1.1", WcagLevel::A);
        reference.principle = None;
        let issues = vec![AccessibilityIssue::new(Tool::Axe, "r", Severity::Minor, "m")
            .with_wcag(reference)];
        let summary = build_summary(&issues);
        assert_eq!(summary.by_principle, PrincipleCounts::default());
    }

    #[test]
    fn test_summary_serializes_tool_keys() {
        let summary = build_summary(&[issue(Tool::Axe, Severity::Minor, None)]);
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["byTool"]["axe-core"], 1);
        assert_eq!(json["bySeverity"]["minor"], 1);
    }
}
