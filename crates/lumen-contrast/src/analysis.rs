//! Contrast analysis over sampled text elements.
//!
//! Engines that can see rendered text (a headless browser, a stylesheet
//! walker) hand over one [`ContrastSample`] per element; this module decides
//! pass/fail and turns failures into normalized issues.

use crate::apca::{apca_contrast, ApcaCategory};
use crate::color::{parse_color, Rgb};
use crate::fix::{suggest_fixed_color, suggest_fixed_color_for_apca};
use crate::wcag::{contrast_ratio, is_large_text, required_ratio, AA_LARGE, AA_NORMAL};
use lumen_core::{
    wcag, AccessibilityIssue, ContrastConfig, ContrastData, ContrastMetric, IssueLocation,
    Severity, SuggestedFix, Tool, WcagLevel,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const AFFECTED_USERS: [&str; 2] = ["low-vision", "color-blind"];

/// Computed colors and font metrics of one text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastSample {
    /// CSS selector identifying the element
    pub selector: String,
    /// Computed `color`
    pub foreground: String,
    /// Effective background color
    pub background: String,
    /// Computed font size in CSS pixels
    pub font_size_px: f64,
    /// Computed font weight
    pub font_weight: u16,
    /// Leading text of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// `XPath` of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
}

/// How samples are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContrastOptions {
    /// Pass/fail metric
    pub metric: ContrastMetric,
    /// Target level for WCAG ratios
    pub level: WcagLevel,
    /// Attach a suggested foreground to failures
    pub suggest_fixes: bool,
}

impl Default for ContrastOptions {
    fn default() -> Self {
        Self::from(&ContrastConfig::default())
    }
}

impl From<&ContrastConfig> for ContrastOptions {
    fn from(config: &ContrastConfig) -> Self {
        Self {
            metric: config.metric,
            level: config.level,
            suggest_fixes: config.suggest_fixes,
        }
    }
}

/// Failure counts split by text size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSizeCounts {
    /// Normal text
    pub normal: usize,
    /// Large text
    pub large: usize,
}

/// Totals for one analysis run. `total == passing + failing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastSummary {
    /// Samples evaluated
    pub total: usize,
    /// Samples meeting the target
    pub passing: usize,
    /// Samples below the target
    pub failing: usize,
    /// Failing samples by text size
    pub by_text_size: TextSizeCounts,
}

/// Output of [`analyze_samples`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastReport {
    /// One issue per failing sample
    pub issues: Vec<AccessibilityIssue>,
    /// Pass/fail totals
    pub summary: ContrastSummary,
    /// Samples whose colors could not be parsed
    pub skipped: usize,
}

/// Judge every sample and collect failures as issues.
#[must_use]
pub fn analyze_samples(samples: &[ContrastSample], options: &ContrastOptions) -> ContrastReport {
    let mut report = ContrastReport::default();

    for sample in samples {
        let parsed = (parse_color(&sample.foreground), parse_color(&sample.background));
        let (Some(fg), Some(bg)) = parsed else {
            debug!(
                selector = %sample.selector,
                "Skipping sample with unparseable colors ({} on {})",
                sample.foreground,
                sample.background
            );
            report.skipped += 1;
            continue;
        };

        let large = is_large_text(sample.font_size_px, sample.font_weight);
        let outcome = match options.metric {
            ContrastMetric::Wcag => judge_wcag(sample, fg, bg, large, options),
            ContrastMetric::Apca => judge_apca(sample, fg, bg, large, options),
        };

        report.summary.total += 1;
        match outcome {
            None => report.summary.passing += 1,
            Some(issue) => {
                report.summary.failing += 1;
                if large {
                    report.summary.by_text_size.large += 1;
                } else {
                    report.summary.by_text_size.normal += 1;
                }
                report.issues.push(issue);
            }
        }
    }

    debug!(
        total = report.summary.total,
        failing = report.summary.failing,
        skipped = report.skipped,
        "Contrast analysis complete"
    );
    report
}

fn judge_wcag(
    sample: &ContrastSample,
    fg: Rgb,
    bg: Rgb,
    large: bool,
    options: &ContrastOptions,
) -> Option<AccessibilityIssue> {
    let ratio = contrast_ratio(fg, bg);
    let required = required_ratio(options.level, large);
    if ratio >= required {
        return None;
    }

    // Below the AA floor is a 1.4.3 failure even when targeting AAA.
    let aa_floor = if large { AA_LARGE } else { AA_NORMAL };
    let (rule_id, criterion, severity) = if ratio < aa_floor {
        ("color-contrast", "1.4.3", Severity::Serious)
    } else {
        ("color-contrast-enhanced", "1.4.6", Severity::Moderate)
    };

    let suggested_fix = options.suggest_fixes.then(|| {
        let fix = suggest_fixed_color(fg, bg, required);
        fix.meets_target.then(|| SuggestedFix {
            foreground: fix.foreground.to_hex(),
            new_ratio: Some(truncate2(fix.value)),
            new_lc: None,
        })
    });

    let data = ContrastData {
        current_ratio: Some(truncate2(ratio)),
        required_ratio: Some(required),
        suggested_fix: suggested_fix.flatten(),
        ..base_data(sample, fg, bg, large)
    };

    let message = format!(
        "Text contrast {:.2}:1 is below the required {}:1 ({} on {})",
        truncate2(ratio),
        required, data.foreground, data.background
    );

    Some(build_issue(sample, rule_id, criterion, severity, message, data))
}

fn judge_apca(
    sample: &ContrastSample,
    fg: Rgb,
    bg: Rgb,
    large: bool,
    options: &ContrastOptions,
) -> Option<AccessibilityIssue> {
    let lc = apca_contrast(fg, bg);
    let category = if large {
        ApcaCategory::LargeText
    } else {
        ApcaCategory::BodyText
    };
    let required = category.min_lc();
    if lc.abs() >= required {
        return None;
    }

    let severity = if lc.abs() < ApcaCategory::NonText.min_lc() {
        Severity::Serious
    } else {
        Severity::Moderate
    };

    let suggested_fix = options.suggest_fixes.then(|| {
        let fix = suggest_fixed_color_for_apca(fg, bg, required);
        fix.meets_target.then(|| SuggestedFix {
            foreground: fix.foreground.to_hex(),
            new_ratio: None,
            new_lc: Some(truncate2(apca_contrast(fix.foreground, bg))),
        })
    });

    let data = ContrastData {
        current_lc: Some(truncate2(lc)),
        required_lc: Some(required),
        suggested_fix: suggested_fix.flatten(),
        ..base_data(sample, fg, bg, large)
    };

    let message = format!(
        "Lightness contrast Lc {:.2} is below the required Lc {} ({} on {})",
        truncate2(lc),
        required, data.foreground, data.background
    );

    Some(build_issue(
        sample,
        "apca-contrast",
        "1.4.3",
        severity,
        message,
        data,
    ))
}

fn base_data(sample: &ContrastSample, fg: Rgb, bg: Rgb, large: bool) -> ContrastData {
    ContrastData {
        foreground: fg.to_hex(),
        background: bg.to_hex(),
        current_ratio: None,
        required_ratio: None,
        current_lc: None,
        required_lc: None,
        is_large_text: large,
        font_size: Some(sample.font_size_px),
        font_weight: Some(sample.font_weight),
        suggested_fix: None,
    }
}

fn build_issue(
    sample: &ContrastSample,
    rule_id: &str,
    criterion: &str,
    severity: Severity,
    message: String,
    data: ContrastData,
) -> AccessibilityIssue {
    let location = IssueLocation {
        selector: Some(sample.selector.clone()),
        xpath: sample.xpath.clone(),
        snippet: sample.snippet.clone(),
        ..IssueLocation::default()
    };

    let mut issue = AccessibilityIssue::new(Tool::ContrastAnalyzer, rule_id, severity, message)
        .with_location(location)
        .with_human_context(
            "Readers with low vision or color vision deficiencies may be unable to \
             distinguish this text from its background.",
        )
        .with_affected_users(AFFECTED_USERS)
        .with_contrast_data(data);

    if let Some(reference) = wcag::reference_for(criterion) {
        issue = issue.with_wcag(reference);
    }
    issue
}

/// Cut to two decimals toward zero, so a failing measurement never reads as
/// reaching its threshold.
fn truncate2(value: f64) -> f64 {
    (value * 100.0).trunc() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fg: &str, bg: &str, size: f64, weight: u16) -> ContrastSample {
        ContrastSample {
            selector: "main p".to_string(),
            foreground: fg.to_string(),
            background: bg.to_string(),
            font_size_px: size,
            font_weight: weight,
            snippet: Some("Lorem ipsum".to_string()),
            xpath: None,
        }
    }

    #[test]
    fn test_passing_and_failing_counts() {
        let samples = vec![
            sample("#000", "#fff", 16.0, 400),
            sample("#999", "#fff", 16.0, 400),
            sample("#999", "#fff", 24.0, 400),
        ];
        let report = analyze_samples(&samples, &ContrastOptions::default());

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.passing, 1);
        assert_eq!(report.summary.failing, 2);
        assert_eq!(report.summary.by_text_size.normal, 1);
        assert_eq!(report.summary.by_text_size.large, 1);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_failing_issue_shape() {
        let samples = [sample("#999", "white", 16.0, 400)];
        let report = analyze_samples(&samples, &ContrastOptions::default());
        let issue = &report.issues[0];

        assert_eq!(issue.tool, Tool::ContrastAnalyzer);
        assert_eq!(issue.rule_id, "color-contrast");
        assert_eq!(issue.severity, Severity::Serious);
        assert_eq!(issue.criterion(), Some("1.4.3"));
        assert_eq!(issue.affected_users, vec!["low-vision", "color-blind"]);
        assert_eq!(issue.location.selector.as_deref(), Some("main p"));

        let data = issue.contrast_data.as_ref().expect("contrast data");
        assert_eq!(data.foreground, "#999999");
        assert_eq!(data.background, "#ffffff");
        assert_eq!(data.required_ratio, Some(4.5));
        assert!(!data.is_large_text);
        let fix = data.suggested_fix.as_ref().expect("suggested fix");
        assert!(fix.new_ratio.expect("ratio") >= 4.5);
    }

    #[test]
    fn test_reported_ratio_never_reaches_threshold_when_failing() {
        // #81737a on white measures 4.4999:1
        let samples = [sample("#81737a", "#fff", 16.0, 400)];
        let report = analyze_samples(&samples, &ContrastOptions::default());
        assert_eq!(report.summary.failing, 1);

        let issue = &report.issues[0];
        let data = issue.contrast_data.as_ref().expect("contrast data");
        assert_eq!(data.current_ratio, Some(4.49));
        assert!(issue.message.starts_with("Text contrast 4.49:1"));
    }

    #[test]
    fn test_aaa_only_failure_is_enhanced_rule() {
        let options = ContrastOptions {
            level: WcagLevel::AAA,
            ..ContrastOptions::default()
        };
        // #767676 on white passes AA (4.54) but not AAA
        let report = analyze_samples(&[sample("#767676", "#fff", 16.0, 400)], &options);
        let issue = &report.issues[0];
        assert_eq!(issue.rule_id, "color-contrast-enhanced");
        assert_eq!(issue.criterion(), Some("1.4.6"));
        assert_eq!(issue.severity, Severity::Moderate);
    }

    #[test]
    fn test_unparseable_colors_are_skipped() {
        let samples = vec![
            sample("currentcolor", "#fff", 16.0, 400),
            sample("#000", "linear-gradient(red, blue)", 16.0, 400),
            sample("#000", "#fff", 16.0, 400),
        ];
        let report = analyze_samples(&samples, &ContrastOptions::default());
        assert_eq!(report.skipped, 2);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.passing, 1);
    }

    #[test]
    fn test_apca_metric() {
        let options = ContrastOptions {
            metric: ContrastMetric::Apca,
            ..ContrastOptions::default()
        };
        // #767676 passes WCAG AA but is Lc ~71.6, under body threshold 75
        let report = analyze_samples(&[sample("#767676", "#fff", 16.0, 400)], &options);
        assert_eq!(report.summary.failing, 1);

        let issue = &report.issues[0];
        assert_eq!(issue.rule_id, "apca-contrast");
        assert_eq!(issue.severity, Severity::Moderate);
        let data = issue.contrast_data.as_ref().expect("contrast data");
        assert_eq!(data.required_lc, Some(75.0));
        assert!(data.current_ratio.is_none());
        assert!(data.suggested_fix.as_ref().expect("fix").new_lc.expect("lc") >= 75.0);
    }

    #[test]
    fn test_fixes_can_be_disabled() {
        let options = ContrastOptions {
            suggest_fixes: false,
            ..ContrastOptions::default()
        };
        let report = analyze_samples(&[sample("#aaa", "#fff", 16.0, 400)], &options);
        let data = report.issues[0].contrast_data.as_ref().expect("contrast data");
        assert!(data.suggested_fix.is_none());
    }

    #[test]
    fn test_sample_deserializes_camel_case() {
        let json = r##"{"selector": "h1", "foreground": "#111", "background": "#fff",
                        "fontSizePx": 32, "fontWeight": 700}"##;
        let parsed: ContrastSample = serde_json::from_str(json).expect("parse sample");
        assert_eq!(parsed.font_weight, 700);
        assert!(parsed.snippet.is_none());
    }
}
