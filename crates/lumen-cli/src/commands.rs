//! Command implementations, kept free of argument parsing and printing.

use anyhow::{anyhow, Context};
use lumen_aggregator::{Aggregator, AnalyzeRequest, CombinedAnalysisResult, ReportFileEngine};
use lumen_browser::{BrowserSessionFactory, PageContrastEngine, SharedBrowser};
use lumen_contrast::{
    apca_contrast, check_apca, check_wcag, is_large_text, parse_color, required_ratio,
    suggest_fixed_color, suggest_fixed_color_for_apca, ApcaCategory, ApcaContrastResult,
    ContrastOptions, WcagContrastResult,
};
use lumen_core::{AppConfig, ContrastConfig, ContrastMetric, SuggestedFix, Tool, WcagLevel};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Input of the `contrast` command.
#[derive(Debug, Clone)]
pub struct ContrastArgs {
    pub foreground: String,
    pub background: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub options: ContrastOptions,
}

/// Contrast options from configuration, with command line overrides applied.
pub fn contrast_options(
    config: &ContrastConfig,
    level: Option<WcagLevel>,
    metric: Option<ContrastMetric>,
    no_fix: bool,
) -> ContrastOptions {
    let mut options = ContrastOptions::from(config);
    if let Some(level) = level {
        options.level = level;
    }
    if let Some(metric) = metric {
        options.metric = metric;
    }
    if no_fix {
        options.suggest_fixes = false;
    }
    options
}

/// Output of the `contrast` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastCheck {
    pub foreground: String,
    pub background: String,
    pub is_large_text: bool,
    pub level: WcagLevel,
    pub metric: ContrastMetric,
    pub wcag: WcagContrastResult,
    pub apca: ApcaContrastResult,
    pub required_ratio: f64,
    pub required_lc: f64,
    pub passes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
}

/// Check one color pair and suggest a fix if it fails.
pub fn contrast(args: &ContrastArgs) -> anyhow::Result<ContrastCheck> {
    let fg = parse_color(&args.foreground)
        .ok_or_else(|| anyhow!("unrecognized foreground color '{}'", args.foreground))?;
    let bg = parse_color(&args.background)
        .ok_or_else(|| anyhow!("unrecognized background color '{}'", args.background))?;

    let large = is_large_text(args.font_size, args.font_weight);
    let wcag = check_wcag(fg, bg);
    let apca = check_apca(fg, bg);
    let options = args.options;
    let ratio_target = required_ratio(options.level, large);
    let lc_target = if large {
        ApcaCategory::LargeText
    } else {
        ApcaCategory::BodyText
    }
    .min_lc();

    let passes = match options.metric {
        ContrastMetric::Wcag => wcag.ratio >= ratio_target,
        ContrastMetric::Apca => apca.lc.abs() >= lc_target,
    };

    let suggested_fix = if passes || !options.suggest_fixes {
        None
    } else {
        let fix = match options.metric {
            ContrastMetric::Wcag => suggest_fixed_color(fg, bg, ratio_target),
            ContrastMetric::Apca => suggest_fixed_color_for_apca(fg, bg, lc_target),
        };
        if !fix.meets_target {
            tracing::warn!(
                "No foreground with this hue reaches the target; best is {}",
                fix.foreground
            );
        }
        fix.meets_target.then(|| SuggestedFix {
            foreground: fix.foreground.to_hex(),
            new_ratio: Some(round2(lumen_contrast::contrast_ratio(fix.foreground, bg))),
            new_lc: Some(round2(apca_contrast(fix.foreground, bg))),
        })
    };

    Ok(ContrastCheck {
        foreground: fg.to_hex(),
        background: bg.to_hex(),
        is_large_text: large,
        level: options.level,
        metric: options.metric,
        wcag,
        apca,
        required_ratio: ratio_target,
        required_lc: lc_target,
        passes,
        suggested_fix,
    })
}

/// Parse a `TOOL=PATH` report argument.
pub fn parse_report_arg(value: &str) -> Result<(Tool, PathBuf), String> {
    let (tool, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TOOL=PATH, got '{value}'"))?;
    let tool: Tool = tool.parse().map_err(|e| format!("{e}"))?;
    if path.trim().is_empty() {
        return Err(format!("missing report path for {tool}"));
    }
    Ok((tool, PathBuf::from(path.trim())))
}

fn report_engines(
    aggregator: Aggregator,
    reports: &[(Tool, PathBuf)],
) -> anyhow::Result<(Aggregator, Vec<Tool>)> {
    let mut aggregator = aggregator;
    let mut tools = Vec::with_capacity(reports.len());
    for (tool, path) in reports {
        if tools.contains(tool) {
            anyhow::bail!("more than one report given for {tool}");
        }
        aggregator.register(Arc::new(ReportFileEngine::new(*tool, path)));
        tools.push(*tool);
    }
    Ok((aggregator, tools))
}

/// Merge saved engine reports for a target.
pub async fn aggregate(
    config: &AppConfig,
    target: &str,
    reports: &[(Tool, PathBuf)],
    level: Option<WcagLevel>,
) -> anyhow::Result<CombinedAnalysisResult> {
    if reports.is_empty() {
        anyhow::bail!("at least one --report TOOL=PATH is required");
    }
    let (aggregator, tools) = report_engines(Aggregator::new(config.aggregator.clone()), reports)?;

    let mut request = AnalyzeRequest::new(target).with_tools(tools);
    request.wcag_level = level;
    Ok(aggregator.analyze(&request).await)
}

/// Scan a live page for contrast failures, merged with any saved reports.
pub async fn scan(
    config: &AppConfig,
    url: &str,
    reports: &[(Tool, PathBuf)],
    level: Option<WcagLevel>,
) -> anyhow::Result<CombinedAnalysisResult> {
    if reports.iter().any(|(tool, _)| *tool == Tool::ContrastAnalyzer) {
        anyhow::bail!("contrast-analyzer results come from the live scan; drop that --report");
    }

    let browser = Arc::new(SharedBrowser::new(BrowserSessionFactory::new(
        config.browser.clone(),
    )));
    let engine = PageContrastEngine::new(
        Arc::clone(&browser),
        ContrastOptions::from(&config.contrast),
    );

    let (aggregator, mut tools) = report_engines(
        Aggregator::new(config.aggregator.clone()).with_engine(Arc::new(engine)),
        reports,
    )?;
    tools.insert(0, Tool::ContrastAnalyzer);

    let mut request = AnalyzeRequest::new(url).with_tools(tools);
    request.wcag_level = level;
    let result = aggregator.analyze(&request).await;

    browser
        .dispose()
        .await
        .context("failed to close browser session")?;
    Ok(result)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(fg: &str, bg: &str) -> ContrastArgs {
        ContrastArgs {
            foreground: fg.to_string(),
            background: bg.to_string(),
            font_size: 16.0,
            font_weight: 400,
            options: ContrastOptions::default(),
        }
    }

    #[test]
    fn test_contrast_passing_pair() {
        let check = contrast(&args("black", "#fff")).expect("check");
        assert!(check.passes);
        assert!(check.suggested_fix.is_none());
        assert_eq!(check.foreground, "#000000");
        assert!((check.wcag.ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn test_contrast_failing_pair_gets_fix() {
        let check = contrast(&args("#999", "#fff")).expect("check");
        assert!(!check.passes);
        let fix = check.suggested_fix.expect("fix");
        assert!(fix.new_ratio.expect("ratio") >= 4.5);
    }

    #[test]
    fn test_contrast_apca_metric() {
        let mut input = args("#767676", "#fff");
        input.options.metric = ContrastMetric::Apca;
        let check = contrast(&input).expect("check");
        assert!(check.wcag.meets_aa);
        assert!(!check.passes);
        assert!(check.suggested_fix.expect("fix").new_lc.expect("lc") >= 75.0);
    }

    #[test]
    fn test_contrast_options_follow_config() {
        let config = ContrastConfig {
            metric: ContrastMetric::Apca,
            level: WcagLevel::AAA,
            suggest_fixes: false,
        };
        let options = contrast_options(&config, None, None, false);
        assert_eq!(options.metric, ContrastMetric::Apca);
        assert_eq!(options.level, WcagLevel::AAA);
        assert!(!options.suggest_fixes);

        let overridden = contrast_options(
            &config,
            Some(WcagLevel::AA),
            Some(ContrastMetric::Wcag),
            false,
        );
        assert_eq!(overridden.metric, ContrastMetric::Wcag);
        assert_eq!(overridden.level, WcagLevel::AA);
        assert!(!overridden.suggest_fixes);

        let no_fix = contrast_options(&ContrastConfig::default(), None, None, true);
        assert!(!no_fix.suggest_fixes);
    }

    #[test]
    fn test_contrast_uses_configured_level_and_fix_setting() {
        // #767676 on white is 4.54:1, passing AA but not AAA
        let config = ContrastConfig {
            level: WcagLevel::AAA,
            suggest_fixes: false,
            ..ContrastConfig::default()
        };
        let mut input = args("#767676", "#fff");
        input.options = contrast_options(&config, None, None, false);
        let check = contrast(&input).expect("check");
        assert_eq!(check.level, WcagLevel::AAA);
        assert!((check.required_ratio - 7.0).abs() < f64::EPSILON);
        assert!(!check.passes);
        assert!(check.suggested_fix.is_none());
    }

    #[test]
    fn test_contrast_rejects_bad_color() {
        let err = contrast(&args("var(--fg)", "#fff")).expect_err("bad color");
        assert!(err.to_string().contains("var(--fg)"));
    }

    #[test]
    fn test_parse_report_arg() {
        let (tool, path) = parse_report_arg("axe=reports/axe.json").expect("parse");
        assert_eq!(tool, Tool::Axe);
        assert_eq!(path, PathBuf::from("reports/axe.json"));

        assert!(parse_report_arg("axe").is_err());
        assert!(parse_report_arg("wave=x.json").is_err());
        assert!(parse_report_arg("pa11y=").is_err());
    }

    #[tokio::test]
    async fn test_aggregate_reports() {
        let tmp = TempDir::new().expect("create temp dir");
        let axe = tmp.path().join("axe.json");
        let pa11y = tmp.path().join("pa11y.json");
        std::fs::write(
            &axe,
            r##"[{"ruleId": "image-alt", "severity": "critical", "message": "alt",
                  "location": {"selector": "#logo"}}]"##,
        )
        .expect("write axe");
        std::fs::write(
            &pa11y,
            r##"[{"ruleId": "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37", "severity": "serious",
                  "message": "alt", "location": {"selector": "#logo"}}]"##,
        )
        .expect("write pa11y");

        let result = aggregate(
            &AppConfig::default(),
            "https://example.com",
            &[(Tool::Axe, axe), (Tool::Pa11y, pa11y)],
            None,
        )
        .await
        .expect("aggregate");

        assert!(result.success);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.tools_used, vec![Tool::Axe, Tool::Pa11y]);
    }

    #[tokio::test]
    async fn test_aggregate_requires_reports() {
        assert!(aggregate(&AppConfig::default(), "x", &[], None).await.is_err());
    }

    #[tokio::test]
    async fn test_aggregate_rejects_duplicate_tool() {
        let reports = vec![
            (Tool::Axe, PathBuf::from("a.json")),
            (Tool::Axe, PathBuf::from("b.json")),
        ];
        assert!(aggregate(&AppConfig::default(), "x", &reports, None).await.is_err());
    }
}
