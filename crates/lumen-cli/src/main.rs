//! Lumen command line.
//!
//! Checks single color pairs, merges saved engine reports, and scans live
//! pages for contrast failures. Results are printed to stdout as JSON; logs
//! go to stderr.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use commands::ContrastArgs;
use lumen_core::{AppConfig, ContrastMetric, LoggingConfig, Tool, WcagLevel};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Aggregate accessibility audits and check color contrast")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the contrast of one foreground/background pair
    Contrast {
        /// Foreground (text) color
        foreground: String,

        /// Background color
        background: String,

        /// Font size in CSS pixels
        #[arg(long, default_value_t = 16.0)]
        font_size: f64,

        /// Font weight (100-900)
        #[arg(long, default_value_t = 400)]
        font_weight: u16,

        /// WCAG conformance level (defaults to `contrast.level` from config)
        #[arg(long, value_enum)]
        level: Option<WcagLevelArg>,

        /// Metric used to judge the pair (defaults to `contrast.metric` from config)
        #[arg(long, value_enum)]
        metric: Option<MetricArg>,

        /// Do not suggest a replacement color
        #[arg(long)]
        no_fix: bool,
    },

    /// Merge saved engine reports for one target
    Aggregate {
        /// Page the reports were produced for
        #[arg(long)]
        target: String,

        /// Engine report as TOOL=PATH (repeatable)
        #[arg(long = "report", value_parser = commands::parse_report_arg)]
        reports: Vec<(Tool, PathBuf)>,

        /// WCAG conformance level
        #[arg(long, value_enum)]
        level: Option<WcagLevelArg>,
    },

    /// Scan a live page for contrast failures
    Scan {
        /// URL to load
        url: String,

        /// Additional engine report as TOOL=PATH (repeatable)
        #[arg(long = "report", value_parser = commands::parse_report_arg)]
        reports: Vec<(Tool, PathBuf)>,

        /// WCAG conformance level
        #[arg(long, value_enum)]
        level: Option<WcagLevelArg>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    A,
    Aa,
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Wcag,
    Apca,
}

impl From<MetricArg> for ContrastMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Wcag => ContrastMetric::Wcag,
            MetricArg::Apca => ContrastMetric::Apca,
        }
    }
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_with_env(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Contrast {
            foreground,
            background,
            font_size,
            font_weight,
            level,
            metric,
            no_fix,
        } => {
            let options = commands::contrast_options(
                &config.contrast,
                level.map(Into::into),
                metric.map(Into::into),
                no_fix,
            );
            let check = commands::contrast(&ContrastArgs {
                foreground,
                background,
                font_size,
                font_weight,
                options,
            })?;
            print_json(&check)?;
            Ok(if check.passes {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Aggregate {
            target,
            reports,
            level,
        } => {
            let result =
                commands::aggregate(&config, &target, &reports, level.map(Into::into)).await?;
            print_json(&result)?;
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Scan {
            url,
            reports,
            level,
            headed,
        } => {
            if headed {
                config.browser.headless = false;
            }
            let result = commands::scan(&config, &url, &reports, level.map(Into::into)).await?;
            print_json(&result)?;
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_aggregate_reports() {
        let cli = Cli::parse_from([
            "lumen",
            "aggregate",
            "--target",
            "https://example.com",
            "--report",
            "axe=axe.json",
            "--report",
            "lighthouse=lh.json",
            "--level",
            "aaa",
        ]);
        match cli.command {
            Commands::Aggregate { reports, level, .. } => {
                assert_eq!(reports.len(), 2);
                assert_eq!(reports[1].0, Tool::Lighthouse);
                assert_eq!(level.map(WcagLevel::from), Some(WcagLevel::AAA));
            }
            _ => panic!("expected aggregate"),
        }
    }

    #[test]
    fn test_contrast_level_and_metric_default_to_config() {
        let cli = Cli::parse_from(["lumen", "contrast", "#777", "white"]);
        match cli.command {
            Commands::Contrast {
                level,
                metric,
                no_fix,
                ..
            } => {
                assert!(level.is_none());
                assert!(metric.is_none());
                assert!(!no_fix);
            }
            _ => panic!("expected contrast"),
        }

        let cli = Cli::parse_from([
            "lumen", "contrast", "#777", "white", "--metric", "apca", "--no-fix",
        ]);
        match cli.command {
            Commands::Contrast { metric, no_fix, .. } => {
                assert_eq!(metric.map(ContrastMetric::from), Some(ContrastMetric::Apca));
                assert!(no_fix);
            }
            _ => panic!("expected contrast"),
        }
    }

    #[test]
    fn test_rejects_unknown_report_tool() {
        let parsed = Cli::try_parse_from([
            "lumen",
            "aggregate",
            "--target",
            "x",
            "--report",
            "wave=wave.json",
        ]);
        assert!(parsed.is_err());
    }
}
