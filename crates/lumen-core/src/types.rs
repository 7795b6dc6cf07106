//! Shared types used across Lumen.
//!
//! Every audit engine normalizes its output into [`AccessibilityIssue`]
//! values. The serialized form uses camelCase field names so that reports
//! stay compatible with the JSON produced by the upstream audit tools.

use crate::error::LumenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audit engine that produced an issue.
///
/// Declaration order is the tie-breaking priority used when duplicate
/// issues from several engines have equally rich metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// axe-core DOM rule scanner
    #[serde(rename = "axe-core")]
    Axe,
    /// pa11y HTML_CodeSniffer runner
    #[serde(rename = "pa11y")]
    Pa11y,
    /// Lighthouse accessibility category
    #[serde(rename = "lighthouse")]
    Lighthouse,
    /// Lumen's own computed-style contrast analyzer
    #[serde(rename = "contrast-analyzer")]
    ContrastAnalyzer,
}

impl Tool {
    /// All known tools in priority order.
    pub const ALL: [Tool; 4] = [
        Tool::Axe,
        Tool::Pa11y,
        Tool::Lighthouse,
        Tool::ContrastAnalyzer,
    ];

    /// Stable identifier, identical to the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Axe => "axe-core",
            Self::Pa11y => "pa11y",
            Self::Lighthouse => "lighthouse",
            Self::ContrastAnalyzer => "contrast-analyzer",
        }
    }

    /// Tie-break priority, lower wins.
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            Self::Axe => 0,
            Self::Pa11y => 1,
            Self::Lighthouse => 2,
            Self::ContrastAnalyzer => 3,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = LumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "axe" | "axe-core" => Ok(Self::Axe),
            "pa11y" => Ok(Self::Pa11y),
            "lighthouse" => Ok(Self::Lighthouse),
            "contrast" | "contrast-analyzer" => Ok(Self::ContrastAnalyzer),
            other => Err(LumenError::Validation(format!("unknown audit tool '{other}'"))),
        }
    }
}

/// Issue severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access to content entirely
    Critical,
    /// Severely degrades access
    Serious,
    /// Causes friction for some users
    Moderate,
    /// Minor annoyance
    Minor,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Serious => write!(f, "serious"),
            Self::Moderate => write!(f, "moderate"),
            Self::Minor => write!(f, "minor"),
        }
    }
}

/// WCAG conformance level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    #[default]
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AA => write!(f, "AA"),
            Self::AAA => write!(f, "AAA"),
        }
    }
}

impl FromStr for WcagLevel {
    type Err = LumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            other => Err(LumenError::Validation(format!("unknown WCAG level '{other}'"))),
        }
    }
}

/// The four WCAG principles ("POUR").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WcagPrinciple {
    /// 1.x - information must be presentable in perceivable ways
    Perceivable,
    /// 2.x - interface must be operable
    Operable,
    /// 3.x - information and operation must be understandable
    Understandable,
    /// 4.x - content must be robust across user agents
    Robust,
}

impl WcagPrinciple {
    /// Derive the principle from a success criterion number such as `"1.4.3"`.
    #[must_use]
    pub fn from_criterion(criterion: &str) -> Option<Self> {
        match criterion.trim().split('.').next()? {
            "1" => Some(Self::Perceivable),
            "2" => Some(Self::Operable),
            "3" => Some(Self::Understandable),
            "4" => Some(Self::Robust),
            _ => None,
        }
    }
}

/// Which contrast metric an analysis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastMetric {
    /// WCAG 2.1 luminance ratio
    #[default]
    Wcag,
    /// APCA lightness contrast (Lc)
    Apca,
}

impl FromStr for ContrastMetric {
    type Err = LumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wcag" => Ok(Self::Wcag),
            "apca" => Ok(Self::Apca),
            other => Err(LumenError::Validation(format!(
                "unknown contrast metric '{other}', expected wcag or apca"
            ))),
        }
    }
}

/// Reference to a WCAG success criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcagReference {
    /// Success criterion number, e.g. `"1.4.3"`
    pub criterion: String,
    /// Conformance level of the criterion
    pub level: WcagLevel,
    /// Principle the criterion belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principle: Option<WcagPrinciple>,
    /// Human-readable criterion title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WcagReference {
    /// Create a reference, deriving the principle from the criterion number.
    #[must_use]
    pub fn new(criterion: impl Into<String>, level: WcagLevel) -> Self {
        let criterion = criterion.into();
        let principle = WcagPrinciple::from_criterion(&criterion);
        Self {
            criterion,
            level,
            principle,
            title: None,
        }
    }
}

/// Where on the page (or in source) an issue was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    /// CSS selector of the offending element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// `XPath` of the offending element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
    /// Source file, for static analyzers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Short HTML excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A replacement foreground color that satisfies the contrast target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    /// Suggested foreground as `#rrggbb`
    pub foreground: String,
    /// WCAG ratio achieved by the suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_ratio: Option<f64>,
    /// APCA Lc achieved by the suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_lc: Option<f64>,
}

/// Contrast measurements attached to a contrast issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastData {
    /// Foreground color as reported or normalized to `#rrggbb`
    pub foreground: String,
    /// Background color as reported or normalized to `#rrggbb`
    pub background: String,
    /// Measured WCAG ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ratio: Option<f64>,
    /// Required WCAG ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_ratio: Option<f64>,
    /// Measured APCA Lc
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_lc: Option<f64>,
    /// Required APCA Lc (absolute value)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_lc: Option<f64>,
    /// Whether the text qualifies as large text
    #[serde(default)]
    pub is_large_text: bool,
    /// Computed font size in CSS pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Computed font weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    /// Suggested replacement foreground
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
}

fn generate_issue_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A single accessibility finding, normalized across engines.
///
/// `id` is local to the engine run that produced the issue; cross-engine
/// identity is established by the aggregator's fingerprint instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityIssue {
    /// Engine-local identifier
    #[serde(default = "generate_issue_id")]
    pub id: String,
    /// Engine that reported the issue
    pub tool: Tool,
    /// Engine-specific rule identifier
    pub rule_id: String,
    /// Severity
    pub severity: Severity,
    /// WCAG success criterion, when the engine maps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag: Option<WcagReference>,
    /// Location of the offending element
    #[serde(default)]
    pub location: IssueLocation,
    /// Engine message
    pub message: String,
    /// Contrast measurements for contrast issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_data: Option<ContrastData>,
    /// Plain-language explanation of the impact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_context: Option<String>,
    /// User groups affected by the issue
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_users: Vec<String>,
}

impl AccessibilityIssue {
    /// Create a new issue with a fresh id and an empty location.
    #[must_use]
    pub fn new(
        tool: Tool,
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_issue_id(),
            tool,
            rule_id: rule_id.into(),
            severity,
            wcag: None,
            location: IssueLocation::default(),
            message: message.into(),
            contrast_data: None,
            human_context: None,
            affected_users: Vec::new(),
        }
    }

    /// Override the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a WCAG reference.
    #[must_use]
    pub fn with_wcag(mut self, wcag: WcagReference) -> Self {
        self.wcag = Some(wcag);
        self
    }

    /// Set the CSS selector of the location.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.location.selector = Some(selector.into());
        self
    }

    /// Replace the whole location.
    #[must_use]
    pub fn with_location(mut self, location: IssueLocation) -> Self {
        self.location = location;
        self
    }

    /// Attach contrast measurements.
    #[must_use]
    pub fn with_contrast_data(mut self, data: ContrastData) -> Self {
        self.contrast_data = Some(data);
        self
    }

    /// Attach a plain-language impact explanation.
    #[must_use]
    pub fn with_human_context(mut self, context: impl Into<String>) -> Self {
        self.human_context = Some(context.into());
        self
    }

    /// Set the affected user groups.
    #[must_use]
    pub fn with_affected_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_users = users.into_iter().map(Into::into).collect();
        self
    }

    /// WCAG criterion number, if any.
    #[must_use]
    pub fn criterion(&self) -> Option<&str> {
        self.wcag.as_ref().map(|w| w.criterion.as_str())
    }
}
