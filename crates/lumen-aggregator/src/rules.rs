//! Cross-engine rule equivalence.
//!
//! Engines name the same defect differently: axe-core says `image-alt`,
//! pa11y says `WCAG2AA.Principle1.Guideline1_1.1_1_1.H37`. This table maps
//! each `(tool, rule id)` pair onto a shared [`DefectClass`].

use lumen_core::Tool;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A kind of accessibility defect, independent of which engine found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectClass {
    /// Image or image-like element without a text alternative
    MissingTextAlternative,
    /// Text below the minimum contrast ratio
    InsufficientContrast,
    /// Text below the enhanced contrast ratio
    InsufficientContrastEnhanced,
    /// Form control without an accessible label
    MissingFormLabel,
    /// Button without an accessible name
    MissingButtonName,
    /// Link without discernible text
    MissingLinkName,
    /// `<html>` without a `lang` attribute
    MissingPageLanguage,
    /// `lang` attribute with an invalid value
    InvalidPageLanguage,
    /// Document without a `<title>`
    MissingPageTitle,
    /// Frame without a title
    MissingFrameTitle,
    /// Repeated `id` attribute values
    DuplicateId,
    /// Heading levels skip
    HeadingOrder,
    /// Malformed list markup
    ListStructure,
    /// No way to skip repeated blocks
    BypassBlocks,
    /// Viewport meta prevents zooming
    ViewportZoom,
    /// Invalid or misused ARIA attributes
    AriaAttributes,
}

impl DefectClass {
    /// Stable identifier used in fingerprints.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTextAlternative => "text-alternative",
            Self::InsufficientContrast => "contrast-minimum",
            Self::InsufficientContrastEnhanced => "contrast-enhanced",
            Self::MissingFormLabel => "form-label",
            Self::MissingButtonName => "button-name",
            Self::MissingLinkName => "link-name",
            Self::MissingPageLanguage => "page-language",
            Self::InvalidPageLanguage => "page-language-valid",
            Self::MissingPageTitle => "page-title",
            Self::MissingFrameTitle => "frame-title",
            Self::DuplicateId => "duplicate-id",
            Self::HeadingOrder => "heading-order",
            Self::ListStructure => "list-structure",
            Self::BypassBlocks => "bypass-blocks",
            Self::ViewportZoom => "viewport-zoom",
            Self::AriaAttributes => "aria-attributes",
        }
    }

    /// The WCAG 2.1 success criterion this defect fails.
    #[must_use]
    pub fn criterion(&self) -> &'static str {
        match self {
            Self::MissingTextAlternative => "1.1.1",
            Self::InsufficientContrast => "1.4.3",
            Self::InsufficientContrastEnhanced => "1.4.6",
            Self::ViewportZoom => "1.4.4",
            Self::HeadingOrder | Self::ListStructure => "1.3.1",
            Self::BypassBlocks => "2.4.1",
            Self::MissingPageTitle => "2.4.2",
            Self::MissingLinkName => "2.4.4",
            Self::MissingPageLanguage | Self::InvalidPageLanguage => "3.1.1",
            Self::DuplicateId => "4.1.1",
            Self::MissingFormLabel
            | Self::MissingButtonName
            | Self::MissingFrameTitle
            | Self::AriaAttributes => "4.1.2",
        }
    }
}

impl fmt::Display for DefectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(tool, normalized rule id) -> defect class`.
///
/// pa11y codes are listed without their `WCAG2A`/`WCAG2AA`/`WCAG2AAA`
/// standard prefix; see [`normalize_rule_id`].
#[rustfmt::skip]
const RULE_TABLE: &[(Tool, &str, DefectClass)] = &[
    // axe-core
    (Tool::Axe, "image-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "input-image-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "area-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "role-img-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "svg-img-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "object-alt", DefectClass::MissingTextAlternative),
    (Tool::Axe, "color-contrast", DefectClass::InsufficientContrast),
    (Tool::Axe, "color-contrast-enhanced", DefectClass::InsufficientContrastEnhanced),
    (Tool::Axe, "label", DefectClass::MissingFormLabel),
    (Tool::Axe, "select-name", DefectClass::MissingFormLabel),
    (Tool::Axe, "button-name", DefectClass::MissingButtonName),
    (Tool::Axe, "link-name", DefectClass::MissingLinkName),
    (Tool::Axe, "html-has-lang", DefectClass::MissingPageLanguage),
    (Tool::Axe, "html-lang-valid", DefectClass::InvalidPageLanguage),
    (Tool::Axe, "document-title", DefectClass::MissingPageTitle),
    (Tool::Axe, "frame-title", DefectClass::MissingFrameTitle),
    (Tool::Axe, "duplicate-id", DefectClass::DuplicateId),
    (Tool::Axe, "duplicate-id-aria", DefectClass::DuplicateId),
    (Tool::Axe, "heading-order", DefectClass::HeadingOrder),
    (Tool::Axe, "list", DefectClass::ListStructure),
    (Tool::Axe, "listitem", DefectClass::ListStructure),
    (Tool::Axe, "bypass", DefectClass::BypassBlocks),
    (Tool::Axe, "meta-viewport", DefectClass::ViewportZoom),
    (Tool::Axe, "aria-valid-attr", DefectClass::AriaAttributes),
    (Tool::Axe, "aria-valid-attr-value", DefectClass::AriaAttributes),
    (Tool::Axe, "aria-required-attr", DefectClass::AriaAttributes),
    // pa11y (HTML_CodeSniffer)
    (Tool::Pa11y, "principle1.guideline1_1.1_1_1.h37", DefectClass::MissingTextAlternative),
    (Tool::Pa11y, "principle1.guideline1_1.1_1_1.h36", DefectClass::MissingTextAlternative),
    (Tool::Pa11y, "principle1.guideline1_1.1_1_1.h24", DefectClass::MissingTextAlternative),
    (Tool::Pa11y, "principle1.guideline1_1.1_1_1.h30.2", DefectClass::MissingTextAlternative),
    (Tool::Pa11y, "principle1.guideline1_4.1_4_3.g18.fail", DefectClass::InsufficientContrast),
    (Tool::Pa11y, "principle1.guideline1_4.1_4_3.g145.fail", DefectClass::InsufficientContrast),
    (Tool::Pa11y, "principle1.guideline1_4.1_4_6.g17.fail", DefectClass::InsufficientContrastEnhanced),
    (Tool::Pa11y, "principle1.guideline1_4.1_4_6.g18.fail", DefectClass::InsufficientContrastEnhanced),
    (Tool::Pa11y, "principle1.guideline1_3.1_3_1.f68", DefectClass::MissingFormLabel),
    (Tool::Pa11y, "principle4.guideline4_1.4_1_2.h91.inputtext.name", DefectClass::MissingFormLabel),
    (Tool::Pa11y, "principle4.guideline4_1.4_1_2.h91.button.name", DefectClass::MissingButtonName),
    (Tool::Pa11y, "principle4.guideline4_1.4_1_2.h91.a.nocontent", DefectClass::MissingLinkName),
    (Tool::Pa11y, "principle4.guideline4_1.4_1_2.h91.a.emptynotitle", DefectClass::MissingLinkName),
    (Tool::Pa11y, "principle3.guideline3_1.3_1_1.h57.2", DefectClass::MissingPageLanguage),
    (Tool::Pa11y, "principle3.guideline3_1.3_1_1.h57.3.lang", DefectClass::InvalidPageLanguage),
    (Tool::Pa11y, "principle2.guideline2_4.2_4_2.h25.1.notitleel", DefectClass::MissingPageTitle),
    (Tool::Pa11y, "principle2.guideline2_4.2_4_2.h25.1.emptytitle", DefectClass::MissingPageTitle),
    (Tool::Pa11y, "principle2.guideline2_4.2_4_1.h64.1", DefectClass::MissingFrameTitle),
    (Tool::Pa11y, "principle4.guideline4_1.4_1_1.f77", DefectClass::DuplicateId),
    (Tool::Pa11y, "principle1.guideline1_3.1_3_1_a.g141", DefectClass::HeadingOrder),
    // Lighthouse audits
    (Tool::Lighthouse, "image-alt", DefectClass::MissingTextAlternative),
    (Tool::Lighthouse, "input-image-alt", DefectClass::MissingTextAlternative),
    (Tool::Lighthouse, "object-alt", DefectClass::MissingTextAlternative),
    (Tool::Lighthouse, "color-contrast", DefectClass::InsufficientContrast),
    (Tool::Lighthouse, "label", DefectClass::MissingFormLabel),
    (Tool::Lighthouse, "select-name", DefectClass::MissingFormLabel),
    (Tool::Lighthouse, "button-name", DefectClass::MissingButtonName),
    (Tool::Lighthouse, "link-name", DefectClass::MissingLinkName),
    (Tool::Lighthouse, "html-has-lang", DefectClass::MissingPageLanguage),
    (Tool::Lighthouse, "html-lang-valid", DefectClass::InvalidPageLanguage),
    (Tool::Lighthouse, "document-title", DefectClass::MissingPageTitle),
    (Tool::Lighthouse, "frame-title", DefectClass::MissingFrameTitle),
    (Tool::Lighthouse, "duplicate-id-aria", DefectClass::DuplicateId),
    (Tool::Lighthouse, "heading-order", DefectClass::HeadingOrder),
    (Tool::Lighthouse, "list", DefectClass::ListStructure),
    (Tool::Lighthouse, "listitem", DefectClass::ListStructure),
    (Tool::Lighthouse, "bypass", DefectClass::BypassBlocks),
    (Tool::Lighthouse, "meta-viewport", DefectClass::ViewportZoom),
    (Tool::Lighthouse, "aria-valid-attr", DefectClass::AriaAttributes),
    (Tool::Lighthouse, "aria-valid-attr-value", DefectClass::AriaAttributes),
    (Tool::Lighthouse, "aria-required-attr", DefectClass::AriaAttributes),
    // Lumen contrast analyzer
    (Tool::ContrastAnalyzer, "color-contrast", DefectClass::InsufficientContrast),
    (Tool::ContrastAnalyzer, "color-contrast-enhanced", DefectClass::InsufficientContrastEnhanced),
    (Tool::ContrastAnalyzer, "apca-contrast", DefectClass::InsufficientContrast),
];

fn rule_index() -> &'static HashMap<(Tool, &'static str), DefectClass> {
    static INDEX: OnceLock<HashMap<(Tool, &'static str), DefectClass>> = OnceLock::new();
    INDEX.get_or_init(|| {
        RULE_TABLE
            .iter()
            .map(|&(tool, rule, class)| ((tool, rule), class))
            .collect()
    })
}

/// Trim and lowercase a rule id, dropping pa11y's conformance standard prefix.
#[must_use]
pub fn normalize_rule_id(tool: Tool, rule_id: &str) -> String {
    let normalized = rule_id.trim().to_ascii_lowercase();
    if tool == Tool::Pa11y {
        for prefix in ["wcag2aaa.", "wcag2aa.", "wcag2a."] {
            if let Some(rest) = normalized.strip_prefix(prefix) {
                return rest.to_string();
            }
        }
    }
    normalized
}

/// Look up the defect class of an engine's rule.
#[must_use]
pub fn classify(tool: Tool, rule_id: &str) -> Option<DefectClass> {
    let normalized = normalize_rule_id(tool, rule_id);
    rule_index().get(&(tool, normalized.as_str())).copied()
}
