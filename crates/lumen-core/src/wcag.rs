//! Read-only WCAG 2.1 success criterion catalog.
//!
//! Engines that only report a criterion number (or, for Lighthouse, only an
//! audit id) use these tables to build a complete [`WcagReference`].

use crate::types::{WcagLevel, WcagReference};

/// One WCAG 2.1 success criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WcagCriterion {
    /// Criterion number, e.g. `"1.4.3"`
    pub id: &'static str,
    /// Official short title
    pub title: &'static str,
    /// Conformance level
    pub level: WcagLevel,
}

macro_rules! criteria {
    ($(($id:literal, $title:literal, $level:ident)),* $(,)?) => {
        &[$(WcagCriterion { id: $id, title: $title, level: WcagLevel::$level }),*]
    };
}

/// WCAG 2.1 success criteria (4.1.1 Parsing included for older engine output).
pub const CRITERIA: &[WcagCriterion] = criteria![
    ("1.1.1", "Non-text Content", A),
    ("1.2.1", "Audio-only and Video-only (Prerecorded)", A),
    ("1.2.2", "Captions (Prerecorded)", A),
    ("1.2.3", "Audio Description or Media Alternative (Prerecorded)", A),
    ("1.2.4", "Captions (Live)", AA),
    ("1.2.5", "Audio Description (Prerecorded)", AA),
    ("1.2.6", "Sign Language (Prerecorded)", AAA),
    ("1.2.7", "Extended Audio Description (Prerecorded)", AAA),
    ("1.2.8", "Media Alternative (Prerecorded)", AAA),
    ("1.2.9", "Audio-only (Live)", AAA),
    ("1.3.1", "Info and Relationships", A),
    ("1.3.2", "Meaningful Sequence", A),
    ("1.3.3", "Sensory Characteristics", A),
    ("1.3.4", "Orientation", AA),
    ("1.3.5", "Identify Input Purpose", AA),
    ("1.3.6", "Identify Purpose", AAA),
    ("1.4.1", "Use of Color", A),
    ("1.4.2", "Audio Control", A),
    ("1.4.3", "Contrast (Minimum)", AA),
    ("1.4.4", "Resize Text", AA),
    ("1.4.5", "Images of Text", AA),
    ("1.4.6", "Contrast (Enhanced)", AAA),
    ("1.4.7", "Low or No Background Audio", AAA),
    ("1.4.8", "Visual Presentation", AAA),
    ("1.4.9", "Images of Text (No Exception)", AAA),
    ("1.4.10", "Reflow", AA),
    ("1.4.11", "Non-text Contrast", AA),
    ("1.4.12", "Text Spacing", AA),
    ("1.4.13", "Content on Hover or Focus", AA),
    ("2.1.1", "Keyboard", A),
    ("2.1.2", "No Keyboard Trap", A),
    ("2.1.3", "Keyboard (No Exception)", AAA),
    ("2.1.4", "Character Key Shortcuts", A),
    ("2.2.1", "Timing Adjustable", A),
    ("2.2.2", "Pause, Stop, Hide", A),
    ("2.2.3", "No Timing", AAA),
    ("2.2.4", "Interruptions", AAA),
    ("2.2.5", "Re-authenticating", AAA),
    ("2.2.6", "Timeouts", AAA),
    ("2.3.1", "Three Flashes or Below Threshold", A),
    ("2.3.2", "Three Flashes", AAA),
    ("2.3.3", "Animation from Interactions", AAA),
    ("2.4.1", "Bypass Blocks", A),
    ("2.4.2", "Page Titled", A),
    ("2.4.3", "Focus Order", A),
    ("2.4.4", "Link Purpose (In Context)", A),
    ("2.4.5", "Multiple Ways", AA),
    ("2.4.6", "Headings and Labels", AA),
    ("2.4.7", "Focus Visible", AA),
    ("2.4.8", "Location", AAA),
    ("2.4.9", "Link Purpose (Link Only)", AAA),
    ("2.4.10", "Section Headings", AAA),
    ("2.5.1", "Pointer Gestures", A),
    ("2.5.2", "Pointer Cancellation", A),
    ("2.5.3", "Label in Name", A),
    ("2.5.4", "Motion Actuation", A),
    ("2.5.5", "Target Size", AAA),
    ("2.5.6", "Concurrent Input Mechanisms", AAA),
    ("3.1.1", "Language of Page", A),
    ("3.1.2", "Language of Parts", AA),
    ("3.1.3", "Unusual Words", AAA),
    ("3.1.4", "Abbreviations", AAA),
    ("3.1.5", "Reading Level", AAA),
    ("3.1.6", "Pronunciation", AAA),
    ("3.2.1", "On Focus", A),
    ("3.2.2", "On Input", A),
    ("3.2.3", "Consistent Navigation", AA),
    ("3.2.4", "Consistent Identification", AA),
    ("3.2.5", "Change on Request", AAA),
    ("3.3.1", "Error Identification", A),
    ("3.3.2", "Labels or Instructions", A),
    ("3.3.3", "Error Suggestion", AA),
    ("3.3.4", "Error Prevention (Legal, Financial, Data)", AA),
    ("3.3.5", "Help", AAA),
    ("3.3.6", "Error Prevention (All)", AAA),
    ("4.1.1", "Parsing", A),
    ("4.1.2", "Name, Role, Value", A),
    ("4.1.3", "Status Messages", AA),
];

/// Lighthouse accessibility audit id → primary WCAG criterion.
pub const LIGHTHOUSE_AUDITS: &[(&str, &str)] = &[
    ("accesskeys", "2.1.1"),
    ("aria-allowed-attr", "4.1.2"),
    ("aria-command-name", "4.1.2"),
    ("aria-hidden-body", "4.1.2"),
    ("aria-hidden-focus", "4.1.2"),
    ("aria-input-field-name", "4.1.2"),
    ("aria-required-attr", "4.1.2"),
    ("aria-required-children", "1.3.1"),
    ("aria-required-parent", "1.3.1"),
    ("aria-roles", "4.1.2"),
    ("aria-toggle-field-name", "4.1.2"),
    ("aria-valid-attr", "4.1.2"),
    ("aria-valid-attr-value", "4.1.2"),
    ("button-name", "4.1.2"),
    ("bypass", "2.4.1"),
    ("color-contrast", "1.4.3"),
    ("definition-list", "1.3.1"),
    ("dlitem", "1.3.1"),
    ("document-title", "2.4.2"),
    ("duplicate-id-active", "4.1.1"),
    ("duplicate-id-aria", "4.1.1"),
    ("form-field-multiple-labels", "3.3.2"),
    ("frame-title", "4.1.2"),
    ("html-has-lang", "3.1.1"),
    ("html-lang-valid", "3.1.1"),
    ("image-alt", "1.1.1"),
    ("input-image-alt", "1.1.1"),
    ("label", "4.1.2"),
    ("link-name", "2.4.4"),
    ("list", "1.3.1"),
    ("listitem", "1.3.1"),
    ("meta-refresh", "2.2.1"),
    ("meta-viewport", "1.4.4"),
    ("object-alt", "1.1.1"),
    ("td-headers-attr", "1.3.1"),
    ("th-has-data-cells", "1.3.1"),
    ("valid-lang", "3.1.2"),
    ("video-caption", "1.2.2"),
];

/// Look up a criterion by number.
#[must_use]
pub fn criterion(id: &str) -> Option<&'static WcagCriterion> {
    let id = id.trim();
    CRITERIA.iter().find(|c| c.id == id)
}

/// Build a complete [`WcagReference`] (level, principle and title) for a criterion.
#[must_use]
pub fn reference_for(id: &str) -> Option<WcagReference> {
    criterion(id).map(|c| {
        let mut reference = WcagReference::new(c.id, c.level);
        reference.title = Some(c.title.to_string());
        reference
    })
}

/// Map a Lighthouse audit id to its WCAG reference.
#[must_use]
pub fn reference_for_lighthouse_audit(audit_id: &str) -> Option<WcagReference> {
    LIGHTHOUSE_AUDITS
        .iter()
        .find(|(audit, _)| *audit == audit_id)
        .and_then(|(_, criterion)| reference_for(criterion))
}
