//! Lab reference policy and recommendation lookup.
//!
//! Pure lookups over a fixed table: same inputs always produce the same
//! outputs, no I/O, no state. The extraction service owns status
//! assignment; `classify` is shipped only because the reference policy is
//! part of the displayed range strings and must stay consistent with it.

use crate::models::{LabStatus, Report};

/// Fallback for any (parameter, status) pair outside the reference policy.
pub const DEFAULT_RECOMMENDATION: &str =
    "No specific recommendation available. Consult your healthcare provider.";

/// Summary flag for a report with at least one non-Normal value.
pub const ATTENTION_REQUIRED: &str = "Attention Required";

/// Summary flag for a report whose values are all Normal (or empty).
pub const ALL_VALUES_NORMAL: &str = "All Values Normal";

/// Reference interval for one recognized parameter. Values at the bounds
/// are Normal; only strictly outside is flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub parameter: &'static str,
    pub low: f64,
    pub high: f64,
    pub unit: &'static str,
}

/// The recognized parameters. Matches the extraction service's policy.
const REFERENCE_RANGES: &[ReferenceRange] = &[
    ReferenceRange {
        parameter: "WBC",
        low: 4000.0,
        high: 11000.0,
        unit: "/cmm",
    },
    ReferenceRange {
        parameter: "RBC",
        low: 4.2,
        high: 5.9,
        unit: "mill/cmm",
    },
    ReferenceRange {
        parameter: "HbA1c",
        low: 4.0,
        high: 5.6,
        unit: "%",
    },
    ReferenceRange {
        parameter: "SGPT",
        low: 7.0,
        high: 56.0,
        unit: "U/L",
    },
];

/// Look up the reference interval for a parameter. Parameter names are the
/// canonical keys emitted by the extraction service (case-sensitive).
pub fn reference_range(parameter: &str) -> Option<&'static ReferenceRange> {
    REFERENCE_RANGES.iter().find(|r| r.parameter == parameter)
}

/// Human-readable range string for a recognized parameter,
/// e.g. "4000-11000 /cmm".
pub fn range_display(parameter: &str) -> Option<String> {
    reference_range(parameter).map(|r| format!("{}-{} {}", r.low, r.high, r.unit))
}

/// Classify a value against the reference policy. Mirrors the server's
/// comparison; display-side only, never overrides a server-assigned status.
pub fn classify(parameter: &str, value: f64) -> LabStatus {
    match reference_range(parameter) {
        None => LabStatus::Unknown,
        Some(r) if value < r.low => LabStatus::Low,
        Some(r) if value > r.high => LabStatus::High,
        Some(_) => LabStatus::Normal,
    }
}

/// Recommendation text for a (parameter, status) pair. Total: any pair
/// outside the policy falls back to `DEFAULT_RECOMMENDATION`.
pub fn recommendation(parameter: &str, status: LabStatus) -> &'static str {
    use LabStatus::{High, Low, Normal};

    match (parameter, status) {
        ("WBC", High) => "High WBC count may indicate infection or inflammation. Consult your doctor.",
        ("WBC", Low) => "Low WBC count may indicate weakened immunity. Avoid crowded places and maintain hygiene.",
        ("WBC", Normal) => "Your WBC count is normal. Continue maintaining good health practices.",
        ("RBC", High) => "High RBC count may indicate dehydration or lung disease. Stay hydrated.",
        ("RBC", Low) => "Low RBC count may indicate anemia. Include iron-rich foods in your diet.",
        ("RBC", Normal) => "Your RBC count is normal. Keep up the good work!",
        ("HbA1c", High) => "High HbA1c indicates poor blood sugar control. Follow diabetic diet and exercise.",
        ("HbA1c", Low) => "Your HbA1c is in excellent range. Continue your current lifestyle.",
        ("HbA1c", Normal) => "Your HbA1c is normal. Maintain current diet and exercise habits.",
        ("SGPT", High) => "High SGPT may indicate liver stress. Avoid alcohol and fatty foods.",
        ("SGPT", Low) => "Low SGPT is generally not concerning.",
        ("SGPT", Normal) => "Your liver function appears normal.",
        _ => DEFAULT_RECOMMENDATION,
    }
}

/// Summary flag for a report card: "Attention Required" when any value is
/// flagged, "All Values Normal" otherwise (including the empty map).
pub fn summary_flag(report: &Report) -> &'static str {
    if report.has_abnormal_values() {
        ATTENTION_REQUIRED
    } else {
        ALL_VALUES_NORMAL
    }
}
