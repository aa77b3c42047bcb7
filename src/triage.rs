//! Severity triage of an analysis result.
//!
//! Collapses a list of bugs into the three-way verdict the client uses to
//! decide how loudly to report and whether to offer fixes.
use serde::Serialize;

use crate::schema::{AnalysisResult, Bug, FixSuggestion, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    NoIssues,
    Mild,
    Critical,
}

impl Verdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::NoIssues => "no-issues",
            Verdict::Mild => "mild",
            Verdict::Critical => "critical",
        }
    }
}

/// Classify a result.
///
/// No bugs, or a lone `info` bug, is "no issues". Otherwise the worst
/// severity decides: any `critical` wins over any `warning`.
#[must_use]
pub fn classify(result: &AnalysisResult) -> Verdict {
    match result.bugs.as_slice() {
        [] => Verdict::NoIssues,
        [only] if only.severity == Severity::Info => Verdict::NoIssues,
        bugs => match bugs.iter().map(|b| b.severity).max() {
            Some(Severity::Critical) => Verdict::Critical,
            Some(Severity::Warning) => Verdict::Mild,
            _ => Verdict::NoIssues,
        },
    }
}

/// Bugs worth surfacing to the user, in reported order.
pub fn relevant_bugs(result: &AnalysisResult) -> impl Iterator<Item = &Bug> {
    result.bugs.iter().filter(|b| b.severity != Severity::Info)
}

/// The first fix suggestion, as ordered by the model.
///
/// Order is taken as given; it is not re-ranked by severity.
#[must_use]
pub fn primary_fix(result: &AnalysisResult) -> Option<&FixSuggestion> {
    result.fix_suggestions.first()
}

/// Fixes are offered only for mild or critical results that carry any.
#[must_use]
pub fn offers_fixes(result: &AnalysisResult) -> bool {
    !result.fix_suggestions.is_empty() && classify(result) != Verdict::NoIssues
}
