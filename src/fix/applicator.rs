//! Textual fix application.
//!
//! No parsing: a fix is located by exact substring match against a
//! reference snippet for its bug, then against the built-in archetypes, and
//! otherwise prepended to the code as a commented suggestion.

use serde::Serialize;
use tracing::{debug, warn};

use super::archetypes::{ReferenceTable, archetype};
use super::{FixError, SnippetIndex};
use crate::schema::{AppliedFixResult, FixSuggestion};

/// Which rule produced the updated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// The indexed snippet for the fix's bug was replaced.
    Indexed,
    /// A built-in archetype's probe matched. Its snippet was replaced when
    /// present; otherwise the code is returned as is.
    Archetype,
    /// Nothing matched; the patch was prepended to the unmodified code.
    Prepended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    pub result: AppliedFixResult,
    pub placement: Placement,
}

pub struct FixApplicator<I = ReferenceTable> {
    index: I,
}

impl FixApplicator {
    /// Applicator over the built-in archetype table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(ReferenceTable::builtin())
    }
}

impl Default for FixApplicator {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<I: SnippetIndex> FixApplicator<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Apply the candidate named `fix_id` to `current_code`.
    pub fn apply_fix(
        &self,
        current_code: &str,
        fix_id: &str,
        candidates: &[FixSuggestion],
    ) -> Result<AppliedFixResult, FixError> {
        Ok(self.apply_fix_detailed(current_code, fix_id, candidates)?.result)
    }

    /// Like [`FixApplicator::apply_fix`], also reporting the placement rule.
    pub fn apply_fix_detailed(
        &self,
        current_code: &str,
        fix_id: &str,
        candidates: &[FixSuggestion],
    ) -> Result<AppliedFix, FixError> {
        let fix = candidates
            .iter()
            .find(|f| f.id == fix_id)
            .ok_or_else(|| FixError::NotFound(fix_id.to_string()))?;
        let bug_id = fix.bug_id.as_deref();
        let patch = fix.suggested_code_patch.as_str();

        let indexed = bug_id
            .and_then(|id| self.index.snippet_for(id))
            .filter(|s| !s.is_empty() && current_code.contains(s));
        let builtin = bug_id
            .and_then(archetype)
            .filter(|a| current_code.contains(a.probe));

        let (updated_code, placement) = if let Some(snippet) = indexed {
            (current_code.replacen(snippet, patch, 1), Placement::Indexed)
        } else if let Some(a) = builtin {
            (current_code.replacen(a.snippet, patch, 1), Placement::Archetype)
        } else {
            (prepend_suggestion(fix, current_code), Placement::Prepended)
        };

        match placement {
            Placement::Prepended => warn!(
                fix = %fix.id,
                "No matching snippet for fix, prepending it as a suggestion"
            ),
            _ => debug!(fix = %fix.id, ?placement, "Fix applied in place"),
        }

        Ok(AppliedFix {
            result: AppliedFixResult {
                updated_code,
                message: success_message(&fix.description),
            },
            placement,
        })
    }
}

/// Message reported for every applied fix, whichever rule fired.
#[must_use]
pub fn success_message(description: &str) -> String {
    format!("Fix \"{description}\" applied successfully. Please review the changes.")
}

fn prepend_suggestion(fix: &FixSuggestion, code: &str) -> String {
    format!(
        "// Suggested fix for: {}\n{}\n\n{}",
        fix.description, fix.suggested_code_patch, code
    )
}
