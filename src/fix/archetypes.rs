//! Built-in bug archetypes and the default reference table.

use std::collections::HashMap;

use super::SnippetIndex;
use crate::config::ReferenceSnippet;

/// A known defect pattern with the exact source text it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    pub bug_id: &'static str,
    pub title: &'static str,
    /// Canonical offending snippet, replaced verbatim.
    pub snippet: &'static str,
    /// Shorter marker that must appear in the code before the snippet is tried.
    pub probe: &'static str,
}

pub const ARCHETYPES: &[Archetype] = &[
    Archetype {
        bug_id: "bug-1",
        title: "Potential Null Pointer Exception",
        snippet: "const name = user.profile.name;",
        probe: "user.profile.name",
    },
    Archetype {
        bug_id: "bug-2",
        title: "Inefficient Loop Detected",
        snippet: "for (let i = 0; i < items.length; i++) {",
        probe: "items.length; i++",
    },
    Archetype {
        bug_id: "bug-3",
        title: "Hardcoded API Key",
        snippet: "const API_KEY = \"abcdef123456\";",
        probe: "abcdef123456",
    },
];

#[must_use]
pub fn archetype(bug_id: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.bug_id == bug_id)
}

/// Bug id → snippet lookup backed by a map.
///
/// The default table holds the built-in archetypes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, String>,
}

impl ReferenceTable {
    /// Table with only the built-in archetypes.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for a in ARCHETYPES {
            table.insert(a.bug_id, a.snippet);
        }
        table
    }

    /// Built-in archetypes overlaid with configured snippets.
    #[must_use]
    pub fn with_overrides(extra: &[ReferenceSnippet]) -> Self {
        let mut table = Self::builtin();
        for entry in extra {
            table.insert(entry.bug_id.as_str(), entry.snippet.as_str());
        }
        table
    }

    /// Add or replace an entry. Empty snippets are ignored.
    pub fn insert(&mut self, bug_id: impl Into<String>, snippet: impl Into<String>) {
        let snippet = snippet.into();
        if !snippet.is_empty() {
            self.entries.insert(bug_id.into(), snippet);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnippetIndex for ReferenceTable {
    fn snippet_for(&self, bug_id: &str) -> Option<&str> {
        self.entries.get(bug_id).map(String::as_str)
    }
}
