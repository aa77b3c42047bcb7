use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Severity ─────────────────────────────────────────────────────────

/// Defect priority. Ordered `Info < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

// ── Analysis output ──────────────────────────────────────────────────

/// A reported defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// Unique within one analysis result, e.g. "bug-001".
    pub id: String,
    pub description: String,
    pub explanation: String,
    /// 1-based source line, when the defect maps to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    /// Exact substring of the submitted code exhibiting the defect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub severity: Severity,
}

/// A proposed remediation, optionally tied to a [`Bug`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bug_id: Option<String>,
    pub description: String,
    /// What the affected code should look like after the fix.
    pub suggested_code_patch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Full output of one analysis pass. Order of both lists is significant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub bugs: Vec<Bug>,
    pub fix_suggestions: Vec<FixSuggestion>,
}

impl AnalysisResult {
    /// The canonical empty result: `{ bugs: [], fixSuggestions: [] }`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty() && self.fix_suggestions.is_empty()
    }

    #[must_use]
    pub fn bug(&self, id: &str) -> Option<&Bug> {
        self.bugs.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn fix(&self, id: &str) -> Option<&FixSuggestion> {
        self.fix_suggestions.iter().find(|f| f.id == id)
    }

    /// Fix suggestions whose `bugId` names no bug in this result.
    pub fn dangling_fixes(&self) -> impl Iterator<Item = &FixSuggestion> {
        self.fix_suggestions.iter().filter(|f| {
            f.bug_id
                .as_deref()
                .is_some_and(|bug_id| self.bug(bug_id).is_none())
        })
    }
}

// ── Requests / responses ─────────────────────────────────────────────

/// Input to one analysis pass. `fileName` and `language` are hints only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            file_name: None,
            language: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFixResult {
    pub updated_code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            bugs: vec![
                Bug {
                    id: "bug-1".to_string(),
                    description: "Potential null dereference".to_string(),
                    explanation: "user may be undefined".to_string(),
                    line_number: Some(5),
                    code_snippet: Some("const name = user.profile.name;".to_string()),
                    severity: Severity::Critical,
                },
                Bug {
                    id: "bug-2".to_string(),
                    description: "Loop bound recomputed".to_string(),
                    explanation: "items.length is read each iteration".to_string(),
                    line_number: None,
                    code_snippet: None,
                    severity: Severity::Info,
                },
            ],
            fix_suggestions: vec![FixSuggestion {
                id: "fix-1".to_string(),
                bug_id: Some("bug-1".to_string()),
                description: "Null check".to_string(),
                suggested_code_patch: "const name = user?.profile?.name;".to_string(),
                explanation: None,
            }],
        }
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
        assert!("Critical".parse::<Severity>().is_err());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("fixSuggestions").is_some());
        assert_eq!(json["bugs"][0]["lineNumber"], 5);
        assert_eq!(json["bugs"][0]["severity"], "critical");
        assert_eq!(json["fixSuggestions"][0]["bugId"], "bug-1");
        assert_eq!(
            json["fixSuggestions"][0]["suggestedCodePatch"],
            "const name = user?.profile?.name;"
        );
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        let second = json["bugs"][1].as_object().unwrap();
        assert!(!second.contains_key("lineNumber"));
        assert!(!second.contains_key("codeSnippet"));
        let fix = json["fixSuggestions"][0].as_object().unwrap();
        assert!(!fix.contains_key("explanation"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let result = sample();
        let text = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_empty_result_shape() {
        let json = serde_json::to_value(AnalysisResult::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"bugs": [], "fixSuggestions": []}));
        assert!(AnalysisResult::empty().is_empty());
    }

    #[test]
    fn test_dangling_fixes() {
        let mut result = sample();
        assert_eq!(result.dangling_fixes().count(), 0);
        result.fix_suggestions.push(FixSuggestion {
            id: "fix-2".to_string(),
            bug_id: Some("bug-404".to_string()),
            description: "Orphan".to_string(),
            suggested_code_patch: String::new(),
            explanation: None,
        });
        let dangling: Vec<_> = result.dangling_fixes().map(|f| f.id.as_str()).collect();
        assert_eq!(dangling, vec!["fix-2"]);
    }

    #[test]
    fn test_request_builder() {
        let req = AnalysisRequest::new("x = 1")
            .with_file_name("main.py")
            .with_language("python");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["fileName"], "main.py");
        assert_eq!(json["language"], "python");
    }
}
