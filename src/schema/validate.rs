//! Structural validation of untrusted JSON against the analysis contract.
//!
//! Model output and inbound request bodies arrive as arbitrary JSON. Instead
//! of deserializing straight into the typed structs (which stops at the first
//! mismatch), the checker walks the value and collects every violation with
//! its path, so callers can log or return the full list.
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{AnalysisRequest, AnalysisResult, Bug, FixSuggestion, Severity};

/// A single violation, e.g. `bugs[2].severity: expected one of critical, warning, info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

/// Every violation found in one candidate value.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

fn render_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| {
            if i.path.is_empty() {
                i.message.clone()
            } else {
                format!("{}: {}", i.path, i.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

// ── Checker ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Checker {
    issues: Vec<Issue>,
}

impl Checker {
    fn fail(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(v) if self.issues.is_empty() => Ok(v),
            _ => Err(ValidationError {
                issues: self.issues,
            }),
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail(path, format!("expected object, received {}", type_name(other)));
                None
            }
        }
    }

    fn required_str(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<String> {
        match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => {
                self.fail(join(parent, key), "required");
                None
            }
            Some(other) => {
                self.fail(
                    join(parent, key),
                    format!("expected string, received {}", type_name(other)),
                );
                None
            }
        }
    }

    /// An optional field may be left out; `null` is a type error like any other.
    fn optional_str(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<String> {
        match obj.get(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.fail(
                    join(parent, key),
                    format!("expected string, received {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Only integer literals are accepted, so `3.0` never comes back as `3`.
    fn optional_line(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<u64> {
        let value = obj.get(key)?;
        let path = join(parent, key);
        let Value::Number(n) = value else {
            self.fail(path, format!("expected number, received {}", type_name(value)));
            return None;
        };
        match n.as_u64() {
            Some(line) if line >= 1 => Some(line),
            _ => {
                self.fail(path, format!("expected a positive integer, received {n}"));
                None
            }
        }
    }

    fn array<'v>(&mut self, obj: &'v Map<String, Value>, key: &str) -> Option<&'v Vec<Value>> {
        match obj.get(key) {
            Some(Value::Array(items)) => Some(items),
            None => {
                self.fail(key, "required");
                None
            }
            Some(other) => {
                self.fail(key, format!("expected array, received {}", type_name(other)));
                None
            }
        }
    }

    fn severity(&mut self, obj: &Map<String, Value>, parent: &str) -> Option<Severity> {
        let raw = self.required_str(obj, parent, "severity")?;
        match raw.parse::<Severity>() {
            Ok(s) => Some(s),
            Err(_) => {
                let allowed: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
                self.fail(
                    join(parent, "severity"),
                    format!("expected one of {}, received {raw:?}", allowed.join(", ")),
                );
                None
            }
        }
    }

    fn bug(&mut self, value: &Value, path: &str) -> Option<Bug> {
        let obj = self.object(value, path)?;
        let id = self.required_str(obj, path, "id");
        let description = self.required_str(obj, path, "description");
        let explanation = self.required_str(obj, path, "explanation");
        let line_number = self.optional_line(obj, path, "lineNumber");
        let code_snippet = self.optional_str(obj, path, "codeSnippet");
        let severity = self.severity(obj, path);

        Some(Bug {
            id: id?,
            description: description?,
            explanation: explanation?,
            line_number,
            code_snippet,
            severity: severity?,
        })
    }

    fn fix(&mut self, value: &Value, path: &str) -> Option<FixSuggestion> {
        let obj = self.object(value, path)?;
        let id = self.required_str(obj, path, "id");
        let bug_id = self.optional_str(obj, path, "bugId");
        let description = self.required_str(obj, path, "description");
        let suggested_code_patch = self.required_str(obj, path, "suggestedCodePatch");
        let explanation = self.optional_str(obj, path, "explanation");

        Some(FixSuggestion {
            id: id?,
            bug_id,
            description: description?,
            suggested_code_patch: suggested_code_patch?,
            explanation,
        })
    }
}

// ── Public API ───────────────────────────────────────────────────────

/// Validate an untrusted analysis payload.
///
/// Returns the typed result only when the whole payload conforms; a single
/// bad element rejects everything. Unknown fields are ignored.
pub fn validate(candidate: &Value) -> Result<AnalysisResult, ValidationError> {
    let mut checker = Checker::default();
    let Some(root) = checker.object(candidate, "") else {
        return checker.finish(None);
    };

    let bugs = checker.array(root, "bugs").map(|items| {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| checker.bug(item, &format!("bugs[{i}]")))
            .collect::<Vec<_>>()
    });
    let fix_suggestions = checker.array(root, "fixSuggestions").map(|items| {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| checker.fix(item, &format!("fixSuggestions[{i}]")))
            .collect::<Vec<_>>()
    });

    let result = match (bugs, fix_suggestions) {
        (Some(bugs), Some(fix_suggestions)) => Some(AnalysisResult {
            bugs,
            fix_suggestions,
        }),
        _ => None,
    };
    checker.finish(result)
}

/// Validate an inbound analysis request body.
///
/// `code` must be a non-empty string. Whitespace-only code is accepted.
pub fn validate_request(candidate: &Value) -> Result<AnalysisRequest, ValidationError> {
    let mut checker = Checker::default();
    let Some(root) = checker.object(candidate, "") else {
        return checker.finish(None);
    };

    let code = checker.required_str(root, "", "code");
    if code.as_deref().is_some_and(str::is_empty) {
        checker.fail("code", "must not be empty");
    }
    let file_name = checker.optional_str(root, "", "fileName");
    let language = checker.optional_str(root, "", "language");

    let request = code.map(|code| AnalysisRequest {
        code,
        file_name,
        language,
    });
    checker.finish(request)
}
