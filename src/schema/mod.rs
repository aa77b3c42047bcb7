//! Analysis contract: data shapes shared by the invoker, the fix
//! applicator, and the HTTP boundary, plus validation of untrusted JSON.
pub mod types;
pub mod validate;

pub use types::{AnalysisRequest, AnalysisResult, AppliedFixResult, Bug, FixSuggestion, Severity};
pub use validate::{Issue, ValidationError, validate, validate_request};

use serde_json::Value;

/// JSON Schema describing a well-formed [`AnalysisResult`].
#[must_use]
pub fn output_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(AnalysisResult)).unwrap_or(Value::Null)
}
