//! Prompt rendering for code analysis.

use crate::schema::{AnalysisRequest, output_schema};

/// Shown in place of a file name the caller did not supply.
pub const FILE_NAME_NOT_PROVIDED: &str = "Not Provided";

const PREAMBLE: &str = "\
You are an expert code reviewer specializing in identifying bugs and suggesting improvements.
Analyze the following code snippet.";

const INSTRUCTIONS: &str = r#"Please identify:
1. Bugs. For each bug give: a unique string "id" (e.g. "bug-001"), a short "description", a detailed "explanation", the "lineNumber" as an integer when the bug is tied to one line, the "codeSnippet" copied exactly from the code above when a short offending segment exists, and a "severity" of "critical", "warning" or "info".
2. Fix suggestions. For each bug that can be fixed give: a unique string "id" (e.g. "fix-001"), the "bugId" of the bug it fixes, a "description" of the fix, the "suggestedCodePatch" showing what the code should look like after the fix, and an "explanation" of why the fix works.

If no bugs are found, return empty arrays for both "bugs" and "fixSuggestions".
Only include fix suggestions for bugs where a concrete patch can be proposed.
Every "bugId" must match the "id" of one of the reported bugs.

Respond with JSON only, strictly matching this JSON Schema:"#;

/// Build the analysis prompt for `request`.
#[must_use]
pub fn render_prompt(request: &AnalysisRequest) -> String {
    let fence = fence_for(&request.code);
    let schema = serde_json::to_string_pretty(&output_schema()).unwrap_or_default();

    let mut prompt = String::with_capacity(request.code.len() + INSTRUCTIONS.len() + 1024);
    prompt.push_str(PREAMBLE);
    prompt.push('\n');
    if let Some(language) = hint(request.language.as_deref()) {
        prompt.push_str(&format!("The code is written in {language}.\n"));
    }
    let file_name = hint(request.file_name.as_deref()).unwrap_or(FILE_NAME_NOT_PROVIDED);
    prompt.push_str(&format!("File Name: {file_name}\n\n"));

    prompt.push_str(&format!("Code:\n{fence}\n{}\n{fence}\n\n", request.code));
    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');
    prompt.push_str(&schema);
    prompt.push('\n');
    prompt
}

fn hint(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A backtick fence longer than any backtick run inside `code`.
fn fence_for(code: &str) -> String {
    let longest = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
