//! Analysis invoker: one model call, validated, degrading to the empty result.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::prompt::render_prompt;
use crate::generator::{Generator, GeneratorError};
use crate::schema::{AnalysisRequest, AnalysisResult, ValidationError, validate};

/// Why an analysis fell back to the canonical empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The model returned nothing usable.
    NoOutput,
    /// The model answered, but the answer broke the contract.
    InvalidOutput(ValidationError),
}

/// Outcome of [`Analyzer::analyze_detailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub degradation: Option<Degradation>,
}

pub struct Analyzer {
    generator: Arc<dyn Generator>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Analyze `request`.
    ///
    /// Missing or malformed model output yields `AnalysisResult::empty()`;
    /// only generator transport failures are returned as errors.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GeneratorError> {
        Ok(self.analyze_detailed(request).await?.result)
    }

    /// Like [`Analyzer::analyze`], also reporting why a result was degraded.
    pub async fn analyze_detailed(&self, request: &AnalysisRequest) -> Result<Analysis, GeneratorError> {
        let prompt = render_prompt(request);
        debug!(
            generator = self.generator.name(),
            code_len = request.code.len(),
            "Requesting analysis"
        );

        let Some(output) = self.generator.generate(&prompt).await? else {
            warn!("Model returned no output, returning empty analysis");
            return Ok(degraded(Degradation::NoOutput));
        };

        let result = match validate(&output) {
            Ok(result) => result,
            Err(e) => {
                error!("Model output failed schema validation: {e}");
                return Ok(degraded(Degradation::InvalidOutput(e)));
            }
        };

        for fix in result.dangling_fixes() {
            debug!(
                fix = %fix.id,
                bug = fix.bug_id.as_deref().unwrap_or_default(),
                "Fix references a bug not in this result"
            );
        }
        info!(
            bugs = result.bugs.len(),
            fixes = result.fix_suggestions.len(),
            "Analysis complete"
        );

        Ok(Analysis {
            result,
            degradation: None,
        })
    }
}

fn degraded(reason: Degradation) -> Analysis {
    Analysis {
        result: AnalysisResult::empty(),
        degradation: Some(reason),
    }
}
