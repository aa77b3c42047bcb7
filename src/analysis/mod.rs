//! Model-backed code analysis.
pub mod invoker;
pub mod prompt;

pub use invoker::{Analysis, Analyzer, Degradation};
pub use prompt::render_prompt;
