use regex::Regex;

use crate::error::{AppError, AppResult};

pub mod classifier;
pub mod confidence;
pub mod locator;
pub mod normalizer;
pub mod options;

pub use classifier::TypeClassifier;
pub use confidence::ConfidenceScorer;
pub use locator::{SectionKind, SectionLocator, Span};
pub use normalizer::TextNormalizer;
pub use options::OptionExtractor;

/// 编译正则表达式，失败时携带模式内容返回错误
pub(crate) fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| AppError::pattern_compile_failed(pattern, e))
}
