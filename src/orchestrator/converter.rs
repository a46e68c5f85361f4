//! 单份语料转换器
//!
//! 按固定顺序驱动各部分流程，组装完整文档并计算置信度。

use regex::Regex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    ConvertOutput, Metadata, TestDocument, TestInfo, TestVariant, TextCorpus,
};
use crate::services::{compile, ConfidenceScorer, TextNormalizer};
use crate::utils::logging::truncate_text;
use crate::workflow::{ListeningFlow, ReadingFlow, SpeakingFlow, WritingFlow};

/// 单份语料转换器
///
/// 流程顺序固定：修复语料 → 听力 → 阅读 → 写作 → 口语 → 评分。
/// 各流程只读修复后的语料，互不影响；输出文档组装后不再修改。
pub struct Converter {
    normalizer: TextNormalizer,
    listening: ListeningFlow,
    reading: ReadingFlow,
    writing: WritingFlow,
    speaking: SpeakingFlow,
    scorer: ConfidenceScorer,
    title_patterns: Vec<Regex>,
    academic: Regex,
}

impl Converter {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            listening: ListeningFlow::new(config)?,
            reading: ReadingFlow::new(config)?,
            writing: WritingFlow::new()?,
            speaking: SpeakingFlow::new()?,
            scorer: ConfidenceScorer::new(config),
            title_patterns: vec![
                compile(r"(?i)IELTS.*?Cambridge")?,
                compile(r"(?i)Cambridge\s+(?:Test|Mock|Practice)")?,
                compile(r"(?i)IELTS\s+(?:Test|Mock|Practice)")?,
            ],
            academic: compile(r"(?i)\bACADEMIC\b")?,
        })
    }

    /// 转换一份语料
    ///
    /// # 参数
    /// - `corpus`: 外部文本提取方提供的逐页语料
    ///
    /// # 返回
    /// 结构化文档及其置信度；只有语料本身为空时才返回错误，
    /// 部分/题目缺失一律表现为输出结构中的省略
    pub fn convert(&self, corpus: &TextCorpus) -> AppResult<ConvertOutput> {
        if corpus.is_empty() {
            return Err(AppError::empty_corpus(&corpus.source));
        }

        info!("[{}] 开始解析语料（共 {} 页）", corpus.source, corpus.pages.len());
        let text = self.normalizer.repair_corpus(&corpus.full_text);

        let mut sections = Vec::new();

        if let Some(section) = self.listening.run(&text) {
            info!("[{}] ✓ 听力部分: {} 道题", corpus.source, section.question_count());
            sections.push(section);
        }
        if let Some(section) = self.reading.run(&text) {
            info!("[{}] ✓ 阅读部分: {} 道题", corpus.source, section.question_count());
            sections.push(section);
        }
        if let Some(section) = self.writing.run(&text) {
            info!("[{}] ✓ 写作部分: {} 个任务", corpus.source, section.question_count());
            sections.push(section);
        }
        if let Some(section) = self.speaking.run(&text) {
            info!("[{}] ✓ 检测到口语部分", corpus.source);
            sections.push(section);
        }

        if sections.is_empty() {
            warn!("[{}] ⚠️ 未检测到任何试卷部分", corpus.source);
        }

        let total_questions = sections.iter().map(|s| s.question_count()).sum();
        let title = self.extract_title(&text);
        info!("[{}] 标题: {}", corpus.source, truncate_text(&title, 40));

        let document = TestDocument {
            metadata: Metadata {
                source: corpus.source.clone(),
                extraction_method: "ielts_structured_extraction".to_string(),
                total_pages: corpus.pages.len(),
            },
            test_info: TestInfo {
                title,
                test_type: self.detect_variant(&text),
                num_sections: sections.len(),
                total_questions,
            },
            sections,
        };

        let confidence = self.scorer.score(&document);
        info!(
            "[{}] ✅ 解析完成: {} 个部分, {} 道题, 置信度 {:.2}",
            corpus.source,
            document.test_info.num_sections,
            document.test_info.total_questions,
            confidence
        );

        Ok(ConvertOutput {
            document,
            confidence,
        })
    }

    /// 提取试卷标题，找不到已知式样时用默认标题
    fn extract_title(&self, text: &str) -> String {
        self.title_patterns
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "IELTS Test".to_string())
    }

    /// 判定试卷变体：明示 ACADEMIC 才算 Academic，否则按 General Training
    fn detect_variant(&self, text: &str) -> TestVariant {
        if self.academic.is_match(text) {
            TestVariant::Academic
        } else {
            TestVariant::GeneralTraining
        }
    }
}
