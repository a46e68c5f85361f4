//! 阅读部分提取流程
//!
//! 核心职责：定位三篇文章，按预设题号区间在全文范围内恢复题目。
//!
//! 文章标题行附近常出现题号回显，真正的题干通常在远离正文的
//! 「Questions」区块里，所以题目按题号在整份语料中搜索，
//! 候选里优先取出现位置最靠后的那个。

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Passage, Question, Section};
use crate::services::{compile, OptionExtractor, TextNormalizer, TypeClassifier};
use crate::workflow::questions::{
    line_bounds, recover_missing_blanks, NumberedHit, QuestionScanner, ScanMode,
};

/// 文章锚点：预期出现在该文章中的特征短语及其题号区间
struct PassageAnchor {
    number: u32,
    title: Regex,
    q_start: u32,
    q_end: u32,
}

/// 阅读部分提取流程
pub struct ReadingFlow {
    anchors: Vec<PassageAnchor>,
    normalizer: TextNormalizer,
    classifier: TypeClassifier,
    option_extractor: OptionExtractor,
    scanner: QuestionScanner,
    instruction: Regex,
    wrong_section: Vec<Regex>,
    /// 纯点/省略号行（答案空位，不是题干，交给兜底策略处理）
    blank_artifact: Regex,
    fallback_threshold: usize,
}

impl ReadingFlow {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            // 文章标题行经常被挪到题目区块附近重复出现，
            // 所以用文章特征短语定位，而不是「Passage N」标题
            anchors: vec![
                PassageAnchor {
                    number: 1,
                    title: compile(r"(?i)Tunnelling\s+under\s+the\s+Thames")?,
                    q_start: 1,
                    q_end: 13,
                },
                PassageAnchor {
                    number: 2,
                    title: compile(r"(?is)Children.{0,200}?comprehension\s+of\s+television")?,
                    q_start: 14,
                    q_end: 26,
                },
                PassageAnchor {
                    number: 3,
                    title: compile(r"(?i)BUSINESS\s+INNOVATION")?,
                    q_start: 27,
                    q_end: 40,
                },
            ],
            normalizer: TextNormalizer::new()?,
            classifier: TypeClassifier::new()?,
            option_extractor: OptionExtractor::new()?,
            scanner: QuestionScanner::new()?,
            instruction: compile(
                r"(?i)^(?:you\s+should\s+spend|write\s+your\s+answers?|complete\s+the|do\s+not|questions\s+\d+|(?:for|choose|answer|match|according)\b)",
            )?,
            wrong_section: vec![
                compile(r"(?i)^\s*(?:PART\b|Questions.{0,40}\d.{0,40}\d)")?,
                compile(r"^\s*[£€$…]")?,
                compile(r"(?i)^\s*READING\s+PASSAGE")?,
                compile(r"(?i)^\s*(?:WRITING|SPEAKING)\b")?,
            ],
            blank_artifact: compile(r"^[.…\s]+$")?,
            fallback_threshold: config.fallback_trigger_threshold,
        })
    }

    /// 提取阅读部分
    ///
    /// # 参数
    /// - `text`: 修复后的整份语料
    ///
    /// # 返回
    /// 一篇文章都定位不到时返回 `None`（部分缺失不是错误）
    pub fn run(&self, text: &str) -> Option<Section> {
        // 行首编号条目整体只扫描一次，按题号归组后供各区间复用
        let mut hits_by_id: BTreeMap<u32, Vec<NumberedHit>> = BTreeMap::new();
        for hit in self.scanner.collect_numbered(text, ScanMode::Reading) {
            hits_by_id.entry(hit.id).or_default().push(hit);
        }

        let mut passages = Vec::new();
        for (idx, anchor) in self.anchors.iter().enumerate() {
            if let Some(passage) = self.extract_passage(text, &hits_by_id, anchor, idx) {
                passages.push(passage);
            }
        }

        if passages.is_empty() {
            return None;
        }

        let total_questions = passages.iter().map(|p| p.questions.len()).sum();
        Some(Section::Reading {
            section_number: 2,
            title: "Reading".to_string(),
            num_passages: passages.len(),
            passages,
            total_questions,
        })
    }

    fn extract_passage(
        &self,
        text: &str,
        hits_by_id: &BTreeMap<u32, Vec<NumberedHit>>,
        anchor: &PassageAnchor,
        idx: usize,
    ) -> Option<Passage> {
        let title_match = anchor.title.find(text)?;

        // 标题取特征短语所在的整行
        let (line_start, line_end) = line_bounds(text, title_match.start());
        let passage_title = text[line_start..line_end].trim().to_string();

        // 正文从标题行之后到下一篇文章锚点（最后一篇到语料末尾）
        let content_start = (line_end + 1).min(text.len());
        let mut content_end = text.len();
        if let Some(next) = self.anchors.get(idx + 1) {
            if let Some(m) = next.title.find_at(text, content_start) {
                content_end = m.start();
            }
        }
        let mut passage_content = &text[content_start..content_end];

        let questions = self.extract_questions_by_range(text, hits_by_id, anchor);

        // 找到题目时，正文在「Questions N」标记处截断
        if !questions.is_empty() {
            let marker = format!("Questions {}", anchor.q_start);
            if let Some(pos) = passage_content.find(&marker) {
                if pos > 0 {
                    passage_content = &passage_content[..pos];
                }
            }
        }
        let content_text = self.normalizer.clean_text(passage_content);

        if content_text.is_empty() && questions.is_empty() {
            return None;
        }

        debug!(
            "阅读文章 {}: {} 道题, 正文 {} 字符",
            anchor.number,
            questions.len(),
            content_text.chars().count()
        );

        Some(Passage {
            passage_number: anchor.number,
            title: passage_title,
            content: content_text,
            total_questions: questions.len(),
            questions,
        })
    }

    /// 按题号区间在全文命中里恢复题目
    ///
    /// 候选从后往前过滤：指令文本、错误部分特征、过短文本都被跳过，
    /// 第一个幸存者（即位置最靠后的）胜出。全部被过滤时退回最后一个
    /// 原始候选，而不是丢掉该题号；全文完全没有命中的题号直接缺失。
    fn extract_questions_by_range(
        &self,
        text: &str,
        hits_by_id: &BTreeMap<u32, Vec<NumberedHit>>,
        anchor: &PassageAnchor,
    ) -> Vec<Question> {
        let mut questions = Vec::new();
        for id in anchor.q_start..=anchor.q_end {
            let Some(candidates) = hits_by_id.get(&id) else {
                continue;
            };

            let mut survivor = None;
            for hit in candidates.iter().rev() {
                let t = hit.text.trim();
                if self.instruction.is_match(t) {
                    continue;
                }
                if self.wrong_section.iter().any(|re| re.is_match(t)) {
                    continue;
                }
                if self.blank_artifact.is_match(t) {
                    continue;
                }
                if t.chars().count() < 5 {
                    continue;
                }
                survivor = Some(hit);
                break;
            }

            let (hit, filtered) = match survivor {
                Some(hit) => (hit, true),
                // 兜底：没有干净候选时仍取最后一个原始命中
                None => match candidates.last() {
                    Some(hit) => (hit, false),
                    None => continue,
                },
            };

            let cleaned = self.normalizer.clean_text(&hit.text);
            if filtered {
                if cleaned.chars().count() <= 3 || self.instruction.is_match(&cleaned) {
                    continue;
                }
            } else if cleaned.is_empty() {
                continue;
            }

            let question_type = self.classifier.classify_reading(&cleaned);
            let options = self.option_extractor.extract(&cleaned);
            let mut question = Question::new(id, cleaned, question_type);
            question.options = options;
            questions.push(question);
        }

        recover_missing_blanks(
            text,
            (anchor.q_start, anchor.q_end),
            self.fallback_threshold,
            &self.normalizer,
            questions,
        )
    }
}
