//! 听力部分提取流程
//!
//! 核心职责：定位 PART 1-4，按各部分的版式选择提取策略。
//! Part 1 是数据表填空，Part 4 是笔记填空，Part 2-3 是常规编号题。

use regex::Regex;
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Part, Question, QuestionType, Section};
use crate::services::{
    compile, OptionExtractor, SectionKind, SectionLocator, TextNormalizer, TypeClassifier,
};
use crate::workflow::questions::{
    find_loose_blank_line, line_bounds, previous_line, recover_missing_blanks,
    scan_blank_marked_ids, scan_note_blank_ids, QuestionScanner, ScanMode,
};

/// Part 4 行文本低于该长度时用上一行补足上下文
const MIN_NOTE_LINE_LEN: usize = 15;

/// 听力部分提取流程
pub struct ListeningFlow {
    /// PART/SECTION n 标题，下标 n-1
    part_headers: Vec<Regex>,
    locator: SectionLocator,
    scanner: QuestionScanner,
    normalizer: TextNormalizer,
    classifier: TypeClassifier,
    option_extractor: OptionExtractor,
    /// 纯破折号/区间残片（如「– 20」）
    dash_artifact: Regex,
    numbered_line: Regex,
    fallback_threshold: usize,
}

impl ListeningFlow {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut part_headers = Vec::with_capacity(4);
        for n in 1..=4 {
            part_headers.push(compile(&format!(
                r"(?mi)^[ \t]*(?:PART|SECTION)[ \t]+{}(?:[ \t:.]|$)",
                n
            ))?);
        }
        Ok(Self {
            part_headers,
            locator: SectionLocator::new()?,
            scanner: QuestionScanner::new()?,
            normalizer: TextNormalizer::new()?,
            classifier: TypeClassifier::new()?,
            option_extractor: OptionExtractor::new()?,
            dash_artifact: compile(r"^(?:[–—\-\s]+\d|[–—\-\s]*$)")?,
            numbered_line: compile(r"^\d+\s")?,
            fallback_threshold: config.fallback_trigger_threshold,
        })
    }

    /// 提取听力部分
    ///
    /// # 返回
    /// 一个 Part 都找不到时返回 `None`
    pub fn run(&self, text: &str) -> Option<Section> {
        let mut parts = Vec::new();
        for n in 1..=4u32 {
            if let Some(part) = self.extract_part(text, n) {
                parts.push(part);
            }
        }

        if parts.is_empty() {
            return None;
        }

        let total_questions = parts.iter().map(|p| p.questions.len()).sum();
        Some(Section::Listening {
            section_number: 1,
            title: "Listening".to_string(),
            num_parts: parts.len(),
            parts,
            total_questions,
        })
    }

    fn extract_part(&self, text: &str, n: u32) -> Option<Part> {
        let header = &self.part_headers[(n - 1) as usize];
        let header_match = header.find(text)?;
        let start = header_match.start();
        let search_from = header_match.end().min(text.len());

        // 结束边界：下一个 Part 标题优先，否则最近的其他大部分标题
        let mut end = text.len();
        if n < 4 {
            if let Some(m) = self.part_headers[n as usize].find_at(text, search_from) {
                end = m.start();
            }
        }
        if end == text.len() {
            end = self
                .locator
                .end_boundary(text, SectionKind::Listening, search_from);
        }

        let span = &text[start..end];

        let questions = match n {
            1 => self.extract_table_questions(span),
            4 => self.extract_note_questions(span),
            _ => self.extract_standard_questions(span),
        };
        let questions = recover_missing_blanks(
            span,
            expected_id_range(n),
            self.fallback_threshold,
            &self.normalizer,
            questions,
        );

        let description = self.extract_description(span);
        if questions.is_empty() && description.trim().is_empty() {
            return None;
        }

        debug!("听力 Part {}: {} 道题", n, questions.len());

        Some(Part {
            part_number: n,
            title: format!("Part {}", n),
            total_questions: questions.len(),
            questions,
            description,
        })
    }

    /// Part 1：数据表填空
    ///
    /// 表格里的题号紧跟货币符号/破折号/省略号等空白标记；
    /// 没找到的题号再用宽松模式（题号在行内任意位置）重试。
    fn extract_table_questions(&self, span: &str) -> Vec<Question> {
        let mut found: Vec<(u32, String)> = Vec::new();
        for (id, offset) in scan_blank_marked_ids(span) {
            if !(1..=10).contains(&id) || found.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            let (line_start, line_end) = line_bounds(span, offset);
            let line = &span[line_start..line_end];
            let text = line[offset - line_start..].trim().to_string();
            found.push((id, text));
        }

        for id in 1..=10u32 {
            if found.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            if let Some(text) = find_loose_blank_line(span, id) {
                found.push((id, text));
            }
        }

        found.sort_by_key(|&(id, _)| id);

        let mut questions = Vec::new();
        for (id, raw) in found {
            let cleaned = self.normalizer.clean_text(&raw);
            if cleaned.chars().count() < 2 {
                continue;
            }
            let mut question = Question::new(id, cleaned, QuestionType::GapFill);
            question.max_words = Some(if id <= 7 { 2 } else { 1 });
            questions.push(question);
        }
        questions
    }

    /// Part 4：笔记填空（「31 ……」形式）
    fn extract_note_questions(&self, span: &str) -> Vec<Question> {
        let mut questions = Vec::new();
        for (id, offset) in scan_note_blank_ids(span) {
            if !(31..=40).contains(&id) {
                continue;
            }
            let (line_start, line_end) = line_bounds(span, offset);
            let mut raw = span[line_start..line_end].trim().to_string();
            // 行太短时用上一行补足上下文
            if raw.chars().count() < MIN_NOTE_LINE_LEN {
                if let Some(prev) = previous_line(span, line_start) {
                    if !prev.trim().is_empty() {
                        raw = format!("{} {}", prev.trim(), raw);
                    }
                }
            }
            let cleaned = self.normalizer.clean_text(&raw);
            if cleaned.is_empty() {
                continue;
            }
            let mut question = Question::new(id, cleaned, QuestionType::GapFill);
            question.max_words = Some(1);
            questions.push(question);
        }
        questions
    }

    /// Part 2-3：常规行首编号题，允许多行续行
    fn extract_standard_questions(&self, span: &str) -> Vec<Question> {
        let mut questions = Vec::new();
        for hit in self.scanner.collect_numbered(span, ScanMode::Listening) {
            if !(1..=40).contains(&hit.id) {
                continue;
            }
            let trimmed = hit.text.trim();
            if self.dash_artifact.is_match(trimmed) {
                continue;
            }
            if trimmed.chars().count() < 3 {
                continue;
            }
            let cleaned = self.normalizer.clean_text(&hit.text);
            if cleaned.chars().count() < 3 {
                continue;
            }
            let question_type = self.classifier.classify_listening(&cleaned);
            let options = self.option_extractor.extract(&cleaned);
            let mut question = Question::new(hit.id, cleaned, question_type);
            question.options = options;
            questions.push(question);
        }
        questions
    }

    /// 提取 Part 开头的说明文字（最多取前 5 行中的非编号行）
    fn extract_description(&self, span: &str) -> String {
        let mut lines = Vec::new();
        for line in span.split('\n').take(5) {
            if !line.trim().is_empty() && !self.numbered_line.is_match(line) {
                lines.push(line.trim());
            }
        }
        lines.join(" ")
    }
}

/// 各 Part 的预期题号区间
fn expected_id_range(n: u32) -> (u32, u32) {
    match n {
        1 => (1, 10),
        4 => (31, 40),
        _ => (1, 40),
    }
}
