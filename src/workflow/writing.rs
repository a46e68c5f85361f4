//! 写作部分提取流程
//!
//! 每个任务产出恰好一道合成题目：任务描述本身就是「题干」，
//! 不存在编号条目。

use regex::Regex;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{Question, QuestionType, Section, Task, WritingTaskKind};
use crate::services::{compile, TextNormalizer};

/// 写作部分提取流程
pub struct WritingFlow {
    /// TASK n 标题（可带 WRITING 前缀），下标 n-1
    task_headers: Vec<Regex>,
    /// 任务范围的其他终止标记（SPEAKING、答案页）
    end_markers: Vec<Regex>,
    kind_rules: Vec<(WritingTaskKind, Regex)>,
    normalizer: TextNormalizer,
}

impl WritingFlow {
    pub fn new() -> AppResult<Self> {
        let mut task_headers = Vec::with_capacity(2);
        for n in 1..=2 {
            task_headers.push(compile(&format!(r"(?i)(?:WRITING\s+)?TASK\s+{}\b", n))?);
        }
        Ok(Self {
            task_headers,
            end_markers: vec![
                compile(r"(?mi)^[ \t]*SPEAKING\b")?,
                compile(r"(?i)Answer\s+Key")?,
            ],
            kind_rules: vec![
                (
                    WritingTaskKind::GraphDescription,
                    compile(r"graph|chart|diagram|\bbar\b|\bline\b|\bpie\b")?,
                ),
                (WritingTaskKind::Letter, compile(r"letter|write\s+to")?),
                (WritingTaskKind::Report, compile(r"report|academic")?),
                (
                    WritingTaskKind::Essay,
                    compile(r"essay|discuss|agree|opinion")?,
                ),
            ],
            normalizer: TextNormalizer::new()?,
        })
    }

    /// 提取写作部分
    ///
    /// # 返回
    /// 一个任务都找不到时返回 `None`
    pub fn run(&self, text: &str) -> Option<Section> {
        let mut tasks = Vec::new();
        for n in 1..=2u32 {
            if let Some(task) = self.extract_task(text, n) {
                tasks.push(task);
            }
        }

        if tasks.is_empty() {
            return None;
        }

        let total_questions = tasks.len();
        Some(Section::Writing {
            section_number: 4,
            title: "Writing".to_string(),
            num_tasks: tasks.len(),
            tasks,
            total_questions,
        })
    }

    fn extract_task(&self, text: &str, n: u32) -> Option<Task> {
        let header_match = self.task_headers[(n - 1) as usize].find(text)?;
        let from = header_match.end().min(text.len());

        // 结束边界：下一任务优先，否则 SPEAKING / 答案页
        let mut end = text.len();
        if n < 2 {
            if let Some(m) = self.task_headers[n as usize].find_at(text, from) {
                end = m.start();
            }
        }
        if end == text.len() {
            for marker in &self.end_markers {
                if let Some(m) = marker.find_at(text, from) {
                    end = end.min(m.start());
                }
            }
        }

        let raw = text[from..end]
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace());
        let description = self.normalizer.clean_text(raw);
        if description.is_empty() {
            return None;
        }

        let kind = self.classify_task(&description);
        debug!("写作任务 {}: 类型 {:?}", n, kind);

        Some(Task {
            task_number: n,
            title: format!("Task {}", n),
            description,
            kind,
            questions: vec![Question::new(
                1,
                format!("Complete Writing Task {}", n),
                QuestionType::WritingTask,
            )],
            total_questions: 1,
        })
    }

    /// 按描述内容判定任务类型，按规则顺序第一条命中胜出
    fn classify_task(&self, description: &str) -> WritingTaskKind {
        let lower = description.to_lowercase();
        self.kind_rules
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|&(kind, _)| kind)
            .unwrap_or(WritingTaskKind::GeneralWriting)
    }
}
