//! 选项提取服务

use regex::Regex;

use crate::error::AppResult;
use crate::models::QuestionOption;
use crate::services::compile;

/// 选项提取服务
///
/// 从题干文本中识别内嵌选项列表：
/// TRUE/FALSE/NOT GIVEN 三项、A-D 选择题选项、A-H 配对字母。
/// 少于 3 段的结果一律视为没有选项（三项判断题除外，它总是
/// 返回固定的三项列表）。
pub struct OptionExtractor {
    true_false: Regex,
    letter_marker: Regex,
}

impl OptionExtractor {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            // 大小写敏感：题干中这三个词总是全大写出现
            true_false: compile(r"TRUE|FALSE|NOT\s+GIVEN")?,
            letter_marker: compile(r"[A-H]\s*[).:\-]\s*")?,
        })
    }

    /// 提取题干中的选项列表
    ///
    /// # 返回
    /// 无法得到有效选项列表时返回 `None`，从不返回 1-2 项的列表
    pub fn extract(&self, text: &str) -> Option<Vec<QuestionOption>> {
        // 三项判断题直接返回固定列表，优先于其他任何模式
        if self.true_false.is_match(text) {
            return Some(vec![
                QuestionOption::new("A", "TRUE"),
                QuestionOption::new("B", "FALSE"),
                QuestionOption::new("C", "NOT GIVEN"),
            ]);
        }

        // 字母前缀分段：每段延伸到下一个字母前缀或文本末尾
        let mut markers: Vec<(usize, usize, char)> = Vec::new();
        for m in self.letter_marker.find_iter(text) {
            let preceded_ok = text[..m.start()]
                .chars()
                .next_back()
                .map_or(true, |c| c.is_whitespace() || c == '(');
            if !preceded_ok {
                continue;
            }
            let label = match m.as_str().chars().next() {
                Some(c) => c,
                None => continue,
            };
            markers.push((m.start(), m.end(), label));
        }

        if markers.len() < 3 {
            return None;
        }

        let mut options: Vec<QuestionOption> = Vec::new();
        for (i, &(_, text_start, label)) in markers.iter().enumerate() {
            let seg_end = markers.get(i + 1).map_or(text.len(), |next| next.0);
            let segment = text[text_start..seg_end].trim();
            // 任何一段清理后不足 2 个字符，整个列表作废
            if segment.chars().count() <= 1 {
                return None;
            }
            // 同一字母只保留首次出现
            if options.iter().any(|o| o.label == label.to_string()) {
                continue;
            }
            options.push(QuestionOption::new(label.to_string(), segment));
        }

        if options.len() >= 3 {
            Some(options)
        } else {
            None
        }
    }
}
