//! 题目扫描公共工具
//!
//! 行首编号扫描、空白标记扫描、嵌入式填空兜底与去重排序。
//! 这里的扫描都是逐行/逐字符的线性遍历，不依赖回溯匹配。

use std::collections::HashSet;

use regex::Regex;

use crate::error::AppResult;
use crate::models::{Question, QuestionType};
use crate::services::{compile, TextNormalizer};

/// 兜底题目的上下文窗口半径（字符数换算前的字节上限）
const CONTEXT_RADIUS: usize = 80;

/// 空白标记字符：货币符号、破折号、省略号、圆点、项目符
pub const BLANK_MARKERS: [char; 7] = ['£', '€', '$', '-', '…', '.', '•'];

/// 行首编号扫描模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// 阅读：编号后允许点/括号标点，续行不吸收选项字母行
    Reading,
    /// 听力：编号后直接接题干，续行吸收选项字母行
    Listening,
}

/// 行首编号扫描命中
#[derive(Debug, Clone)]
pub struct NumberedHit {
    pub id: u32,
    /// 命中行在被扫描文本中的字节偏移
    pub offset: usize,
    /// 题干文本（含续行，未清洗）
    pub text: String,
}

/// 行首编号扫描器
pub struct QuestionScanner {
    reading_head: Regex,
    listening_head: Regex,
    numbered_stop: Regex,
    option_stop: Regex,
    reading_keyword_stop: Regex,
    listening_keyword_stop: Regex,
}

impl QuestionScanner {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            reading_head: compile(r"^[ \t]*(\d{1,3})[ \t]*[.)]*[ \t]+(\S.*)$")?,
            listening_head: compile(r"^[ \t]*(\d{1,3})[ \t]+(\S.*)$")?,
            numbered_stop: compile(r"^[ \t]*\d{1,3}(?:[ \t]|[.)])")?,
            option_stop: compile(r"^[ \t]*[A-H][ \t]*[).]")?,
            reading_keyword_stop: compile(
                r"(?i)^[ \t]*(?:PART|QUESTIONS?|PASSAGE|READING|WRITING|SPEAKING)\b",
            )?,
            listening_keyword_stop: compile(
                r"(?i)^[ \t]*(?:PART|QUESTIONS?|CHOOSE|ANSWER|FOR|SELECT)\b",
            )?,
        })
    }

    /// 扫描行首编号条目
    ///
    /// 一个条目从形如「编号 + 题干」的行开始，吸收后续行作为续行，
    /// 直到遇到空行、新的编号行或指令/标题关键字行。
    pub fn collect_numbered(&self, text: &str, mode: ScanMode) -> Vec<NumberedHit> {
        let head = match mode {
            ScanMode::Reading => &self.reading_head,
            ScanMode::Listening => &self.listening_head,
        };
        let lines = line_spans(text);
        let mut hits = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let (offset, line) = lines[i];
            if let Some(caps) = head.captures(line) {
                if let Ok(id) = caps[1].parse::<u32>() {
                    let mut parts = vec![caps[2].trim().to_string()];
                    let mut j = i + 1;
                    while j < lines.len() {
                        let next = lines[j].1;
                        if next.trim().is_empty() || self.is_stop(mode, next) {
                            break;
                        }
                        parts.push(next.trim().to_string());
                        j += 1;
                    }
                    hits.push(NumberedHit {
                        id,
                        offset,
                        text: parts.join("\n"),
                    });
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
        hits
    }

    fn is_stop(&self, mode: ScanMode, line: &str) -> bool {
        if self.numbered_stop.is_match(line) {
            return true;
        }
        match mode {
            ScanMode::Reading => {
                self.option_stop.is_match(line) || self.reading_keyword_stop.is_match(line)
            }
            ScanMode::Listening => self.listening_keyword_stop.is_match(line),
        }
    }
}

/// 逐行返回 (行起始字节偏移, 行内容)
pub fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for line in text.split('\n') {
        spans.push((pos, line));
        pos += line.len() + 1;
    }
    spans
}

/// 返回包含 `offset` 的行的 [起点, 终点) 字节范围
pub fn line_bounds(text: &str, offset: usize) -> (usize, usize) {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..]
        .find('\n')
        .map_or(text.len(), |i| offset + i);
    (start, end)
}

/// 返回 `line_start` 所在行的上一行内容
pub fn previous_line(text: &str, line_start: usize) -> Option<&str> {
    if line_start == 0 {
        return None;
    }
    let prev_end = line_start - 1;
    let prev_start = text[..prev_end].rfind('\n').map_or(0, |i| i + 1);
    Some(&text[prev_start..prev_end])
}

/// 一段数字串：值、字节偏移以及其后首个非空格字符的下标
struct DigitRun {
    id: u32,
    offset: usize,
    after: usize,
}

fn digit_runs(chars: &[(usize, char)]) -> Vec<DigitRun> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].1.is_ascii_digit() {
            let start = i;
            let mut j = i;
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            let digits: String = chars[start..j].iter().map(|&(_, c)| c).collect();
            let mut k = j;
            while k < chars.len() && matches!(chars[k].1, ' ' | '\t') {
                k += 1;
            }
            if let Ok(id) = digits.parse::<u32>() {
                runs.push(DigitRun {
                    id,
                    offset: chars[start].0,
                    after: k,
                });
            }
            i = j;
            continue;
        }
        i += 1;
    }
    runs
}

/// 查找「数字紧跟空白标记」的题号（数据表填空模式）
///
/// # 返回
/// (题号, 数字串的字节偏移) 列表，按出现顺序
pub fn scan_blank_marked_ids(text: &str) -> Vec<(u32, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    digit_runs(&chars)
        .into_iter()
        .filter(|run| {
            run.after < chars.len() && BLANK_MARKERS.contains(&chars[run.after].1)
        })
        .map(|run| (run.id, run.offset))
        .collect()
}

/// 查找「数字 + 点/省略号串」的题号（笔记填空模式）
pub fn scan_note_blank_ids(text: &str) -> Vec<(u32, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    digit_runs(&chars)
        .into_iter()
        .filter(|run| run.after < chars.len() && matches!(chars[run.after].1, '.' | '…'))
        .map(|run| (run.id, run.offset))
        .collect()
}

/// 嵌入式填空命中
pub struct EmbeddedBlank {
    pub id: u32,
    /// 数字串起点
    pub offset: usize,
    /// 标记串终点（字节，开区间）
    pub end: usize,
}

/// 查找「数字后跟 2 个以上点/省略号」的嵌入式填空
pub fn scan_embedded_blank_ids(text: &str) -> Vec<EmbeddedBlank> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut blanks = Vec::new();
    for run in digit_runs(&chars) {
        let mut k = run.after;
        while k < chars.len() && matches!(chars[k].1, '.' | '…') {
            k += 1;
        }
        if k - run.after >= 2 {
            let end = if k < chars.len() { chars[k].0 } else { text.len() };
            blanks.push(EmbeddedBlank {
                id: run.id,
                offset: run.offset,
                end,
            });
        }
    }
    blanks
}

/// 宽松模式：题号出现在行内任意位置，其后（同一行内）跟随空白标记
///
/// # 返回
/// 第一个满足条件的行中，从题号起到行尾的文本
pub fn find_loose_blank_line(text: &str, id: u32) -> Option<String> {
    for (_, line) in line_spans(text) {
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        for run in digit_runs(&chars) {
            if run.id != id {
                continue;
            }
            let rest = &line[run.offset..];
            let after_digits: String = rest.chars().skip_while(|c| c.is_ascii_digit()).collect();
            if after_digits.chars().any(|c| BLANK_MARKERS.contains(&c)) {
                return Some(rest.trim().to_string());
            }
        }
    }
    None
}

/// 截取 `start..end` 周围的上下文窗口，对齐到字符边界
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut s = start.saturating_sub(radius);
    while s > 0 && !text.is_char_boundary(s) {
        s -= 1;
    }
    let mut e = (end + radius).min(text.len());
    while e < text.len() && !text.is_char_boundary(e) {
        e += 1;
    }
    &text[s..e]
}

/// 按题号去重（保留先出现者）并升序排序
pub fn dedup_and_sort(questions: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Question> = questions
        .into_iter()
        .filter(|q| seen.insert(q.id))
        .collect();
    unique.sort_by_key(|q| q.id);
    unique
}

/// 主策略产出不足时，用嵌入式填空模式补齐缺失题号
///
/// 兜底恢复的题目只有上下文窗口文本，题型记为 `fill_blank`；
/// 与主策略重复的题号保留主策略结果。最终列表按题号升序。
pub fn recover_missing_blanks(
    text: &str,
    id_range: (u32, u32),
    threshold: usize,
    normalizer: &TextNormalizer,
    mut questions: Vec<Question>,
) -> Vec<Question> {
    if questions.len() < threshold {
        let existing: HashSet<u32> = questions.iter().map(|q| q.id).collect();
        for blank in scan_embedded_blank_ids(text) {
            if blank.id < id_range.0 || blank.id > id_range.1 || existing.contains(&blank.id) {
                continue;
            }
            let window = context_window(text, blank.offset, blank.end, CONTEXT_RADIUS);
            let cleaned = normalizer.clean_text(window);
            if cleaned.is_empty() {
                continue;
            }
            questions.push(Question::new(blank.id, cleaned, QuestionType::FillBlank));
        }
    }
    dedup_and_sort(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> QuestionScanner {
        QuestionScanner::new().expect("创建 QuestionScanner 失败")
    }

    #[test]
    fn test_collect_numbered_with_continuation() {
        let s = scanner();
        let text = "11 What is the venue?\nA) Hall\nB) Park\nC) Gym\n12 Next question";
        let hits = s.collect_numbered(text, ScanMode::Listening);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 11);
        assert!(hits[0].text.contains("A) Hall"));
        assert!(hits[0].text.contains("C) Gym"));
        assert_eq!(hits[1].id, 12);
    }

    #[test]
    fn test_reading_mode_does_not_absorb_option_lines() {
        let s = scanner();
        let text = "5. Choose the best answer\nA) first\nB) second";
        let hits = s.collect_numbered(text, ScanMode::Reading);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].text.contains("A) first"));
    }

    #[test]
    fn test_continuation_stops_at_header_keyword() {
        let s = scanner();
        let text = "11 Where does the tour begin?\nPART 3\nmore text";
        let hits = s.collect_numbered(text, ScanMode::Listening);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Where does the tour begin?");
    }

    #[test]
    fn test_scan_blank_marked_ids() {
        let ids: Vec<u32> = scan_blank_marked_ids("1 £……\n2 ……\n11 no marker here")
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_scan_embedded_blank_ids_requires_two_markers() {
        let found: Vec<u32> = scan_embedded_blank_ids("14 .....\n15 .\n16 ……")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(found, vec![14, 16]);
    }

    #[test]
    fn test_dedup_keeps_first_and_sorts() {
        let questions = vec![
            Question::new(3, "third", QuestionType::GapFill),
            Question::new(1, "first", QuestionType::GapFill),
            Question::new(3, "duplicate", QuestionType::FillBlank),
        ];
        let result = dedup_and_sort(questions);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
        assert_eq!(result[1].id, 3);
        assert_eq!(result[1].text, "third");
    }

    #[test]
    fn test_find_loose_blank_line() {
        let text = "notes about 7 and more ……\nnothing else";
        let found = find_loose_blank_line(text, 7).expect("应找到宽松命中");
        assert!(found.starts_with('7'));
        assert!(found.contains('…'));
    }
}
