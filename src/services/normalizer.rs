//! 文本修复服务
//!
//! 负责清理页面提取文本中的已知伪影：水印、版权声明、
//! 孤立页码行、逐字符竖排断裂、混乱空白。

use regex::Regex;

use crate::error::AppResult;
use crate::services::compile;

/// 文本修复服务
///
/// 所有方法都是纯函数式的：输入任何文本都能得到输出，不会失败。
/// `repair_corpus` 保留行结构，供后续行首定位使用；
/// `clean_text` 把恢复出的题干/正文拼平成单行干净文本。
pub struct TextNormalizer {
    artifact_patterns: Vec<Regex>,
    excess_newlines: Regex,
    space_runs: Regex,
    word_break: Regex,
    extra_spaces: Regex,
}

impl TextNormalizer {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            artifact_patterns: vec![
                compile(r"(?i)@EnglishSchoolbyRM\s*\d+")?,
                compile(r"(?i)@EnglishSchoolbyRM")?,
                compile(r"(?i)©\s*British\s+Council")?,
                compile(r"(?mi)^[ \t]*Page[ \t]+\d+[ \t]*$")?,
            ],
            excess_newlines: compile(r"\n{3,}")?,
            space_runs: compile(r"[ \t]{2,}")?,
            word_break: compile(r"(\w)\n(\w)")?,
            extra_spaces: compile(r" {2,}")?,
        })
    }

    /// 修复整份语料，保留行结构
    ///
    /// 在任何模式匹配之前执行：去除伪影、合并竖排断裂字符、
    /// 压缩多余空行和空格串。不改变内容顺序。
    pub fn repair_corpus(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let mut text = self.remove_artifacts(raw);
        text = merge_shredded_lines(&text);
        text = merge_shredded_lines(&text);
        text = self.excess_newlines.replace_all(&text, "\n\n").into_owned();
        text = self.space_runs.replace_all(&text, " ").into_owned();
        strip_control_chars(&text)
    }

    /// 完整清洗一段恢复出的文本并拼平为单行
    ///
    /// 先隔着换行的两个文字字符之间补空格，再把剩余换行转为空格，
    /// 避免把不相关的词直接粘在一起。
    pub fn clean_text(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let mut text = self.remove_artifacts(raw);
        text = merge_shredded_lines(&text);
        text = merge_shredded_lines(&text);
        text = self.excess_newlines.replace_all(&text, "\n\n").into_owned();
        text = self.space_runs.replace_all(&text, " ").into_owned();
        text = self.word_break.replace_all(&text, "$1 $2").into_owned();
        text = text.replace('\n', " ").replace('\t', " ");
        text = self.extra_spaces.replace_all(&text, " ").into_owned();
        strip_control_chars(&text).trim().to_string()
    }

    fn remove_artifacts(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for pattern in &self.artifact_patterns {
            text = pattern.replace_all(&text, "").into_owned();
        }
        text
    }
}

/// 合并竖排断裂的字符行
///
/// 页面提取常把一个词断成每行一个字符（如 "w\ne\nr\ne"）。
/// 连续 2 行以上、每行恰好一个文字字符的行串被并回一个词。
fn merge_shredded_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if is_single_word_char(lines[i]) {
            let mut j = i;
            while j < lines.len() && is_single_word_char(lines[j]) {
                j += 1;
            }
            if j - i >= 2 {
                let merged: String = lines[i..j].iter().map(|l| l.trim()).collect();
                out.push(merged);
                i = j;
                continue;
            }
        }
        out.push(lines[i].to_string());
        i += 1;
    }
    out.join("\n")
}

fn is_single_word_char(line: &str) -> bool {
    let t = line.trim();
    let mut chars = t.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphanumeric() || c == '_')
}

/// 去除换行和制表符以外的控制字符
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| c as u32 >= 32 || c == '\n' || c == '\t')
        .collect()
}
