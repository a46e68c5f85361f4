//! 部分定位服务
//!
//! 在整份语料中定位各大部分（听力/阅读/写作/口语）的范围。
//! 源文档中各部分顺序不固定，所以每种部分都在全文内独立搜索，
//! 而不是用游标顺序推进。

use regex::Regex;

use crate::error::AppResult;
use crate::services::compile;

/// 部分种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Listening,
    Reading,
    Writing,
    Speaking,
}

impl SectionKind {
    const ALL: [SectionKind; 4] = [
        SectionKind::Listening,
        SectionKind::Reading,
        SectionKind::Writing,
        SectionKind::Speaking,
    ];
}

/// 语料中的一段连续字符范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// 部分定位服务
///
/// 每种部分持有一组按优先级排列的标题变体（大小写不敏感），
/// 第一个命中的变体决定范围起点；范围终点是其后最近的
/// 其他部分标题，找不到则到语料末尾。
pub struct SectionLocator {
    listening_headers: Vec<Regex>,
    reading_headers: Vec<Regex>,
    writing_headers: Vec<Regex>,
    speaking_headers: Vec<Regex>,
}

impl SectionLocator {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            listening_headers: vec![
                compile(r"(?mi)^[ \t]*LISTENING\b")?,
                compile(r"(?mi)^[ \t]*(?:PART|SECTION)[ \t]+1\b")?,
            ],
            reading_headers: vec![
                compile(r"(?mi)^[ \t]*READING[ \t]+PASSAGE[ \t]+1\b")?,
                compile(r"(?mi)^[ \t]*READING\b")?,
            ],
            writing_headers: vec![
                compile(r"(?mi)^[ \t]*WRITING[ \t]+TASK[ \t]+1\b")?,
                compile(r"(?mi)^[ \t]*WRITING\b")?,
                compile(r"(?mi)^[ \t]*TASK[ \t]+1\b")?,
            ],
            speaking_headers: vec![compile(r"(?i)\bSPEAKING\b")?],
        })
    }

    fn headers(&self, kind: SectionKind) -> &[Regex] {
        match kind {
            SectionKind::Listening => &self.listening_headers,
            SectionKind::Reading => &self.reading_headers,
            SectionKind::Writing => &self.writing_headers,
            SectionKind::Speaking => &self.speaking_headers,
        }
    }

    /// 定位某种部分的范围
    ///
    /// # 参数
    /// - `text`: 修复后的整份语料
    /// - `kind`: 要定位的部分种类
    ///
    /// # 返回
    /// 找不到任何标题变体时返回 `None`（部分缺失不是错误）
    pub fn locate(&self, text: &str, kind: SectionKind) -> Option<Span> {
        let start = self
            .headers(kind)
            .iter()
            .find_map(|re| re.find(text).map(|m| m.start()))?;
        let end = self.end_boundary(text, kind, (start + 1).min(text.len()));
        Some(Span { start, end })
    }

    /// 求某种部分从 `from` 起的结束边界
    ///
    /// 即 `from` 之后最近的其他部分标题起点，找不到则为语料末尾。
    pub fn end_boundary(&self, text: &str, kind: SectionKind, from: usize) -> usize {
        let mut end = text.len();
        for other in SectionKind::ALL {
            if other == kind {
                continue;
            }
            for re in self.headers(other) {
                if let Some(m) = re.find_at(text, from) {
                    end = end.min(m.start());
                }
            }
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> SectionLocator {
        SectionLocator::new().expect("创建 SectionLocator 失败")
    }

    #[test]
    fn test_locates_sections_in_any_order() {
        let l = locator();
        let text = "WRITING TASK 1\nDescribe the chart.\nREADING PASSAGE 1\nSome passage.\nPART 1\nAudio questions follow.";
        let writing = l.locate(text, SectionKind::Writing).expect("应定位到写作部分");
        let reading = l.locate(text, SectionKind::Reading).expect("应定位到阅读部分");
        let listening = l
            .locate(text, SectionKind::Listening)
            .expect("应定位到听力部分");
        assert_eq!(writing.start, 0);
        assert!(reading.start > writing.start);
        assert!(listening.start > reading.start);
        // 写作范围终止于阅读标题
        assert_eq!(writing.end, reading.start);
    }

    #[test]
    fn test_absent_section_is_none() {
        let l = locator();
        assert!(l.locate("nothing recognizable here", SectionKind::Reading).is_none());
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let l = locator();
        assert!(l.locate("reading passage 1\ntext", SectionKind::Reading).is_some());
        assert!(l.locate("Speaking test notes", SectionKind::Speaking).is_some());
    }

    #[test]
    fn test_end_boundary_defaults_to_corpus_end() {
        let l = locator();
        let text = "PART 1\nonly listening here";
        let span = l.locate(text, SectionKind::Listening).expect("应定位到听力部分");
        assert_eq!(span.end, text.len());
    }
}
