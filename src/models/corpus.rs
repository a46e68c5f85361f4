use serde::{Deserialize, Serialize};

/// 单页文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 页码（从 1 开始）
    pub page: u32,
    /// 该页的全部文本
    pub content: String,
}

/// 输入语料
///
/// 由外部文本提取方提供的逐页文本，外加按页序拼接的全文。
/// 管道内部只读，不会修改。
#[derive(Debug, Clone)]
pub struct TextCorpus {
    /// 语料来源标识（通常为源文件名）
    pub source: String,
    pub pages: Vec<PageText>,
    /// 所有页面内容按页序以换行拼接而成
    pub full_text: String,
}

impl TextCorpus {
    /// 从逐页文本构建语料
    pub fn new(source: impl Into<String>, pages: Vec<PageText>) -> Self {
        let full_text = pages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            source: source.into(),
            pages,
            full_text,
        }
    }

    /// 把一段文本当作单页语料（主要用于测试）
    pub fn from_text(source: impl Into<String>, text: impl Into<String>) -> Self {
        let content = text.into();
        Self::new(
            source,
            vec![PageText {
                page: 1,
                content,
            }],
        )
    }

    /// 语料是否为空（没有页面，或拼接后没有任何非空白字符）
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() || self.full_text.trim().is_empty()
    }
}
