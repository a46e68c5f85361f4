use serde::{Deserialize, Serialize};

/// 题型枚举
///
/// 序列化后即为下游校验器约定的小写标签（如 `multiple_choice`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// TRUE / FALSE / NOT GIVEN 判断题
    TrueFalseNg,
    /// 信息配对题
    Matching,
    /// 选择题
    MultipleChoice,
    /// 段落标题配对题
    HeadingMatching,
    /// 填空 / 句子补全题
    GapFill,
    /// 摘要 / 笔记补全题
    SummaryCompletion,
    /// 简答题
    ShortAnswer,
    /// 仅由兜底策略恢复的填空题
    FillBlank,
    /// 写作任务
    WritingTask,
    /// 无法识别时的默认题型
    OpenQuestion,
}

impl QuestionType {
    /// 该题型在结构上是否要求携带选项列表
    pub fn requires_options(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Matching | QuestionType::TrueFalseNg
        )
    }

    /// 获取标准标签
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::TrueFalseNg => "true_false_ng",
            QuestionType::Matching => "matching",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::HeadingMatching => "heading_matching",
            QuestionType::GapFill => "gap_fill",
            QuestionType::SummaryCompletion => "summary_completion",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::WritingTask => "writing_task",
            QuestionType::OpenQuestion => "open_question",
        }
    }
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// 选项字母（A-H）
    pub label: String,
    /// 选项内容
    pub text: String,
}

impl QuestionOption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// 单道题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题号（在所属子单元内唯一）
    pub id: u32,
    /// 恢复出的题干文本（可能带有上下文补齐）
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// 答案字数上限提示（仅听力填空题携带）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
}

impl Question {
    /// 创建不带选项的题目
    pub fn new(id: u32, text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id,
            text: text.into(),
            question_type,
            max_words: None,
            options: None,
        }
    }

    /// 题目是否携带非空选项列表
    pub fn has_options(&self) -> bool {
        self.options.as_ref().map_or(false, |o| !o.is_empty())
    }
}
