use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// 提取过程元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// 语料来源标识
    pub source: String,
    /// 提取方法标签
    pub extraction_method: String,
    pub total_pages: usize,
}

/// 试卷变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestVariant {
    Academic,
    GeneralTraining,
}

/// 试卷级信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInfo {
    pub title: String,
    pub test_type: TestVariant,
    pub num_sections: usize,
    pub total_questions: usize,
}

/// 写作任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingTaskKind {
    /// 图表描述
    GraphDescription,
    /// 书信
    Letter,
    /// 报告
    Report,
    /// 议论文
    Essay,
    /// 其他写作
    GeneralWriting,
}

/// 阅读文章（含其题目）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// 文章序号（1-3）
    pub passage_number: u32,
    pub title: String,
    /// 文章正文（已清洗拼平）
    pub content: String,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// 听力部分（含其题目）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// 部分序号（1-4）
    pub part_number: u32,
    pub title: String,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    /// 该部分开头的说明文字
    pub description: String,
}

/// 写作任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// 任务序号（1-2）
    pub task_number: u32,
    pub title: String,
    /// 任务题干描述（已清洗拼平）
    pub description: String,
    #[serde(rename = "type")]
    pub kind: WritingTaskKind,
    /// 每个任务恰好一道合成题目
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// 试卷部分
///
/// 序列化为带 `type` 标签的对象，结构与下游校验器约定一致。
/// 同一种部分在一份文档中至多出现一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Listening {
        section_number: u32,
        title: String,
        num_parts: usize,
        parts: Vec<Part>,
        total_questions: usize,
    },
    Reading {
        section_number: u32,
        title: String,
        num_passages: usize,
        passages: Vec<Passage>,
        total_questions: usize,
    },
    Writing {
        section_number: u32,
        title: String,
        num_tasks: usize,
        tasks: Vec<Task>,
        total_questions: usize,
    },
    Speaking {
        section_number: u32,
        title: String,
        /// 仅标记检测到该部分，不做进一步提取
        detected: bool,
    },
}

impl Section {
    /// 该部分包含的题目总数
    pub fn question_count(&self) -> usize {
        match self {
            Section::Listening { parts, .. } => parts.iter().map(|p| p.questions.len()).sum(),
            Section::Reading { passages, .. } => passages.iter().map(|p| p.questions.len()).sum(),
            Section::Writing { tasks, .. } => tasks.iter().map(|t| t.questions.len()).sum(),
            Section::Speaking { .. } => 0,
        }
    }

    /// 是否属于计分的三大部分（听力 / 阅读 / 写作）
    pub fn is_main_section(&self) -> bool {
        !matches!(self, Section::Speaking { .. })
    }
}

/// 转换输出的根结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDocument {
    pub metadata: Metadata,
    pub test_info: TestInfo,
    pub sections: Vec<Section>,
}

/// 最终交付给下游的结果：结构化文档 + 置信度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOutput {
    pub document: TestDocument,
    /// 提取完整度/质量估计，范围 [0,1]
    pub confidence: f64,
}
