//! # IELTS PDF Convert
//!
//! 把从试卷文档提取出的逐页文本语料转换为结构化试卷 JSON 的 Rust 库
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 输入语料（TextCorpus）与输出文档（TestDocument）
//! - 所有结构都可直接序列化为下游校验器约定的 JSON
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单段文本
//! - `TextNormalizer` - 伪影修复与文本清洗能力
//! - `SectionLocator` - 大部分范围定位能力
//! - `TypeClassifier` - 题型判定能力
//! - `OptionExtractor` - 选项提取能力
//! - `ConfidenceScorer` - 置信度评分能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个部分"的完整提取流程
//! - `ListeningFlow` / `ReadingFlow` / `WritingFlow` / `SpeakingFlow`
//! - `questions` - 行扫描、空白标记扫描、兜底与去重的公共工具
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/converter` - 单份语料转换器，组装文档并评分
//! - `orchestrator/app` - 批量语料处理器，管理目录扫描和结果落盘
//!
//! ## 约定
//!
//! 整个提取管道是同步、纯函数式的：同一份语料转换两次得到
//! 完全相同的结构和置信度。部分/题目缺失从不报错，只体现为
//! 输出结构中的省略；只有语料本身为空才算整体失败。

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    ConvertOutput, PageText, Question, QuestionOption, QuestionType, Section, TestDocument,
    TestVariant, TextCorpus,
};
pub use orchestrator::{App, Converter};
