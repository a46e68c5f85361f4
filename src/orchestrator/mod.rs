//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 批量语料处理器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 批量加载语料（Vec<TextCorpus>）
//! - 把转换结果写入输出目录
//! - 输出全局统计信息
//!
//! ### `converter` - 单份语料转换器
//! - 修复语料文本后按固定顺序驱动各部分流程
//! - 组装 TestDocument 并计算置信度
//! - 提取试卷标题与变体
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<TextCorpus>)
//!     ↓
//! converter (处理单份 TextCorpus)
//!     ↓
//! workflow (流程层：listening / reading / writing / speaking)
//!     ↓
//! services (能力层：normalizer / locator / classifier / options / confidence)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管批量，converter 管单份
//! 2. **向下依赖**：编排层 → workflow → services → models
//! 3. **无业务判断**：只做调度、组装和统计

pub mod app;
pub mod converter;

// 重新导出主要类型
pub use app::App;
pub use converter::Converter;
