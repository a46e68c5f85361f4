//! 批量语料处理器
//!
//! 扫描语料目录，逐份转换并把结果写入输出目录。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_all_json_files, ConvertOutput, Section, TextCorpus};
use crate::orchestrator::converter::Converter;

/// 应用主结构
pub struct App {
    config: Config,
    converter: Converter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        let converter = Converter::new(&config)?;
        Ok(Self { config, converter })
    }

    /// 运行应用主逻辑
    pub fn run(&self) -> Result<()> {
        init_log_file(&self.config)?;
        log_startup(&self.config);

        // 加载所有待处理的语料
        info!("\n📁 正在扫描待处理的语料...");
        let corpora = load_all_json_files(&self.config.corpus_folder)?;

        if corpora.is_empty() {
            warn!("⚠️ 没有找到待处理的语料文件，程序结束");
            return Ok(());
        }

        let total = corpora.len();
        info!("✓ 找到 {} 份待转换的语料", total);

        fs::create_dir_all(&self.config.output_folder)
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_folder))?;

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (idx, corpus) in corpora.iter().enumerate() {
            let corpus_index = idx + 1;
            info!("\n[语料 {}] {}", corpus_index, "─".repeat(30));

            match self.converter.convert(corpus) {
                Ok(output) => {
                    // 详细日志（如果启用）
                    if self.config.verbose_logging {
                        log_section_breakdown(corpus_index, &output);
                    }
                    match self.write_output(corpus, &output) {
                        Ok(path) => {
                            info!("[语料 {}] ✓ 结果已写入: {}", corpus_index, path);
                            stats.success += 1;
                        }
                        Err(e) => {
                            error!("[语料 {}] 结果写入失败: {}", corpus_index, e);
                            stats.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    error!("[语料 {}] ❌ 转换失败: {}", corpus_index, e);
                    stats.failed += 1;
                }
            }
        }

        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 把转换结果写入输出目录
    fn write_output(&self, corpus: &TextCorpus, output: &ConvertOutput) -> Result<String> {
        let file_name = format!("{}.json", corpus.source);
        let path = Path::new(&self.config.output_folder).join(file_name);
        let json = serde_json::to_string_pretty(output)?;
        fs::write(&path, json).with_context(|| format!("无法写入文件: {}", path.display()))?;
        Ok(path.display().to_string())
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

// ========== 日志辅助函数 ==========

fn init_log_file(config: &Config) -> Result<()> {
    let log_header = format!(
        "{}\n语料转换日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(&config.output_log_file, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷语料结构化转换");
    info!("📂 语料目录: {}", config.corpus_folder);
    info!("📂 输出目录: {}", config.output_folder);
    info!("{}", "=".repeat(60));
}

fn log_section_breakdown(corpus_index: usize, output: &ConvertOutput) {
    for section in &output.document.sections {
        match section {
            Section::Listening { parts, .. } => {
                info!("[语料 {}]   听力: {} 个 Part", corpus_index, parts.len())
            }
            Section::Reading { passages, .. } => {
                info!("[语料 {}]   阅读: {} 篇文章", corpus_index, passages.len())
            }
            Section::Writing { tasks, .. } => {
                info!("[语料 {}]   写作: {} 个任务", corpus_index, tasks.len())
            }
            Section::Speaking { .. } => info!("[语料 {}]   口语: 已检测到", corpus_index),
        }
    }
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
