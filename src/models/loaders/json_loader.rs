use crate::models::corpus::{PageText, TextCorpus};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 语料 JSON 文件的磁盘格式
///
/// 全文拼接不入文件，加载时按页序重新计算。
#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    source: Option<String>,
    pages: Vec<PageText>,
}

/// 从 JSON 文件加载数据并转换为 TextCorpus 对象
pub fn load_json_to_corpus(json_file_path: &Path) -> Result<TextCorpus> {
    let content = fs::read_to_string(json_file_path)
        .with_context(|| format!("无法读取JSON文件: {}", json_file_path.display()))?;

    let file: CorpusFile = serde_json::from_str(&content)
        .with_context(|| format!("无法解析JSON文件: {}", json_file_path.display()))?;

    // 未显式给出来源时使用文件名
    let source = file.source.unwrap_or_else(|| {
        json_file_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });

    Ok(TextCorpus::new(source, file.pages))
}

/// 从文件夹中加载所有 JSON 文件并转换为 TextCorpus 对象列表
pub fn load_all_json_files(folder_path: &str) -> Result<Vec<TextCorpus>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut corpora = Vec::new();
    let entries =
        fs::read_dir(&folder).with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_json_to_corpus(&path) {
                Ok(corpus) => {
                    tracing::info!("成功加载 {} 页文本", corpus.pages.len());
                    corpora.push(corpus);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(corpora)
}
