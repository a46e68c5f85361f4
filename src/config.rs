/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 语料 JSON 文件存放目录
    pub corpus_folder: String,
    /// 转换结果输出目录
    pub output_folder: String,
    /// 一份完整试卷的预期题目总数（听力 40 + 阅读 40）
    pub expected_total_questions: usize,
    /// 主策略题目数低于该阈值时启用嵌入式填空兜底
    pub fallback_trigger_threshold: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_folder: "corpus_json".to_string(),
            output_folder: "output_json".to_string(),
            expected_total_questions: 80,
            fallback_trigger_threshold: 5,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            corpus_folder: std::env::var("CORPUS_FOLDER").unwrap_or(default.corpus_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            expected_total_questions: std::env::var("EXPECTED_TOTAL_QUESTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.expected_total_questions),
            fallback_trigger_threshold: std::env::var("FALLBACK_TRIGGER_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fallback_trigger_threshold),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
