//! 置信度评分服务

use std::collections::HashSet;

use crate::config::Config;
use crate::models::{Question, QuestionType, Section, TestDocument};

/// 部分完整度满分
const SECTION_WEIGHT: f64 = 20.0;
/// 题目覆盖率满分
const COVERAGE_WEIGHT: f64 = 30.0;
/// 文本质量满分
const QUALITY_WEIGHT: f64 = 20.0;
/// 选项携带率满分
const OPTION_WEIGHT: f64 = 15.0;
/// 题型多样性满分（内部上限 10 分）
const VARIETY_WEIGHT: f64 = 15.0;
const VARIETY_CAP: f64 = 10.0;
/// 期望观察到的题型种数
const EXPECTED_TYPE_VARIETY: f64 = 5.0;
/// 覆盖率超过该比例后不再加分：更高的数量不代表更高的正确率
const COVERAGE_CREDIT_CEILING: f64 = 0.7;

/// 阅读题干中的指令污染标记
const READING_CONTAMINATION: [&str; 4] =
    ["you should", "write your", "complete the", "choose from"];
/// 听力题干中的指令污染标记
const LISTENING_CONTAMINATION: [&str; 4] = ["part", "questions", "choose", "answer"];

/// 置信度评分服务
///
/// 对组装完成的文档做加权评分：各分量先各自封顶，
/// 再除以可得总分，结果限制在 [0,1]。只读输入，从不修改文档。
pub struct ConfidenceScorer {
    expected_total_questions: usize,
}

impl ConfidenceScorer {
    pub fn new(config: &Config) -> Self {
        Self {
            expected_total_questions: config.expected_total_questions,
        }
    }

    /// 计算文档的置信度
    pub fn score(&self, document: &TestDocument) -> f64 {
        let mut score = 0.0;
        let mut max_score = 0.0;

        // 1. 部分完整度：三大部分到齐的比例，至少两个才开始计分
        max_score += SECTION_WEIGHT;
        let main_sections = document
            .sections
            .iter()
            .filter(|s| s.is_main_section())
            .count();
        if main_sections >= 2 {
            score += (main_sections as f64 / 3.0 * SECTION_WEIGHT).min(SECTION_WEIGHT);
        }

        // 2. 题目覆盖率：超过 70% 后封顶
        max_score += COVERAGE_WEIGHT;
        let total_questions = document.test_info.total_questions;
        if total_questions > 0 && self.expected_total_questions > 0 {
            let accuracy = (total_questions as f64 / self.expected_total_questions as f64)
                .min(COVERAGE_CREDIT_CEILING);
            score += accuracy * COVERAGE_WEIGHT;
        }

        // 3. 文本质量：抽检题干中的指令污染比例
        max_score += QUALITY_WEIGHT;
        let (checked, issues) = count_contamination(document);
        if checked > 0 {
            score += (1.0 - issues as f64 / checked as f64) * QUALITY_WEIGHT;
        } else {
            score += QUALITY_WEIGHT;
        }

        // 4. 选项携带率：没有任何需要选项的题目时整项跳过（不计入总分）
        let (with_options, option_possible) = count_option_presence(document);
        if option_possible > 0 {
            max_score += OPTION_WEIGHT;
            score += (with_options as f64 / option_possible as f64 * OPTION_WEIGHT)
                .min(OPTION_WEIGHT);
        }

        // 5. 题型多样性：内部上限低于满分，题型识别本身并不完美
        max_score += VARIETY_WEIGHT;
        let variety = count_type_variety(document);
        if variety > 0 {
            score += (variety as f64 / EXPECTED_TYPE_VARIETY * VARIETY_WEIGHT).min(VARIETY_CAP);
        }

        (score / max_score).clamp(0.0, 1.0)
    }
}

/// 统计 (抽检题数, 污染题数)
fn count_contamination(document: &TestDocument) -> (usize, usize) {
    let mut checked = 0;
    let mut issues = 0;
    for section in &document.sections {
        match section {
            Section::Reading { passages, .. } => {
                for q in passages.iter().flat_map(|p| &p.questions) {
                    checked += 1;
                    let lower = q.text.to_lowercase();
                    if READING_CONTAMINATION.iter().any(|m| lower.contains(m)) {
                        issues += 1;
                    }
                }
            }
            Section::Listening { parts, .. } => {
                for q in parts.iter().flat_map(|p| &p.questions) {
                    checked += 1;
                    let lower = q.text.to_lowercase();
                    // 真实问句里允许出现指令词
                    if LISTENING_CONTAMINATION.iter().any(|m| lower.contains(m))
                        && !lower.contains("how")
                        && !lower.contains("what")
                    {
                        issues += 1;
                    }
                }
            }
            _ => {}
        }
    }
    (checked, issues)
}

/// 统计 (带选项题数, 应带选项题数)
fn count_option_presence(document: &TestDocument) -> (usize, usize) {
    let mut with_options = 0;
    let mut possible = 0;
    let mut tally = |q: &Question, requires: bool| {
        if requires {
            possible += 1;
            if q.has_options() {
                with_options += 1;
            }
        }
    };
    for section in &document.sections {
        match section {
            Section::Reading { passages, .. } => {
                for q in passages.iter().flat_map(|p| &p.questions) {
                    tally(q, q.question_type.requires_options());
                }
            }
            Section::Listening { parts, .. } => {
                for q in parts.iter().flat_map(|p| &p.questions) {
                    tally(
                        q,
                        matches!(
                            q.question_type,
                            QuestionType::MultipleChoice | QuestionType::Matching
                        ),
                    );
                }
            }
            _ => {}
        }
    }
    (with_options, possible)
}

/// 统计听力与阅读题目中出现的不同题型数
fn count_type_variety(document: &TestDocument) -> usize {
    let mut types: HashSet<QuestionType> = HashSet::new();
    for section in &document.sections {
        match section {
            Section::Reading { passages, .. } => {
                types.extend(passages.iter().flat_map(|p| &p.questions).map(|q| q.question_type));
            }
            Section::Listening { parts, .. } => {
                types.extend(parts.iter().flat_map(|p| &p.questions).map(|q| q.question_type));
            }
            _ => {}
        }
    }
    types.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metadata, Part, Passage, TestInfo, TestVariant};

    fn document_with(sections: Vec<Section>, total_questions: usize) -> TestDocument {
        TestDocument {
            metadata: Metadata {
                source: "test".to_string(),
                extraction_method: "test".to_string(),
                total_pages: 1,
            },
            test_info: TestInfo {
                title: "IELTS Test".to_string(),
                test_type: TestVariant::Academic,
                num_sections: sections.len(),
                total_questions,
            },
            sections,
        }
    }

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::new(&Config::default())
    }

    fn gap_fill(id: u32, text: &str) -> Question {
        Question::new(id, text, QuestionType::GapFill)
    }

    #[test]
    fn test_score_is_bounded() {
        let empty = document_with(Vec::new(), 0);
        let c = scorer().score(&empty);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn test_full_document_beats_empty_document() {
        let s = scorer();
        let empty = document_with(Vec::new(), 0);

        let parts: Vec<Part> = (1..=4)
            .map(|n| {
                let questions: Vec<Question> = (1..=10)
                    .map(|i| gap_fill((n - 1) * 10 + i, "The speaker mentions a number"))
                    .collect();
                Part {
                    part_number: n,
                    title: format!("Part {}", n),
                    total_questions: questions.len(),
                    questions,
                    description: String::new(),
                }
            })
            .collect();
        let passages = vec![Passage {
            passage_number: 1,
            title: "Passage".to_string(),
            content: "content".to_string(),
            questions: (1..=10).map(|i| gap_fill(i, "The bridge opened in ......")).collect(),
            total_questions: 10,
        }];
        let full = document_with(
            vec![
                Section::Listening {
                    section_number: 1,
                    title: "Listening".to_string(),
                    num_parts: 4,
                    parts,
                    total_questions: 40,
                },
                Section::Reading {
                    section_number: 2,
                    title: "Reading".to_string(),
                    num_passages: 1,
                    passages,
                    total_questions: 10,
                },
                Section::Writing {
                    section_number: 4,
                    title: "Writing".to_string(),
                    num_tasks: 0,
                    tasks: Vec::new(),
                    total_questions: 0,
                },
            ],
            50,
        );

        assert!(s.score(&full) > s.score(&empty));
    }

    #[test]
    fn test_contaminated_text_lowers_score() {
        let s = scorer();
        let clean_questions: Vec<Question> =
            (1..=10).map(|i| gap_fill(i, "The bridge opened in ......")).collect();
        let dirty_questions: Vec<Question> = (1..=10)
            .map(|i| gap_fill(i, "You should spend about 20 minutes on this"))
            .collect();

        let make = |questions: Vec<Question>| {
            document_with(
                vec![Section::Reading {
                    section_number: 2,
                    title: "Reading".to_string(),
                    num_passages: 1,
                    passages: vec![Passage {
                        passage_number: 1,
                        title: "P".to_string(),
                        content: String::new(),
                        total_questions: questions.len(),
                        questions,
                    }],
                    total_questions: 10,
                }],
                10,
            )
        };

        assert!(s.score(&make(clean_questions)) > s.score(&make(dirty_questions)));
    }

    #[test]
    fn test_option_component_skipped_without_option_questions() {
        // 只有填空题时，选项分量既不加分也不扩大总分
        let s = scorer();
        let questions: Vec<Question> =
            (1..=5).map(|i| gap_fill(i, "The value is ......")).collect();
        let doc = document_with(
            vec![Section::Reading {
                section_number: 2,
                title: "Reading".to_string(),
                num_passages: 1,
                passages: vec![Passage {
                    passage_number: 1,
                    title: "P".to_string(),
                    content: String::new(),
                    total_questions: questions.len(),
                    questions,
                }],
                total_questions: 5,
            }],
            5,
        );
        let c = s.score(&doc);
        assert!((0.0..=1.0).contains(&c));
        // 无选项题时不应因缺选项受罚：分数高于把选项分量按 0 计入总分的情形
        assert!(c > 0.25);
    }
}
