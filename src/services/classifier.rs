//! 题型判定服务

use regex::Regex;

use crate::error::AppResult;
use crate::models::QuestionType;
use crate::services::compile;

/// 一条判定规则：任一模式命中即判为该题型
struct Rule {
    label: QuestionType,
    patterns: Vec<Regex>,
}

/// 题型判定服务
///
/// 规则保存为按优先级排列的显式序列，对小写化题干逐条求值，
/// 第一条命中的规则胜出；全部未命中时返回 `open_question`。
/// 听力使用一套缩减的规则（只判 选择/配对/填空）。
pub struct TypeClassifier {
    reading_rules: Vec<Rule>,
    listening_rules: Vec<Rule>,
}

impl TypeClassifier {
    pub fn new() -> AppResult<Self> {
        let reading_rules = vec![
            // TRUE/FALSE/NOT GIVEN 优先级最高
            Rule {
                label: QuestionType::TrueFalseNg,
                patterns: vec![
                    compile(r"(?s)\btrue\b.*\bfalse\b.*\bnot\s+given\b")?,
                    compile(r"true\s*(?:/|or)\s*false\s*(?:/|or)\s*not\s*given")?,
                ],
            },
            Rule {
                label: QuestionType::Matching,
                patterns: vec![
                    compile(r"\bmatch")?,
                    compile(r"roman numerals")?,
                    compile(r"\b[ivx]{2,}\b")?,
                    compile(r"(?:^|\s)[a-h]\s+(?:has|was|provides|shows)\b")?,
                ],
            },
            Rule {
                label: QuestionType::MultipleChoice,
                patterns: vec![
                    compile(r"(?:^|\s)\(?[a-d]\s*[).]\s")?,
                    compile(r"(?:choose|select|which|what)\b.{0,50}\s[a-d]\s*[).]")?,
                ],
            },
            Rule {
                label: QuestionType::HeadingMatching,
                patterns: vec![compile(r"heading")?, compile(r"correspond")?],
            },
            Rule {
                label: QuestionType::GapFill,
                patterns: vec![
                    compile(r"complete.{0,80}sentence")?,
                    compile(r"fill.{0,80}blank")?,
                    compile(r"\bgap\b")?,
                    compile(r"\bblank\b")?,
                    compile(r"incomplete")?,
                    compile(r"\.{3,}")?,
                    compile(r"…")?,
                ],
            },
            Rule {
                label: QuestionType::SummaryCompletion,
                patterns: vec![
                    compile(r"complet.{0,20}summar")?,
                    compile(r"complet.{0,20}notes")?,
                    compile(r"note.{0,30}form")?,
                    compile(r"form.{0,30}blank")?,
                ],
            },
            Rule {
                label: QuestionType::ShortAnswer,
                patterns: vec![
                    compile(r"answer.{0,40}question")?,
                    compile(r"short answer")?,
                    compile(r"answer.{0,30}word")?,
                ],
            },
        ];

        let listening_rules = vec![
            Rule {
                label: QuestionType::MultipleChoice,
                patterns: vec![
                    compile(r"(?:^|\s)\(?[a-d]\s*[).]\s")?,
                    compile(r"(?:which|what|who|choose)\b.{0,50}\s[a-d]\s*[).]")?,
                ],
            },
            Rule {
                label: QuestionType::Matching,
                patterns: vec![compile(r"\bmatch")?],
            },
            Rule {
                label: QuestionType::GapFill,
                patterns: vec![
                    compile(r"…")?,
                    compile(r"\.{2,}")?,
                    compile(r"\bblank\b")?,
                    compile(r"\bfill\b")?,
                    compile(r"\bgap\b")?,
                    compile(r"\bcomplete\b")?,
                ],
            },
        ];

        Ok(Self {
            reading_rules,
            listening_rules,
        })
    }

    /// 判定阅读题型
    pub fn classify_reading(&self, text: &str) -> QuestionType {
        Self::first_match(&self.reading_rules, text)
    }

    /// 判定听力题型
    pub fn classify_listening(&self, text: &str) -> QuestionType {
        Self::first_match(&self.listening_rules, text)
    }

    fn first_match(rules: &[Rule], text: &str) -> QuestionType {
        let lower = text.to_lowercase();
        rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.is_match(&lower)))
            .map(|rule| rule.label)
            .unwrap_or(QuestionType::OpenQuestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TypeClassifier {
        TypeClassifier::new().expect("创建 TypeClassifier 失败")
    }

    #[test]
    fn test_true_false_ng_beats_matching() {
        let c = classifier();
        let text = "Match the statements below. Write TRUE, FALSE or NOT GIVEN.";
        assert_eq!(c.classify_reading(text), QuestionType::TrueFalseNg);
    }

    #[test]
    fn test_matching_detected() {
        let c = classifier();
        assert_eq!(
            c.classify_reading("Match each statement with the correct person"),
            QuestionType::Matching
        );
    }

    #[test]
    fn test_multiple_choice_from_lettered_options() {
        let c = classifier();
        assert_eq!(
            c.classify_reading("Which statement is correct? A) first B) second C) third"),
            QuestionType::MultipleChoice
        );
    }

    #[test]
    fn test_gap_fill_from_ellipsis_run() {
        let c = classifier();
        assert_eq!(c.classify_reading("The bridge was built in ......."), QuestionType::GapFill);
        assert_eq!(c.classify_reading("Opening hours: 9 to ……"), QuestionType::GapFill);
    }

    #[test]
    fn test_summary_completion() {
        let c = classifier();
        assert_eq!(
            c.classify_reading("Complete the summary below using the list of words"),
            QuestionType::SummaryCompletion
        );
    }

    #[test]
    fn test_default_is_open_question() {
        let c = classifier();
        assert_eq!(
            c.classify_reading("The author mentions several experiments"),
            QuestionType::OpenQuestion
        );
    }

    #[test]
    fn test_listening_reduced_taxonomy() {
        let c = classifier();
        assert_eq!(
            c.classify_listening("What is the venue? A) Hall B) Park C) Gym"),
            QuestionType::MultipleChoice
        );
        assert_eq!(c.classify_listening("£……"), QuestionType::GapFill);
        assert_eq!(
            c.classify_listening("Tell us about the speaker"),
            QuestionType::OpenQuestion
        );
    }
}
