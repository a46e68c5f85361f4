use ielts_pdf_convert::{
    Config, Converter, QuestionType, Section, TestVariant, TextCorpus,
};

fn converter() -> Converter {
    Converter::new(&Config::default()).expect("创建 Converter 失败")
}

/// 听力综合场景：四个 Part 各自使用不同的提取策略
#[test]
fn test_listening_scenario() {
    let corpus = TextCorpus::from_text(
        "listening_scenario",
        "PART 1\n1 £……\n2 ……\nPART 2\n11 What is the venue?\nA) Hall\nB) Park\nC) Gym\nPART 3\nPART 4\n31 ……. date",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");

    let sections = &output.document.sections;
    assert_eq!(sections.len(), 1, "只应产出听力部分");

    let Section::Listening { parts, .. } = &sections[0] else {
        panic!("应该是听力部分");
    };
    assert_eq!(parts.len(), 4, "四个 Part 都应保留");

    // Part 1: 数据表填空，题号 1-2
    let part1 = &parts[0];
    assert_eq!(part1.part_number, 1);
    let ids: Vec<u32> = part1.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 2]);
    for q in &part1.questions {
        assert_eq!(q.question_type, QuestionType::GapFill);
        assert_eq!(q.max_words, Some(2));
    }

    // Part 2: 选择题，带三个选项
    let part2 = &parts[1];
    assert_eq!(part2.questions.len(), 1);
    let q11 = &part2.questions[0];
    assert_eq!(q11.id, 11);
    assert_eq!(q11.question_type, QuestionType::MultipleChoice);
    let options = q11.options.as_ref().expect("选择题应带选项");
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].text, "Hall");

    // Part 3: 没有题目但保留了说明
    let part3 = &parts[2];
    assert_eq!(part3.part_number, 3);
    assert!(part3.questions.is_empty());

    // Part 4: 笔记填空
    let part4 = &parts[3];
    assert_eq!(part4.questions.len(), 1);
    assert_eq!(part4.questions[0].id, 31);
    assert_eq!(part4.questions[0].question_type, QuestionType::GapFill);
    assert_eq!(part4.questions[0].max_words, Some(1));
}

/// 没有任何可识别标题的语料：空部分列表、零题目、低置信度
#[test]
fn test_no_recognizable_headers() {
    let corpus = TextCorpus::from_text(
        "no_headers",
        "plain narrative text with no recognisable exam structure at all",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");

    assert!(output.document.sections.is_empty());
    assert_eq!(output.document.test_info.total_questions, 0);
    assert_eq!(output.document.test_info.num_sections, 0);
    assert!(output.confidence >= 0.0);
    assert!(output.confidence < 0.3, "无结构语料的置信度应靠近下限");
}

/// 空语料是唯一的整体失败
#[test]
fn test_empty_corpus_is_fatal() {
    let c = converter();
    assert!(c.convert(&TextCorpus::new("empty", Vec::new())).is_err());
    assert!(c.convert(&TextCorpus::from_text("blank", "   \n  ")).is_err());
}

/// 幂等性：同一语料转换两次，结构和置信度逐位一致
#[test]
fn test_conversion_is_idempotent() {
    let corpus = TextCorpus::from_text(
        "idempotent",
        "PART 1\n1 £……\n2 ……\nPART 2\n11 What is the venue?\nA) Hall\nB) Park\nC) Gym",
    );
    let c = converter();
    let first = c.convert(&corpus).expect("第一次转换应该成功");
    let second = c.convert(&corpus).expect("第二次转换应该成功");

    let first_json = serde_json::to_string(&first.document).expect("序列化失败");
    let second_json = serde_json::to_string(&second.document).expect("序列化失败");
    assert_eq!(first_json, second_json);
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
}

/// 阅读题号区间约束 + 主策略对兜底策略的去重优先级
#[test]
fn test_reading_range_and_dedup_precedence() {
    let corpus = TextCorpus::from_text(
        "reading_dedup",
        "Tunnelling under the Thames\n\
         A remarkable tunnel was dug beneath the river long ago.\n\
         Questions 1\n\
         1) The tunnel opened during the nineteenth century period\n\
         2) Primary text about the tunnel construction\n\
         3) Decide whether the claims are TRUE, FALSE or NOT GIVEN\n\
         14) This statement belongs to the second passage\n\
         2 .....",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");

    let Section::Reading { passages, .. } = &output.document.sections[0] else {
        panic!("应该是阅读部分");
    };
    assert_eq!(passages.len(), 1);
    let passage = &passages[0];

    // 题号都在第一篇文章的区间 [1,13] 内，升序且无重复
    let ids: Vec<u32> = passage.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(ids.iter().all(|&id| (1..=13).contains(&id)));

    // 题号 2 同时被主策略与嵌入式兜底命中：保留主策略结果
    let q2 = passage
        .questions
        .iter()
        .find(|q| q.id == 2)
        .expect("应存在题号 2");
    assert_eq!(q2.text, "Primary text about the tunnel construction");
    assert_ne!(q2.question_type, QuestionType::FillBlank);

    // TRUE/FALSE/NOT GIVEN 判定与固定三项选项
    let q3 = passage
        .questions
        .iter()
        .find(|q| q.id == 3)
        .expect("应存在题号 3");
    assert_eq!(q3.question_type, QuestionType::TrueFalseNg);
    let options = q3.options.as_ref().expect("判断题应带固定选项");
    assert_eq!(options.len(), 3);
    assert_eq!(options[2].text, "NOT GIVEN");

    // 文章正文在「Questions」标记处截断
    assert!(passage.content.contains("remarkable tunnel"));
    assert!(!passage.content.contains("Primary text"));
}

/// 同一题号多处出现时优先取语料中位置最靠后的候选
#[test]
fn test_prefers_latest_candidate() {
    let corpus = TextCorpus::from_text(
        "latest_candidate",
        "Tunnelling under the Thames\n\
         7. Echo of the question beside the passage title\n\
         The body of the passage continues here with details.\n\
         Questions 1\n\
         7. The genuine prompt listed in the questions block",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");

    let Section::Reading { passages, .. } = &output.document.sections[0] else {
        panic!("应该是阅读部分");
    };
    let q7 = passages[0]
        .questions
        .iter()
        .find(|q| q.id == 7)
        .expect("应存在题号 7");
    assert_eq!(q7.text, "The genuine prompt listed in the questions block");
}

/// 写作任务：每个任务一道合成题目，任务类型按描述判定
#[test]
fn test_writing_tasks() {
    let corpus = TextCorpus::from_text(
        "writing_tasks",
        "WRITING TASK 1\n\
         The chart below shows household recycling rates in three countries.\n\
         Summarise the information by selecting and reporting the main features.\n\
         WRITING TASK 2\n\
         Some people believe working from home benefits everyone.\n\
         Do you agree or disagree? Give reasons from your own experience.",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");

    let Section::Writing { tasks, .. } = output
        .document
        .sections
        .iter()
        .find(|s| matches!(s, Section::Writing { .. }))
        .expect("应存在写作部分")
    else {
        unreachable!();
    };

    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].description.contains("recycling rates"));
    assert_eq!(tasks[0].questions.len(), 1);
    assert_eq!(tasks[0].questions[0].id, 1);
    assert_eq!(tasks[0].questions[0].question_type, QuestionType::WritingTask);
    assert_eq!(tasks[0].questions[0].text, "Complete Writing Task 1");
    assert_eq!(tasks[1].questions[0].text, "Complete Writing Task 2");
}

/// 口语部分只做检测标记
#[test]
fn test_speaking_detection() {
    let corpus = TextCorpus::from_text(
        "speaking",
        "SPEAKING\nThe examiner will ask about familiar topics.",
    );
    let output = converter().convert(&corpus).expect("转换应该成功");
    assert!(output
        .document
        .sections
        .iter()
        .any(|s| matches!(s, Section::Speaking { detected: true, .. })));
}

/// 完整语料的置信度严格高于空结构语料
#[test]
fn test_confidence_ordering() {
    let c = converter();

    let empty = TextCorpus::from_text(
        "low",
        "plain narrative text with no recognisable exam structure at all",
    );
    let low = c.convert(&empty).expect("转换应该成功");

    let full = TextCorpus::from_text("high", full_test_text());
    let high = c.convert(&full).expect("转换应该成功");

    assert!(high.document.test_info.total_questions >= 35);
    assert!(high.confidence > low.confidence, "完整文档应得到更高置信度");
    assert!(high.confidence <= 1.0);
    assert!(low.confidence >= 0.0);

    // 标题与试卷变体来自语料内容
    assert_eq!(high.document.test_info.test_type, TestVariant::Academic);
    assert!(high.document.test_info.title.contains("IELTS"));

    // 每个子单元内题号唯一且升序
    for section in &high.document.sections {
        match section {
            Section::Listening { parts, .. } => {
                for part in parts {
                    assert_sorted_unique(&part.questions.iter().map(|q| q.id).collect::<Vec<_>>());
                }
            }
            Section::Reading { passages, .. } => {
                for passage in passages {
                    assert_sorted_unique(
                        &passage.questions.iter().map(|q| q.id).collect::<Vec<_>>(),
                    );
                }
            }
            _ => {}
        }
    }
}

fn assert_sorted_unique(ids: &[u32]) {
    for window in ids.windows(2) {
        assert!(window[0] < window[1], "题号应唯一且升序: {:?}", ids);
    }
}

/// 组装一份带听力 1-40、阅读 1-13、写作两任务的完整语料
fn full_test_text() -> String {
    let mut text = String::from("IELTS Academic Practice Test Cambridge\n\n");

    text.push_str("PART 1\nHotel booking form\n");
    text.push_str("1 £……\n");
    for id in 2..=10 {
        text.push_str(&format!("{} ……\n", id));
    }

    text.push_str("\nPART 2\n");
    for id in 11..=20 {
        text.push_str(&format!("{} Where does the group meet on day {}?\n", id, id));
    }

    text.push_str("\nPART 3\n");
    for id in 21..=30 {
        text.push_str(&format!("{} The students then visit location {}\n", id, id));
    }

    text.push_str("\nPART 4\n");
    for id in 31..=40 {
        text.push_str(&format!("{} …………… museum exhibit number {}\n", id, id));
    }

    text.push_str("\nTunnelling under the Thames\n");
    text.push_str("The first tunnel under the river was a remarkable feat of engineering.\n");
    text.push_str("Questions 1\n");
    for id in 1..=13 {
        text.push_str(&format!(
            "{}) The tunnel statement number {} describes an engineering detail\n",
            id, id
        ));
    }

    text.push_str("\nWRITING TASK 1\n");
    text.push_str("The chart below shows annual rainfall figures for two cities.\n");
    text.push_str("WRITING TASK 2\n");
    text.push_str("Discuss both views and give your opinion on city living.\n");

    text
}
