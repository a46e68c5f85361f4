//! 口语部分检测流程
//!
//! 口语内容不做细粒度提取，只标记该部分是否出现在语料中。

use crate::error::AppResult;
use crate::models::Section;
use crate::services::{SectionKind, SectionLocator};

/// 口语部分检测流程
pub struct SpeakingFlow {
    locator: SectionLocator,
}

impl SpeakingFlow {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            locator: SectionLocator::new()?,
        })
    }

    /// 检测口语部分
    pub fn run(&self, text: &str) -> Option<Section> {
        self.locator
            .locate(text, SectionKind::Speaking)
            .map(|_| Section::Speaking {
                section_number: 3,
                title: "Speaking".to_string(),
                detected: true,
            })
    }
}
