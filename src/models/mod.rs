pub mod corpus;
pub mod document;
pub mod loaders;
pub mod question;

pub use corpus::{PageText, TextCorpus};
pub use document::{
    ConvertOutput, Metadata, Part, Passage, Section, Task, TestDocument, TestInfo, TestVariant,
    WritingTaskKind,
};
pub use loaders::{load_all_json_files, load_json_to_corpus};
pub use question::{Question, QuestionOption, QuestionType};
