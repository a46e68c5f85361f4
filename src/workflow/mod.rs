pub mod listening;
pub mod questions;
pub mod reading;
pub mod speaking;
pub mod writing;

pub use listening::ListeningFlow;
pub use reading::ReadingFlow;
pub use speaking::SpeakingFlow;
pub use writing::WritingFlow;
