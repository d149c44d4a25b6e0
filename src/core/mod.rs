pub mod assessor;
pub mod engine;
pub mod prompt;

pub use crate::domain::model::{Assessment, BatchReport, CandidateOutcome, Verdict};
pub use crate::domain::ports::{ConfigProvider, GenerativeModel, Storage};
pub use crate::utils::error::Result;
