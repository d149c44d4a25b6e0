pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

pub use crate::adapters::{GeminiClient, LocalStorage};
pub use crate::config::{cli::CliArgs, AppConfig};
pub use crate::core::{assessor::Assessor, engine::ScreeningEngine, prompt::PromptTemplate};
pub use crate::domain::model::{Assessment, BatchReport, CandidateOutcome, CandidateStatus, Verdict};
pub use crate::utils::error::{Result, ScreenError};
