use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Command line surface. Every flag is optional; unset flags fall back to the
/// TOML file and then to the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cv-screen")]
#[command(about = "Screens candidate CVs against a job description with a generative model")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Job description text file
    #[arg(long)]
    pub jd: Option<String>,

    /// Candidate CV text files, in candidate order
    #[arg(long = "cv", value_delimiter = ',')]
    pub cvs: Vec<String>,

    /// Directory that receives the reports
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Prompt template file; the built-in template is used when it is absent
    #[arg(long)]
    pub prompt: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Total attempts per model call (1 disables retries)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Resolve inputs and the template without calling the model or writing files
    #[arg(long)]
    pub dry_run: bool,
}
