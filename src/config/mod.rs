pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScreenError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use cli::CliArgs;
use toml_config::{has_unexpanded_var, TomlConfig};
use tracing::warn;

pub const DEFAULT_JD_PATH: &str = "sample_inputs/jd.txt";
pub const DEFAULT_PROMPT_PATH: &str = "prompt.md";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_CANDIDATE_COUNT: usize = 3;
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct InputsConfig {
    pub jd: String,
    pub cvs: Vec<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub dir: String,
    pub write_summary: bool,
}

#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub json_mode: bool,
    pub timeout_seconds: u64,
}

// Keep the key out of debug logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("temperature", &self.temperature)
            .field("json_mode", &self.json_mode)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Bounded retry policy for model calls. `max_attempts` counts the first try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 1000,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub model: ModelConfig,
    pub retry: RetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inputs: InputsConfig {
                jd: DEFAULT_JD_PATH.to_string(),
                cvs: default_cv_paths(DEFAULT_CANDIDATE_COUNT),
                prompt: DEFAULT_PROMPT_PATH.to_string(),
            },
            output: OutputConfig {
                dir: DEFAULT_OUTPUT_DIR.to_string(),
                write_summary: true,
            },
            model: ModelConfig {
                name: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                temperature: DEFAULT_TEMPERATURE,
                json_mode: true,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            retry: RetryConfig::default(),
        }
    }
}

/// `sample_inputs/cv1.txt` .. `sample_inputs/cv{count}.txt`
pub fn default_cv_paths(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("sample_inputs/cv{}.txt", i))
        .collect()
}

impl AppConfig {
    /// Layers CLI flags over the optional TOML file over the defaults, then
    /// fills the API key from the environment if neither layer set one.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let mut config = Self::default().with_toml(file).with_cli(args);
        if config.model.api_key.is_none() {
            config.model.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
        Ok(config)
    }

    pub fn with_toml(mut self, file: TomlConfig) -> Self {
        if let Some(inputs) = file.inputs {
            if let Some(jd) = inputs.jd {
                self.inputs.jd = jd;
            }
            if let Some(cvs) = inputs.cvs {
                self.inputs.cvs = cvs;
            }
            if let Some(prompt) = inputs.prompt {
                self.inputs.prompt = prompt;
            }
        }
        if let Some(output) = file.output {
            if let Some(dir) = output.dir {
                self.output.dir = dir;
            }
            if let Some(write_summary) = output.write_summary {
                self.output.write_summary = write_summary;
            }
        }
        if let Some(model) = file.model {
            if let Some(name) = model.name {
                self.model.name = name;
            }
            if let Some(base_url) = model.base_url {
                self.model.base_url = base_url;
            }
            match model.api_key {
                Some(key) if has_unexpanded_var(&key) => {
                    // unset variable: leave the key to the environment fallback
                    warn!("model.api_key '{}' references an unset variable, ignoring it", key);
                }
                Some(key) => self.model.api_key = Some(key),
                None => {}
            }
            if let Some(temperature) = model.temperature {
                self.model.temperature = temperature;
            }
            if let Some(json_mode) = model.json_mode {
                self.model.json_mode = json_mode;
            }
            if let Some(timeout) = model.timeout_seconds {
                self.model.timeout_seconds = timeout;
            }
        }
        if let Some(retry) = file.retry {
            if let Some(max_attempts) = retry.max_attempts {
                self.retry.max_attempts = max_attempts;
            }
            if let Some(delay) = retry.base_delay_ms {
                self.retry.base_delay_ms = delay;
            }
        }
        self
    }

    pub fn with_cli(mut self, args: &CliArgs) -> Self {
        if let Some(jd) = &args.jd {
            self.inputs.jd = jd.clone();
        }
        if !args.cvs.is_empty() {
            self.inputs.cvs = args.cvs.clone();
        }
        if let Some(prompt) = &args.prompt {
            self.inputs.prompt = prompt.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(model) = &args.model {
            self.model.name = model.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(max_attempts) = args.max_attempts {
            self.retry.max_attempts = max_attempts;
        }
        self
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("inputs.jd", &self.inputs.jd)?;
        validate_path("inputs.prompt", &self.inputs.prompt)?;
        if self.inputs.cvs.is_empty() {
            return Err(ScreenError::MissingConfigError {
                field: "inputs.cvs".to_string(),
            });
        }
        for (i, cv) in self.inputs.cvs.iter().enumerate() {
            validate_path(&format!("inputs.cvs[{}]", i), cv)?;
        }
        validate_path("output.dir", &self.output.dir)?;

        validate_non_empty_string("model.name", &self.model.name)?;
        validate_url("model.base_url", &self.model.base_url)?;
        validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;
        validate_range("model.timeout_seconds", self.model.timeout_seconds, 1, 3600)?;
        validate_range("retry.max_attempts", self.retry.max_attempts, 1, 10)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn jd_path(&self) -> &str {
        &self.inputs.jd
    }

    fn cv_paths(&self) -> &[String] {
        &self.inputs.cvs
    }

    fn output_dir(&self) -> &str {
        &self.output.dir
    }

    fn write_summary(&self) -> bool {
        self.output.write_summary
    }
}
