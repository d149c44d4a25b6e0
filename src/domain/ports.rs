use crate::utils::error::{ModelError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// What the screening engine needs to know about a run.
pub trait ConfigProvider: Send + Sync {
    fn jd_path(&self) -> &str;
    fn cv_paths(&self) -> &[String];
    fn output_dir(&self) -> &str;
    fn write_summary(&self) -> bool;
}

/// A single prompt submission to a generative model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub json_mode: bool,
}

/// The boundary to the remote model. Returns the raw text of the reply.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> std::result::Result<String, ModelError>;

    fn model_name(&self) -> &str;
}
