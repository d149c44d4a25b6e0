use crate::core::prompt::PromptTemplate;
use crate::domain::model::Assessment;
use crate::domain::ports::{GenerationRequest, GenerativeModel};
use crate::utils::error::Result;
use tracing::debug;

/// Turns a (JD, CV) pair into an [`Assessment`] with one model call.
pub struct Assessor<M: GenerativeModel> {
    model: M,
    template: PromptTemplate,
    temperature: f32,
    json_mode: bool,
}

impl<M: GenerativeModel> Assessor<M> {
    pub fn new(model: M, template: PromptTemplate, temperature: f32, json_mode: bool) -> Self {
        Self {
            model,
            template,
            temperature,
            json_mode,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn assess(&self, jd_text: &str, cv_text: &str) -> Result<Assessment> {
        let request = GenerationRequest {
            prompt: self.template.render(jd_text, cv_text),
            temperature: self.temperature,
            json_mode: self.json_mode,
        };
        debug!("Prompt is {} characters", request.prompt.chars().count());

        let raw = self.model.generate(&request).await?;
        debug!("Model returned {} characters", raw.chars().count());

        let assessment = Assessment::from_json_str(strip_json_fences(&raw))?;
        Ok(assessment)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
