use crate::domain::ports::Storage;
use crate::utils::error::{Result, ScreenError};
use tracing::{debug, info};

// Built-in template, used when no template file exists. The pieces are plain
// text around the two placeholders, so braces here are literal.
const BUILTIN_HEAD: &str = "Analizē šo darba aprakstu (JD) un kandidāta CV, lai noteiktu atbilstību.

DARBA APRAKSTS:
";

const BUILTIN_MIDDLE: &str = "

KANDIDĀTA CV:
";

const BUILTIN_TAIL: &str = r#"

Atbildi TIKAI ar vienu JSON objektu latviešu valodā, kas precīzi atbilst šai shēmai:

{
  "match_score": 0-100,
  "summary": "Īss apraksts, cik labi CV atbilst JD.",
  "strengths": [
    "Galvenās prasmes/pieredze no CV, kas atbilst JD"
  ],
  "missing_requirements": [
    "Svarīgas JD prasības, kas CV nav redzamas"
  ],
  "verdict": "strong match | possible match | not a match"
}

Laukam "verdict" izmanto tieši vienu no vērtībām: "strong match", "possible match", "not a match".
Esi precīzs un objektīvs. Fokusējies uz konkrētām prasmēm, pieredzi un kvalifikācijām."#;

const JD_PLACEHOLDER: &str = "jd_text";
const CV_PLACEHOLDER: &str = "cv_text";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    JobDescription,
    Cv,
}

/// A prompt template checked once at load time.
///
/// `{jd_text}` and `{cv_text}` are substituted; `{{` and `}}` produce literal
/// braces. Any other brace usage is rejected when the template is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    source: TemplateSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(String),
    BuiltIn,
}

impl PromptTemplate {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            segments: parse_segments(text)?,
            source: TemplateSource::BuiltIn,
        })
    }

    pub fn builtin() -> Self {
        Self {
            segments: vec![
                Segment::Literal(BUILTIN_HEAD.to_string()),
                Segment::JobDescription,
                Segment::Literal(BUILTIN_MIDDLE.to_string()),
                Segment::Cv,
                Segment::Literal(BUILTIN_TAIL.to_string()),
            ],
            source: TemplateSource::BuiltIn,
        }
    }

    /// Reads `path` through storage, falling back to the built-in template
    /// when the file does not exist. A present but broken file is an error.
    pub async fn resolve<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        match storage.read_file(path).await {
            Ok(bytes) => {
                let text = String::from_utf8(bytes).map_err(|_| ScreenError::EncodingError {
                    path: path.to_string(),
                })?;
                let mut template = Self::parse(&text)?;
                template.source = TemplateSource::File(path.to_string());
                info!("✓ Prompt template loaded from {}", path);
                Ok(template)
            }
            Err(ScreenError::InputNotFound { .. }) => {
                debug!("No template at {}, using built-in template", path);
                info!("✓ Built-in prompt template loaded");
                Ok(Self::builtin())
            }
            Err(e) => Err(e),
        }
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn render(&self, jd_text: &str, cv_text: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::JobDescription => out.push_str(jd_text),
                Segment::Cv => out.push_str(cv_text),
            }
        }
        out
    }
}

fn parse_segments(text: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(ScreenError::TemplateError {
                                reason: format!("unterminated placeholder '{{{}'", name),
                            })
                        }
                        Some(ch) => name.push(ch),
                    }
                }
                let segment = match name.as_str() {
                    JD_PLACEHOLDER => Segment::JobDescription,
                    CV_PLACEHOLDER => Segment::Cv,
                    other => {
                        return Err(ScreenError::TemplateError {
                            reason: format!(
                                "unknown placeholder '{{{}}}', expected {{{}}} or {{{}}}",
                                other, JD_PLACEHOLDER, CV_PLACEHOLDER
                            ),
                        })
                    }
                };
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            '}' => {
                return Err(ScreenError::TemplateError {
                    reason: "single '}' outside a placeholder; write '}}' for a literal brace"
                        .to_string(),
                })
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
