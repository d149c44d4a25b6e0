use crate::core::assessor::Assessor;
use crate::core::prompt::PromptTemplate;
use crate::domain::model::{
    ArtifactPaths, Assessment, BatchReport, CandidateOutcome, CandidateStatus, FailureKind,
};
use crate::domain::ports::{ConfigProvider, GenerativeModel, Storage};
use crate::report::{render_html, render_markdown};
use crate::utils::error::{Result, ScreenError};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, error, info, warn};

pub const SUMMARY_FILE: &str = "summary.json";

/// Drives one screening run: load the JD once, then take each candidate
/// through `loading → requesting → rendering → writing` in order.
pub struct ScreeningEngine<S: Storage, M: GenerativeModel> {
    storage: S,
    assessor: Assessor<M>,
    jd_path: String,
    cv_paths: Vec<String>,
    output_dir: String,
    write_summary: bool,
}

/// What a dry run found for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunEntry {
    pub index: usize,
    pub cv_path: String,
    pub found: bool,
    pub prompt_chars: Option<usize>,
    /// Why a present CV would fail, e.g. it is not UTF-8.
    pub error: Option<String>,
}

struct Rendered {
    json: String,
    markdown: String,
    html: String,
}

impl<S: Storage, M: GenerativeModel> ScreeningEngine<S, M> {
    pub fn new<C: ConfigProvider>(storage: S, assessor: Assessor<M>, config: &C) -> Self {
        Self {
            storage,
            assessor,
            jd_path: config.jd_path().to_string(),
            cv_paths: config.cv_paths().to_vec(),
            output_dir: config.output_dir().to_string(),
            write_summary: config.write_summary(),
        }
    }

    /// Processes every candidate. Only a missing or unreadable JD is an
    /// error; per-candidate problems are recorded in the returned report.
    pub async fn run(&self) -> Result<BatchReport> {
        let jd_text = load_job_description(&self.storage, &self.jd_path).await?;

        let mut outcomes = Vec::with_capacity(self.cv_paths.len());
        for (i, cv_path) in self.cv_paths.iter().enumerate() {
            outcomes.push(self.process_candidate(i + 1, cv_path, &jd_text).await);
        }

        let report = BatchReport::new(
            self.jd_path.clone(),
            self.assessor.model_name().to_string(),
            outcomes,
        );

        if self.write_summary {
            let summary =
                serde_json::to_vec_pretty(&report).map_err(ScreenError::SerializationError)?;
            let path = self.output_path(SUMMARY_FILE);
            self.storage.write_file(&path, &summary).await?;
            debug!("Run summary written to {}", path);
        }

        info!(
            "✅ All CVs processed: {} done, {} skipped, {} failed. Results are in '{}'",
            report.succeeded, report.skipped, report.failed, self.output_dir
        );
        Ok(report)
    }

    async fn process_candidate(
        &self,
        index: usize,
        cv_path: &str,
        jd_text: &str,
    ) -> CandidateOutcome {
        let started_at = Utc::now();
        info!("📄 Processing CV{} ({})", index, cv_path);

        let status = match self.evaluate(index, cv_path, jd_text).await {
            Ok((assessment, artifacts)) => {
                info!(
                    "  📊 CV{} result: {}/100 - {}",
                    index, assessment.match_score, assessment.verdict
                );
                CandidateStatus::Done {
                    match_score: assessment.match_score,
                    verdict: assessment.verdict,
                    artifacts,
                }
            }
            Err(ScreenError::InputNotFound { path }) => {
                warn!("  ❌ {} not found, skipping CV{}", path, index);
                CandidateStatus::Skipped {
                    reason: format!("{} not found", path),
                }
            }
            Err(e) => {
                error!("  ❌ Error processing CV{}: {}", index, e);
                CandidateStatus::Failed {
                    kind: failure_kind(&e),
                    message: e.to_string(),
                }
            }
        };

        CandidateOutcome {
            index,
            cv_path: cv_path.to_string(),
            status,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn evaluate(
        &self,
        index: usize,
        cv_path: &str,
        jd_text: &str,
    ) -> Result<(Assessment, ArtifactPaths)> {
        // loading
        let cv_text = read_text(&self.storage, cv_path).await?;
        debug!("  ✓ CV{} read ({} bytes)", index, cv_text.len());

        // requesting
        let assessment = self.assessor.assess(jd_text, &cv_text).await?;
        debug!("  ✓ CV{} assessment received", index);

        // rendering: all three bodies exist before the first write
        let rendered = Rendered {
            json: serde_json::to_string_pretty(&assessment)
                .map_err(ScreenError::SerializationError)?,
            markdown: render_markdown(index, &assessment),
            html: render_html(index, &assessment),
        };

        // writing
        let artifacts = ArtifactPaths {
            json: self.output_path(&format!("cv{}.json", index)),
            markdown: self.output_path(&format!("cv{}_report.md", index)),
            html: self.output_path(&format!("cv{}_report.html", index)),
        };
        for (path, body) in [
            (&artifacts.json, &rendered.json),
            (&artifacts.markdown, &rendered.markdown),
            (&artifacts.html, &rendered.html),
        ] {
            self.storage.write_file(path, body.as_bytes()).await?;
            info!("  ✓ Saved: {}", path);
        }

        Ok((assessment, artifacts))
    }

    fn output_path(&self, file_name: &str) -> String {
        Path::new(&self.output_dir)
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

/// Checks inputs and renders prompts without calling the model or writing.
pub async fn dry_run<S: Storage, C: ConfigProvider>(
    storage: &S,
    template: &PromptTemplate,
    config: &C,
) -> Result<Vec<DryRunEntry>> {
    let jd_text = load_job_description(storage, config.jd_path()).await?;

    let mut entries = Vec::with_capacity(config.cv_paths().len());
    for (i, cv_path) in config.cv_paths().iter().enumerate() {
        let mut entry = DryRunEntry {
            index: i + 1,
            cv_path: cv_path.clone(),
            found: true,
            prompt_chars: None,
            error: None,
        };
        match read_text(storage, cv_path).await {
            Ok(cv_text) => {
                let n = template.render(&jd_text, &cv_text).chars().count();
                entry.prompt_chars = Some(n);
                info!(
                    "🔍 CV{} ({}): found, prompt would be {} characters",
                    entry.index, entry.cv_path, n
                );
            }
            Err(ScreenError::InputNotFound { .. }) => {
                entry.found = false;
                info!(
                    "🔍 CV{} ({}): not found, would be skipped",
                    entry.index, entry.cv_path
                );
            }
            Err(e) => {
                warn!("🔍 CV{} ({}): would fail: {}", entry.index, entry.cv_path, e);
                entry.error = Some(e.to_string());
            }
        }
        entries.push(entry);
    }
    Ok(entries)
}

async fn load_job_description<S: Storage>(storage: &S, path: &str) -> Result<String> {
    match read_text(storage, path).await {
        Ok(text) => {
            info!("✓ Job description loaded from {}", path);
            Ok(text)
        }
        Err(e) => {
            error!("❌ Could not load job description {}: {}", path, e);
            Err(e)
        }
    }
}

async fn read_text<S: Storage>(storage: &S, path: &str) -> Result<String> {
    let bytes = storage.read_file(path).await?;
    String::from_utf8(bytes).map_err(|_| ScreenError::EncodingError {
        path: path.to_string(),
    })
}

fn failure_kind(err: &ScreenError) -> FailureKind {
    match err {
        ScreenError::ModelError(_) => FailureKind::Model,
        ScreenError::SchemaError(_) => FailureKind::Schema,
        ScreenError::IoError(_) | ScreenError::EncodingError { .. } => FailureKind::Io,
        _ => FailureKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::model::Verdict;
    use crate::domain::ports::GenerationRequest;
    use crate::utils::error::{ModelError, ScreenError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|b| String::from_utf8_lossy(b).into_owned())
        }

        async fn paths(&self) -> Vec<String> {
            let mut paths: Vec<String> = self.files.lock().await.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| ScreenError::InputNotFound {
                    path: path.to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Replies keyed by a marker found in the prompt, so each CV can get its own answer.
    struct ScriptedModel {
        replies: Vec<(&'static str, std::result::Result<&'static str, u16>)>,
        calls: std::sync::Mutex<usize>,
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> std::result::Result<String, ModelError> {
            *self.calls.lock().unwrap() += 1;
            for (marker, reply) in &self.replies {
                if request.prompt.contains(marker) {
                    return match reply {
                        Ok(text) => Ok(text.to_string()),
                        Err(status) => Err(ModelError::Api {
                            status: *status,
                            message: "unavailable".to_string(),
                        }),
                    };
                }
            }
            Err(ModelError::EmptyContent)
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    const STRONG: &str = r#"{"match_score": 95, "summary": "Izcili.", "strengths": ["Rust"], "missing_requirements": [], "verdict": "strong match"}"#;
    const POSSIBLE: &str = r#"{"match_score": 60, "summary": "Daļēji.", "strengths": ["SQL"], "missing_requirements": ["Rust"], "verdict": "possible match"}"#;

    fn engine(
        storage: MockStorage,
        replies: Vec<(&'static str, std::result::Result<&'static str, u16>)>,
    ) -> ScreeningEngine<MockStorage, ScriptedModel> {
        let model = ScriptedModel {
            replies,
            calls: std::sync::Mutex::new(0),
        };
        let assessor = Assessor::new(model, PromptTemplate::builtin(), 0.3, true);
        ScreeningEngine::new(storage, assessor, &AppConfig::default())
    }

    #[tokio::test]
    async fn test_missing_jd_aborts_without_output() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/cv1.txt", "CV-ONE").await;
        let engine = engine(storage.clone(), vec![("CV-ONE", Ok(STRONG))]);

        let result = engine.run().await;

        assert!(matches!(result, Err(ScreenError::InputNotFound { path }) if path == "sample_inputs/jd.txt"));
        assert_eq!(*engine.assessor_calls(), 0);
        assert_eq!(storage.paths().await, vec!["sample_inputs/cv1.txt"]);
    }

    #[tokio::test]
    async fn test_missing_cv_is_skipped_others_written() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "Backend developer").await;
        storage.put("sample_inputs/cv1.txt", "CV-ONE").await;
        storage.put("sample_inputs/cv3.txt", "CV-THREE").await;
        let engine = engine(
            storage.clone(),
            vec![("CV-ONE", Ok(STRONG)), ("CV-THREE", Ok(POSSIBLE))],
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert!(report.outcomes[1].is_skipped());
        assert_eq!(report.outcomes[1].index, 2);

        let paths = storage.paths().await;
        for expected in [
            "outputs/cv1.json",
            "outputs/cv1_report.md",
            "outputs/cv1_report.html",
            "outputs/cv3.json",
            "outputs/cv3_report.md",
            "outputs/cv3_report.html",
            "outputs/summary.json",
        ] {
            assert!(paths.contains(&expected.to_string()), "missing {}", expected);
        }
        assert!(!paths.iter().any(|p| p.starts_with("outputs/cv2")));
    }

    #[tokio::test]
    async fn test_artifacts_agree_with_each_other() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "JD").await;
        storage.put("sample_inputs/cv1.txt", "CV-THREE").await;
        let engine = engine(storage.clone(), vec![("CV-THREE", Ok(POSSIBLE))]);

        engine.run().await.unwrap();

        let json = storage.get_file("outputs/cv1.json").await.unwrap();
        let parsed = Assessment::from_json_str(&json).unwrap();
        assert_eq!(parsed.match_score, 60);
        assert_eq!(parsed.verdict, Verdict::PossibleMatch);

        let markdown = storage.get_file("outputs/cv1_report.md").await.unwrap();
        assert!(markdown.contains("**Vērtējums:** 60/100"));
        assert!(markdown.contains("- Rust\n"));

        let html = storage.get_file("outputs/cv1_report.html").await.unwrap();
        assert!(html.contains("60/100"));
        assert!(html.contains("<li>Rust</li>"));
    }

    #[tokio::test]
    async fn test_model_and_schema_failures_are_isolated() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "JD").await;
        storage.put("sample_inputs/cv1.txt", "CV-ONE").await;
        storage.put("sample_inputs/cv2.txt", "CV-BROKEN").await;
        storage.put("sample_inputs/cv3.txt", "CV-DOWN").await;
        let engine = engine(
            storage.clone(),
            vec![
                ("CV-ONE", Ok(STRONG)),
                ("CV-BROKEN", Ok(r#"{"match_score": 40}"#)),
                ("CV-DOWN", Err(503)),
            ],
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        match &report.outcomes[1].status {
            CandidateStatus::Failed { kind, message } => {
                assert_eq!(*kind, FailureKind::Schema);
                assert!(message.contains("summary"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        match &report.outcomes[2].status {
            CandidateStatus::Failed { kind, .. } => assert_eq!(*kind, FailureKind::Model),
            other => panic!("expected failure, got {:?}", other),
        }
        let paths = storage.paths().await;
        assert!(!paths.iter().any(|p| p.starts_with("outputs/cv2")));
        assert!(!paths.iter().any(|p| p.starts_with("outputs/cv3")));
    }

    #[tokio::test]
    async fn test_non_utf8_cv_fails_candidate_only() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "JD").await;
        storage
            .files
            .lock()
            .await
            .insert("sample_inputs/cv1.txt".to_string(), vec![0xff, 0xfe, 0x00]);
        let engine = engine(storage.clone(), vec![]);

        let report = engine.run().await.unwrap();
        match &report.outcomes[0].status {
            CandidateStatus::Failed { kind, .. } => assert_eq!(*kind, FailureKind::Io),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "JD").await;
        storage.put("sample_inputs/cv2.txt", "CV-TWO").await;

        let entries = dry_run(&storage, &PromptTemplate::builtin(), &AppConfig::default())
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(!entries[0].found);
        assert!(entries[1].found);
        assert!(entries[1].prompt_chars.unwrap() > "JDCV-TWO".len());
        assert!(entries[2].prompt_chars.is_none());
        assert_eq!(storage.paths().await.len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_records_unreadable_cv_and_continues() {
        let storage = MockStorage::default();
        storage.put("sample_inputs/jd.txt", "JD").await;
        storage
            .files
            .lock()
            .await
            .insert("sample_inputs/cv1.txt".to_string(), vec![0xff, 0xfe]);
        storage.put("sample_inputs/cv2.txt", "CV-TWO").await;

        let entries = dry_run(&storage, &PromptTemplate::builtin(), &AppConfig::default())
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].found);
        assert!(entries[0].prompt_chars.is_none());
        assert!(entries[0].error.as_deref().unwrap().contains("sample_inputs/cv1.txt"));
        assert!(entries[1].prompt_chars.is_some());
        assert!(entries[1].error.is_none());
        assert!(!entries[2].found);
    }

    #[tokio::test]
    async fn test_dry_run_requires_jd() {
        let storage = MockStorage::default();
        let result = dry_run(&storage, &PromptTemplate::builtin(), &AppConfig::default()).await;
        assert!(matches!(result, Err(ScreenError::InputNotFound { .. })));
    }

    impl ScreeningEngine<MockStorage, ScriptedModel> {
        fn assessor_calls(&self) -> std::sync::MutexGuard<'_, usize> {
            self.assessor.model().calls.lock().unwrap()
        }
    }
}
