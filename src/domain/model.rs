use crate::utils::error::SchemaError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Overall fit label returned by the model.
///
/// Only the three exact lowercase labels are recognized. Anything else,
/// including `"Strong Match"`, is kept verbatim in `Other` and rendered with
/// the fallback marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    StrongMatch,
    PossibleMatch,
    NotAMatch,
    Other(String),
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "strong match" => Verdict::StrongMatch,
            "possible match" => Verdict::PossibleMatch,
            "not a match" => Verdict::NotAMatch,
            _ => Verdict::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verdict::StrongMatch => "strong match",
            Verdict::PossibleMatch => "possible match",
            Verdict::NotAMatch => "not a match",
            Verdict::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Verdict::Other(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Verdict::parse(&raw))
    }
}

/// Structured verdict for one (job description, CV) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub match_score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub verdict: Verdict,
}

impl Assessment {
    /// Parses raw model output, reporting the first schema violation found.
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or(SchemaError::NotAnObject)?;

        Ok(Self {
            match_score: parse_score(require(obj, "match_score")?)?,
            summary: parse_string(obj, "summary")?,
            strengths: parse_string_list(obj, "strengths")?,
            missing_requirements: parse_string_list(obj, "missing_requirements")?,
            verdict: Verdict::parse(&parse_string(obj, "verdict")?),
        })
    }
}

fn require<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, SchemaError> {
    match obj.get(field) {
        Some(Value::Null) | None => Err(SchemaError::MissingField {
            field: field.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn parse_score(value: &Value) -> Result<u8, SchemaError> {
    let wrong_type = || SchemaError::WrongType {
        field: "match_score".to_string(),
        expected: "integer",
    };
    let out_of_range = || SchemaError::ScoreOutOfRange {
        value: value.to_string(),
    };

    let Value::Number(number) = value else {
        return Err(wrong_type());
    };

    let score = if let Some(n) = number.as_i64() {
        n
    } else {
        // 82.0 is an integer in everything but spelling
        let float = number.as_f64().ok_or_else(wrong_type)?;
        if float.fract() != 0.0 {
            return Err(wrong_type());
        }
        if !(0.0..=100.0).contains(&float) {
            return Err(out_of_range());
        }
        float as i64
    };

    if !(0..=100).contains(&score) {
        return Err(out_of_range());
    }
    Ok(score as u8)
}

fn parse_string(obj: &Map<String, Value>, field: &str) -> Result<String, SchemaError> {
    require(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::WrongType {
            field: field.to_string(),
            expected: "string",
        })
}

fn parse_string_list(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, SchemaError> {
    let items = require(obj, field)?
        .as_array()
        .ok_or_else(|| SchemaError::WrongType {
            field: field.to_string(),
            expected: "array of strings",
        })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::WrongType {
                    field: format!("{}[{}]", field, i),
                    expected: "string",
                })
        })
        .collect()
}

/// Why a candidate ended in the failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Model,
    Schema,
    Io,
    Other,
}

/// Paths of the three files written for a successful candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub json: String,
    pub markdown: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateStatus {
    Done {
        match_score: u8,
        verdict: Verdict,
        artifacts: ArtifactPaths,
    },
    Skipped {
        reason: String,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateOutcome {
    pub index: usize,
    pub cv_path: String,
    #[serde(flatten)]
    pub status: CandidateStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CandidateOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self.status, CandidateStatus::Done { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, CandidateStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, CandidateStatus::Failed { .. })
    }
}

/// Result of a whole run, one outcome per configured candidate in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub jd_path: String,
    pub model: String,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<CandidateOutcome>,
}

impl BatchReport {
    pub fn new(jd_path: String, model: String, outcomes: Vec<CandidateOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_done()).count();
        let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        Self {
            jd_path,
            model,
            succeeded,
            skipped,
            failed,
            outcomes,
        }
    }
}
