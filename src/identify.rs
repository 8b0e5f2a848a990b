//! Plant identification: remote recognition first, catalog fallback second.
//!
//! [`IdentificationService::identify`] only fails when the catalog itself is
//! empty. Every remote problem is logged and masked by a mock result drawn
//! from the catalog.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::{IdentifyError, RecognitionError};
use crate::image::CapturedImage;
use crate::models::{CareInfo, IdentificationResult, Language};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_MOCK_CONFIDENCE: Range<f64> = 0.85..0.99;

/// Which tier produced an identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationSource {
    RemoteSuccess,
    FallbackUsed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    pub result: IdentificationResult,
    pub source: IdentificationSource,
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl RemoteConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiRecognizer {
    http: reqwest::Client,
    config: RemoteConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteIdentification {
    name: String,
    botanical_name: String,
    confidence: f64,
    care_info: RemoteCare,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCare {
    water_interval_days: f64,
    light: String,
    temp: String,
}

impl TryFrom<RemoteIdentification> for IdentificationResult {
    type Error = RecognitionError;

    fn try_from(remote: RemoteIdentification) -> Result<Self, Self::Error> {
        if remote.name.trim().is_empty() || remote.botanical_name.trim().is_empty() {
            return Err(RecognitionError::Schema("empty plant name".into()));
        }
        if !(0.0..=1.0).contains(&remote.confidence) {
            return Err(RecognitionError::Schema(format!(
                "confidence {} outside 0..=1",
                remote.confidence
            )));
        }
        let days = remote.care_info.water_interval_days.round();
        if !days.is_finite() || days < 1.0 || days > f64::from(u32::MAX) {
            return Err(RecognitionError::Schema(format!(
                "water interval {} is not a positive day count",
                remote.care_info.water_interval_days
            )));
        }

        Ok(IdentificationResult {
            name: remote.name,
            botanical_name: remote.botanical_name,
            confidence: remote.confidence,
            care_info: CareInfo {
                water_interval_days: days as u32,
                light: remote.care_info.light,
                temp: remote.care_info.temp,
            },
            description: Some(remote.description),
        })
    }
}

fn prompt(language: Language) -> String {
    let lang = language.prompt_name();
    format!(
        "Identify this plant. Provide the common {lang} name, the botanical name, \
         a description (2 sentences) in {lang}, an estimated confidence (0-1), and care info \
         (water interval in days, light in {lang}, temp). Response must be JSON."
    )
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "botanicalName": { "type": "STRING" },
            "description": { "type": "STRING" },
            "confidence": { "type": "NUMBER" },
            "careInfo": {
                "type": "OBJECT",
                "properties": {
                    "waterIntervalDays": { "type": "NUMBER" },
                    "light": { "type": "STRING" },
                    "temp": { "type": "STRING" }
                },
                "required": ["waterIntervalDays", "light", "temp"]
            }
        },
        "required": ["name", "botanicalName", "confidence", "careInfo", "description"]
    })
}

impl GeminiRecognizer {
    pub fn new(config: RemoteConfig) -> Self {
        info!(model = %config.model, endpoint = %config.endpoint, "Remote plant recognition enabled");
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn recognize(
        &self,
        image: &CapturedImage,
        language: Language,
    ) -> Result<IdentificationResult, RecognitionError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.base64() } },
                    { "text": prompt(language) }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        debug!(%url, bytes = image.bytes.len(), %language, "Sending image for recognition");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(RecognitionError::EmptyResponse);
        }

        let remote: RemoteIdentification = serde_json::from_str(&text)?;
        remote.try_into()
    }
}

/// Non-empty and within `0..=1`. NaN and infinite bounds fail both checks.
pub fn is_confidence_range(range: &Range<f64>) -> bool {
    let unit = 0.0..=1.0;
    unit.contains(&range.start) && unit.contains(&range.end) && range.start < range.end
}

pub struct IdentificationService {
    remote: Option<GeminiRecognizer>,
    mock_confidence: Range<f64>,
    mock_delay: Duration,
}

impl IdentificationService {
    pub fn new(remote: Option<RemoteConfig>) -> Self {
        Self {
            remote: remote.map(GeminiRecognizer::new),
            mock_confidence: DEFAULT_MOCK_CONFIDENCE,
            mock_delay: Duration::ZERO,
        }
    }

    /// Range the fallback draws confidences from. Ranges that are empty or
    /// leave `0..=1` are ignored.
    pub fn with_mock_confidence(mut self, range: Range<f64>) -> Self {
        if is_confidence_range(&range) {
            self.mock_confidence = range;
        } else {
            warn!(?range, "Ignoring invalid mock confidence range");
        }
        self
    }

    /// Artificial latency of the fallback, so the mock feels like a real call.
    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn identify(
        &self,
        image: &CapturedImage,
        language: Language,
    ) -> Result<Identification, IdentifyError> {
        if let Some(remote) = &self.remote {
            match remote.recognize(image, language).await {
                Ok(result) => {
                    info!(name = %result.name, confidence = result.confidence, "Remote identification succeeded");
                    return Ok(Identification {
                        result,
                        source: IdentificationSource::RemoteSuccess,
                    });
                }
                Err(e) => warn!(error = %e, "Remote identification failed, falling back to catalog"),
            }
        }

        if !self.mock_delay.is_zero() {
            tokio::time::sleep(self.mock_delay).await;
        }
        self.mock_identify(language)
    }

    /// Catalog pick with a resynthesized confidence.
    pub fn mock_identify(&self, language: Language) -> Result<Identification, IdentifyError> {
        let mut rng = rand::thread_rng();
        let entry =
            catalog::random_entry(language, &mut rng).ok_or(IdentifyError::EmptyCatalog(language))?;

        let mut result = entry.to_identification();
        result.confidence = rng.gen_range(self.mock_confidence.clone());
        debug!(name = %result.name, confidence = result.confidence, "Mock identification");

        Ok(Identification {
            result,
            source: IdentificationSource::FallbackUsed,
        })
    }
}
