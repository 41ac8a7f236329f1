use tracing::{debug, info, warn};

use crate::{
    analysis::{ANALYSIS_FAILED_MESSAGE, GenerateContentRequest, GenerateContentResponse, decode_analysis},
    catalog::{ModelListResponse, fallback_catalog, live_catalog},
    error::{Result, VidbriefError},
    provider::ProviderConfig,
    store::{PreferenceStore, Preferences},
    types::{Analysis, Catalog},
};

static MISSING_KEY_FOR_MODELS: &str = "Please enter your Gemini API key to fetch available models";
static MISSING_KEY_FOR_ANALYSIS: &str = "Please enter your Gemini API key to analyze videos";

/// Talks to the Gemini API using the credential and model held in a
/// [`PreferenceStore`]. Every call is made once, without retries.
pub struct GeminiClient<S> {
    http: reqwest::Client,
    config: ProviderConfig,
    preferences: Preferences<S>,
}

impl<S: PreferenceStore> GeminiClient<S> {
    pub fn new(config: ProviderConfig, store: S) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            preferences: Preferences::new(store),
        }
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.preferences
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn require_api_key(&self, message: &str) -> Result<String> {
        let api_key = self.preferences.api_key()?;
        if api_key.is_empty() {
            return Err(VidbriefError::MissingApiKey {
                message: message.to_string(),
            });
        }
        Ok(api_key)
    }

    /// Lists selectable Gemini models.
    ///
    /// Only a missing credential is an error. Any other failure yields the
    /// fixed fallback catalog, flagged through [`Catalog::source`].
    pub async fn fetch_available_models(&self) -> Result<Catalog> {
        let api_key = self.require_api_key(MISSING_KEY_FOR_MODELS)?;

        match self.fetch_live_catalog(&api_key).await {
            Ok(catalog) => {
                info!(count = catalog.models.len(), "fetched live model catalog");
                Ok(catalog)
            }
            Err(e) => {
                warn!(error = %e, "model listing failed, using fallback catalog");
                Ok(fallback_catalog())
            }
        }
    }

    async fn fetch_live_catalog(&self, api_key: &str) -> Result<Catalog> {
        let url = self.config.models_url();
        debug!(%url, "listing models");

        let response = self
            .http
            .get(&url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(VidbriefError::Network {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<ModelListResponse>()
            .await
            .map_err(reqwest::Error::without_url)?;
        Ok(live_catalog(&body))
    }

    /// Asks the selected model to summarize a video from its file name or URL.
    ///
    /// A reply that does not decode still succeeds, as a degraded
    /// [`Analysis`].
    pub async fn analyze_video(&self, video_info: &str) -> Result<Analysis> {
        let api_key = self.require_api_key(MISSING_KEY_FOR_ANALYSIS)?;
        let model = self.preferences.model()?;

        let text = self
            .generate_content(&api_key, &model, video_info)
            .await
            .map_err(|e| {
                warn!(error = %e, %model, "analysis request failed");
                remote_error(e)
            })?;

        let analysis: Analysis = decode_analysis(&text).into();
        info!(%model, degraded = analysis.is_degraded(), "analysis finished");
        Ok(analysis)
    }

    async fn generate_content(&self, api_key: &str, model: &str, video_info: &str) -> Result<String> {
        let url = self.config.generate_content_url(model);
        debug!(%url, video_info, "requesting analysis");

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&GenerateContentRequest::for_video(video_info))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidbriefError::Remote {
                message: remote_status_message(status, &body),
            });
        }

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(reqwest::Error::without_url)?;
        body.text()
            .map_err(|message| VidbriefError::Remote { message })
    }
}

fn remote_status_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string));

    match detail {
        Some(detail) => format!("[{status}] {detail}"),
        None => format!("[{status}]"),
    }
}

/// Collapses any failure during analysis into a remote error, keeping the
/// underlying message when there is one.
fn remote_error(e: VidbriefError) -> VidbriefError {
    if e.is_configuration() {
        return e;
    }

    let message = match e {
        VidbriefError::Remote { message } => message,
        other => other.to_string(),
    };

    if message.trim().is_empty() {
        VidbriefError::Remote {
            message: ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    } else {
        VidbriefError::Remote { message }
    }
}
