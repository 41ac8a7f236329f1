use serde::{Deserialize, Serialize};

use crate::types::{Analysis, AnalysisResult, AnalysisStatus};

pub static ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze video. Please try again later.";

static DEGRADED_SUMMARY_PREFIX: &str =
    "The API response couldn't be parsed as JSON. Here's the raw text: ";
static DEGRADED_KEY_POINTS: [&str; 5] = [
    "API returned non-JSON response",
    "Check your prompt formatting",
    "Try a different video",
    "Ensure API key is valid",
    "Contact support if issue persists",
];
static DEGRADED_SENTIMENT: &str = "Unable to determine sentiment from non-JSON response";
static DEGRADED_TOPICS: [&str; 2] = ["API Error", "Parsing Issue"];
const RAW_EXCERPT_CHARS: usize = 100;

/// Builds the instruction sent to the model. `video_info` is embedded as-is.
pub fn analysis_prompt(video_info: &str) -> String {
    format!(
        r#"
Analyze this video: "{video_info}"

Please provide:
1. A concise summary (3-4 sentences)
2. 5 key points from the video
3. The overall sentiment (positive, negative, or neutral with explanation)
4. Main topics discussed (as a list of keywords)

Format your response as JSON with the following structure:
{{
  "summary": "...",
  "keyPoints": ["point1", "point2", "point3", "point4", "point5"],
  "sentiment": "...",
  "topics": ["topic1", "topic2", "..."]
}}
"#
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockMediumAndAbove,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

pub static SAFETY_SETTINGS: [SafetySetting; 4] = [
    SafetySetting {
        category: HarmCategory::HarmCategoryHarassment,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::HarmCategoryHateSpeech,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::HarmCategorySexuallyExplicit,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::HarmCategoryDangerousContent,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
];

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content>,
    #[serde(rename = "safetySettings")]
    pub safety_settings: &'a [SafetySetting],
}

impl GenerateContentRequest<'static> {
    pub fn for_video(video_info: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(analysis_prompt(video_info)),
                }],
            }],
            safety_settings: &SAFETY_SETTINGS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all parts concatenated. Errors carry a
    /// reason when the reply has no text, e.g. blocked by safety settings.
    pub fn text(&self) -> Result<String, String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(format!("Text not available. Response was blocked due to {reason}"));
        }

        let Some(candidate) = self.candidates.first() else {
            return Err("Text not available. Response has no candidates".to_string());
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if matches!(reason, "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT") {
                return Err(format!("Text not available. Candidate was blocked due to {reason}"));
            }
        }

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        Ok(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAnalysis {
    Parsed(AnalysisResult),
    Malformed(String),
}

pub fn decode_analysis(raw: &str) -> DecodedAnalysis {
    match serde_json::from_str::<AnalysisResult>(raw) {
        Ok(result) => DecodedAnalysis::Parsed(result),
        Err(e) => {
            tracing::warn!(error = %e, "model reply did not match the analysis schema");
            DecodedAnalysis::Malformed(raw.to_string())
        }
    }
}

/// Diagnostic-shaped stand-in for a reply that did not decode.
pub fn degraded_result(raw: &str) -> AnalysisResult {
    let excerpt: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();

    AnalysisResult {
        summary: format!("{DEGRADED_SUMMARY_PREFIX}{excerpt}..."),
        key_points: DEGRADED_KEY_POINTS.iter().map(|s| s.to_string()).collect(),
        sentiment: DEGRADED_SENTIMENT.to_string(),
        topics: DEGRADED_TOPICS.iter().map(|s| s.to_string()).collect(),
    }
}

impl From<DecodedAnalysis> for Analysis {
    fn from(decoded: DecodedAnalysis) -> Self {
        match decoded {
            DecodedAnalysis::Parsed(result) => Analysis {
                result,
                status: AnalysisStatus::Genuine,
            },
            DecodedAnalysis::Malformed(raw) => Analysis {
                result: degraded_result(&raw),
                status: AnalysisStatus::Degraded { raw },
            },
        }
    }
}
