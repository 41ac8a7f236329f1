use serde::Deserialize;

use crate::types::{Catalog, CatalogSource, ModelDescriptor};

/// Ordered substring rules for models the provider gives no description for.
/// First match wins.
pub static DESCRIPTION_RULES: &[(&str, &str)] = &[
    ("pro", "Advanced model for complex tasks"),
    ("flash", "Optimized for speed and efficiency"),
    ("vision", "Specialized for vision and multimodal tasks"),
];

pub static DEFAULT_DESCRIPTION: &str = "General purpose AI model";

static FALLBACK_MODELS: &[(&str, &str, &str)] = &[
    (
        "gemini-1.5-pro",
        "Gemini 1.5 Pro",
        "Most capable model for highly complex tasks",
    ),
    (
        "gemini-1.5-flash",
        "Gemini 1.5 Flash",
        "Faster responses with slightly lower quality",
    ),
    (
        "gemini-1.0-pro",
        "Gemini 1.0 Pro",
        "Previous generation pro model",
    ),
    (
        "gemini-1.0-pro-vision",
        "Gemini 1.0 Pro Vision",
        "Specialized for vision tasks",
    ),
];

#[derive(Debug, Deserialize)]
pub struct ModelListResponse {
    pub models: Vec<RemoteModel>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteModel {
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn fallback_catalog() -> Catalog {
    Catalog {
        models: FALLBACK_MODELS
            .iter()
            .map(|(id, name, description)| ModelDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect(),
        source: CatalogSource::Fallback,
    }
}

/// "models/gemini-1.5-pro" -> "gemini-1.5-pro"
pub fn model_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// "gemini-1.5-flash-exp" -> "Gemini 1.5 flash exp"
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().replace('-', " ").chars())
            .collect(),
        None => String::new(),
    }
}

pub fn describe_model(id: &str) -> &'static str {
    DESCRIPTION_RULES
        .iter()
        .find(|(needle, _)| id.contains(needle))
        .map(|(_, description)| *description)
        .unwrap_or(DEFAULT_DESCRIPTION)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn descriptor_from_remote(model: &RemoteModel) -> ModelDescriptor {
    let id = model_id(&model.name).to_string();
    let description = non_empty(&model.display_name)
        .or_else(|| non_empty(&model.description))
        .map(str::to_string)
        .unwrap_or_else(|| describe_model(&id).to_string());

    ModelDescriptor {
        name: display_name(&id),
        id,
        description,
    }
}

pub fn live_catalog(response: &ModelListResponse) -> Catalog {
    Catalog {
        models: response
            .models
            .iter()
            .filter(|m| m.name.contains("gemini"))
            .map(descriptor_from_remote)
            .collect(),
        source: CatalogSource::Live,
    }
}
