use std::path::Path;

use tokio::fs;

use crate::{
    error::Result,
    types::{AnalysisResult, Catalog},
};

/// One tab of a result, as it would be copied out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    KeyPoints,
    Sentiment,
    Topics,
}

pub fn format_section(result: &AnalysisResult, section: Section) -> String {
    match section {
        Section::Summary => result.summary.clone(),
        Section::KeyPoints => result
            .key_points
            .iter()
            .map(|point| format!("• {}", point))
            .collect::<Vec<_>>()
            .join("\n"),
        Section::Sentiment => result.sentiment.clone(),
        Section::Topics => result.topics.join(", "),
    }
}

/// Format an analysis as human-readable markdown
pub fn format_analysis_readable(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("## Summary\n\n");
    output.push_str(&result.summary);
    output.push_str("\n\n");

    output.push_str("## Key Points\n\n");
    for (i, point) in result.key_points.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, point));
    }
    output.push('\n');

    output.push_str("## Sentiment\n\n");
    output.push_str(&result.sentiment);
    output.push_str("\n\n");

    output.push_str("## Topics\n\n");
    for topic in &result.topics {
        output.push_str(&format!("• {}\n", topic));
    }

    output
}

pub fn format_catalog(catalog: &Catalog, selected: &str) -> String {
    let width = catalog.models.iter().map(|m| m.id.len()).max().unwrap_or(0);

    catalog
        .models
        .iter()
        .map(|m| {
            let marker = if m.id == selected { "*" } else { " " };
            format!(
                "{} {:width$}  {} - {}",
                marker,
                m.id,
                m.name,
                m.description,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Save an analysis to a file
pub async fn save_analysis(result: &AnalysisResult, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(result)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load an analysis from a saved file
pub async fn load_analysis(path: &Path) -> Result<AnalysisResult> {
    let json_content = fs::read_to_string(path).await?;
    let result: AnalysisResult = serde_json::from_str(&json_content)?;
    Ok(result)
}
