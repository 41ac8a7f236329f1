//! Vidbrief Core Library
//!
//! Gemini client for short video briefs: credential and model preferences,
//! model catalog listing, and summary/key points/sentiment/topics analysis.

pub mod analysis;
pub mod catalog;
pub mod client;
pub mod error;
pub mod format;
pub mod paths;
pub mod provider;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use analysis::{DecodedAnalysis, decode_analysis, degraded_result};
pub use catalog::fallback_catalog;
pub use client::GeminiClient;
pub use error::{Result, VidbriefError};
pub use format::{
    Section, format_analysis_readable, format_catalog, format_section, load_analysis,
    save_analysis,
};
pub use paths::{get_default_store_path, get_root_config_dir, get_store_path};
pub use provider::ProviderConfig;
pub use store::{DEFAULT_MODEL, FileStore, MemoryStore, PreferenceStore, Preferences};
pub use types::{Analysis, AnalysisResult, AnalysisStatus, Catalog, CatalogSource, ModelDescriptor};
