// src/models.rs
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Outcome of processing one target site: the host that was crawled and
/// every unique email found on it, capped by configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteResult {
    pub website: String,
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of resolving a free-text company query to a probable domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedWebsite {
    pub original_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Events emitted while streaming a job: one `Progress` per target in
/// submission order, then exactly one `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    Progress {
        website: String,
        emails: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        processed_count: usize,
        total_count: usize,
        current_website: String,
    },
    Done,
}
