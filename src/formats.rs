use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub section: String,
    pub filename: String,
    pub url: String,
}
