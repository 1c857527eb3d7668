//! Movie record as served by the catalog API

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub description: String,
    pub release_date: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub image_url: String,
}

impl Movie {
    /// Poster URL, if the record has one
    pub fn image(&self) -> Option<&str> {
        let url = self.image_url.trim();
        (!url.is_empty()).then_some(url)
    }
}
