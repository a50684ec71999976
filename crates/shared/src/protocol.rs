use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PaletteId;

/// Payload rendered for a freshly generated (unsaved) palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteView {
    pub palette: Vec<String>,
    pub basecolor: String,
    pub level: String,
    #[serde(rename = "isLargeText")]
    pub is_large_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteSummary {
    pub id: PaletteId,
    pub name: String,
    pub basecolor: String,
    pub colors: Vec<String>,
    pub level: String,
    #[serde(rename = "isLargeText")]
    pub is_large_text: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One page of saved palettes, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalettesPage {
    pub palettes: Vec<PaletteSummary>,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
}
