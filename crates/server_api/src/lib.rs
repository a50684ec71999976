//! Palette request operations: validate input, call the color service or
//! storage, map failures to user-facing errors.
//!
//! Each operation is one linear validate -> act -> respond sequence with a
//! single error boundary. Validation failures surface their specific message;
//! every other failure collapses to a fixed per-operation message with the
//! underlying cause logged here.

use std::sync::Arc;

use color_service::{ColorService, PaletteRequest};
use shared::{
    domain::PaletteId,
    error::ApiError,
    protocol::{PaletteSummary, PaletteView, PalettesPage},
};
use storage::{NewPalette, Storage};
use tracing::{debug, error};

const PALETTES_PER_PAGE: u32 = 10;

const MISSING_FIELDS: &str = "Missing required fields.";
const SAVE_FAILED: &str = "Failed to save palette.";
const FETCH_FAILED: &str = "Failed to fetch palettes.";
const DELETE_FAILED: &str = "Failed to delete palette.";

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub colors: Arc<dyn ColorService>,
}

/// Raw generate-request fields as they arrived on the wire.
#[derive(Debug, Default)]
pub struct GenerateInput {
    pub basecolor: Option<String>,
    pub level: Option<String>,
    pub is_large_text: Option<String>,
}

/// Raw save-request fields; `colors` is still JSON text at this point.
#[derive(Debug, Default)]
pub struct SaveInput {
    pub name: Option<String>,
    pub basecolor: Option<String>,
    pub colors: Option<String>,
    pub level: Option<String>,
    pub is_large_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SavedPalette {
    pub id: PaletteId,
    pub name: String,
}

/// Computes a palette without persisting anything. The color service is only
/// reached once both required fields are present.
pub async fn generate_palette(
    ctx: &ApiContext,
    input: GenerateInput,
) -> Result<PaletteView, ApiError> {
    let (basecolor, level, is_large_text) = validate_generate_input(input)?;
    let palette = ctx
        .colors
        .generate_palette(&PaletteRequest {
            basecolor: &basecolor,
            level: &level,
            is_large_text,
        })
        .map_err(|err| ApiError::validation(err.to_string()))?;

    Ok(PaletteView {
        palette,
        basecolor,
        level,
        is_large_text,
    })
}

pub async fn save_palette(ctx: &ApiContext, input: SaveInput) -> Result<SavedPalette, ApiError> {
    let palette = validate_save_input(input)?;
    let id = ctx.storage.insert_palette(&palette).await.map_err(|err| {
        error!(%err, name = %palette.name, "failed to persist palette");
        ApiError::database(SAVE_FAILED)
    })?;

    Ok(SavedPalette {
        id,
        name: palette.name,
    })
}

/// One page of saved palettes, newest first, with the total page count for
/// pagination controls. `page` is 1-based.
pub async fn list_palettes(ctx: &ApiContext, page: u32) -> Result<PalettesPage, ApiError> {
    let total = ctx.storage.count_palettes().await.map_err(|err| {
        error!(%err, "failed to count palettes");
        ApiError::database(FETCH_FAILED)
    })?;
    let records = ctx
        .storage
        .list_palettes_page(page, PALETTES_PER_PAGE)
        .await
        .map_err(|err| {
            error!(%err, page, "failed to fetch palette page");
            ApiError::database(FETCH_FAILED)
        })?;

    let total_pages = total.div_ceil(u64::from(PALETTES_PER_PAGE)) as u32;
    Ok(PalettesPage {
        palettes: records.into_iter().map(summary_from_record).collect(),
        current_page: page,
        total_pages,
        flash: None,
    })
}

/// Idempotent from the caller's perspective: deleting an id that no longer
/// exists still succeeds.
pub async fn delete_palette(ctx: &ApiContext, id: PaletteId) -> Result<(), ApiError> {
    let deleted = ctx.storage.delete_palette(id).await.map_err(|err| {
        error!(%err, id = id.0, "failed to delete palette");
        ApiError::database(DELETE_FAILED)
    })?;
    if !deleted {
        debug!(id = id.0, "delete matched no palette row");
    }
    Ok(())
}

fn validate_generate_input(input: GenerateInput) -> Result<(String, String, bool), ApiError> {
    let (Some(basecolor), Some(level)) = (required(input.basecolor), required(input.level)) else {
        return Err(ApiError::validation(MISSING_FIELDS));
    };
    Ok((basecolor, level, large_text_flag(input.is_large_text)))
}

fn validate_save_input(input: SaveInput) -> Result<NewPalette, ApiError> {
    let (Some(name), Some(basecolor), Some(colors), Some(level)) = (
        required(input.name),
        required(input.basecolor),
        required(input.colors),
        required(input.level),
    ) else {
        return Err(ApiError::validation(MISSING_FIELDS));
    };

    // A colors payload that is not a JSON string array is not distinguished
    // from a storage failure in the user-facing contract.
    let colors: Vec<String> = serde_json::from_str(&colors).map_err(|err| {
        error!(%err, "colors payload is not a JSON string array");
        ApiError::database(SAVE_FAILED)
    })?;

    Ok(NewPalette {
        name,
        basecolor,
        colors,
        level,
        is_large_text: large_text_flag(input.is_large_text),
    })
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// The flag is true only for the exact string "true"; "True", "1", or an
/// absent field all normalize to false.
fn large_text_flag(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn summary_from_record(record: storage::PaletteRecord) -> PaletteSummary {
    PaletteSummary {
        id: record.id,
        name: record.name,
        basecolor: record.basecolor,
        colors: record.colors,
        level: record.level,
        is_large_text: record.is_large_text,
        created_at: record.created_at,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
