use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::PaletteId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Palette fields as validated by the controller, ready to persist.
#[derive(Debug, Clone)]
pub struct NewPalette {
    pub name: String,
    pub basecolor: String,
    pub colors: Vec<String>,
    pub level: String,
    pub is_large_text: bool,
}

#[derive(Debug, Clone)]
pub struct PaletteRecord {
    pub id: PaletteId,
    pub name: String,
    pub basecolor: String,
    pub colors: Vec<String>,
    pub level: String,
    pub is_large_text: bool,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_palette(&self, palette: &NewPalette) -> Result<PaletteId> {
        let colors_json =
            serde_json::to_string(&palette.colors).context("failed to encode palette colors")?;
        let rec = sqlx::query(
            "INSERT INTO palettes (name, basecolor, colors, level, is_large_text, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&palette.name)
        .bind(&palette.basecolor)
        .bind(colors_json)
        .bind(&palette.level)
        .bind(palette.is_large_text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(PaletteId(rec.get::<i64, _>(0)))
    }

    pub async fn count_palettes(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM palettes")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    /// One page of palettes, newest first. `page` is 1-based; records with the
    /// same timestamp fall back to insertion order via the id.
    pub async fn list_palettes_page(&self, page: u32, per_page: u32) -> Result<Vec<PaletteRecord>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let rows = sqlx::query(
            "SELECT id, name, basecolor, colors, level, is_large_text, created_at
             FROM palettes
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(palette_from_row).collect()
    }

    /// Returns whether a matching row existed. Callers treat deletion as
    /// idempotent but the distinction is surfaced for logging.
    pub async fn delete_palette(&self, id: PaletteId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM palettes WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn palette_from_row(row: sqlx::sqlite::SqliteRow) -> Result<PaletteRecord> {
    let colors_json = row.get::<String, _>(3);
    let colors = serde_json::from_str(&colors_json)
        .with_context(|| format!("corrupt colors column: {colors_json}"))?;
    Ok(PaletteRecord {
        id: PaletteId(row.get::<i64, _>(0)),
        name: row.get::<String, _>(1),
        basecolor: row.get::<String, _>(2),
        colors,
        level: row.get::<String, _>(4),
        is_large_text: row.get::<bool, _>(5),
        created_at: row.get::<DateTime<Utc>, _>(6),
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
