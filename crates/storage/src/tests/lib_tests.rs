use super::*;

fn sample(name: &str) -> NewPalette {
    NewPalette {
        name: name.to_string(),
        basecolor: "#336699".to_string(),
        colors: vec!["#ffffff".to_string(), "#000000".to_string()],
        level: "AA".to_string(),
        is_large_text: false,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("palette_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("palettes.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn inserts_and_lists_palette_fields_intact() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let id = storage
        .insert_palette(&sample("Sunset"))
        .await
        .expect("insert");
    assert!(id.0 > 0);

    let page = storage.list_palettes_page(1, 10).await.expect("page");
    assert_eq!(page.len(), 1);
    let record = &page[0];
    assert_eq!(record.id, id);
    assert_eq!(record.name, "Sunset");
    assert_eq!(record.basecolor, "#336699");
    assert_eq!(record.colors, vec!["#ffffff", "#000000"]);
    assert_eq!(record.level, "AA");
    assert!(!record.is_large_text);
}

#[tokio::test]
async fn counts_palettes() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert_eq!(storage.count_palettes().await.expect("empty"), 0);
    storage
        .insert_palette(&sample("One"))
        .await
        .expect("insert");
    storage
        .insert_palette(&sample("Two"))
        .await
        .expect("insert");
    assert_eq!(storage.count_palettes().await.expect("count"), 2);
}

#[tokio::test]
async fn pages_are_newest_first() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for index in 1..=25 {
        storage
            .insert_palette(&sample(&format!("palette-{index}")))
            .await
            .expect("insert");
    }

    let first = storage.list_palettes_page(1, 10).await.expect("page 1");
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "palette-25");
    assert_eq!(first[9].name, "palette-16");

    let third = storage.list_palettes_page(3, 10).await.expect("page 3");
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].name, "palette-5");
    assert_eq!(third[4].name, "palette-1");

    let beyond = storage.list_palettes_page(4, 10).await.expect("page 4");
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn delete_reports_whether_row_existed() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let id = storage
        .insert_palette(&sample("Doomed"))
        .await
        .expect("insert");

    assert!(storage.delete_palette(id).await.expect("delete"));
    assert!(!storage.delete_palette(id).await.expect("redelete"));
    assert_eq!(storage.count_palettes().await.expect("count"), 0);
}

#[tokio::test]
async fn large_text_flag_round_trips() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut palette = sample("Large");
    palette.is_large_text = true;
    storage.insert_palette(&palette).await.expect("insert");

    let page = storage.list_palettes_page(1, 10).await.expect("page");
    assert!(page[0].is_large_text);
}
