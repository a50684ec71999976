use storage::{NewPalette, Storage};

#[tokio::test]
async fn palettes_survive_reopening_the_database() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("palette_persistence_test_{suffix}"));
    let db_path = temp_root.join("palettes.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("first open");
        storage
            .insert_palette(&NewPalette {
                name: "Sunset".to_string(),
                basecolor: "#ff0000".to_string(),
                colors: vec!["#ffffff".to_string(), "#000000".to_string()],
                level: "AA".to_string(),
                is_large_text: false,
            })
            .await
            .expect("insert");
    }

    let reopened = Storage::new(&database_url).await.expect("second open");
    assert_eq!(reopened.count_palettes().await.expect("count"), 1);
    let page = reopened.list_palettes_page(1, 10).await.expect("page");
    assert_eq!(page[0].name, "Sunset");
    assert_eq!(page[0].colors, vec!["#ffffff", "#000000"]);

    drop(reopened);
    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
