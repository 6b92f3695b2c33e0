use serde_json::json;
use site_builder::state::PersistenceError;
use site_builder::{
    BlockKind, BlockTemplate, DocumentStore, PersistenceConfig, ProjectFile, ProjectPersistence,
    SiteStatus, SiteUpdate,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Two sites, a few pages and blocks, selection away from the first page
fn create_test_store() -> DocumentStore {
    init_logger();
    let mut store = DocumentStore::default();
    let site_id = store.active_site().id.clone();
    let home = store.active_page_key();

    store
        .add_block(
            &home,
            BlockTemplate::new(BlockKind::Header)
                .with_field("title", "Build Amazing Websites")
                .with_field("columns", json!([1, 2, { "nested": true }])),
        )
        .unwrap();
    store.add_block(&home, BlockTemplate::new(BlockKind::Footer)).unwrap();
    let about = store.add_page(&site_id, "About Us").unwrap();
    store
        .update_site(
            &site_id,
            SiteUpdate {
                status: Some(SiteStatus::Published),
                ..Default::default()
            },
        )
        .unwrap();

    let second = store.add_site("Business Site").unwrap();
    let mut styles = second.site_styles.clone();
    styles.fonts.title1.size = 6.5;
    store.update_site_styles(&second.id, styles).unwrap();

    assert!(store.switch_page(&about.id));
    store
}

fn persistence_in(dir: &std::path::Path, max_autosaves: usize) -> ProjectPersistence {
    ProjectPersistence::new(&PersistenceConfig {
        state_dir: dir.to_string_lossy().into_owned(),
        max_autosaves,
        autosave_interval_secs: 0,
    })
}

#[test]
fn test_project_file_round_trip() {
    let store = create_test_store();
    let doc = store.snapshot();

    let json = ProjectFile::from_document(&doc).to_json().unwrap();
    let restored = ProjectFile::from_json(&json).unwrap().into_document().unwrap();

    assert_eq!(restored, doc);
    assert_eq!(restored.active_page().name, "About Us");
}

#[test]
fn test_project_file_shape() {
    let store = create_test_store();
    let json = ProjectFile::from_document(store.document()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], "1.0");
    assert!(value["exportDate"].is_string());
    assert_eq!(value["metadata"]["totalSites"], 2);
    assert_eq!(value["metadata"]["totalPages"], 3);

    let site = &value["sites"][0];
    assert_eq!(site["status"], "published");
    assert!(site["siteStyles"]["colors"]["buttonsAndLinks"].is_array());
    let page = &site["pages"][0];
    assert_eq!(page["pageUrl"], "index.html");
    assert_eq!(page["blocks"][0]["type"], "header");
    assert_eq!(page["blocks"][0]["content"]["title"], "Build Amazing Websites");
    assert_eq!(site["pages"][1]["pageUrl"], "about-us.html");
}

#[test]
fn test_load_minimal_project() {
    init_logger();
    let json = r#"{
        "version": "1.0",
        "exportDate": "2024-01-20T10:00:00Z",
        "sites": [{
            "id": "1",
            "name": "My Portfolio",
            "pages": [{ "id": "p1", "name": "Home", "blocks": [
                { "id": "b1", "type": "menu" },
                { "id": "b2", "type": "image-video", "content": { "src": "a.png" } }
            ] }]
        }],
        "metadata": { "appName": "Mobirise Builder Clone", "totalSites": 1, "totalPages": 1 }
    }"#;

    let doc = ProjectFile::from_json(json).unwrap().into_document().unwrap();
    assert_eq!(doc.active_site_id(), "1");
    assert_eq!(doc.active_page_id(), "p1");
    let page = doc.active_page();
    assert_eq!(page.page_url, "index.html");
    assert!(page.social_sharing_enabled);
    assert_eq!(page.blocks[1].kind, BlockKind::ImageVideo);
    assert_eq!(doc.active_site().status, SiteStatus::Unpublished);
    assert_eq!(doc.active_site().site_styles.colors.primary, "#4CAF50");
    // sites saved without timestamps are stamped on load
    assert!(doc.active_site().created_at <= chrono::Utc::now());
    assert!(doc.active_site().updated_at <= chrono::Utc::now());
}

#[test]
fn test_load_rejects_broken_projects() {
    let store = create_test_store();
    let valid: serde_json::Value =
        serde_json::to_value(ProjectFile::from_document(store.document())).unwrap();

    let mut no_sites = valid.clone();
    no_sites["sites"] = json!([]);

    let mut empty_site = valid.clone();
    empty_site["sites"][1]["pages"] = json!([]);

    let mut duplicate_blocks = valid.clone();
    let block = duplicate_blocks["sites"][0]["pages"][0]["blocks"][0].clone();
    duplicate_blocks["sites"][0]["pages"][0]["blocks"][1] = block;

    for broken in [no_sites, empty_site, duplicate_blocks] {
        let project: ProjectFile = serde_json::from_value(broken).unwrap();
        assert!(matches!(
            project.into_document(),
            Err(PersistenceError::InvalidState(_))
        ));
    }

    let err = ProjectFile::from_json("{ \"version\": 1 }").unwrap_err();
    assert!(matches!(err, PersistenceError::SerializationError(_)));
    assert!(err.to_string().starts_with("Invalid project JSON"));
}

#[test]
fn test_save_and_load_project() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = persistence_in(dir.path(), 5);
    let store = create_test_store();

    let path = persistence.save_project(&store, "portfolio").unwrap();
    assert!(path.ends_with("portfolio.json"));

    let mut fresh = DocumentStore::default();
    persistence.load_into(&mut fresh, "portfolio").unwrap();
    assert_eq!(*fresh.document(), store.snapshot());
    // a loaded project starts with a clean history
    assert!(!fresh.can_undo());
    assert!(!fresh.can_redo());

    assert!(matches!(
        persistence.load_project("missing"),
        Err(PersistenceError::ReadError(_))
    ));
}

#[test]
fn test_autosave_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let mut persistence = persistence_in(dir.path(), 2);
    let mut store = create_test_store();
    let page = store.active_page_key();

    assert_eq!(persistence.find_latest_autosave().unwrap(), None);

    let mut written = Vec::new();
    for _ in 0..4 {
        store.add_block(&page, BlockTemplate::new(BlockKind::News)).unwrap();
        let path = persistence.try_autosave(&store).unwrap().unwrap();
        written.push(path);
        // autosave names carry a millisecond timestamp
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let remaining = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(remaining, 2);

    let latest = persistence.find_latest_autosave().unwrap().unwrap();
    assert!(written.last().unwrap().ends_with(format!("{}.json", latest)));

    let restored = persistence.load_project(&latest).unwrap();
    assert_eq!(restored, store.snapshot());
}

#[test]
fn test_autosave_respects_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut persistence = ProjectPersistence::new(&PersistenceConfig {
        state_dir: dir.path().to_string_lossy().into_owned(),
        max_autosaves: 5,
        autosave_interval_secs: 3600,
    });
    let store = create_test_store();

    assert!(persistence.try_autosave(&store).unwrap().is_some());
    assert!(persistence.try_autosave(&store).unwrap().is_none());
}
