//! Edit sessions against the on-disk store.

use std::sync::Arc;

use munipage_editor::{
    DragOutcome, EditSession, EditorConfig, EditorError, FeaturedMirror, LocalPageStore,
    LocalUploader, PageStore,
};
use munipage_render::{CardField, EditAction, Field, ImageSlot, UploadFile};
use munipage_types::{Block, BlockKind, Width};

const CDN: &str = "https://res.cloudinary.com/munidepo/image/upload/munidepo/hero";

async fn open(store: &Arc<LocalPageStore>, uploads: &std::path::Path) -> EditSession {
    EditSession::open(
        "/cultura/talleres",
        "Talleres",
        store.clone(),
        Arc::new(LocalUploader::new(uploads, CDN)),
        &EditorConfig::default(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn save_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalPageStore::new(dir.path().join("data")));
    let uploads = dir.path().join("uploads");

    let mut session = open(&store, &uploads).await;
    assert!(session.is_new());
    let grid = session.add_block(BlockKind::CardsGrid);
    session
        .apply(&grid, &EditAction::set(Field::Card(0, CardField::Title), "Cerámica"))
        .unwrap();
    session
        .apply(&grid, &EditAction::set(Field::Card(0, CardField::Featured), "on"))
        .unwrap();
    session
        .upload(
            &grid,
            ImageSlot::CardImage(0),
            UploadFile::new("ceramica.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]),
        )
        .await
        .unwrap();
    let text = session.blocks()[1].id().clone();
    assert!(session.set_width(&text, Width::Full).unwrap());

    let saved = session.save().await.unwrap();
    assert!(!session.is_dirty());
    let expected = session.page().clone();
    let preview = session.render_preview().to_html();
    session.discard();

    let reopened = open(&store, &uploads).await;
    assert!(!reopened.is_new());
    assert!(!reopened.is_dirty());
    assert_eq!(reopened.page(), &expected);
    assert_eq!(reopened.page().updated_at, saved.updated_at);
    assert_eq!(reopened.render_preview().to_html(), preview);

    let featured = store.all().await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].card.title, "Cerámica");
    assert_eq!(featured[0].page_path, "/cultura/talleres");
    assert_eq!(featured[0].page_title, "Talleres");
    assert!(featured[0].card.image_url.as_deref().unwrap().starts_with(CDN));
    assert_eq!(std::fs::read_dir(&uploads).unwrap().count(), 1);
}

#[tokio::test]
async fn unfeaturing_clears_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalPageStore::new(dir.path()));
    let uploads = dir.path().join("uploads");

    let mut session = open(&store, &uploads).await;
    let grid = session.add_block(BlockKind::CardsGrid);
    let featured = EditAction::set(Field::Card(0, CardField::Featured), "true");
    session.apply(&grid, &featured).unwrap();
    session.save().await.unwrap();
    assert_eq!(store.all().await.unwrap().len(), 1);

    session
        .apply(&grid, &EditAction::set(Field::Card(0, CardField::Featured), "false"))
        .unwrap();
    session.save().await.unwrap();
    assert!(store.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn drag_reorder_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalPageStore::new(dir.path()));
    let uploads = dir.path().join("uploads");

    let mut session = open(&store, &uploads).await;
    let c = session.add_block(BlockKind::Cta);
    let d = session.add_block(BlockKind::Spacer);
    let ids: Vec<_> = session.blocks().iter().map(|b| b.id().clone()).collect();
    let (a, b) = (ids[0].clone(), ids[1].clone());

    // A over C: [B, C, A, D]
    session.pointer_down(&a, 10.0, 10.0);
    assert!(session.pointer_move(10.0, 30.0, Some(&c)));
    assert!(matches!(session.pointer_up(), DragOutcome::Drop { .. }));
    let order: Vec<_> = session.blocks().iter().map(|b| b.id().clone()).collect();
    assert_eq!(order, vec![b.clone(), c.clone(), a.clone(), d.clone()]);

    session.save().await.unwrap();
    let stored = store.get_by_path("/cultura/talleres").await.unwrap().unwrap();
    let stored_order: Vec<_> = stored.blocks.iter().map(|b| b.id().clone()).collect();
    assert_eq!(stored_order, order);
}

#[tokio::test]
async fn unknown_blocks_survive_edit_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalPageStore::new(dir.path()));
    let page = serde_json::from_value(serde_json::json!({
        "path": "/cultura/talleres",
        "title": "Talleres",
        "blocks": [
            {"id": "m", "type": "map", "lat": -34.6, "lng": -58.4},
            {"id": "t", "type": "richText", "html": "<p>Hola</p>"}
        ]
    }))
    .unwrap();
    store.upsert(page).await.unwrap();

    let mut session = open(&store, &dir.path().join("uploads")).await;
    let text = session.blocks()[1].id().clone();
    session
        .apply(&text, &EditAction::set(Field::Html, "<p>Chau</p>"))
        .unwrap();
    session.save().await.unwrap();

    let raw: serde_json::Value = serde_json::from_slice(
        &std::fs::read(store.page_file("/cultura/talleres").unwrap()).unwrap(),
    )
    .unwrap();
    assert_eq!(raw["blocks"][0]["lat"], -34.6);
    assert_eq!(raw["blocks"][0]["type"], "map");
    assert_eq!(raw["blocks"][1]["html"], "<p>Chau</p>");
    assert!(matches!(session.blocks()[0], Block::Unknown(_)));
}

#[tokio::test]
async fn invalid_save_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalPageStore::new(dir.path()));
    let mut session = open(&store, &dir.path().join("uploads")).await;
    let cta = session.add_block(BlockKind::Cta);
    session.apply(&cta, &EditAction::set(Field::Title, "  ")).unwrap();

    let Err(EditorError::Validation(issues)) = session.save().await else {
        panic!("expected validation failure");
    };
    assert!(issues.iter().any(|i| i.field.as_deref() == Some("title")));
    assert!(store.list_paths().await.unwrap().is_empty());
}
