use quantum_core::db::open_store_db;
use quantum_core::repo::block_repo::{BlockRepository, SqliteBlockRepository};
use quantum_core::repo::page_repo::SqlitePageRepository;
use quantum_core::service::page_service::{PageService, PageServiceError};
use quantum_core::BlockKind;
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_store_db().unwrap()
}

fn service(
    conn: &rusqlite::Connection,
) -> PageService<SqlitePageRepository<'_>, SqliteBlockRepository<'_>> {
    PageService::new(
        SqlitePageRepository::new(conn),
        SqliteBlockRepository::new(conn),
    )
}

#[test]
fn create_and_list_keeps_insertion_order() {
    let conn = setup();
    let service = service(&conn);

    let first = service.create_page(None).unwrap();
    let second = service.create_page(None).unwrap();
    let third = service.create_page(Some(first.uuid)).unwrap();

    let pages = service.list_pages().unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].uuid, first.uuid);
    assert_eq!(pages[1].uuid, second.uuid);
    assert_eq!(pages[2].uuid, third.uuid);
    assert!(pages[0].position < pages[1].position);
    assert!(pages[1].position < pages[2].position);
}

#[test]
fn create_applies_defaults_and_seeds_one_text_block() {
    let conn = setup();
    let service = service(&conn);
    let blocks = SqliteBlockRepository::new(&conn);

    let page = service.create_page(None).unwrap();
    assert_eq!(page.title, "Untitled");
    assert_eq!(page.icon, "📄");
    assert!(!page.is_expanded);
    assert!(page.parent_uuid.is_none());

    let page_blocks = blocks.list_page_blocks(page.uuid).unwrap();
    assert_eq!(page_blocks.len(), 1);
    assert_eq!(page_blocks[0].kind, BlockKind::Text);
    assert_eq!(page_blocks[0].content, "");
    assert!(page_blocks[0].parent_uuid.is_none());
}

#[test]
fn create_under_parent_forces_parent_expanded() {
    let conn = setup();
    let service = service(&conn);

    let parent = service.create_page(None).unwrap();
    assert!(!parent.is_expanded);

    let child = service.create_page(Some(parent.uuid)).unwrap();
    assert_eq!(child.parent_uuid, Some(parent.uuid));

    let reloaded = service.get_page(parent.uuid).unwrap().unwrap();
    assert!(reloaded.is_expanded);
}

#[test]
fn create_rejects_unknown_parent() {
    let conn = setup();
    let service = service(&conn);
    let unknown = Uuid::now_v7();

    let err = service.create_page(Some(unknown)).unwrap_err();
    assert!(matches!(
        err,
        PageServiceError::ParentNotFound(parent_uuid) if parent_uuid == unknown
    ));
}

#[test]
fn delete_cascades_through_every_depth_and_sweeps_blocks() {
    let conn = setup();
    let service = service(&conn);
    let blocks = SqliteBlockRepository::new(&conn);

    let root = service.create_page(None).unwrap();
    let child = service.create_page(Some(root.uuid)).unwrap();
    let grandchild = service.create_page(Some(child.uuid)).unwrap();
    let untouched = service.create_page(None).unwrap();

    // Extra content beyond the default blocks, nested two levels deep.
    blocks.insert_block(grandchild.uuid, None, None).unwrap();

    let cascade = service.delete_page(root.uuid).unwrap();
    assert_eq!(cascade.removed_pages.len(), 3);
    assert!(cascade.removed_pages.contains(&root.uuid));
    assert!(cascade.removed_pages.contains(&child.uuid));
    assert!(cascade.removed_pages.contains(&grandchild.uuid));
    // One default block per removed page plus the extra one.
    assert_eq!(cascade.removed_blocks, 4);

    let remaining = service.list_pages().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].uuid, untouched.uuid);

    let all_blocks = blocks.list_blocks().unwrap();
    assert!(all_blocks.iter().all(|block| block.page_uuid == untouched.uuid));
}

#[test]
fn delete_unknown_page_is_a_service_error() {
    let conn = setup();
    let service = service(&conn);
    let unknown = Uuid::now_v7();

    let err = service.delete_page(unknown).unwrap_err();
    assert!(matches!(
        err,
        PageServiceError::PageNotFound(page_uuid) if page_uuid == unknown
    ));
}

#[test]
fn rename_and_icon_updates_are_single_field() {
    let conn = setup();
    let service = service(&conn);

    let page = service.create_page(None).unwrap();
    service.rename_page(page.uuid, "Reading List").unwrap();
    service.set_page_icon(page.uuid, "📚").unwrap();

    let reloaded = service.get_page(page.uuid).unwrap().unwrap();
    assert_eq!(reloaded.title, "Reading List");
    assert_eq!(reloaded.icon, "📚");
    assert_eq!(reloaded.created_at, page.created_at);
    assert_eq!(reloaded.position, page.position);
}

#[test]
fn toggle_expansion_flips_back_and_forth() {
    let conn = setup();
    let service = service(&conn);

    let page = service.create_page(None).unwrap();
    service.toggle_page_expansion(page.uuid).unwrap();
    assert!(service.get_page(page.uuid).unwrap().unwrap().is_expanded);
    service.toggle_page_expansion(page.uuid).unwrap();
    assert!(!service.get_page(page.uuid).unwrap().unwrap().is_expanded);
}

#[test]
fn move_reparents_under_new_parent_and_back_to_root() {
    let conn = setup();
    let service = service(&conn);

    let a = service.create_page(None).unwrap();
    let b = service.create_page(None).unwrap();

    service.move_page(b.uuid, Some(a.uuid)).unwrap();
    assert_eq!(
        service.get_page(b.uuid).unwrap().unwrap().parent_uuid,
        Some(a.uuid)
    );

    service.move_page(b.uuid, None).unwrap();
    assert!(service.get_page(b.uuid).unwrap().unwrap().parent_uuid.is_none());
}

#[test]
fn move_rejects_cycle_parenting() {
    let conn = setup();
    let service = service(&conn);

    let a = service.create_page(None).unwrap();
    let b = service.create_page(Some(a.uuid)).unwrap();
    let c = service.create_page(Some(b.uuid)).unwrap();

    let err = service.move_page(a.uuid, Some(c.uuid)).unwrap_err();
    assert!(matches!(
        err,
        PageServiceError::CycleDetected { page_uuid, parent_uuid }
            if page_uuid == a.uuid && parent_uuid == c.uuid
    ));

    let self_err = service.move_page(a.uuid, Some(a.uuid)).unwrap_err();
    assert!(matches!(self_err, PageServiceError::CycleDetected { .. }));
}

#[test]
fn first_page_follows_collection_order() {
    let conn = setup();
    let service = service(&conn);

    assert!(service.first_page().unwrap().is_none());

    let first = service.create_page(None).unwrap();
    let _second = service.create_page(None).unwrap();
    assert_eq!(service.first_page().unwrap().unwrap().uuid, first.uuid);

    service.delete_page(first.uuid).unwrap();
    let survivor = service.first_page().unwrap().unwrap();
    assert_ne!(survivor.uuid, first.uuid);
}
