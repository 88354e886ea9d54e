use quantum_core::{BlockKind, StoreError, ViewTarget, WorkspaceStore};
use uuid::Uuid;

#[test]
fn sample_fixture_has_the_documented_shape() {
    let (store, sample) = WorkspaceStore::open_sample().unwrap();

    assert_eq!(store.workspace().unwrap().name, "Quantum");
    assert_eq!(store.pages().unwrap().len(), 5);
    assert_eq!(store.blocks().unwrap().len(), 9);
    assert_eq!(store.roadmap_tasks().unwrap().len(), 6);
    assert_eq!(store.calendar_events().unwrap().len(), 3);
    assert_eq!(store.templates().len(), 2);
    assert_eq!(store.selection(), Some(ViewTarget::Page(sample.welcome_page)));

    let project = store.page(sample.project_page).unwrap().unwrap();
    assert!(project.is_expanded);
    assert!(project.parent_uuid.is_none());
    let task_list = store.page(sample.task_list_page).unwrap().unwrap();
    assert_eq!(task_list.parent_uuid, Some(sample.project_page));
    let meeting_notes = store.page(sample.meeting_notes_page).unwrap().unwrap();
    assert_eq!(meeting_notes.parent_uuid, Some(sample.project_page));

    let first_task = store.roadmap_task(sample.task_uuids[0]).unwrap().unwrap();
    assert_eq!(first_task.title, "Project Planning & Research");
    assert_eq!(first_task.progress, 85);

    let first_event = store.calendar_event(sample.event_uuids[0]).unwrap().unwrap();
    assert_eq!(first_event.tag, "Meeting");
    assert_eq!(first_event.color, "bg-blue-500");
}

#[test]
fn welcome_page_renders_in_seeded_order() {
    let (store, sample) = WorkspaceStore::open_sample().unwrap();

    let top_level: Vec<_> = store
        .page_blocks(sample.welcome_page)
        .unwrap()
        .into_iter()
        .map(|block| block.uuid)
        .collect();
    assert_eq!(
        top_level,
        vec![
            sample.welcome_heading,
            sample.welcome_intro,
            sample.toggle_group,
            sample.welcome_divider,
            sample.welcome_code,
        ]
    );

    let toggle = store.block(sample.toggle_group).unwrap().unwrap();
    assert_eq!(toggle.kind, BlockKind::Toggle);
    assert_eq!(toggle.is_expanded, Some(false));

    let children: Vec<_> = store
        .child_blocks(sample.toggle_group)
        .unwrap()
        .into_iter()
        .map(|block| block.uuid)
        .collect();
    assert_eq!(children, vec![sample.toggle_text, sample.toggle_todo]);

    let code = store.block(sample.welcome_code).unwrap().unwrap();
    assert_eq!(code.kind, BlockKind::Code);
    assert_eq!(code.language.as_deref(), Some("javascript"));
}

#[test]
fn deleting_the_project_page_cascades_to_children_and_blocks() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();

    // Select a page that is about to disappear with the cascade.
    store.select_page(sample.task_list_page).unwrap();

    store.delete_page(sample.project_page).unwrap();

    let remaining: Vec<_> = store
        .pages()
        .unwrap()
        .into_iter()
        .map(|page| page.uuid)
        .collect();
    assert_eq!(remaining, vec![sample.welcome_page, sample.resources_page]);

    // Only the welcome page's seven blocks survive.
    let blocks = store.blocks().unwrap();
    assert_eq!(blocks.len(), 7);
    assert!(blocks
        .iter()
        .all(|block| block.page_uuid == sample.welcome_page));
    assert!(store.block(sample.project_heading).unwrap().is_none());
    assert!(store.block(sample.project_overview).unwrap().is_none());

    // Selection fell back to the first remaining page.
    assert_eq!(store.selected_page(), Some(sample.welcome_page));
}

#[test]
fn deleting_the_toggle_group_removes_its_children_in_one_call() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();

    store.delete_block(sample.toggle_group).unwrap();

    assert!(store.block(sample.toggle_group).unwrap().is_none());
    assert!(store.block(sample.toggle_text).unwrap().is_none());
    assert!(store.block(sample.toggle_todo).unwrap().is_none());
    assert!(store.child_blocks(sample.toggle_group).unwrap().is_empty());

    let top_level: Vec<_> = store
        .page_blocks(sample.welcome_page)
        .unwrap()
        .into_iter()
        .map(|block| block.uuid)
        .collect();
    assert_eq!(
        top_level,
        vec![
            sample.welcome_heading,
            sample.welcome_intro,
            sample.welcome_divider,
            sample.welcome_code,
        ]
    );
    assert_eq!(store.blocks().unwrap().len(), 6);
}

#[test]
fn inserting_after_the_intro_block_splices_into_render_order() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();

    let inserted = store
        .insert_block(sample.welcome_page, Some(sample.welcome_intro), None)
        .unwrap();

    let top_level: Vec<_> = store
        .page_blocks(sample.welcome_page)
        .unwrap()
        .into_iter()
        .map(|block| block.uuid)
        .collect();
    assert_eq!(
        top_level,
        vec![
            sample.welcome_heading,
            sample.welcome_intro,
            inserted.uuid,
            sample.toggle_group,
            sample.welcome_divider,
            sample.welcome_code,
        ]
    );
}

#[test]
fn create_page_with_unknown_parent_falls_back_to_root() {
    let (mut store, _sample) = WorkspaceStore::open_sample().unwrap();

    let page = store.create_page(Some(Uuid::now_v7())).unwrap();
    assert!(page.parent_uuid.is_none());
    assert_eq!(store.selected_page(), Some(page.uuid));
    assert_eq!(store.pages().unwrap().len(), 6);
}

#[test]
fn page_move_cycle_is_an_explicit_error() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();

    let err = store
        .move_page(sample.project_page, Some(sample.task_list_page))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::CycleDetected { page_uuid, parent_uuid }
            if page_uuid == sample.project_page && parent_uuid == sample.task_list_page
    ));
}
