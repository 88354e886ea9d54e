use quantum_core::{
    BlockPatch, CalendarEventPatch, RoadmapTaskPatch, TaskStatus, ViewTarget, WorkspaceStore,
};
use uuid::Uuid;

#[test]
fn open_starts_with_no_selection() {
    let store = WorkspaceStore::open("Scratch").unwrap();
    assert!(store.selection().is_none());
    assert!(store.selected_page().is_none());
    assert!(store.selected_template().is_none());
    assert_eq!(store.workspace().unwrap().name, "Scratch");
}

#[test]
fn create_page_moves_selection_to_it() {
    let mut store = WorkspaceStore::open("Scratch").unwrap();
    store.select_template("template-roadmap");

    let page = store.create_page(None).unwrap();
    assert_eq!(store.selection(), Some(ViewTarget::Page(page.uuid)));
    assert!(store.selected_template().is_none());
}

#[test]
fn page_and_template_selection_are_mutually_exclusive() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();
    assert_eq!(store.selected_page(), Some(sample.welcome_page));

    store.select_template("template-calendar");
    assert_eq!(store.selected_template(), Some("template-calendar"));
    assert!(store.selected_page().is_none());

    store.select_page(sample.resources_page).unwrap();
    assert_eq!(store.selected_page(), Some(sample.resources_page));
    assert!(store.selected_template().is_none());
}

#[test]
fn selecting_unknown_targets_keeps_the_cursor() {
    let (mut store, sample) = WorkspaceStore::open_sample().unwrap();
    let before = store.selection();
    assert_eq!(before, Some(ViewTarget::Page(sample.welcome_page)));

    store.select_page(Uuid::now_v7()).unwrap();
    assert_eq!(store.selection(), before);

    store.select_template("template-unknown");
    assert_eq!(store.selection(), before);
}

#[test]
fn deleting_the_selected_page_falls_back_to_first_remaining() {
    let mut store = WorkspaceStore::open("Scratch").unwrap();
    let first = store.create_page(None).unwrap();
    let second = store.create_page(None).unwrap();
    assert_eq!(store.selected_page(), Some(second.uuid));

    store.delete_page(second.uuid).unwrap();
    assert_eq!(store.selected_page(), Some(first.uuid));

    store.delete_page(first.uuid).unwrap();
    assert!(store.selection().is_none());
}

#[test]
fn deleting_an_unselected_page_keeps_the_cursor() {
    let mut store = WorkspaceStore::open("Scratch").unwrap();
    let first = store.create_page(None).unwrap();
    let second = store.create_page(None).unwrap();

    store.select_page(first.uuid).unwrap();
    store.delete_page(second.uuid).unwrap();
    assert_eq!(store.selected_page(), Some(first.uuid));
}

#[test]
fn template_selection_survives_page_deletion() {
    let mut store = WorkspaceStore::open("Scratch").unwrap();
    let page = store.create_page(None).unwrap();
    store.select_template("template-roadmap");

    store.delete_page(page.uuid).unwrap();
    assert_eq!(store.selected_template(), Some("template-roadmap"));
}

#[test]
fn rename_workspace_updates_the_singleton() {
    let mut store = WorkspaceStore::open("Scratch").unwrap();
    store.rename_workspace("Quantum Labs").unwrap();
    assert_eq!(store.workspace().unwrap().name, "Quantum Labs");
}

#[test]
fn template_catalog_is_exposed_read_only() {
    let store = WorkspaceStore::open("Scratch").unwrap();
    let templates = store.templates();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].id, "template-roadmap");
    assert_eq!(templates[1].id, "template-calendar");
}

#[test]
fn unknown_id_mutations_leave_every_collection_unchanged() {
    let (mut store, _sample) = WorkspaceStore::open_sample().unwrap();

    let pages_before = store.pages().unwrap();
    let blocks_before = store.blocks().unwrap();
    let tasks_before = store.roadmap_tasks().unwrap();
    let events_before = store.calendar_events().unwrap();
    let selection_before = store.selection();

    let ghost = Uuid::now_v7();
    store.rename_page(ghost, "ghost").unwrap();
    store.set_page_icon(ghost, "👻").unwrap();
    store.toggle_page_expansion(ghost).unwrap();
    store.move_page(ghost, None).unwrap();
    store.delete_page(ghost).unwrap();
    store
        .update_block(
            ghost,
            &BlockPatch {
                content: Some("ghost".to_string()),
                ..BlockPatch::default()
            },
        )
        .unwrap();
    store.delete_block(ghost).unwrap();
    store.toggle_block_expansion(ghost).unwrap();
    store
        .update_roadmap_task(
            ghost,
            &RoadmapTaskPatch {
                progress: Some(99),
                ..RoadmapTaskPatch::default()
            },
        )
        .unwrap();
    store.change_task_status(ghost, TaskStatus::Completed).unwrap();
    store.delete_roadmap_task(ghost).unwrap();
    store
        .update_calendar_event(
            ghost,
            &CalendarEventPatch {
                title: Some("ghost".to_string()),
                ..CalendarEventPatch::default()
            },
        )
        .unwrap();
    store.delete_calendar_event(ghost).unwrap();

    assert_eq!(store.pages().unwrap(), pages_before);
    assert_eq!(store.blocks().unwrap(), blocks_before);
    assert_eq!(store.roadmap_tasks().unwrap(), tasks_before);
    assert_eq!(store.calendar_events().unwrap(), events_before);
    assert_eq!(store.selection(), selection_before);
}
