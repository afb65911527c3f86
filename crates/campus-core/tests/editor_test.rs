#![allow(clippy::unwrap_used)]
// Hierarchy editor scenarios against a mocked backend.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus_api::models::Weekday;
use campus_api::{GradeKey, SectionId, SubjectId};
use campus_core::academics::{ModalPhase, SLOTS, ScheduleGrid};
use campus_core::{
    AcademicItem, Campus, ClientConfig, CoreError, FetchOutcome, HierarchyEditor, ModalKind,
    ScheduleDraft,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Campus) {
    let server = MockServer::start().await;
    let url = url::Url::parse(&format!("{}/api", server.uri())).unwrap();
    let campus = Campus::new(&ClientConfig::new(url)).unwrap();
    (server, campus)
}

fn ninth_grade() -> Value {
    json!({
        "name": "9th",
        "sections": [
            { "id": 12, "name": "A", "students_count": 1,
              "students": [{ "id": 1, "name": "Ada" }] },
            { "id": 13, "name": "B", "students_count": 0, "students": [] }
        ],
        "subjects": [{ "id": 3, "name": "Physics", "code": "PHY9" }]
    })
}

/// Serve `first` once, then `then` for every later hierarchy fetch.
async fn hierarchy_sequence(server: &MockServer, first: Value, then: Value) {
    Mock::given(method("GET"))
        .and(path("/api/academic-hierarchy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/academic-hierarchy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(then))
        .mount(server)
        .await;
}

async fn loaded_editor(campus: &Campus) -> HierarchyEditor {
    let mut editor = campus.hierarchy_editor();
    assert_eq!(editor.refresh().await, FetchOutcome::Applied);
    editor
}

// ── Hierarchy mutations ─────────────────────────────────────────────

#[tokio::test]
async fn test_add_grade_then_refetch_shows_it_once() {
    let (server, campus) = setup().await;
    hierarchy_sequence(
        &server,
        json!([ninth_grade()]),
        json!([ninth_grade(), { "name": "10th Grade", "sections": [], "subjects": [] }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/api/academic/grade"))
        .and(body_json(json!({ "name": "10th Grade" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "Grade created" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert_eq!(editor.grades().len(), 1);

    assert_ok!(editor.add_grade("  10th Grade ").await);

    let grades = editor.grades();
    let added = grades
        .iter()
        .filter(|g| g.name.as_str() == "10th Grade")
        .count();
    assert_eq!(added, 1);

    // New grade arrives collapsed; only the first grade is expanded.
    let tree = editor.tree();
    assert!(tree.is_grade_expanded(&GradeKey::from("9th")));
    assert!(!tree.is_grade_expanded(&GradeKey::from("10th Grade")));
}

#[tokio::test]
async fn test_blank_grade_name_never_reaches_server() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([]), json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/academic/grade"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    let err = editor.add_grade("   ").await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_delete_section_keeps_siblings_and_subjects() {
    let (server, campus) = setup().await;
    let mut after = ninth_grade();
    after["sections"] = json!([{ "id": 13, "name": "B", "students_count": 0, "students": [] }]);
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([after])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/academic/section/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert_eq!(editor.selection().section, Some(SectionId(12)));

    let grade = editor.grades()[0].clone();
    let item = AcademicItem::section(&grade, &grade.sections[0]);
    assert_ok!(editor.delete(&item).await);

    let grades = editor.grades();
    let grade = &grades[0];
    let ids: Vec<SectionId> = grade.sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SectionId(13)]);
    assert_eq!(grade.subjects.len(), 1);
    // The vanished selection falls back to the first remaining section.
    assert_eq!(editor.selection().section, Some(SectionId(13)));
}

#[tokio::test]
async fn test_rename_selected_grade_moves_selection() {
    let (server, campus) = setup().await;
    let mut renamed = ninth_grade();
    renamed["name"] = json!("Ninth");
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([renamed])).await;

    Mock::given(method("PUT"))
        .and(path("/api/academic/grade"))
        .and(body_json(json!({ "old_name": "9th", "new_name": "Ninth" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert_eq!(editor.selection().grade, Some(GradeKey::from("9th")));

    let item = AcademicItem::Grade {
        key: GradeKey::from("9th"),
    };
    assert_ok!(editor.update(&item, "Ninth").await);

    assert_eq!(editor.selection().grade, Some(GradeKey::from("Ninth")));
    assert_eq!(editor.selected_grade().unwrap().name.as_str(), "Ninth");
}

#[tokio::test]
async fn test_deleting_selected_grade_falls_back_to_first_grade() {
    let (server, campus) = setup().await;
    let tenth = json!({
        "name": "10th",
        "sections": [
            { "id": 21, "name": "A", "students_count": 0, "students": [] },
            { "id": 22, "name": "B", "students_count": 0, "students": [] }
        ],
        "subjects": []
    });
    hierarchy_sequence(&server, json!([ninth_grade(), tenth.clone()]), json!([tenth])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/academic/grade"))
        .and(body_json(json!({ "name": "9th" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert_eq!(editor.selection().grade, Some(GradeKey::from("9th")));
    assert_eq!(editor.selection().section, Some(SectionId(12)));

    let item = AcademicItem::Grade {
        key: GradeKey::from("9th"),
    };
    assert_ok!(editor.delete(&item).await);

    assert_eq!(editor.selection().grade, Some(GradeKey::from("10th")));
    assert_eq!(editor.selection().section, Some(SectionId(21)));
}

#[tokio::test]
async fn test_emptied_hierarchy_clears_selection() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/academic/grade"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert!(editor.selection().grade.is_some());

    let item = AcademicItem::Grade {
        key: GradeKey::from("9th"),
    };
    assert_ok!(editor.delete(&item).await);

    assert!(editor.grades().is_empty());
    assert_eq!(editor.selection().grade, None);
    assert_eq!(editor.selection().section, None);
    assert!(editor.selected_grade().is_none());
}

#[tokio::test]
async fn test_rejected_mutation_keeps_state_and_headlines_error() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/academic-hierarchy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ninth_grade()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/academic/grade"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The name has already been taken.",
            "errors": { "name": ["The name has already been taken."] }
        })))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    let err = editor.add_grade("9th").await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Failed to add grade: The name has already been taken."
    );
    assert_eq!(editor.grades().len(), 1);
}

#[tokio::test]
async fn test_subject_delete_is_scoped_to_grade() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([ninth_grade()])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/academic/grade-subject"))
        .and(body_json(json!({ "grade_name": "9th", "subject_id": 3 })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "" })))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    let grade = editor.grades()[0].clone();
    let item = AcademicItem::subject(&grade, &grade.subjects[0]);
    let err = editor.delete(&item).await.unwrap_err();
    assert_eq!(err.user_message(), "Deletion failed: Something went wrong");
}

// ── Search & fetch state ────────────────────────────────────────────

#[tokio::test]
async fn test_search_matches_grade_or_section() {
    let (server, campus) = setup().await;
    hierarchy_sequence(
        &server,
        json!([
            ninth_grade(),
            { "name": "10th", "sections": [{ "id": 20, "name": "Science Stream" }], "subjects": [] }
        ]),
        json!([]),
    )
    .await;

    let mut editor = loaded_editor(&campus).await;
    editor.set_search("science");
    let names: Vec<String> = editor
        .filtered_grades()
        .iter()
        .map(|g| g.name.to_string())
        .collect();
    assert_eq!(names, vec!["10th"]);

    editor.set_search("PHYSICS");
    assert!(editor.filtered_grades().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_sets_error_and_keeps_data() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/academic-hierarchy"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden area" })))
        .mount(&server)
        .await;

    let mut editor = campus.hierarchy_editor();
    assert!(editor.hierarchy().is_loading());
    assert_eq!(editor.refresh().await, FetchOutcome::Failed);

    let state = editor.hierarchy().snapshot();
    assert!(!state.loading);
    assert!(state.data.is_empty());
    assert_eq!(state.error.as_deref(), Some("Forbidden area"));
}

// ── Schedule ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_calendar_renders_single_populated_cell() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([ninth_grade()])).await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .and(query_param("class_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5, "subject_id": 3, "subject": { "name": "Physics" },
            "day_of_week": "Monday", "start_time": "08:00:00", "end_time": "09:30:00",
            "room": null, "class_id": 12
        }])))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    editor.show_calendar().await;

    let entries = editor.schedule().data();
    let grid = ScheduleGrid::new(&entries);
    assert_eq!(grid.populated_cells(), 1);
    let cell = grid.cell(Weekday::Monday, &SLOTS[0]).unwrap();
    assert_eq!(cell.subject_name(), "Physics");
    assert_eq!(cell.room_label(), "No Room");

    let rendered: Vec<String> = grid
        .rows()
        .iter()
        .map(|(slot, cells)| {
            let marks: String = cells
                .iter()
                .map(|c| if c.is_some() { 'X' } else { '.' })
                .collect();
            format!("{} {marks}", slot.label())
        })
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    08:00 - 09:30 X....
    09:45 - 11:15 .....
    11:30 - 13:00 .....
    14:00 - 15:30 .....
    15:45 - 17:15 .....
    ");
}

#[tokio::test]
async fn test_add_schedule_entry_validates_before_posting() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([ninth_grade()])).await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5, "subject_id": 3, "day_of_week": "Monday",
            "start_time": "08:00:00", "end_time": "09:30:00", "class_id": 12
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/schedules"))
        .and(body_json(json!({
            "subject_id": 3, "day_of_week": "Tuesday", "start_time": "09:45",
            "end_time": "11:15", "room": "Lab 2", "class_id": 12
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    editor.show_calendar().await;

    let err = editor
        .add_schedule_entry(&ScheduleDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Please select a subject");

    let clash = ScheduleDraft {
        subject_id: Some(SubjectId(3)),
        ..ScheduleDraft::default()
    };
    let err = editor.add_schedule_entry(&clash).await.unwrap_err();
    assert_eq!(err.user_message(), "That timeslot is already taken");

    let ok = ScheduleDraft {
        subject_id: Some(SubjectId(3)),
        room: "Lab 2".into(),
        ..ScheduleDraft::in_slot(Weekday::Tuesday, &SLOTS[1])
    };
    assert_ok!(editor.add_schedule_entry(&ok).await);
}

#[tokio::test]
async fn test_cycle_section_reloads_schedule() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([ninth_grade()])).await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .and(query_param("class_id", "13"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .and(query_param("class_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    editor.show_calendar().await;
    assert_ok!(editor.cycle_section(true).await);
    assert_eq!(editor.selection().section, Some(SectionId(13)));
}

// ── Modal flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_modal_failure_stays_open_with_message() {
    let (server, campus) = setup().await;
    hierarchy_sequence(&server, json!([ninth_grade()]), json!([ninth_grade()])).await;
    Mock::given(method("POST"))
        .and(path("/api/academic/section"))
        .and(body_json(json!({ "grade_name": "9th", "section": "C" })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Section exists" })))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&campus).await;
    assert_ok!(editor.open_modal(ModalKind::add_section(GradeKey::from("9th"))));
    assert_err!(editor.open_modal(ModalKind::add_grade()));

    if let Some(ModalKind::AddSection { name, .. }) = editor.modal_fields() {
        *name = "C".into();
    }
    assert_err!(editor.submit_modal().await);

    let modal = editor.modal().unwrap();
    assert_eq!(
        modal.phase,
        ModalPhase::Failed("Failed to add section: Section exists".into())
    );

    editor.close_modal();
    assert!(editor.modal().is_none());
}
