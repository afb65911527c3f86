#![allow(clippy::unwrap_used)]
// List pages, attendance and announcements against a mocked backend.

use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus_api::models::{AnnouncementAudience, AttendanceStatus, FeedbackKind};
use campus_api::{ClassId, FeedbackId, StudentId, TeacherId};
use campus_core::announcements::AnnouncementForm;
use campus_core::lists::{FeedbackForm, TeacherForm};
use campus_core::{Campus, ClientConfig, FetchOutcome};

async fn setup() -> (MockServer, Campus) {
    let server = MockServer::start().await;
    let url = url::Url::parse(&format!("{}/api", server.uri())).unwrap();
    (server, Campus::new(&ClientConfig::new(url)).unwrap())
}

fn teacher_json(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user": { "name": name, "email": format!("{}@school.test", name.to_lowercase()) },
        "assignments": []
    })
}

// ── Teachers ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_teacher_list_search_and_failed_save() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            teacher_json(1, "Grace"),
            teacher_json(2, "Alan"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The email has already been taken."
        })))
        .mount(&server)
        .await;

    let mut page = campus.teachers();
    assert_eq!(page.refresh().await, FetchOutcome::Applied);
    page.set_search("ALAN");
    let hits = page.filtered();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, TeacherId(2));

    let form = TeacherForm {
        name: "Alan".into(),
        email: "alan@school.test".into(),
        password: "secret".into(),
        ..TeacherForm::default()
    };
    let err = page.create(&form.payload(true).unwrap()).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Operation failed: The email has already been taken."
    );
}

#[tokio::test]
async fn test_teacher_delete_refetches() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([teacher_json(1, "Grace")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teachers/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let page = campus.teachers();
    page.refresh().await;
    assert_eq!(page.items().len(), 1);
    assert_ok!(page.delete(TeacherId(1)).await);
    assert!(page.items().is_empty());
}

#[tokio::test]
async fn test_student_delete_failure_is_headlined() {
    let (server, campus) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/students/4"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Student not found" })))
        .mount(&server)
        .await;

    let page = campus.students();
    let err = page.delete(StudentId(4)).await.unwrap_err();
    assert_eq!(err.user_message(), "Delete failed: Student not found");
}

// ── Parents ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_parents_and_students_load_concurrently() {
    let (server, campus) = setup().await;
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
        .and(path("/api/parents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 1, "user": { "name": "Pat" }, "students": [] }]))
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 7, "user": { "name": "Kid" } }]))
                .set_delay(delay),
        )
        .mount(&server)
        .await;

    let page = campus.parents();
    let started = std::time::Instant::now();
    let (parents, students) = page.refresh().await;
    let elapsed = started.elapsed();

    assert_eq!(parents, FetchOutcome::Applied);
    assert_eq!(students, FetchOutcome::Applied);
    assert_eq!(page.list().items().len(), 1);
    assert_eq!(page.students().data()[0].id, StudentId(7));
    assert!(elapsed < delay * 2, "fetches ran sequentially: {elapsed:?}");
}

// ── Feedback ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_feedback_send_and_mark_read() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/feedback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "message": "Projector broken", "type": "bug", "is_read": false },
            { "id": 2, "message": "Thanks", "type": "feedback", "is_read": true }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .and(body_json(json!({ "message": "More labs", "type": "suggestion" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/feedback/1"))
        .and(body_json(json!({ "is_read": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let board = campus.feedback();
    board.refresh().await;
    assert_eq!(board.unread_count(), 1);

    let form = FeedbackForm {
        message: " More labs ".into(),
        kind: FeedbackKind::Suggestion,
    };
    assert_ok!(board.send(&form).await);
    assert_ok!(board.mark_read(FeedbackId(1)).await);
}

// ── Announcements ───────────────────────────────────────────────────

#[tokio::test]
async fn test_announcement_publish_sends_audience() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/classes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "9th", "section": "A" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/announcements"))
        .and(body_json(json!({
            "title": "Trip", "message": "Bring lunch",
            "target_role": "class", "target_class_id": 3
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let board = campus.announcements();
    board.refresh().await;
    assert_eq!(board.classes().data()[0].label(), "9th A");

    let form = AnnouncementForm {
        title: "Trip".into(),
        message: "Bring lunch".into(),
        target_role: AnnouncementAudience::Class,
        target_class_id: Some(ClassId::from(3)),
    };
    assert_ok!(board.publish(&form).await);
}

// ── Attendance ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_attendance_roster_defaults_to_present_and_submits() {
    let (server, campus) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/classes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "9th", "section": "A" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/classes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "9th", "section": "A",
            "students": [
                { "id": 11, "user": { "name": "Ada" } },
                { "id": 12, "user": { "name": "Alan" } }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/attendance"))
        .and(body_json(json!({
            "class_id": 3,
            "date": "2024-09-02",
            "records": [
                { "student_id": 11, "status": "present" },
                { "student_id": 12, "status": "absent" }
            ]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut desk = campus.attendance();
    desk.refresh().await;
    assert_eq!(desk.classes().data().len(), 1);

    let day = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    desk.open_class(ClassId::from(3), day).await.unwrap();
    let sheet = desk.sheet_mut().unwrap();
    assert_eq!(sheet.count(AttendanceStatus::Present), 2);
    sheet.mark(StudentId(12), AttendanceStatus::Absent).unwrap();

    assert_ok!(desk.submit().await);
}
