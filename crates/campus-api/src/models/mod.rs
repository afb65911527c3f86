// Response and request types for the campus REST API.
//
// Field names follow the backend's snake_case JSON. Relations the backend
// only sometimes eager-loads are `Option` with `#[serde(default)]`.

mod academic;
mod comms;
mod people;
mod user;

pub use academic::{
    Grade, NewScheduleEntry, ScheduleEntry, Section, SectionStudent, Subject, SubjectRef, Weekday,
};
pub use comms::{
    Announcement, AnnouncementAudience, AttendanceRecord, AttendanceStatus, AttendanceSubmission,
    Feedback, FeedbackKind, NewAnnouncement,
};
pub use people::{
    AssignmentPayload, CatalogSubject, ClassRef, ParentPayload, ParentRecord, SchoolClass,
    StudentPayload, StudentRecord, TeacherAssignment, TeacherPayload, TeacherRecord,
};
pub use user::{LoginResponse, Preferences, ProfileResponse, Role, User, UserRef};
