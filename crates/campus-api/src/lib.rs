// campus-api: Async Rust client for the campus school-management REST API

pub mod client;
pub mod error;
pub mod ids;
pub mod models;
pub mod transport;

// Endpoint groups, implemented as inherent methods on `CampusClient`.
mod academics;
mod announcements;
mod auth;
mod classes;
mod feedback;
mod people;
mod profile;

pub use client::CampusClient;
pub use error::Error;
pub use ids::{
    AnnouncementId, ClassId, FeedbackId, GradeKey, ParentId, ScheduleId, SectionId, StudentId,
    SubjectId, TeacherId, UserId,
};
pub use transport::TransportConfig;
