// Headline counts for the landing screen.

use campus_api::CampusClient;
use campus_api::models::Role;
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teachers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<usize>,
    pub announcements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_feedback: Option<usize>,
}

impl DashboardSummary {
    /// Admins get people and inbox counts; everyone else only announcements.
    pub async fn load(client: &CampusClient, role: Role) -> Result<Self, CoreError> {
        if role != Role::Admin {
            let announcements = client.list_announcements().await?;
            return Ok(Self {
                announcements: announcements.len(),
                ..Self::default()
            });
        }

        let (teachers, students, parents, announcements, feedback) = tokio::try_join!(
            client.list_teachers(),
            client.list_students(),
            client.list_parents(),
            client.list_announcements(),
            client.list_feedback(),
        )?;
        debug!(
            teachers = teachers.len(),
            students = students.len(),
            parents = parents.len(),
            "dashboard counts loaded"
        );
        Ok(Self {
            teachers: Some(teachers.len()),
            students: Some(students.len()),
            parents: Some(parents.len()),
            announcements: announcements.len(),
            unread_feedback: Some(feedback.iter().filter(|f| !f.is_read).count()),
        })
    }
}
