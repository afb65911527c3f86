// Feedback endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::ids::FeedbackId;
use crate::models::{Feedback, FeedbackKind};

impl CampusClient {
    /// Admins see every message; everyone else sees their own.
    ///
    /// `GET /feedback`
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, Error> {
        self.get("feedback").await
    }

    /// `POST /feedback` with `{message, type}`
    pub async fn send_feedback(&self, message: &str, kind: FeedbackKind) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            message: &'a str,
            #[serde(rename = "type")]
            kind: FeedbackKind,
        }

        debug!(%kind, "sending feedback");
        self.post_no_response("feedback", &Body { message, kind })
            .await
    }

    /// `PUT /feedback/{id}` with `{is_read: true}`
    pub async fn mark_feedback_read(&self, id: FeedbackId) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            is_read: bool,
        }

        debug!(%id, "marking feedback read");
        self.put_no_response(&format!("feedback/{id}"), &Body { is_read: true })
            .await
    }

    /// `DELETE /feedback/{id}`
    pub async fn delete_feedback(&self, id: FeedbackId) -> Result<(), Error> {
        debug!(%id, "deleting feedback");
        self.delete(&format!("feedback/{id}")).await
    }
}
