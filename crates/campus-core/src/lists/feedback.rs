use std::sync::Arc;

use campus_api::models::{Feedback, FeedbackKind};
use campus_api::{CampusClient, FeedbackId};
use tokio_util::sync::CancellationToken;

use super::page::{ListItem, ListPage, Mutation};
use crate::error::CoreError;
use crate::fetch::FetchOutcome;

impl ListItem for Feedback {
    type Id = FeedbackId;

    fn id(&self) -> FeedbackId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.message.as_str(), self.author()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub message: String,
    pub kind: FeedbackKind,
}

impl FeedbackForm {
    pub fn validate(&self) -> Result<(&str, FeedbackKind), CoreError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(CoreError::invalid("Message is required"));
        }
        Ok((message, self.kind))
    }
}

/// Feedback inbox: everyone can submit, admins read and delete.
pub struct FeedbackBoard {
    list: ListPage<Feedback>,
}

impl FeedbackBoard {
    pub fn new(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        Self {
            list: ListPage::new(client, owner, |client| async move {
                client.list_feedback().await
            }),
        }
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.list.refresh().await
    }

    pub fn list(&self) -> &ListPage<Feedback> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListPage<Feedback> {
        &mut self.list
    }

    pub fn unread_count(&self) -> usize {
        self.list.items().iter().filter(|f| !f.is_read).count()
    }

    pub async fn send(&self, form: &FeedbackForm) -> Result<(), CoreError> {
        let (message, kind) = form.validate()?;
        let client = self.list.client();
        self.list
            .run_mutation(Mutation::Save, client.send_feedback(message, kind))
            .await
    }

    pub async fn mark_read(&self, id: FeedbackId) -> Result<(), CoreError> {
        let client = self.list.client();
        self.list
            .run_mutation(Mutation::Save, client.mark_feedback_read(id))
            .await
    }

    pub async fn delete(&self, id: FeedbackId) -> Result<(), CoreError> {
        let client = self.list.client();
        self.list
            .run_mutation(Mutation::Delete, client.delete_feedback(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_is_rejected() {
        let form = FeedbackForm {
            message: "   ".into(),
            kind: FeedbackKind::Bug,
        };
        assert!(form.validate().is_err());
    }
}
