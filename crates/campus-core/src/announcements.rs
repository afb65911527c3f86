// Announcement board: list, audience filter, and the compose form.

use std::sync::Arc;

use campus_api::models::{Announcement, AnnouncementAudience, NewAnnouncement, SchoolClass};
use campus_api::{AnnouncementId, CampusClient, ClassId};
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::fetch::{FetchOutcome, Resource};
use crate::lists::{ListItem, ListPage, Mutation};

impl ListItem for Announcement {
    type Id = AnnouncementId;

    fn id(&self) -> AnnouncementId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }
}

/// Filter tab. `None` shows everything; otherwise the audience must match.
pub fn filter_by_audience(
    items: &[Announcement],
    audience: Option<AnnouncementAudience>,
) -> Vec<&Announcement> {
    items
        .iter()
        .filter(|a| audience.is_none_or(|wanted| a.target_role == wanted))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementForm {
    pub title: String,
    pub message: String,
    pub target_role: AnnouncementAudience,
    pub target_class_id: Option<ClassId>,
}

impl AnnouncementForm {
    /// Class announcements need a class; other audiences drop it.
    pub fn payload(&self) -> Result<NewAnnouncement, CoreError> {
        let title = self.title.trim();
        let message = self.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(CoreError::invalid("Title and message are required"));
        }
        let target_class_id = match self.target_role {
            AnnouncementAudience::Class => Some(
                self.target_class_id
                    .ok_or_else(|| CoreError::invalid("Please select a class"))?,
            ),
            _ => None,
        };
        Ok(NewAnnouncement {
            title: title.to_owned(),
            message: message.to_owned(),
            target_role: self.target_role,
            target_class_id,
        })
    }
}

/// Announcements plus the class list for the audience picker.
pub struct AnnouncementBoard {
    list: ListPage<Announcement>,
    classes: Resource<Vec<SchoolClass>>,
}

impl AnnouncementBoard {
    pub fn new(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        let class_client = Arc::clone(&client);
        let classes = Resource::new(Vec::new(), owner.clone(), move || {
            let client = Arc::clone(&class_client);
            async move { client.list_classes().await.map_err(CoreError::from) }
        });
        Self {
            list: ListPage::new(client, owner, |client| async move {
                client.list_announcements().await
            }),
            classes,
        }
    }

    /// Fetch announcements and classes concurrently.
    pub async fn refresh(&self) -> (FetchOutcome, FetchOutcome) {
        tokio::join!(self.list.refresh(), self.classes.refetch())
    }

    pub fn list(&self) -> &ListPage<Announcement> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListPage<Announcement> {
        &mut self.list
    }

    pub fn classes(&self) -> &Resource<Vec<SchoolClass>> {
        &self.classes
    }

    pub async fn publish(&self, form: &AnnouncementForm) -> Result<(), CoreError> {
        let body = form.payload()?;
        let client = self.list.client();
        self.list
            .run_mutation(Mutation::Save, client.create_announcement(&body))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn announcement(id: u64, role: AnnouncementAudience) -> Announcement {
        Announcement {
            id: AnnouncementId(id),
            title: format!("Notice {id}"),
            message: "Body".into(),
            target_role: role,
            target_class_id: None,
            created_at: None,
            user: None,
        }
    }

    #[test]
    fn all_tab_shows_everything() {
        let items = vec![
            announcement(1, AnnouncementAudience::All),
            announcement(2, AnnouncementAudience::Teacher),
            announcement(3, AnnouncementAudience::Parent),
        ];
        assert_eq!(filter_by_audience(&items, None).len(), 3);

        let teachers: Vec<u64> = filter_by_audience(&items, Some(AnnouncementAudience::Teacher))
            .iter()
            .map(|a| a.id.get())
            .collect();
        assert_eq!(teachers, vec![2]);
    }

    #[test]
    fn class_audience_requires_class() {
        let mut form = AnnouncementForm {
            title: "Trip".into(),
            message: "Bring lunch".into(),
            target_role: AnnouncementAudience::Class,
            target_class_id: None,
        };
        assert_eq!(
            form.payload().unwrap_err().user_message(),
            "Please select a class"
        );

        form.target_class_id = Some(ClassId::from(4));
        assert_eq!(form.payload().unwrap().target_class_id, Some(ClassId::from(4)));

        form.target_role = AnnouncementAudience::Parent;
        assert_eq!(form.payload().unwrap().target_class_id, None);
    }
}
