// Announcement endpoints

use tracing::debug;

use crate::client::CampusClient;
use crate::error::Error;
use crate::models::{Announcement, NewAnnouncement};

impl CampusClient {
    /// `GET /announcements`
    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, Error> {
        self.get("announcements").await
    }

    /// `POST /announcements`
    pub async fn create_announcement(&self, body: &NewAnnouncement) -> Result<(), Error> {
        debug!(title = %body.title, audience = %body.target_role, "broadcasting announcement");
        self.post_no_response("announcements", body).await
    }
}
