// ── Generic list page ──
//
// A fetched list, a search string, and mutations that refetch on success.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use campus_api::CampusClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::fetch::{FetchOutcome, FetchState, Resource};

/// A record shown on a list page.
pub trait ListItem: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Display + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
    }
}

/// Which kind of write failed, for the alert headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Save,
    Delete,
}

impl Mutation {
    pub fn headline(self) -> &'static str {
        match self {
            Self::Save => "Operation failed",
            Self::Delete => "Delete failed",
        }
    }
}

pub struct ListPage<T: ListItem> {
    client: Arc<CampusClient>,
    resource: Resource<Vec<T>>,
    search: String,
}

impl<T: ListItem> ListPage<T> {
    /// Build a page whose list comes from `fetch`.
    pub fn new<F, Fut>(client: Arc<CampusClient>, owner: &CancellationToken, fetch: F) -> Self
    where
        F: Fn(Arc<CampusClient>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, campus_api::Error>> + Send + 'static,
    {
        let loader_client = Arc::clone(&client);
        let resource = Resource::new(Vec::new(), owner.clone(), move || {
            let request = fetch(Arc::clone(&loader_client));
            async move { request.await.map_err(CoreError::from) }
        });
        Self {
            client,
            resource,
            search: String::new(),
        }
    }

    pub fn client(&self) -> &Arc<CampusClient> {
        &self.client
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.resource.refetch().await
    }

    pub fn resource(&self) -> &Resource<Vec<T>> {
        &self.resource
    }

    pub fn snapshot(&self) -> FetchState<Vec<T>> {
        self.resource.snapshot()
    }

    pub fn items(&self) -> Arc<Vec<T>> {
        self.resource.data()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Items matching the search string.
    pub fn filtered(&self) -> Vec<T> {
        self.resource
            .data()
            .iter()
            .filter(|item| item.matches(&self.search))
            .cloned()
            .collect()
    }

    pub fn find(&self, id: T::Id) -> Option<T> {
        self.resource.data().iter().find(|i| i.id() == id).cloned()
    }

    /// Await `request`; refetch on success, headline the error on failure.
    pub async fn run_mutation<Fut>(&self, kind: Mutation, request: Fut) -> Result<(), CoreError>
    where
        Fut: Future<Output = Result<(), campus_api::Error>>,
    {
        if let Err(e) = request.await {
            let err = CoreError::from(e).in_action(kind.headline());
            warn!(error = %err, "list mutation failed");
            return Err(err);
        }
        info!(?kind, "list mutation applied");
        self.refresh().await;
        Ok(())
    }
}

// ── Resource-backed CRUD ─────────────────────────────────────────────

/// Records with full create/update/delete endpoints.
pub trait Crud: ListItem {
    type Payload: Send + Sync;

    fn list(client: &CampusClient)
    -> impl Future<Output = Result<Vec<Self>, campus_api::Error>> + Send;

    fn create(
        client: &CampusClient,
        payload: &Self::Payload,
    ) -> impl Future<Output = Result<(), campus_api::Error>> + Send;

    fn update(
        client: &CampusClient,
        id: Self::Id,
        payload: &Self::Payload,
    ) -> impl Future<Output = Result<(), campus_api::Error>> + Send;

    fn delete(
        client: &CampusClient,
        id: Self::Id,
    ) -> impl Future<Output = Result<(), campus_api::Error>> + Send;
}

impl<T: Crud> ListPage<T> {
    pub fn crud(client: Arc<CampusClient>, owner: &CancellationToken) -> Self {
        Self::new(client, owner, |client| async move { T::list(&client).await })
    }

    pub async fn create(&self, payload: &T::Payload) -> Result<(), CoreError> {
        self.run_mutation(Mutation::Save, T::create(&self.client, payload))
            .await
    }

    pub async fn update(&self, id: T::Id, payload: &T::Payload) -> Result<(), CoreError> {
        self.run_mutation(Mutation::Save, T::update(&self.client, id, payload))
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), CoreError> {
        self.run_mutation(Mutation::Delete, T::delete(&self.client, id))
            .await
    }
}

/// Blank or whitespace fields fail with `"<label> is required"`.
pub(crate) fn require_field(value: &str, label: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(format!("{label} is required")));
    }
    Ok(trimmed.to_owned())
}

/// `None` for a blank password so updates keep the stored one.
pub(crate) fn optional_password(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
