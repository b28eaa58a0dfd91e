use std::sync::Arc;

use quire_core::{
    BlogDetail, BlogId, BlogInput, BlogSummary, Credentials, DraftKey, KeyValueStore, LikeCounts,
    Registration, Session, Validator, ViewCounts,
};

use crate::api::BlogApi;
use crate::collection::BlogCollectionStore;
use crate::current::CurrentBlogStore;
use crate::drafts::DraftStore;
use crate::error::ClientError;
use crate::session::SessionStore;
use crate::state::Epoch;

/// Client behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Refetch the listing when an updated blog is not part of it.
    pub refetch_on_missing_after_update: bool,
}

/// Entry point for the UI: owns the stores and drives the API.
///
/// Every operation settles into the stores before returning. Store locks
/// are never held across an await.
pub struct BlogClient<A: BlogApi, K: KeyValueStore> {
    api: Arc<A>,
    config: ClientConfig,
    session: SessionStore<K>,
    blogs: BlogCollectionStore,
    current: CurrentBlogStore,
    drafts: DraftStore<K>,
}

impl<A: BlogApi, K: KeyValueStore> BlogClient<A, K> {
    pub fn new(api: Arc<A>, storage: Arc<K>, config: ClientConfig) -> Self {
        Self {
            api,
            config,
            session: SessionStore::new(storage.clone()),
            blogs: BlogCollectionStore::new(),
            current: CurrentBlogStore::new(),
            drafts: DraftStore::new(storage),
        }
    }

    pub fn config(&self) -> ClientConfig {
        self.config
    }

    pub fn session(&self) -> &SessionStore<K> {
        &self.session
    }

    pub fn blogs(&self) -> &BlogCollectionStore {
        &self.blogs
    }

    pub fn current(&self) -> &CurrentBlogStore {
        &self.current
    }

    pub fn drafts(&self) -> &DraftStore<K> {
        &self.drafts
    }

    /// Pick up a token persisted by an earlier run.
    pub fn restore_session(&self) -> Result<bool, ClientError> {
        Ok(self.session.restore()?)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let result = match Validator::validate_credentials(credentials) {
            Ok(()) => {
                self.session.begin();
                self.api.login(credentials).await
            }
            Err(e) => Err(e.into()),
        };
        self.settle_auth(result)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        let result = match Validator::validate_registration(registration) {
            Ok(()) => {
                self.session.begin();
                self.api.register(registration).await
            }
            Err(e) => Err(e.into()),
        };
        self.settle_auth(result)
    }

    // Last login or register to settle wins.
    fn settle_auth(&self, result: Result<Session, ClientError>) -> Result<Session, ClientError> {
        match result {
            Ok(session) => {
                tracing::info!(user = %session.user_id, role = %session.role, "Logged in");
                self.session.establish(session.clone());
                Ok(session)
            }
            Err(e) => {
                let err = e.into_auth();
                tracing::debug!("Authentication failed: {}", err);
                self.session.fail(&err);
                Err(err)
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("Logged out");
    }

    /// Replace the listing with the server's. A response that arrives after
    /// a newer fetch started is returned but not applied.
    pub async fn fetch_all(&self) -> Result<Vec<BlogSummary>, ClientError> {
        let ticket = self.blogs.begin_fetch();
        let result = self.api.list_blogs().await;

        if !self.blogs.finish_fetch(ticket, result.as_deref()) {
            tracing::debug!("Discarded superseded blog listing");
        }
        result
    }

    /// Load one blog into the current slot. An invalid id fails the slot
    /// without a request.
    pub async fn fetch_one(&self, id: &BlogId) -> Result<BlogDetail, ClientError> {
        let ticket = self.current.begin_fetch(id);
        let result = match Validator::validate_blog_id(id) {
            Ok(()) => self.api.get_blog(id).await.and_then(|detail| {
                if detail.id() == id {
                    Ok(detail)
                } else {
                    Err(ClientError::NotFound(format!(
                        "asked for blog {} but received {}",
                        id,
                        detail.id()
                    )))
                }
            }),
            Err(e) => Err(e.into()),
        };

        if !self.current.finish_fetch(ticket, result.as_ref()) {
            tracing::debug!(blog = %id, "Discarded superseded blog");
        }
        result
    }

    pub fn clear_current(&self) {
        self.current.clear();
    }

    pub async fn create(&self, input: &BlogInput) -> Result<BlogSummary, ClientError> {
        let epoch = self.blogs.epoch();
        let detail = self.record(epoch, self.try_create(input).await)?;

        let summary = detail.summary;
        self.blogs.insert_front(epoch, summary.clone());
        self.blogs.set_notice(epoch, "Blog created");
        tracing::info!(blog = %summary.id, "Created blog");
        Ok(summary)
    }

    async fn try_create(&self, input: &BlogInput) -> Result<BlogDetail, ClientError> {
        let token = self.session.require_token()?;
        let input = input.clone().trimmed();
        Validator::validate_blog_input(&input)?;
        self.api.create_blog(&token, &input).await
    }

    pub async fn update(&self, id: &BlogId, patch: &BlogInput) -> Result<BlogSummary, ClientError> {
        let epoch = self.blogs.epoch();
        let current_mark = self.current.mark();
        let detail = self.record(epoch, self.try_update(id, patch).await)?;

        let summary = detail.summary.clone();
        let found = self.blogs.replace(epoch, summary.clone());
        if !self.current.replace(current_mark, detail) {
            tracing::debug!(blog = %summary.id, "Current blog changed during update");
        }
        self.blogs.set_notice(epoch, "Blog updated");
        tracing::info!(blog = %summary.id, "Updated blog");

        if !found && self.blogs.epoch() == epoch {
            if self.config.refetch_on_missing_after_update {
                if let Err(e) = self.fetch_all().await {
                    tracing::warn!("Refetch after update failed: {}", e);
                }
            } else {
                tracing::debug!(blog = %summary.id, "Updated blog is not in the listing");
            }
        }

        Ok(summary)
    }

    async fn try_update(&self, id: &BlogId, patch: &BlogInput) -> Result<BlogDetail, ClientError> {
        let token = self.session.require_token()?;
        Validator::validate_blog_id(id)?;
        let patch = patch.clone().trimmed();
        Validator::validate_blog_input(&patch)?;
        self.api.update_blog(&token, id, &patch).await
    }

    pub async fn delete(&self, id: &BlogId) -> Result<(), ClientError> {
        let epoch = self.blogs.epoch();
        let current_epoch = self.current.epoch();
        self.record(epoch, self.try_delete(id).await)?;

        self.blogs.remove(epoch, id);
        self.current.remove_if(current_epoch, id);
        self.blogs.set_notice(epoch, "Blog deleted");
        tracing::info!(blog = %id, "Deleted blog");
        Ok(())
    }

    async fn try_delete(&self, id: &BlogId) -> Result<(), ClientError> {
        let token = self.session.require_token()?;
        Validator::validate_blog_id(id)?;
        self.api.delete_blog(&token, id).await
    }

    /// Like a blog. Every call is a new like; the server owns the count.
    pub async fn like(&self, id: &BlogId) -> Result<LikeCounts, ClientError> {
        let epoch = self.blogs.epoch();
        let current_epoch = self.current.epoch();
        let counts = self.record(epoch, self.try_like(id).await)?;

        self.blogs.apply_likes(epoch, &counts);
        self.current.apply_likes(current_epoch, &counts);
        Ok(counts)
    }

    async fn try_like(&self, id: &BlogId) -> Result<LikeCounts, ClientError> {
        let token = self.session.require_token()?;
        Validator::validate_blog_id(id)?;
        self.api.like_blog(&token, id).await
    }

    /// Count a view. Failures are returned but not recorded in the stores.
    pub async fn increment_view(&self, id: &BlogId) -> Result<ViewCounts, ClientError> {
        let epoch = self.blogs.epoch();
        let current_epoch = self.current.epoch();
        Validator::validate_blog_id(id)?;

        let counts = self.api.increment_view(id).await.inspect_err(|e| {
            tracing::debug!(blog = %id, "View not counted: {}", e);
        })?;

        self.blogs.apply_views(epoch, &counts);
        self.current.apply_views(current_epoch, &counts);
        Ok(counts)
    }

    /// Submit the editor: create for a new post, update otherwise. The draft
    /// is cleared only once the server has accepted the blog.
    pub async fn publish(&self, key: &DraftKey, input: &BlogInput) -> Result<BlogSummary, ClientError> {
        let summary = match key {
            DraftKey::NewPost => self.create(input).await?,
            DraftKey::Blog(id) => self.update(id, input).await?,
        };

        if let Err(e) = self.drafts.clear_draft(key) {
            tracing::warn!(draft = %key, "Published but the draft could not be cleared: {}", e);
        }
        Ok(summary)
    }

    /// Empty the blog stores and drop every response still in flight.
    pub fn reset(&self) {
        self.blogs.reset();
        self.current.reset();
    }

    fn record<T>(&self, epoch: Epoch, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            self.blogs.record_error(epoch, e);
        }
        result
    }
}
