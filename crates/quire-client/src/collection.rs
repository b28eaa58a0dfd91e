use std::collections::HashSet;

use parking_lot::RwLock;

use quire_core::{BlogId, BlogSummary, LikeCounts, ViewCounts};

use crate::error::ClientError;
use crate::state::{Epoch, Generation, LoadState, Ticket};

#[derive(Debug, Default)]
struct CollectionState {
    blogs: Vec<BlogSummary>,
    status: LoadState,
    error: Option<String>,
    notice: Option<String>,
    generation: Generation,
}

/// Client-side cache of the blog listing, newest first.
///
/// Ids are unique within the collection. Results of superseded fetches and
/// of anything started before a reset are discarded.
#[derive(Debug, Default)]
pub struct BlogCollectionStore {
    state: RwLock<CollectionState>,
}

impl BlogCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&self) -> Ticket {
        let mut state = self.state.write();
        state.status = LoadState::Loading;
        state.error = None;
        state.generation.issue()
    }

    /// Apply a fetch result. Returns false if the ticket was superseded.
    pub fn finish_fetch(&self, ticket: Ticket, result: Result<&[BlogSummary], &ClientError>) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_current(ticket) {
            return false;
        }

        match result {
            Ok(blogs) => {
                state.blogs = dedup_by_id(blogs);
                state.status = LoadState::Ready;
                state.error = None;
            }
            Err(e) => {
                state.status = LoadState::Error;
                state.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn epoch(&self) -> Epoch {
        self.state.read().generation.epoch()
    }

    /// Prepend a newly created blog. An existing entry with the same id is
    /// replaced rather than duplicated.
    pub fn insert_front(&self, epoch: Epoch, blog: BlogSummary) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) {
            return false;
        }
        state.blogs.retain(|b| b.id != blog.id);
        state.blogs.insert(0, blog);
        true
    }

    /// Replace the entry with the same id in place. Returns false if the id
    /// is not in the collection or the epoch is stale.
    pub fn replace(&self, epoch: Epoch, blog: BlogSummary) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) {
            return false;
        }
        match state.blogs.iter_mut().find(|b| b.id == blog.id) {
            Some(slot) => {
                *slot = blog;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, epoch: Epoch, id: &BlogId) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) {
            return false;
        }
        let before = state.blogs.len();
        state.blogs.retain(|b| &b.id != id);
        state.blogs.len() != before
    }

    pub fn apply_likes(&self, epoch: Epoch, counts: &LikeCounts) -> bool {
        self.update_entry(epoch, &counts.id, |b| b.like_count = counts.like_count)
    }

    pub fn apply_views(&self, epoch: Epoch, counts: &ViewCounts) -> bool {
        self.update_entry(epoch, &counts.id, |b| b.view_count = counts.view_count)
    }

    fn update_entry(&self, epoch: Epoch, id: &BlogId, f: impl FnOnce(&mut BlogSummary)) -> bool {
        let mut state = self.state.write();
        if !state.generation.is_live(epoch) {
            return false;
        }
        match state.blogs.iter_mut().find(|b| &b.id == id) {
            Some(blog) => {
                f(blog);
                true
            }
            None => false,
        }
    }

    /// Record a failed mutation. The listing itself is left untouched.
    pub fn record_error(&self, epoch: Epoch, error: &ClientError) {
        let mut state = self.state.write();
        if state.generation.is_live(epoch) {
            state.error = Some(error.to_string());
        }
    }

    pub fn set_notice(&self, epoch: Epoch, notice: impl Into<String>) {
        let mut state = self.state.write();
        if state.generation.is_live(epoch) {
            state.notice = Some(notice.into());
            state.error = None;
        }
    }

    /// Drop all entries and discard anything in flight.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.generation.reset();
        state.blogs.clear();
        state.status = LoadState::Idle;
        state.error = None;
        state.notice = None;
    }

    pub fn blogs(&self) -> Vec<BlogSummary> {
        self.state.read().blogs.clone()
    }

    pub fn get(&self, id: &BlogId) -> Option<BlogSummary> {
        self.state.read().blogs.iter().find(|b| &b.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().blogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().blogs.is_empty()
    }

    pub fn status(&self) -> LoadState {
        self.state.read().status
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Success message of the last mutation.
    pub fn last_notice(&self) -> Option<String> {
        self.state.read().notice.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    pub fn clear_notice(&self) {
        self.state.write().notice = None;
    }
}

// The API should never repeat an id; if it does the first occurrence wins.
fn dedup_by_id(blogs: &[BlogSummary]) -> Vec<BlogSummary> {
    let mut seen: HashSet<&BlogId> = HashSet::with_capacity(blogs.len());
    blogs
        .iter()
        .filter(|blog| seen.insert(&blog.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::BlogStatus;

    fn blog(id: &str, title: &str) -> BlogSummary {
        BlogSummary {
            id: BlogId::new(id),
            title: title.to_string(),
            excerpt: String::new(),
            status: BlogStatus::Published,
            view_count: 0,
            like_count: 0,
            categories: Vec::new(),
            tags: Vec::new(),
            featured_image: None,
            created_at: None,
            author: None,
        }
    }

    fn loaded(blogs: &[BlogSummary]) -> BlogCollectionStore {
        let store = BlogCollectionStore::new();
        let ticket = store.begin_fetch();
        assert!(store.finish_fetch(ticket, Ok(blogs)));
        store
    }

    fn ids(store: &BlogCollectionStore) -> Vec<String> {
        store.blogs().iter().map(|b| b.id.to_string()).collect()
    }

    #[test]
    fn test_fetch_lifecycle() {
        let store = BlogCollectionStore::new();
        assert_eq!(store.status(), LoadState::Idle);

        let ticket = store.begin_fetch();
        assert!(store.status().is_loading());

        store.finish_fetch(ticket, Ok(&[blog("1", "a"), blog("1", "dup"), blog("2", "b")]));
        assert_eq!(store.status(), LoadState::Ready);
        assert_eq!(ids(&store), vec!["1", "2"]);
        assert_eq!(store.get(&BlogId::new("1")).unwrap().title, "a");
    }

    #[test]
    fn test_fetch_failure_keeps_previous_blogs() {
        let store = loaded(&[blog("1", "a")]);

        let ticket = store.begin_fetch();
        store.finish_fetch(ticket, Err(&ClientError::Network("down".to_string())));

        assert_eq!(store.status(), LoadState::Error);
        assert_eq!(store.error().as_deref(), Some("Network error: down"));
        assert_eq!(ids(&store), vec!["1"]);
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let store = BlogCollectionStore::new();
        let older = store.begin_fetch();
        let newer = store.begin_fetch();

        assert!(store.finish_fetch(newer, Ok(&[blog("new", "n")])));
        assert!(!store.finish_fetch(older, Ok(&[blog("old", "o")])));
        assert_eq!(ids(&store), vec!["new"]);
    }

    #[test]
    fn test_insert_front_replaces_same_id() {
        let store = loaded(&[blog("1", "a"), blog("2", "b")]);
        let epoch = store.epoch();

        store.insert_front(epoch, blog("3", "c"));
        store.insert_front(epoch, blog("2", "b2"));

        assert_eq!(ids(&store), vec!["2", "3", "1"]);
        assert_eq!(store.get(&BlogId::new("2")).unwrap().title, "b2");
    }

    #[test]
    fn test_replace_in_place() {
        let store = loaded(&[blog("1", "a"), blog("2", "b")]);
        let epoch = store.epoch();

        assert!(store.replace(epoch, blog("2", "b2")));
        assert!(!store.replace(epoch, blog("9", "x")));

        assert_eq!(ids(&store), vec!["1", "2"]);
        assert_eq!(store.get(&BlogId::new("2")).unwrap().title, "b2");
    }

    #[test]
    fn test_remove_and_counts() {
        let store = loaded(&[blog("1", "a"), blog("2", "b")]);
        let epoch = store.epoch();

        assert!(store.apply_likes(
            epoch,
            &LikeCounts {
                id: BlogId::new("1"),
                like_count: 4
            }
        ));
        assert!(store.apply_views(
            epoch,
            &ViewCounts {
                id: BlogId::new("1"),
                view_count: 9
            }
        ));
        let first = store.get(&BlogId::new("1")).unwrap();
        assert_eq!((first.like_count, first.view_count), (4, 9));

        assert!(store.remove(epoch, &BlogId::new("1")));
        assert!(!store.remove(epoch, &BlogId::new("1")));
        assert_eq!(ids(&store), vec!["2"]);
    }

    #[test]
    fn test_reset_drops_in_flight_work() {
        let store = loaded(&[blog("1", "a")]);
        let epoch = store.epoch();
        let ticket = store.begin_fetch();

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.status(), LoadState::Idle);
        assert!(!store.finish_fetch(ticket, Ok(&[blog("2", "b")])));
        assert!(!store.insert_front(epoch, blog("3", "c")));
        store.record_error(epoch, &ClientError::Network("late".to_string()));
        assert!(store.error().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_notice_clears_error() {
        let store = BlogCollectionStore::new();
        let epoch = store.epoch();

        store.record_error(epoch, &ClientError::not_logged_in());
        assert!(store.error().is_some());

        store.set_notice(epoch, "Blog created");
        assert_eq!(store.last_notice().as_deref(), Some("Blog created"));
        assert!(store.error().is_none());

        store.clear_notice();
        assert!(store.last_notice().is_none());

        store.record_error(epoch, &ClientError::not_logged_in());
        store.clear_error();
        assert!(store.error().is_none());
    }
}
