use std::sync::Arc;

use parking_lot::RwLock;

use quire_core::{AuthToken, AuthorRef, KeyValueStore, PersistenceError, Session, TOKEN_KEY};

use crate::error::ClientError;
use crate::state::LoadState;

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    token: Option<AuthToken>,
    status: LoadState,
    error: Option<String>,
}

/// Holds the authenticated user and keeps the bearer token persisted.
///
/// A token restored from storage yields a token-only session: requests are
/// authenticated but the user's identity is unknown until the next login.
pub struct SessionStore<K: KeyValueStore> {
    storage: Arc<K>,
    state: RwLock<SessionState>,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(storage: Arc<K>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Load a previously persisted token. Returns true if one was found.
    pub fn restore(&self) -> Result<bool, PersistenceError> {
        let Some(bytes) = self.storage.get(TOKEN_KEY)? else {
            return Ok(false);
        };

        let token = match String::from_utf8(bytes) {
            Ok(text) => AuthToken::new(text.trim()),
            Err(_) => AuthToken::new(""),
        };

        if token.is_empty() {
            tracing::warn!("Discarding unreadable persisted token");
            self.storage.remove(TOKEN_KEY)?;
            return Ok(false);
        }

        let mut state = self.state.write();
        state.token = Some(token);
        state.session = None;
        Ok(true)
    }

    pub(crate) fn begin(&self) {
        let mut state = self.state.write();
        state.status = LoadState::Loading;
        state.error = None;
    }

    /// Replace the session after a successful login or register.
    pub(crate) fn establish(&self, session: Session) {
        if let Err(e) = self.storage.set(TOKEN_KEY, session.token.as_str().as_bytes()) {
            tracing::warn!("Session will not survive a restart: {}", e);
        }

        let mut state = self.state.write();
        state.token = Some(session.token.clone());
        state.session = Some(session);
        state.status = LoadState::Ready;
        state.error = None;
    }

    pub(crate) fn fail(&self, error: &ClientError) {
        let mut state = self.state.write();
        state.status = LoadState::Error;
        state.error = Some(error.to_string());
    }

    /// Forget the session and the persisted token. A storage failure is
    /// logged; the in-memory session is cleared regardless.
    pub fn logout(&self) {
        *self.state.write() = SessionState::default();
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("Persisted token could not be removed: {}", e);
        }
    }

    /// The logged-in user, if known. None for a token-only session.
    pub fn current(&self) -> Option<Session> {
        self.state.read().session.clone()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().session.as_ref().is_some_and(Session::is_admin)
    }

    /// Whether the user may edit a blog by `author`. A token-only session
    /// cannot, since its identity is unknown.
    pub fn can_edit(&self, author: Option<&AuthorRef>) -> bool {
        self.state
            .read()
            .session
            .as_ref()
            .is_some_and(|s| s.can_edit(author))
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.state.read().token.clone()
    }

    /// Token for an authenticated request, or an auth error.
    pub fn require_token(&self) -> Result<AuthToken, ClientError> {
        self.token()
            .filter(|t| !t.is_empty())
            .ok_or_else(ClientError::not_logged_in)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn status(&self) -> LoadState {
        self.state.read().status
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::{FailingKeyValueStore, InMemoryKeyValueStore, Role, UserId};

    fn session(token: &str) -> Session {
        Session {
            user_id: UserId("u1".to_string()),
            display_name: "Admin".to_string(),
            email: "admin@blog.com".to_string(),
            role: Role::Admin,
            token: AuthToken::new(token),
        }
    }

    #[test]
    fn test_establish_persists_token() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let store = SessionStore::new(storage.clone());

        store.begin();
        assert!(store.status().is_loading());
        store.establish(session("abc"));

        assert_eq!(store.status(), LoadState::Ready);
        assert!(store.current().unwrap().is_admin());
        assert!(store.is_admin());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), Some(b"abc".to_vec()));
    }

    #[test]
    fn test_restore_gives_token_only_session() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.put_raw(TOKEN_KEY, b"abc");

        let store = SessionStore::new(storage);
        assert!(store.restore().unwrap());
        assert!(store.is_authenticated());
        assert!(store.current().is_none());
        assert_eq!(store.require_token().unwrap().as_str(), "abc");
        assert!(!store.can_edit(None));
    }

    #[test]
    fn test_can_edit_own_blog() {
        let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::new()));
        let mut user = session("abc");
        user.role = Role::User;
        store.establish(user);

        let own = AuthorRef {
            id: UserId("u1".to_string()),
            name: None,
        };
        let other = AuthorRef {
            id: UserId("u2".to_string()),
            name: None,
        };
        assert!(store.can_edit(Some(&own)));
        assert!(!store.can_edit(Some(&other)));
    }

    #[test]
    fn test_restore_discards_blank_token() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.put_raw(TOKEN_KEY, b"  ");

        let store = SessionStore::new(storage.clone());
        assert!(!store.restore().unwrap());
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let store = SessionStore::new(storage.clone());
        store.establish(session("abc"));

        store.logout();

        assert!(!store.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));
        assert!(matches!(store.require_token(), Err(ClientError::Auth(_))));
    }

    #[test]
    fn test_logout_clears_memory_when_storage_fails() {
        let storage = Arc::new(FailingKeyValueStore::new());
        let store = SessionStore::new(storage);
        store.establish(session("abc"));
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(!store.is_admin());
    }

    #[test]
    fn test_fail_records_error() {
        let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::new()));
        store.fail(&ClientError::Auth("Invalid credentials".to_string()));

        assert_eq!(store.status(), LoadState::Error);
        assert_eq!(
            store.error().as_deref(),
            Some("Authentication failed: Invalid credentials")
        );
        store.clear_error();
        assert!(store.error().is_none());
    }
}
