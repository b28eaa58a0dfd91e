//! Quire Core - Domain models, traits, and validation.
//!
//! This crate contains the domain logic shared by the Quire blog client:
//! sessions, blogs and their taxonomy, drafts, listing queries and the
//! key-value storage seam. It has no dependencies on other Quire crates.

pub mod blog;
pub mod draft;
pub mod error;
pub mod query;
pub mod session;
pub mod storage;
pub mod taxon;
pub mod validation;

// Re-exports for convenience
pub use blog::{
    AuthorProfile, AuthorRef, BlogDetail, BlogId, BlogInput, BlogStatus, BlogSummary, LikeCounts,
    ViewCounts,
};
pub use draft::{Draft, DraftEnvelope, DraftKey, DRAFT_SCHEMA_VERSION};
pub use error::{PersistenceError, ValidationError};
pub use query::{BlogQuery, BlogStats, Page, PAGE_SIZE, POPULAR_LIMIT};
pub use session::{AuthToken, Credentials, Registration, Role, Session, UserId};
pub use storage::{KeyValueStore, TOKEN_KEY};
pub use taxon::Taxon;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::{FailingKeyValueStore, InMemoryKeyValueStore};
