//! Quire Client - HTTP API access and the client-side stores.
//!
//! The stores hold what the UI renders: the session, the blog listing, the
//! blog being viewed and autosaved drafts. [`BlogClient`] drives the API and
//! settles every response into them, discarding responses that were
//! superseded by a newer request or arrived after a reset.

pub mod api;
pub mod client;
pub mod collection;
pub mod current;
pub mod drafts;
pub mod error;
pub mod protocol;
pub mod session;
pub mod state;

pub use api::{BlogApi, HttpBlogApi, DEFAULT_API_URL};
pub use client::{BlogClient, ClientConfig};
pub use collection::BlogCollectionStore;
pub use current::{CurrentBlogStore, CurrentSlot};
pub use drafts::DraftStore;
pub use error::ClientError;
pub use session::SessionStore;
pub use state::{Epoch, LoadState, Ticket};
