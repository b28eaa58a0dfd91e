use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blog::{BlogId, BlogInput};
use crate::error::PersistenceError;

/// Current schema version written into every saved draft.
pub const DRAFT_SCHEMA_VERSION: u32 = 1;

const NEW_POST_KEY: &str = "blogDraft";
const EDIT_KEY_PREFIX: &str = "blogDraft_";

/// Which editor a draft belongs to.
///
/// A brand-new post shares one singleton slot; edits in place are keyed by
/// the blog's id so several in-progress edits never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    NewPost,
    Blog(BlogId),
}

impl DraftKey {
    /// Key under which this draft is stored.
    pub fn storage_key(&self) -> String {
        match self {
            DraftKey::NewPost => NEW_POST_KEY.to_string(),
            DraftKey::Blog(id) => format!("{}{}", EDIT_KEY_PREFIX, id),
        }
    }

    /// Inverse of [`DraftKey::storage_key`].
    pub fn from_storage_key(key: &str) -> Option<Self> {
        if key == NEW_POST_KEY {
            return Some(DraftKey::NewPost);
        }
        key.strip_prefix(EDIT_KEY_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| DraftKey::Blog(BlogId::new(id)))
    }
}

impl std::fmt::Display for DraftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftKey::NewPost => f.write_str("new-post"),
            DraftKey::Blog(id) => write!(f, "blog {}", id),
        }
    }
}

/// Parses user-facing names: `new-post` (or `new`) for the singleton slot,
/// anything else as a blog id.
impl std::str::FromStr for DraftKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("draft key cannot be empty".to_string()),
            "new" | "new-post" => Ok(DraftKey::NewPost),
            id => Ok(DraftKey::Blog(BlogId::new(id))),
        }
    }
}

impl Serialize for DraftKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.storage_key())
    }
}

impl<'de> Deserialize<'de> for DraftKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        DraftKey::from_storage_key(&key)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid draft key: {key}")))
    }
}

/// A locally persisted, not-yet-published snapshot of blog fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(flatten)]
    pub input: BlogInput,
    pub saved_at: DateTime<Utc>,
    pub owner: DraftKey,
}

impl Draft {
    pub fn new(owner: DraftKey, input: BlogInput) -> Self {
        Self {
            input,
            saved_at: Utc::now(),
            owner,
        }
    }
}

/// On-disk wrapper carrying the schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftEnvelope {
    pub version: u32,
    pub draft: Draft,
}

/// Drafts written before the envelope existed: the editor fields plus a
/// `savedAt` timestamp at the top level.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDraft {
    #[serde(flatten)]
    input: BlogInput,
    saved_at: Option<DateTime<Utc>>,
}

/// A legacy draft must carry at least one of these editor fields.
const LEGACY_FIELDS: [&str; 6] = [
    "title",
    "content",
    "excerpt",
    "tags",
    "categories",
    "featuredImage",
];

impl DraftEnvelope {
    pub fn wrap(draft: Draft) -> Self {
        Self {
            version: DRAFT_SCHEMA_VERSION,
            draft,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        serde_json::to_vec(self).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    /// Decode stored bytes into a draft owned by `owner`.
    ///
    /// Returns None for anything that cannot be read back: malformed JSON,
    /// a schema version this build does not know, an unversioned object with
    /// no editor fields, or a draft that was stored under a different owner.
    pub fn decode(bytes: &[u8], owner: &DraftKey) -> Option<Draft> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        if !value.is_object() {
            return None;
        }

        match value.get("version") {
            Some(version) => {
                if version.as_u64() != Some(u64::from(DRAFT_SCHEMA_VERSION)) {
                    return None;
                }
                let envelope: DraftEnvelope = serde_json::from_value(value).ok()?;
                (envelope.draft.owner == *owner).then_some(envelope.draft)
            }
            None => {
                if !LEGACY_FIELDS.iter().any(|field| value.get(*field).is_some()) {
                    return None;
                }
                let legacy: LegacyDraft = serde_json::from_value(value).ok()?;
                Some(Draft {
                    input: legacy.input,
                    saved_at: legacy.saved_at.unwrap_or_else(Utc::now),
                    owner: owner.clone(),
                })
            }
        }
    }
}
