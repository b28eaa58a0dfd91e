use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::UserId;
use crate::taxon::{split_list, Taxon};

/// Identifier of a blog post as issued by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(pub String);

impl BlogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogStatus::Draft => f.write_str("draft"),
            BlogStatus::Published => f.write_str("published"),
            BlogStatus::Archived => f.write_str("archived"),
        }
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "archived" => Ok(BlogStatus::Archived),
            other => Err(format!(
                "unknown status {other:?} (expected draft, published or archived)"
            )),
        }
    }
}

/// Reference to a blog's author. The name is only known when the API
/// populated the author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: UserId,
    pub name: Option<String>,
}

/// Snapshot of the author's public profile, delivered with a blog detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

/// A blog as shown on listing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id: BlogId,
    pub title: String,
    pub excerpt: String,
    pub status: BlogStatus,
    pub view_count: u64,
    pub like_count: u64,
    pub categories: Vec<Taxon>,
    pub tags: Vec<Taxon>,
    pub featured_image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub author: Option<AuthorRef>,
}

impl BlogSummary {
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.matches(name))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.matches(name))
    }
}

/// A single blog with its full body, as shown on view and edit pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogDetail {
    pub summary: BlogSummary,
    /// Opaque HTML body. Rendering and sanitising it is the caller's job.
    pub content: String,
    pub author_profile: Option<AuthorProfile>,
}

impl BlogDetail {
    pub fn id(&self) -> &BlogId {
        &self.summary.id
    }

    /// Editable fields of this blog, used to seed an editor.
    pub fn to_input(&self) -> BlogInput {
        BlogInput {
            title: self.summary.title.clone(),
            content: self.content.clone(),
            excerpt: self.summary.excerpt.clone(),
            tags: self.summary.tags.iter().map(|t| t.name.clone()).collect(),
            categories: self
                .summary
                .categories
                .iter()
                .map(|c| c.name.clone())
                .collect(),
            featured_image: self.summary.featured_image.clone(),
            status: self.summary.status,
        }
    }
}

/// Editable blog fields, sent as the body of create and update requests.
///
/// Every field defaults so a partially filled editor form (or an older
/// saved draft) still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogInput {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub status: BlogStatus,
}

impl BlogInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_status(mut self, status: BlogStatus) -> Self {
        self.status = status;
        self
    }

    /// Set tags from comma-separated editor text.
    pub fn with_tags_text(mut self, text: &str) -> Self {
        self.tags = split_list(text);
        self
    }

    /// Set categories from comma-separated editor text.
    pub fn with_categories_text(mut self, text: &str) -> Self {
        self.categories = split_list(text);
        self
    }

    pub fn with_featured_image(mut self, url: impl Into<String>) -> Self {
        self.featured_image = Some(url.into());
        self
    }

    /// Trim the single-line fields the way the editor does before submitting.
    /// The body is left untouched.
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.excerpt = self.excerpt.trim().to_string();
        self.featured_image = self
            .featured_image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Like counter returned by the like endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeCounts {
    pub id: BlogId,
    pub like_count: u64,
}

/// View counter returned by the view endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCounts {
    pub id: BlogId,
    pub view_count: u64,
}
