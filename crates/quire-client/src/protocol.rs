//! Wire types for the blog REST API.
//!
//! The API is loose about shapes: tags and categories arrive as strings or
//! records, the author as an id or a populated profile, counters may be
//! missing. Everything is normalised here, at ingest, so the stores only
//! ever hold the canonical types from `quire_core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quire_core::{
    AuthToken, AuthorProfile, AuthorRef, BlogDetail, BlogId, BlogStatus, BlogSummary, LikeCounts,
    Registration, Role, Session, Taxon, UserId, ViewCounts,
};

/// Success envelope: `{ "data": <payload> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body. Most endpoints use `message`, some use `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Body of `POST /auth/register`. The confirmation field stays client-side.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Registration> for RegisterRequest<'a> {
    fn from(reg: &'a Registration) -> Self {
        Self {
            name: reg.name.trim(),
            email: reg.email.trim(),
            password: &reg.password,
        }
    }
}

/// Payload of a successful login or register: the user plus a token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub token: String,
}

impl AuthPayload {
    pub fn into_session(self) -> Session {
        Session {
            user_id: UserId(self.id),
            display_name: self.name,
            email: self.email,
            role: self.role,
            token: AuthToken::new(self.token),
        }
    }
}

/// A tag or category as delivered by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTaxon {
    Name(String),
    Record {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl RawTaxon {
    pub fn normalize(self) -> Option<Taxon> {
        match self {
            RawTaxon::Name(name) => Taxon::from_parts(Some(&name), None),
            RawTaxon::Record { name, slug } => Taxon::from_parts(name.as_deref(), slug.as_deref()),
        }
    }
}

/// Normalise a list, dropping blank entries and duplicate slugs.
fn normalize_taxa(raw: Vec<RawTaxon>) -> Vec<Taxon> {
    let mut taxa: Vec<Taxon> = Vec::with_capacity(raw.len());
    for taxon in raw.into_iter().filter_map(RawTaxon::normalize) {
        if !taxa.iter().any(|t| t.slug == taxon.slug) {
            taxa.push(taxon);
        }
    }
    taxa
}

/// The author as delivered by the API: a bare id or a populated profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAuthor {
    Id(String),
    Profile {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        bio: Option<String>,
        #[serde(default, rename = "profileImage")]
        profile_image: Option<String>,
    },
}

impl RawAuthor {
    fn into_parts(self) -> (AuthorRef, Option<AuthorProfile>) {
        match self {
            RawAuthor::Id(id) => (
                AuthorRef {
                    id: UserId(id),
                    name: None,
                },
                None,
            ),
            RawAuthor::Profile {
                id,
                name,
                email,
                bio,
                profile_image,
            } => (
                AuthorRef {
                    id: UserId(id),
                    name: name.clone(),
                },
                Some(AuthorProfile {
                    name,
                    email,
                    bio,
                    profile_image,
                }),
            ),
        }
    }
}

/// A blog as delivered by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<BlogStatus>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub categories: Vec<RawTaxon>,
    #[serde(default)]
    pub tags: Vec<RawTaxon>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
}

impl RawBlog {
    pub fn into_summary(self) -> BlogSummary {
        self.into_detail().summary
    }

    pub fn into_detail(self) -> BlogDetail {
        let (author, author_profile) = match self.author.map(RawAuthor::into_parts) {
            Some((author, profile)) => (Some(author), profile),
            None => (None, None),
        };

        BlogDetail {
            summary: BlogSummary {
                id: BlogId(self.id),
                title: self.title,
                excerpt: self.excerpt.unwrap_or_default(),
                status: self.status.unwrap_or_default(),
                view_count: self.views.unwrap_or(0),
                like_count: self.likes_count.unwrap_or(0),
                categories: normalize_taxa(self.categories),
                tags: normalize_taxa(self.tags),
                featured_image: self.featured_image.filter(|s| !s.trim().is_empty()),
                created_at: self.created_at,
                author,
            },
            content: self.content.unwrap_or_default(),
            author_profile,
        }
    }
}

/// Payload of `POST /blogs/{id}/like`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub likes_count: u64,
}

impl From<LikePayload> for LikeCounts {
    fn from(p: LikePayload) -> Self {
        LikeCounts {
            id: BlogId(p.id),
            like_count: p.likes_count,
        }
    }
}

/// Payload of `POST /blogs/{id}/view`.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub views: u64,
}

impl From<ViewPayload> for ViewCounts {
    fn from(p: ViewPayload) -> Self {
        ViewCounts {
            id: BlogId(p.id),
            view_count: p.views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_blog(value: serde_json::Value) -> RawBlog {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mixed_tags_normalize_to_records() {
        let blog = parse_blog(json!({
            "_id": "b1",
            "title": "Mixed",
            "tags": ["Rust", {"name": "Web Dev", "slug": "web-dev"}, {"slug": "async"}, "", "rust"],
            "categories": [{"name": "Programming", "_id": "c1"}]
        }))
        .into_summary();

        let tags: Vec<(&str, &str)> = blog
            .tags
            .iter()
            .map(|t| (t.name.as_str(), t.slug.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![("Rust", "rust"), ("Web Dev", "web-dev"), ("async", "async")]
        );
        assert_eq!(blog.categories[0].name, "Programming");
        assert_eq!(blog.categories[0].slug, "programming");
    }

    #[test]
    fn test_author_as_id_or_profile() {
        let by_id = parse_blog(json!({"_id": "b1", "author": "u1"})).into_detail();
        assert_eq!(by_id.summary.author.unwrap().id, UserId("u1".to_string()));
        assert!(by_id.author_profile.is_none());

        let by_profile = parse_blog(json!({
            "_id": "b2",
            "author": {"_id": "u2", "name": "Ada", "bio": "Writes", "profileImage": "a.png"}
        }))
        .into_detail();
        let author = by_profile.summary.author.unwrap();
        assert_eq!(author.name.as_deref(), Some("Ada"));
        let profile = by_profile.author_profile.unwrap();
        assert_eq!(profile.bio.as_deref(), Some("Writes"));
        assert_eq!(profile.profile_image.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let blog = parse_blog(json!({"_id": "b1", "title": "Bare"})).into_summary();
        assert_eq!(blog.view_count, 0);
        assert_eq!(blog.like_count, 0);
        assert_eq!(blog.status, BlogStatus::Draft);
        assert!(blog.excerpt.is_empty());
    }

    #[test]
    fn test_full_blog_fields() {
        let detail = parse_blog(json!({
            "_id": "b1",
            "title": "Hello",
            "excerpt": "Short",
            "content": "<p>Long</p>",
            "status": "published",
            "views": 12,
            "likesCount": 3,
            "featuredImage": "",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }))
        .into_detail();

        assert_eq!(detail.content, "<p>Long</p>");
        assert_eq!(detail.summary.status, BlogStatus::Published);
        assert_eq!(detail.summary.view_count, 12);
        assert_eq!(detail.summary.like_count, 3);
        assert!(detail.summary.featured_image.is_none());
        assert!(detail.summary.created_at.is_some());
    }

    #[test]
    fn test_auth_payload() {
        let payload: AuthPayload = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Admin",
            "email": "admin@blog.com",
            "role": "admin",
            "token": "t0k"
        }))
        .unwrap();

        let session = payload.into_session();
        assert!(session.is_admin());
        assert_eq!(session.token.as_str(), "t0k");
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"  "}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn test_register_request_omits_confirmation() {
        let reg = Registration {
            name: " Ada ".to_string(),
            email: "ada@blog.com".to_string(),
            password: "123456".to_string(),
            confirm_password: "123456".to_string(),
        };
        let json = serde_json::to_value(RegisterRequest::from(&reg)).unwrap();
        assert_eq!(json, json!({"name": "Ada", "email": "ada@blog.com", "password": "123456"}));
    }
}
