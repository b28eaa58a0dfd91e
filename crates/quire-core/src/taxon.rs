use serde::{Deserialize, Serialize};

/// Canonical tag or category record.
///
/// The API delivers tags and categories either as plain strings or as
/// `{name, slug}` records; both shapes are folded into this one on ingest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taxon {
    pub name: String,
    pub slug: String,
}

impl Taxon {
    /// Build a taxon from a display name, deriving its slug.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let slug = slugify(&name);
        Self { name, slug }
    }

    /// Build a taxon from a record that may be missing either field.
    /// Returns None when both are blank.
    pub fn from_parts(name: Option<&str>, slug: Option<&str>) -> Option<Self> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let slug = slug.map(str::trim).filter(|s| !s.is_empty());
        match (name, slug) {
            (Some(name), Some(slug)) => Some(Self {
                name: name.to_string(),
                slug: slug.to_string(),
            }),
            (Some(name), None) => Some(Self::from_name(name)),
            (None, Some(slug)) => Some(Self {
                name: slug.to_string(),
                slug: slugify(slug),
            }),
            (None, None) => None,
        }
    }

    /// Case-insensitive match against either the name or the slug.
    pub fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        self.slug.eq_ignore_ascii_case(value) || self.name.to_lowercase() == value.to_lowercase()
    }
}

/// Convert a display name into a URL-safe slug.
///
/// Non-ASCII letters are transliterated ("Yazılım" becomes "yazilim"),
/// everything that is not alphanumeric collapses into a single `-`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Split comma-separated editor input into trimmed, non-empty entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
