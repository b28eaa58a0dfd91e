use crate::blog::{BlogStatus, BlogSummary};

/// Number of blogs revealed per page of a listing.
pub const PAGE_SIZE: usize = 9;

/// Default number of entries in the popular list.
pub const POPULAR_LIMIT: usize = 5;

/// Filter over a collection snapshot. All matching is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl BlogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substring search over title and excerpt. Blank input clears the filter.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = non_blank(text.into());
        self
    }

    /// Restrict to a category by name. `all` clears the filter.
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = non_blank(name.into()).filter(|c| !c.eq_ignore_ascii_case("all"));
        self
    }

    /// Restrict to a tag by name or slug.
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tag = non_blank(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.tag.is_none()
    }

    pub fn matches(&self, blog: &BlogSummary) -> bool {
        if let Some(text) = &self.search {
            let needle = text.to_lowercase();
            let hit = blog.title.to_lowercase().contains(&needle)
                || blog.excerpt.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !blog.has_category(category) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !blog.has_tag(tag) {
                return false;
            }
        }
        true
    }

    /// Matching blogs in collection order.
    pub fn apply<'a>(&self, blogs: &'a [BlogSummary]) -> Vec<&'a BlogSummary> {
        blogs.iter().filter(|b| self.matches(b)).collect()
    }
}

fn non_blank(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Infinite-scroll window over a filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: Vec<&'a BlogSummary>,
    pub total: usize,
    pub has_more: bool,
}

impl<'a> Page<'a> {
    /// Reveal the first `pages` pages of `items`. At least one page is shown.
    pub fn window(items: Vec<&'a BlogSummary>, pages: usize) -> Self {
        let total = items.len();
        let shown = pages.max(1).saturating_mul(PAGE_SIZE).min(total);
        let mut items = items;
        items.truncate(shown);
        Self {
            items,
            total,
            has_more: shown < total,
        }
    }
}

/// Top `limit` blogs by view count. Ties keep collection order.
pub fn popular(blogs: &[BlogSummary], limit: usize) -> Vec<&BlogSummary> {
    let mut sorted: Vec<&BlogSummary> = blogs.iter().collect();
    sorted.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    sorted.truncate(limit);
    sorted
}

/// Unique category names in first-seen order.
pub fn category_names(blogs: &[BlogSummary]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for category in blogs.iter().flat_map(|b| &b.categories) {
        if !category.name.is_empty() && !names.contains(&category.name.as_str()) {
            names.push(&category.name);
        }
    }
    names
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlogStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub archived: usize,
    pub total_views: u64,
    pub total_likes: u64,
}

impl BlogStats {
    pub fn collect(blogs: &[BlogSummary]) -> Self {
        blogs.iter().fold(Self::default(), |mut stats, blog| {
            stats.total += 1;
            match blog.status {
                BlogStatus::Published => stats.published += 1,
                BlogStatus::Draft => stats.drafts += 1,
                BlogStatus::Archived => stats.archived += 1,
            }
            stats.total_views += blog.view_count;
            stats.total_likes += blog.like_count;
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::BlogId;
    use crate::taxon::Taxon;

    fn blog(id: &str, title: &str, views: u64, category: &str, tag: &str) -> BlogSummary {
        BlogSummary {
            id: BlogId::new(id),
            title: title.to_string(),
            excerpt: format!("About {}", title),
            status: BlogStatus::Published,
            view_count: views,
            like_count: 1,
            categories: vec![Taxon::from_name(category)],
            tags: vec![Taxon::from_name(tag)],
            featured_image: None,
            created_at: None,
            author: None,
        }
    }

    fn sample() -> Vec<BlogSummary> {
        vec![
            blog("1", "Learning Rust", 10, "Programming", "rust"),
            blog("2", "Baking Bread", 50, "Food", "baking"),
            blog("3", "Async Rust", 30, "Programming", "async"),
            blog("4", "Sourdough", 50, "Food", "Baking"),
        ]
    }

    fn ids(blogs: &[&BlogSummary]) -> Vec<String> {
        blogs.iter().map(|b| b.id.to_string()).collect()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let blogs = sample();
        let query = BlogQuery::new().category("all").search("  ");
        assert!(query.is_empty());
        assert_eq!(query.apply(&blogs).len(), 4);
    }

    #[test]
    fn test_search_title_and_excerpt() {
        let blogs = sample();
        assert_eq!(
            ids(&BlogQuery::new().search("RUST").apply(&blogs)),
            vec!["1", "3"]
        );
        assert_eq!(
            ids(&BlogQuery::new().search("about sour").apply(&blogs)),
            vec!["4"]
        );
    }

    #[test]
    fn test_category_and_tag_filters() {
        let blogs = sample();
        assert_eq!(
            ids(&BlogQuery::new().category("food").apply(&blogs)),
            vec!["2", "4"]
        );
        assert_eq!(
            ids(&BlogQuery::new().tag("baking").apply(&blogs)),
            vec!["2", "4"]
        );
        assert_eq!(
            ids(&BlogQuery::new()
                .category("Programming")
                .search("async")
                .apply(&blogs)),
            vec!["3"]
        );
    }

    #[test]
    fn test_popular_is_stable_on_ties() {
        let blogs = sample();
        assert_eq!(ids(&popular(&blogs, 3)), vec!["2", "4", "3"]);
        assert_eq!(popular(&blogs, POPULAR_LIMIT).len(), 4);
    }

    #[test]
    fn test_category_names_unique_in_order() {
        let blogs = sample();
        assert_eq!(category_names(&blogs), vec!["Programming", "Food"]);
    }

    #[test]
    fn test_page_window() {
        let blogs: Vec<BlogSummary> = (0..20)
            .map(|i| blog(&i.to_string(), "t", 0, "c", "t"))
            .collect();
        let all = BlogQuery::new().apply(&blogs);

        let first = Page::window(all.clone(), 1);
        assert_eq!(first.items.len(), PAGE_SIZE);
        assert_eq!(first.total, 20);
        assert!(first.has_more);

        let last = Page::window(all.clone(), 3);
        assert_eq!(last.items.len(), 20);
        assert!(!last.has_more);

        let zero = Page::window(all, 0);
        assert_eq!(zero.items.len(), PAGE_SIZE);
    }

    #[test]
    fn test_stats() {
        let mut blogs = sample();
        blogs[1].status = BlogStatus::Draft;
        blogs[2].status = BlogStatus::Archived;

        let stats = BlogStats::collect(&blogs);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.published, 2);
        assert_eq!(stats.drafts, 1);
        assert_eq!(stats.archived, 1);
        assert_eq!(stats.total_views, 140);
        assert_eq!(stats.total_likes, 4);
    }
}
