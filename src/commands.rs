use std::io::Write;

use thiserror::Error;

use quire_client::{BlogApi, BlogClient, ClientError};
use quire_core::{
    query, BlogDetail, BlogId, BlogInput, BlogQuery, BlogStats, BlogSummary, Credentials, Draft,
    DraftKey, KeyValueStore, Page, PersistenceError, Registration,
};

use crate::cli::{Commands, DraftAction};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("No draft saved for {0}")]
    NoDraft(DraftKey),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run one CLI command against `client`, writing human-readable output to `out`.
pub async fn run<A, K, W>(
    client: &BlogClient<A, K>,
    command: Commands,
    out: &mut W,
) -> Result<(), CommandError>
where
    A: BlogApi,
    K: KeyValueStore,
    W: Write,
{
    match command {
        Commands::Login { email, password } => {
            let session = client.login(&Credentials::new(email, password)).await?;
            writeln!(out, "Logged in as {} ({})", session.display_name, session.role)?;
        }

        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let registration = Registration {
                name,
                email,
                password,
                confirm_password: confirm,
            };
            let session = client.register(&registration).await?;
            writeln!(out, "Registered and logged in as {}", session.display_name)?;
        }

        Commands::Logout => {
            client.logout();
            writeln!(out, "Logged out")?;
        }

        Commands::List {
            search,
            category,
            tag,
            pages,
        } => {
            client.fetch_all().await?;
            let blogs = client.blogs().blogs();

            let mut filter = BlogQuery::new();
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(tag) = tag {
                filter = filter.tag(tag);
            }

            let page = Page::window(filter.apply(&blogs), pages);
            if page.items.is_empty() {
                writeln!(out, "No blogs found")?;
            }
            for blog in &page.items {
                writeln!(out, "{}", format_summary(blog))?;
            }
            if page.has_more {
                writeln!(
                    out,
                    "Showing {} of {} (use --pages {} for more)",
                    page.items.len(),
                    page.total,
                    pages.max(1) + 1
                )?;
            }
        }

        Commands::Popular { limit } => {
            client.fetch_all().await?;
            let blogs = client.blogs().blogs();
            for blog in query::popular(&blogs, limit) {
                writeln!(out, "{:>6} views  {}  [{}]", blog.view_count, blog.title, blog.id)?;
            }
        }

        Commands::Categories => {
            client.fetch_all().await?;
            let blogs = client.blogs().blogs();
            for name in query::category_names(&blogs) {
                writeln!(out, "{}", name)?;
            }
        }

        Commands::Stats => {
            client.fetch_all().await?;
            let stats = BlogStats::collect(&client.blogs().blogs());
            writeln!(out, "Total blogs:  {}", stats.total)?;
            writeln!(out, "Published:    {}", stats.published)?;
            writeln!(out, "Drafts:       {}", stats.drafts)?;
            writeln!(out, "Archived:     {}", stats.archived)?;
            writeln!(out, "Total views:  {}", stats.total_views)?;
            writeln!(out, "Total likes:  {}", stats.total_likes)?;
        }

        Commands::Show { id } => {
            let id = BlogId::new(id);
            let mut detail = client.fetch_one(&id).await?;
            match client.increment_view(&id).await {
                Ok(counts) => detail.summary.view_count = counts.view_count,
                Err(e) => tracing::debug!(blog = %id, "View not counted: {}", e),
            }
            write!(out, "{}", format_detail(&detail))?;
        }

        Commands::Like { id } => {
            let counts = client.like(&BlogId::new(id)).await?;
            writeln!(out, "Liked {} ({} likes)", counts.id, counts.like_count)?;
        }

        Commands::Delete { id } => {
            let id = BlogId::new(id);
            client.delete(&id).await?;
            writeln!(out, "Deleted {}", id)?;
        }

        Commands::Draft { action } => run_draft(client, action, out).await?,

        Commands::Publish { key } => {
            let draft = client
                .drafts()
                .load_draft(&key)?
                .ok_or_else(|| CommandError::NoDraft(key.clone()))?;
            let blog = client.publish(&key, &draft.input).await?;
            writeln!(out, "Published \"{}\" [{}]", blog.title, blog.id)?;
        }
    }

    Ok(())
}

async fn run_draft<A, K, W>(
    client: &BlogClient<A, K>,
    action: DraftAction,
    out: &mut W,
) -> Result<(), CommandError>
where
    A: BlogApi,
    K: KeyValueStore,
    W: Write,
{
    match action {
        DraftAction::Save {
            key,
            title,
            content,
            excerpt,
            tags,
            categories,
            status,
            image,
        } => {
            let mut input = BlogInput::new(title, content).with_excerpt(excerpt);
            if let Some(tags) = tags {
                input = input.with_tags_text(&tags);
            }
            if let Some(categories) = categories {
                input = input.with_categories_text(&categories);
            }
            if let Some(status) = status {
                input = input.with_status(status);
            }
            if let Some(image) = image {
                input = input.with_featured_image(image);
            }

            client.drafts().save_draft(&key, &input)?;
            writeln!(out, "Saved draft for {}", key)?;
        }

        DraftAction::Edit { id } => {
            let id = BlogId::new(id);
            let detail = client.fetch_one(&id).await?;
            let key = DraftKey::Blog(id);
            client.drafts().save_draft(&key, &detail.to_input())?;
            writeln!(out, "Draft for {} ready: \"{}\"", key, detail.summary.title)?;
        }

        DraftAction::Show { key } => match client.drafts().load_draft(&key)? {
            Some(draft) => write!(out, "{}", format_draft(&draft))?,
            None => writeln!(out, "No draft saved for {}", key)?,
        },

        DraftAction::Clear { key } => {
            client.drafts().clear_draft(&key)?;
            writeln!(out, "Cleared draft for {}", key)?;
        }
    }

    Ok(())
}

/// One listing line: date, status, title, id, counters and tag slugs.
pub fn format_summary(blog: &BlogSummary) -> String {
    let date = blog
        .created_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());

    let mut line = format!(
        "{}  {:<9}  {}  [{}]  {} views, {} likes",
        date,
        blog.status.to_string(),
        blog.title,
        blog.id,
        blog.view_count,
        blog.like_count
    );
    for tag in &blog.tags {
        line.push_str(" #");
        line.push_str(&tag.slug);
    }
    line
}

pub fn format_detail(detail: &BlogDetail) -> String {
    let blog = &detail.summary;
    let mut text = format!("{}\n", blog.title);

    let author = detail
        .author_profile
        .as_ref()
        .and_then(|p| p.name.clone())
        .or_else(|| blog.author.as_ref().and_then(|a| a.name.clone()));
    if let Some(author) = author {
        text.push_str(&format!("by {}\n", author));
    }
    if let Some(created_at) = blog.created_at {
        text.push_str(&format!("{}\n", created_at.format("%B %-d, %Y")));
    }

    text.push_str(&format!(
        "{} | {} views | {} likes\n",
        blog.status, blog.view_count, blog.like_count
    ));
    if !blog.categories.is_empty() {
        let names: Vec<&str> = blog.categories.iter().map(|c| c.name.as_str()).collect();
        text.push_str(&format!("Categories: {}\n", names.join(", ")));
    }
    if !blog.tags.is_empty() {
        let names: Vec<&str> = blog.tags.iter().map(|t| t.name.as_str()).collect();
        text.push_str(&format!("Tags: {}\n", names.join(", ")));
    }

    text.push('\n');
    if !blog.excerpt.is_empty() {
        text.push_str(&format!("{}\n\n", blog.excerpt));
    }
    text.push_str(&detail.content);
    text.push('\n');
    text
}

pub fn format_draft(draft: &Draft) -> String {
    let input = &draft.input;
    let mut text = format!(
        "Draft for {} (saved {})\n",
        draft.owner,
        draft.saved_at.format("%Y-%m-%d %H:%M:%S")
    );
    text.push_str(&format!("Title:      {}\n", input.title));
    text.push_str(&format!("Status:     {}\n", input.status));
    if !input.excerpt.is_empty() {
        text.push_str(&format!("Excerpt:    {}\n", input.excerpt));
    }
    if !input.categories.is_empty() {
        text.push_str(&format!("Categories: {}\n", input.categories.join(", ")));
    }
    if !input.tags.is_empty() {
        text.push_str(&format!("Tags:       {}\n", input.tags.join(", ")));
    }
    if let Some(image) = &input.featured_image {
        text.push_str(&format!("Image:      {}\n", image));
    }
    text.push('\n');
    text.push_str(&input.content);
    text.push('\n');
    text
}
