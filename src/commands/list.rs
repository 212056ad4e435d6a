//! List site content

use anyhow::Result;

use crate::content::PostSummary;
use crate::helpers::display_date;
use crate::provider::ContentProvider;

/// What `folio list` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListKind {
    Posts,
    Categories,
}

/// Print posts or categories from `provider`
pub async fn run(provider: &dyn ContentProvider, kind: ListKind) -> Result<()> {
    match kind {
        ListKind::Posts => {
            let posts = provider.list_posts().await?;
            println!("Posts ({}):", posts.len());
            for line in post_lines(&posts) {
                println!("{}", line);
            }
        }
        ListKind::Categories => {
            let categories = provider.list_categories().await?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!("  {}", category);
            }
        }
    }
    Ok(())
}

fn post_lines(posts: &[PostSummary]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            format!(
                "  {} - {} [{}]",
                display_date(&post.date, "%Y-%m-%d"),
                post.title,
                post.slug
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_lines() {
        let post = PostSummary::new(
            Some("hello"),
            Some("Hello"),
            Some("2024-01-05T10:00:00Z"),
            None,
        )
        .unwrap();
        assert_eq!(post_lines(&[post]), vec!["  2024-01-05 - Hello [hello]"]);
    }
}
