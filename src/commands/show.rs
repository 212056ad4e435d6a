//! Show one post

use anyhow::{Context, Result};

use crate::content::PostDetail;
use crate::provider::ContentProvider;

/// Print metadata and raw content of the post with `slug`
pub async fn run(provider: &dyn ContentProvider, slug: &str) -> Result<()> {
    let post = provider
        .get_post(slug)
        .await
        .with_context(|| format!("Failed to load post from {}", provider.name()))?;
    print!("{}", describe(&post));
    Ok(())
}

fn describe(post: &PostDetail) -> String {
    let summary = &post.summary;
    let mut out = String::new();
    out.push_str(&format!("title:      {}\n", summary.title));
    out.push_str(&format!("slug:       {}\n", summary.slug));
    out.push_str(&format!("date:       {}\n", summary.date));
    out.push_str(&format!("categories: {}\n", summary.categories.join(", ")));
    if let Some(image) = &summary.image {
        out.push_str(&format!("image:      {}\n", image));
    }
    if !summary.excerpt.is_empty() {
        out.push_str(&format!("excerpt:    {}\n", summary.excerpt));
    }
    out.push('\n');
    out.push_str(&post.content);
    if !post.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentFormat, PostSummary};

    #[test]
    fn test_describe() {
        let mut summary = PostSummary::new(
            Some("hello"),
            Some("Hello"),
            Some("2024-01-05"),
            Some("Intro"),
        )
        .unwrap();
        summary.categories = vec!["automation".to_string(), "it-solutions".to_string()];
        let post = PostDetail::new(summary, "# Body".to_string(), ContentFormat::Markdown);

        let text = describe(&post);
        assert!(text.starts_with("title:      Hello\n"));
        assert!(text.contains("categories: automation, it-solutions\n"));
        assert!(text.contains("excerpt:    Intro\n"));
        assert!(!text.contains("image:"));
        assert!(text.ends_with("\n# Body\n"));
    }
}
