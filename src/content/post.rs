//! Post models and the normalization helpers shared by every provider

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::MarkdownRenderer;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Listing metadata for a single post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// URL-safe identifier, also the route parameter
    pub slug: String,

    /// Display title
    pub title: String,

    /// Sortable date string (compared as plain text)
    pub date: String,

    /// Short summary, may be empty
    pub excerpt: String,

    /// Category slugs, in source order
    pub categories: Vec<String>,

    /// Absolute image URL
    pub image: Option<String>,
}

impl PostSummary {
    /// Build a summary, dropping records without a slug or title
    pub fn new(
        slug: Option<&str>,
        title: Option<&str>,
        date: Option<&str>,
        excerpt: Option<&str>,
    ) -> Option<Self> {
        let slug = slug.map(str::trim).filter(|s| !s.is_empty())?;
        let title = title.map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.unwrap_or_default().to_string(),
            excerpt: excerpt.unwrap_or_default().to_string(),
            categories: Vec::new(),
            image: None,
        })
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Markup of a post body as delivered by its provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Markdown,
    Html,
}

/// A post together with its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,

    /// Raw body, converted only when rendered
    pub content: String,

    pub format: ContentFormat,
}

impl PostDetail {
    pub fn new(summary: PostSummary, content: String, format: ContentFormat) -> Self {
        Self {
            summary,
            content,
            format,
        }
    }

    /// Body as HTML; Markdown is converted, HTML passes through
    pub fn to_html(&self, renderer: &MarkdownRenderer) -> String {
        match self.format {
            ContentFormat::Html => self.content.clone(),
            ContentFormat::Markdown => renderer.render(&self.content),
        }
    }
}

/// Derive a category slug: an explicit slug wins, otherwise the name is
/// lowercased with whitespace runs turned into `-`
pub fn category_slug(slug: Option<&str>, name: Option<&str>) -> Option<String> {
    if let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(slug.to_string());
    }
    slugify_category(name?)
}

/// Lowercase `raw` and turn whitespace runs into `-`; blank input yields `None`
pub fn slugify_category(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        WHITESPACE_RUN
            .replace_all(&raw.to_lowercase(), "-")
            .into_owned(),
    )
}

/// Turn a provider image URL into an absolute one.
///
/// Protocol-relative URLs get `https:`, absolute URLs are kept, and relative
/// paths are joined onto `origin` when one is known.
pub fn normalize_image_url(url: &str, origin: Option<&str>) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("//") {
        return Some(format!("https:{}", url));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }
    let origin = origin?.trim_end_matches('/');
    if url.starts_with('/') {
        Some(format!("{}{}", origin, url))
    } else {
        Some(format!("{}/{}", origin, url))
    }
}

/// All categories across `posts`, deduplicated and sorted ascending
pub fn extract_categories(posts: &[PostSummary]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.categories.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sort newest first by plain string comparison of `date`
pub fn sort_by_date_desc(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
