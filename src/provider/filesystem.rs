//! Local directory of Markdown posts, one `{slug}.md` file per post

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ContentProvider;
use crate::config::FilesystemSettings;
use crate::content::{
    category_slug, normalize_image_url, sort_by_date_desc, ContentFormat, FrontMatter,
    MarkdownRenderer, PostDetail, PostSummary,
};
use crate::error::{ContentError, Result};

const EXTENSIONS: [&str; 2] = ["md", "markdown"];

pub struct FilesystemProvider {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl FilesystemProvider {
    pub fn new(settings: FilesystemSettings) -> Self {
        Self::with_renderer(settings, MarkdownRenderer::new())
    }

    pub fn with_renderer(settings: FilesystemSettings, renderer: MarkdownRenderer) -> Self {
        Self {
            posts_dir: settings.posts_dir,
            renderer,
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Markdown files directly inside the posts directory, by file name
    fn post_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Path of `{slug}.md` (or `.markdown`) if such a post exists
    fn find_post(&self, slug: &str) -> Option<PathBuf> {
        if !is_plain_slug(slug) {
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.posts_dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }
}

#[async_trait]
impl ContentProvider for FilesystemProvider {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let mut posts = Vec::new();
        for path in self.post_files()? {
            let content = fs::read_to_string(&path)?;
            match parse_post(&path, &content) {
                Some((post, _)) => posts.push(post),
                None => tracing::warn!("Skipping {:?}: missing title or slug", path),
            }
        }

        sort_by_date_desc(&mut posts);
        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// `{slug}.md` is tried first; otherwise every file is scanned for a
    /// front-matter `slug` that matches, so listed slugs always resolve.
    async fn get_post(&self, slug: &str) -> Result<PostDetail> {
        if !is_plain_slug(slug) {
            return Err(ContentError::not_found(slug));
        }

        let mut candidates: Vec<PathBuf> = self.find_post(slug).into_iter().collect();
        candidates.extend(self.post_files()?);

        for path in candidates {
            let content = fs::read_to_string(&path)?;
            let Some((summary, body)) = parse_post(&path, &content) else {
                continue;
            };
            if summary.slug != slug {
                continue;
            }
            tracing::debug!("Resolved {} to {:?}", slug, path);

            let (_, full) = MarkdownRenderer::split_excerpt(body);
            let html = self.renderer.render(&full);
            return Ok(PostDetail::new(summary, html, ContentFormat::Html));
        }

        Err(ContentError::not_found(slug))
    }

    /// Rescans every file; headers whose categories are not a list are skipped
    async fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = BTreeSet::new();
        for path in self.post_files()? {
            let content = fs::read_to_string(&path)?;
            let names = match FrontMatter::parse(&content) {
                Ok((fm, _)) => fm.categories,
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };
            let Some(names) = names else {
                tracing::debug!("Skipping {:?}: categories are not a list", path);
                continue;
            };
            categories.extend(names.iter().filter_map(|n| category_slug(None, Some(n))));
        }
        Ok(categories.into_iter().collect())
    }
}

/// Build a summary from a post file, returning it with the Markdown body
fn parse_post<'a>(path: &Path, content: &'a str) -> Option<(PostSummary, &'a str)> {
    let (fm, body) = match FrontMatter::parse(content) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Invalid front-matter in {:?}: {}", path, e);
            (FrontMatter::default(), content)
        }
    };

    let stem = path.file_stem().and_then(|s| s.to_str());
    let slug = fm.slug.as_deref().or(stem);

    let (marked_excerpt, _) = MarkdownRenderer::split_excerpt(body);
    let excerpt = fm.excerpt.clone().or(marked_excerpt);

    let mut post = PostSummary::new(
        slug,
        fm.title.as_deref(),
        fm.date.as_deref(),
        excerpt.as_deref(),
    )?;
    post.categories = fm
        .categories()
        .iter()
        .filter_map(|name| category_slug(None, Some(name)))
        .collect();
    // Site-rooted paths such as /images/x.png stay as they are
    post.image = fm.image.as_deref().and_then(|url| {
        normalize_image_url(url, None).or_else(|| url.starts_with('/').then(|| url.to_string()))
    });

    Some((post, body))
}

/// A slug usable as a file name: non-empty, no separators, no `..`
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provider(dir: &TempDir) -> FilesystemProvider {
        FilesystemProvider::new(FilesystemSettings {
            posts_dir: dir.path().to_path_buf(),
        })
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_list_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write(&dir, "january.md", "---\ntitle: January\ndate: 2024-01-01\n---\nbody");
        write(&dir, "december.md", "---\ntitle: December\ndate: 2024-12-31\n---\nbody");
        write(&dir, "notes.txt", "not a post");

        let posts = provider(&dir).list_posts().await.unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["december", "january"]);
    }

    #[tokio::test]
    async fn test_list_posts_fields() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "sql-migration.md",
            "---\ntitle: SQL Migration\ndate: 2024-02-02\ncategories: [IT Solutions, Databases]\nimage: //cdn.example.com/db.png\n---\nFirst para.\n<!-- more -->\nRest.",
        );

        let posts = provider(&dir).list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.slug, "sql-migration");
        assert_eq!(post.categories, vec!["it-solutions", "databases"]);
        assert_eq!(post.excerpt, "First para.");
        assert_eq!(post.image.as_deref(), Some("https://cdn.example.com/db.png"));
    }

    #[tokio::test]
    async fn test_untitled_posts_dropped_and_bad_categories_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "untitled.md", "---\ndate: 2024-01-01\n---\nbody");
        write(&dir, "odd.md", "---\ntitle: Odd\ncategories: 42\n---\nbody");

        let posts = provider(&dir).list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "odd");
        assert!(posts[0].categories.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let provider = FilesystemProvider::new(FilesystemSettings {
            posts_dir: dir.path().join("missing"),
        });
        assert!(matches!(
            provider.list_posts().await,
            Err(ContentError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_get_post_renders_html() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\n---\nIntro\n<!-- more -->\n## Section",
        );

        let detail = provider(&dir).get_post("hello").await.unwrap();
        assert_eq!(detail.summary.title, "Hello");
        assert_eq!(detail.format, ContentFormat::Html);
        assert!(detail.content.contains("<h2>Section</h2>"));
        assert!(!detail.content.contains("more"));
    }

    #[tokio::test]
    async fn test_get_post_by_front_matter_slug() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "2024-01-01-draft.md",
            "---\ntitle: Hello\nslug: hello\ndate: 2024-01-01\n---\nBody",
        );
        write(&dir, "other.md", "---\ntitle: Other\n---\nOther body");

        let provider = provider(&dir);
        let listed = provider.list_posts().await.unwrap();
        assert!(listed.iter().any(|p| p.slug == "hello"));

        let detail = provider.get_post("hello").await.unwrap();
        assert_eq!(detail.summary.slug, "hello");
        assert!(detail.content.contains("Body"));

        // the file stem is not the post's slug
        let err = provider.get_post("2024-01-01-draft").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        for slug in ["missing-slug", "../etc/passwd", ""] {
            let err = provider.get_post(slug).await.unwrap_err();
            assert!(err.is_not_found(), "{slug}: {err}");
        }
    }

    #[tokio::test]
    async fn test_list_categories_skips_malformed() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", "---\ntitle: A\ncategories: [Cloud, AI Tools]\n---\n");
        write(&dir, "b.md", "---\ntitle: B\ncategories: cloud\n---\n");
        write(&dir, "c.md", "---\ntitle: C\ncategories:\n  nested: map\n---\n");

        let categories = provider(&dir).list_categories().await.unwrap();
        assert_eq!(categories, vec!["ai-tools", "cloud"]);
    }
}
