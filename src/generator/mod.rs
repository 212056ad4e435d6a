//! Generator module - renders the site pages from provider content
//!
//! Pages: home (`index.html`), `about/`, one `categories/{slug}/` per
//! category and one `posts/{slug}/` per post, plus `404.html`.

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tera::Context;
use tokio::task::JoinSet;

use crate::content::{extract_categories, FrontMatter, MarkdownRenderer, PostDetail, PostSummary};
use crate::helpers::{category_route, post_route, url_for};
use crate::provider::ContentProvider;
use crate::templates::{
    category_label, AboutData, CategoryLink, PostData, SiteData, TemplateRenderer,
};
use crate::Folio;

/// A slug that can name a single output directory
fn is_page_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Outcome of a site build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub posts: usize,
    pub categories: usize,
    /// Listed posts without a page: unusable slugs or a not-found detail
    pub skipped: Vec<String>,
}

/// Static site generator using Tera templates
pub struct Generator {
    folio: Folio,
    provider: Arc<dyn ContentProvider>,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    pub fn new(folio: &Folio, provider: Arc<dyn ContentProvider>) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            provider,
            renderer: TemplateRenderer::new()?,
            markdown: folio.markdown_renderer(),
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateReport> {
        fs::create_dir_all(&self.folio.public_dir)?;

        let listed = self
            .provider
            .list_posts()
            .await
            .with_context(|| format!("Failed to list posts from {}", self.provider.name()))?;

        // Posts that cannot get a page are never linked either
        let (posts, unroutable): (Vec<_>, Vec<_>) =
            listed.into_iter().partition(|p| is_page_name(&p.slug));
        for post in &unroutable {
            tracing::warn!("Skipping post with unusable slug {:?}", post.slug);
        }
        let categories: Vec<String> = extract_categories(&posts)
            .into_iter()
            .filter(|c| {
                let usable = is_page_name(c);
                if !usable {
                    tracing::warn!("Skipping category with unusable slug {:?}", c);
                }
                usable
            })
            .collect();
        tracing::info!(
            "Loaded {} posts in {} categories",
            posts.len(),
            categories.len()
        );

        let site = self.build_site_data(&categories);

        self.generate_index(&site, &posts)?;
        self.generate_category_pages(&site, &posts, &categories)?;
        let not_found = self.generate_post_pages(&site, &posts).await?;
        self.generate_about(&site)?;
        self.generate_not_found(&site)?;

        let mut skipped: Vec<String> = unroutable.into_iter().map(|p| p.slug).collect();
        skipped.extend(not_found.iter().cloned());
        skipped.sort();

        Ok(GenerateReport {
            posts: posts.len() - not_found.len(),
            categories: categories.len(),
            skipped,
        })
    }

    fn build_site_data(&self, categories: &[String]) -> SiteData {
        let config = &self.folio.config;
        SiteData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            root: url_for(config, ""),
            date_format: config.date_format.clone(),
            year: chrono::Local::now().year().to_string(),
            categories: categories.iter().map(|c| self.category_link(c)).collect(),
        }
    }

    fn category_link(&self, category: &str) -> CategoryLink {
        CategoryLink {
            slug: category.to_string(),
            label: category_label(category),
            path: url_for(&self.folio.config, &category_route(category)),
        }
    }

    fn post_data(&self, post: &PostSummary) -> PostData {
        PostData {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date.clone(),
            excerpt: post.excerpt.clone(),
            image: post.image.clone(),
            path: url_for(&self.folio.config, &post_route(&post.slug)),
            categories: post
                .categories
                .iter()
                .filter(|c| is_page_name(c))
                .map(|c| self.category_link(c))
                .collect(),
        }
    }

    fn base_context(&self, site: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site);
        context
    }

    fn generate_index(&self, site: &SiteData, posts: &[PostSummary]) -> Result<()> {
        let cards: Vec<PostData> = posts.iter().map(|p| self.post_data(p)).collect();
        let mut context = self.base_context(site);
        context.insert("posts", &cards);
        let html = self.renderer.render("index.html", &context)?;
        self.write_page("", &html)
    }

    fn generate_category_pages(
        &self,
        site: &SiteData,
        posts: &[PostSummary],
        categories: &[String],
    ) -> Result<()> {
        for category in categories {
            let cards: Vec<PostData> = posts
                .iter()
                .filter(|p| p.has_category(category))
                .map(|p| self.post_data(p))
                .collect();

            let mut context = self.base_context(site);
            context.insert("category", &self.category_link(category));
            context.insert("posts", &cards);
            let html = self.renderer.render("category.html", &context)?;
            self.write_page(&format!("categories/{}/", category), &html)?;
        }
        Ok(())
    }

    /// Fetch every post's detail concurrently, then render each one.
    /// Returns the slugs that turned out not to exist.
    async fn generate_post_pages(
        &self,
        site: &SiteData,
        posts: &[PostSummary],
    ) -> Result<Vec<String>> {
        let mut fetches = JoinSet::new();
        for post in posts {
            let provider = Arc::clone(&self.provider);
            let slug = post.slug.clone();
            fetches.spawn(async move {
                let detail = provider.get_post(&slug).await;
                (slug, detail)
            });
        }

        let mut details: Vec<(String, PostDetail)> = Vec::with_capacity(posts.len());
        let mut skipped = Vec::new();
        while let Some(joined) = fetches.join_next().await {
            let (slug, detail) = joined.context("Post fetch task failed")?;
            match detail {
                Ok(detail) => details.push((slug, detail)),
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Skipping post page {}: {}", slug, e);
                    skipped.push(slug);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to fetch post {}", slug));
                }
            }
        }

        for (slug, detail) in &details {
            let mut context = self.base_context(site);
            context.insert("post", &self.post_data(&detail.summary));
            context.insert("content", &detail.to_html(&self.markdown));
            let html = self.renderer.render("post.html", &context)?;
            self.write_page(&format!("posts/{}/", slug), &html)?;
        }

        skipped.sort();
        Ok(skipped)
    }

    fn generate_about(&self, site: &SiteData) -> Result<()> {
        let about = &self.folio.config.about;
        let source = self.folio.base_dir.join(&about.source);
        let content = if source.is_file() {
            let raw = fs::read_to_string(&source)?;
            let (_, body) = FrontMatter::parse(&raw)?;
            self.markdown.render(body)
        } else {
            tracing::debug!("No about page source at {:?}", source);
            String::new()
        };

        let data = AboutData {
            heading: about.heading.clone(),
            content,
            avatar: about.avatar.clone(),
            email: about.email.clone(),
            github: about.github.clone(),
            linkedin: about.linkedin.clone(),
        };
        let mut context = self.base_context(site);
        context.insert("about", &data);
        let html = self.renderer.render("about.html", &context)?;
        self.write_page("about/", &html)
    }

    fn generate_not_found(&self, site: &SiteData) -> Result<()> {
        let html = self.renderer.render("404.html", &self.base_context(site))?;
        let path = self.folio.public_dir.join("404.html");
        fs::write(&path, html)?;
        tracing::debug!("Generated: {:?}", path);
        Ok(())
    }

    /// Write `{public_dir}/{dir}index.html`. Post and category directories
    /// use the decoded slug, matching what the static server looks up.
    fn write_page(&self, dir: &str, html: &str) -> Result<()> {
        let output_path: PathBuf = self.folio.public_dir.join(dir).join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}
