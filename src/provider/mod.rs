//! Content providers
//!
//! Every backend exposes the same three operations to the page layer:
//! list all posts, fetch one post by slug, and list the category set.
//! The active provider is chosen once from [`ProviderSettings`] and passed
//! around as `Arc<dyn ContentProvider>`.

pub mod contentful;
pub mod filesystem;
pub mod strapi;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::ProviderSettings;
use crate::content::{extract_categories, MarkdownRenderer, PostDetail, PostSummary};
use crate::error::{ContentError, Result};

pub use contentful::ContentfulProvider;
pub use filesystem::FilesystemProvider;
pub use strapi::StrapiProvider;

/// A source of blog posts
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short identifier used in logs ("filesystem", "strapi", "contentful")
    fn name(&self) -> &'static str;

    /// All posts with a slug and title, newest first
    async fn list_posts(&self) -> Result<Vec<PostSummary>>;

    /// One post by slug; [`ContentError::NotFound`] when absent
    async fn get_post(&self, slug: &str) -> Result<PostDetail>;

    /// Sorted, deduplicated category slugs
    async fn list_categories(&self) -> Result<Vec<String>> {
        let posts = self.list_posts().await?;
        Ok(extract_categories(&posts))
    }
}

/// Build the provider selected by `settings`.
///
/// `renderer` converts local Markdown files; remote providers hand back raw
/// Markdown and ignore it.
pub fn from_settings(
    settings: ProviderSettings,
    renderer: MarkdownRenderer,
) -> Result<Arc<dyn ContentProvider>> {
    let provider: Arc<dyn ContentProvider> = match settings {
        ProviderSettings::Filesystem(s) => Arc::new(FilesystemProvider::with_renderer(s, renderer)),
        ProviderSettings::Strapi(s) => Arc::new(StrapiProvider::new(s)?),
        ProviderSettings::Contentful(s) => Arc::new(ContentfulProvider::new(s)?),
    };
    tracing::info!("Using {} content provider", provider.name());
    Ok(provider)
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?)
}

/// Send a GET request and decode its JSON body; non-2xx is a transport error
async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let url = redacted(response.url());
    tracing::debug!("GET {} -> {}", url, status);

    if !status.is_success() {
        return Err(ContentError::Transport { url, status });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// URL with any `access_token` query value masked
fn redacted(url: &reqwest::Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "access_token") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut url = url.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}
