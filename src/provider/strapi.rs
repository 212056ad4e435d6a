//! Strapi REST backend
//!
//! Strapi v4 wraps every record as `{ id, attributes: {...} }` and every
//! relation as `{ data: ... }`. Strapi v5 drops both envelopes; records are
//! read the same way either way.

use async_trait::async_trait;
use serde_json::Value;

use super::{get_json, http_client, ContentProvider};
use crate::config::StrapiSettings;
use crate::content::{category_slug, normalize_image_url, ContentFormat, PostDetail, PostSummary};
use crate::error::{ContentError, Result};

const POPULATE: (&str, &str) = ("populate", "categories,image");

pub struct StrapiProvider {
    settings: StrapiSettings,
    client: reqwest::Client,
}

impl StrapiProvider {
    pub fn new(settings: StrapiSettings) -> Result<Self> {
        Ok(Self {
            settings,
            client: http_client()?,
        })
    }

    fn posts_request(&self) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(format!("{}/api/posts", self.settings.base_url))
            .query(&[POPULATE]);
        match &self.settings.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentProvider for StrapiProvider {
    fn name(&self) -> &'static str {
        "strapi"
    }

    async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let body: Value = get_json(self.posts_request().query(&[("sort", "date:desc")])).await?;
        Ok(normalize_posts(&body, &self.settings.base_url))
    }

    async fn get_post(&self, slug: &str) -> Result<PostDetail> {
        let body: Value =
            get_json(self.posts_request().query(&[("filters[slug][$eq]", slug)])).await?;

        let item = records(&body)
            .first()
            .ok_or_else(|| ContentError::not_found(slug))?;
        let summary = normalize_post(item, &self.settings.base_url)
            .ok_or_else(|| ContentError::not_found(slug))?;
        let content = attributes(item)
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(PostDetail::new(summary, content, ContentFormat::Markdown))
    }
}

/// The `data` array of a collection response
fn records(body: &Value) -> &[Value] {
    body.get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Unwrap the v4 `attributes` envelope if present
fn attributes(record: &Value) -> &Value {
    record.get("attributes").unwrap_or(record)
}

/// Unwrap a relation's `data` envelope if present
fn relation(value: &Value) -> &Value {
    value.get("data").unwrap_or(value)
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Normalize every record of a collection response, dropping incomplete ones
pub fn normalize_posts(body: &Value, origin: &str) -> Vec<PostSummary> {
    records(body)
        .iter()
        .filter_map(|item| {
            let post = normalize_post(item, origin);
            if post.is_none() {
                let id = item.get("id").map(Value::to_string).unwrap_or_default();
                tracing::warn!("Skipping Strapi post {} without slug or title", id);
            }
            post
        })
        .collect()
}

/// Flatten one Strapi post record; relative image URLs are joined to `origin`
pub fn normalize_post(item: &Value, origin: &str) -> Option<PostSummary> {
    let attrs = attributes(item);
    let mut post = PostSummary::new(
        str_field(attrs, "slug"),
        str_field(attrs, "title"),
        str_field(attrs, "date"),
        str_field(attrs, "excerpt"),
    )?;

    post.categories = attrs
        .get("categories")
        .map(relation)
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter()
                .map(attributes)
                .filter_map(|c| category_slug(str_field(c, "slug"), str_field(c, "name")))
                .collect()
        })
        .unwrap_or_default();

    post.image = attrs
        .get("image")
        .map(relation)
        .map(attributes)
        .and_then(|img| str_field(img, "url"))
        .and_then(|url| normalize_image_url(url, Some(origin)));

    Some(post)
}
