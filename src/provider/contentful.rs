//! Contentful Content Delivery API backend
//!
//! Entries reference categories and images by id only; the referenced
//! objects arrive once in the response's `includes` side table. Two lookup
//! tables are built per response and every post entry is resolved against
//! them in a single pass.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{get_json, http_client, ContentProvider};
use crate::config::ContentfulSettings;
use crate::content::{
    normalize_image_url, slugify_category, ContentFormat, PostDetail, PostSummary,
};
use crate::error::{ContentError, Result};

const POST_CONTENT_TYPE: &str = "post";
const CATEGORY_CONTENT_TYPE: &str = "category";
const INCLUDE_DEPTH: &str = "2";

/// Body of `GET /spaces/{space}/environments/{env}/entries`
#[derive(Debug, Default, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub items: Vec<Entry>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default, rename = "Asset")]
    pub assets: Vec<Entry>,
    #[serde(default, rename = "Entry")]
    pub entries: Vec<Entry>,
}

/// An entry or asset; `fields` is kept loose so odd entries never fail the
/// whole response
#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub fields: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "contentType")]
    pub content_type: Option<Link>,
}

/// `{ "sys": { "id": ... } }`
#[derive(Debug, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Deserialize)]
pub struct LinkSys {
    pub id: String,
}

impl Entry {
    fn content_type(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|l| l.sys.id.as_str())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Id of a link object such as `{"sys": {"type": "Link", "id": "A1"}}`
fn link_id(link: &Value) -> Option<&str> {
    link.pointer("/sys/id").and_then(Value::as_str)
}

/// Lookup tables over a response's `includes`
pub struct LinkTable<'a> {
    assets: HashMap<&'a str, &'a Entry>,
    categories: HashMap<&'a str, &'a Entry>,
}

impl<'a> LinkTable<'a> {
    pub fn new(includes: &'a Includes) -> Self {
        let assets = includes
            .assets
            .iter()
            .map(|a| (a.sys.id.as_str(), a))
            .collect();
        let categories = includes
            .entries
            .iter()
            .filter(|e| e.content_type() == Some(CATEGORY_CONTENT_TYPE))
            .map(|e| (e.sys.id.as_str(), e))
            .collect();
        Self { assets, categories }
    }

    /// Category slug for a reference; unresolved references yield `None`.
    /// The entry's `slug` (or `name`) is slugified either way.
    fn category(&self, link: &Value) -> Option<String> {
        let id = link_id(link)?;
        let Some(entry) = self.categories.get(id) else {
            tracing::warn!("Dropping unresolved category reference {}", id);
            return None;
        };
        let raw = entry
            .str_field("slug")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| entry.str_field("name"))?;
        slugify_category(raw)
    }

    /// Absolute image URL for an asset reference
    fn image(&self, link: &Value) -> Option<String> {
        let asset = self.assets.get(link_id(link)?)?;
        let url = asset.fields.pointer("/file/url").and_then(Value::as_str)?;
        normalize_image_url(url, None)
    }

    /// Normalize one post entry; `None` when slug or title is missing
    pub fn normalize(&self, entry: &Entry) -> Option<PostSummary> {
        let mut post = PostSummary::new(
            entry.str_field("slug"),
            entry.str_field("title"),
            entry.str_field("date"),
            entry.str_field("excerpt"),
        )?;

        post.categories = entry
            .fields
            .get("categories")
            .and_then(Value::as_array)
            .map(|refs| refs.iter().filter_map(|r| self.category(r)).collect())
            .unwrap_or_default();

        post.image = entry.fields.get("image").and_then(|r| self.image(r));

        Some(post)
    }
}

/// Normalize every post entry of a response, dropping incomplete ones
pub fn normalize_entries(response: &EntriesResponse) -> Vec<PostSummary> {
    let links = LinkTable::new(&response.includes);
    response
        .items
        .iter()
        .filter_map(|entry| {
            let post = links.normalize(entry);
            if post.is_none() {
                tracing::warn!(
                    "Skipping Contentful entry {} without slug or title",
                    entry.sys.id
                );
            }
            post
        })
        .collect()
}

pub struct ContentfulProvider {
    settings: ContentfulSettings,
    client: reqwest::Client,
}

impl ContentfulProvider {
    pub fn new(settings: ContentfulSettings) -> Result<Self> {
        Ok(Self {
            settings,
            client: http_client()?,
        })
    }

    fn entries_request(&self) -> reqwest::RequestBuilder {
        self.client.get(self.settings.entries_url()).query(&[
            ("access_token", self.settings.access_token.as_str()),
            ("content_type", POST_CONTENT_TYPE),
            ("include", INCLUDE_DEPTH),
        ])
    }
}

#[async_trait]
impl ContentProvider for ContentfulProvider {
    fn name(&self) -> &'static str {
        "contentful"
    }

    async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let response: EntriesResponse =
            get_json(self.entries_request().query(&[("order", "-fields.date")])).await?;
        Ok(normalize_entries(&response))
    }

    async fn get_post(&self, slug: &str) -> Result<PostDetail> {
        let response: EntriesResponse = get_json(
            self.entries_request()
                .query(&[("fields.slug", slug), ("limit", "1")]),
        )
        .await?;

        let entry = response
            .items
            .first()
            .ok_or_else(|| ContentError::not_found(slug))?;
        let summary = LinkTable::new(&response.includes)
            .normalize(entry)
            .ok_or_else(|| ContentError::not_found(slug))?;

        let content = match entry.fields.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(other) if !other.is_null() => {
                tracing::warn!("Post {} content is not Markdown text, ignoring it", slug);
                String::new()
            }
            _ => String::new(),
        };

        Ok(PostDetail::new(summary, content, ContentFormat::Markdown))
    }
}
