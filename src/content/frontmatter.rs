//! Front-matter parsing for local post files

use anyhow::{anyhow, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Raw `categories` value: a single name, a list, or something unusable
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    One(String),
    Many(Vec<String>),
    Malformed(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Accept `date: 2024-01-01`, `date: "2024-01-01"` and bare numbers alike
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

fn category_field<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CategoryField>::deserialize(deserializer)? {
        None => Some(Vec::new()),
        Some(CategoryField::One(name)) => Some(vec![name]),
        Some(CategoryField::Many(names)) => Some(names),
        Some(CategoryField::Malformed(_)) => None,
    })
}

fn empty_categories() -> Option<Vec<String>> {
    Some(Vec::new())
}

/// Metadata header of a post file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<String>,

    /// `None` when the header carries a value that is not a string list
    #[serde(deserialize_with = "category_field", default = "empty_categories")]
    pub categories: Option<Vec<String>>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            slug: None,
            excerpt: None,
            image: None,
            categories: Some(Vec::new()),
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Ok(Self::parse_yaml(content));
        }
        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    /// Categories for listing; malformed values read as none
    pub fn categories(&self) -> Vec<String> {
        self.categories.clone().unwrap_or_default()
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = content[3..].trim_start_matches(['\n', '\r']);
        let Some(end) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let header = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']);

        if header.trim().is_empty() {
            return (FrontMatter::default(), body);
        }
        // A `---` rule at the top of prose is not a header
        if !looks_like_yaml(header) {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(header) {
            Ok(fm) => (fm, body),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        let (json, body) = if let Some(rest) = content.strip_prefix(";;;") {
            let end = rest
                .find(";;;")
                .ok_or_else(|| anyhow!("Unterminated JSON front-matter"))?;
            (&rest[..end], &rest[end + 3..])
        } else {
            let end = matching_brace(content).ok_or_else(|| anyhow!("Invalid JSON front-matter"))?;
            (&content[..end], &content[end..])
        };

        let fm: FrontMatter = serde_json::from_str(json)
            .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;
        Ok((fm, body.trim_start_matches(['\n', '\r'])))
    }
}

/// At least one `key: value` line with a plain identifier key
fn looks_like_yaml(header: &str) -> bool {
    header.lines().map(str::trim).any(|line| {
        if line.is_empty() || line.starts_with('#') {
            return false;
        }
        let Some((key, value)) = line.split_once(':') else {
            return false;
        };
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp")
            && (value.is_empty() || value.starts_with(' '))
    })
}

/// Byte offset just past the brace closing the object that opens `content`
fn matching_brace(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in content.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
