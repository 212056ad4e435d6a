//! Content provider selection and credential resolution

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, Result};

pub const CONTENTFUL_SPACE_ID: &str = "CONTENTFUL_SPACE_ID";
pub const CONTENTFUL_ACCESS_TOKEN: &str = "CONTENTFUL_ACCESS_TOKEN";
pub const CONTENTFUL_ENVIRONMENT: &str = "CONTENTFUL_ENVIRONMENT";
pub const CONTENTFUL_BASE_URL: &str = "CONTENTFUL_BASE_URL";
pub const STRAPI_URL: &str = "STRAPI_URL";
pub const STRAPI_API_TOKEN: &str = "STRAPI_API_TOKEN";

const DEFAULT_CONTENTFUL_ENVIRONMENT: &str = "master";
const DEFAULT_CONTENTFUL_BASE_URL: &str = "https://cdn.contentful.com";
const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";

/// Which backend supplies posts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Filesystem,
    Strapi,
    Contentful,
}

/// `provider:` section of `_config.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Post directory for the filesystem provider, relative to the site
    pub posts_dir: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Filesystem,
            posts_dir: "posts".to_string(),
        }
    }
}

/// Source of environment-style key/value settings
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

fn optional(env: &impl EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(env: &impl EnvSource, key: &str) -> Result<String> {
    optional(env, key).ok_or_else(|| ContentError::missing_var(key))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemSettings {
    pub posts_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrapiSettings {
    pub base_url: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentfulSettings {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub base_url: String,
}

impl ContentfulSettings {
    /// `{base}/spaces/{space}/environments/{env}/entries`
    pub fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url.trim_end_matches('/'),
            self.space_id,
            self.environment
        )
    }
}

/// Fully resolved settings for the active provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Filesystem(FilesystemSettings),
    Strapi(StrapiSettings),
    Contentful(ContentfulSettings),
}

impl ProviderSettings {
    /// Resolve settings for `config.kind`, failing on a missing required value
    pub fn resolve(config: &ProviderConfig, base_dir: &Path, env: &impl EnvSource) -> Result<Self> {
        let settings = match config.kind {
            ProviderKind::Filesystem => Self::Filesystem(FilesystemSettings {
                posts_dir: base_dir.join(&config.posts_dir),
            }),
            ProviderKind::Strapi => Self::Strapi(StrapiSettings {
                base_url: optional(env, STRAPI_URL)
                    .unwrap_or_else(|| DEFAULT_STRAPI_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                api_token: optional(env, STRAPI_API_TOKEN),
            }),
            ProviderKind::Contentful => Self::Contentful(ContentfulSettings {
                space_id: required(env, CONTENTFUL_SPACE_ID)?,
                access_token: required(env, CONTENTFUL_ACCESS_TOKEN)?,
                environment: optional(env, CONTENTFUL_ENVIRONMENT)
                    .unwrap_or_else(|| DEFAULT_CONTENTFUL_ENVIRONMENT.to_string()),
                base_url: optional(env, CONTENTFUL_BASE_URL)
                    .unwrap_or_else(|| DEFAULT_CONTENTFUL_BASE_URL.to_string()),
            }),
        };
        tracing::debug!("Resolved {:?} provider settings", config.kind);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn test_contentful_defaults() {
        let env = env(&[(CONTENTFUL_SPACE_ID, "space1"), (CONTENTFUL_ACCESS_TOKEN, "tok")]);
        let settings =
            ProviderSettings::resolve(&config(ProviderKind::Contentful), Path::new("."), &env)
                .unwrap();
        let ProviderSettings::Contentful(cf) = settings else {
            panic!("expected contentful settings");
        };
        assert_eq!(cf.environment, "master");
        assert_eq!(
            cf.entries_url(),
            "https://cdn.contentful.com/spaces/space1/environments/master/entries"
        );
    }

    #[test]
    fn test_contentful_missing_token_names_variable() {
        let env = env(&[(CONTENTFUL_SPACE_ID, "space1"), (CONTENTFUL_ACCESS_TOKEN, "  ")]);
        let err = ProviderSettings::resolve(&config(ProviderKind::Contentful), Path::new("."), &env)
            .unwrap_err();
        match err {
            ContentError::Config { var } => assert_eq!(var, CONTENTFUL_ACCESS_TOKEN),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_contentful_missing_space() {
        let err = ProviderSettings::resolve(
            &config(ProviderKind::Contentful),
            Path::new("."),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(CONTENTFUL_SPACE_ID));
    }

    #[test]
    fn test_strapi_defaults_and_override() {
        let settings =
            ProviderSettings::resolve(&config(ProviderKind::Strapi), Path::new("."), &HashMap::new())
                .unwrap();
        assert_eq!(
            settings,
            ProviderSettings::Strapi(StrapiSettings {
                base_url: "http://localhost:1337".to_string(),
                api_token: None,
            })
        );

        let env = env(&[(STRAPI_URL, "https://cms.example.com/")]);
        let ProviderSettings::Strapi(strapi) =
            ProviderSettings::resolve(&config(ProviderKind::Strapi), Path::new("."), &env).unwrap()
        else {
            panic!("expected strapi settings");
        };
        assert_eq!(strapi.base_url, "https://cms.example.com");
    }

    #[test]
    fn test_filesystem_posts_dir_is_relative_to_site() {
        let settings = ProviderSettings::resolve(
            &config(ProviderKind::Filesystem),
            Path::new("/site"),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(
            settings,
            ProviderSettings::Filesystem(FilesystemSettings {
                posts_dir: PathBuf::from("/site/posts"),
            })
        );
    }
}
