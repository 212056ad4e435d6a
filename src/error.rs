//! Error types for content providers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while fetching or normalizing content
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Missing environment variable: {var}")]
    Config { var: String },

    #[error("Request to {url} failed with status {status}")]
    Transport {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Post with slug {slug} not found")]
    NotFound { slug: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    pub fn missing_var(var: &str) -> Self {
        Self::Config {
            var: var.to_string(),
        }
    }

    pub fn not_found(slug: &str) -> Self {
        Self::NotFound {
            slug: slug.to_string(),
        }
    }

    /// True when the requested record does not exist, as opposed to a
    /// configuration or transport failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct() {
        assert!(ContentError::not_found("x").is_not_found());
        assert!(!ContentError::missing_var("CONTENTFUL_SPACE_ID").is_not_found());
    }

    #[test]
    fn test_config_error_names_variable() {
        let err = ContentError::missing_var("CONTENTFUL_ACCESS_TOKEN");
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CONTENTFUL_ACCESS_TOKEN"
        );
    }
}
