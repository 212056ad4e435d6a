//! Configuration module

mod provider;
mod site;

pub use provider::{
    ContentfulSettings, EnvSource, FilesystemSettings, ProcessEnv, ProviderConfig, ProviderKind,
    ProviderSettings, StrapiSettings, CONTENTFUL_ACCESS_TOKEN, CONTENTFUL_BASE_URL,
    CONTENTFUL_ENVIRONMENT, CONTENTFUL_SPACE_ID, STRAPI_API_TOKEN, STRAPI_URL,
};
pub use site::{AboutConfig, HighlightConfig, SiteConfig};
