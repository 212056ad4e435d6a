//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::config::{ProcessEnv, ProviderSettings};
use crate::Folio;

/// Scaffold `{posts_dir}/{slug}.md` for the filesystem provider
pub fn create_post(folio: &Folio, title: &str) -> Result<PathBuf> {
    let posts_dir = match folio.provider_settings(&ProcessEnv)? {
        ProviderSettings::Filesystem(settings) => settings.posts_dir,
        _ => anyhow::bail!(
            "New posts can only be created for the filesystem provider; write them in the CMS instead"
        ),
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title: {:?}", title);
    }

    fs::create_dir_all(&posts_dir)?;
    let file_path = posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        "---\ntitle: {}\ndate: {}\ncategories: []\n---\n\n<!-- more -->\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
