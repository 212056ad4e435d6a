//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateReport, Generator};
use crate::Folio;

/// Build the site with the configured provider
pub async fn run(folio: &Folio) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let provider = folio.provider()?;
    let generator = Generator::new(folio, provider)?;
    let report = generator.generate().await?;

    if !report.skipped.is_empty() {
        tracing::warn!(
            "{} listed posts could not be fetched: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts and {} category pages in {:.2}s",
        report.posts,
        report.categories,
        duration.as_secs_f64()
    );

    Ok(report)
}
