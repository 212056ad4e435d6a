//! Preview server for the generated site

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Folio;

/// Router serving `public_dir`, with `404.html` for unknown paths
pub fn router(public_dir: &Path) -> Router {
    let serve_dir = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
}

/// Serve the already generated site until interrupted
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(&folio.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serves_pages_and_404() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts/hello")).unwrap();
        fs::write(dir.path().join("posts/hello/index.html"), "hello page").unwrap();
        fs::write(dir.path().join("404.html"), "nothing here").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(dir.path());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let page = reqwest::get(format!("http://{}/posts/hello/", addr))
            .await
            .unwrap();
        assert!(page.status().is_success());
        assert_eq!(page.text().await.unwrap(), "hello page");

        let missing = reqwest::get(format!("http://{}/posts/nope/", addr))
            .await
            .unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(missing.text().await.unwrap(), "nothing here");
    }
}
