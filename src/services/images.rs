use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::ImagesConfig;

/// Image sources that are almost never the article's lead image.
const SKIP_MARKERS: [&str; 3] = ["icon", "logo", "avatar"];

/// Best-effort extraction of a representative image from an article page.
///
/// One bounded fetch per article, no retries: any network, status or parse
/// failure simply yields no image so a slow or broken page can only stall
/// its own record.
pub struct ImageExtractor {
    client: Client,
}

impl ImageExtractor {
    pub fn new(config: &ImagesConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build image HTTP client: {e}"))?;
        Ok(Self { client })
    }

    pub async fn extract(&self, page_url: &str) -> Option<String> {
        let base = Url::parse(page_url).ok()?;
        let response = self.client.get(page_url).send().await.ok()?;
        if !response.status().is_success() {
            debug!(url = page_url, status = %response.status(), "Image fetch rejected");
            return None;
        }
        let html = response.text().await.ok()?;
        extract_from_html(&html, &base)
    }
}

/// Prefers page-metadata images, then falls back to the first inline image
/// that does not look like chrome (icons, logos, avatars).
fn extract_from_html(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in [
        r#"meta[property="og:image"]"#,
        r#"meta[name="twitter:image"]"#,
    ] {
        let Ok(meta) = Selector::parse(selector) else {
            continue;
        };
        if let Some(content) = document
            .select(&meta)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
        {
            return Some(resolve_src(content, base));
        }
    }

    let img = Selector::parse("img[src]").ok()?;
    document
        .select(&img)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .find(|src| {
            let lower = src.to_lowercase();
            !src.is_empty() && !SKIP_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .map(|src| resolve_src(src, base))
}

/// Resolves protocol-relative and root-relative sources against the page.
fn resolve_src(src: &str, base: &Url) -> String {
    if src.starts_with("//") {
        format!("{}:{src}", base.scheme())
    } else if src.starts_with('/') {
        match base.host_str() {
            Some(host) => format!("{}://{host}{src}", base.scheme()),
            None => src.to_string(),
        }
    } else {
        src.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://g1.globo.com/economia/noticia.html").unwrap()
    }

    #[test]
    fn prefers_open_graph_image() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://cdn.example/lead.jpg">
            <meta name="twitter:image" content="https://cdn.example/tw.jpg">
            </head><body><img src="https://cdn.example/inline.jpg"></body></html>"#;
        assert_eq!(
            extract_from_html(html, &base()),
            Some("https://cdn.example/lead.jpg".to_string())
        );
    }

    #[test]
    fn falls_back_to_twitter_card() {
        let html = r#"<html><head>
            <meta property="og:image" content="  ">
            <meta name="twitter:image" content="https://cdn.example/tw.jpg">
            </head></html>"#;
        assert_eq!(
            extract_from_html(html, &base()),
            Some("https://cdn.example/tw.jpg".to_string())
        );
    }

    #[test]
    fn skips_icons_logos_and_avatars() {
        let html = r#"<body>
            <img src="/assets/site-Logo.png">
            <img src="/assets/favicon-ICON.png">
            <img src="/profiles/avatar42.jpg">
            <img src="/media/photo.jpg">
            </body>"#;
        assert_eq!(
            extract_from_html(html, &base()),
            Some("https://g1.globo.com/media/photo.jpg".to_string())
        );
    }

    #[test]
    fn resolves_protocol_relative_sources() {
        let html = r#"<body><img src="//cdn.example/photo.jpg"></body>"#;
        assert_eq!(
            extract_from_html(html, &base()),
            Some("https://cdn.example/photo.jpg".to_string())
        );
    }

    #[test]
    fn no_candidates_means_no_image() {
        assert_eq!(extract_from_html("<html><body></body></html>", &base()), None);
        let chrome_only = r#"<body><img src="/logo.svg"></body>"#;
        assert_eq!(extract_from_html(chrome_only, &base()), None);
    }
}
