//! Strategia 2: scraping dell'HTML della pagina del post
//!
//! Scarica la pagina con user-agent mobile (i redirect vengono seguiti)
//! e cerca gli URL del media nel JSON incorporato nel markup; per le
//! foto ripiega sul meta-tag Open Graph. Gli ampersand escapati negli
//! URL estratti vanno decodificati prima dell'uso.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header;
use tracing::debug;

use super::shortcode::PostLink;
use super::traits::{MediaDescriptor, MediaSource, ResolveError};
use crate::entities::MediaKind;

const NAME: &str = "page-scrape";

const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) \
                         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 \
                         Mobile/15E148 Safari/604.1";

lazy_static! {
    static ref VIDEO_URL: Regex = Regex::new(r#""video_url":"([^"]+)""#).unwrap();
    static ref DISPLAY_URL: Regex = Regex::new(r#""display_url":"([^"]+)""#).unwrap();
    static ref OG_IMAGE: Regex = Regex::new(r#"property="og:image"\s+content="([^"]+)""#).unwrap();
}

pub struct PageScrapeSource {
    http: reqwest::Client,
    timeout: Duration,
}

impl PageScrapeSource {
    pub fn new(http: reqwest::Client, timeout: Duration) -> PageScrapeSource {
        Self { http, timeout }
    }
}

#[async_trait]
impl MediaSource for PageScrapeSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve(&self, link: &PostLink) -> Result<MediaDescriptor, ResolveError> {
        debug!(shortcode = %link.shortcode, "scraping post page");

        let response = self
            .http
            .get(&link.url)
            .header(header::USER_AGENT, MOBILE_UA)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Network(format!("status {status}")));
        }

        let html = response.text().await?;
        extract_media(&html).ok_or(ResolveError::NotFound)
    }
}

/// Cerca nel markup, in ordine: URL video, URL foto, meta-tag og:image.
fn extract_media(html: &str) -> Option<MediaDescriptor> {
    if let Some(captures) = VIDEO_URL.captures(html) {
        return Some(MediaDescriptor {
            kind: MediaKind::Video,
            url: decode_ampersands(&captures[1]),
            thumbnail: None,
            source: NAME,
        });
    }

    if let Some(captures) = DISPLAY_URL.captures(html) {
        return Some(MediaDescriptor {
            kind: MediaKind::Photo,
            url: decode_ampersands(&captures[1]),
            thumbnail: None,
            source: NAME,
        });
    }

    let captures = OG_IMAGE.captures(html)?;
    Some(MediaDescriptor {
        kind: MediaKind::Photo,
        url: decode_ampersands(&captures[1]),
        thumbnail: None,
        source: NAME,
    })
}

fn decode_ampersands(url: &str) -> String {
    url.replace("\\u0026", "&").replace("&amp;", "&")
}
