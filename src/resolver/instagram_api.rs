//! Strategia 1: endpoint JSON non documentato di Instagram
//!
//! Interroga `?__a=1&__d=dis` fingendosi un browser desktop. La risposta
//! non è garantita dall'upstream: storicamente si sono viste due forme
//! ("items" e "graphql"), ognuna isolata nella propria funzione di parse
//! così che un cambio di forma spenga una sola strategia.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use tracing::debug;

use super::shortcode::PostLink;
use super::traits::{MediaDescriptor, MediaSource, ResolveError};
use crate::entities::MediaKind;

const NAME: &str = "instagram-api";

const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

pub struct InstagramApiSource {
    http: reqwest::Client,
    timeout: Duration,
}

impl InstagramApiSource {
    pub fn new(http: reqwest::Client, timeout: Duration) -> InstagramApiSource {
        Self { http, timeout }
    }
}

#[async_trait]
impl MediaSource for InstagramApiSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve(&self, link: &PostLink) -> Result<MediaDescriptor, ResolveError> {
        let endpoint = format!(
            "https://www.instagram.com/p/{}/?__a=1&__d=dis",
            link.shortcode
        );
        debug!(shortcode = %link.shortcode, "querying structured endpoint");

        let response = self
            .http
            .get(&endpoint)
            .header(header::USER_AGENT, DESKTOP_UA)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(header::CONNECTION, "keep-alive")
            .header(header::UPGRADE_INSECURE_REQUESTS, "1")
            .header("X-Requested-With", "XMLHttpRequest")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ResolveError::Network(format!("status {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| ResolveError::Parse("body is not JSON"))?;

        parse_payload(&body).ok_or(ResolveError::NotFound)
    }
}

/// Prova prima la forma "items", poi la forma "graphql".
fn parse_payload(body: &Value) -> Option<MediaDescriptor> {
    parse_items_shape(body).or_else(|| parse_graphql_shape(body))
}

/// Forma "items": `items[0].video_versions` non vuoto marca un video,
/// altrimenti vale la prima candidata di `image_versions2`.
fn parse_items_shape(body: &Value) -> Option<MediaDescriptor> {
    let item = body.pointer("/items/0")?;

    if let Some(video_url) = item.pointer("/video_versions/0/url").and_then(Value::as_str) {
        let thumbnail = item
            .pointer("/image_versions2/candidates/0/url")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Some(MediaDescriptor {
            kind: MediaKind::Video,
            url: video_url.to_owned(),
            thumbnail,
            source: NAME,
        });
    }

    let photo_url = item
        .pointer("/image_versions2/candidates/0/url")
        .and_then(Value::as_str)?;
    Some(MediaDescriptor {
        kind: MediaKind::Photo,
        url: photo_url.to_owned(),
        thumbnail: None,
        source: NAME,
    })
}

/// Forma "graphql": `shortcode_media.is_video` sceglie tra `video_url`
/// e `display_url`; un video senza `video_url` degrada a foto.
fn parse_graphql_shape(body: &Value) -> Option<MediaDescriptor> {
    let media = body.pointer("/graphql/shortcode_media")?;
    let display_url = media
        .get("display_url")
        .and_then(Value::as_str)
        .map(str::to_owned);

    if media.get("is_video").and_then(Value::as_bool).unwrap_or(false) {
        if let Some(video_url) = media.get("video_url").and_then(Value::as_str) {
            return Some(MediaDescriptor {
                kind: MediaKind::Video,
                url: video_url.to_owned(),
                thumbnail: display_url,
                source: NAME,
            });
        }
    }

    Some(MediaDescriptor {
        kind: MediaKind::Photo,
        url: display_url?,
        thumbnail: None,
        source: NAME,
    })
}
