//! Orchestratore della cascata di risoluzione
//!
//! Prova le strategie nell'ordine configurato e si ferma alla prima che
//! produce un descrittore. Nessuna strategia viene ritentata nella
//! stessa chiamata; aggiungerne o riordinarle non richiede modifiche qui.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::instagram_api::InstagramApiSource;
use super::page_scrape::PageScrapeSource;
use super::rapid_api::RapidApiSource;
use super::shortcode::PostLink;
use super::traits::{MediaDescriptor, MediaSource};

#[derive(Clone)]
pub struct MediaResolver {
    sources: Vec<Arc<dyn MediaSource>>,
}

impl MediaResolver {
    pub fn new(sources: Vec<Arc<dyn MediaSource>>) -> MediaResolver {
        Self { sources }
    }

    /// Cascata standard: endpoint strutturato, poi scraping della pagina,
    /// poi il punto di estensione per provider terzi.
    pub fn standard(http: reqwest::Client, timeout: Duration) -> MediaResolver {
        Self::new(vec![
            Arc::new(InstagramApiSource::new(http.clone(), timeout)),
            Arc::new(PageScrapeSource::new(http, timeout)),
            Arc::new(RapidApiSource::new()),
        ])
    }

    /// Risolve un link provando le strategie in ordine.
    ///
    /// `None` significa cascata esaurita: ogni strategia è stata provata
    /// esattamente una volta e nessuna ha prodotto un media.
    #[instrument(skip(self, link), fields(shortcode = %link.shortcode))]
    pub async fn resolve(&self, link: &PostLink) -> Option<MediaDescriptor> {
        for source in &self.sources {
            match source.resolve(link).await {
                Ok(media) => {
                    info!(
                        source = source.name(),
                        kind = %media.kind,
                        "media resolved"
                    );
                    return Some(media);
                }
                Err(err) => {
                    debug!(source = source.name(), error = %err, "strategy missed");
                }
            }
        }

        warn!(url = %link.url, "all resolution strategies exhausted");
        None
    }
}
