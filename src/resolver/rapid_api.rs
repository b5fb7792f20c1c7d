//! Strategia 3: punto di estensione per un provider a pagamento
//!
//! Segnaposto per un'integrazione RapidAPI (es. instagram-scraper-api2):
//! nella configurazione base riporta sempre NotFound. Esiste perché un
//! operatore possa innestare il provider senza toccare l'orchestratore.

use async_trait::async_trait;
use tracing::debug;

use super::shortcode::PostLink;
use super::traits::{MediaDescriptor, MediaSource, ResolveError};

const NAME: &str = "rapid-api";

#[derive(Default)]
pub struct RapidApiSource;

impl RapidApiSource {
    pub fn new() -> RapidApiSource {
        Self
    }
}

#[async_trait]
impl MediaSource for RapidApiSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve(&self, link: &PostLink) -> Result<MediaDescriptor, ResolveError> {
        debug!(shortcode = %link.shortcode, "no third-party provider configured");
        Err(ResolveError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn baseline_always_reports_not_found() {
        let source = RapidApiSource::new();
        let link = PostLink {
            url: "https://www.instagram.com/p/ABC123/".to_string(),
            shortcode: "ABC123".to_string(),
        };

        assert_eq!(source.resolve(&link).await, Err(ResolveError::NotFound));
    }
}
