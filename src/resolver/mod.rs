//! Resolver module - Coordinatore della cascata di risoluzione media
//!
//! Dal testo del messaggio all'asset scaricabile: normalizzazione del
//! link, strategie di risoluzione intercambiabili e orchestratore che
//! le prova in ordine fisso.

// Dichiarazione dei sotto-moduli
pub mod cascade;
pub mod instagram_api;
pub mod page_scrape;
pub mod rapid_api;
pub mod shortcode;
pub mod traits;

// Re-esportazione dei tipi principali per facilitare l'import
pub use cascade::MediaResolver;
pub use instagram_api::InstagramApiSource;
pub use page_scrape::PageScrapeSource;
pub use rapid_api::RapidApiSource;
pub use shortcode::{parse_post_link, PostLink};
pub use traits::{MediaDescriptor, MediaSource, ResolveError};
