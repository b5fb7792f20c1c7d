//! Repositories module - Coordinatore per tutti gli store del progetto
//!
//! Ogni store incapsula le operazioni di persistenza per una specifica
//! entità; i servizi li ricevono come trait object e non vedono mai SQL.

// ************************* NOTA SU SQLX ************************* //

/*
   Qui usiamo sqlx::query_as::<_, T> (binding a runtime) e non le macro
   query!/query_as!: le macro verificano lo schema a compile time ma per
   farlo richiedono DATABASE_URL e un MySQL raggiungibile durante la
   build, e la compilazione offline (o in CI senza database) si rompe.
   Il contratto con lo schema resta coperto dalle migrazioni versionate
   in migrations/ e dai test degli store.
*/

// ************************* MODULI STORE ************************* //

// Dichiarazione dei sotto-moduli
pub mod download;
pub mod memory;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{DownloadStore, UserStore};

// Re-esportazione delle struct degli store per facilitare l'import
pub use download::MySqlDownloadStore;
pub use memory::{InMemoryDownloadStore, InMemoryUserStore};
pub use user::MySqlUserStore;
