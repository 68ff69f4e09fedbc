pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod prices;
pub mod sources;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, CatalogFile, CatalogItem, PACK_SIZE_MAX, PACK_SIZE_MIN};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use listing::RawListing;
pub use prices::{ReconcileMethod, ReconciledPrice, SourceObservation};
pub use sources::{load_sources, SourceConfig, SourcesFile};
