pub mod client;
pub mod error;
pub mod normalize;
mod rate_limit;
pub mod types;

pub use client::SearchClient;
pub use error::ScraperError;
pub use normalize::listing_from_product;
pub use types::{StoreProduct, StorePrices, StoreVariation};
