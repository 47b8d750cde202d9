pub mod client;
pub mod error;
pub mod filter;
pub mod normalize;
mod rate_limit;
pub mod scan;
pub mod types;

pub use client::SearchClient;
pub use error::ScraperError;
pub use filter::deal_from_product;
pub use normalize::{normalize_product, NormalizedProduct};
pub use scan::{scan_category, ScanParams};
pub use types::{Pagination, PriceEntry, PriceTier, PriceValue, RawProduct, SearchPage};
