//! Price document loading and parsing.

pub mod catalog;
pub mod document;
pub mod parser;
pub mod prices;
pub mod regions;

#[cfg(feature = "http-fetch")]
pub use catalog::HttpPriceFetcher;
pub use catalog::{PriceCatalog, PriceFetcher, StaticPriceFetcher};
pub use document::{LineItem, PricingDocument};
pub use prices::{Levels, PricingData, RegionPrices, Tier};
