//! Error types for scheduler and pricing operations.

use thiserror::Error;

/// Errors produced by region workers and services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// Operation is not allowed in the current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Work was discarded because its generation went stale.
    #[error("task cancelled")]
    Cancelled,
    /// A task action or transport call failed.
    #[error("task failed: {0}")]
    Task(String),
}

/// Errors produced while loading or querying price catalogs.
///
/// Cloneable so that one memoized load result can be handed to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The price document could not be fetched.
    #[error("failed to fetch pricing from {url}: {reason}")]
    Fetch {
        /// Document URL.
        url: String,
        /// Transport failure.
        reason: String,
    },
    /// The price document was not valid JSON of the expected shape.
    #[error("failed to decode pricing from {url}: {reason}")]
    Decode {
        /// Document URL.
        url: String,
        /// Decoder failure.
        reason: String,
    },
    /// A tier or level line item did not carry the expected numeric tokens.
    #[error("malformed pricing line item: {name}")]
    MalformedName {
        /// Raw line item name.
        name: String,
    },
    /// A line item's price was not a number.
    #[error("invalid price {price:?} for line item {name}")]
    InvalidPrice {
        /// Raw line item name.
        name: String,
        /// Raw price string.
        price: String,
    },
    /// No source listed prices for the region.
    #[error("no pricing for region {0}")]
    RegionNotFound(String),
}

/// Application-facing result using anyhow for task actions and transports.
pub type AppResult<T> = Result<T, anyhow::Error>;
