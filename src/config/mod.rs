//! Configuration models for services, workers and pricing sources.

pub mod credentials;
pub mod service;

pub use credentials::Credentials;
pub use service::{PricingSourceConfig, ScanConfig, ServiceConfig, WorkerConfig};
