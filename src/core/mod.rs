//! Core scheduling abstractions: region workers, services and errors.

pub mod error;
pub mod region_worker;
pub mod service;

pub use error::{AppResult, PricingError, WorkerError};
pub use region_worker::{
    Generation, NoSeed, Page, PagedRequest, Progress, RegionWorker, Spawn, WorkerBehavior,
};
pub use service::Service;
