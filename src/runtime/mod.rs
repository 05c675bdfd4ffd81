//! Runtime adapters and status payloads.

pub mod api;
pub mod tokio_spawner;

pub use api::{progress_report, ProgressReport, RunState, ServiceStatus, WorkerStatus};
pub use tokio_spawner::TokioSpawner;
