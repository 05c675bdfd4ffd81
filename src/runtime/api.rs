//! Serializable status payloads for services and their region workers.

use serde::{Deserialize, Serialize};

use crate::core::{Progress, RegionWorker, Service};

/// Lifecycle state of a worker or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Not started, or stopped.
    Idle,
    /// Started with work queued or in flight.
    Running,
    /// Queue drained and nothing in flight.
    Finished,
}

impl RunState {
    fn of(started: bool, finished: bool) -> Self {
        match (started, finished) {
            (false, _) => Self::Idle,
            (true, false) => Self::Running,
            (true, true) => Self::Finished,
        }
    }
}

/// Snapshot of one region worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    /// Region code.
    pub region: String,
    /// Lifecycle state.
    pub state: RunState,
    /// Tasks waiting in the queue.
    pub queued: usize,
    /// Cancellation generation.
    pub generation: u64,
    /// Progress counters.
    pub progress: Progress,
}

impl<S: 'static> From<&RegionWorker<S>> for WorkerStatus {
    fn from(worker: &RegionWorker<S>) -> Self {
        Self {
            region: worker.region().to_owned(),
            state: RunState::of(worker.started(), worker.finished()),
            queued: worker.queue_len(),
            generation: worker.generation().value(),
            progress: worker.progress(),
        }
    }
}

/// Snapshot of a service and all of its regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Service name.
    pub name: String,
    /// Lifecycle state of the service as a whole.
    pub state: RunState,
    /// Progress summed over every region.
    pub progress: Progress,
    /// Known limitations of the results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caveats: Vec<String>,
    /// Per-region detail, ordered by region code.
    pub regions: Vec<WorkerStatus>,
}

impl<S: 'static> From<&Service<S>> for ServiceStatus {
    fn from(service: &Service<S>) -> Self {
        Self {
            name: service.name().to_owned(),
            state: RunState::of(service.started(), service.finished()),
            progress: service.progress(),
            caveats: service.caveats().to_vec(),
            regions: service.workers().map(WorkerStatus::from).collect(),
        }
    }
}

/// Progress of a whole scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Counters summed over every service.
    pub progress: Progress,
    /// Settled share of the known work, in `[0, 1]`.
    pub fraction: f64,
    /// Per-service detail.
    pub services: Vec<ServiceStatus>,
}

/// Build a progress report over `services`.
#[allow(clippy::cast_precision_loss)]
pub fn progress_report<'a, S: 'static>(services: impl IntoIterator<Item = &'a Service<S>>) -> ProgressReport {
    let services: Vec<ServiceStatus> = services.into_iter().map(ServiceStatus::from).collect();
    let progress: Progress = services.iter().map(|s| s.progress).sum();
    let fraction = if progress.total == 0 {
        0.0
    } else {
        (progress.done + progress.errors) as f64 / progress.total as f64
    };

    ProgressReport {
        progress,
        fraction,
        services,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state() {
        assert_eq!(RunState::of(false, false), RunState::Idle);
        assert_eq!(RunState::of(true, false), RunState::Running);
        assert_eq!(RunState::of(true, true), RunState::Finished);
        assert_eq!(RunState::of(false, true), RunState::Idle);
    }

    #[test]
    fn test_empty_report() {
        let report = progress_report::<()>([]);
        assert_eq!(report.progress, Progress::default());
        assert_eq!(report.fraction, 0.0);
        assert!(report.services.is_empty());
    }
}
