//! A service: one region worker per region plus the shared price catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Credentials;
use crate::core::{Progress, RegionWorker, Spawn, WorkerError};
use crate::pricing::PriceCatalog;

/// Group of region workers for one cloud service.
///
/// Lifecycle calls fan out to every worker; status and progress are
/// aggregated over them.
pub struct Service<S> {
    name: String,
    caveats: Vec<String>,
    catalog: Arc<PriceCatalog>,
    regions: BTreeMap<String, RegionWorker<S>>,
}

impl<S: 'static> std::fmt::Debug for Service<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field("regions", &self.regions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<S> Service<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Assemble a service from already constructed workers.
    pub fn new(
        name: impl Into<String>,
        catalog: Arc<PriceCatalog>,
        workers: impl IntoIterator<Item = RegionWorker<S>>,
    ) -> Self {
        Self {
            name: name.into(),
            caveats: Vec::new(),
            catalog,
            regions: workers
                .into_iter()
                .map(|worker| (worker.region().to_owned(), worker))
                .collect(),
        }
    }

    /// Attach known limitations of the service's results.
    #[must_use]
    pub fn with_caveats(mut self, caveats: Vec<String>) -> Self {
        self.caveats = caveats;
        self
    }

    /// Start every worker. Workers already started are left as they are.
    pub fn start(&self) {
        tracing::info!(service = %self.name, regions = self.regions.len(), "starting service");
        for worker in self.regions.values() {
            worker.start();
        }
    }

    /// Stop every worker, including ones started individually.
    pub fn stop(&self) {
        tracing::info!(service = %self.name, "stopping service");
        for worker in self.regions.values() {
            worker.stop();
        }
    }

    /// Cancel pending work in every region.
    ///
    /// Fails without touching any worker while one of them is running.
    pub fn reset_progress(&self) -> Result<(), WorkerError> {
        if let Some(busy) = self.regions.values().find(|worker| worker.running()) {
            return Err(WorkerError::InvalidState(format!(
                "cannot reset progress of {} while {} is running",
                self.name,
                busy.region()
            )));
        }
        for worker in self.regions.values() {
            worker.reset_progress()?;
        }
        Ok(())
    }
}

impl<S: 'static> Service<S> {
    /// Service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Known limitations of the service's results.
    #[must_use]
    pub fn caveats(&self) -> &[String] {
        &self.caveats
    }

    /// Price catalog shared by every region of the service.
    #[must_use]
    pub fn catalog(&self) -> &Arc<PriceCatalog> {
        &self.catalog
    }

    /// Worker for `region`, if the service runs there.
    #[must_use]
    pub fn region(&self, region: &str) -> Option<&RegionWorker<S>> {
        self.regions.get(region)
    }

    /// All workers, ordered by region code.
    pub fn workers(&self) -> impl Iterator<Item = &RegionWorker<S>> {
        self.regions.values()
    }

    /// Forward new credentials to every worker.
    pub fn updated_credentials(&self, credentials: &Credentials) {
        for worker in self.regions.values() {
            worker.updated_credentials(credentials);
        }
    }

    /// Every worker is started.
    #[must_use]
    pub fn started(&self) -> bool {
        self.regions.values().all(RegionWorker::started)
    }

    /// Every worker is finished.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.regions.values().all(RegionWorker::finished)
    }

    /// Started and not finished.
    #[must_use]
    pub fn running(&self) -> bool {
        self.started() && !self.finished()
    }

    /// Progress summed over every region.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.regions.values().map(RegionWorker::progress).sum()
    }
}
