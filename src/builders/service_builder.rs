//! Wire a [`ScanConfig`] into running-ready services.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ScanConfig, ServiceConfig};
use crate::core::{RegionWorker, Service, Spawn, WorkerBehavior, WorkerError};
use crate::pricing::{PriceCatalog, PriceFetcher};

/// Build every configured service.
///
/// Each service gets exactly one [`PriceCatalog`], shared by all of its
/// region workers and handed to `behavior_factory` with the service name and
/// region code. Workers are created idle; call [`Service::start`] to begin.
pub fn build_services<S, FB>(
    cfg: &ScanConfig,
    fetcher: Arc<dyn PriceFetcher>,
    mut behavior_factory: FB,
    spawner: S,
) -> Result<BTreeMap<String, Service<S>>, WorkerError>
where
    S: Spawn + Clone + Send + Sync + 'static,
    FB: FnMut(&str, &str, &Arc<PriceCatalog>) -> Arc<dyn WorkerBehavior<S>>,
{
    cfg.validate()
        .map_err(|e| WorkerError::InvalidState(format!("config invalid: {e}")))?;

    let mut services = BTreeMap::new();
    for (name, service_cfg) in &cfg.services {
        let service = build_service(
            name,
            service_cfg,
            Arc::clone(&fetcher),
            &mut behavior_factory,
            &spawner,
        );
        tracing::debug!(service = %name, regions = service_cfg.regions.len(), "service built");
        services.insert(name.clone(), service);
    }

    Ok(services)
}

fn build_service<S, FB>(
    name: &str,
    cfg: &ServiceConfig,
    fetcher: Arc<dyn PriceFetcher>,
    behavior_factory: &mut FB,
    spawner: &S,
) -> Service<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
    FB: FnMut(&str, &str, &Arc<PriceCatalog>) -> Arc<dyn WorkerBehavior<S>>,
{
    let catalog = Arc::new(PriceCatalog::new(cfg.pricing.clone(), fetcher));
    let workers: Vec<_> = cfg
        .regions
        .iter()
        .map(|region| {
            let behavior = behavior_factory(name, region, &catalog);
            RegionWorker::new(region.as_str(), cfg.worker(), behavior, spawner.clone())
        })
        .collect();

    Service::new(name, catalog, workers).with_caveats(cfg.caveats.clone())
}
