//! Service, worker and pricing source configuration structures.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-worker scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Fixed delay between two task executions, in milliseconds.
    pub work_delay_ms: u64,
}

impl WorkerConfig {
    /// Build a worker config from a delay.
    #[must_use]
    pub fn new(work_delay: Duration) -> Self {
        Self {
            work_delay_ms: u64::try_from(work_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Delay between two task executions.
    #[must_use]
    pub const fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    /// Validate worker configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_delay_ms == 0 {
            return Err("work_delay_ms must be greater than 0".into());
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_delay_ms: 1000,
        }
    }
}

/// One remote price document plus the label tables that map the vendor's
/// line item names onto the caller's cost categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSourceConfig {
    /// Document URL.
    pub url: String,
    /// Exact line item name -> label.
    #[serde(default)]
    pub simple: HashMap<String, String>,
    /// Line item name prefix -> label, for tiered prices.
    #[serde(default)]
    pub tiered: HashMap<String, String>,
    /// Line item name prefix -> label, for leveled prices.
    #[serde(default)]
    pub levels: HashMap<String, String>,
}

impl PricingSourceConfig {
    /// Create a source with empty label tables.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Map an exact line item name onto `label`.
    #[must_use]
    pub fn with_simple(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.simple.insert(name.into(), label.into());
        self
    }

    /// Map a tiered line item prefix onto `label`.
    #[must_use]
    pub fn with_tiered(mut self, prefix: impl Into<String>, label: impl Into<String>) -> Self {
        self.tiered.insert(prefix.into(), label.into());
        self
    }

    /// Map a leveled line item prefix onto `label`.
    #[must_use]
    pub fn with_levels(mut self, prefix: impl Into<String>, label: impl Into<String>) -> Self {
        self.levels.insert(prefix.into(), label.into());
        self
    }

    /// Validate source values.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("pricing url must not be empty".into());
        }
        Ok(())
    }
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Region codes the service runs one worker for.
    pub regions: Vec<String>,
    /// Fixed delay between two calls to the service's API, in milliseconds.
    pub work_delay_ms: u64,
    /// Price documents for the service, merged in order.
    #[serde(default)]
    pub pricing: Vec<PricingSourceConfig>,
    /// Known limitations reported alongside the service's results.
    #[serde(default)]
    pub caveats: Vec<String>,
}

impl ServiceConfig {
    /// Worker configuration shared by every region of the service.
    #[must_use]
    pub const fn worker(&self) -> WorkerConfig {
        WorkerConfig {
            work_delay_ms: self.work_delay_ms,
        }
    }

    /// Validate service configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.regions.is_empty() {
            return Err("at least one region must be listed".into());
        }
        self.worker().validate()?;
        for source in &self.pricing {
            source.validate()?;
        }
        Ok(())
    }
}

/// Root scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Map of service name to configuration.
    pub services: BTreeMap<String, ServiceConfig>,
    /// Optional relay that price document URLs are fetched through.
    #[serde(default)]
    pub relay_url: Option<String>,
}

impl ScanConfig {
    /// Validate all services and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.services.is_empty() {
            return Err("at least one service must be defined".into());
        }
        for (name, service) in &self.services {
            service
                .validate()
                .map_err(|e| format!("service `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scan configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
