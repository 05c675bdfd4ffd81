//! # Cost Scout
//!
//! Throttled per-region work scheduling and tiered price evaluation for
//! discovering cloud resources and estimating what they cost.
//!
//! Resource discovery fans out over many (account × service × region)
//! combinations, and every one of them talks to a rate-limited API. This crate
//! provides the two pieces every resource inspector sits on:
//!
//! - **`RegionWorker`**: a single-concurrency, timer-driven drain loop over a
//!   multi-level priority queue, with generation-based cancellation and
//!   self-extending pagination (`enqueue_paged_request`,
//!   `enqueue_paged_request_fold`).
//! - **`PriceCatalog`**: a memoized loader that turns a vendor's region-keyed
//!   price document into simple, tiered and leveled price tables per region.
//! - **`cost`**: pure evaluators that turn a usage number and one price shape
//!   into a `CalculationDetail` for each of four lookback windows.
//!
//! ## Scheduling work
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cost_scout::core::{RegionWorker, WorkerBehavior};
//! use cost_scout::config::WorkerConfig;
//! use cost_scout::runtime::TokioSpawner;
//!
//! let worker = RegionWorker::new(
//!     "us-east-1",
//!     WorkerConfig::new(Duration::from_millis(500)),
//!     Arc::new(my_behavior), // implements WorkerBehavior
//!     TokioSpawner::new(tokio::runtime::Handle::current()),
//! );
//! worker.start();
//!
//! let total = worker
//!     .enqueue_paged_request_fold(500, list_tables_request, 0, |page, acc| acc + page.len())
//!     .await?;
//! ```
//!
//! ## Pricing a resource
//!
//! ```rust,ignore
//! use cost_scout::cost::{calculate_for_all_windows, tiered_calc};
//!
//! let prices = catalog.for_region("us-east-1").await?;
//! let calls = calculate_for_all_windows(|window, seconds| {
//!     tiered_calc(usage[window], prices.tiers("REST-Calls").unwrap_or_default(), seconds, None)
//! });
//! ```
//!
//! For complete examples, see `tests/region_worker_test.rs` and
//! `tests/pricing_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: region workers, services and errors.
pub mod core;
/// Configuration models for services, workers and pricing sources.
pub mod config;
/// Builders to construct services from configuration.
pub mod builders;
/// Cost windows and pricing evaluators.
pub mod cost;
/// Infrastructure containers backing the scheduler.
pub mod infra;
/// Price document loading and parsing.
pub mod pricing;
/// Runtime adapters and report payloads.
pub mod runtime;
/// Shared utilities.
pub mod util;
