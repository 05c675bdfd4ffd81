//! Tests for error types

use cost_scout::core::{PricingError, WorkerError};

#[test]
fn test_worker_error_display() {
    assert_eq!(
        WorkerError::InvalidState("running".into()).to_string(),
        "invalid state: running"
    );
    assert_eq!(WorkerError::Cancelled.to_string(), "task cancelled");
    assert_eq!(
        WorkerError::Task("AccessDenied".into()).to_string(),
        "task failed: AccessDenied"
    );
}

#[test]
fn test_pricing_error_display() {
    let err = PricingError::Fetch {
        url: "https://calculator.aws/x.json".into(),
        reason: "HTTP 404 Not Found".into(),
    };
    assert_eq!(
        err.to_string(),
        "failed to fetch pricing from https://calculator.aws/x.json: HTTP 404 Not Found"
    );

    let err = PricingError::InvalidPrice {
        name: "Storage".into(),
        price: "n/a".into(),
    };
    assert_eq!(err.to_string(), "invalid price \"n/a\" for line item Storage");
    assert_eq!(
        PricingError::RegionNotFound("me-south-1".into()).to_string(),
        "no pricing for region me-south-1"
    );
}

#[test]
fn test_errors_convert_into_anyhow() {
    fn task() -> cost_scout::core::AppResult<()> {
        Err(PricingError::MalformedName {
            name: "Caching Memory Size large".into(),
        }
        .into())
    }

    let err = task().unwrap_err();
    assert!(err.to_string().contains("Caching Memory Size large"));
    assert!(err.downcast_ref::<PricingError>().is_some());
}
