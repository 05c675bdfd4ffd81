//! Tests for configuration validation

use cost_scout::config::{Credentials, PricingSourceConfig, ScanConfig, ServiceConfig};

fn service(regions: &[&str], work_delay_ms: u64) -> ServiceConfig {
    ServiceConfig {
        regions: regions.iter().map(|r| (*r).to_owned()).collect(),
        work_delay_ms,
        pricing: Vec::new(),
        caveats: Vec::new(),
    }
}

#[test]
fn test_service_config_validation() {
    assert!(service(&["us-east-1"], 500).validate().is_ok());
    assert!(service(&[], 500).validate().is_err());
    assert!(service(&["us-east-1"], 0).validate().is_err());

    let mut bad_source = service(&["us-east-1"], 500);
    bad_source.pricing.push(PricingSourceConfig::new(""));
    assert!(bad_source.validate().is_err());
}

#[test]
fn test_scan_config_from_json() {
    let cfg = ScanConfig::from_json_str(
        r#"{
            "relay_url": "https://relay.example/",
            "services": {
                "lambda": {
                    "regions": ["us-east-1", "us-west-2"],
                    "work_delay_ms": 250,
                    "pricing": [{
                        "url": "https://calculator.aws/pricing/2.0/lambda.json",
                        "tiered": { "Requests": "Requests" }
                    }]
                }
            }
        }"#,
    )
    .unwrap();

    let lambda = &cfg.services["lambda"];
    assert_eq!(lambda.regions, vec!["us-east-1", "us-west-2"]);
    assert_eq!(lambda.worker().work_delay_ms, 250);
    assert_eq!(lambda.pricing[0].tiered["Requests"], "Requests");
    assert!(lambda.caveats.is_empty());
    assert_eq!(cfg.relay_url.as_deref(), Some("https://relay.example/"));
}

#[test]
fn test_scan_config_errors_name_the_service() {
    let err = ScanConfig::from_json_str(
        r#"{ "services": { "sqs": { "regions": [], "work_delay_ms": 100 } } }"#,
    )
    .unwrap_err();
    assert!(err.contains("sqs"), "{err}");

    let err = ScanConfig::from_json_str(r#"{ "services": {} }"#).unwrap_err();
    assert!(err.contains("at least one service"), "{err}");

    let err = ScanConfig::from_json_str("not json").unwrap_err();
    assert!(err.starts_with("parse error"), "{err}");
}

#[test]
fn test_credentials_debug_redacts_secrets() {
    let creds = Credentials {
        session_token: Some("FwoGZXIvYXdzEXAMPLE".into()),
        ..Credentials::new("AKIAEXAMPLE", "wJalrXUtnFEMI")
    };
    let debug = format!("{creds:?}");

    assert!(debug.contains("AKIAEXAMPLE"));
    assert!(!debug.contains("wJalrXUtnFEMI"));
    assert!(!debug.contains("FwoGZXIvYXdzEXAMPLE"));
}
