//! Raw price document as published by the vendor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `{ "regions": { <display name>: { <line item name>: { "price": "..." } } } }`
///
/// Other top-level keys of the published document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDocument {
    /// Line items per region display name.
    #[serde(default)]
    pub regions: HashMap<String, HashMap<String, LineItem>>,
}

/// One priced line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Decimal price per unit, as a string.
    pub price: String,
    /// Vendor rate code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_code: Option<String>,
}

impl LineItem {
    /// Line item with a price and no rate code.
    pub fn new(price: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            rate_code: None,
        }
    }
}

impl PricingDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Add a line item, creating the region if needed.
    #[must_use]
    pub fn with_item(
        mut self,
        region: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        self.regions
            .entry(region.into())
            .or_default()
            .insert(name.into(), LineItem::new(price));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_published_shape() {
        let json = r#"{
            "manifest": { "serviceId": "apigateway" },
            "regions": {
                "US East (N. Virginia)": {
                    "WebSocket Connection Minutes": {
                        "rateCode": "XZKWPFRFD9C8NQJ4.JRTCKXETXF.6YS6EN2CT7",
                        "price": "0.0000003000"
                    }
                }
            }
        }"#;

        let doc = PricingDocument::from_json_str(json).unwrap();
        let item = &doc.regions["US East (N. Virginia)"]["WebSocket Connection Minutes"];
        assert_eq!(item.price, "0.0000003000");
        assert_eq!(item.rate_code.as_deref(), Some("XZKWPFRFD9C8NQJ4.JRTCKXETXF.6YS6EN2CT7"));
    }
}
