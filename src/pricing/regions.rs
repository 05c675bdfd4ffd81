//! Region codes and the display names price documents use for them.

/// Pseudo-region holding line items that apply everywhere.
pub const ANY_REGION: &str = "Any";

/// Region code -> display name, as listed in the vendor's region table.
pub const REGIONS: &[(&str, &str)] = &[
    ("af-south-1", "Africa (Cape Town)"),
    ("ap-east-1", "Asia Pacific (Hong Kong)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("ap-northeast-2", "Asia Pacific (Seoul)"),
    ("ap-northeast-3", "Asia Pacific (Osaka-Local)"),
    ("ap-south-1", "Asia Pacific (Mumbai)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("ca-central-1", "Canada (Central)"),
    ("cn-north-1", "China (Beijing)"),
    ("cn-northwest-1", "China (Ningxia)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("eu-north-1", "EU (Stockholm)"),
    ("eu-south-1", "EU (Milan)"),
    ("eu-west-1", "EU (Ireland)"),
    ("eu-west-2", "EU (London)"),
    ("eu-west-3", "EU (Paris)"),
    ("me-south-1", "Middle East (Bahrain)"),
    ("sa-east-1", "South America (Sao Paulo)"),
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-gov-east-1", "AWS GovCloud (US-East)"),
    ("us-gov-west-1", "AWS GovCloud (US)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
];

/// Display names that are present in price documents but are not regions a
/// worker can run in.
pub const IGNORED: &[&str] = &[ANY_REGION, "US West (Los Angeles)", "US ISOB East (Ohio)"];

/// Region code for a display name.
#[must_use]
pub fn region_code(display_name: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(_, name)| *name == display_name)
        .map(|(code, _)| *code)
}

/// Display name for a region code.
#[must_use]
pub fn display_name(code: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Whether a document region is skipped without a warning.
#[must_use]
pub fn is_ignored(display_name: &str) -> bool {
    IGNORED.contains(&display_name)
}
