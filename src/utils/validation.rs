// file: src/utils/validation.rs
// version: 1.0.0
// guid: a69885d9-1c73-4345-bb01-484773362ea2

//! Field validators for wizard input.
//!
//! Every validator is total: it returns `Ok(())` for valid input and for the
//! empty string (a field that has not been filled in yet), and `Err(message)`
//! with a human-readable explanation otherwise. Nothing here panics or touches
//! the cluster definition; callers keep invalid text in their own staging
//! fields until it validates.

use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Cluster-network host prefixes offered by the wizard
pub const HOST_PREFIX_RANGE: RangeInclusive<u8> = 8..=26;

/// Outcome of a field validator; the error carries the message shown next to the field
pub type FieldResult = std::result::Result<(), String>;

static CLUSTER_NAME_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").expect("cluster name regex"));

static DOMAIN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("domain label regex")
});

static TOP_LEVEL_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]+$").expect("tld regex"));

static MAC_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$").expect("mac address regex")
});

/// Validate a dotted-quad IPv4 address.
///
/// Octets must be plain decimal without leading zeros (`"0"` itself is fine)
/// and within `0..=255`.
pub fn validate_ipv4_address(ip: &str) -> FieldResult {
    if ip.is_empty() {
        return Ok(());
    }

    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return Err("IPv4 address must have exactly 4 octets (e.g., 192.168.1.100)".to_string());
    }

    for octet in octets {
        if octet.is_empty() {
            return Err("IPv4 address octets cannot be empty".to_string());
        }

        let value = match leading_integer(octet) {
            Some(value) => value,
            None => return Err("IPv4 address octets must be numeric".to_string()),
        };

        if octet.len() > 1 && octet.starts_with('0') {
            return Err("IPv4 address octets cannot have leading zeros".to_string());
        }

        if !(0..=255).contains(&value) {
            return Err("IPv4 address octets must be between 0 and 255".to_string());
        }

        if octet != value.to_string() {
            return Err("Invalid IPv4 address format".to_string());
        }
    }

    Ok(())
}

/// Validate an IPv4 network in `a.b.c.d/prefix` form
pub fn validate_ipv4_cidr(cidr: &str) -> FieldResult {
    if cidr.is_empty() {
        return Ok(());
    }

    let parts: Vec<&str> = cidr.split('/').collect();
    if parts.len() != 2 {
        return Err("CIDR must be in the form address/prefix (e.g., 192.168.1.0/24)".to_string());
    }

    let (address, prefix) = (parts[0], parts[1]);
    if address.is_empty() {
        return Err("CIDR address part cannot be empty".to_string());
    }
    validate_ipv4_address(address)?;

    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err("CIDR prefix must be a number between 0 and 32".to_string());
    }
    if prefix.len() > 1 && prefix.starts_with('0') {
        return Err("CIDR prefix cannot have leading zeros".to_string());
    }
    match prefix.parse::<u8>() {
        Ok(bits) if bits <= 32 => Ok(()),
        _ => Err("CIDR prefix must be between 0 and 32".to_string()),
    }
}

/// Validate a cluster name as a lowercase RFC 1123 label
pub fn validate_cluster_name(name: &str) -> FieldResult {
    if name.is_empty() {
        return Ok(());
    }

    if name.len() > 63 {
        return Err("Cluster name must not exceed 63 characters".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err("Cluster name must start with a lowercase alphabetic character".to_string());
    }

    if !name.ends_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err("Cluster name must end with a lowercase alphanumeric character".to_string());
    }

    if name.len() > 1 && !CLUSTER_NAME_BODY.is_match(name) {
        return Err(
            "Cluster name must contain only lowercase alphanumeric characters or '-'".to_string(),
        );
    }

    Ok(())
}

/// Validate the cluster base domain as a fully qualified domain name.
///
/// A single trailing dot is accepted and ignored.
pub fn validate_cluster_domain(domain: &str) -> FieldResult {
    if domain.is_empty() {
        return Ok(());
    }

    if domain.len() > 253 {
        return Err("Domain name must not exceed 253 characters".to_string());
    }

    let normalized = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = normalized.split('.').collect();

    for label in &labels {
        if label.is_empty() {
            return Err("Domain part cannot be empty".to_string());
        }
        if label.len() > 63 {
            return Err("Each domain part must not exceed 63 characters".to_string());
        }
        if !DOMAIN_LABEL.is_match(label) {
            return Err(format!(
                "Domain part '{}' must start and end with an alphanumeric character and contain only alphanumerics or '-'",
                label
            ));
        }
        if label.contains("--") {
            return Err("Domain parts cannot contain consecutive hyphens".to_string());
        }
    }

    if labels.len() < 2 {
        return Err("Domain must contain at least two parts (e.g., example.com)".to_string());
    }

    let tld = labels[labels.len() - 1];
    if !TOP_LEVEL_DOMAIN.is_match(tld) {
        return Err("Top-level domain must contain only letters".to_string());
    }

    Ok(())
}

/// Validate a colon-separated MAC address
pub fn validate_mac_address(mac: &str) -> FieldResult {
    if mac.is_empty() || MAC_ADDRESS.is_match(mac) {
        Ok(())
    } else {
        Err("MAC address must be six colon-separated hex pairs (e.g., 00:1A:2B:3C:4D:5E)".to_string())
    }
}

/// Validate a cluster-network host prefix against the offered range
pub fn validate_host_prefix(prefix: u8) -> FieldResult {
    if HOST_PREFIX_RANGE.contains(&prefix) {
        Ok(())
    } else {
        Err(format!(
            "Cluster network host prefix must be between {} and {}",
            HOST_PREFIX_RANGE.start(),
            HOST_PREFIX_RANGE.end()
        ))
    }
}

/// Parse the leading decimal integer of `text`, tolerating trailing garbage.
///
/// Returns `None` when no digits lead the text. Oversized values saturate so
/// they still fail the range check instead of overflowing.
fn leading_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
