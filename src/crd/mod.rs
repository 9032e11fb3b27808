//! Custom Resource Definitions for the Odoo operator
//!
//! `OdooCluster` is the only resource the synthesis engine consumes. Its spec
//! types live in `types`; the resource itself, its status and whole-spec
//! validation live in `cluster`.

mod cluster;
mod types;

pub use cluster::{ClusterState, ImageLoad, OdooCluster, OdooClusterSpec, OdooClusterStatus};
pub use types::{
    DeployModel, ImageSpec, ResourceQuotaSpec, TierKind, TierSpec, TrackSpec, VolumeClaimSpec,
};

/// Maximum length of a DNS-1123 label (resource names, label values, container names)
pub const DNS_LABEL_MAX_LEN: usize = 63;

/// Validate a DNS-1123 label (lowercase alphanumeric with hyphens, at most 63 chars).
///
/// Rules:
/// - Must not be empty or longer than 63 characters
/// - Must start with a lowercase letter
/// - May contain lowercase letters, digits, and hyphens
/// - Must not end with a hyphen
///
/// Used for track names and volume claim names.
pub(crate) fn validate_dns_label(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("identifier cannot be empty".to_string());
    }
    if s.len() > DNS_LABEL_MAX_LEN {
        return Err(format!(
            "identifier exceeds {} characters: {}",
            DNS_LABEL_MAX_LEN, s
        ));
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => {
            return Err(format!(
                "identifier must start with lowercase letter: {}",
                s
            ))
        }
    }

    for c in chars {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return Err(format!(
                "identifier must be lowercase alphanumeric with hyphens: {}",
                s
            ));
        }
    }

    if s.ends_with('-') {
        return Err(format!("identifier cannot end with hyphen: {}", s));
    }

    Ok(())
}
