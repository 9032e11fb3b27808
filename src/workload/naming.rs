//! Resource naming and labels for generated deployments
//!
//! Names are `<cluster>-<track>-<tier>`, fitted into a DNS-1123 label. The
//! labels carry the same identity and double as the pod selector, so two
//! (track, tier) pairs never select each other's pods.

use std::collections::BTreeMap;

use aws_lc_rs::digest;

use crate::crd::{TierKind, DNS_LABEL_MAX_LEN};
use crate::{
    APP_NAME, LABEL_INSTANCE, LABEL_MANAGED_BY, LABEL_MANAGED_BY_OPERATOR, LABEL_NAME,
    LABEL_TIER, LABEL_TRACK,
};

/// Hex characters of the SHA-256 suffix appended to truncated identifiers
const HASH_LEN: usize = 8;

/// Name and labels of one (track, tier) deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// Deployment and container name
    pub name: String,
    /// Labels on the deployment and its pods; also the selector
    pub labels: BTreeMap<String, String>,
    /// Whether the `<cluster>-<track>` prefix was shortened to fit
    pub truncated: bool,
}

/// Derive the name and labels for a (cluster, track, tier) triple.
///
/// The tier slug is always kept whole. When the result would exceed 63
/// characters the `<cluster>-<track>` prefix is truncated and suffixed with a
/// hash of the untruncated identity, so distinct inputs stay distinct.
pub fn name_for(cluster: &str, track: &str, tier: TierKind) -> ResourceIdentity {
    let suffix = tier.slug();

    let prefix = format!("{}-{}", cluster_slug(cluster), track);
    let budget = DNS_LABEL_MAX_LEN - suffix.len() - 1;
    let truncated = prefix.len() > budget;
    let name = if truncated {
        let fitted = fit(&prefix, budget, &format!("{}/{}", cluster, track));
        tracing::debug!(cluster, track, prefix = %fitted, "truncated resource name prefix");
        format!("{}-{}", fitted, suffix)
    } else {
        format!("{}-{}", prefix, suffix)
    };

    ResourceIdentity {
        name,
        labels: labels_for(cluster, track, tier),
        truncated,
    }
}

/// Labels identifying a (cluster, track, tier) triple
pub fn labels_for(cluster: &str, track: &str, tier: TierKind) -> BTreeMap<String, String> {
    let instance = fit(&cluster_slug(cluster), DNS_LABEL_MAX_LEN, cluster);
    let track = fit(track, DNS_LABEL_MAX_LEN, track);

    BTreeMap::from([
        (LABEL_NAME.to_string(), APP_NAME.to_string()),
        (LABEL_INSTANCE.to_string(), instance),
        (LABEL_TRACK.to_string(), track),
        (LABEL_TIER.to_string(), tier.slug().to_string()),
        (
            LABEL_MANAGED_BY.to_string(),
            LABEL_MANAGED_BY_OPERATOR.to_string(),
        ),
    ])
}

/// Map a cluster name into the DNS-1123 label alphabet.
///
/// Uppercase is lowered; anything outside `[a-z0-9-]` becomes `-`; leading
/// and trailing hyphens are stripped. Every name derived from the cluster
/// (deployments, default claims, the instance label) starts from this slug.
pub fn cluster_slug(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect();
    mapped.trim_matches('-').to_string()
}

/// Fit `value` into `max` characters: `<truncated>-<hash8>` where the hash
/// is taken over `identity`. Values that already fit are returned unchanged.
fn fit(value: &str, max: usize, identity: &str) -> String {
    if value.len() <= max {
        return value.to_string();
    }
    // cluster_slug() output and validated track names are ASCII, so byte
    // slicing stays on a char boundary.
    let keep = max - HASH_LEN - 1;
    let head = value[..keep].trim_end_matches('-');
    format!("{}-{}", head, short_hash(identity))
}

fn short_hash(input: &str) -> String {
    let hash = digest::digest(&digest::SHA256, input.as_bytes());
    hash.as_ref()[..HASH_LEN / 2]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_are_plain_concatenation() {
        let id = name_for("acme", "stable", TierKind::Server);
        assert_eq!(id.name, "acme-stable-server");
    }

    #[test]
    fn labels_carry_full_identity() {
        let id = name_for("acme", "canary", TierKind::Longpolling);
        assert_eq!(id.labels.get(LABEL_NAME).unwrap(), "odoo");
        assert_eq!(id.labels.get(LABEL_INSTANCE).unwrap(), "acme");
        assert_eq!(id.labels.get(LABEL_TRACK).unwrap(), "canary");
        assert_eq!(id.labels.get(LABEL_TIER).unwrap(), "longpolling");
        assert_eq!(
            id.labels.get(LABEL_MANAGED_BY).unwrap(),
            LABEL_MANAGED_BY_OPERATOR
        );
    }

    #[test]
    fn cluster_name_is_normalized() {
        let id = name_for("Acme.Prod", "stable", TierKind::Cron);
        assert_eq!(id.name, "acme-prod-stable-cron");
        assert_eq!(id.labels.get(LABEL_INSTANCE).unwrap(), "acme-prod");
    }

    #[test]
    fn short_names_are_not_marked_truncated() {
        assert!(!name_for("acme", "stable", TierKind::Longpolling).truncated);
    }

    #[test]
    fn cluster_slug_lowers_and_replaces_separators() {
        assert_eq!(cluster_slug("Acme.Prod_EU"), "acme-prod-eu");
        assert_eq!(cluster_slug("-acme-"), "acme");
    }

    #[test]
    fn long_names_are_truncated_with_hash() {
        let cluster = "a".repeat(60);
        let id = name_for(&cluster, "stable", TierKind::Longpolling);
        assert!(id.truncated);
        assert!(id.name.len() <= DNS_LABEL_MAX_LEN, "{}", id.name);
        assert!(id.name.ends_with("-longpolling"));
        assert!(!id.name.contains("--"));
    }

    #[test]
    fn truncation_keeps_tracks_distinct() {
        let cluster = "b".repeat(70);
        let track_a = format!("{}-a", "t".repeat(40));
        let track_b = format!("{}-b", "t".repeat(40));
        let a = name_for(&cluster, &track_a, TierKind::Server);
        let b = name_for(&cluster, &track_b, TierKind::Server);
        assert_ne!(a.name, b.name);
        assert!(a.name.len() <= DNS_LABEL_MAX_LEN);
        assert!(b.name.len() <= DNS_LABEL_MAX_LEN);
    }

    #[test]
    fn long_cluster_label_value_is_fitted() {
        let cluster = "c".repeat(100);
        let labels = labels_for(&cluster, "stable", TierKind::Server);
        let instance = labels.get(LABEL_INSTANCE).unwrap();
        assert_eq!(instance.len(), DNS_LABEL_MAX_LEN);
        assert_ne!(
            instance,
            labels_for(&"c".repeat(101), "stable", TierKind::Server)
                .get(LABEL_INSTANCE)
                .unwrap()
        );
    }

    #[test]
    fn naming_is_deterministic() {
        let cluster = "d".repeat(80);
        assert_eq!(
            name_for(&cluster, "stable", TierKind::Background),
            name_for(&cluster, "stable", TierKind::Background)
        );
    }

    #[test]
    fn every_tier_yields_distinct_names_and_labels() {
        let ids: Vec<_> = TierKind::ALL
            .iter()
            .map(|t| name_for("acme", "stable", *t))
            .collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.labels, b.labels);
            }
        }
    }

    #[test]
    fn short_hash_is_eight_hex_chars() {
        let h = short_hash("acme/stable");
        assert_eq!(h.len(), 8);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
