//! Spec types shared by the OdooCluster CRD

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Images
// =============================================================================

/// A container image in the cluster's image catalog.
///
/// Tracks select an image by `name`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Catalog key referenced by `TrackSpec::image`
    pub name: String,

    /// Registry host (e.g., "registry.example.com"); empty for the default registry
    #[serde(default)]
    pub registry: String,

    /// Repository path within the registry (e.g., "odoo/odoo")
    pub image: String,

    /// Image tag
    pub tag: String,
}

impl ImageSpec {
    /// Full image reference: `registry/image:tag`, or `image:tag` without a registry
    pub fn reference(&self) -> String {
        let registry = self.registry.trim_end_matches('/');
        if registry.is_empty() {
            format!("{}:{}", self.image, self.tag)
        } else {
            format!("{}/{}:{}", registry, self.image, self.tag)
        }
    }
}

// =============================================================================
// Tracks
// =============================================================================

/// A version/channel lineage of the application (e.g., "stable", "canary").
///
/// Every track runs every tier declared on the cluster.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackSpec {
    /// Track identity, a DNS-1123 label unique within the cluster
    pub name: String,

    /// Name of the `ImageSpec` this track runs
    pub image: String,
}

// =============================================================================
// Tiers
// =============================================================================

/// Process role of an Odoo deployment.
///
/// Declaration order is the canonical output order of synthesis.
#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum TierKind {
    /// HTTP request serving
    Server,
    /// Scheduled task execution
    Cron,
    /// Background queue processing
    Background,
    /// Long-poll (bus) listener
    Longpolling,
}

impl TierKind {
    /// Every tier kind, in canonical order
    pub const ALL: [TierKind; 4] = [
        TierKind::Server,
        TierKind::Cron,
        TierKind::Background,
        TierKind::Longpolling,
    ];

    /// Lowercase identifier used in names, labels and the `--tier` flag
    pub fn slug(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Cron => "cron",
            Self::Background => "background",
            Self::Longpolling => "longpolling",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "Server"),
            Self::Cron => write!(f, "Cron"),
            Self::Background => write!(f, "Background"),
            Self::Longpolling => write!(f, "Longpolling"),
        }
    }
}

/// A tier instantiated on every track of the cluster
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierSpec {
    /// Which process role
    pub kind: TierKind,

    /// Desired replicas per track; negative values are rejected
    #[serde(default = "default_one")]
    pub replicas: i32,
}

fn default_one() -> i32 {
    1
}

// =============================================================================
// Volumes
// =============================================================================

/// A persistent volume claim mounted into every pod of the cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeClaimSpec {
    /// Pod volume name. `data` and `backup` are mounted at the Odoo data and
    /// backup directories; any other name is attached to the pod without a
    /// mount in the Odoo container.
    pub name: String,

    /// Existing claim to bind; defaults to `<cluster>-<name>` with the cluster
    /// name lowered into DNS-1123 form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_name: Option<String>,
}

// =============================================================================
// Resources and deployment model
// =============================================================================

/// Resource quota hint for the cluster.
///
/// Consumed by the quota and database provisioning controllers, not by
/// deployment synthesis.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotaSpec {
    /// CPU cores
    #[serde(default)]
    pub cpu: u32,
    /// Memory in MiB
    #[serde(default)]
    pub ram: u32,
    /// Disk in MiB
    #[serde(default)]
    pub disk: u32,
}

/// Where the cluster's database lives relative to the application
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeployModel {
    /// Database runs outside the Kubernetes cluster
    Remote,
    /// Database runs in the same Kubernetes cluster
    #[default]
    Local,
    /// Mixed placement
    Hybrid,
}
