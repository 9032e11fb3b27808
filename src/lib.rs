//! Odoo operator - Deployment synthesis for OdooCluster resources
//!
//! An `OdooCluster` declares an image catalog, a set of tracks (version
//! lineages such as "stable" and "canary") and a set of tiers (process roles:
//! HTTP server, cron, background workers, long-polling). Synthesis turns one
//! cluster into a Deployment per (track, tier) pair, ready for server-side
//! apply by the reconcile loop.
//!
//! Synthesis is a pure function of the resource: no API calls, no clock, no
//! randomness. The same input always yields byte-identical output.
//!
//! # Modules
//!
//! - [`crd`] - The OdooCluster Custom Resource Definition and its validation
//! - [`workload`] - Deployment types, naming, tier catalog, volumes and pod assembly
//! - [`compiler`] - Cluster-to-deployments synthesis and status derivation
//! - [`error`] - Error types for the operator

#![deny(missing_docs)]

pub mod compiler;
pub mod crd;
pub mod error;
pub mod workload;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Labels
// =============================================================================
// Every generated deployment carries the full set. The same map is the pod
// selector, so (track, tier) pairs never overlap.

/// Standard Kubernetes label for the application name
pub const LABEL_NAME: &str = "app.kubernetes.io/name";

/// Standard Kubernetes label for the application instance (the cluster name)
pub const LABEL_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard Kubernetes label for the managing tool
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value for [`LABEL_MANAGED_BY`] on resources we generate
pub const LABEL_MANAGED_BY_OPERATOR: &str = "odoo-operator";

/// Track the deployment belongs to
pub const LABEL_TRACK: &str = "odoo.io/track";

/// Tier the deployment runs
pub const LABEL_TIER: &str = "odoo.io/tier";

/// Value for [`LABEL_NAME`]
pub const APP_NAME: &str = "odoo";

// =============================================================================
// Volumes and paths
// =============================================================================

/// Pod volume holding the Odoo configuration file
pub const CONFIG_VOLUME_NAME: &str = "config";

/// Pod volume for the Odoo data directory (filestore, sessions)
pub const DATA_VOLUME_NAME: &str = "data";

/// Pod volume for database backups
pub const BACKUP_VOLUME_NAME: &str = "backup";

/// Where the configuration volume is mounted
pub const CONFIG_MOUNT_PATH: &str = "/run/configs/odoo";

/// Configuration file passed to Odoo via `--config`
pub const ODOO_CONFIG_FILE: &str = "/run/configs/odoo/odoo.conf";

/// Where the data volume is mounted
pub const DATA_MOUNT_PATH: &str = "/var/lib/odoo";

/// Where the backup volume is mounted
pub const BACKUP_MOUNT_PATH: &str = "/var/lib/odoo-backups";

/// UID and GID the Odoo image runs as
pub const ODOO_UID: i64 = 9001;
