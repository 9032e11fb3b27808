//! Error types for deployment synthesis
//!
//! Every error is a specification error: synthesis does no I/O, so nothing here
//! is worth retrying until the `OdooCluster` itself is corrected. Variants carry
//! the cluster name and the offending field so the reconcile loop can surface
//! them on the resource status without further context.

use thiserror::Error;

/// Default context value when no cluster name is known yet
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for synthesis operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required metadata field is absent on the OdooCluster
    #[error("OdooCluster is missing metadata.{field}")]
    MissingMetadata {
        /// The missing field (name, namespace, uid)
        field: &'static str,
    },

    /// Validation error for the cluster spec
    #[error("validation error for {cluster} at {field}: {message}")]
    Validation {
        /// Name of the cluster with invalid configuration
        cluster: String,
        /// The invalid field path (e.g., "spec.tiers[1].replicas")
        field: String,
        /// Description of what's invalid
        message: String,
    },

    /// Two (track, tier) pairs resolved to the same resource name
    #[error("name collision in {cluster}: '{name}' is generated more than once")]
    NameCollision {
        /// Name of the cluster
        cluster: String,
        /// The colliding resource name
        name: String,
    },

    /// Serialization error while rendering manifests
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
    },
}

impl Error {
    /// Create a validation error with cluster context and field path
    pub fn validation(
        cluster: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Validation {
            cluster: cluster.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a name collision error
    pub fn name_collision(cluster: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NameCollision {
            cluster: cluster.into(),
            name: name.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    /// Whether the caller may retry the same input.
    ///
    /// Always false: the input must change before synthesis can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MissingMetadata { .. }
            | Self::Validation { .. }
            | Self::NameCollision { .. }
            | Self::Serialization { .. } => false,
        }
    }

    /// The cluster this error belongs to, if known
    pub fn cluster(&self) -> &str {
        match self {
            Self::Validation { cluster, .. } | Self::NameCollision { cluster, .. } => cluster,
            Self::MissingMetadata { .. } | Self::Serialization { .. } => UNKNOWN_CONTEXT,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
