//! Kubernetes resource types for generated workloads
//!
//! Typed subset of the core/v1 and apps/v1 schemas. Field names serialize in
//! camelCase and empty collections are skipped so the JSON is suitable for
//! server-side apply and stable across passes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Metadata
// =============================================================================

/// Object metadata for generated resources
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Owners that garbage-collect this resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Create metadata with the given labels and no owners
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        labels: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels,
            owner_references: Vec::new(),
        }
    }

    /// Add an owner reference
    pub fn with_owner(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }
}

/// Parent link enabling cascade deletion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    /// Owner API version
    pub api_version: String,
    /// Owner kind
    pub kind: String,
    /// Owner name
    pub name: String,
    /// Owner UID
    pub uid: String,
    /// Whether the owner is the managing controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    /// Block foreground deletion of the owner until this resource is gone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

/// Label selector
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Match labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Whether a pod carrying `labels` is selected
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.match_labels
            .iter()
            .all(|(k, v)| labels.get(k) == Some(v))
    }
}

// =============================================================================
// Container
// =============================================================================

/// Container spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name
    pub name: String,
    /// Image
    pub image: String,
    /// Args passed to the image entrypoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    /// Liveness probe - restarts container when it fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<ProbeSpec>,
    /// Readiness probe - removes from service endpoints when it fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<ProbeSpec>,
    /// Volume mounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

/// Container port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port name (at most 15 characters)
    pub name: String,
    /// Port number
    pub container_port: u16,
    /// Protocol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

// =============================================================================
// Probes
// =============================================================================

/// Probe specification - maps 1:1 with Kubernetes probe spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSpec {
    /// HTTP GET probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_get: Option<HttpGetAction>,
    /// Exec probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecAction>,
    /// Seconds after container start before probes begin
    pub initial_delay_seconds: i32,
    /// Seconds before the probe times out
    pub timeout_seconds: i32,
    /// Seconds between probe attempts
    pub period_seconds: i32,
    /// Consecutive failures before marking unhealthy
    pub failure_threshold: i32,
}

/// HTTP GET action for probe
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpGetAction {
    /// Path
    pub path: String,
    /// Port
    pub port: u16,
    /// Scheme (HTTP or HTTPS)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// Exec action for probe
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecAction {
    /// Command
    pub command: Vec<String>,
}

// =============================================================================
// Security context
// =============================================================================

/// Pod-level security context
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSecurityContext {
    /// UID for all containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
    /// GID for all containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,
    /// Require all containers to run as non-root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
    /// GID applied to all volumes so files are group-writable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_group: Option<i64>,
}

// =============================================================================
// Volumes
// =============================================================================

/// Volume
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume name
    pub name: String,
    /// ConfigMap source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,
    /// EmptyDir source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
    /// PVC source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PvcVolumeSource>,
}

impl Volume {
    /// Create a Volume backed by a ConfigMap.
    pub fn from_config_map(name: impl Into<String>, cm_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_map: Some(ConfigMapVolumeSource {
                name: cm_name.into(),
            }),
            empty_dir: None,
            persistent_volume_claim: None,
        }
    }

    /// Create a Volume backed by an emptyDir.
    pub fn from_empty_dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_map: None,
            empty_dir: Some(EmptyDirVolumeSource::default()),
            persistent_volume_claim: None,
        }
    }

    /// Create a read-write Volume backed by a PVC.
    pub fn from_pvc(name: impl Into<String>, claim_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_map: None,
            empty_dir: None,
            persistent_volume_claim: Some(PvcVolumeSource {
                claim_name: claim_name.into(),
                read_only: false,
            }),
        }
    }
}

/// ConfigMap volume source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapVolumeSource {
    /// ConfigMap name
    pub name: String,
}

/// EmptyDir volume source, node-local and unbounded
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyDirVolumeSource {}

/// PVC volume source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PvcVolumeSource {
    /// PVC claim name
    pub claim_name: String,
    /// Read only
    pub read_only: bool,
}

/// Volume mount
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Volume name
    pub name: String,
    /// Mount path
    pub mount_path: String,
    /// Read only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pvc_volume_is_read_write() {
        let volume = Volume::from_pvc("data", "acme-data");
        let json = serde_json::to_value(&volume).unwrap();
        assert_eq!(json["persistentVolumeClaim"]["claimName"], "acme-data");
        assert_eq!(json["persistentVolumeClaim"]["readOnly"], false);
        assert!(json.get("configMap").is_none());
    }

    #[test]
    fn empty_dir_serializes_as_empty_object() {
        let json = serde_json::to_value(Volume::from_empty_dir("backup")).unwrap();
        assert_eq!(json["emptyDir"], serde_json::json!({}));
    }

    #[test]
    fn selector_matches_superset_only() {
        let selector = LabelSelector {
            match_labels: BTreeMap::from([
                ("tier".to_string(), "server".to_string()),
                ("track".to_string(), "stable".to_string()),
            ]),
        };
        let mut pod = selector.match_labels.clone();
        pod.insert("extra".to_string(), "x".to_string());
        assert!(selector.matches(&pod));

        pod.insert("tier".to_string(), "cron".to_string());
        assert!(!selector.matches(&pod));
    }
}
