//! Workload types and builders for Odoo deployments
//!
//! This module defines the apps/v1 Deployment shape the synthesizer emits and
//! the leaf builders it composes:
//! - [`tier`]: per-tier ports, probes and startup args
//! - [`naming`]: resource names and labels
//! - [`volume`]: the pod volume set shared by every deployment of a cluster
//! - [`pod_template`]: one container plus the pod-level settings
//!
//! For deployment generation, use [`crate::compiler::synthesize`].

pub mod k8s;
pub mod naming;
pub mod pod_template;
pub mod tier;
pub mod volume;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use k8s::{
    Container, ContainerPort, LabelSelector, ObjectMeta, OwnerReference, PodSecurityContext,
    ProbeSpec, Volume, VolumeMount,
};

/// API version of generated deployments
pub const DEPLOYMENT_API_VERSION: &str = "apps/v1";

/// Kind of generated deployments
pub const DEPLOYMENT_KIND: &str = "Deployment";

// =============================================================================
// Deployment
// =============================================================================

/// Kubernetes Deployment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: DeploymentSpec,
}

/// Deployment spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Number of replicas
    pub replicas: u32,
    /// Label selector
    pub selector: LabelSelector,
    /// Pod template
    pub template: PodTemplateSpec,
    /// Deployment strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DeploymentStrategy>,
}

/// Deployment strategy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    /// Strategy type: RollingUpdate or Recreate
    #[serde(rename = "type")]
    pub type_: String,
    /// Rolling update config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<RollingUpdateConfig>,
}

impl DeploymentStrategy {
    /// Replace pods one at a time: at most one down and one extra at any moment
    pub fn one_at_a_time() -> Self {
        Self {
            type_: "RollingUpdate".to_string(),
            rolling_update: Some(RollingUpdateConfig {
                max_unavailable: Some(1),
                max_surge: Some(1),
            }),
        }
    }
}

/// Rolling update configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollingUpdateConfig {
    /// Max unavailable pods, as an absolute count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<i32>,
    /// Max surge pods, as an absolute count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<i32>,
}

/// Pod template spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
    /// Pod metadata
    pub metadata: PodMeta,
    /// Pod spec
    pub spec: PodSpec,
}

/// Pod metadata (subset of ObjectMeta)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodMeta {
    /// Labels
    pub labels: BTreeMap<String, String>,
}

/// Pod spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Containers
    pub containers: Vec<Container>,
    /// Volumes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    /// Pod-level security context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
    /// Node selector
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
}
