//! Deployment synthesis for OdooCluster resources
//!
//! [`synthesize`] turns one `OdooCluster` into a Deployment per (track, tier)
//! pair. It delegates to the workload builders:
//! - [`name_for`](crate::workload::naming::name_for): names and labels
//! - [`volumes_for`](crate::workload::volume::volumes_for): the shared pod volumes
//! - [`assemble`](crate::workload::pod_template::assemble): the container and pod settings
//!
//! # Usage
//!
//! ```text
//! let deployments = synthesize(&cluster)?;
//! // apply each deployment.deployment with server-side apply
//! let status = OdooClusterStatus::reconciled(&deployments);
//! ```
//!
//! # Ordering
//!
//! Tracks keep their declaration order; within a track, tiers follow the
//! canonical order Server, Cron, Background, Longpolling no matter how they
//! are declared. The output is a pure function of the resource.

mod render;
mod status;

use std::collections::{BTreeMap, BTreeSet};

use kube::Resource;
use tracing::{debug, info, warn};

use crate::crd::{OdooCluster, TierKind, TierSpec};
use crate::workload::pod_template::assemble;
use crate::workload::volume::volumes_for;
use crate::workload::{
    Deployment, DeploymentSpec, DeploymentStrategy, LabelSelector, ObjectMeta, OwnerReference,
    DEPLOYMENT_API_VERSION, DEPLOYMENT_KIND,
};
use crate::{Error, Result};

pub use render::{to_json, to_yaml};
pub use status::image_load_share;

/// One synthesized deployment and the (track, tier) pair it runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedDeployment {
    /// Track name
    pub track: String,
    /// Tier kind
    pub tier: TierKind,
    /// Image reference the track runs
    pub image: String,
    /// The apps/v1 Deployment
    pub deployment: Deployment,
}

impl GeneratedDeployment {
    /// Resource name
    pub fn name(&self) -> &str {
        &self.deployment.metadata.name
    }

    /// Labels on the deployment and its pods
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.deployment.metadata.labels
    }

    /// Desired replicas
    pub fn replicas(&self) -> u32 {
        self.deployment.spec.replicas
    }
}

/// Synthesize every deployment of a cluster.
///
/// The whole spec is validated first. Any error aborts the call; no partial
/// output is ever returned.
pub fn synthesize(cluster: &OdooCluster) -> Result<Vec<GeneratedDeployment>> {
    let name = required(cluster.metadata.name.as_deref(), "name")?;
    let namespace = required(cluster.metadata.namespace.as_deref(), "namespace")?;
    let uid = required(cluster.metadata.uid.as_deref(), "uid")?;
    let spec = &cluster.spec;

    spec.validate(name)?;

    // Validation rejects duplicate kinds, so keying by kind loses nothing
    // and yields the canonical order.
    let tiers: BTreeMap<TierKind, &TierSpec> = spec.tiers.iter().map(|t| (t.kind, t)).collect();

    let owner = owner_reference(name, uid);
    let volumes = volumes_for(name, spec);

    let mut deployments = Vec::with_capacity(spec.tracks.len() * tiers.len());
    let mut seen = BTreeSet::new();
    let mut truncated = 0usize;

    for track in &spec.tracks {
        let image = spec
            .image_for(track)
            .map(|i| i.reference())
            .ok_or_else(|| {
                Error::validation(
                    name,
                    "spec.tracks",
                    format!(
                        "track '{}' references unknown image '{}'",
                        track.name, track.image
                    ),
                )
            })?;

        for (kind, tier) in &tiers {
            let replicas = u32::try_from(tier.replicas).map_err(|_| {
                Error::validation(
                    name,
                    "spec.tiers",
                    format!("{} tier replicas must not be negative", kind),
                )
            })?;

            let pod = assemble(name, &track.name, &image, *kind, &spec.node_selector);
            let resource_name = pod.identity.name.clone();
            if pod.identity.truncated {
                truncated += 1;
            }
            if !seen.insert(resource_name.clone()) {
                return Err(Error::name_collision(name, resource_name));
            }

            let labels = pod.identity.labels.clone();
            let deployment = Deployment {
                api_version: DEPLOYMENT_API_VERSION.to_string(),
                kind: DEPLOYMENT_KIND.to_string(),
                metadata: ObjectMeta::new(resource_name.as_str(), namespace, labels.clone())
                    .with_owner(owner.clone()),
                spec: DeploymentSpec {
                    replicas,
                    selector: LabelSelector {
                        match_labels: labels,
                    },
                    template: pod.into_template(volumes.clone()),
                    strategy: Some(DeploymentStrategy::one_at_a_time()),
                },
            };

            debug!(
                cluster = name,
                track = %track.name,
                tier = %kind,
                deployment = %resource_name,
                replicas,
                "synthesized deployment"
            );

            deployments.push(GeneratedDeployment {
                track: track.name.clone(),
                tier: *kind,
                image: image.clone(),
                deployment,
            });
        }
    }

    if truncated > 0 {
        warn!(
            cluster = name,
            truncated,
            "resource names truncated to fit 63 characters"
        );
    }

    info!(
        cluster = name,
        namespace,
        tracks = spec.tracks.len(),
        tiers = tiers.len(),
        deployments = deployments.len(),
        "synthesized cluster"
    );

    Ok(deployments)
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingMetadata { field })
}

/// Controller reference back to the OdooCluster, so deleting the cluster
/// garbage-collects its deployments.
fn owner_reference(name: &str, uid: &str) -> OwnerReference {
    OwnerReference {
        api_version: OdooCluster::api_version(&()).to_string(),
        kind: OdooCluster::kind(&()).to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

// =============================================================================
// Tests
// =============================================================================
