//! Pod assembly for one (track, tier) pair
//!
//! Combines the tier catalog and the resource namer into a single Odoo
//! container, and adds the pod-level settings every tier shares.

use std::collections::BTreeMap;

use crate::crd::TierKind;
use crate::{
    BACKUP_MOUNT_PATH, BACKUP_VOLUME_NAME, CONFIG_MOUNT_PATH, CONFIG_VOLUME_NAME, DATA_MOUNT_PATH,
    DATA_VOLUME_NAME, ODOO_UID,
};

use super::k8s::{Container, PodSecurityContext, Volume, VolumeMount};
use super::naming::{name_for, ResourceIdentity};
use super::tier::behavior_for;
use super::{PodMeta, PodSpec, PodTemplateSpec};

/// Pod template components for one (track, tier) pair.
///
/// Volumes are not included; the synthesizer builds them once per cluster and
/// hands them to [`AssembledPod::into_template`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledPod {
    /// Resource name and labels
    pub identity: ResourceIdentity,
    /// The Odoo container
    pub container: Container,
    /// Pod-level security context
    pub security_context: PodSecurityContext,
    /// Node selector copied from the cluster
    pub node_selector: BTreeMap<String, String>,
}

impl AssembledPod {
    /// Build the pod template around the shared cluster volumes
    pub fn into_template(self, volumes: Vec<Volume>) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: PodMeta {
                labels: self.identity.labels,
            },
            spec: PodSpec {
                containers: vec![self.container],
                volumes,
                security_context: Some(self.security_context),
                node_selector: self.node_selector,
            },
        }
    }
}

/// Assemble the pod for `track` running `tier`.
///
/// `image` is the resolved image reference of the track.
pub fn assemble(
    cluster: &str,
    track: &str,
    image: &str,
    tier: TierKind,
    node_selector: &BTreeMap<String, String>,
) -> AssembledPod {
    let identity = name_for(cluster, track, tier);
    let behavior = behavior_for(tier);

    let container = Container {
        name: identity.name.clone(),
        image: image.to_string(),
        args: behavior.args,
        ports: behavior.ports,
        liveness_probe: behavior.liveness_probe,
        readiness_probe: behavior.readiness_probe,
        volume_mounts: volume_mounts(),
    };

    AssembledPod {
        identity,
        container,
        security_context: pod_security_context(),
        node_selector: node_selector.clone(),
    }
}

/// Mounts every Odoo container gets, regardless of tier
fn volume_mounts() -> Vec<VolumeMount> {
    vec![
        VolumeMount {
            name: CONFIG_VOLUME_NAME.to_string(),
            mount_path: CONFIG_MOUNT_PATH.to_string(),
            read_only: Some(true),
        },
        VolumeMount {
            name: DATA_VOLUME_NAME.to_string(),
            mount_path: DATA_MOUNT_PATH.to_string(),
            read_only: None,
        },
        VolumeMount {
            name: BACKUP_VOLUME_NAME.to_string(),
            mount_path: BACKUP_MOUNT_PATH.to_string(),
            read_only: None,
        },
    ]
}

/// The Odoo image runs as uid/gid 9001; fsGroup makes claims writable to it.
fn pod_security_context() -> PodSecurityContext {
    PodSecurityContext {
        run_as_user: Some(ODOO_UID),
        run_as_group: Some(ODOO_UID),
        run_as_non_root: Some(true),
        fs_group: Some(ODOO_UID),
    }
}
