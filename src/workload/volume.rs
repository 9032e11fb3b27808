//! Pod volume set for a cluster
//!
//! Every pod of a cluster gets the same volumes, in a stable order:
//! the configuration ConfigMap, then each declared claim in declaration
//! order, then emptyDir stand-ins for the well-known volumes the container
//! mounts but the cluster did not declare.
//!
//! Only `config`, `data` and `backup` are mounted into the Odoo container.
//! Any other declared claim is attached to the pod unmounted, for containers
//! injected after synthesis (admission webhooks, debug sidecars).

use crate::crd::OdooClusterSpec;
use crate::workload::naming::cluster_slug;
use crate::{BACKUP_VOLUME_NAME, CONFIG_VOLUME_NAME, DATA_VOLUME_NAME};

use super::k8s::Volume;

/// Build the pod volumes for a cluster.
///
/// A claim without an explicit `claimName` binds `<cluster>-<name>`, where
/// `<cluster>` is the same slug the deployment names use.
pub fn volumes_for(cluster_name: &str, spec: &OdooClusterSpec) -> Vec<Volume> {
    let slug = cluster_slug(cluster_name);
    let mut volumes = Vec::with_capacity(spec.volumes.len() + 3);
    volumes.push(Volume::from_config_map(
        CONFIG_VOLUME_NAME,
        spec.config_map.as_str(),
    ));

    for claim in &spec.volumes {
        let claim_name = match &claim.claim_name {
            Some(name) => name.clone(),
            None => format!("{}-{}", slug, claim.name),
        };
        volumes.push(Volume::from_pvc(claim.name.as_str(), claim_name));
    }

    for well_known in [DATA_VOLUME_NAME, BACKUP_VOLUME_NAME] {
        if !spec.volumes.iter().any(|v| v.name == well_known) {
            volumes.push(Volume::from_empty_dir(well_known));
        }
    }

    volumes
}
