//! OdooCluster CRD
//!
//! An `OdooCluster` declares the image catalog, the tracks that run those
//! images, and the tiers every track instantiates. The synthesis engine turns
//! one of these into a Deployment per (track, tier) pair.

use std::collections::{BTreeMap, BTreeSet};

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    DeployModel, ImageSpec, ResourceQuotaSpec, TierSpec, TrackSpec, VolumeClaimSpec,
};
use super::validate_dns_label;
use crate::{Error, Result, CONFIG_VOLUME_NAME};

// =============================================================================
// CRD
// =============================================================================

/// Specification for an Odoo cluster
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "odoo.io",
    version = "v1alpha1",
    kind = "OdooCluster",
    plural = "odooclusters",
    shortname = "odc",
    namespaced,
    status = "OdooClusterStatus",
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".status.currentImage"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OdooClusterSpec {
    /// Image catalog referenced by tracks
    #[serde(default)]
    pub images: Vec<ImageSpec>,

    /// Tracks, in the order their deployments are generated
    #[serde(default)]
    pub tracks: Vec<TrackSpec>,

    /// Tiers instantiated on every track
    #[serde(default)]
    pub tiers: Vec<TierSpec>,

    /// Persistent volume claims mounted into every pod, in mount order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeClaimSpec>,

    /// ConfigMap holding the Odoo configuration file
    pub config_map: String,

    /// Resource quota hint
    #[serde(default)]
    pub resources: ResourceQuotaSpec,

    /// Database placement
    #[serde(default)]
    pub deploy_model: DeployModel,

    /// Node selector applied to every pod
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
}

impl OdooClusterSpec {
    /// Look up the image a track runs
    pub fn image_for(&self, track: &TrackSpec) -> Option<&ImageSpec> {
        self.images.iter().find(|i| i.name == track.image)
    }

    /// Validate the whole spec.
    ///
    /// Synthesis calls this before generating anything, so a spec that passes
    /// can always be synthesized without partial failure.
    pub fn validate(&self, cluster: &str) -> Result<()> {
        if self.config_map.is_empty() {
            return Err(Error::validation(
                cluster,
                "spec.configMap",
                "config map name cannot be empty",
            ));
        }

        self.validate_images(cluster)?;
        self.validate_tracks(cluster)?;
        self.validate_tiers(cluster)?;
        self.validate_volumes(cluster)
    }

    fn validate_images(&self, cluster: &str) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (i, image) in self.images.iter().enumerate() {
            let field = format!("spec.images[{}]", i);
            if image.name.is_empty() {
                return Err(Error::validation(cluster, field, "image name cannot be empty"));
            }
            if image.image.is_empty() || image.tag.is_empty() {
                return Err(Error::validation(
                    cluster,
                    field,
                    format!("image '{}' needs both image and tag", image.name),
                ));
            }
            if !seen.insert(image.name.as_str()) {
                return Err(Error::validation(
                    cluster,
                    field,
                    format!("duplicate image name '{}'", image.name),
                ));
            }
        }
        Ok(())
    }

    fn validate_tracks(&self, cluster: &str) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(Error::validation(
                cluster,
                "spec.tracks",
                "at least one track is required",
            ));
        }

        let mut seen = BTreeSet::new();
        for (i, track) in self.tracks.iter().enumerate() {
            let field = format!("spec.tracks[{}]", i);
            validate_dns_label(&track.name)
                .map_err(|e| Error::validation(cluster, format!("{}.name", field), e))?;
            if !seen.insert(track.name.as_str()) {
                return Err(Error::validation(
                    cluster,
                    format!("{}.name", field),
                    format!("duplicate track '{}'", track.name),
                ));
            }
            if self.image_for(track).is_none() {
                return Err(Error::validation(
                    cluster,
                    format!("{}.image", field),
                    format!(
                        "track '{}' references unknown image '{}'",
                        track.name, track.image
                    ),
                ));
            }
        }
        Ok(())
    }

    fn validate_tiers(&self, cluster: &str) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(Error::validation(
                cluster,
                "spec.tiers",
                "at least one tier is required",
            ));
        }

        let mut seen = BTreeSet::new();
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.replicas < 0 {
                return Err(Error::validation(
                    cluster,
                    format!("spec.tiers[{}].replicas", i),
                    format!(
                        "{} tier replicas must not be negative, got {}",
                        tier.kind, tier.replicas
                    ),
                ));
            }
            if !seen.insert(tier.kind) {
                return Err(Error::validation(
                    cluster,
                    format!("spec.tiers[{}].kind", i),
                    format!("{} tier declared more than once", tier.kind),
                ));
            }
        }
        Ok(())
    }

    fn validate_volumes(&self, cluster: &str) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (i, volume) in self.volumes.iter().enumerate() {
            let field = format!("spec.volumes[{}]", i);
            validate_dns_label(&volume.name)
                .map_err(|e| Error::validation(cluster, format!("{}.name", field), e))?;
            if volume.name == CONFIG_VOLUME_NAME {
                return Err(Error::validation(
                    cluster,
                    format!("{}.name", field),
                    format!("'{}' is reserved for the configuration volume", CONFIG_VOLUME_NAME),
                ));
            }
            if !seen.insert(volume.name.as_str()) {
                return Err(Error::validation(
                    cluster,
                    format!("{}.name", field),
                    format!("duplicate volume '{}'", volume.name),
                ));
            }
            if let Some(claim) = &volume.claim_name {
                if claim.is_empty() {
                    return Err(Error::validation(
                        cluster,
                        format!("{}.claimName", field),
                        "claim name cannot be empty",
                    ));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Status
// =============================================================================

/// Lifecycle state of an OdooCluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ClusterState {
    /// Resource accepted, nothing applied yet
    #[default]
    Created,
    /// Generated deployments have been applied
    Reconciled,
}

/// Desired instances running a given image
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLoad {
    /// Image reference
    pub name: String,
    /// Sum of desired replicas across all deployments using the image
    pub instances: u64,
}

/// Observed status of an OdooCluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OdooClusterStatus {
    /// Database user quota usage as reported by the database controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_user_quota_usage: Option<String>,

    /// Disk usage as reported by the storage controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<String>,

    /// Lifecycle state
    #[serde(default)]
    pub state: ClusterState,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Image of the first track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image: Option<String>,

    /// Desired instances per image
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_load_share: Vec<ImageLoad>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::TierKind;
    use kube::CustomResourceExt;

    fn valid_spec() -> OdooClusterSpec {
        OdooClusterSpec {
            images: vec![ImageSpec {
                name: "odoo-14".to_string(),
                registry: "registry.example.com".to_string(),
                image: "odoo/odoo".to_string(),
                tag: "14.0".to_string(),
            }],
            tracks: vec![TrackSpec {
                name: "stable".to_string(),
                image: "odoo-14".to_string(),
            }],
            tiers: vec![TierSpec {
                kind: TierKind::Server,
                replicas: 2,
            }],
            volumes: vec![VolumeClaimSpec {
                name: "data".to_string(),
                claim_name: None,
            }],
            config_map: "acme-config".to_string(),
            ..Default::default()
        }
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_spec_passes() {
        assert!(valid_spec().validate("acme").is_ok());
    }

    #[test]
    fn empty_config_map_fails() {
        let mut spec = valid_spec();
        spec.config_map.clear();
        assert_eq!(field_of(spec.validate("acme").unwrap_err()), "spec.configMap");
    }

    #[test]
    fn no_tracks_fails() {
        let mut spec = valid_spec();
        spec.tracks.clear();
        assert_eq!(field_of(spec.validate("acme").unwrap_err()), "spec.tracks");
    }

    #[test]
    fn duplicate_track_fails() {
        let mut spec = valid_spec();
        spec.tracks.push(spec.tracks[0].clone());
        let err = spec.validate("acme").unwrap_err();
        assert!(err.to_string().contains("duplicate track 'stable'"));
    }

    #[test]
    fn track_with_unknown_image_fails() {
        let mut spec = valid_spec();
        spec.tracks[0].image = "odoo-15".to_string();
        assert_eq!(
            field_of(spec.validate("acme").unwrap_err()),
            "spec.tracks[0].image"
        );
    }

    #[test]
    fn track_name_must_be_dns_label() {
        let mut spec = valid_spec();
        spec.tracks[0].name = "Stable_Track".to_string();
        assert_eq!(
            field_of(spec.validate("acme").unwrap_err()),
            "spec.tracks[0].name"
        );
    }

    #[test]
    fn negative_replicas_fail() {
        let mut spec = valid_spec();
        spec.tiers[0].replicas = -1;
        let err = spec.validate("acme").unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
        assert_eq!(field_of(err), "spec.tiers[0].replicas");
    }

    #[test]
    fn zero_replicas_allowed() {
        let mut spec = valid_spec();
        spec.tiers[0].replicas = 0;
        assert!(spec.validate("acme").is_ok());
    }

    #[test]
    fn duplicate_tier_fails() {
        let mut spec = valid_spec();
        spec.tiers.push(TierSpec {
            kind: TierKind::Server,
            replicas: 1,
        });
        assert_eq!(field_of(spec.validate("acme").unwrap_err()), "spec.tiers[1].kind");
    }

    #[test]
    fn no_tiers_fails() {
        let mut spec = valid_spec();
        spec.tiers.clear();
        assert_eq!(field_of(spec.validate("acme").unwrap_err()), "spec.tiers");
    }

    #[test]
    fn config_volume_name_is_reserved() {
        let mut spec = valid_spec();
        spec.volumes.push(VolumeClaimSpec {
            name: "config".to_string(),
            claim_name: None,
        });
        assert!(spec
            .validate("acme")
            .unwrap_err()
            .to_string()
            .contains("reserved"));
    }

    #[test]
    fn duplicate_volume_fails() {
        let mut spec = valid_spec();
        spec.volumes.push(spec.volumes[0].clone());
        assert_eq!(
            field_of(spec.validate("acme").unwrap_err()),
            "spec.volumes[1].name"
        );
    }

    #[test]
    fn duplicate_image_fails() {
        let mut spec = valid_spec();
        spec.images.push(spec.images[0].clone());
        assert_eq!(field_of(spec.validate("acme").unwrap_err()), "spec.images[1]");
    }

    #[test]
    fn crd_has_expected_identity() {
        let crd = OdooCluster::crd();
        assert_eq!(crd.spec.group, "odoo.io");
        assert_eq!(crd.spec.names.kind, "OdooCluster");
        assert_eq!(crd.spec.names.plural, "odooclusters");
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn spec_parses_from_yaml() {
        let yaml = r#"
images:
  - name: odoo-14
    image: odoo/odoo
    tag: "14.0"
tracks:
  - name: stable
    image: odoo-14
tiers:
  - kind: Server
    replicas: 2
  - kind: Longpolling
configMap: acme-config
deployModel: remote
"#;
        let spec: OdooClusterSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.tiers.len(), 2);
        assert_eq!(spec.tiers[1].replicas, 1);
        assert_eq!(spec.deploy_model, DeployModel::Remote);
        assert!(spec.validate("acme").is_ok());
    }
}
