//! Status derived from a synthesis result

use std::collections::BTreeMap;

use crate::crd::{ClusterState, ImageLoad, OdooClusterStatus};

use super::GeneratedDeployment;

/// Desired instances per image, summed across deployments and sorted by image
pub fn image_load_share(deployments: &[GeneratedDeployment]) -> Vec<ImageLoad> {
    let mut share: BTreeMap<&str, u64> = BTreeMap::new();
    for d in deployments {
        let total = share.entry(d.image.as_str()).or_default();
        *total = total.saturating_add(u64::from(d.replicas()));
    }
    share
        .into_iter()
        .map(|(name, instances)| ImageLoad {
            name: name.to_string(),
            instances,
        })
        .collect()
}

impl OdooClusterStatus {
    /// Status after the given deployments have been applied.
    ///
    /// `currentImage` is the image of the first track.
    pub fn reconciled(deployments: &[GeneratedDeployment]) -> Self {
        Self {
            state: ClusterState::Reconciled,
            message: Some(format!("{} deployments applied", deployments.len())),
            current_image: deployments.first().map(|d| d.image.clone()),
            image_load_share: image_load_share(deployments),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::synthesize;
    use crate::crd::{ImageSpec, OdooCluster, OdooClusterSpec, TierKind, TierSpec, TrackSpec};

    fn cluster() -> OdooCluster {
        let image = |name: &str, tag: &str| ImageSpec {
            name: name.to_string(),
            registry: String::new(),
            image: "odoo".to_string(),
            tag: tag.to_string(),
        };
        let track = |name: &str, image: &str| TrackSpec {
            name: name.to_string(),
            image: image.to_string(),
        };
        let mut cluster = OdooCluster::new(
            "acme",
            OdooClusterSpec {
                images: vec![image("v16", "16.0"), image("v17", "17.0")],
                tracks: vec![
                    track("stable", "v16"),
                    track("canary", "v17"),
                    track("legacy", "v16"),
                ],
                tiers: vec![
                    TierSpec {
                        kind: TierKind::Server,
                        replicas: 3,
                    },
                    TierSpec {
                        kind: TierKind::Cron,
                        replicas: 1,
                    },
                ],
                config_map: "acme-config".to_string(),
                ..Default::default()
            },
        );
        cluster.metadata.namespace = Some("erp".to_string());
        cluster.metadata.uid = Some("uid-1".to_string());
        cluster
    }

    #[test]
    fn load_share_sums_replicas_per_image() {
        let deployments = synthesize(&cluster()).unwrap();
        assert_eq!(
            image_load_share(&deployments),
            vec![
                ImageLoad {
                    name: "odoo:16.0".to_string(),
                    instances: 8,
                },
                ImageLoad {
                    name: "odoo:17.0".to_string(),
                    instances: 4,
                },
            ]
        );
    }

    #[test]
    fn load_share_does_not_overflow_at_max_replicas() {
        let mut cluster = cluster();
        cluster.spec.tracks.truncate(1);
        for name in ["canary", "legacy"] {
            cluster.spec.tracks.push(TrackSpec {
                name: name.to_string(),
                image: "v16".to_string(),
            });
        }
        cluster.spec.tiers = vec![TierSpec {
            kind: TierKind::Server,
            replicas: i32::MAX,
        }];

        let deployments = synthesize(&cluster).unwrap();
        assert_eq!(deployments.len(), 3);
        assert_eq!(
            image_load_share(&deployments),
            vec![ImageLoad {
                name: "odoo:16.0".to_string(),
                instances: 3 * i32::MAX as u64,
            }]
        );
    }

    #[test]
    fn reconciled_status_reports_first_track_image() {
        let deployments = synthesize(&cluster()).unwrap();
        let status = OdooClusterStatus::reconciled(&deployments);
        assert_eq!(status.state, ClusterState::Reconciled);
        assert_eq!(status.current_image.as_deref(), Some("odoo:16.0"));
        assert_eq!(status.image_load_share.len(), 2);
        assert_eq!(status.message.as_deref(), Some("6 deployments applied"));
    }

    #[test]
    fn empty_input_yields_empty_status() {
        let status = OdooClusterStatus::reconciled(&[]);
        assert!(status.current_image.is_none());
        assert!(status.image_load_share.is_empty());
    }
}
