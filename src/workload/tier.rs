//! Tier catalog: per-tier ports, probes and startup args
//!
//! `behavior_for` is a total match over [`TierKind`]. Each arm returns the
//! final behavior for that tier; there is no shared default that arms patch.

use crate::crd::TierKind;
use crate::ODOO_CONFIG_FILE;

use super::k8s::{ContainerPort, ExecAction, HttpGetAction, ProbeSpec};

/// HTTP port served by the Server tier
pub const CLIENT_PORT: u16 = 8069;
/// Port name for [`CLIENT_PORT`]
pub const CLIENT_PORT_NAME: &str = "client";
/// Long-poll port served by the Longpolling tier
pub const LONGPOLLING_PORT: u16 = 8072;
/// Port name for [`LONGPOLLING_PORT`]
pub const LONGPOLLING_PORT_NAME: &str = "longpolling";

/// Path checked by liveness and readiness probes
pub const HEALTH_PATH: &str = "/web";

/// Everything about a container that depends on its tier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierBehavior {
    /// Exposed container ports
    pub ports: Vec<ContainerPort>,
    /// Restart the container when this fails
    pub liveness_probe: Option<ProbeSpec>,
    /// Remove the pod from service when this fails
    pub readiness_probe: Option<ProbeSpec>,
    /// Args passed to the Odoo entrypoint
    pub args: Vec<String>,
}

/// Look up the behavior of a tier.
///
/// Cron and Background tiers serve no traffic and get no probes: the kubelet
/// restarts them when the process exits.
pub fn behavior_for(kind: TierKind) -> TierBehavior {
    match kind {
        TierKind::Server => port_bearing(kind, CLIENT_PORT_NAME, CLIENT_PORT),
        TierKind::Longpolling => port_bearing(kind, LONGPOLLING_PORT_NAME, LONGPOLLING_PORT),
        TierKind::Cron | TierKind::Background => TierBehavior {
            ports: Vec::new(),
            liveness_probe: None,
            readiness_probe: None,
            args: startup_args(kind),
        },
    }
}

fn port_bearing(kind: TierKind, port_name: &str, port: u16) -> TierBehavior {
    TierBehavior {
        ports: vec![ContainerPort {
            name: port_name.to_string(),
            container_port: port,
            protocol: Some("TCP".to_string()),
        }],
        liveness_probe: Some(liveness_probe(port)),
        readiness_probe: Some(readiness_probe(port)),
        args: startup_args(kind),
    }
}

/// Exec curl against the local HTTPS endpoint, infrequently.
fn liveness_probe(port: u16) -> ProbeSpec {
    ProbeSpec {
        http_get: None,
        exec: Some(ExecAction {
            command: vec![
                "curl".to_string(),
                "--connect-timeout".to_string(),
                "5".to_string(),
                "--max-time".to_string(),
                "10".to_string(),
                "-k".to_string(),
                "-s".to_string(),
                "-f".to_string(),
                format!("https://localhost:{}{}", port, HEALTH_PATH),
            ],
        }),
        initial_delay_seconds: 10,
        timeout_seconds: 10,
        period_seconds: 60,
        failure_threshold: 3,
    }
}

fn readiness_probe(port: u16) -> ProbeSpec {
    ProbeSpec {
        http_get: Some(HttpGetAction {
            path: HEALTH_PATH.to_string(),
            port,
            scheme: Some("HTTPS".to_string()),
        }),
        exec: None,
        initial_delay_seconds: 10,
        timeout_seconds: 10,
        period_seconds: 10,
        failure_threshold: 3,
    }
}

fn startup_args(kind: TierKind) -> Vec<String> {
    vec![
        "--config".to_string(),
        ODOO_CONFIG_FILE.to_string(),
        "--tier".to_string(),
        kind.slug().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_exposes_client_port_with_probes() {
        let b = behavior_for(TierKind::Server);
        assert_eq!(b.ports.len(), 1);
        assert_eq!(b.ports[0].container_port, 8069);
        assert_eq!(b.ports[0].name, "client");

        let readiness = b.readiness_probe.expect("server needs readiness");
        let http = readiness.http_get.expect("readiness is http");
        assert_eq!(http.port, 8069);
        assert_eq!(http.path, "/web");
        assert_eq!(http.scheme.as_deref(), Some("HTTPS"));

        let liveness = b.liveness_probe.expect("server needs liveness");
        let exec = liveness.exec.expect("liveness is exec");
        assert_eq!(exec.command[0], "curl");
        assert_eq!(
            exec.command.last().map(String::as_str),
            Some("https://localhost:8069/web")
        );
    }

    #[test]
    fn longpolling_binds_probes_to_its_own_port() {
        let b = behavior_for(TierKind::Longpolling);
        assert_eq!(b.ports[0].container_port, 8072);
        assert_eq!(b.ports[0].name, "longpolling");
        assert_eq!(
            b.readiness_probe.unwrap().http_get.unwrap().port,
            LONGPOLLING_PORT
        );
        assert!(b
            .liveness_probe
            .unwrap()
            .exec
            .unwrap()
            .command
            .contains(&"https://localhost:8072/web".to_string()));
    }

    #[test]
    fn probe_timings() {
        let b = behavior_for(TierKind::Server);
        let liveness = b.liveness_probe.unwrap();
        assert_eq!(
            (
                liveness.initial_delay_seconds,
                liveness.timeout_seconds,
                liveness.period_seconds,
                liveness.failure_threshold
            ),
            (10, 10, 60, 3)
        );
        let readiness = b.readiness_probe.unwrap();
        assert_eq!(
            (
                readiness.initial_delay_seconds,
                readiness.timeout_seconds,
                readiness.period_seconds,
                readiness.failure_threshold
            ),
            (10, 10, 10, 3)
        );
    }

    #[test]
    fn cron_and_background_have_no_ports_or_probes() {
        for kind in [TierKind::Cron, TierKind::Background] {
            let b = behavior_for(kind);
            assert!(b.ports.is_empty(), "{kind} should expose no ports");
            assert!(b.liveness_probe.is_none());
            assert!(b.readiness_probe.is_none());
        }
    }

    #[test]
    fn args_differ_only_by_tier_flag() {
        let cron = behavior_for(TierKind::Cron).args;
        let background = behavior_for(TierKind::Background).args;
        assert_eq!(cron[..3], background[..3]);
        assert_eq!(cron[3], "cron");
        assert_eq!(background[3], "background");
        assert_eq!(cron[1], ODOO_CONFIG_FILE);
    }

    #[test]
    fn every_tier_is_fully_populated() {
        for kind in TierKind::ALL {
            let b = behavior_for(kind);
            assert_eq!(b.args.len(), 4);
            assert_eq!(b.args[3], kind.slug());
            if matches!(kind, TierKind::Server | TierKind::Longpolling) {
                assert!(!b.ports.is_empty());
                assert!(b.liveness_probe.is_some());
                assert!(b.readiness_probe.is_some());
            }
        }
    }

    #[test]
    fn port_names_fit_kubernetes_limit() {
        for kind in TierKind::ALL {
            for port in behavior_for(kind).ports {
                assert!(port.name.len() <= 15, "{} too long", port.name);
            }
        }
    }
}
