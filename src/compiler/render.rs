//! Manifest rendering for synthesized deployments

use crate::workload::Deployment;
use crate::Result;

use super::GeneratedDeployment;

/// Render deployments as a multi-document YAML stream, one `---` per document
pub fn to_yaml(deployments: &[GeneratedDeployment]) -> Result<String> {
    let mut out = String::new();
    for d in deployments {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(&d.deployment)?);
    }
    Ok(out)
}

/// Render deployments as a pretty-printed JSON array
pub fn to_json(deployments: &[GeneratedDeployment]) -> Result<String> {
    let manifests: Vec<&Deployment> = deployments.iter().map(|d| &d.deployment).collect();
    Ok(serde_json::to_string_pretty(&manifests)?)
}
