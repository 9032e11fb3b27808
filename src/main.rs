//! Odoo Operator - Deployment synthesis for OdooCluster resources

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use kube::CustomResourceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use odoo_operator::compiler::{synthesize, to_json, to_yaml};
use odoo_operator::crd::OdooCluster;

/// Odoo operator - turns OdooCluster resources into per-track, per-tier Deployments
#[derive(Parser, Debug)]
#[command(name = "odoo-operator", version, about, long_about = None)]
struct Cli {
    /// Generate CRD manifests and exit
    #[arg(long)]
    crd: bool,

    /// Log output format
    #[arg(
        long,
        env = "ODOO_OPERATOR_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the Deployments for an OdooCluster manifest without cluster access
    Render(RenderArgs),
}

/// Render mode arguments
#[derive(Parser, Debug)]
struct RenderArgs {
    /// Path to the OdooCluster YAML manifest
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,

    /// Namespace to use when the manifest has none
    #[arg(long, env = "ODOO_OPERATOR_NAMESPACE", default_value = "default")]
    namespace: String,

    /// Owner UID to use when the manifest has none (it normally comes from the API server)
    #[arg(long)]
    uid: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered manifests on stdout stay pipeable
    let (text, json) = match cli.log_format {
        LogFormat::Text => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };
    tracing_subscriber::registry()
        .with(text)
        .with(json)
        .with(EnvFilter::from_default_env())
        .init();

    if cli.crd {
        let crd = serde_yaml::to_string(&OdooCluster::crd())
            .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;
        println!("{crd}");
        return Ok(());
    }

    match cli.command {
        Some(Commands::Render(args)) => run_render(args),
        None => Err(anyhow::anyhow!(
            "nothing to do: pass --crd or a subcommand (see --help)"
        )),
    }
}

/// Synthesize the deployments for a manifest and print them
fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .map_err(|e| anyhow::anyhow!("Failed to read manifest {:?}: {}", args.file, e))?;

    let mut cluster: OdooCluster = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse OdooCluster manifest: {}", e))?;

    if cluster.metadata.namespace.is_none() {
        cluster.metadata.namespace = Some(args.namespace);
    }
    if cluster.metadata.uid.is_none() {
        cluster.metadata.uid = args.uid;
    }

    let deployments = synthesize(&cluster)?;
    let rendered = match args.output {
        OutputFormat::Yaml => to_yaml(&deployments)?,
        OutputFormat::Json => to_json(&deployments)?,
    };
    print!("{rendered}");
    if args.output == OutputFormat::Json {
        println!();
    }

    Ok(())
}
