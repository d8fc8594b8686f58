//! HPA inspection CLI
//!
//! A command-line tool for decoding HorizontalPodAutoscaler payloads of any
//! supported revision and previewing the series the exporter would derive.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{decode, derive, revisions};
use exporter_lib::SchemaRevision;
use std::path::PathBuf;

/// HPA inspection CLI
#[derive(Parser)]
#[command(name = "hpactl")]
#[command(author, version, about = "CLI for inspecting HorizontalPodAutoscaler payloads", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a single autoscaler, detecting its revision
    Decode {
        /// Payload file (YAML or JSON), or - for stdin
        file: PathBuf,
    },

    /// Decode an autoscaler list of a known revision
    List {
        /// Payload file (YAML or JSON), or - for stdin
        file: PathBuf,

        /// List revision (v1, v2beta1, v2beta2, v2)
        #[arg(long, short, default_value = "v1")]
        revision: SchemaRevision,
    },

    /// Decode a list and derive the target-utilization series
    Derive {
        /// Payload file (YAML or JSON), or - for stdin
        file: PathBuf,

        /// List revision (v1, v2beta1, v2beta2, v2)
        #[arg(long, short, default_value = "v1")]
        revision: SchemaRevision,

        /// Series end time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,

        /// Project id label
        #[arg(long, env = "HPACTL_PROJECT_ID")]
        project_id: Option<String>,

        /// Cluster location label
        #[arg(long, env = "HPACTL_LOCATION")]
        location: Option<String>,

        /// Cluster name label
        #[arg(long, env = "HPACTL_CLUSTER_NAME")]
        cluster_name: Option<String>,
    },

    /// List the supported autoscaling revisions
    Revisions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file } => {
            decode::decode(&file, cli.format)?;
        }
        Commands::List { file, revision } => {
            decode::list(&file, revision, cli.format)?;
        }
        Commands::Derive {
            file,
            revision,
            now,
            project_id,
            location,
            cluster_name,
        } => {
            let config = config::Config::load()?;
            let args = derive::DeriveArgs {
                file,
                revision,
                now,
                project_id,
                location,
                cluster_name,
            };
            derive::derive(&args, &config, cli.format)?;
        }
        Commands::Revisions => {
            revisions::show_revisions(cli.format)?;
        }
    }

    Ok(())
}
