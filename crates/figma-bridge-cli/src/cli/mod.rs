//! CLI for the figma-bridge asset pipeline.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use figma_bridge_core::config::{self, BridgeConfig, RunMode};
use figma_bridge_core::images::ImageRequest;
use figma_bridge_core::FigmaBridge;
use std::path::PathBuf;

use commands::{run_config_path, run_file, run_images, run_node, ImagesArgs};

/// Top-level CLI for the figma-bridge asset pipeline.
#[derive(Debug, Parser)]
#[command(name = "figma-bridge")]
#[command(about = "figma-bridge: read Figma designs and download their images", long_about = None)]
pub struct Cli {
    /// Figma personal access token. Overrides FIGMA_API_KEY and the config file.
    #[arg(long, global = true, value_name = "KEY")]
    pub figma_api_key: Option<String>,

    /// Figma OAuth access token. Takes precedence over any API key.
    #[arg(long, global = true, value_name = "TOKEN")]
    pub figma_oauth_token: Option<String>,

    /// Development mode: dump raw and simplified payloads to the dump directory.
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a whole file and print its simplified design as JSON.
    File {
        /// Figma file key (from the file URL).
        file_id: String,
        /// Limit traversal to N levels below the document root.
        #[arg(long, value_name = "N")]
        depth: Option<u32>,
    },

    /// Fetch one node subtree and print its simplified design as JSON.
    Node {
        /// Figma file key.
        file_id: String,
        /// Node id, e.g. 1:2.
        node_id: String,
        /// Limit traversal to N levels below the node.
        #[arg(long, value_name = "N")]
        depth: Option<u32>,
    },

    /// Download image fills and rendered nodes into a directory.
    Images {
        /// Figma file key.
        file_id: String,
        /// Target directory (created if missing).
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        /// Render a node; format from the extension (.png or .svg).
        #[arg(long = "render", value_name = "NODE_ID=FILE_NAME", value_parser = args::parse_render_arg)]
        renders: Vec<ImageRequest>,
        /// Download an image fill by its reference.
        #[arg(long = "fill", value_name = "NODE_ID=FILE_NAME=FILL_REF", value_parser = args::parse_fill_arg)]
        fills: Vec<ImageRequest>,
        /// JSON file holding an array of image requests.
        #[arg(long, value_name = "JSON_FILE")]
        requests: Option<PathBuf>,
        /// Print one status line per request, in request order.
        #[arg(long)]
        detailed: bool,
    },

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    /// Flags win over environment and config file.
    fn apply_overrides(&self, cfg: &mut BridgeConfig) {
        if let Some(key) = &self.figma_api_key {
            cfg.api_key = Some(key.clone());
        }
        if let Some(token) = &self.figma_oauth_token {
            cfg.oauth_token = Some(token.clone());
        }
        if self.dev {
            cfg.mode = RunMode::Development;
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::ConfigPath = cli.command {
            return run_config_path();
        }

        let mut cfg = config::load_or_init()?;
        cfg.apply_env();
        cli.apply_overrides(&mut cfg);
        tracing::debug!(base_url = %cfg.api_base_url, mode = ?cfg.mode, "loaded config");
        let bridge = FigmaBridge::from_config(&cfg)?;

        match cli.command {
            CliCommand::File { file_id, depth } => run_file(&bridge, &file_id, depth).await?,
            CliCommand::Node {
                file_id,
                node_id,
                depth,
            } => run_node(&bridge, &file_id, &node_id, depth).await?,
            CliCommand::Images {
                file_id,
                dir,
                renders,
                fills,
                requests,
                detailed,
            } => {
                let args = ImagesArgs {
                    file_id,
                    dir,
                    renders,
                    fills,
                    requests_file: requests,
                    detailed,
                };
                run_images(&bridge, args).await?;
            }
            CliCommand::ConfigPath => run_config_path()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
