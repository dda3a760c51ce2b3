//! Wires the remote client, tree retriever and image pipeline from a `BridgeConfig`.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::images::{Downloader, ImagePipeline};
use crate::remote::{CurlTransport, RemoteClient};
use crate::tree::{BasicSimplifier, DiagnosticDump, TreeRetriever};

/// Everything a caller needs to read designs and fetch their images.
pub struct FigmaBridge {
    tree: TreeRetriever,
    images: ImagePipeline,
}

impl FigmaBridge {
    /// Build the default stack: curl transport, basic simplifier, curl downloads.
    pub fn from_config(cfg: &BridgeConfig) -> Result<Self> {
        let credentials = cfg.credentials()?;
        let transport = CurlTransport::new(&cfg.api_base_url, credentials)
            .context("set up Figma API client")?;
        let client = RemoteClient::new(Arc::new(transport));
        let dump = DiagnosticDump::new(cfg.dump_dir());
        if let Some(dir) = dump.dir() {
            tracing::debug!("development mode: dumping payloads to {}", dir.display());
        }
        Ok(Self::with_parts(client, Downloader::default(), dump))
    }

    pub fn with_parts(client: RemoteClient, downloader: Downloader, dump: DiagnosticDump) -> Self {
        Self {
            tree: TreeRetriever::new(client.clone(), Arc::new(BasicSimplifier), dump),
            images: ImagePipeline::new(client, downloader),
        }
    }

    pub fn tree(&self) -> &TreeRetriever {
        &self.tree
    }

    pub fn images(&self) -> &ImagePipeline {
        &self.images
    }
}
