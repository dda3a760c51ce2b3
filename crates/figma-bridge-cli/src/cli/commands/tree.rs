//! `figma-bridge file` / `figma-bridge node` – print a simplified design as JSON.

use anyhow::{Context, Result};
use figma_bridge_core::tree::SimplifiedDesign;
use figma_bridge_core::FigmaBridge;

pub async fn run_file(bridge: &FigmaBridge, file_id: &str, depth: Option<u32>) -> Result<()> {
    let design = bridge
        .tree()
        .get_file(file_id, depth)
        .await
        .with_context(|| format!("fetch file {}", file_id))?;
    print_design(&design)
}

pub async fn run_node(
    bridge: &FigmaBridge,
    file_id: &str,
    node_id: &str,
    depth: Option<u32>,
) -> Result<()> {
    let design = bridge
        .tree()
        .get_node(file_id, node_id, depth)
        .await
        .with_context(|| format!("fetch node {} of file {}", node_id, file_id))?;
    print_design(&design)
}

fn print_design(design: &SimplifiedDesign) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(design)?);
    Ok(())
}
