//! `figma-bridge images` – resolve and download a batch of image requests.

use anyhow::{Context, Result};
use figma_bridge_core::images::{AssetOutcome, ImageRequest};
use figma_bridge_core::FigmaBridge;
use std::path::{Path, PathBuf};

pub struct ImagesArgs {
    pub file_id: String,
    pub dir: PathBuf,
    pub renders: Vec<ImageRequest>,
    pub fills: Vec<ImageRequest>,
    pub requests_file: Option<PathBuf>,
    pub detailed: bool,
}

const UNRESOLVED: &str = "<unresolved>";

pub async fn run_images(bridge: &FigmaBridge, args: ImagesArgs) -> Result<()> {
    let mut requests = match &args.requests_file {
        Some(path) => load_requests(path)?,
        None => Vec::new(),
    };
    requests.extend(args.fills);
    requests.extend(args.renders);
    if requests.is_empty() {
        anyhow::bail!("nothing to download; pass --fill, --render or --requests");
    }

    tracing::info!(
        file_id = %args.file_id,
        count = requests.len(),
        dir = %args.dir.display(),
        "downloading images"
    );

    let pipeline = bridge.images();
    if args.detailed {
        let outcomes = pipeline
            .download_images_detailed(&args.file_id, &requests, &args.dir)
            .await
            .context("resolve image URLs")?;
        let saved = outcomes.iter().filter(|o| o.is_saved()).count();
        tracing::info!(saved, total = outcomes.len(), "image batch finished");
        for (request, outcome) in requests.iter().zip(outcomes) {
            println!("{}", describe(request, &outcome));
        }
        return Ok(());
    }

    let paths = pipeline
        .download_images(&args.file_id, &requests, &args.dir)
        .await
        .context("resolve image URLs")?;
    for path in paths {
        if path.is_empty() {
            println!("{}", UNRESOLVED);
        } else {
            println!("{}", path);
        }
    }
    Ok(())
}

fn load_requests(path: &Path) -> Result<Vec<ImageRequest>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read requests file {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parse requests file {}", path.display()))
}

fn describe(request: &ImageRequest, outcome: &AssetOutcome) -> String {
    match outcome {
        AssetOutcome::Saved(path) => format!("saved       {}", path.display()),
        AssetOutcome::Unresolved => format!("unresolved  {} ({})", request.file_name(), request.node_id()),
        AssetOutcome::Failed(reason) => {
            format!("failed      {} ({}): {}", request.file_name(), request.node_id(), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figma_bridge_core::images::ImageFormat;

    #[test]
    fn load_requests_reads_mixed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");
        std::fs::write(
            &path,
            r#"[
                {"nodeId": "1:1", "fileName": "bg.png", "assetKind": "fill", "fillRef": "ref-1"},
                {"nodeId": "2:2", "fileName": "icon.svg", "assetKind": "render", "format": "svg"}
            ]"#,
        )
        .unwrap();

        let requests = load_requests(&path).unwrap();
        assert_eq!(
            requests,
            vec![
                ImageRequest::fill("1:1", "bg.png", "ref-1"),
                ImageRequest::render("2:2", "icon.svg", ImageFormat::Svg),
            ]
        );
    }

    #[test]
    fn load_requests_rejects_invalid_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");
        std::fs::write(&path, r#"[{"nodeId": "1:1", "fileName": "bg.png", "assetKind": "fill"}]"#).unwrap();
        let err = load_requests(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse requests file"));
    }

    #[test]
    fn describe_each_outcome() {
        let req = ImageRequest::fill("1:1", "bg.png", "ref-1");
        assert_eq!(
            describe(&req, &AssetOutcome::Saved(PathBuf::from("out/bg.png"))),
            "saved       out/bg.png"
        );
        assert_eq!(describe(&req, &AssetOutcome::Unresolved), "unresolved  bg.png (1:1)");
        assert_eq!(
            describe(&req, &AssetOutcome::Failed("HTTP 404".into())),
            "failed      bg.png (1:1): HTTP 404"
        );
    }
}
