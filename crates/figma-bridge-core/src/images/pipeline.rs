//! Mixed fill + render batches.

use std::path::Path;

use super::{AssetOutcome, Downloader, ExportResolver, FillRequest, FillResolver, ImageRequest, RenderRequest};
use crate::remote::{RemoteClient, RemoteError};

/// Runs the fill and export resolvers side by side for one file.
pub struct ImagePipeline {
    fills: FillResolver,
    renders: ExportResolver,
}

fn split(requests: &[ImageRequest]) -> (Vec<FillRequest>, Vec<RenderRequest>) {
    let mut fills = Vec::new();
    let mut renders = Vec::new();
    for req in requests {
        match req {
            ImageRequest::Fill(f) => fills.push(f.clone()),
            ImageRequest::Render(r) => renders.push(r.clone()),
        }
    }
    (fills, renders)
}

impl ImagePipeline {
    pub fn new(client: RemoteClient, downloader: Downloader) -> Self {
        Self {
            fills: FillResolver::new(client.clone(), downloader.clone()),
            renders: ExportResolver::new(client, downloader),
        }
    }

    pub fn fills(&self) -> &FillResolver {
        &self.fills
    }

    pub fn renders(&self) -> &ExportResolver {
        &self.renders
    }

    /// Fill outcomes (one per fill request) followed by render outcomes
    /// (unmatched renders dropped). Empty string = not saved.
    pub async fn download_images(
        &self,
        file_id: &str,
        requests: &[ImageRequest],
        target_dir: &Path,
    ) -> Result<Vec<String>, RemoteError> {
        let (fills, renders) = split(requests);
        let (mut fill_paths, render_paths) = tokio::try_join!(
            self.fills.resolve_fills(file_id, &fills, target_dir),
            self.renders.resolve_renders(file_id, &renders, target_dir),
        )?;
        fill_paths.extend(render_paths);
        Ok(fill_paths)
    }

    /// One outcome per request, in the order the requests were given.
    pub async fn download_images_detailed(
        &self,
        file_id: &str,
        requests: &[ImageRequest],
        target_dir: &Path,
    ) -> Result<Vec<AssetOutcome>, RemoteError> {
        let (fills, renders) = split(requests);
        let (fill_outcomes, render_outcomes) = tokio::try_join!(
            self.fills.resolve_fills_detailed(file_id, &fills, target_dir),
            self.renders.resolve_renders_detailed(file_id, &renders, target_dir),
        )?;

        let mut fill_outcomes = fill_outcomes.into_iter();
        let mut render_outcomes = render_outcomes.into_iter();
        Ok(requests
            .iter()
            .map(|req| {
                let next = match req {
                    ImageRequest::Fill(_) => fill_outcomes.next(),
                    ImageRequest::Render(_) => render_outcomes.next(),
                };
                next.unwrap_or(AssetOutcome::Unresolved)
            })
            .collect())
    }
}
