//! Fill resolver: bitmap fills referenced by `imageRef`, resolved through the
//! file's image-fill map.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{AssetOutcome, Downloader, FillRequest, ImageRequest, ResolvedAsset};
use crate::remote::{encode_component, RemoteClient, RemoteError};

/// `GET /files/{key}/images` payload. Every level may be absent.
#[derive(Debug, Default, Deserialize)]
struct ImageFillsResponse {
    #[serde(default)]
    meta: Option<ImageFillsMeta>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageFillsMeta {
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

pub struct FillResolver {
    client: RemoteClient,
    downloader: Downloader,
}

impl FillResolver {
    pub fn new(client: RemoteClient, downloader: Downloader) -> Self {
        Self { client, downloader }
    }

    /// fill reference -> URL for every bitmap fill in the file. One remote call.
    pub async fn fetch_fill_urls(&self, file_id: &str) -> Result<HashMap<String, String>, RemoteError> {
        let endpoint = format!("/files/{}/images", encode_component(file_id));
        let response: ImageFillsResponse = self.client.request(&endpoint).await?;
        Ok(response
            .meta
            .map(|m| m.images)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(fill_ref, url)| url.map(|u| (fill_ref, u)))
            .collect())
    }

    /// Resolve and download fills. One outcome per request, in request order;
    /// unmatched references and failed downloads come back as `""`.
    pub async fn resolve_fills(
        &self,
        file_id: &str,
        requests: &[FillRequest],
        target_dir: &Path,
    ) -> Result<Vec<String>, RemoteError> {
        Ok(self
            .resolve_fills_detailed(file_id, requests, target_dir)
            .await?
            .into_iter()
            .map(AssetOutcome::into_path_string)
            .collect())
    }

    /// Like `resolve_fills` but keeps unresolved and failed apart.
    pub async fn resolve_fills_detailed(
        &self,
        file_id: &str,
        requests: &[FillRequest],
        target_dir: &Path,
    ) -> Result<Vec<AssetOutcome>, RemoteError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let urls = self.fetch_fill_urls(file_id).await?;
        let resolved: Vec<ResolvedAsset> = requests
            .iter()
            .map(|req| ResolvedAsset {
                remote_url: urls.get(&req.fill_ref).cloned(),
                request: ImageRequest::Fill(req.clone()),
            })
            .collect();

        let unmatched = resolved.iter().filter(|a| a.remote_url.is_none()).count();
        if unmatched > 0 {
            tracing::info!(
                file_id,
                "{} of {} fill reference(s) not found in image map",
                unmatched,
                resolved.len()
            );
        }

        Ok(self.downloader.download_all(target_dir, resolved).await)
    }
}
