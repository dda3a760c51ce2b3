//! Export resolver: on-demand renders, batched into one API call per format channel.
//!
//! The partition and merge steps are pure functions; only `fetch_render_urls`
//! touches the network, and the two channel calls run concurrently.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::{AssetOutcome, Downloader, ImageFormat, ImageRequest, RenderRequest, ResolvedAsset};
use crate::remote::{encode_component, RemoteClient, RemoteError};

/// Scale factor for raster exports.
pub const PNG_SCALE: u32 = 2;

/// Merged render URLs keyed by channel and node id.
pub type RenderUrlMap = HashMap<(ImageFormat, String), String>;

/// `GET /images/{key}` payload. A node that failed to render maps to `null`.
#[derive(Debug, Default, Deserialize)]
struct RenderImagesResponse {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

/// Node ids of one channel, deduplicated, in first-seen order.
pub fn node_ids_for(requests: &[RenderRequest], format: ImageFormat) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    requests
        .iter()
        .filter(|r| r.format == format && seen.insert(r.node_id.as_str()))
        .map(|r| r.node_id.clone())
        .collect()
}

/// Endpoint for one channel's batched export call. Ids are escaped one by one;
/// the separating commas stay literal.
pub fn render_endpoint(file_id: &str, format: ImageFormat, node_ids: &[String]) -> String {
    let file_id = encode_component(file_id);
    let ids = node_ids
        .iter()
        .map(|id| encode_component(id))
        .collect::<Vec<_>>()
        .join(",");
    match format {
        ImageFormat::Png => format!("/images/{}?ids={}&scale={}&format=png", file_id, ids, PNG_SCALE),
        ImageFormat::Svg => format!("/images/{}?ids={}&format=svg", file_id, ids),
    }
}

/// Combine per-channel id -> URL maps. Keys carry the channel, so a node
/// exported in both formats keeps both URLs.
pub fn merge_url_maps(png: HashMap<String, String>, svg: HashMap<String, String>) -> RenderUrlMap {
    png.into_iter()
        .map(|(id, url)| ((ImageFormat::Png, id), url))
        .chain(svg.into_iter().map(|(id, url)| ((ImageFormat::Svg, id), url)))
        .collect()
}

/// Pair each request with its URL from the merged map.
pub fn resolve_against(requests: &[RenderRequest], urls: &RenderUrlMap) -> Vec<ResolvedAsset> {
    requests
        .iter()
        .map(|req| ResolvedAsset {
            remote_url: urls.get(&(req.format, req.node_id.clone())).cloned(),
            request: ImageRequest::Render(req.clone()),
        })
        .collect()
}

pub struct ExportResolver {
    client: RemoteClient,
    downloader: Downloader,
}

impl ExportResolver {
    pub fn new(client: RemoteClient, downloader: Downloader) -> Self {
        Self { client, downloader }
    }

    /// node id -> URL for one channel. Empty `node_ids` makes no call.
    pub async fn fetch_render_urls(
        &self,
        file_id: &str,
        format: ImageFormat,
        node_ids: &[String],
    ) -> Result<HashMap<String, String>, RemoteError> {
        if node_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let endpoint = render_endpoint(file_id, format, node_ids);
        let response: RenderImagesResponse = self.client.request(&endpoint).await?;
        if let Some(err) = response.err.as_deref().filter(|e| !e.is_empty()) {
            tracing::warn!(file_id, %format, "render call reported: {}", err);
        }
        Ok(response
            .images
            .into_iter()
            .filter_map(|(id, url)| url.map(|u| (id, u)))
            .collect())
    }

    /// Fetch both channels' URL maps concurrently and merge them.
    /// If either call fails the whole lookup fails and the other result is discarded.
    pub async fn fetch_all_render_urls(
        &self,
        file_id: &str,
        requests: &[RenderRequest],
    ) -> Result<RenderUrlMap, RemoteError> {
        let png_ids = node_ids_for(requests, ImageFormat::Png);
        let svg_ids = node_ids_for(requests, ImageFormat::Svg);
        let (png, svg) = tokio::try_join!(
            self.fetch_render_urls(file_id, ImageFormat::Png, &png_ids),
            self.fetch_render_urls(file_id, ImageFormat::Svg, &svg_ids),
        )?;
        Ok(merge_url_maps(png, svg))
    }

    /// Resolve and download renders. Requests without a URL are dropped, so the
    /// result follows request order with those entries removed.
    pub async fn resolve_renders(
        &self,
        file_id: &str,
        requests: &[RenderRequest],
        target_dir: &Path,
    ) -> Result<Vec<String>, RemoteError> {
        Ok(self
            .resolve_renders_detailed(file_id, requests, target_dir)
            .await?
            .into_iter()
            .filter(|outcome| *outcome != AssetOutcome::Unresolved)
            .map(AssetOutcome::into_path_string)
            .collect())
    }

    /// One outcome per request, in request order; unmatched requests are `Unresolved`.
    pub async fn resolve_renders_detailed(
        &self,
        file_id: &str,
        requests: &[RenderRequest],
        target_dir: &Path,
    ) -> Result<Vec<AssetOutcome>, RemoteError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let urls = self.fetch_all_render_urls(file_id, requests).await?;
        let resolved = resolve_against(requests, &urls);

        let unmatched = resolved.iter().filter(|a| a.remote_url.is_none()).count();
        if unmatched > 0 {
            tracing::info!(
                file_id,
                "{} of {} render(s) came back without a URL",
                unmatched,
                resolved.len()
            );
        }

        Ok(self.downloader.download_all(target_dir, resolved).await)
    }
}
