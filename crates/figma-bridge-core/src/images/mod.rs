//! Remote asset resolution: image requests in, local files out.
//!
//! Fills and renders come from two different remote maps. Each resolver makes
//! one map call per batch (per format channel for renders), then hands the
//! resolved URLs to the `Downloader`, which fetches them concurrently.

mod download;
mod fills;
mod pipeline;
mod renders;
mod request;

pub use download::{AssetFetcher, CurlFetcher, Downloader};
pub use fills::FillResolver;
pub use pipeline::ImagePipeline;
pub use renders::{
    merge_url_maps, node_ids_for, render_endpoint, resolve_against, ExportResolver, RenderUrlMap,
    PNG_SCALE,
};
pub use request::{
    AssetKind, AssetOutcome, FillRequest, ImageFormat, ImageRequest, RawImageRequest,
    RenderRequest, RequestError, ResolvedAsset,
};
