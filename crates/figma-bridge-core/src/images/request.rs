//! Image requests and their resolution results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Export channel for a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster channel; rendered at a fixed scale of 2.
    Png,
    /// Vector channel.
    Svg,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    /// Format implied by a file name's extension (`.png` / `.svg`, case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmap fill to fetch through the file's image-fill map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    pub node_id: String,
    pub file_name: String,
    pub fill_ref: String,
}

/// Node to have rendered on demand in `format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub node_id: String,
    pub file_name: String,
    pub format: ImageFormat,
}

/// One requested image. A fill always carries a fill reference and never a
/// format; a render always carries a format and never a fill reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImageRequest", into = "RawImageRequest")]
pub enum ImageRequest {
    Fill(FillRequest),
    Render(RenderRequest),
}

impl ImageRequest {
    pub fn fill(node_id: &str, file_name: &str, fill_ref: &str) -> Self {
        ImageRequest::Fill(FillRequest {
            node_id: node_id.to_string(),
            file_name: file_name.to_string(),
            fill_ref: fill_ref.to_string(),
        })
    }

    pub fn render(node_id: &str, file_name: &str, format: ImageFormat) -> Self {
        ImageRequest::Render(RenderRequest {
            node_id: node_id.to_string(),
            file_name: file_name.to_string(),
            format,
        })
    }

    pub fn node_id(&self) -> &str {
        match self {
            ImageRequest::Fill(r) => &r.node_id,
            ImageRequest::Render(r) => &r.node_id,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            ImageRequest::Fill(r) => &r.file_name,
            ImageRequest::Render(r) => &r.file_name,
        }
    }
}

impl From<FillRequest> for ImageRequest {
    fn from(r: FillRequest) -> Self {
        ImageRequest::Fill(r)
    }
}

impl From<RenderRequest> for ImageRequest {
    fn from(r: RenderRequest) -> Self {
        ImageRequest::Render(r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Render,
    Fill,
}

/// Wire shape: `{ nodeId, fileName, assetKind, format?, fillRef? }`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageRequest {
    node_id: String,
    file_name: String,
    asset_kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<ImageFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill_ref: Option<String>,
}

/// Rejected image request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("fill request for node {node_id} needs a fillRef")]
    MissingFillRef { node_id: String },
    #[error("fill request for node {node_id} must not set a format")]
    FormatOnFill { node_id: String },
    #[error("render request for node {node_id} needs a format (png or svg)")]
    MissingFormat { node_id: String },
    #[error("render request for node {node_id} must not set a fillRef")]
    FillRefOnRender { node_id: String },
    #[error("image request needs a non-empty {field}")]
    Empty { field: &'static str },
}

impl TryFrom<RawImageRequest> for ImageRequest {
    type Error = RequestError;

    fn try_from(raw: RawImageRequest) -> Result<Self, Self::Error> {
        if raw.node_id.trim().is_empty() {
            return Err(RequestError::Empty { field: "nodeId" });
        }
        if raw.file_name.trim().is_empty() {
            return Err(RequestError::Empty { field: "fileName" });
        }
        let node_id = raw.node_id;
        match raw.asset_kind {
            AssetKind::Fill => {
                if raw.format.is_some() {
                    return Err(RequestError::FormatOnFill { node_id });
                }
                match raw.fill_ref {
                    Some(fill_ref) if !fill_ref.trim().is_empty() => {
                        Ok(ImageRequest::Fill(FillRequest {
                            node_id,
                            file_name: raw.file_name,
                            fill_ref,
                        }))
                    }
                    _ => Err(RequestError::MissingFillRef { node_id }),
                }
            }
            AssetKind::Render => {
                if raw.fill_ref.is_some() {
                    return Err(RequestError::FillRefOnRender { node_id });
                }
                match raw.format {
                    Some(format) => Ok(ImageRequest::Render(RenderRequest {
                        node_id,
                        file_name: raw.file_name,
                        format,
                    })),
                    None => Err(RequestError::MissingFormat { node_id }),
                }
            }
        }
    }
}

impl From<ImageRequest> for RawImageRequest {
    fn from(req: ImageRequest) -> Self {
        match req {
            ImageRequest::Fill(r) => RawImageRequest {
                node_id: r.node_id,
                file_name: r.file_name,
                asset_kind: AssetKind::Fill,
                format: None,
                fill_ref: Some(r.fill_ref),
            },
            ImageRequest::Render(r) => RawImageRequest {
                node_id: r.node_id,
                file_name: r.file_name,
                asset_kind: AssetKind::Render,
                format: Some(r.format),
                fill_ref: None,
            },
        }
    }
}

/// A request paired with the URL the remote map gave for it (`None` = no entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub request: ImageRequest,
    pub remote_url: Option<String>,
}

/// Per-request result that keeps "never resolved" apart from "download failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Saved(PathBuf),
    /// The remote map had no URL for this request.
    Unresolved,
    /// A URL was found but fetching or writing it failed.
    Failed(String),
}

impl AssetOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, AssetOutcome::Saved(_))
    }

    /// Collapsed form: the local path, or an empty string for anything not saved.
    pub fn into_path_string(self) -> String {
        match self {
            AssetOutcome::Saved(path) => path.to_string_lossy().into_owned(),
            AssetOutcome::Unresolved | AssetOutcome::Failed(_) => String::new(),
        }
    }
}
