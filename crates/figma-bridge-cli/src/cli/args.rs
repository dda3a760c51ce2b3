//! Value parsers for image request flags.
//!
//! Node ids contain `:` (e.g. `1:2`), so fields are separated with `=`.

use figma_bridge_core::images::{ImageFormat, ImageRequest};

/// `NODE_ID=FILE_NAME`; the format comes from the extension (`.png` or `.svg`).
pub fn parse_render_arg(value: &str) -> Result<ImageRequest, String> {
    let (node_id, file_name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NODE_ID=FILE_NAME, got {:?}", value))?;
    let (node_id, file_name) = (node_id.trim(), file_name.trim());
    if node_id.is_empty() || file_name.is_empty() {
        return Err(format!("expected NODE_ID=FILE_NAME, got {:?}", value));
    }
    let format = ImageFormat::from_file_name(file_name)
        .ok_or_else(|| format!("{:?} must end in .png or .svg", file_name))?;
    Ok(ImageRequest::render(node_id, file_name, format))
}

/// `NODE_ID=FILE_NAME=FILL_REF`.
pub fn parse_fill_arg(value: &str) -> Result<ImageRequest, String> {
    let parts: Vec<&str> = value.splitn(3, '=').map(str::trim).collect();
    match parts.as_slice() {
        [node_id, file_name, fill_ref]
            if !node_id.is_empty() && !file_name.is_empty() && !fill_ref.is_empty() =>
        {
            Ok(ImageRequest::fill(node_id, file_name, fill_ref))
        }
        _ => Err(format!("expected NODE_ID=FILE_NAME=FILL_REF, got {:?}", value)),
    }
}
