//! Simplification step contract plus a basic implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::images::ImageRequest;

/// A node whose fills include a bitmap image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNodeRef {
    pub node_id: String,
    pub node_name: String,
    pub fill_ref: String,
}

impl ImageNodeRef {
    /// Fill request that saves this image as `file_name`.
    pub fn to_request(&self, file_name: &str) -> ImageRequest {
        ImageRequest::fill(&self.node_id, file_name, &self.fill_ref)
    }
}

/// Compact design representation plus the image references found in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub nodes: Vec<Value>,
    pub image_nodes: Vec<ImageNodeRef>,
}

/// Turns a raw `/files/{key}` or `/files/{key}/nodes` payload into a `SimplifiedDesign`.
pub trait Simplifier: Send + Sync {
    fn simplify(&self, raw: &Value) -> Result<SimplifiedDesign>;
}

/// Keeps node fields as they are, drops invisible nodes, and collects image fills.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSimplifier;

impl Simplifier for BasicSimplifier {
    fn simplify(&self, raw: &Value) -> Result<SimplifiedDesign> {
        let obj = raw.as_object().context("design payload is not a JSON object")?;

        let documents: Vec<&Value> = if let Some(doc) = obj.get("document") {
            vec![doc]
        } else if let Some(nodes) = obj.get("nodes").and_then(Value::as_object) {
            // `null` entries are ids the file does not contain.
            nodes
                .values()
                .filter_map(|entry| entry.get("document"))
                .collect()
        } else {
            anyhow::bail!("design payload has neither `document` nor `nodes`");
        };

        let mut image_nodes = Vec::new();
        let nodes = documents
            .into_iter()
            .filter_map(|doc| prune(doc, &mut image_nodes))
            .collect();

        Ok(SimplifiedDesign {
            name: string_field(obj, "name").unwrap_or_default(),
            last_modified: string_field(obj, "lastModified"),
            thumbnail_url: string_field(obj, "thumbnailUrl"),
            nodes,
            image_nodes,
        })
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn is_visible(value: &Value) -> bool {
    value.get("visible").and_then(Value::as_bool).unwrap_or(true)
}

/// Copy of `node` without invisible descendants; records image fills on the way.
fn prune(node: &Value, image_nodes: &mut Vec<ImageNodeRef>) -> Option<Value> {
    if !is_visible(node) {
        return None;
    }
    let mut obj = node.as_object()?.clone();

    if let Some(fills) = obj.get("fills").and_then(Value::as_array) {
        let node_id = string_field(&obj, "id").unwrap_or_default();
        let node_name = string_field(&obj, "name").unwrap_or_default();
        for fill in fills.iter().filter(|f| is_visible(f)) {
            if fill.get("type").and_then(Value::as_str) != Some("IMAGE") {
                continue;
            }
            if let Some(fill_ref) = fill.get("imageRef").and_then(Value::as_str) {
                image_nodes.push(ImageNodeRef {
                    node_id: node_id.clone(),
                    node_name: node_name.clone(),
                    fill_ref: fill_ref.to_string(),
                });
            }
        }
    }

    if let Some(children) = obj.remove("children") {
        let kept: Vec<Value> = children
            .as_array()
            .map(|c| c.iter().filter_map(|child| prune(child, image_nodes)).collect())
            .unwrap_or_default();
        obj.insert("children".to_string(), Value::Array(kept));
    }

    Some(Value::Object(obj))
}
