//! Tree retriever: fetch a whole file or one node subtree and simplify it.
//!
//! Remote and simplification errors are logged here and returned unchanged
//! (a `RemoteError` can be recovered with `downcast_ref`).

mod dump;
mod simplify;

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

pub use dump::DiagnosticDump;
pub use simplify::{BasicSimplifier, ImageNodeRef, SimplifiedDesign, Simplifier};

use crate::remote::{encode_component, RemoteClient};

pub const RAW_DUMP_FILE: &str = "figma-raw.json";
pub const SIMPLIFIED_DUMP_FILE: &str = "figma-simplified.json";

pub fn file_endpoint(file_id: &str, depth: Option<u32>) -> String {
    let file_id = encode_component(file_id);
    match depth {
        Some(d) => format!("/files/{}?depth={}", file_id, d),
        None => format!("/files/{}", file_id),
    }
}

pub fn node_endpoint(file_id: &str, node_id: &str, depth: Option<u32>) -> String {
    let (file_id, node_id) = (encode_component(file_id), encode_component(node_id));
    match depth {
        Some(d) => format!("/files/{}/nodes?ids={}&depth={}", file_id, node_id, d),
        None => format!("/files/{}/nodes?ids={}", file_id, node_id),
    }
}

pub struct TreeRetriever {
    client: RemoteClient,
    simplifier: Arc<dyn Simplifier>,
    dump: DiagnosticDump,
}

impl TreeRetriever {
    pub fn new(client: RemoteClient, simplifier: Arc<dyn Simplifier>, dump: DiagnosticDump) -> Self {
        Self {
            client,
            simplifier,
            dump,
        }
    }

    /// Whole file, optionally bounded to `depth` levels.
    pub async fn get_file(&self, file_id: &str, depth: Option<u32>) -> Result<SimplifiedDesign> {
        tracing::info!(file_id, ?depth, "retrieving file");
        self.retrieve(&file_endpoint(file_id, depth)).await
    }

    /// Subtree rooted at `node_id`, optionally bounded to `depth` levels.
    pub async fn get_node(&self, file_id: &str, node_id: &str, depth: Option<u32>) -> Result<SimplifiedDesign> {
        tracing::info!(file_id, node_id, ?depth, "retrieving node");
        self.retrieve(&node_endpoint(file_id, node_id, depth)).await
    }

    async fn retrieve(&self, endpoint: &str) -> Result<SimplifiedDesign> {
        let raw: Value = match self.client.request(endpoint).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("error fetching {}: {}", endpoint, e);
                return Err(e.into());
            }
        };

        let design = match self.simplifier.simplify(&raw) {
            Ok(design) => design,
            Err(e) => {
                tracing::error!("error simplifying {}: {:#}", endpoint, e);
                return Err(e);
            }
        };

        tracing::debug!(
            nodes = design.nodes.len(),
            images = design.image_nodes.len(),
            "simplified {}",
            endpoint
        );

        self.dump.write(RAW_DUMP_FILE, &raw).await;
        self.dump.write(SIMPLIFIED_DUMP_FILE, &design).await;

        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteError;
    use crate::testing::FakeApi;
    use serde_json::json;

    fn retriever(api: &FakeApi, dump: DiagnosticDump) -> TreeRetriever {
        TreeRetriever::new(api.client(), Arc::new(BasicSimplifier), dump)
    }

    #[test]
    fn endpoints_with_and_without_depth() {
        assert_eq!(file_endpoint("ABC", None), "/files/ABC");
        assert_eq!(file_endpoint("ABC", Some(2)), "/files/ABC?depth=2");
        assert_eq!(node_endpoint("ABC", "1:2", None), "/files/ABC/nodes?ids=1%3A2");
        assert_eq!(node_endpoint("ABC", "1:2", Some(1)), "/files/ABC/nodes?ids=1%3A2&depth=1");
    }

    #[test]
    fn endpoints_escape_caller_ids() {
        assert_eq!(file_endpoint("AB?depth=9", None), "/files/AB%3Fdepth%3D9");
        assert_eq!(
            node_endpoint("A#B", "1:2&ids=3:4", None),
            "/files/A%23B/nodes?ids=1%3A2%26ids%3D3%3A4"
        );
    }

    #[tokio::test]
    async fn get_file_simplifies_and_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::new().respond(
            "/files/ABC?depth=1",
            json!({ "name": "Landing", "document": { "id": "0:0", "type": "DOCUMENT", "children": [] } }),
        );
        let r = retriever(&api, DiagnosticDump::new(Some(dir.path().to_path_buf())));

        let design = r.get_file("ABC", Some(1)).await.unwrap();

        assert_eq!(design.name, "Landing");
        assert_eq!(api.calls(), vec!["/files/ABC?depth=1"]);
        assert!(dir.path().join(RAW_DUMP_FILE).is_file());
        assert!(dir.path().join(SIMPLIFIED_DUMP_FILE).is_file());
    }

    #[tokio::test]
    async fn get_node_uses_nodes_endpoint() {
        let api = FakeApi::new().respond(
            "/files/ABC/nodes?ids=1%3A2",
            json!({ "name": "Landing", "nodes": { "1:2": { "document": { "id": "1:2", "type": "FRAME" } } } }),
        );
        let design = retriever(&api, DiagnosticDump::disabled())
            .get_node("ABC", "1:2", None)
            .await
            .unwrap();
        assert_eq!(design.nodes[0]["id"], "1:2");
    }

    #[tokio::test]
    async fn remote_error_propagates_unchanged() {
        let api = FakeApi::new().fail("/files/ABC", RemoteError::status("/files/ABC", 403, "Invalid token"));
        let err = retriever(&api, DiagnosticDump::disabled())
            .get_file("ABC", None)
            .await
            .unwrap_err();
        let remote = err.downcast_ref::<RemoteError>().expect("remote error");
        assert_eq!(remote.status_code(), Some(403));
    }

    #[tokio::test]
    async fn dump_failure_does_not_fail_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, b"file, not dir").unwrap();
        let api = FakeApi::new().respond(
            "/files/ABC",
            json!({ "name": "Landing", "document": { "id": "0:0", "type": "DOCUMENT" } }),
        );
        let design = retriever(&api, DiagnosticDump::new(Some(blocker)))
            .get_file("ABC", None)
            .await
            .unwrap();
        assert_eq!(design.name, "Landing");
    }

    #[tokio::test]
    async fn simplifier_error_propagates() {
        let api = FakeApi::new().respond("/files/ABC", json!({ "unexpected": true }));
        let err = retriever(&api, DiagnosticDump::disabled())
            .get_file("ABC", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("neither"));
    }
}
