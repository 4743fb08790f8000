//! MCP Resources Support
//!
//! Expose stored documents as `document://<id>` resources that AI clients can
//! browse and read.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::service::{Document, DocumentStore};

/// URI scheme for document resources.
pub const DOCUMENT_SCHEME: &str = "document://";

const TEXT_PLAIN: &str = "text/plain";

/// Extract the document id from a `document://` URI.
fn decode_document_uri(uri: &str) -> Option<String> {
    uri.strip_prefix(DOCUMENT_SCHEME)
        .map(|id| percent_decode_str(id).decode_utf8_lossy().into_owned())
        .filter(|id| !id.is_empty())
}

/// A resource exposed by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl From<&Document> for Resource {
    fn from(doc: &Document) -> Self {
        let name = if doc.title.is_empty() {
            format!("Document {}", doc.id)
        } else {
            doc.title.clone()
        };
        let category = if doc.category.is_empty() {
            "General"
        } else {
            doc.category.as_str()
        };

        Self {
            uri: format!("{}{}", DOCUMENT_SCHEME, doc.id),
            name,
            description: format!("Company document: {}", category),
            mime_type: TEXT_PLAIN.to_string(),
        }
    }
}

/// Resource contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Result of resources/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,
}

/// Result of resources/read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

/// Resource registry backed by the document store.
pub struct ResourceRegistry {
    documents: Arc<dyn DocumentStore>,
}

impl ResourceRegistry {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Every document currently in the store, in store order.
    pub async fn list(&self) -> ListResourcesResult {
        let resources = self
            .documents
            .all()
            .await
            .iter()
            .map(Resource::from)
            .collect();
        ListResourcesResult { resources }
    }

    /// Read one document's body text.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let not_found = || Error::ResourceNotFound(uri.to_string());

        let id = decode_document_uri(uri).ok_or_else(not_found)?;
        let doc = self.documents.get(&id).await.map_err(|_| not_found())?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: TEXT_PLAIN.to_string(),
                text: doc.text,
            }],
        })
    }
}
