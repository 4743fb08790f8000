//! Document store.
//!
//! The MCP core only reads documents. Writes come from the admin upload flow
//! (outside this crate) and from the loaders below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Error, Result};

/// A stored company document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Body text
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_uploader")]
    pub uploaded_by: String,
    /// ISO 8601 upload time
    #[serde(default)]
    pub uploaded_at: String,
}

fn default_uploader() -> String {
    "admin".to_string()
}

/// Read access to the document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents, in insertion order.
    async fn all(&self) -> Vec<Document>;

    /// Look a document up by id.
    async fn get(&self, id: &str) -> Result<Document>;

    /// Insert or replace a document. A replaced document keeps its position.
    async fn insert(&self, document: Document) -> Result<()>;

    /// Number of documents.
    async fn len(&self) -> usize {
        self.all().await.len()
    }
}

/// Document store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given documents.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let mut ordered: Vec<Document> = Vec::with_capacity(documents.len());
        for doc in documents {
            match ordered.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc,
                None => ordered.push(doc),
            }
        }
        Self {
            documents: RwLock::new(ordered),
        }
    }

    /// Create a store seeded with the sample company corpus.
    pub fn with_sample_documents() -> Self {
        Self::with_documents(sample_documents())
    }

    /// Load a document list from a JSON or YAML file (chosen by extension).
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let documents: Vec<Document> = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") | None => serde_json::from_str(&content)?,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Unsupported document file extension: {}",
                    other
                )))
            }
        };
        info!("Loaded {} documents from {}", documents.len(), path.display());
        Ok(Self::with_documents(documents))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn all(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    async fn get(&self, id: &str) -> Result<Document> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    async fn insert(&self, document: Document) -> Result<()> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        Ok(())
    }

    async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

/// The sample corpus the hub ships with.
pub fn sample_documents() -> Vec<Document> {
    let doc = |id: &str, title: &str, category: &str, text: &str, tags: &[&str], at: &str| Document {
        id: id.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        uploaded_by: "admin".to_string(),
        uploaded_at: at.to_string(),
    };

    vec![
        doc(
            "doc_001",
            "Employee Handbook",
            "handbook",
            "Welcome to MNC Corporation. This handbook outlines company policies, procedures, and guidelines for all employees. Our company values include integrity, innovation, and collaboration. We provide comprehensive benefits including health insurance, retirement plans, and professional development opportunities.",
            &["hr", "policy", "benefits", "guidelines"],
            "2024-01-15T10:00:00Z",
        ),
        doc(
            "doc_002",
            "IT Security Policy",
            "policy",
            "All employees must follow strict security protocols. Use strong passwords, enable two-factor authentication, and never share login credentials. Report any suspicious activities immediately. All company data must be encrypted and backed up regularly.",
            &["security", "policy", "it", "compliance"],
            "2024-01-20T14:30:00Z",
        ),
        doc(
            "doc_003",
            "Remote Work Guidelines",
            "guideline",
            "Remote work is supported with proper equipment and guidelines. Employees must maintain regular communication, attend virtual meetings, and ensure secure internet connections. Work hours should align with team collaboration needs.",
            &["remote", "work", "guidelines", "policy"],
            "2024-02-01T09:15:00Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_sample_documents() {
        let store = InMemoryDocumentStore::with_sample_documents();
        let ids: Vec<String> = store.all().await.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["doc_001", "doc_002", "doc_003"]);

        let doc = store.get("doc_002").await.unwrap();
        assert_eq!(doc.title, "IT Security Policy");
        assert!(doc.tags.contains(&"security".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let store = InMemoryDocumentStore::new();
        let err = store.get("doc_404").await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(ref id) if id == "doc_404"));
    }

    #[tokio::test]
    async fn test_insert_keeps_order_and_replaces() {
        let store = InMemoryDocumentStore::with_sample_documents();
        let mut updated = store.get("doc_001").await.unwrap();
        updated.title = "Employee Handbook v2".to_string();
        store.insert(updated).await.unwrap();

        store
            .insert(Document {
                id: "doc_004".to_string(),
                title: "Travel Policy".to_string(),
                text: "Book travel through the portal.".to_string(),
                category: "policy".to_string(),
                tags: vec![],
                uploaded_by: "admin".to_string(),
                uploaded_at: String::new(),
            })
            .await
            .unwrap();

        let all = store.all().await;
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].title, "Employee Handbook v2");
        assert_eq!(all[3].id, "doc_004");
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id":"a","title":"A","content":"alpha body","category":"misc","tags":["x"]}}]"#
        )
        .unwrap();

        let store = InMemoryDocumentStore::load(file.path()).await.unwrap();
        let doc = store.get("a").await.unwrap();
        assert_eq!(doc.text, "alpha body");
        assert_eq!(doc.uploaded_by, "admin");
    }

    #[tokio::test]
    async fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- id: y1\n  title: Yaml Doc\n  text: from yaml\n  tags: [a, b]").unwrap();

        let store = InMemoryDocumentStore::load(file.path()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("y1").await.unwrap().tags, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let err = InMemoryDocumentStore::load(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
