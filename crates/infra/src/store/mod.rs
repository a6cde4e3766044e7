mod firestore;
mod inmemory;

pub use firestore::FirestoreRestStore;
pub use inmemory::InMemoryDocumentStore;

use hearth_domain::ID;
use serde_json::Value;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document {collection}/{id} was not found")]
    NotFound { collection: String, id: String },
    #[error("Document store request failed: {0}")]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A field path as an explicit segment list. Keys can contain dots (mirror
/// event ids embed `@google.com`), so paths are never split or joined on
/// '.' internally; the dotted form is for display and for backends with a
/// quoting syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn top(field: impl Into<String>) -> Self {
        Self(vec![field.into()])
    }

    pub fn nested(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self(vec![parent.into(), child.into()])
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A single field mutation inside a document. `Delete` is the sentinel that
/// removes a field, which a partial update cannot express by omission.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWrite {
    Set(Value),
    Delete,
}

/// Key/value document access in the shape the cloud store exposes to
/// clients. Single-document operations are atomic; sequences of them are
/// not, which is exactly the gap the engine's protocols are built around.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Writes the full document, creating it when absent. With `merge`,
    /// maps are merged field by field into the existing document instead of
    /// replacing it.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: Value,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Partial update of the given field paths. Fails with `NotFound` when
    /// the document does not exist; edits to other fields of the same
    /// document are never clobbered.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Vec<(FieldPath, FieldWrite)>,
    ) -> Result<(), StoreError>;

    /// Creates a document with a store-assigned id.
    async fn create(&self, collection: &str, document: Value) -> Result<ID, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Equality query over a single field. Returns zero or more matches as
    /// `(document id, document)` pairs.
    async fn query_equals(
        &self,
        collection: &str,
        field: &FieldPath,
        value: &Value,
    ) -> Result<Vec<(ID, Value)>, StoreError>;

    async fn batch_delete(&self, collection: &str, ids: &[ID]) -> Result<(), StoreError>;
}
