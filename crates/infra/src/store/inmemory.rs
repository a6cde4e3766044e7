use super::{DocumentStore, FieldPath, FieldWrite, StoreError};
use anyhow::anyhow;
use hearth_domain::ID;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory `DocumentStore` used by the engine tests. Write failures can
/// be injected after a chosen number of successful writes to exercise the
/// partial-failure protocols.
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, HashMap<String, Value>>>,
    remaining_writes: Mutex<Option<u32>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            remaining_writes: Mutex::new(None),
        }
    }

    /// Lets `allowed` more writes succeed, then fails every following write
    /// until `clear_write_failures` is called.
    pub fn fail_writes_after(&self, allowed: u32) {
        *self.remaining_writes.lock().unwrap() = Some(allowed);
    }

    pub fn clear_write_failures(&self) {
        *self.remaining_writes.lock().unwrap() = None;
    }

    fn check_write(&self) -> Result<(), StoreError> {
        let mut remaining = self.remaining_writes.lock().unwrap();
        match remaining.as_mut() {
            Some(0) => Err(StoreError::Other(anyhow!("Injected write failure"))),
            Some(count) => {
                *count -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .get(collection)
            .and_then(|collection| collection.get(id))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut documents = self.documents.lock().unwrap();
        let collection = documents.entry(collection.to_string()).or_default();
        if merge {
            if let Some(existing) = collection.get_mut(id) {
                deep_merge(existing, document);
                return Ok(());
            }
        }
        collection.insert(id.to_string(), document);
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Vec<(FieldPath, FieldWrite)>,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .get_mut(collection)
            .and_then(|collection| collection.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (path, write) in fields {
            match write {
                FieldWrite::Set(value) => path_set(doc, path.segments(), value),
                FieldWrite::Delete => path_delete(doc, path.segments()),
            }
        }
        Ok(())
    }

    async fn create(&self, collection: &str, document: Value) -> Result<ID, StoreError> {
        self.check_write()?;
        let id = ID::new();
        let mut documents = self.documents.lock().unwrap();
        documents
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_write()?;
        let mut documents = self.documents.lock().unwrap();
        if let Some(collection) = documents.get_mut(collection) {
            collection.remove(id);
        }
        Ok(())
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &FieldPath,
        value: &Value,
    ) -> Result<Vec<(ID, Value)>, StoreError> {
        let documents = self.documents.lock().unwrap();
        let mut matches = Vec::new();
        if let Some(collection) = documents.get(collection) {
            for (id, doc) in collection.iter() {
                if path_get(doc, field.segments()) == Some(value) {
                    if let Ok(id) = id.parse::<ID>() {
                        matches.push((id, doc.clone()));
                    }
                }
            }
        }
        Ok(matches)
    }

    async fn batch_delete(&self, collection: &str, ids: &[ID]) -> Result<(), StoreError> {
        self.check_write()?;
        let mut documents = self.documents.lock().unwrap();
        if let Some(collection) = documents.get_mut(collection) {
            for id in ids {
                collection.remove(id.as_str());
            }
        }
        Ok(())
    }
}

fn path_get<'a>(doc: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(doc, |current, segment| current.get(segment))
}

fn path_set(doc: &mut Value, segments: &[String], value: Value) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };
    let map = match doc.as_object_mut() {
        Some(map) => map,
        None => return,
    };
    if rest.is_empty() {
        map.insert(head.clone(), value);
        return;
    }
    let child = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    path_set(child, rest, value);
}

fn path_delete(doc: &mut Value, segments: &[String]) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };
    let map = match doc.as_object_mut() {
        Some(map) => map,
        None => return,
    };
    if rest.is_empty() {
        map.remove(head);
        return;
    }
    if let Some(child) = map.get_mut(head) {
        path_delete(child, rest);
    }
}

fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_fields_requires_the_document() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update_fields(
                "reminders",
                "u1",
                vec![(FieldPath::top("title"), FieldWrite::Set(json!("hi")))],
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn field_writes_keep_sibling_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .set("shards", "cal1_2025-06", json!({ "items": { "a": 1, "b": 2 } }), false)
            .await
            .unwrap();
        store
            .update_fields(
                "shards",
                "cal1_2025-06",
                vec![
                    (FieldPath::nested("items", "a"), FieldWrite::Delete),
                    (FieldPath::top("updatedAt"), FieldWrite::Set(json!(99))),
                ],
            )
            .await
            .unwrap();

        let doc = store.get("shards", "cal1_2025-06").await.unwrap().unwrap();
        assert_eq!(doc, json!({ "items": { "b": 2 }, "updatedAt": 99 }));
    }

    #[tokio::test]
    async fn keys_containing_dots_stay_single_segments() {
        let store = InMemoryDocumentStore::new();
        let key = "abc@google.com-1748768400000".to_string();
        store
            .set(
                "shards",
                "cal1_2025-06",
                json!({ "items": { key.clone(): { "title": "Dinner" } } }),
                false,
            )
            .await
            .unwrap();
        store
            .update_fields(
                "shards",
                "cal1_2025-06",
                vec![(FieldPath::nested("items", key), FieldWrite::Delete)],
            )
            .await
            .unwrap();

        let doc = store.get("shards", "cal1_2025-06").await.unwrap().unwrap();
        assert_eq!(doc["items"], json!({}));
    }

    #[tokio::test]
    async fn merge_set_keeps_unrelated_entries() {
        let store = InMemoryDocumentStore::new();
        store
            .set("shards", "s1", json!({ "items": { "a": 1 }, "updatedAt": 1 }), false)
            .await
            .unwrap();
        store
            .set("shards", "s1", json!({ "items": { "b": 2 }, "updatedAt": 2 }), true)
            .await
            .unwrap();

        let doc = store.get("shards", "s1").await.unwrap().unwrap();
        assert_eq!(doc, json!({ "items": { "a": 1, "b": 2 }, "updatedAt": 2 }));
    }

    #[tokio::test]
    async fn queries_match_on_nested_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .create("notifications", json!({ "data": { "checklistId": "c1" } }))
            .await
            .unwrap();
        store
            .create("notifications", json!({ "data": { "checklistId": "c2" } }))
            .await
            .unwrap();

        let matches = store
            .query_equals(
                "notifications",
                &FieldPath::nested("data", "checklistId"),
                &json!("c1"),
            )
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn injected_failures_start_after_the_allowance() {
        let store = InMemoryDocumentStore::new();
        store.fail_writes_after(1);
        assert!(store.set("c", "1", json!({}), false).await.is_ok());
        assert!(store.set("c", "2", json!({}), false).await.is_err());
        store.clear_write_failures();
        assert!(store.set("c", "2", json!({}), false).await.is_ok());
    }
}
