use super::{DocumentStore, FieldPath, FieldWrite, StoreError};
use anyhow::anyhow;
use hearth_domain::ID;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::error;

const FIRESTORE_API_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// REST binding of the document store. Documents are exchanged in the
/// provider's typed-value envelope; ids assigned on create are taken from
/// the returned resource name.
pub struct FirestoreRestStore {
    client: Client,
    /// `projects/<p>/databases/(default)/documents`
    name_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponseItem {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

impl FirestoreRestStore {
    pub fn new(project_id: &str, access_token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP client to be buildable");
        Self {
            client,
            name_base: format!("projects/{}/databases/(default)/documents", project_id),
            access_token,
        }
    }

    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.name_base, collection, id)
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", FIRESTORE_API_BASE_URL, name)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<reqwest::Response, StoreError> {
        match request
            .header("authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
        {
            Ok(res) => Ok(res),
            Err(e) => {
                error!(
                    "[Network Error] Document store {} error. Error message: {:?}",
                    context, e
                );
                Err(StoreError::Other(anyhow!(
                    "Document store {} request failed: {}",
                    context,
                    e
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreRestStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let url = self.url_for(&self.doc_name(collection, id));
        let res = self.send(self.client.get(&url), "GET").await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = fail_on_status(res, "GET").await?;
        let doc = res
            .json::<FirestoreDocument>()
            .await
            .map_err(|e| StoreError::Other(anyhow!("Malformed document response: {}", e)))?;
        Ok(Some(decode_fields(&doc.fields)))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        let url = self.url_for(&self.doc_name(collection, id));
        let body = json!({ "fields": encode_document(&document) });
        let mut request = self.client.patch(&url).json(&body);
        if merge {
            let mut mask = Vec::new();
            collect_leaf_paths(&document, Vec::new(), &mut mask);
            for path in &mask {
                request = request.query(&[("updateMask.fieldPaths", escape_field_path(path))]);
            }
        }
        let res = self.send(request, "PATCH").await?;
        fail_on_status(res, "PATCH").await.map(|_| ())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Vec<(FieldPath, FieldWrite)>,
    ) -> Result<(), StoreError> {
        let url = self.url_for(&self.doc_name(collection, id));
        // Deleted fields are listed in the mask but omitted from the body.
        let mut document = Value::Object(Map::new());
        let mut request = self
            .client
            .patch(&url)
            .query(&[("currentDocument.exists", "true")]);
        for (path, write) in &fields {
            request = request.query(&[("updateMask.fieldPaths", escape_field_path(path))]);
            if let FieldWrite::Set(value) = write {
                set_at_path(&mut document, path.segments(), value.clone());
            }
        }
        let request = request.json(&json!({ "fields": encode_document(&document) }));

        let res = self.send(request, "PATCH").await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        fail_on_status(res, "PATCH").await.map(|_| ())
    }

    async fn create(&self, collection: &str, document: Value) -> Result<ID, StoreError> {
        let url = format!("{}/{}/{}", FIRESTORE_API_BASE_URL, self.name_base, collection);
        let body = json!({ "fields": encode_document(&document) });
        let res = self.send(self.client.post(&url).json(&body), "POST").await?;
        let res = fail_on_status(res, "POST").await?;
        let doc = res
            .json::<FirestoreDocument>()
            .await
            .map_err(|e| StoreError::Other(anyhow!("Malformed document response: {}", e)))?;
        doc.name
            .rsplit('/')
            .next()
            .and_then(|id| id.parse::<ID>().ok())
            .ok_or_else(|| StoreError::Other(anyhow!("Created document has no usable id")))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.url_for(&self.doc_name(collection, id));
        let res = self.send(self.client.delete(&url), "DELETE").await?;
        fail_on_status(res, "DELETE").await.map(|_| ())
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &FieldPath,
        value: &Value,
    ) -> Result<Vec<(ID, Value)>, StoreError> {
        let url = format!("{}/{}:runQuery", FIRESTORE_API_BASE_URL, self.name_base);
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": escape_field_path(field) },
                        "op": "EQUAL",
                        "value": encode_value(value),
                    }
                }
            }
        });
        let res = self.send(self.client.post(&url).json(&body), "POST").await?;
        let res = fail_on_status(res, "POST").await?;
        let items = res
            .json::<Vec<RunQueryResponseItem>>()
            .await
            .map_err(|e| StoreError::Other(anyhow!("Malformed query response: {}", e)))?;

        let mut matches = Vec::new();
        for item in items {
            let doc = match item.document {
                Some(doc) => doc,
                None => continue,
            };
            if let Some(id) = doc.name.rsplit('/').next().and_then(|id| id.parse().ok()) {
                matches.push((id, decode_fields(&doc.fields)));
            }
        }
        Ok(matches)
    }

    async fn batch_delete(&self, collection: &str, ids: &[ID]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let url = format!("{}/{}:commit", FIRESTORE_API_BASE_URL, self.name_base);
        let writes = ids
            .iter()
            .map(|id| json!({ "delete": self.doc_name(collection, id.as_str()) }))
            .collect::<Vec<_>>();
        let res = self
            .send(self.client.post(&url).json(&json!({ "writes": writes })), "POST")
            .await?;
        fail_on_status(res, "POST").await.map(|_| ())
    }
}

async fn fail_on_status(
    res: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    error!(
        "[Unexpected Response] Document store {} error. Status: {}. Body: {}",
        context, status, body
    );
    Err(StoreError::Other(anyhow!(
        "Document store {} request failed with status {}",
        context,
        status
    )))
}

/// Dotted field paths with quoting for segments that are not simple
/// identifiers (shard item keys embed `@` and `.`).
fn escape_field_path(path: &FieldPath) -> String {
    path.segments()
        .iter()
        .map(|segment| {
            let simple = !segment.is_empty()
                && !segment.chars().next().map_or(false, |c| c.is_ascii_digit())
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if simple {
                segment.clone()
            } else {
                format!("`{}`", segment.replace('\\', "\\\\").replace('`', "\\`"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn set_at_path(doc: &mut Value, segments: &[String], value: Value) {
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
    set_at_path(child, rest, value);
}

fn collect_leaf_paths(value: &Value, prefix: Vec<String>, out: &mut Vec<FieldPath>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let mut path = prefix.clone();
                path.push(key.clone());
                collect_leaf_paths(child, path, out);
            }
        }
        _ => {
            if !prefix.is_empty() {
                out.push(FieldPath::from_segments(prefix));
            }
        }
    }
}

fn encode_document(document: &Value) -> Value {
    match document {
        Value::Object(map) => {
            let fields = map
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect::<Map<_, _>>();
            Value::Object(fields)
        }
        other => encode_value(other),
    }
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(_) => json!({ "mapValue": { "fields": encode_document(value) } }),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Value {
    let map = fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect::<Map<_, _>>();
    Value::Object(map)
}

fn decode_value(value: &Value) -> Value {
    let map = match value.as_object() {
        Some(map) => map,
        None => return Value::Null,
    };
    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return json!(s);
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return json!(b);
    }
    if let Some(raw) = map.get("integerValue") {
        let parsed = match raw {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(n) = parsed {
            return json!(n);
        }
    }
    if let Some(n) = map.get("doubleValue").and_then(Value::as_f64) {
        return json!(n);
    }
    if let Some(items) = map
        .get("arrayValue")
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(items.iter().map(decode_value).collect());
    }
    if let Some(fields) = map
        .get("mapValue")
        .and_then(|v| v.get("fields"))
        .and_then(Value::as_object)
    {
        return decode_fields(fields);
    }
    if let Some(ts) = map.get("timestampValue") {
        return ts.clone();
    }
    Value::Null
}
