use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FirestoreConfig;
use crate::error::{Error, Result};
use crate::models::{Favorite, Property};
use crate::store::traits::{FavoritesStore, PropertyRepository};

const PROPERTIES: &str = "properties";
const FAVORITES: &str = "favorites";

/// Firestore accessor over the REST API
pub struct FirestoreClient {
    client: Client,
    documents_url: Url,
    api_key: Option<String>,
    id_token: Option<String>,
}

/// Document envelope returned by the REST API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
}

impl FirestoreClient {
    pub fn new(config: &FirestoreConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let documents_url = Url::parse(&format!(
            "{}/projects/{}/databases/{}/documents",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.database
        ))
        .context("Invalid Firestore base URL")?;

        if documents_url.cannot_be_a_base() {
            anyhow::bail!("Firestore base URL must be hierarchical: {}", documents_url);
        }

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
            id_token: None,
        })
    }

    /// Authenticate requests as the signed-in user
    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    fn document_url(&self, collection: &str, id: &str) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection).push(id);
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<Response> {
        debug!("{} {}", method, url.path());
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }
}

fn status_error(status: StatusCode) -> Error {
    warn!("Firestore returned status: {}", status);
    Error::Transient(format!("Firestore returned HTTP {}", status))
}

/// Convert a Firestore typed value into plain JSON
pub fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("stringValue") {
        return s.clone();
    }
    if let Some(i) = typed.get("integerValue") {
        // int64 is sent as a string
        return match i {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        };
    }
    if let Some(d) = typed.get("doubleValue") {
        return match d {
            Value::Number(_) => d.clone(),
            // "NaN" and "Infinity" have no JSON number form
            _ => Value::Null,
        };
    }
    if let Some(b) = typed.get("booleanValue") {
        return b.clone();
    }
    for key in ["timestampValue", "referenceValue", "bytesValue"] {
        if let Some(s) = typed.get(key) {
            return s.clone();
        }
    }
    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = typed.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();
        return Value::Object(fields);
    }
    if let Some(point) = typed.get("geoPointValue") {
        return point.clone();
    }

    Value::Null
}

pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn property_from_document(requested_id: &str, document: Document) -> Result<Property> {
    // the document name ends with the identifier the store assigned
    let id = document
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .unwrap_or(requested_id)
        .to_string();

    let mut fields = decode_fields(&document.fields);
    if !fields.contains_key("createdAt") {
        if let Some(created) = document.create_time {
            fields.insert("createdAt".to_string(), Value::String(created));
        }
    }

    Property::from_json(id, Value::Object(fields))
}

fn favorite_body(favorite: &Favorite) -> Value {
    json!({
        "fields": {
            "userId": { "stringValue": favorite.user_id },
            "propertyId": { "stringValue": favorite.property_id },
            "createdAt": { "timestampValue": Utc::now().to_rfc3339() },
        }
    })
}

#[async_trait]
impl PropertyRepository for FirestoreClient {
    async fn fetch_property(&self, id: &str) -> Result<Property> {
        info!("Fetching property {} from Firestore", id);

        let url = self.document_url(PROPERTIES, id);
        let response = self.send(Method::GET, url, None).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::not_found(PROPERTIES, id)),
            status if status.is_success() => {
                let document: Document = response.json().await?;
                debug!("Document {} has {} fields", document.name, document.fields.len());
                property_from_document(id, document)
            }
            status => Err(status_error(status)),
        }
    }

    fn store_name(&self) -> &'static str {
        "firestore"
    }
}

#[async_trait]
impl FavoritesStore for FirestoreClient {
    async fn is_favorited(&self, user_id: &str, property_id: &str) -> Result<bool> {
        let favorite = Favorite::new(user_id, property_id);
        let url = self.document_url(FAVORITES, &favorite.document_id());
        let response = self.send(Method::GET, url, None).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(status_error(status)),
        }
    }

    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        let favorite = Favorite::new(user_id, property_id);
        let url = self.document_url(FAVORITES, &favorite.document_id());

        // PATCH on a fixed key creates or overwrites, so repeats are harmless
        let response = self
            .send(Method::PATCH, url, Some(favorite_body(&favorite)))
            .await?;

        if response.status().is_success() {
            info!("Added favorite {}", favorite.document_id());
            Ok(())
        } else {
            Err(status_error(response.status()))
        }
    }

    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        let favorite = Favorite::new(user_id, property_id);
        let url = self.document_url(FAVORITES, &favorite.document_id());
        let response = self.send(Method::DELETE, url, None).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => {
                info!("Removed favorite {}", favorite.document_id());
                Ok(())
            }
            status => Err(status_error(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingType, PropertyType};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client(api_key: Option<&str>) -> FirestoreClient {
        let config = FirestoreConfig {
            project_id: "estatehub-demo".to_string(),
            api_key: api_key.map(str::to_string),
            ..FirestoreConfig::default()
        };
        FirestoreClient::new(&config).unwrap()
    }

    #[test]
    fn builds_document_urls() {
        let url = client(None).document_url(PROPERTIES, "abc 1");
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/estatehub-demo/databases/(default)/documents/properties/abc%201"
        );

        let url = client(Some("k3y")).document_url(FAVORITES, "u1_p1");
        assert!(url.path().ends_with("/documents/favorites/u1_p1"));
        assert_eq!(url.query(), Some("key=k3y"));
    }

    #[test]
    fn decodes_typed_values() {
        let raw = json!({
            "name": { "stringValue": "Sunny 2BHK" },
            "price": { "integerValue": "20000" },
            "area": { "doubleValue": 1150.5 },
            "featured": { "booleanValue": true },
            "amenities": { "arrayValue": { "values": [
                { "stringValue": "Lift" },
                { "stringValue": "Gym" }
            ] } },
            "emptyList": { "arrayValue": {} },
            "meta": { "mapValue": { "fields": { "floor": { "integerValue": "7" } } } },
            "createdAt": { "timestampValue": "2024-03-12T09:30:00Z" },
            "deleted": { "nullValue": null }
        });

        let decoded = decode_fields(raw.as_object().unwrap());
        assert_eq!(
            Value::Object(decoded),
            json!({
                "name": "Sunny 2BHK",
                "price": 20000,
                "area": 1150.5,
                "featured": true,
                "amenities": ["Lift", "Gym"],
                "emptyList": [],
                "meta": { "floor": 7 },
                "createdAt": "2024-03-12T09:30:00Z",
                "deleted": null
            })
        );
    }

    #[test]
    fn document_becomes_property() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/estatehub-demo/databases/(default)/documents/properties/baner-2bhk",
            "fields": {
                "name": { "stringValue": "Sunny 2BHK" },
                "listingType": { "stringValue": "rent" },
                "propertyType": { "stringValue": "residential" },
                "price": { "integerValue": "20000" }
            },
            "createTime": "2024-03-12T09:30:00.123456Z",
            "updateTime": "2024-03-13T09:30:00Z"
        }))
        .unwrap();

        let property = property_from_document("ignored", document).unwrap();
        assert_eq!(property.id(), "baner-2bhk");
        assert_eq!(property.listing_type, Some(ListingType::Rent));
        assert_eq!(property.property_type, Some(PropertyType::Residential));
        assert_eq!(property.price, Some(20000.0));
        assert!(property.created_at.is_some());
    }

    /// Serves canned HTTP responses on a local port, one connection per request
    struct StubServer {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        async fn start<F>(handler: F) -> Self
        where
            F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
        {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let handler = Arc::new(handler);
            let requests = Arc::new(Mutex::new(Vec::new()));
            let log = Arc::clone(&requests);

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let handler = Arc::clone(&handler);
                    let log = Arc::clone(&log);
                    tokio::spawn(async move {
                        let Some((method, path)) = read_request(&mut socket).await else {
                            return;
                        };
                        log.lock().unwrap().push(format!("{} {}", method, path));
                        let (status, body) = handler(&method, &path);
                        let response = format!(
                            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            });

            Self {
                base_url: format!("http://{}/v1", addr),
                requests,
            }
        }

        fn client(&self) -> FirestoreClient {
            let config = FirestoreConfig {
                project_id: "estatehub-test".to_string(),
                base_url: self.base_url.clone(),
                timeout_secs: 5,
                ..FirestoreConfig::default()
            };
            FirestoreClient::new(&config).unwrap()
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    /// Method and path of one request; the body is read and dropped
    async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.split_whitespace();
        Some((
            request_line.next()?.to_string(),
            request_line.next()?.to_string(),
        ))
    }

    const DOCS: &str = "/v1/projects/estatehub-test/databases/(default)/documents";

    #[tokio::test]
    async fn fetch_maps_http_status() {
        let server = StubServer::start(|_, path| {
            match path.strip_prefix(DOCS).unwrap_or_default() {
                "/properties/baner-2bhk" => (
                    200,
                    json!({
                        "name": "projects/estatehub-test/databases/(default)/documents/properties/baner-2bhk",
                        "fields": {
                            "name": { "stringValue": "Sunny 2BHK" },
                            "listingType": { "stringValue": "rent" },
                            "price": { "integerValue": "20000" }
                        },
                        "createTime": "2024-03-12T09:30:00Z"
                    })
                    .to_string(),
                ),
                "/properties/broken" => (500, json!({"error": {"code": 500}}).to_string()),
                _ => (404, json!({"error": {"code": 404}}).to_string()),
            }
        })
        .await;
        let client = server.client();

        let property = client.fetch_property("baner-2bhk").await.unwrap();
        assert_eq!(property.id(), "baner-2bhk");
        assert_eq!(property.price, Some(20000.0));
        assert!(property.is_rental());

        assert_eq!(
            client.fetch_property("missing").await.unwrap_err(),
            Error::not_found(PROPERTIES, "missing")
        );
        assert!(matches!(
            client.fetch_property("broken").await,
            Err(Error::Transient(_))
        ));
    }

    #[tokio::test]
    async fn favorites_round_trip_over_http() {
        let stored: Arc<Mutex<HashSet<String>>> = Arc::default();
        let docs = Arc::clone(&stored);
        let server = StubServer::start(move |method, path| {
            let key = path.to_string();
            let mut docs = docs.lock().unwrap();
            match method {
                "PATCH" => {
                    docs.insert(key);
                    (200, json!({"name": path}).to_string())
                }
                "GET" if docs.contains(&key) => (200, json!({"name": path}).to_string()),
                "DELETE" if docs.remove(&key) => (200, "{}".to_string()),
                _ => (404, json!({"error": {"code": 404}}).to_string()),
            }
        })
        .await;
        let client = server.client();

        assert!(!client.is_favorited("u1", "p1").await.unwrap());

        client.add_favorite("u1", "p1").await.unwrap();
        client.add_favorite("u1", "p1").await.unwrap();
        assert!(client.is_favorited("u1", "p1").await.unwrap());
        assert_eq!(stored.lock().unwrap().len(), 1);

        client.remove_favorite("u1", "p1").await.unwrap();
        // the second delete gets a 404 and still succeeds
        client.remove_favorite("u1", "p1").await.unwrap();
        assert!(!client.is_favorited("u1", "p1").await.unwrap());

        let favorite_path = format!("{}/favorites/u1_p1", DOCS);
        let requests = server.requests();
        assert_eq!(
            requests,
            vec![
                format!("GET {}", favorite_path),
                format!("PATCH {}", favorite_path),
                format!("PATCH {}", favorite_path),
                format!("GET {}", favorite_path),
                format!("DELETE {}", favorite_path),
                format!("DELETE {}", favorite_path),
                format!("GET {}", favorite_path),
            ]
        );
    }

    #[tokio::test]
    async fn favorite_errors_are_transient() {
        let server =
            StubServer::start(|_, _| (503, json!({"error": {"code": 503}}).to_string())).await;
        let client = server.client();

        assert!(matches!(
            client.is_favorited("u1", "p1").await,
            Err(Error::Transient(_))
        ));
        assert!(matches!(
            client.add_favorite("u1", "p1").await,
            Err(Error::Transient(_))
        ));
        assert!(matches!(
            client.remove_favorite("u1", "p1").await,
            Err(Error::Transient(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_store_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = FirestoreConfig {
            project_id: "estatehub-test".to_string(),
            base_url: format!("http://{}/v1", addr),
            timeout_secs: 5,
            ..FirestoreConfig::default()
        };
        let client = FirestoreClient::new(&config).unwrap();
        assert!(matches!(
            client.fetch_property("baner-2bhk").await,
            Err(Error::Transient(_))
        ));
    }

    #[test]
    fn favorite_document_shape() {
        let body = favorite_body(&Favorite::new("u1", "p1"));
        assert_eq!(body["fields"]["userId"]["stringValue"], "u1");
        assert_eq!(body["fields"]["propertyId"]["stringValue"], "p1");
        assert!(body["fields"]["createdAt"]["timestampValue"].is_string());
    }
}
