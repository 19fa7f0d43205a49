//! In-process stand-in for the Snipptor REST API.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use snipptor_admin::models::content_hash;

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, BTreeMap<i64, Value>>,
    next_id: i64,
    requests: Vec<Recorded>,
    list_failure: Option<u16>,
}

#[derive(Clone, Default)]
pub struct MockSnipptor {
    inner: Arc<Mutex<Inner>>,
}

impl MockSnipptor {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.inner.lock().unwrap().next_id = 1000;
        mock
    }

    /// Insert rows; each must carry an `id`.
    pub fn seed(&self, resource: &str, rows: Vec<Value>) -> &Self {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.tables.entry(resource.to_string()).or_default();
        for row in rows {
            let id = row["id"].as_i64().expect("seeded rows need an id");
            table.insert(id, row);
        }
        self
    }

    /// Make every list request fail with `status` from now on.
    pub fn fail_lists_with(&self, status: u16) {
        self.inner.lock().unwrap().list_failure = Some(status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn row(&self, resource: &str, id: i64) -> Option<Value> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(resource)
            .and_then(|t| t.get(&id))
            .cloned()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/api/:resource", get(list).post(create))
            .route(
                "/api/:resource/:id",
                get(fetch).put(replace).patch(merge).delete(remove),
            )
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn record(&self, method: Method, path: String, query: Option<String>, headers: &HeaderMap) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.inner.lock().unwrap().requests.push(Recorded {
            method: method.to_string(),
            path,
            query,
            authorization,
        });
    }
}

fn entity_name(resource: &str) -> &str {
    match resource {
        "engines" => "engine",
        "vulnerabilities" => "vulnerability",
        "rules" => "rule",
        "snippets" => "snippet",
        _ => "snippetMatchedRules",
    }
}

fn alert(resource: &str, action: &str, id: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-snipptorapp-alert"),
        HeaderValue::from_str(&format!("snipptorApp.{}.{}", entity_name(resource), action)).unwrap(),
    );
    headers.insert(
        HeaderName::from_static("x-snipptorapp-params"),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    );
    headers
}

fn problem(status: StatusCode, title: &str, resource: &str, error_key: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-snipptorapp-error"),
        HeaderValue::from_str(&format!("error.{}", error_key)).unwrap(),
    );
    let body = json!({
        "type": "https://www.jhipster.tech/problem/problem-with-message",
        "title": title,
        "status": status.as_u16(),
        "message": format!("error.{}", error_key),
        "entityName": entity_name(resource),
        "errorKey": error_key,
    });
    (status, headers, Json(body)).into_response()
}

fn query_param(query: &Option<String>, key: &str) -> Option<u64> {
    query.as_deref()?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == key {
            v.parse().ok()
        } else {
            None
        }
    })
}

/// Replace id-only references with the stored rows, the way the service
/// answers with loaded associations.
fn expand(inner: &Inner, resource: &str, mut row: Value) -> Value {
    let lookup = |table: &str, reference: &Value| -> Value {
        reference["id"]
            .as_i64()
            .and_then(|id| inner.tables.get(table).and_then(|t| t.get(&id)))
            .cloned()
            .unwrap_or_else(|| reference.clone())
    };
    if resource == "rules" {
        for (field, table) in [("engine", "engines"), ("vulnerability", "vulnerabilities")] {
            if let Some(reference) = row.get(field).cloned().filter(|r| !r.is_null()) {
                row[field] = lookup(table, &reference);
            }
        }
    }
    if resource == "snippets" {
        if let Some(content) = row["content"].as_str() {
            let hash = content_hash(content);
            row["hash"] = json!(hash);
        }
    }
    row
}

async fn list(
    State(mock): State<MockSnipptor>,
    Path(resource): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    mock.record(Method::GET, format!("/api/{}", resource), query.clone(), &headers);
    let inner = mock.inner.lock().unwrap();
    if let Some(status) = inner.list_failure {
        let status = StatusCode::from_u16(status).unwrap();
        return problem(status, "Internal Server Error", &resource, "internal");
    }

    let rows: Vec<Value> = inner
        .tables
        .get(&resource)
        .map(|t| t.values().cloned().collect())
        .unwrap_or_default();
    let total = rows.len() as u64;

    let mut out = HeaderMap::new();
    out.insert("x-total-count", HeaderValue::from_str(&total.to_string()).unwrap());

    let page_rows = match query_param(&query, "size") {
        Some(size) => {
            let page = query_param(&query, "page").unwrap_or(0);
            let last = if total == 0 { 0 } else { (total - 1) / size };
            let mut links = Vec::new();
            if page < last {
                links.push(format!("</api/{}?page={}&size={}>; rel=\"next\"", resource, page + 1, size));
            }
            if page > 0 {
                links.push(format!("</api/{}?page={}&size={}>; rel=\"prev\"", resource, page - 1, size));
            }
            links.push(format!("</api/{}?page={}&size={}>; rel=\"last\"", resource, last, size));
            links.push(format!("</api/{}?page=0&size={}>; rel=\"first\"", resource, size));
            out.insert("link", HeaderValue::from_str(&links.join(",")).unwrap());
            rows.into_iter()
                .skip((page * size) as usize)
                .take(size as usize)
                .collect()
        }
        None => rows,
    };

    (out, Json(Value::Array(page_rows))).into_response()
}

async fn create(
    State(mock): State<MockSnipptor>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    mock.record(Method::POST, format!("/api/{}", resource), None, &headers);
    if body.get("id").is_some_and(|id| !id.is_null()) {
        return problem(StatusCode::BAD_REQUEST, "A new entity cannot already have an ID", &resource, "idexists");
    }
    if resource == "engines" && body.get("name").map_or(true, Value::is_null) {
        return problem(StatusCode::BAD_REQUEST, "Method argument not valid", &resource, "validation");
    }

    let mut inner = mock.inner.lock().unwrap();
    inner.next_id += 1;
    let id = inner.next_id;
    body["id"] = json!(id);
    let row = expand(&inner, &resource, body);
    inner.tables.entry(resource.clone()).or_default().insert(id, row.clone());
    (StatusCode::CREATED, alert(&resource, "created", id), Json(row)).into_response()
}

async fn fetch(
    State(mock): State<MockSnipptor>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    mock.record(Method::GET, format!("/api/{}/{}", resource, id), None, &headers);
    match mock.row(&resource, id) {
        Some(row) => Json(row).into_response(),
        None => problem(StatusCode::NOT_FOUND, "Not Found", &resource, "notfound"),
    }
}

async fn replace(
    State(mock): State<MockSnipptor>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.record(Method::PUT, format!("/api/{}/{}", resource, id), None, &headers);
    if body["id"].as_i64() != Some(id) {
        return problem(StatusCode::BAD_REQUEST, "Invalid ID", &resource, "idinvalid");
    }
    let mut inner = mock.inner.lock().unwrap();
    if !inner.tables.get(&resource).is_some_and(|t| t.contains_key(&id)) {
        return problem(StatusCode::BAD_REQUEST, "Entity not found", &resource, "idnotfound");
    }
    let row = expand(&inner, &resource, body);
    inner.tables.entry(resource.clone()).or_default().insert(id, row.clone());
    (alert(&resource, "updated", id), Json(row)).into_response()
}

async fn merge(
    State(mock): State<MockSnipptor>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.record(Method::PATCH, format!("/api/{}/{}", resource, id), None, &headers);
    let mut inner = mock.inner.lock().unwrap();
    let Some(mut row) = inner.tables.get(&resource).and_then(|t| t.get(&id)).cloned() else {
        return problem(StatusCode::BAD_REQUEST, "Entity not found", &resource, "idnotfound");
    };
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            if !value.is_null() {
                row[key.as_str()] = value.clone();
            }
        }
    }
    let row = expand(&inner, &resource, row);
    inner.tables.entry(resource.clone()).or_default().insert(id, row.clone());
    (alert(&resource, "updated", id), Json(row)).into_response()
}

async fn remove(
    State(mock): State<MockSnipptor>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    mock.record(Method::DELETE, format!("/api/{}/{}", resource, id), None, &headers);
    let mut inner = mock.inner.lock().unwrap();
    if let Some(table) = inner.tables.get_mut(&resource) {
        table.remove(&id);
    }
    (StatusCode::NO_CONTENT, alert(&resource, "deleted", id)).into_response()
}
