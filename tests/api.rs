use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wares::{Product, Request, Router, Server, Status, Store, products};

struct App {
    _dir: TempDir,
    path: PathBuf,
    router: Router,
}

impl App {
    async fn with(seed: &[Product]) -> Self {
        Self::with_file(&serde_json::to_string(seed).unwrap()).await
    }

    async fn with_file(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, contents).unwrap();
        let store = Store::open(&path).await.unwrap();
        Self { _dir: dir, path, router: products::routes(store) }
    }

    async fn call_raw(&self, method: &str, target: &str, body: &str) -> (Status, String) {
        let res = self.router.handle(Request::new(method, target, body)).await;
        assert_eq!(res.header("content-type"), Some("application/json"));
        (res.status(), String::from_utf8(res.body().to_vec()).unwrap())
    }

    async fn call(&self, method: &str, target: &str, body: &str) -> (Status, Value) {
        let (status, raw) = self.call_raw(method, target, body).await;
        (status, serde_json::from_str(&raw).unwrap())
    }

    fn on_disk(&self) -> Value {
        serde_json::from_slice(&std::fs::read(&self.path).unwrap()).unwrap()
    }
}

fn seed() -> Vec<Product> {
    vec![
        Product::new(1, "Headphones", "wireless", 89.99),
        Product::new(2, "Phone", "256GB", 599.99),
    ]
}

#[tokio::test]
async fn list_returns_every_product_in_order() {
    let app = App::with(&seed()).await;
    let (status, body) = app.call("GET", "/api/products/", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, serde_json::to_value(seed()).unwrap());

    app.call("POST", "/api/products/", r#"{"id":9,"name":"Cable","description":"usb","price":5}"#).await;
    app.call("DELETE", "/api/products/1", "").await;

    let (_, body) = app.call("GET", "/api/products/", "").await;
    let ids: Vec<i64> = body.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [2, 9]);
}

#[tokio::test]
async fn end_to_end_lifecycle() {
    let app = App::with(&seed()).await;
    let mouse = json!({"id": 5, "name": "Mouse", "description": "x", "price": 49.99});

    let (status, body) = app.call("POST", "/api/products/", &mouse.to_string()).await;
    assert_eq!(status, Status::Created);
    assert_eq!(body, mouse);

    let (status, body) = app.call("GET", "/api/products/5", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, mouse);

    let (status, body) = app.call("PUT", "/api/products/5", r#"{"price":39.99}"#).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"id": 5, "name": "Mouse", "description": "x", "price": 39.99}));

    let (status, body) = app.call("DELETE", "/api/products/5", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"message": "Product deleted successfully"}));

    let (status, body) = app.call("GET", "/api/products/5", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn create_with_taken_id_conflicts_and_changes_nothing() {
    let app = App::with(&seed()).await;
    let before = app.on_disk();

    let (status, body) = app.call("POST", "/api/products/", r#"{"id":2,"name":"Other"}"#).await;
    assert_eq!(status, Status::Conflict);
    assert_eq!(body, json!({"message": "Product already exists"}));

    let (_, listed) = app.call("GET", "/api/products/", "").await;
    assert_eq!(listed, serde_json::to_value(seed()).unwrap());
    assert_eq!(app.on_disk(), before);
}

#[tokio::test]
async fn create_passes_body_through_verbatim() {
    let app = App::with(&[]).await;
    let body = json!({"id": 7, "name": "Pad", "stock": 3});

    let (status, created) = app.call("POST", "/api/products/", &body.to_string()).await;
    assert_eq!(status, Status::Created);
    assert_eq!(created, body);
    assert_eq!(app.on_disk(), json!([body]));
}

#[tokio::test]
async fn create_echoes_values_without_coercion() {
    let app = App::with(&[]).await;

    let (status, raw) = app.call_raw("POST", "/api/products/", r#"{"id":9,"price":5}"#).await;
    assert_eq!(status, Status::Created);
    assert_eq!(raw, r#"{"id":9,"price":5}"#);

    let odd = r#"{"id":10,"name":42,"description":null,"price":"5"}"#;
    let (status, raw) = app.call_raw("POST", "/api/products/", odd).await;
    assert_eq!(status, Status::Created);
    assert_eq!(raw, odd);

    let (_, raw) = app.call_raw("GET", "/api/products/10", "").await;
    assert_eq!(raw, odd);
    assert_eq!(std::fs::read_to_string(&app.path).unwrap(), format!(r#"[{{"id":9,"price":5}},{odd}]"#));
}

#[tokio::test]
async fn unrelated_mutations_leave_seed_records_byte_identical() {
    let seed = r#"[{"id":1,"name":"Cable","price":10},{"id":2,"price":"10"}]"#;
    let app = App::with_file(seed).await;

    let (status, _) = app.call("POST", "/api/products/", r#"{"id":3}"#).await;
    assert_eq!(status, Status::Created);
    assert_eq!(
        std::fs::read_to_string(&app.path).unwrap(),
        r#"[{"id":1,"name":"Cable","price":10},{"id":2,"price":"10"},{"id":3}]"#
    );
}

#[tokio::test]
async fn item_routes_accept_a_trailing_slash() {
    let app = App::with(&seed()).await;

    let (status, body) = app.call("GET", "/api/products/1/", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["name"], "Headphones");

    let (status, body) = app.call("PUT", "/api/products/1/", r#"{"price":79}"#).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["price"], 79);

    let (status, _) = app.call("DELETE", "/api/products/1/", "").await;
    assert_eq!(status, Status::Ok);
    let (_, body) = app.call("GET", "/api/products/1/", "").await;
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let app = App::with(&seed()).await;
    let before = app.on_disk();

    let (status, body) = app.call("PUT", "/api/products/42", r#"{"name":"Ghost"}"#).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body, json!({"message": "Product not found"}));
    assert_eq!(app.on_disk(), before);
}

#[tokio::test]
async fn update_falls_back_on_falsy_values() {
    let app = App::with(&seed()).await;

    let (status, body) = app
        .call("PUT", "/api/products/1", r#"{"name":false,"description":"noise cancelling","price":0}"#)
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"id": 1, "name": "Headphones", "description": "noise cancelling", "price": 89.99}));
    assert_eq!(app.on_disk()[0], body);
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let app = App::with(&seed()).await;

    let (status, _) = app.call("DELETE", "/api/products/2", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(app.on_disk(), serde_json::to_value(&seed()[..1]).unwrap());

    let (status, body) = app.call("DELETE", "/api/products/2", "").await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body, json!({"message": "Product not found"}));
}

#[tokio::test]
async fn reopening_the_backing_file_restores_the_catalogue() {
    let app = App::with(&seed()).await;
    app.call("POST", "/api/products/", r#"{"id":3,"name":"Camera","description":"dslr","price":929.99}"#).await;
    app.call("PUT", "/api/products/2", r#"{"price":549.0}"#).await;
    app.call("DELETE", "/api/products/1", "").await;
    let (_, live) = app.call("GET", "/api/products/", "").await;

    let reopened = Store::open(&app.path).await.unwrap();
    assert_eq!(serde_json::to_value(reopened.list().await).unwrap(), live);
}

#[tokio::test]
async fn unmatched_requests_echo_the_target() {
    let app = App::with(&seed()).await;

    for (method, target) in [
        ("GET", "/api/products"),
        ("GET", "/api/products/abc"),
        ("GET", "/api/products/1/reviews"),
        ("PATCH", "/api/products/1"),
        ("POST", "/api/products/1"),
        ("GET", "/api/products/99999999999999999999"),
        ("GET", "/nowhere?q=1"),
    ] {
        let (status, body) = app.call(method, target, "").await;
        assert_eq!(status, Status::NotFound, "{method} {target}");
        assert_eq!(body, json!({"message": format!("Not Found - {target}")}));
    }
}

#[tokio::test]
async fn malformed_body_is_rejected_without_side_effects() {
    let app = App::with(&seed()).await;
    let before = app.on_disk();

    for (method, target, body) in [
        ("POST", "/api/products/", "{\"id\":"),
        ("POST", "/api/products/", r#"{"name":"no id"}"#),
        ("PUT", "/api/products/1", "not json"),
    ] {
        let (status, reply) = app.call(method, target, body).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(reply, json!({"message": "Invalid request body"}));
    }
    assert_eq!(app.on_disk(), before);
}

#[tokio::test]
async fn serves_over_tcp() {
    let app = App::with(&seed()).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(Server::from_listener(listener).serve_with_shutdown(app.router, async {
        let _ = stopped.await;
    }));

    let body = r#"{"id":5,"name":"Mouse","description":"x","price":49.99}"#;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            format!(
                "POST /api/products/ HTTP/1.1\r\nhost: localhost\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            )
            .as_bytes(),
        )
        .await
        .unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 201 Created\r\n"), "{raw}");
    assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(raw.ends_with(body));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
