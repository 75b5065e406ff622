use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // isolated storage root per test
    let root = std::env::temp_dir().join(format!("file_store_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.root = root.clone();
    cfg.normalize_and_validate()?;
    service::runtime::ensure_env(&cfg.storage.root, &cfg.storage.json_dir).await?;

    let app: Router = routes::build_router(startup::build_state(&cfg), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, root })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_generic_file_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    // empty root; the JSON subdirectory is not a file
    let res = c.get(format!("{}/files", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["contenido"], json!([]));

    let res = c.post(format!("{}/files", app.base_url))
        .json(&json!({"filename": "a.txt", "content": "hello"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(tokio::fs::read_to_string(app.root.join("a.txt")).await?, "hello");

    let res = c.post(format!("{}/files", app.base_url))
        .json(&json!({"filename": "a.txt", "content": "again"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.get(format!("{}/files/a.txt", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"mensaje": "Archivo leído con éxito", "contenido": "hello"}));

    let res = c.put(format!("{}/files/a.txt", app.base_url))
        .json(&json!({"content": "updated"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(tokio::fs::read_to_string(app.root.join("a.txt")).await?, "updated");

    let res = c.delete(format!("{}/files/a.txt", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/files/a.txt", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["contenido"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn e2e_json_documents() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/json", app.base_url))
        .json(&json!({"filename": "bad.json", "content": "not json"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNSUPPORTED_MEDIA_TYPE);

    let res = c.post(format!("{}/json", app.base_url))
        .json(&json!({"filename": "doc.json", "content": "{\"a\":1}"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(tokio::fs::metadata(app.root.join("app/doc.json")).await?.is_file());

    // a file written behind the API's back with invalid content is not listed
    tokio::fs::write(app.root.join("app/broken.json"), "{oops").await?;

    let res = c.get(format!("{}/json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["contenido"], json!(["doc.json"]));

    let res = c.get(format!("{}/json/doc.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["contenido"], json!({"a": 1}));

    let res = c.delete(format!("{}/json/doc.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(format!("{}/json/doc.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_rejects_names_escaping_the_root() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/files", app.base_url))
        .json(&json!({"filename": "../escape.txt", "content": "x"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(tokio::fs::metadata(app.root.join("../escape.txt")).await.is_err());
    Ok(())
}
