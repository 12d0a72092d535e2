use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use gridwall::config::{GalleryConfig, ThemeConfig};
use gridwall::server::{AppState, build_router};
use gridwall::types::StaticLayout;
use tempfile::{TempDir, tempdir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

struct HttpResponse {
    status: u16,
    headers: String,
    body: String,
}

fn static_root(themes: &[(&str, &[&str])]) -> TempDir {
    let tmp = tempdir().expect("tempdir");
    for (dir, files) in themes {
        let theme_dir = tmp.path().join("images").join(dir);
        std::fs::create_dir_all(&theme_dir).expect("create theme dir");
        for file in *files {
            std::fs::write(theme_dir.join(file), b"image bytes").expect("write image");
        }
    }
    tmp
}

fn general_only() -> GalleryConfig {
    GalleryConfig {
        themes: vec![ThemeConfig::new("general", "general", [1, 1])],
        ..Default::default()
    }
}

async fn spawn_app(root: &Path, config: GalleryConfig) -> SocketAddr {
    let state = AppState::new(config, StaticLayout::new(root)).expect("app state");
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> HttpResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let (head, body) = raw.split_once("\r\n\r\n").expect("response head");
    let (status_line, headers) = head.split_once("\r\n").unwrap_or((head, ""));
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");

    HttpResponse {
        status,
        headers: headers.to_ascii_lowercase(),
        body: body.to_string(),
    }
}

fn sorted_lines(body: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = body.lines().collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn index_then_fetch_general_manifest() {
    let root = static_root(&[("general", &["a.jpg", "b.png"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    let index = get(addr, "/").await;
    assert_eq!(index.status, 200);
    assert!(index.headers.contains("content-type: text/html"));
    assert!(index.body.starts_with("<!DOCTYPE html>"));

    let manifest = get(addr, "/static/data/general.txt").await;
    assert_eq!(manifest.status, 200);
    assert!(manifest.headers.contains("content-type: text/plain"));
    assert!(manifest.body.ends_with('\n'));
    assert_eq!(
        sorted_lines(&manifest.body),
        ["/static/images/general/a.jpg", "/static/images/general/b.png"]
    );
}

#[tokio::test]
async fn manifest_is_not_found_before_first_index_request() {
    let root = static_root(&[("general", &["a.jpg"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    let response = get(addr, "/static/data/general.txt").await;
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn unknown_manifest_is_not_found() {
    let root = static_root(&[("general", &["a.jpg"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    assert_eq!(get(addr, "/").await.status, 200);
    assert_eq!(get(addr, "/static/data/nope.txt").await.status, 404);
}

#[tokio::test]
async fn missing_theme_directory_serves_empty_manifest() {
    let root = static_root(&[("general", &["a.jpg"])]);
    let addr = spawn_app(root.path(), GalleryConfig::default()).await;

    assert_eq!(get(addr, "/").await.status, 200);

    let machu = get(addr, "/static/data/this-machu-does-not-exist.txt").await;
    assert_eq!(machu.status, 200);
    assert_eq!(machu.body, "");

    let sacchan = get(addr, "/static/data/this-sacchan-does-not-exist.txt").await;
    assert_eq!(sacchan.status, 200);
    assert_eq!(sacchan.body, "");
}

#[tokio::test]
async fn removed_image_is_dropped_on_next_index_request() {
    let root = static_root(&[("general", &["a.jpg", "b.png"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    assert_eq!(get(addr, "/").await.status, 200);
    std::fs::remove_file(root.path().join("images/general/a.jpg")).expect("remove image");
    assert_eq!(get(addr, "/").await.status, 200);

    let manifest = get(addr, "/static/data/general.txt").await;
    assert_eq!(manifest.body, "/static/images/general/b.png\n");
}

#[tokio::test]
async fn extension_filter_is_case_insensitive() {
    let root = static_root(&[("general", &["Photo.JPG", "notes.txt", "c.WebP"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    assert_eq!(get(addr, "/").await.status, 200);
    let manifest = get(addr, "/static/data/general.txt").await;
    assert_eq!(
        sorted_lines(&manifest.body),
        [
            "/static/images/general/Photo.JPG",
            "/static/images/general/c.WebP"
        ]
    );
}

#[tokio::test]
async fn manifest_urls_resolve_to_images() {
    let root = static_root(&[("general", &["a.jpg"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    assert_eq!(get(addr, "/").await.status, 200);
    let image = get(addr, "/static/images/general/a.jpg").await;
    assert_eq!(image.status, 200);
    assert!(image.headers.contains("content-type: image/jpeg"));
    assert_eq!(image.body, "image bytes");
}

#[tokio::test]
async fn path_traversal_outside_data_dir_is_rejected() {
    let root = static_root(&[("general", &["a.jpg"])]);
    std::fs::write(root.path().join("secret.txt"), "do not serve").expect("write secret");
    let addr = spawn_app(root.path(), general_only()).await;

    assert_eq!(get(addr, "/").await.status, 200);
    let response = get(addr, "/static/data/../secret.txt").await;
    assert_ne!(response.status, 200);
    assert!(!response.body.contains("do not serve"));

    let encoded = get(addr, "/static/data/..%2Fsecret.txt").await;
    assert_ne!(encoded.status, 200);
    assert!(!encoded.body.contains("do not serve"));
}

#[tokio::test]
async fn regeneration_failure_is_a_server_error() {
    let root = static_root(&[("general", &["a.jpg"])]);
    // A regular file where the data directory should be
    std::fs::write(root.path().join("data"), "not a directory").expect("write blocker");
    let addr = spawn_app(root.path(), general_only()).await;

    let response = get(addr, "/").await;
    assert_eq!(response.status, 500);
    assert!(!response.body.contains("not a directory"));
}

#[tokio::test]
async fn concurrent_index_requests_all_succeed() {
    let root = static_root(&[("general", &["a.jpg", "b.png", "c.gif"])]);
    let addr = spawn_app(root.path(), general_only()).await;

    let requests: Vec<_> = (0..8).map(|_| tokio::spawn(get(addr, "/"))).collect();
    for request in requests {
        assert_eq!(request.await.expect("join").status, 200);
    }

    let manifest = get(addr, "/static/data/general.txt").await;
    assert_eq!(sorted_lines(&manifest.body).len(), 3);
}

/// Send a request and hang up without reading the response.
async fn abandon(addr: SocketAddr, path: &str) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
}

fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn abandoned_index_requests_do_not_break_later_ones() {
    let files: Vec<String> = (0..2000).map(|i| format!("{i:05}.jpg")).collect();
    let names: Vec<&str> = files.iter().map(String::as_str).collect();
    let root = static_root(&[("general", names.as_slice())]);
    let addr = spawn_app(root.path(), general_only()).await;

    for _ in 0..4 {
        for _ in 0..8 {
            abandon(addr, "/").await;
        }
        let requests: Vec<_> = (0..4).map(|_| tokio::spawn(get(addr, "/"))).collect();
        for request in requests {
            assert_eq!(request.await.expect("join").status, 200);
        }
    }

    let manifest = get(addr, "/static/data/general.txt").await;
    assert_eq!(manifest.status, 200);
    assert_eq!(sorted_lines(&manifest.body).len(), 2000);

    // Regenerations started by abandoned requests may still be finishing
    let mut leftovers = Vec::new();
    for _ in 0..100 {
        leftovers = entry_names(root.path());
        if leftovers == ["data", "images"] {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(leftovers, ["data", "images"]);
    assert_eq!(entry_names(&root.path().join("data")), ["general.txt"]);
}
