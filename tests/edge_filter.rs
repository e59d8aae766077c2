//! Trailing-slash normalization and static serving over a real socket.

use std::net::SocketAddr;

use axum::http::StatusCode;
use reqwest::header::LOCATION;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;

#[tokio::test]
async fn test_trailing_slash_redirects_permanently() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/blog/post-1/", addr))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        res.headers()[LOCATION],
        format!("http://{}/blog/post-1", addr).as_str()
    );
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_redirect_target_is_served() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/blog/post-1", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<h1>Post 1</h1>");
}

#[tokio::test]
async fn test_query_survives_redirect() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/about/?utm_source=newsletter&ref=1", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        res.headers()[LOCATION],
        format!("http://{}/about?utm_source=newsletter&ref=1", addr).as_str()
    );
}

#[tokio::test]
async fn test_forwarded_proto_sets_scheme() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/about/", addr))
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        res.headers()[LOCATION],
        format!("https://{}/about", addr).as_str()
    );
}

/// Send `request` verbatim and return the response head, lowercased.
async fn raw_exchange(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8_lossy(&response).to_ascii_lowercase();
    match text.split_once("\r\n\r\n") {
        Some((head, _)) => head.to_string(),
        None => text,
    }
}

#[tokio::test]
async fn test_malformed_host_gives_relative_location() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;

    let head = raw_exchange(
        addr,
        "GET /blog/ HTTP/1.1\r\nHost: evil.example/phish?x=\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(head.starts_with("http/1.1 301"), "{head}");
    let location = head
        .lines()
        .find_map(|line| line.strip_prefix("location: "))
        .expect("redirect without location");
    assert_eq!(location.trim_end(), "/blog");
}

#[tokio::test]
async fn test_forwarded_proto_must_be_a_web_scheme() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/blog/", addr))
        .header("x-forwarded-proto", "javascript")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        res.headers()[LOCATION],
        format!("http://{}/blog", addr).as_str()
    );
}

#[tokio::test]
async fn test_double_slash_path_without_host_stays_on_origin() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;

    let head = raw_exchange(addr, "GET //evil/ HTTP/1.0\r\n\r\n").await;

    assert!(head.starts_with("http/1.0 301") || head.starts_with("http/1.1 301"), "{head}");
    let location = head
        .lines()
        .find_map(|line| line.strip_prefix("location: "))
        .expect("redirect without location");
    assert_eq!(location.trim_end(), "/evil");
}

#[tokio::test]
async fn test_method_is_not_consulted() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/contact/", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_pass_through_paths() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let root = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(root.text().await.unwrap(), "<h1>Home</h1>");

    let about = client.get(format!("http://{}/about", addr)).send().await.unwrap();
    assert_eq!(about.status(), StatusCode::OK);
    assert_eq!(about.text().await.unwrap(), "<h1>About</h1>");

    let internal = client
        .get(format!("http://{}/_internal/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(internal.status(), StatusCode::OK);
    assert_eq!(internal.text().await.unwrap(), "internal");

    let stylesheet = client
        .get(format!("http://{}/style.css/", addr))
        .send()
        .await
        .unwrap();
    assert_ne!(stylesheet.status(), StatusCode::MOVED_PERMANENTLY);
    assert!(stylesheet.headers().get(LOCATION).is_none());

    let api = client
        .get(format!("http://{}/api/unknown/", addr))
        .send()
        .await
        .unwrap();
    assert_ne!(api.status(), StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_static_file_and_not_found_page() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let css = client
        .get(format!("http://{}/style.css", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(css.headers()["content-type"], "text/css");

    let missing = client
        .get(format!("http://{}/does-not-exist", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.text().await.unwrap(), "<h1>Not found</h1>");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let generated = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert!(generated.headers().contains_key("x-request-id"));

    let supplied = client
        .get(format!("http://{}/blog/", addr))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(supplied.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(supplied.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_heartbeat() {
    let site = common::site_dir();
    let (addr, _shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/api/test", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["timestamp"]
        .as_str()
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .is_some());
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let site = common::site_dir();
    let (addr, shutdown) = common::spawn_server(common::config_for(&site)).await;
    let client = common::client();

    assert!(client.get(format!("http://{}/", addr)).send().await.is_ok());

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(client.get(format!("http://{}/", addr)).send().await.is_err());
}
