//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::fs;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use site_edge::{HttpServer, Shutdown, SiteConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A generated site on disk, laid out the way the static generator emits it.
pub fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("index.html"), "<h1>Home</h1>").unwrap();
    fs::write(root.join("404.html"), "<h1>Not found</h1>").unwrap();
    fs::write(root.join("style.css"), "body { margin: 0 }").unwrap();
    fs::create_dir_all(root.join("about")).unwrap();
    fs::write(root.join("about/index.html"), "<h1>About</h1>").unwrap();
    fs::create_dir_all(root.join("blog/post-1")).unwrap();
    fs::write(root.join("blog/post-1/index.html"), "<h1>Post 1</h1>").unwrap();
    fs::create_dir_all(root.join("_internal")).unwrap();
    fs::write(root.join("_internal/index.html"), "internal").unwrap();

    dir
}

pub fn config_for(site: &tempfile::TempDir) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.assets.root = site.path().to_string_lossy().into_owned();
    config
}

/// Start the server on an ephemeral port. Keep the `Shutdown` alive for
/// as long as the server should run.
pub async fn spawn_server(mut config: SiteConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A fake email provider that records every raw request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockUpstream
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let raw = read_request(&mut socket).await;
                        recorded.lock().unwrap().push(raw);

                        let (status, body) = f().await;
                        let reason = axum::http::StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let response = format!(
                            "HTTP/1.1 {} {}\r\n\
                             Content-Type: application/json\r\n\
                             Content-Length: {}\r\n\
                             Connection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream { addr, requests }
}

/// Read one HTTP/1.1 request (headers plus Content-Length body).
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
