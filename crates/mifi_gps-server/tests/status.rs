// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Status endpoint over a real socket.

use std::net::SocketAddr;
use std::sync::Arc;

use mifi_gps_server::error::RenderError;
use mifi_gps_server::fix_store::FixStore;
use mifi_gps_server::proto::parse_sentence;
use mifi_gps_server::status::{HtmlStatusTemplate, StatusServer, StatusTemplate, StatusView};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const RMC: &str = "$GPRMC,103000.00,A,4807.038,N,01131.000,E,022.4,084.4,150624,003.1,W*40";
const GGA: &str = "$GPGGA,123519.000,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*59";

async fn spawn_server(
    store: Arc<FixStore>,
    template: Arc<dyn StatusTemplate>,
    key: Option<&str>,
) -> SocketAddr {
    let server = StatusServer::bind("127.0.0.1:0", store, template, key.map(str::to_string))
        .await
        .expect("failed to bind status server");
    let addr = server.local_addr().expect("failed to get local addr");
    tokio::spawn(server.run());
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    let (head, body) = response.split_once("\r\n\r\n").unwrap();
    (head.to_string(), body.to_string())
}

#[tokio::test]
async fn page_reflects_current_fix() {
    let store = Arc::new(FixStore::new());
    let addr = spawn_server(Arc::clone(&store), Arc::new(HtmlStatusTemplate), Some("abc")).await;

    let (head, body) = get(addr, "/").await;
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(body.contains("No current fix"));

    store.update(parse_sentence(RMC).unwrap());
    store.update(parse_sentence(GGA).unwrap());
    let (_, body) = get(addr, "/").await;
    assert!(!body.contains("No current fix"));
    assert!(body.contains("4807.0380 N"));
    assert!(body.contains("1131.0000 E"));
    assert!(body.contains("545.4 m"));
    assert!(body.contains("embed/v1/place?key=abc"));
}

#[tokio::test]
async fn json_endpoint_serializes_snapshot() {
    let store = Arc::new(FixStore::new());
    store.update(parse_sentence(GGA).unwrap());
    let addr = spawn_server(Arc::clone(&store), Arc::new(HtmlStatusTemplate), None).await;

    let (head, body) = get(addr, "/api/fix").await;
    assert!(head.contains("Content-Type: application/json"));
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(value["rmc"].is_null());
    assert_eq!(value["gga"]["satellites"], 8);
    assert_eq!(value["gga"]["altitude"], 545.4);
}

struct Broken;

impl StatusTemplate for Broken {
    fn render(&self, _view: &StatusView<'_>) -> Result<String, RenderError> {
        Err(RenderError::Template("missing partial".into()))
    }
}

#[tokio::test]
async fn render_failure_does_not_stop_server() {
    let store = Arc::new(FixStore::new());
    let addr = spawn_server(store, Arc::new(Broken), None).await;

    let (head, _) = get(addr, "/").await;
    assert!(head.starts_with("HTTP/1.1 500"));

    // Still serving.
    let (head, _) = get(addr, "/api/fix").await;
    assert!(head.starts_with("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let store = Arc::new(FixStore::new());
    let addr = spawn_server(store, Arc::new(HtmlStatusTemplate), None).await;
    let (head, body) = get(addr, "/nope").await;
    assert!(head.starts_with("HTTP/1.1 404 Not Found"));
    assert_eq!(body, "Not Found\n");
}
