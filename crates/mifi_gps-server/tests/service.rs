// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! End-to-end: fake hotspot in, mock storage out.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockStore;
use mifi_gps_server::config::Config;
use mifi_gps_server::error::Error;
use mifi_gps_server::service::GpsLogger;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const RMC: &str = "$GPRMC,103000.00,A,4807.038,N,01131.000,E,022.4,084.4,150624,003.1,W*40";
const GGA: &str = "$GPGGA,123519.000,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*59";

fn fast_config(device: &str) -> Config {
    let mut config = Config::new("postgres://unused");
    config.device_addr = device.to_string();
    config.listen_addr = "127.0.0.1:0".to_string();
    config.reconnect_cooldown = Duration::from_millis(50);
    config.sample_delay = Duration::from_millis(50);
    config.sample_period = Duration::from_millis(50);
    config.flush_period = Duration::from_millis(100);
    config
}

#[tokio::test]
async fn device_to_storage_and_status() {
    let device = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let device_addr = device.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = device.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        while reader.read_line(&mut line).await.unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let mut stream = reader.into_inner();
        loop {
            let body = format!("{RMC}\r\n{GGA}\r\n");
            if stream.write_all(body.as_bytes()).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    let storage = MockStore::new();
    let (bound_tx, bound_rx) = oneshot::channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let logger = GpsLogger::new(fast_config(&device_addr.to_string()), Arc::new(storage.clone()))
        .notify_bound(bound_tx);
    let metrics = logger.reader_metrics();
    let service = tokio::spawn(logger.run_until(async {
        let _ = stop_rx.await;
    }));

    let status_addr = bound_rx.await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while storage.committed().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("nothing was flushed");

    let record = &storage.committed()[0];
    assert!((record.point.latitude - 48.1173).abs() < 1e-9);
    assert!((record.point.altitude - 545.4).abs() < 1e-9);
    assert_eq!(record.speed, Some(22.4));
    assert_eq!(record.device_time.to_rfc3339(), "2024-06-15T10:30:00+00:00");

    let mut conn = TcpStream::connect(status_addr).await.unwrap();
    conn.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    let mut page = String::new();
    conn.read_to_string(&mut page).await.unwrap();
    assert!(page.starts_with("HTTP/1.1 200 OK"));
    assert!(page.contains("4807.0380 N"));

    let counters = metrics.snapshot();
    assert_eq!(counters.connect_attempts, 1);
    assert_eq!(counters.stream_failures, 0);
    assert!(counters.fragments_decoded >= 2);

    let mut conn = TcpStream::connect(status_addr).await.unwrap();
    conn.write_all(b"GET /api/metrics HTTP/1.1\r\n\r\n").await.unwrap();
    let mut json = String::new();
    conn.read_to_string(&mut json).await.unwrap();
    assert!(json.starts_with("HTTP/1.1 200 OK"));
    assert!(json.contains("\"connect_attempts\": 1"));

    stop_tx.send(()).unwrap();
    service.await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_flushes_pending_records() {
    let storage = MockStore::new();
    let mut config = fast_config("127.0.0.1:9");
    config.flush_period = Duration::from_secs(3600);
    let logger = GpsLogger::new(config, Arc::new(storage.clone()));
    let queue = logger.queue();

    // First flush runs at startup with an empty queue.
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let service = tokio::spawn(logger.run_until(async {
        let _ = stop_rx.await;
    }));
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.enqueue(common::record(1));

    stop_tx.send(()).unwrap();
    service.await.unwrap().unwrap();
    assert_eq!(storage.committed(), vec![common::record(1)]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn bind_failure_is_fatal() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = fast_config("127.0.0.1:9");
    config.listen_addr = taken.local_addr().unwrap().to_string();

    let logger = GpsLogger::new(config, Arc::new(MockStore::new()));
    let err = logger.run_until(std::future::pending::<()>()).await.unwrap_err();
    assert!(matches!(err, Error::Bind { .. }));
}
