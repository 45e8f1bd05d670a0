// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// GPS logging daemon.
//
// Configuration comes from the environment:
//   MIFI_GPS_DBCONNSTR    PostgreSQL connection string (required)
//   MIFI_GPS_MAPSAPIKEY   maps API key for the status page
//   MIFI_GPS_DEVICE_ADDR  device telemetry endpoint (default 192.168.1.1:11010)
//   MIFI_GPS_LISTEN_ADDR  status page address (default 0.0.0.0:8080)
//
// Log verbosity follows RUST_LOG (default: info).

use std::process::ExitCode;
use std::sync::Arc;

use mifi_gps_server::config::{Config, ENV_MAPS_API_KEY};
use mifi_gps_server::service::GpsLogger;
use mifi_gps_server::storage::PostgresStore;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if config.maps_api_key.is_none() {
        warn!(var = ENV_MAPS_API_KEY, "no maps API key set, status page map is a plain link");
    }

    let storage = match PostgresStore::connect_lazy(&config.database_url) {
        Ok(storage) => storage,
        Err(e) => {
            error!(error = %e, "failed to set up database pool");
            return ExitCode::FAILURE;
        }
    };

    let logger = GpsLogger::new(config, Arc::new(storage));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    match logger.run_until(shutdown).await {
        Ok(()) => {
            info!("exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "GPS logger failed");
            ExitCode::FAILURE
        }
    }
}
