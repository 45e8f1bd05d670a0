// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// Print the most recently logged fix.
//
// Reads MIFI_GPS_DBCONNSTR like the daemon does.

use std::process::ExitCode;

use mifi_gps_server::config::Config;
use mifi_gps_server::proto::format::{Axis, format_dms, hemisphere};
use mifi_gps_server::storage::PostgresStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = async {
        let config = Config::from_env()?;
        let store = PostgresStore::connect_lazy(&config.database_url)?;
        Ok::<_, mifi_gps_server::error::Error>(store.latest().await?)
    }
    .await;

    match result {
        Ok(Some(fix)) => {
            println!("logged at:  {}", fix.logged_at.to_rfc3339());
            println!("gps time:   {}", fix.gps_timestamp.to_rfc3339());
            println!(
                "latitude:   {:.6} ({} {})",
                fix.y,
                format_dms(fix.y),
                hemisphere(fix.y, Axis::Latitude)
            );
            println!(
                "longitude:  {:.6} ({} {})",
                fix.x,
                format_dms(fix.x),
                hemisphere(fix.x, Axis::Longitude)
            );
            if let Some(z) = fix.z {
                println!("altitude:   {z:.1} m");
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("no fixes logged yet");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
