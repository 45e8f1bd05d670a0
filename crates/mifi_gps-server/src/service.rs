// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Wires the shared state and the four background tasks together.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::fix_store::FixStore;
use crate::flusher::Flusher;
use crate::queue::OutboundQueue;
use crate::sampler::Sampler;
use crate::status::{HtmlStatusTemplate, StatusServer, StatusTemplate};
use crate::storage::RecordStore;
use crate::stream::{ReaderMetrics, StreamReader};

/// The GPS logging service.
///
/// Owns the fix store and outbound queue, and runs the stream reader, the
/// sampler, the flusher and the status page as independent tasks.
pub struct GpsLogger {
    config: Config,
    store: Arc<FixStore>,
    queue: Arc<OutboundQueue>,
    storage: Arc<dyn RecordStore>,
    template: Arc<dyn StatusTemplate>,
    metrics: Arc<ReaderMetrics>,
    bound: Option<oneshot::Sender<SocketAddr>>,
}

impl GpsLogger {
    /// Build the service from configuration and a storage backend.
    pub fn new(config: Config, storage: Arc<dyn RecordStore>) -> Self {
        let queue = Arc::new(OutboundQueue::with_capacity(config.queue_capacity));
        Self {
            config,
            store: Arc::new(FixStore::new()),
            queue,
            storage,
            template: Arc::new(HtmlStatusTemplate),
            metrics: Arc::new(ReaderMetrics::new()),
            bound: None,
        }
    }

    /// Replace the status page template.
    pub fn with_template(mut self, template: Arc<dyn StatusTemplate>) -> Self {
        self.template = template;
        self
    }

    /// Report the status page's bound address once it is listening.
    pub fn notify_bound(mut self, tx: oneshot::Sender<SocketAddr>) -> Self {
        self.bound = Some(tx);
        self
    }

    /// The shared fix store.
    pub fn store(&self) -> Arc<FixStore> {
        Arc::clone(&self.store)
    }

    /// The shared outbound queue.
    pub fn queue(&self) -> Arc<OutboundQueue> {
        Arc::clone(&self.queue)
    }

    /// Stream reader counters.
    pub fn reader_metrics(&self) -> Arc<ReaderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every task until `shutdown` resolves, then flush once more.
    ///
    /// Only a failure to bind the status endpoint is returned as an error;
    /// everything else is logged by the task that hit it.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let status = StatusServer::bind(
            &self.config.listen_addr,
            Arc::clone(&self.store),
            Arc::clone(&self.template),
            self.config.maps_api_key.clone(),
        )
        .await?
        .with_reader_metrics(Arc::clone(&self.metrics));
        if let Some(tx) = self.bound.take() {
            if let Ok(addr) = status.local_addr() {
                // Receiver may have gone away.
                let _ = tx.send(addr);
            }
        }

        let reader = StreamReader::new(self.config.device_addr.clone(), Arc::clone(&self.store))
            .cooldown(self.config.reconnect_cooldown)
            .with_metrics(Arc::clone(&self.metrics));

        let sampler = Sampler::new(Arc::clone(&self.store), Arc::clone(&self.queue))
            .initial_delay(self.config.sample_delay)
            .period(self.config.sample_period);

        let flusher = Flusher::new(Arc::clone(&self.storage), Arc::clone(&self.queue))
            .period(self.config.flush_period);

        info!(
            device = %self.config.device_addr,
            listen = %self.config.listen_addr,
            queue_capacity = self.queue.capacity(),
            "GPS logger starting"
        );

        let mut tasks = JoinSet::new();
        tasks.spawn(reader.run());
        tasks.spawn(sampler.run());
        tasks.spawn(flusher.clone().run());
        tasks.spawn(status.run());

        tokio::pin!(shutdown);
        tokio::select! {
            () = &mut shutdown => info!("shutdown requested"),
            Some(res) = tasks.join_next() => {
                // Every task loops forever, so this is a panic.
                if let Err(e) = res {
                    error!(error = %e, "background task stopped unexpectedly");
                }
            }
        }
        tasks.shutdown().await;

        match flusher.flush_once().await {
            Ok(0) => {}
            Ok(n) => info!(records = n, "pushed GPS data on shutdown"),
            Err(e) => warn!(
                error = %e,
                lost = self.queue.len(),
                "final push failed, queued records are lost"
            ),
        }
        info!("GPS logger stopped");
        Ok(())
    }
}

impl std::fmt::Debug for GpsLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpsLogger")
            .field("config", &self.config)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
