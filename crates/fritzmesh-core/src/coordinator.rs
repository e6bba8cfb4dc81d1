// ── Refresh coordinator ──
//
// Owns a mesh source and turns it into a stream of reconstructed snapshots.
// Each refresh fetches, reconstructs, enriches (best-effort), indexes, and
// publishes through `watch` channels. The periodic loop is sequential, so at
// most one refresh is in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fritzmesh_api::MeshSource;

use crate::config::{DebugMode, MeshConfig};
use crate::enrich::enrich;
use crate::error::CoreError;
use crate::model::Topology;
use crate::reconstruct::reconstruct;
use crate::store::MeshIndex;

// ── Published state ──────────────────────────────────────────────

/// One successful refresh: the topology, its MAC index, and when it was built.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    pub topology: Topology,
    pub index: MeshIndex,
    pub refreshed_at: DateTime<Utc>,
    /// Whether host-list enrichment was applied.
    pub enriched: bool,
}

/// Outcome of the most recent refresh, observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh has completed yet.
    Idle,
    Ready,
    /// The last refresh failed; the previous snapshot, if any, is stale.
    Failed { message: String },
}

// ── Coordinator ──────────────────────────────────────────────────

/// Polls a [`MeshSource`] and publishes reconstructed topologies.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`.
pub struct Coordinator<S> {
    inner: Arc<CoordinatorInner<S>>,
}

impl<S> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<S> {
    source: S,
    config: MeshConfig,
    snapshot: watch::Sender<Option<Arc<MeshSnapshot>>>,
    state: watch::Sender<RefreshState>,
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
}

impl<S: MeshSource> Coordinator<S> {
    pub fn new(source: S, config: MeshConfig) -> Self {
        let (snapshot, _) = watch::channel(None);
        let (state, _) = watch::channel(RefreshState::Idle);
        Self {
            inner: Arc::new(CoordinatorInner {
                source,
                config,
                snapshot,
                state,
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch, reconstruct, enrich, and publish one snapshot.
    ///
    /// A failed host-list fetch is logged and the un-enriched topology is
    /// published. Any other failure publishes [`RefreshState::Failed`] and is
    /// returned; the last good snapshot stays available.
    pub async fn refresh(&self) -> Result<Arc<MeshSnapshot>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;

        match self.build_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.send_replace(Some(Arc::clone(&snapshot)));
                self.inner.state.send_replace(RefreshState::Ready);
                debug!(
                    hubs = snapshot.topology.hubs.len(),
                    clients = snapshot.topology.client_count(),
                    enriched = snapshot.enriched,
                    "mesh refresh complete"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "mesh refresh failed");
                self.inner.state.send_replace(RefreshState::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn build_snapshot(&self) -> Result<MeshSnapshot, CoreError> {
        let raw = self.inner.source.fetch_topology().await?;
        self.capture_raw(&raw).await;

        let mut topology = reconstruct(raw)?;

        let mut enriched = false;
        if self.inner.config.enrich {
            match self.inner.source.fetch_hosts().await {
                Ok(hosts) => {
                    enrich(&mut topology, &hosts);
                    enriched = true;
                }
                Err(e) => {
                    warn!(error = %e, "host list unavailable, publishing topology without enrichment");
                }
            }
        }

        let index = MeshIndex::from_topology(&topology);
        Ok(MeshSnapshot {
            topology,
            index,
            refreshed_at: Utc::now(),
            enriched,
        })
    }

    /// Log and/or dump the raw document according to the debug mode.
    async fn capture_raw(&self, raw: &Value) {
        let mode = self.inner.config.debug_mode;
        if mode == DebugMode::Off {
            return;
        }
        if mode.logs() {
            debug!(raw = %raw, "raw mesh snapshot");
        }
        if mode.dumps() {
            let Some(ref path) = self.inner.config.debug_dump_path else {
                warn!(%mode, "debug dump requested but no dump path configured");
                return;
            };
            let body = match serde_json::to_string_pretty(raw) {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "cannot serialize raw snapshot for dump");
                    return;
                }
            };
            match tokio::fs::write(path, body).await {
                Ok(()) => debug!(path = %path.display(), "raw mesh snapshot written"),
                Err(e) => warn!(path = %path.display(), error = %e, "cannot write raw snapshot dump"),
            }
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Most recent successful snapshot, if any.
    pub fn latest(&self) -> Option<Arc<MeshSnapshot>> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to published snapshots.
    pub fn snapshots(&self) -> watch::Receiver<Option<Arc<MeshSnapshot>>> {
        self.inner.snapshot.subscribe()
    }

    /// Subscribe to refresh outcome changes.
    pub fn state(&self) -> watch::Receiver<RefreshState> {
        self.inner.state.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Stop the periodic loop started by [`spawn`](Self::spawn).
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }
}

impl<S: MeshSource + 'static> Coordinator<S> {
    /// Refresh now, then every `poll_interval`, until [`shutdown`](Self::shutdown).
    pub fn spawn(&self) -> JoinHandle<()> {
        let coordinator = self.clone();
        let cancel = self.inner.cancel.clone();
        let period = self.inner.config.poll_interval;
        tokio::spawn(refresh_task(coordinator, period, cancel))
    }
}

// ── Background task ──────────────────────────────────────────────

async fn refresh_task<S: MeshSource>(
    coordinator: Coordinator<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period.max(Duration::from_secs(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = period.as_secs(), "mesh polling started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are already published as RefreshState::Failed.
                let _ = coordinator.refresh().await;
            }
        }
    }

    debug!("mesh polling stopped");
}
