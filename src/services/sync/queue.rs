use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::client::{CheckInRecord, RemoteSync};

/// Upper bound on records folded into one batch post.
const MAX_BATCH: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub accepted: usize,
    pub failed: usize,
}

/// Fire-and-forget handle onto the background sync worker. Enqueueing never
/// waits; a full or closed queue drops the record with a warning.
#[derive(Debug, Clone)]
pub struct SyncQueue {
    tx: mpsc::Sender<CheckInRecord>,
}

impl SyncQueue {
    /// Spawns the worker. It runs until every `SyncQueue` clone is dropped
    /// and then reports what it managed to mirror.
    pub fn spawn(
        remote: Arc<dyn RemoteSync>,
        capacity: usize,
        timeout: Duration,
    ) -> (Self, JoinHandle<SyncStats>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_worker(remote, rx, timeout));
        (Self { tx }, handle)
    }

    pub fn enqueue(&self, record: CheckInRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(r)) => {
                warn!(id = %r.id, "Sync queue full, dropping check-in record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(r)) => {
                warn!(id = %r.id, "Sync worker gone, dropping check-in record");
                false
            }
        }
    }
}

async fn run_worker(
    remote: Arc<dyn RemoteSync>,
    mut rx: mpsc::Receiver<CheckInRecord>,
    timeout: Duration,
) -> SyncStats {
    let mut stats = SyncStats::default();

    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while batch.len() < MAX_BATCH {
            match rx.try_recv() {
                Ok(next) => batch.push(next),
                Err(_) => break,
            }
        }

        if batch.len() == 1 {
            let record = &batch[0];
            match tokio::time::timeout(timeout, remote.post_check_in(record)).await {
                Ok(Ok(receipt)) => {
                    debug!(local_id = %record.id, remote_id = %receipt.id, "Check-in mirrored");
                    stats.accepted += 1;
                }
                Ok(Err(e)) => {
                    warn!(id = %record.id, "Check-in sync failed: {}", e);
                    stats.failed += 1;
                }
                Err(_) => {
                    warn!(id = %record.id, "Check-in sync timed out");
                    stats.failed += 1;
                }
            }
        } else {
            match tokio::time::timeout(timeout, remote.sync_batch(&batch)).await {
                Ok(Ok(receipt)) => {
                    let accepted = receipt.count.min(batch.len());
                    stats.accepted += accepted;
                    stats.failed += batch.len() - accepted;
                }
                Ok(Err(e)) => {
                    warn!(item_count = batch.len(), "Batch sync failed: {}", e);
                    stats.failed += batch.len();
                }
                Err(_) => {
                    warn!(item_count = batch.len(), "Batch sync timed out");
                    stats.failed += batch.len();
                }
            }
        }
    }

    stats
}
