//! Debounced snapshot writer.
//!
//! Holds at most one pending write. Scheduling a newer state version
//! supersedes the pending one and restarts the quiet period, so a burst of
//! transitions produces a single store write once the burst settles.
//! Dropping the writer cancels whatever is still pending.

use crate::model::state::AppState;
use crate::store::kv_store::SnapshotStore;
use crate::store::snapshot::encode_state;
use log::{debug, warn};
use std::time::{Duration, Instant};

/// Outcome of one flushed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Written { version: u64 },
    /// Store rejected the write; the failure was logged.
    Failed { version: u64 },
}

impl FlushOutcome {
    pub fn version(self) -> u64 {
        match self {
            Self::Written { version } | Self::Failed { version } => version,
        }
    }
}

#[derive(Debug)]
struct PendingWrite {
    version: u64,
    due_at: Instant,
    payload: String,
}

/// Single-slot write coalescer over a `SnapshotStore`.
pub struct DebouncedWriter<S: SnapshotStore> {
    store: S,
    key: String,
    quiet_period: Duration,
    pending: Option<PendingWrite>,
}

impl<S: SnapshotStore> DebouncedWriter<S> {
    pub fn new(store: S, key: impl Into<String>, quiet_period: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            quiet_period,
            pending: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Version captured by the pending write, if any.
    pub fn pending_version(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.version)
    }

    /// When the pending write becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Schedules `state` as `version`, due one quiet period after `now`.
    ///
    /// The snapshot is encoded eagerly so later transitions cannot leak into
    /// this write. An encode failure drops the slot and is logged.
    pub fn schedule_at(&mut self, state: &AppState, version: u64, now: Instant) {
        let payload = match encode_state(state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=persist_schedule module=store status=error version={version} error_code=snapshot_encode_failed error={err}"
                );
                self.pending = None;
                return;
            }
        };

        let next = PendingWrite {
            version,
            due_at: now + self.quiet_period,
            payload,
        };
        if let Some(previous) = self.pending.replace(next) {
            debug!(
                "event=persist_superseded module=store superseded_version={} version={version}",
                previous.version
            );
        }
    }

    /// Writes the pending snapshot if its quiet period has elapsed.
    pub fn flush_due(&mut self, now: Instant) -> Option<FlushOutcome> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| self.write(pending))
    }

    /// Writes the pending snapshot immediately, ignoring the quiet period.
    pub fn flush_now(&mut self) -> Option<FlushOutcome> {
        self.pending.take().map(|pending| self.write(pending))
    }

    /// Discards the pending write. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!(
                    "event=persist_cancel module=store version={}",
                    pending.version
                );
                true
            }
            None => false,
        }
    }

    fn write(&self, pending: PendingWrite) -> FlushOutcome {
        let started_at = Instant::now();
        match self.store.write(&self.key, &pending.payload) {
            Ok(()) => {
                debug!(
                    "event=persist_flush module=store status=ok version={} bytes={} duration_ms={}",
                    pending.version,
                    pending.payload.len(),
                    started_at.elapsed().as_millis()
                );
                FlushOutcome::Written {
                    version: pending.version,
                }
            }
            Err(err) => {
                warn!(
                    "event=persist_flush module=store status=error version={} error_code=snapshot_write_failed error={err}",
                    pending.version
                );
                FlushOutcome::Failed {
                    version: pending.version,
                }
            }
        }
    }
}

impl<S: SnapshotStore> Drop for DebouncedWriter<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{DebouncedWriter, FlushOutcome};
    use crate::model::state::{AppState, Theme};
    use crate::store::kv_store::{MemorySnapshotStore, SnapshotStore};
    use std::time::{Duration, Instant};

    const QUIET: Duration = Duration::from_millis(100);

    #[test]
    fn burst_collapses_into_one_write_of_latest_version() {
        let store = MemorySnapshotStore::new();
        let mut writer = DebouncedWriter::new(&store, "state", QUIET);
        let start = Instant::now();
        let light = AppState::initial(Theme::Light);
        let dark = AppState::initial(Theme::Dark);

        writer.schedule_at(&light, 1, start);
        writer.schedule_at(&dark, 2, start + Duration::from_millis(60));

        // First deadline passed, but it was superseded and restarted.
        assert_eq!(writer.flush_due(start + Duration::from_millis(120)), None);

        let outcome = writer.flush_due(start + Duration::from_millis(160));
        assert_eq!(outcome, Some(FlushOutcome::Written { version: 2 }));
        assert_eq!(store.write_count(), 1);
        let stored = store
            .read("state")
            .expect("read should succeed")
            .expect("value should be stored");
        assert!(stored.contains("\"theme\":\"dark\""));
        assert!(!writer.is_pending());
    }

    #[test]
    fn cancel_and_drop_discard_pending_write() {
        let store = MemorySnapshotStore::new();
        let now = Instant::now();
        {
            let mut writer = DebouncedWriter::new(&store, "state", QUIET);
            writer.schedule_at(&AppState::default(), 1, now);
            assert!(writer.cancel());
            assert!(!writer.cancel());

            writer.schedule_at(&AppState::default(), 2, now);
        }
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn flush_now_ignores_quiet_period() {
        let store = MemorySnapshotStore::new();
        let mut writer = DebouncedWriter::new(&store, "state", QUIET);
        let now = Instant::now();
        writer.schedule_at(&AppState::default(), 7, now);
        assert_eq!(writer.pending_version(), Some(7));
        assert_eq!(writer.next_deadline(), Some(now + QUIET));

        assert_eq!(writer.flush_now(), Some(FlushOutcome::Written { version: 7 }));
        assert_eq!(writer.flush_now(), None);
    }
}
