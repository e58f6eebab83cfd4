//! Backup-dirty signalling.
//!
//! The store raises [`BackupSignal::data_changed`] once per successful
//! write. A backup coordinator reads and clears the flag when it runs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::trace;

/// Sink for "persisted state changed, a backup is due".
pub trait BackupSignal: Send + Sync {
    fn data_changed(&self);
}

/// Process-lifetime dirty flag with a running count of signals.
#[derive(Debug, Default)]
pub struct BackupFlag {
    dirty: AtomicBool,
    signals: AtomicU64,
}

impl BackupFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Total signals raised since creation.
    #[must_use]
    pub fn signal_count(&self) -> u64 {
        self.signals.load(Ordering::Acquire)
    }

    /// Clear the dirty bit, returning whether it was set.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl BackupSignal for BackupFlag {
    fn data_changed(&self) {
        let count = self.signals.fetch_add(1, Ordering::AcqRel) + 1;
        self.dirty.store(true, Ordering::Release);
        trace!(count, "Backup marked dirty");
    }
}
