use crate::error::{AdbxError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows at most one outstanding transfer per session
#[derive(Debug, Clone, Default)]
pub struct TransferGate {
    busy: Arc<AtomicBool>,
}

impl TransferGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn try_acquire(&self) -> Result<TransferPermit> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(AdbxError::TransferInProgress);
        }
        Ok(TransferPermit {
            busy: self.busy.clone(),
        })
    }
}

/// Held by the running transfer; releases the gate on drop
#[derive(Debug)]
pub struct TransferPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for TransferPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
