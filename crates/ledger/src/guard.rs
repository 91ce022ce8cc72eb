//! Reentrancy guard
//!
//! A per-ledger entered flag, set for the duration of any state-mutating
//! public operation and released on every exit path. The engine does not
//! rely on the guard alone: balance effects are committed before external
//! transfers, so a reentrant call would observe already-updated state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::LedgerError;

/// Per-instance re-entry flag
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    entered: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the protected section entered.
    ///
    /// Fails with [`LedgerError::Reentrancy`] if a protected operation is
    /// already executing on this ledger instance. The returned guard
    /// releases the flag when dropped, including on error paths.
    pub fn enter(&self) -> Result<EnterGuard, LedgerError> {
        if self.entered.swap(true, Ordering::Acquire) {
            return Err(LedgerError::Reentrancy);
        }
        Ok(EnterGuard {
            entered: Arc::clone(&self.entered),
        })
    }
}

/// RAII release of the re-entry flag
#[derive(Debug)]
pub struct EnterGuard {
    entered: Arc<AtomicBool>,
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_entry_rejected() {
        let guard = ReentrancyGuard::new();
        let held = guard.enter().unwrap();
        assert_eq!(guard.enter().unwrap_err(), LedgerError::Reentrancy);
        drop(held);
        assert!(guard.enter().is_ok());
    }

    #[test]
    fn test_released_on_error_path() {
        let guard = ReentrancyGuard::new();
        {
            let _held = guard.enter().unwrap();
            // simulated failing operation: guard dropped at scope end
        }
        assert!(guard.enter().is_ok());
    }

    #[test]
    fn test_clones_share_the_flag() {
        let guard = ReentrancyGuard::new();
        let alias = guard.clone();
        let _held = guard.enter().unwrap();
        assert_eq!(alias.enter().unwrap_err(), LedgerError::Reentrancy);
    }
}
