//! Per-cart mutation gate.
//!
//! Every mutating cart operation holds a permit for its cart ID (or for the
//! owner scope before a cart exists). A second mutation on the same key while
//! the permit is alive is refused with [`CartError::Busy`] instead of racing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::CartError;

/// Shared set of keys with a mutation in flight. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct MutationGate {
    held: Arc<Mutex<HashSet<String>>>,
}

impl MutationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the permit for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Busy`] if another mutation holds the key.
    pub fn try_acquire(&self, key: impl Into<String>) -> Result<MutationPermit, CartError> {
        let key = key.into();
        let inserted = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        if inserted {
            Ok(MutationPermit {
                held: Arc::clone(&self.held),
                key,
            })
        } else {
            debug!(key = %key, "Rejecting overlapping cart mutation");
            Err(CartError::Busy)
        }
    }

    #[cfg(test)]
    fn is_held(&self, key: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct MutationPermit {
    held: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl MutationPermit {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_busy() {
        let gate = MutationGate::new();
        let permit = gate.try_acquire("cart-1");
        assert!(permit.is_ok());
        assert!(matches!(gate.try_acquire("cart-1"), Err(CartError::Busy)));
    }

    #[test]
    fn test_keys_are_independent() {
        let gate = MutationGate::new();
        let _a = gate.try_acquire("cart-1");
        assert!(gate.try_acquire("cart-2").is_ok());
    }

    #[test]
    fn test_drop_releases_key() {
        let gate = MutationGate::new();
        {
            let permit = gate.try_acquire("cart-1");
            assert!(permit.is_ok());
            assert!(gate.is_held("cart-1"));
        }
        assert!(!gate.is_held("cart-1"));
        assert!(gate.try_acquire("cart-1").is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = MutationGate::new();
        let other = gate.clone();
        let _permit = gate.try_acquire("cart-1");
        assert!(matches!(other.try_acquire("cart-1"), Err(CartError::Busy)));
    }
}
