//! Persistence of the active cart ID.
//!
//! A returning visitor's cart is found again through a single named slot,
//! [`CART_ID_SLOT`]. Where that slot lives depends on the front end: a JSON
//! file for the CLI, the visitor's session for the HTTP server, or nowhere at
//! all when persistent storage is unavailable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::CartId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;

/// Name of the slot holding the active cart ID.
pub const CART_ID_SLOT: &str = "shopify_cart_id";

/// File name used by [`FileCartIdStore`] inside its state directory.
const STATE_FILE: &str = "cart.json";

/// Errors reading or writing the stored cart ID.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Where the active cart ID is remembered between visits.
#[async_trait]
pub trait CartIdStore: Send + Sync {
    /// The remembered cart ID, if any.
    async fn stored_id(&self) -> Result<Option<CartId>, StorageError>;

    /// Remember `id`, replacing any previous value.
    async fn store_id(&self, id: &CartId) -> Result<(), StorageError>;

    /// Forget the remembered cart ID.
    async fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// File store
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    #[serde(rename = "shopify_cart_id")]
    cart_id: CartId,
    updated_at: DateTime<Utc>,
}

/// Keeps the cart ID in `<state_dir>/cart.json`.
#[derive(Debug, Clone)]
pub struct FileCartIdStore {
    path: PathBuf,
}

impl FileCartIdStore {
    #[must_use]
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(STATE_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CartIdStore for FileCartIdStore {
    async fn stored_id(&self) -> Result<Option<CartId>, StorageError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state: StateFile = serde_json::from_slice(&contents)?;
        Ok(Some(state.cart_id))
    }

    async fn store_id(&self, id: &CartId) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let state = StateFile {
            cart_id: id.clone(),
            updated_at: Utc::now(),
        };
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&state)?).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Session store
// =============================================================================

/// Keeps the cart ID in the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionCartIdStore {
    session: Session,
}

impl SessionCartIdStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartIdStore for SessionCartIdStore {
    async fn stored_id(&self) -> Result<Option<CartId>, StorageError> {
        Ok(self.session.get::<CartId>(CART_ID_SLOT).await?)
    }

    async fn store_id(&self, id: &CartId) -> Result<(), StorageError> {
        self.session.insert(CART_ID_SLOT, id).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.session.remove::<CartId>(CART_ID_SLOT).await?;
        Ok(())
    }
}

// =============================================================================
// Disabled store
// =============================================================================

/// Remembers nothing. Used where no persistent storage exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCartIdStore;

#[async_trait]
impl CartIdStore for DisabledCartIdStore {
    async fn stored_id(&self) -> Result<Option<CartId>, StorageError> {
        Ok(None)
    }

    async fn store_id(&self, _id: &CartId) -> Result<(), StorageError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartIdStore::new(dir.path().join("nested"));

        assert_eq!(store.stored_id().await.unwrap(), None);

        let id = CartId::new("gid://shopify/Cart/abc?key=1");
        store.store_id(&id).await.unwrap();
        assert_eq!(store.stored_id().await.unwrap(), Some(id));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"shopify_cart_id\""));

        store.clear().await.unwrap();
        assert_eq!(store.stored_id().await.unwrap(), None);
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartIdStore::new(dir.path());
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(matches!(
            store.stored_id().await,
            Err(StorageError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_session_store_round_trip() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = SessionCartIdStore::new(session.clone());

        let id = CartId::new("gid://shopify/Cart/xyz");
        store.store_id(&id).await.unwrap();
        assert_eq!(
            session.get::<String>(CART_ID_SLOT).await.unwrap().as_deref(),
            Some("gid://shopify/Cart/xyz")
        );

        store.clear().await.unwrap();
        assert_eq!(store.stored_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_disabled_store_remembers_nothing() {
        let store = DisabledCartIdStore;
        store.store_id(&CartId::new("c")).await.unwrap();
        assert_eq!(store.stored_id().await.unwrap(), None);
    }
}
