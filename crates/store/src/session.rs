use std::sync::{Arc, Weak};

use crate::error::{SessionClosedSnafu, StoreResult};
use crate::store::ChatStore;
use crate::types::InitialState;

/// Owns the single [`ChatStore`] instance for one demo session.
///
/// Constructed once when the root mounts and dropped when it unmounts.
/// Consumers never hold the store directly; they go through [`ChatHandle`]s,
/// which fail loudly once the session is gone instead of silently serving
/// stale state.
pub struct ChatSession {
    store: Arc<ChatStore>,
}

impl ChatSession {
    pub fn new(initial: InitialState) -> StoreResult<Self> {
        let store = Arc::new(ChatStore::new(initial)?);
        tracing::info!("chat session started");
        Ok(Self { store })
    }

    pub fn handle(&self) -> ChatHandle {
        ChatHandle {
            store: Arc::downgrade(&self.store),
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        tracing::info!("chat session torn down");
    }
}

/// Weak accessor handed to presentation consumers.
#[derive(Clone)]
pub struct ChatHandle {
    store: Weak<ChatStore>,
}

impl ChatHandle {
    /// Resolves the live store. Using a handle before its session exists or
    /// after it was torn down is a construction-order bug, so it surfaces as
    /// an error rather than a default value.
    pub fn store(&self) -> StoreResult<Arc<ChatStore>> {
        match self.store.upgrade() {
            Some(store) => Ok(store),
            None => {
                tracing::error!("chat handle used outside its session's lifetime");
                SessionClosedSnafu {
                    stage: "upgrade-chat-handle",
                }
                .fail()
            }
        }
    }
}
