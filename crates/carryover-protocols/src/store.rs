//! Persisted key/value state.
//!
//! The router never touches ambient global storage; a store is injected so
//! tests can substitute an in-memory implementation.

use async_trait::async_trait;

use crate::error::StoreError;

/// Fixed keys of the persisted state. No versioning or migration.
pub mod keys {
    /// The last Conversation Snapshot. Last write wins.
    pub const CONVERSATION: &str = "conversation";
    /// Free-text, user-authored context.
    pub const USER_CONTEXT: &str = "user_context";
}

/// Core trait for key/value stores.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the backend ID.
    fn id(&self) -> &str;

    /// Read a value. Missing keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
