//! Collaborator traits for the externally-owned stateful pieces.
//!
//! The core never holds conversation state or category data itself; it
//! talks to whatever implementation the host wires in through these narrow
//! interfaces.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::filter::CategoryId;
use crate::domain::session::ChatSession;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored document is corrupted: {0}")]
    Corrupted(String),
}

/// Narrow keyed access to conversation state. Implementations own
/// persistence and concurrency discipline (e.g. per-key serialization).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ChatSession>, StoreError>;
    async fn put(&self, session: ChatSession) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Resolves human-readable category names or slugs to store identifiers.
///
/// Matching is exact and case-insensitive on slug or display name;
/// unmatched entries are omitted, never an error. Resolution completes
/// before query compilation — its output feeds the categorical stage.
#[async_trait]
pub trait CategoryResolver: Send + Sync {
    async fn resolve(&self, names: &[String]) -> Result<Vec<CategoryId>, StoreError>;
}
