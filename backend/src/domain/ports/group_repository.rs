//! Driven port for group persistence adapters.

use async_trait::async_trait;

use crate::domain::{Group, GroupId};

use super::define_store_error;

define_store_error! {
    /// Persistence errors raised by group store adapters.
    pub enum GroupStoreError {
        /// Store connection could not be established.
        Connection => "group store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "group store query failed: {message}",
        /// Stored document could not be encoded or decoded.
        Serialization => "group store serialization failed: {message}",
    }
}

/// Store contract for group documents, keyed by [`GroupId`].
///
/// `find_by_id` reports a miss as `Ok(None)` rather than an error; the
/// verification layer converts the miss into a domain `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupStoreError>;

    /// Fetch every stored group.
    async fn find_all(&self) -> Result<Vec<Group>, GroupStoreError>;

    /// Persist a new group document.
    async fn create(&self, group: &Group) -> Result<(), GroupStoreError>;

    /// Replace the stored document for `id` with `group`.
    ///
    /// This is a full-document write with no concurrency check; concurrent
    /// writers race and the last one wins.
    async fn update(&self, id: &GroupId, group: &Group) -> Result<(), GroupStoreError>;

    /// Delete a group, returning whether a document existed.
    async fn delete(&self, id: &GroupId) -> Result<bool, GroupStoreError>;
}
