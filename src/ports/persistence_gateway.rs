//! Persistence gateway port.

use async_trait::async_trait;

use crate::domain::foundation::StorageError;

/// Transaction-boundary control of the host's persistence layer.
///
/// # Contract
///
/// Implementations must:
/// - Make all staged creations and updates durably visible on `flush`;
///   reads issued after a successful flush observe them
/// - Stop tracking in-memory objects on `clear_tracking`, so records that
///   were detached and mutated afterwards are not written back by later
///   operations in the same flow
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Flushes all pending persistence changes.
    async fn flush(&self) -> Result<(), StorageError>;

    /// Resets persistence-layer object tracking.
    async fn clear_tracking(&self) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_gateway_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn PersistenceGateway) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn PersistenceGateway>>();
    }
}
