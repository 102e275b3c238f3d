//! Error types returned by pool operations.

/// An error during resource acquisition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AcquireError {
    /// The pool is closed or draining
    #[error("the resource pool is closed")]
    PoolClosed,
    /// No resource was idle, and a non-blocking acquire was requested
    #[error("acquisition from the pool would block")]
    WouldBlock,
    /// No resource became idle before the deadline
    #[error("the acquire timed out")]
    Timeout,
}

/// A resource could not be created while building the pool. Every resource
/// created before the failure has already been disposed.
#[derive(Debug, thiserror::Error)]
#[error("failed to create resource {} of {capacity}", .index + 1)]
pub struct InitError<E> {
    /// Zero-based index of the failed call to the create callback. This is
    /// also the number of resources that were created and then disposed.
    pub index: usize,
    pub capacity: usize,
    #[source]
    pub source: E,
}

impl<E> InitError<E> {
    pub fn into_source(self) -> E {
        self.source
    }
}

/// A lease was returned incorrectly.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReleaseError {
    /// The lease was issued by a different pool. It has been returned to its
    /// own pool instead.
    #[error("the lease was issued by a different pool")]
    ForeignLease,
}

/// A graceful drain did not finish in time.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DrainError {
    #[error("drain timed out with {outstanding} leases outstanding")]
    Timeout { outstanding: usize },
}
