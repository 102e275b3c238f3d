use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span, warn};

use super::acquire;
use super::config::PoolConfig;
use super::error::{AcquireError, DrainError, InitError, ReleaseError};
use super::state::{PoolState, PoolStatus};
use crate::resource::Lease;
use crate::shared::Shared;

/// A timeout too large to represent as an `Instant` means no deadline.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

pub(crate) struct PoolInternal<T> {
    acquire_timeout: Option<Duration>,
    shared: Arc<Shared<T>>,
}

impl<T> Drop for PoolInternal<T> {
    fn drop(&mut self) {
        // Last pool handle is gone: nobody can acquire again, so close.
        // Outstanding leases keep the shared state alive and dispose on return.
        let disposed = self.shared.shutdown(PoolStatus::Closed);
        if disposed > 0 {
            debug!(pool = self.shared.name(), disposed, "resource pool dropped");
        }
    }
}

/// A fixed-capacity pool of resources of type `T`, created eagerly and handed
/// out as exclusive [`Lease`]s.
///
/// Cloning a `Pool` produces another handle to the same pool. The pool is
/// closed when the last handle is dropped.
pub struct Pool<T> {
    inner: Arc<PoolInternal<T>>,
}

impl<T: Send + 'static> Pool<T> {
    /// Create a pool holding `capacity` resources produced by `create`.
    /// See [`PoolConfig`] for more options.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if any call to `create` fails.
    pub fn new<C, E>(capacity: usize, create: C) -> Result<Self, InitError<E>>
    where
        C: Fn() -> Result<T, E> + 'static,
    {
        PoolConfig::new(create).capacity(capacity).build()
    }
}

impl<T> Pool<T> {
    pub(crate) fn new_shared(shared: Shared<T>, acquire_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(PoolInternal {
                acquire_timeout,
                shared: Arc::new(shared),
            }),
        }
    }

    fn shared(&self) -> &Arc<Shared<T>> {
        &self.inner.shared
    }

    /// Acquire a resource, blocking the current thread until one is idle.
    /// The configured acquire timeout applies, if any.
    ///
    /// # Errors
    ///
    /// [`AcquireError::PoolClosed`] if the pool is closed before or while
    /// waiting, [`AcquireError::Timeout`] if the configured timeout elapsed.
    pub fn acquire(&self) -> Result<Lease<T>, AcquireError> {
        let deadline = self.inner.acquire_timeout.and_then(deadline_after);
        self.acquire_inner(deadline)
    }

    /// Acquire a resource, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// See [`Pool::acquire`].
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<Lease<T>, AcquireError> {
        self.acquire_inner(deadline_after(timeout))
    }

    /// Acquire a resource, waiting no later than `deadline`.
    ///
    /// # Errors
    ///
    /// See [`Pool::acquire`].
    pub fn acquire_deadline(&self, deadline: Instant) -> Result<Lease<T>, AcquireError> {
        self.acquire_inner(Some(deadline))
    }

    fn acquire_inner(&self, deadline: Option<Instant>) -> Result<Lease<T>, AcquireError> {
        let _span = debug_span!("pool_acquire", pool = self.name()).entered();
        acquire::acquire_blocking(self.shared(), deadline)
    }

    /// Acquire a resource only if one is idle right now.
    ///
    /// # Errors
    ///
    /// [`AcquireError::WouldBlock`] if no resource is idle,
    /// [`AcquireError::PoolClosed`] if the pool is closed.
    pub fn try_acquire(&self) -> Result<Lease<T>, AcquireError> {
        acquire::acquire_now(self.shared())
    }

    /// Acquire a resource without blocking the thread. The configured acquire
    /// timeout does not apply; drop the future to stop waiting.
    ///
    /// # Errors
    ///
    /// [`AcquireError::PoolClosed`] if the pool is closed before or while
    /// waiting.
    pub async fn acquire_async(&self) -> Result<Lease<T>, AcquireError> {
        acquire::acquire_async(self.shared()).await
    }

    /// Return a lease to the pool. Equivalent to dropping it, except that a
    /// lease from another pool is reported.
    ///
    /// # Errors
    ///
    /// [`ReleaseError::ForeignLease`] if the lease was not issued by this
    /// pool. The lease is still returned to the pool that issued it.
    pub fn release(&self, lease: Lease<T>) -> Result<(), ReleaseError> {
        if Lease::issued_by(&lease, self.shared()) {
            drop(lease);
            Ok(())
        } else {
            warn!(
                pool = self.name(),
                id = Lease::info(&lease).id,
                "lease released to a pool that did not issue it"
            );
            drop(lease);
            Err(ReleaseError::ForeignLease)
        }
    }

    /// Close the pool immediately. Idle resources are disposed, waiting and
    /// future acquires fail with [`AcquireError::PoolClosed`], and resources
    /// still leased are disposed when they are returned. Calling this again
    /// has no further effect.
    pub fn close(&self) {
        let disposed = self.shared().shutdown(PoolStatus::Closed);
        debug!(pool = self.name(), disposed, "resource pool closed");
    }

    /// Stop admitting new acquires and wait up to `timeout` for outstanding
    /// leases to be returned. Every resource is disposed once it is returned.
    ///
    /// # Errors
    ///
    /// [`DrainError::Timeout`] if leases were still outstanding at the
    /// deadline. The pool stays closed to new acquires either way.
    pub fn drain(&self, timeout: Duration) -> Result<(), DrainError> {
        let deadline = deadline_after(timeout);
        let disposed = self.shared().shutdown(PoolStatus::Closing);
        debug!(pool = self.name(), disposed, "resource pool draining");
        self.shared()
            .wait_drained(deadline)
            .map_err(|outstanding| DrainError::Timeout { outstanding })?;
        debug!(pool = self.name(), "resource pool drained");
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.shared().capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.shared().status() != PoolStatus::Open
    }

    pub fn name(&self) -> &str {
        self.shared().name()
    }

    /// Fetch a snapshot of the pool counters.
    pub fn state(&self) -> PoolState {
        self.shared().state()
    }
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for Pool<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}
