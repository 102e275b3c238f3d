use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use tracing::{debug, warn};

use super::error::InitError;
use super::state::PoolStatus;
use super::Pool;
use crate::resource::{ResourceInfo, Slot};
use crate::shared::{DisposeFn, Shared};

const DEFAULT_NAME: &str = "default";

type CreateFn<T, E> = Box<dyn Fn() -> Result<T, E>>;

/// Builder for a [`Pool`]. The create callback is invoked `capacity` times,
/// synchronously, by [`PoolConfig::build`].
pub struct PoolConfig<T, E> {
    acquire_timeout: Option<Duration>,
    capacity: usize,
    create: CreateFn<T, E>,
    name: Option<Cow<'static, str>>,
    on_dispose: Option<DisposeFn<T>>,
}

impl<T: Send + 'static, E> PoolConfig<T, E> {
    pub fn new<C>(create: C) -> Self
    where
        C: Fn() -> Result<T, E> + 'static,
    {
        Self {
            acquire_timeout: None,
            capacity: 0,
            create: Box::new(create),
            name: None,
            on_dispose: None,
        }
    }

    /// Default timeout applied by [`Pool::acquire`]. A zero duration clears it.
    pub fn acquire_timeout(mut self, val: Duration) -> Self {
        if val.as_micros() > 0 {
            self.acquire_timeout.replace(val);
        } else {
            self.acquire_timeout.take();
        }
        self
    }

    /// The fixed number of resources held by the pool. Must be non-zero.
    pub fn capacity(mut self, val: usize) -> Self {
        self.capacity = val;
        self
    }

    /// Called exactly once for every resource the pool disposes of. When not
    /// set, resources are simply dropped.
    pub fn dispose<F>(mut self, dispose: F) -> Self
    where
        F: Fn(T, ResourceInfo) + Send + Sync + 'static,
    {
        self.on_dispose.replace(Box::new(dispose));
        self
    }

    /// Label used for tracing output.
    pub fn name(mut self, val: impl Into<Cow<'static, str>>) -> Self {
        self.name.replace(val.into());
        self
    }

    /// Create every resource and return the open pool.
    ///
    /// # Panics
    ///
    /// If the capacity is zero.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if the create callback fails. Resources created
    /// before the failure are disposed first.
    pub fn build(self) -> Result<Pool<T>, InitError<E>> {
        let capacity = self.capacity;
        assert_ne!(capacity, 0, "pool capacity must be non-zero");
        let name = self.name.unwrap_or(Cow::Borrowed(DEFAULT_NAME));

        let mut idle = VecDeque::with_capacity(capacity);
        let mut failed = None;
        for index in 0..capacity {
            match (self.create)() {
                Ok(value) => idle.push_back(Slot::new(index, value)),
                Err(source) => {
                    failed.replace((index, source));
                    break;
                }
            }
        }

        let shared = Shared::new(name, capacity, self.on_dispose, idle);
        if let Some((index, source)) = failed {
            warn!(
                pool = shared.name(),
                index, capacity, "resource creation failed, disposing created resources"
            );
            shared.shutdown(PoolStatus::Closed);
            return Err(InitError {
                index,
                capacity,
                source,
            });
        }

        debug!(pool = shared.name(), capacity, "resource pool created");
        Ok(Pool::new_shared(shared, self.acquire_timeout))
    }
}

impl<T, E> Debug for PoolConfig<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("acquire_timeout", &self.acquire_timeout)
            .field("capacity", &self.capacity)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Refused;

    #[test]
    fn build_creates_in_order() {
        let next = Rc::new(Cell::new(0usize));
        let pool = PoolConfig::<usize, Refused>::new(move || {
            next.set(next.get() + 1);
            Ok(next.get())
        })
        .capacity(3)
        .name("ordered")
        .build()
        .unwrap();

        let state = pool.state();
        assert_eq!(state.capacity, 3);
        assert_eq!(state.idle, 3);
        assert_eq!(state.status, PoolStatus::Open);
        assert_eq!(pool.name(), "ordered");
        assert_eq!(*pool.try_acquire().unwrap(), 1);
    }

    #[test]
    fn build_failure_disposes_created() {
        let calls = Rc::new(Cell::new(0usize));
        let disposed = Arc::new(AtomicUsize::new(0));
        let dcopy = disposed.clone();
        let err = PoolConfig::new(move || {
            calls.set(calls.get() + 1);
            if calls.get() == 4 {
                Err(Refused)
            } else {
                Ok(calls.get())
            }
        })
        .capacity(6)
        .dispose(move |_res, _info| {
            dcopy.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap_err();

        assert_eq!(err.index, 3);
        assert_eq!(err.capacity, 6);
        assert_eq!(err.source, Refused);
        assert_eq!(disposed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn zero_acquire_timeout_clears() {
        let config = PoolConfig::<(), Refused>::new(|| Ok(()))
            .acquire_timeout(Duration::from_secs(1))
            .acquire_timeout(Duration::from_secs(0));
        assert!(config.acquire_timeout.is_none());
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = PoolConfig::<(), Refused>::new(|| Ok(())).build();
    }
}
