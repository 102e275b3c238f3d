//! A fixed-capacity, thread-safe resource pool.
//!
//! Every resource is created up front by [`PoolConfig::build`] (or
//! [`Pool::new`]) and handed out as an exclusive [`Lease`]. When no resource
//! is idle, [`Pool::acquire`] blocks until a lease is dropped or the pool is
//! closed. [`Pool::acquire_async`] waits without blocking the thread.
//!
//! ```
//! use lease_pool::Pool;
//!
//! let pool = Pool::new(2, || Ok::<_, std::io::Error>(String::from("conn"))).unwrap();
//! let lease = pool.acquire().unwrap();
//! assert_eq!(*lease, "conn");
//! assert_eq!(pool.state().in_use, 1);
//! drop(lease);
//! pool.close();
//! assert!(pool.acquire().is_err());
//! ```

mod pool;
pub use self::pool::{
    AcquireError, DrainError, InitError, Pool, PoolConfig, PoolState, PoolStatus, ReleaseError,
};

mod resource;
pub use self::resource::{Lease, ResourceInfo};

mod shared;
