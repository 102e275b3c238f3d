use std::time::Instant;

mod lease;
pub use lease::Lease;

/// Bookkeeping carried alongside every pooled resource.
#[derive(Copy, Clone, Debug)]
pub struct ResourceInfo {
    /// Position in creation order, starting at zero. Stable for the life of
    /// the resource.
    pub id: usize,
    pub created_at: Instant,
    /// How many leases have been issued for this resource.
    pub acquire_count: usize,
    pub last_acquire: Option<Instant>,
    pub last_idle: Option<Instant>,
}

impl ResourceInfo {
    pub(crate) fn new(id: usize) -> Self {
        let now = Instant::now();
        Self {
            id,
            created_at: now,
            acquire_count: 0,
            last_acquire: None,
            last_idle: Some(now),
        }
    }
}

/// A resource together with its info, as stored in the idle queue.
pub(crate) struct Slot<T> {
    pub info: ResourceInfo,
    pub value: T,
}

impl<T> Slot<T> {
    pub fn new(id: usize, value: T) -> Self {
        Self {
            info: ResourceInfo::new(id),
            value,
        }
    }
}
