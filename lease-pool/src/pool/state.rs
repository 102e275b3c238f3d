/// Lifecycle of a pool. Only ever moves forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolStatus {
    /// Acquire and release both succeed normally.
    Open,
    /// Draining: new acquires are rejected while outstanding leases finish.
    Closing,
    /// Terminal. Resources returned from outstanding leases are disposed.
    Closed,
}

/// A snapshot of the pool counters, taken under the pool lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// Total number of resources created for the pool.
    pub capacity: usize,
    /// Resources waiting in the pool to be acquired.
    pub idle: usize,
    /// Resources currently held by a `Lease`.
    pub in_use: usize,
    pub status: PoolStatus,
}
