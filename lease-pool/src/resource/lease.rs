use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::{ResourceInfo, Slot};
use crate::shared::Shared;

/// Exclusive ownership of a pooled resource. The resource is returned to the
/// pool that issued it when the lease is dropped.
pub struct Lease<T> {
    shared: Arc<Shared<T>>,
    slot: Option<Slot<T>>,
}

impl<T> Lease<T> {
    pub(crate) fn new(slot: Slot<T>, shared: Arc<Shared<T>>) -> Self {
        Self {
            shared,
            slot: Some(slot),
        }
    }

    pub fn info(lease: &Self) -> &ResourceInfo {
        &lease.slot().info
    }

    pub(crate) fn issued_by(lease: &Self, shared: &Arc<Shared<T>>) -> bool {
        Arc::ptr_eq(&lease.shared, shared)
    }

    fn slot(&self) -> &Slot<T> {
        // only taken in drop
        self.slot.as_ref().expect("lease already released")
    }
}

impl<T: Debug> Debug for Lease<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Lease")
                .field("value", self.deref())
                .field("info", Lease::info(self))
                .finish()
        } else {
            Debug::fmt(self.deref(), f)
        }
    }
}

impl<T: Display> Display for Lease<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self.deref(), f)
    }
}

impl<T> Deref for Lease<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.slot().value
    }
}

impl<T> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self
            .slot
            .as_mut()
            .expect("lease already released")
            .value
    }
}

impl<T> Drop for Lease<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.shared.release(slot);
        }
    }
}
