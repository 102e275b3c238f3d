use std::sync::Arc;
use std::time::Instant;

use event_listener::Listener;

use super::error::AcquireError;
use crate::resource::Lease;
use crate::shared::Shared;

fn try_lease<T>(shared: &Arc<Shared<T>>) -> Result<Option<Lease<T>>, AcquireError> {
    Ok(shared
        .try_take()?
        .map(|slot| Lease::new(slot, shared.clone())))
}

pub(crate) fn acquire_now<T>(shared: &Arc<Shared<T>>) -> Result<Lease<T>, AcquireError> {
    try_lease(shared)?.ok_or(AcquireError::WouldBlock)
}

/// Park the current thread until a resource is idle, the pool closes, or the
/// deadline (if any) passes.
pub(crate) fn acquire_blocking<T>(
    shared: &Arc<Shared<T>>,
    deadline: Option<Instant>,
) -> Result<Lease<T>, AcquireError> {
    loop {
        if let Some(lease) = try_lease(shared)? {
            return Ok(lease);
        }

        // Register before checking again, so a release in between still
        // reaches this listener
        let listener = shared.listen();
        if let Some(lease) = try_lease(shared)? {
            return Ok(lease);
        }

        match deadline {
            Some(deadline) => {
                if listener.wait_deadline(deadline).is_none() {
                    // One last look in case a release raced the timer
                    return try_lease(shared)?.ok_or(AcquireError::Timeout);
                }
            }
            None => listener.wait(),
        }
    }
}

/// Asynchronous version of `acquire_blocking` without a deadline. Dropping
/// the future abandons the wait; a notification it already received is
/// passed on to another waiter.
pub(crate) async fn acquire_async<T>(shared: &Arc<Shared<T>>) -> Result<Lease<T>, AcquireError> {
    loop {
        if let Some(lease) = try_lease(shared)? {
            return Ok(lease);
        }

        let listener = shared.listen();
        if let Some(lease) = try_lease(shared)? {
            return Ok(lease);
        }

        listener.await;
    }
}
