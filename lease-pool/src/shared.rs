use std::borrow::Cow;
use std::collections::VecDeque;
use std::mem;
use std::time::Instant;

use event_listener::{Event, EventListener, IntoNotification, Listener};
use parking_lot::Mutex;
use tracing::trace;

use crate::pool::{AcquireError, PoolState, PoolStatus};
use crate::resource::{ResourceInfo, Slot};

pub(crate) type DisposeFn<T> = Box<dyn Fn(T, ResourceInfo) + Send + Sync>;

struct SharedState<T> {
    idle: VecDeque<Slot<T>>,
    in_use: usize,
    status: PoolStatus,
}

/// The pool monitor. A single mutex guards the idle queue, the lease count and
/// the status, so the number of admissible acquires is always `idle.len()`.
pub(crate) struct Shared<T> {
    capacity: usize,
    drained: Event,
    name: Cow<'static, str>,
    on_dispose: Option<DisposeFn<T>>,
    released: Event,
    state: Mutex<SharedState<T>>,
}

impl<T> Shared<T> {
    pub fn new(
        name: Cow<'static, str>,
        capacity: usize,
        on_dispose: Option<DisposeFn<T>>,
        idle: VecDeque<Slot<T>>,
    ) -> Self {
        Self {
            capacity,
            drained: Event::new(),
            name,
            on_dispose,
            released: Event::new(),
            state: Mutex::new(SharedState {
                idle,
                in_use: 0,
                status: PoolStatus::Open,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register interest in the next release. Must be called before the
    /// final `try_take` of a wait loop so a release in between is not missed.
    pub fn listen(&self) -> EventListener {
        self.released.listen()
    }

    pub fn try_take(&self) -> Result<Option<Slot<T>>, AcquireError> {
        let mut state = self.state.lock();
        if state.status != PoolStatus::Open {
            return Err(AcquireError::PoolClosed);
        }
        let mut slot = match state.idle.pop_front() {
            Some(slot) => slot,
            None => return Ok(None),
        };
        state.in_use += 1;
        let idle = state.idle.len();
        drop(state);

        slot.info.acquire_count += 1;
        slot.info.last_acquire.replace(Instant::now());
        trace!(pool = %self.name, id = slot.info.id, idle, "resource acquired");
        Ok(Some(slot))
    }

    pub fn release(&self, mut slot: Slot<T>) {
        let mut state = self.state.lock();
        debug_assert!(state.in_use > 0, "release without a matching acquire");
        state.in_use -= 1;

        if state.status == PoolStatus::Open {
            // The slot came from this queue, so there is always room for it
            debug_assert!(state.idle.len() < self.capacity);
            slot.info.last_idle.replace(Instant::now());
            let id = slot.info.id;
            state.idle.push_back(slot);
            let idle = state.idle.len();
            drop(state);

            trace!(pool = %self.name, id, idle, "resource released");
            // Notify only once the slot is visible in the queue
            self.released.notify(1.additional());
        } else {
            if state.in_use == 0 && state.status == PoolStatus::Closing {
                state.status = PoolStatus::Closed;
            }
            let drained = state.in_use == 0;
            drop(state);

            trace!(pool = %self.name, id = slot.info.id, "resource returned after close");
            self.dispose(slot);
            if drained {
                self.drained.notify(usize::MAX);
            }
        }
    }

    /// Move the pool forward to `next` (never backward), wake every waiter and
    /// dispose of all idle resources. Returns the number disposed.
    pub fn shutdown(&self, next: PoolStatus) -> usize {
        let (idle, drained) = {
            let mut state = self.state.lock();
            if state.status < next {
                state.status = next;
            }
            if state.status == PoolStatus::Closing && state.in_use == 0 {
                state.status = PoolStatus::Closed;
            }
            (mem::take(&mut state.idle), state.in_use == 0)
        };

        self.released.notify(usize::MAX);

        let count = idle.len();
        for slot in idle {
            self.dispose(slot);
        }
        if drained {
            self.drained.notify(usize::MAX);
        }
        count
    }

    /// Block until no leases are outstanding, or the deadline (if any) passes.
    /// On timeout the number of outstanding leases is returned.
    pub fn wait_drained(&self, deadline: Option<Instant>) -> Result<(), usize> {
        loop {
            let listener = self.drained.listen();
            let in_use = self.state.lock().in_use;
            if in_use == 0 {
                return Ok(());
            }
            match deadline {
                Some(deadline) => {
                    if listener.wait_deadline(deadline).is_none() {
                        return match self.state.lock().in_use {
                            0 => Ok(()),
                            outstanding => Err(outstanding),
                        };
                    }
                }
                None => listener.wait(),
            }
        }
    }

    pub fn state(&self) -> PoolState {
        let state = self.state.lock();
        PoolState {
            capacity: self.capacity,
            idle: state.idle.len(),
            in_use: state.in_use,
            status: state.status,
        }
    }

    pub fn status(&self) -> PoolStatus {
        self.state.lock().status
    }

    fn dispose(&self, slot: Slot<T>) {
        match self.on_dispose.as_ref() {
            Some(dispose) => dispose(slot.value, slot.info),
            None => drop(slot.value),
        }
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // Normally empty: the last pool handle closes the pool before this
        let idle = mem::take(&mut self.state.get_mut().idle);
        for slot in idle {
            self.dispose(slot);
        }
    }
}
