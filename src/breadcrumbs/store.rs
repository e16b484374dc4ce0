//! # Ordered breadcrumb store.
//!
//! [`BreadcrumbStore`] is the append log shared by every producer of one collector.
//! It is an explicitly owned instance (usually behind an `Arc`) rather than a
//! process-wide static.
//!
//! ## Rules
//! - `add` is total and atomic: the sequence number is assigned under the same lock
//!   that appends, so snapshot order equals the linearization of `add` calls.
//! - With a bound, the oldest record is evicted once the store is full (ring buffer);
//!   evictions are counted.
//! - `snapshot` never mutates; `drain` empties the store (used by the flusher).
//!
//! ## Example
//! ```rust
//! use telelogger::{Breadcrumb, BreadcrumbStore, Category};
//!
//! let store = BreadcrumbStore::bounded(2);
//! for path in ["/a", "/b", "/c"] {
//!     store.add(Breadcrumb::new(Category::Route).with_data("route", path));
//! }
//!
//! let crumbs = store.snapshot();
//! assert_eq!(crumbs.len(), 2);
//! assert_eq!(crumbs[0].data["route"], "/b");
//! assert_eq!(store.evicted(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use super::Breadcrumb;

struct Inner {
    items: VecDeque<Breadcrumb>,
    next_seq: u64,
    evicted: u64,
}

/// Thread-safe, insertion-ordered breadcrumb log.
pub struct BreadcrumbStore {
    inner: Mutex<Inner>,
    capacity: Option<usize>,
}

impl BreadcrumbStore {
    /// Creates a store; `None` means unbounded. A bound of zero is raised to 1.
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity.map(|n| n.max(1));
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity.unwrap_or(0)),
                next_seq: 0,
                evicted: 0,
            }),
            capacity,
        }
    }

    /// Creates a store that grows without limit.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Creates a ring buffer holding at most `capacity` records.
    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    /// Appends a record, stamping its `seq` and `at`.
    pub fn add(&self, mut crumb: Breadcrumb) {
        let mut inner = self.lock();
        crumb.seq = inner.next_seq;
        crumb.at = SystemTime::now();
        inner.next_seq += 1;

        if let Some(cap) = self.capacity {
            while inner.items.len() >= cap {
                inner.items.pop_front();
                inner.evicted += 1;
            }
        }
        inner.items.push_back(crumb);
    }

    /// Returns every retained record in append order.
    pub fn snapshot(&self) -> Vec<Breadcrumb> {
        self.lock().items.iter().cloned().collect()
    }

    /// Removes and returns every retained record in append order.
    pub fn drain(&self) -> Vec<Breadcrumb> {
        self.lock().items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Returns the configured bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns how many records were evicted by the bound so far.
    pub fn evicted(&self) -> u64 {
        self.lock().evicted
    }

    // A panic while holding the lock leaves `Inner` consistent (every mutation is a
    // single push/pop), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BreadcrumbStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl std::fmt::Debug for BreadcrumbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbStore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
