//! Read-through cache keyed by endpoint path.
//!
//! Concurrent reads of one key share a single load. Successful loads stay
//! cached until a write invalidates the key; failed loads are never cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;

/// Where a key stands, as seen by a list component.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<V> {
    /// Nothing requested yet, or invalidated since.
    Idle,
    /// A load is in flight.
    Pending,
    Ready(V),
    /// The last load failed; carries a user-facing message.
    Failed(String),
}

type Slot<V> = Arc<OnceCell<V>>;

pub struct QueryCache<V> {
    entries: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<V>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached value for `key`, running `load` only if no value is cached
    /// and no other caller is already loading it.
    pub async fn fetch<F, Fut, E>(&self, key: &str, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = {
            let mut entries = self.lock();
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        match slot.get_or_try_init(load).await {
            Ok(value) => Ok(value.clone()),
            Err(e) => {
                let mut entries = self.lock();
                let unresolved = entries
                    .get(key)
                    .map(|current| Arc::ptr_eq(current, &slot) && current.get().is_none())
                    .unwrap_or(false);
                if unresolved {
                    entries.remove(key);
                }
                Err(e)
            }
        }
    }

    pub fn state(&self, key: &str) -> QueryState<V> {
        match self.lock().get(key) {
            None => QueryState::Idle,
            Some(slot) => match slot.get() {
                Some(value) => QueryState::Ready(value.clone()),
                None => QueryState::Pending,
            },
        }
    }

    /// Drops `key`. Loads already in flight finish but their result is discarded.
    pub fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Drops every key starting with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.lock().retain(|key, _| !key.starts_with(prefix));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache keys for every cached read, named after the endpoint serving it.
pub mod keys {
    pub const ADMIN_OVERVIEW: &str = "/api/admin/overview";
    pub const ADMIN_SCHOOLS: &str = "/api/admin/schools";
    pub const ADMIN_STUDENTS: &str = "/api/admin/students";
    pub const STUDENT_FUNDRAISERS: &str = "/api/student/fundraisers";
    pub const NOTIFICATIONS: &str = "/api/notifications";

    pub fn sales_summary(school_id: i32) -> String {
        format!("/api/school/sales-summary?school={}", school_id)
    }

    pub fn school_fundraisers(school_id: i32) -> String {
        format!("/api/school/fundraisers?school={}", school_id)
    }

    pub fn school_students(school_id: i32) -> String {
        format!("/api/school/students?school={}", school_id)
    }

    /// Keyed by the student's user id, like the other per-user reads.
    pub fn student_fundraisers(user_id: i32) -> String {
        format!("{}?user={}", STUDENT_FUNDRAISERS, user_id)
    }

    pub fn notifications(user_id: i32) -> String {
        format!("{}?user={}", NOTIFICATIONS, user_id)
    }

    pub fn user_info(user_id: i32) -> String {
        format!("/api/user/info?user={}", user_id)
    }

    /// Every key owned by one user, dropped when that user signs out.
    pub fn user_scoped(user_id: i32) -> [String; 3] {
        [
            user_info(user_id),
            notifications(user_id),
            student_fundraisers(user_id),
        ]
    }
}
