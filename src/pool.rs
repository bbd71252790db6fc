//! Object pool for reusable object-key scratch buffers.
//!
//! Built from the general "cheap interior mutability over a `Mutex`"
//! idiom rather than any one borrowed file: scratch buffers are checked
//! out, filled, sorted, and returned on drop so the object encoder
//! doesn't allocate a fresh `Vec` on every call.

use std::sync::{Arc, Mutex};

/// A thread-safe pool of reusable `Vec<String>` scratch buffers, used by
/// the object encoder to collect and sort an object's keys without
/// allocating a fresh `Vec` on every call.
///
/// Cloning a `Pool` is cheap and shares the same backing buffers — build
/// one per process (or per tenant) and clone it into every [`crate::Config`]
/// that should share it.
#[derive(Clone, Debug)]
pub struct Pool {
    inner: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Default for Pool {
    fn default() -> Self {
        Pool {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Pool {
    pub fn new() -> Pool {
        Pool::default()
    }

    /// Check out a scratch buffer. Never visible to any other caller
    /// until it's returned by dropping the guard.
    pub fn get(&self) -> PoolGuard {
        let buf = self
            .inner
            .lock()
            .expect("collate key pool mutex poisoned")
            .pop()
            .unwrap_or_default();
        PoolGuard {
            pool: self.clone(),
            buf: Some(buf),
        }
    }

    fn put(&self, mut buf: Vec<String>) {
        buf.clear();
        self.inner
            .lock()
            .expect("collate key pool mutex poisoned")
            .push(buf);
    }
}

/// RAII handle for a checked-out scratch buffer. Returns the buffer to
/// its pool on drop (truncated to zero length, capacity retained) so a
/// panicking caller can't leak a permanently-missing slot.
pub struct PoolGuard {
    pool: Pool,
    buf: Option<Vec<String>>,
}

impl std::ops::Deref for PoolGuard {
    type Target = Vec<String>;
    fn deref(&self) -> &Vec<String> {
        self.buf.as_ref().expect("PoolGuard used after drop")
    }
}

impl std::ops::DerefMut for PoolGuard {
    fn deref_mut(&mut self) -> &mut Vec<String> {
        self.buf.as_mut().expect("PoolGuard used after drop")
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.put(buf);
        }
    }
}
