//! The `Resource` contract shared by every cacheable CPU-side artifact.
//!
//! A resource carries a monotonically increasing version counter and a
//! list of pre-destruct callbacks invoked exactly once, immediately
//! before its storage is released. Caches use the callback to schedule
//! GPU-side eviction without polling; see [`crate::cache`].

use std::sync::Mutex;

/// Subscription handle returned by [`Resource::on_before_destruct`].
pub type SubId = u64;

type BoxedCallback = Box<dyn FnMut() + Send>;

/// Shared pre-destruct subscriber list and version counter.
///
/// Embed this in every concrete resource type (`Geometry`, `Texture`,
/// `Material`, `Sampler`) rather than reimplementing the bookkeeping.
pub struct ResourceState {
    version: Mutex<u64>,
    subscribers: Mutex<Vec<(SubId, BoxedCallback)>>,
    next_sub_id: Mutex<SubId>,
}

impl ResourceState {
    pub fn new() -> Self {
        Self {
            version: Mutex::new(0),
            subscribers: Mutex::new(Vec::new()),
            next_sub_id: Mutex::new(0),
        }
    }

    pub fn current_version(&self) -> u64 {
        *self.version.lock().unwrap()
    }

    /// Increment the version counter. Panics on overflow: wrap would
    /// silently reset a cache's "already uploaded" check.
    pub fn mark_dirty(&self) {
        let mut version = self.version.lock().unwrap();
        *version = match version.checked_add(1) {
            Some(v) => v,
            None => crate::engine_panic!("ember::resource::Resource", "version counter overflowed"),
        };
    }

    /// Subscribe to the one-shot pre-destruct notification, returning an
    /// id usable with [`Self::unsubscribe`].
    pub fn on_before_destruct(&self, callback: BoxedCallback) -> SubId {
        let mut next = self.next_sub_id.lock().unwrap();
        let id = *next;
        *next += 1;
        self.subscribers.lock().unwrap().push((id, callback));
        id
    }

    /// Remove a subscription before it fires. Rare in the hot path, so
    /// linear removal is fine.
    pub fn unsubscribe(&self, id: SubId) {
        self.subscribers.lock().unwrap().retain(|(sub_id, _)| *sub_id != id);
    }

    /// Run every subscriber exactly once. Call this immediately before
    /// dropping the owning resource's storage; subscription ids are
    /// invalid afterward.
    pub fn fire_before_destruct(&self) {
        let mut subscribers = self.subscribers.lock().unwrap();
        for (_, callback) in subscribers.iter_mut() {
            callback();
        }
        subscribers.clear();
    }
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract implemented by every cacheable CPU-side resource.
pub trait Resource {
    /// Current version. Non-decreasing; increments exactly once per
    /// `mark_dirty` call.
    fn current_version(&self) -> u64;

    /// Mark the resource dirty, incrementing its version. Panics on
    /// 64-bit overflow.
    fn mark_dirty(&self);

    /// Subscribe a callback to fire exactly once, immediately before
    /// this resource's storage is released.
    fn on_before_destruct(&self, callback: BoxedCallback) -> SubId;

    /// Cancel a pending subscription.
    fn unsubscribe(&self, id: SubId);
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
