use std::fmt;
use std::sync::Arc;

/// Removal side of a channel, erased over the channel's value and error types.
pub(crate) trait Detach: Send + Sync {
    /// Returns `false` when the observer was already gone.
    fn detach(&self, id: u64) -> bool;
    fn is_attached(&self, id: u64) -> bool;
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle leaves the observer attached. Call [`unsubscribe`]
/// explicitly, or convert it with [`scoped`] to tie the observer to a scope.
///
/// [`unsubscribe`]: Subscription::unsubscribe
/// [`scoped`]: Subscription::scoped
#[must_use = "dropping a Subscription keeps the observer attached; call unsubscribe() or scoped()"]
pub struct Subscription {
    id: u64,
    channel: Option<Arc<dyn Detach>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, channel: Arc<dyn Detach>) -> Self {
        Self {
            id,
            channel: Some(channel),
        }
    }

    /// A handle for an observer that was never attached (completed channel).
    pub(crate) fn detached(id: u64) -> Self {
        Self { id, channel: None }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop all further deliveries to this observer. Safe to call repeatedly.
    pub fn unsubscribe(&self) {
        if let Some(channel) = &self.channel {
            channel.detach(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| channel.is_attached(self.id))
    }

    pub fn scoped(self) -> ScopedSubscription {
        ScopedSubscription { inner: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Subscription released when it goes out of scope, on every exit path.
#[must_use = "a ScopedSubscription unsubscribes as soon as it is dropped"]
#[derive(Debug)]
pub struct ScopedSubscription {
    inner: Subscription,
}

impl ScopedSubscription {
    pub fn id(&self) -> u64 {
        self.inner.id()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Release now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScopedSubscription {
    fn drop(&mut self) {
        self.inner.unsubscribe();
    }
}
