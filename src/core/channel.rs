use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

use super::subscription::{Detach, Subscription};

type ValueFn<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(&E) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// Callbacks registered with a [`ReplayChannel`].
///
/// Only `on_value` is required. Observers keep their own state behind interior
/// mutability, which lets callbacks re-enter the channel (publish, subscribe or
/// unsubscribe) while a delivery is running.
pub struct Observer<T, E = Infallible> {
    on_value: ValueFn<T>,
    on_error: Option<ErrorFn<E>>,
    on_complete: Option<CompleteFn>,
}

impl<T, E> Observer<T, E> {
    pub fn new<F>(on_value: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            on_value: Box::new(on_value),
            on_error: None,
            on_complete: None,
        }
    }

    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn on_complete<F>(mut self, on_complete: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(on_complete));
        self
    }
}

impl<T, E> Debug for Observer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("on_error", &self.on_error.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

struct ObserverSlot<T, E> {
    id: u64,
    active: AtomicBool,
    observer: Observer<T, E>,
}

impl<T, E> ObserverSlot<T, E> {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

enum Notice<T, E> {
    Value(T),
    Error(E),
    Complete,
}

impl<T, E> Notice<T, E> {
    fn kind(&self) -> &'static str {
        match self {
            Notice::Value(_) => "value",
            Notice::Error(_) => "error",
            Notice::Complete => "completion",
        }
    }
}

/// A notice and the observers that were subscribed when it was issued.
struct Delivery<T, E> {
    notice: Notice<T, E>,
    recipients: Vec<Arc<ObserverSlot<T, E>>>,
}

struct State<T, E> {
    value: T,
    observers: Vec<Arc<ObserverSlot<T, E>>>,
    completed: bool,
    delivering: bool,
    queue: VecDeque<Delivery<T, E>>,
}

struct Shared<T, E> {
    name: String,
    state: Mutex<State<T, E>>,
    next_id: AtomicU64,
    delivery_failures: AtomicU64,
}

impl<T, E> Shared<T, E> {
    // Callbacks never run under this lock, so a poisoned guard still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, State<T, E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver<F: FnOnce()>(&self, id: u64, kind: &str, callback: F) {
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            self.delivery_failures.fetch_add(1, Ordering::Relaxed);
            error!(
                "[{}] Observer {} panicked during {} delivery; continuing with remaining observers",
                self.name, id, kind
            );
        }
    }

    /// Run `delivery` now, or queue it behind the delivery already in
    /// progress. Whoever started delivering drains the queue, so every
    /// observer sees notices in the order they were issued.
    fn dispatch(&self, mut state: MutexGuard<'_, State<T, E>>, delivery: Delivery<T, E>) {
        if state.delivering {
            state.queue.push_back(delivery);
            debug!(
                "[{}] Queued notice behind delivery in progress ({} pending)",
                self.name,
                state.queue.len()
            );
            return;
        }
        state.delivering = true;
        drop(state);

        let mut next = delivery;
        loop {
            self.notify(&next);
            let mut state = self.lock();
            match state.queue.pop_front() {
                Some(queued) => next = queued,
                None => {
                    state.delivering = false;
                    return;
                }
            }
        }
    }

    fn notify(&self, delivery: &Delivery<T, E>) {
        let kind = delivery.notice.kind();
        debug!(
            "[{}] Delivering {} to {} observers",
            self.name,
            kind,
            delivery.recipients.len()
        );
        for slot in &delivery.recipients {
            // Detached earlier in this delivery or while it sat in the queue
            if !slot.is_active() {
                continue;
            }
            let observer = &slot.observer;
            match &delivery.notice {
                Notice::Value(value) => {
                    self.deliver(slot.id, kind, || (observer.on_value)(value));
                }
                Notice::Error(error) => {
                    if let Some(on_error) = &observer.on_error {
                        self.deliver(slot.id, kind, || on_error(error));
                    }
                }
                Notice::Complete => {
                    slot.active.store(false, Ordering::Release);
                    if let Some(on_complete) = &observer.on_complete {
                        self.deliver(slot.id, kind, || on_complete());
                    }
                }
            }
        }
    }
}

impl<T: Send + 'static, E: Send + 'static> Detach for Shared<T, E> {
    fn detach(&self, id: u64) -> bool {
        let mut state = self.lock();
        match state.observers.iter().position(|slot| slot.id == id) {
            Some(index) => {
                let slot = state.observers.remove(index);
                slot.active.store(false, Ordering::Release);
                debug!(
                    "[{}] Observer {} unsubscribed. Remaining observers: {}",
                    self.name,
                    id,
                    state.observers.len()
                );
                true
            }
            None => false,
        }
    }

    fn is_attached(&self, id: u64) -> bool {
        self.lock().observers.iter().any(|slot| slot.id == id)
    }
}

/// Single-value broadcast channel that replays its latest value to every new
/// subscriber.
///
/// The channel always holds a value. `publish` replaces it and then notifies
/// the observers that were subscribed when delivery began, in subscription
/// order, on the caller's thread. A publish issued while another delivery is
/// running is queued and delivered by that delivery once it finishes, so
/// observers see values in publish order. `subscribe` hands the current value
/// to the new observer before it returns.
///
/// Cloning a channel shares it; the state lives until the last clone, reader
/// or subscription is dropped.
pub struct ReplayChannel<T, E = Infallible> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> ReplayChannel<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    pub fn new(initial_value: T) -> Self {
        Self::named("channel", initial_value)
    }

    pub fn named(name: impl Into<String>, initial_value: T) -> Self {
        let name = name.into();
        debug!("[{}] Creating replay channel", name);
        Self {
            shared: Arc::new(Shared {
                name,
                state: Mutex::new(State {
                    value: initial_value,
                    observers: Vec::new(),
                    completed: false,
                    delivering: false,
                    queue: VecDeque::new(),
                }),
                next_id: AtomicU64::new(1),
                delivery_failures: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Clone of the value a new subscriber would receive first.
    pub fn value(&self) -> T {
        self.shared.lock().value.clone()
    }

    /// Store `value` and deliver it to every currently subscribed observer.
    ///
    /// A panicking observer is logged and skipped; the remaining observers
    /// still receive the value and the publisher never sees the failure.
    /// Called from inside a callback, the value is stored at once and
    /// delivered after the current delivery finishes.
    pub fn publish(&self, value: T) {
        let mut state = self.shared.lock();
        if state.completed {
            debug!("[{}] Ignoring publish on completed channel", self.name());
            return;
        }
        state.value = value.clone();
        let recipients = state.observers.clone();
        self.shared.dispatch(
            state,
            Delivery {
                notice: Notice::Value(value),
                recipients,
            },
        );
    }

    /// Deliver `error` to every observer that registered an error callback.
    /// The stored value is untouched and the error is not replayed later.
    pub fn publish_error(&self, error: E) {
        let state = self.shared.lock();
        if state.completed {
            debug!("[{}] Ignoring error on completed channel", self.name());
            return;
        }
        let recipients = state.observers.clone();
        self.shared.dispatch(
            state,
            Delivery {
                notice: Notice::Error(error),
                recipients,
            },
        );
    }

    /// Register `observer` and replay the current value to it before returning.
    pub fn subscribe(&self, observer: Observer<T, E>) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(ObserverSlot {
            id,
            active: AtomicBool::new(true),
            observer,
        });

        let current = {
            let mut state = self.shared.lock();
            if state.completed {
                drop(state);
                debug!(
                    "[{}] Subscriber {} joined a completed channel",
                    self.name(),
                    id
                );
                if let Some(on_complete) = &slot.observer.on_complete {
                    self.shared.deliver(id, "completion", || on_complete());
                }
                return Subscription::detached(id);
            }
            state.observers.push(slot.clone());
            debug!(
                "[{}] Observer {} subscribed. Total observers: {}",
                self.name(),
                id,
                state.observers.len()
            );
            state.value.clone()
        };

        let subscription = Subscription::new(id, self.shared.clone());
        self.shared
            .deliver(id, "replay", || (slot.observer.on_value)(&current));
        subscription
    }

    pub fn subscribe_fn<F>(&self, on_value: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe(Observer::new(on_value))
    }

    /// Notify every observer of completion and detach them all. Later
    /// publishes are ignored; later subscribers only receive `on_complete`.
    pub fn complete(&self) {
        let mut state = self.shared.lock();
        if state.completed {
            return;
        }
        state.completed = true;
        let recipients = std::mem::take(&mut state.observers);
        debug!(
            "[{}] Completing channel with {} observers",
            self.name(),
            recipients.len()
        );
        self.shared.dispatch(
            state,
            Delivery {
                notice: Notice::Complete,
                recipients,
            },
        );
    }

    pub fn is_completed(&self) -> bool {
        self.shared.lock().completed
    }

    pub fn observer_count(&self) -> usize {
        self.shared.lock().observers.len()
    }

    /// Number of observer callbacks that panicked since creation.
    pub fn delivery_failures(&self) -> u64 {
        self.shared.delivery_failures.load(Ordering::Relaxed)
    }

    /// Read-only handle for collaborators that observe but never publish.
    pub fn reader(&self) -> ChannelReader<T, E> {
        ChannelReader {
            channel: self.clone(),
        }
    }
}

impl<T, E> Clone for ReplayChannel<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> Debug for ReplayChannel<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplayChannel({})", self.shared.name)
    }
}

/// Subscribe-only view of a [`ReplayChannel`].
pub struct ChannelReader<T, E = Infallible> {
    channel: ReplayChannel<T, E>,
}

impl<T, E> ChannelReader<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    pub fn subscribe(&self, observer: Observer<T, E>) -> Subscription {
        self.channel.subscribe(observer)
    }

    pub fn subscribe_fn<F>(&self, on_value: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.channel.subscribe_fn(on_value)
    }

    pub fn value(&self) -> T {
        self.channel.value()
    }

    pub fn name(&self) -> &str {
        self.channel.name()
    }

    pub fn observer_count(&self) -> usize {
        self.channel.observer_count()
    }
}

impl<T, E> Clone for ChannelReader<T, E> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T, E> Debug for ChannelReader<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelReader({})", self.channel.shared.name)
    }
}
