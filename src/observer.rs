//! Explicit subscriber-list primitive for change notification.
//!
//! View models notify their views through a [`ListenerSet`]: callbacks are
//! registered with [`ListenerSet::subscribe`], removed with the returned
//! [`ListenerId`], and invoked synchronously by [`ListenerSet::notify`]
//! whenever state mutates.

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn() + Send + Sync>;

/// Ordered list of change listeners with stable removal handles.
#[derive(Default)]
pub struct ListenerSet {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ListenerSet {
    /// Creates an empty listener set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback; returns the handle needed to remove it.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes one listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Invokes every registered listener, in subscription order.
    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
