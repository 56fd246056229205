use super::Location;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback invoked when the host moves through history on its own
/// (back/forward buttons, typed location). Never invoked for `push`.
pub type HistoryListener = Arc<dyn Fn(&Location) + Send + Sync>;

/// The host's location and history stack.
///
/// The navigation controller reads and writes the location through this
/// trait but does not own it.
pub trait History: Send + Sync {
    fn current(&self) -> Location;

    /// Add a new entry after the current one and make it current
    fn push(&self, location: Location);

    /// Register for pop-style navigation events; the registration lasts as
    /// long as the returned subscription
    fn subscribe(&self, listener: HistoryListener) -> HistorySubscription;
}

/// Handle for a registered history listener. Dropping it deregisters.
pub struct HistorySubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl HistorySubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for HistorySubscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for HistorySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistorySubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct HistoryStack {
    entries: Vec<Location>,
    cursor: usize,
    listeners: Vec<(u64, HistoryListener)>,
    next_listener_id: u64,
}

/// In-process session history with browser semantics.
///
/// Cloning yields another handle to the same stack, so the terminal host
/// and the controller can share it.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<HistoryStack>>,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryStack {
                entries: vec![initial],
                cursor: 0,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Step back one entry. Returns false (and notifies no one) at the start.
    pub fn back(&self) -> bool {
        let location = {
            let mut stack = self.lock();
            if stack.cursor == 0 {
                return false;
            }
            stack.cursor -= 1;
            stack.entries[stack.cursor].clone()
        };
        tracing::debug!("History back to {}", location);
        self.notify(&location);
        true
    }

    /// Step forward one entry. Returns false (and notifies no one) at the end.
    pub fn forward(&self) -> bool {
        let location = {
            let mut stack = self.lock();
            if stack.cursor + 1 >= stack.entries.len() {
                return false;
            }
            stack.cursor += 1;
            stack.entries[stack.cursor].clone()
        };
        tracing::debug!("History forward to {}", location);
        self.notify(&location);
        true
    }

    /// Go to a location typed by the user: a new entry that listeners hear about
    pub fn visit(&self, location: Location) {
        self.push(location.clone());
        tracing::debug!("History visit {}", location);
        self.notify(&location);
    }

    pub fn entries(&self) -> Vec<Location> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    pub fn can_go_back(&self) -> bool {
        self.lock().cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let stack = self.lock();
        stack.cursor + 1 < stack.entries.len()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, HistoryStack> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, location: &Location) {
        // Listeners run without the lock held so they may touch the history
        let listeners: Vec<HistoryListener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(location);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::root())
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Location {
        let stack = self.lock();
        stack.entries[stack.cursor].clone()
    }

    fn push(&self, location: Location) {
        let mut stack = self.lock();
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(location);
        stack.cursor = stack.entries.len() - 1;
    }

    fn subscribe(&self, listener: HistoryListener) -> HistorySubscription {
        let id = {
            let mut stack = self.lock();
            let id = stack.next_listener_id;
            stack.next_listener_id += 1;
            stack.listeners.push((id, listener));
            id
        };

        let weak: Weak<Mutex<HistoryStack>> = Arc::downgrade(&self.inner);
        HistorySubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut stack = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                stack.listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack = self.lock();
        f.debug_struct("MemoryHistory")
            .field("entries", &stack.entries)
            .field("cursor", &stack.cursor)
            .field("listeners", &stack.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (HistoryListener, Arc<Mutex<Vec<Location>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener: HistoryListener = Arc::new(move |location: &Location| {
            sink.lock().unwrap().push(location.clone());
        });
        (listener, seen)
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::default();
        history.push(Location::essay("a"));
        history.push(Location::essay("b"));
        assert!(history.back());
        history.push(Location::essay("c"));

        assert_eq!(
            history.entries(),
            vec![Location::root(), Location::essay("a"), Location::essay("c")]
        );
        assert_eq!(history.current(), Location::essay("c"));
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_back_and_forward_notify_listeners() {
        let history = MemoryHistory::default();
        let (listener, seen) = recorder();
        let _subscription = history.subscribe(listener);

        history.push(Location::essay("a"));
        assert!(seen.lock().unwrap().is_empty(), "push must not notify");

        assert!(history.back());
        assert!(history.forward());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Location::root(), Location::essay("a")]
        );
    }

    #[test]
    fn test_back_and_forward_stop_at_ends() {
        let history = MemoryHistory::default();
        let (listener, seen) = recorder();
        let _subscription = history.subscribe(listener);

        assert!(!history.back());
        assert!(!history.forward());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_visit_pushes_and_notifies() {
        let history = MemoryHistory::default();
        let (listener, seen) = recorder();
        let _subscription = history.subscribe(listener);

        history.visit(Location::essay("deep"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), Location::essay("deep"));
        assert_eq!(*seen.lock().unwrap(), vec![Location::essay("deep")]);
    }

    #[test]
    fn test_subscribers_do_not_replace_each_other() {
        let history = MemoryHistory::default();
        let (first, first_seen) = recorder();
        let (second, second_seen) = recorder();
        let first_sub = history.subscribe(first);
        let _second_sub = history.subscribe(second);
        assert_eq!(history.listener_count(), 2);

        history.visit(Location::essay("a"));
        first_sub.unsubscribe();
        history.back();

        assert_eq!(first_seen.lock().unwrap().len(), 1);
        assert_eq!(second_seen.lock().unwrap().len(), 2);
        assert_eq!(history.listener_count(), 1);
    }

    #[test]
    fn test_dropping_subscription_deregisters() {
        let history = MemoryHistory::default();
        let (listener, seen) = recorder();
        {
            let _subscription = history.subscribe(listener);
            assert_eq!(history.listener_count(), 1);
        }
        assert_eq!(history.listener_count(), 0);

        history.visit(Location::essay("a"));
        assert!(seen.lock().unwrap().is_empty());
    }
}
