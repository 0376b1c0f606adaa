//! Listener bookkeeping with delivery that cannot outlive disposal.

use crate::observer::PathObserverListener;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Default)]
struct RegistryState {
    listeners: Vec<(u64, Arc<dyn PathObserverListener>)>,
    next_id: u64,
    disposed: bool,
    /// Threads currently delivering a notification.
    in_flight: Vec<ThreadId>,
}

/// The external listeners of one observer.
///
/// `dispose` blocks until every other thread has finished its current
/// delivery, and each listener is re-checked right before it is called, so
/// nothing is delivered after `dispose` returns. A listener that disposes the
/// observer from inside its own callback does not wait on itself.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    state: Mutex<RegistryState>,
    idle: Condvar,
}

/// Clears this thread's in-flight mark when a delivery ends, even on panic.
struct InFlight<'a> {
    registry: &'a ListenerRegistry,
    thread: ThreadId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.registry.lock();
        if let Some(i) = state.in_flight.iter().position(|t| *t == self.thread) {
            state.in_flight.swap_remove(i);
        }
        drop(state);
        self.registry.idle.notify_all();
    }
}

pub(crate) enum Added {
    First(u64),
    Another(u64),
    Disposed,
}

impl ListenerRegistry {
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, listener: Arc<dyn PathObserverListener>) -> Added {
        let mut state = self.lock();
        if state.disposed {
            return Added::Disposed;
        }
        state.next_id += 1;
        let id = state.next_id;
        state.listeners.push((id, listener));
        if state.listeners.len() == 1 {
            Added::First(id)
        } else {
            Added::Another(id)
        }
    }

    /// Returns `true` when this removed the last listener.
    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(lid, _)| *lid != id);
        before != state.listeners.len() && state.listeners.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Delivers `notify` to every listener registered when the call starts
    /// and still registered when its turn comes.
    pub(crate) fn raise(&self, notify: impl Fn(&dyn PathObserverListener)) {
        let thread = thread::current().id();
        let snapshot = {
            let mut state = self.lock();
            if state.disposed {
                log::trace!("Notification dropped: observer disposed");
                return;
            }
            state.in_flight.push(thread);
            state.listeners.clone()
        };
        let _in_flight = InFlight {
            registry: self,
            thread,
        };
        for (id, listener) in snapshot {
            let still_registered = {
                let state = self.lock();
                !state.disposed && state.listeners.iter().any(|(lid, _)| *lid == id)
            };
            if still_registered {
                notify(listener.as_ref());
            }
        }
    }

    /// Marks the registry disposed and waits for deliveries on other threads.
    /// Returns `false` if it was already disposed.
    pub(crate) fn dispose(&self) -> bool {
        let current = thread::current().id();
        let mut state = self.lock();
        if state.disposed {
            return false;
        }
        state.disposed = true;
        let listeners = std::mem::take(&mut state.listeners);
        while state.in_flight.iter().any(|t| *t != current) {
            state = self
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(state);
        drop(listeners);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::MemberPathObserver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Quiet;

    impl PathObserverListener for Quiet {
        fn on_path_members_changed(&self, _: &dyn MemberPathObserver) {}
        fn on_last_member_changed(&self, _: &dyn MemberPathObserver) {}
    }

    fn id(added: Added) -> u64 {
        match added {
            Added::First(id) | Added::Another(id) => id,
            Added::Disposed => panic!("registry disposed"),
        }
    }

    #[test]
    fn test_first_and_last_listener() {
        let registry = ListenerRegistry::default();
        assert!(matches!(registry.add(Arc::new(Quiet)), Added::First(_)));
        let second = registry.add(Arc::new(Quiet));
        assert!(matches!(second, Added::Another(_)));
        assert!(!registry.remove(id(second)));
        assert!(registry.remove(1));
        assert!(!registry.remove(1));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_raise_skips_listener_removed_mid_delivery() {
        let registry = ListenerRegistry::default();
        id(registry.add(Arc::new(Quiet)));
        let second = id(registry.add(Arc::new(Quiet)));
        let delivered = AtomicUsize::new(0);
        registry.raise(|_| {
            delivered.fetch_add(1, Ordering::SeqCst);
            registry.remove(second);
        });
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispose_from_inside_delivery() {
        let registry = ListenerRegistry::default();
        registry.add(Arc::new(Quiet));
        registry.add(Arc::new(Quiet));
        let delivered = AtomicUsize::new(0);
        registry.raise(|_| {
            delivered.fetch_add(1, Ordering::SeqCst);
            assert!(registry.dispose());
        });
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert!(registry.is_disposed());
        assert!(matches!(registry.add(Arc::new(Quiet)), Added::Disposed));
        assert!(!registry.dispose());

        registry.raise(|_| {
            delivered.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }
}
