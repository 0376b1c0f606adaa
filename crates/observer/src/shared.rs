//! State and path walking shared by every observer variant.

use crate::error::ObserverError;
use crate::observer::{LastMember, MemberPathObserver, PathObserverListener, PathValue};
use crate::options::ObserverOptions;
use crate::registry::{Added, ListenerRegistry};
use crate::target::ObserverTarget;
use bindpath_path::MemberPath;
use bindpath_traits::{HostObject, MemberResolver, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(crate) struct ObserverCore {
    pub(crate) path: Arc<MemberPath>,
    pub(crate) target: ObserverTarget,
    pub(crate) options: ObserverOptions,
    pub(crate) resolver: Arc<dyn MemberResolver>,
    pub(crate) registry: ListenerRegistry,
}

impl ObserverCore {
    pub(crate) fn new(
        target: &HostObject,
        path: Arc<MemberPath>,
        options: ObserverOptions,
        resolver: Arc<dyn MemberResolver>,
    ) -> Self {
        Self {
            target: ObserverTarget::new(target, options.weak_target),
            path,
            options,
            resolver,
            registry: ListenerRegistry::default(),
        }
    }

    pub(crate) fn raw(&self) -> &str {
        self.path.raw()
    }

    pub(crate) fn root(&self) -> Result<HostObject, ObserverError> {
        self.target
            .upgrade()
            .ok_or_else(|| ObserverError::target_disposed(self.raw()))
    }

    pub(crate) fn read(
        &self,
        source: &HostObject,
        segment: &str,
    ) -> Result<Option<HostObject>, ObserverError> {
        self.resolver
            .get(source, segment)
            .map_err(|e| ObserverError::access(self.raw(), e))
    }

    /// The owner of every segment (`owners[i]` holds segment `i`), as far as
    /// the chain resolves, plus the failure that stopped the walk.
    pub(crate) fn resolve_owners(&self) -> (Vec<HostObject>, Option<ObserverError>) {
        let root = match self.root() {
            Ok(root) => root,
            Err(e) => return (Vec::new(), Some(e)),
        };
        let segments = self.path.segments();
        let mut owners = vec![root];
        while owners.len() < segments.len() {
            let i = owners.len() - 1;
            match self.read(&owners[i], &segments[i]) {
                Ok(Some(next)) => owners.push(next),
                Ok(None) => {
                    let error = ObserverError::null_intermediate(&segments[i], self.raw());
                    return (owners, Some(error));
                }
                Err(e) => return (owners, Some(e)),
            }
        }
        (owners, None)
    }

    pub(crate) fn get_value(&self) -> Result<PathValue, ObserverError> {
        let (owners, error) = self.resolve_owners();
        let value = match (error, self.path.last_segment(), owners.last()) {
            (Some(e), _, _) => Err(e),
            (None, None, Some(root)) => Ok(Some(Arc::clone(root))),
            (None, Some(last), Some(owner)) => self.read(owner, last),
            (None, _, None) => Err(ObserverError::target_disposed(self.raw())),
        };
        match value {
            Ok(value) => Ok(PathValue::Value(value)),
            Err(e) if self.options.optional => {
                log::trace!("Optional path '{}' unset: {}", self.raw(), e);
                Ok(PathValue::Unset)
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) fn get_last_member(&self) -> Result<LastMember, ObserverError> {
        let (mut owners, error) = self.resolve_owners();
        if let Some(e) = error {
            return Err(e);
        }
        let target = owners
            .pop()
            .ok_or_else(|| ObserverError::target_disposed(self.raw()))?;
        Ok(LastMember {
            target,
            member: self.path.last_segment().unwrap_or_default().to_string(),
        })
    }

    /// Registers a listener; `activate` runs for the first one and `release`
    /// runs with the listener id when the returned subscription is dropped.
    pub(crate) fn add_listener(
        &self,
        listener: Arc<dyn PathObserverListener>,
        activate: impl FnOnce(),
        release: impl FnOnce(u64) + Send + Sync + 'static,
    ) -> Result<Subscription, ObserverError> {
        match self.registry.add(listener) {
            Added::Disposed => Err(ObserverError::disposed(self.raw())),
            Added::First(id) => {
                log::debug!("Activating observer for '{}'", self.raw());
                activate();
                Ok(Subscription::new(move || release(id)))
            }
            Added::Another(id) => Ok(Subscription::new(move || release(id))),
        }
    }

    pub(crate) fn raise_last_member_changed(&self, observer: &dyn MemberPathObserver) {
        log::trace!("Last member of '{}' changed", self.raw());
        self.registry
            .raise(|listener| listener.on_last_member_changed(observer));
    }

    pub(crate) fn raise_path_members_changed(&self, observer: &dyn MemberPathObserver) {
        log::trace!("Members of '{}' changed", self.raw());
        self.registry
            .raise(|listener| listener.on_path_members_changed(observer));
    }

    pub(crate) fn raise_error(&self, observer: &dyn MemberPathObserver, error: &ObserverError) {
        log::debug!("Observer for '{}' failed: {}", self.raw(), error);
        self.registry
            .raise(|listener| listener.on_error(observer, error));
    }
}

/// Locks an observer-internal mutex, recovering from poisoning.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct SlotState<T> {
    links: Option<T>,
    generation: u64,
    active: bool,
}

/// The subscriptions an observer holds while it has listeners.
///
/// Subscribing happens outside the lock, so an activation may end (last
/// listener removed, or disposed from a callback fired inside the subscribe
/// call) before its links are stored. Each activation gets a generation;
/// links from an activation that is no longer current are dropped instead
/// of stored.
pub(crate) struct LinkSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> LinkSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                links: None,
                generation: 0,
                active: false,
            }),
        }
    }

    /// Starts an activation and returns its generation.
    pub(crate) fn begin(&self) -> u64 {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.active = true;
        state.generation
    }

    /// Stores `links` for activation `generation`. Returns `false`, dropping
    /// them outside the lock, when that activation has ended or `disposed`
    /// says the observer is gone.
    pub(crate) fn store(
        &self,
        generation: u64,
        links: T,
        disposed: impl FnOnce() -> bool,
    ) -> bool {
        let (leftover, stored) = {
            let mut state = lock(&self.state);
            if state.active && state.generation == generation && !disposed() {
                (state.links.replace(links), true)
            } else {
                (Some(links), false)
            }
        };
        drop(leftover);
        stored
    }

    /// Ends the current activation. Its links are dropped after the lock is
    /// released, since dropping a subscription calls back into the host.
    pub(crate) fn release(&self) {
        let old = {
            let mut state = lock(&self.state);
            state.active = false;
            state.generation += 1;
            state.links.take()
        };
        drop(old);
    }

    #[cfg(test)]
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(lock(&self.state).links.as_ref())
    }
}
