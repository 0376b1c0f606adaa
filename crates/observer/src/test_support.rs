use crate::error::ObserverError;
use crate::observer::{MemberPathObserver, PathObserverListener};
use bindpath_traits::testing::{MockObject, MockResolver};
use bindpath_traits::{
    AccessError, ChangeListener, HostObject, MemberAccessor, Subscription,
    SupportsChangeNotification,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn host(object: &Arc<MockObject>) -> HostObject {
    Arc::clone(object) as HostObject
}

/// Counts every signal it receives.
#[derive(Default)]
pub(crate) struct Recorder {
    path_changes: AtomicUsize,
    last_member_changes: AtomicUsize,
    errors: Mutex<Vec<ObserverError>>,
    dispose_on_change: bool,
}

impl Recorder {
    pub(crate) fn new() -> Arc<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        Arc::new(Self::default())
    }

    /// Disposes the observer from inside its first last-member callback.
    pub(crate) fn disposing() -> Arc<Self> {
        Arc::new(Self {
            dispose_on_change: true,
            ..Self::default()
        })
    }

    pub(crate) fn path_changes(&self) -> usize {
        self.path_changes.load(Ordering::SeqCst)
    }

    pub(crate) fn last_member_changes(&self) -> usize {
        self.last_member_changes.load(Ordering::SeqCst)
    }

    pub(crate) fn errors(&self) -> Vec<ObserverError> {
        self.errors.lock().unwrap().clone()
    }
}

impl PathObserverListener for Recorder {
    fn on_path_members_changed(&self, _observer: &dyn MemberPathObserver) {
        self.path_changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_last_member_changed(&self, observer: &dyn MemberPathObserver) {
        self.last_member_changes.fetch_add(1, Ordering::SeqCst);
        if self.dispose_on_change {
            observer.dispose();
        }
    }

    fn on_error(&self, _observer: &dyn MemberPathObserver, error: &ObserverError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

/// A [`MockResolver`] that also fires each listener once from inside
/// `try_subscribe`, as a host is allowed to.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct EagerResolver;

impl MemberAccessor for EagerResolver {
    fn get(&self, target: &HostObject, segment: &str) -> Result<Option<HostObject>, AccessError> {
        MockResolver.get(target, segment)
    }
}

impl SupportsChangeNotification for EagerResolver {
    fn try_subscribe(
        &self,
        target: &HostObject,
        segment: &str,
        listener: ChangeListener,
    ) -> Option<Subscription> {
        let subscription = MockResolver.try_subscribe(target, segment, Arc::clone(&listener));
        listener();
        subscription
    }
}
