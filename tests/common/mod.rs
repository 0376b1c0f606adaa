#![allow(dead_code)]

use bindpath::{
    BindingConfig, BindingEngine, ExprRef, ExpressionParser, HostObject, MemberPathObserver,
    ObserverError, PathObserverListener,
};
use bindpath_traits::testing::{MockObject, MockResolver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses `text`, failing the test on any diagnostic.
pub fn parse(text: &str) -> ExprRef {
    let result = ExpressionParser::default().parse(text);
    assert!(
        result.diagnostics.is_empty(),
        "'{}' produced diagnostics: {}",
        text,
        result.diagnostics
    );
    result.expression.expect("parser returned no expression")
}

pub fn engine() -> BindingEngine {
    BindingEngine::new(BindingConfig::default(), Arc::new(MockResolver))
}

pub fn host(object: &Arc<MockObject>) -> HostObject {
    Arc::clone(object) as HostObject
}

/// `Root.A.B` where `B` holds `leaf`; returns `(root, a)`.
pub fn two_hop_graph(leaf: HostObject) -> (Arc<MockObject>, Arc<MockObject>) {
    let a = MockObject::new("A").with_member("B", Some(leaf));
    let root = MockObject::new("Root").with_member("A", Some(host(&a)));
    (root, a)
}

/// Counts every signal an observer delivers.
#[derive(Default)]
pub struct CountingListener {
    pub path_changes: AtomicUsize,
    pub last_member_changes: AtomicUsize,
    pub errors: Mutex<Vec<ObserverError>>,
}

impl CountingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn path_changes(&self) -> usize {
        self.path_changes.load(Ordering::SeqCst)
    }

    pub fn last_member_changes(&self) -> usize {
        self.last_member_changes.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl PathObserverListener for CountingListener {
    fn on_path_members_changed(&self, _observer: &dyn MemberPathObserver) {
        self.path_changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_last_member_changed(&self, _observer: &dyn MemberPathObserver) {
        self.last_member_changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _observer: &dyn MemberPathObserver, error: &ObserverError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
