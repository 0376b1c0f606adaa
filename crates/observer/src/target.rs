use bindpath_traits::{HostObject, WeakHostObject};
use std::sync::Arc;

/// How an observer holds its root.
#[derive(Clone)]
pub(crate) enum ObserverTarget {
    Strong(HostObject),
    Weak(WeakHostObject),
}

impl ObserverTarget {
    pub(crate) fn new(target: &HostObject, weak: bool) -> Self {
        if weak {
            ObserverTarget::Weak(Arc::downgrade(target))
        } else {
            ObserverTarget::Strong(Arc::clone(target))
        }
    }

    pub(crate) fn upgrade(&self) -> Option<HostObject> {
        match self {
            ObserverTarget::Strong(target) => Some(Arc::clone(target)),
            ObserverTarget::Weak(target) => target.upgrade(),
        }
    }
}
