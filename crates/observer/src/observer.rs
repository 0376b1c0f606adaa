//! The observer and listener contracts exposed to the host binding runtime.

use crate::error::ObserverError;
use bindpath_path::MemberPath;
use bindpath_traits::{HostObject, Subscription};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The resolved value at the end of a path.
#[derive(Clone)]
pub enum PathValue {
    /// `Value(None)` is a resolved null.
    Value(Option<HostObject>),
    /// An optional path could not be resolved.
    Unset,
}

impl PathValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, PathValue::Unset)
    }

    pub fn value(&self) -> Option<&HostObject> {
        match self {
            PathValue::Value(value) => value.as_ref(),
            PathValue::Unset => None,
        }
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value().cloned()?.downcast::<T>().ok()
    }
}

impl fmt::Debug for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValue::Value(Some(_)) => f.write_str("Value(<host object>)"),
            PathValue::Value(None) => f.write_str("Value(null)"),
            PathValue::Unset => f.write_str("Unset"),
        }
    }
}

/// The object owning the final hop, and that hop. Writing back through a
/// binding targets `member` on `target`.
#[derive(Clone)]
pub struct LastMember {
    pub target: HostObject,
    pub member: String,
}

impl fmt::Debug for LastMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastMember")
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

/// Receives change signals from a [`MemberPathObserver`].
pub trait PathObserverListener: Send + Sync {
    /// An intermediate hop was replaced and the chain re-linked.
    fn on_path_members_changed(&self, observer: &dyn MemberPathObserver);

    /// The final member (or the observable method) reported a change.
    fn on_last_member_changed(&self, observer: &dyn MemberPathObserver);

    /// Re-linking failed on a non-optional path.
    fn on_error(&self, observer: &dyn MemberPathObserver, error: &ObserverError) {
        let _ = (observer, error);
    }
}

/// A live observer over one `(target, path)` pair.
pub trait MemberPathObserver: Send + Sync + fmt::Debug {
    fn path(&self) -> &Arc<MemberPath>;

    /// The root, if it is still alive.
    fn target(&self) -> Option<HostObject>;

    fn is_alive(&self) -> bool {
        !self.is_disposed() && self.target().is_some()
    }

    /// Registers `listener`. The first registration subscribes to the chain;
    /// dropping the last returned [`Subscription`] releases it again.
    fn add_listener(
        &self,
        listener: Arc<dyn PathObserverListener>,
    ) -> Result<Subscription, ObserverError>;

    fn listener_count(&self) -> usize;

    /// Walks the path from the root and returns the current value.
    fn get_value(&self) -> Result<PathValue, ObserverError>;

    fn get_last_member(&self) -> Result<LastMember, ObserverError>;

    /// Removes every listener and releases every subscription. No
    /// notification is delivered once this returns. Idempotent.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}
