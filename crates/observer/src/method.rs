//! Subscriptions to an observable method on the owner of the last hop.

use bindpath_traits::{
    ChangeListener, HostObject, MemberResolver, Subscription, WeakHostObject, same_object,
};
use std::sync::Arc;

/// A method subscription together with the object it was made on.
pub(crate) struct MethodLink {
    owner: WeakHostObject,
    _subscription: Subscription,
}

impl MethodLink {
    pub(crate) fn subscribe(
        resolver: &dyn MemberResolver,
        owner: &HostObject,
        method: &str,
        listener: ChangeListener,
    ) -> Option<MethodLink> {
        match resolver.try_subscribe(owner, method, listener) {
            Some(subscription) => Some(MethodLink {
                owner: Arc::downgrade(owner),
                _subscription: subscription,
            }),
            None => {
                log::debug!("Observable method '{}' does not support notification", method);
                None
            }
        }
    }

    pub(crate) fn is_on(&self, owner: &HostObject) -> bool {
        self.owner
            .upgrade()
            .is_some_and(|current| same_object(&current, owner))
    }
}
