use crate::error::ObserverError;
use crate::method::MethodLink;
use crate::observer::{LastMember, MemberPathObserver, PathObserverListener, PathValue};
use crate::shared::{LinkSlot, ObserverCore};
use bindpath_path::MemberPath;
use bindpath_traits::{ChangeListener, HostObject, Subscription};
use std::sync::{Arc, Weak};

/// Observes the root itself. With an observable method configured, that
/// method's notifications are reported as last-member changes; otherwise the
/// observer never fires, since swapping the root is the owner's concern.
pub struct EmptyPathObserver {
    core: ObserverCore,
    self_ref: Weak<Self>,
    method: LinkSlot<MethodLink>,
}

impl std::fmt::Debug for EmptyPathObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmptyPathObserver")
            .field("options", &self.core.options)
            .field("listeners", &self.core.registry.len())
            .finish()
    }
}

impl EmptyPathObserver {
    pub(crate) fn new(core: ObserverCore) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            core,
            self_ref: self_ref.clone(),
            method: LinkSlot::new(),
        })
    }

    fn last_member_listener(&self) -> ChangeListener {
        let weak = self.self_ref.clone();
        Arc::new(move || {
            if let Some(this) = weak.upgrade() {
                this.core.raise_last_member_changed(this.as_ref());
            }
        })
    }

    fn activate(&self) {
        let (Some(method), Ok(root)) = (&self.core.options.observable_method, self.core.root())
        else {
            return;
        };
        let generation = self.method.begin();
        let link = MethodLink::subscribe(
            self.core.resolver.as_ref(),
            &root,
            method,
            self.last_member_listener(),
        );
        if let Some(link) = link {
            if !self.method.store(generation, link, || self.core.registry.is_disposed()) {
                log::debug!("Observer for the data context ended while subscribing");
            }
        }
    }

    fn deactivate(&self) {
        self.method.release();
    }

    fn remove_listener(&self, id: u64) {
        if self.core.registry.remove(id) {
            self.deactivate();
        }
    }

    #[cfg(test)]
    pub(crate) fn has_method_link(&self) -> bool {
        self.method.inspect(|link| link.is_some())
    }
}

impl MemberPathObserver for EmptyPathObserver {
    fn path(&self) -> &Arc<MemberPath> {
        &self.core.path
    }

    fn target(&self) -> Option<HostObject> {
        self.core.target.upgrade()
    }

    fn add_listener(
        &self,
        listener: Arc<dyn PathObserverListener>,
    ) -> Result<Subscription, ObserverError> {
        let weak = self.self_ref.clone();
        self.core.add_listener(
            listener,
            || self.activate(),
            move |id| {
                if let Some(this) = weak.upgrade() {
                    this.remove_listener(id);
                }
            },
        )
    }

    fn listener_count(&self) -> usize {
        self.core.registry.len()
    }

    fn get_value(&self) -> Result<PathValue, ObserverError> {
        self.core.get_value()
    }

    fn get_last_member(&self) -> Result<LastMember, ObserverError> {
        self.core.get_last_member()
    }

    fn dispose(&self) {
        if self.core.registry.dispose() {
            log::debug!("Disposed observer for the data context");
            self.deactivate();
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.registry.is_disposed()
    }
}
