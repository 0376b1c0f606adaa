use crate::error::ObserverError;
use crate::method::MethodLink;
use crate::observer::{LastMember, MemberPathObserver, PathObserverListener, PathValue};
use crate::shared::{LinkSlot, ObserverCore};
use bindpath_path::MemberPath;
use bindpath_traits::{ChangeListener, HostObject, Subscription};
use std::sync::{Arc, Weak};

struct Links {
    member: Option<Subscription>,
    method: Option<MethodLink>,
}

/// Observes one member of the root. There is nothing to re-link: every
/// notification is a last-member change.
pub struct SinglePathObserver {
    core: ObserverCore,
    self_ref: Weak<Self>,
    links: LinkSlot<Links>,
}

impl std::fmt::Debug for SinglePathObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinglePathObserver")
            .field("path", &self.core.raw())
            .field("options", &self.core.options)
            .field("listeners", &self.core.registry.len())
            .finish()
    }
}

impl SinglePathObserver {
    pub(crate) fn new(core: ObserverCore) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            core,
            self_ref: self_ref.clone(),
            links: LinkSlot::new(),
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
        let Ok(root) = self.core.root() else {
            log::debug!("Target of '{}' is gone; nothing to observe", self.core.raw());
            return;
        };
        let generation = self.links.begin();
        let resolver = self.core.resolver.as_ref();
        let member = match (self.core.options.observable, self.core.path.last_segment()) {
            (true, Some(segment)) => {
                resolver.try_subscribe(&root, segment, self.last_member_listener())
            }
            _ => None,
        };
        let method = self.core.options.observable_method.as_deref().and_then(|method| {
            MethodLink::subscribe(resolver, &root, method, self.last_member_listener())
        });
        let links = Links { member, method };
        if !self.links.store(generation, links, || self.core.registry.is_disposed()) {
            log::debug!("Observer for '{}' ended while subscribing", self.core.raw());
        }
    }

    fn deactivate(&self) {
        self.links.release();
    }

    fn remove_listener(&self, id: u64) {
        if self.core.registry.remove(id) {
            self.deactivate();
        }
    }

    #[cfg(test)]
    /// Whether a member and a method subscription are currently held.
    pub(crate) fn link_state(&self) -> (bool, bool) {
        self.links.inspect(|links| {
            links.map_or((false, false), |l| (l.member.is_some(), l.method.is_some()))
        })
    }
}

impl MemberPathObserver for SinglePathObserver {
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
            log::debug!("Disposed observer for '{}'", self.core.raw());
            self.deactivate();
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.registry.is_disposed()
    }
}
