//! Multi-hop observation with downstream re-linking.

use crate::error::ObserverError;
use crate::method::MethodLink;
use crate::observer::{LastMember, MemberPathObserver, PathObserverListener, PathValue};
use crate::shared::{ObserverCore, lock};
use bindpath_path::MemberPath;
use bindpath_traits::{ChangeListener, HostObject, Subscription, WeakHostObject, same_object};
use std::sync::{Arc, Mutex, Weak};

/// Subscription to segment `i` on the object that owns it.
struct Hop {
    owner: WeakHostObject,
    /// Identifies this subscription; notifications carrying another token are stale.
    token: u64,
    subscription: Option<Subscription>,
}

#[derive(Default)]
struct ChainState {
    hops: Vec<Hop>,
    method: Option<MethodLink>,
    next_token: u64,
    active: bool,
    resolving: bool,
    /// A hop fired while a re-link was running.
    pending: bool,
}

/// Observes `A.B.C`-style paths.
///
/// Hop `i` subscribes to segment `i` on the value that owns it. When a hop
/// before the last one fires, the chain is walked again from the root: the
/// unchanged prefix keeps its subscriptions, everything after the first
/// replaced owner is unsubscribed and subscribed afresh, and listeners get a
/// single members-changed signal. Notifications arriving during a re-link are
/// coalesced into another pass, so the final chain always reflects the latest
/// values even if intermediate signals are merged.
pub struct MultiPathObserver {
    core: ObserverCore,
    self_ref: Weak<Self>,
    state: Mutex<ChainState>,
}

impl std::fmt::Debug for MultiPathObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiPathObserver")
            .field("path", &self.core.raw())
            .field("options", &self.core.options)
            .field("listeners", &self.core.registry.len())
            .field("hops", &lock(&self.state).hops.len())
            .finish()
    }
}

impl MultiPathObserver {
    pub(crate) fn new(core: ObserverCore) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            core,
            self_ref: self_ref.clone(),
            state: Mutex::new(ChainState::default()),
        })
    }

    fn hop_listener(&self, index: usize, token: u64) -> ChangeListener {
        let weak = self.self_ref.clone();
        Arc::new(move || {
            if let Some(this) = weak.upgrade() {
                this.on_hop_changed(index, token);
            }
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

    fn on_hop_changed(&self, index: usize, token: u64) {
        let is_last = index + 1 == self.core.path.len();
        {
            let mut state = lock(&self.state);
            let current = state.active && state.hops.get(index).is_some_and(|h| h.token == token);
            if !current {
                log::trace!(
                    "Ignoring stale notification for hop {} of '{}'",
                    index,
                    self.core.raw()
                );
                return;
            }
            if !is_last {
                if state.resolving {
                    state.pending = true;
                    return;
                }
                state.resolving = true;
            }
        }
        if is_last {
            self.core.raise_last_member_changed(self);
        } else {
            log::debug!("Hop {} of '{}' changed; re-linking", index, self.core.raw());
            self.resolve(true);
        }
    }

    fn activate(&self) {
        {
            let mut state = lock(&self.state);
            state.active = true;
            state.resolving = true;
        }
        self.resolve(false);
    }

    fn deactivate(&self) {
        let (hops, method) = {
            let mut state = lock(&self.state);
            state.active = false;
            state.pending = false;
            (std::mem::take(&mut state.hops), state.method.take())
        };
        log::trace!("Releasing {} hop subscriptions of '{}'", hops.len(), self.core.raw());
        drop(hops);
        drop(method);
    }

    fn remove_listener(&self, id: u64) {
        if self.core.registry.remove(id) {
            self.deactivate();
        }
    }

    /// Re-links until no hop fired in the meantime. The caller has set
    /// `resolving`.
    fn resolve(&self, notify: bool) {
        let error = loop {
            let error = self.relink();
            let mut state = lock(&self.state);
            if state.pending && state.active {
                state.pending = false;
                continue;
            }
            state.pending = false;
            state.resolving = false;
            break error;
        };

        if !notify {
            if let Some(e) = error {
                log::debug!("Initial link of '{}' incomplete: {}", self.core.raw(), e);
            }
            return;
        }
        self.core.raise_path_members_changed(self);
        match error {
            Some(e) if !self.core.options.optional => self.core.raise_error(self, &e),
            Some(e) => log::trace!("Optional path '{}' broken: {}", self.core.raw(), e),
            None => {}
        }
    }

    /// One pass: walk from the root, keep the unchanged prefix, re-subscribe the rest.
    fn relink(&self) -> Option<ObserverError> {
        let (owners, error) = self.core.resolve_owners();
        let segments = self.core.path.segments();
        let observable = self.core.options.observable;
        let method_owner = (owners.len() == segments.len())
            .then(|| owners.last().cloned())
            .flatten();

        // Reserve tokens under the lock; subscribe outside it, since a host
        // may call the listener from inside `try_subscribe`.
        let (stale_hops, stale_method, reserved, refresh_method) = {
            let mut state = lock(&self.state);
            if !state.active {
                return error;
            }
            let keep = state
                .hops
                .iter()
                .zip(&owners)
                .take_while(|(hop, owner)| {
                    hop.owner
                        .upgrade()
                        .is_some_and(|current| same_object(&current, owner))
                })
                .count();
            let stale_hops = state.hops.split_off(keep);

            let mut reserved = Vec::new();
            if observable {
                for (i, owner) in owners.iter().enumerate().skip(keep) {
                    state.next_token += 1;
                    let token = state.next_token;
                    state.hops.push(Hop {
                        owner: Arc::downgrade(owner),
                        token,
                        subscription: None,
                    });
                    reserved.push((i, token));
                }
            }

            let method_is_current = match (&state.method, &method_owner) {
                (Some(link), Some(owner)) => link.is_on(owner),
                _ => false,
            };
            let (stale_method, refresh_method) = if method_is_current {
                (None, false)
            } else {
                (state.method.take(), method_owner.is_some())
            };
            (stale_hops, stale_method, reserved, refresh_method)
        };
        if !stale_hops.is_empty() {
            log::trace!(
                "Unsubscribing {} stale hops of '{}'",
                stale_hops.len(),
                self.core.raw()
            );
        }
        drop(stale_hops);
        drop(stale_method);

        for (i, token) in reserved {
            let subscription = self.core.resolver.try_subscribe(
                &owners[i],
                &segments[i],
                self.hop_listener(i, token),
            );
            let leftover = {
                let mut state = lock(&self.state);
                match state.hops.get_mut(i) {
                    Some(hop) if hop.token == token => {
                        hop.subscription = subscription;
                        None
                    }
                    _ => subscription,
                }
            };
            drop(leftover);
        }

        if refresh_method {
            let link = match (&self.core.options.observable_method, &method_owner) {
                (Some(method), Some(owner)) => MethodLink::subscribe(
                    self.core.resolver.as_ref(),
                    owner,
                    method,
                    self.last_member_listener(),
                ),
                _ => None,
            };
            let leftover = {
                let mut state = lock(&self.state);
                if state.active {
                    std::mem::replace(&mut state.method, link)
                } else {
                    link
                }
            };
            drop(leftover);
        }

        error
    }

    #[cfg(test)]
    fn hop_count(&self) -> usize {
        lock(&self.state).hops.len()
    }
}

impl MemberPathObserver for MultiPathObserver {
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
