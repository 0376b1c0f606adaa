//! In-memory host object model for tests.
//!
//! Publicly available so downstream crates can exercise the observer engine
//! against a host that counts every subscribe/unsubscribe call.

use crate::accessor::{AccessError, HostObject, MemberAccessor, SupportsChangeNotification};
use crate::subscription::{ChangeListener, Subscription};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Listener key shared by every indexer segment of an object.
pub const INDEXER_KEY: &str = "[]";

/// Wraps any value as a [`HostObject`].
pub fn value<T: Any + Send + Sync>(v: T) -> HostObject {
    Arc::new(v)
}

/// Subscribe/unsubscribe totals recorded for one member of a [`MockObject`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionCounts {
    pub subscribed: usize,
    pub unsubscribed: usize,
}

impl SubscriptionCounts {
    pub fn active(&self) -> usize {
        self.subscribed - self.unsubscribed
    }
}

/// A dynamic property bag with per-member change notification.
pub struct MockObject {
    type_name: String,
    observable: bool,
    members: RwLock<HashMap<String, Option<HostObject>>>,
    items: RwLock<Vec<Option<HostObject>>>,
    listeners: Mutex<HashMap<String, Vec<(u64, ChangeListener)>>>,
    counts: Mutex<HashMap<String, SubscriptionCounts>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for MockObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: Vec<String> = self
            .members
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("MockObject")
            .field("type_name", &self.type_name)
            .field("observable", &self.observable)
            .field("members", &members)
            .finish()
    }
}

impl MockObject {
    /// An object whose members all support change notification.
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::build(type_name.into(), true))
    }

    /// An object that refuses every subscription.
    pub fn unobservable(type_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::build(type_name.into(), false))
    }

    fn build(type_name: String, observable: bool) -> Self {
        Self {
            type_name,
            observable,
            members: RwLock::new(HashMap::new()),
            items: RwLock::new(Vec::new()),
            listeners: Mutex::new(HashMap::new()),
            counts: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Builder-style member initialisation; does not notify.
    pub fn with_member(self: Arc<Self>, name: &str, value: Option<HostObject>) -> Arc<Self> {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        self
    }

    /// Builder-style item initialisation; does not notify.
    pub fn with_items(self: Arc<Self>, items: Vec<Option<HostObject>>) -> Arc<Self> {
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Sets a member and notifies its listeners.
    pub fn set(&self, name: &str, value: Option<HostObject>) {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        self.raise(name);
    }

    /// Replaces the item at `index` (growing the list with nulls) and notifies indexer listeners.
    pub fn set_item(&self, index: usize, value: Option<HostObject>) {
        {
            let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
            if items.len() <= index {
                items.resize(index + 1, None);
            }
            items[index] = value;
        }
        self.raise(INDEXER_KEY);
    }

    /// Fires the listeners of `name` without changing anything.
    pub fn raise(&self, name: &str) {
        let snapshot: Vec<ChangeListener> = {
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            listeners
                .get(name)
                .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };
        for listener in snapshot {
            listener();
        }
    }

    /// The stored value of a member: `None` if the member does not exist.
    pub fn member(&self, name: &str) -> Option<Option<HostObject>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn item(&self, index: usize) -> Option<Option<HostObject>> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    /// Subscribe/unsubscribe totals for `name` (use [`INDEXER_KEY`] for indexers).
    pub fn counts(&self, name: &str) -> SubscriptionCounts {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or_default()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn subscribe(self: &Arc<Self>, key: &str, listener: ChangeListener) -> Option<Subscription> {
        if !self.observable {
            return None;
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .push((id, listener));
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .subscribed += 1;

        let weak = Arc::downgrade(self);
        let key = key.to_string();
        Some(Subscription::new(move || {
            let Some(this) = weak.upgrade() else {
                return;
            };
            if let Some(list) = this
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_mut(&key)
            {
                list.retain(|(lid, _)| *lid != id);
            }
            this.counts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key)
                .or_default()
                .unsubscribed += 1;
        }))
    }
}

fn indexer_body(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .map(str::trim)
}

fn unquote(arg: &str) -> Option<&str> {
    ['"', '\'']
        .iter()
        .find_map(|q| arg.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
}

/// Resolves members of [`MockObject`]s. Any other host value has no members.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockResolver;

impl MockResolver {
    fn object(target: &HostObject) -> Option<Arc<MockObject>> {
        Arc::clone(target).downcast::<MockObject>().ok()
    }
}

impl MemberAccessor for MockResolver {
    fn get(&self, target: &HostObject, segment: &str) -> Result<Option<HostObject>, AccessError> {
        let Some(object) = Self::object(target) else {
            return Err(AccessError::member_not_found(segment, "<opaque>"));
        };
        if let Some(body) = indexer_body(segment) {
            if let Some(key) = unquote(body) {
                return object
                    .member(key)
                    .ok_or_else(|| AccessError::member_not_found(segment, object.type_name()));
            }
            let index: usize = body
                .parse()
                .map_err(|_| AccessError::invalid_indexer(segment, "expected an integer index"))?;
            return object.item(index).ok_or_else(|| {
                AccessError::invalid_indexer(segment, format!("index {} out of range", index))
            });
        }
        object
            .member(segment)
            .ok_or_else(|| AccessError::member_not_found(segment, object.type_name()))
    }

    fn name(&self) -> &'static str {
        "mock-resolver"
    }
}

impl SupportsChangeNotification for MockResolver {
    fn try_subscribe(
        &self,
        target: &HostObject,
        segment: &str,
        listener: ChangeListener,
    ) -> Option<Subscription> {
        let object = Self::object(target)?;
        let key = if indexer_body(segment).is_some() {
            INDEXER_KEY
        } else {
            segment
        };
        object.subscribe(key, listener)
    }
}
