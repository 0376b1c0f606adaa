//! The contract between the observer engine and the host object model.
//!
//! The engine never reflects into host objects. Everything it knows about a
//! value is obtained through a [`MemberAccessor`] (read a member or indexer) and,
//! when the host supports it, a [`SupportsChangeNotification`] capability
//! (subscribe to changes of one member on one object).

use crate::subscription::{ChangeListener, Subscription};
use std::any::Any;
use std::sync::{Arc, Weak};
use thiserror::Error;

/// A type-erased, shared host value.
pub type HostObject = Arc<dyn Any + Send + Sync>;

/// A non-owning handle to a [`HostObject`].
pub type WeakHostObject = Weak<dyn Any + Send + Sync>;

/// Identity comparison for host objects (ignores vtable metadata).
pub fn same_object(a: &HostObject, b: &HostObject) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Error type for member access on the host object model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Member '{member}' not found on '{type_name}'")]
    MemberNotFound { member: String, type_name: String },

    #[error("Invalid indexer '{segment}': {message}")]
    InvalidIndexer { segment: String, message: String },

    #[error("Host error: {0}")]
    Host(String),
}

impl AccessError {
    pub fn member_not_found(member: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::MemberNotFound {
            member: member.into(),
            type_name: type_name.into(),
        }
    }

    pub fn invalid_indexer(segment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIndexer {
            segment: segment.into(),
            message: message.into(),
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

/// Reads members from host objects.
///
/// `segment` is one hop of a member path: either a plain member name (`Name`)
/// or a bracketed indexer including its brackets (`[0]`, `["key"]`).
pub trait MemberAccessor: Send + Sync {
    /// Reads `segment` from `target`. `Ok(None)` is a null value, not a failure.
    fn get(&self, target: &HostObject, segment: &str) -> Result<Option<HostObject>, AccessError>;

    /// Returns a human-readable name for this accessor (for logging/debugging).
    fn name(&self) -> &'static str {
        "member-accessor"
    }
}

/// Optional capability: change notification for one member of one object.
pub trait SupportsChangeNotification: Send + Sync {
    /// Registers `listener` for changes of `segment` on `target`.
    ///
    /// Returns `None` when the member is not observable. The listener may be
    /// invoked synchronously from inside this call and from any thread.
    fn try_subscribe(
        &self,
        target: &HostObject,
        segment: &str,
        listener: ChangeListener,
    ) -> Option<Subscription>;
}

/// The full member-resolution collaborator consumed by the observer engine.
pub trait MemberResolver: MemberAccessor + SupportsChangeNotification {}

impl<T: MemberAccessor + SupportsChangeNotification + ?Sized> MemberResolver for T {}
