//! Path observers: live chains of per-hop subscriptions over a host object graph.
//!
//! An observer is bound to one `(target, path)` pair. It subscribes lazily when
//! its first listener is added, re-links downstream hops whenever an
//! intermediate value is replaced, and releases every subscription when the
//! last listener goes away or it is disposed.

mod empty;
pub mod error;
mod method;
mod multi;
pub mod observer;
pub mod options;
pub mod provider;
mod registry;
mod shared;
mod single;
mod target;
#[cfg(test)]
mod test_support;

pub use empty::EmptyPathObserver;
pub use error::ObserverError;
pub use multi::MultiPathObserver;
pub use observer::{LastMember, MemberPathObserver, PathObserverListener, PathValue};
pub use options::ObserverOptions;
pub use provider::PathObserverProvider;
pub use single::SinglePathObserver;
