//! Member paths: the dotted/bracketed text a binding observes
//! (`Items[0].Name`), split into hops.

pub mod cache;
pub mod error;
mod grammar;
pub mod path;
pub mod provider;
pub mod segment;

pub use cache::{BoundedCache, CacheStats};
pub use error::PathError;
pub use path::{MemberPath, PathKind};
pub use provider::{CachingMemberPathProvider, DefaultMemberPathProvider, MemberPathProvider};
pub use segment::{PathSegment, indexer_arguments, is_indexer};
