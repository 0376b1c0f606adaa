//! Binding expressions turned into live member-path observers.
//!
//! [`BindingEngine`] ties the pieces together: the token parser pipeline
//! (`bindpath-parser`) produces expression trees, plain member chains become
//! [`MemberPath`]s (`bindpath-path`), and observers (`bindpath-observer`)
//! track those paths on host objects through a [`MemberResolver`].

pub mod binding;
pub mod config;
pub mod engine;
pub mod error;
pub mod provider;

pub use binding::{BindingExpression, BindingParseResult, BindingParser};
pub use config::{BindingConfig, ObserverDefaults};
pub use engine::BindingEngine;
pub use error::BindingError;
pub use provider::{BindingExpressionProvider, CachingBindingExpressionProvider};

pub use bindpath_expr::{
    BigUint, BinaryOperator, ConstantValue, ExprRef, Expression, ExpressionVisitor, UnaryOperator,
    accept,
};
pub use bindpath_observer::{
    LastMember, MemberPathObserver, ObserverError, ObserverOptions, PathObserverListener,
    PathValue,
};
pub use bindpath_parser::{Diagnostics, ExpressionParser, ParseDiagnostic, ParseError, TokenParser};
pub use bindpath_path::{MemberPath, MemberPathProvider, PathError};
pub use bindpath_traits::{
    AccessError, HostObject, MemberAccessor, MemberResolver, Subscription,
    SupportsChangeNotification,
};
