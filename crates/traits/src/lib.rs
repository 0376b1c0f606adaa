pub mod accessor;
pub mod subscription;
pub mod testing;

pub use accessor::{
    AccessError, HostObject, MemberAccessor, MemberResolver, SupportsChangeNotification,
    WeakHostObject, same_object,
};
pub use subscription::{ChangeListener, Subscription};
