//! Observer construction.

use crate::empty::EmptyPathObserver;
use crate::multi::MultiPathObserver;
use crate::observer::MemberPathObserver;
use crate::options::ObserverOptions;
use crate::shared::ObserverCore;
use crate::single::SinglePathObserver;
use bindpath_path::{MemberPath, PathKind};
use bindpath_traits::{HostObject, MemberResolver};
use std::sync::Arc;

/// Builds observers over one host resolver, choosing the variant by the shape
/// of the path.
#[derive(Clone)]
pub struct PathObserverProvider {
    resolver: Arc<dyn MemberResolver>,
}

impl std::fmt::Debug for PathObserverProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathObserverProvider")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

impl PathObserverProvider {
    pub fn new(resolver: Arc<dyn MemberResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<dyn MemberResolver> {
        &self.resolver
    }

    /// Creates an inactive observer for `path` on `target`. Nothing is
    /// subscribed until the first listener is added.
    pub fn observe(
        &self,
        target: &HostObject,
        path: Arc<MemberPath>,
        options: ObserverOptions,
    ) -> Arc<dyn MemberPathObserver> {
        let kind = path.kind();
        log::debug!("Creating {:?} observer for '{}'", kind, path.raw());
        let core = ObserverCore::new(target, path, options, Arc::clone(&self.resolver));
        match kind {
            PathKind::Empty => EmptyPathObserver::new(core),
            PathKind::Single => SinglePathObserver::new(core),
            PathKind::Multi => MultiPathObserver::new(core),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;
    use crate::test_support::{Recorder, host};
    use bindpath_traits::same_object;
    use bindpath_traits::testing::{MockObject, MockResolver, value};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    fn provider() -> PathObserverProvider {
        PathObserverProvider::new(Arc::new(MockResolver))
    }

    fn observe(
        root: &Arc<MockObject>,
        path: &str,
        options: ObserverOptions,
    ) -> Arc<dyn MemberPathObserver> {
        provider().observe(&host(root), MemberPath::parse(path), options)
    }

    #[test]
    fn test_variant_follows_path_kind() {
        let root = MockObject::new("Root");
        let variants = [
            ("", "EmptyPathObserver"),
            ("A", "SinglePathObserver"),
            ("A.B", "MultiPathObserver"),
        ];
        for (path, expected) in variants {
            let observer = observe(&root, path, ObserverOptions::default());
            assert!(format!("{:?}", observer).starts_with(expected), "{}", path);
        }
    }

    #[test]
    fn test_empty_path_value_is_root() {
        let root = MockObject::new("Root");
        let observer = observe(&root, "", ObserverOptions::default());
        let value = observer.get_value().unwrap();
        assert!(same_object(value.value().unwrap(), &host(&root)));
    }

    #[test]
    fn test_single_member_change_is_delivered() {
        let root = MockObject::new("Root").with_member("Name", Some(value("a".to_string())));
        let observer = observe(&root, "Name", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        root.set("Name", Some(value("b".to_string())));
        assert_eq!(recorder.last_member_changes(), 1);
        assert_eq!(recorder.path_changes(), 0);
        let current = observer.get_value().unwrap().downcast::<String>().unwrap();
        assert_eq!(current.as_str(), "b");
    }

    #[test]
    fn test_subscribes_on_first_listener_and_releases_on_last() {
        let root = MockObject::new("Root").with_member("Name", None);
        let observer = observe(&root, "Name", ObserverOptions::default());
        assert_eq!(root.counts("Name").subscribed, 0);

        let first = observer.add_listener(Recorder::new()).unwrap();
        let second = observer.add_listener(Recorder::new()).unwrap();
        assert_eq!(root.counts("Name").subscribed, 1);
        assert_eq!(observer.listener_count(), 2);

        drop(first);
        assert_eq!(root.counts("Name").active(), 1);
        drop(second);
        assert_eq!(root.counts("Name").unsubscribed, 1);
        assert_eq!(observer.listener_count(), 0);

        let _again = observer.add_listener(Recorder::new()).unwrap();
        assert_eq!(root.counts("Name").subscribed, 2);
    }

    #[test]
    fn test_replacing_intermediate_relinks_downstream_only() {
        let old_a = MockObject::new("A").with_member("B", Some(value(1_i32)));
        let root = MockObject::new("Root").with_member("A", Some(host(&old_a)));
        let observer = observe(&root, "A.B", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();
        assert_eq!(old_a.counts("B").subscribed, 1);

        let new_a = MockObject::new("A").with_member("B", Some(value(2_i32)));
        root.set("A", Some(host(&new_a)));

        assert_eq!(recorder.path_changes(), 1);
        assert_eq!(old_a.counts("B").unsubscribed, 1);
        assert_eq!(new_a.counts("B").subscribed, 1);
        assert_eq!(root.counts("A").subscribed, 1);
        assert_eq!(root.counts("A").unsubscribed, 0);
        assert_eq!(*observer.get_value().unwrap().downcast::<i32>().unwrap(), 2);

        old_a.set("B", Some(value(3_i32)));
        assert_eq!(recorder.last_member_changes(), 0);
        new_a.set("B", Some(value(4_i32)));
        assert_eq!(recorder.last_member_changes(), 1);
    }

    #[test]
    fn test_three_hop_chain_relinks_from_changed_hop() {
        let c = MockObject::new("C").with_member("Leaf", Some(value(1_i32)));
        let b = MockObject::new("B").with_member("C", Some(host(&c)));
        let root = MockObject::new("Root").with_member("B", Some(host(&b)));
        let observer = observe(&root, "B.C.Leaf", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        let new_c = MockObject::new("C").with_member("Leaf", Some(value(2_i32)));
        b.set("C", Some(host(&new_c)));

        assert_eq!(recorder.path_changes(), 1);
        assert_eq!(root.counts("B").subscribed, 1);
        assert_eq!(b.counts("C").subscribed, 1);
        assert_eq!(b.counts("C").unsubscribed, 0);
        assert_eq!(c.counts("Leaf").unsubscribed, 1);
        assert_eq!(new_c.counts("Leaf").active(), 1);
    }

    #[test]
    fn test_indexer_hop_follows_item_replacement() {
        let first = MockObject::new("Item").with_member("Name", Some(value("a".to_string())));
        let list = MockObject::new("List").with_items(vec![Some(host(&first))]);
        let root = MockObject::new("Root").with_member("Items", Some(host(&list)));
        let observer = observe(&root, "Items[0].Name", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        let second = MockObject::new("Item").with_member("Name", Some(value("b".to_string())));
        list.set_item(0, Some(host(&second)));

        assert_eq!(recorder.path_changes(), 1);
        assert_eq!(first.counts("Name").unsubscribed, 1);
        assert_eq!(second.counts("Name").subscribed, 1);
        let name = observer.get_value().unwrap().downcast::<String>().unwrap();
        assert_eq!(name.as_str(), "b");
    }

    #[test]
    fn test_null_intermediate_reports_error() {
        let a = MockObject::new("A").with_member("B", None);
        let root = MockObject::new("Root").with_member("A", Some(host(&a)));
        let observer = observe(&root, "A.B", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        root.set("A", None);
        assert_eq!(recorder.path_changes(), 1);
        assert_eq!(
            recorder.errors(),
            vec![ObserverError::null_intermediate("A", "A.B")]
        );
        assert!(matches!(
            observer.get_value(),
            Err(ObserverError::NullIntermediate { .. })
        ));
        assert!(observer.get_last_member().is_err());

        root.set("A", Some(host(&a)));
        assert_eq!(recorder.path_changes(), 2);
        assert_eq!(a.counts("B").subscribed, 2);
        assert!(observer.get_value().unwrap().value().is_none());
    }

    #[test]
    fn test_optional_path_is_unset_without_error() {
        let root = MockObject::new("Root").with_member("A", None);
        let observer = observe(&root, "A.B", ObserverOptions::default().optional(true));
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        assert!(observer.get_value().unwrap().is_unset());
        root.set("A", None);
        assert_eq!(recorder.path_changes(), 1);
        assert!(recorder.errors().is_empty());

        let missing = observe(&root, "Missing", ObserverOptions::default().optional(true));
        assert!(missing.get_value().unwrap().is_unset());
        let strict = observe(&root, "Missing", ObserverOptions::default());
        assert!(matches!(
            strict.get_value(),
            Err(ObserverError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn test_dead_weak_target() {
        let root = MockObject::new("Root").with_member("A", None);
        let observer = observe(&root, "A", ObserverOptions::default());
        let optional = observe(&root, "A", ObserverOptions::default().optional(true));
        assert!(observer.is_alive());
        drop(root);

        assert!(observer.target().is_none());
        assert!(!observer.is_alive());
        assert!(matches!(
            observer.get_value(),
            Err(ObserverError::TargetDisposed { .. })
        ));
        assert!(optional.get_value().unwrap().is_unset());
    }

    #[test]
    fn test_strong_target_keeps_root_alive() {
        let root = MockObject::new("Root").with_member("A", Some(value(7_i32)));
        let observer = observe(&root, "A", ObserverOptions::default().weak_target(false));
        drop(root);
        assert!(observer.is_alive());
        assert_eq!(*observer.get_value().unwrap().downcast::<i32>().unwrap(), 7);
    }

    #[test]
    fn test_get_last_member() {
        let a = MockObject::new("A").with_member("B", Some(value(1_i32)));
        let root = MockObject::new("Root").with_member("A", Some(host(&a)));
        let observer = observe(&root, "A.B", ObserverOptions::default());
        let last = observer.get_last_member().unwrap();
        assert_eq!(last.member, "B");
        assert!(same_object(&last.target, &host(&a)));

        let single = observe(&root, "A", ObserverOptions::default());
        let last = single.get_last_member().unwrap();
        assert!(same_object(&last.target, &host(&root)));
    }

    #[test]
    fn test_observable_method_on_last_owner() {
        let a = MockObject::new("A").with_member("B", None);
        let root = MockObject::new("Root").with_member("A", Some(host(&a)));
        let options = ObserverOptions::default().with_observable_method("Items");
        let observer = observe(&root, "A.B", options);
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        a.raise("Items");
        assert_eq!(recorder.last_member_changes(), 1);
        root.raise("Items");
        assert_eq!(recorder.last_member_changes(), 1);

        let new_a = MockObject::new("A").with_member("B", None);
        root.set("A", Some(host(&new_a)));
        assert_eq!(a.counts("Items").unsubscribed, 1);
        new_a.raise("Items");
        assert_eq!(recorder.last_member_changes(), 2);
    }

    #[test]
    fn test_unobservable_options_subscribe_nothing() {
        let a = MockObject::new("A").with_member("B", None);
        let root = MockObject::new("Root").with_member("A", Some(host(&a)));
        let observer = observe(&root, "A.B", ObserverOptions::default().observable(false));
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();
        assert_eq!(root.counts("A").subscribed, 0);
        assert_eq!(a.counts("B").subscribed, 0);
    }

    #[test]
    fn test_dispose_releases_and_rejects_listeners() {
        let a = MockObject::new("A").with_member("B", None);
        let root = MockObject::new("Root").with_member("A", Some(host(&a)));
        let observer = observe(&root, "A.B", ObserverOptions::default());
        let recorder = Recorder::new();
        let subscription = observer.add_listener(recorder.clone()).unwrap();

        observer.dispose();
        observer.dispose();
        assert!(observer.is_disposed());
        assert!(!observer.is_alive());
        assert_eq!(root.counts("A").active(), 0);
        assert_eq!(a.counts("B").active(), 0);
        assert!(matches!(
            observer.add_listener(Recorder::new()),
            Err(ObserverError::Disposed { .. })
        ));

        a.set("B", None);
        assert_eq!(recorder.last_member_changes(), 0);
        drop(subscription);
        assert_eq!(a.counts("B").unsubscribed, 1);
    }

    #[test]
    fn test_dispose_from_callback_stops_delivery() {
        let root = MockObject::new("Root").with_member("Name", None);
        let observer = observe(&root, "Name", ObserverOptions::default());
        let disposer = Recorder::disposing();
        let bystander = Recorder::new();
        let _first = observer.add_listener(disposer.clone()).unwrap();
        let _second = observer.add_listener(bystander.clone()).unwrap();

        root.set("Name", None);
        assert_eq!(disposer.last_member_changes(), 1);
        assert_eq!(bystander.last_member_changes(), 0);
        assert!(observer.is_disposed());
        assert_eq!(root.counts("Name").active(), 0);
    }

    #[test]
    fn test_nothing_delivered_after_dispose_returns() {
        let root = MockObject::new("Root").with_member("Name", None);
        let observer = observe(&root, "Name", ObserverOptions::default());
        let recorder = Recorder::new();
        let _subscription = observer.add_listener(recorder.clone()).unwrap();

        let writer = {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                for i in 0..2_000 {
                    root.set("Name", Some(value(i)));
                }
            })
        };
        thread::sleep(Duration::from_millis(1));
        observer.dispose();
        let seen = recorder.last_member_changes();
        writer.join().unwrap();
        assert_eq!(recorder.last_member_changes(), seen);
    }

    #[test]
    fn test_concurrent_relinks_converge() {
        let root = MockObject::new("Root").with_member("A", None);
        let observer = observe(&root, "A.B", ObserverOptions::default().optional(true));
        let _subscription = observer.add_listener(Recorder::new()).unwrap();
        let created: Arc<Mutex<Vec<Arc<MockObject>>>> = Arc::default();

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let root = Arc::clone(&root);
                let created = Arc::clone(&created);
                thread::spawn(move || {
                    for i in 0..50 {
                        let a = MockObject::new("A").with_member("B", Some(value(i)));
                        created.lock().unwrap().push(Arc::clone(&a));
                        root.set("A", Some(host(&a)));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let current = root.member("A").flatten().unwrap();
        let created = created.lock().unwrap();
        assert_eq!(created.len(), 200);
        for a in created.iter() {
            let expected = usize::from(same_object(&host(a), &current));
            assert_eq!(a.counts("B").active(), expected);
        }
        assert_eq!(root.counts("A").active(), 1);
    }
}
