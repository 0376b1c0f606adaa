/// Per-request observer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Subscribe to member change notifications where the host supports them.
    pub observable: bool,
    /// Collapse broken hops to [`crate::PathValue::Unset`] instead of failing.
    pub optional: bool,
    /// Hold the root through a weak reference.
    pub weak_target: bool,
    /// A member on the owner of the last hop whose notifications stand for
    /// "the final value may have changed".
    pub observable_method: Option<String>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            observable: true,
            optional: false,
            weak_target: true,
            observable_method: None,
        }
    }
}

impl ObserverOptions {
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn observable(mut self, observable: bool) -> Self {
        self.observable = observable;
        self
    }

    pub fn weak_target(mut self, weak_target: bool) -> Self {
        self.weak_target = weak_target;
        self
    }

    pub fn with_observable_method(mut self, method: impl Into<String>) -> Self {
        self.observable_method = Some(method.into());
        self
    }
}
