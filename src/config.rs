//! Engine configuration.

use bindpath_observer::ObserverOptions;
use serde::{Deserialize, Serialize};

/// Settings for a [`crate::BindingEngine`]. Every field has a default, so a
/// partial JSON document such as `{"strictParsing": false}` loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct BindingConfig {
    /// Maximum number of parsed binding strings kept by the engine.
    ///
    /// `0` disables the binding cache. Defaults to `512`.
    pub expression_cache_capacity: usize,
    /// Maximum number of parsed member paths kept by the engine.
    ///
    /// `0` disables the path cache. Defaults to `1024`.
    pub path_cache_capacity: usize,
    pub observer: ObserverDefaults,
    /// When set, any diagnostic rejects the expression in the
    /// `Result`-returning APIs. Defaults to `true`.
    pub strict_parsing: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            expression_cache_capacity: 512,
            path_cache_capacity: 1024,
            observer: ObserverDefaults::default(),
            strict_parsing: true,
        }
    }
}

impl BindingConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Observer options applied when a caller does not pass its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ObserverDefaults {
    pub observable: bool,
    pub optional: bool,
    pub weak_target: bool,
}

impl Default for ObserverDefaults {
    fn default() -> Self {
        Self {
            observable: true,
            optional: false,
            weak_target: true,
        }
    }
}

impl From<ObserverDefaults> for ObserverOptions {
    fn from(defaults: ObserverDefaults) -> Self {
        ObserverOptions::default()
            .observable(defaults.observable)
            .optional(defaults.optional)
            .weak_target(defaults.weak_target)
    }
}
