use serde::{Deserialize, Serialize};

/// Tunables for a [`Registry`](super::Registry).
///
/// Deserializable so a host application can embed it in its own settings
/// file; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Live listener count at which a leak warning is logged. Crossing the
    /// threshold warns once; the warning re-arms after the count drops below.
    pub listener_warn_threshold: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            listener_warn_threshold: 1024,
        }
    }
}
