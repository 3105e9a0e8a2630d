//! Registry configuration, built with the builder pattern via `typed-builder`.

use typed_builder::TypedBuilder;

/// Storage key a host's coordinator registers under. Every record a
/// coordinator produces lives under this key in the registry snapshot.
pub const COORDINATOR_KEY: &str = "statekeep.fields";

/// Configuration for a [`SavedStateRegistry`](crate::registry::SavedStateRegistry).
///
/// # Examples
///
/// ```
/// use statekeep::config::RegistryConfig;
///
/// // Defaults
/// let config = RegistryConfig::builder().build();
/// assert!(config.drop_empty_records);
///
/// // Customized coordinator key
/// let config = RegistryConfig::builder()
///     .coordinator_key("app.window".to_string())
///     .build();
/// assert_eq!(config.coordinator_key, "app.window");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct RegistryConfig {
    /// Key the per-host coordinator registers its save provider under.
    #[builder(default = String::from(COORDINATOR_KEY))]
    pub coordinator_key: String,

    /// Whether capture skips providers whose record came back empty.
    #[builder(default = true)]
    pub drop_empty_records: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_shared_coordinator_key() {
        let config = RegistryConfig::default();
        assert_eq!(config.coordinator_key, COORDINATOR_KEY);
        assert!(config.drop_empty_records);
    }

    #[test]
    fn builder_overrides_stick() {
        let config = RegistryConfig::builder()
            .drop_empty_records(false)
            .build();
        assert!(!config.drop_empty_records);
    }
}
