//! Configuration types for the query facade.

/// Configuration for the query facade.
///
/// # Example
///
/// ```rust
/// use hetio_engine::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .with_parallel(true)
///     .with_audit(false)
///     .build();
/// assert!(config.parallel);
/// assert!(!config.audit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Run the join formulation's per-compound check on rayon
    /// (requires the `parallel` feature).
    pub parallel: bool,
    /// Append every successful query to the audit log sink.
    pub audit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            audit: true,
        }
    }
}

impl EngineConfig {
    /// Creates a new builder for EngineConfig.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig.
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    parallel: bool,
    audit: bool,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            parallel: defaults.parallel,
            audit: defaults.audit,
        }
    }
}

impl EngineConfigBuilder {
    /// Enables or disables parallel inference.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables audit logging.
    pub fn with_audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }

    /// Builds the EngineConfig.
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            parallel: self.parallel,
            audit: self.audit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert!(!config.parallel);
        assert!(config.audit);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::builder()
            .with_parallel(true)
            .with_audit(false)
            .build();

        assert!(config.parallel);
        assert!(!config.audit);
    }

    #[test]
    fn test_builder_keeps_defaults() {
        let config = EngineConfig::builder().with_parallel(true).build();
        assert!(config.parallel);
        assert!(config.audit);
        assert_eq!(EngineConfig::builder().build(), EngineConfig::default());
    }
}
