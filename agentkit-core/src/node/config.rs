use std::time::Duration;

/// Per-node execution limits applied by the graph runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Retries after the first failed or timed-out attempt.
    pub max_retries: usize,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
}

impl NodeConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::default()
    }

    /// Total attempts the runner may make.
    pub fn attempts(&self) -> usize {
        self.max_retries + 1
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeConfigBuilder(NodeConfig);

impl NodeConfigBuilder {
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.0.max_retries = retries;
        self
    }

    /// Attempt timeout in whole seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.0.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn build(self) -> NodeConfig {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = NodeConfig::builder().max_retries(2).timeout(45).build();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.attempts(), 3);
    }

    #[test]
    fn test_default_is_single_attempt() {
        let config = NodeConfig::default();
        assert_eq!(config.attempts(), 1);
        assert_eq!(config.timeout, NodeConfig::DEFAULT_TIMEOUT);
    }
}
