//! Engine configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Environment Variables
//!
//! - `TASKLET_STACK_SIZE` - per-task stack size in bytes
//! - `TASKLET_RECURSION_LIMIT` - evaluation depth limit
//! - `TASKLET_DEBUG` - enable debug logging (0/1)

use tasklet_core::constants::{DEFAULT_RECURSION_LIMIT, DEFAULT_STACK_SIZE, MIN_STACK_SIZE};
use tasklet_core::env::{env_get, env_get_bool};

/// Configuration for tasks created against it.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bytes of usable stack per task. Tasks that never suspend in
    /// synchronous mode allocate nothing regardless.
    pub stack_size: usize,

    /// Evaluation depth limit (frames, including nested evaluations).
    pub recursion_limit: u32,

    /// Enable debug logging.
    pub debug_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EngineConfig {
    /// Library defaults, no environment consulted.
    pub fn new() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            debug_logging: false,
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self {
            stack_size: env_get("TASKLET_STACK_SIZE", DEFAULT_STACK_SIZE),
            recursion_limit: env_get("TASKLET_RECURSION_LIMIT", DEFAULT_RECURSION_LIMIT),
            debug_logging: env_get_bool("TASKLET_DEBUG", false),
        }
    }

    // Builder methods

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration and return an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_size < MIN_STACK_SIZE {
            return Err(ConfigError::InvalidValue("stack_size must be >= 16KB"));
        }
        if self.recursion_limit == 0 {
            return Err(ConfigError::InvalidValue("recursion_limit must be > 0"));
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
        assert_eq!(config.recursion_limit, DEFAULT_RECURSION_LIMIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .stack_size(64 * 1024)
            .recursion_limit(32)
            .debug_logging(true);

        assert_eq!(config.stack_size, 64 * 1024);
        assert_eq!(config.recursion_limit, 32);
        assert!(config.debug_logging);
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::new().stack_size(1024).validate().is_err());
        assert!(EngineConfig::new().recursion_limit(0).validate().is_err());
    }
}
