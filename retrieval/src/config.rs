use serde::{Deserialize, Serialize};

/// Configuration for hybrid retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Largest `limit` a single search may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Limit used when the caller does not pick one
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_max_limit() -> usize {
    100
}

fn default_limit() -> usize {
    10
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            default_limit: default_limit(),
        }
    }
}

impl RetrievalConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_limit == 0 {
            return Err("max_limit must be > 0".to_string());
        }

        if self.default_limit == 0 {
            return Err("default_limit must be > 0".to_string());
        }

        if self.default_limit > self.max_limit {
            return Err(format!(
                "default_limit ({}) cannot exceed max_limit ({})",
                self.default_limit, self.max_limit
            ));
        }

        Ok(())
    }

    /// Whether `limit` may be requested from the engine
    pub fn accepts_limit(&self, limit: usize) -> bool {
        (1..=self.max_limit).contains(&limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.default_limit, 10);
    }

    #[test]
    fn test_limit_validation() {
        let mut config = RetrievalConfig {
            max_limit: 5,
            default_limit: 10,
        };
        assert!(config.validate().is_err());

        config.default_limit = 5;
        assert!(config.validate().is_ok());

        config.max_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_limit() {
        let config = RetrievalConfig::default();
        assert!(!config.accepts_limit(0));
        assert!(config.accepts_limit(1));
        assert!(config.accepts_limit(100));
        assert!(!config.accepts_limit(101));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RetrievalConfig = serde_json::from_str(r#"{"max_limit": 50}"#).unwrap();
        assert_eq!(
            config,
            RetrievalConfig {
                max_limit: 50,
                default_limit: 10,
            }
        );
    }
}
