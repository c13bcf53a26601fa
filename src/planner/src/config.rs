use serde::{Deserialize, Serialize};

/// Knobs for a normalizing factory.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormConfig {
    /// Re-validate every newly memoized expression.
    pub check_expressions: bool,
    /// How many rule applications may be nested inside each other before giving up.
    pub max_rewrite_depth: usize,
    /// Start with every rewrite rule vetoed, producing an unnormalized tree.
    pub disable_rules: bool,
}

impl Default for NormConfig {
    fn default() -> Self {
        NormConfig {
            check_expressions: cfg!(debug_assertions),
            max_rewrite_depth: 256,
            disable_rules: false,
        }
    }
}

impl NormConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() -> Result<(), serde_json::Error> {
        let config = NormConfig::from_json(r#"{"max_rewrite_depth": 8}"#)?;
        assert_eq!(config.max_rewrite_depth, 8);
        assert!(!config.disable_rules);
        assert_eq!(config.check_expressions, cfg!(debug_assertions));
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Result<(), serde_json::Error> {
        let config = NormConfig {
            check_expressions: true,
            max_rewrite_depth: 3,
            disable_rules: true,
        };
        assert_eq!(NormConfig::from_json(&config.to_json()?)?, config);
        Ok(())
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(NormConfig::from_json(r#"{"disable_rules": 1}"#).is_err());
    }
}
